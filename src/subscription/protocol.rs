use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Error text sent for an invalid audio request, verbatim wire contract.
pub const MISSING_FIELDS_ERROR: &str = "unit or frequency missing";

/// Unit identifier as it appears on the wire: a JSON number or string.
///
/// Formatted into the level file name as-is, so `0` and `"0"` resolve to
/// the same file. Negative and fractional numbers are kept in their JSON
/// representation (`-1`, `2.5`) rather than rejected.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum UnitId {
    Number(serde_json::Number),
    Text(String),
}

impl fmt::Display for UnitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnitId::Number(n) => write!(f, "{}", n),
            UnitId::Text(s) => write!(f, "{}", s),
        }
    }
}

/// Client → Server message types
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "event")]
pub enum ClientMessage {
    /// Start (or replace) a level poll for a unit
    #[serde(rename = "audio")]
    Audio {
        frequency: Option<f64>,
        unit: Option<UnitId>,
    },
}

/// Server → Client: decoded per-channel levels for one poll tick
#[derive(Debug, Clone, Serialize)]
pub struct AudioMessage {
    pub event: String,
    pub audio: Vec<u8>,
}

impl AudioMessage {
    pub fn new(audio: Vec<u8>) -> Self {
        Self {
            event: "audio".to_string(),
            audio,
        }
    }
}

/// Server → Client: Error message
#[derive(Debug, Clone, Serialize)]
pub struct ErrorMessage {
    pub event: String,
    pub message: String,
}

impl ErrorMessage {
    pub fn new(message: String) -> Self {
        Self {
            event: "audio".to_string(),
            message,
        }
    }

    pub fn missing_fields() -> Self {
        Self::new(MISSING_FIELDS_ERROR.to_string())
    }
}

/// Validate an audio request's fields and derive the poll period.
///
/// Frequency must be present, finite, positive, and yield a period that
/// `Duration` can represent; unit must be present. Anything else yields
/// the fixed error text.
pub fn validate_request(
    frequency: Option<f64>,
    unit: Option<UnitId>,
) -> Result<(Duration, UnitId), &'static str> {
    match (frequency, unit) {
        (Some(frequency), Some(unit)) if frequency.is_finite() && frequency > 0.0 => {
            match Duration::try_from_secs_f64(1.0 / frequency) {
                Ok(period) => Ok((period, unit)),
                Err(_) => Err(MISSING_FIELDS_ERROR),
            }
        }
        _ => Err(MISSING_FIELDS_ERROR),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_audio_request_numeric_unit() {
        let msg: ClientMessage =
            serde_json::from_str(r#"{"event":"audio","frequency":2,"unit":0}"#).unwrap();
        let ClientMessage::Audio { frequency, unit } = msg;
        assert_eq!(frequency, Some(2.0));
        assert_eq!(unit, Some(UnitId::Number(0.into())));
    }

    #[test]
    fn test_parse_negative_and_fractional_units() {
        let msg: ClientMessage =
            serde_json::from_str(r#"{"event":"audio","frequency":1,"unit":-1}"#).unwrap();
        let ClientMessage::Audio { unit, .. } = msg;
        assert_eq!(unit.unwrap().to_string(), "-1");

        let msg: ClientMessage =
            serde_json::from_str(r#"{"event":"audio","frequency":1,"unit":2.5}"#).unwrap();
        let ClientMessage::Audio { unit, .. } = msg;
        assert_eq!(unit.unwrap().to_string(), "2.5");
    }

    #[test]
    fn test_parse_audio_request_string_unit() {
        let msg: ClientMessage =
            serde_json::from_str(r#"{"event":"audio","frequency":0.5,"unit":"deck-a"}"#).unwrap();
        let ClientMessage::Audio { frequency, unit } = msg;
        assert_eq!(frequency, Some(0.5));
        assert_eq!(unit, Some(UnitId::Text("deck-a".into())));
    }

    #[test]
    fn test_parse_audio_request_missing_fields() {
        let msg: ClientMessage = serde_json::from_str(r#"{"event":"audio"}"#).unwrap();
        let ClientMessage::Audio { frequency, unit } = msg;
        assert_eq!(frequency, None);
        assert_eq!(unit, None);
    }

    #[test]
    fn test_parse_unknown_event_rejected() {
        let result = serde_json::from_str::<ClientMessage>(r#"{"event":"video","fps":25}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_validate_accepts_positive_frequency() {
        let (period, unit) = validate_request(Some(2.0), Some(UnitId::Number(0.into()))).unwrap();
        assert_eq!(period, Duration::from_millis(500));
        assert_eq!(unit, UnitId::Number(0.into()));
    }

    #[test]
    fn test_validate_rejects_missing_unit() {
        assert_eq!(validate_request(Some(1.0), None), Err(MISSING_FIELDS_ERROR));
    }

    #[test]
    fn test_validate_rejects_missing_frequency() {
        assert_eq!(
            validate_request(None, Some(UnitId::Number(0.into()))),
            Err(MISSING_FIELDS_ERROR)
        );
    }

    #[test]
    fn test_validate_rejects_non_positive_frequency() {
        for bad in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            assert_eq!(
                validate_request(Some(bad), Some(UnitId::Number(0.into()))),
                Err(MISSING_FIELDS_ERROR)
            );
        }
    }

    #[test]
    fn test_validate_rejects_unrepresentable_period() {
        // 1.0 / 1e-300 overflows Duration; must reject, never panic
        assert_eq!(
            validate_request(Some(1e-300), Some(UnitId::Number(0.into()))),
            Err(MISSING_FIELDS_ERROR)
        );
        assert_eq!(
            validate_request(Some(f64::MIN_POSITIVE), Some(UnitId::Number(0.into()))),
            Err(MISSING_FIELDS_ERROR)
        );
    }

    #[test]
    fn test_error_message_wire_shape() {
        let json = serde_json::to_string(&ErrorMessage::missing_fields()).unwrap();
        assert_eq!(
            json,
            r#"{"event":"audio","message":"unit or frequency missing"}"#
        );
    }

    #[test]
    fn test_audio_message_wire_shape() {
        let json = serde_json::to_string(&AudioMessage::new(vec![10, 20])).unwrap();
        assert_eq!(json, r#"{"event":"audio","audio":[10,20]}"#);
    }
}
