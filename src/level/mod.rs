use crate::subscription::protocol::UnitId;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::trace;


/// LevelSnapshot is the decoded contents of a unit's VU level file.
///
/// Wire layout: byte 0 = channel count N, followed by exactly N unsigned
/// 8-bit level values (0-255). No version, timestamp, or checksum.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LevelSnapshot {
    /// One level byte per channel
    pub levels: Vec<u8>,
}

impl LevelSnapshot {
    /// Decode a level file's bytes.
    ///
    /// Returns None for empty or truncated input (fewer than N+1 bytes).
    /// A truncated file is treated the same as an unreadable one: the
    /// caller skips that poll cycle.
    pub fn decode(bytes: &[u8]) -> Option<Self> {
        let (&channels, rest) = bytes.split_first()?;
        let levels = rest.get(..channels as usize)?;
        Some(Self {
            levels: levels.to_vec(),
        })
    }
}

/// Reads per-unit VU level files under a configured path prefix.
pub struct LevelReader {
    file_prefix: String,
    reads: AtomicU64,
}

impl LevelReader {
    pub fn new(file_prefix: impl Into<String>) -> Self {
        Self {
            file_prefix: file_prefix.into(),
            reads: AtomicU64::new(0),
        }
    }

    /// Total read attempts, counting skipped cycles
    pub fn reads(&self) -> u64 {
        self.reads.load(Ordering::Relaxed)
    }

    /// Path of the level file for a unit: `<prefix>.<unit>.vu`
    pub fn unit_path(&self, unit: &UnitId) -> PathBuf {
        PathBuf::from(format!("{}.{}.vu", self.file_prefix, unit))
    }

    /// Read and decode one level file, best effort.
    ///
    /// Any failure (missing file, permission or transient I/O error,
    /// truncated contents) yields None; the next scheduled tick is the
    /// retry.
    pub async fn read_path(&self, path: &Path) -> Option<LevelSnapshot> {
        self.reads.fetch_add(1, Ordering::Relaxed);

        let bytes = match tokio::fs::read(path).await {
            Ok(bytes) => bytes,
            Err(e) => {
                trace!(path = %path.display(), error = %e, "Level file read skipped");
                return None;
            }
        };

        let snapshot = LevelSnapshot::decode(&bytes);
        if snapshot.is_none() {
            trace!(path = %path.display(), len = bytes.len(), "Truncated level file, cycle skipped");
        }
        snapshot
    }
}
