// WebSocket subscription management

pub mod manager;
pub mod protocol;

pub use manager::ConnectionManager;
pub use protocol::{AudioMessage, ClientMessage, ErrorMessage, UnitId};
