// WebSocket API surface

pub mod websocket;

pub use websocket::{create_ws_router, ws_handler, WsAppState};
