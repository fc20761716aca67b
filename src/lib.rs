// Configuration
pub mod config;

// Level file reading and decoding
pub mod level;

// WebSocket API
pub mod api;

// Per-connection subscription management
pub mod subscription;
