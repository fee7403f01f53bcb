#![forbid(unsafe_code)]

mod error;

pub use error::*;

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_HTTP_PORT: u16 = 8080;
pub const DEFAULT_WS_PORT: u16 = 8081;
pub const DEFAULT_DATA_FILE: &str = "data.json";
pub const DEFAULT_SAVE_INTERVAL_SECS: u64 = 30;
pub const DEFAULT_SWEEP_INTERVAL_SECS: u64 = 30;
/// TTL aplicado quando SET não informa um (24 horas).
pub const DEFAULT_QUERY_TTL_SECS: u64 = 24 * 60 * 60;
