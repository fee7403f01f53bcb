#![forbid(unsafe_code)]

mod command;
mod duration;
mod engine;
mod parse;

pub use command::{Command, DEFAULT_QUERY_TTL};
pub use duration::parse_duration;
pub use engine::{QueryEngine, QueryResult};
pub use parse::Parse;
