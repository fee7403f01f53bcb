#![forbid(unsafe_code)]

mod entry;
pub mod snapshot;
mod store;
mod task;

pub use entry::{Entry, Value};
pub use snapshot::Persistence;
pub use store::{Snapshot, Store};
pub use task::PeriodicTask;
