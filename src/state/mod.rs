//! In-memory state shared between the query path and switch tasks

mod directory;

pub use directory::{DeviceCache, DEFAULT_TTL};
