pub mod filename;
pub mod snapshot;
