pub mod crop;
pub mod fetch;
pub mod source;
