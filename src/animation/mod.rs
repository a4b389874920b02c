pub mod ease;
pub mod entrance;
