pub mod error;
pub mod filtering;
pub mod roster_store;
