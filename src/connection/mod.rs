// mod.rs - Database connection layer

pub mod config;
pub mod layer;

pub use config::{DatabaseConfig, Source};
pub use layer::connection_flags;
