pub mod config;
pub mod nebula;
pub mod record;
