pub mod config;
pub mod data;
pub mod rate_limit;
