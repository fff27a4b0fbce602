pub mod config;
pub mod constructs;
pub mod sql;
