pub mod artifact;
pub mod config;
pub mod topology;
pub mod user;
