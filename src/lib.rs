pub mod analysis;
pub mod cli;
pub mod config;
pub mod errors;
pub mod experiment;
pub mod models;
pub mod report;
