pub mod admin;
pub mod cli;
pub mod configuration;
pub mod connectors;
pub mod console;
pub mod errors;
pub mod forms;
pub mod models;
pub mod services;
pub mod telemetry;
pub mod views;
