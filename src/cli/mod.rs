pub mod context;
pub mod credentials;
pub mod error;
pub mod progress;
