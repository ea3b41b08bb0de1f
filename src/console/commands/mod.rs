pub mod admin;
mod callable;
pub mod storefront;

pub use callable::*;
