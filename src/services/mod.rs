pub mod auth;
pub mod image_store;
pub mod product_repository;

pub use auth::{AdminAuth, AdminSession};
pub use image_store::{ImageFile, ImageStore};
pub use product_repository::ProductRepository;
