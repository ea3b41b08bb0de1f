pub mod product;

pub use product::ProductForm;
