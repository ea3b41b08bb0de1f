pub mod navigation;
pub mod presentation;

pub use navigation::{ImageCursor, NavEvent, Navigator, ViewState};
pub use presentation::CatalogView;
