pub mod browse;
pub mod catalog;
pub mod session;

pub use browse::BrowseCommand;
pub use catalog::{CatalogCommand, ShowCommand};
pub use session::{LoginCommand, LogoutCommand, WhoamiCommand};
