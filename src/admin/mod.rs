//! Admin CRUD surface: the product draft edited in the create/edit form and
//! the panel that saves, deletes and reorders products.

mod draft;
mod panel;

pub use draft::{ProductDraft, StageOutcome, MAX_IMAGES};
pub use panel::{AdminPanel, DeleteOutcome};
