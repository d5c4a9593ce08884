//! Candidate profile parsed from the resume form.

mod form;
mod types;

pub use form::{FormFields, download_filename};
pub use types::*;
