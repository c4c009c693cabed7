//! Offer document generation from an inventory record and a brochure PDF.
//!
//! Pipeline:
//! 1. Look the unit up in the loaded inventory (exact, trimmed key)
//! 2. Locate relevant brochure pages by normalized text search, with
//!    per-section fallback query chains
//! 3. Extract qualifying photos from the located pages
//! 4. Render the cover and details pages from the record
//! 5. Merge everything into one output PDF
//!
//! The record matcher is independent of that pipeline: it ranks inventory
//! records against a free-text requirement before a unit is chosen.

pub mod assembler;
pub mod branding;
pub mod brochure;
pub mod config;
pub mod error;
pub mod generator;
pub mod image_extractor;
pub mod inventory;
pub mod offer_pages;
pub mod page_locator;
pub mod record_matcher;
pub mod report;
pub mod text_normalizer;

#[cfg(test)]
pub(crate) mod test_pdf;

pub use config::GeneratorConfig;
pub use error::OfferError;
pub use generator::OfferGenerator;
pub use inventory::{Inventory, Record};
pub use record_matcher::{RecordMatcher, Suggestion};
