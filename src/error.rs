use thiserror::Error;

/// Custom error types for the offer generation pipeline
///
/// Only conditions that abort a whole generation request are modelled as
/// errors. Per-page text failures, undecodable images and a failed logo
/// fetch are absorbed where they happen and surfaced as progress events.
#[derive(Error, Debug)]
pub enum OfferError {
    #[error("Unit '{0}' not found in the inventory")]
    RecordNotFound(String),

    #[error("Inventory dataset could not be read: {0}")]
    DatasetUnreadable(String),

    #[error("Configuration is invalid: {0}")]
    ConfigInvalid(String),

    #[error("Brochure document could not be opened: {0}")]
    DocumentUnreadable(String),

    #[error("Offer page rendering failed: {0}")]
    RenderError(String),

    #[error("Document assembly failed: {0}")]
    AssemblyError(String),
}
