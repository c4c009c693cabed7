use crate::error::OfferError;
use lopdf::{Document, ObjectId};
use log::debug;

/// A loaded brochure document
///
/// Wraps a parsed PDF and exposes the two capabilities the pipeline needs:
/// per-page text extraction and access to the underlying objects for image
/// enumeration and page merging. Page indices are 0-based, stable and
/// monotonic for the lifetime of the value; the document is never mutated
/// after loading.
pub struct Brochure {
    doc: Document,
    page_ids: Vec<ObjectId>,
}

impl Brochure {
    /// Parse a brochure from raw PDF bytes
    ///
    /// Fails with `DocumentUnreadable` when the blob cannot be parsed at
    /// all. Individual broken pages inside an otherwise readable document
    /// are handled later, per page.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, OfferError> {
        let doc = Document::load_mem(bytes)
            .map_err(|e| OfferError::DocumentUnreadable(e.to_string()))?;

        // get_pages returns 1-based page numbers; BTreeMap iteration keeps
        // them ascending, which fixes our 0-based index order.
        let page_ids: Vec<ObjectId> = doc.get_pages().into_values().collect();

        debug!("Brochure loaded: {} pages", page_ids.len());
        Ok(Brochure { doc, page_ids })
    }

    pub fn page_count(&self) -> usize {
        self.page_ids.len()
    }

    /// Object id of the page at `index`, if in range
    pub fn page_id(&self, index: usize) -> Option<ObjectId> {
        self.page_ids.get(index).copied()
    }

    /// Extract the text of a single page
    ///
    /// Returns an empty string for pages without extractable text. A parse
    /// failure inside the page is returned as an error so the caller can
    /// skip that page without aborting the scan.
    pub fn page_text(&self, index: usize) -> Result<String, lopdf::Error> {
        if index >= self.page_ids.len() {
            return Ok(String::new());
        }
        self.doc.extract_text(&[index as u32 + 1])
    }

    /// Underlying parsed document, for image enumeration and assembly
    pub fn document(&self) -> &Document {
        &self.doc
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_pdf::pdf_with_pages;

    #[test]
    fn test_unreadable_bytes() {
        assert!(matches!(
            Brochure::from_bytes(b"not a pdf"),
            Err(OfferError::DocumentUnreadable(_))
        ));
    }

    #[test]
    fn test_page_count_and_text() {
        let bytes = pdf_with_pages(&["First page", "Second page"]);
        let brochure = Brochure::from_bytes(&bytes).unwrap();
        assert_eq!(brochure.page_count(), 2);
        assert!(brochure.page_text(0).unwrap().contains("First page"));
        assert!(brochure.page_text(1).unwrap().contains("Second page"));
    }

    #[test]
    fn test_out_of_range_page_text_is_empty() {
        let bytes = pdf_with_pages(&["Only page"]);
        let brochure = Brochure::from_bytes(&bytes).unwrap();
        assert_eq!(brochure.page_text(5).unwrap(), "");
    }
}
