use crate::brochure::Brochure;
use crate::report::{ProgressEvent, ProgressSink};
use crate::text_normalizer::{NormalizeMode, normalize};
use log::debug;

/// Default cap on the number of page indices a search returns
pub const DEFAULT_PAGE_LIMIT: usize = 4;

/// Scans brochure pages for a free-text query
///
/// Pages are compared after normalization, so the search is case- and
/// diacritic-insensitive. The scan visits pages in index order and stops
/// as soon as the limit is reached, which makes results deterministic:
/// ascending indices, no duplicates, never more than `limit` entries.
pub struct PageLocator {
    mode: NormalizeMode,
}

impl PageLocator {
    pub fn new(mode: NormalizeMode) -> Self {
        PageLocator { mode }
    }

    /// Find up to `limit` pages whose text contains `query`
    ///
    /// An empty or whitespace-only query matches no pages; returning the
    /// whole document for a blank input would be an accident, not a match.
    /// Pages whose text cannot be extracted are skipped and reported, a
    /// single bad page never aborts the scan.
    pub fn find_pages(
        &self,
        brochure: &Brochure,
        query: &str,
        limit: usize,
        sink: &mut dyn ProgressSink,
    ) -> Vec<usize> {
        let needle = normalize(query, self.mode);
        if needle.is_empty() || limit == 0 {
            return Vec::new();
        }

        let mut found = Vec::new();
        for index in 0..brochure.page_count() {
            let text = match brochure.page_text(index) {
                Ok(text) => text,
                Err(e) => {
                    sink.event(ProgressEvent::PageSkipped {
                        page: index,
                        reason: e.to_string(),
                    });
                    continue;
                }
            };
            if text.is_empty() {
                continue;
            }
            if normalize(&text, self.mode).contains(&needle) {
                found.push(index);
                if found.len() >= limit {
                    break;
                }
            }
        }

        debug!("Query '{}' matched pages {:?}", query, found);
        found
    }

    /// Try an ordered chain of queries, returning the first non-empty hit
    ///
    /// Formalizes the fallback behavior for section headings: a brochure
    /// may title its overview "Introduction" or open with "In the heart",
    /// so callers pass both and the earlier query wins when it matches.
    pub fn find_first_match(
        &self,
        brochure: &Brochure,
        queries: &[&str],
        limit: usize,
        sink: &mut dyn ProgressSink,
    ) -> Vec<usize> {
        for query in queries {
            let pages = self.find_pages(brochure, query, limit, sink);
            if !pages.is_empty() {
                return pages;
            }
        }
        Vec::new()
    }
}

impl Default for PageLocator {
    fn default() -> Self {
        PageLocator::new(NormalizeMode::Alphanumeric)
    }
}
