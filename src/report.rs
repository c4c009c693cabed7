use log::{info, warn};

/// Progress events emitted while a request is processed
///
/// The reference behavior mixed user-facing status messages into the
/// search and extraction logic. Here the core only emits events; what a
/// frontend does with them is its own business.
#[derive(Debug, Clone)]
pub enum ProgressEvent {
    RecordFound { key: String, development: String },
    Searching { query: String },
    PagesLocated { section: &'static str, pages: Vec<usize> },
    NoPagesFound { section: &'static str },
    PageSkipped { page: usize, reason: String },
    ImageSkipped { page: usize, reason: String },
    ImagesExtracted { count: usize },
    LogoFetchFailed { reason: String },
}

/// Receiver for [`ProgressEvent`]s
pub trait ProgressSink {
    fn event(&mut self, event: ProgressEvent);
}

/// Sink that forwards events to the `log` crate
///
/// Degradations (skipped pages, missing sections, failed logo fetch) go
/// to `warn`, the rest to `info`.
#[derive(Debug, Default)]
pub struct LogSink;

impl ProgressSink for LogSink {
    fn event(&mut self, event: ProgressEvent) {
        match event {
            ProgressEvent::RecordFound { key, development } => {
                info!("Unit found: {} ({})", key, development)
            }
            ProgressEvent::Searching { query } => info!("Searching brochure for: {}", query),
            ProgressEvent::PagesLocated { section, pages } => {
                info!("Located {} pages: {:?}", section, pages)
            }
            ProgressEvent::NoPagesFound { section } => {
                warn!("No {} pages found in the brochure", section)
            }
            ProgressEvent::PageSkipped { page, reason } => {
                warn!("Skipping page {}: {}", page, reason)
            }
            ProgressEvent::ImageSkipped { page, reason } => {
                warn!("Skipping image on page {}: {}", page, reason)
            }
            ProgressEvent::ImagesExtracted { count } => info!("Extracted {} images", count),
            ProgressEvent::LogoFetchFailed { reason } => {
                warn!("Logo fetch failed, continuing without branding: {}", reason)
            }
        }
    }
}

/// Sink that discards all events
#[derive(Debug, Default)]
pub struct NullSink;

impl ProgressSink for NullSink {
    fn event(&mut self, _event: ProgressEvent) {}
}

/// Sink that records events, for tests and batch frontends
#[derive(Debug, Default)]
pub struct CollectingSink {
    pub events: Vec<ProgressEvent>,
}

impl ProgressSink for CollectingSink {
    fn event(&mut self, event: ProgressEvent) {
        self.events.push(event);
    }
}
