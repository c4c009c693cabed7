use crate::assembler::assemble;
use crate::branding::fetch_logo;
use crate::brochure::Brochure;
use crate::config::GeneratorConfig;
use crate::error::OfferError;
use crate::image_extractor::ImageExtractor;
use crate::inventory::{Inventory, columns};
use crate::offer_pages::OfferPageRenderer;
use crate::page_locator::PageLocator;
use crate::report::{ProgressEvent, ProgressSink};
use image::DynamicImage;
use log::info;
use std::time::Duration;

/// Main orchestrator for one offer generation request
///
/// Wires the pipeline together: record lookup, brochure page location
/// (introduction, master plan and unit sections, each with its fallback
/// query chain), photo extraction, best-effort branding fetch, page
/// rendering and final assembly. The inventory is the caller's session
/// context; each call owns its own brochure bytes.
pub struct OfferGenerator {
    config: GeneratorConfig,
    locator: PageLocator,
    extractor: ImageExtractor,
    renderer: OfferPageRenderer,
}

impl OfferGenerator {
    pub fn new(config: GeneratorConfig) -> Self {
        let locator = PageLocator::new(config.normalize_mode);
        let extractor = ImageExtractor::new(config.min_image_dimension);
        let renderer =
            OfferPageRenderer::new(config.company_name.clone(), config.company_website.clone());
        OfferGenerator { config, locator, extractor, renderer }
    }

    /// Produce the assembled offer document for one unit
    ///
    /// Fatal only when the record is missing or the brochure cannot be
    /// opened. Everything else degrades: missing sections, skipped pages,
    /// undecodable images and a failed logo fetch reduce completeness and
    /// are reported through the sink.
    pub fn generate(
        &self,
        inventory: &Inventory,
        unit_key: &str,
        brochure_bytes: &[u8],
        sink: &mut dyn ProgressSink,
    ) -> Result<Vec<u8>, OfferError> {
        let record = inventory.find_by_key(unit_key)?;
        let development = record.get_or_na(columns::DEV_NAME).to_string();
        sink.event(ProgressEvent::RecordFound {
            key: unit_key.trim().to_string(),
            development: development.clone(),
        });

        let brochure = Brochure::from_bytes(brochure_bytes)?;
        info!("Brochure opened: {} pages", brochure.page_count());

        let limit = self.config.page_search_limit;
        let intro = self.locate_section(&brochure, "introduction", &self.config.intro_queries, sink);
        let masterplan =
            self.locate_section(&brochure, "master plan", &self.config.masterplan_queries, sink);

        sink.event(ProgressEvent::Searching { query: development.clone() });
        let unit_pages = self.locator.find_pages(&brochure, &development, limit, sink);
        if unit_pages.is_empty() {
            sink.event(ProgressEvent::NoPagesFound { section: "unit" });
        } else {
            sink.event(ProgressEvent::PagesLocated { section: "unit", pages: unit_pages.clone() });
        }

        let images =
            self.extractor.extract(&brochure, &unit_pages, self.config.max_images, sink);

        let logo = self.fetch_branding(sink);
        let generated = self.renderer.render(record, unit_key.trim(), logo.as_ref())?;

        // Output order: generated pages, introduction, master plan, unit
        // pages; duplicates across sections collapse to first occurrence.
        let mut selected = intro;
        selected.extend(masterplan);
        selected.extend(unit_pages);

        assemble(generated, &brochure, &selected, &images)
    }

    fn locate_section(
        &self,
        brochure: &Brochure,
        section: &'static str,
        queries: &[String],
        sink: &mut dyn ProgressSink,
    ) -> Vec<usize> {
        let queries: Vec<&str> = queries.iter().map(String::as_str).collect();
        let pages =
            self.locator
                .find_first_match(brochure, &queries, self.config.page_search_limit, sink);
        if pages.is_empty() {
            sink.event(ProgressEvent::NoPagesFound { section });
        } else {
            sink.event(ProgressEvent::PagesLocated { section, pages: pages.clone() });
        }
        pages
    }

    fn fetch_branding(&self, sink: &mut dyn ProgressSink) -> Option<DynamicImage> {
        let url = self.config.logo_url.as_deref()?;
        match fetch_logo(url, Duration::from_secs(self.config.logo_timeout_secs)) {
            Ok(logo) => Some(logo),
            Err(reason) => {
                sink.event(ProgressEvent::LogoFetchFailed { reason });
                None
            }
        }
    }
}
