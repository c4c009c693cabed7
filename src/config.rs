use crate::branding::DEFAULT_FETCH_TIMEOUT_SECS;
use crate::error::OfferError;
use crate::image_extractor::{DEFAULT_MAX_IMAGES, DEFAULT_MIN_DIMENSION};
use crate::page_locator::DEFAULT_PAGE_LIMIT;
use crate::record_matcher::MatcherWeights;
use crate::text_normalizer::NormalizeMode;
use serde::Deserialize;

/// Tunables for one generator instance
///
/// Everything the reference behavior hardcodes lives here: search limit,
/// image count and size threshold, matcher weights, the section fallback
/// query chains and the branding source. Defaults reproduce the reference
/// behavior; a JSON file can override any subset.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Maximum page indices returned per brochure search
    pub page_search_limit: usize,
    /// Maximum photos extracted per request
    pub max_images: usize,
    /// Photos must be strictly larger than this in both dimensions
    pub min_image_dimension: u32,
    /// Normalization policy used for page search
    pub normalize_mode: NormalizeMode,
    /// Scoring weights for requirement suggestions
    pub matcher: MatcherWeights,
    /// Fallback query chain for the introduction section
    pub intro_queries: Vec<String>,
    /// Fallback query chain for the master plan section
    pub masterplan_queries: Vec<String>,
    /// Company line on the cover page
    pub company_name: String,
    pub company_website: String,
    /// Branding logo source; `None` disables the fetch
    pub logo_url: Option<String>,
    pub logo_timeout_secs: u64,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        GeneratorConfig {
            page_search_limit: DEFAULT_PAGE_LIMIT,
            max_images: DEFAULT_MAX_IMAGES,
            min_image_dimension: DEFAULT_MIN_DIMENSION,
            normalize_mode: NormalizeMode::Alphanumeric,
            matcher: MatcherWeights::default(),
            intro_queries: vec!["Introduction".to_string(), "In the heart".to_string()],
            masterplan_queries: vec![
                "Master Plan".to_string(),
                "DESTINATION MASTER PLAN".to_string(),
            ],
            company_name: "Inertia Properties".to_string(),
            company_website: "www.inertiaegypt.com".to_string(),
            logo_url: None,
            logo_timeout_secs: DEFAULT_FETCH_TIMEOUT_SECS,
        }
    }
}

impl GeneratorConfig {
    /// Parse a JSON override file; absent keys keep their defaults
    pub fn from_json(bytes: &[u8]) -> Result<Self, OfferError> {
        serde_json::from_slice(bytes).map_err(|e| OfferError::ConfigInvalid(e.to_string()))
    }
}
