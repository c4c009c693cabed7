use crate::inventory::{Inventory, Record, columns};
use crate::text_normalizer::{NormalizeMode, normalize};
use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;

/// Default cap on returned suggestions
pub const DEFAULT_MAX_SUGGESTIONS: usize = 5;

/// "3 bedroom", "2 beds", "4-bedroom" and similar
static BEDROOM_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(\d+)[\s-]*bed(?:room)?s?").expect("Invalid bedroom regex"));

const OUTDOOR_KEYWORDS: [&str; 4] = ["garden", "outdoor", "green", "terrace"];
const VIEW_KEYWORDS: [&str; 6] = ["view", "sea", "ocean", "lagoon", "golf", "landscape"];

/// Scoring weights for the requirement matcher
///
/// The defaults reproduce the reference ranking. They are configuration
/// rather than constants because nothing documents why these particular
/// magnitudes were chosen.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MatcherWeights {
    pub bedrooms_exact: i32,
    pub bedrooms_close: i32,
    pub outdoor_space: i32,
    pub premium_location: i32,
    pub availability: i32,
}

impl Default for MatcherWeights {
    fn default() -> Self {
        MatcherWeights {
            bedrooms_exact: 50,
            bedrooms_close: 25,
            outdoor_space: 30,
            premium_location: 20,
            availability: 15,
        }
    }
}

/// A ranked suggestion: record, aggregate score and the signals behind it
#[derive(Debug)]
pub struct Suggestion<'a> {
    pub record: &'a Record,
    pub score: i32,
    pub reasons: Vec<String>,
}

/// Ranks inventory records against a free-text requirement description
///
/// Four additive, independent signals: bedroom count, outdoor space,
/// view/location keywords and availability. A record contributing no
/// signal at all is not a suggestion and never appears in the output.
pub struct RecordMatcher {
    weights: MatcherWeights,
}

impl RecordMatcher {
    pub fn new(weights: MatcherWeights) -> Self {
        RecordMatcher { weights }
    }

    /// Score and rank records, best first
    ///
    /// Ties keep dataset order (stable sort); the result is truncated to
    /// `max_results`. An empty requirement yields no suggestions.
    pub fn suggest<'a>(
        &self,
        inventory: &'a Inventory,
        requirement_text: &str,
        max_results: usize,
    ) -> Vec<Suggestion<'a>> {
        let requirement = normalize(requirement_text, NormalizeMode::DiacriticsOnly);
        if requirement.is_empty() {
            return Vec::new();
        }

        let wanted_bedrooms = BEDROOM_PATTERN
            .captures(&requirement)
            .and_then(|c| c[1].parse::<i64>().ok());
        debug!("Requirement asks for {:?} bedrooms", wanted_bedrooms);

        let mut suggestions: Vec<Suggestion<'a>> = inventory
            .records()
            .iter()
            .filter_map(|record| self.score_record(record, &requirement, wanted_bedrooms))
            .collect();

        suggestions.sort_by(|a, b| b.score.cmp(&a.score));
        suggestions.truncate(max_results);
        suggestions
    }

    /// Score one record; `None` when no signal contributes
    fn score_record<'a>(
        &self,
        record: &'a Record,
        requirement: &str,
        wanted_bedrooms: Option<i64>,
    ) -> Option<Suggestion<'a>> {
        let mut score = 0;
        let mut reasons = Vec::new();

        if let (Some(wanted), Some(have)) = (wanted_bedrooms, record.number(columns::BEDROOMS)) {
            let have = have as i64;
            if have == wanted {
                score += self.weights.bedrooms_exact;
                reasons.push(format!("{} bedrooms", have));
            } else if (have - wanted).abs() == 1 {
                score += self.weights.bedrooms_close;
                reasons.push(format!("{} bedrooms (close match)", have));
            }
        }

        let wants_outdoor = OUTDOOR_KEYWORDS.iter().any(|k| requirement.contains(k));
        if wants_outdoor {
            if let Some(garden) = record.number(columns::GARDEN) {
                if garden > 0.0 {
                    score += self.weights.outdoor_space;
                    reasons.push(format!("Garden {}m²", format_area(garden)));
                }
            }
        }

        let location = normalize(
            &format!(
                "{} {}",
                record.get(columns::DEV_NAME).unwrap_or(""),
                record.get(columns::UNIT_TYPE).unwrap_or("")
            ),
            NormalizeMode::DiacriticsOnly,
        );
        // Same keyword on both sides: the requirement asks for it and the
        // development/type name advertises it.
        let premium = VIEW_KEYWORDS
            .iter()
            .any(|k| requirement.contains(k) && location.contains(k));
        if premium {
            score += self.weights.premium_location;
            reasons.push("Premium location".to_string());
        }

        let status = record.get(columns::STATUS).unwrap_or("").trim().to_lowercase();
        if status == "available" || status == "ready" {
            score += self.weights.availability;
            reasons.push("Available now".to_string());
        }

        if score == 0 {
            return None;
        }
        Some(Suggestion { record, score, reasons })
    }
}

impl Default for RecordMatcher {
    fn default() -> Self {
        RecordMatcher::new(MatcherWeights::default())
    }
}

fn format_area(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}
