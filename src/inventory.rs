use crate::error::OfferError;
use log::{debug, info};
use std::collections::HashMap;

/// Column names of the inventory dataset
///
/// Matching against headers happens after trimming surrounding whitespace,
/// so a sloppily exported " Unit Number " header still resolves.
pub mod columns {
    pub const UNIT_NUMBER: &str = "Unit Number";
    pub const DEV_NAME: &str = "Dev Name";
    pub const UNIT_TYPE: &str = "Type";
    pub const UNIT_SUBTYPE: &str = "Type 4";
    pub const FLOOR: &str = "Floor";
    pub const BEDROOMS: &str = "No.Bedrooms";
    pub const BUA: &str = "BUA with Terraces";
    pub const GARDEN: &str = "Garden";
    pub const ROOF_AREA: &str = "Roof Area";
    pub const MAID_ROOM: &str = "Maid Room";
    pub const TOURISTIC: &str = "Touristic Status";
    pub const PRICE: &str = "Final Price";
    pub const DELIVERY: &str = "Delivery Date";
    pub const STATUS: &str = "Status";
}

/// One row of the inventory dataset
///
/// A plain field-name to value mapping; the dataset is read-only after
/// load, so no mutation API exists.
#[derive(Debug, Clone)]
pub struct Record {
    fields: HashMap<String, String>,
}

impl Record {
    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields.get(field).map(String::as_str)
    }

    /// Field value for display, with a placeholder for missing data
    pub fn get_or_na(&self, field: &str) -> &str {
        self.get(field).filter(|v| !v.trim().is_empty()).unwrap_or("N/A")
    }

    /// Numeric field value; non-numeric content reads as absent
    pub fn number(&self, field: &str) -> Option<f64> {
        self.get(field)?.trim().replace(',', "").parse().ok()
    }
}

/// The loaded inventory dataset, the per-session context object
///
/// Load once, pass by reference into each generation request. Records are
/// immutable after load and keep their dataset order, which the matcher
/// relies on for stable tie-breaking.
pub struct Inventory {
    records: Vec<Record>,
}

impl Inventory {
    /// Parse a delimited dataset from raw bytes
    ///
    /// Text decoding tries UTF-8 first, then Latin-1. Header names are
    /// trimmed. A file that fails CSV parsing under both encodings is
    /// `DatasetUnreadable`.
    pub fn from_csv_bytes(bytes: &[u8]) -> Result<Self, OfferError> {
        let text = decode_bytes(bytes);
        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .from_reader(text.as_bytes());

        let headers: Vec<String> = reader
            .headers()
            .map_err(|e| OfferError::DatasetUnreadable(e.to_string()))?
            .iter()
            .map(|h| h.trim().to_string())
            .collect();

        let mut records = Vec::new();
        for row in reader.records() {
            let row = row.map_err(|e| OfferError::DatasetUnreadable(e.to_string()))?;
            let fields = headers
                .iter()
                .cloned()
                .zip(row.iter().map(str::to_string))
                .collect();
            records.push(Record { fields });
        }

        info!("Inventory loaded: {} records", records.len());
        Ok(Inventory { records })
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Look a record up by its unit number
    ///
    /// Exact string comparison after trimming whitespace on both sides.
    /// The primary lookup path is deliberately not fuzzy.
    pub fn find_by_key(&self, key: &str) -> Result<&Record, OfferError> {
        let wanted = key.trim();
        debug!("Looking up unit '{}'", wanted);
        self.records
            .iter()
            .find(|r| {
                r.get(columns::UNIT_NUMBER)
                    .map(|v| v.trim() == wanted)
                    .unwrap_or(false)
            })
            .ok_or_else(|| OfferError::RecordNotFound(wanted.to_string()))
    }
}

/// Decode dataset bytes, trying a fixed ordered list of encodings
///
/// UTF-8 first; Latin-1 as the fallback, where every byte maps directly
/// to the code point of the same value.
fn decode_bytes(bytes: &[u8]) -> String {
    match std::str::from_utf8(bytes) {
        Ok(s) => s.to_string(),
        Err(_) => {
            debug!("Dataset is not UTF-8, decoding as Latin-1");
            bytes.iter().map(|&b| b as char).collect()
        }
    }
}
