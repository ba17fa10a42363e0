//! Listing data structure and per-record parse errors.

use thiserror::Error;

/// Translated display label for sale listings.
///
/// Routing rule 4 (price band) and the contact policy both key off this.
pub const SALE_LABEL: &str = "Продаж";

/// One parsed feed record, normalized for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Listing {
    /// Feed-assigned identifier, the monotonic watermark for the diff.
    pub internal_id: i64,

    /// Full URL of the listing on the source site.
    pub url: String,

    /// Property kind, translated display label (Квартири, Будинки, ...).
    pub category: String,

    /// Raw lower-cased category as it appeared in the feed.
    ///
    /// The caption inclusion policy compares against the untranslated
    /// names (дом, участок, коммерция), so the raw key is kept alongside
    /// the display label.
    pub category_key: String,

    /// Transaction kind, translated display label (Продаж, Оренда).
    pub offer_type: String,

    /// District display name.
    pub district: String,

    /// Sub-locality name with whitespace replaced by underscores.
    pub sub_locality_name: String,

    /// Street part of the address (first comma segment), underscored.
    pub address: String,

    /// Price as the feed supplied it, numeric-as-string.
    pub price: String,

    /// Remote photo URL, absent for some records.
    pub image: Option<String>,

    /// Room count, digits only, "0" when the feed omits it.
    pub rooms: String,

    /// Living area, digits only, "0" when the feed omits it.
    pub area: String,

    /// Lot area, digits only, "0" when the feed omits it.
    pub lot_area: String,

    /// Contact display name (agent for sales, fixed literal for rentals).
    pub name: String,

    /// Contact phone (fixed per transaction type).
    pub phone: String,
}

impl Listing {
    /// Whether this listing is a sale (as opposed to a rental).
    pub fn is_sale(&self) -> bool {
        self.offer_type == SALE_LABEL
    }
}

/// Why a single feed record was dropped.
///
/// Record-level failures never abort the batch; the parser returns them
/// alongside the successful listings so the drop policy is visible in the
/// return value rather than hidden in log output.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RecordError {
    /// The internal-id attribute is missing or not a positive integer.
    #[error("invalid internal-id {raw:?}")]
    InvalidId { raw: String },

    /// A required child element is missing or empty.
    #[error("offer {id}: missing required field `{field}`")]
    MissingField { id: i64, field: &'static str },

    /// The agent name cannot be split into the expected tokens.
    #[error("offer {id}: agent name {raw:?} has fewer than three tokens")]
    AgentName { id: i64, raw: String },
}

/// Per-record parse outcome: a listing, or the reason it was dropped.
pub type RecordOutcome = std::result::Result<Listing, RecordError>;
