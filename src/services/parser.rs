// src/services/parser.rs

//! Feed record parser.
//!
//! Walks the XML document once and extracts every `<offer>` element into a
//! normalized [`Listing`]. Each record is converted independently: a
//! malformed record yields a [`RecordError`] in the returned sequence and
//! never aborts the batch. Only document-level XML malformation is fatal.

use std::collections::HashMap;

use quick_xml::events::Event;
use quick_xml::Reader;

use crate::error::Result;
use crate::models::{ContactsConfig, Listing, RecordError, RecordOutcome};
use crate::utils::{capitalize_first, strip_non_digits, underscored};

/// Display translations for feed category/type values.
const TRANSLATIONS: [(&str, &str); 6] = [
    ("продажа", "Продаж"),
    ("аренда", "Оренда"),
    ("квартира", "Квартири"),
    ("дом", "Будинки"),
    ("коммерция", "Комерція"),
    ("участок", "Ділянки"),
];

/// Parse the feed document into per-record outcomes.
///
/// The order of the result matches document order. Callers partition it
/// into listings and dropped records; the drop reasons are part of the
/// return value, not a logging side effect.
pub fn parse_feed(xml: &str, contacts: &ContactsConfig) -> Result<Vec<RecordOutcome>> {
    let offers = read_offers(xml)?;
    Ok(offers
        .into_iter()
        .map(|offer| build_listing(offer, contacts))
        .collect())
}

/// Raw extraction of one `<offer>` element before field validation.
struct RawOffer {
    /// `internal-id` attribute text, possibly empty
    internal_id: String,
    /// Child element text keyed by element name, first occurrence wins
    fields: HashMap<String, String>,
}

/// Collect all offers with their descendant element texts.
///
/// Elements are matched at any depth inside the offer (the feed nests
/// `sub-locality-name` under `<location>` and `value` under `<price>`),
/// mirroring the recursive lookup the original consumer relied on.
fn read_offers(xml: &str) -> Result<Vec<RawOffer>> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);

    let mut offers = Vec::new();
    let mut current: Option<RawOffer> = None;
    // Names of open elements below the current <offer>
    let mut path: Vec<String> = Vec::new();

    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
                match current {
                    None if name == "offer" => {
                        let mut internal_id = String::new();
                        for attr in e.attributes() {
                            let attr = attr.map_err(quick_xml::Error::from)?;
                            if attr.key.as_ref() == b"internal-id" {
                                internal_id = attr.unescape_value()?.into_owned();
                            }
                        }
                        current = Some(RawOffer {
                            internal_id,
                            fields: HashMap::new(),
                        });
                    }
                    None => {}
                    Some(_) => path.push(name),
                }
            }
            Event::Text(t) => {
                if let Some(offer) = current.as_mut() {
                    if let Some(name) = path.last() {
                        let text = t.unescape()?.trim().to_string();
                        if !text.is_empty() {
                            offer.fields.entry(name.clone()).or_insert(text);
                        }
                    }
                }
            }
            Event::CData(t) => {
                if let Some(offer) = current.as_mut() {
                    if let Some(name) = path.last() {
                        let text = String::from_utf8_lossy(&t.into_inner())
                            .trim()
                            .to_string();
                        if !text.is_empty() {
                            offer.fields.entry(name.clone()).or_insert(text);
                        }
                    }
                }
            }
            Event::End(e) => {
                if current.is_some() {
                    if path.is_empty() && e.name().as_ref() == b"offer" {
                        if let Some(offer) = current.take() {
                            offers.push(offer);
                        }
                    } else {
                        path.pop();
                    }
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(offers)
}

/// Translate a lower-cased category/type value for display.
fn translate(raw_lower: &str) -> String {
    TRANSLATIONS
        .iter()
        .find(|(from, _)| *from == raw_lower)
        .map(|(_, to)| (*to).to_string())
        .unwrap_or_else(|| capitalize_first(raw_lower))
}

/// Validate and normalize one raw offer into a listing.
fn build_listing(raw: RawOffer, contacts: &ContactsConfig) -> RecordOutcome {
    let internal_id = raw
        .internal_id
        .parse::<i64>()
        .ok()
        .filter(|id| *id > 0)
        .ok_or(RecordError::InvalidId {
            raw: raw.internal_id.clone(),
        })?;

    let required = |field: &'static str| -> std::result::Result<&str, RecordError> {
        raw.fields
            .get(field)
            .map(String::as_str)
            .ok_or(RecordError::MissingField {
                id: internal_id,
                field,
            })
    };
    let numeric = |field: &str| -> String {
        raw.fields
            .get(field)
            .map(|value| strip_non_digits(value))
            .unwrap_or_else(|| "0".to_string())
    };

    let url = required("url")?.to_string();

    let category_key = required("category")?.to_lowercase();
    let category = translate(&category_key);
    let offer_type = translate(&required("type")?.to_lowercase());

    let district = required("district")?.to_string();
    let sub_locality_name = underscored(required("sub-locality-name")?);

    // "Болгарская, 37" keeps only the street for the hashtag
    let address_full = required("address")?;
    let address = underscored(address_full.split(", ").next().unwrap_or(address_full));

    let price = required("value")?.to_string();
    let image = raw.fields.get("image").cloned();

    let listing = Listing {
        internal_id,
        url,
        category,
        category_key,
        offer_type,
        district,
        sub_locality_name,
        address,
        price,
        image,
        rooms: numeric("rooms"),
        area: numeric("area"),
        lot_area: numeric("lot-area"),
        name: String::new(),
        phone: String::new(),
    };

    apply_contact_policy(listing, raw.fields.get("name").map(String::as_str), contacts)
}

/// Contact substitution policy.
///
/// Sale listings show the parsed agent name (first + third whitespace
/// token) with the fixed office sale phone. Rental listings show the
/// fixed rental name and phone; feed-provided contact data is ignored
/// for them. Carried over verbatim from the original deployment.
fn apply_contact_policy(
    mut listing: Listing,
    raw_name: Option<&str>,
    contacts: &ContactsConfig,
) -> RecordOutcome {
    if listing.is_sale() {
        let raw_name = raw_name.ok_or(RecordError::MissingField {
            id: listing.internal_id,
            field: "name",
        })?;
        let tokens: Vec<&str> = raw_name.split_whitespace().collect();
        if tokens.len() < 3 {
            return Err(RecordError::AgentName {
                id: listing.internal_id,
                raw: raw_name.to_string(),
            });
        }
        // "Юлия Александровна Курова" -> "Юлия Курова"
        listing.name = format!("{} {}", tokens[0], tokens[2]);
        listing.phone = contacts.sale_phone.clone();
    } else {
        listing.name = contacts.rent_name.clone();
        listing.phone = contacts.rent_phone.clone();
    }
    Ok(listing)
}
