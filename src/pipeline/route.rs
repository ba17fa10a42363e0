// src/pipeline/route.rs

//! Destination routing.
//!
//! The run is parameterized by one routing strategy instead of parallel
//! pipeline variants: either a plain broadcast to the target chat, or
//! table-driven fan-out to forum topics.

use crate::models::{Listing, TopicTable};
use crate::utils::underscored;

/// Sale price band routed to the fixed configured topic, inclusive.
const PRICE_BAND_MIN: i64 = 3000;
const PRICE_BAND_MAX: i64 = 25000;

/// One delivery target inside the configured chat.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Destination {
    /// Forum topic id; `None` posts to the chat's general timeline.
    pub topic_id: Option<i64>,
}

/// Routing strategy for a run.
pub enum Routing {
    /// Every listing goes once to the chat itself.
    Broadcast,
    /// Table-driven fan-out; a listing can match several topics.
    Topics {
        table: TopicTable,
        price_band_topic: i64,
    },
}

impl Routing {
    /// Evaluate the destinations for one listing.
    ///
    /// Takes the listing mutably because a sub-locality match substitutes
    /// the table's Ukrainian display name before the caption is rendered.
    pub fn route(&self, listing: &mut Listing) -> Vec<Destination> {
        match self {
            Routing::Broadcast => vec![Destination { topic_id: None }],
            Routing::Topics {
                table,
                price_band_topic,
            } => route_topics(listing, table, *price_band_topic),
        }
    }
}

/// Up to four independent rules; every match that fires is delivered.
fn route_topics(
    listing: &mut Listing,
    table: &TopicTable,
    price_band_topic: i64,
) -> Vec<Destination> {
    let mut destinations = Vec::new();

    // Rule 1: sub-locality, with display-name substitution on match.
    // The listing carries the hashtag (underscored) form and table keys
    // are stored the same way; the substituted name is underscored too so
    // the caption hashtag stays one token.
    match table.get(&listing.sub_locality_name.to_lowercase()) {
        Some(entry) => {
            listing.sub_locality_name = underscored(&entry.ukr_name);
            destinations.push(Destination {
                topic_id: Some(entry.topic),
            });
        }
        None => log::warn!(
            "offer {}: no topic for sub-locality {:?}",
            listing.internal_id,
            listing.sub_locality_name
        ),
    }

    // Rule 2: category
    match table.get(&listing.category.to_lowercase()) {
        Some(entry) => destinations.push(Destination {
            topic_id: Some(entry.topic),
        }),
        None => log::warn!(
            "offer {}: no topic for category {:?}",
            listing.internal_id,
            listing.category
        ),
    }

    // Rule 3: type
    match table.get(&listing.offer_type.to_lowercase()) {
        Some(entry) => destinations.push(Destination {
            topic_id: Some(entry.topic),
        }),
        None => log::warn!(
            "offer {}: no topic for type {:?}",
            listing.internal_id,
            listing.offer_type
        ),
    }

    // Rule 4: sale price band, routed regardless of table contents
    if listing.is_sale() {
        match listing.price.parse::<i64>() {
            Ok(price) if (PRICE_BAND_MIN..=PRICE_BAND_MAX).contains(&price) => {
                destinations.push(Destination {
                    topic_id: Some(price_band_topic),
                });
            }
            Ok(_) => {}
            Err(e) => log::error!(
                "offer {}: price {:?} is not numeric: {e}",
                listing.internal_id,
                listing.price
            ),
        }
    }

    destinations
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{TopicEntry, SALE_LABEL};
    use std::collections::HashMap;

    fn table() -> TopicTable {
        let mut entries = HashMap::new();
        entries.insert(
            "аркадія".to_string(),
            TopicEntry {
                ukr_name: "Аркадія".to_string(),
                topic: 11,
            },
        );
        entries.insert(
            "квартири".to_string(),
            TopicEntry {
                ukr_name: "Квартири".to_string(),
                topic: 22,
            },
        );
        entries.insert(
            "продаж".to_string(),
            TopicEntry {
                ukr_name: "Продаж".to_string(),
                topic: 33,
            },
        );
        TopicTable { entries }
    }

    fn routing() -> Routing {
        Routing::Topics {
            table: table(),
            price_band_topic: 99,
        }
    }

    fn listing(price: &str, offer_type: &str) -> Listing {
        Listing {
            internal_id: 100,
            url: "https://example.com/offers/100".to_string(),
            category: "Квартири".to_string(),
            category_key: "квартира".to_string(),
            offer_type: offer_type.to_string(),
            district: "Київський".to_string(),
            sub_locality_name: "Аркадія".to_string(),
            address: "Болгарская".to_string(),
            price: price.to_string(),
            image: None,
            rooms: "2".to_string(),
            area: "54".to_string(),
            lot_area: "0".to_string(),
            name: "Юлия Курова".to_string(),
            phone: "+380000000001".to_string(),
        }
    }

    fn topic_ids(destinations: &[Destination]) -> Vec<Option<i64>> {
        destinations.iter().map(|d| d.topic_id).collect()
    }

    #[test]
    fn broadcast_routes_once_without_topic() {
        let mut listing = listing("15000", SALE_LABEL);
        let destinations = Routing::Broadcast.route(&mut listing);
        assert_eq!(topic_ids(&destinations), vec![None]);
    }

    #[test]
    fn all_four_rules_fire_in_order() {
        let mut listing = listing("15000", SALE_LABEL);
        let destinations = routing().route(&mut listing);
        assert_eq!(
            topic_ids(&destinations),
            vec![Some(11), Some(22), Some(33), Some(99)]
        );
    }

    #[test]
    fn multi_word_sub_locality_matches_and_stays_hashtag_safe() {
        let mut entries = table().entries;
        entries.insert(
            "великий_фонтан".to_string(),
            TopicEntry {
                ukr_name: "Великий Фонтан".to_string(),
                topic: 13,
            },
        );
        let routing = Routing::Topics {
            table: TopicTable { entries },
            price_band_topic: 99,
        };

        // The parser stores the underscored form
        let mut listing = listing("15000", SALE_LABEL);
        listing.sub_locality_name = "Великий_Фонтан".to_string();

        let destinations = routing.route(&mut listing);
        assert!(destinations.contains(&Destination { topic_id: Some(13) }));
        assert_eq!(listing.sub_locality_name, "Великий_Фонтан");
    }

    #[test]
    fn sub_locality_match_substitutes_display_name() {
        let mut listing = listing("15000", SALE_LABEL);
        listing.sub_locality_name = "аркадія".to_string();
        routing().route(&mut listing);
        assert_eq!(listing.sub_locality_name, "Аркадія");
    }

    #[test]
    fn missing_table_entries_skip_those_rules() {
        let mut listing = listing("15000", SALE_LABEL);
        listing.sub_locality_name = "Таїрова".to_string();
        listing.category = "Будинки".to_string();

        let destinations = routing().route(&mut listing);
        assert_eq!(topic_ids(&destinations), vec![Some(33), Some(99)]);
        // No substitution without a sub-locality match
        assert_eq!(listing.sub_locality_name, "Таїрова");
    }

    #[test]
    fn price_band_bounds_are_inclusive() {
        for (price, expect) in [
            ("2999", false),
            ("3000", true),
            ("15000", true),
            ("25000", true),
            ("25001", false),
            ("30000", false),
        ] {
            let mut listing = listing(price, SALE_LABEL);
            let destinations = routing().route(&mut listing);
            assert_eq!(
                destinations.contains(&Destination { topic_id: Some(99) }),
                expect,
                "price {price}"
            );
        }
    }

    #[test]
    fn price_band_excludes_rentals() {
        let mut listing = listing("15000", "Оренда");
        let destinations = routing().route(&mut listing);
        assert!(!destinations.contains(&Destination { topic_id: Some(99) }));
    }

    #[test]
    fn unparseable_price_skips_only_rule_four() {
        let mut listing = listing("договірна", SALE_LABEL);
        let destinations = routing().route(&mut listing);
        assert_eq!(topic_ids(&destinations), vec![Some(11), Some(22), Some(33)]);
    }
}
