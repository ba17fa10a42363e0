//! Application configuration structures.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// Root application configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Feed endpoint and snapshot settings
    #[serde(default)]
    pub feed: FeedConfig,

    /// Checkpoint file settings
    #[serde(default)]
    pub checkpoint: CheckpointConfig,

    /// Delivery and routing settings
    #[serde(default)]
    pub publisher: PublisherConfig,

    /// Contact substitution policy
    #[serde(default)]
    pub contacts: ContactsConfig,

    /// Fixed links appended to every caption
    #[serde(default)]
    pub caption: CaptionConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration or return default if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(&path).unwrap_or_else(|e| {
            log::warn!(
                "Config load failed from {:?}: {}. Using defaults.",
                path.as_ref(),
                e
            );
            Self::default()
        })
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        url::Url::parse(&self.feed.url)
            .map_err(|e| AppError::validation(format!("feed.url is not a valid URL: {e}")))?;
        if self.feed.timeout_secs == 0 {
            return Err(AppError::validation("feed.timeout_secs must be > 0"));
        }
        if self.feed.snapshot_file.trim().is_empty() {
            return Err(AppError::validation("feed.snapshot_file is empty"));
        }
        if self.checkpoint.file.trim().is_empty() {
            return Err(AppError::validation("checkpoint.file is empty"));
        }
        if self.publisher.pace_ms == 0 {
            return Err(AppError::validation("publisher.pace_ms must be > 0"));
        }
        if self.publisher.timeout_secs == 0 {
            return Err(AppError::validation("publisher.timeout_secs must be > 0"));
        }
        if self.publisher.routing == RoutingMode::Topics {
            if self.publisher.topics_file.trim().is_empty() {
                return Err(AppError::validation("publisher.topics_file is empty"));
            }
            if self.publisher.price_band_topic.is_none() {
                return Err(AppError::validation(
                    "publisher.price_band_topic is required when routing = \"topics\"",
                ));
            }
        }
        if self.contacts.sale_phone.trim().is_empty()
            || self.contacts.rent_phone.trim().is_empty()
            || self.contacts.rent_name.trim().is_empty()
        {
            return Err(AppError::validation(
                "contacts.sale_phone, contacts.rent_phone and contacts.rent_name are required",
            ));
        }
        Ok(())
    }
}

/// Feed endpoint and snapshot settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedConfig {
    /// Feed URL, fetched once per run
    #[serde(default = "defaults::feed_url")]
    pub url: String,

    /// File name (under the storage dir) for the raw feed snapshot
    #[serde(default = "defaults::snapshot_file")]
    pub snapshot_file: String,

    /// Request timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,

    /// User-Agent header for HTTP requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            url: defaults::feed_url(),
            snapshot_file: defaults::snapshot_file(),
            timeout_secs: defaults::timeout(),
            user_agent: defaults::user_agent(),
        }
    }
}

/// Checkpoint file settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckpointConfig {
    /// File name (under the storage dir) holding the last published id
    #[serde(default = "defaults::checkpoint_file")]
    pub file: String,
}

impl Default for CheckpointConfig {
    fn default() -> Self {
        Self {
            file: defaults::checkpoint_file(),
        }
    }
}

/// How routed destinations are selected for each listing.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum RoutingMode {
    /// Every listing goes once to the target chat, no forum topic.
    #[default]
    Broadcast,
    /// Table-driven fan-out to forum topics.
    Topics,
}

/// Delivery and routing settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublisherConfig {
    /// Routing strategy for this deployment
    #[serde(default)]
    pub routing: RoutingMode,

    /// Delay after each send, in milliseconds (outbound rate throttle)
    #[serde(default = "defaults::pace_ms")]
    pub pace_ms: u64,

    /// Bot API request timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,

    /// File name (under the storage dir) of the topic lookup table
    #[serde(default = "defaults::topics_file")]
    pub topics_file: String,

    /// Fixed forum topic for the sale price band (3000..=25000)
    #[serde(default)]
    pub price_band_topic: Option<i64>,
}

impl Default for PublisherConfig {
    fn default() -> Self {
        Self {
            routing: RoutingMode::default(),
            pace_ms: defaults::pace_ms(),
            timeout_secs: defaults::timeout(),
            topics_file: defaults::topics_file(),
            price_band_topic: None,
        }
    }
}

/// Contact substitution policy.
///
/// Rental listings never show feed-provided contact data; sales show the
/// parsed agent name with a fixed office phone. Deliberate policy carried
/// over from the original deployment.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ContactsConfig {
    /// Phone shown on sale listings
    #[serde(default)]
    pub sale_phone: String,

    /// Phone shown on rental listings
    #[serde(default)]
    pub rent_phone: String,

    /// Contact name shown on rental listings
    #[serde(default)]
    pub rent_name: String,
}

/// Fixed links appended to every caption.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaptionConfig {
    /// Public channel link
    #[serde(default = "defaults::channel_url")]
    pub channel_url: String,

    /// Invite link shown on the last caption line
    #[serde(default = "defaults::invite_url")]
    pub invite_url: String,
}

impl Default for CaptionConfig {
    fn default() -> Self {
        Self {
            channel_url: defaults::channel_url(),
            invite_url: defaults::invite_url(),
        }
    }
}

mod defaults {
    pub fn feed_url() -> String {
        "http://x.faktor24.com/objects_1.xml".into()
    }
    pub fn snapshot_file() -> String {
        "data.xml".into()
    }
    pub fn timeout() -> u64 {
        30
    }
    pub fn user_agent() -> String {
        "Mozilla/5.0 (compatible; offercast/1.0)".into()
    }
    pub fn checkpoint_file() -> String {
        "checkpoint.json".into()
    }
    pub fn pace_ms() -> u64 {
        1500
    }
    pub fn topics_file() -> String {
        "topics.json".into()
    }
    pub fn channel_url() -> String {
        "https://t.me/faktor24com".into()
    }
    pub fn invite_url() -> String {
        "https://t.me/+arwgBDQGfg9mMTMy".into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled() -> Config {
        let mut config = Config::default();
        config.contacts.sale_phone = "+380000000001".into();
        config.contacts.rent_phone = "+380000000002".into();
        config.contacts.rent_name = "Faktor24".into();
        config
    }

    #[test]
    fn validate_filled_config_ok() {
        assert!(filled().validate().is_ok());
    }

    #[test]
    fn validate_rejects_missing_contacts() {
        assert!(Config::default().validate().is_err());
    }

    #[test]
    fn validate_rejects_bad_feed_url() {
        let mut config = filled();
        config.feed.url = "not a url".into();
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_zero_pace() {
        let mut config = filled();
        config.publisher.pace_ms = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_zero_publisher_timeout() {
        let mut config = filled();
        config.publisher.timeout_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn topics_mode_requires_price_band_topic() {
        let mut config = filled();
        config.publisher.routing = RoutingMode::Topics;
        assert!(config.validate().is_err());

        config.publisher.price_band_topic = Some(7);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn routing_mode_parses_from_toml() {
        let config: Config =
            toml::from_str("[publisher]\nrouting = \"topics\"\nprice_band_topic = 3\n").unwrap();
        assert_eq!(config.publisher.routing, RoutingMode::Topics);
        assert_eq!(config.publisher.price_band_topic, Some(3));
    }
}
