// src/pipeline/publish.rs

//! Paced sequential delivery.
//!
//! Sends every (listing, destination) pair in rule-evaluation order with a
//! fixed delay after each send. The delay is an outbound throttle against
//! the messaging platform's rate limits, not a correctness requirement.
//! Per-send failures are logged and counted, never raised: the publish
//! phase succeeds once every send has been attempted.

use std::time::Duration;

use crate::error::Result;
use crate::pipeline::route::Destination;
use crate::services::PhotoSender;

/// One fully prepared message with its matched destinations.
#[derive(Debug, Clone)]
pub struct Outbound {
    pub internal_id: i64,
    pub image: Option<String>,
    pub caption: String,
    pub destinations: Vec<Destination>,
}

/// Counters for the publish phase.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct PublishStats {
    /// Sends attempted (including failed ones)
    pub attempted: usize,
    /// Sends that returned an error
    pub failed: usize,
    /// Destinations skipped because the listing had no image
    pub skipped_no_image: usize,
}

/// Sequential sender for one batch.
pub struct Publisher<'a> {
    sender: &'a dyn PhotoSender,
    pace: Duration,
}

impl<'a> Publisher<'a> {
    pub fn new(sender: &'a dyn PhotoSender, pace: Duration) -> Self {
        Self { sender, pace }
    }

    /// Deliver the whole batch.
    ///
    /// Session setup (`prepare`) failure is fatal; everything after it is
    /// per-destination recoverable. Returns the attempt counters once all
    /// sends have been tried.
    pub async fn publish(&self, batch: &[Outbound]) -> Result<PublishStats> {
        self.sender.prepare().await?;

        let mut stats = PublishStats::default();

        for outbound in batch {
            log::info!("to show: {}", outbound.internal_id);

            let Some(image) = outbound.image.as_deref() else {
                log::warn!(
                    "offer {}: no image, skipping {} destination(s)",
                    outbound.internal_id,
                    outbound.destinations.len()
                );
                stats.skipped_no_image += outbound.destinations.len();
                continue;
            };

            for destination in &outbound.destinations {
                stats.attempted += 1;
                if let Err(e) = self
                    .sender
                    .send_photo(destination.topic_id, image, &outbound.caption)
                    .await
                {
                    stats.failed += 1;
                    log::error!(
                        "offer {} -> topic {:?}: {e}",
                        outbound.internal_id,
                        destination.topic_id
                    );
                }

                tokio::time::sleep(self.pace).await;
            }
        }

        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Records calls; fails sends to the configured topic id.
    #[derive(Default)]
    struct MockSender {
        prepared: Mutex<bool>,
        sent: Mutex<Vec<(Option<i64>, String)>>,
        fail_topic: Option<i64>,
    }

    #[async_trait]
    impl PhotoSender for MockSender {
        async fn prepare(&self) -> Result<()> {
            *self.prepared.lock().unwrap() = true;
            Ok(())
        }

        async fn send_photo(
            &self,
            topic_id: Option<i64>,
            photo_url: &str,
            _caption: &str,
        ) -> Result<()> {
            if self.fail_topic.is_some() && topic_id == self.fail_topic {
                return Err(AppError::Telegram("rate limited".to_string()));
            }
            self.sent
                .lock()
                .unwrap()
                .push((topic_id, photo_url.to_string()));
            Ok(())
        }
    }

    fn outbound(id: i64, image: Option<&str>, topics: &[Option<i64>]) -> Outbound {
        Outbound {
            internal_id: id,
            image: image.map(str::to_string),
            caption: format!("caption {id}"),
            destinations: topics
                .iter()
                .map(|&topic_id| Destination { topic_id })
                .collect(),
        }
    }

    #[tokio::test]
    async fn sends_every_pair_in_order() {
        let sender = MockSender::default();
        let publisher = Publisher::new(&sender, Duration::ZERO);

        let batch = vec![
            outbound(1, Some("https://img/1"), &[Some(11), Some(22)]),
            outbound(2, Some("https://img/2"), &[None]),
        ];
        let stats = publisher.publish(&batch).await.unwrap();

        assert!(*sender.prepared.lock().unwrap());
        assert_eq!(stats.attempted, 3);
        assert_eq!(stats.failed, 0);

        let sent = sender.sent.lock().unwrap();
        let topics: Vec<Option<i64>> = sent.iter().map(|(t, _)| *t).collect();
        assert_eq!(topics, vec![Some(11), Some(22), None]);
    }

    #[tokio::test]
    async fn per_send_failure_does_not_abort_the_batch() {
        let sender = MockSender {
            fail_topic: Some(22),
            ..MockSender::default()
        };
        let publisher = Publisher::new(&sender, Duration::ZERO);

        let batch = vec![outbound(1, Some("https://img/1"), &[Some(11), Some(22), Some(33)])];
        let stats = publisher.publish(&batch).await.unwrap();

        assert_eq!(stats.attempted, 3);
        assert_eq!(stats.failed, 1);
        assert_eq!(sender.sent.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn missing_image_skips_listing_but_continues() {
        let sender = MockSender::default();
        let publisher = Publisher::new(&sender, Duration::ZERO);

        let batch = vec![
            outbound(1, None, &[Some(11), Some(22)]),
            outbound(2, Some("https://img/2"), &[Some(33)]),
        ];
        let stats = publisher.publish(&batch).await.unwrap();

        assert_eq!(stats.skipped_no_image, 2);
        assert_eq!(stats.attempted, 1);
        assert_eq!(sender.sent.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn empty_batch_still_succeeds() {
        let sender = MockSender::default();
        let publisher = Publisher::new(&sender, Duration::ZERO);

        let stats = publisher.publish(&[]).await.unwrap();
        assert_eq!(stats, PublishStats::default());
    }
}
