// src/storage/topics.rs

//! Topic table loading and conversion.
//!
//! The table is maintained as a semicolon-delimited text file
//! (`name;ukr_name;topic_id` per line) and converted to the JSON form the
//! pipeline loads. The pipeline itself never mutates the table.

use std::collections::HashMap;
use std::path::Path;

use tokio::io::AsyncWriteExt;

use crate::error::{AppError, Result};
use crate::models::{TopicEntry, TopicTable};
use crate::utils::underscored;

/// Normalize a table key to the form lookups use.
///
/// Listings carry their sub-locality with underscores instead of spaces
/// (hashtag form), so keys are stored the same way.
fn normalize_key(name: &str) -> String {
    underscored(&name.trim().to_lowercase())
}

/// Load the topic table from its JSON file.
///
/// Keys are re-normalized on load so a hand-edited file with spaced or
/// mixed-case keys still matches. A missing or empty table aborts the
/// run: with topic routing enabled there is nowhere to deliver to.
pub async fn load(path: &Path) -> Result<TopicTable> {
    let bytes = tokio::fs::read(path).await.map_err(|e| {
        AppError::topics(format!("cannot read {}: {e}", path.display()))
    })?;
    let table: TopicTable = serde_json::from_slice(&bytes)?;
    let table = TopicTable {
        entries: table
            .entries
            .into_iter()
            .map(|(key, entry)| (normalize_key(&key), entry))
            .collect(),
    };

    if table.is_empty() {
        return Err(AppError::topics(format!("{} has no entries", path.display())));
    }

    log::info!("Loaded {} topic entries from {}", table.len(), path.display());
    Ok(table)
}

/// Parse the semicolon-delimited maintenance table.
///
/// Keys are lower-cased and underscored; blank lines are skipped; a
/// malformed line is an error rather than a silent drop, since the table
/// is hand-maintained.
pub fn from_csv(text: &str) -> Result<TopicTable> {
    let mut entries = HashMap::new();

    for (lineno, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let mut parts = line.split(';');
        let (name, ukr_name, topic) = match (parts.next(), parts.next(), parts.next()) {
            (Some(name), Some(ukr_name), Some(topic)) => (name, ukr_name, topic),
            _ => {
                return Err(AppError::topics(format!(
                    "line {}: expected name;ukr_name;topic_id",
                    lineno + 1
                )))
            }
        };

        let topic = topic.trim().parse::<i64>().map_err(|e| {
            AppError::topics(format!("line {}: topic_id is not an integer: {e}", lineno + 1))
        })?;

        entries.insert(
            normalize_key(name),
            TopicEntry {
                ukr_name: ukr_name.trim().to_string(),
                topic,
            },
        );
    }

    Ok(TopicTable { entries })
}

/// Write the table as pretty JSON (write to temp, then rename).
pub async fn write(path: &Path, table: &TopicTable) -> Result<()> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }

    let bytes = serde_json::to_vec_pretty(table)?;

    let tmp = path.with_extension("tmp");
    let mut file = tokio::fs::File::create(&tmp).await?;
    file.write_all(&bytes).await?;
    file.flush().await?;
    drop(file);

    tokio::fs::rename(&tmp, path).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const SAMPLE: &str = "\
Аркадия;Аркадія;12
Великий Фонтан;Великий Фонтан;13
Продаж;Продаж;2
";

    #[test]
    fn parses_and_lowercases_keys() {
        let table = from_csv(SAMPLE).unwrap();
        assert_eq!(table.len(), 3);

        let entry = table.get("аркадия").unwrap();
        assert_eq!(entry.ukr_name, "Аркадія");
        assert_eq!(entry.topic, 12);
        assert!(table.get("Аркадия").is_none());
    }

    #[test]
    fn multi_word_names_get_underscored_keys() {
        let table = from_csv(SAMPLE).unwrap();

        let entry = table.get("великий_фонтан").unwrap();
        assert_eq!(entry.topic, 13);
        // The spaced form is never a key
        assert!(table.get("великий фонтан").is_none());
    }

    #[tokio::test]
    async fn load_normalizes_hand_edited_keys() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("topics.json");
        std::fs::write(
            &path,
            r#"{"Великий Фонтан": {"ukr_name": "Великий Фонтан", "topic": 13}}"#,
        )
        .unwrap();

        let table = load(&path).await.unwrap();
        assert_eq!(table.get("великий_фонтан").unwrap().topic, 13);
    }

    #[test]
    fn rejects_malformed_line() {
        assert!(from_csv("только-имя\n").is_err());
        assert!(from_csv("имя;назва;не-число\n").is_err());
    }

    #[tokio::test]
    async fn csv_to_json_round_trips() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("topics.json");

        let table = from_csv(SAMPLE).unwrap();
        write(&path, &table).await.unwrap();

        let reloaded = load(&path).await.unwrap();
        assert_eq!(reloaded, table);
    }

    #[tokio::test]
    async fn missing_table_is_fatal() {
        let tmp = TempDir::new().unwrap();
        assert!(load(&tmp.path().join("nope.json")).await.is_err());
    }

    #[tokio::test]
    async fn empty_table_is_fatal() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("topics.json");
        std::fs::write(&path, b"{}").unwrap();

        assert!(load(&path).await.is_err());
    }
}
