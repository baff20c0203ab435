use std::sync::Arc;

use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use tokio::sync::Semaphore;
use tracing::{info, warn};

use crate::notion::model::SearchHit;
use crate::notion::NotionClient;
use crate::parser::statblock::StatBlock;

/// One search hit after retrieval. Exactly one of `stat_block` / `error` is set.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BestiaryEntry {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stat_block: Option<StatBlock>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Upper bound on retrievals in flight; Notion rate-limits well below this.
pub const MAX_CONCURRENCY: usize = 64;

pub fn clamp_concurrency(n: usize) -> usize {
    n.clamp(1, MAX_CONCURRENCY)
}

pub struct BestiaryStats {
    pub total: usize,
    pub ok: usize,
    pub errors: usize,
}

/// Retrieve every hit with at most `concurrency` retrievals in flight.
/// Entries come back in search order; failures are kept per entry.
pub async fn fetch_all(
    client: &NotionClient,
    hits: Vec<SearchHit>,
    concurrency: usize,
) -> Result<(Vec<BestiaryEntry>, BestiaryStats)> {
    let total = hits.len();
    let concurrency = clamp_concurrency(concurrency);
    let semaphore = Arc::new(Semaphore::new(concurrency));

    let pb = ProgressBar::new(total as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40} {pos}/{len} {msg}")?
            .progress_chars("=> "),
    );

    let (tx, mut rx) = tokio::sync::mpsc::channel::<(usize, BestiaryEntry)>(concurrency * 2);
    // kept to report hits whose task never sent a result
    let labels: Vec<(String, String)> =
        hits.iter().map(|h| (h.id.clone(), h.name.clone())).collect();

    for (idx, hit) in hits.into_iter().enumerate() {
        let client = client.clone();
        let sem = Arc::clone(&semaphore);
        let tx = tx.clone();

        tokio::spawn(async move {
            let entry = match sem.acquire().await {
                Ok(_permit) => match client.fetch_stat_block(&hit.id).await {
                    Ok(stat_block) => BestiaryEntry {
                        id: hit.id,
                        name: hit.name,
                        stat_block: Some(stat_block),
                        error: None,
                    },
                    Err(e) => {
                        warn!("Failed to fetch {} ({}): {}", hit.name, hit.id, e);
                        BestiaryEntry {
                            id: hit.id,
                            name: hit.name,
                            stat_block: None,
                            error: Some(e.to_string()),
                        }
                    }
                },
                Err(e) => BestiaryEntry {
                    id: hit.id,
                    name: hit.name,
                    stat_block: None,
                    error: Some(e.to_string()),
                },
            };
            let _ = tx.send((idx, entry)).await;
        });
    }

    // rx closes once every task has dropped its sender
    drop(tx);

    let mut slots: Vec<Option<BestiaryEntry>> = (0..total).map(|_| None).collect();
    while let Some((idx, entry)) = rx.recv().await {
        pb.set_message(entry.name.clone());
        slots[idx] = Some(entry);
        pb.inc(1);
    }
    pb.finish_and_clear();

    let entries = fill_missing(slots, labels);
    let errors = entries.iter().filter(|e| e.error.is_some()).count();
    let stats = BestiaryStats { total, ok: total - errors, errors };
    info!("Fetched {} monsters ({} ok, {} errors)", total, stats.ok, stats.errors);
    Ok((entries, stats))
}

/// One entry per hit: a slot left empty (its task panicked) becomes an error.
fn fill_missing(
    slots: Vec<Option<BestiaryEntry>>,
    labels: Vec<(String, String)>,
) -> Vec<BestiaryEntry> {
    slots
        .into_iter()
        .zip(labels)
        .map(|(slot, (id, name))| {
            slot.unwrap_or_else(|| {
                warn!("No result for {} ({})", name, id);
                BestiaryEntry {
                    id,
                    name,
                    stat_block: None,
                    error: Some("retrieval task did not finish".to_string()),
                }
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notion::DEFAULT_VERSION;

    fn hit(id: &str, name: &str) -> SearchHit {
        SearchHit { id: id.to_string(), name: name.to_string() }
    }

    #[tokio::test]
    async fn empty_search() {
        let client = NotionClient::new("k", "http://127.0.0.1:9", DEFAULT_VERSION).unwrap();
        let (entries, stats) = fetch_all(&client, Vec::new(), 4).await.unwrap();
        assert!(entries.is_empty());
        assert_eq!(stats.total, 0);
    }

    #[tokio::test]
    async fn failures_are_per_entry_and_ordered() {
        let client = NotionClient::new("k", "http://127.0.0.1:9", DEFAULT_VERSION).unwrap();
        let hits = vec![
            hit("not-an-id", "Broken"),
            hit("598337872cf94fdf8782e53db20768a5", "Goblin"),
            hit("", "Blank"),
        ];
        let (entries, stats) = fetch_all(&client, hits, 2).await.unwrap();
        let names: Vec<&str> = entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, ["Broken", "Goblin", "Blank"]);
        assert_eq!(stats.errors, 3);
        assert_eq!(stats.ok, 0);
        assert!(entries.iter().all(|e| e.stat_block.is_none() && e.error.is_some()));
    }

    #[tokio::test]
    async fn oversized_concurrency_is_capped() {
        let client = NotionClient::new("k", "http://127.0.0.1:9", DEFAULT_VERSION).unwrap();
        let hits = vec![hit("not-an-id", "Broken")];
        let (entries, stats) = fetch_all(&client, hits, usize::MAX).await.unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(stats.errors, 1);
        assert_eq!(clamp_concurrency(0), 1);
        assert_eq!(clamp_concurrency(usize::MAX), MAX_CONCURRENCY);
    }

    #[test]
    fn unfinished_tasks_become_errors() {
        let done = BestiaryEntry {
            id: "a".into(),
            name: "Goblin".into(),
            stat_block: Some(StatBlock::default()),
            error: None,
        };
        let labels = vec![("a".into(), "Goblin".into()), ("b".into(), "Ogre".into())];
        let entries = fill_missing(vec![Some(done), None], labels);
        assert_eq!(entries.len(), 2);
        assert!(entries[0].stat_block.is_some());
        assert_eq!(entries[1].id, "b");
        assert_eq!(entries[1].name, "Ogre");
        assert!(entries[1].stat_block.is_none());
        assert_eq!(entries[1].error.as_deref(), Some("retrieval task did not finish"));
    }

    #[test]
    fn entry_json_shape() {
        let entry = BestiaryEntry {
            id: "p".into(),
            name: "Goblin".into(),
            stat_block: Some(StatBlock::default()),
            error: None,
        };
        let json = serde_json::to_value(&entry).unwrap();
        assert!(json.get("statBlock").is_some());
        assert!(json.get("error").is_none());
    }
}
