//! Durable storage for push subscriptions.
//!
//! The store owns an ordered, in-memory copy of every record behind a single
//! async mutex and mirrors it to a JSON file. Mutations are applied to a copy,
//! the copy is written to disk (temp file, then rename) and only a successful
//! write replaces the in-memory state, so a failed write changes nothing.

mod error;

pub use error::StorageError;

use crate::domain::NewSubscription;
use crate::models::Subscription;
use chrono::{DateTime, Utc};
use std::collections::HashSet;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::sync::{Mutex, MutexGuard};

pub struct SubscriptionStore {
    path: PathBuf,
    records: Mutex<Vec<Subscription>>,
    broadcast: Mutex<()>,
}

impl SubscriptionStore {
    /// Loads the store from `path`, creating an empty file if none exists.
    #[tracing::instrument(name = "Opening the subscription store", skip(path))]
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, StorageError> {
        let path = path.as_ref().to_path_buf();
        let records = match tokio::fs::read(&path).await {
            Ok(bytes) => {
                let records: Vec<Subscription> =
                    serde_json::from_slice(&bytes).map_err(|source| StorageError::Corrupt {
                        path: path.clone(),
                        source,
                    })?;
                dedup_by_endpoint(records)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                    tokio::fs::create_dir_all(parent)
                        .await
                        .map_err(|source| StorageError::Write {
                            path: path.clone(),
                            source,
                        })?;
                }
                persist(&path, &[]).await?;
                Vec::new()
            }
            Err(source) => return Err(StorageError::Read { path, source }),
        };
        tracing::info!(
            path = %path.display(),
            subscriptions = records.len(),
            "Subscription store loaded"
        );
        Ok(Self {
            path,
            records: Mutex::new(records),
            broadcast: Mutex::new(()),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Serializes broadcasts. Hold the guard from reading the pending records
    /// until they are marked sent.
    pub async fn lock_broadcast(&self) -> MutexGuard<'_, ()> {
        self.broadcast.lock().await
    }

    /// Inserts the subscription unless its endpoint is already stored.
    /// Returns whether a record was inserted.
    #[tracing::instrument(name = "Saving a push subscription", skip(self, new_subscription))]
    pub async fn add(
        &self,
        new_subscription: NewSubscription,
        now: DateTime<Utc>,
    ) -> Result<bool, StorageError> {
        let mut records = self.records.lock().await;
        if records
            .iter()
            .any(|r| r.endpoint == new_subscription.endpoint.as_ref())
        {
            return Ok(false);
        }
        let mut next = records.clone();
        next.push(Subscription::new(new_subscription, now));
        persist(&self.path, &next).await?;
        *records = next;
        Ok(true)
    }

    /// Deletes the record for `endpoint`. Returns whether one existed.
    #[tracing::instrument(name = "Removing a push subscription", skip(self, endpoint))]
    pub async fn remove(&self, endpoint: &str) -> Result<bool, StorageError> {
        let mut records = self.records.lock().await;
        let next: Vec<Subscription> = records
            .iter()
            .filter(|r| r.endpoint != endpoint)
            .cloned()
            .collect();
        if next.len() == records.len() {
            return Ok(false);
        }
        persist(&self.path, &next).await?;
        *records = next;
        Ok(true)
    }

    /// Every record, in insertion order.
    pub async fn list(&self) -> Vec<Subscription> {
        self.records.lock().await.clone()
    }

    pub async fn len(&self) -> usize {
        self.records.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.lock().await.is_empty()
    }

    #[tracing::instrument(name = "Marking all pending subscriptions as notified", skip(self))]
    pub async fn mark_all_pending_sent(&self, now: DateTime<Utc>) -> Result<usize, StorageError> {
        self.mark_sent_where(now, |_| true).await
    }

    /// Marks only the listed endpoints, skipping any already notified.
    #[tracing::instrument(name = "Marking delivered subscriptions as notified", skip(self, endpoints))]
    pub async fn mark_pending_sent(
        &self,
        endpoints: &[String],
        now: DateTime<Utc>,
    ) -> Result<usize, StorageError> {
        let endpoints: HashSet<&str> = endpoints.iter().map(String::as_str).collect();
        self.mark_sent_where(now, |r| endpoints.contains(r.endpoint.as_str()))
            .await
    }

    /// Removes every record created strictly before `cutoff`.
    #[tracing::instrument(name = "Purging stale subscriptions", skip(self))]
    pub async fn purge_older_than(&self, cutoff: DateTime<Utc>) -> Result<usize, StorageError> {
        let mut records = self.records.lock().await;
        let next: Vec<Subscription> = records
            .iter()
            .filter(|r| r.created_at >= cutoff)
            .cloned()
            .collect();
        let removed = records.len() - next.len();
        if removed > 0 {
            persist(&self.path, &next).await?;
            *records = next;
        }
        Ok(removed)
    }

    async fn mark_sent_where<F>(&self, now: DateTime<Utc>, selected: F) -> Result<usize, StorageError>
    where
        F: Fn(&Subscription) -> bool,
    {
        let mut records = self.records.lock().await;
        let mut next = records.clone();
        let mut changed = 0;
        for record in next.iter_mut() {
            if selected(record) && record.mark_sent(now) {
                changed += 1;
            }
        }
        if changed > 0 {
            persist(&self.path, &next).await?;
            *records = next;
        }
        Ok(changed)
    }
}

fn dedup_by_endpoint(records: Vec<Subscription>) -> Vec<Subscription> {
    let mut seen = HashSet::new();
    let before = records.len();
    let records: Vec<Subscription> = records
        .into_iter()
        .filter(|r| seen.insert(r.endpoint.clone()))
        .collect();
    if records.len() != before {
        tracing::warn!(
            dropped = before - records.len(),
            "Dropped duplicate endpoints found in the subscription file"
        );
    }
    records
}

async fn persist(path: &Path, records: &[Subscription]) -> Result<(), StorageError> {
    let content = serde_json::to_vec_pretty(records).map_err(StorageError::Serialize)?;
    let temp_file = path.with_extension("json.tmp");
    tokio::fs::write(&temp_file, content)
        .await
        .map_err(|source| StorageError::Write {
            path: path.to_path_buf(),
            source,
        })?;
    tokio::fs::rename(&temp_file, path)
        .await
        .map_err(|source| StorageError::Write {
            path: path.to_path_buf(),
            source,
        })
}
