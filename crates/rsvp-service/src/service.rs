//! Submission and collection of RSVP records

use chrono::Utc;
use futures::stream::{self, StreamExt};
use rsvp_common::{NewRsvp, Result, RsvpRecord, RsvpSubmission, Tally, KEY_PREFIX};
use std::cmp::Reverse;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

use crate::storage::{ObjectRef, RecordStore};

/// Default cap on the number of records listed
pub const DEFAULT_LIST_LIMIT: usize = 1000;

/// Default number of record reads in flight during a listing
pub const DEFAULT_READ_CONCURRENCY: usize = 16;

/// RSVP pipeline on top of a record store
#[derive(Clone)]
pub struct RsvpService {
    store: Arc<dyn RecordStore>,
    list_limit: usize,
    read_concurrency: usize,
}

impl RsvpService {
    /// Create a service with the default listing cap and fan-out
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self {
            store,
            list_limit: DEFAULT_LIST_LIMIT,
            read_concurrency: DEFAULT_READ_CONCURRENCY,
        }
    }

    pub fn with_list_limit(mut self, list_limit: usize) -> Self {
        self.list_limit = list_limit.max(1);
        self
    }

    pub fn with_read_concurrency(mut self, read_concurrency: usize) -> Self {
        self.read_concurrency = read_concurrency.max(1);
        self
    }

    /// Validate a submission and write it as a new record.
    ///
    /// Exactly one object is written on success. Nothing is retried.
    pub async fn submit(&self, submission: RsvpSubmission) -> Result<NewRsvp> {
        let rsvp = submission.into_record(Utc::now())?;
        let payload = serde_json::to_vec(&rsvp)?;

        if let Err(e) = self.store.write(&rsvp.id, payload).await {
            error!("Failed to save RSVP {}: {}", rsvp.id, e);
            return Err(e);
        }

        info!("Saved RSVP {} ({}: {})", rsvp.id, rsvp.name, rsvp.response);
        Ok(rsvp)
    }

    /// Read back every RSVP record, newest first.
    ///
    /// Objects that cannot be fetched or parsed are left out. Only a failing
    /// listing fails the whole call.
    pub async fn collect(&self) -> Result<Vec<RsvpRecord>> {
        let objects = match self.store.list(KEY_PREFIX, self.list_limit).await {
            Ok(objects) => objects,
            Err(e) => {
                error!("Failed to list RSVPs: {}", e);
                return Err(e);
            }
        };

        debug!("Listed {} RSVP objects", objects.len());

        let store = &self.store;
        let mut entries: Vec<(ObjectRef, RsvpRecord)> = stream::iter(objects)
            .map(|object| async move {
                let record = match store.read(&object).await {
                    Ok(bytes) => RsvpRecord::from_slice(&bytes),
                    Err(e) => Err(e),
                };
                (object, record)
            })
            .buffer_unordered(self.read_concurrency)
            .filter_map(|(object, record)| async move {
                match record {
                    Ok(record) => Some((object, record)),
                    Err(e) => {
                        warn!("Skipping RSVP object {}: {}", object.key, e);
                        None
                    }
                }
            })
            .collect()
            .await;

        sort_newest_first(&mut entries);

        info!("Collected {} RSVPs", entries.len());
        Ok(entries.into_iter().map(|(_, record)| record).collect())
    }

    /// Yes/no counts over all records
    pub async fn tally(&self) -> Result<Tally> {
        let records = self.collect().await?;
        Ok(Tally::from_records(&records))
    }
}

/// Newest timestamp first. Missing or invalid timestamps count as the
/// earliest instant. Ties go by record id, or by store key without one.
fn sort_newest_first(entries: &mut [(ObjectRef, RsvpRecord)]) {
    entries.sort_by_cached_key(|(object, record)| {
        (
            Reverse(record.parsed_timestamp()),
            record.id.clone().unwrap_or_else(|| object.key.clone()),
        )
    });
}
