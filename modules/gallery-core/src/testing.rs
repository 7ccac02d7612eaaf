// Test doubles for the search seam.
//
// MockSearchBackend is scriptable: fixed record set, invocation counting,
// optional latency and failure injection. Enough to assert the widening
// policy, single-flight dedup, and unavailable-provider recovery without a
// network.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use anyhow::{bail, Result};
use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use cloudinary_client::{ResourceRecord, SearchRequest};

use crate::search::SearchBackend;

/// Scripted search backend.
pub struct MockSearchBackend {
    records: Vec<ResourceRecord>,
    calls: AtomicUsize,
    requests: Mutex<Vec<SearchRequest>>,
    delay: Option<Duration>,
    fail: bool,
}

impl MockSearchBackend {
    pub fn new(records: Vec<ResourceRecord>) -> Self {
        Self {
            records,
            calls: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
            delay: None,
            fail: false,
        }
    }

    /// A backend whose every call fails.
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::new(Vec::new())
        }
    }

    /// Inject latency before each response, to widen race windows in
    /// single-flight tests.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Number of `search` invocations so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Every request seen, in order.
    pub fn requests(&self) -> Vec<SearchRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl SearchBackend for MockSearchBackend {
    async fn search(&self, request: &SearchRequest) -> Result<Vec<ResourceRecord>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().unwrap().push(request.clone());

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail {
            bail!("scripted provider failure");
        }

        let mut records = self.records.clone();
        records.truncate(request.max_results as usize);
        Ok(records)
    }
}

/// A resource record under `{root}/{category}` with a deterministic
/// timestamp derived from `day`.
pub fn record(root: &str, category: &str, name: &str, day: u32) -> ResourceRecord {
    let folder = format!("{root}/{category}");
    ResourceRecord {
        public_id: format!("{folder}/{name}"),
        filename: format!("{name}.jpg"),
        folder,
        created_at: Some(Utc.with_ymd_and_hms(2024, 1, day, 0, 0, 0).unwrap()),
        context: HashMap::new(),
    }
}

/// `count` records spread under one category.
pub fn records_in(root: &str, category: &str, count: usize) -> Vec<ResourceRecord> {
    (0..count)
        .map(|i| record(root, category, &format!("{category}-{i}"), 1 + (i % 28) as u32))
        .collect()
}
