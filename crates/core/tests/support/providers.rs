//! Scripted sync providers for orchestrator tests

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use timesync_core::sync::ports::SyncProvider;
use timesync_core::ProviderRegistration;
use timesync_domain::{Result as DomainResult, SyncReport, TimeEntryRecord, TimeSyncError};

/// How a [`ScriptedProvider`] answers.
#[derive(Debug, Clone)]
pub enum Behaviour {
    /// Deliver every entry, returning `<prefix>-<entry_id>` as external id.
    Deliver { prefix: &'static str },
    /// Fail the whole batch.
    Fail(&'static str),
    /// Reject the listed entries, deliver the rest without external ids.
    Reject(Vec<i64>),
    /// Panic inside `sync`.
    Panic,
}

/// Provider that follows a fixed [`Behaviour`] and records what it received.
pub struct ScriptedProvider {
    name: String,
    behaviour: Behaviour,
    delay: Duration,
    calls: AtomicUsize,
    received: Mutex<Vec<Vec<i64>>>,
}

impl ScriptedProvider {
    pub fn new(name: &str, behaviour: Behaviour) -> Arc<Self> {
        Arc::new(Self {
            name: name.to_string(),
            behaviour,
            delay: Duration::ZERO,
            calls: AtomicUsize::new(0),
            received: Mutex::new(Vec::new()),
        })
    }

    pub fn slow(name: &str, behaviour: Behaviour, delay: Duration) -> Arc<Self> {
        Arc::new(Self {
            name: name.to_string(),
            behaviour,
            delay,
            calls: AtomicUsize::new(0),
            received: Mutex::new(Vec::new()),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Entry ids of each received batch, in call order.
    pub fn received(&self) -> Vec<Vec<i64>> {
        self.received.lock().unwrap().clone()
    }

    pub fn registration(self: &Arc<Self>) -> ProviderRegistration {
        ProviderRegistration::instance(Arc::clone(self) as Arc<dyn SyncProvider>)
    }
}

#[async_trait]
impl SyncProvider for ScriptedProvider {
    fn identity(&self) -> &str {
        &self.name
    }

    async fn sync(&self, entries: &[TimeEntryRecord]) -> DomainResult<SyncReport> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.received.lock().unwrap().push(entries.iter().map(|e| e.entry_id).collect());

        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        let mut report = SyncReport::new(&self.name);
        match &self.behaviour {
            Behaviour::Deliver { prefix } => {
                for entry in entries {
                    let external_id = format!("{prefix}-{}", entry.entry_id);
                    report.record_delivered(entry.entry_id, Some(external_id));
                }
            }
            Behaviour::Fail(message) => return Err(TimeSyncError::Network((*message).to_string())),
            Behaviour::Reject(ids) => {
                for entry in entries {
                    if ids.contains(&entry.entry_id) {
                        report.record_failure(entry.entry_id, "HTTP 400: rejected");
                    } else {
                        report.record_delivered(entry.entry_id, None);
                    }
                }
            }
            Behaviour::Panic => panic!("provider {} exploded", self.name),
        }
        Ok(report)
    }
}
