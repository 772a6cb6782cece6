//! Provider registry
//!
//! Maps case-insensitive provider identities to constructors. The table is
//! built once at startup from an explicit registration list and never
//! mutated afterwards, so lookups need no locking.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use timesync_domain::{Result, SyncError};
use tracing::{debug, info, warn};

use super::ports::SyncProvider;

/// Builds a provider instance on demand.
pub type ProviderConstructor = Arc<dyn Fn() -> Result<Arc<dyn SyncProvider>> + Send + Sync>;

/// One entry of the static registration table.
#[derive(Clone)]
pub struct ProviderRegistration {
    identity: String,
    constructor: ProviderConstructor,
}

impl ProviderRegistration {
    /// Registration that builds a fresh provider on every resolve.
    pub fn new<F>(identity: impl Into<String>, constructor: F) -> Self
    where
        F: Fn() -> Result<Arc<dyn SyncProvider>> + Send + Sync + 'static,
    {
        Self { identity: identity.into(), constructor: Arc::new(constructor) }
    }

    /// Registration that hands out clones of an already built provider.
    pub fn instance(provider: Arc<dyn SyncProvider>) -> Self {
        let identity = provider.identity().to_string();
        Self::new(identity, move || Ok(Arc::clone(&provider)))
    }

    /// Name the provider is registered under.
    pub fn identity(&self) -> &str {
        &self.identity
    }
}

impl fmt::Debug for ProviderRegistration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderRegistration")
            .field("identity", &self.identity)
            .finish_non_exhaustive()
    }
}

/// Immutable lookup table of sync providers.
#[derive(Debug, Default)]
pub struct ProviderRegistry {
    /// Registrations in first-insertion order.
    registrations: Vec<ProviderRegistration>,
    /// Lowercased identity to position in `registrations`.
    index: HashMap<String, usize>,
}

impl ProviderRegistry {
    /// Build the registry from a registration list.
    ///
    /// A later registration with an identity already present (compared
    /// case-insensitively) replaces the earlier constructor but keeps its
    /// position in [`list_available`](Self::list_available).
    pub fn new(registrations: impl IntoIterator<Item = ProviderRegistration>) -> Self {
        let mut registry = Self::default();

        for registration in registrations {
            let key = registration.identity.to_lowercase();
            match registry.index.get(&key) {
                Some(&slot) => {
                    warn!(
                        provider = %registration.identity,
                        replaced = %registry.registrations[slot].identity,
                        "Duplicate provider registration, keeping the latest"
                    );
                    registry.registrations[slot] = registration;
                }
                None => {
                    registry.index.insert(key, registry.registrations.len());
                    registry.registrations.push(registration);
                }
            }
        }

        info!(
            providers = ?registry.list_available(),
            count = registry.registrations.len(),
            "Sync provider registry initialized"
        );
        registry
    }

    /// Instantiate the provider registered under `name` (any casing).
    pub fn resolve(&self, name: &str) -> std::result::Result<Arc<dyn SyncProvider>, SyncError> {
        let trimmed = name.trim();
        let registration = if trimmed.is_empty() {
            None
        } else {
            self.index.get(&trimmed.to_lowercase()).map(|&slot| &self.registrations[slot])
        };

        let Some(registration) = registration else {
            warn!(provider = %name, "Requested sync provider is not registered");
            return Err(SyncError::UnsupportedProvider {
                requested: name.to_string(),
                available: self.list_available(),
            });
        };

        debug!(provider = %registration.identity, "Resolving sync provider");
        (registration.constructor)().map_err(|err| {
            warn!(
                provider = %registration.identity,
                error = %err,
                "Sync provider construction failed"
            );
            SyncError::ResolutionFailure {
                provider: registration.identity.clone(),
                detail: err.to_string(),
            }
        })
    }

    /// Registered identities in insertion order.
    pub fn list_available(&self) -> Vec<String> {
        self.registrations.iter().map(|registration| registration.identity.clone()).collect()
    }

    /// Number of distinct registered providers.
    pub fn len(&self) -> usize {
        self.registrations.len()
    }

    /// True when nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.registrations.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use timesync_domain::{SyncReport, TimeEntryRecord, TimeSyncError};

    use super::*;

    struct NamedProvider {
        name: &'static str,
        tag: &'static str,
    }

    #[async_trait]
    impl SyncProvider for NamedProvider {
        fn identity(&self) -> &str {
            self.name
        }

        async fn sync(&self, _entries: &[TimeEntryRecord]) -> Result<SyncReport> {
            Ok(SyncReport::new(self.tag))
        }
    }

    fn registration(name: &'static str, tag: &'static str) -> ProviderRegistration {
        ProviderRegistration::new(name, move || {
            Ok(Arc::new(NamedProvider { name, tag }) as Arc<dyn SyncProvider>)
        })
    }

    fn registry() -> ProviderRegistry {
        ProviderRegistry::new([
            registration("Clockify", "clockify"),
            registration("Toggl", "toggl"),
        ])
    }

    #[test]
    fn resolves_regardless_of_case() {
        let registry = registry();
        for name in ["clockify", "Clockify", "CLOCKIFY", "  Clockify "] {
            let provider = registry.resolve(name).unwrap();
            assert_eq!(provider.identity(), "Clockify");
        }
    }

    #[test]
    fn unknown_provider_candidates_match_listing() {
        let registry =
            ProviderRegistry::new([registration("Toggl", "t"), registration("Clockify", "c")]);

        let err = registry.resolve("Harvest").err().unwrap();
        match err {
            SyncError::UnsupportedProvider { requested, available } => {
                assert_eq!(requested, "Harvest");
                assert_eq!(available, registry.list_available());
                assert_eq!(available, vec!["Toggl".to_string(), "Clockify".to_string()]);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn blank_name_is_unsupported() {
        let err = registry().resolve("   ").err().unwrap();
        assert!(matches!(err, SyncError::UnsupportedProvider { .. }));
    }

    #[test]
    fn listing_keeps_insertion_order_and_is_idempotent() {
        let registry =
            ProviderRegistry::new([registration("Toggl", "t"), registration("Clockify", "c")]);

        let first = registry.list_available();
        assert_eq!(first, vec!["Toggl".to_string(), "Clockify".to_string()]);
        assert_eq!(registry.list_available(), first);
    }

    #[tokio::test]
    async fn last_duplicate_wins_in_original_slot() {
        let registry = ProviderRegistry::new([
            registration("Clockify", "first"),
            registration("Toggl", "toggl"),
            registration("CLOCKIFY", "second"),
        ]);

        assert_eq!(registry.len(), 2);
        assert_eq!(
            registry.list_available(),
            vec!["CLOCKIFY".to_string(), "Toggl".to_string()]
        );

        let report = registry.resolve("clockify").unwrap().sync(&[]).await.unwrap();
        assert_eq!(report.provider, "second");
    }

    #[test]
    fn constructor_failure_becomes_resolution_failure() {
        let registry = ProviderRegistry::new([ProviderRegistration::new("Broken", || {
            Err(TimeSyncError::Config("missing endpoint".into()))
        })]);

        let err = registry.resolve("broken").err().unwrap();
        match err {
            SyncError::ResolutionFailure { provider, detail } => {
                assert_eq!(provider, "Broken");
                assert!(detail.contains("missing endpoint"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
