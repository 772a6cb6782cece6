//! Orchestrator behaviour against scripted providers

mod support;

use std::sync::Arc;
use std::time::{Duration, Instant};

use support::providers::{Behaviour, ScriptedProvider};
use support::record;
use timesync_core::{BatchSyncOrchestrator, ProviderRegistration, ProviderRegistry};
use timesync_domain::{SyncError, TimeSyncError};

fn orchestrator(registrations: Vec<ProviderRegistration>) -> BatchSyncOrchestrator {
    BatchSyncOrchestrator::new(Arc::new(ProviderRegistry::new(registrations)))
}

fn names(names: &[&str]) -> Vec<String> {
    names.iter().map(|name| (*name).to_string()).collect()
}

#[tokio::test]
async fn blank_provider_name_is_rejected_before_resolution() {
    let provider = ScriptedProvider::new("Clockify", Behaviour::Deliver { prefix: "c" });
    let orchestrator = orchestrator(vec![provider.registration()]);

    for name in ["", "   "] {
        let err = orchestrator.sync_to_provider(name, Some(&[record(1)][..])).await.unwrap_err();
        assert!(matches!(err, TimeSyncError::Sync(SyncError::InvalidArgument(_))));
    }
    assert_eq!(provider.calls(), 0);
}

#[tokio::test]
async fn missing_entries_are_rejected() {
    let provider = ScriptedProvider::new("Clockify", Behaviour::Deliver { prefix: "c" });
    let orchestrator = orchestrator(vec![provider.registration()]);

    let err = orchestrator.sync_to_provider("Clockify", None).await.unwrap_err();
    assert!(matches!(err, TimeSyncError::Sync(SyncError::InvalidArgument(_))));

    let err =
        orchestrator.sync_to_multiple_providers(None, Some(&[record(1)][..])).await.unwrap_err();
    assert!(matches!(err, TimeSyncError::Sync(SyncError::InvalidArgument(_))));

    let providers = names(&["Clockify"]);
    let err = orchestrator
        .sync_to_multiple_providers(Some(providers.as_slice()), None)
        .await
        .unwrap_err();
    assert!(matches!(err, TimeSyncError::Sync(SyncError::InvalidArgument(_))));
    assert_eq!(provider.calls(), 0);
}

#[tokio::test]
async fn unknown_provider_lists_available_names() {
    let orchestrator = orchestrator(vec![
        ScriptedProvider::new("Toggl", Behaviour::Deliver { prefix: "t" }).registration(),
        ScriptedProvider::new("Clockify", Behaviour::Deliver { prefix: "c" }).registration(),
    ]);

    let err = orchestrator.sync_to_provider("Harvest", Some(&[record(1)][..])).await.unwrap_err();
    match &err {
        TimeSyncError::Sync(SyncError::UnsupportedProvider { requested, available }) => {
            assert_eq!(requested, "Harvest");
            assert_eq!(available, &orchestrator.get_available_providers());
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(err.to_string().contains("Available providers: Toggl, Clockify"));
}

#[tokio::test]
async fn provider_errors_are_wrapped_with_source() {
    let provider = ScriptedProvider::new("Clockify", Behaviour::Fail("connection refused"));
    let orchestrator = orchestrator(vec![provider.registration()]);

    let err = orchestrator.sync_to_provider("clockify", Some(&[record(1)][..])).await.unwrap_err();
    match err {
        TimeSyncError::Sync(SyncError::SyncFailure { provider, source }) => {
            assert_eq!(provider, "Clockify");
            assert!(matches!(*source, TimeSyncError::Network(_)));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn batch_is_passed_through_in_order() {
    let provider = ScriptedProvider::new("Clockify", Behaviour::Deliver { prefix: "c" });
    let orchestrator = orchestrator(vec![provider.registration()]);

    let report = orchestrator
        .sync_to_provider("CLOCKIFY", Some(&[record(3), record(1), record(2)][..]))
        .await
        .unwrap();

    assert_eq!(provider.received(), vec![vec![3, 1, 2]]);
    assert_eq!(report.attempted, 3);
    assert_eq!(report.delivered[0].external_id.as_deref(), Some("c-3"));
}

#[tokio::test]
async fn empty_batch_reaches_the_provider() {
    let provider = ScriptedProvider::new("Clockify", Behaviour::Deliver { prefix: "c" });
    let orchestrator = orchestrator(vec![provider.registration()]);

    let report =
        orchestrator.sync_to_provider("Clockify", Some(Vec::new().as_slice())).await.unwrap();
    assert_eq!(report.attempted, 0);
    assert_eq!(provider.calls(), 1);
}

#[tokio::test]
async fn one_failing_provider_does_not_affect_others() {
    let good = ScriptedProvider::new("A", Behaviour::Deliver { prefix: "a" });
    let bad = ScriptedProvider::new("B", Behaviour::Fail("upstream 503"));
    let orchestrator = orchestrator(vec![good.registration(), bad.registration()]);

    let summary = orchestrator
        .sync_to_multiple_providers(
            Some(names(&["A", "B"]).as_slice()),
            Some(&[record(1), record(2)][..]),
        )
        .await
        .unwrap();

    assert_eq!(summary.total, 2);
    assert_eq!(summary.succeeded, 1);
    assert_eq!(summary.failed, 1);
    assert_eq!(summary.failures[0].provider, "B");
    assert!(summary.failures[0].detail.contains("upstream 503"));
    assert!(summary.outcomes[0].success);
    assert_eq!(summary.outcomes[0].report.as_ref().unwrap().delivered.len(), 2);
    assert_eq!(good.calls(), 1);
}

#[tokio::test]
async fn outcomes_follow_request_order() {
    let orchestrator = orchestrator(vec![
        ScriptedProvider::slow(
            "Slow",
            Behaviour::Deliver { prefix: "s" },
            Duration::from_millis(40),
        )
        .registration(),
        ScriptedProvider::new("Fast", Behaviour::Deliver { prefix: "f" }).registration(),
    ]);

    let summary = orchestrator
        .sync_to_multiple_providers(
            Some(names(&["Slow", "Harvest", "Fast"]).as_slice()),
            Some(&[record(1)][..]),
        )
        .await
        .unwrap();

    let order: Vec<&str> = summary.outcomes.iter().map(|o| o.provider.as_str()).collect();
    assert_eq!(order, vec!["Slow", "Harvest", "Fast"]);
    assert!(!summary.outcomes[1].success);
    assert!(summary.outcomes[1].error.as_deref().unwrap().contains("not supported"));
}

#[tokio::test]
async fn panicking_provider_is_reported_as_failure() {
    let survivor = ScriptedProvider::new("Steady", Behaviour::Deliver { prefix: "s" });
    let orchestrator = orchestrator(vec![
        ScriptedProvider::new("Boom", Behaviour::Panic).registration(),
        survivor.registration(),
    ]);

    let summary = orchestrator
        .sync_to_multiple_providers(
            Some(names(&["Boom", "Steady"]).as_slice()),
            Some(&[record(1)][..]),
        )
        .await
        .unwrap();

    assert_eq!(summary.failed, 1);
    assert_eq!(summary.failures[0].provider, "Boom");
    assert!(summary.failures[0].detail.starts_with("Task join error"));
    assert!(summary.outcomes[1].success);
}

#[tokio::test]
async fn fan_out_runs_providers_concurrently() {
    let delay = Duration::from_millis(150);
    let orchestrator = orchestrator(vec![
        ScriptedProvider::slow("One", Behaviour::Deliver { prefix: "1" }, delay).registration(),
        ScriptedProvider::slow("Two", Behaviour::Deliver { prefix: "2" }, delay).registration(),
        ScriptedProvider::slow("Three", Behaviour::Deliver { prefix: "3" }, delay).registration(),
    ]);

    let started = Instant::now();
    let summary = orchestrator
        .sync_to_multiple_providers(
            Some(names(&["One", "Two", "Three"]).as_slice()),
            Some(&[record(1)][..]),
        )
        .await
        .unwrap();

    assert_eq!(summary.succeeded, 3);
    assert!(started.elapsed() < delay * 3, "providers ran sequentially: {:?}", started.elapsed());
}

#[tokio::test]
async fn max_parallel_of_one_serializes_fan_out() {
    let delay = Duration::from_millis(30);
    let orchestrator = orchestrator(vec![
        ScriptedProvider::slow("One", Behaviour::Deliver { prefix: "1" }, delay).registration(),
        ScriptedProvider::slow("Two", Behaviour::Deliver { prefix: "2" }, delay).registration(),
    ])
    .with_max_parallel(1);

    let started = Instant::now();
    let summary = orchestrator
        .sync_to_multiple_providers(Some(names(&["One", "Two"]).as_slice()), Some(&[record(1)][..]))
        .await
        .unwrap();

    assert_eq!(summary.succeeded, 2);
    assert!(started.elapsed() >= delay * 2);
}

#[tokio::test]
async fn empty_provider_list_yields_empty_summary() {
    let orchestrator = orchestrator(vec![]);
    let summary = orchestrator
        .sync_to_multiple_providers(Some(Vec::new().as_slice()), Some(&[record(1)][..]))
        .await
        .unwrap();
    assert_eq!(summary.total, 0);
    assert!(summary.outcomes.is_empty());
}
