use capmap_catalog::MaturityLevel;
use capmap_core::{ImportSession, ResetOutcome, SessionError, SessionState, RESET_PROMPT};
use capmap_ingest::{MemoryStore, PersistenceStore};
use capmap_test_utils::{
    csv_source, small_definition, test_config, FlakyStore, GatedStore, RecordingObserver, SAMPLE_CSV,
};
use parking_lot::Mutex;
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use std::sync::Arc;

async fn imported_session(store: Arc<dyn PersistenceStore>) -> ImportSession {
    let session = ImportSession::new(test_config(), store, RecordingObserver::new()).unwrap();
    session.start(csv_source(SAMPLE_CSV)).await.unwrap();
    session
}

#[tokio::test]
async fn test_declined_reset_changes_nothing() {
    let store = MemoryStore::new();
    let session = imported_session(Arc::new(store.clone())).await;
    let before = session.catalog();

    let prompts = Mutex::new(Vec::new());
    let decline = |prompt: &str| {
        prompts.lock().push(prompt.to_string());
        false
    };
    let outcome = session.reset_import(&decline).await.unwrap();

    assert_eq!(outcome, ResetOutcome::Declined);
    assert_eq!(prompts.into_inner(), vec![RESET_PROMPT.to_string()]);
    assert_eq!(session.catalog(), before);
    assert!(store.load().await.unwrap().is_some());
}

#[tokio::test]
async fn test_confirmed_reset_restores_defaults_and_clears_store() {
    let store = MemoryStore::new();
    let session = imported_session(Arc::new(store.clone())).await;

    let outcome = session.reset_import(&|_: &str| true).await.unwrap();

    assert_eq!(outcome, ResetOutcome::Reset);
    assert_eq!(session.catalog(), small_definition().generate_default());
    assert_eq!(store.load().await.unwrap(), None);
    assert_eq!(session.state(), SessionState::Idle);
}

#[tokio::test]
async fn test_reset_without_prior_import() {
    let session = ImportSession::in_memory(test_config()).unwrap();

    let outcome = session.reset_import(&|_: &str| true).await.unwrap();

    assert_eq!(outcome, ResetOutcome::Reset);
    assert_eq!(session.catalog(), small_definition().generate_default());
}

#[tokio::test]
async fn test_reset_then_restore_yields_defaults() {
    let store = MemoryStore::new();
    let session = imported_session(Arc::new(store.clone())).await;
    session.reset_import(&|_: &str| true).await.unwrap();

    let restored = ImportSession::restore(test_config(), Arc::new(store), RecordingObserver::new())
        .await
        .unwrap();

    assert_eq!(restored.catalog(), small_definition().generate_default());
}

#[tokio::test]
async fn test_import_after_reset_starts_from_defaults() {
    let session = imported_session(Arc::new(MemoryStore::new())).await;
    session.reset_import(&|_: &str| true).await.unwrap();

    let outcome = session.start(csv_source("capability,level\nIaC,1\n")).await.unwrap();

    assert_eq!(outcome.catalog.level_of("IaC"), MaturityLevel::new(1));
    assert_eq!(outcome.catalog.level_of("CI/CD"), Some(MaturityLevel::DEFAULT));
}

#[tokio::test]
async fn test_clear_failure_still_resets_in_memory() {
    let store = FlakyStore::new();
    let session = imported_session(store.clone()).await;
    store.fail_clear(true);

    let err = session.reset_import(&|_: &str| true).await.unwrap_err();

    assert!(matches!(err, SessionError::Persist(_)));
    assert_eq!(session.catalog(), small_definition().generate_default());
    assert!(store.inner().raw().is_some());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_reset_is_rejected_during_import() {
    let store = GatedStore::new();
    let session = Arc::new(ImportSession::new(test_config(), store.clone(), RecordingObserver::new()).unwrap());

    let import = {
        let session = Arc::clone(&session);
        tokio::spawn(async move { session.start(csv_source(SAMPLE_CSV)).await })
    };
    store.wait_entered().await;

    let asked = Mutex::new(false);
    let confirm = |_: &str| {
        *asked.lock() = true;
        true
    };
    let err = session.reset_import(&confirm).await.unwrap_err();
    assert!(err.is_busy());
    assert!(!*asked.lock(), "user must not be prompted while busy");

    store.release();
    import.await.unwrap().unwrap();

    // Idle again, so reset goes through
    let outcome = session.reset_import(&|_: &str| true).await.unwrap();
    assert_eq!(outcome, ResetOutcome::Reset);
    assert_eq!(store.inner().raw(), None);
}

fn row_strategy() -> impl Strategy<Value = (String, i64)> {
    let known: Vec<String> = small_definition().generate_default().items().map(|i| i.name.clone()).collect();
    let name = prop_oneof![prop::sample::select(known), "[a-z]{1,8}".prop_map(|s| format!("other {s}"))];
    (name, 1i64..=4)
}

fn file_strategy() -> impl Strategy<Value = String> {
    prop::collection::vec(row_strategy(), 0..6).prop_map(|rows| {
        let mut csv = String::from("capability,level\n");
        for (name, level) in rows {
            csv.push_str(&format!("{name},{level}\n"));
        }
        csv
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn prop_reset_after_any_imports_yields_defaults(files in prop::collection::vec(file_strategy(), 1..5)) {
        let rt = tokio::runtime::Runtime::new().unwrap();
        let store = MemoryStore::new();

        let (catalog, saved) = rt.block_on(async {
            let session = ImportSession::new(test_config(), Arc::new(store.clone()), RecordingObserver::new()).unwrap();
            for file in &files {
                session.start(csv_source(file)).await.unwrap();
            }
            assert!(store.load().await.unwrap().is_some());

            session.reset_import(&|_: &str| true).await.unwrap();
            (session.catalog(), store.load().await.unwrap())
        });

        prop_assert_eq!(catalog, small_definition().generate_default());
        prop_assert_eq!(saved, None);
    }
}
