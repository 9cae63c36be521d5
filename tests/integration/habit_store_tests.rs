//! Integration tests for the per-user habit store.
//!
//! Covers:
//! - key namespacing (signed-in vs anonymous sessions)
//! - add / read round trips and default filling
//! - full-replace updates
//! - delete leniency and not-found cases
//! - store failures surfacing as persistence errors

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use habit_companion_lib::db::kv_store::{KeyValueStore, MemoryKeyValueStore};
use habit_companion_lib::error::{AppError, AppResult};
use habit_companion_lib::models::habit::{HabitDraft, HabitSource};
use habit_companion_lib::services::habit_service::{HabitService, ANONYMOUS_GOALS_KEY};
use habit_companion_lib::services::session_service::StaticSessionProvider;

fn setup(user: Option<&str>) -> (HabitService, Arc<MemoryKeyValueStore>) {
    let store = Arc::new(MemoryKeyValueStore::new());
    let session = match user {
        Some(user) => StaticSessionProvider::signed_in(user),
        None => StaticSessionProvider::anonymous(),
    };
    (HabitService::new(store.clone(), Arc::new(session)), store)
}

/// Memory store whose writes can be switched off.
#[derive(Default)]
struct FlakyStore {
    inner: MemoryKeyValueStore,
    fail_writes: AtomicBool,
}

#[async_trait]
impl KeyValueStore for FlakyStore {
    async fn get(&self, key: &str) -> AppResult<Option<String>> {
        self.inner.get(key).await
    }

    async fn set(&self, key: &str, value: &str) -> AppResult<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(AppError::Io(std::io::Error::new(
                std::io::ErrorKind::Other,
                "disk unavailable",
            )));
        }
        self.inner.set(key, value).await
    }

    async fn remove(&self, key: &str) -> AppResult<()> {
        self.inner.remove(key).await
    }
}

#[tokio::test]
async fn test_add_then_read_returns_stored_record() {
    let (service, _store) = setup(Some("maya@example.com"));

    let added = service
        .add_goal(HabitDraft::new("Drink water", "Health").with_description("8 glasses"))
        .await
        .expect("add goal");

    let goals = service.get_user_goals().await.expect("read goals");
    let matching: Vec<_> = goals.iter().filter(|goal| **goal == added).collect();
    assert_eq!(matching.len(), 1, "exactly one stored copy of the added record");

    assert_eq!(added.frequency, "daily");
    assert_eq!(added.reflection, "");
    assert_eq!(added.pledge_amount, 0.0);
    assert_eq!(added.target_date, None);
    assert!(!added.completed);
}

#[tokio::test]
async fn test_add_without_category_uses_general() {
    let (service, _store) = setup(None);
    let added = service
        .add_goal(HabitDraft {
            title: Some("Untitled".into()),
            ..HabitDraft::default()
        })
        .await
        .unwrap();
    assert_eq!(added.category, HabitSource::configured("general"));
}

#[tokio::test]
async fn test_reads_are_idempotent() {
    let (service, _store) = setup(Some("maya"));
    service.add_goal(HabitDraft::new("A", "Custom")).await.unwrap();
    service.add_goal(HabitDraft::new("B", "Fitness")).await.unwrap();

    let first = service.get_user_goals().await.unwrap();
    let second = service.get_user_goals().await.unwrap();
    assert_eq!(first, second);
    assert_eq!(first.len(), 2);
}

#[tokio::test]
async fn test_missing_list_reads_as_empty() {
    let (service, _store) = setup(Some("nobody"));
    assert!(service.get_user_goals().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_users_do_not_see_each_others_goals() {
    let store = Arc::new(MemoryKeyValueStore::new());
    let alice = HabitService::new(
        store.clone(),
        Arc::new(StaticSessionProvider::signed_in("alice")),
    );
    let bob = HabitService::new(store.clone(), Arc::new(StaticSessionProvider::signed_in("bob")));

    alice.add_goal(HabitDraft::new("Alice's habit", "Custom")).await.unwrap();

    assert_eq!(alice.get_user_goals().await.unwrap().len(), 1);
    assert!(bob.get_user_goals().await.unwrap().is_empty());
    assert_eq!(store.keys().await, vec!["user_goals_alice".to_string()]);
}

#[tokio::test]
async fn test_anonymous_sessions_share_fallback_bucket() {
    // Known weakness: every unauthenticated caller writes to the same key.
    let store = Arc::new(MemoryKeyValueStore::new());
    let first_guest = HabitService::new(store.clone(), Arc::new(StaticSessionProvider::anonymous()));
    let second_guest =
        HabitService::new(store.clone(), Arc::new(StaticSessionProvider::anonymous()));

    first_guest.add_goal(HabitDraft::new("Guest one", "Custom")).await.unwrap();
    second_guest.add_goal(HabitDraft::new("Guest two", "Custom")).await.unwrap();

    assert_eq!(store.keys().await, vec![ANONYMOUS_GOALS_KEY.to_string()]);
    let titles: Vec<_> = first_guest
        .get_user_goals()
        .await
        .unwrap()
        .into_iter()
        .map(|goal| goal.title)
        .collect();
    assert_eq!(titles, vec!["Guest one", "Guest two"]);
}

#[tokio::test]
async fn test_update_with_resent_fields_keeps_them() {
    let (service, _store) = setup(Some("maya"));
    let added = service
        .add_goal(HabitDraft::new("Walk", "Fitness").with_description("Around the block"))
        .await
        .unwrap();

    let mut draft = HabitDraft::from(added.clone());
    draft.title = Some("Long walk".into());
    let updated = service.update_goal(draft).await.unwrap();

    assert_eq!(updated.title, "Long walk");
    assert_eq!(updated.description, "Around the block");
    assert_eq!(updated.category, added.category);
    assert_eq!(service.get_user_goals().await.unwrap(), vec![updated]);
}

#[tokio::test]
async fn test_update_replaces_whole_record() {
    let (service, _store) = setup(Some("maya"));
    let added = service
        .add_goal(HabitDraft {
            frequency: Some("weekly".into()),
            pledge_amount: Some(10.0),
            ..HabitDraft::new("Walk", "Fitness").with_description("Around the block")
        })
        .await
        .unwrap();

    let updated = service
        .update_goal(HabitDraft {
            id: Some(added.id.clone()),
            title: Some("Long walk".into()),
            ..HabitDraft::default()
        })
        .await
        .unwrap();

    assert_eq!(updated.title, "Long walk");
    assert_eq!(updated.description, "", "omitted description falls back to default");
    assert_eq!(updated.category, HabitSource::configured("general"));
    assert_eq!(updated.frequency, "daily");
    assert_eq!(updated.pledge_amount, 0.0);
    assert_eq!(updated.created_at, added.created_at);

    let stored = service.get_user_goals().await.unwrap();
    assert_eq!(stored, vec![updated]);
}

#[tokio::test]
async fn test_update_keeps_completed_flag_from_caller() {
    let (service, _store) = setup(None);
    let added = service.add_goal(HabitDraft::new("Stretch", "Custom")).await.unwrap();

    let mut draft = HabitDraft::from(added);
    draft.completed = Some(true);
    let updated = service.update_goal(draft).await.unwrap();
    assert!(updated.completed);
}

#[tokio::test]
async fn test_update_without_list_is_not_found() {
    let (service, _store) = setup(Some("maya"));
    let err = service
        .update_goal(HabitDraft {
            id: Some("ghost".into()),
            ..HabitDraft::default()
        })
        .await
        .unwrap_err();
    assert!(err.is_not_found(), "unexpected error: {err:?}");
}

#[tokio::test]
async fn test_update_unknown_id_is_not_found() {
    let (service, _store) = setup(Some("maya"));
    service.add_goal(HabitDraft::new("Real", "Custom")).await.unwrap();

    let err = service
        .update_goal(HabitDraft {
            id: Some("ghost".into()),
            ..HabitDraft::default()
        })
        .await
        .unwrap_err();
    assert!(err.is_not_found(), "unexpected error: {err:?}");
    assert_eq!(service.get_user_goals().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_delete_removes_matching_record() {
    let (service, _store) = setup(Some("maya"));
    let keep = service.add_goal(HabitDraft::new("Keep", "Custom")).await.unwrap();
    let drop = service.add_goal(HabitDraft::new("Drop", "Custom")).await.unwrap();

    service.delete_goal(&drop.id).await.unwrap();
    assert_eq!(service.get_user_goals().await.unwrap(), vec![keep]);
}

#[tokio::test]
async fn test_delete_unknown_id_is_silent_noop() {
    let (service, _store) = setup(Some("maya"));
    service.add_goal(HabitDraft::new("Keep", "Custom")).await.unwrap();
    let before = service.get_user_goals().await.unwrap();

    service
        .delete_goal("not-there")
        .await
        .expect("absent id inside an existing list is not an error");
    assert_eq!(service.get_user_goals().await.unwrap(), before);
}

#[tokio::test]
async fn test_delete_without_list_is_not_found() {
    let (service, _store) = setup(Some("maya"));
    let err = service.delete_goal("anything").await.unwrap_err();
    assert!(err.is_not_found(), "unexpected error: {err:?}");
}

#[tokio::test]
async fn test_failed_write_is_persistence_error_and_leaves_list_intact() {
    let store = Arc::new(FlakyStore::default());
    let service = HabitService::new(store.clone(), Arc::new(StaticSessionProvider::signed_in("maya")));

    let kept = service.add_goal(HabitDraft::new("Kept", "Custom")).await.unwrap();

    store.fail_writes.store(true, Ordering::SeqCst);
    let err = service
        .add_goal(HabitDraft::new("Lost", "Custom"))
        .await
        .unwrap_err();
    assert!(err.is_persistence(), "unexpected error: {err:?}");
    assert!(
        std::error::Error::source(&err).is_some(),
        "persistence error keeps its cause"
    );

    let err = service.delete_goal(&kept.id).await.unwrap_err();
    assert!(err.is_persistence());

    store.fail_writes.store(false, Ordering::SeqCst);
    assert_eq!(service.get_user_goals().await.unwrap(), vec![kept]);
}

#[tokio::test]
async fn test_concurrent_reads_agree() {
    let (service, _store) = setup(Some("maya"));
    service.add_goal(HabitDraft::new("A", "Custom")).await.unwrap();

    let (first, second) = futures::future::join(service.get_user_goals(), service.get_user_goals()).await;
    assert_eq!(first.unwrap(), second.unwrap());
}
