//! Durable, day-bucketed queue of scheduled events.

use std::sync::Arc;

use chrono::{DateTime, Days, Utc};
use serde_json::Value;
use uuid::Uuid;

use lpa_core::keys::{
    KeyKind, Keys, LpaKey, LpaOwnerKey, PartitionKey, ScheduledDayKey, ScheduledKey, SortKey,
};
use lpa_core::ports::Clock;
use lpa_core::scheduled::{Action, Event};
use lpa_core::storage::{
    from_item, item_keys, Result, StorageClient, StorageClientExt, StoreError, Transaction,
    MAX_TRANSACTION_ITEMS, PK_ATTRIBUTE,
};

/// Times a pop looks again after losing a claim to another runner.
const POP_ATTEMPTS: usize = 3;

/// Queue of scheduled events over a [`StorageClient`].
///
/// Events live in the `SCHEDULEDDAY#<date>` partition of their due date.
/// Popping an event moves it, in one transaction, to the matching
/// `HANDLEDDAY#<date>` partition under the same sort key, so only one
/// caller can ever claim it.
pub struct ScheduleStore {
    client: Arc<dyn StorageClient>,
    clock: Arc<dyn Clock>,
    new_id: fn() -> Uuid,
    lookback_days: u32,
}

impl ScheduleStore {
    pub fn new(client: Arc<dyn StorageClient>, clock: Arc<dyn Clock>, lookback_days: u32) -> Self {
        Self {
            client,
            clock,
            new_id: Uuid::new_v4,
            lookback_days,
        }
    }

    /// Builds an event with a fresh id and enqueues it.
    pub async fn schedule(
        &self,
        at: DateTime<Utc>,
        action: Action,
        lpa_key: LpaKey,
        owner_key: LpaOwnerKey,
        lpa_uid: &str,
    ) -> Result<Event> {
        let event = Event::new(at, action, lpa_key, owner_key, lpa_uid, (self.new_id)());
        self.put(event.clone()).await?;
        Ok(event)
    }

    /// Enqueues an event. Enqueueing the same keys twice is a conflict.
    pub async fn put(&self, mut event: Event) -> Result<()> {
        event.created_at = self.clock.now();
        self.client.create_value(&event).await
    }

    /// Enqueues several events, all or none.
    pub async fn create(&self, events: Vec<Event>) -> Result<()> {
        let now = self.clock.now();
        let mut transaction = Transaction::new();
        for mut event in events {
            event.created_at = now;
            transaction = transaction.create(&event)?;
        }

        self.client.write_transaction(transaction).await
    }

    /// Claims an event due on or before the day of `as_of`.
    ///
    /// Day buckets are swept oldest first, from `lookback_days` before
    /// `as_of` up to and including its own day. Returns `NotFound` once every
    /// bucket in that window is empty.
    pub async fn pop(&self, as_of: DateTime<Utc>) -> Result<Event> {
        let mut attempt = 0;
        loop {
            attempt += 1;
            match self.claim_next(as_of).await {
                Err(StoreError::ConditionalCheckFailed) if attempt < POP_ATTEMPTS => {
                    tracing::debug!(attempt, "scheduled event claimed elsewhere, retrying");
                }
                result => return result,
            }
        }
    }

    /// Deletes every queued and handled event for an lpa.
    pub async fn delete_all_by_uid(&self, lpa_uid: &str) -> Result<()> {
        self.delete_matching(lpa_uid, |_| true).await
    }

    /// Deletes the queued and handled events for an lpa that run one of
    /// `actions`.
    pub async fn delete_all_action_by_uid(&self, actions: &[Action], lpa_uid: &str) -> Result<()> {
        self.delete_matching(lpa_uid, |key| actions.contains(&key.action()))
            .await
    }

    async fn claim_next(&self, as_of: DateTime<Utc>) -> Result<Event> {
        for day in self.buckets(as_of) {
            let pk = PartitionKey::from(day);
            loop {
                let item = match self.client.any_by_pk(&pk).await {
                    Ok(item) => item,
                    Err(err) if err.is_not_found() => break,
                    Err(err) => return Err(err),
                };

                let from = item_keys(&item)?;
                let mut handled = item.clone();
                handled.insert(
                    PK_ATTRIBUTE.to_string(),
                    Value::String(PartitionKey::from(day.handled()).to_string()),
                );

                // Undecodable events are claimed like any other.
                let event = from_item::<Event>(item);
                self.client.move_item(&from, handled).await?;

                match event {
                    Ok(event) => return Ok(event),
                    Err(err) => tracing::warn!(
                        error = %err,
                        sk = %from.sk,
                        "set aside undecodable scheduled event"
                    ),
                }
            }
        }

        Err(StoreError::not_found("scheduled event", as_of.to_rfc3339()))
    }

    fn buckets(&self, as_of: DateTime<Utc>) -> impl Iterator<Item = ScheduledDayKey> {
        let today = as_of.date_naive();
        let oldest = today
            .checked_sub_days(Days::new(u64::from(self.lookback_days)))
            .unwrap_or(today);

        oldest
            .iter_days()
            .take_while(move |day| *day <= today)
            .map(ScheduledDayKey::new)
    }

    async fn delete_matching(
        &self,
        lpa_uid: &str,
        keep: impl Fn(&ScheduledKey) -> bool,
    ) -> Result<()> {
        let prefix = <ScheduledKey as KeyKind>::PREFIX;

        let keys: Vec<Keys> = self
            .client
            .all_keys_by_lpa_uid(lpa_uid, prefix)
            .await?
            .into_iter()
            .filter(|keys| match &keys.sk {
                SortKey::Scheduled(key) => keep(key),
                _ => false,
            })
            .collect();

        for chunk in keys.chunks(MAX_TRANSACTION_ITEMS) {
            self.client.delete_keys(chunk).await?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::inmemory::InMemoryClient;
    use chrono::{Duration, TimeZone};
    use lpa_core::keys::{DonorKey, HandledDayKey};
    use lpa_core::ports::FixedClock;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 10, 12, 0, 0).unwrap()
    }

    fn setup() -> (ScheduleStore, Arc<InMemoryClient>) {
        let client = Arc::new(InMemoryClient::new());
        let store = ScheduleStore::new(client.clone(), Arc::new(FixedClock::new(now())), 7);
        (store, client)
    }

    fn event(at: DateTime<Utc>, action: Action, uid: &str) -> Event {
        Event::new(
            at,
            action,
            LpaKey::new("lpa-1"),
            LpaOwnerKey::donor(DonorKey::new("donor")),
            uid,
            Uuid::new_v4(),
        )
    }

    // ==================== Put Tests ====================

    #[tokio::test]
    async fn test_put_stamps_created_at() {
        let (store, client) = setup();
        let queued = event(now() - Duration::days(2), Action::ExpireDonorIdentity, "M-1");
        store.put(queued.clone()).await.unwrap();

        let keys = Keys::new(queued.pk.clone(), queued.sk.clone());
        let stored: Event = client.one_as(&keys).await.unwrap();
        assert_eq!(stored.created_at, now());
        assert_eq!(stored.at, queued.at);
    }

    #[tokio::test]
    async fn test_put_same_event_twice_conflicts() {
        let (store, _) = setup();
        let queued = event(now(), Action::ExpireDonorIdentity, "M-1");

        store.put(queued.clone()).await.unwrap();
        let err = store.put(queued).await.unwrap_err();
        assert_eq!(err, StoreError::ConditionalCheckFailed);
    }

    #[tokio::test]
    async fn test_create_is_all_or_nothing() {
        let (store, client) = setup();
        let existing = event(now(), Action::ExpireDonorIdentity, "M-1");
        store.put(existing.clone()).await.unwrap();

        let fresh = event(now(), Action::RemindAttorneyToComplete, "M-1");
        let err = store.create(vec![fresh, existing]).await.unwrap_err();
        assert_eq!(err, StoreError::ConditionalCheckFailed);
        assert_eq!(client.len().await, 1);
    }

    // ==================== Pop Tests ====================

    #[tokio::test]
    async fn test_pop_empty_queue() {
        let (store, _) = setup();
        assert!(store.pop(now()).await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_pop_moves_event_to_handled_partition() {
        let (store, client) = setup();
        let queued = store
            .schedule(
                now() - Duration::hours(1),
                Action::ExpireDonorIdentity,
                LpaKey::new("lpa-1"),
                LpaOwnerKey::donor(DonorKey::new("donor")),
                "M-1",
            )
            .await
            .unwrap();

        let popped = store.pop(now()).await.unwrap();
        assert_eq!(popped.sk, queued.sk);
        assert_eq!(popped.target_lpa_key, LpaKey::new("lpa-1"));

        let handled = Keys::new(
            HandledDayKey::new(queued.pk.date()),
            queued.sk.clone(),
        );
        assert!(client.one(&handled).await.is_ok());
        assert!(store.pop(now()).await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_pop_sweeps_overdue_buckets_oldest_first() {
        let (store, _) = setup();
        store
            .put(event(now() - Duration::days(1), Action::RemindAttorneyToComplete, "M-1"))
            .await
            .unwrap();
        store
            .put(event(now() - Duration::days(3), Action::ExpireDonorIdentity, "M-1"))
            .await
            .unwrap();

        assert_eq!(
            store.pop(now()).await.unwrap().action,
            Action::ExpireDonorIdentity
        );
        assert_eq!(
            store.pop(now()).await.unwrap().action,
            Action::RemindAttorneyToComplete
        );
    }

    #[tokio::test]
    async fn test_pop_sets_aside_undecodable_events() {
        let (store, client) = setup();
        let broken = event(now() - Duration::days(2), Action::ExpireDonorIdentity, "M-1");
        let mut item = lpa_core::storage::to_item(&broken).unwrap();
        item.insert("Action".to_string(), Value::String("not-an-action".to_string()));
        client.create(item).await.unwrap();

        let queued = event(now(), Action::RemindAttorneyToComplete, "M-1");
        store.put(queued.clone()).await.unwrap();

        assert_eq!(store.pop(now()).await.unwrap().sk, queued.sk);
        assert!(store.pop(now()).await.unwrap_err().is_not_found());

        let set_aside = Keys::new(HandledDayKey::new(broken.pk.date()), broken.sk.clone());
        assert!(client.one(&set_aside).await.is_ok());
    }

    #[tokio::test]
    async fn test_pop_ignores_future_and_expired_buckets() {
        let (store, _) = setup();
        store
            .put(event(now() + Duration::days(1), Action::ExpireDonorIdentity, "M-1"))
            .await
            .unwrap();
        store
            .put(event(now() - Duration::days(8), Action::ExpireDonorIdentity, "M-1"))
            .await
            .unwrap();

        assert!(store.pop(now()).await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_concurrent_pops_claim_once() {
        let (store, _) = setup();
        let store = Arc::new(store);
        store
            .put(event(now(), Action::ExpireDonorIdentity, "M-1"))
            .await
            .unwrap();

        let (a, b) = tokio::join!(store.pop(now()), store.pop(now()));
        let claimed = [&a, &b].iter().filter(|result| result.is_ok()).count();
        assert_eq!(claimed, 1);
        assert!([a, b]
            .into_iter()
            .any(|result| matches!(result, Err(err) if err.is_not_found())));
    }

    #[tokio::test]
    async fn test_concurrent_drains_process_each_event_once() {
        let (store, _) = setup();
        let store = Arc::new(store);
        for _ in 0..20 {
            store
                .put(event(now(), Action::ExpireDonorIdentity, "M-1"))
                .await
                .unwrap();
        }

        let drain = |store: Arc<ScheduleStore>| async move {
            let mut seen = Vec::new();
            loop {
                match store.pop(now()).await {
                    Ok(event) => seen.push(event.sk),
                    Err(err) if err.is_not_found() => return seen,
                    Err(StoreError::ConditionalCheckFailed) => continue,
                    Err(err) => panic!("unexpected error: {err}"),
                }
            }
        };

        let (a, b) = tokio::join!(
            tokio::spawn(drain(store.clone())),
            tokio::spawn(drain(store.clone()))
        );
        let mut all: Vec<_> = a.unwrap().into_iter().chain(b.unwrap()).collect();
        all.sort_by_key(|sk| sk.to_string());
        all.dedup();
        assert_eq!(all.len(), 20);
    }

    // ==================== Delete Tests ====================

    #[tokio::test]
    async fn test_delete_all_by_uid_includes_handled() {
        let (store, client) = setup();
        store
            .put(event(now(), Action::ExpireDonorIdentity, "M-1"))
            .await
            .unwrap();
        store
            .put(event(now(), Action::RemindAttorneyToComplete, "M-1"))
            .await
            .unwrap();
        store
            .put(event(now(), Action::RemindAttorneyToComplete, "M-2"))
            .await
            .unwrap();
        store.pop(now()).await.unwrap();

        store.delete_all_by_uid("M-1").await.unwrap();
        assert_eq!(client.len().await, 1);
    }

    #[tokio::test]
    async fn test_delete_all_action_by_uid() {
        let (store, client) = setup();
        store
            .put(event(now(), Action::ExpireDonorIdentity, "M-1"))
            .await
            .unwrap();
        store
            .put(event(now(), Action::RemindAttorneyToComplete, "M-1"))
            .await
            .unwrap();

        store
            .delete_all_action_by_uid(&[Action::RemindAttorneyToComplete], "M-1")
            .await
            .unwrap();

        assert_eq!(client.len().await, 1);
        assert_eq!(
            store.pop(now()).await.unwrap().action,
            Action::ExpireDonorIdentity
        );
    }
}
