use crate::errors::StoreError;
use crate::models::{Friend, Habit};
use crate::storage::{SlotStore, FRIENDS_SLOT, HABITS_SLOT};
use serde::{de::DeserializeOwned, Serialize};
use tracing::debug;

/// A record persisted as one element of a slot array.
pub trait Record: Serialize + DeserializeOwned + Clone {
    const SLOT: &'static str;

    fn id(&self) -> &str;
}

impl Record for Habit {
    const SLOT: &'static str = HABITS_SLOT;

    fn id(&self) -> &str {
        &self.id
    }
}

impl Record for Friend {
    const SLOT: &'static str = FRIENDS_SLOT;

    fn id(&self) -> &str {
        &self.id
    }
}

/// In-memory working copy of one slot. Every mutation goes through
/// [`Collection::apply`], which writes the full list back.
#[derive(Debug)]
pub struct Collection<T: Record> {
    store: SlotStore,
    items: Vec<T>,
}

impl<T: Record> Collection<T> {
    pub async fn load(store: SlotStore) -> Self {
        let items = dedupe(store.load(T::SLOT).await);
        debug!("loaded {} records from slot {}", items.len(), T::SLOT);
        Self { store, items }
    }

    #[cfg(test)]
    pub(crate) fn from_items(store: SlotStore, items: Vec<T>) -> Self {
        Self {
            store,
            items: dedupe(items),
        }
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&T> {
        self.items.iter().find(|item| item.id() == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    /// Runs `change` on a copy of the records and writes the copy to the slot.
    /// The in-memory list only takes the new records once the write succeeded,
    /// so a failed save leaves the collection as it was.
    pub(crate) async fn apply<R>(&mut self, change: impl FnOnce(&mut Vec<T>) -> R) -> Result<R, StoreError> {
        let mut candidate = self.items.clone();
        let outcome = change(&mut candidate);
        let candidate = dedupe(candidate);
        self.store.save(T::SLOT, &candidate).await?;
        self.items = candidate;
        Ok(outcome)
    }

    /// Writes the current records back unchanged.
    pub async fn persist(&self) -> Result<(), StoreError> {
        self.store.save(T::SLOT, &self.items).await
    }
}

/// Keeps the first record for each id so lookups stay unambiguous even when a
/// slot was edited by hand.
fn dedupe<T: Record>(items: Vec<T>) -> Vec<T> {
    let mut seen = std::collections::HashSet::new();
    items
        .into_iter()
        .filter(|item| seen.insert(item.id().to_string()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::FriendStatus;
    use crate::storage::test_support::temp_store;

    fn friend(id: &str) -> Friend {
        Friend {
            id: id.to_string(),
            name: format!("Friend {id}"),
            avatar: None,
            last_active: "Just now".into(),
            status: FriendStatus::Online,
        }
    }

    #[tokio::test]
    async fn load_drops_duplicate_ids() {
        let (_dir, store) = temp_store();
        store
            .save(FRIENDS_SLOT, &[friend("a"), friend("b"), friend("a")])
            .await
            .unwrap();
        let collection = Collection::<Friend>::load(store).await;
        assert_eq!(collection.len(), 2);
    }

    #[tokio::test]
    async fn failed_write_leaves_records_untouched() {
        let (dir, store) = temp_store();
        let mut collection = Collection::<Friend>::load(store.clone()).await;
        collection.apply(|items| items.push(friend("a"))).await.unwrap();

        std::fs::remove_dir_all(dir.path()).unwrap();
        let err = collection.apply(|items| items.clear()).await;
        assert!(matches!(err, Err(StoreError::Write { .. })));
        assert!(collection.contains("a"));

        std::fs::create_dir_all(dir.path()).unwrap();
        collection.apply(|items| items.push(friend("b"))).await.unwrap();
        let stored: Vec<Friend> = store.load(FRIENDS_SLOT).await;
        assert_eq!(stored.iter().map(|friend| friend.id.as_str()).collect::<Vec<_>>(), ["a", "b"]);
    }

    #[tokio::test]
    async fn persist_round_trips_through_slot() {
        let (_dir, store) = temp_store();
        let mut collection = Collection::<Friend>::load(store.clone()).await;
        assert!(collection.is_empty());

        collection.apply(|items| items.push(friend("x"))).await.unwrap();

        let reloaded = Collection::<Friend>::load(store).await;
        assert!(reloaded.contains("x"));
        assert_eq!(reloaded.items(), collection.items());
    }
}
