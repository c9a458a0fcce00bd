use crate::errors::StoreError;
use crate::models::{Friend, FriendStatus};
use crate::repository::Collection;
use crate::storage::SlotStore;
use tracing::info;

/// Friend list persisted in the `friends` slot. Friends are only ever added or
/// removed; there is no edit.
#[derive(Debug)]
pub struct FriendRepository {
    friends: Collection<Friend>,
}

impl FriendRepository {
    pub async fn load(store: SlotStore) -> Self {
        Self {
            friends: Collection::load(store).await,
        }
    }

    pub fn friends(&self) -> &[Friend] {
        self.friends.items()
    }

    pub fn get(&self, id: &str) -> Option<&Friend> {
        self.friends.get(id)
    }

    /// Returns `false` without writing when the id is already a friend.
    pub async fn add_friend(&mut self, friend: Friend) -> Result<bool, StoreError> {
        if self.friends.contains(&friend.id) {
            return Ok(false);
        }
        let label = format!("{} ({})", friend.id, friend.name);
        self.friends.apply(|friends| friends.push(friend)).await?;
        info!("added friend {label}");
        Ok(true)
    }

    pub async fn remove_friend(&mut self, id: &str) -> Result<Option<Friend>, StoreError> {
        let removed = self
            .friends
            .apply(|friends| {
                let index = friends.iter().position(|friend| friend.id == id)?;
                Some(friends.remove(index))
            })
            .await?;
        if removed.is_some() {
            info!("removed friend {id}");
        }
        Ok(removed)
    }

    pub async fn seed_samples(&mut self) -> Result<bool, StoreError> {
        if !self.friends.is_empty() {
            return Ok(false);
        }
        self.friends.apply(|friends| *friends = sample_friends()).await?;
        info!("seeded {} sample friends", self.friends.len());
        Ok(true)
    }
}

/// A user picked from discovery becomes a friend who was just seen online.
pub fn discovered_friend(id: &str, name: &str, avatar: Option<String>) -> Friend {
    Friend {
        id: id.to_string(),
        name: name.to_string(),
        avatar,
        last_active: "Just now".to_string(),
        status: FriendStatus::Online,
    }
}

fn sample_friend(id: &str, name: &str, avatar: &str, last_active: &str, status: FriendStatus) -> Friend {
    Friend {
        id: id.to_string(),
        name: name.to_string(),
        avatar: Some(avatar.to_string()),
        last_active: last_active.to_string(),
        status,
    }
}

pub fn sample_friends() -> Vec<Friend> {
    vec![
        sample_friend("user1", "Alex Johnson", "/avatars/alex.jpg", "5 min ago", FriendStatus::Online),
        sample_friend("user2", "Sarah Williams", "/avatars/sarah.jpg", "2 hours ago", FriendStatus::Offline),
        sample_friend("user3", "Mike Chen", "/avatars/mike.jpg", "Just now", FriendStatus::Online),
        sample_friend("user4", "Jessica Lee", "/avatars/jessica.jpg", "1 day ago", FriendStatus::Offline),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::test_support::temp_store;
    use crate::storage::FRIENDS_SLOT;

    #[tokio::test]
    async fn add_is_idempotent_per_id() {
        let (_dir, store) = temp_store();
        let mut repo = FriendRepository::load(store.clone()).await;

        assert!(repo.add_friend(discovered_friend("user5", "John Smith", None)).await.unwrap());
        assert!(!repo.add_friend(discovered_friend("user5", "John Again", None)).await.unwrap());

        let stored: Vec<Friend> = store.load(FRIENDS_SLOT).await;
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].name, "John Smith");
        assert_eq!(stored[0].status, FriendStatus::Online);
        assert_eq!(stored[0].last_active, "Just now");
    }

    #[tokio::test]
    async fn remove_persists_and_ignores_unknown_ids() {
        let (_dir, store) = temp_store();
        let mut repo = FriendRepository::load(store.clone()).await;
        repo.seed_samples().await.unwrap();

        let removed = repo.remove_friend("user2").await.unwrap();
        assert_eq!(removed.map(|friend| friend.name), Some("Sarah Williams".to_string()));
        assert!(repo.remove_friend("user2").await.unwrap().is_none());

        let reloaded = FriendRepository::load(store).await;
        assert_eq!(reloaded.friends().len(), 3);
        assert!(reloaded.get("user2").is_none());
    }

    #[tokio::test]
    async fn failed_write_abandons_add_and_remove() {
        let (dir, store) = temp_store();
        let mut repo = FriendRepository::load(store).await;
        repo.seed_samples().await.unwrap();

        std::fs::remove_dir_all(dir.path()).unwrap();
        assert!(repo.add_friend(discovered_friend("user5", "John Smith", None)).await.is_err());
        assert!(repo.remove_friend("user1").await.is_err());

        assert!(repo.get("user5").is_none());
        assert!(repo.get("user1").is_some());
        assert_eq!(repo.friends().len(), 4);
    }

    #[tokio::test]
    async fn corrupted_friends_slot_starts_empty() {
        let (_dir, store) = temp_store();
        store.write_raw(FRIENDS_SLOT, "[{oops").await.unwrap();
        let repo = FriendRepository::load(store).await;
        assert!(repo.friends().is_empty());
    }
}
