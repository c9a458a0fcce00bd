use crate::chat::ChatSession;
use crate::errors::StoreError;
use crate::friends::FriendRepository;
use crate::habits::HabitRepository;
use crate::storage::SlotStore;
use std::{collections::HashMap, sync::Arc};
use tokio::sync::Mutex;

#[derive(Clone)]
pub struct AppState {
    pub habits: Arc<Mutex<HabitRepository>>,
    pub friends: Arc<Mutex<FriendRepository>>,
    /// Open chats keyed by friend id. Dropping a session cancels its replies.
    pub chats: Arc<Mutex<HashMap<String, ChatSession>>>,
}

impl AppState {
    pub fn new(habits: HabitRepository, friends: FriendRepository) -> Self {
        Self {
            habits: Arc::new(Mutex::new(habits)),
            friends: Arc::new(Mutex::new(friends)),
            chats: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    pub async fn load(store: SlotStore) -> Self {
        let habits = HabitRepository::load(store.clone()).await;
        let friends = FriendRepository::load(store).await;
        Self::new(habits, friends)
    }

    pub async fn seed_samples(&self) -> Result<(), StoreError> {
        self.habits.lock().await.seed_samples().await?;
        self.friends.lock().await.seed_samples().await?;
        Ok(())
    }
}
