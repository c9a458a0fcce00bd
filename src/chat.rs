use crate::models::{ChatMessage, Friend, FriendStatus};
use chrono::{DateTime, Duration as ChronoDuration, Utc};
use rand::Rng;
use std::ops::RangeInclusive;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::debug;

pub const CURRENT_USER: &str = "currentUser";

pub const REPLY_DELAY_MS: RangeInclusive<u64> = 1_000..=3_000;

pub const AUTO_REPLIES: &[&str] = &[
    "That's great to hear!",
    "I'm working on that habit too.",
    "How's your progress with your habits going?",
    "Thanks for checking in!",
    "I just completed my daily meditation.",
    "Let's catch up soon about our habit progress.",
];

/// An open conversation with one friend. Messages live only as long as the
/// session. Pending auto-replies are owned by the session and aborted when it
/// is closed or dropped.
#[derive(Debug)]
pub struct ChatSession {
    friend: Friend,
    messages: Arc<Mutex<Vec<ChatMessage>>>,
    next_id: Arc<AtomicU64>,
    pending: Vec<JoinHandle<()>>,
}

impl ChatSession {
    pub fn open(friend: Friend) -> Self {
        let messages = seed_messages(&friend.id, Utc::now());
        let next_id = messages.len() as u64 + 1;
        debug!("opened chat with {}", friend.id);
        Self {
            friend,
            messages: Arc::new(Mutex::new(messages)),
            next_id: Arc::new(AtomicU64::new(next_id)),
            pending: Vec::new(),
        }
    }

    pub fn friend(&self) -> &Friend {
        &self.friend
    }

    pub async fn messages(&self) -> Vec<ChatMessage> {
        self.messages.lock().await.clone()
    }

    /// Appends a message from the current user. Blank text is ignored. An
    /// online friend answers after a random delay.
    pub async fn send(&mut self, text: &str) -> Option<ChatMessage> {
        if text.trim().is_empty() {
            return None;
        }

        let message = ChatMessage {
            id: allocate_id(&self.next_id),
            sender_id: CURRENT_USER.to_string(),
            receiver_id: self.friend.id.clone(),
            text: text.to_string(),
            timestamp: Utc::now(),
        };
        self.messages.lock().await.push(message.clone());

        if self.friend.status == FriendStatus::Online {
            self.schedule_reply();
        }
        Some(message)
    }

    #[cfg(test)]
    pub(crate) fn transcript(&self) -> Arc<Mutex<Vec<ChatMessage>>> {
        Arc::clone(&self.messages)
    }

    pub fn pending_replies(&mut self) -> usize {
        self.pending.retain(|handle| !handle.is_finished());
        self.pending.len()
    }

    pub fn close(&mut self) {
        for handle in self.pending.drain(..) {
            handle.abort();
        }
    }

    fn schedule_reply(&mut self) {
        let (delay, text) = {
            let mut rng = rand::thread_rng();
            let delay = Duration::from_millis(rng.gen_range(REPLY_DELAY_MS));
            let text = AUTO_REPLIES[rng.gen_range(0..AUTO_REPLIES.len())];
            (delay, text)
        };

        let messages = Arc::clone(&self.messages);
        let next_id = Arc::clone(&self.next_id);
        let friend_id = self.friend.id.clone();

        self.pending.retain(|handle| !handle.is_finished());
        self.pending.push(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let reply = ChatMessage {
                id: allocate_id(&next_id),
                sender_id: friend_id,
                receiver_id: CURRENT_USER.to_string(),
                text: text.to_string(),
                timestamp: Utc::now(),
            };
            debug!("auto-reply from {}", reply.sender_id);
            messages.lock().await.push(reply);
        }));
    }
}

impl Drop for ChatSession {
    fn drop(&mut self) {
        self.close();
    }
}

fn allocate_id(counter: &AtomicU64) -> String {
    counter.fetch_add(1, Ordering::Relaxed).to_string()
}

fn seed_messages(friend_id: &str, now: DateTime<Utc>) -> Vec<ChatMessage> {
    let script: [(bool, &str, ChronoDuration); 4] = [
        (true, "Hey, how are you doing?", ChronoDuration::minutes(120)),
        (
            false,
            "I'm doing great! Just finished my morning workout routine.",
            ChronoDuration::minutes(90),
        ),
        (
            true,
            "That's awesome! Which habits did you complete today?",
            ChronoDuration::minutes(60),
        ),
        (
            false,
            "Meditation, reading, and exercise! I'm on a 7-day streak for meditation now!",
            ChronoDuration::minutes(30),
        ),
    ];

    script
        .into_iter()
        .enumerate()
        .map(|(index, (from_me, text, ago))| {
            let (sender, receiver) = if from_me {
                (CURRENT_USER, friend_id)
            } else {
                (friend_id, CURRENT_USER)
            };
            ChatMessage {
                id: (index + 1).to_string(),
                sender_id: sender.to_string(),
                receiver_id: receiver.to_string(),
                text: text.to_string(),
                timestamp: now - ago,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::sleep;

    fn friend(status: FriendStatus) -> Friend {
        Friend {
            id: "user1".into(),
            name: "Alex Johnson".into(),
            avatar: None,
            last_active: "5 min ago".into(),
            status,
        }
    }

    #[tokio::test]
    async fn opening_seeds_four_messages() {
        let session = ChatSession::open(friend(FriendStatus::Offline));
        let messages = session.messages().await;
        assert_eq!(messages.len(), 4);
        assert_eq!(messages[0].sender_id, CURRENT_USER);
        assert_eq!(messages[1].sender_id, "user1");
        assert!(messages.windows(2).all(|pair| pair[0].timestamp < pair[1].timestamp));
    }

    #[tokio::test]
    async fn blank_messages_are_ignored() {
        let mut session = ChatSession::open(friend(FriendStatus::Online));
        assert!(session.send("   ").await.is_none());
        assert_eq!(session.messages().await.len(), 4);
        assert_eq!(session.pending_replies(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn online_friend_replies_after_delay() {
        let mut session = ChatSession::open(friend(FriendStatus::Online));
        let sent = session.send("Morning run done").await.unwrap();
        assert_eq!(sent.receiver_id, "user1");
        assert_eq!(session.messages().await.len(), 5);

        sleep(Duration::from_millis(990)).await;
        assert_eq!(session.messages().await.len(), 5);

        sleep(Duration::from_millis(2_100)).await;
        let messages = session.messages().await;
        assert_eq!(messages.len(), 6);
        let reply = messages.last().unwrap();
        assert_eq!(reply.sender_id, "user1");
        assert_eq!(reply.receiver_id, CURRENT_USER);
        assert!(AUTO_REPLIES.contains(&reply.text.as_str()));
        assert_ne!(reply.id, sent.id);
        assert_eq!(session.pending_replies(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn offline_friend_never_replies() {
        let mut session = ChatSession::open(friend(FriendStatus::Offline));
        session.send("Are you there?").await.unwrap();
        assert_eq!(session.pending_replies(), 0);

        sleep(Duration::from_secs(5)).await;
        assert_eq!(session.messages().await.len(), 5);
    }

    #[tokio::test(start_paused = true)]
    async fn closing_cancels_pending_replies() {
        let mut session = ChatSession::open(friend(FriendStatus::Online));
        session.send("Bye").await.unwrap();
        assert_eq!(session.pending_replies(), 1);

        session.close();
        sleep(Duration::from_secs(5)).await;
        assert_eq!(session.messages().await.len(), 5);
        assert_eq!(session.pending_replies(), 0);
    }
}
