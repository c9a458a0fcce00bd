use crate::chat::ChatSession;
use crate::errors::AppError;
use crate::friends::discovered_friend;
use crate::models::{
    AddFriendRequest, ChatMessage, DashboardResponse, DiscoverQuery, Friend, Habit, HabitListQuery, NewHabit,
    SendMessageRequest,
};
use crate::social::{
    build_achievements, build_feed, mark_following, search_users, suggested_users, AchievementQuery,
    AchievementsResponse, DiscoveredUser, FeedItem,
};
use crate::state::AppState;
use crate::views::{build_dashboard, filter_habits};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;

pub async fn list_habits(
    State(state): State<AppState>,
    Query(query): Query<HabitListQuery>,
) -> Json<Vec<Habit>> {
    let habits = state.habits.lock().await;
    Json(filter_habits(habits.habits(), query.filter))
}

pub async fn create_habit(
    State(state): State<AppState>,
    Json(payload): Json<NewHabit>,
) -> Result<(StatusCode, Json<Habit>), AppError> {
    let mut habits = state.habits.lock().await;
    let habit = habits.create_habit(payload).await?;
    Ok((StatusCode::CREATED, Json(habit)))
}

pub async fn get_habit(State(state): State<AppState>, Path(id): Path<String>) -> Result<Json<Habit>, AppError> {
    let habits = state.habits.lock().await;
    habits
        .get(&id)
        .cloned()
        .map(Json)
        .ok_or_else(|| AppError::not_found(format!("habit {id} not found")))
}

pub async fn update_habit(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<Habit>,
) -> Result<Json<Vec<Habit>>, AppError> {
    let mut habits = state.habits.lock().await;
    habits.update_habit(&id, payload).await?;
    Ok(Json(habits.habits().to_vec()))
}

pub async fn toggle_habit(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Vec<Habit>>, AppError> {
    let mut habits = state.habits.lock().await;
    habits.toggle_completion(&id).await?;
    Ok(Json(habits.habits().to_vec()))
}

pub async fn delete_habit(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Vec<Habit>>, AppError> {
    let mut habits = state.habits.lock().await;
    habits.delete_habit(&id).await?;
    Ok(Json(habits.habits().to_vec()))
}

pub async fn get_dashboard(State(state): State<AppState>) -> Json<DashboardResponse> {
    let habits = state.habits.lock().await;
    Json(build_dashboard(habits.habits()))
}

pub async fn list_friends(State(state): State<AppState>) -> Json<Vec<Friend>> {
    let friends = state.friends.lock().await;
    Json(friends.friends().to_vec())
}

pub async fn add_friend(
    State(state): State<AppState>,
    Json(payload): Json<AddFriendRequest>,
) -> Result<Json<Vec<Friend>>, AppError> {
    let id = payload.id.trim();
    let name = payload.name.trim();
    if id.is_empty() || name.is_empty() {
        return Err(AppError::bad_request("friend id and name are required"));
    }

    let mut friends = state.friends.lock().await;
    friends.add_friend(discovered_friend(id, name, payload.avatar)).await?;
    Ok(Json(friends.friends().to_vec()))
}

pub async fn remove_friend(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Vec<Friend>>, AppError> {
    let remaining = {
        let mut friends = state.friends.lock().await;
        friends.remove_friend(&id).await?;
        friends.friends().to_vec()
    };
    state.chats.lock().await.remove(&id);
    Ok(Json(remaining))
}

pub async fn open_chat(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Vec<ChatMessage>>, AppError> {
    let friend = {
        let friends = state.friends.lock().await;
        friends
            .get(&id)
            .cloned()
            .ok_or_else(|| AppError::not_found(format!("friend {id} not found")))?
    };

    let session = ChatSession::open(friend);
    let messages = session.messages().await;
    state.chats.lock().await.insert(id, session);
    Ok(Json(messages))
}

pub async fn get_chat(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Vec<ChatMessage>>, AppError> {
    let chats = state.chats.lock().await;
    let session = chats
        .get(&id)
        .ok_or_else(|| AppError::not_found(format!("no open chat with {id}")))?;
    Ok(Json(session.messages().await))
}

pub async fn send_message(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<SendMessageRequest>,
) -> Result<Json<Vec<ChatMessage>>, AppError> {
    let mut chats = state.chats.lock().await;
    let session = chats
        .get_mut(&id)
        .ok_or_else(|| AppError::not_found(format!("no open chat with {id}")))?;
    session.send(&payload.text).await;
    Ok(Json(session.messages().await))
}

pub async fn close_chat(State(state): State<AppState>, Path(id): Path<String>) -> StatusCode {
    state.chats.lock().await.remove(&id);
    StatusCode::NO_CONTENT
}

pub async fn discover(
    State(state): State<AppState>,
    Query(query): Query<DiscoverQuery>,
) -> Json<Vec<DiscoveredUser>> {
    let suggested = suggested_users();
    let mut users = if query.q.trim().is_empty() {
        suggested
    } else {
        search_users(&query.q, &suggested, Utc::now().timestamp_millis())
    };

    let friends = state.friends.lock().await;
    mark_following(&mut users, friends.friends());
    Json(users)
}

pub async fn get_feed() -> Json<Vec<FeedItem>> {
    Json(build_feed(Utc::now()))
}

pub async fn get_achievements(Query(query): Query<AchievementQuery>) -> Json<AchievementsResponse> {
    Json(build_achievements(query.filter))
}
