use crate::handlers;
use crate::state::AppState;
use axum::{
    routing::{delete, get, post},
    Router,
};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/habits", get(handlers::list_habits).post(handlers::create_habit))
        .route(
            "/api/habits/:id",
            get(handlers::get_habit)
                .put(handlers::update_habit)
                .delete(handlers::delete_habit),
        )
        .route("/api/habits/:id/toggle", post(handlers::toggle_habit))
        .route("/api/dashboard", get(handlers::get_dashboard))
        .route("/api/friends", get(handlers::list_friends).post(handlers::add_friend))
        .route("/api/friends/:id", delete(handlers::remove_friend))
        .route(
            "/api/friends/:id/chat",
            get(handlers::get_chat)
                .post(handlers::open_chat)
                .delete(handlers::close_chat),
        )
        .route("/api/friends/:id/chat/messages", post(handlers::send_message))
        .route("/api/discover", get(handlers::discover))
        .route("/api/feed", get(handlers::get_feed))
        .route("/api/achievements", get(handlers::get_achievements))
        .with_state(state)
}
