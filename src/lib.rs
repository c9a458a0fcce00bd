pub mod app;
pub mod chat;
pub mod config;
pub mod errors;
pub mod friends;
pub mod habits;
pub mod handlers;
pub mod models;
pub mod repository;
pub mod social;
pub mod state;
pub mod storage;
pub mod synthetic;
pub mod views;

pub use app::router;
pub use config::Config;
pub use state::AppState;
pub use storage::SlotStore;
