pub mod app;
pub mod board;
pub mod client;
pub mod config;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod render;
pub mod seed;
pub mod state;
pub mod status;
pub mod view;

pub use app::router;
pub use board::{ActionOutcome, ActivityBoard, Confirm, LoadOutcome};
pub use client::{ActivityApi, HttpActivityApi};
pub use state::AppState;
