use crate::handlers;
use crate::state::AppState;
use axum::{
    routing::{delete, get, post},
    Router,
};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/activities", get(handlers::list_activities))
        .route("/activities/:activity_name/signup", post(handlers::signup))
        .route("/activities/:activity_name/unregister", delete(handlers::unregister))
        .with_state(state)
}
