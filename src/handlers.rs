use crate::errors::AppError;
use crate::models::{Catalog, EmailQuery, MessageResponse};
use crate::render::render_page;
use crate::state::AppState;
use crate::view::{BoardView, Screen};
use axum::{
    extract::{rejection::QueryRejection, Path, Query, State},
    response::Html,
    Json,
};
use tracing::info;

pub async fn index(State(state): State<AppState>) -> Result<Html<String>, AppError> {
    let catalog = state.catalog.lock().await;
    let page = render_page(&Screen::ready(BoardView::from_catalog(&catalog))).map_err(AppError::internal)?;
    Ok(Html(page))
}

pub async fn list_activities(State(state): State<AppState>) -> Json<Catalog> {
    let catalog = state.catalog.lock().await;
    Json(catalog.clone())
}

pub async fn signup(
    State(state): State<AppState>,
    Path(activity_name): Path<String>,
    query: Result<Query<EmailQuery>, QueryRejection>,
) -> Result<Json<MessageResponse>, AppError> {
    let Query(query) = query?;
    let mut catalog = state.catalog.lock().await;
    let activity = catalog
        .get_mut(&activity_name)
        .ok_or_else(|| AppError::not_found("Activity not found"))?;

    if activity.participants.contains(&query.email) {
        return Err(AppError::bad_request("Student is already signed up"));
    }

    activity.participants.push(query.email.clone());
    info!(activity = %activity_name, email = %query.email, "participant signed up");

    Ok(Json(MessageResponse {
        message: format!("Signed up {} for {}", query.email, activity_name),
    }))
}

pub async fn unregister(
    State(state): State<AppState>,
    Path(activity_name): Path<String>,
    query: Result<Query<EmailQuery>, QueryRejection>,
) -> Result<Json<MessageResponse>, AppError> {
    let Query(query) = query?;
    let mut catalog = state.catalog.lock().await;
    let activity = catalog
        .get_mut(&activity_name)
        .ok_or_else(|| AppError::not_found("Activity not found"))?;

    let position = activity
        .participants
        .iter()
        .position(|email| *email == query.email)
        .ok_or_else(|| AppError::not_found("Student not found in this activity"))?;

    activity.participants.remove(position);
    info!(activity = %activity_name, email = %query.email, "participant removed");

    Ok(Json(MessageResponse {
        message: format!("Removed {} from {}", query.email, activity_name),
    }))
}
