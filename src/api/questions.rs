//! Question endpoints.

use super::AppState;
use crate::error::Result;
use crate::service::CreatedQuestion;
use crate::store::Question;
use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;

#[derive(Deserialize)]
pub(super) struct CreateQuestionRequest {
    question: String,
}

pub(super) async fn list_questions(
    State(state): State<Arc<AppState>>,
    room_id: std::result::Result<Path<Uuid>, PathRejection>,
) -> Result<Json<Vec<Question>>> {
    let Path(room_id) = room_id?;
    Ok(Json(state.questions.list_questions(room_id).await?))
}

pub(super) async fn create_question(
    State(state): State<Arc<AppState>>,
    room_id: std::result::Result<Path<Uuid>, PathRejection>,
    payload: std::result::Result<Json<CreateQuestionRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<CreatedQuestion>)> {
    let Path(room_id) = room_id?;
    let Json(req) = payload?;

    let created = state.questions.create_question(room_id, &req.question).await?;
    Ok((StatusCode::CREATED, Json(created)))
}
