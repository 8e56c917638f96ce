//! Room endpoints.

use super::AppState;
use crate::error::Result;
use crate::store::{NewRoom, RoomSummary};
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use std::sync::Arc;
use uuid::Uuid;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct CreateRoomResponse {
    room_id: Uuid,
}

pub(super) async fn list_rooms(State(state): State<Arc<AppState>>) -> Result<Json<Vec<RoomSummary>>> {
    Ok(Json(state.rooms.list_rooms().await?))
}

pub(super) async fn create_room(
    State(state): State<Arc<AppState>>,
    payload: std::result::Result<Json<NewRoom>, JsonRejection>,
) -> Result<(StatusCode, Json<CreateRoomResponse>)> {
    let Json(room) = payload?;
    let room_id = state.rooms.create_room(&room).await?;
    Ok((StatusCode::CREATED, Json(CreateRoomResponse { room_id })))
}
