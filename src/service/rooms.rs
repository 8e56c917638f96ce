//! Room creation and listing.

use crate::error::{AuditoriumError, Result};
use crate::store::{NewRoom, RoomStore, RoomSummary};
use std::sync::Arc;
use tracing::{info, instrument};
use uuid::Uuid;

/// Creates and lists rooms.
#[derive(Clone)]
pub struct RoomService {
    rooms: Arc<dyn RoomStore>,
}

impl RoomService {
    pub fn new(rooms: Arc<dyn RoomStore>) -> Self {
        Self { rooms }
    }

    /// Create a room and return its ID.
    ///
    /// Name validation is left to the store; an empty name fails as a
    /// persistence error.
    #[instrument(skip(self, room), fields(name = %room.name))]
    pub async fn create_room(&self, room: &NewRoom) -> Result<Uuid> {
        let created = self
            .rooms
            .create_room(room)
            .await?
            .ok_or(AuditoriumError::RoomCreationFailed)?;

        info!("Created room {}", created.id);
        Ok(created.id)
    }

    /// List every room with its question count, oldest first.
    pub async fn list_rooms(&self) -> Result<Vec<RoomSummary>> {
        self.rooms.list_rooms().await
    }
}
