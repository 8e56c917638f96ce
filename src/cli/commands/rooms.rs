//! Rooms command implementation.

use crate::cli::Output;
use crate::config::Settings;
use crate::store::{RoomStore, SqliteStore};
use anyhow::Result;

/// Run the rooms command.
pub async fn run_rooms(settings: &Settings) -> Result<()> {
    let store = SqliteStore::new(&settings.database_path())?;
    let rooms = store.list_rooms().await?;

    if rooms.is_empty() {
        Output::info("No rooms yet. Use 'auditorium seed' or POST /rooms to add one.");
        return Ok(());
    }

    Output::header(&format!("Rooms ({})", rooms.len()));
    println!();

    for room in &rooms {
        Output::room_info(
            &room.name,
            &room.id.to_string(),
            room.question_count,
            &room.created_at.format("%Y-%m-%d %H:%M").to_string(),
        );
    }

    let total: u32 = rooms.iter().map(|r| r.question_count).sum();
    println!();
    Output::kv("Total rooms", &rooms.len().to_string());
    Output::kv("Total questions", &total.to_string());

    Ok(())
}
