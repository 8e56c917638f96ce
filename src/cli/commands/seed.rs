//! Seed command implementation.

use crate::cli::Output;
use crate::config::Settings;
use crate::store::{NewRoom, RoomStore, SqliteStore};
use anyhow::Result;

const ADJECTIVES: &[&str] = &[
    "Northern", "Silver", "Open", "Bright", "Quiet", "Golden", "Central", "Blue", "Summit",
    "Harbor",
];

const NOUNS: &[&str] = &[
    "Labs", "Systems", "Studio", "Works", "Collective", "Partners", "Academy", "Forum",
    "Institute", "Guild",
];

const DESCRIPTION: &str = "Lorem ipsum dolor sit amet, consectetur adipiscing elit, \
sed do eiusmod tempor incididunt ut labore et dolore magna aliqua.";

/// Run the seed command.
pub async fn run_seed(count: usize, reset: bool, settings: &Settings) -> Result<()> {
    let store = SqliteStore::new(&settings.database_path())?;

    if reset {
        store.reset()?;
        Output::warning("Deleted all rooms, questions and audio chunks.");
    }

    let mut created = 0;
    for room in sample_rooms(count) {
        if store.create_room(&room).await?.is_some() {
            created += 1;
        }
    }

    Output::success(&format!("Created {} rooms.", created));
    Ok(())
}

/// Deterministic sample rooms with company-style names.
pub(crate) fn sample_rooms(count: usize) -> Vec<NewRoom> {
    (0..count)
        .map(|i| {
            let adjective = ADJECTIVES[i % ADJECTIVES.len()];
            let noun = NOUNS[(i / ADJECTIVES.len() + i) % NOUNS.len()];
            let round = i / (ADJECTIVES.len() * NOUNS.len());

            let name = if round == 0 {
                format!("{} {}", adjective, noun)
            } else {
                format!("{} {} {}", adjective, noun, round + 1)
            };
            NewRoom::new(name, Some(DESCRIPTION.to_string()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_sample_rooms() {
        let rooms = sample_rooms(10);
        assert_eq!(rooms.len(), 10);
        assert_eq!(rooms[0].name, "Northern Labs");
        assert!(rooms.iter().all(|r| !r.name.is_empty() && r.description.is_some()));
    }

    #[test]
    fn test_sample_room_names_are_unique() {
        let rooms = sample_rooms(250);
        let names: HashSet<_> = rooms.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names.len(), 250);
    }

    #[tokio::test]
    async fn test_seed_into_store() {
        let store = SqliteStore::in_memory().unwrap();
        for room in sample_rooms(3) {
            store.create_room(&room).await.unwrap();
        }
        assert_eq!(store.list_rooms().await.unwrap().len(), 3);

        store.reset().unwrap();
        assert!(store.list_rooms().await.unwrap().is_empty());
    }
}
