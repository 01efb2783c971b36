use rota_core::{Task, User};

use crate::InMemoryStore;

const DEMO_USERS: [&str; 10] = [
    "Liam", "Noah", "Oliver", "Theodore", "James", "Henry", "Mateo", "Elijah", "Lucas", "William",
];

const DEMO_TASKS: [&str; 20] = [
    "Ride", "Sit down", "Win", "Drink", "Knit", "Stand", "Throw", "Close", "Open", "Skip",
    "Sleep", "Cut", "Eat", "Cook", "Sip", "Fight", "Play", "Give", "Dig", "Bath",
];

/// Populate the store with the demo roster and task list.
///
/// Only seeds when both collections are empty; calling it again is a no-op,
/// so repeated seed requests cannot introduce duplicate names or titles.
/// Returns whether anything was inserted.
pub fn seed_demo_data(store: &InMemoryStore) -> bool {
    let seeded = store.write(|users, tasks| {
        if !users.is_empty() || !tasks.is_empty() {
            return false;
        }
        users.extend(DEMO_USERS.iter().copied().map(User::new));
        tasks.extend(DEMO_TASKS.iter().copied().map(Task::new));
        true
    });

    if seeded {
        tracing::info!(
            users = DEMO_USERS.len(),
            tasks = DEMO_TASKS.len(),
            "Seeded demo data"
        );
    }
    seeded
}
