use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::{TaskId, UserId};

/// Concurrent-load cap: a user never holds more than this many active tasks.
pub const MAX_ACTIVE_TASKS_PER_USER: usize = 3;

/// A participant in the rotation. Immutable after registration except by removal.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
}

impl User {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: UserId::new(),
            name: name.into(),
        }
    }
}

/// Lifecycle state of a task. `Waiting` is initial, `Completed` is terminal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskState {
    Waiting,
    InProgress,
    Completed,
}

/// A unit of work handed around between users until everyone has touched it.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    pub state: TaskState,
    /// Set iff `state == InProgress`.
    pub assigned_user: Option<UserId>,
    /// Most recent assignee before the current one; barred from immediate re-selection.
    pub previous_user: Option<UserId>,
    /// Chronological record of every assignee, duplicates allowed. Append-only.
    pub assignment_history: Vec<UserId>,
    pub created_at: DateTime<Utc>,
}

impl Task {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: TaskId::new(),
            title: title.into(),
            state: TaskState::Waiting,
            assigned_user: None,
            previous_user: None,
            assignment_history: Vec::new(),
            created_at: Utc::now(),
        }
    }

    /// Non-completed tasks still circulate through the rotation.
    pub fn is_active(&self) -> bool {
        self.state != TaskState::Completed
    }

    /// Number of distinct users that have held this task.
    pub fn visited_users_count(&self) -> usize {
        let mut seen: Vec<&UserId> = Vec::with_capacity(self.assignment_history.len());
        for id in &self.assignment_history {
            if !seen.contains(&id) {
                seen.push(id);
            }
        }
        seen.len()
    }
}
