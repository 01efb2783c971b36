use std::sync::Arc;
use std::time::Duration;

use rota_core::{EngineError, RotationEvent, Task, TaskId, TaskState, User, UserId};
use rota_store::InMemoryStore;

use crate::assign::{backfill, finalize, try_assign};
use crate::picker::{OsPicker, Picker};
use crate::views::{TaskOverview, UserOverview};

/// All domain rules for registering users, creating tasks and rotating
/// assignments. Every public operation acquires the store boundary exactly
/// once; expected failures come back as `EngineError`, never as panics.
pub struct AssignmentEngine {
    store: Arc<InMemoryStore>,
    picker: Arc<dyn Picker>,
    min_task_age: Duration,
}

impl AssignmentEngine {
    pub fn new(store: Arc<InMemoryStore>) -> Self {
        Self::with_picker(store, Arc::new(OsPicker))
    }

    pub fn with_picker(store: Arc<InMemoryStore>, picker: Arc<dyn Picker>) -> Self {
        Self {
            store,
            picker,
            min_task_age: Duration::ZERO,
        }
    }

    /// Tasks younger than this never complete; keeps a task from being
    /// declared done in the same breath it was created.
    pub fn min_task_age(mut self, age: Duration) -> Self {
        self.min_task_age = age;
        self
    }

    pub fn list_users(&self) -> Vec<UserOverview> {
        self.store.read(|users, tasks| {
            users
                .iter()
                .map(|user| UserOverview::project(user, tasks))
                .collect()
        })
    }

    pub fn get_user(&self, id: &UserId) -> Result<UserOverview, EngineError> {
        self.store.read(|users, tasks| {
            users
                .iter()
                .find(|u| &u.id == id)
                .map(|user| UserOverview::project(user, tasks))
                .ok_or_else(|| EngineError::NotFound("User not found.".into()))
        })
    }

    /// Register a user, then offer every waiting task to the grown roster.
    pub fn register_user(&self, name: &str) -> Result<UserOverview, EngineError> {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(EngineError::Invalid("Name is required.".into()));
        }
        let trimmed = trimmed.to_string();

        self.store.write(|users, tasks| {
            let lowered = trimmed.to_lowercase();
            if users.iter().any(|u| u.name.to_lowercase() == lowered) {
                return Err(EngineError::Duplicate(
                    "A user with the same name already exists.".into(),
                ));
            }

            let user = User::new(trimmed);
            users.push(user.clone());

            let assigned = backfill(users, tasks, self.picker.as_ref(), self.min_task_age);
            if assigned > 0 {
                tracing::info!(
                    user_id = %user.id,
                    assigned = assigned,
                    "Assigned waiting tasks after registering user"
                );
            }

            Ok(UserOverview::project(&user, tasks))
        })
    }

    /// Remove a user, release their tasks, lift their cool-down exclusions
    /// and rerun the backfill pass over whatever came free.
    pub fn remove_user(&self, id: &UserId) -> Result<(), EngineError> {
        self.store.write(|users, tasks| {
            let pos = users
                .iter()
                .position(|u| &u.id == id)
                .ok_or_else(|| EngineError::NotFound("User not found.".into()))?;
            users.remove(pos);

            let mut released = 0;
            for task in tasks.iter_mut().filter(|t| t.is_active()) {
                if task.assigned_user.as_ref() == Some(id) {
                    task.assigned_user = None;
                    task.state = TaskState::Waiting;
                    released += 1;
                }
                if task.previous_user.as_ref() == Some(id) {
                    task.previous_user = None;
                }
            }
            if released > 0 {
                tracing::info!(
                    user_id = %id,
                    released = released,
                    "User removed, tasks returned to waiting"
                );
            }

            let reassigned = backfill(users, tasks, self.picker.as_ref(), self.min_task_age);
            if reassigned > 0 {
                tracing::info!(
                    user_id = %id,
                    reassigned = reassigned,
                    "Reassigned waiting tasks after removing user"
                );
            }

            Ok(())
        })
    }

    pub fn list_tasks(&self) -> Vec<TaskOverview> {
        self.store.read(|users, tasks| {
            tasks
                .iter()
                .map(|task| TaskOverview::project(task, users))
                .collect()
        })
    }

    pub fn get_task(&self, id: &TaskId) -> Result<TaskOverview, EngineError> {
        self.store.read(|users, tasks| {
            tasks
                .iter()
                .find(|t| &t.id == id)
                .map(|task| TaskOverview::project(task, users))
                .ok_or_else(|| EngineError::NotFound("Task not found.".into()))
        })
    }

    /// Create a task and immediately try to hand it to someone.
    ///
    /// Title uniqueness is checked against live tasks only; a completed
    /// task's title may be reused.
    pub fn create_task(&self, title: &str) -> Result<TaskOverview, EngineError> {
        let trimmed = title.trim();
        if trimmed.is_empty() {
            return Err(EngineError::Invalid("Title is required.".into()));
        }
        let trimmed = trimmed.to_string();

        self.store.write(|users, tasks| {
            let lowered = trimmed.to_lowercase();
            if tasks
                .iter()
                .any(|t| t.is_active() && t.title.to_lowercase() == lowered)
            {
                return Err(EngineError::Duplicate(
                    "A task with the same title already exists.".into(),
                ));
            }

            tasks.push(Task::new(trimmed));
            let idx = tasks.len() - 1;
            try_assign(tasks, idx, users, false, self.picker.as_ref());
            finalize(&mut tasks[idx], users, self.min_task_age);

            tracing::debug!(task_id = %tasks[idx].id, state = ?tasks[idx].state, "Task created");
            Ok(TaskOverview::project(&tasks[idx], users))
        })
    }

    /// The periodic sweep: force every live task through selection with its
    /// current holder excluded, then re-check completion.
    ///
    /// Returns the ordered change list for observability; correctness never
    /// depends on callers reading it.
    pub fn rotate(&self) -> Vec<RotationEvent> {
        self.store.write(|users, tasks| {
            let mut events = Vec::new();

            if users.is_empty() {
                // Nobody left to hold anything: release every live task and
                // lift the cool-downs so a future roster starts clean.
                for task in tasks.iter_mut().filter(|t| t.is_active()) {
                    if let Some(from) = task.assigned_user.take() {
                        events.push(RotationEvent::released(task.id.clone(), Some(from)));
                    }
                    task.previous_user = None;
                    task.state = TaskState::Waiting;
                }
                return events;
            }

            for idx in 0..tasks.len() {
                if !tasks[idx].is_active() {
                    continue;
                }

                let previous = tasks[idx].assigned_user.clone();
                let assigned = try_assign(tasks, idx, users, true, self.picker.as_ref());

                let task = &mut tasks[idx];
                if !assigned {
                    if previous.is_some() {
                        events.push(RotationEvent::released(task.id.clone(), previous.clone()));
                    }
                    // One-rotation cool-down: the holder we just released is
                    // barred from the next selection attempt.
                    task.previous_user = previous;
                    task.assigned_user = None;
                    task.state = TaskState::Waiting;
                } else if let Some(to) = task.assigned_user.clone() {
                    if previous.as_ref() != Some(&to) {
                        events.push(RotationEvent::reassigned(task.id.clone(), previous, to));
                    }
                }

                finalize(&mut tasks[idx], users, self.min_task_age);
            }

            events
        })
    }

    /// Live entity counts, for the health endpoint.
    pub fn counts(&self) -> (usize, usize) {
        self.store.read(|users, tasks| (users.len(), tasks.len()))
    }
}
