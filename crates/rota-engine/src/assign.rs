//! The selection algorithm and completion rule. Both operate in-place on
//! tasks inside the store's exclusive scope; callers hold the boundary.

use std::collections::HashMap;
use std::time::Duration;

use rota_core::{Task, TaskState, User, UserId, MAX_ACTIVE_TASKS_PER_USER};

use crate::picker::Picker;

/// Per-user count of non-completed tasks currently assigned, over all tasks.
pub fn active_counts(tasks: &[Task]) -> HashMap<UserId, usize> {
    let mut counts = HashMap::new();
    for task in tasks {
        if !task.is_active() {
            continue;
        }
        if let Some(assignee) = &task.assigned_user {
            *counts.entry(assignee.clone()).or_insert(0) += 1;
        }
    }
    counts
}

/// Attempt to assign `tasks[idx]` to one eligible user, in place.
///
/// Eligibility: active load below the cap, and neither the task's current
/// nor its previous assignee — that exclusion holds whether or not
/// `force_different` is set; the flag only reinforces it during sweeps.
/// Users absent from the task's history are preferred; an already-seen user
/// is revisited only when every eligible candidate has been tried.
///
/// Returns whether an assignment happened. On `false` the task is untouched.
pub fn try_assign(
    tasks: &mut [Task],
    idx: usize,
    users: &[User],
    force_different: bool,
    picker: &dyn Picker,
) -> bool {
    if tasks[idx].state == TaskState::Completed || users.is_empty() {
        return false;
    }

    let counts = active_counts(tasks);
    let task = &mut tasks[idx];

    let mut candidates: Vec<&User> = Vec::new();
    for user in users {
        let load = counts.get(&user.id).copied().unwrap_or(0);
        if load >= MAX_ACTIVE_TASKS_PER_USER {
            continue;
        }
        if force_different && task.assigned_user.as_ref() == Some(&user.id) {
            continue;
        }
        if task.assigned_user.as_ref() == Some(&user.id)
            || task.previous_user.as_ref() == Some(&user.id)
        {
            continue;
        }
        candidates.push(user);
    }

    if candidates.is_empty() {
        return false;
    }

    let unseen: Vec<&User> = candidates
        .iter()
        .copied()
        .filter(|user| !task.assignment_history.contains(&user.id))
        .collect();
    let pool: &[&User] = if unseen.is_empty() { &candidates } else { &unseen };

    let selected = pool[picker.pick_index(pool.len())];

    task.previous_user = task.assigned_user.take();
    task.assigned_user = Some(selected.id.clone());
    task.state = TaskState::InProgress;
    task.assignment_history.push(selected.id.clone());

    true
}

/// Complete the task once every current user appears in its history.
///
/// Evaluated against the live roster at call time: a task keeps circulating
/// as long as users it has never visited keep arriving. With an empty roster
/// the task falls back to waiting — nothing can complete with nobody to
/// visit. Tasks younger than `min_age` are left alone so a task cannot
/// complete in the same instant it was created.
pub fn finalize(task: &mut Task, users: &[User], min_age: Duration) {
    if task.state == TaskState::Completed {
        return;
    }

    if let Ok(min_age) = chrono::Duration::from_std(min_age) {
        if min_age > chrono::Duration::zero()
            && chrono::Utc::now() - task.created_at < min_age
        {
            return;
        }
    }

    if users.is_empty() {
        task.assigned_user = None;
        task.state = TaskState::Waiting;
        return;
    }

    let all_visited = users
        .iter()
        .all(|user| task.assignment_history.contains(&user.id));
    if all_visited {
        task.state = TaskState::Completed;
        task.previous_user = task.assigned_user.take();
    }
}

/// Backfill pass run after capacity-increasing events: offer every
/// non-completed, unassigned task to the roster, then re-check completion.
/// Returns how many tasks found an assignee.
pub fn backfill(
    users: &[User],
    tasks: &mut [Task],
    picker: &dyn Picker,
    min_age: Duration,
) -> usize {
    let mut assigned = 0;
    for idx in 0..tasks.len() {
        if !tasks[idx].is_active() || tasks[idx].assigned_user.is_some() {
            continue;
        }
        if try_assign(tasks, idx, users, false, picker) {
            assigned += 1;
        }
        finalize(&mut tasks[idx], users, min_age);
    }
    assigned
}
