use rota_core::{Task, User};

/// A user together with assignment statistics, computed inside one store read
/// so the numbers are mutually consistent.
#[derive(Clone, Debug)]
pub struct UserOverview {
    pub user: User,
    /// Non-completed tasks currently held by the user.
    pub active_tasks: usize,
    /// Tasks whose history contains the user, completed ones included.
    pub total_assigned: usize,
}

impl UserOverview {
    pub fn project(user: &User, tasks: &[Task]) -> Self {
        let active_tasks = tasks
            .iter()
            .filter(|t| t.is_active() && t.assigned_user.as_ref() == Some(&user.id))
            .count();
        let total_assigned = tasks
            .iter()
            .filter(|t| t.assignment_history.contains(&user.id))
            .count();
        Self {
            user: user.clone(),
            active_tasks,
            total_assigned,
        }
    }
}

/// A task together with the display name of its current assignee.
#[derive(Clone, Debug)]
pub struct TaskOverview {
    pub task: Task,
    pub assigned_user_name: Option<String>,
}

impl TaskOverview {
    pub fn project(task: &Task, users: &[User]) -> Self {
        let assigned_user_name = task.assigned_user.as_ref().and_then(|id| {
            users
                .iter()
                .find(|u| &u.id == id)
                .map(|u| u.name.clone())
        });
        Self {
            task: task.clone(),
            assigned_user_name,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rota_core::TaskState;

    #[test]
    fn user_overview_counts_active_and_total() {
        let user = User::new("Liam");

        let mut held = Task::new("Ride");
        held.state = TaskState::InProgress;
        held.assigned_user = Some(user.id.clone());
        held.assignment_history = vec![user.id.clone()];

        let mut finished = Task::new("Win");
        finished.state = TaskState::Completed;
        finished.assignment_history = vec![user.id.clone()];

        let untouched = Task::new("Knit");

        let overview = UserOverview::project(&user, &[held, finished, untouched]);
        assert_eq!(overview.active_tasks, 1);
        assert_eq!(overview.total_assigned, 2);
    }

    #[test]
    fn task_overview_resolves_assignee_name() {
        let user = User::new("Noah");
        let mut task = Task::new("Ride");
        task.state = TaskState::InProgress;
        task.assigned_user = Some(user.id.clone());

        let overview = TaskOverview::project(&task, &[user]);
        assert_eq!(overview.assigned_user_name.as_deref(), Some("Noah"));
    }

    #[test]
    fn task_overview_handles_unassigned_and_unknown_users() {
        let task = Task::new("Ride");
        let overview = TaskOverview::project(&task, &[]);
        assert!(overview.assigned_user_name.is_none());

        let mut orphaned = Task::new("Win");
        orphaned.assigned_user = Some(rota_core::UserId::new());
        let overview = TaskOverview::project(&orphaned, &[]);
        assert!(overview.assigned_user_name.is_none());
    }
}
