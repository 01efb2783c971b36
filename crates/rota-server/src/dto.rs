//! Wire representations of engine results. Field names stay camelCase so
//! API consumers see conventional JSON.

use chrono::{DateTime, Utc};
use rota_core::{TaskId, TaskState, UserId};
use rota_engine::{TaskOverview, UserOverview};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub name: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: UserId,
    pub name: String,
    pub active_tasks_count: usize,
    pub total_tasks_assigned: usize,
}

impl From<UserOverview> for UserResponse {
    fn from(overview: UserOverview) -> Self {
        Self {
            id: overview.user.id,
            name: overview.user.name,
            active_tasks_count: overview.active_tasks,
            total_tasks_assigned: overview.total_assigned,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateTaskRequest {
    pub title: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskResponse {
    pub id: TaskId,
    pub title: String,
    pub state: TaskState,
    pub assigned_user_id: Option<UserId>,
    pub assigned_user_name: Option<String>,
    pub visited_users_count: usize,
    pub assignment_history: Vec<UserId>,
    pub created_at: DateTime<Utc>,
}

impl From<TaskOverview> for TaskResponse {
    fn from(overview: TaskOverview) -> Self {
        let visited_users_count = overview.task.visited_users_count();
        Self {
            id: overview.task.id,
            title: overview.task.title,
            state: overview.task.state,
            assigned_user_id: overview.task.assigned_user,
            assigned_user_name: overview.assigned_user_name,
            visited_users_count,
            assignment_history: overview.task.assignment_history,
            created_at: overview.task.created_at,
        }
    }
}
