use serde::{Deserialize, Serialize};

use crate::ids::{TaskId, UserId};

/// One assignment change observed during a rotation sweep.
///
/// `from: Some, to: None` is a release; `to: Some` is a handover. The sweep
/// returns these for observability only; correctness never depends on them.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RotationEvent {
    pub task_id: TaskId,
    pub from: Option<UserId>,
    pub to: Option<UserId>,
}

impl RotationEvent {
    pub fn released(task_id: TaskId, from: Option<UserId>) -> Self {
        Self {
            task_id,
            from,
            to: None,
        }
    }

    pub fn reassigned(task_id: TaskId, from: Option<UserId>, to: UserId) -> Self {
        Self {
            task_id,
            from,
            to: Some(to),
        }
    }

    pub fn is_release(&self) -> bool {
        self.to.is_none()
    }
}
