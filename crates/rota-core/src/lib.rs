pub mod error;
pub mod events;
pub mod ids;
pub mod model;

pub use error::{EngineError, ErrorKind};
pub use events::RotationEvent;
pub use ids::{TaskId, UserId};
pub use model::{Task, TaskState, User, MAX_ACTIVE_TASKS_PER_USER};
