pub mod assign;
pub mod engine;
pub mod picker;
pub mod views;

pub use engine::AssignmentEngine;
pub use picker::{OsPicker, Picker, SequencePicker};
pub use views::{TaskOverview, UserOverview};
