//! View-state primitives shared by every screen controller.

pub mod loadable;
pub mod task;

pub use loadable::Loadable;
pub use task::{AsyncAction, BusyFlag, StateManager, TaskState};
