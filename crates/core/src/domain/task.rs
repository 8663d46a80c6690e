use serde::{Deserialize, Serialize};

/// Progress of a task on an actor's task list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TaskState {
    #[default]
    NotStarted,
    InProgress,
    Pending,
    Completed,
}

impl TaskState {
    pub fn is_completed(self) -> bool {
        self == TaskState::Completed
    }
}
