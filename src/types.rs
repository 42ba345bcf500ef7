//! Core types for the task bot.

/// Chat identity of the user that issued a command.
/// Doubles as the owner key of every task row.
pub type SenderId = i64;

/// Store-assigned task identifier.
pub type TaskId = i64;

/// Description stored on a freshly created task.
pub const EMPTY_DESCRIPTION: &str = "empty";

/// A task owned by a single chat user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    pub id: TaskId,
    pub owner_id: SenderId,
    pub name: String,
    pub description: String,
}

impl Task {
    /// Render the task as a single reply line: `name,description`.
    pub fn to_reply_line(&self) -> String {
        format!("{},{}", self.name, self.description)
    }
}
