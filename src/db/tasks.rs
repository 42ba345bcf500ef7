//! Task CRUD operations.

use super::Database;
use crate::types::{EMPTY_DESCRIPTION, SenderId, Task, TaskId};
use anyhow::Result;
use rusqlite::{Connection, Row, params};
use tracing::debug;

pub fn parse_task_row(row: &Row) -> rusqlite::Result<Task> {
    Ok(Task {
        id: row.get("id")?,
        owner_id: row.get("user_id")?,
        name: row.get("task_name")?,
        description: row.get("description")?,
    })
}

/// Internal helper to get a task using an existing connection.
fn get_task_internal(conn: &Connection, task_id: TaskId) -> Result<Option<Task>> {
    let mut stmt = conn.prepare(
        "SELECT id, user_id, task_name, description FROM general WHERE id = ?1",
    )?;

    let result = stmt.query_row(params![task_id], parse_task_row);

    match result {
        Ok(task) => Ok(Some(task)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

impl Database {
    /// Create a new task owned by `owner_id` with the empty description.
    /// Duplicate names are allowed.
    pub fn create_task(&self, owner_id: SenderId, name: &str) -> Result<TaskId> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO general (task_name, user_id, description) VALUES (?1, ?2, ?3)",
                params![name, owner_id, EMPTY_DESCRIPTION],
            )?;
            let id = conn.last_insert_rowid();
            debug!(task_id = id, owner_id, "Task created");
            Ok(id)
        })
    }

    /// Get a task by ID.
    pub fn get_task(&self, task_id: TaskId) -> Result<Option<Task>> {
        self.with_conn(|conn| get_task_internal(conn, task_id))
    }

    /// List every task owned by `owner_id`, oldest first.
    pub fn list_tasks(&self, owner_id: SenderId) -> Result<Vec<Task>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, user_id, task_name, description FROM general
                 WHERE user_id = ?1
                 ORDER BY id ASC",
            )?;
            let tasks = stmt
                .query_map(params![owner_id], parse_task_row)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(tasks)
        })
    }

    /// Delete a task by ID. Returns the number of rows removed (0 or 1).
    pub fn delete_task(&self, task_id: TaskId) -> Result<usize> {
        self.with_conn(|conn| {
            let affected = conn.execute("DELETE FROM general WHERE id = ?1", params![task_id])?;
            debug!(task_id, affected, "Task delete executed");
            Ok(affected)
        })
    }

    /// Set the description of every task named `name`, across all owners.
    /// Returns the number of rows updated.
    pub fn set_description(&self, name: &str, description: &str) -> Result<usize> {
        self.with_conn(|conn| {
            let affected = conn.execute(
                "UPDATE general SET description = ?1 WHERE task_name = ?2",
                params![description, name],
            )?;
            debug!(affected, "Task description update executed");
            Ok(affected)
        })
    }
}
