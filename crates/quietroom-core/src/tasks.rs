//! Task board: a short to-do list with a single active task.
//!
//! The board enforces its own rules: at most seven tasks, titles capped at
//! 32 characters, and moving a task to Doing demotes every other Doing task
//! back to Todo. Tasks keep insertion order.

use serde::{Deserialize, Serialize};

/// Board capacity.
pub const MAX_TASKS: usize = 7;

/// Title length cap in characters.
pub const MAX_TITLE_CHARS: usize = 32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TaskId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaskStatus {
    Todo,
    Doing,
    Done,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    pub status: TaskStatus,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TaskBoard {
    tasks: Vec<Task>,
}

impl TaskBoard {
    pub fn new() -> Self {
        TaskBoard { tasks: Vec::new() }
    }

    /// Add a task in Todo state. Returns `None` when the board is full.
    /// Titles longer than [`MAX_TITLE_CHARS`] are truncated.
    pub fn add_task(&mut self, title: &str) -> Option<TaskId> {
        if self.tasks.len() >= MAX_TASKS {
            return None;
        }
        let id = TaskId(rand::random());
        let title: String = title.chars().take(MAX_TITLE_CHARS).collect();
        self.tasks.push(Task { id, title, status: TaskStatus::Todo });
        Some(id)
    }

    /// Change a task's status. Moving a task to Doing demotes any other
    /// Doing task to Todo. Returns false for an unknown id.
    pub fn move_task(&mut self, id: TaskId, status: TaskStatus) -> bool {
        if !self.tasks.iter().any(|t| t.id == id) {
            return false;
        }
        if status == TaskStatus::Doing {
            for task in self.tasks.iter_mut() {
                if task.id != id && task.status == TaskStatus::Doing {
                    task.status = TaskStatus::Todo;
                }
            }
        }
        if let Some(task) = self.tasks.iter_mut().find(|t| t.id == id) {
            task.status = status;
        }
        true
    }

    /// Remove a task. Returns false for an unknown id.
    pub fn delete_task(&mut self, id: TaskId) -> bool {
        let before = self.tasks.len();
        self.tasks.retain(|t| t.id != id);
        self.tasks.len() != before
    }

    /// The single Doing task, if any.
    pub fn current_task(&self) -> Option<&Task> {
        self.tasks.iter().find(|t| t.status == TaskStatus::Doing)
    }

    /// All tasks in insertion order.
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capped_at_seven() {
        let mut board = TaskBoard::new();
        for i in 0..MAX_TASKS {
            assert!(board.add_task(&format!("task {i}")).is_some());
        }
        assert_eq!(board.add_task("one too many"), None);
        assert_eq!(board.len(), MAX_TASKS);
    }

    #[test]
    fn test_title_truncated_by_characters() {
        let mut board = TaskBoard::new();
        let id = board.add_task(&"x".repeat(50)).unwrap();
        let task = board.tasks().iter().find(|t| t.id == id).unwrap();
        assert_eq!(task.title.chars().count(), MAX_TITLE_CHARS);

        // Truncation counts characters, not bytes.
        let id = board.add_task(&"é".repeat(50)).unwrap();
        let task = board.tasks().iter().find(|t| t.id == id).unwrap();
        assert_eq!(task.title.chars().count(), MAX_TITLE_CHARS);
    }

    #[test]
    fn test_single_doing_task() {
        let mut board = TaskBoard::new();
        let a = board.add_task("write report").unwrap();
        let b = board.add_task("check mail").unwrap();

        assert!(board.move_task(a, TaskStatus::Doing));
        assert!(board.move_task(b, TaskStatus::Doing));

        let statuses: Vec<TaskStatus> = board.tasks().iter().map(|t| t.status).collect();
        assert_eq!(statuses, vec![TaskStatus::Todo, TaskStatus::Doing]);
        assert_eq!(board.current_task().map(|t| t.id), Some(b));
    }

    #[test]
    fn test_done_does_not_demote() {
        let mut board = TaskBoard::new();
        let a = board.add_task("a").unwrap();
        let b = board.add_task("b").unwrap();
        board.move_task(a, TaskStatus::Doing);
        board.move_task(b, TaskStatus::Done);
        assert_eq!(board.current_task().map(|t| t.id), Some(a));
    }

    #[test]
    fn test_delete_preserves_order() {
        let mut board = TaskBoard::new();
        let a = board.add_task("first").unwrap();
        board.add_task("second").unwrap();
        board.add_task("third").unwrap();

        assert!(board.delete_task(a));
        assert!(!board.delete_task(a), "already gone");

        let titles: Vec<&str> = board.tasks().iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, vec!["second", "third"]);
    }

    #[test]
    fn test_unknown_id_rejected() {
        let mut board = TaskBoard::new();
        board.add_task("only");
        assert!(!board.move_task(TaskId(0xDEAD), TaskStatus::Done));
    }
}
