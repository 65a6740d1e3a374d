//! An ordered, bounded todo list the model maintains through the `todoWrite` tool.
//!
//! The whole list is replaced on every update. A candidate list is validated in full
//! before anything is committed, so a rejected update leaves the stored list as it was.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tern_core::llm::ToolSpec;

/// Maximum number of items a todo list may hold.
pub const MAX_TODOS: usize = 20;

/// Progress of a single todo item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum TodoStatus {
    /// Not started yet.
    Pending,
    /// Currently being worked on. At most one item may be in this state.
    InProgress,
    /// Finished.
    Completed,
}

impl TodoStatus {
    /// Parses the wire name of a status.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "pending" => Some(Self::Pending),
            "in_progress" => Some(Self::InProgress),
            "completed" => Some(Self::Completed),
            _ => None,
        }
    }

    /// Wire name of the status.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
        }
    }

    /// Checkbox marker used when rendering.
    #[must_use]
    pub const fn marker(self) -> &'static str {
        match self {
            Self::Pending => "[ ]",
            Self::InProgress => "[>]",
            Self::Completed => "[x]",
        }
    }
}

/// A validated todo item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoItem {
    /// What needs to be done, in imperative form.
    pub content: String,
    /// Current progress.
    pub status: TodoStatus,
    /// Present-continuous label shown while the item is in progress.
    #[serde(rename = "activeForm")]
    pub active_form: String,
}

impl TodoItem {
    /// Creates a pending item.
    pub fn new(content: impl Into<String>, active_form: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            status: TodoStatus::Pending,
            active_form: active_form.into(),
        }
    }

    /// Sets the status.
    #[must_use]
    pub const fn with_status(mut self, status: TodoStatus) -> Self {
        self.status = status;
        self
    }
}

/// One entry of the `todoWrite` arguments, before validation.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct TodoWriteItem {
    /// Task description in imperative form (e.g., "Run the test suite").
    pub content: String,
    /// Task status.
    #[schemars(with = "TodoStatus")]
    pub status: String,
    /// Present-continuous form shown while in progress (e.g., "Running the test suite").
    #[serde(rename = "activeForm")]
    pub active_form: String,
}

/// Create and manage a structured task list for the current session.
///
/// Replaces the whole list on every call. Keep exactly one task `in_progress` while
/// working, and mark tasks `completed` as soon as they are done.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct TodoWriteArgs {
    /// The complete, updated task list.
    #[schemars(length(min = 1, max = 20))]
    pub todos: Vec<TodoWriteItem>,
}

impl ToolSpec for TodoWriteArgs {
    const NAME: &'static str = "todoWrite";
    const DESCRIPTION: &'static str = "Replace the session task list. Use it to plan multi-step work and \
        report progress. Statuses: pending, in_progress, completed. At most one task may be \
        in_progress and at most 20 tasks are allowed.";
}

/// Why a candidate todo list was rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TodoError {
    /// More than [`MAX_TODOS`] items.
    #[error("too many tasks: {count} given, at most {max} allowed")]
    TooMany {
        /// Number of items in the candidate list.
        count: usize,
        /// The limit.
        max: usize,
    },
    /// A status outside `pending`, `in_progress`, `completed`.
    #[error("task {}: invalid status `{status}` (expected pending, in_progress or completed)", .index + 1)]
    InvalidStatus {
        /// Zero-based position of the item.
        index: usize,
        /// The rejected value.
        status: String,
    },
    /// An item with blank content.
    #[error("task {}: content must not be empty", .index + 1)]
    EmptyContent {
        /// Zero-based position of the item.
        index: usize,
    },
    /// An item with a blank active form.
    #[error("task {}: activeForm must not be empty", .index + 1)]
    EmptyActiveForm {
        /// Zero-based position of the item.
        index: usize,
    },
    /// More than one item in progress.
    #[error("{count} tasks are in_progress, at most one allowed")]
    MultipleInProgress {
        /// Number of in-progress items.
        count: usize,
    },
}

/// Ordered todo list scoped to one session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoList {
    items: Vec<TodoItem>,
}

impl TodoList {
    /// Creates an empty list.
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Replaces the list with raw `todoWrite` entries.
    ///
    /// # Errors
    ///
    /// Returns the first violated rule; the stored list is unchanged in that case.
    pub fn update(&mut self, candidate: Vec<TodoWriteItem>) -> Result<(), TodoError> {
        if candidate.len() > MAX_TODOS {
            return Err(TodoError::TooMany {
                count: candidate.len(),
                max: MAX_TODOS,
            });
        }

        let items = candidate
            .into_iter()
            .enumerate()
            .map(|(index, item)| {
                let Some(status) = TodoStatus::parse(&item.status) else {
                    return Err(TodoError::InvalidStatus {
                        index,
                        status: item.status,
                    });
                };
                Ok(TodoItem {
                    content: item.content,
                    status,
                    active_form: item.active_form,
                })
            })
            .collect::<Result<Vec<_>, TodoError>>()?;

        self.replace(items)
    }

    /// Replaces the list with typed items.
    ///
    /// # Errors
    ///
    /// Returns the first violated rule; the stored list is unchanged in that case.
    pub fn replace(&mut self, items: Vec<TodoItem>) -> Result<(), TodoError> {
        validate(&items)?;
        self.items = items;
        tracing::debug!(
            total = self.items.len(),
            completed = self.count(TodoStatus::Completed),
            current = self.in_progress().map(|item| item.active_form.as_str()),
            "todo list updated"
        );
        Ok(())
    }

    /// Clears the list.
    pub fn reset(&mut self) {
        self.items.clear();
    }

    /// Items in order.
    #[must_use]
    pub fn items(&self) -> &[TodoItem] {
        &self.items
    }

    /// Number of items.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the list is empty.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// The item currently in progress, if any.
    #[must_use]
    pub fn in_progress(&self) -> Option<&TodoItem> {
        self.items
            .iter()
            .find(|item| item.status == TodoStatus::InProgress)
    }

    /// Number of items with the given status.
    #[must_use]
    pub fn count(&self, status: TodoStatus) -> usize {
        self.items.iter().filter(|item| item.status == status).count()
    }

    /// Renders the list for the model and the user.
    ///
    /// ```text
    /// [x] Write parser Writing parser
    /// [>] Add tests Adding tests
    ///
    /// Total: 2, In Progress: 1, Completed: 1
    /// ```
    #[must_use]
    pub fn render(&self) -> String {
        if self.items.is_empty() {
            return "No tasks.".to_owned();
        }

        let lines = self
            .items
            .iter()
            .map(|item| format!("{} {} {}", item.status.marker(), item.content, item.active_form))
            .collect::<Vec<_>>()
            .join("\n");

        format!(
            "{lines}\n\nTotal: {}, In Progress: {}, Completed: {}",
            self.items.len(),
            self.count(TodoStatus::InProgress),
            self.count(TodoStatus::Completed),
        )
    }
}

fn validate(items: &[TodoItem]) -> Result<(), TodoError> {
    if items.len() > MAX_TODOS {
        return Err(TodoError::TooMany {
            count: items.len(),
            max: MAX_TODOS,
        });
    }

    for (index, item) in items.iter().enumerate() {
        if item.content.trim().is_empty() {
            return Err(TodoError::EmptyContent { index });
        }
        if item.active_form.trim().is_empty() {
            return Err(TodoError::EmptyActiveForm { index });
        }
    }

    let in_progress = items
        .iter()
        .filter(|item| item.status == TodoStatus::InProgress)
        .count();
    if in_progress > 1 {
        return Err(TodoError::MultipleInProgress { count: in_progress });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(content: &str, status: &str, active_form: &str) -> TodoWriteItem {
        TodoWriteItem {
            content: content.into(),
            status: status.into(),
            active_form: active_form.into(),
        }
    }

    fn seeded() -> TodoList {
        let mut list = TodoList::new();
        list.update(vec![entry("Write parser", "in_progress", "Writing parser")])
            .unwrap();
        list
    }

    #[test]
    fn render_single_pending() {
        let mut list = TodoList::new();
        list.update(vec![entry("Add tests", "pending", "Adding tests")])
            .unwrap();
        assert_eq!(
            list.render(),
            "[ ] Add tests Adding tests\n\nTotal: 1, In Progress: 0, Completed: 0"
        );
    }

    #[test]
    fn render_markers_and_counts() {
        let mut list = TodoList::new();
        list.replace(vec![
            TodoItem::new("Write parser", "Writing parser").with_status(TodoStatus::Completed),
            TodoItem::new("Add tests", "Adding tests").with_status(TodoStatus::InProgress),
            TodoItem::new("Ship", "Shipping"),
        ])
        .unwrap();

        assert_eq!(
            list.render(),
            "[x] Write parser Writing parser\n[>] Add tests Adding tests\n[ ] Ship Shipping\n\n\
             Total: 3, In Progress: 1, Completed: 1"
        );
        assert_eq!(list.in_progress().unwrap().content, "Add tests");
    }

    #[test]
    fn render_empty() {
        assert_eq!(TodoList::new().render(), "No tasks.");
    }

    #[test]
    fn rejects_too_many_atomically() {
        let mut list = seeded();
        let candidate = (0..21)
            .map(|i| entry(&format!("task {i}"), "pending", "working"))
            .collect();

        assert_eq!(
            list.update(candidate),
            Err(TodoError::TooMany { count: 21, max: 20 })
        );
        assert_eq!(list, seeded());
    }

    #[test]
    fn accepts_exactly_twenty() {
        let mut list = TodoList::new();
        let candidate = (0..20)
            .map(|i| entry(&format!("task {i}"), "pending", "working"))
            .collect();
        list.update(candidate).unwrap();
        assert_eq!(list.len(), MAX_TODOS);
    }

    #[test]
    fn rejects_multiple_in_progress_atomically() {
        let mut list = seeded();
        let err = list
            .update(vec![
                entry("a", "in_progress", "doing a"),
                entry("b", "completed", "doing b"),
                entry("c", "in_progress", "doing c"),
            ])
            .unwrap_err();

        assert_eq!(err, TodoError::MultipleInProgress { count: 2 });
        assert_eq!(list, seeded());
        assert_eq!(list.in_progress().unwrap().active_form, "Writing parser");
    }

    #[test]
    fn rejects_invalid_status() {
        let mut list = TodoList::new();
        let err = list
            .update(vec![entry("a", "pending", "x"), entry("b", "done", "y")])
            .unwrap_err();
        assert_eq!(
            err,
            TodoError::InvalidStatus {
                index: 1,
                status: "done".into()
            }
        );
        assert!(err.to_string().starts_with("task 2: invalid status `done`"));
        assert!(list.is_empty());
    }

    #[test]
    fn rejects_blank_fields() {
        let mut list = TodoList::new();
        assert_eq!(
            list.update(vec![entry("  ", "pending", "x")]),
            Err(TodoError::EmptyContent { index: 0 })
        );
        assert_eq!(
            list.update(vec![entry("a", "pending", "")]),
            Err(TodoError::EmptyActiveForm { index: 0 })
        );
    }

    #[test]
    fn reset_clears() {
        let mut list = seeded();
        list.reset();
        assert!(list.is_empty());
    }

    #[test]
    fn schema_describes_todo_write() {
        let definition = TodoWriteArgs::definition();
        assert_eq!(definition.name(), "todoWrite");
        assert_eq!(definition.required_fields(), vec!["todos"]);

        let schema = definition.parameters_json();
        assert_eq!(schema["properties"]["todos"]["maxItems"], 20);
        assert_eq!(schema["properties"]["todos"]["minItems"], 1);
    }

    #[test]
    fn args_reject_unknown_fields() {
        let raw = r#"{"todos":[{"content":"a","status":"pending","activeForm":"b","extra":1}]}"#;
        assert!(serde_json::from_str::<TodoWriteArgs>(raw).is_err());

        let ok = r#"{"todos":[{"content":"a","status":"pending","activeForm":"b"}]}"#;
        let args: TodoWriteArgs = serde_json::from_str(ok).unwrap();
        assert_eq!(args.todos[0].active_form, "b");
    }
}
