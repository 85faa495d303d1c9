use crate::domain::record::{Grouped, Identified, RecordKey, Regroupable, Searchable, Sortable};
use crate::domain::sorting::SortValue;
use crate::error::GridError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use uuid::Uuid;

/// Unique identifier for a todo
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TodoId(Uuid);

impl TodoId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for TodoId {
    fn default() -> Self {
        Self::new()
    }
}

impl FromStr for TodoId {
    type Err = GridError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s)
            .map(Self)
            .map_err(|_| GridError::InvalidRecordId(s.to_string()))
    }
}

impl fmt::Display for TodoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Status of a todo on the task board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TodoStatus {
    Todo,
    InProgress,
    Done,
}

impl TodoStatus {
    pub fn key(&self) -> &'static str {
        match self {
            Self::Todo => "todo",
            Self::InProgress => "in-progress",
            Self::Done => "done",
        }
    }
}

impl FromStr for TodoStatus {
    type Err = GridError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "todo" => Ok(Self::Todo),
            "in-progress" => Ok(Self::InProgress),
            "done" => Ok(Self::Done),
            _ => Err(GridError::InvalidStage(s.to_string())),
        }
    }
}

impl fmt::Display for TodoStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Todo => write!(f, "To Do"),
            Self::InProgress => write!(f, "In Progress"),
            Self::Done => write!(f, "Done"),
        }
    }
}

/// A follow-up task
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Todo {
    pub id: TodoId,
    pub title: String,
    pub status: TodoStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Todo {
    pub fn new(title: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: TodoId::new(),
            title: title.into(),
            status: TodoStatus::Todo,
            due_date: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn set_status(&mut self, status: TodoStatus) {
        self.status = status;
        self.updated_at = Utc::now();
    }

    pub fn set_due_date(&mut self, date: DateTime<Utc>) {
        self.due_date = Some(date);
        self.updated_at = Utc::now();
    }

    pub fn clear_due_date(&mut self) {
        self.due_date = None;
        self.updated_at = Utc::now();
    }
}

impl Identified for Todo {
    fn id(&self) -> Option<RecordKey> {
        Some(RecordKey::new(self.id.to_string()))
    }
}

impl Grouped for Todo {
    fn group_key(&self) -> Option<String> {
        Some(self.status.key().to_string())
    }
}

impl Regroupable for Todo {
    fn set_group_key(&mut self, key: &str) {
        match key.parse::<TodoStatus>() {
            Ok(status) => self.set_status(status),
            Err(_) => tracing::warn!(todo = %self.id, key, "ignoring unknown todo status"),
        }
    }
}

impl Sortable for Todo {
    fn sort_value(&self, key: &str) -> SortValue {
        match key {
            "title" => SortValue::from(self.title.as_str()),
            "status" => SortValue::from(self.status.key()),
            "due_date" => self.due_date.into(),
            "created_at" => SortValue::Date(self.created_at),
            _ => SortValue::Null,
        }
    }
}

impl Searchable for Todo {
    fn matches(&self, needle: &str) -> bool {
        self.title.to_lowercase().contains(needle)
    }
}
