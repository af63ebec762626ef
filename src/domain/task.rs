//! Task domain model
//!
//! A task is a single to-do item. Every operation takes `&self` and returns
//! a fresh value, so a caller holding an earlier revision never sees it change.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Invalid priority '{0}': expected one of low, medium, high")]
    InvalidPriority(String),
}

/// Priority of a task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    /// All priorities, lowest first
    pub const ALL: [Priority; 3] = [Priority::Low, Priority::Medium, Priority::High];

    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Priority::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| ValidationError::InvalidPriority(s.to_string()))
    }
}

/// A single to-do item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    /// Assigned by the owning collection, never changes
    pub id: u64,

    pub description: String,

    pub completed: bool,

    /// Set once at creation
    pub created_at: DateTime<Utc>,

    #[serde(default)]
    pub priority: Priority,

    /// Labels, most recently added first
    #[serde(default)]
    pub tags: Vec<String>,
}

impl Task {
    /// Creates a pending, medium-priority task with no tags
    pub fn new(id: u64, description: impl Into<String>) -> Self {
        Self {
            id,
            description: description.into(),
            completed: false,
            created_at: Utc::now(),
            priority: Priority::default(),
            tags: Vec::new(),
        }
    }

    /// Returns a completed copy
    pub fn complete(&self) -> Self {
        Self {
            completed: true,
            ..self.clone()
        }
    }

    /// Returns a pending copy
    pub fn uncomplete(&self) -> Self {
        Self {
            completed: false,
            ..self.clone()
        }
    }

    /// Returns a copy with the priority named by `value`
    ///
    /// Only `low`, `medium` and `high` are accepted.
    pub fn set_priority(&self, value: &str) -> Result<Self, ValidationError> {
        let priority: Priority = value.parse()?;
        Ok(self.with_priority(priority))
    }

    /// Returns a copy with the given priority
    pub fn with_priority(&self, priority: Priority) -> Self {
        Self {
            priority,
            ..self.clone()
        }
    }

    /// Returns a copy with `tag` in front of the existing tags
    pub fn add_tag(&self, tag: impl Into<String>) -> Self {
        let mut tags = Vec::with_capacity(self.tags.len() + 1);
        tags.push(tag.into());
        tags.extend(self.tags.iter().cloned());
        Self {
            tags,
            ..self.clone()
        }
    }

    /// Returns true if the task is still open
    pub fn is_pending(&self) -> bool {
        !self.completed
    }
}
