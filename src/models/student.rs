//! Student record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A registered student. Keyed by the normalized phone in the `students` partition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    pub name: String,
    pub phone: String,
    /// Teacher who most recently registered this student. Weak reference.
    #[serde(default)]
    pub teacher_id: Option<String>,
    #[serde(with = "super::timestamp")]
    pub registered_at: DateTime<Utc>,
}
