//! Teacher record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A registered teacher. Keyed by its derived id in the `teachers` partition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Teacher {
    pub name: String,
    #[serde(with = "super::timestamp")]
    pub registered_at: DateTime<Utc>,
}
