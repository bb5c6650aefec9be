//! In-memory attendance store and its persistence seam.
//!
//! The whole document is held in memory as [`AttendanceStore`]. Mutations
//! never touch storage; callers persist through a [`Repository`] after each
//! successful change.

pub mod attendance;
pub mod ids;
mod lenient;
pub mod repository;
pub mod roster;

#[cfg(test)]
mod tests;

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::{AttendanceStatus, StoreSummary, Student, Teacher};

pub use ids::{normalize_phone, student_id_for_phone, teacher_id_for_name};
pub use repository::{JsonFileRepository, MemoryRepository, Repository};

/// Date → status for one student in one subject.
pub type MarkMap = BTreeMap<NaiveDate, AttendanceStatus>;

/// Student id → marks for one subject.
pub type SubjectRoster = BTreeMap<String, MarkMap>;

/// Subject name → roster for one teacher.
pub type TeacherSubjects = BTreeMap<String, SubjectRoster>;

/// Placeholder shown for ids missing from every partition.
pub const UNKNOWN_NAME: &str = "Unknown";
/// Placeholder shown for a missing teacher.
pub const UNKNOWN_TEACHER: &str = "Unknown Teacher";
/// Placeholder shown for a missing student.
pub const UNKNOWN_STUDENT: &str = "Unknown Student";

/// The persisted document: teachers, students and the nested attendance marks.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AttendanceStore {
    #[serde(default)]
    pub teachers: BTreeMap<String, Teacher>,
    #[serde(default)]
    pub students: BTreeMap<String, Student>,
    /// Teacher id → subject → student id → date → status.
    #[serde(default, deserialize_with = "lenient::attendance")]
    pub attendance: BTreeMap<String, TeacherSubjects>,
}

impl AttendanceStore {
    /// Create an empty store with all three partitions present.
    pub fn new() -> Self {
        Self::default()
    }

    /// Display name for a teacher id.
    pub fn teacher_name(&self, teacher_id: &str) -> &str {
        self.teachers
            .get(teacher_id)
            .map(|t| t.name.as_str())
            .unwrap_or(UNKNOWN_TEACHER)
    }

    /// Display name for a student id.
    pub fn student_name(&self, student_id: &str) -> &str {
        self.students
            .get(student_id)
            .map(|s| s.name.as_str())
            .unwrap_or(UNKNOWN_STUDENT)
    }

    /// Display name for any id, students first, then teachers.
    pub fn lookup_name(&self, id: &str) -> &str {
        if let Some(student) = self.students.get(id) {
            return &student.name;
        }
        if let Some(teacher) = self.teachers.get(id) {
            return &teacher.name;
        }
        UNKNOWN_NAME
    }

    /// Counts for the landing view.
    pub fn summary(&self) -> StoreSummary {
        let subjects = self.attendance.values().map(|subjects| subjects.len()).sum();
        let marks = self
            .attendance
            .values()
            .flat_map(|subjects| subjects.values())
            .flat_map(|roster| roster.values())
            .map(|marks| marks.len())
            .sum();

        StoreSummary {
            teachers: self.teachers.len(),
            students: self.students.len(),
            subjects,
            marks,
        }
    }

    /// Subjects of a teacher in name order. Empty for unknown teachers.
    pub fn subjects(&self, teacher_id: &str) -> Vec<&str> {
        self.attendance
            .get(teacher_id)
            .map(|subjects| subjects.keys().map(String::as_str).collect())
            .unwrap_or_default()
    }

    /// Whether a subject exists under the teacher.
    pub fn has_subject(&self, teacher_id: &str, subject: &str) -> bool {
        self.attendance
            .get(teacher_id)
            .is_some_and(|subjects| subjects.contains_key(subject))
    }

    pub(crate) fn roster(&self, teacher_id: &str, subject: &str) -> crate::Result<&SubjectRoster> {
        self.attendance
            .get(teacher_id)
            .and_then(|subjects| subjects.get(subject))
            .ok_or_else(|| crate::AppError::not_found(format!("subject '{subject}'")))
    }

    pub(crate) fn roster_mut(&mut self, teacher_id: &str, subject: &str) -> crate::Result<&mut SubjectRoster> {
        self.attendance
            .get_mut(teacher_id)
            .and_then(|subjects| subjects.get_mut(subject))
            .ok_or_else(|| crate::AppError::not_found(format!("subject '{subject}'")))
    }
}
