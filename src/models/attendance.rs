//! Attendance status codes and report view models.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One-character status stored per student per date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AttendanceStatus {
    #[serde(rename = "P")]
    Present,
    #[serde(rename = "A")]
    Absent,
    #[serde(rename = "H")]
    Holiday,
    #[serde(rename = "N")]
    NoClass,
}

impl AttendanceStatus {
    /// All statuses in selector order.
    pub const ALL: [AttendanceStatus; 4] = [Self::Present, Self::Absent, Self::Holiday, Self::NoClass];

    /// Stored status code.
    pub fn code(self) -> char {
        match self {
            Self::Present => 'P',
            Self::Absent => 'A',
            Self::Holiday => 'H',
            Self::NoClass => 'N',
        }
    }

    /// Parse a status code (`P`, `A`, `H`, `N`), case-insensitive.
    pub fn from_code(code: char) -> Option<Self> {
        match code.to_ascii_uppercase() {
            'P' => Some(Self::Present),
            'A' => Some(Self::Absent),
            'H' => Some(Self::Holiday),
            'N' => Some(Self::NoClass),
            _ => None,
        }
    }

    /// Human-readable label.
    pub fn label(self) -> &'static str {
        match self {
            Self::Present => "Present",
            Self::Absent => "Absent",
            Self::Holiday => "Holiday",
            Self::NoClass => "No Class",
        }
    }

    /// Whether the status counts toward the attendance percentage.
    pub fn is_counted(self) -> bool {
        matches!(self, Self::Present | Self::Absent)
    }
}

impl std::fmt::Display for AttendanceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Present share of `present + absent`, in percent. Zero when nothing is counted.
pub fn percentage_of(present: usize, absent: usize) -> f64 {
    let total = present + absent;
    if total == 0 {
        0.0
    } else {
        present as f64 / total as f64 * 100.0
    }
}

/// Raw per-status counts for a subject (or one student within it).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SubjectTotals {
    pub present: usize,
    pub absent: usize,
    pub holiday: usize,
    pub no_class: usize,
}

impl SubjectTotals {
    /// Count one mark.
    pub fn add(&mut self, status: AttendanceStatus) {
        match status {
            AttendanceStatus::Present => self.present += 1,
            AttendanceStatus::Absent => self.absent += 1,
            AttendanceStatus::Holiday => self.holiday += 1,
            AttendanceStatus::NoClass => self.no_class += 1,
        }
    }

    /// Attendance percentage over P and A only.
    pub fn percentage(&self) -> f64 {
        percentage_of(self.present, self.absent)
    }
}

/// One row of the student-wise report for a subject.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StudentReportRow {
    pub student_id: String,
    pub name: String,
    pub present: usize,
    pub absent: usize,
    pub total: usize,
    pub percentage: f64,
}

impl StudentReportRow {
    /// Percentage as displayed and exported, e.g. `50.0%`.
    pub fn percentage_label(&self) -> String {
        format!("{:.1}%", self.percentage)
    }
}

/// A single dated mark in a student's history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HistoryEntry {
    pub date: NaiveDate,
    pub status: AttendanceStatus,
}

/// A student's own view of one subject.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubjectOverview {
    pub subject: String,
    pub totals: SubjectTotals,
    pub percentage: f64,
    /// Newest first.
    pub history: Vec<HistoryEntry>,
}

/// Overall present/absent split across all of a teacher's subjects.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Distribution {
    pub present: usize,
    pub absent: usize,
}

impl Distribution {
    pub fn percentage(&self) -> f64 {
        percentage_of(self.present, self.absent)
    }
}

/// A subject whose attendance fell below the alert threshold.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LowAttendance {
    pub teacher_id: String,
    pub teacher_name: String,
    pub subject: String,
    pub percentage: f64,
}

/// Landing page counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StoreSummary {
    pub teachers: usize,
    pub students: usize,
    pub subjects: usize,
    pub marks: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes_roundtrip() {
        for status in AttendanceStatus::ALL {
            assert_eq!(AttendanceStatus::from_code(status.code()), Some(status));
        }
        assert_eq!(AttendanceStatus::from_code('p'), Some(AttendanceStatus::Present));
        assert_eq!(AttendanceStatus::from_code('X'), None);
    }

    #[test]
    fn test_status_serializes_as_code() {
        let json = serde_json::to_string(&AttendanceStatus::NoClass).unwrap();
        assert_eq!(json, "\"N\"");
        let parsed: AttendanceStatus = serde_json::from_str("\"H\"").unwrap();
        assert_eq!(parsed, AttendanceStatus::Holiday);
    }

    #[test]
    fn test_percentage_zero_denominator() {
        assert_eq!(percentage_of(0, 0), 0.0);
    }

    #[test]
    fn test_totals_exclude_holiday_and_no_class() {
        let mut totals = SubjectTotals::default();
        for s in [
            AttendanceStatus::Present,
            AttendanceStatus::Present,
            AttendanceStatus::Absent,
            AttendanceStatus::Holiday,
            AttendanceStatus::NoClass,
        ] {
            totals.add(s);
        }
        assert_eq!(format!("{:.1}", totals.percentage()), "66.7");
    }

    #[test]
    fn test_only_present_and_absent_are_counted() {
        let counted: Vec<_> = AttendanceStatus::ALL.into_iter().filter(|s| s.is_counted()).collect();
        assert_eq!(counted, vec![AttendanceStatus::Present, AttendanceStatus::Absent]);
    }

    #[test]
    fn test_percentage_label() {
        let row = StudentReportRow {
            student_id: "1".to_string(),
            name: "Ann".to_string(),
            present: 1,
            absent: 1,
            total: 2,
            percentage: 50.0,
        };
        assert_eq!(row.percentage_label(), "50.0%");
    }
}
