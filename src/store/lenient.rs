//! Tolerant reader for the `attendance` partition.
//!
//! Older writers put flat `date -> status` entries directly under a subject and
//! stored free-form status letters. Those entries are dropped on load instead
//! of failing the whole document.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use tracing::warn;

use super::{MarkMap, SubjectRoster, TeacherSubjects};
use crate::models::AttendanceStatus;

pub fn attendance<'de, D>(deserializer: D) -> Result<BTreeMap<String, TeacherSubjects>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = BTreeMap::<String, BTreeMap<String, Value>>::deserialize(deserializer)?;

    Ok(raw
        .into_iter()
        .map(|(teacher_id, subjects)| {
            let subjects = subjects
                .into_iter()
                .map(|(subject, roster)| {
                    let roster = roster_from_value(&teacher_id, &subject, roster);
                    (subject, roster)
                })
                .collect();
            (teacher_id, subjects)
        })
        .collect())
}

fn roster_from_value(teacher_id: &str, subject: &str, value: Value) -> SubjectRoster {
    let Value::Object(entries) = value else {
        warn!(teacher_id = %teacher_id, subject = %subject, "Subject is not a roster, loading it empty");
        return SubjectRoster::new();
    };

    let mut roster = SubjectRoster::new();
    let mut dropped = 0usize;

    for (student_id, marks) in entries {
        let Value::Object(marks) = marks else {
            // flat date -> status entry
            dropped += 1;
            continue;
        };

        let mut parsed = MarkMap::new();
        for (date, status) in marks {
            match (parse_date(&date), parse_status(&status)) {
                (Some(date), Some(status)) => {
                    parsed.insert(date, status);
                }
                _ => dropped += 1,
            }
        }
        roster.insert(student_id, parsed);
    }

    if dropped > 0 {
        warn!(teacher_id = %teacher_id, subject = %subject, dropped, "Skipped unreadable attendance entries");
    }
    roster
}

fn parse_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()
}

fn parse_status(value: &Value) -> Option<AttendanceStatus> {
    let mut chars = value.as_str()?.chars();
    match (chars.next(), chars.next()) {
        (Some(code), None) => AttendanceStatus::from_code(code),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_status() {
        assert_eq!(parse_status(&json!("P")), Some(AttendanceStatus::Present));
        assert_eq!(parse_status(&json!("n")), Some(AttendanceStatus::NoClass));
        assert_eq!(parse_status(&json!("L")), None);
        assert_eq!(parse_status(&json!("PA")), None);
        assert_eq!(parse_status(&json!(1)), None);
    }

    #[test]
    fn test_roster_drops_flat_and_unknown_entries() {
        let roster = roster_from_value(
            "teacher_1",
            "Math",
            json!({
                "2024-01-01": "P",
                "15550100": {"2024-01-01": "P", "2024-01-02": "L", "someday": "A"}
            }),
        );

        assert_eq!(roster.len(), 1);
        let marks = &roster["15550100"];
        assert_eq!(marks.len(), 1);
        assert_eq!(
            marks.get(&NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()),
            Some(&AttendanceStatus::Present)
        );
    }

    #[test]
    fn test_non_object_subject_is_empty() {
        assert!(roster_from_value("teacher_1", "Math", json!("oops")).is_empty());
    }
}
