//! Behaviour tests for the attendance store.

use chrono::{NaiveDate, TimeZone, Utc};

use super::{AttendanceStore, MemoryRepository, Repository, UNKNOWN_NAME, UNKNOWN_STUDENT, UNKNOWN_TEACHER};
use crate::error::AppError;
use crate::models::{AttendanceStatus, HistoryEntry};

use AttendanceStatus::{Absent, Holiday, NoClass, Present};

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
}

/// Teacher "T1" with subject "Math" and one student (phone "+1 555 0100").
fn seeded() -> (AttendanceStore, String, String) {
    let mut store = AttendanceStore::new();
    let teacher = store.register_teacher("T1").unwrap();
    store.add_subject(&teacher, "Math").unwrap();
    let student = store.register_student("Ann", "+1 555 0100", &teacher).unwrap();
    (store, teacher, student)
}

#[test]
fn test_end_to_end_percentage_and_report() {
    let (mut store, teacher, student) = seeded();
    assert_eq!(student, "15550100");

    store.mark_attendance(&teacher, "Math", &student, day(1), Present).unwrap();
    store.mark_attendance(&teacher, "Math", &student, day(2), Absent).unwrap();

    assert_eq!(store.percentage(&teacher, "Math"), 50.0);

    let report = store.student_report(&teacher, "Math").unwrap();
    assert_eq!(report.len(), 1);
    let row = &report[0];
    assert_eq!(row.name, "Ann");
    assert_eq!((row.present, row.absent, row.total), (1, 1, 2));
    assert_eq!(row.percentage_label(), "50.0%");
}

#[test]
fn test_percentage_zero_without_marks() {
    let (store, teacher, _) = seeded();
    assert_eq!(store.percentage(&teacher, "Math"), 0.0);
    assert_eq!(store.percentage(&teacher, "Nope"), 0.0);
    assert_eq!(store.percentage("teacher_x", "Math"), 0.0);
}

#[test]
fn test_percentage_excludes_holiday_and_no_class() {
    let (mut store, teacher, student) = seeded();
    for (d, status) in [(1, Present), (2, Present), (3, Absent), (4, Holiday), (5, NoClass)] {
        store.mark_attendance(&teacher, "Math", &student, day(d), status).unwrap();
    }

    let pct = store.percentage(&teacher, "Math");
    assert_eq!(format!("{pct:.1}"), "66.7");

    let totals = store.subject_totals(&teacher, "Math").unwrap();
    assert_eq!((totals.present, totals.absent, totals.holiday, totals.no_class), (2, 1, 1, 1));
}

#[test]
fn test_percentage_is_global_not_averaged() {
    let (mut store, teacher, ann) = seeded();
    let bob = store.register_student("Bob", "200", &teacher).unwrap();

    // Ann 1/1 present, Bob 1/3 present: global 2/4 = 50, per-student average would be 66.7
    store.mark_attendance(&teacher, "Math", &ann, day(1), Present).unwrap();
    store.mark_attendance(&teacher, "Math", &bob, day(1), Present).unwrap();
    store.mark_attendance(&teacher, "Math", &bob, day(2), Absent).unwrap();
    store.mark_attendance(&teacher, "Math", &bob, day(3), Absent).unwrap();

    assert_eq!(store.percentage(&teacher, "Math"), 50.0);
}

#[test]
fn test_register_teacher_is_idempotent() {
    let mut store = AttendanceStore::new();
    let first = store.register_teacher("Alice").unwrap();
    store.add_subject(&first, "Art").unwrap();
    let second = store.register_teacher("Alice").unwrap();

    assert_eq!(first, second);
    assert_eq!(store.teachers.len(), 1);
    assert_eq!(store.attendance.len(), 1);
    assert_eq!(store.subjects(&first), vec!["Art"]);
}

#[test]
fn test_reregistering_teacher_refreshes_record() {
    let mut store = AttendanceStore::new();
    let id = store.register_teacher("Alice").unwrap();
    let old = Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap();
    store.teachers.get_mut(&id).unwrap().registered_at = old;

    assert_eq!(store.register_teacher("Alice").unwrap(), id);
    assert!(store.teachers[&id].registered_at > old);

    // Names sharing an id are the same teacher; the latest name wins.
    let first = store.register_teacher("Teacher AQ").unwrap();
    store.add_subject(&first, "Math").unwrap();
    let second = store.register_teacher("Teacher NH").unwrap();

    assert_eq!(first, second);
    assert_eq!(store.teacher_name(&first), "Teacher NH");
    assert_eq!(store.subjects(&first), vec!["Math"]);
}

#[test]
fn test_register_teacher_rejects_blank_name() {
    let mut store = AttendanceStore::new();
    assert!(matches!(store.register_teacher("  "), Err(AppError::Validation(_))));
    assert!(store.teachers.is_empty());
}

#[test]
fn test_duplicate_student_leaves_existing_untouched() {
    let (mut store, teacher, student) = seeded();
    store.mark_attendance(&teacher, "Math", &student, day(1), Present).unwrap();
    let before = store.clone();

    let other = store.register_teacher("T2").unwrap();
    let before_with_t2 = store.clone();
    let result = store.register_student("Impostor", "15550100", &other);

    assert!(matches!(result, Err(AppError::DuplicateStudent(id)) if id == "15550100"));
    assert_eq!(store, before_with_t2);
    assert_eq!(store.students, before.students);
    assert_eq!(store.student_name(&student), "Ann");
}

#[test]
fn test_register_student_enrolls_into_existing_subjects_only() {
    let mut store = AttendanceStore::new();
    let teacher = store.register_teacher("T1").unwrap();
    store.add_subject(&teacher, "Math").unwrap();
    store.add_subject(&teacher, "Science").unwrap();
    let ann = store.register_student("Ann", "100", &teacher).unwrap();

    store.add_subject(&teacher, "History").unwrap();

    assert!(store.attendance[&teacher]["Math"].contains_key(&ann));
    assert!(store.attendance[&teacher]["Science"].contains_key(&ann));
    assert!(!store.attendance[&teacher]["History"].contains_key(&ann));
    assert!(store.student_report(&teacher, "History").unwrap().is_empty());
}

#[test]
fn test_duplicate_subject() {
    let (mut store, teacher, _) = seeded();
    let result = store.add_subject(&teacher, "Math");
    assert!(matches!(result, Err(AppError::DuplicateSubject(s)) if s == "Math"));
}

#[test]
fn test_subjects_are_per_teacher() {
    let (mut store, _, _) = seeded();
    let other = store.register_teacher("T2").unwrap();
    assert!(store.subjects(&other).is_empty());
    store.add_subject(&other, "Math").unwrap();
    assert!(store.has_subject(&other, "Math"));
}

#[test]
fn test_mark_attendance_overwrites() {
    let (mut store, teacher, student) = seeded();
    store.mark_attendance(&teacher, "Math", &student, day(1), Present).unwrap();
    store.mark_attendance(&teacher, "Math", &student, day(1), Absent).unwrap();

    let history = store.student_history(&teacher, "Math", &student).unwrap();
    assert_eq!(
        history,
        vec![HistoryEntry {
            date: day(1),
            status: Absent
        }]
    );
}

#[test]
fn test_mark_attendance_creates_student_entry_lazily() {
    let (mut store, teacher, _) = seeded();
    store.add_subject(&teacher, "Art").unwrap();
    store.mark_attendance(&teacher, "Art", "15550100", day(3), Present).unwrap();

    assert_eq!(store.student_report(&teacher, "Art").unwrap().len(), 1);
}

#[test]
fn test_mark_attendance_unknown_subject() {
    let (mut store, teacher, student) = seeded();
    let result = store.mark_attendance(&teacher, "Nope", &student, day(1), Present);
    assert!(matches!(result, Err(AppError::NotFound(_))));
}

#[test]
fn test_mark_many() {
    let (mut store, teacher, ann) = seeded();
    let bob = store.register_student("Bob", "200", &teacher).unwrap();

    let written = store
        .mark_many(&teacher, "Math", day(4), &[(ann.clone(), Present), (bob.clone(), Holiday)])
        .unwrap();

    assert_eq!(written, 2);
    let totals = store.subject_totals(&teacher, "Math").unwrap();
    assert_eq!((totals.present, totals.holiday), (1, 1));
}

#[test]
fn test_delete_subject_cascades() {
    let (mut store, teacher, student) = seeded();
    store.mark_attendance(&teacher, "Math", &student, day(1), Present).unwrap();

    store.delete_subject(&teacher, "Math").unwrap();

    assert!(matches!(store.student_report(&teacher, "Math"), Err(AppError::NotFound(_))));
    assert!(store.student_overview(&student).is_empty());
    assert_eq!(store.summary().marks, 0);
    assert!(matches!(store.delete_subject(&teacher, "Math"), Err(AppError::NotFound(_))));
}

#[test]
fn test_remove_student_cascades() {
    let (mut store, teacher, student) = seeded();
    store.add_subject(&teacher, "Art").unwrap();
    store.mark_attendance(&teacher, "Math", &student, day(1), Present).unwrap();
    store.mark_attendance(&teacher, "Art", &student, day(1), Absent).unwrap();

    store.remove_student(&student).unwrap();

    assert_eq!(store.lookup_name(&student), UNKNOWN_NAME);
    assert_eq!(store.student_name(&student), UNKNOWN_STUDENT);
    for roster in store.attendance[&teacher].values() {
        assert!(!roster.contains_key(&student));
    }
    assert!(store.students_for_teacher(&teacher).is_empty());
}

#[test]
fn test_remove_orphan_student() {
    let mut store = AttendanceStore::new();
    let student = store.register_student("Ann", "100", "teacher_gone").unwrap();
    assert!(store.attendance.is_empty());

    store.remove_student(&student).unwrap();
    assert!(store.students.is_empty());
    assert!(matches!(store.remove_student(&student), Err(AppError::NotFound(_))));
}

#[test]
fn test_student_history_is_newest_first() {
    let (mut store, teacher, student) = seeded();
    store.mark_attendance(&teacher, "Math", &student, day(2), Absent).unwrap();
    store.mark_attendance(&teacher, "Math", &student, day(5), Present).unwrap();
    store.mark_attendance(&teacher, "Math", &student, day(1), Holiday).unwrap();

    let dates: Vec<_> = store
        .student_history(&teacher, "Math", &student)
        .unwrap()
        .into_iter()
        .map(|e| e.date)
        .collect();
    assert_eq!(dates, vec![day(5), day(2), day(1)]);

    assert!(store.student_history(&teacher, "Math", "999").unwrap().is_empty());
}

#[test]
fn test_student_overview() {
    let (mut store, teacher, student) = seeded();
    store.add_subject(&teacher, "Art").unwrap();
    store.mark_attendance(&teacher, "Math", &student, day(1), Present).unwrap();
    store.mark_attendance(&teacher, "Math", &student, day(2), NoClass).unwrap();

    let overview = store.student_overview(&student);
    // Enrolled in Math only; Art was added after registration.
    assert_eq!(overview.len(), 1);
    assert_eq!(overview[0].subject, "Math");
    assert_eq!(overview[0].totals.no_class, 1);
    assert_eq!(overview[0].percentage, 100.0);
    assert_eq!(overview[0].history[0].date, day(2));
}

#[test]
fn test_orphan_student_overview_is_empty() {
    let mut store = AttendanceStore::new();
    let student = store.register_student("Ann", "100", "teacher_gone").unwrap();
    assert!(store.student_overview(&student).is_empty());
}

#[test]
fn test_login_student() {
    let (store, _, student) = seeded();
    assert_eq!(store.login_student("+1 555 0100").unwrap(), student);
    assert!(matches!(store.login_student("+1 555 0199"), Err(AppError::NotFound(_))));
    assert!(matches!(store.login_student(" + "), Err(AppError::Validation(_))));
}

#[test]
fn test_name_lookup_placeholders() {
    let (store, teacher, student) = seeded();
    assert_eq!(store.lookup_name(&teacher), "T1");
    assert_eq!(store.lookup_name(&student), "Ann");
    assert_eq!(store.teacher_name("teacher_none"), UNKNOWN_TEACHER);
    assert_eq!(store.lookup_name("nobody"), UNKNOWN_NAME);
}

#[test]
fn test_summary_counts() {
    let (mut store, teacher, student) = seeded();
    store.add_subject(&teacher, "Art").unwrap();
    let other = store.register_teacher("T2").unwrap();
    store.add_subject(&other, "Math").unwrap();
    store.mark_attendance(&teacher, "Math", &student, day(1), Present).unwrap();
    store.mark_attendance(&teacher, "Math", &student, day(2), Holiday).unwrap();

    let summary = store.summary();
    assert_eq!(summary.teachers, 2);
    assert_eq!(summary.students, 1);
    assert_eq!(summary.subjects, 3);
    assert_eq!(summary.marks, 2);
}

#[test]
fn test_students_for_teacher_sorted_by_name() {
    let (mut store, teacher, _) = seeded();
    store.register_student("Aaron", "300", &teacher).unwrap();
    let other = store.register_teacher("T2").unwrap();
    store.register_student("Zed", "400", &other).unwrap();

    let names: Vec<_> = store
        .students_for_teacher(&teacher)
        .into_iter()
        .map(|(_, s)| s.name.as_str())
        .collect();
    assert_eq!(names, vec!["Aaron", "Ann"]);
}

#[test]
fn test_teacher_distribution() {
    let (mut store, teacher, student) = seeded();
    store.add_subject(&teacher, "Art").unwrap();
    store.mark_attendance(&teacher, "Math", &student, day(1), Present).unwrap();
    store.mark_attendance(&teacher, "Art", &student, day(1), Absent).unwrap();
    store.mark_attendance(&teacher, "Art", &student, day(2), Holiday).unwrap();
    store.mark_attendance(&teacher, "Art", &student, day(3), NoClass).unwrap();

    let dist = store.teacher_distribution(&teacher);
    assert_eq!((dist.present, dist.absent), (1, 1));
    assert_eq!(store.teacher_distribution("teacher_none").percentage(), 0.0);
}

#[test]
fn test_low_attendance() {
    let (mut store, teacher, student) = seeded();
    store.add_subject(&teacher, "Art").unwrap();
    store.add_subject(&teacher, "Empty").unwrap();
    store.mark_attendance(&teacher, "Math", &student, day(1), Present).unwrap();
    store.mark_attendance(&teacher, "Art", &student, day(1), Present).unwrap();
    store.mark_attendance(&teacher, "Art", &student, day(2), Absent).unwrap();

    let low = store.low_attendance(75.0);
    assert_eq!(low.len(), 1);
    assert_eq!(low[0].subject, "Art");
    assert_eq!(low[0].teacher_name, "T1");
    assert_eq!(low[0].percentage, 50.0);
}

#[test]
fn test_mutation_then_save_through_repository() {
    let (store, teacher, student) = seeded();
    let mut repo = MemoryRepository::with_store(store);

    let mut store = repo.load().unwrap();
    store.mark_attendance(&teacher, "Math", &student, day(1), Present).unwrap();
    // Not persisted until saved.
    assert_eq!(repo.load().unwrap().summary().marks, 0);

    repo.save(&store).unwrap();
    assert_eq!(repo.load().unwrap().summary().marks, 1);
}
