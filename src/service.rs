//! Attendance service: the in-memory store plus its repository.
//!
//! Every mutating call runs against the store and then saves the whole
//! document. A failed save rolls the in-memory store back so memory and disk
//! never disagree.

use chrono::NaiveDate;
use tracing::{error, info};

use crate::error::{AppError, Result};
use crate::models::AttendanceStatus;
use crate::session::{SessionContext, require_selection};
use crate::store::{AttendanceStore, Repository};

/// Store and repository bound together for one running session.
pub struct AttendanceService {
    store: AttendanceStore,
    repo: Box<dyn Repository>,
}

impl AttendanceService {
    /// Load the document from `repo`.
    pub fn open(mut repo: Box<dyn Repository>) -> Result<Self> {
        let store = repo.load()?;
        info!("Attendance store opened from {}", repo.describe());
        Ok(Self { store, repo })
    }

    /// Read-only access for queries.
    pub fn store(&self) -> &AttendanceStore {
        &self.store
    }

    /// Where the document is persisted.
    pub fn storage_description(&self) -> String {
        self.repo.describe()
    }

    /// Re-read the document from storage, discarding in-memory state.
    pub fn reload(&mut self) -> Result<()> {
        self.store = self.repo.load()?;
        Ok(())
    }

    /// Apply a mutation and persist it.
    ///
    /// If `f` fails nothing is saved. If the save fails the store is restored
    /// to its state before `f` ran.
    pub fn mutate<T>(&mut self, f: impl FnOnce(&mut AttendanceStore) -> Result<T>) -> Result<T> {
        let snapshot = self.store.clone();
        let value = f(&mut self.store)?;

        if let Err(e) = self.repo.save(&self.store) {
            error!("Save failed, rolling back: {}", e);
            self.store = snapshot;
            return Err(e);
        }
        Ok(value)
    }

    /// Register or re-register a teacher and return their session.
    pub fn login_teacher(&mut self, name: &str) -> Result<SessionContext> {
        let teacher_id = self.mutate(|store| store.register_teacher(name))?;
        info!(teacher_id = %teacher_id, "Teacher logged in");
        Ok(SessionContext::teacher(teacher_id))
    }

    /// Log a registered student in by phone.
    pub fn login_student(&self, phone: &str) -> Result<SessionContext> {
        let student_id = self.store.login_student(phone)?;
        info!(student_id = %student_id, "Student logged in");
        Ok(SessionContext::student(student_id))
    }

    pub fn add_subject(&mut self, ctx: &SessionContext, subject: &str) -> Result<()> {
        let teacher_id = ctx.require_teacher()?.to_string();
        self.mutate(|store| store.add_subject(&teacher_id, subject))
    }

    pub fn delete_subject(&mut self, ctx: &SessionContext, subject: Option<&str>) -> Result<()> {
        let teacher_id = ctx.require_teacher()?.to_string();
        let subject = require_selection(subject, "subject")?;
        self.mutate(|store| store.delete_subject(&teacher_id, subject))
    }

    pub fn add_student(&mut self, ctx: &SessionContext, name: &str, phone: &str) -> Result<String> {
        let teacher_id = ctx.require_teacher()?.to_string();
        self.mutate(|store| store.register_student(name, phone, &teacher_id))
    }

    /// Remove one of the logged-in teacher's students.
    ///
    /// Students registered by another teacher are reported as not found.
    pub fn remove_student(&mut self, ctx: &SessionContext, student_id: Option<&str>) -> Result<()> {
        let teacher_id = ctx.require_teacher()?;
        let student_id = require_selection(student_id, "student")?;

        let owned = self
            .store
            .students
            .get(student_id)
            .is_some_and(|s| s.teacher_id.as_deref() == Some(teacher_id));
        if !owned {
            return Err(AppError::not_found(format!("student '{student_id}'")));
        }

        self.mutate(|store| store.remove_student(student_id))
    }

    /// Save one day's marks for a subject.
    pub fn save_attendance(
        &mut self,
        ctx: &SessionContext,
        subject: Option<&str>,
        date: NaiveDate,
        marks: &[(String, AttendanceStatus)],
    ) -> Result<usize> {
        let teacher_id = ctx.require_teacher()?.to_string();
        let subject = require_selection(subject, "subject")?;
        self.mutate(|store| store.mark_many(&teacher_id, subject, date, marks))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryRepository;

    /// Repository whose saves always fail.
    struct BrokenRepository;

    impl Repository for BrokenRepository {
        fn load(&mut self) -> Result<AttendanceStore> {
            Ok(AttendanceStore::new())
        }

        fn save(&mut self, _store: &AttendanceStore) -> Result<()> {
            Err(AppError::storage("disk full"))
        }

        fn describe(&self) -> String {
            "broken".to_string()
        }
    }

    #[test]
    fn test_teacher_flow_persists() {
        let mut service = AttendanceService::open(Box::new(MemoryRepository::new())).unwrap();
        let ctx = service.login_teacher("T1").unwrap();
        service.add_subject(&ctx, "Math").unwrap();
        let student = service.add_student(&ctx, "Ann", "+1 555 0100").unwrap();

        let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let written = service
            .save_attendance(&ctx, Some("Math"), date, &[(student.clone(), AttendanceStatus::Present)])
            .unwrap();
        assert_eq!(written, 1);

        service.reload().unwrap();
        assert_eq!(service.store().percentage(ctx.require_teacher().unwrap(), "Math"), 100.0);
    }

    #[test]
    fn test_missing_selection() {
        let mut service = AttendanceService::open(Box::new(MemoryRepository::new())).unwrap();
        let nobody = SessionContext::default();
        assert!(matches!(
            service.add_subject(&nobody, "Math"),
            Err(AppError::MissingSelection("teacher"))
        ));

        let ctx = service.login_teacher("T1").unwrap();
        let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        assert!(matches!(
            service.save_attendance(&ctx, None, date, &[]),
            Err(AppError::MissingSelection("subject"))
        ));
        assert!(matches!(
            service.remove_student(&ctx, None),
            Err(AppError::MissingSelection("student"))
        ));
    }

    #[test]
    fn test_failed_save_rolls_back() {
        let mut service = AttendanceService::open(Box::new(BrokenRepository)).unwrap();
        let result = service.login_teacher("T1");

        assert!(matches!(result, Err(AppError::StorageUnavailable(_))));
        assert!(service.store().teachers.is_empty());
    }

    #[test]
    fn test_failed_mutation_does_not_save() {
        let mut service = AttendanceService::open(Box::new(MemoryRepository::new())).unwrap();
        let ctx = service.login_teacher("T1").unwrap();
        service.add_subject(&ctx, "Math").unwrap();

        assert!(matches!(
            service.add_subject(&ctx, "Math"),
            Err(AppError::DuplicateSubject(_))
        ));
        assert_eq!(service.store().subjects(ctx.require_teacher().unwrap()), vec!["Math"]);
    }

    #[test]
    fn test_remove_student_of_other_teacher_is_not_found() {
        let mut service = AttendanceService::open(Box::new(MemoryRepository::new())).unwrap();
        let owner = service.login_teacher("T1").unwrap();
        service.add_subject(&owner, "Math").unwrap();
        let student = service.add_student(&owner, "Ann", "100").unwrap();

        let other = service.login_teacher("T2").unwrap();
        assert!(matches!(
            service.remove_student(&other, Some(&student)),
            Err(AppError::NotFound(_))
        ));
        assert!(service.store().students.contains_key(&student));

        service.remove_student(&owner, Some(&student)).unwrap();
        assert!(!service.store().students.contains_key(&student));
    }

    #[test]
    fn test_student_login_requires_registration() {
        let mut service = AttendanceService::open(Box::new(MemoryRepository::new())).unwrap();
        assert!(matches!(service.login_student("100"), Err(AppError::NotFound(_))));

        let ctx = service.login_teacher("T1").unwrap();
        let id = service.add_student(&ctx, "Ann", "100").unwrap();
        let student_ctx = service.login_student("100").unwrap();
        assert_eq!(student_ctx.require_student().unwrap(), id);
    }
}
