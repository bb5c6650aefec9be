//! Teacher, student and subject management.

use chrono::Utc;
use tracing::debug;

use super::{AttendanceStore, ids};
use crate::error::{AppError, Result};
use crate::models::{Student, Teacher};

impl AttendanceStore {
    /// Register (or re-register) a teacher by name.
    ///
    /// Upserts the teacher record, refreshing `registered_at`, and makes sure an
    /// attendance partition exists. Existing subjects are kept.
    pub fn register_teacher(&mut self, name: &str) -> Result<String> {
        let name = name.trim();
        if name.is_empty() {
            return Err(AppError::validation("Teacher name is required"));
        }

        let teacher_id = ids::teacher_id_for_name(name);
        self.teachers.insert(
            teacher_id.clone(),
            Teacher {
                name: name.to_string(),
                registered_at: Utc::now(),
            },
        );
        self.attendance.entry(teacher_id.clone()).or_default();

        debug!(teacher_id = %teacher_id, "Teacher registered");
        Ok(teacher_id)
    }

    /// Register a new student for a teacher.
    ///
    /// Fails with [`AppError::DuplicateStudent`] when the phone is already in
    /// use anywhere. On success the student is enrolled into every subject the
    /// teacher currently has. Subjects added later do not pick the student up.
    pub fn register_student(&mut self, name: &str, phone: &str, teacher_id: &str) -> Result<String> {
        let name = name.trim();
        if name.is_empty() {
            return Err(AppError::validation("Student name is required"));
        }
        let student_id = ids::student_id_for_phone(phone);
        if student_id.is_empty() {
            return Err(AppError::validation("Phone number is required"));
        }
        if self.students.contains_key(&student_id) {
            return Err(AppError::DuplicateStudent(student_id));
        }

        self.students.insert(
            student_id.clone(),
            Student {
                name: name.to_string(),
                phone: phone.trim().to_string(),
                teacher_id: Some(teacher_id.to_string()),
                registered_at: Utc::now(),
            },
        );

        if let Some(subjects) = self.attendance.get_mut(teacher_id) {
            for roster in subjects.values_mut() {
                roster.entry(student_id.clone()).or_default();
            }
        }

        debug!(student_id = %student_id, teacher_id = %teacher_id, "Student registered");
        Ok(student_id)
    }

    /// Find an existing student by phone for a student login.
    ///
    /// The name is not checked; the phone is the identity.
    pub fn login_student(&self, phone: &str) -> Result<String> {
        let student_id = ids::student_id_for_phone(phone);
        if student_id.is_empty() {
            return Err(AppError::validation("Phone number is required"));
        }
        if self.students.contains_key(&student_id) {
            Ok(student_id)
        } else {
            Err(AppError::not_found(format!("student with phone '{}'", phone.trim())))
        }
    }

    /// Add an empty subject to a teacher.
    pub fn add_subject(&mut self, teacher_id: &str, subject: &str) -> Result<()> {
        let subject = subject.trim();
        if subject.is_empty() {
            return Err(AppError::validation("Subject name is required"));
        }

        let subjects = self.attendance.entry(teacher_id.to_string()).or_default();
        if subjects.contains_key(subject) {
            return Err(AppError::DuplicateSubject(subject.to_string()));
        }
        subjects.insert(subject.to_string(), Default::default());

        debug!(teacher_id = %teacher_id, subject = %subject, "Subject added");
        Ok(())
    }

    /// Delete a subject and every mark recorded under it.
    pub fn delete_subject(&mut self, teacher_id: &str, subject: &str) -> Result<()> {
        let removed = self
            .attendance
            .get_mut(teacher_id)
            .and_then(|subjects| subjects.remove(subject));

        match removed {
            Some(roster) => {
                debug!(
                    teacher_id = %teacher_id,
                    subject = %subject,
                    students = roster.len(),
                    "Subject deleted"
                );
                Ok(())
            }
            None => Err(AppError::not_found(format!("subject '{subject}'"))),
        }
    }

    /// Remove a student, their marks under their teacher, then the record itself.
    ///
    /// When the student's teacher has no attendance partition the mark cleanup
    /// is skipped and only the record goes.
    pub fn remove_student(&mut self, student_id: &str) -> Result<()> {
        let Some(student) = self.students.get(student_id) else {
            return Err(AppError::not_found(format!("student '{student_id}'")));
        };

        if let Some(subjects) = student
            .teacher_id
            .as_deref()
            .and_then(|teacher_id| self.attendance.get_mut(teacher_id))
        {
            for roster in subjects.values_mut() {
                roster.remove(student_id);
            }
        }
        self.students.remove(student_id);

        debug!(student_id = %student_id, "Student removed");
        Ok(())
    }

    /// Students registered by a teacher, ordered by name then id.
    pub fn students_for_teacher(&self, teacher_id: &str) -> Vec<(&str, &Student)> {
        let mut students: Vec<_> = self
            .students
            .iter()
            .filter(|(_, s)| s.teacher_id.as_deref() == Some(teacher_id))
            .map(|(id, s)| (id.as_str(), s))
            .collect();
        students.sort_by(|a, b| a.1.name.cmp(&b.1.name).then_with(|| a.0.cmp(b.0)));
        students
    }
}
