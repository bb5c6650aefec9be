//! Explicit per-session login context.

use crate::error::{AppError, Result};

/// Who is logged in. Passed into every operation that needs a teacher or student.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionContext {
    pub teacher_id: Option<String>,
    pub student_id: Option<String>,
}

impl SessionContext {
    /// Context for a logged-in teacher.
    pub fn teacher(teacher_id: impl Into<String>) -> Self {
        Self {
            teacher_id: Some(teacher_id.into()),
            student_id: None,
        }
    }

    /// Context for a logged-in student.
    pub fn student(student_id: impl Into<String>) -> Self {
        Self {
            teacher_id: None,
            student_id: Some(student_id.into()),
        }
    }

    /// The logged-in teacher, or [`AppError::MissingSelection`].
    pub fn require_teacher(&self) -> Result<&str> {
        self.teacher_id.as_deref().ok_or(AppError::MissingSelection("teacher"))
    }

    /// The logged-in student, or [`AppError::MissingSelection`].
    pub fn require_student(&self) -> Result<&str> {
        self.student_id.as_deref().ok_or(AppError::MissingSelection("student"))
    }

    pub fn is_logged_in(&self) -> bool {
        self.teacher_id.is_some() || self.student_id.is_some()
    }

    /// Forget both identities.
    pub fn logout(&mut self) {
        *self = Self::default();
    }
}

/// A selection that must be present before an operation can run.
pub fn require_selection<'a>(value: Option<&'a str>, what: &'static str) -> Result<&'a str> {
    value.filter(|v| !v.is_empty()).ok_or(AppError::MissingSelection(what))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_teacher() {
        let ctx = SessionContext::teacher("teacher_1");
        assert_eq!(ctx.require_teacher().unwrap(), "teacher_1");
        assert!(matches!(ctx.require_student(), Err(AppError::MissingSelection("student"))));
    }

    #[test]
    fn test_logout_clears_context() {
        let mut ctx = SessionContext::student("100");
        assert!(ctx.is_logged_in());
        ctx.logout();
        assert!(!ctx.is_logged_in());
        assert!(ctx.require_student().is_err());
    }

    #[test]
    fn test_require_selection() {
        assert_eq!(require_selection(Some("Math"), "subject").unwrap(), "Math");
        assert!(matches!(
            require_selection(Some(""), "subject"),
            Err(AppError::MissingSelection("subject"))
        ));
        assert!(require_selection(None, "subject").is_err());
    }
}
