//! Data models for teachers, students, and attendance marks.

pub mod attendance;
pub mod student;
pub mod teacher;

pub use attendance::{
    AttendanceStatus, Distribution, HistoryEntry, LowAttendance, StoreSummary, StudentReportRow, SubjectOverview,
    SubjectTotals, percentage_of,
};
pub use student::Student;
pub use teacher::Teacher;

mod timestamp;
