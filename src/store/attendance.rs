//! Marking and aggregation over the attendance partition.

use chrono::NaiveDate;
use tracing::debug;

use super::AttendanceStore;
use crate::error::Result;
use crate::models::{
    AttendanceStatus, Distribution, HistoryEntry, LowAttendance, StudentReportRow, SubjectOverview, SubjectTotals,
};

impl AttendanceStore {
    /// Set the status for one student on one date, overwriting any earlier mark.
    pub fn mark_attendance(
        &mut self,
        teacher_id: &str,
        subject: &str,
        student_id: &str,
        date: NaiveDate,
        status: AttendanceStatus,
    ) -> Result<()> {
        let roster = self.roster_mut(teacher_id, subject)?;
        roster.entry(student_id.to_string()).or_default().insert(date, status);

        debug!(
            teacher_id = %teacher_id,
            subject = %subject,
            student_id = %student_id,
            %date,
            status = %status.code(),
            "Attendance marked"
        );
        Ok(())
    }

    /// Mark several students for the same subject and date.
    ///
    /// Returns the number of marks written.
    pub fn mark_many(
        &mut self,
        teacher_id: &str,
        subject: &str,
        date: NaiveDate,
        marks: &[(String, AttendanceStatus)],
    ) -> Result<usize> {
        let roster = self.roster_mut(teacher_id, subject)?;
        for (student_id, status) in marks {
            roster.entry(student_id.clone()).or_default().insert(date, *status);
        }

        debug!(teacher_id = %teacher_id, subject = %subject, %date, count = marks.len(), "Attendance saved");
        Ok(marks.len())
    }

    /// Overall attendance percentage for a subject, P over P+A across all students.
    ///
    /// Zero when the subject is unknown or has no present/absent marks.
    pub fn percentage(&self, teacher_id: &str, subject: &str) -> f64 {
        self.subject_totals(teacher_id, subject)
            .map(|totals| totals.percentage())
            .unwrap_or(0.0)
    }

    /// Raw per-status counts across every student in a subject.
    pub fn subject_totals(&self, teacher_id: &str, subject: &str) -> Result<SubjectTotals> {
        let roster = self.roster(teacher_id, subject)?;
        let mut totals = SubjectTotals::default();
        for status in roster.values().flat_map(|marks| marks.values()) {
            totals.add(*status);
        }
        Ok(totals)
    }

    /// Student-wise present/absent counts for a subject, in roster order.
    pub fn student_report(&self, teacher_id: &str, subject: &str) -> Result<Vec<StudentReportRow>> {
        let roster = self.roster(teacher_id, subject)?;

        let rows = roster
            .iter()
            .map(|(student_id, marks)| {
                let mut totals = SubjectTotals::default();
                for status in marks.values() {
                    totals.add(*status);
                }
                StudentReportRow {
                    student_id: student_id.clone(),
                    name: self.student_name(student_id).to_string(),
                    present: totals.present,
                    absent: totals.absent,
                    total: totals.present + totals.absent,
                    percentage: totals.percentage(),
                }
            })
            .collect();

        Ok(rows)
    }

    /// A student's marks in one subject, newest first.
    pub fn student_history(&self, teacher_id: &str, subject: &str, student_id: &str) -> Result<Vec<HistoryEntry>> {
        let roster = self.roster(teacher_id, subject)?;
        Ok(roster
            .get(student_id)
            .map(|marks| {
                marks
                    .iter()
                    .rev()
                    .map(|(date, status)| HistoryEntry {
                        date: *date,
                        status: *status,
                    })
                    .collect()
            })
            .unwrap_or_default())
    }

    /// Everything a logged-in student sees: each enrolled subject of their teacher.
    ///
    /// Orphaned students (no teacher, or a teacher without a partition) get an
    /// empty list.
    pub fn student_overview(&self, student_id: &str) -> Vec<SubjectOverview> {
        let Some(subjects) = self
            .students
            .get(student_id)
            .and_then(|s| s.teacher_id.as_deref())
            .and_then(|teacher_id| self.attendance.get(teacher_id))
        else {
            return Vec::new();
        };

        subjects
            .iter()
            .filter_map(|(subject, roster)| {
                let marks = roster.get(student_id)?;
                let mut totals = SubjectTotals::default();
                for status in marks.values() {
                    totals.add(*status);
                }
                Some(SubjectOverview {
                    subject: subject.clone(),
                    totals,
                    percentage: totals.percentage(),
                    history: marks
                        .iter()
                        .rev()
                        .map(|(date, status)| HistoryEntry {
                            date: *date,
                            status: *status,
                        })
                        .collect(),
                })
            })
            .collect()
    }

    /// Present/absent split across all of a teacher's subjects.
    pub fn teacher_distribution(&self, teacher_id: &str) -> Distribution {
        let mut dist = Distribution::default();
        let statuses = self
            .attendance
            .get(teacher_id)
            .into_iter()
            .flat_map(|subjects| subjects.values())
            .flat_map(|roster| roster.values())
            .flat_map(|marks| marks.values())
            .filter(|status| status.is_counted());

        for status in statuses {
            if *status == AttendanceStatus::Present {
                dist.present += 1;
            } else {
                dist.absent += 1;
            }
        }
        dist
    }

    /// Subjects with at least one present/absent mark and a percentage below `threshold`.
    pub fn low_attendance(&self, threshold: f64) -> Vec<LowAttendance> {
        let mut out = Vec::new();
        for (teacher_id, subjects) in &self.attendance {
            for (subject, roster) in subjects {
                let mut totals = SubjectTotals::default();
                for status in roster.values().flat_map(|marks| marks.values()) {
                    totals.add(*status);
                }
                if totals.present + totals.absent == 0 {
                    continue;
                }
                let percentage = totals.percentage();
                if percentage < threshold {
                    out.push(LowAttendance {
                        teacher_id: teacher_id.clone(),
                        teacher_name: self.teacher_name(teacher_id).to_string(),
                        subject: subject.clone(),
                        percentage,
                    });
                }
            }
        }
        out
    }
}
