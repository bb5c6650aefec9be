//! Headless commands: summary, subject report and low-attendance alerts.

use std::fmt::Write as _;
use std::path::PathBuf;

use chrono::Local;
use clap::Subcommand;

use crate::error::Result;
use crate::export;
use crate::store::{AttendanceStore, teacher_id_for_name};

/// Commands that run without opening the window.
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Print teacher, student, subject and mark counts.
    Summary,
    /// Print or export the student-wise report for one subject.
    Report {
        /// Teacher name as used at login.
        #[arg(long)]
        teacher: String,
        /// Subject name.
        #[arg(long)]
        subject: String,
        /// Write the report as CSV to this path.
        #[arg(long, conflicts_with = "xlsx")]
        csv: Option<PathBuf>,
        /// Write the report as an Excel workbook to this path.
        #[arg(long)]
        xlsx: Option<PathBuf>,
    },
    /// List subjects whose attendance is below the threshold.
    Alerts {
        /// Override the configured threshold (percent).
        #[arg(long)]
        threshold: Option<f64>,
    },
}

/// Run a command against a loaded store, returning the text to print.
pub fn run(store: &AttendanceStore, command: &Command, default_threshold: f64) -> Result<String> {
    match command {
        Command::Summary => Ok(summary(store)),
        Command::Report {
            teacher,
            subject,
            csv,
            xlsx,
        } => report(store, teacher, subject, csv.as_ref(), xlsx.as_ref()),
        Command::Alerts { threshold } => Ok(alerts(store, threshold.unwrap_or(default_threshold))),
    }
}

fn summary(store: &AttendanceStore) -> String {
    let s = store.summary();
    format!(
        "Teachers: {}\nStudents: {}\nSubjects: {}\nAttendance records: {}\n",
        s.teachers, s.students, s.subjects, s.marks
    )
}

fn report(
    store: &AttendanceStore,
    teacher: &str,
    subject: &str,
    csv: Option<&PathBuf>,
    xlsx: Option<&PathBuf>,
) -> Result<String> {
    let teacher_id = teacher_id_for_name(teacher.trim());
    let rows = store.student_report(&teacher_id, subject)?;
    let totals = store.subject_totals(&teacher_id, subject)?;

    if let Some(path) = csv {
        export::export_student_report_to_csv(&rows, path)?;
        return Ok(format!("Exported {} rows to {}\n", rows.len(), path.display()));
    }
    if let Some(path) = xlsx {
        export::export_student_report_to_excel(subject, &rows, &totals, path)?;
        return Ok(format!("Exported {} rows to {}\n", rows.len(), path.display()));
    }

    let mut out = String::new();
    let _ = writeln!(
        out,
        "{} / {} ({})",
        store.teacher_name(&teacher_id),
        subject,
        Local::now().date_naive()
    );
    let _ = writeln!(
        out,
        "Present {}  Absent {}  Holiday {}  No Class {}  Overall {:.1}%",
        totals.present,
        totals.absent,
        totals.holiday,
        totals.no_class,
        totals.percentage()
    );
    out.push_str(&export::student_report_csv(&rows));
    Ok(out)
}

fn alerts(store: &AttendanceStore, threshold: f64) -> String {
    let low = store.low_attendance(threshold);
    if low.is_empty() {
        return format!("No subjects below {threshold:.1}%\n");
    }

    let mut out = String::new();
    for item in low {
        let _ = writeln!(
            out,
            "{}'s {} attendance below {:.0}% ({:.1}%)",
            item.teacher_name, item.subject, threshold, item.percentage
        );
    }
    out
}
