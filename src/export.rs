//! CSV and Excel export of subject reports.

use chrono::NaiveDate;
use rust_xlsxwriter::{Color, Format, FormatBorder, Workbook, XlsxError};
use std::path::{Path, PathBuf};

use crate::models::{StudentReportRow, SubjectTotals};

const REPORT_HEADERS: [&str; 5] = ["Student", "Present", "Absent", "Total", "Percentage"];

/// Export format chosen by the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Excel,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Excel => "xlsx",
        }
    }

    fn filter_name(self) -> &'static str {
        match self {
            ExportFormat::Csv => "CSV Files",
            ExportFormat::Excel => "Excel Files",
        }
    }
}

fn csv_quote(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') || s.contains('\r') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

/// Render the student-wise report as CSV text with a header row.
pub fn student_report_csv(rows: &[StudentReportRow]) -> String {
    let mut csv = REPORT_HEADERS.join(",");
    csv.push('\n');
    for row in rows {
        csv.push_str(&format!(
            "{},{},{},{},{}\n",
            csv_quote(&row.name),
            row.present,
            row.absent,
            row.total,
            row.percentage_label()
        ));
    }
    csv
}

/// Write the student-wise report to a CSV file.
pub fn export_student_report_to_csv(rows: &[StudentReportRow], path: &Path) -> std::io::Result<()> {
    std::fs::write(path, student_report_csv(rows))
}

/// Export the student-wise report and subject totals to an Excel file.
pub fn export_student_report_to_excel(
    subject: &str,
    rows: &[StudentReportRow],
    totals: &SubjectTotals,
    path: &Path,
) -> Result<(), XlsxError> {
    let mut workbook = Workbook::new();

    // Header format
    let header_format = Format::new()
        .set_bold()
        .set_background_color(Color::RGB(0x4472C4))
        .set_font_color(Color::White)
        .set_border(FormatBorder::Thin);

    let percent_format = Format::new().set_num_format("0.0%");

    let worksheet = workbook.add_worksheet();
    worksheet.set_name(sheet_name(subject))?;

    for (col, header) in REPORT_HEADERS.iter().enumerate() {
        worksheet.write_string_with_format(0, col as u16, *header, &header_format)?;
    }

    // Column widths
    worksheet.set_column_width(0, 30)?; // Student
    worksheet.set_column_width(1, 10)?; // Present
    worksheet.set_column_width(2, 10)?; // Absent
    worksheet.set_column_width(3, 10)?; // Total
    worksheet.set_column_width(4, 12)?; // Percentage

    // Data rows
    for (idx, record) in rows.iter().enumerate() {
        let row = (idx + 1) as u32;

        worksheet.write_string(row, 0, &record.name)?;
        worksheet.write_number(row, 1, record.present as f64)?;
        worksheet.write_number(row, 2, record.absent as f64)?;
        worksheet.write_number(row, 3, record.total as f64)?;
        worksheet.write_number_with_format(row, 4, record.percentage / 100.0, &percent_format)?;
    }

    // Autofilter
    if !rows.is_empty() {
        let last_row = rows.len() as u32;
        worksheet.autofilter(0, 0, last_row, 4)?;
    }

    // Freeze top row
    worksheet.set_freeze_panes(1, 0)?;

    // Totals sheet
    let summary = workbook.add_worksheet();
    summary.set_name("Totals")?;
    for (col, header) in ["Present", "Absent", "Holiday", "No Class", "Percentage"].iter().enumerate() {
        summary.write_string_with_format(0, col as u16, *header, &header_format)?;
    }
    summary.write_number(1, 0, totals.present as f64)?;
    summary.write_number(1, 1, totals.absent as f64)?;
    summary.write_number(1, 2, totals.holiday as f64)?;
    summary.write_number(1, 3, totals.no_class as f64)?;
    summary.write_number_with_format(1, 4, totals.percentage() / 100.0, &percent_format)?;

    workbook.save(path)?;
    Ok(())
}

// Excel sheet names are limited to 31 chars and forbid []:*?/\
fn sheet_name(subject: &str) -> String {
    let cleaned: String = subject
        .chars()
        .map(|c| if "[]:*?/\\".contains(c) { '_' } else { c })
        .take(31)
        .collect();
    if cleaned.trim().is_empty() {
        "Report".to_string()
    } else {
        cleaned
    }
}

/// Open save file dialog and return selected path.
pub fn show_save_dialog(default_name: &str, format: ExportFormat) -> Option<PathBuf> {
    rfd::FileDialog::new()
        .set_file_name(default_name)
        .add_filter(format.filter_name(), &[format.extension()])
        .save_file()
}

/// Default report file name, e.g. `attendance_report_Math_2024-01-02.csv`.
pub fn generate_report_filename(subject: &str, date: NaiveDate, format: ExportFormat) -> String {
    let subject: String = subject
        .chars()
        .map(|c| if c.is_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect();
    format!("attendance_report_{subject}_{date}.{ext}", ext = format.extension())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(name: &str, present: usize, absent: usize) -> StudentReportRow {
        StudentReportRow {
            student_id: name.to_lowercase(),
            name: name.to_string(),
            present,
            absent,
            total: present + absent,
            percentage: crate::models::percentage_of(present, absent),
        }
    }

    #[test]
    fn test_csv_has_header_and_rows() {
        let csv = student_report_csv(&[row("Ann", 1, 1)]);
        assert_eq!(csv, "Student,Present,Absent,Total,Percentage\nAnn,1,1,2,50.0%\n");
    }

    #[test]
    fn test_csv_quotes_names() {
        let csv = student_report_csv(&[row("Doe, \"JD\"", 0, 0)]);
        assert!(csv.contains("\"Doe, \"\"JD\"\"\",0,0,0,0.0%"));
    }

    #[test]
    fn test_generate_report_filename() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        assert_eq!(
            generate_report_filename("Math 101", date, ExportFormat::Excel),
            "attendance_report_Math_101_2024-01-02.xlsx"
        );
    }

    #[test]
    fn test_sheet_name_sanitized() {
        assert_eq!(sheet_name("A/B"), "A_B");
        assert_eq!(sheet_name(&"x".repeat(40)).len(), 31);
        assert_eq!(sheet_name(" "), "Report");
    }

    #[test]
    fn test_excel_export_writes_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("report.xlsx");
        let totals = SubjectTotals {
            present: 1,
            absent: 1,
            holiday: 0,
            no_class: 0,
        };

        export_student_report_to_excel("Math", &[row("Ann", 1, 1)], &totals, &path).unwrap();
        assert!(path.metadata().unwrap().len() > 0);
    }

    #[test]
    fn test_csv_export_writes_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("report.csv");
        export_student_report_to_csv(&[row("Ann", 2, 0)], &path).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.ends_with("Ann,2,0,2,100.0%\n"));
    }
}
