//! Reports panel: subject totals, student-wise table, history and export.

use eframe::egui::{self, RichText, ScrollArea, Ui};
use egui_phosphor::regular::{CLOCK_COUNTER_CLOCKWISE, FILE_CSV, FILE_XLS};

use super::app::App;
use super::components::{
    back_button, colors, panel_header, percentage_bar, stat_card, status_color, styled_button_with_icon,
};
use crate::export::ExportFormat;

/// Show the reports panel.
///
/// Returns `true` if the back button was clicked.
pub fn show(app: &mut App, ui: &mut Ui) -> bool {
    let go_back = back_button(ui);
    panel_header(ui, "Attendance Reports");

    let Some(teacher_id) = app.teacher_id().map(str::to_string) else {
        return true;
    };

    let subjects: Vec<String> = app
        .service
        .store()
        .subjects(&teacher_id)
        .into_iter()
        .map(str::to_string)
        .collect();

    // Toolbar
    ui.horizontal(|ui| {
        ui.label("Subject:");
        egui::ComboBox::from_id_salt("report_subject")
            .width(180.0)
            .selected_text(app.report_subject.as_deref().unwrap_or("Select..."))
            .show_ui(ui, |ui| {
                for subject in &subjects {
                    if ui
                        .selectable_label(app.report_subject.as_deref() == Some(subject), subject)
                        .clicked()
                    {
                        app.report_subject = Some(subject.clone());
                        app.history_student = None;
                    }
                }
            });

        ui.add_space(20.0);

        let has_subject = app.report_subject.is_some();
        ui.add_enabled_ui(has_subject, |ui| {
            if styled_button_with_icon(ui, FILE_CSV, "Export CSV").clicked() {
                app.export_report(ExportFormat::Csv);
            }
            ui.add_space(10.0);
            if styled_button_with_icon(ui, FILE_XLS, "Export Excel").clicked() {
                app.export_report(ExportFormat::Excel);
            }
        });
    });

    ui.add_space(15.0);

    let Some(subject) = app.report_subject.clone() else {
        ui.label(RichText::new("Select a subject to see its report.").weak());
        return go_back;
    };

    let store = app.service.store();
    let (rows, totals) = match store
        .student_report(&teacher_id, &subject)
        .and_then(|rows| store.subject_totals(&teacher_id, &subject).map(|totals| (rows, totals)))
    {
        Ok(report) => report,
        Err(e) => {
            ui.colored_label(colors::ERROR, e.to_string());
            return go_back;
        }
    };
    let history = app
        .history_student
        .as_deref()
        .and_then(|student_id| store.student_history(&teacher_id, &subject, student_id).ok());
    let threshold = app.config.reports.low_attendance_threshold;

    // Totals
    ui.horizontal(|ui| {
        stat_card(ui, "Present", &totals.present.to_string(), "Marks");
        stat_card(ui, "Absent", &totals.absent.to_string(), "Marks");
        stat_card(ui, "Holiday", &totals.holiday.to_string(), "Not counted");
        stat_card(ui, "No Class", &totals.no_class.to_string(), "Not counted");
        stat_card(ui, "Overall", &format!("{:.1}%", totals.percentage()), "Present vs absent");
    });

    ui.add_space(15.0);

    if rows.is_empty() {
        ui.label(RichText::new("No students enrolled in this subject.").weak());
        return go_back;
    }

    ui.columns(2, |columns| {
        // Left column: student-wise table
        ScrollArea::vertical().id_salt("report_scroll").show(&mut columns[0], |ui| {
            egui::Grid::new("report_grid")
                .num_columns(6)
                .striped(true)
                .min_col_width(50.0)
                .spacing([12.0, 8.0])
                .show(ui, |ui| {
                    ui.strong("Student");
                    ui.strong("Present");
                    ui.strong("Absent");
                    ui.strong("Total");
                    ui.strong("Percentage");
                    ui.strong("");
                    ui.end_row();

                    for row in &rows {
                        ui.label(&row.name);
                        ui.label(row.present.to_string());
                        ui.label(row.absent.to_string());
                        ui.label(row.total.to_string());
                        percentage_bar(ui, row.percentage, threshold, 120.0);
                        if ui
                            .button(CLOCK_COUNTER_CLOCKWISE)
                            .on_hover_text("Show history")
                            .clicked()
                        {
                            app.history_student = Some(row.student_id.clone());
                        }
                        ui.end_row();
                    }
                });
        });

        // Right column: history for the chosen student
        let ui = &mut columns[1];
        match (&app.history_student, history) {
            (Some(student_id), Some(entries)) => {
                ui.label(RichText::new(format!("History: {}", app.service.store().student_name(student_id))).strong());
                ui.add_space(10.0);
                if entries.is_empty() {
                    ui.label(RichText::new("No marks recorded").weak());
                }
                ScrollArea::vertical().id_salt("history_scroll").show(ui, |ui| {
                    egui::Grid::new("history_grid")
                        .num_columns(2)
                        .striped(true)
                        .spacing([12.0, 6.0])
                        .show(ui, |ui| {
                            for entry in &entries {
                                ui.label(entry.date.format("%Y-%m-%d").to_string());
                                ui.colored_label(status_color(entry.status), entry.status.label());
                                ui.end_row();
                            }
                        });
                });
            }
            _ => {
                ui.label(RichText::new("Pick a student to see their history.").weak());
            }
        }
    });

    go_back
}
