//! Subject management panel.

use eframe::egui::{self, RichText, ScrollArea, Ui};
use egui_phosphor::regular::{PLUS, TRASH};

use super::app::{App, DeleteTarget};
use super::components::{back_button, danger_action_button, panel_header, percentage_bar, primary_button_with_icon};

/// Show the subjects panel.
///
/// Returns `true` if the back button was clicked.
pub fn show(app: &mut App, ui: &mut Ui) -> bool {
    let go_back = back_button(ui);
    panel_header(ui, "Manage Subjects");

    let Some(teacher_id) = app.teacher_id().map(str::to_string) else {
        return true;
    };

    ui.horizontal(|ui| {
        ui.label("New subject:");
        let response = ui.add(
            egui::TextEdit::singleline(&mut app.subject_input)
                .desired_width(220.0)
                .hint_text("e.g. Mathematics"),
        );
        let entered = response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));

        ui.add_space(10.0);

        if primary_button_with_icon(ui, PLUS, "Add Subject").clicked() || entered {
            app.add_subject();
        }
    });

    ui.add_space(15.0);

    let threshold = app.config.reports.low_attendance_threshold;
    let store = app.service.store();
    let rows: Vec<(String, usize, usize, f64)> = store
        .subjects(&teacher_id)
        .into_iter()
        .map(|subject| {
            let (enrolled, marks) = store
                .roster(&teacher_id, subject)
                .map(|roster| (roster.len(), roster.values().map(|m| m.len()).sum()))
                .unwrap_or((0, 0));
            (subject.to_string(), enrolled, marks, store.percentage(&teacher_id, subject))
        })
        .collect();

    if rows.is_empty() {
        ui.label(RichText::new("No subjects yet. Add one above.").weak());
        return go_back;
    }

    ui.label(format!("{} subjects", rows.len()));
    ui.add_space(10.0);

    ScrollArea::vertical().id_salt("subjects_scroll").show(ui, |ui| {
        egui::Grid::new("subjects_grid")
            .num_columns(5)
            .striped(true)
            .min_col_width(60.0)
            .spacing([12.0, 8.0])
            .show(ui, |ui| {
                ui.strong("Subject");
                ui.strong("Students");
                ui.strong("Marks");
                ui.strong("Attendance");
                ui.strong("Actions");
                ui.end_row();

                for (subject, enrolled, marks, percentage) in &rows {
                    ui.label(subject);
                    ui.label(enrolled.to_string());
                    ui.label(marks.to_string());
                    percentage_bar(ui, *percentage, threshold, 140.0);
                    if danger_action_button(ui, TRASH, "Delete subject").clicked() {
                        app.delete_target = Some(DeleteTarget::Subject(subject.clone()));
                        app.show_delete_confirm = true;
                    }
                    ui.end_row();
                }
            });
    });

    go_back
}
