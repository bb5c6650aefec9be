//! Student registration panel.

use eframe::egui::{self, RichText, ScrollArea, Ui};
use egui_phosphor::regular::{PLUS, TRASH};

use super::app::{App, DeleteTarget};
use super::components::{back_button, danger_action_button, panel_header, primary_button_with_icon, styled_button};

/// Show the students panel.
///
/// Returns `true` if the back button was clicked.
pub fn show(app: &mut App, ui: &mut Ui) -> bool {
    let go_back = back_button(ui);
    panel_header(ui, "Manage Students");

    let Some(teacher_id) = app.teacher_id().map(str::to_string) else {
        return true;
    };

    ui.horizontal(|ui| {
        if primary_button_with_icon(ui, PLUS, "Add Student").clicked() {
            app.student_form.reset();
            app.student_form.is_open = true;
        }
    });

    ui.add_space(15.0);

    let store = app.service.store();
    let students: Vec<(String, String, String, String)> = store
        .students_for_teacher(&teacher_id)
        .into_iter()
        .map(|(id, student)| {
            (
                id.to_string(),
                student.name.clone(),
                student.phone.clone(),
                student.registered_at.format("%Y-%m-%d").to_string(),
            )
        })
        .collect();

    if students.is_empty() {
        ui.label(RichText::new("No students registered yet.").weak());
    } else {
        ui.label(format!("{} students", students.len()));
        ui.add_space(10.0);

        ScrollArea::vertical().id_salt("students_scroll").show(ui, |ui| {
            egui::Grid::new("students_grid")
                .num_columns(5)
                .striped(true)
                .min_col_width(60.0)
                .spacing([12.0, 8.0])
                .show(ui, |ui| {
                    ui.strong("Name");
                    ui.strong("Phone");
                    ui.strong("Student ID");
                    ui.strong("Registered");
                    ui.strong("Actions");
                    ui.end_row();

                    for (id, name, phone, registered) in &students {
                        ui.label(name);
                        ui.label(phone);
                        ui.label(RichText::new(id).monospace());
                        ui.label(registered);
                        if danger_action_button(ui, TRASH, "Remove student").clicked() {
                            app.delete_target = Some(DeleteTarget::Student(id.clone(), name.clone()));
                            app.show_delete_confirm = true;
                        }
                        ui.end_row();
                    }
                });
        });
    }

    if app.student_form.is_open {
        show_form_dialog(app, ui.ctx());
    }

    go_back
}

fn show_form_dialog(app: &mut App, ctx: &egui::Context) {
    egui::Window::new("Add Student")
        .collapsible(false)
        .resizable(false)
        .default_width(400.0)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .show(ctx, |ui| {
            ui.add_space(10.0);

            egui::Grid::new("student_form_grid")
                .num_columns(2)
                .spacing([20.0, 10.0])
                .show(ui, |ui| {
                    ui.label("Name:");
                    ui.add(egui::TextEdit::singleline(&mut app.student_form.name).desired_width(250.0));
                    ui.end_row();

                    ui.label("Phone:");
                    ui.add(
                        egui::TextEdit::singleline(&mut app.student_form.phone)
                            .desired_width(250.0)
                            .hint_text("+1 555 0100"),
                    );
                    ui.end_row();
                });

            ui.add_space(5.0);
            ui.weak("The student is enrolled in all of your current subjects.");

            ui.add_space(15.0);
            ui.separator();
            ui.add_space(10.0);

            ui.horizontal(|ui| {
                if styled_button(ui, "Cancel").clicked() {
                    app.student_form.reset();
                }

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if primary_button_with_icon(ui, "", "Save").clicked() {
                        save_student(app);
                    }
                });
            });
        });
}

fn save_student(app: &mut App) {
    // Validation
    if app.student_form.name.trim().is_empty() {
        app.error_message = Some("Name is required".to_string());
        return;
    }
    if app.student_form.phone.trim().is_empty() {
        app.error_message = Some("Phone is required".to_string());
        return;
    }

    app.add_student();
}
