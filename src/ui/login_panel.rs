//! Login panel with teacher/student forms and store totals.

use eframe::egui::{self, RichText, Ui};
use egui_phosphor::regular::{CHALKBOARD_TEACHER, STUDENT};

use super::app::{App, LoginRole};
use super::components::{primary_button_with_icon, stat_card};

pub fn show(app: &mut App, ui: &mut Ui) {
    ui.vertical_centered(|ui| {
        ui.add_space(30.0);

        ui.label(RichText::new("Classroll").size(32.0).strong());
        ui.add_space(5.0);
        ui.label(RichText::new("Subject Attendance Tracker").size(14.0).weak());

        ui.add_space(30.0);

        let summary = app.service.store().summary();
        ui.horizontal(|ui| {
            let available = ui.available_width();
            let start_offset = ((available - 680.0) / 2.0).max(0.0);
            ui.add_space(start_offset);

            stat_card(ui, "Teachers", &summary.teachers.to_string(), "Registered");
            stat_card(ui, "Students", &summary.students.to_string(), "Registered");
            stat_card(ui, "Subjects", &summary.subjects.to_string(), "Across all teachers");
            stat_card(ui, "Records", &summary.marks.to_string(), "Attendance marks");
        });

        ui.add_space(30.0);

        ui.horizontal(|ui| {
            let available = ui.available_width();
            ui.add_space(((available - 220.0) / 2.0).max(0.0));
            ui.selectable_value(&mut app.login_form.role, LoginRole::Teacher, "Teacher");
            ui.selectable_value(&mut app.login_form.role, LoginRole::Student, "Student");
        });

        ui.add_space(15.0);

        egui::Frame::group(ui.style()).show(ui, |ui| {
            ui.set_max_width(360.0);
            match app.login_form.role {
                LoginRole::Teacher => {
                    ui.label("Teacher name");
                    let response = ui.add(
                        egui::TextEdit::singleline(&mut app.login_form.teacher_name)
                            .hint_text("Your name")
                            .desired_width(300.0),
                    );
                    let entered = response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
                    ui.add_space(10.0);
                    if primary_button_with_icon(ui, CHALKBOARD_TEACHER, "Login").clicked() || entered {
                        app.login_teacher();
                    }
                }
                LoginRole::Student => {
                    ui.label("Phone number");
                    let response = ui.add(
                        egui::TextEdit::singleline(&mut app.login_form.student_phone)
                            .hint_text("+1 555 0100")
                            .desired_width(300.0),
                    );
                    let entered = response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
                    ui.add_space(10.0);
                    if primary_button_with_icon(ui, STUDENT, "View My Attendance").clicked() || entered {
                        app.login_student();
                    }
                }
            }
        });
    });
}
