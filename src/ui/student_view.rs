//! Read-only attendance view for a logged-in student.

use eframe::egui::{self, CollapsingHeader, RichText, ScrollArea, Ui};

use super::app::App;
use super::components::{percentage_bar, stat_card, status_color};
use crate::models::percentage_of;

pub fn show(app: &mut App, ui: &mut Ui) {
    let Some(student_id) = app.session.student_id.clone() else {
        return;
    };

    let threshold = app.config.reports.low_attendance_threshold;
    let store = app.service.store();
    let overview = store.student_overview(&student_id);
    let teacher = store
        .students
        .get(&student_id)
        .and_then(|s| s.teacher_id.as_deref())
        .map(|id| store.teacher_name(id))
        .unwrap_or(crate::store::UNKNOWN_TEACHER);

    ui.heading(RichText::new(format!("Hello, {}", store.student_name(&student_id))).size(24.0));
    ui.label(RichText::new(format!("Teacher: {}", teacher)).weak());
    ui.add_space(10.0);
    ui.separator();
    ui.add_space(20.0);

    if overview.is_empty() {
        ui.label(RichText::new("You are not enrolled in any subjects yet.").weak());
        return;
    }

    let present: usize = overview.iter().map(|o| o.totals.present).sum();
    let absent: usize = overview.iter().map(|o| o.totals.absent).sum();

    ui.horizontal(|ui| {
        stat_card(ui, "Subjects", &overview.len().to_string(), "Enrolled");
        stat_card(ui, "Present", &present.to_string(), "All subjects");
        stat_card(ui, "Absent", &absent.to_string(), "All subjects");
        stat_card(ui, "Overall", &format!("{:.1}%", percentage_of(present, absent)), "Present vs absent");
    });

    ui.add_space(20.0);

    ScrollArea::vertical().id_salt("student_view_scroll").show(ui, |ui| {
        for item in &overview {
            ui.horizontal(|ui| {
                ui.label(RichText::new(&item.subject).strong());
                ui.add_space(10.0);
                percentage_bar(ui, item.percentage, threshold, 200.0);
            });

            CollapsingHeader::new(format!("{} marks", item.history.len()))
                .id_salt(("student_history", &item.subject))
                .show(ui, |ui| {
                    egui::Grid::new(("student_history_grid", &item.subject))
                        .num_columns(2)
                        .striped(true)
                        .spacing([12.0, 6.0])
                        .show(ui, |ui| {
                            for entry in &item.history {
                                ui.label(entry.date.format("%Y-%m-%d").to_string());
                                ui.colored_label(status_color(entry.status), entry.status.label());
                                ui.end_row();
                            }
                        });
                });

            ui.add_space(10.0);
        }
    });
}
