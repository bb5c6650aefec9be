//! Analytics panel with subject percentages, present/absent split, and alerts.

use eframe::egui::{self, CornerRadius, Margin, RichText, ScrollArea, Ui};
use egui_phosphor::regular::WARNING;

use super::app::App;
use super::components::{back_button, colors, panel_header, percentage_bar, stat_card};

/// Show the analytics panel.
///
/// Returns `true` if the back button was clicked.
pub fn show(app: &mut App, ui: &mut Ui) -> bool {
    let go_back = back_button(ui);
    panel_header(ui, "Analytics");

    let Some(teacher_id) = app.teacher_id().map(str::to_string) else {
        return true;
    };

    let threshold = app.config.reports.low_attendance_threshold;
    let store = app.service.store();
    let distribution = store.teacher_distribution(&teacher_id);

    ui.horizontal(|ui| {
        stat_card(ui, "Present", &distribution.present.to_string(), "All subjects");
        stat_card(ui, "Absent", &distribution.absent.to_string(), "All subjects");
        stat_card(ui, "Attendance", &format!("{:.1}%", distribution.percentage()), "Present vs absent");
    });

    ui.add_space(20.0);

    ui.columns(2, |columns| {
        // Left column: per-subject percentages
        section(&mut columns[0], "Subject-wise Attendance", |ui| {
            let subjects = store.subjects(&teacher_id);
            if subjects.is_empty() {
                ui.label(RichText::new("No subjects yet").weak());
                return;
            }
            egui::Grid::new("analytics_subjects_grid")
                .num_columns(2)
                .spacing([12.0, 8.0])
                .show(ui, |ui| {
                    for subject in subjects {
                        ui.label(subject);
                        percentage_bar(ui, store.percentage(&teacher_id, subject), threshold, 200.0);
                        ui.end_row();
                    }
                });
        });

        // Right column: low attendance alerts across all teachers
        section(&mut columns[1], "Low Attendance Alerts", |ui| {
            let alerts = store.low_attendance(threshold);
            if alerts.is_empty() {
                ui.colored_label(colors::SUCCESS, format!("No subjects below {:.0}%", threshold));
                return;
            }
            ScrollArea::vertical().max_height(300.0).show(ui, |ui| {
                for alert in alerts {
                    let text = format!(
                        "{} {}'s {} attendance below {:.0}% ({:.1}%)",
                        WARNING, alert.teacher_name, alert.subject, threshold, alert.percentage
                    );
                    let mut label = RichText::new(text).color(colors::ERROR);
                    if alert.teacher_id == teacher_id {
                        label = label.strong();
                    }
                    ui.label(label);
                }
            });
        });
    });

    go_back
}

fn section(ui: &mut Ui, title: &str, add_contents: impl FnOnce(&mut Ui)) {
    egui::Frame::new()
        .fill(ui.style().visuals.extreme_bg_color)
        .inner_margin(Margin::same(15))
        .corner_radius(CornerRadius::same(8))
        .show(ui, |ui| {
            ui.label(RichText::new(title).strong());
            ui.add_space(10.0);
            add_contents(ui);
        });
}
