//! Teacher dashboard with stats, navigation cards, quick actions, and activity log.

use chrono::Local;
use eframe::egui::{self, Color32, CornerRadius, Margin, RichText, ScrollArea, Ui};
use egui_phosphor::regular::{BOOKS, CALENDAR_CHECK, CHART_BAR, CHART_PIE, USERS};

use super::app::{App, LogLevel, Panel};
use super::components::{dashboard_card, stat_card};

/// Show the dashboard panel.
///
/// Returns `Some(panel)` if navigation is requested.
pub fn show(app: &mut App, ui: &mut Ui) -> Option<Panel> {
    let mut next_panel = None;
    let Some(teacher_id) = app.teacher_id().map(str::to_string) else {
        return Some(Panel::Login);
    };

    ui.vertical_centered(|ui| {
        ui.add_space(30.0);

        // Header
        let store = app.service.store();
        ui.label(
            RichText::new(format!("Welcome, {}", store.teacher_name(&teacher_id)))
                .size(32.0)
                .strong(),
        );
        ui.add_space(5.0);
        ui.label(RichText::new("Subject Attendance Tracker").size(14.0).weak());

        ui.add_space(30.0);

        // Stat cards row
        let subjects = store.subjects(&teacher_id);
        let students = store.students_for_teacher(&teacher_id).len();
        let distribution = store.teacher_distribution(&teacher_id);
        let today = count_today_marks(app, &teacher_id);

        ui.horizontal(|ui| {
            let available = ui.available_width();
            let start_offset = ((available - 680.0) / 2.0).max(0.0);
            ui.add_space(start_offset);

            stat_card(ui, "Subjects", &subjects.len().to_string(), "You teach");
            stat_card(ui, "Students", &students.to_string(), "Registered by you");
            stat_card(ui, "Today's Marks", &today.to_string(), "Across all subjects");
            stat_card(
                ui,
                "Overall",
                &format!("{:.1}%", distribution.percentage()),
                "Present vs absent",
            );
        });

        ui.add_space(30.0);

        // Navigation cards row
        let available = ui.available_width();
        let num_cards = 5.0;
        let spacing = 24.0;
        let total_spacing = spacing * (num_cards - 1.0);
        let card_width = ((available - total_spacing) / num_cards).clamp(140.0, 220.0);
        let card_height = card_width * 0.75;
        let card_size = egui::vec2(card_width, card_height);
        let total_width = card_width * num_cards + total_spacing;
        let start_offset = ((available - total_width) / 2.0).max(0.0);

        ui.horizontal(|ui| {
            ui.add_space(start_offset);

            if dashboard_card(ui, "Subjects", "Add or delete subjects", BOOKS, card_size).clicked() {
                next_panel = Some(Panel::Subjects);
            }

            ui.add_space(spacing);

            if dashboard_card(ui, "Students", "Register and remove", USERS, card_size).clicked() {
                next_panel = Some(Panel::Students);
            }

            ui.add_space(spacing);

            if dashboard_card(ui, "Mark Attendance", "Daily marks per subject", CALENDAR_CHECK, card_size).clicked() {
                next_panel = Some(Panel::MarkAttendance);
            }

            ui.add_space(spacing);

            if dashboard_card(ui, "Reports", "Student-wise & export", CHART_BAR, card_size).clicked() {
                next_panel = Some(Panel::Reports);
            }

            ui.add_space(spacing);

            if dashboard_card(ui, "Analytics", "Percentages and alerts", CHART_PIE, card_size).clicked() {
                next_panel = Some(Panel::Analytics);
            }
        });

        ui.add_space(30.0);
    });

    // Two-column layout: Quick Actions | Recent Activity
    let available_width = ui.available_width();
    let column_width = (available_width - 40.0) / 2.0;

    ui.horizontal(|ui| {
        ui.add_space(10.0);

        // Left column - Quick Actions
        ui.vertical(|ui| {
            ui.set_width(column_width);

            egui::Frame::new()
                .fill(ui.style().visuals.extreme_bg_color)
                .inner_margin(Margin::same(15))
                .corner_radius(CornerRadius::same(8))
                .show(ui, |ui| {
                    ui.set_min_width(column_width - 30.0);

                    ui.label(RichText::new("Quick Actions").strong());
                    ui.add_space(10.0);

                    if ui.button("Mark Today's Attendance").clicked() {
                        let subject = app.service.store().subjects(&teacher_id).first().map(|s| s.to_string());
                        app.mark_form.subject = subject;
                        app.mark_form.date = Local::now().date_naive();
                        app.mark_form.sync_date_input();
                        app.refresh_mark_form();
                        next_panel = Some(Panel::MarkAttendance);
                    }

                    ui.add_space(5.0);

                    if ui.button("Add Student").clicked() {
                        app.student_form.reset();
                        app.student_form.is_open = true;
                        next_panel = Some(Panel::Students);
                    }
                });
        });

        ui.add_space(20.0);

        // Right column - Recent Activity
        ui.vertical(|ui| {
            ui.set_width(column_width);

            egui::Frame::new()
                .fill(ui.style().visuals.extreme_bg_color)
                .inner_margin(Margin::same(15))
                .corner_radius(CornerRadius::same(8))
                .show(ui, |ui| {
                    ui.set_min_width(column_width - 30.0);

                    ui.label(RichText::new("Recent Activity").strong());
                    ui.add_space(10.0);

                    ScrollArea::vertical().max_height(150.0).show(ui, |ui| {
                        if app.log_messages.is_empty() {
                            ui.label(RichText::new("No recent activity").weak());
                        } else {
                            for entry in app.log_messages.iter().rev().take(10) {
                                let color = match entry.level {
                                    LogLevel::Info => Color32::GRAY,
                                    LogLevel::Success => Color32::from_rgb(100, 200, 100),
                                    LogLevel::Warning => Color32::from_rgb(230, 180, 50),
                                    LogLevel::Error => Color32::from_rgb(230, 100, 100),
                                };

                                ui.horizontal(|ui| {
                                    ui.label(
                                        RichText::new(entry.timestamp.format("%H:%M:%S").to_string())
                                            .small()
                                            .color(Color32::DARK_GRAY),
                                    );
                                    ui.label(RichText::new(&entry.message).color(color));
                                });
                            }
                        }
                    });
                });
        });
    });

    next_panel
}

/// Count marks the teacher has recorded for today.
fn count_today_marks(app: &App, teacher_id: &str) -> usize {
    let today = Local::now().date_naive();
    app.service
        .store()
        .attendance
        .get(teacher_id)
        .map(|subjects| {
            subjects
                .values()
                .flat_map(|roster| roster.values())
                .filter(|marks| marks.contains_key(&today))
                .count()
        })
        .unwrap_or(0)
}
