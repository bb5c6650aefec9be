//! Daily attendance marking for one subject.

use chrono::{Local, NaiveDate};
use eframe::egui::{self, RichText, ScrollArea, Ui};
use egui_phosphor::regular::FLOPPY_DISK;

use super::app::App;
use super::components::{back_button, colors, panel_header, primary_button_with_icon, status_color, styled_button};
use crate::models::AttendanceStatus;

/// Parse a date typed as year, month, day with any of `-`, `/`, `.` or space between.
pub(super) fn parse_flexible_date(input: &str) -> Option<NaiveDate> {
    let parts: Vec<&str> = input
        .trim()
        .split(['-', '/', ' ', '.'])
        .filter(|s| !s.is_empty())
        .collect();

    if parts.len() != 3 {
        return None;
    }

    let year: i32 = parts[0].parse().ok()?;
    let month: u32 = parts[1].parse().ok()?;
    let day: u32 = parts[2].parse().ok()?;

    NaiveDate::from_ymd_opt(year, month, day)
}

/// Show the mark attendance panel.
///
/// Returns `true` if the back button was clicked.
pub fn show(app: &mut App, ui: &mut Ui) -> bool {
    let go_back = back_button(ui);
    panel_header(ui, "Mark Attendance");

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

    if subjects.is_empty() {
        ui.label(RichText::new("Add a subject before marking attendance.").weak());
        return go_back;
    }

    let mut needs_refresh = false;

    // Subject and date selection
    ui.horizontal(|ui| {
        ui.label("Subject:");
        egui::ComboBox::from_id_salt("mark_subject")
            .width(180.0)
            .selected_text(app.mark_form.subject.as_deref().unwrap_or("Select..."))
            .show_ui(ui, |ui| {
                for subject in &subjects {
                    if ui
                        .selectable_label(app.mark_form.subject.as_deref() == Some(subject), subject)
                        .clicked()
                    {
                        app.mark_form.subject = Some(subject.clone());
                        needs_refresh = true;
                    }
                }
            });

        ui.add_space(20.0);

        ui.label("Date:");
        let valid = parse_flexible_date(&app.mark_form.date_input).is_some();
        let response = ui.add(
            egui::TextEdit::singleline(&mut app.mark_form.date_input)
                .desired_width(100.0)
                .hint_text("YYYY-MM-DD")
                .text_color(if valid { ui.visuals().text_color() } else { colors::ERROR }),
        );
        if response.changed()
            && let Some(date) = parse_flexible_date(&app.mark_form.date_input)
            && date != app.mark_form.date
        {
            app.mark_form.date = date;
            needs_refresh = true;
        }
        // On focus lost, normalize to YYYY-MM-DD format or reset if invalid
        if response.lost_focus() {
            app.mark_form.sync_date_input();
        }

        let before = app.mark_form.date;
        ui.add(egui_extras::DatePickerButton::new(&mut app.mark_form.date).id_salt("mark_date_picker"));
        if app.mark_form.date != before {
            app.mark_form.sync_date_input();
            needs_refresh = true;
        }

        if styled_button(ui, "Today").clicked() {
            app.mark_form.date = Local::now().date_naive();
            app.mark_form.sync_date_input();
            needs_refresh = true;
        }
    });

    if needs_refresh {
        app.refresh_mark_form();
    }

    ui.add_space(15.0);

    if app.mark_form.subject.is_none() {
        ui.label(RichText::new("Select a subject to start marking.").weak());
        return go_back;
    }

    if app.mark_form.statuses.is_empty() {
        ui.label(RichText::new("No students registered yet.").weak());
        return go_back;
    }

    // Bulk actions
    ui.horizontal(|ui| {
        ui.label("Mark all:");
        for status in AttendanceStatus::ALL {
            if styled_button(ui, status.label()).clicked() {
                for value in app.mark_form.statuses.values_mut() {
                    *value = status;
                }
            }
        }
    });

    ui.add_space(10.0);

    let names: Vec<(String, String)> = app
        .mark_form
        .statuses
        .keys()
        .map(|id| (id.clone(), app.service.store().student_name(id).to_string()))
        .collect();

    ScrollArea::vertical()
        .id_salt("mark_scroll")
        .max_height(ui.available_height() - 60.0)
        .show(ui, |ui| {
            egui::Grid::new("mark_grid")
                .num_columns(2)
                .striped(true)
                .min_col_width(80.0)
                .spacing([12.0, 8.0])
                .show(ui, |ui| {
                    ui.strong("Student");
                    ui.strong("Status");
                    ui.end_row();

                    for (id, name) in &names {
                        ui.label(name);
                        ui.horizontal(|ui| {
                            if let Some(current) = app.mark_form.statuses.get_mut(id) {
                                for status in AttendanceStatus::ALL {
                                    let text = RichText::new(status.label()).color(status_color(status));
                                    ui.radio_value(current, status, text);
                                }
                            }
                        });
                        ui.end_row();
                    }
                });
        });

    ui.add_space(15.0);
    ui.separator();
    ui.add_space(10.0);

    let date_valid = parse_flexible_date(&app.mark_form.date_input).is_some();
    ui.horizontal(|ui| {
        ui.label(format!("{} students", names.len()));
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            ui.add_enabled_ui(date_valid, |ui| {
                if primary_button_with_icon(ui, FLOPPY_DISK, "Save Attendance")
                    .on_disabled_hover_text("Enter a valid date first")
                    .clicked()
                {
                    app.save_attendance();
                }
            });
        });
    });

    go_back
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_flexible_date() {
        let expected = NaiveDate::from_ymd_opt(2024, 3, 5);
        assert_eq!(parse_flexible_date("2024-03-05"), expected);
        assert_eq!(parse_flexible_date("2024/3/5"), expected);
        assert_eq!(parse_flexible_date(" 2024.03.05 "), expected);
        assert_eq!(parse_flexible_date("2024 3 5"), expected);
    }

    #[test]
    fn test_parse_flexible_date_rejects_bad_input() {
        assert_eq!(parse_flexible_date(""), None);
        assert_eq!(parse_flexible_date("2024-13-01"), None);
        assert_eq!(parse_flexible_date("2024-02"), None);
        assert_eq!(parse_flexible_date("march 5 2024"), None);
    }
}
