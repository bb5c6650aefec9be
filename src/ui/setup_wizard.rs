//! First-run setup wizard for configuration.

use std::path::PathBuf;

use crate::config::AppConfig;
use crate::models::AttendanceStatus;
use crate::store::{JsonFileRepository, Repository};
use eframe::egui::{self, Color32, RichText};

/// Data file check state.
#[derive(Default, Clone)]
pub enum StorageCheckState {
    #[default]
    NotChecked,
    Ok { teachers: usize, students: usize },
    Failed(String),
}

/// Setup wizard state.
pub struct SetupWizard {
    /// Current step (0-3).
    pub current_step: usize,
    /// Configuration being built.
    pub config: AppConfig,
    /// Data file check state.
    pub storage_state: StorageCheckState,
    /// Wizard completed flag.
    pub completed: bool,
    /// Data file path as string for text editing.
    data_file_input: String,
    /// Threshold input as string.
    threshold_input: String,
}

impl Default for SetupWizard {
    fn default() -> Self {
        Self::new()
    }
}

impl SetupWizard {
    pub fn new() -> Self {
        let config = AppConfig::default();
        Self {
            current_step: 0,
            data_file_input: config.storage.data_file.display().to_string(),
            threshold_input: format!("{:.0}", config.reports.low_attendance_threshold),
            config,
            storage_state: StorageCheckState::NotChecked,
            completed: false,
        }
    }

    /// Check if user can proceed to next step.
    pub fn can_proceed(&self) -> bool {
        match self.current_step {
            0 => true, // Welcome - always can proceed
            1 => matches!(self.storage_state, StorageCheckState::Ok { .. }),
            2 => self.config.validate().is_ok(),
            3 => true, // Confirmation
            _ => false,
        }
    }

    /// Open (without locking) and read the chosen data file.
    fn check_storage(&mut self) {
        self.config.storage.data_file = PathBuf::from(self.data_file_input.trim());
        if self.config.storage.data_file.as_os_str().is_empty() {
            self.storage_state = StorageCheckState::Failed("Path is empty".to_string());
            return;
        }

        let result = JsonFileRepository::open(&self.config.storage.data_file, false).and_then(|mut repo| repo.load());
        self.storage_state = match result {
            Ok(store) => StorageCheckState::Ok {
                teachers: store.teachers.len(),
                students: store.students.len(),
            },
            Err(e) => StorageCheckState::Failed(e.to_string()),
        };
    }

    /// Get step title.
    fn step_title(&self) -> &'static str {
        match self.current_step {
            0 => "Welcome",
            1 => "Data File",
            2 => "Reports",
            3 => "Confirmation",
            _ => "Setup",
        }
    }

    /// Total number of steps.
    const TOTAL_STEPS: usize = 4;
}

/// Setup wizard application.
pub struct SetupApp {
    pub wizard: SetupWizard,
    pub initial_error: Option<String>,
    config_path: PathBuf,
}

impl SetupApp {
    pub fn new(wizard: SetupWizard, initial_error: Option<String>, config_path: PathBuf) -> Self {
        Self {
            wizard,
            initial_error,
            config_path,
        }
    }
}

impl eframe::App for SetupApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Show initial error dialog
        if let Some(err) = self.initial_error.clone() {
            egui::Window::new("Configuration Error")
                .collapsible(false)
                .resizable(false)
                .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
                .show(ctx, |ui| {
                    ui.colored_label(Color32::from_rgb(255, 100, 100), &err);
                    ui.add_space(10.0);
                    if ui.button("OK").clicked() {
                        self.initial_error = None;
                    }
                });
            return;
        }

        // Main wizard panel
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                ui.add_space(20.0);

                // Header
                ui.horizontal(|ui| {
                    ui.heading(RichText::new("Classroll Setup").size(24.0).strong());
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        ui.label(format!(
                            "Step {} of {}",
                            self.wizard.current_step + 1,
                            SetupWizard::TOTAL_STEPS
                        ));
                    });
                });

                ui.separator();
                ui.add_space(10.0);

                // Step title
                ui.heading(self.wizard.step_title());
                ui.add_space(20.0);

                // Step content
                match self.wizard.current_step {
                    0 => show_welcome_step(ui),
                    1 => {
                        if show_storage_step(ui, &mut self.wizard) {
                            self.wizard.check_storage();
                        }
                    }
                    2 => show_reports_step(ui, &mut self.wizard),
                    3 => show_confirmation_step(ui, &self.wizard),
                    _ => {}
                }

                ui.add_space(30.0);
                ui.separator();

                // Navigation buttons
                ui.horizontal(|ui| {
                    if self.wizard.current_step > 0 && ui.button("< Back").clicked() {
                        self.wizard.current_step -= 1;
                    }

                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if self.wizard.current_step < SetupWizard::TOTAL_STEPS - 1 {
                            let btn_text = if self.wizard.current_step == 0 {
                                "Get Started >"
                            } else {
                                "Next >"
                            };
                            let enabled = self.wizard.can_proceed();
                            if ui.add_enabled(enabled, egui::Button::new(btn_text)).clicked() {
                                self.wizard.current_step += 1;
                            }
                        } else {
                            // Final step - Save & Exit
                            if ui.button("Save & Exit").clicked() {
                                self.wizard.completed = true;
                            }
                        }
                    });
                });
            });
        });

        // Handle completion
        if self.wizard.completed {
            match self.wizard.config.save(&self.config_path) {
                Ok(()) => {
                    tracing::info!("Config saved to {:?}", self.config_path);
                    ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                }
                Err(e) => {
                    self.initial_error = Some(format!("Failed to save config: {}", e));
                    self.wizard.completed = false;
                }
            }
        }
    }
}

fn show_welcome_step(ui: &mut egui::Ui) {
    ui.label("Welcome to Classroll!");
    ui.add_space(10.0);
    ui.label("This wizard will help you configure the application.");
    ui.add_space(20.0);
    ui.label("You will need:");
    ui.add_space(5.0);
    ui.label("  - A location for the attendance data file");
    ui.label("  - An existing attendance.json to reuse (optional)");
}

/// Returns `true` when the data file should be checked.
fn show_storage_step(ui: &mut egui::Ui, wizard: &mut SetupWizard) -> bool {
    let mut needs_check = false;

    egui::Grid::new("storage_grid")
        .num_columns(2)
        .spacing([20.0, 8.0])
        .striped(true)
        .show(ui, |ui| {
            ui.label("Data file:");
            ui.horizontal(|ui| {
                if ui
                    .add(egui::TextEdit::singleline(&mut wizard.data_file_input).desired_width(320.0))
                    .changed()
                {
                    wizard.storage_state = StorageCheckState::NotChecked;
                }
                if ui.button("Browse...").clicked()
                    && let Some(path) = rfd::FileDialog::new()
                        .set_file_name("attendance.json")
                        .add_filter("JSON Files", &["json"])
                        .save_file()
                {
                    wizard.data_file_input = path.display().to_string();
                    wizard.storage_state = StorageCheckState::NotChecked;
                }
            });
            ui.end_row();

            ui.label("Single writer lock:");
            ui.checkbox(&mut wizard.config.storage.lock, "Refuse to open a file another session holds");
            ui.end_row();
        });

    ui.add_space(20.0);

    ui.horizontal(|ui| {
        if ui.button("Check Data File").clicked() {
            needs_check = true;
        }

        ui.add_space(10.0);

        match &wizard.storage_state {
            StorageCheckState::NotChecked => {
                ui.label("Not checked");
            }
            StorageCheckState::Ok { teachers, students } => {
                ui.colored_label(
                    Color32::from_rgb(100, 200, 100),
                    format!("Ready ({teachers} teachers, {students} students)"),
                );
            }
            StorageCheckState::Failed(e) => {
                ui.colored_label(Color32::from_rgb(255, 100, 100), format!("Failed: {}", e));
            }
        }
    });

    needs_check
}

fn show_reports_step(ui: &mut egui::Ui, wizard: &mut SetupWizard) {
    egui::Grid::new("reports_grid")
        .num_columns(2)
        .spacing([20.0, 8.0])
        .striped(true)
        .show(ui, |ui| {
            ui.label("Low attendance alert (%):");
            if ui.text_edit_singleline(&mut wizard.threshold_input).changed()
                && let Ok(t) = wizard.threshold_input.trim().parse()
            {
                wizard.config.reports.low_attendance_threshold = t;
            }
            ui.end_row();

            ui.label("Default status:");
            let current = wizard.config.default_status();
            egui::ComboBox::from_id_salt("setup_default_status")
                .selected_text(current.label())
                .show_ui(ui, |ui| {
                    for status in AttendanceStatus::ALL {
                        if ui.selectable_label(current == status, status.label()).clicked() {
                            wizard.config.ui.default_status = status.code();
                        }
                    }
                });
            ui.end_row();
        });

    if let Err(e) = wizard.config.validate() {
        ui.add_space(10.0);
        ui.colored_label(Color32::from_rgb(255, 100, 100), e.to_string());
    }
}

fn show_confirmation_step(ui: &mut egui::Ui, wizard: &SetupWizard) {
    ui.label("Review your configuration:");
    ui.add_space(10.0);

    egui::Frame::group(ui.style()).show(ui, |ui| {
        ui.heading("Data File");
        ui.label(format!("  {}", wizard.config.storage.data_file.display()));
        ui.label(format!(
            "  Lock: {}",
            if wizard.config.storage.lock { "Enabled" } else { "Disabled" }
        ));
    });

    ui.add_space(10.0);

    egui::Frame::group(ui.style()).show(ui, |ui| {
        ui.heading("Reports");
        ui.label(format!(
            "  Alert below: {:.1}%",
            wizard.config.reports.low_attendance_threshold
        ));
        ui.label(format!("  Default status: {}", wizard.config.default_status()));
    });

    ui.add_space(20.0);
    ui.label("Click 'Save & Exit' to save and close the wizard.");
    ui.label("You will need to restart the application after setup.");
}
