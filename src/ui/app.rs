//! Main application UI.

use std::collections::BTreeMap;
use std::path::PathBuf;

use chrono::{DateTime, Local, NaiveDate};
use eframe::egui::{self, Align, Layout};

use crate::config::AppConfig;
use crate::error::{AppError, Result};
use crate::export::{self, ExportFormat};
use crate::models::AttendanceStatus;
use crate::service::AttendanceService;
use crate::session::SessionContext;

use super::components::colors;
use super::{analytics_panel, dashboard, login_panel, mark_panel, reports_panel, student_view, students_panel, subjects_panel};

/// Current panel being displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Panel {
    #[default]
    Login,
    Dashboard,
    Subjects,
    Students,
    MarkAttendance,
    Reports,
    Analytics,
    StudentView,
}

impl Panel {
    /// Get the display name for the panel.
    pub fn name(&self) -> &'static str {
        match self {
            Panel::Login => "Login",
            Panel::Dashboard => "Dashboard",
            Panel::Subjects => "Subjects",
            Panel::Students => "Students",
            Panel::MarkAttendance => "Mark Attendance",
            Panel::Reports => "Reports",
            Panel::Analytics => "Analytics",
            Panel::StudentView => "My Attendance",
        }
    }
}

/// Which login form is shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoginRole {
    #[default]
    Teacher,
    Student,
}

/// Login form inputs.
#[derive(Default, Clone)]
pub struct LoginForm {
    pub role: LoginRole,
    pub teacher_name: String,
    pub student_phone: String,
}

/// Form state for registering a student.
#[derive(Default, Clone)]
pub struct StudentForm {
    pub name: String,
    pub phone: String,
    pub is_open: bool,
}

impl StudentForm {
    /// Reset the form to default values.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// One day's marks being edited for a subject.
#[derive(Clone)]
pub struct MarkForm {
    pub subject: Option<String>,
    pub date: NaiveDate,
    pub date_input: String,
    /// Student id to chosen status.
    pub statuses: BTreeMap<String, AttendanceStatus>,
}

impl Default for MarkForm {
    fn default() -> Self {
        let today = Local::now().date_naive();
        Self {
            subject: None,
            date: today,
            date_input: today.format("%Y-%m-%d").to_string(),
            statuses: BTreeMap::new(),
        }
    }
}

impl MarkForm {
    pub fn sync_date_input(&mut self) {
        self.date_input = self.date.format("%Y-%m-%d").to_string();
    }
}

/// Log level for UI messages.
#[derive(Clone, Copy, Debug)]
pub enum LogLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// Log entry for display in the UI.
#[derive(Clone)]
pub struct LogEntry {
    pub timestamp: DateTime<Local>,
    pub message: String,
    pub level: LogLevel,
}

/// Target for delete confirmation dialog.
#[derive(Clone)]
pub enum DeleteTarget {
    Subject(String),
    Student(String, String),
}

/// Main application state.
pub struct App {
    pub service: AttendanceService,
    pub config: AppConfig,
    pub session: SessionContext,

    // Navigation
    pub current_panel: Panel,

    // Forms
    pub login_form: LoginForm,
    pub subject_input: String,
    pub student_form: StudentForm,
    pub mark_form: MarkForm,
    pub report_subject: Option<String>,
    pub history_student: Option<String>,

    // Log messages
    pub log_messages: Vec<LogEntry>,

    // Dialogs
    pub show_delete_confirm: bool,
    pub delete_target: Option<DeleteTarget>,
    pub error_message: Option<String>,
    pub success_message: Option<String>,
}

impl App {
    pub fn new(service: AttendanceService, config: AppConfig) -> Self {
        let mut app = Self {
            service,
            config,
            session: SessionContext::default(),
            current_panel: Panel::default(),
            login_form: LoginForm::default(),
            subject_input: String::new(),
            student_form: StudentForm::default(),
            mark_form: MarkForm::default(),
            report_subject: None,
            history_student: None,
            log_messages: Vec::new(),
            show_delete_confirm: false,
            delete_target: None,
            error_message: None,
            success_message: None,
        };

        let description = app.service.storage_description();
        app.log_info(format!("Opened {}", description));
        app
    }

    /// Log a message to the UI log.
    pub fn log(&mut self, level: LogLevel, message: impl Into<String>) {
        self.log_messages.push(LogEntry {
            timestamp: Local::now(),
            message: message.into(),
            level,
        });

        // Keep only last 100 messages
        if self.log_messages.len() > 100 {
            self.log_messages.remove(0);
        }
    }

    pub fn log_info(&mut self, message: impl Into<String>) {
        self.log(LogLevel::Info, message);
    }

    pub fn log_success(&mut self, message: impl Into<String>) {
        self.log(LogLevel::Success, message);
    }

    pub fn log_warning(&mut self, message: impl Into<String>) {
        self.log(LogLevel::Warning, message);
    }

    pub fn log_error(&mut self, message: impl Into<String>) {
        self.log(LogLevel::Error, message);
    }

    /// Show and log a failed action.
    fn report_error(&mut self, action: &str, err: AppError) {
        tracing::warn!("{} failed: {}", action, err);
        let message = format!("{} failed: {}", action, err);
        if err.is_recoverable() {
            self.log_warning(message.clone());
        } else {
            self.log_error(message.clone());
        }
        self.error_message = Some(message);
    }

    /// Run a service call with the current session, reporting any error.
    fn run<T>(
        &mut self,
        action: &str,
        f: impl FnOnce(&mut AttendanceService, &SessionContext) -> Result<T>,
    ) -> Option<T> {
        match f(&mut self.service, &self.session) {
            Ok(value) => Some(value),
            Err(e) => {
                self.report_error(action, e);
                None
            }
        }
    }

    /// Name of whoever is logged in, for the status bar.
    pub fn current_user(&self) -> Option<String> {
        let store = self.service.store();
        if let Some(id) = &self.session.teacher_id {
            return Some(format!("Teacher: {}", store.teacher_name(id)));
        }
        self.session
            .student_id
            .as_ref()
            .map(|id| format!("Student: {}", store.student_name(id)))
    }

    /// The logged-in teacher's id, if any.
    pub fn teacher_id(&self) -> Option<&str> {
        self.session.teacher_id.as_deref()
    }

    pub fn login_teacher(&mut self) {
        let name = self.login_form.teacher_name.trim().to_string();
        let Some(session) = self.run("Login", |service, _| service.login_teacher(&name)) else {
            return;
        };
        self.session = session;
        self.login_form = LoginForm::default();
        self.log_success(format!("Logged in as {}", name));
        self.current_panel = Panel::Dashboard;
    }

    pub fn login_student(&mut self) {
        let phone = self.login_form.student_phone.clone();
        let Some(session) = self.run("Login", |service, _| service.login_student(&phone)) else {
            return;
        };
        self.session = session;
        self.login_form = LoginForm::default();
        if let Some(name) = self.current_user() {
            self.log_success(format!("Logged in ({})", name));
        }
        self.current_panel = Panel::StudentView;
    }

    pub fn logout(&mut self) {
        self.session.logout();
        self.mark_form = MarkForm::default();
        self.student_form.reset();
        self.subject_input.clear();
        self.report_subject = None;
        self.history_student = None;
        self.current_panel = Panel::Login;
        self.log_info("Logged out");
    }

    /// Re-read the data file, dropping anything not yet saved.
    pub fn reload(&mut self) {
        if self.run("Reload", |service, _| service.reload()).is_some() {
            self.log_info("Data reloaded");
            self.refresh_mark_form();
        }
    }

    pub fn add_subject(&mut self) {
        let subject = self.subject_input.trim().to_string();
        if subject.is_empty() {
            self.error_message = Some("Enter a subject name".to_string());
            return;
        }
        if self
            .run("Add subject", |service, ctx| service.add_subject(ctx, &subject))
            .is_some()
        {
            self.subject_input.clear();
            self.log_success(format!("Subject '{}' added", subject));
        }
    }

    pub fn add_student(&mut self) {
        let name = self.student_form.name.clone();
        let phone = self.student_form.phone.clone();
        if let Some(id) = self.run("Add student", |service, ctx| service.add_student(ctx, &name, &phone)) {
            self.student_form.reset();
            self.log_success(format!("Student '{}' registered ({})", name.trim(), id));
            self.refresh_mark_form();
        }
    }

    /// Save the marks currently in the form.
    pub fn save_attendance(&mut self) {
        if mark_panel::parse_flexible_date(&self.mark_form.date_input).is_none() {
            self.error_message = Some(format!("Invalid date '{}'", self.mark_form.date_input.trim()));
            return;
        }

        let subject = self.mark_form.subject.clone();
        let date = self.mark_form.date;
        let marks: Vec<(String, AttendanceStatus)> = self
            .mark_form
            .statuses
            .iter()
            .map(|(id, status)| (id.clone(), *status))
            .collect();

        if let Some(count) = self.run("Save attendance", |service, ctx| {
            service.save_attendance(ctx, subject.as_deref(), date, &marks)
        }) {
            let message = format!(
                "Saved {} marks for {} on {}",
                count,
                subject.unwrap_or_default(),
                date
            );
            self.log_success(message.clone());
            self.success_message = Some(message);
        }
    }

    /// Rebuild the per-student statuses for the selected subject and date.
    ///
    /// Existing marks are kept, everyone else gets the configured default.
    pub fn refresh_mark_form(&mut self) {
        self.mark_form.statuses.clear();
        let (Some(teacher_id), Some(subject)) = (self.session.teacher_id.as_deref(), self.mark_form.subject.as_deref())
        else {
            return;
        };

        let store = self.service.store();
        let default_status = self.config.default_status();
        let roster = store.roster(teacher_id, subject).ok();

        for (student_id, _) in store.students_for_teacher(teacher_id) {
            let status = roster
                .and_then(|r| r.get(student_id))
                .and_then(|marks| marks.get(&self.mark_form.date))
                .copied()
                .unwrap_or(default_status);
            self.mark_form.statuses.insert(student_id.to_string(), status);
        }
    }

    /// Export the report for the selected subject.
    pub fn export_report(&mut self, format: ExportFormat) {
        let Some(subject) = self.report_subject.clone() else {
            self.error_message = Some("Select a subject first".to_string());
            return;
        };
        let Some(teacher_id) = self.session.teacher_id.clone() else {
            return;
        };

        let store = self.service.store();
        let report = store
            .student_report(&teacher_id, &subject)
            .and_then(|rows| store.subject_totals(&teacher_id, &subject).map(|totals| (rows, totals)));
        let (rows, totals) = match report {
            Ok(report) => report,
            Err(e) => {
                self.report_error("Export", e);
                return;
            }
        };

        let default_name = export::generate_report_filename(&subject, Local::now().date_naive(), format);
        let path: Option<PathBuf> = match &self.config.reports.export_dir {
            Some(dir) => Some(dir.join(&default_name)),
            None => export::show_save_dialog(&default_name, format),
        };
        let Some(path) = path else {
            return;
        };

        let result = match format {
            ExportFormat::Csv => export::export_student_report_to_csv(&rows, &path).map_err(AppError::from),
            ExportFormat::Excel => {
                export::export_student_report_to_excel(&subject, &rows, &totals, &path).map_err(AppError::from)
            }
        };

        match result {
            Ok(()) => {
                let message = format!("Exported {} rows to {}", rows.len(), path.display());
                tracing::info!("{}", message);
                self.log_success(message.clone());
                self.success_message = Some(message);
            }
            Err(e) => self.report_error("Export", e),
        }
    }

    /// Render menu bar.
    fn show_menu_bar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            egui::MenuBar::new().ui(ui, |ui| {
                ui.menu_button("File", |ui| {
                    if ui.button("Reload Data").clicked() {
                        self.reload();
                        ui.close();
                    }
                    ui.separator();
                    if ui
                        .add_enabled(self.session.is_logged_in(), egui::Button::new("Logout"))
                        .clicked()
                    {
                        self.logout();
                        ui.close();
                    }
                });
            });
        });
    }

    /// Render status bar (display only, no interaction).
    fn show_status_bar(&self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("status_bar")
            .min_height(28.0)
            .show(ctx, |ui| {
                ui.disable();
                ui.horizontal(|ui| {
                    ui.colored_label(colors::NEUTRAL, self.service.storage_description());

                    ui.with_layout(Layout::right_to_left(Align::Center), |ui| match self.current_user() {
                        Some(user) => {
                            ui.colored_label(colors::SUCCESS, user);
                        }
                        None => {
                            ui.colored_label(colors::NEUTRAL, "Not logged in");
                        }
                    });
                });
            });
    }

    /// Render modal dialogs (error, success, delete confirmation).
    fn show_dialogs(&mut self, ctx: &egui::Context) {
        // Error dialog
        if let Some(ref error) = self.error_message.clone() {
            egui::Window::new("Error")
                .collapsible(false)
                .resizable(false)
                .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
                .show(ctx, |ui| {
                    ui.colored_label(colors::ERROR, error);
                    ui.add_space(10.0);
                    if ui.button("OK").clicked() {
                        self.error_message = None;
                    }
                });
        }

        // Success dialog
        if let Some(ref msg) = self.success_message.clone() {
            egui::Window::new("Success")
                .collapsible(false)
                .resizable(false)
                .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
                .show(ctx, |ui| {
                    ui.colored_label(colors::SUCCESS, msg);
                    ui.add_space(10.0);
                    if ui.button("OK").clicked() {
                        self.success_message = None;
                    }
                });
        }

        // Delete confirmation dialog
        if self.show_delete_confirm
            && let Some(ref target) = self.delete_target.clone()
        {
            let (title, message) = match target {
                DeleteTarget::Subject(name) => (
                    "Delete Subject",
                    format!("Delete subject '{}' and all of its attendance?", name),
                ),
                DeleteTarget::Student(_, name) => (
                    "Remove Student",
                    format!("Remove student '{}' and their attendance records?", name),
                ),
            };

            egui::Window::new(title)
                .collapsible(false)
                .resizable(false)
                .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
                .show(ctx, |ui| {
                    ui.label(message);
                    ui.add_space(10.0);
                    ui.horizontal(|ui| {
                        if ui.button("Cancel").clicked() {
                            self.show_delete_confirm = false;
                            self.delete_target = None;
                        }
                        if ui.button("Delete").clicked() {
                            self.confirm_delete();
                            self.show_delete_confirm = false;
                            self.delete_target = None;
                        }
                    });
                });
        }
    }

    /// Execute the confirmed delete operation.
    fn confirm_delete(&mut self) {
        let Some(target) = self.delete_target.take() else {
            return;
        };

        match target {
            DeleteTarget::Subject(name) => {
                if self
                    .run("Delete subject", |service, ctx| service.delete_subject(ctx, Some(&name)))
                    .is_some()
                {
                    self.log_success(format!("Subject '{}' deleted", name));
                    if self.mark_form.subject.as_deref() == Some(name.as_str()) {
                        self.mark_form.subject = None;
                        self.mark_form.statuses.clear();
                    }
                    if self.report_subject.as_deref() == Some(name.as_str()) {
                        self.report_subject = None;
                    }
                }
            }
            DeleteTarget::Student(id, name) => {
                if self
                    .run("Remove student", |service, ctx| service.remove_student(ctx, Some(&id)))
                    .is_some()
                {
                    self.log_success(format!("Student '{}' removed", name));
                    self.mark_form.statuses.remove(&id);
                    if self.history_student.as_deref() == Some(id.as_str()) {
                        self.history_student = None;
                    }
                }
            }
        }
    }
}

impl eframe::App for App {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Menu bar
        self.show_menu_bar(ctx);

        // Status bar
        self.show_status_bar(ctx);

        // Modal dialogs (error, success, delete confirmation)
        self.show_dialogs(ctx);

        // Logged-out users only ever see the login panel
        if !self.session.is_logged_in() {
            self.current_panel = Panel::Login;
        }

        // Main content
        egui::CentralPanel::default().show(ctx, |ui| match self.current_panel {
            Panel::Login => login_panel::show(self, ui),
            Panel::Dashboard => {
                if let Some(next) = dashboard::show(self, ui) {
                    self.current_panel = next;
                }
            }
            Panel::Subjects => {
                if subjects_panel::show(self, ui) {
                    self.current_panel = Panel::Dashboard;
                }
            }
            Panel::Students => {
                if students_panel::show(self, ui) {
                    self.current_panel = Panel::Dashboard;
                }
            }
            Panel::MarkAttendance => {
                if mark_panel::show(self, ui) {
                    self.current_panel = Panel::Dashboard;
                }
            }
            Panel::Reports => {
                if reports_panel::show(self, ui) {
                    self.current_panel = Panel::Dashboard;
                }
            }
            Panel::Analytics => {
                if analytics_panel::show(self, ui) {
                    self.current_panel = Panel::Dashboard;
                }
            }
            Panel::StudentView => student_view::show(self, ui),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryRepository;

    fn app() -> App {
        let service = AttendanceService::open(Box::new(MemoryRepository::new())).unwrap();
        App::new(service, AppConfig::default())
    }

    #[test]
    fn test_teacher_login_moves_to_dashboard() {
        let mut app = app();
        app.login_form.teacher_name = "  T1 ".to_string();
        app.login_teacher();

        assert_eq!(app.current_panel, Panel::Dashboard);
        assert_eq!(app.current_user().as_deref(), Some("Teacher: T1"));
        assert!(app.login_form.teacher_name.is_empty());
    }

    #[test]
    fn test_unknown_student_login_shows_error() {
        let mut app = app();
        app.login_form.student_phone = "999".to_string();
        app.login_student();

        assert_eq!(app.current_panel, Panel::Login);
        assert!(app.error_message.is_some());
        assert!(!app.session.is_logged_in());
    }

    #[test]
    fn test_mark_form_defaults_and_keeps_existing() {
        let mut app = app();
        app.login_form.teacher_name = "T1".to_string();
        app.login_teacher();
        app.subject_input = "Math".to_string();
        app.add_subject();
        app.student_form.name = "Ann".to_string();
        app.student_form.phone = "100".to_string();
        app.add_student();

        app.mark_form.subject = Some("Math".to_string());
        app.refresh_mark_form();
        assert_eq!(app.mark_form.statuses.get("100"), Some(&AttendanceStatus::Present));

        app.mark_form.statuses.insert("100".to_string(), AttendanceStatus::Absent);
        app.save_attendance();
        assert!(app.success_message.is_some());

        app.mark_form.statuses.clear();
        app.refresh_mark_form();
        assert_eq!(app.mark_form.statuses.get("100"), Some(&AttendanceStatus::Absent));
    }

    #[test]
    fn test_invalid_date_blocks_save() {
        let mut app = app();
        app.login_form.teacher_name = "T1".to_string();
        app.login_teacher();
        app.subject_input = "Math".to_string();
        app.add_subject();
        app.student_form.name = "Ann".to_string();
        app.student_form.phone = "100".to_string();
        app.add_student();

        app.mark_form.subject = Some("Math".to_string());
        app.refresh_mark_form();
        app.mark_form.date_input = "2024-13-01".to_string();
        app.save_attendance();

        assert!(app.error_message.is_some());
        assert!(app.success_message.is_none());
        assert_eq!(app.service.store().summary().marks, 0);
    }

    #[test]
    fn test_confirm_delete_subject_clears_selection() {
        let mut app = app();
        app.login_form.teacher_name = "T1".to_string();
        app.login_teacher();
        app.subject_input = "Math".to_string();
        app.add_subject();
        app.report_subject = Some("Math".to_string());

        app.delete_target = Some(DeleteTarget::Subject("Math".to_string()));
        app.confirm_delete();

        assert!(app.report_subject.is_none());
        assert!(app.service.store().subjects(app.teacher_id().unwrap()).is_empty());
    }

    #[test]
    fn test_logout_returns_to_login() {
        let mut app = app();
        app.login_form.teacher_name = "T1".to_string();
        app.login_teacher();
        app.logout();

        assert_eq!(app.current_panel, Panel::Login);
        assert!(app.current_user().is_none());
    }

    #[test]
    fn test_log_is_capped() {
        let mut app = app();
        for i in 0..150 {
            app.log_info(format!("entry {i}"));
        }
        assert_eq!(app.log_messages.len(), 100);
        assert_eq!(app.log_messages.last().unwrap().message, "entry 149");
    }
}
