//! GUI panels and application state.

pub mod analytics_panel;
pub mod app;
pub mod components;
pub mod dashboard;
pub mod login_panel;
pub mod mark_panel;
pub mod reports_panel;
pub mod setup_wizard;
pub mod student_view;
pub mod students_panel;
pub mod subjects_panel;

pub use app::App;
pub use setup_wizard::{SetupApp, SetupWizard};
