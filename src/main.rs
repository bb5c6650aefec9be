//! Classroll - Desktop attendance tracker for teachers, subjects and students.

use std::path::PathBuf;

use anyhow::{Context, anyhow};
use clap::Parser;
use classroll as app;
use eframe::egui;

use app::cli::{self, Command};
use app::config::{AppConfig, ConfigLoadResult};
use app::service::AttendanceService;
use app::store::JsonFileRepository;
use app::ui::{App, SetupApp, SetupWizard};

/// Desktop attendance tracker for teachers, subjects and students.
#[derive(Parser)]
#[command(name = "classroll")]
struct Cli {
    /// Use config.toml from current directory (dev mode)
    #[arg(long)]
    dev: bool,

    /// Data file to open instead of the configured one
    #[arg(long, value_name = "PATH")]
    data: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

/// Application launch mode.
enum LaunchMode {
    /// Normal operation with valid config.
    Normal(AppConfig),
    /// Setup wizard for first run or invalid config.
    Setup(SetupWizard, Option<String>),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Keep the guard alive so the file writer flushes on exit
    let _log_guard = app::logging::init(&AppConfig::log_dir());

    tracing::info!("Classroll starting...");

    // Determine config path based on mode
    let config_path = if cli.dev {
        tracing::info!("Dev mode: loading config from current directory");
        PathBuf::from("config.toml")
    } else {
        AppConfig::default_path()
    };
    tracing::info!("Config path: {:?}", config_path);

    let launch_mode = match AppConfig::try_load(&config_path) {
        ConfigLoadResult::Loaded(config) => {
            tracing::info!("Config loaded successfully");
            LaunchMode::Normal(config)
        }
        ConfigLoadResult::Missing => {
            tracing::info!("Config missing");
            LaunchMode::Setup(SetupWizard::new(), None)
        }
        ConfigLoadResult::Invalid(e) => {
            tracing::warn!("Config invalid: {}", e);
            LaunchMode::Setup(SetupWizard::new(), Some(e.to_string()))
        }
    };

    let mut config = match (launch_mode, &cli.command) {
        (LaunchMode::Normal(config), _) => config,
        // Headless commands never open the wizard
        (LaunchMode::Setup(..), Some(_)) => {
            tracing::warn!("Using default configuration");
            AppConfig::default()
        }
        (LaunchMode::Setup(wizard, error), None) => return run_setup_wizard(wizard, error, config_path),
    };

    if let Some(path) = cli.data {
        config.storage.data_file = path;
    }

    let repo = JsonFileRepository::open(&config.storage.data_file, config.storage.lock)
        .with_context(|| format!("Failed to open {}", config.storage.data_file.display()))?;
    let service = AttendanceService::open(Box::new(repo)).context("Failed to load attendance data")?;

    match cli.command {
        Some(command) => {
            let output = cli::run(service.store(), &command, config.reports.low_attendance_threshold)?;
            print!("{}", output);
            Ok(())
        }
        None => run_main_app(service, config),
    }
}

/// Run the setup wizard.
fn run_setup_wizard(wizard: SetupWizard, initial_error: Option<String>, config_path: PathBuf) -> anyhow::Result<()> {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Classroll - Setup")
            .with_inner_size([600.0, 500.0])
            .with_min_inner_size([500.0, 400.0])
            .with_resizable(true),
        ..Default::default()
    };

    eframe::run_native(
        "Classroll - Setup",
        options,
        Box::new(|_cc| Ok(Box::new(SetupApp::new(wizard, initial_error, config_path)))),
    )
    .map_err(|e| anyhow!("{e}"))
}

/// Run the main application.
fn run_main_app(service: AttendanceService, config: AppConfig) -> anyhow::Result<()> {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Classroll")
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([900.0, 600.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Classroll",
        options,
        Box::new(|cc| {
            install_icon_fonts(&cc.egui_ctx);
            Ok(Box::new(App::new(service, config)))
        }),
    )
    .map_err(|e| anyhow!("{e}"))
}

/// Register the phosphor icon font so panel icons render.
fn install_icon_fonts(ctx: &egui::Context) {
    let mut fonts = egui::FontDefinitions::default();
    egui_phosphor::add_to_fonts(&mut fonts, egui_phosphor::Variant::Regular);
    ctx.set_fonts(fonts);
}
