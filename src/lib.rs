pub mod cli;
pub mod config;
pub mod error;
pub mod export;
pub mod logging;
pub mod models;
pub mod service;
pub mod session;
pub mod store;
pub mod ui;

pub use error::{AppError, Result};
