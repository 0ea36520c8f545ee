pub mod availability;
pub mod config;
pub mod controllers;
pub mod database;
pub mod error;
pub mod models;
pub mod services;

// Shared state for the whole application
#[derive(Clone)]
pub struct AppState {
    pub db: database::Database,
    pub mailer: services::mailer::Mailer,
    pub config: config::Config,
}
