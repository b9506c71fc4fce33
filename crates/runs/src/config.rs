//! Process configuration, loaded once from the environment in `main` and
//! injected into the router. Not global state.

use std::env;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub company_name: String,
    pub slogan: String,
    pub contacts: String,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self {
            company_name: env::var("COMPANY_NAME").unwrap_or_else(|_| "Run Tracker".to_string()),
            slogan: env::var("SLOGAN").unwrap_or_else(|_| "Run with us".to_string()),
            contacts: env::var("CONTACTS").unwrap_or_else(|_| "info@example.com".to_string()),
        }
    }
}
