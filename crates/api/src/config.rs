//! Application configuration, supplied by the embedding environment.

/// Redirect destinations for the route guard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub sign_in_path: String,
    pub unauthorized_path: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            sign_in_path: "/sign-in".to_string(),
            unauthorized_path: "/unauthorized".to_string(),
        }
    }
}

impl AppConfig {
    /// Read overrides from the environment, falling back to the defaults.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            sign_in_path: std::env::var("SCOPEGATE_SIGN_IN_PATH")
                .unwrap_or(defaults.sign_in_path),
            unauthorized_path: std::env::var("SCOPEGATE_UNAUTHORIZED_PATH")
                .unwrap_or(defaults.unauthorized_path),
        }
    }
}
