//! Environment detection and `.env` loading

use std::path::{Path, PathBuf};

/// Deployment environment, read from `APP_ENV`
#[derive(Debug, Clone, PartialEq)]
pub enum Environment {
    Local,
    Development,
    Staging,
    Production,
    Testing,
    Custom(String),
}

impl Environment {
    /// Detect environment from APP_ENV or default to Local
    pub fn detect() -> Self {
        Self::from_name(std::env::var("APP_ENV").ok().as_deref())
    }

    fn from_name(name: Option<&str>) -> Self {
        match name {
            Some("production") => Self::Production,
            Some("staging") => Self::Staging,
            Some("development") => Self::Development,
            Some("testing") => Self::Testing,
            Some("local") | None => Self::Local,
            Some(other) => Self::Custom(other.to_string()),
        }
    }

    /// Name used in `.env.{name}` file suffixes
    pub fn name(&self) -> &str {
        match self {
            Self::Local => "local",
            Self::Development => "development",
            Self::Staging => "staging",
            Self::Production => "production",
            Self::Testing => "testing",
            Self::Custom(name) => name,
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }

    /// Local or development
    pub fn is_development(&self) -> bool {
        matches!(self, Self::Local | Self::Development)
    }
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// `.env` files for an environment, most specific first
fn dotenv_files(project_root: &Path, env: &Environment) -> Vec<PathBuf> {
    vec![
        project_root.join(format!(".env.{}.local", env.name())),
        project_root.join(format!(".env.{}", env.name())),
        project_root.join(".env.local"),
        project_root.join(".env"),
    ]
}

/// Load environment variables from .env files with proper precedence
///
/// Precedence, highest first: process environment, `.env.{env}.local`,
/// `.env.{env}`, `.env.local`, `.env`. Missing files are skipped.
pub fn load_dotenv(project_root: &Path) -> Environment {
    let env = Environment::detect();

    // dotenvy never overwrites a variable that is already set, so the most
    // specific file is loaded first
    for path in dotenv_files(project_root, &env) {
        if dotenvy::from_path(&path).is_ok() {
            tracing::debug!(path = %path.display(), "loaded env file");
        }
    }

    env
}

/// Get an environment variable with a default value
///
/// # Example
/// ```
/// use reqbind::config::env;
///
/// let port: u16 = env("SERVER_PORT", 8000);
/// ```
pub fn env<T: std::str::FromStr>(key: &str, default: T) -> T {
    env_optional(key).unwrap_or(default)
}

/// Get an optional environment variable
///
/// Unparseable values count as unset.
pub fn env_optional<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.parse().ok())
}
