//! Host configuration
//!
//! - `.env` file loading with environment-based precedence
//! - Typed server configuration read from environment variables
//!
//! # Example
//!
//! ```rust,no_run
//! use reqbind::config::{load_dotenv, ServerConfig};
//!
//! let env = load_dotenv(std::path::Path::new("."));
//! let server = ServerConfig::from_env();
//! println!("{} on port {}", env, server.port);
//! ```

pub mod env;
mod server;

pub use env::{env, env_optional, load_dotenv, Environment};
pub use server::{ServerConfig, ServerConfigBuilder};
