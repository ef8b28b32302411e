//! SIICOP client core.
//!
//! Layers, leaves first: `http` → `services` → `repositories` →
//! `use_cases` → orchestration (`wizard`, `chat_session`, `state`).

pub mod chat_session;
pub mod config;
pub mod error;
pub mod format;
pub mod http;
pub mod query_cache;
pub mod repositories;
pub mod routes;
pub mod services;
pub mod state;
pub mod types;
pub mod use_cases;
pub mod wizard;

pub use config::{load_config, Backend, Config};
pub use error::{ClientError, ErrorKind, ErrorPayload};
pub use state::AppContext;

/// Install the `env_logger` backend. `RUST_LOG` wins over `default_level`.
pub fn init_logging(default_level: &str) {
    let env = env_logger::Env::default().default_filter_or(default_level);
    // A logger may already be installed.
    let _ = env_logger::Builder::from_env(env)
        .format_timestamp_millis()
        .try_init();
}
