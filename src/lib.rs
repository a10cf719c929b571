//! Maguai - terminal chat client for a catalog of AI personas
//!
//! This library provides the persona catalog, the session state machine, the
//! request adapter and the upstream provider abstraction used by the
//! `maguai` binary.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//!
//! - `catalog`: The fixed catalog of 150 personas and its filter
//! - `session`: Transcript, selected persona and the busy gate
//! - `adapter`: Transcript to upstream request mapping and fault classification
//! - `providers`: Upstream provider abstraction and the Gemini implementation
//! - `config`: Configuration management and validation
//! - `error`: Error types and result aliases
//! - `cli` / `commands`: Command-line interface and the interactive chat loop
//!
//! # Example
//!
//! ```no_run
//! use maguai::{catalog, Adapter, Config, Session};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load("config/config.yaml", &Default::default())?;
//!     config.validate()?;
//!
//!     let adapter = Adapter::from_config(&config)?;
//!     let mut session = Session::new(catalog::default_model());
//!     if let Ok(reply) = session.send("Hello", &adapter).await {
//!         println!("{}", reply.content);
//!     }
//!     Ok(())
//! }
//! ```

pub mod adapter;
pub mod catalog;
pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod providers;
pub mod session;

// Re-export commonly used types
pub use adapter::{Adapter, AdapterError, AdapterSettings, Reply};
pub use catalog::{Category, Model};
pub use config::Config;
pub use error::{MaguaiError, Result};
pub use session::{Message, Role, Session, ValidationSkip};
