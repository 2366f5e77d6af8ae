//! Common utilities and shared types for artlog.
//!
//! This crate provides foundational components used across all artlog crates:
//!
//! - **Configuration**: Application settings via [`Config`]
//! - **Error handling**: Unified error types via [`AppError`] and [`AppResult`]
//! - **ID Generation**: ULID-based unique identifiers via [`IdGenerator`]
//! - **Access tokens**: JWT issue/verify via [`TokenIssuer`]
//!
//! # Example
//!
//! ```no_run
//! use artlog_common::{Config, IdGenerator, AppResult};
//!
//! fn example() -> AppResult<()> {
//!     let config = Config::load()?;
//!     let id_gen = IdGenerator::new();
//!     let id = id_gen.generate();
//!     println!("Generated ID: {}", id);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod id;
pub mod token;

pub use config::Config;
pub use error::{AppError, AppResult};
pub use id::{ANONYMOUS_VIEWER, IdGenerator};
pub use token::{AccessClaims, TokenIssuer};
