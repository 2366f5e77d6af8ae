//! Core business logic for artlog.

pub mod domain;
pub mod services;

pub use services::*;
