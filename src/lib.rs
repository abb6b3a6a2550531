//! booklog: a small personal book-tracking web application.
//!
//! Books are recorded by ISBN with a rating, the date they were read and
//! free-text notes. The server renders HTML pages backed by a single
//! SQLite table, and shows covers from Open Library.
//!
//! # Features
//!
//! - Add, edit, delete and search books by ISBN
//! - Lists sorted by insertion, rating or read date
//! - Input validation for ISBN, rating and read date
//! - Markup stripping for notes before they are stored
//! - JSON endpoints for listing and statistics
//! - CLI for listing, adding and deleting books

#![forbid(unsafe_code)]
#![warn(missing_docs)]

/// Configuration and CLI.
pub mod config;
/// Database operations.
pub mod db;
/// Error types.
pub mod error;
/// Book validation, sanitization and view models.
pub mod library;
/// HTML page rendering.
pub mod render;
/// HTTP server.
pub mod server;


pub use config::{Cli, Command, Config};
pub use db::Database;
pub use error::{AppError, Result};
pub use server::AppState;
