//! Mood-based music discovery library
//!
//! This library backs the `moodtune` binary. It contains the Spotify auth bridge
//! served over HTTP, the client-side token lifecycle, the discovery calls that
//! degrade to bundled sample tracks, and the playback coordinator that keeps a
//! single audio output in sync with the shared player state.
//!
//! # Modules
//!
//! - `api` - HTTP handlers of the auth bridge and mood endpoints
//! - `cli` - Command-line interface implementations
//! - `config` - Configuration management and environment variables
//! - `logging` - `tracing` subscriber setup
//! - `management` - Token state, persistence and refresh coordination
//! - `moods` - Mood names and their genre lists
//! - `playback` - Fallback catalog, media device seam, rodio output and playback coordinator
//! - `server` - axum router and listener for the auth bridge
//! - `spotify` - Spotify Web API and Resource API clients
//! - `types` - Data structures and type definitions
//! - `utils` - Utility functions and helpers
//!
//! # Example
//!
//! ```
//! use moodtune::{config, cli};
//!
//! #[tokio::main]
//! async fn main() -> moodtune::Res<()> {
//!     config::load_env().await?;
//!     // Use CLI functions...
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod cli;
pub mod config;
pub mod logging;
pub mod management;
pub mod moods;
pub mod playback;
pub mod server;
pub mod spotify;
pub mod types;
pub mod utils;

/// A convenient Result type alias for operations that may fail.
///
/// Uses a boxed dynamic error trait object with Send + Sync bounds so it can
/// cross await points and task boundaries.
pub type Res<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Prints an informational message with a blue bullet point.
///
/// # Example
///
/// ```
/// info!("Fetching recommendations for {}", mood);
/// ```
#[macro_export]
macro_rules! info {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "o".blue().bold(), std::format_args!($($arg)*));
  })
}

/// Prints a success message with a green checkmark.
#[macro_export]
macro_rules! success {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "✓".green().bold(), std::format_args!($($arg)*));
  })
}

/// Prints an error message with a red exclamation mark and exits the program.
///
/// Only for fatal errors at the command layer. Library code returns errors
/// instead.
#[macro_export]
macro_rules! error {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".red().bold(), std::format_args!($($arg)*));
    std::process::exit(1);
  })
}

/// Prints a warning message with a yellow exclamation mark.
#[macro_export]
macro_rules! warning {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".yellow().bold(), std::format_args!($($arg)*));
  })
}
