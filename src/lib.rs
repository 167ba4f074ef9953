//! A&R Hub Library
//!
//! Combines Spotify artist and listening data with Last.fm context and turns
//! the result into AI generated A&R reports. The same services back a local
//! web UI and a command line interface.
//!
//! # Modules
//!
//! - `ai` - DeepSeek chat completion client
//! - `api` - HTTP handlers for the web UI, JSON endpoints and OAuth callback
//! - `cli` - Command-line interface implementations
//! - `config` - Environment loading, credentials and endpoints
//! - `error` - The application error taxonomy
//! - `lastfm` - Last.fm artist info client
//! - `management` - Aggregation, report generation and token storage
//! - `ports` - Traits the aggregation layer uses to reach upstream services
//! - `prompt` - Deterministic prompt templating
//! - `server` - Router and listener for the web UI
//! - `spotify` - Spotify Web API and accounts service clients
//! - `types` - Domain records and table rows
//! - `utils` - Identifier parsing, formatting and PKCE helpers

pub mod ai;
pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod lastfm;
pub mod management;
pub mod ports;
pub mod prompt;
pub mod server;
pub mod spotify;
pub mod types;
pub mod utils;

/// Result alias used throughout the crate.
///
/// # Example
///
/// ```
/// use arhub::Res;
///
/// async fn fetch_data() -> Res<String> {
///     Ok("data".to_string())
/// }
/// ```
pub type Res<T> = std::result::Result<T, error::AppError>;

/// Prints an informational message with a blue bullet point.
///
/// Creates a formatted output line with a distinctive blue "o" indicator
/// followed by the provided message. Used for general information and
/// status updates throughout the application.
///
/// # Arguments
///
/// The macro accepts the same arguments as `println!`, supporting format
/// strings and interpolation.
///
/// # Example
///
/// ```
/// info!("Starting authentication process...");
/// info!("Fetched {} top tracks", count);
/// ```
#[macro_export]
macro_rules! info {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "o".blue().bold(), std::format_args!($($arg)*));
  })
}

/// Prints a success message with a green checkmark.
///
/// Creates a formatted output line with a green "✓" indicator to signify
/// successful completion of operations. Used to provide positive feedback
/// when operations complete successfully.
///
/// # Arguments
///
/// The macro accepts the same arguments as `println!`, supporting format
/// strings and interpolation.
///
/// # Example
///
/// ```
/// success!("Authentication completed successfully");
/// success!("Saved report to {}", path);
/// ```
#[macro_export]
macro_rules! success {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "✓".green().bold(), std::format_args!($($arg)*));
  })
}

/// Prints an error message with a red exclamation mark and exits the program.
///
/// Creates a formatted error output with a red "!" indicator and immediately
/// terminates the program with exit code 1. Used for unrecoverable errors
/// that require immediate program termination.
///
/// # Arguments
///
/// The macro accepts the same arguments as `println!`, supporting format
/// strings and interpolation.
///
/// # Behavior
///
/// This macro exits the process. It is reserved for the binary's command
/// dispatch; library and server code report errors through [`error::AppError`]
/// and log with `warning!`.
///
/// # Example
///
/// ```
/// error!("Failed to load environment");
/// error!("Missing required environment variable: {}", var_name);
/// // Program exits here - code after this will not execute
/// ```
#[macro_export]
macro_rules! error {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".red().bold(), std::format_args!($($arg)*));
    std::process::exit(1);
  })
}

/// Prints a warning message with a yellow exclamation mark.
///
/// Creates a formatted output line with a yellow "!" indicator to highlight
/// potential issues or important notices that don't require program termination.
/// Used for recoverable issues or important information that users should notice.
///
/// # Arguments
///
/// The macro accepts the same arguments as `println!`, supporting format
/// strings and interpolation.
///
/// # Example
///
/// ```
/// warning!("Last.fm data not available for {}", artist);
/// ```
#[macro_export]
macro_rules! warning {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".yellow().bold(), std::format_args!($($arg)*));
  })
}
