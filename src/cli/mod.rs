//! # CLI Module
//!
//! Command implementations for the `arhub` binary. Each command receives the
//! services built once in `main`, shows a spinner while upstream calls are in
//! flight, prints tables or report text and returns a [`crate::Res`]; `main`
//! turns an error into its user message and exit code 1.
//!
//! ## Commands
//!
//! - [`serve`] - Runs the web UI
//! - [`auth`] - Spotify sign-in via OAuth 2.0 PKCE
//! - [`artist`] - Artist profile, top tracks, similar artists, releases and Last.fm data
//! - [`report`] - The artist view plus an AI generated A&R report, optionally saved
//! - [`taste`] - Top tracks of the signed-in user and an AI taste analysis
//! - [`track`] - Track metadata, audio features and an AI track analysis
//! - [`scout`] - AI talent scouting for a region and genre
//!
//! ## Usage
//!
//! ```bash
//! arhub auth
//! arhub artist https://open.spotify.com/artist/0TnOYISbd1XYRBk9myaseg
//! arhub report spotify:artist:0TnOYISbd1XYRBk9myaseg --save
//! arhub taste --time-range medium_term
//! arhub scout --region Nigeria --genre afrobeats
//! ```

mod artist;
mod auth;
mod scout;
mod taste;
mod track;

pub use artist::artist;
pub use artist::report;
pub use auth::auth;
pub use auth::serve;
pub use scout::scout;
pub use taste::taste;
pub use track::track;
