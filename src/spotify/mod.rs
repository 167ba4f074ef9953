//! # Spotify Integration Module
//!
//! Integration layer between arhub and the Spotify Web API.
//!
//! ```text
//! Aggregation (management)
//!          ↓
//! Spotify Integration Layer
//!     ├── client  (catalog + user history lookups)
//!     ├── auth    (client credentials, OAuth 2.0 PKCE sign-in)
//!     └── models  (wire types → domain records)
//!          ↓
//! HTTP Layer (reqwest, JSON)
//!          ↓
//! Spotify Web API
//! ```
//!
//! ## Authentication
//!
//! Two kinds of tokens are used:
//! - **App token** (client-credentials grant) for public artist, track and
//!   album data. Requires `SPOTIFY_CLIENT_ID` and `SPOTIFY_CLIENT_SECRET`.
//! - **User token** (PKCE sign-in) for the user's top tracks. Obtained with
//!   `arhub auth` or the `/login` page and stored by
//!   [`crate::management::TokenManager`].
//!
//! ## API Coverage
//!
//! - `GET /artists/{id}`, `/artists/{id}/top-tracks`,
//!   `/artists/{id}/related-artists`, `/artists/{id}/albums`
//! - `GET /me/top/tracks`
//! - `GET /audio-features`, `/tracks/{id}`
//! - `POST /api/token`
//!
//! ## Error Handling
//!
//! Status codes are mapped into [`crate::error::AppError`] at the boundary:
//! 401/403 become `UpstreamAuthFailed`, 429 becomes `UpstreamRateLimited`
//! (with `Retry-After` when sent), 400/404 on an ID-addressed lookup become
//! `InvalidIdentifier`, anything else becomes `UpstreamUnavailable`. Requests
//! are not retried.

pub mod auth;
pub mod client;
pub mod models;

pub use auth::SpotifyAuth;
pub use client::SpotifyClient;
