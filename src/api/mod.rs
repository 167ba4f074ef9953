//! # API Module
//!
//! HTTP handlers for the local web server: the HTML pages of the web UI,
//! their JSON counterparts, the Spotify sign-in (`/login` and `/callback`)
//! and a health check.
//!
//! Every handler takes [`crate::server::AppState`] and delegates to the
//! shared [`crate::management::Hub`]. Failures are turned into responses by
//! [`response`]: the status code follows the error kind and the body only
//! carries [`crate::error::AppError::user_message`].
//!
//! ## Endpoints
//!
//! | Route | Handler |
//! |-------|---------|
//! | `GET /` | [`index`] |
//! | `GET /artist?id=` | [`artist_page`] |
//! | `GET /report?id=` | [`report_page`] |
//! | `GET /taste?time_range=&limit=` | [`taste_page`] |
//! | `GET /login` | [`login`] |
//! | `GET /callback` | [`callback`] |
//! | `GET /health` | [`health`] |
//! | `GET /api/artist?id=` | [`artist_json`] |
//! | `GET /api/report?id=` | [`report_json`] |
//! | `GET /api/taste?time_range=&limit=` | [`taste_json`] |

mod callback;
mod health;
mod json;
mod pages;
pub mod response;

pub use callback::callback;
pub use callback::login;
pub use health::health;
pub use json::artist_json;
pub use json::report_json;
pub use json::taste_json;
pub use json::{ReportResponse, TasteResponse};
pub use pages::artist_page;
pub use pages::index;
pub use pages::report_page;
pub use pages::taste_page;
