//! HTTP gateway for the Blink URL shortener.
//!
//! Translates the public HTTP contract into [`UrlStore`][blink_core::UrlStore]
//! calls:
//!
//! | Method | Path            | Store call | Success                  |
//! |--------|-----------------|------------|--------------------------|
//! | POST   | `/`             | `create`   | `201` + short/stats URLs |
//! | GET    | `/{code}`       | `resolve`  | `303` to original URL    |
//! | GET    | `/stats/{code}` | `stats`    | `200` + redirect count   |

pub mod app;
pub mod cli;
pub mod error;
pub mod handlers;
pub mod model;
pub mod state;

pub use app::App;
pub use state::AppState;
