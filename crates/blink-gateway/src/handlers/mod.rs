mod health;
mod short_url;

pub use health::health_handler;
pub use short_url::{create_url_handler, redirect_handler, stats_handler};
