mod short_url;

pub use short_url::{
    CreateUrlRequest, CreateUrlResponse, ErrorResponse, HealthResponse, StatsResponse,
};
