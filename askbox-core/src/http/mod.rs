mod client;
mod error;

pub use client::{HttpClient, HttpClientBuilder};
pub use error::HttpError;
