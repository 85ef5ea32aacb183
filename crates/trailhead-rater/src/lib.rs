mod client;
mod error;

pub use client::{RaterClient, RATING_SOURCE, VALID_RATINGS};
pub use error::RaterError;
