mod client;
mod error;
mod types;

pub use client::NpsClient;
pub use error::NpsError;
pub use types::{Endpoint, ParkRecord};
