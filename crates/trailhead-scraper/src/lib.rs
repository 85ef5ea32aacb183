pub mod discovery;
pub mod error;
pub mod fetch;
pub mod fields;
pub mod page;
pub mod park;
pub mod types;

pub use error::ScraperError;
pub use fetch::build_client;
pub use page::{extract_trails, PageContext};
pub use park::scrape_park;
pub use types::{ParkSite, Trail};
