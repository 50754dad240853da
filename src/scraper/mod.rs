pub mod aggregator;
pub mod fetcher;
pub mod live;
pub mod synth;
pub mod traits;

pub use aggregator::ListingAggregator;
pub use traits::{ListingSource, Scraper};
