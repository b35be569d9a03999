mod backend;
mod client;
mod detection;
mod provider;
mod version;

pub use backend::{CatalogSource, SdkmanBackend};
pub use client::SdkmanClient;
pub use detection::{SdkmanDetection, detect_sdkman_dir};
pub use provider::SdkmanProvider;
pub use version::{ListingShape, SdkmanListing, parse_candidates, parse_listing, split_report_cells};
