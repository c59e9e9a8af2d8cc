pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use crate::adapters::{FileMessageLog, GoogleMapsRouter, TelegramMessenger};
pub use crate::config::{places::PlaceCatalog, CliConfig, Credentials};
pub use crate::core::notify::{prepare_listings, Notifier};
pub use crate::domain::model::{Classification, Listing, ListingBatch};
pub use crate::utils::error::{NotifierError, Result};
