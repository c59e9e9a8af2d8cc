pub mod address;
pub mod arrival;
pub mod directions;
pub mod format;
pub mod notify;

pub use crate::domain::model::{
    AggregatedDirections, Classification, DirectionsResult, Listing, ListingBatch, Place,
    SentMessage, TravelMode,
};
pub use crate::domain::ports::{MessageStore, Messenger, RouteProvider};
pub use crate::utils::error::Result;
