use crate::core::arrival::resolve_arrival;
use crate::domain::model::{
    AggregatedDirections, DirectionsResult, Listing, ModeDirections, Place, PlaceDirections,
    RouteSummary, TravelMode,
};
use crate::domain::ports::{RouteProvider, RouteQuery};
use crate::utils::error::Result;
use chrono::{DateTime, Utc};

/// Fetches directions from one listing to every catalog place across every
/// mode the place allows. Requests run strictly one at a time to stay under
/// the provider's rate limits, and per-mode failures are captured as
/// failure markers instead of aborting the rest of the sweep.
pub struct DirectionsAggregator<'a, R: RouteProvider> {
    provider: &'a R,
}

impl<'a, R: RouteProvider> DirectionsAggregator<'a, R> {
    pub fn new(provider: &'a R) -> Self {
        Self { provider }
    }

    /// The output always carries one entry per catalog place and one entry
    /// per allowed mode within it, even when every call fails.
    pub async fn aggregate(
        &self,
        listing: &Listing,
        catalog: &[Place],
        now: DateTime<Utc>,
    ) -> AggregatedDirections {
        let mut places = Vec::with_capacity(catalog.len());
        for place in catalog {
            let mut modes = Vec::with_capacity(place.modes.len());
            for &mode in &place.modes {
                let result = match self.fetch_one(listing, place, mode, now).await {
                    Ok(summary) if summary.route_count == 0 => DirectionsResult::Failure {
                        reason: "no routes returned".to_string(),
                    },
                    Ok(summary) => DirectionsResult::Success(summary),
                    Err(e) => {
                        tracing::warn!(
                            "Directions to {} via {} failed: {}",
                            place.id,
                            mode.api_name(),
                            e
                        );
                        DirectionsResult::Failure {
                            reason: e.to_string(),
                        }
                    }
                };
                modes.push(ModeDirections { mode, result });
            }
            places.push(PlaceDirections {
                place_id: place.id.clone(),
                modes,
            });
        }

        AggregatedDirections {
            listing_id: listing.id.clone(),
            places,
        }
    }

    async fn fetch_one(
        &self,
        listing: &Listing,
        place: &Place,
        mode: TravelMode,
        now: DateTime<Utc>,
    ) -> Result<RouteSummary> {
        let arrival = match &place.arrival {
            Some(constraint) => Some(resolve_arrival(constraint, now)?),
            None => None,
        };

        // District and country are deliberately left out of the origin;
        // the provider matches the address more reliably without them.
        let components = &listing.components;
        let query = RouteQuery {
            origin: format!(
                "{}, {}, {}",
                components.street, components.postal_code, components.city
            ),
            destination: place.address.clone(),
            mode,
            arrival,
            waypoints: if mode.supports_waypoints() {
                place.waypoints.clone()
            } else {
                Vec::new()
            },
            transit_modes: if mode == TravelMode::Transit {
                place.transit_modes.clone()
            } else {
                Vec::new()
            },
        };

        self.provider.fetch_route(&query).await
    }
}
