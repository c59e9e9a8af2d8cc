use crate::domain::model::RouteSummary;
use crate::domain::ports::{RouteProvider, RouteQuery};
use crate::utils::error::{NotifierError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

const DEFAULT_BASE_URL: &str = "https://maps.googleapis.com";

/// Routing provider backed by the Google Directions API.
pub struct GoogleMapsRouter {
    client: Client,
    api_key: String,
    base_url: String,
}

impl GoogleMapsRouter {
    pub fn new(api_key: String) -> Self {
        Self {
            client: Client::new(),
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    /// Points the adapter at a different host, used by tests.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

#[async_trait]
impl RouteProvider for GoogleMapsRouter {
    async fn fetch_route(&self, query: &RouteQuery) -> Result<RouteSummary> {
        let url = format!("{}/maps/api/directions/json", self.base_url);

        let mut params: Vec<(&str, String)> = vec![
            ("key", self.api_key.clone()),
            ("origin", query.origin.clone()),
            ("destination", query.destination.clone()),
            ("units", "metric".to_string()),
            ("mode", query.mode.api_name().to_string()),
            ("transit_routing_preference", "fewer_transfers".to_string()),
        ];
        if let Some(arrival) = query.arrival {
            params.push(("arrival_time", arrival.timestamp().to_string()));
        }
        if !query.waypoints.is_empty() {
            params.push(("waypoints", query.waypoints.join("|")));
        }
        if !query.transit_modes.is_empty() {
            let joined = query
                .transit_modes
                .iter()
                .map(|m| m.api_name())
                .collect::<Vec<_>>()
                .join("|");
            params.push(("transit_mode", joined));
        }

        tracing::debug!(
            "Requesting {} directions {} -> {}",
            query.mode.api_name(),
            query.origin,
            query.destination
        );
        let response = self.client.get(&url).query(&params).send().await?;
        let body: DirectionsResponse = response.json().await?;

        if body.status != "OK" {
            let message = body.error_message.unwrap_or(body.status);
            return Err(NotifierError::RouteError { message });
        }

        let summary = match body.routes.first() {
            Some(route) => RouteSummary {
                route_count: body.routes.len(),
                leg_count: route.legs.len(),
                duration_secs: route.legs.iter().map(|l| l.duration.value).sum(),
                distance_meters: route.legs.iter().map(|l| l.distance.value).sum(),
            },
            None => RouteSummary {
                route_count: 0,
                leg_count: 0,
                duration_secs: 0,
                distance_meters: 0,
            },
        };
        Ok(summary)
    }
}

#[derive(Debug, Deserialize)]
struct DirectionsResponse {
    status: String,
    #[serde(default)]
    error_message: Option<String>,
    #[serde(default)]
    routes: Vec<Route>,
}

#[derive(Debug, Deserialize)]
struct Route {
    legs: Vec<Leg>,
}

#[derive(Debug, Deserialize)]
struct Leg {
    duration: ValueField,
    distance: ValueField,
}

#[derive(Debug, Deserialize)]
struct ValueField {
    value: u64,
}
