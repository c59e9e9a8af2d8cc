use serde::{Deserialize, Serialize};

/// Travel mode understood by the routing provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TravelMode {
    Transit,
    Driving,
    Walking,
    Bicycling,
}

impl TravelMode {
    pub fn api_name(self) -> &'static str {
        match self {
            TravelMode::Transit => "transit",
            TravelMode::Driving => "driving",
            TravelMode::Walking => "walking",
            TravelMode::Bicycling => "bicycling",
        }
    }

    /// Emoji label as an HTML entity, rendered by Telegram's HTML parse mode.
    /// For codes see https://emojipedia.org/bicycle/
    pub fn emoji(self) -> &'static str {
        match self {
            TravelMode::Transit => "&#x1F68C",
            TravelMode::Driving => "&#x1F697",
            TravelMode::Walking => "&#x1F6B6",
            TravelMode::Bicycling => "&#x1F6B2",
        }
    }

    /// Waypoints are only supported for driving, walking and bicycling
    /// directions; transit requests silently drop them.
    pub fn supports_waypoints(self) -> bool {
        self != TravelMode::Transit
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransitSubMode {
    Bus,
    Subway,
    Train,
    Tram,
    Rail,
}

impl TransitSubMode {
    pub fn api_name(self) -> &'static str {
        match self {
            TransitSubMode::Bus => "bus",
            TransitSubMode::Subway => "subway",
            TransitSubMode::Train => "train",
            TransitSubMode::Tram => "tram",
            TransitSubMode::Rail => "rail",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl Weekday {
    /// ISO weekday number, Monday = 1 .. Sunday = 7.
    pub fn iso_number(self) -> u32 {
        match self {
            Weekday::Monday => 1,
            Weekday::Tuesday => 2,
            Weekday::Wednesday => 3,
            Weekday::Thursday => 4,
            Weekday::Friday => 5,
            Weekday::Saturday => 6,
            Weekday::Sunday => 7,
        }
    }
}

/// Symbolic "arrive by" constraint, resolved against a concrete `now`
/// just before each routing request.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ArrivalTime {
    pub weekday: Weekday,
    pub hour: u32,
    pub minute: u32,
}

/// Configured destination of interest. Loaded once at startup from the
/// place catalog and never mutated afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Place {
    pub id: String,
    pub address: String,
    pub modes: Vec<TravelMode>,
    #[serde(default)]
    pub arrival: Option<ArrivalTime>,
    #[serde(default)]
    pub transit_modes: Vec<TransitSubMode>,
    #[serde(default)]
    pub waypoints: Vec<String>,
}

impl Place {
    pub fn has_waypoints(&self) -> bool {
        !self.waypoints.is_empty()
    }
}

/// Address split into positional components. The routing provider matches
/// better when only selected parts are sent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructuredAddress {
    pub street: String,
    pub postal_code: String,
    pub district: String,
    pub city: String,
    pub country: String,
}

/// A parsed real-estate unit. Two listings with the same `url` are the
/// same real-world unit; `id` is derived from the canonical URL path.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Listing {
    pub id: String,
    pub url: String,
    pub address: String,
    pub components: StructuredAddress,
}

impl Listing {
    /// Short human form used in message copy, e.g. "Huvilinnanmäki 8 A, Leppävaara".
    pub fn friendly_address(&self) -> String {
        format!("{}, {}", self.components.street, self.components.district)
    }
}

/// Batch classification as decided by the upstream subject-line matcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Classification {
    NewListing,
    Showing,
}

/// Raw listing as handed over by the ingestion collaborator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListingInput {
    pub url: String,
    pub address: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListingBatch {
    pub classification: Classification,
    pub listings: Vec<ListingInput>,
}

/// Reduced route as reported by the provider: counts plus totals over
/// the legs of the first returned route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteSummary {
    pub route_count: usize,
    pub leg_count: usize,
    pub duration_secs: u64,
    pub distance_meters: u64,
}

/// Outcome of one (listing, place, mode) request. Always fully populated,
/// never partial.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DirectionsResult {
    Success(RouteSummary),
    Failure { reason: String },
}

impl DirectionsResult {
    /// The summary, but only when at least one route was actually found.
    pub fn routed(&self) -> Option<&RouteSummary> {
        match self {
            DirectionsResult::Success(summary) if summary.route_count > 0 => Some(summary),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ModeDirections {
    pub mode: TravelMode,
    pub result: DirectionsResult,
}

#[derive(Debug, Clone)]
pub struct PlaceDirections {
    pub place_id: String,
    pub modes: Vec<ModeDirections>,
}

/// Per-listing aggregation result. Recomputed each run, never persisted.
#[derive(Debug, Clone)]
pub struct AggregatedDirections {
    pub listing_id: String,
    pub places: Vec<PlaceDirections>,
}

/// Message as returned by the delivery collaborator, persisted verbatim in
/// the notification log. The id is only ever passed back as a reply target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentMessage {
    pub message_id: i64,
    pub text: String,
}
