use crate::domain::model::{
    AggregatedDirections, DirectionsResult, Listing, ModeDirections, Place, StructuredAddress,
    TravelMode,
};
use url::form_urlencoded;

/// Renders aggregated directions into one HTML text block per place, in
/// catalog order. Telegram's HTML parse mode handles the markup.
pub fn format_travel_messages(
    listing: &Listing,
    catalog: &[Place],
    aggregated: &AggregatedDirections,
) -> Vec<String> {
    aggregated
        .places
        .iter()
        .filter_map(|place_directions| {
            catalog
                .iter()
                .find(|p| p.id == place_directions.place_id)
                .map(|place| format_place_block(listing, place, &place_directions.modes))
        })
        .collect()
}

fn format_place_block(listing: &Listing, place: &Place, modes: &[ModeDirections]) -> String {
    let via = if place.has_waypoints() {
        format!(" via {} waypoints", place.waypoints.len())
    } else {
        String::new()
    };
    let link = maps_link(&listing.components, &place.address, &place.waypoints);

    let mut lines = vec![format!(
        "<b>{} <a href=\"{}\">(from {}{})</a></b>",
        place.id,
        link,
        listing.friendly_address(),
        via
    )];

    if modes.iter().any(|m| m.result.routed().is_some()) {
        for entry in modes {
            lines.push(mode_line(place, entry));
        }
    } else {
        lines.push("No routes could be found".to_string());
    }

    lines.join("\n")
}

fn mode_line(place: &Place, entry: &ModeDirections) -> String {
    let Some(summary) = entry.result.routed() else {
        let reason = match &entry.result {
            DirectionsResult::Failure { reason } => reason.as_str(),
            DirectionsResult::Success(_) => "",
        };
        return if reason.is_empty() {
            format!("{} No route found", entry.mode.emoji())
        } else {
            format!("{} No route found ({})", entry.mode.emoji(), reason)
        };
    };

    let mut line = format!(
        "{} total of {}, {} travel",
        entry.mode.emoji(),
        format_duration(summary.duration_secs),
        format_distance(summary.distance_meters)
    );
    if entry.mode == TravelMode::Transit && place.has_waypoints() {
        line.push_str(" <i>(waypoints not supported in transit mode)</i>");
    }
    if summary.route_count > 1 {
        line.push_str(&format!(" ({} routes available)", summary.route_count));
    }
    if summary.leg_count > 1 {
        line.push_str(&format!(". Route with {} legs", summary.leg_count));
    }
    line
}

/// Hours segment omitted when zero; remainder minutes rounded up, which
/// doesn't hurt in an estimate.
pub fn format_duration(duration_secs: u64) -> String {
    let hours = duration_secs / 3600;
    let minutes = (duration_secs % 3600).div_ceil(60);
    if hours > 0 {
        format!("{} h {} min", hours, minutes)
    } else {
        format!("{} min", minutes)
    }
}

/// Under a kilometer: meters to the nearest ten. Otherwise kilometers with
/// one decimal.
pub fn format_distance(distance_meters: u64) -> String {
    if distance_meters < 1000 {
        format!("{} m", (distance_meters + 5) / 10 * 10)
    } else {
        format!("{:.1} km", distance_meters as f64 / 1000.0)
    }
}

/// Directions deep link per the maps URL guide:
/// https://developers.google.com/maps/documentation/urls/guide#directions-action
pub fn maps_link(origin: &StructuredAddress, destination: &str, waypoints: &[String]) -> String {
    let origin_text = format!("{}, {} {}", origin.street, origin.postal_code, origin.city);
    let mut link = format!(
        "https://www.google.com/maps/dir/?api=1&origin={}&destination={}",
        encode(&origin_text),
        encode(destination)
    );
    if !waypoints.is_empty() {
        link.push_str(&format!("&waypoints={}", encode(&waypoints.join("|"))));
    }
    link
}

fn encode(text: &str) -> String {
    form_urlencoded::byte_serialize(text.as_bytes()).collect()
}
