use crate::domain::model::{Listing, StructuredAddress};
use crate::utils::error::{NotifierError, Result};
use url::Url;

/// Splits a free-text address into positional components.
///
/// Examples seen in the wild:
///   Leikkikuja 4 as 3, 14700, Kirkonkylä, Hämeenlinna, Suomi
///   Kalevanvainio 1 C 16, 02100, Tapiola, Aarnivalkea, Espoo, Suomi
///
/// City and country always come from the last two segments, whatever the
/// total segment count is.
pub fn parse_address(raw: &str) -> Result<StructuredAddress> {
    let parts: Vec<&str> = raw.split(',').map(str::trim).collect();
    if parts.len() < 4 {
        return Err(NotifierError::MalformedAddress {
            address: raw.to_string(),
        });
    }

    let last = parts.len() - 1;
    Ok(StructuredAddress {
        street: parts[0].to_string(),
        postal_code: parts[1].to_string(),
        district: parts[2].to_string(),
        city: parts[last - 1].to_string(),
        country: parts[last].to_string(),
    })
}

/// Builds a listing from a raw link. The id is the URL path, which is
/// stable across repeated sightings of the same unit; the canonical url
/// drops any query string.
pub fn build_listing(raw_url: &str, display_address: &str) -> Result<Listing> {
    let parsed = Url::parse(raw_url).map_err(|e| NotifierError::InvalidUrl {
        url: raw_url.to_string(),
        reason: e.to_string(),
    })?;

    let components = parse_address(display_address)?;
    Ok(Listing {
        id: parsed.path().to_string(),
        url: format!("{}{}", parsed.origin().ascii_serialization(), parsed.path()),
        address: display_address.to_string(),
        components,
    })
}
