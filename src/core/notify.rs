use crate::core::address::build_listing;
use crate::core::directions::DirectionsAggregator;
use crate::core::format::format_travel_messages;
use crate::domain::model::{Classification, Listing, ListingInput, Place};
use crate::domain::ports::{MessageStore, Messenger, RouteProvider};
use crate::utils::error::{NotifierError, Result};
use chrono::{DateTime, Utc};
use regex::Regex;
use std::collections::HashSet;

/// Drives the per-listing flow: aggregate directions, decide reply-vs-new
/// thread against the message log, send in order and persist every sent
/// message right away. Listings are processed one at a time so message
/// ordering in the channel stays deterministic.
pub struct Notifier<'a, R, M, S>
where
    R: RouteProvider,
    M: Messenger,
    S: MessageStore,
{
    routes: &'a R,
    messenger: &'a M,
    store: &'a S,
    catalog: &'a [Place],
    channel: &'a str,
}

impl<'a, R, M, S> Notifier<'a, R, M, S>
where
    R: RouteProvider,
    M: Messenger,
    S: MessageStore,
{
    pub fn new(
        routes: &'a R,
        messenger: &'a M,
        store: &'a S,
        catalog: &'a [Place],
        channel: &'a str,
    ) -> Self {
        Self {
            routes,
            messenger,
            store,
            catalog,
            channel,
        }
    }

    pub async fn process_batch(
        &self,
        classification: Classification,
        listings: &[Listing],
        now: DateTime<Utc>,
    ) -> Result<()> {
        for listing in listings {
            self.process_listing(listing, classification, now).await?;
        }
        Ok(())
    }

    pub async fn process_listing(
        &self,
        listing: &Listing,
        classification: Classification,
        now: DateTime<Utc>,
    ) -> Result<()> {
        tracing::info!("Processing {} ({})", listing.url, listing.friendly_address());

        let aggregator = DirectionsAggregator::new(self.routes);
        let aggregated = aggregator.aggregate(listing, self.catalog, now).await;
        let travel_blocks = format_travel_messages(listing, self.catalog, &aggregated);

        // The URL is escaped here; the store matches it as a plain substring.
        let pattern =
            Regex::new(&regex::escape(&listing.url)).map_err(|e| NotifierError::StoreError {
                message: format!("Invalid lookup pattern: {}", e),
            })?;
        let prior = self.store.find_by_pattern(&pattern).await?;
        let reply_to = prior.as_ref().map(|m| m.message_id);

        let friendly = listing.friendly_address();
        let headline = headline_text(classification, &friendly, &listing.url, prior.is_some());
        let head = self.messenger.send(self.channel, &headline, reply_to).await?;
        self.store.append(&head).await?;

        if prior.is_some() {
            // Travel details are already in the thread; a reply is enough.
            tracing::info!("Already announced, replied in existing thread");
            return Ok(());
        }

        for block in &travel_blocks {
            let sent = self.messenger.send(self.channel, block, None).await?;
            self.store.append(&sent).await?;
        }

        let closing = closing_text(classification, &friendly);
        let sent = self
            .messenger
            .send(self.channel, &closing, Some(head.message_id))
            .await?;
        self.store.append(&sent).await?;

        Ok(())
    }
}

/// Converts raw ingestion output into listings. Malformed addresses are
/// logged and skipped so the rest of the batch proceeds; repeated sightings
/// of the same canonical URL keep the first one only.
pub fn prepare_listings(inputs: &[ListingInput]) -> Vec<Listing> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut listings = Vec::new();
    for input in inputs {
        match build_listing(&input.url, &input.address) {
            Ok(listing) => {
                if seen.insert(listing.url.clone()) {
                    listings.push(listing);
                }
            }
            Err(e) => {
                tracing::warn!("Skipping listing {}: {}", input.url, e);
            }
        }
    }
    listings
}

fn headline_text(
    classification: Classification,
    friendly: &str,
    url: &str,
    is_reply: bool,
) -> String {
    match (classification, is_reply) {
        (Classification::NewListing, false) => {
            format!("<b>New apartment at {}!</b>\n{}", friendly, url)
        }
        (Classification::NewListing, true) => {
            format!("<b>Something changed at {}!</b>", friendly)
        }
        (Classification::Showing, false) => format!(
            "<b>There will be an apartment showing soon at {}.</b>\n{}",
            friendly, url
        ),
        (Classification::Showing, true) => format!(
            "<b>There will be an apartment showing soon at {}.</b>",
            friendly
        ),
    }
}

fn closing_text(classification: Classification, friendly: &str) -> String {
    match classification {
        Classification::NewListing => format!("<b>That's all about {}.</b>", friendly),
        Classification::Showing => format!(
            "<b>That's all about {}. Check out the showing times via Etuovi.</b>",
            friendly
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{RouteSummary, SentMessage, TravelMode};
    use crate::domain::ports::RouteQuery;
    use async_trait::async_trait;
    use chrono::TimeZone;
    use std::sync::Mutex;

    struct StubProvider;

    #[async_trait]
    impl RouteProvider for StubProvider {
        async fn fetch_route(&self, _query: &RouteQuery) -> Result<RouteSummary> {
            Ok(RouteSummary {
                route_count: 1,
                leg_count: 1,
                duration_secs: 1800,
                distance_meters: 5000,
            })
        }
    }

    #[derive(Debug, Clone, PartialEq)]
    struct Delivered {
        text: String,
        reply_to: Option<i64>,
    }

    struct FakeMessenger {
        sent: Mutex<Vec<Delivered>>,
        next_id: Mutex<i64>,
    }

    impl FakeMessenger {
        fn new() -> Self {
            Self {
                sent: Mutex::new(Vec::new()),
                next_id: Mutex::new(100),
            }
        }

        fn deliveries(&self) -> Vec<Delivered> {
            self.sent.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Messenger for FakeMessenger {
        async fn send(
            &self,
            _channel: &str,
            text: &str,
            reply_to: Option<i64>,
        ) -> Result<SentMessage> {
            let mut next_id = self.next_id.lock().unwrap();
            let id = *next_id;
            *next_id += 1;
            self.sent.lock().unwrap().push(Delivered {
                text: text.to_string(),
                reply_to,
            });
            Ok(SentMessage {
                message_id: id,
                text: text.to_string(),
            })
        }
    }

    #[derive(Default)]
    struct MemoryStore {
        messages: Mutex<Vec<SentMessage>>,
    }

    impl MemoryStore {
        fn stored(&self) -> Vec<SentMessage> {
            self.messages.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl MessageStore for MemoryStore {
        async fn append(&self, message: &SentMessage) -> Result<()> {
            self.messages.lock().unwrap().push(message.clone());
            Ok(())
        }

        async fn find_by_pattern(&self, pattern: &Regex) -> Result<Option<SentMessage>> {
            Ok(self
                .messages
                .lock()
                .unwrap()
                .iter()
                .find(|m| pattern.is_match(&m.text.replace('\n', " ")))
                .cloned())
        }
    }

    fn catalog() -> Vec<Place> {
        vec![Place {
            id: "Office".to_string(),
            address: "Keilalahdentie 2-4, 02150 Espoo".to_string(),
            modes: vec![TravelMode::Transit],
            arrival: None,
            transit_modes: Vec::new(),
            waypoints: Vec::new(),
        }]
    }

    fn listing() -> Listing {
        prepare_listings(&[ListingInput {
            url: "https://www.etuovi.com/kohde/12345".to_string(),
            address: "Huvilinnanmäki 8 A, 02600, Leppävaara, Espoo, Suomi".to_string(),
        }])
        .remove(0)
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 4, 1, 8, 0, 0).unwrap()
    }

    #[tokio::test]
    async fn test_new_listing_starts_thread_and_persists_everything() {
        let provider = StubProvider;
        let messenger = FakeMessenger::new();
        let store = MemoryStore::default();
        let places = catalog();
        let notifier = Notifier::new(&provider, &messenger, &store, &places, "@channel");

        notifier
            .process_listing(&listing(), Classification::NewListing, now())
            .await
            .unwrap();

        let deliveries = messenger.deliveries();
        // Headline, one travel block per place, closing.
        assert_eq!(deliveries.len(), 3);
        assert_eq!(
            deliveries[0].text,
            "<b>New apartment at Huvilinnanmäki 8 A, Leppävaara!</b>\nhttps://www.etuovi.com/kohde/12345"
        );
        assert_eq!(deliveries[0].reply_to, None);
        assert!(deliveries[1].text.starts_with("<b>Office "));
        assert_eq!(deliveries[1].reply_to, None);
        assert_eq!(
            deliveries[2].text,
            "<b>That's all about Huvilinnanmäki 8 A, Leppävaara.</b>"
        );
        // Closing chains to the headline.
        assert_eq!(deliveries[2].reply_to, Some(100));

        // Every sent message hit the store, in send order.
        let stored = store.stored();
        assert_eq!(stored.len(), 3);
        assert_eq!(stored[0].message_id, 100);
        assert_eq!(stored[2].message_id, 102);
    }

    #[tokio::test]
    async fn test_second_sighting_replies_without_travel_details() {
        let provider = StubProvider;
        let messenger = FakeMessenger::new();
        let store = MemoryStore::default();
        let places = catalog();
        let notifier = Notifier::new(&provider, &messenger, &store, &places, "@channel");

        notifier
            .process_listing(&listing(), Classification::NewListing, now())
            .await
            .unwrap();
        notifier
            .process_listing(&listing(), Classification::NewListing, now())
            .await
            .unwrap();

        let deliveries = messenger.deliveries();
        // First run: 3 messages. Second run: reply headline only.
        assert_eq!(deliveries.len(), 4);
        assert_eq!(
            deliveries[3].text,
            "<b>Something changed at Huvilinnanmäki 8 A, Leppävaara!</b>"
        );
        // Reply targets the thread root (the first headline).
        assert_eq!(deliveries[3].reply_to, Some(100));
        assert_eq!(store.stored().len(), 4);
    }

    #[tokio::test]
    async fn test_showing_also_replies_in_thread() {
        let provider = StubProvider;
        let messenger = FakeMessenger::new();
        let store = MemoryStore::default();
        let places = catalog();
        let notifier = Notifier::new(&provider, &messenger, &store, &places, "@channel");

        notifier
            .process_listing(&listing(), Classification::NewListing, now())
            .await
            .unwrap();
        notifier
            .process_listing(&listing(), Classification::Showing, now())
            .await
            .unwrap();

        let deliveries = messenger.deliveries();
        assert_eq!(
            deliveries[3].text,
            "<b>There will be an apartment showing soon at Huvilinnanmäki 8 A, Leppävaara.</b>"
        );
        assert_eq!(deliveries[3].reply_to, Some(100));
    }

    #[tokio::test]
    async fn test_showing_new_thread_includes_url_and_showing_closing() {
        let provider = StubProvider;
        let messenger = FakeMessenger::new();
        let store = MemoryStore::default();
        let places = catalog();
        let notifier = Notifier::new(&provider, &messenger, &store, &places, "@channel");

        notifier
            .process_listing(&listing(), Classification::Showing, now())
            .await
            .unwrap();

        let deliveries = messenger.deliveries();
        assert!(deliveries[0]
            .text
            .ends_with("</b>\nhttps://www.etuovi.com/kohde/12345"));
        assert!(deliveries[2].text.contains("Check out the showing times"));
    }

    #[tokio::test]
    async fn test_delivery_error_propagates_but_keeps_persisted_progress() {
        struct FailingSecondSend {
            inner: FakeMessenger,
            calls: Mutex<usize>,
        }

        #[async_trait]
        impl Messenger for FailingSecondSend {
            async fn send(
                &self,
                channel: &str,
                text: &str,
                reply_to: Option<i64>,
            ) -> Result<SentMessage> {
                {
                    let mut calls = self.calls.lock().unwrap();
                    *calls += 1;
                    if *calls > 1 {
                        return Err(NotifierError::DeliveryError {
                            message: "chat not reachable".to_string(),
                        });
                    }
                }
                self.inner.send(channel, text, reply_to).await
            }
        }

        let provider = StubProvider;
        let messenger = FailingSecondSend {
            inner: FakeMessenger::new(),
            calls: Mutex::new(0),
        };
        let store = MemoryStore::default();
        let places = catalog();
        let notifier = Notifier::new(&provider, &messenger, &store, &places, "@channel");

        let err = notifier
            .process_listing(&listing(), Classification::NewListing, now())
            .await
            .unwrap_err();
        assert!(matches!(err, NotifierError::DeliveryError { .. }));

        // The headline made it out and stays visible to future lookups.
        assert_eq!(store.stored().len(), 1);
        assert!(store.stored()[0].text.contains("/kohde/12345"));
    }

    #[test]
    fn test_prepare_listings_dedupes_and_skips_malformed() {
        let inputs = vec![
            ListingInput {
                url: "https://www.etuovi.com/kohde/1".to_string(),
                address: "Katu 1, 00100, Keskusta, Helsinki, Suomi".to_string(),
            },
            ListingInput {
                url: "https://www.etuovi.com/kohde/1?utm=x".to_string(),
                address: "Katu 1, 00100, Keskusta, Helsinki, Suomi".to_string(),
            },
            ListingInput {
                url: "https://www.etuovi.com/kohde/2".to_string(),
                address: "too, short".to_string(),
            },
        ];

        let listings = prepare_listings(&inputs);
        assert_eq!(listings.len(), 1);
        assert_eq!(listings[0].url, "https://www.etuovi.com/kohde/1");
    }
}
