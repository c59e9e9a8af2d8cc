use apartment_notifier::domain::ports::Messenger;
use apartment_notifier::utils::logger;
use apartment_notifier::{
    prepare_listings, CliConfig, Credentials, FileMessageLog, GoogleMapsRouter, ListingBatch,
    Notifier, PlaceCatalog, TelegramMessenger,
};
use chrono::Utc;
use clap::Parser;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = CliConfig::parse();

    logger::init_cli_logger(config.verbose);

    tracing::info!("Starting apartment-notifier");
    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    let credentials = match Credentials::from_env() {
        Ok(credentials) => credentials,
        Err(e) => {
            tracing::error!("❌ Configuration error: {}", e);
            eprintln!("❌ {}", e);
            std::process::exit(1);
        }
    };

    let catalog = PlaceCatalog::from_toml_file(&config.places_file)?;
    tracing::info!(
        "Loaded {} places from {}",
        catalog.places.len(),
        config.places_file
    );

    let batch: ListingBatch = serde_json::from_str(&std::fs::read_to_string(&config.batch_file)?)?;
    let listings = prepare_listings(&batch.listings);
    if listings.is_empty() {
        tracing::info!("No listings to announce");
        return Ok(());
    }
    tracing::info!(
        "Announcing {} listings ({:?})",
        listings.len(),
        batch.classification
    );

    let messenger = TelegramMessenger::new(credentials.telegram_token.clone());
    let router = GoogleMapsRouter::new(credentials.maps_api_key.clone());
    let store = FileMessageLog::open(&config.store_path)?;

    let notifier = Notifier::new(
        &router,
        &messenger,
        &store,
        &catalog.places,
        &credentials.telegram_channel,
    );

    match notifier
        .process_batch(batch.classification, &listings, Utc::now())
        .await
    {
        Ok(()) => {
            tracing::info!("✅ All listings announced");
        }
        Err(e) => {
            tracing::error!("❌ Notification run failed: {}", e);
            // Failures go to the operator chat, never to the listing channel.
            if let Some(operator) = &credentials.operator_channel {
                let report = format!("apartment-notifier run failed: {}", e);
                if let Err(report_err) = messenger.send(operator, &report, None).await {
                    tracing::error!("Could not reach operator channel: {}", report_err);
                }
            }
            std::process::exit(1);
        }
    }

    Ok(())
}
