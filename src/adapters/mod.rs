pub mod google_maps;
pub mod message_log;
pub mod telegram;

pub use google_maps::GoogleMapsRouter;
pub use message_log::FileMessageLog;
pub use telegram::TelegramMessenger;
