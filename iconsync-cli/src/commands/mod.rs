pub mod pages;
pub mod status;
pub mod sync;

use std::time::Duration;

use iconsync_core::Settings;
use iconsync_figma::FigmaClient;

/// HTTP client configured from resolved settings.
pub(crate) fn client(settings: &Settings) -> FigmaClient {
    FigmaClient::new(
        settings.api_base.clone(),
        Duration::from_secs(settings.timeout_secs),
    )
}
