//! Composition root: navigate → consent attempt → extraction, with the
//! session released on every exit path.

use crate::browser::Session;
use crate::config::ScrapeConfig;
use crate::consent;
use crate::error::Result;
use crate::extract::{self, ProductRecord};
use tracing::{info, warn};

/// Run one scrape over an owned session. The session is closed before this
/// returns, whether the run succeeded or failed; only navigation failure
/// aborts the run.
pub async fn run(
    mut session: Box<dyn Session>,
    url: &str,
    config: &ScrapeConfig,
) -> Result<Vec<ProductRecord>> {
    let outcome = drive(session.as_mut(), url, config).await;
    if let Err(e) = session.close().await {
        warn!("session close failed: {e}");
    }
    outcome
}

async fn drive(
    session: &mut dyn Session,
    url: &str,
    config: &ScrapeConfig,
) -> Result<Vec<ProductRecord>> {
    info!(url, "loading listing page");
    session.navigate(url).await?;

    let dismissed = consent::dismiss(session, config.consent_timeout_ms).await;
    info!(dismissed, "consent dismissal attempt finished");

    extract::extract_all(session, config).await
}
