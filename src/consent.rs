//! Best-effort consent/cookie overlay dismissal.
//!
//! Tries an ordered list of candidate locators, most specific first, with a
//! short wait per candidate. First success wins; every failure is absorbed
//! here. The caller never sees an error and at most one click is performed.

use crate::browser::{Locator, Session};
use std::time::Duration;
use tracing::{debug, info};

/// Candidate dismissal controls, ordered most specific to broadest.
fn candidates() -> Vec<Locator> {
    vec![
        // OneTrust ships a stable id for its accept button
        Locator::css("button#onetrust-accept-btn-handler"),
        Locator::css("button[aria-label*='Elfogad']"),
        Locator::text("button", &["Elfogad", "Rendben", "Accept", "Agree", "OK"]),
        Locator::text("a", &["Elfogad", "Rendben", "Accept"]),
    ]
}

/// Attempt to dismiss a consent overlay. Returns whether a control was
/// clicked. Never fails the caller.
pub async fn dismiss(session: &dyn Session, per_candidate_timeout_ms: u64) -> bool {
    dismiss_with(session, &candidates(), per_candidate_timeout_ms).await
}

async fn dismiss_with(
    session: &dyn Session,
    candidates: &[Locator],
    per_candidate_timeout_ms: u64,
) -> bool {
    let timeout = Duration::from_millis(per_candidate_timeout_ms);
    for candidate in candidates {
        debug!(%candidate, "trying consent candidate");
        if let Err(e) = session.wait_for_clickable(candidate, timeout).await {
            debug!(%candidate, "not clickable: {e}");
            continue;
        }
        match session.click(candidate).await {
            Ok(()) => {
                info!(%candidate, "consent overlay dismissed");
                return true;
            }
            Err(e) => {
                debug!(%candidate, "click failed: {e}");
                continue;
            }
        }
    }
    info!("no consent overlay found to dismiss");
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{Error, Result};
    use crate::markup::ElementQuery;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Fake session where exactly the locators in `clickable` resolve.
    struct FakeSession {
        clickable: Vec<Locator>,
        clicks: Mutex<Vec<Locator>>,
    }

    impl FakeSession {
        fn new(clickable: Vec<Locator>) -> Self {
            Self {
                clickable,
                clicks: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl Session for FakeSession {
        async fn navigate(&mut self, _url: &str) -> Result<()> {
            Ok(())
        }

        async fn wait_for_elements(
            &self,
            _query: &ElementQuery,
            _timeout: Duration,
        ) -> Result<Vec<String>> {
            Ok(Vec::new())
        }

        async fn wait_for_clickable(&self, locator: &Locator, _timeout: Duration) -> Result<()> {
            if self.clickable.contains(locator) {
                Ok(())
            } else {
                Err(Error::NotInteractable(locator.to_string()))
            }
        }

        async fn click(&self, locator: &Locator) -> Result<()> {
            if self.clickable.contains(locator) {
                self.clicks.lock().unwrap().push(locator.clone());
                Ok(())
            } else {
                Err(Error::NotInteractable(locator.to_string()))
            }
        }

        async fn close(self: Box<Self>) -> Result<()> {
            Ok(())
        }
    }

    fn three_candidates() -> Vec<Locator> {
        vec![
            Locator::css("#banner-accept"),
            Locator::css("button.consent-ok"),
            Locator::text("button", &["Accept"]),
        ]
    }

    #[tokio::test]
    async fn second_candidate_wins_with_exactly_one_click() {
        let session = FakeSession::new(vec![Locator::css("button.consent-ok")]);
        let dismissed = dismiss_with(&session, &three_candidates(), 10).await;

        assert!(dismissed);
        let clicks = session.clicks.lock().unwrap();
        assert_eq!(clicks.len(), 1);
        assert_eq!(clicks[0], Locator::css("button.consent-ok"));
    }

    #[tokio::test]
    async fn first_success_short_circuits_remaining_candidates() {
        let session = FakeSession::new(vec![
            Locator::css("#banner-accept"),
            Locator::text("button", &["Accept"]),
        ]);
        let dismissed = dismiss_with(&session, &three_candidates(), 10).await;

        assert!(dismissed);
        let clicks = session.clicks.lock().unwrap();
        assert_eq!(clicks.len(), 1);
        assert_eq!(clicks[0], Locator::css("#banner-accept"));
    }

    #[tokio::test]
    async fn exhausted_candidates_absorb_all_failures() {
        let session = FakeSession::new(Vec::new());
        let dismissed = dismiss_with(&session, &three_candidates(), 10).await;

        assert!(!dismissed);
        assert!(session.clicks.lock().unwrap().is_empty());
    }

    #[test]
    fn candidate_order_is_most_specific_first() {
        let list = candidates();
        assert!(matches!(&list[0], Locator::Css(sel) if sel.contains("onetrust")));
        assert!(matches!(list.last().unwrap(), Locator::Text { .. }));
    }
}
