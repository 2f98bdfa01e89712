//! Chromium-backed session using chromiumoxide.
//!
//! Element waits poll page snapshots (full outer HTML) and run the token-set
//! matching from [`crate::markup`] over each snapshot; clickability probes
//! and clicks are injected JavaScript. Values interpolated into scripts are
//! escaped for the JS string context first.

use super::{Locator, Session, POLL_INTERVAL};
use crate::error::{Error, Result};
use crate::markup::{self, ElementQuery};
use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::page::Page;
use futures::StreamExt;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Find the Chromium binary path.
pub fn find_chromium() -> Option<PathBuf> {
    // 1. VITRINE_CHROMIUM_PATH env
    if let Ok(p) = std::env::var("VITRINE_CHROMIUM_PATH") {
        let path = PathBuf::from(&p);
        if path.exists() {
            return Some(path);
        }
    }

    // 2. System PATH
    for name in ["google-chrome", "chromium", "chromium-browser"] {
        if let Ok(path) = which::which(name) {
            return Some(path);
        }
    }

    // 3. Common macOS location
    if cfg!(target_os = "macos") {
        let common = PathBuf::from("/Applications/Google Chrome.app/Contents/MacOS/Google Chrome");
        if common.exists() {
            return Some(common);
        }
    }

    None
}

/// A live Chromium page, exclusively owned for one scrape run.
pub struct ChromiumSession {
    browser: Browser,
    page: Page,
    handler: JoinHandle<()>,
    navigation_timeout_ms: u64,
}

impl ChromiumSession {
    /// Launch a Chromium instance and open a blank page.
    pub async fn launch(headless: bool, navigation_timeout_ms: u64) -> Result<Self> {
        let chrome_path = find_chromium().ok_or_else(|| {
            Error::Browser(
                "Chromium not found. Install google-chrome or set VITRINE_CHROMIUM_PATH".into(),
            )
        })?;

        let mut builder = BrowserConfig::builder()
            .chrome_executable(chrome_path)
            .arg("--no-sandbox")
            .arg("--disable-gpu")
            .arg("--disable-dev-shm-usage")
            .arg("--window-size=1920,1080");
        if headless {
            builder = builder.arg("--headless=new");
        } else {
            builder = builder.with_head();
        }
        let config = builder
            .build()
            .map_err(|e| Error::Browser(format!("failed to build browser config: {e}")))?;

        let (browser, mut handler) = Browser::launch(config)
            .await
            .map_err(|e| Error::Browser(format!("failed to launch Chromium: {e}")))?;

        // Drain CDP events for the lifetime of the session
        let handler = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                let _ = event;
            }
        });

        let page = browser
            .new_page("about:blank")
            .await
            .map_err(|e| Error::Browser(format!("failed to open page: {e}")))?;

        info!(headless, "Chromium session ready");
        Ok(Self {
            browser,
            page,
            handler,
            navigation_timeout_ms,
        })
    }

    /// Full outer HTML of the current document.
    async fn snapshot(&self) -> Result<String> {
        let result = self
            .page
            .evaluate("document.documentElement.outerHTML")
            .await
            .map_err(|e| Error::Browser(format!("snapshot failed: {e}")))?;
        result
            .into_value()
            .map_err(|e| Error::Browser(format!("snapshot result not a string: {e:?}")))
    }

    async fn eval_bool(&self, script: &str) -> Result<bool> {
        let result = self
            .page
            .evaluate(script)
            .await
            .map_err(|e| Error::Browser(format!("script evaluation failed: {e}")))?;
        result
            .into_value()
            .map_err(|e| Error::Browser(format!("script result not a bool: {e:?}")))
    }
}

#[async_trait]
impl Session for ChromiumSession {
    async fn navigate(&mut self, url: &str) -> Result<()> {
        let deadline = Duration::from_millis(self.navigation_timeout_ms);
        let result = tokio::time::timeout(deadline, self.page.goto(url)).await;

        match result {
            Ok(Ok(_)) => {
                // Let the load event settle; a failure here is not fatal,
                // the page may already be interactive
                let _ = self.page.wait_for_navigation().await;
                debug!(url, "navigation complete");
                Ok(())
            }
            Ok(Err(e)) => Err(Error::Navigation {
                url: url.to_string(),
                reason: e.to_string(),
            }),
            Err(_) => Err(Error::Navigation {
                url: url.to_string(),
                reason: format!("timed out after {}ms", self.navigation_timeout_ms),
            }),
        }
    }

    async fn wait_for_elements(
        &self,
        query: &ElementQuery,
        timeout: Duration,
    ) -> Result<Vec<String>> {
        let deadline = Instant::now() + timeout;
        loop {
            match self.snapshot().await {
                Ok(html) => {
                    let fragments = markup::matching_fragments(&html, query);
                    if !fragments.is_empty() {
                        debug!(%query, count = fragments.len(), "elements present");
                        return Ok(fragments);
                    }
                }
                // A flaky snapshot counts as "nothing matched yet"; the
                // deadline still produces a normal empty result
                Err(e) => warn!(%query, "snapshot failed during wait: {e}"),
            }
            if Instant::now() >= deadline {
                debug!(%query, "wait elapsed with no matches");
                return Ok(Vec::new());
            }
            tokio::time::sleep(POLL_INTERVAL).await;
        }
    }

    async fn wait_for_clickable(&self, locator: &Locator, timeout: Duration) -> Result<()> {
        let probe = probe_script(locator);
        let deadline = Instant::now() + timeout;
        loop {
            match self.eval_bool(&probe).await {
                Ok(true) => return Ok(()),
                Ok(false) => {}
                Err(e) => debug!(%locator, "clickability probe failed: {e}"),
            }
            if Instant::now() >= deadline {
                return Err(Error::NotInteractable(locator.to_string()));
            }
            tokio::time::sleep(POLL_INTERVAL).await;
        }
    }

    async fn click(&self, locator: &Locator) -> Result<()> {
        let clicked = self.eval_bool(&click_script(locator)).await?;
        if clicked {
            debug!(%locator, "clicked");
            Ok(())
        } else {
            Err(Error::NotInteractable(locator.to_string()))
        }
    }

    async fn close(mut self: Box<Self>) -> Result<()> {
        let _ = self.page.close().await;
        if let Err(e) = self.browser.close().await {
            debug!("browser close: {e}");
        }
        // Reap the child process so no orphan survives the run
        let _ = self.browser.wait().await;
        self.handler.abort();
        debug!("Chromium session closed");
        Ok(())
    }
}

/// JS predicate: does `locator` resolve to a visible, enabled element?
fn probe_script(locator: &Locator) -> String {
    match locator {
        Locator::Css(sel) => format!(
            r#"(() => {{
                const el = document.querySelector('{}');
                if (!el || el.disabled) return false;
                const style = window.getComputedStyle(el);
                if (style.display === 'none' || style.visibility === 'hidden') return false;
                const rect = el.getBoundingClientRect();
                return rect.width > 0 && rect.height > 0;
            }})()"#,
            sanitize_js_string(sel)
        ),
        Locator::Text { selector, synonyms } => format!(
            r#"(() => {{
                const re = new RegExp('{}', 'i');
                return [...document.querySelectorAll('{}')].some(el => {{
                    if (!re.test(el.textContent) || el.disabled) return false;
                    const rect = el.getBoundingClientRect();
                    return rect.width > 0 && rect.height > 0;
                }});
            }})()"#,
            sanitize_js_string(&synonyms.join("|")),
            sanitize_js_string(selector)
        ),
    }
}

/// JS action: click the first element `locator` resolves to.
/// Evaluates to true iff a click was dispatched.
fn click_script(locator: &Locator) -> String {
    match locator {
        Locator::Css(sel) => format!(
            r#"(() => {{
                const el = document.querySelector('{}');
                if (el) {{ el.click(); return true; }}
                return false;
            }})()"#,
            sanitize_js_string(sel)
        ),
        Locator::Text { selector, synonyms } => format!(
            r#"(() => {{
                const re = new RegExp('{}', 'i');
                const el = [...document.querySelectorAll('{}')].find(e => re.test(e.textContent));
                if (el) {{ el.click(); return true; }}
                return false;
            }})()"#,
            sanitize_js_string(&synonyms.join("|")),
            sanitize_js_string(selector)
        ),
    }
}

/// Escape a string for safe injection into a JS string literal.
///
/// Escapes everything that could break out of the string context and strips
/// null bytes; angle brackets become hex escapes so a reflected value can
/// never form a script tag.
fn sanitize_js_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 8);
    for ch in s.chars() {
        match ch {
            '\\' | '\'' | '"' | '`' => {
                out.push('\\');
                out.push(ch);
            }
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\0' => {}
            '<' => out.push_str("\\x3c"),
            '>' => out.push_str("\\x3e"),
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn probe_script_embeds_escaped_selector() {
        // quoted attribute selectors must survive injection into the probe
        let locator = Locator::css("button[aria-label*='Elfogad']");
        let js = probe_script(&locator);
        assert!(js.contains("querySelector"));
        assert!(js.contains("\\'Elfogad\\'"));
        assert!(!js.contains("*='Elfogad'"));
    }

    #[test]
    fn scripts_neutralize_markup_breakouts() {
        let locator = Locator::css("</script><img onerror=x>");
        let js = click_script(&locator);
        assert!(!js.contains("</script>"));
        assert!(js.contains("\\x3c/script\\x3e"));
    }

    #[test]
    fn control_characters_cannot_split_a_script_line() {
        let js = probe_script(&Locator::css("a\n\tb\0c"));
        assert!(js.contains("a\\n\\tbc"));
    }

    #[test]
    fn text_click_script_joins_synonyms() {
        let locator = Locator::text("button", &["Accept", "OK"]);
        let js = click_script(&locator);
        assert!(js.contains("Accept|OK"));
        assert!(js.contains("el.click()"));
    }
}
