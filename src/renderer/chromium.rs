//! Chromium-backed browser sessions
//!
//! One browser process per render. The session owns the process, its CDP
//! handler task and the temp profile dir; `close` tears all three down and
//! `Drop` covers the paths where `close` never ran.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use chromiumoxide::cdp::browser_protocol::emulation::SetDeviceMetricsOverrideParams;
use chromiumoxide::{Browser, Page};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::options::RenderOptions;
use super::{BrowserLauncher, BrowserSession};
use crate::browser_setup::{self, LaunchSettings};
use crate::config::StillbrookConfig;

/// Launches a fresh headless Chromium for every render
#[derive(Debug, Clone, Default)]
pub struct ChromiumLauncher {
    headless: bool,
    chrome_path: Option<PathBuf>,
}

impl ChromiumLauncher {
    pub fn new(headless: bool, chrome_path: Option<PathBuf>) -> Self {
        Self {
            headless,
            chrome_path,
        }
    }

    pub fn from_config(config: &StillbrookConfig) -> Self {
        Self::new(config.headless(), config.chrome_path().map(PathBuf::from))
    }
}

#[async_trait]
impl BrowserLauncher for ChromiumLauncher {
    async fn launch(&self, options: &RenderOptions) -> Result<Box<dyn BrowserSession>> {
        let settings = LaunchSettings {
            headless: self.headless,
            chrome_path: self.chrome_path.clone(),
            user_agent: options.user_agent.clone(),
            window_width: options.viewport_width,
            window_height: options.viewport_height,
            request_timeout: options.timeout,
        };

        let (browser, handler, user_data_dir) = browser_setup::launch_browser(&settings).await?;
        let mut session = ChromiumSession {
            browser,
            handler,
            user_data_dir: Some(user_data_dir),
            page: None,
        };

        if let Err(e) = session.open_page(options).await {
            if let Err(close_err) = session.close().await {
                warn!(error = %close_err, "Browser teardown after failed page setup reported errors");
            }
            return Err(e);
        }

        Ok(Box::new(session))
    }
}

/// A running browser with one blank page prepared for navigation
pub struct ChromiumSession {
    browser: Browser,
    handler: JoinHandle<()>,
    user_data_dir: Option<PathBuf>,
    page: Option<Page>,
}

impl ChromiumSession {
    async fn open_page(&mut self, options: &RenderOptions) -> Result<()> {
        let page = self
            .browser
            .new_page("about:blank")
            .await
            .context("Failed to create blank page")?;

        page.execute(
            SetDeviceMetricsOverrideParams::builder()
                .width(i64::from(options.viewport_width))
                .height(i64::from(options.viewport_height))
                .device_scale_factor(1.0)
                .mobile(false)
                .build()
                .map_err(anyhow::Error::msg)?,
        )
        .await
        .context("Failed to set viewport")?;

        if let Err(e) = browser_setup::apply_stealth_measures(&page).await {
            warn!("Failed to apply stealth measures: {e}");
        }

        self.page = Some(page);
        Ok(())
    }

    fn page(&self) -> Result<&Page> {
        self.page.as_ref().ok_or_else(|| anyhow!("Browser page is not open"))
    }
}

#[async_trait]
impl BrowserSession for ChromiumSession {
    async fn navigate(&mut self, url: &str) -> Result<()> {
        let page = self.page()?;
        page.goto(url).await.context("Failed to navigate")?;
        page.wait_for_navigation()
            .await
            .context("Failed to wait for page load")?;
        Ok(())
    }

    async fn has_selector(&mut self, selector: &str) -> bool {
        match self.page() {
            Ok(page) => page.find_element(selector).await.is_ok(),
            Err(_) => false,
        }
    }

    async fn scroll_by(&mut self, pixels: u32) -> Result<bool> {
        let script = format!(
            "(() => {{ window.scrollBy(0, {pixels}); \
             return window.innerHeight + window.scrollY >= document.body.scrollHeight; }})()"
        );
        let reached_bottom = self
            .page()?
            .evaluate(script.as_str())
            .await
            .context("Scroll script failed")?
            .into_value::<bool>()
            .context("Scroll script returned a non-boolean")?;
        Ok(reached_bottom)
    }

    async fn content(&mut self) -> Result<String> {
        self.page()?
            .content()
            .await
            .context("Failed to read page content")
    }

    async fn close(&mut self) -> Result<()> {
        let mut errors = Vec::new();

        if let Some(page) = self.page.take()
            && let Err(e) = page.close().await
        {
            errors.push(format!("Page close failed: {e}"));
        }

        debug!("Closing browser");
        if let Err(e) = self.browser.close().await {
            errors.push(format!("Browser close failed: {e}"));
        }

        // Chrome must exit before its profile dir can be removed
        match tokio::time::timeout(Duration::from_secs(5), self.browser.wait()).await {
            Ok(Ok(_)) => debug!("Browser process exited"),
            Ok(Err(e)) => errors.push(format!("Browser wait failed: {e}")),
            Err(_) => errors.push("Browser did not exit within 5 seconds".to_string()),
        }

        self.handler.abort();

        if let Some(path) = self.user_data_dir.take() {
            info!("Cleaning up temp directory: {}", path.display());
            if let Err(e) = std::fs::remove_dir_all(&path) {
                errors.push(format!("Directory cleanup failed: {e}"));
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(anyhow!(errors.join("; ")))
        }
    }
}

impl Drop for ChromiumSession {
    fn drop(&mut self) {
        self.handler.abort();
        if let Some(path) = self.user_data_dir.take() {
            warn!("Browser session dropped without close - removing temp dir in Drop");
            browser_setup::remove_profile_dir(&path);
        }
    }
}
