//! Results-page rendering with a plain-fetch fallback
//!
//! The browser path runs launch, navigate, dynamic-content wait, optional
//! image delay, optional lazy scroll and extraction. Any failure at launch,
//! navigation or extraction falls through to a plain `GET` of the same URL.
//! The session is closed on every path once launched.

mod chromium;
mod fallback;
mod options;
mod timeout;

use std::sync::LazyLock;
use std::time::Instant;

use async_trait::async_trait;
use scraper::{Html, Selector};
use tracing::{debug, error, info, warn};

use crate::error::{StillbrookError, StillbrookResult};
use crate::utils::{DYNAMIC_RESULT_HOSTS, PRIMARY_CONTENT_SELECTOR};

pub use chromium::{ChromiumLauncher, ChromiumSession};
pub use fallback::ReqwestFetcher;
pub use options::{RenderOptions, is_image_search_url};
pub use timeout::with_page_timeout;

/// Message returned when neither the browser nor the fallback produced HTML
pub const RENDER_FAILED_MESSAGE: &str = "Both browser rendering and fallback failed";

/// Starts browser sessions
#[async_trait]
pub trait BrowserLauncher: Send + Sync {
    async fn launch(&self, options: &RenderOptions) -> anyhow::Result<Box<dyn BrowserSession>>;
}

/// One live page in a browser
#[async_trait]
pub trait BrowserSession: Send {
    async fn navigate(&mut self, url: &str) -> anyhow::Result<()>;

    /// Whether `selector` currently matches an element
    async fn has_selector(&mut self, selector: &str) -> bool;

    /// Scroll down by `pixels`; returns true once the bottom is reached
    async fn scroll_by(&mut self, pixels: u32) -> anyhow::Result<bool>;

    async fn content(&mut self) -> anyhow::Result<String>;

    /// Release the page and browser; safe to call once per session
    async fn close(&mut self) -> anyhow::Result<()>;
}

/// Plain HTTP retrieval used when the browser path fails
#[async_trait]
pub trait FallbackFetcher: Send + Sync {
    /// Body of a 2xx response; anything else is an error
    async fn fetch(&self, url: &str) -> anyhow::Result<String>;
}

/// What the orchestrator renders pages with
#[async_trait]
pub trait HtmlRenderer: Send + Sync {
    async fn render(&self, url: &str, options: &RenderOptions) -> StillbrookResult<String>;
}

/// Browser-first renderer with fallback fetch
pub struct PageRenderer {
    launcher: Option<Box<dyn BrowserLauncher>>,
    fallback: Box<dyn FallbackFetcher>,
}

impl PageRenderer {
    pub fn new(launcher: impl BrowserLauncher + 'static, fallback: impl FallbackFetcher + 'static) -> Self {
        Self {
            launcher: Some(Box::new(launcher)),
            fallback: Box::new(fallback),
        }
    }

    /// Renderer that never launches a browser
    pub fn fallback_only(fallback: impl FallbackFetcher + 'static) -> Self {
        Self {
            launcher: None,
            fallback: Box::new(fallback),
        }
    }

    async fn render_in_browser(
        &self,
        launcher: &dyn BrowserLauncher,
        url: &str,
        options: &RenderOptions,
    ) -> anyhow::Result<String> {
        let mut session =
            with_page_timeout(launcher.launch(options), options.timeout, "Browser launch").await?;

        let result = drive_session(session.as_mut(), url, options).await;

        if let Err(e) = session.close().await {
            warn!(error = %e, "Browser teardown reported errors");
        }

        result
    }
}

#[async_trait]
impl HtmlRenderer for PageRenderer {
    async fn render(&self, url: &str, options: &RenderOptions) -> StillbrookResult<String> {
        let start = Instant::now();

        if let Some(launcher) = &self.launcher {
            match self.render_in_browser(launcher.as_ref(), url, options).await {
                Ok(html) => {
                    info!(
                        url,
                        bytes = html.len(),
                        elapsed_ms = start.elapsed().as_millis() as u64,
                        "Rendered page in browser"
                    );
                    return Ok(html);
                }
                Err(e) => {
                    warn!(url, error = %e, "Browser rendering failed, falling back to plain fetch");
                }
            }
        }

        match self.fallback.fetch(url).await {
            Ok(html) => {
                info!(url, bytes = html.len(), "Fetched page without browser");
                Ok(html)
            }
            Err(e) => {
                error!(url, error = %e, "Fallback fetch failed");
                Err(StillbrookError::Render(RENDER_FAILED_MESSAGE.to_string()))
            }
        }
    }
}

async fn drive_session(
    session: &mut dyn BrowserSession,
    url: &str,
    options: &RenderOptions,
) -> anyhow::Result<String> {
    with_page_timeout(session.navigate(url), options.timeout, "Navigation").await?;

    wait_for_dynamic_content(session, url, options).await;

    if options.wait_for_images && !options.image_delay.is_zero() {
        tokio::time::sleep(options.image_delay).await;
    }

    if options.scrolls(url) {
        lazy_scroll(session, options).await;
    }

    let html = with_page_timeout(session.content(), options.timeout, "Content extraction").await?;
    log_image_counts(&html);
    Ok(html)
}

/// Selectors to wait for: explicit ones, plus the results container on
/// hosts that inject results client-side
fn wait_list(url: &str, options: &RenderOptions) -> Vec<String> {
    let mut selectors = options.wait_selectors.clone();
    if DYNAMIC_RESULT_HOSTS.iter().any(|h| url.contains(h))
        && !selectors.iter().any(|s| s == PRIMARY_CONTENT_SELECTOR)
    {
        selectors.push(PRIMARY_CONTENT_SELECTOR.to_string());
    }
    selectors
}

/// Poll for each selector until it appears or the shared budget runs out.
/// Expiry only logs.
async fn wait_for_dynamic_content(
    session: &mut dyn BrowserSession,
    url: &str,
    options: &RenderOptions,
) {
    let selectors = wait_list(url, options);
    if selectors.is_empty() {
        return;
    }

    let start = Instant::now();
    for selector in &selectors {
        loop {
            if session.has_selector(selector).await {
                debug!(
                    selector = %selector,
                    elapsed_ms = start.elapsed().as_millis() as u64,
                    "Dynamic content present"
                );
                break;
            }
            if start.elapsed() >= options.dynamic_wait {
                warn!(
                    selector = %selector,
                    waited_ms = options.dynamic_wait.as_millis() as u64,
                    "Timed out waiting for dynamic content, continuing"
                );
                return;
            }
            tokio::time::sleep(options.selector_poll).await;
        }
    }
}

/// Step down the page so lazy images load. Scroll errors end the loop early.
async fn lazy_scroll(session: &mut dyn BrowserSession, options: &RenderOptions) {
    let mut steps = 0;
    while steps < options.max_scroll_iterations {
        steps += 1;
        match session.scroll_by(options.scroll_step_px).await {
            Ok(true) => break,
            Ok(false) => tokio::time::sleep(options.scroll_tick).await,
            Err(e) => {
                warn!(error = %e, "Lazy scroll failed, extracting what has loaded");
                break;
            }
        }
    }
    debug!(steps, "Lazy scroll finished");

    if !options.post_scroll_delay.is_zero() {
        tokio::time::sleep(options.post_scroll_delay).await;
    }
}

static IMG_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("img").expect("IMG_SELECTOR: hardcoded selector is valid")
});

/// (real, inline base64) `<img>` counts
pub fn count_images(html: &str) -> (usize, usize) {
    let document = Html::parse_document(html);
    document
        .select(&IMG_SELECTOR)
        .filter_map(|img| img.value().attr("src"))
        .fold((0, 0), |(real, inline), src| {
            if src.starts_with("data:") {
                (real, inline + 1)
            } else {
                (real + 1, inline)
            }
        })
}

fn log_image_counts(html: &str) {
    let (real, inline) = count_images(html);
    info!(real_images = real, base64_images = inline, "Extracted rendered page");
}
