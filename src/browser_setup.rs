//! Chromium discovery and launch for the page renderer

use anyhow::{Context, Result, anyhow};
use chromiumoxide::browser::{Browser, BrowserConfigBuilder, HeadlessMode};
use chromiumoxide::fetcher::{BrowserFetcher, BrowserFetcherOptions};
use futures::StreamExt;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::Duration;
use tokio::task::{self, JoinHandle};
use tracing::{debug, error, info, trace, warn};

/// Settings for one Chromium process
#[derive(Debug, Clone)]
pub struct LaunchSettings {
    pub headless: bool,
    /// Explicit executable; skips discovery when it exists
    pub chrome_path: Option<PathBuf>,
    pub user_agent: String,
    pub window_width: u32,
    pub window_height: u32,
    pub request_timeout: Duration,
}

#[cfg(target_os = "windows")]
const KNOWN_LOCATIONS: &[&str] = &[
    r"C:\Program Files\Google\Chrome\Application\chrome.exe",
    r"C:\Program Files (x86)\Google\Chrome\Application\chrome.exe",
    r"%LOCALAPPDATA%\Google\Chrome\Application\chrome.exe",
    r"C:\Program Files\Chromium\Application\chrome.exe",
];

#[cfg(target_os = "macos")]
const KNOWN_LOCATIONS: &[&str] = &[
    "/Applications/Google Chrome.app/Contents/MacOS/Google Chrome",
    "/Applications/Chromium.app/Contents/MacOS/Chromium",
    "~/Applications/Google Chrome.app/Contents/MacOS/Google Chrome",
    "~/Applications/Chromium.app/Contents/MacOS/Chromium",
    "/opt/homebrew/bin/chromium",
];

#[cfg(not(any(target_os = "windows", target_os = "macos")))]
const KNOWN_LOCATIONS: &[&str] = &[
    "/usr/bin/chromium",
    "/usr/bin/chromium-browser",
    "/usr/bin/google-chrome",
    "/usr/bin/google-chrome-stable",
    "/snap/bin/chromium",
    "/usr/local/bin/chromium",
];

const PATH_COMMANDS: &[&str] = &["chromium", "chromium-browser", "google-chrome", "chrome"];

/// Flags for a quiet, automation-friendly headless page load
const LAUNCH_ARGS: &[&str] = &[
    "--disable-blink-features=AutomationControlled",
    "--disable-infobars",
    "--disable-notifications",
    "--disable-extensions",
    "--disable-popup-blocking",
    "--disable-background-networking",
    "--disable-background-timer-throttling",
    "--disable-backgrounding-occluded-windows",
    "--disable-features=TranslateUI",
    "--disable-setuid-sandbox",
    "--no-sandbox",
    "--no-first-run",
    "--no-default-browser-check",
    "--password-store=basic",
    "--use-mock-keychain",
    "--hide-scrollbars",
    "--mute-audio",
];

/// Masks `navigator.webdriver` and fills the fields pages check alongside it
const STEALTH_SCRIPT: &str = r"
    Object.defineProperty(navigator, 'webdriver', { get: () => false });
    Object.defineProperty(navigator, 'languages', { get: () => ['en-US', 'en'] });
    window.chrome = window.chrome || {};
    window.chrome.runtime = window.chrome.runtime || {};
";

/// Resolve `~/` and `%VAR%` in a known location
fn resolve_location(raw: &str) -> Option<PathBuf> {
    if let Some(rest) = raw.strip_prefix("~/") {
        return dirs::home_dir().map(|home| home.join(rest));
    }
    if raw.contains('%') {
        return Some(PathBuf::from(expand_windows_env_vars(raw)));
    }
    Some(PathBuf::from(raw))
}

fn which(command: &str) -> Option<PathBuf> {
    let output = Command::new("which").arg(command).output().ok()?;
    if !output.status.success() {
        return None;
    }
    let found = String::from_utf8_lossy(&output.stdout).trim().to_string();
    (!found.is_empty()).then(|| PathBuf::from(found))
}

/// Locate a Chrome/Chromium executable: `preferred`, then well-known
/// install locations, then `which` on non-Windows hosts
pub async fn find_browser_executable(preferred: Option<&Path>) -> Result<PathBuf> {
    if let Some(path) = preferred {
        if path.exists() {
            info!(path = %path.display(), "Using configured browser");
            return Ok(path.to_path_buf());
        }
        warn!(path = %path.display(), "Configured browser path does not exist");
    }

    if let Some(path) = KNOWN_LOCATIONS
        .iter()
        .filter_map(|raw| resolve_location(raw))
        .find(|p| p.exists())
    {
        info!(path = %path.display(), "Found browser");
        return Ok(path);
    }

    if !cfg!(target_os = "windows")
        && let Some(path) = PATH_COMMANDS.iter().find_map(|cmd| which(cmd))
    {
        info!(path = %path.display(), "Found browser on PATH");
        return Ok(path);
    }

    Err(anyhow!("Chrome/Chromium executable not found"))
}

/// Expand `%VAR%` tokens; unknown variables are left as written.
fn expand_windows_env_vars(path: &str) -> String {
    let mut result = String::with_capacity(path.len());
    let mut chars = path.chars();

    while let Some(ch) = chars.next() {
        if ch != '%' {
            result.push(ch);
            continue;
        }

        let mut var_name = String::new();
        let mut closed = false;
        for c in chars.by_ref() {
            if c == '%' {
                closed = true;
                break;
            }
            var_name.push(c);
        }

        match (closed, var_name.is_empty()) {
            (true, true) => result.push('%'),
            (true, false) => match std::env::var(&var_name) {
                Ok(value) => result.push_str(&value),
                Err(_) => {
                    result.push('%');
                    result.push_str(&var_name);
                    result.push('%');
                }
            },
            (false, _) => {
                result.push('%');
                result.push_str(&var_name);
            }
        }
    }

    result
}

/// Download Chromium into `<cache>/stillbrook/chromium` and return its executable
pub async fn download_managed_browser() -> Result<PathBuf> {
    let cache_dir = dirs::cache_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join("stillbrook")
        .join("chromium");
    info!(dir = %cache_dir.display(), "Downloading managed Chromium");

    std::fs::create_dir_all(&cache_dir).context("Failed to create browser cache directory")?;

    let options = BrowserFetcherOptions::builder()
        .with_path(&cache_dir)
        .build()
        .context("Failed to build fetcher options")?;
    let revision = BrowserFetcher::new(options)
        .fetch()
        .await
        .context("Failed to download Chromium")?;

    info!(path = %revision.executable_path.display(), "Managed Chromium ready");
    Ok(revision.executable_path)
}

/// CDP events chromiumoxide cannot decode; they carry no signal for us
fn is_benign_handler_error(message: &str) -> bool {
    message.contains("data did not match any variant of untagged enum Message")
        || message.contains("Failed to deserialize WS response")
}

/// Launch Chromium with a fresh profile directory.
///
/// Returns the browser, its tracked handler task and the profile dir. The
/// caller owns all three: abort the handler and remove the dir once the
/// browser has exited.
pub async fn launch_browser(settings: &LaunchSettings) -> Result<(Browser, JoinHandle<()>, PathBuf)> {
    let executable = match find_browser_executable(settings.chrome_path.as_deref()).await {
        Ok(path) => path,
        Err(e) => {
            warn!(error = %e, "No local browser, falling back to managed download");
            download_managed_browser().await?
        }
    };

    let user_data_dir = std::env::temp_dir().join(format!(
        "stillbrook_chrome_{}_{}",
        std::process::id(),
        uuid::Uuid::new_v4().simple()
    ));
    std::fs::create_dir_all(&user_data_dir).context("Failed to create browser profile directory")?;

    let mut builder = BrowserConfigBuilder::default()
        .request_timeout(settings.request_timeout)
        .window_size(settings.window_width, settings.window_height)
        .user_data_dir(user_data_dir.clone())
        .chrome_executable(executable)
        .arg(format!("--user-agent={}", settings.user_agent));
    builder = if settings.headless {
        builder.headless_mode(HeadlessMode::default())
    } else {
        builder.with_head()
    };
    for arg in LAUNCH_ARGS {
        builder = builder.arg(*arg);
    }

    let launched = match builder.build() {
        Ok(config) => Browser::launch(config)
            .await
            .map_err(|e| anyhow::Error::new(e).context("Failed to launch browser")),
        Err(e) => Err(anyhow!("Failed to build browser config: {e}")),
    };
    let (browser, mut handler) = match launched {
        Ok(pair) => pair,
        Err(e) => {
            remove_profile_dir(&user_data_dir);
            return Err(e);
        }
    };
    debug!(profile = %user_data_dir.display(), "Browser launched");

    let handler_task = task::spawn(async move {
        while let Some(event) = handler.next().await {
            match event {
                Err(e) if is_benign_handler_error(&e.to_string()) => {
                    trace!(error = %e, "Suppressed CDP decode error");
                }
                Err(e) => error!(error = ?e, "Browser handler error"),
                Ok(()) => {}
            }
        }
        debug!("Browser handler task completed");
    });

    Ok((browser, handler_task, user_data_dir))
}

/// Best-effort removal of a browser profile directory
pub fn remove_profile_dir(path: &Path) {
    if let Err(e) = std::fs::remove_dir_all(path) {
        warn!(path = %path.display(), error = %e, "Failed to remove browser profile directory");
    }
}

/// Hide the most obvious automation markers before navigation
pub async fn apply_stealth_measures(page: &chromiumoxide::Page) -> Result<()> {
    page.evaluate(STEALTH_SCRIPT)
        .await
        .context("Failed to apply stealth script")?;
    trace!("Applied stealth measures");
    Ok(())
}
