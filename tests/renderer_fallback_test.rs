mod common;

use std::sync::Arc;
use std::sync::atomic::Ordering;

use stillbrook::error::StillbrookError;
use stillbrook::renderer::{HtmlRenderer, PageRenderer, RENDER_FAILED_MESSAGE};

use common::{FakeFetcher, FakeLauncher, SessionFailure, fast_options};

const SNAPSHOT_URL: &str = "https://serpapi.com/searches/abc123/abc123.html";

#[tokio::test]
async fn browser_html_is_returned_and_session_closed() {
    let launcher = FakeLauncher::serving("<html><body>rendered</body></html>");
    let stats = Arc::clone(&launcher.stats);
    let fetcher = FakeFetcher::returning("fallback");
    let urls = Arc::clone(&fetcher.urls);

    let html = PageRenderer::new(launcher, fetcher)
        .render(SNAPSHOT_URL, &fast_options())
        .await
        .unwrap();

    assert_eq!(html, "<html><body>rendered</body></html>");
    assert_eq!(stats.closes.load(Ordering::SeqCst), 1);
    assert_eq!(*stats.navigated.lock().unwrap(), vec![SNAPSHOT_URL.to_string()]);
    assert!(urls.lock().unwrap().is_empty());
}

#[tokio::test]
async fn each_browser_failure_falls_back_with_the_same_url() {
    for failure in [
        SessionFailure::Launch,
        SessionFailure::Navigate,
        SessionFailure::Content,
        SessionFailure::HangNavigate,
    ] {
        let launcher = FakeLauncher::failing(failure);
        let stats = Arc::clone(&launcher.stats);
        let fetcher = FakeFetcher::returning("<html>plain</html>");
        let urls = Arc::clone(&fetcher.urls);

        let html = PageRenderer::new(launcher, fetcher)
            .render(SNAPSHOT_URL, &fast_options())
            .await
            .unwrap();

        assert_eq!(html, "<html>plain</html>", "{failure:?}");
        assert_eq!(*urls.lock().unwrap(), vec![SNAPSHOT_URL.to_string()], "{failure:?}");

        let expected_closes = usize::from(failure != SessionFailure::Launch);
        assert_eq!(stats.closes.load(Ordering::SeqCst), expected_closes, "{failure:?}");
    }
}

#[tokio::test]
async fn teardown_error_keeps_the_browser_html() {
    let mut launcher = FakeLauncher::failing(SessionFailure::Close);
    launcher.html = "<html><body>rendered</body></html>".into();
    let stats = Arc::clone(&launcher.stats);
    let fetcher = FakeFetcher::returning("fallback");
    let urls = Arc::clone(&fetcher.urls);

    let html = PageRenderer::new(launcher, fetcher)
        .render(SNAPSHOT_URL, &fast_options())
        .await
        .unwrap();

    assert_eq!(html, "<html><body>rendered</body></html>");
    assert_eq!(stats.closes.load(Ordering::SeqCst), 1);
    assert!(urls.lock().unwrap().is_empty());
}

#[tokio::test]
async fn teardown_error_after_content_failure_still_falls_back() {
    let launcher = FakeLauncher::failing(SessionFailure::Content).failing_close();
    let stats = Arc::clone(&launcher.stats);
    let fetcher = FakeFetcher::returning("<html>plain</html>");
    let urls = Arc::clone(&fetcher.urls);

    let html = PageRenderer::new(launcher, fetcher)
        .render(SNAPSHOT_URL, &fast_options())
        .await
        .unwrap();

    assert_eq!(html, "<html>plain</html>");
    assert_eq!(stats.closes.load(Ordering::SeqCst), 1);
    assert_eq!(*urls.lock().unwrap(), vec![SNAPSHOT_URL.to_string()]);
}

#[tokio::test]
async fn both_paths_failing_yields_single_render_error() {
    let renderer = PageRenderer::new(
        FakeLauncher::failing(SessionFailure::Navigate),
        FakeFetcher::failing(),
    );

    let err = renderer
        .render(SNAPSHOT_URL, &fast_options())
        .await
        .unwrap_err();

    assert!(matches!(err, StillbrookError::Render(_)));
    assert_eq!(err.to_string(), RENDER_FAILED_MESSAGE);
}

#[tokio::test]
async fn fallback_only_renderer_never_launches() {
    let fetcher = FakeFetcher::returning("<html>plain</html>");
    let urls = Arc::clone(&fetcher.urls);

    let html = PageRenderer::fallback_only(fetcher)
        .render(SNAPSHOT_URL, &fast_options())
        .await
        .unwrap();

    assert_eq!(html, "<html>plain</html>");
    assert_eq!(urls.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn missing_dynamic_content_is_not_an_error() {
    let launcher = FakeLauncher::serving("<html>partial</html>").without_selector();
    let stats = Arc::clone(&launcher.stats);
    let fetcher = FakeFetcher::failing();

    let html = PageRenderer::new(launcher, fetcher)
        .render("https://www.google.com/search?q=techcorp", &fast_options())
        .await
        .unwrap();

    assert_eq!(html, "<html>partial</html>");
    assert!(stats.selector_checks.load(Ordering::SeqCst) >= 1);
}

#[tokio::test]
async fn image_search_urls_scroll_until_bottom() {
    let launcher = FakeLauncher::serving("<html><img src=\"a.jpg\"></html>");
    let stats = Arc::clone(&launcher.stats);

    PageRenderer::new(launcher, FakeFetcher::failing())
        .render("https://www.google.com/search?q=widget&tbm=isch", &fast_options())
        .await
        .unwrap();

    assert_eq!(stats.scrolls.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn scroll_loop_respects_iteration_cap() {
    let mut launcher = FakeLauncher::serving("<html></html>");
    launcher.page_height_steps = 1_000;
    let stats = Arc::clone(&launcher.stats);
    let options = fast_options().with_lazy_scroll(true);

    PageRenderer::new(launcher, FakeFetcher::failing())
        .render(SNAPSHOT_URL, &options)
        .await
        .unwrap();

    assert_eq!(
        stats.scrolls.load(Ordering::SeqCst),
        options.max_scroll_iterations as usize
    );
}
