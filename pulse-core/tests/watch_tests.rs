// Tests for repeated catalog refreshes

use pulse_core::catalog::ChangeKind;
use pulse_core::pipeline::PipelineOptions;
use pulse_core::watch::{CatalogWatcher, PassOutcome};
use pulse_scanner::fetcher::{SitemapFetcher, normalize_base_url};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path},
};

fn sitemap(products: &[(&str, &str)]) -> String {
    let mut xml = String::from("<urlset>\n<url><loc>http://x/</loc></url>\n");
    for (title, loc) in products {
        xml.push_str(&format!(
            "<url><loc>{}</loc><image><title>{}</title></image></url>\n",
            loc, title
        ));
    }
    xml.push_str("</urlset>");
    xml
}

async fn serve(server: &MockServer, status: u16, body: String) {
    server.reset().await;
    Mock::given(method("GET"))
        .and(path("/sitemap_products_1.xml"))
        .respond_with(ResponseTemplate::new(status).set_body_string(body))
        .mount(server)
        .await;
}

async fn start_watcher(server: &MockServer) -> CatalogWatcher {
    let options = PipelineOptions::new(normalize_base_url(&server.uri()).unwrap());
    CatalogWatcher::start(SitemapFetcher::new().unwrap(), options)
        .await
        .unwrap()
}

#[tokio::test]
async fn test_refresh_reports_changes() {
    let server = MockServer::start().await;
    serve(
        &server,
        200,
        sitemap(&[("Cap", "http://x/cap"), ("Tee", "http://x/tee")]),
    )
    .await;
    let mut watcher = start_watcher(&server).await;
    assert_eq!(watcher.catalog().len(), 2);

    serve(
        &server,
        200,
        sitemap(&[("Tee", "http://x/tee-v2"), ("Hat", "http://x/hat")]),
    )
    .await;

    let PassOutcome::Refreshed { changes } = watcher.refresh().await else {
        panic!("expected a refreshed catalog");
    };

    let summary: Vec<(ChangeKind, &str)> = changes
        .iter()
        .map(|c| (c.kind, c.name.as_str()))
        .collect();
    assert_eq!(
        summary,
        vec![
            (ChangeKind::Removed, "Cap"),
            (ChangeKind::Added, "Hat"),
            (ChangeKind::Updated, "Tee"),
        ]
    );
    assert_eq!(watcher.catalog().get("Hat"), Some("http://x/hat"));
    assert_eq!(watcher.passes(), 1);
}

#[tokio::test]
async fn test_unchanged_sitemap_has_no_changes() {
    let server = MockServer::start().await;
    serve(&server, 200, sitemap(&[("Cap", "http://x/cap")])).await;
    let mut watcher = start_watcher(&server).await;

    match watcher.refresh().await {
        PassOutcome::Refreshed { changes } => assert!(changes.is_empty()),
        PassOutcome::Stale { error } => panic!("unexpected failure: {}", error),
    }
}

#[tokio::test]
async fn test_failed_refresh_keeps_stale_catalog() {
    let server = MockServer::start().await;
    serve(&server, 200, sitemap(&[("Cap", "http://x/cap")])).await;
    let mut watcher = start_watcher(&server).await;

    serve(&server, 503, String::new()).await;

    assert!(matches!(watcher.refresh().await, PassOutcome::Stale { .. }));
    assert_eq!(watcher.catalog().get("Cap"), Some("http://x/cap"));
    assert_eq!(watcher.passes(), 1);
}

#[tokio::test]
async fn test_initial_failure_is_an_error() {
    let server = MockServer::start().await;
    serve(&server, 500, String::new()).await;

    let options = PipelineOptions::new(normalize_base_url(&server.uri()).unwrap());
    let result = CatalogWatcher::start(SitemapFetcher::new().unwrap(), options).await;

    assert!(result.is_err());
}
