//! Standalone scrape, link discovery and service-level errors

mod common;

use common::{ScriptedClassifier, ScriptedFetcher, create_test_html, linking_page, service_with};
use kbcrawl::fetch::FetchError;
use kbcrawl::service::{CrawlRequest, HINT_TAG_CATEGORY, ScrapeRequest, ServiceError};

fn article(paragraphs: usize) -> String {
    let body: String = (0..paragraphs)
        .map(|i| {
            format!(
                "<h2>Section number {i}</h2><p>{}</p>",
                format!("paragraph {i} talks about coping strategies ").repeat(10)
            )
        })
        .collect();
    create_test_html("Coping Guide", &format!("<main><h1>Coping Guide Overview</h1>{body}</main>"))
}

#[tokio::test]
async fn scrape_returns_markdown_metadata_and_fixed_tag_categories() {
    let html = article(2);
    let fetcher = ScriptedFetcher::new().html("https://example.com/guide", html.clone());
    let service = service_with(fetcher, ScriptedClassifier::new());

    let response = service
        .scrape(ScrapeRequest::new("example.com/guide/"))
        .await
        .unwrap();

    assert_eq!(response.url, "https://example.com/guide");
    assert_eq!(response.title, "Coping Guide");
    assert!(response.markdown.starts_with("# Coping Guide Overview"));
    assert!(response.markdown.contains("## Section number 1"));
    assert_eq!(response.metadata.status_code, 200);
    assert_eq!(response.metadata.raw_html_size, html.len());
    assert_eq!(response.metadata.content_length, response.markdown.chars().count());
    assert!(response.screening.approved);
    assert!(response.chunks.is_empty());

    for category in ["modality", "population", "risk_factors"] {
        assert!(response.suggested_tags.get(category).unwrap().is_empty());
    }
}

#[tokio::test]
async fn scrape_suggests_tags_and_merges_hints() {
    let fetcher = ScriptedFetcher::new().html("https://example.com/guide", article(1));
    let classifier = ScriptedClassifier::new().with_tags("modality", &["CBT"]);
    let service = service_with(fetcher, classifier);

    let response = service
        .scrape(ScrapeRequest {
            tags: vec!["anxiety".into(), "  ".into()],
            suggest_tags: true,
            ..ScrapeRequest::new("https://example.com/guide")
        })
        .await
        .unwrap();

    assert_eq!(response.suggested_tags.get("modality").unwrap(), ["CBT"]);
    assert_eq!(
        response.suggested_tags.get(HINT_TAG_CATEGORY).unwrap(),
        ["anxiety"]
    );
    assert!(response.suggested_tags.get("population").is_some());
}

#[tokio::test]
async fn scrape_chunks_along_headings() {
    let fetcher = ScriptedFetcher::new().html("https://example.com/guide", article(4));
    let service = service_with(fetcher, ScriptedClassifier::new());

    let response = service
        .scrape(ScrapeRequest {
            chunk: true,
            ..ScrapeRequest::new("https://example.com/guide")
        })
        .await
        .unwrap();

    // Each section is 64 words: below the 100-word minimum alone, so pairs merge.
    assert_eq!(response.chunks.len(), 2);
    assert_eq!(response.chunks[0].heading.as_deref(), Some("Coping Guide Overview"));
    assert_eq!(response.chunks[1].heading.as_deref(), Some("Section number 2"));
    assert!(response.chunks.iter().all(|c| c.size_estimate <= 500));
}

#[tokio::test]
async fn oversized_markdown_is_capped() {
    let fetcher = ScriptedFetcher::new().html("https://example.com/long", article(200));
    let service = service_with(fetcher, ScriptedClassifier::new());

    let response = service
        .scrape(ScrapeRequest::new("https://example.com/long"))
        .await
        .unwrap();

    assert_eq!(response.markdown.chars().count(), 20_000);
    assert!(response.metadata.content_length > 20_000);
}

#[tokio::test]
async fn scrape_failures_are_errors() {
    let fetcher = ScriptedFetcher::new()
        .status("https://example.com/gone", 410)
        .with_content_type("https://example.com/file.pdf", "application/pdf", "%PDF");
    let service = service_with(fetcher, ScriptedClassifier::new());

    let gone = service
        .scrape(ScrapeRequest::new("https://example.com/gone"))
        .await
        .unwrap_err();
    assert!(matches!(
        gone,
        ServiceError::Fetch(FetchError::HttpStatus { status: 410, .. })
    ));

    let pdf = service
        .scrape(ScrapeRequest::new("https://example.com/file.pdf"))
        .await
        .unwrap_err();
    assert!(matches!(pdf, ServiceError::NotHtml { .. }));

    let bad = service
        .scrape(ScrapeRequest::new("ftp://example.com/file"))
        .await
        .unwrap_err();
    assert!(matches!(bad, ServiceError::InvalidUrl(_)));
}

#[tokio::test]
async fn discover_links_previews_without_creating_a_job() {
    let fetcher = ScriptedFetcher::new().html(
        "https://example.com",
        linking_page("Home", &["/a", "/b", "/a#again", "https://other.com/c"]),
    );
    let service = service_with(fetcher, ScriptedClassifier::new());

    let same = service.discover_links("https://example.com/", true).await.unwrap();
    assert_eq!(same.url, "https://example.com");
    assert_eq!(same.links, ["https://example.com/a", "https://example.com/b"]);
    assert_eq!(same.total, 2);

    let all = service.discover_links("https://example.com", false).await.unwrap();
    assert_eq!(all.total, 3);
    assert!(service.list_jobs().is_empty());
}

#[tokio::test]
async fn job_queries_map_unknown_ids_to_not_found() {
    let service = service_with(ScriptedFetcher::new(), ScriptedClassifier::new());

    assert!(matches!(
        service.get_job("nope"),
        Err(ServiceError::NotFound(id)) if id == "nope"
    ));
    assert!(matches!(service.stop_job("nope"), Err(ServiceError::NotFound(_))));
    assert!(matches!(service.delete_job("nope"), Err(ServiceError::NotFound(_))));
}

#[tokio::test]
async fn invalid_requests_are_rejected_before_a_job_exists() {
    let service = service_with(ScriptedFetcher::new(), ScriptedClassifier::new());

    let err = service
        .start_crawl(CrawlRequest {
            max_urls: 0,
            ..CrawlRequest::new("https://example.com")
        })
        .unwrap_err();
    assert!(matches!(err, ServiceError::InvalidRequest(_)));
    assert!(service.list_jobs().is_empty());
}

#[tokio::test]
async fn deleted_jobs_disappear_from_listings() {
    let fetcher = ScriptedFetcher::new().html("https://example.com", linking_page("Home", &[]));
    let service = service_with(fetcher, ScriptedClassifier::new());

    let job = service
        .run_crawl(CrawlRequest::new("https://example.com"))
        .await
        .unwrap();
    assert_eq!(service.list_jobs().len(), 1);

    let removed = service.delete_job(&job.id).unwrap();
    assert_eq!(removed.id, job.id);
    assert!(service.list_jobs().is_empty());
    assert_eq!(service.health().status, "ok");
}

#[tokio::test]
async fn retention_sweep_drops_finished_jobs() {
    let fetcher = ScriptedFetcher::new().html("https://example.com", linking_page("Home", &[]));
    let service = service_with(fetcher, ScriptedClassifier::new());

    service
        .run_crawl(CrawlRequest::new("https://example.com"))
        .await
        .unwrap();
    assert_eq!(service.list_jobs().len(), 1);

    let sweeper = service.start_retention_sweep_with(
        std::time::Duration::from_millis(10),
        std::time::Duration::ZERO,
    );
    tokio::time::sleep(std::time::Duration::from_millis(100)).await;
    sweeper.abort();

    assert!(service.list_jobs().is_empty());
}
