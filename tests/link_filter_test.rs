//! Link extraction and include/exclude eligibility

use kbcrawl::crawl_engine::{UrlFilter, extract_links, is_eligible};
use url::Url;

const NONE: &[&str] = &[];

#[test]
fn exclude_wins_over_include() {
    assert!(!is_eligible(
        "https://example.com/login/page",
        &["login"],
        &["/login/"]
    ));
    assert!(!is_eligible("https://example.com/LOGIN", &["login"], NONE));
}

#[test]
fn include_list_admits_only_matches() {
    assert!(is_eligible("https://example.com/blog/post", NONE, &["/blog/"]));
    assert!(!is_eligible("https://example.com/about", NONE, &["/blog/"]));
}

#[test]
fn empty_rules_admit_everything() {
    assert!(is_eligible("https://example.com/anything", NONE, NONE));
}

#[test]
fn regex_rules_apply() {
    let filter = UrlFilter::new(&[r"/tag/\d+$"], &[r"^https://example\.com/(docs|blog)/"]);
    assert!(filter.is_eligible("https://example.com/docs/start"));
    assert!(!filter.is_eligible("https://example.com/blog/tag/42"));
    assert!(!filter.is_eligible("https://example.com/shop/item"));
}

#[test]
fn extraction_skips_non_page_targets() {
    let html = r##"
        <a href="/one">one</a>
        <a href="javascript:void(0)">js</a>
        <a href="mailto:hello@example.com">mail</a>
        <a href="tel:+15551234">call</a>
        <a href="data:text/plain,hi">data</a>
        <a href="#section">fragment</a>
        <a href="">empty</a>
        <a>no href</a>
        <a href="/two/#frag">two</a>
    "##;
    let base = Url::parse("https://example.com/start").unwrap();
    assert_eq!(
        extract_links(html, &base, false),
        ["https://example.com/one", "https://example.com/two"]
    );
}

#[test]
fn extraction_is_ordered_and_deduplicated() {
    let html = r#"<a href="/b">b</a><a href="/a">a</a><a href="/b/">b again</a><a href="/a#x">a again</a>"#;
    let base = Url::parse("https://example.com").unwrap();
    assert_eq!(
        extract_links(html, &base, true),
        ["https://example.com/b", "https://example.com/a"]
    );
}

#[test]
fn same_domain_only_drops_other_hosts() {
    let html = r#"
        <a href="https://other.com/x">other</a>
        <a href="https://sub.example.com/y">subdomain</a>
        <a href="https://EXAMPLE.com/z">same host, different case</a>
    "#;
    let base = Url::parse("https://example.com/").unwrap();

    assert_eq!(
        extract_links(html, &base, true),
        ["https://example.com/z"]
    );
    assert_eq!(extract_links(html, &base, false).len(), 3);
}
