//! Pipeline tests through the library API.

use std::io::Write;
use std::sync::Arc;

use pagegen_cli::cache::NoopPageCache;
use pagegen_cli::catalog::{self, MemoryCatalog};
use pagegen_cli::config::SiteConfig;
use pagegen_cli::content::SectionKind;
use pagegen_cli::keyword::Keyword;
use pagegen_cli::materializer::Materializer;
use pagegen_cli::service::PageService;
use pagegen_cli::test_utils::{CountingCatalog, fixture_catalog, init_test_logging};

use crate::common::SAMPLE_CATALOG;

async fn load_sample_catalog() -> MemoryCatalog {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(SAMPLE_CATALOG.as_bytes()).unwrap();
    catalog::load_catalog(file.path()).await.unwrap()
}

fn service_over(catalog: MemoryCatalog) -> PageService<MemoryCatalog, NoopPageCache> {
    PageService::new(Arc::new(catalog), Arc::new(NoopPageCache), SiteConfig::default())
        .unwrap()
}

#[tokio::test]
async fn served_page_carries_override_emphasis_and_schema() {
    init_test_logging(None);
    let service = service_over(load_sample_catalog().await);

    let page =
        service.get("lg", "washing-machine", "maintenance").await.unwrap().unwrap();

    // The catalog override replaced the intro, and the emphasis pass still
    // ran over the manual text.
    let intro = page
        .content
        .body_sections
        .iter()
        .find(|s| s.kind == SectionKind::Intro)
        .unwrap();
    assert!(intro.body.contains("نص مخصص"));
    assert!(intro.body.contains("<mark"));

    // The catalog rating, not the placeholder, reached the schema record.
    let product_schema = &page.content.schema_objects[1];
    assert_eq!(product_schema["aggregateRating"]["ratingValue"], 4.8);
    assert_eq!(page.seo.stars, 5);

    assert_eq!(page.content.body_sections.len(), 8);
    assert!(page.seo.canonical_url.ends_with("/lg/washing-machine/maintenance"));
}

#[tokio::test]
async fn navigation_crosses_product_boundaries_in_served_pages() {
    let service = service_over(load_sample_catalog().await);

    // LG's products sort as refrigerator, washing-machine; agency is the
    // first keyword, so prev crosses into refrigerator's last keyword.
    let page = service.get("lg", "washing-machine", "agency").await.unwrap().unwrap();
    assert_eq!(page.neighbors.prev.unwrap().path(), "/lg/refrigerator/warranty");

    // Tornado reaches only the kitchen family, so its single product has no
    // neighbor products at all.
    let page = service.get("tornado", "refrigerator", "agency").await.unwrap().unwrap();
    assert!(page.neighbors.prev.is_none());
}

#[tokio::test]
async fn unreachable_pair_serves_none_through_the_whole_stack() {
    let service = service_over(load_sample_catalog().await);
    // Both slugs exist; the relation does not.
    assert!(service.get("tornado", "washing-machine", "agency").await.unwrap().is_none());
}

#[tokio::test]
async fn concurrent_requests_materialize_once() {
    let store = Arc::new(CountingCatalog::new(fixture_catalog()));
    let service = Arc::new(
        PageService::new(Arc::clone(&store), Arc::new(NoopPageCache), SiteConfig::default())
            .unwrap(),
    );

    let tasks: Vec<_> = (0..32)
        .map(|_| {
            let service = Arc::clone(&service);
            tokio::spawn(async move {
                service.get("lg", "dryer", "warranty").await.unwrap().unwrap()
            })
        })
        .collect();

    let mut pages = Vec::new();
    for task in tasks {
        pages.push(task.await.unwrap());
    }

    assert_eq!(store.page_count(), 1);
    // One row and one persistence attempt: the requests collapsed into a
    // single synthesis rather than racing redundant ones to the insert.
    assert_eq!(store.insert_attempts(), 1);
    let first = &pages[0];
    assert!(pages.iter().all(|p| p.content.generated_at == first.content.generated_at));
}

#[tokio::test]
async fn interrupted_batch_resumes_to_completion() {
    let materializer = Materializer::new(
        Arc::new(fixture_catalog()),
        Arc::new(NoopPageCache),
        SiteConfig::default(),
    )
    .unwrap();

    let extent = materializer.batch_extent(None).await.unwrap() as usize;
    assert_eq!(extent, 36);

    let first = materializer.generate_batch(None, 10, None).await.unwrap();
    assert_eq!(first.generated(), 10);
    assert!(first.limit_reached);

    let second = materializer.generate_batch(None, usize::MAX, None).await.unwrap();
    assert_eq!(second.generated(), extent - 10);
    assert!(!second.limit_reached);
    assert_eq!(materializer.store().page_count(), extent);
}

#[tokio::test]
async fn refresh_regenerates_with_current_catalog_state() {
    let service = service_over(load_sample_catalog().await);

    let first = service.get("lg", "refrigerator", "hotline").await.unwrap().unwrap();
    tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    let refreshed = service.refresh("lg", "refrigerator", "hotline").await.unwrap();

    assert!(refreshed.content.generated_at > first.content.generated_at);
    assert_eq!(service.materializer().store().page_count(), 1);
}

#[tokio::test]
async fn revalidate_window_follows_the_site_config() {
    let service = service_over(fixture_catalog());
    assert_eq!(service.revalidate_window().as_secs(), 3600);
}

#[tokio::test]
async fn rendered_page_serializes_for_the_rendering_layer() {
    let service = service_over(load_sample_catalog().await);
    let page = service.get("lg", "washing-machine", "warranty").await.unwrap().unwrap();

    let json = serde_json::to_value(&page).unwrap();
    assert_eq!(json["identity"]["keyword"], "warranty");
    assert_eq!(json["content"]["body_sections"].as_array().unwrap().len(), 8);
    assert_eq!(json["seo"]["open_graph"]["locale"], "ar_EG");
    // Keyword also round-trips in its kebab-case slug form.
    assert_eq!(
        serde_json::from_value::<Keyword>(json["identity"]["keyword"].clone()).unwrap(),
        Keyword::Warranty
    );
}
