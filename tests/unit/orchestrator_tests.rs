// Orchestrator unit tests
// Full pipeline runs against in-memory fakes: no network, no system fonts

use std::sync::Arc;

use carousel::engine::{Color, RasterEngine};
use carousel::source::{FetchStrategy, NullSourceCache, SourceCache};
use carousel::{CarouselError, CarouselParams, Orchestrator};

use super::fakes::*;

fn params(count: u32, height: u32, spacing: u32) -> CarouselParams {
    CarouselParams::new(count, height, spacing, Color::white(), Color::black()).unwrap()
}

fn three_sources() -> CountingLoader {
    CountingLoader::default()
        .serve("https://img/red.png", solid_png(200, 100, RED))
        .serve("https://img/green.png", solid_png(50, 50, GREEN))
        .serve("https://img/blue.png", solid_png(300, 150, BLUE))
}

const THREE: [&str; 3] = [
    "https://img/red.png",
    "https://img/green.png",
    "https://img/blue.png",
];

#[tokio::test]
async fn test_three_sources_two_slots_appends_plus_one() {
    let harness = Harness::new(three_sources());

    let carousel = harness
        .orchestrator
        .compose(&payload(&THREE), &params(2, 100, 10))
        .await
        .unwrap();

    // tiles 200 + 100 + 200, three gaps of 10, counter 50 wide
    assert_eq!(carousel.size(), (200 + 10 + 100 + 10 + 200 + 10 + 50, 100));
    assert_eq!(carousel.tiles, 3);
    assert_eq!(carousel.overflow, Some(1));
    assert_eq!(harness.renderer.calls(), vec![(100, "+1".to_string())]);

    let pixels = carousel.image.to_rgba8();
    assert!(close_to(*pixels.get_pixel(100, 50), RED));
    assert!(close_to(*pixels.get_pixel(205, 50), Color::white()));
    assert!(close_to(*pixels.get_pixel(260, 50), GREEN));
    assert!(close_to(*pixels.get_pixel(420, 50), BLUE));
    assert!(close_to(*pixels.get_pixel(525, 50), Color::white()));
    assert!(close_to(*pixels.get_pixel(555, 50), Color::black()));
}

#[tokio::test]
async fn test_visible_only_draws_requested_slots() {
    let harness = Harness::new(three_sources());

    let carousel = harness
        .orchestrator
        .compose(&payload(&THREE), &params(2, 100, 10).with_visible_only(true))
        .await
        .unwrap();

    assert_eq!(carousel.size(), (200 + 10 + 100 + 10 + 50, 100));
    assert_eq!(carousel.tiles, 2);
    assert_eq!(carousel.overflow, Some(1));

    let pixels = carousel.image.to_rgba8();
    assert!(close_to(*pixels.get_pixel(260, 50), GREEN));
    assert!(close_to(*pixels.get_pixel(330, 50), Color::black()));
}

#[tokio::test]
async fn test_no_counter_when_count_covers_sources() {
    for count in [3, 10] {
        let harness = Harness::new(three_sources());
        let carousel = harness
            .orchestrator
            .compose(&payload(&THREE), &params(count, 100, 10))
            .await
            .unwrap();

        assert_eq!(carousel.size(), (200 + 10 + 100 + 10 + 200, 100));
        assert_eq!(carousel.overflow, None);
        assert!(harness.renderer.calls().is_empty());
    }
}

#[tokio::test]
async fn test_tiles_follow_input_order() {
    let harness = Harness::new(three_sources());
    let reordered = [THREE[2], THREE[0], THREE[1]];

    let carousel = harness
        .orchestrator
        .compose(&payload(&reordered), &params(3, 100, 10))
        .await
        .unwrap();

    let pixels = carousel.image.to_rgba8();
    assert!(close_to(*pixels.get_pixel(100, 50), BLUE));
    assert!(close_to(*pixels.get_pixel(310, 50), RED));
    assert!(close_to(*pixels.get_pixel(470, 50), GREEN));
    assert_eq!(harness.loader.calls(), reordered);
}

#[tokio::test]
async fn test_empty_payload_is_no_images() {
    let harness = Harness::new(three_sources());

    let err = harness
        .orchestrator
        .compose("", &CarouselParams::default())
        .await
        .unwrap_err();

    assert!(matches!(err, CarouselError::NoImages));
    assert_eq!(err.status_code(), 400);
    assert!(harness.loader.calls().is_empty());
}

#[tokio::test]
async fn test_rejected_source_is_never_fetched() {
    let harness = Harness::new(three_sources()).with_validator(RejectingValidator(vec!["green"]));

    let err = harness
        .orchestrator
        .compose(&payload(&[THREE[1]]), &CarouselParams::default())
        .await
        .unwrap_err();

    assert!(matches!(err, CarouselError::ForbiddenSource { .. }));
    assert_eq!(err.status_code(), 400);
    assert!(harness.loader.calls().is_empty());
    assert_eq!(harness.cache.gets(), 0);
}

#[tokio::test]
async fn test_failed_load_aborts_whole_request() {
    let loader = three_sources().fail("https://img/broken.png", "HTTP 500", 500);
    let harness = Harness::new(loader);
    let urls = [THREE[0], "https://img/broken.png", THREE[2]];

    let err = harness
        .orchestrator
        .compose(&payload(&urls), &params(3, 100, 10))
        .await
        .unwrap_err();

    match &err {
        CarouselError::SourceLoad { url, error, metadata } => {
            assert_eq!(url, "https://img/broken.png");
            assert_eq!(error, "HTTP 500");
            assert_eq!(metadata.get("status").map(String::as_str), Some("500"));
        }
        other => panic!("expected SourceLoad, got {other:?}"),
    }
    assert!(err.to_string().contains("HTTP 500"));
    assert_eq!(err.status_code(), 400);
    // the source before the failure was still cached
    assert_eq!(harness.cache.puts(), 1);
    assert!(!harness.loader.calls().contains(&THREE[2].to_string()));
}

#[tokio::test]
async fn test_repeated_url_is_fetched_once() {
    let harness = Harness::new(three_sources());
    let url = [THREE[0]];

    for _ in 0..2 {
        harness
            .orchestrator
            .compose(&payload(&url), &CarouselParams::default())
            .await
            .unwrap();
    }

    assert_eq!(harness.loader.calls(), vec![THREE[0]]);
    assert_eq!(harness.cache.gets(), 2);
    assert_eq!(harness.cache.puts(), 1);
    assert_eq!(harness.cache.marks(), 1);
}

#[tokio::test]
async fn test_oversized_source_is_not_cached() {
    let url = "https://img/huge.png";
    let loader = CountingLoader::default().serve(url, solid_png(40, 40, RED));
    let harness = Harness::new(loader).with_max_source_bytes(16);

    for _ in 0..2 {
        let err = harness
            .orchestrator
            .compose(&payload(&[url]), &CarouselParams::default())
            .await
            .unwrap_err();
        assert!(matches!(err, CarouselError::SourceTooLarge { max_size: 16, .. }));
    }

    assert_eq!(harness.cache.puts(), 0);
    assert_eq!(harness.cache.marks(), 0);
    assert!(harness.cache.get(url).await.unwrap().is_none());
    assert!(!harness.cache.is_fetched(url).await.unwrap());
    assert_eq!(harness.loader.calls(), vec![url, url]);
}

#[tokio::test]
async fn test_undecodable_source_fails() {
    let loader = CountingLoader::default().serve("https://img/text.png", "hello".into());
    let harness = Harness::new(loader);

    let err = harness
        .orchestrator
        .compose(&payload(&["https://img/text.png"]), &CarouselParams::default())
        .await
        .unwrap_err();

    assert!(matches!(err, CarouselError::Decode { ref url, .. } if url == "https://img/text.png"));
}

#[tokio::test]
async fn test_broken_cache_still_composes() {
    let loader = Arc::new(three_sources());
    let orchestrator = Orchestrator::new(
        Arc::new(BrokenCache),
        loader.clone(),
        Arc::new(RasterEngine::default()),
        Arc::new(BlockRenderer::default()),
    );

    let carousel = orchestrator
        .compose(&payload(&[THREE[0]]), &params(1, 50, 5))
        .await
        .unwrap();
    assert_eq!(carousel.size(), (100, 50));
    assert_eq!(loader.calls().len(), 1);
}

#[tokio::test]
async fn test_concurrent_strategy_matches_sequential() {
    let sequential = Harness::new(three_sources());
    let concurrent = Orchestrator::new(
        Arc::new(NullSourceCache),
        Arc::new(three_sources()),
        Arc::new(RasterEngine::default()),
        Arc::new(BlockRenderer::default()),
    )
    .with_strategy(FetchStrategy::Concurrent { limit: 3 });

    let p = params(1, 60, 4);
    let a = sequential.orchestrator.compose(&payload(&THREE), &p).await.unwrap();
    let b = concurrent.compose(&payload(&THREE), &p).await.unwrap();

    assert_eq!(a.size(), b.size());
    assert_eq!(a.image.to_rgba8().as_raw(), b.image.to_rgba8().as_raw());
}

#[tokio::test]
async fn test_compose_urls_skips_base64() {
    let harness = Harness::new(three_sources());
    let urls: Vec<String> = THREE.iter().map(|s| s.to_string()).collect();

    let carousel = harness
        .orchestrator
        .compose_urls(&urls, &params(1, 100, 10))
        .await
        .unwrap();
    assert_eq!(carousel.overflow, Some(2));
    assert_eq!(harness.renderer.calls(), vec![(100, "+2".to_string())]);
}

#[tokio::test]
async fn test_output_encodes_to_jpeg() {
    let harness = Harness::new(three_sources());
    let carousel = harness
        .orchestrator
        .compose(&payload(&THREE), &params(2, 40, 2))
        .await
        .unwrap();

    let encoded = carousel.encode(85).unwrap();
    assert_eq!(encoded.content_type, "image/jpeg");
    assert_eq!((encoded.width, encoded.height), carousel.size());
    assert_eq!(
        image::guess_format(&encoded.data).unwrap(),
        image::ImageFormat::Jpeg
    );
}
