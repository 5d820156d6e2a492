// Fake collaborators shared by the pipeline tests

use std::collections::HashMap;
use std::io::Cursor;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use carousel::engine::{Color, RasterEngine};
use carousel::source::{
    encode_url_list, LoadResult, MemorySourceCache, SourceCache, SourceLoader, SourceValidator,
};
use carousel::text::{RenderedText, TextRenderer};
use carousel::{CarouselError, Orchestrator};
use image::{DynamicImage, ImageFormat, Rgb, RgbImage};

pub const RED: Color = Color::new(255, 0, 0);
pub const GREEN: Color = Color::new(0, 255, 0);
pub const BLUE: Color = Color::new(0, 0, 255);

/// Solid `color` PNG of the given size.
pub fn solid_png(width: u32, height: u32, color: Color) -> Bytes {
    let image = RgbImage::from_pixel(width, height, Rgb([color.r, color.g, color.b]));
    let mut out = Cursor::new(Vec::new());
    DynamicImage::ImageRgb8(image)
        .write_to(&mut out, ImageFormat::Png)
        .unwrap();
    Bytes::from(out.into_inner())
}

pub fn payload(urls: &[&str]) -> String {
    encode_url_list(urls)
}

/// Loader serving fixed results and recording every call.
#[derive(Default)]
pub struct CountingLoader {
    sources: HashMap<String, LoadResult>,
    calls: Mutex<Vec<String>>,
}

impl CountingLoader {
    pub fn serve(mut self, url: &str, bytes: Bytes) -> Self {
        self.sources.insert(url.to_string(), LoadResult::ok(bytes));
        self
    }

    pub fn fail(mut self, url: &str, error: &str, status: u16) -> Self {
        self.sources.insert(
            url.to_string(),
            LoadResult::failed(error).with_metadata("status", status),
        );
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl SourceLoader for CountingLoader {
    async fn load(&self, url: &str) -> LoadResult {
        self.calls.lock().unwrap().push(url.to_string());
        self.sources
            .get(url)
            .cloned()
            .unwrap_or_else(|| LoadResult::failed("no such source").with_metadata("status", 404))
    }
}

/// Memory cache that counts reads and writes.
pub struct RecordingCache {
    inner: MemorySourceCache,
    pub gets: AtomicUsize,
    pub puts: AtomicUsize,
    pub marks: AtomicUsize,
}

impl Default for RecordingCache {
    fn default() -> Self {
        Self {
            inner: MemorySourceCache::new(100, Duration::from_secs(60)),
            gets: AtomicUsize::new(0),
            puts: AtomicUsize::new(0),
            marks: AtomicUsize::new(0),
        }
    }
}

impl RecordingCache {
    pub fn gets(&self) -> usize {
        self.gets.load(Ordering::SeqCst)
    }

    pub fn puts(&self) -> usize {
        self.puts.load(Ordering::SeqCst)
    }

    pub fn marks(&self) -> usize {
        self.marks.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SourceCache for RecordingCache {
    async fn get(&self, url: &str) -> Result<Option<Bytes>, CarouselError> {
        self.gets.fetch_add(1, Ordering::SeqCst);
        self.inner.get(url).await
    }

    async fn put(&self, url: &str, bytes: Bytes) -> Result<(), CarouselError> {
        self.puts.fetch_add(1, Ordering::SeqCst);
        self.inner.put(url, bytes).await
    }

    async fn mark_fetched(&self, url: &str) -> Result<(), CarouselError> {
        self.marks.fetch_add(1, Ordering::SeqCst);
        self.inner.mark_fetched(url).await
    }

    async fn is_fetched(&self, url: &str) -> Result<bool, CarouselError> {
        self.inner.is_fetched(url).await
    }
}

/// Cache whose every operation fails.
pub struct BrokenCache;

#[async_trait]
impl SourceCache for BrokenCache {
    async fn get(&self, _url: &str) -> Result<Option<Bytes>, CarouselError> {
        Err(CarouselError::Cache {
            message: "backend down".to_string(),
        })
    }

    async fn put(&self, _url: &str, _bytes: Bytes) -> Result<(), CarouselError> {
        Err(CarouselError::Cache {
            message: "backend down".to_string(),
        })
    }

    async fn mark_fetched(&self, _url: &str) -> Result<(), CarouselError> {
        Err(CarouselError::Cache {
            message: "backend down".to_string(),
        })
    }

    async fn is_fetched(&self, _url: &str) -> Result<bool, CarouselError> {
        Err(CarouselError::Cache {
            message: "backend down".to_string(),
        })
    }
}

/// Rejects URLs containing any of the given fragments.
pub struct RejectingValidator(pub Vec<&'static str>);

impl SourceValidator for RejectingValidator {
    fn validate(&self, url: &str) -> bool {
        !self.0.iter().any(|fragment| url.contains(fragment))
    }
}

/// Draws an opaque block `height / 2` wide in the requested color.
#[derive(Default)]
pub struct BlockRenderer {
    pub calls: Mutex<Vec<(u32, String)>>,
}

impl BlockRenderer {
    pub fn calls(&self) -> Vec<(u32, String)> {
        self.calls.lock().unwrap().clone()
    }
}

impl TextRenderer for BlockRenderer {
    fn render(&self, height: u32, text: &str, color: Color) -> Result<RenderedText, CarouselError> {
        self.calls.lock().unwrap().push((height, text.to_string()));
        let width = (height / 2).max(1);
        Ok(RenderedText {
            image: image::RgbaImage::from_pixel(width, height, color.to_rgba(255)),
            width,
        })
    }
}

/// Everything a pipeline test needs, with handles kept for assertions.
pub struct Harness {
    pub loader: Arc<CountingLoader>,
    pub cache: Arc<RecordingCache>,
    pub renderer: Arc<BlockRenderer>,
    pub orchestrator: Orchestrator,
}

impl Harness {
    pub fn new(loader: CountingLoader) -> Self {
        let loader = Arc::new(loader);
        let cache = Arc::new(RecordingCache::default());
        let renderer = Arc::new(BlockRenderer::default());
        let orchestrator = Orchestrator::new(
            cache.clone(),
            loader.clone(),
            Arc::new(RasterEngine::default()),
            renderer.clone(),
        );
        Self {
            loader,
            cache,
            renderer,
            orchestrator,
        }
    }

    pub fn with_validator(mut self, validator: RejectingValidator) -> Self {
        self.orchestrator = self.orchestrator.with_validator(Arc::new(validator));
        self
    }

    pub fn with_max_source_bytes(mut self, max: usize) -> Self {
        self.orchestrator = self.orchestrator.with_max_source_bytes(max);
        self
    }
}

/// True when `actual` is within 2 of `expected` on every channel.
pub fn close_to(actual: image::Rgba<u8>, expected: Color) -> bool {
    let [r, g, b, _] = actual.0;
    r.abs_diff(expected.r) <= 2 && g.abs_diff(expected.g) <= 2 && b.abs_diff(expected.b) <= 2
}
