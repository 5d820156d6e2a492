use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context};
use clap::Parser;

use carousel::config::{CacheKind, Config};
use carousel::constants::DEFAULT_OUTPUT_PATH;
use carousel::engine::RasterEngine;
use carousel::source::{
    DiskSourceCache, HttpSourceLoader, MemorySourceCache, NullSourceCache, SourceCache,
    SourcePolicy,
};
use carousel::text::{load_font, FontTextRenderer, TextRenderer, UnavailableTextRenderer};
use carousel::{CarouselError, CarouselParams, Orchestrator};

/// Composes a carousel strip from a list of image URLs
#[derive(Parser, Debug)]
#[command(name = "carousel")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Base64 encoded, comma separated image URLs
    #[arg(required_unless_present = "urls", conflicts_with = "urls")]
    urls_base64: Option<String>,

    /// Plain comma separated image URLs
    #[arg(long, value_delimiter = ',')]
    urls: Vec<String>,

    /// Visible slots before a "+N" counter is appended
    #[arg(long)]
    count: Option<u32>,

    /// Tile height in pixels
    #[arg(long)]
    height: Option<u32>,

    /// Gap between tiles in pixels
    #[arg(long)]
    spacing: Option<u32>,

    /// Background color as 6 hex digits
    #[arg(long)]
    background: Option<String>,

    /// Counter color as 6 hex digits
    #[arg(long)]
    more_text_color: Option<String>,

    /// Only draw the first `count` tiles
    #[arg(long)]
    visible_only: bool,

    /// Output JPEG path
    #[arg(short, long, default_value = DEFAULT_OUTPUT_PATH)]
    output: PathBuf,
}

impl Args {
    fn params(&self, config: &Config) -> Result<CarouselParams, CarouselError> {
        let defaults = &config.carousel;
        let background = self
            .background
            .as_deref()
            .unwrap_or(&defaults.background_color);
        let more_text = self
            .more_text_color
            .as_deref()
            .unwrap_or(&defaults.more_text_color);

        Ok(CarouselParams::parse(
            self.count.unwrap_or(defaults.img_count),
            self.height.unwrap_or(defaults.img_height),
            self.spacing.unwrap_or(defaults.img_spacing),
            background,
            more_text,
        )?
        .with_visible_only(self.visible_only))
    }
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    if let Err(e) = run(args).await {
        let status = e
            .downcast_ref::<CarouselError>()
            .map(CarouselError::status_code);
        match status {
            Some(status) => eprintln!("Error ({status}): {e:#}"),
            None => eprintln!("Error: {e:#}"),
        }
        std::process::exit(1);
    }
}

async fn run(args: Args) -> anyhow::Result<()> {
    let config = match &args.config {
        Some(path) => Config::from_file(path)
            .map_err(anyhow::Error::msg)
            .with_context(|| format!("Failed to load configuration from {}", path.display()))?,
        None => Config::default(),
    };
    config.validate().map_err(anyhow::Error::msg)?;

    carousel::logging::init_subscriber(&config.logging)
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {e}"))?;

    let params = args.params(&config)?;
    let orchestrator = build_orchestrator(&config).await?;

    let result = if args.urls.is_empty() {
        let Some(encoded) = args.urls_base64.as_deref() else {
            bail!("no image URLs given");
        };
        orchestrator.compose(encoded, &params).await?
    } else {
        orchestrator.compose_urls(&args.urls, &params).await?
    };

    let encoded = result.encode(config.output.jpeg_quality)?;
    tokio::fs::write(&args.output, &encoded.data)
        .await
        .with_context(|| format!("Failed to write {}", args.output.display()))?;

    tracing::info!(
        output = %args.output.display(),
        width = encoded.width,
        height = encoded.height,
        bytes = encoded.data.len(),
        tiles = result.tiles,
        "Carousel written"
    );
    Ok(())
}

async fn build_orchestrator(config: &Config) -> anyhow::Result<Orchestrator> {
    let cache: Arc<dyn SourceCache> = match config.cache.kind {
        CacheKind::Memory => Arc::new(MemorySourceCache::new(
            config.cache.max_entries,
            config.cache.ttl(),
        )),
        CacheKind::Disk => {
            let Some(path) = &config.cache.disk_path else {
                bail!("cache.disk_path is required when cache.kind is 'disk'");
            };
            Arc::new(DiskSourceCache::open(path).await?)
        }
        CacheKind::None => Arc::new(NullSourceCache),
    };

    let loader = Arc::new(HttpSourceLoader::new(&config.fetch.loader_config())?);
    let factory = Arc::new(RasterEngine::new(
        config.security.decode_limits(),
        config.output.resize_filter,
    ));

    let renderer: Arc<dyn TextRenderer> = match load_font(config.text.font_path.as_deref()) {
        Ok(font) => Arc::new(FontTextRenderer::new(font)),
        Err(e) => {
            tracing::warn!(error = %e, "Overflow counters will fail without a font");
            Arc::new(UnavailableTextRenderer::new(e.to_string()))
        }
    };

    tracing::debug!(
        cache = ?config.cache.kind,
        concurrency = config.fetch.concurrency,
        allowed_sources = config.security.allowed_sources.len(),
        blocked_sources = config.security.blocked_sources.len(),
        "Pipeline configured"
    );

    Ok(Orchestrator::new(cache, loader, factory, renderer)
        .with_validator(Arc::new(SourcePolicy::from_config(&config.security)))
        .with_strategy(config.fetch.strategy())
        .with_max_source_bytes(config.fetch.max_source_bytes))
}
