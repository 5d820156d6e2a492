//! Carousel composition state machine.
//!
//! ```text
//! Acquiring -> Normalizing -> Compositing -> [AnnotatingOverflow] -> Done
//!     \____________\______________\________________\____> Failed
//! ```
//!
//! Each stage owns the data it hands to the next one, so a failure drops
//! every handle acquired so far and no partial carousel can escape.

use std::sync::Arc;

use tracing::{debug, info, warn};

use super::{Carousel, CarouselParams};
use crate::compose::{add_overflow, join_horizontal, OverflowStyle};
use crate::engine::{ImageEngineFactory, ImageHandle};
use crate::error::CarouselError;
use crate::source::{decode_url_list, Acquirer, FetchStrategy, SourceCache, SourceLoader, SourceValidator};
use crate::text::TextRenderer;

/// Where the source URLs come from.
#[derive(Debug, Clone, Copy)]
enum Payload<'a> {
    Encoded(&'a str),
    Urls(&'a [String]),
}

enum Stage {
    Acquiring,
    Normalizing(Vec<ImageHandle>),
    Compositing(Vec<ImageHandle>),
    AnnotatingOverflow {
        strip: ImageHandle,
        tiles: usize,
        hidden: usize,
    },
}

/// Outcome of one transition.
enum Step {
    Next(Stage),
    Done(Carousel),
}

impl Stage {
    fn name(&self) -> &'static str {
        match self {
            Stage::Acquiring => "acquiring",
            Stage::Normalizing(_) => "normalizing",
            Stage::Compositing(_) => "compositing",
            Stage::AnnotatingOverflow { .. } => "annotating_overflow",
        }
    }
}

/// Composes carousels from URL lists.
///
/// All collaborators are injected; one orchestrator can serve any number of
/// concurrent requests since each request owns its own stage data.
pub struct Orchestrator {
    acquirer: Acquirer,
    factory: Arc<dyn ImageEngineFactory>,
    renderer: Arc<dyn TextRenderer>,
}

impl Orchestrator {
    pub fn new(
        cache: Arc<dyn SourceCache>,
        loader: Arc<dyn SourceLoader>,
        factory: Arc<dyn ImageEngineFactory>,
        renderer: Arc<dyn TextRenderer>,
    ) -> Self {
        Self {
            acquirer: Acquirer::new(cache, loader, factory.clone()),
            factory,
            renderer,
        }
    }

    pub fn with_validator(mut self, validator: Arc<dyn SourceValidator>) -> Self {
        self.acquirer = self.acquirer.with_validator(validator);
        self
    }

    pub fn with_strategy(mut self, strategy: FetchStrategy) -> Self {
        self.acquirer = self.acquirer.with_strategy(strategy);
        self
    }

    pub fn with_max_source_bytes(mut self, max: usize) -> Self {
        self.acquirer = self.acquirer.with_max_source_bytes(max);
        self
    }

    /// Compose from a base64 encoded, comma separated URL list.
    pub async fn compose(
        &self,
        urls_base64: &str,
        params: &CarouselParams,
    ) -> Result<Carousel, CarouselError> {
        self.run(Payload::Encoded(urls_base64), params).await
    }

    /// Compose from already decoded URLs.
    pub async fn compose_urls(
        &self,
        urls: &[String],
        params: &CarouselParams,
    ) -> Result<Carousel, CarouselError> {
        self.run(Payload::Urls(urls), params).await
    }

    async fn run(&self, payload: Payload<'_>, params: &CarouselParams) -> Result<Carousel, CarouselError> {
        let mut stage = Stage::Acquiring;

        loop {
            let name = stage.name();
            debug!(stage = name, "Entering carousel stage");

            stage = match self.advance(stage, payload, params).await {
                Ok(Step::Done(carousel)) => {
                    info!(
                        width = carousel.image.width(),
                        height = carousel.image.height(),
                        tiles = carousel.tiles,
                        overflow = carousel.overflow.unwrap_or(0),
                        "Carousel composed"
                    );
                    return Ok(carousel);
                }
                Ok(Step::Next(next)) => next,
                Err(e) => {
                    warn!(stage = name, error = %e, status = e.status_code(), "Carousel composition failed");
                    return Err(e);
                }
            };
        }
    }

    async fn advance(
        &self,
        stage: Stage,
        payload: Payload<'_>,
        params: &CarouselParams,
    ) -> Result<Step, CarouselError> {
        match stage {
            Stage::Acquiring => {
                let handles = match payload {
                    Payload::Encoded(encoded) => {
                        let urls = decode_url_list(encoded)?;
                        self.acquirer.acquire_urls(&urls).await?
                    }
                    Payload::Urls(urls) => self.acquirer.acquire_urls(urls).await?,
                };
                Ok(Step::Next(Stage::Normalizing(handles)))
            }

            Stage::Normalizing(mut handles) => {
                let filter = self.factory.resize_filter();
                for handle in &mut handles {
                    handle.resize_to_height(params.img_height, filter)?;
                }
                Ok(Step::Next(Stage::Compositing(handles)))
            }

            Stage::Compositing(mut handles) => {
                let hidden = params.hidden_count(handles.len());
                if params.visible_only {
                    handles.truncate(params.img_count as usize);
                }

                let strip = join_horizontal(
                    self.factory.as_ref(),
                    &handles,
                    params.img_spacing,
                    params.background_color,
                )?;
                let tiles = handles.len();

                if hidden > 0 {
                    Ok(Step::Next(Stage::AnnotatingOverflow {
                        strip,
                        tiles,
                        hidden,
                    }))
                } else {
                    Ok(Step::Done(Carousel {
                        image: strip,
                        tiles,
                        overflow: None,
                    }))
                }
            }

            Stage::AnnotatingOverflow {
                strip,
                tiles,
                hidden,
            } => {
                let style = OverflowStyle {
                    height: params.img_height,
                    spacing: params.img_spacing,
                    text_color: params.more_text_color,
                    background: params.background_color,
                };
                let image = add_overflow(
                    self.factory.as_ref(),
                    self.renderer.as_ref(),
                    &strip,
                    hidden,
                    &style,
                )?;
                Ok(Step::Done(Carousel {
                    image,
                    tiles,
                    overflow: Some(hidden),
                }))
            }
        }
    }
}
