use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context as _;
use tokio::sync::watch;

use crate::card::model::RenderRequest;
use crate::card::style::GlassPanelStyle;
use crate::catalog::background::{BackgroundAsset, BackgroundCatalog};
use crate::classify::classifier::{Category, CategoryClassifier};
use crate::encode::args::EncoderPath;
use crate::encode::filter::{CompileInput, FilterGraph, FilterGraphCompiler};
use crate::encode::probe::probe_media;
use crate::encode::runner::{EncoderRunner, encode_timeout};
use crate::foundation::config::PipelineConfig;
use crate::foundation::core::Canvas;
use crate::foundation::error::{GlassError, GlassResult};
use crate::layout::engine::LayoutResult;
use crate::pipeline::store::{
    ArtifactKind, LocalMediaStore, MediaStore, OutputArtifact, directory_bytes,
};
use crate::pipeline::temp::{TempArtifact, output_path};
use crate::render::context::RenderingContext;
use crate::render::overlay::OverlayRenderer;
use crate::render::still::{backdrop, compose_still};

/// Everything needed to run the encoder for one request.
///
/// Dropping the plan deletes the temporary overlay.
#[derive(Debug)]
pub struct VideoPlan {
    pub request_id: String,
    pub canvas: Canvas,
    pub category: Category,
    pub background: BackgroundAsset,
    pub layout: LayoutResult,
    pub overlay: TempArtifact,
    pub graph: FilterGraph,
    pub output: PathBuf,
    pub duration_seconds: f64,
    pub timeout: Duration,
}

/// Select background, render overlay, compile the filter graph, encode, publish.
#[derive(Clone)]
pub struct CompositionPipeline {
    config: Arc<PipelineConfig>,
    context: Arc<RenderingContext>,
    catalog: Arc<BackgroundCatalog>,
    store: Arc<dyn MediaStore>,
    classifier: CategoryClassifier,
    compiler: FilterGraphCompiler,
}

impl std::fmt::Debug for CompositionPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompositionPipeline")
            .field("catalog", &self.catalog)
            .field("encoder", &self.compiler.encoder())
            .finish_non_exhaustive()
    }
}

impl CompositionPipeline {
    /// Validate `config`, load fonts and icons once, and store outputs in `output_dir`.
    ///
    /// Fails when no font face can be found and `config.require_fonts` is set.
    pub fn new(config: PipelineConfig) -> GlassResult<Self> {
        config.validate()?;
        let context = Arc::new(RenderingContext::new(&config)?);
        let catalog = Arc::new(BackgroundCatalog::from_config(&config));
        let store: Arc<dyn MediaStore> = Arc::new(LocalMediaStore::new(&config.output_dir));
        Ok(Self::with_parts(config, context, catalog, store))
    }

    pub fn with_parts(
        config: PipelineConfig,
        context: Arc<RenderingContext>,
        catalog: Arc<BackgroundCatalog>,
        store: Arc<dyn MediaStore>,
    ) -> Self {
        let compiler = FilterGraphCompiler::new(EncoderPath::select(&config));
        Self {
            config: Arc::new(config),
            context,
            catalog,
            store,
            classifier: CategoryClassifier::new(),
            compiler,
        }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn catalog(&self) -> &BackgroundCatalog {
        &self.catalog
    }

    pub fn context(&self) -> &RenderingContext {
        &self.context
    }

    /// Fail before any work if the canvas or the output directory exceed their budgets.
    pub fn check_resources(&self, canvas: Canvas) -> GlassResult<()> {
        if canvas.pixel_count() > self.config.max_canvas_pixels {
            return Err(GlassError::resource_exhausted(format!(
                "{}x{} exceeds the pixel budget of {}",
                canvas.width, canvas.height, self.config.max_canvas_pixels
            )));
        }
        if let Some(quota) = self.config.max_output_dir_bytes {
            let used = directory_bytes(&self.config.output_dir);
            if used >= quota {
                return Err(GlassError::resource_exhausted(format!(
                    "output directory holds {used} bytes, quota is {quota}"
                )));
            }
        }
        for dir in [&self.config.temp_dir, &self.config.output_dir] {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("create directory '{}'", dir.display()))?;
        }
        Ok(())
    }

    /// Classify the message and pick a clip, honouring an explicit override.
    pub fn select_background(
        &self,
        req: &RenderRequest,
    ) -> GlassResult<(Category, BackgroundAsset)> {
        let category = self.classifier.classify(&req.content.message_text);
        let asset = self
            .catalog
            .select_background(category, req.options.background.as_deref())?;
        Ok((category, asset))
    }

    /// Synchronous part of a video render: everything up to the encoder invocation.
    ///
    /// On error the temporary overlay, if already written, is removed before returning.
    #[tracing::instrument(skip_all, fields(request_id = %req.request_id))]
    pub fn plan_video(&self, req: &RenderRequest) -> GlassResult<VideoPlan> {
        let canvas = req.options.resolve_dimensions()?.even();
        self.check_resources(canvas)?;

        let (category, background) = self.select_background(req)?;

        let overlay = TempArtifact::reserve(
            &self.config.temp_dir,
            "overlay",
            &req.request_id,
            "png",
        );
        let rendered =
            OverlayRenderer::new(&self.context).render_on(canvas, &req.content, &req.options)?;
        rendered.image.save_png(overlay.path())?;

        let output = output_path(&self.config.output_dir, &req.request_id, "mp4");
        let graph = self.compiler.compile(&CompileInput {
            options: &req.options,
            canvas,
            background: &background.path,
            overlay: overlay.path(),
            overlay_size: (rendered.image.width, rendered.image.height),
            output: output.clone(),
        });
        let timeout = encode_timeout(
            self.config.timeout_base_secs,
            req.options.duration_seconds,
            req.options.quality,
        );

        tracing::debug!(
            %category,
            background = %background.path.display(),
            width = canvas.width,
            height = canvas.height,
            "video planned"
        );
        Ok(VideoPlan {
            request_id: req.request_id.clone(),
            canvas,
            category,
            background,
            layout: rendered.layout,
            overlay,
            graph,
            output,
            duration_seconds: req.options.duration_seconds,
            timeout,
        })
    }

    /// Full video render. `cancel` flipping to `true` kills the encoder; the temporary overlay
    /// is removed on every exit path.
    #[tracing::instrument(skip_all, fields(request_id = %req.request_id))]
    pub async fn render_video(
        &self,
        req: RenderRequest,
        cancel: Option<watch::Receiver<bool>>,
    ) -> GlassResult<OutputArtifact> {
        tracing::info!("video render started");
        let this = self.clone();
        let plan = tokio::task::spawn_blocking(move || this.plan_video(&req))
            .await
            .map_err(|e| GlassError::render(format!("overlay task failed: {e}")))??;

        let mut runner = EncoderRunner::new(&self.config.ffmpeg_bin, plan.timeout);
        if let Some(rx) = cancel {
            runner = runner.with_cancel(rx);
        }
        if let Err(err) = runner.run(&plan.graph.args).await {
            std::fs::remove_file(&plan.output).ok();
            return Err(err);
        }

        let byte_size = std::fs::metadata(&plan.output)
            .with_context(|| format!("stat encoder output '{}'", plan.output.display()))?
            .len();
        let probed = if self.config.probe_outputs {
            probe_media(&self.config.ffprobe_bin, &plan.output)
                .await
                .unwrap_or_else(|err| {
                    tracing::warn!(error = %err, "output probe failed; using requested values");
                    None
                })
        } else {
            None
        };

        let artifact = OutputArtifact {
            kind: ArtifactKind::Video,
            path: plan.output.clone(),
            byte_size,
            duration_seconds: probed
                .and_then(|p| p.duration_seconds)
                .or(Some(plan.duration_seconds)),
            width: probed.map_or(plan.canvas.width, |p| p.width),
            height: probed.map_or(plan.canvas.height, |p| p.height),
        };
        let published = self.store.publish(artifact)?;
        tracing::info!(
            path = %published.path.display(),
            bytes = published.byte_size,
            "video render finished"
        );
        Ok(published)
    }

    /// Still PNG: overlay composited over a blurred background image or the theme gradient.
    #[tracing::instrument(skip_all, fields(request_id = %req.request_id))]
    pub fn render_still(&self, req: &RenderRequest) -> GlassResult<OutputArtifact> {
        tracing::info!("still render started");
        let canvas = req.options.resolve_dimensions()?;
        self.check_resources(canvas)?;

        let rendered =
            OverlayRenderer::new(&self.context).render_on(canvas, &req.content, &req.options)?;
        let style = GlassPanelStyle::derive(req.content.theme, &req.options);
        let base = backdrop(
            canvas,
            req.options.background.as_deref(),
            &style,
            style.blur_radius,
        )?;
        let image = compose_still(&base, &rendered.image)?;

        let path = output_path(&self.config.output_dir, &req.request_id, "png");
        image.save_png(&path)?;
        let byte_size = std::fs::metadata(&path)
            .with_context(|| format!("stat still output '{}'", path.display()))?
            .len();

        let published = self.store.publish(OutputArtifact {
            kind: ArtifactKind::Still,
            path,
            byte_size,
            duration_seconds: None,
            width: canvas.width,
            height: canvas.height,
        })?;
        tracing::info!(path = %published.path.display(), "still render finished");
        Ok(published)
    }
}
