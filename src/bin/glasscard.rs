use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "glasscard", version)]
struct Cli {
    /// Pipeline config JSON. Missing keys take defaults; `GLASSCARD_*` variables override.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a still PNG card.
    Still(RequestArgs),
    /// Render an MP4 card over a looping background clip (requires `ffmpeg` on PATH).
    Video(VideoArgs),
    /// Print the computed card layout without rasterising anything.
    Layout(RequestArgs),
    /// Print the background category chosen for a piece of text.
    Classify(ClassifyArgs),
    /// Scan the background catalog and print per-category clip counts.
    Backgrounds,
}

#[derive(Parser, Debug)]
struct RequestArgs {
    /// Render request JSON (`request_id`, `content`, `options`).
    #[arg(long = "in")]
    in_path: PathBuf,
}

#[derive(Parser, Debug)]
struct VideoArgs {
    #[command(flatten)]
    request: RequestArgs,

    /// Print the compiled encoder arguments instead of running the encoder.
    #[arg(long)]
    dry_run: bool,
}

#[derive(Parser, Debug)]
struct ClassifyArgs {
    /// Text to classify.
    text: String,

    /// Also print per-category weights.
    #[arg(long)]
    scores: bool,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;
    match cli.cmd {
        Command::Still(args) => cmd_still(config, args),
        Command::Video(args) => cmd_video(config, args),
        Command::Layout(args) => cmd_layout(config, args),
        Command::Classify(args) => cmd_classify(args),
        Command::Backgrounds => cmd_backgrounds(config),
    }
}

fn load_config(path: Option<&Path>) -> anyhow::Result<glasscard::PipelineConfig> {
    let cfg = match path {
        Some(p) => glasscard::PipelineConfig::from_path(p)?,
        None => glasscard::PipelineConfig::default(),
    };
    Ok(cfg.apply_env())
}

fn read_request(path: &Path) -> anyhow::Result<glasscard::RenderRequest> {
    let f = File::open(path).with_context(|| format!("open request '{}'", path.display()))?;
    let r = BufReader::new(f);
    let req: glasscard::RenderRequest =
        serde_json::from_reader(r).with_context(|| "parse request JSON")?;
    req.content.validate()?;
    req.options.validate()?;
    Ok(req)
}

fn print_json(value: &impl serde::Serialize) -> anyhow::Result<()> {
    let out = serde_json::to_string_pretty(value).context("serialize output")?;
    println!("{out}");
    Ok(())
}

fn cmd_still(config: glasscard::PipelineConfig, args: RequestArgs) -> anyhow::Result<()> {
    let req = read_request(&args.in_path)?;
    let pipeline = glasscard::CompositionPipeline::new(config)?;
    let artifact = pipeline.render_still(&req)?;
    eprintln!("wrote {}", artifact.path.display());
    print_json(&artifact)
}

fn cmd_video(config: glasscard::PipelineConfig, args: VideoArgs) -> anyhow::Result<()> {
    let req = read_request(&args.request.in_path)?;
    let pipeline = glasscard::CompositionPipeline::new(config)?;

    if args.dry_run {
        let plan = pipeline.plan_video(&req)?;
        print_json(&serde_json::json!({
            "category": plan.category,
            "background": plan.background.path,
            "filter_complex": plan.graph.filter_complex(),
            "args": plan.graph.args,
            "timeout_secs": plan.timeout.as_secs(),
        }))?;
        return Ok(());
    }

    let rt = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("build tokio runtime")?;
    let artifact = rt.block_on(async move {
        let (cancel_tx, cancel_rx) = tokio::sync::watch::channel(false);
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::warn!("interrupt received; cancelling encoder");
                cancel_tx.send(true).ok();
            }
        });
        pipeline.render_video(req, Some(cancel_rx)).await
    })?;

    eprintln!("wrote {}", artifact.path.display());
    print_json(&artifact)
}

fn cmd_layout(config: glasscard::PipelineConfig, args: RequestArgs) -> anyhow::Result<()> {
    let req = read_request(&args.in_path)?;
    let context = glasscard::RenderingContext::new(&config)?;
    let style = glasscard::GlassPanelStyle::derive(req.content.theme, &req.options);
    let mut measure = context.measurer();
    let layout = glasscard::LayoutEngine::new().compute_layout(
        &req.content,
        &req.options,
        &style,
        measure.as_mut(),
    )?;
    print_json(&layout)
}

fn cmd_classify(args: ClassifyArgs) -> anyhow::Result<()> {
    let classifier = glasscard::CategoryClassifier::new();
    if args.scores {
        let score = classifier.score(&args.text);
        print_json(&serde_json::json!({
            "category": score.best(),
            "weights": score.weights,
            "sentiment": score.sentiment,
        }))
    } else {
        println!("{}", classifier.classify(&args.text));
        Ok(())
    }
}

fn cmd_backgrounds(config: glasscard::PipelineConfig) -> anyhow::Result<()> {
    let catalog = glasscard::BackgroundCatalog::from_config(&config);
    let total = catalog.warm()?;
    let counts: serde_json::Map<String, serde_json::Value> = glasscard::Category::ALL
        .into_iter()
        .map(|c| (c.to_string(), catalog.cached_len(c).unwrap_or(0).into()))
        .collect();
    print_json(&serde_json::json!({
        "root": catalog.root(),
        "total": total,
        "categories": counts,
    }))
}
