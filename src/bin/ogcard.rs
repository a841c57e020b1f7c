use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};
use sha2::Digest as _;

use ogcard::{
    BatchDriver, BudouxSegmenter, CardRenderer, CardStyle, FontSet, ParleyText, RecordSource,
    ScriptRunSegmenter, Segmenter, SharedAssets,
};

#[derive(Parser, Debug)]
#[command(name = "ogcard", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render one card per post or manifest entry into a directory.
    Batch(BatchArgs),
    /// Render a single card from a title and date given on the command line.
    Card(CardArgs),
}

#[derive(Args, Debug)]
struct AssetArgs {
    /// Background image, scaled to the card width.
    #[arg(long)]
    background: PathBuf,

    /// TrueType/OpenType font file; repeat for fallbacks.
    #[arg(long = "font", required = true)]
    fonts: Vec<PathBuf>,

    /// Card style JSON overriding the built-in layout.
    #[arg(long)]
    style: Option<PathBuf>,

    /// BudouX model JSON; without it titles split on script changes.
    #[arg(long)]
    budoux_model: Option<PathBuf>,

    /// Print diagnostics about the loaded fonts (family names + SHA-256 of font bytes).
    #[arg(long)]
    dump_fonts: bool,
}

#[derive(Args, Debug)]
struct BatchArgs {
    /// Directory of Markdown posts with `title` and `created` front matter.
    #[arg(long, conflicts_with = "manifest", required_unless_present = "manifest")]
    posts: Option<PathBuf>,

    /// JSON array of `{ "id", "title", "created" }` records.
    #[arg(long)]
    manifest: Option<PathBuf>,

    /// Output directory; cards are written as `<id>.png`.
    #[arg(long)]
    out: PathBuf,

    /// Worker threads (defaults to one per core).
    #[arg(long)]
    threads: Option<usize>,

    #[command(flatten)]
    assets: AssetArgs,
}

#[derive(Args, Debug)]
struct CardArgs {
    #[arg(long)]
    title: String,

    /// `YYYY-MM-DD` or an RFC 3339 timestamp.
    #[arg(long)]
    date: String,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    #[command(flatten)]
    assets: AssetArgs,
}

fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();
    match cli.cmd {
        Command::Batch(args) => cmd_batch(args),
        Command::Card(args) => cmd_card(args),
    }
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

struct Loaded {
    assets: SharedAssets,
    style: CardStyle,
    segmenter: Box<dyn Segmenter>,
}

fn load(args: &AssetArgs) -> anyhow::Result<Loaded> {
    let style = match &args.style {
        Some(path) => CardStyle::from_path(path)?,
        None => CardStyle::default(),
    };
    let segmenter: Box<dyn Segmenter> = match &args.budoux_model {
        Some(path) => Box::new(BudouxSegmenter::from_path(path)?),
        None => Box::new(ScriptRunSegmenter::new()),
    };
    let assets = SharedAssets::load(&args.background, &args.fonts)?;

    if let Some(family) = &style.font_family
        && !assets
            .fonts
            .entries()
            .iter()
            .any(|f| f.families.iter().any(|n| n.eq_ignore_ascii_case(family)))
    {
        anyhow::bail!("style font_family '{family}' is not provided by any --font file");
    }

    if args.dump_fonts {
        dump_font_diagnostics(&assets.fonts);
    }

    Ok(Loaded {
        assets,
        style,
        segmenter,
    })
}

fn cmd_batch(args: BatchArgs) -> anyhow::Result<()> {
    let loaded = load(&args.assets)?;
    let renderer = CardRenderer::new(
        &loaded.assets.background,
        &loaded.style,
        loaded.segmenter.as_ref(),
    )?;

    let sources = match (&args.posts, &args.manifest) {
        (Some(dir), _) => ogcard::discover_posts(dir)?,
        (None, Some(manifest)) => ogcard::load_manifest(manifest)?,
        (None, None) => anyhow::bail!("one of --posts or --manifest is required"),
    };
    let total = sources.len();

    let report = BatchDriver {
        threads: args.threads,
    }
    .run(sources, &renderer, &loaded.assets.fonts, &args.out)?;

    for (_, path) in &report.written {
        println!("{}", path.display());
    }
    if !report.is_success() {
        for err in &report.failed {
            eprintln!("{err}");
        }
        anyhow::bail!("{} of {total} cards failed", report.failed.len());
    }
    Ok(())
}

fn cmd_card(args: CardArgs) -> anyhow::Result<()> {
    let loaded = load(&args.assets)?;
    let renderer = CardRenderer::new(
        &loaded.assets.background,
        &loaded.style,
        loaded.segmenter.as_ref(),
    )?;

    let id = args
        .out
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("card")
        .to_string();
    let record = RecordSource::new(id, Some(args.title), Some(args.date)).into_record()?;

    let mut painter = ParleyText::new(&loaded.assets.fonts)?;
    let png = renderer.render_record(&record, &mut painter)?;

    if let Some(parent) = args.out.parent()
        && parent != Path::new("")
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    std::fs::write(&args.out, png)
        .with_context(|| format!("write card '{}'", args.out.display()))?;
    println!("{}", args.out.display());
    Ok(())
}

fn dump_font_diagnostics(fonts: &FontSet) {
    eprintln!("font diagnostics:");
    for file in fonts.entries() {
        eprintln!("  {}:", file.source);
        eprintln!("    families: {}", file.families.join(", "));
        eprintln!("    sha256:   {}", sha256_hex(file.blob.data()));
    }
}

fn sha256_hex(bytes: &[u8]) -> String {
    let digest = sha2::Sha256::digest(bytes);
    let mut out = String::with_capacity(digest.len() * 2);
    for b in digest {
        out.push_str(&format!("{:02x}", b));
    }
    out
}
