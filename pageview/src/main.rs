use anyhow::Context;
use clap::Parser;
use pageview_rs::{
    parse_color, Action, Interpolation, Page, PngSink, Raster, Viewer, ViewerConfig,
};
use std::path::PathBuf;

/// pageview: replay viewer actions against an image and write every rendered frame as PNG
#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
    /// Path to input PNG or JPEG image. A blank page is used when omitted
    #[clap(short, long)]
    pub input: Option<PathBuf>,

    /// Width of the blank page
    #[clap(long, default_value_t = 700)]
    pub width: u32,

    /// Height of the blank page
    #[clap(long, default_value_t = 900)]
    pub height: u32,

    /// CSS color of the blank page
    #[clap(long, default_value = "#ffffff")]
    pub background: String,

    /// Directory that receives frame-NNNN.png files
    #[clap(short, long)]
    pub output_dir: PathBuf,

    /// Action to dispatch after the initial render. One of zoomIn, zoomOut,
    /// rotateClockwise, resize. May be repeated
    #[clap(short, long = "action")]
    pub actions: Vec<Action>,

    /// Free-form zoom factor applied before the actions
    #[clap(short, long)]
    pub zoom: Option<f64>,

    /// Resize interpolation: linear or nearest. Overrides the config file
    #[clap(long)]
    pub interpolation: Option<Interpolation>,

    /// Path to a JSON viewer config ({"catalog": [...], "interpolation": ..., "initialZoom": ...})
    #[clap(short, long)]
    pub config: Option<PathBuf>,

    /// Surface-local click, as X,Y, mapped back onto the source image after all actions. May be repeated
    #[clap(long = "click", value_parser = parse_point)]
    pub clicks: Vec<(i32, i32)>,

    /// Increase log verbosity (-v info, -vv debug). RUST_LOG takes precedence
    #[clap(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

fn parse_point(s: &str) -> Result<(i32, i32), String> {
    let (x, y) = s
        .split_once(',')
        .ok_or_else(|| format!("expected X,Y but got '{}'", s))?;
    let x = x.trim().parse().map_err(|e| format!("bad x in '{}': {}", s, e))?;
    let y = y.trim().parse().map_err(|e| format!("bad y in '{}': {}", s, e))?;
    Ok((x, y))
}

fn init_logger(verbose: u8) {
    let level = match verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        _ => log::LevelFilter::Debug,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}

fn run(args: Args) -> anyhow::Result<()> {
    let mut config = match &args.config {
        Some(path) => ViewerConfig::load(path)
            .with_context(|| format!("Failed to load config file: {}", path.display()))?,
        None => ViewerConfig::default(),
    };
    if let Some(interpolation) = args.interpolation {
        config.interpolation = interpolation;
    }

    let source = match &args.input {
        Some(path) => Raster::open(path)
            .with_context(|| format!("Failed to read input image: {}", path.display()))?,
        None => {
            let color = parse_color(&args.background)?;
            Raster::blank(args.width, args.height, color).context("Invalid blank page size")?
        }
    };
    log::info!("source page {}x{}", source.width(), source.height());

    let page = Page::with_config(source, &config)?;
    let sink = PngSink::new(&args.output_dir).with_context(|| {
        format!("Failed to create output directory: {}", args.output_dir.display())
    })?;
    let mut viewer = Viewer::new(page, sink);

    viewer.render().context("Initial render failed")?;
    if let Some(zoom) = args.zoom {
        viewer
            .set_zoom(zoom)
            .with_context(|| format!("Zoom to {} failed", zoom))?;
    }
    for action in &args.actions {
        viewer
            .handle(*action)
            .with_context(|| format!("Action {} failed", action))?;
    }

    for path in viewer.sink().written() {
        println!("{}", path.display());
    }
    for &(x, y) in &args.clicks {
        let hit = viewer.pointer_down(x, y);
        match hit.image {
            Some((ix, iy)) => println!("click {} {} -> {} {}", x, y, ix, iy),
            None => println!("click {} {} -> outside", x, y),
        }
    }
    Ok(())
}

fn main() {
    let args: Args = Args::parse();
    init_logger(args.verbose);

    if let Err(err) = run(args) {
        eprintln!("pageview: {:#}", err);
        std::process::exit(1);
    }
}
