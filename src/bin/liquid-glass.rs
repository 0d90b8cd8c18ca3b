use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use liquid_glass::{
    EffectRegistry, GlassOptions, HostEvent, LensConfig, Point, PointerState, RasterSize, Rect,
    RoundedRectLens, SoftwareHost, encode, generate,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "liquid-glass", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write the encoded displacement texture for a lens as a PNG.
    Map(MapArgs),
    /// Refract a backdrop PNG through a glass panel.
    Render(RenderArgs),
}

#[derive(Parser, Debug)]
struct MapArgs {
    /// Texture width in pixels.
    #[arg(long)]
    width: u32,

    /// Texture height in pixels.
    #[arg(long)]
    height: u32,

    /// Pointer position in box-relative units, `x,y`.
    #[arg(long, value_parser = parse_pair, default_value = "0,0")]
    pointer: (f64, f64),

    /// Lens configuration JSON.
    #[arg(long)]
    lens: Option<PathBuf>,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// Backdrop PNG.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Glass panel bounds in backdrop pixels, `x,y,width,height`.
    #[arg(long, value_parser = parse_rect)]
    rect: Rect,

    /// Pointer position in backdrop pixels, `x,y`.
    #[arg(long, value_parser = parse_pair)]
    pointer: Option<(f64, f64)>,

    /// Lens configuration JSON.
    #[arg(long)]
    lens: Option<PathBuf>,

    /// Effect options JSON (pixel ratio, style).
    #[arg(long)]
    options: Option<PathBuf>,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Map(args) => cmd_map(args),
        Command::Render(args) => cmd_render(args),
    }
}

fn parse_pair(s: &str) -> Result<(f64, f64), String> {
    let v = parse_numbers(s, 2)?;
    Ok((v[0], v[1]))
}

fn parse_rect(s: &str) -> Result<Rect, String> {
    let v = parse_numbers(s, 4)?;
    Ok(Rect::new(v[0], v[1], v[0] + v[2], v[1] + v[3]))
}

fn parse_numbers(s: &str, n: usize) -> Result<Vec<f64>, String> {
    let v = s
        .split(',')
        .map(|p| p.trim().parse::<f64>().map_err(|e| format!("'{p}': {e}")))
        .collect::<Result<Vec<_>, _>>()?;
    if v.len() != n {
        return Err(format!("expected {n} comma-separated numbers, got {}", v.len()));
    }
    Ok(v)
}

fn read_json(path: &Path) -> anyhow::Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("read '{}'", path.display()))
}

fn read_lens(path: Option<&Path>) -> anyhow::Result<RoundedRectLens> {
    let cfg = match path {
        Some(p) => LensConfig::from_json_str(&read_json(p)?)
            .with_context(|| format!("parse lens config '{}'", p.display()))?,
        None => LensConfig::default(),
    };
    Ok(RoundedRectLens::new(cfg)?)
}

fn ensure_parent(path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    Ok(())
}

fn cmd_map(args: MapArgs) -> anyhow::Result<()> {
    let lens = read_lens(args.lens.as_deref())?;
    let size = RasterSize::new(args.width, args.height)?;
    let pointer = PointerState::new(args.pointer.0, args.pointer.1);

    let outcome = generate(size, &lens, pointer)?;
    let texture = encode(&outcome.field);

    ensure_parent(&args.out)?;
    std::fs::write(&args.out, texture.to_png()?)
        .with_context(|| format!("write png '{}'", args.out.display()))?;

    let summary = serde_json::json!({
        "width": size.width,
        "height": size.height,
        "max_scale": texture.max_scale(),
        "filter_scale": texture.filter_scale(1.0),
        "pointer_dependent": outcome.pointer_dependent,
    });
    println!("{summary}");
    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let backdrop = image::open(&args.in_path)
        .with_context(|| format!("open backdrop '{}'", args.in_path.display()))?
        .to_rgba8();
    let lens = read_lens(args.lens.as_deref())?;
    let options = match &args.options {
        Some(p) => GlassOptions::from_json_str(&read_json(p)?)
            .with_context(|| format!("parse options '{}'", p.display()))?,
        None => GlassOptions::default(),
    };

    let mut host = SoftwareHost::new();
    let target = host.add_surface(args.rect);
    let mut registry = EffectRegistry::new();
    registry.attach(&mut host, target, Arc::new(lens), options)?;

    if let Some((x, y)) = args.pointer {
        let event = HostEvent::PointerMove {
            target,
            position: Point::new(x, y),
        };
        registry.dispatch(&mut host, event)?;
    }

    let out = host.composite(target, &backdrop)?;
    registry.detach_all(&mut host);

    ensure_parent(&args.out)?;
    out.save_with_format(&args.out, image::ImageFormat::Png)
        .with_context(|| format!("write png '{}'", args.out.display()))?;
    eprintln!("wrote {}", args.out.display());
    Ok(())
}
