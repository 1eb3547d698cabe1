use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use log::{debug, info};
use thread_art::{
    verboser::{Message, Verboser},
    Float, Growth, Mode, Overrides, Parameters, Shape, SvgRenderer, ThreadArt,
};

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Input file path.
    #[arg()]
    input: PathBuf,

    /// JSON file with parameter overrides, applied before the flags below.
    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(long, value_enum)]
    shape: Option<ShapeArg>,

    /// Number of pegs around the frame.
    #[arg(short, long)]
    pegs: Option<usize>,

    /// Working resolution multiplier (1 to 4).
    #[arg(short, long)]
    quality: Option<u32>,

    #[arg(short, long, value_enum)]
    mode: Option<ModeArg>,

    /// Light thread on a dark ground.
    #[arg(long)]
    invert_colors: bool,

    /// Number of segments to draw.
    #[arg(short, long)]
    lines: Option<usize>,

    #[arg(long)]
    opacity: Option<f64>,

    /// Stroke width in working buffer pixels.
    #[arg(long)]
    thickness: Option<f64>,

    #[arg(long)]
    zoom: Option<f64>,

    #[arg(long, allow_hyphen_values = true)]
    zoom_offset_x: Option<f64>,

    #[arg(long, allow_hyphen_values = true)]
    zoom_offset_y: Option<f64>,

    /// Seed of the tie-break generator.
    #[arg(long)]
    seed: Option<u64>,

    /// Precision of calculations (Single/Double).
    #[arg(long, default_value_t = Precision::Single)]
    precision: Precision,

    /// Time slice of each growth pass, in milliseconds.
    #[arg(long, default_value_t = 250)]
    budget_ms: u64,

    /// Also write a snapshot every this many segments.
    #[arg(long, short)]
    interval: Option<usize>,

    /// Longer side of the written SVG.
    #[arg(long, default_value_t = 1000)]
    size: usize,
}

impl Args {
    fn overrides(&self) -> Overrides {
        Overrides {
            shape: self.shape.map(Into::into),
            pegs_count: self.pegs.map(|value| value as f64),
            quality: self.quality.map(f64::from),
            mode: self.mode.map(Into::into),
            invert_colors: self.invert_colors.then_some(true),
            nb_lines: self.lines.map(|value| value as f64),
            line_opacity: self.opacity,
            line_thickness: self.thickness,
            zoom: self.zoom,
            zoom_offset_x: self.zoom_offset_x,
            zoom_offset_y: self.zoom_offset_y,
            seed: self.seed,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ShapeArg {
    Circle,
    Rectangle,
}

impl From<ShapeArg> for Shape {
    fn from(shape: ShapeArg) -> Self {
        match shape {
            ShapeArg::Circle => Shape::Circle,
            ShapeArg::Rectangle => Shape::Rectangle,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ModeArg {
    Monochrome,
    Trichromatic,
}

impl From<ModeArg> for Mode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Monochrome => Mode::Monochrome,
            ModeArg::Trichromatic => Mode::Trichromatic,
        }
    }
}

#[derive(Clone, Copy, Debug)]
enum Precision {
    Single,
    Double,
}

impl ValueEnum for Precision {
    fn value_variants<'a>() -> &'a [Self] {
        &[Self::Single, Self::Double]
    }

    fn to_possible_value(&self) -> Option<clap::builder::PossibleValue> {
        Some(match self {
            Self::Single => clap::builder::PossibleValue::new("Single")
                .alias("single")
                .alias("f32"),
            Self::Double => clap::builder::PossibleValue::new("Double")
                .alias("double")
                .alias("f64"),
        })
    }
}

impl std::fmt::Display for Precision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Single => "Single",
            Self::Double => "Double",
        })
    }
}

/// Logs growth progress every few hundred segments.
struct Progress {
    every: usize,
}

impl Verboser for Progress {
    fn verbose(&mut self, message: Message) {
        match message {
            Message::Growing(total) if total % self.every == 0 => info!("{total} segments"),
            Message::Growing(_) | Message::Measuring => {}
            Message::Truncating(target) => info!("truncating to {target} segments"),
            Message::Replaying(total) => debug!("replaying {total} segments"),
        }
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();
    match args.precision {
        Precision::Single => with_precision::<f32>(&args),
        Precision::Double => with_precision::<f64>(&args),
    }
}

fn parameters(args: &Args) -> Result<Parameters> {
    let mut parameters = Parameters::default();
    if let Some(config) = &args.config {
        let text = fs::read_to_string(config).with_context(|| format!("reading {}", config.display()))?;
        let overrides: Overrides =
            serde_json::from_str(&text).with_context(|| format!("parsing {}", config.display()))?;
        parameters = parameters.merged(&overrides);
    }
    Ok(parameters.merged(&args.overrides()))
}

fn with_precision<S: Float>(args: &Args) -> Result<()> {
    let parameters = parameters(args)?;
    info!("{parameters:?}");
    let image = image::open(&args.input).with_context(|| format!("opening {}", args.input.display()))?;

    let file_name = args
        .input
        .file_stem()
        .and_then(|stem| stem.to_str())
        .context("invalid file name")?;
    let out_folder = args.input.parent().unwrap_or(Path::new(".")).join("output");
    fs::create_dir_all(&out_folder).context("output directory can not be created")?;

    let target = parameters.nb_lines;
    let budget = Duration::from_millis(args.budget_ms);
    let mut art = ThreadArt::<S>::new(image, parameters)?;
    let mut progress = Progress { every: 500 };

    if let Some(step) = args.interval.filter(|&step| step > 0) {
        let mut iteration = 1;
        let mut current = step;
        while current < target {
            art.set_nb_lines(current);
            grow(&mut art, budget, &mut progress)?;
            save_svg(&art, args.size, &out_folder.join(format!("{file_name}_{iteration}.svg")))?;
            current += step;
            iteration += 1;
        }
        art.set_nb_lines(target);
    }
    grow(&mut art, budget, &mut progress)?;
    save_svg(&art, args.size, &out_folder.join(format!("{file_name}.svg")))?;

    if let Some(instructions) = art.instructions() {
        fs::write(out_folder.join(format!("{file_name}.txt")), instructions)?;
    }
    let mut indicators = BTreeMap::new();
    art.report(&mut indicators);
    fs::write(
        out_folder.join(format!("{file_name}.json")),
        serde_json::to_string_pretty(&indicators)?,
    )?;
    info!("written to {}", out_folder.display());
    Ok(())
}

fn grow<S: Float>(art: &mut ThreadArt<S>, budget: Duration, progress: &mut Progress) -> Result<()> {
    while art.grow_by(budget, progress)? == Growth::Worked {
        debug!(
            "{} / {} segments, error average {:.3}",
            art.total_segments(),
            art.parameters().nb_lines,
            art.stats().average
        );
    }
    Ok(())
}

fn save_svg<S: Float>(art: &ThreadArt<S>, size: usize, path: &Path) -> Result<()> {
    let grid = art.raster().grid();
    let scale = S::of_usize(size) / S::of_usize(grid.long_side().max(1));
    let mut renderer = SvgRenderer::new(S::of_usize(grid.width) * scale, S::of_usize(grid.height) * scale);
    art.draw_onto(&mut renderer);
    renderer
        .save(path)
        .with_context(|| format!("failed creating {}", path.display()))
}
