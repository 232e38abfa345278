//! Command-line front-end for FLT model files.

use std::error::Error;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};

use flt::config::{AppConfig, LogLevel};
use flt::{LandmarkModel, MarkerHandle, ModelSchema, Point, Scene, read_model, write_model};

/// Face Label Tool - inspect and edit landmark model files
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Log verbosity (error, warn, info, debug, trace)
    #[arg(long, value_name = "LEVEL", global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print every landmark position, group by group
    Print {
        /// Model file
        model: PathBuf,
    },
    /// Validate a model file and summarise its groups
    Check {
        /// Model file
        model: PathBuf,
        /// Photograph the landmarks belong to; positions outside it are reported
        #[arg(long, value_name = "IMAGE")]
        image: Option<PathBuf>,
    },
    /// Scale every position by a factor
    Scale {
        /// Model file
        model: PathBuf,
        /// Scale factor (defaults to the configured scale step)
        factor: Option<f64>,
        /// Output file (prints JSON when omitted)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },
    /// Move a single landmark
    Move {
        /// Model file
        model: PathBuf,
        /// Group label
        label: String,
        /// Point index within the group
        index: usize,
        /// New X coordinate
        x: f64,
        /// New Y coordinate
        y: f64,
        /// Output file (prints JSON when omitted)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },
}

impl Command {
    fn model_path(&self) -> &Path {
        match self {
            Command::Print { model }
            | Command::Check { model, .. }
            | Command::Scale { model, .. }
            | Command::Move { model, .. } => model,
        }
    }
}

fn main() {
    let cli = Cli::parse();
    let mut config = AppConfig::load_from_default_path().unwrap_or_default();

    let level = match cli.log_level.as_deref() {
        Some(name) => LogLevel::from_name(name).unwrap_or_else(|| {
            eprintln!("Unknown log level '{}', using {}", name, config.preferences.log_level.name());
            config.preferences.log_level
        }),
        None => config.preferences.log_level,
    };
    env_logger::Builder::new()
        .filter_level(level.to_level_filter())
        .init();

    if let Err(e) = run(cli.command, &mut config) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(command: Command, config: &mut AppConfig) -> Result<(), Box<dyn Error>> {
    let path = command.model_path().to_path_buf();
    let schema = match read_model(&path) {
        Ok(schema) => schema,
        Err(e) => return Err(format!("cannot load {}: {}", path.display(), e).into()),
    };

    if config.preferences.remember_model_path(&path) {
        if let Err(e) = config.save_to_default_path() {
            log::warn!("Could not save configuration: {}", e);
        }
    }

    let mut model: LandmarkModel = LandmarkModel::default();
    model.load(schema)?;

    match command {
        Command::Print { .. } => print_positions(&model),
        Command::Check { image, .. } => check(&mut model, image.as_deref()),
        Command::Scale { factor, output, .. } => {
            let factor = factor.unwrap_or(config.preferences.scale_step);
            if !model.scale_model(factor) {
                return Err(format!("cannot scale by {}", factor).into());
            }
            emit(&model.to_dict(), output.as_deref())?;
        }
        Command::Move {
            label,
            index,
            x,
            y,
            output,
            ..
        } => {
            let group = model
                .group_by_label(&label)
                .ok_or_else(|| format!("no group labelled '{}'", label))?
                .id();
            let handle = MarkerHandle::new(group, index);
            if !model.move_marker(handle, Point::new(x, y)) {
                return Err(format!("group '{}' has no point {}", label, index).into());
            }
            emit(&model.to_dict(), output.as_deref())?;
        }
    }
    Ok(())
}

fn print_positions(model: &LandmarkModel) {
    for group in model.groups() {
        let points: Vec<String> = group
            .marker_positions()
            .map(|p| format!("[{}, {}]", p.x, p.y))
            .collect();
        println!("{}: {}", group.label().unwrap_or("?"), points.join(" "));
    }
    model.print_positions();
}

fn check(model: &mut LandmarkModel, image: Option<&Path>) {
    if let Some(image) = image {
        // A missing photograph is reported, the model check still runs.
        if let Err(e) = model.scene_mut().set_image(image) {
            println!("Cannot load {}: {}", image.display(), e);
        }
    }

    println!(
        "{} groups, {} points, {} scene items",
        model.group_count(),
        model.point_count(),
        model.scene().item_count()
    );
    for group in model.groups() {
        let extent = group
            .outline()
            .bounding_box()
            .map(|r| format!("{:.1}x{:.1} at ({:.1}, {:.1})", r.width, r.height, r.x, r.y))
            .unwrap_or_else(|| "empty".to_string());
        println!(
            "  {:<16} {:>3} points  {}",
            group.label().unwrap_or("?"),
            group.len(),
            extent
        );
    }

    if model.scene().image().is_some() {
        let outside: Vec<Point> = model
            .get_positions()
            .into_iter()
            .filter(|p| !model.scene().contains_point(p))
            .collect();
        if outside.is_empty() {
            println!("All points lie on the image");
        } else {
            println!("{} points lie outside the image", outside.len());
        }
    }
}

fn emit(schema: &ModelSchema, output: Option<&Path>) -> Result<(), Box<dyn Error>> {
    match output {
        Some(path) => write_model(schema, path)?,
        None => println!("{}", schema.to_json()?),
    }
    Ok(())
}
