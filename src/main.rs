use std::path::PathBuf;

use anyhow::Context;
use annokit::commands::{self, ImageSpec};
use annokit::{init_logging, Config};
use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "annokit")]
#[command(version, about = "Measure, render and combine image annotation shapes")]
struct Cli {
    /// Configuration file (JSON or TOML)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args, Debug)]
struct ImageArgs {
    /// Image width in pixels
    #[arg(long)]
    image_width: f64,

    /// Image height in pixels
    #[arg(long)]
    image_height: f64,

    /// Microns per image pixel
    #[arg(long, default_value_t = 1.0)]
    mpp: f64,
}

impl From<&ImageArgs> for ImageSpec {
    fn from(args: &ImageArgs) -> Self {
        ImageSpec {
            width: args.image_width,
            height: args.image_height,
            microns_per_pixel: args.mpp,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print id, type, area and perimeter of every shape
    Summary {
        shapes: PathBuf,
        #[command(flatten)]
        image: ImageArgs,
        /// Decimal places (defaults to the configured precision)
        #[arg(long)]
        decimals: Option<u32>,
    },
    /// Rasterize the shapes to a PNG
    Render {
        shapes: PathBuf,
        #[command(flatten)]
        image: ImageArgs,
        #[arg(long, short = 'o', value_name = "PNG")]
        output: PathBuf,
        #[arg(long, default_value_t = 1.0)]
        zoom: f64,
    },
    /// Merge shape B into shape A and print the resulting document
    Merge {
        shapes: PathBuf,
        a: String,
        b: String,
        #[command(flatten)]
        image: ImageArgs,
    },
}

fn load_config(path: Option<&PathBuf>) -> anyhow::Result<Config> {
    match path {
        Some(path) => Config::load_from_file(path)
            .with_context(|| format!("Failed to load config {}", path.display())),
        None => Ok(Config::load_or_default()),
    }
}

fn main() -> anyhow::Result<()> {
    init_logging()?;

    let cli = Cli::parse();
    let config = load_config(cli.config.as_ref())?;

    match &cli.command {
        Command::Summary {
            shapes,
            image,
            decimals,
        } => {
            let controller = commands::load_shapes(shapes, image.into(), &config)?;
            for line in commands::summary(&controller, &config, *decimals) {
                println!("{}", line);
            }
        }
        Command::Render {
            shapes,
            image,
            output,
            zoom,
        } => {
            let controller = commands::load_shapes(shapes, image.into(), &config)?;
            commands::render(&controller, image.into(), *zoom, output)?;
        }
        Command::Merge {
            shapes,
            a,
            b,
            image,
        } => {
            let mut controller = commands::load_shapes(shapes, image.into(), &config)?;
            println!("{}", commands::merge(&mut controller, a, b)?);
        }
    }

    Ok(())
}
