use clap::{Parser, Subcommand};
use color_eyre::eyre::Result;
use std::path::{Path, PathBuf};
use tibeb::{
    PatternGenerator, PatternLibrary, StudioCommand, StudioOutput,
    io::save_pattern_text,
};
use tibeb_cli::{Overrides, emit, export_dir, load_config, load_studio, save_edited};
use tracing::info;
use tracing_subscriber::{self, EnvFilter};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Pipeline configuration file (.toml or .json)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Turn a border photo into a symbolic grid code
    Code {
        /// Path to the JPEG/PNG photo
        image: PathBuf,
        /// Downsample factor
        #[arg(long)]
        scale: Option<u32>,
        /// Bottom fraction of the photo holding the border band
        #[arg(long)]
        fraction: Option<f64>,
        /// Write the code here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Turn a border photo into a schematic SVG diagram
    Vector {
        /// Path to the JPEG/PNG photo
        image: PathBuf,
        /// Bottom fraction of the photo holding the border band
        #[arg(long)]
        fraction: Option<f64>,
        /// Write the SVG here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Print the classified shapes found in a border photo
    Shapes {
        /// Path to the JPEG/PNG photo
        image: PathBuf,
    },
    /// Browse and export the sample pattern library
    Library {
        #[command(subcommand)]
        action: LibraryAction,
    },
    /// Generate a random mirrored pattern
    Generate {
        #[arg(long)]
        rows: usize,
        #[arg(long)]
        columns: usize,
        /// Seed for reproducible output
        #[arg(long)]
        seed: Option<u64>,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Write a library pattern out as a template, or save an edited pattern
    Edit {
        /// Library pattern to start from
        #[arg(required_unless_present_any = ["from", "stdin"])]
        name: Option<String>,
        /// Save the edited pattern in this file instead of a template
        #[arg(long, conflicts_with_all = ["name", "stdin"])]
        from: Option<PathBuf>,
        /// Save the edited pattern read from stdin
        #[arg(long, conflicts_with = "name")]
        stdin: bool,
        #[arg(short, long)]
        output: PathBuf,
    },
    /// List studio commands and their JSON schema
    Commands,
}

#[derive(Subcommand)]
enum LibraryAction {
    /// List pattern names
    List,
    /// Print one pattern
    Show { name: String },
    /// Save one pattern as text, or as PDF with --pdf
    Export {
        name: String,
        #[arg(long)]
        pdf: bool,
        /// Directory to save into
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    color_eyre::install()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info"))
        )
        .init();

    let cli = Cli::parse();
    let config = cli.config.as_deref();

    match &cli.command {
        Commands::Code { image, scale, fraction, output } => {
            let overrides = Overrides { crop_fraction: *fraction, scale: *scale };
            let output_text = run_studio(config, overrides, image, StudioCommand::GridCode { scale: None })?;
            emit(&output_text, output.as_deref())?;
        }
        Commands::Vector { image, fraction, output } => {
            let overrides = Overrides { crop_fraction: *fraction, scale: None };
            let svg = run_studio(config, overrides, image, StudioCommand::VectorDiagram)?;
            emit(&svg, output.as_deref())?;
        }
        Commands::Shapes { image } => {
            let table = run_studio(config, Overrides::default(), image, StudioCommand::ClassifyShapes)?;
            emit(&table, None)?;
        }
        Commands::Library { action } => library(action)?,
        Commands::Generate { rows, columns, seed, output } => {
            let pattern = match seed {
                Some(seed) => PatternGenerator::with_seed(*seed).generate(*rows, *columns)?,
                None => PatternGenerator::from_os_rng().generate(*rows, *columns)?,
            };
            match output {
                Some(path) => save_pattern_text(path, &pattern)?,
                None => emit(&pattern, None)?,
            }
        }
        Commands::Edit { name: Some(name), output, .. } => {
            let pattern = PatternLibrary.get(name)?;
            save_pattern_text(output, pattern.code)?;
            info!("Template '{}' ready for editing at {:?}", pattern.name, output);
        }
        Commands::Edit { name: None, from, output, .. } => {
            save_edited(from.as_deref(), output)?;
            info!("Saved custom pattern to {:?}", output);
        }
        Commands::Commands => {
            for name in StudioCommand::command_names() {
                println!("{name}");
            }
            println!("{}", serde_json::to_string_pretty(&StudioCommand::schema())?);
        }
    }

    Ok(())
}

fn run_studio(
    config: Option<&Path>,
    overrides: Overrides,
    image: &Path,
    command: StudioCommand,
) -> Result<String> {
    let config = load_config(config, overrides)?;
    let studio = load_studio(&config, image)?;

    info!("{} on {:?}: {}", command, image, command.description());
    let output = studio.execute(&command)?;
    if let StudioOutput::Shapes(shapes) = &output {
        info!("Found {} shapes", shapes.len());
    }
    Ok(output.to_text())
}

fn library(action: &LibraryAction) -> Result<()> {
    match action {
        LibraryAction::List => {
            for name in PatternLibrary.names() {
                println!("{name}");
            }
        }
        LibraryAction::Show { name } => {
            let pattern = PatternLibrary.get(name)?;
            println!("{}", pattern.code);
        }
        LibraryAction::Export { name, pdf, output } => {
            let pattern = PatternLibrary.get(name)?;
            let dir = export_dir(output.as_deref())?;
            let path = if *pdf {
                pattern.save_pdf_in(&dir)?
            } else {
                pattern.save_text_in(&dir)?
            };
            info!("Exported '{}' to {:?}", pattern.name, path);
        }
    }
    Ok(())
}
