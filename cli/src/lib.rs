use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use thiserror::Error;
use tibeb::{PatternStudio, PipelineConfig, TibebError, io::save_pattern_text};
use tracing::info;

#[derive(Error, Debug)]
pub enum CliError {
    #[error(transparent)]
    Tibeb(#[from] TibebError),
    #[error(transparent)]
    IoError(#[from] std::io::Error),
    #[error("Output directory {0} does not exist")]
    MissingOutputDir(PathBuf),
}

/// Per-invocation overrides layered on top of the loaded configuration
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Overrides {
    pub crop_fraction: Option<f64>,
    pub scale: Option<u32>,
}

/// Load the pipeline configuration, falling back to the defaults when no
/// file is given, then apply command-line overrides and validate the result
pub fn load_config(path: Option<&Path>, overrides: Overrides) -> Result<PipelineConfig, CliError> {
    let mut config = match path {
        Some(path) => {
            info!("Loading configuration from {:?}", path);
            PipelineConfig::from_file(path)?
        }
        None => PipelineConfig::default(),
    };

    if let Some(fraction) = overrides.crop_fraction {
        config.crop_fraction = fraction;
    }
    if let Some(scale) = overrides.scale {
        config.grid.scale = scale;
    }

    config.validate()?;
    Ok(config)
}

/// Build a studio for `config` and load the photo at `image`.
///
/// The file is read as raw bytes and decoded the same way as an upload, so a
/// file that is not a JPEG/PNG is reported as invalid input.
pub fn load_studio(config: &PipelineConfig, image: &Path) -> Result<PatternStudio, CliError> {
    let mut studio = PatternStudio::with_config(config)?;
    let bytes = fs::read(image)?;
    studio.load_image_from_bytes(&bytes)?;
    Ok(studio)
}

/// Save an edited pattern read from `reader`, normalizing its line endings
pub fn save_edited_from<R: Read>(mut reader: R, output: &Path) -> Result<(), CliError> {
    let mut edited = String::new();
    reader.read_to_string(&mut edited)?;
    save_pattern_text(output, &edited)?;
    Ok(())
}

/// Save an edited pattern from `source`, or from stdin when no file is given
pub fn save_edited(source: Option<&Path>, output: &Path) -> Result<(), CliError> {
    match source {
        Some(path) => save_edited_from(fs::File::open(path)?, output),
        None => save_edited_from(io::stdin().lock(), output),
    }
}

/// Write `content` to `output`, or print it to stdout when no path is given
pub fn emit(content: &str, output: Option<&Path>) -> Result<(), CliError> {
    match output {
        Some(path) => {
            fs::write(path, content)?;
            info!("Wrote {:?}", path);
        }
        None => println!("{content}"),
    }
    Ok(())
}

/// Resolve the export directory, defaulting to the working directory
pub fn export_dir(dir: Option<&Path>) -> Result<PathBuf, CliError> {
    let dir = dir.map_or_else(|| PathBuf::from("."), Path::to_path_buf);
    if !dir.is_dir() {
        return Err(CliError::MissingOutputDir(dir));
    }
    Ok(dir)
}
