use std::{path::Path, sync::Arc};

use image::DynamicImage;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoStaticStr, VariantNames};

use crate::{
    config::{GridConfig, PipelineConfig},
    error::{Result, TibebError},
    pipeline::Pipeline,
    render::{GridRenderer, SymbolicGrid, VectorDiagram},
    types::ClassifiedShape,
};

#[derive(
    Debug, Clone,
    Serialize, Deserialize, JsonSchema,
    Display, EnumString, EnumIter, VariantNames, IntoStaticStr,
    PartialEq
)]
#[serde(tag = "type", content = "params")]
#[strum(serialize_all = "snake_case")]
pub enum StudioCommand {
    /// Turn the border band into a symbolic grid code
    #[serde(rename = "grid_code")]
    GridCode {
        /// Downsample factor; defaults to the configured scale
        #[schemars(range(min = 1, max = 100))]
        scale: Option<u32>,
    },

    /// Classify the shapes found in the border band
    #[serde(rename = "classify_shapes")]
    ClassifyShapes,

    /// Draw the classified shapes as a schematic vector diagram
    #[serde(rename = "vector_diagram")]
    VectorDiagram,
}

impl StudioCommand {
    /// Get the JSON schema for all commands
    pub fn schema() -> schemars::schema::RootSchema {
        schemars::schema_for!(StudioCommand)
    }

    /// Get a list of all available command names
    pub fn command_names() -> &'static [&'static str] {
        <Self as VariantNames>::VARIANTS
    }

    /// Get a description of the command
    pub fn description(&self) -> &'static str {
        match self {
            Self::GridCode { .. } => "Downsample the border band into an X/space symbolic grid code",
            Self::ClassifyShapes => "Classify border motifs as triangle, square, circle or cross",
            Self::VectorDiagram => "Draw one schematic primitive per classified motif, left to right",
        }
    }

    /// Get parameter requirements for the command
    pub fn parameters_info(&self) -> Vec<(&'static str, &'static str, bool)> {
        match self {
            Self::GridCode { .. } => vec![
                ("scale", "Downsample factor (1-100, higher = coarser grid)", false)
            ],
            Self::ClassifyShapes => vec![],
            Self::VectorDiagram => vec![],
        }
    }
}

/// What a studio command produced
#[derive(Debug, Clone)]
pub enum StudioOutput {
    Grid(SymbolicGrid),
    Shapes(Vec<ClassifiedShape>),
    Diagram(VectorDiagram),
}

impl StudioOutput {
    /// Text form: the grid code, a shape table, or the SVG document
    pub fn to_text(&self) -> String {
        match self {
            Self::Grid(grid) => grid.to_code(),
            Self::Shapes(shapes) => shapes
                .iter()
                .map(|shape| {
                    format!(
                        "{:<8} x={:<5} area={:.1}",
                        shape.tag().to_string(),
                        shape.bounding_box.x,
                        shape.area
                    )
                })
                .collect::<Vec<_>>()
                .join("\n"),
            Self::Diagram(diagram) => diagram.to_svg_string(),
        }
    }
}

/// Holds one uploaded photo and runs studio commands against it
#[derive(Clone)]
pub struct PatternStudio {
    image: Option<DynamicImage>,
    pipeline: Arc<Pipeline>,
    grid: GridConfig,
}

impl PatternStudio {
    pub fn new() -> Self {
        Self {
            image: None,
            pipeline: Arc::new(Pipeline::default()),
            grid: GridConfig::default(),
        }
    }

    /// Create a studio whose pipeline follows `config`
    pub fn with_config(config: &PipelineConfig) -> Result<Self> {
        Ok(Self {
            image: None,
            pipeline: Arc::new(Pipeline::from_config(config)?),
            grid: config.grid.clone(),
        })
    }

    /// Load a photo from file
    pub fn load_image<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        self.image = Some(image::open(path)?);
        Ok(())
    }

    /// Load a photo from an uploaded buffer
    pub fn load_image_from_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        self.image = Some(Pipeline::decode(bytes)?);
        Ok(())
    }

    /// Set the photo directly
    pub fn set_image(&mut self, image: DynamicImage) {
        self.image = Some(image);
    }

    pub fn pipeline(&self) -> &Pipeline {
        &self.pipeline
    }

    pub fn execute(&self, command: &StudioCommand) -> Result<StudioOutput> {
        let image = self.image.as_ref()
            .ok_or(TibebError::NoImageLoaded)?;
        let binary = self.pipeline.prepare(image)?;

        match command {
            StudioCommand::GridCode { scale: None } => {
                Ok(StudioOutput::Grid(self.pipeline.grid_code(&binary)?))
            }
            StudioCommand::GridCode { scale: Some(scale) } => {
                let renderer = GridRenderer::new(GridConfig {
                    scale: *scale,
                    ..self.grid.clone()
                });
                Ok(StudioOutput::Grid(renderer.render(&binary)?))
            }
            StudioCommand::ClassifyShapes => {
                Ok(StudioOutput::Shapes(self.pipeline.classify_binary(&binary)?))
            }
            StudioCommand::VectorDiagram => {
                let shapes = self.pipeline.classify_binary(&binary)?;
                Ok(StudioOutput::Diagram(self.pipeline.diagram(&shapes)))
            }
        }
    }
}

impl Default for PatternStudio {
    fn default() -> Self {
        Self::new()
    }
}
