use crate::{
    pipeline::Pipeline,
    traits::{ImagePreprocessor, ContourExtractor, ShapeClassifier},
    algorithms::{
        ImageprocContourExtractor,
        HeuristicShapeClassifier,
        GaussianBlurPreprocessor,
        CannyEdgePreprocessor,
        ThresholdPreprocessor,
    },
    config::{GridConfig, LayoutConfig, PipelineConfig},
    render::GridRenderer,
};

/// Builder for creating processing pipelines with a fluent API
pub struct PipelineBuilder {
    crop_fraction: f64,
    preprocessors: Vec<Box<dyn ImagePreprocessor>>,
    contour_extractor: Option<Box<dyn ContourExtractor>>,
    classifier: Option<Box<dyn ShapeClassifier>>,
    grid: GridConfig,
    layout: LayoutConfig,
}

impl PipelineBuilder {
    /// Create a new pipeline builder with no preprocessors
    pub fn new() -> Self {
        Self {
            crop_fraction: PipelineConfig::default().crop_fraction,
            preprocessors: Vec::new(),
            contour_extractor: None,
            classifier: None,
            grid: GridConfig::default(),
            layout: LayoutConfig::default(),
        }
    }

    /// Standard blur → edges → threshold chain with every constant taken
    /// from `config`
    pub fn from_config(config: &PipelineConfig) -> Self {
        Self::new()
            .with_crop_fraction(config.crop_fraction)
            .add_preprocessor(GaussianBlurPreprocessor { sigma: config.blur_sigma })
            .add_preprocessor(CannyEdgePreprocessor {
                low_threshold: config.canny_low,
                high_threshold: config.canny_high,
            })
            .add_preprocessor(ThresholdPreprocessor { threshold: config.binarize_threshold })
            .set_classifier(HeuristicShapeClassifier::new(config.classifier.clone()))
            .with_grid(config.grid.clone())
            .with_layout(config.layout.clone())
    }

    /// Fraction of the image height, from the bottom, to keep
    pub fn with_crop_fraction(mut self, fraction: f64) -> Self {
        self.crop_fraction = fraction;
        self
    }

    /// Add a preprocessor to the pipeline
    pub fn add_preprocessor<P>(mut self, preprocessor: P) -> Self
    where
        P: ImagePreprocessor + 'static,
    {
        self.preprocessors.push(Box::new(preprocessor));
        self
    }

    /// Set the contour extractor (replaces any existing one)
    pub fn set_contour_extractor<E>(mut self, extractor: E) -> Self
    where
        E: ContourExtractor + 'static,
    {
        self.contour_extractor = Some(Box::new(extractor));
        self
    }

    /// Set the shape classifier (replaces any existing one)
    pub fn set_classifier<C>(mut self, classifier: C) -> Self
    where
        C: ShapeClassifier + 'static,
    {
        self.classifier = Some(Box::new(classifier));
        self
    }

    pub fn with_grid(mut self, grid: GridConfig) -> Self {
        self.grid = grid;
        self
    }

    pub fn with_layout(mut self, layout: LayoutConfig) -> Self {
        self.layout = layout;
        self
    }

    /// Build the pipeline with default components if not specified
    pub fn build(self) -> Pipeline {
        let contour_extractor = self.contour_extractor
            .unwrap_or_else(|| Box::new(ImageprocContourExtractor));

        let classifier = self.classifier
            .unwrap_or_else(|| Box::new(HeuristicShapeClassifier::default()));

        Pipeline::new(
            self.crop_fraction,
            self.preprocessors,
            contour_extractor,
            classifier,
            GridRenderer::new(self.grid),
            self.layout,
        )
    }

    /// Build a pipeline over the whole image that binarizes with a plain
    /// threshold instead of edge detection; suited to clean, high-contrast
    /// artwork rather than photos
    pub fn build_threshold_only(threshold: u8) -> Pipeline {
        Self::new()
            .with_crop_fraction(1.0)
            .add_preprocessor(ThresholdPreprocessor { threshold })
            .build()
    }
}

impl Default for PipelineBuilder {
    fn default() -> Self {
        Self::new()
    }
}
