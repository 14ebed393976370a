//! OCR engine that loads its models on first use.

use std::cell::OnceCell;

use image::DynamicImage;

use crate::error::OcrError;
use crate::models::config::OcrConfig;

use super::TextRecognizer;

#[cfg(feature = "native")]
use super::PureOcrEngine;

/// Recognizer that defers model loading until the first page is recognized.
///
/// Statements with a native text layer never reach OCR, so they never pay
/// for (or fail on) loading the models.
pub struct LazyOcrEngine {
    config: OcrConfig,
    #[cfg(feature = "native")]
    engine: OnceCell<PureOcrEngine>,
    #[cfg(not(feature = "native"))]
    engine: OnceCell<()>,
}

impl LazyOcrEngine {
    /// Create an engine for the given configuration. Nothing is loaded yet.
    pub fn new(config: OcrConfig) -> Self {
        Self {
            config,
            engine: OnceCell::new(),
        }
    }

    /// Whether the models have been loaded.
    pub fn is_loaded(&self) -> bool {
        self.engine.get().is_some()
    }

    #[cfg(feature = "native")]
    fn engine(&self) -> Result<&PureOcrEngine, OcrError> {
        if let Some(engine) = self.engine.get() {
            return Ok(engine);
        }
        let engine = PureOcrEngine::from_config(&self.config)?;
        Ok(self.engine.get_or_init(|| engine))
    }
}

impl TextRecognizer for LazyOcrEngine {
    #[cfg(feature = "native")]
    fn recognize(&self, image: &DynamicImage) -> Result<String, OcrError> {
        self.engine()?.recognize(image)
    }

    #[cfg(not(feature = "native"))]
    fn recognize(&self, _image: &DynamicImage) -> Result<String, OcrError> {
        Err(OcrError::Unavailable(format!(
            "built without the `native` feature (models at {} not used)",
            self.config.model_dir.display()
        )))
    }
}
