//! OCR fallback for scanned statements.

mod engine;
#[cfg(feature = "native")]
mod pure_engine;

pub use engine::LazyOcrEngine;
#[cfg(feature = "native")]
pub use pure_engine::PureOcrEngine;

use image::DynamicImage;
use serde::{Deserialize, Serialize};

use crate::error::OcrError;

/// Anything that turns a page image into text.
pub trait TextRecognizer {
    /// Recognize all text on the image, in reading order.
    fn recognize(&self, image: &DynamicImage) -> Result<String, OcrError>;
}

impl<R: TextRecognizer + ?Sized> TextRecognizer for &R {
    fn recognize(&self, image: &DynamicImage) -> Result<String, OcrError> {
        (**self).recognize(image)
    }
}

/// A detected text box with its coordinates and content.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextBox {
    /// Bounding box coordinates (x1, y1, x2, y2, x3, y3, x4, y4) for quadrilateral.
    pub bbox: [f32; 8],

    /// Recognized text content.
    pub text: String,

    /// Confidence score (0.0 - 1.0).
    pub confidence: f32,
}

impl TextBox {
    /// Get the axis-aligned bounding rectangle.
    pub fn rect(&self) -> (f32, f32, f32, f32) {
        let xs = [self.bbox[0], self.bbox[2], self.bbox[4], self.bbox[6]];
        let ys = [self.bbox[1], self.bbox[3], self.bbox[5], self.bbox[7]];

        let min_x = xs.iter().cloned().fold(f32::INFINITY, f32::min);
        let max_x = xs.iter().cloned().fold(f32::NEG_INFINITY, f32::max);
        let min_y = ys.iter().cloned().fold(f32::INFINITY, f32::min);
        let max_y = ys.iter().cloned().fold(f32::NEG_INFINITY, f32::max);

        (min_x, min_y, max_x, max_y)
    }
}

/// Result of OCR processing on an image.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OcrResult {
    /// Detected and recognized text boxes.
    pub boxes: Vec<TextBox>,

    /// Full text, one statement row per line.
    pub text: String,

    /// Processing time in milliseconds.
    pub processing_time_ms: u64,

    /// Image dimensions (width, height).
    pub image_size: (u32, u32),
}

/// Vertical distance (pixels) within which boxes count as the same row.
const ROW_TOLERANCE: f32 = 20.0;

impl OcrResult {
    /// Create an empty result.
    pub fn empty(width: u32, height: u32) -> Self {
        Self {
            boxes: Vec::new(),
            text: String::new(),
            processing_time_ms: 0,
            image_size: (width, height),
        }
    }

    /// Sort boxes by reading order and rebuild `text`.
    ///
    /// Boxes on the same row are joined with a space so that a statement row
    /// (date, card, concept, amounts) comes out as one line.
    pub fn sort_by_reading_order(&mut self) {
        self.boxes.sort_by(|a, b| {
            let (ax, ay, _, _) = a.rect();
            let (bx, by, _, _) = b.rect();

            let row_a = (ay / ROW_TOLERANCE) as i32;
            let row_b = (by / ROW_TOLERANCE) as i32;

            row_a
                .cmp(&row_b)
                .then(ax.partial_cmp(&bx).unwrap_or(std::cmp::Ordering::Equal))
        });

        let mut lines: Vec<String> = Vec::new();
        let mut current_row = None;
        for text_box in &self.boxes {
            let (_, y, _, _) = text_box.rect();
            let row = (y / ROW_TOLERANCE) as i32;
            match lines.last_mut() {
                Some(line) if current_row == Some(row) => {
                    line.push(' ');
                    line.push_str(&text_box.text);
                }
                _ => lines.push(text_box.text.clone()),
            }
            current_row = Some(row);
        }

        self.text = lines.join("\n");
    }
}
