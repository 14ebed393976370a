//! Stub collaborators for unit tests.

use std::cell::RefCell;

use image::{DynamicImage, GrayImage, Luma};

use crate::error::{OcrError, PdfError};
use crate::ocr::TextRecognizer;
use crate::pdf::{self, PdfProcessor};

/// In-memory document. Rendered pages are 1x1 images whose pixel value is
/// the page number, so recognizers can tell which page they were given.
pub struct FakePdf {
    pages: Vec<String>,
    rendered: RefCell<Vec<u32>>,
}

impl FakePdf {
    /// Document whose native text layer has the given page texts.
    pub fn with_text(pages: &[&str]) -> Self {
        Self {
            pages: pages.iter().map(|p| p.to_string()).collect(),
            rendered: RefCell::new(Vec::new()),
        }
    }

    /// Document of `pages` image-only pages.
    pub fn scanned(pages: usize) -> Self {
        Self::with_text(&vec![""; pages])
    }

    /// Pages rendered so far, in call order.
    pub fn rendered_pages(&self) -> Vec<u32> {
        self.rendered.borrow().clone()
    }
}

impl PdfProcessor for FakePdf {
    fn page_count(&self) -> u32 {
        self.pages.len() as u32
    }

    fn extract_page_text(&self, page: u32) -> pdf::Result<String> {
        self.pages
            .get((page as usize).wrapping_sub(1))
            .cloned()
            .ok_or(PdfError::InvalidPage(page))
    }

    fn render_page(&self, page: u32, _dpi: u32) -> pdf::Result<DynamicImage> {
        if page == 0 || page > self.page_count() {
            return Err(PdfError::InvalidPage(page));
        }
        self.rendered.borrow_mut().push(page);
        Ok(DynamicImage::ImageLuma8(GrayImage::from_pixel(
            1,
            1,
            Luma([page as u8]),
        )))
    }
}

/// Recognizer that records which pages it saw.
pub struct StubRecognizer {
    pages: Option<Vec<String>>,
    calls: RefCell<Vec<u32>>,
}

impl StubRecognizer {
    /// Recognizes each page as `"page N"`.
    pub fn new() -> Self {
        Self {
            pages: None,
            calls: RefCell::new(Vec::new()),
        }
    }

    /// Recognizes every page as blank.
    pub fn blank() -> Self {
        Self::with_pages(&[])
    }

    /// Recognizes page N as `pages[N - 1]`, or blank past the end.
    pub fn with_pages(pages: &[&str]) -> Self {
        Self {
            pages: Some(pages.iter().map(|p| p.to_string()).collect()),
            calls: RefCell::new(Vec::new()),
        }
    }

    /// Pages recognized so far, in call order.
    pub fn calls(&self) -> Vec<u32> {
        self.calls.borrow().clone()
    }
}

impl TextRecognizer for StubRecognizer {
    fn recognize(&self, image: &DynamicImage) -> Result<String, OcrError> {
        let page = u32::from(image.to_luma8().get_pixel(0, 0).0[0]);
        self.calls.borrow_mut().push(page);

        Ok(match &self.pages {
            None => format!("page {}", page),
            Some(pages) => pages.get(page as usize - 1).cloned().unwrap_or_default(),
        })
    }
}

/// Recognizer that fails the test if it is ever called.
pub struct PanickingRecognizer;

impl TextRecognizer for PanickingRecognizer {
    fn recognize(&self, _image: &DynamicImage) -> Result<String, OcrError> {
        panic!("OCR must not run when the native text layer has text");
    }
}

/// Recognizer standing in for a missing OCR installation.
pub struct UnavailableRecognizer;

impl TextRecognizer for UnavailableRecognizer {
    fn recognize(&self, _image: &DynamicImage) -> Result<String, OcrError> {
        Err(OcrError::ModelLoad("no models installed".to_string()))
    }
}
