//! PDF text extraction and page rasterization using lopdf and pdf-extract.

use std::cell::OnceCell;
use std::fs;
use std::path::Path;

use image::{DynamicImage, GrayImage, ImageBuffer, Luma, Rgb};
use lopdf::{Document, Object, ObjectId, Stream};
use tracing::{debug, trace};

use super::{join_pages, PdfProcessor, Result};
use crate::error::PdfError;

/// Page size used when a page carries no usable `MediaBox` (A4, in points).
const DEFAULT_MEDIA_BOX: (f32, f32) = (595.0, 842.0);

/// Guard against cyclic `Parent` chains in malformed page trees.
const MAX_TREE_DEPTH: u8 = 32;

/// PDF document backed by lopdf, with text decoded by pdf-extract.
pub struct PdfExtractor {
    document: Document,
    raw_data: Vec<u8>,
    page_texts: OnceCell<Vec<String>>,
}

/// Images found on one page.
#[derive(Default)]
struct PageImages {
    decoded: Vec<DynamicImage>,
    undecodable: usize,
}

impl PdfExtractor {
    /// Read and parse a PDF file.
    pub fn open(path: &Path) -> Result<Self> {
        let data = fs::read(path).map_err(|source| PdfError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        debug!("Read {} bytes from {}", data.len(), path.display());
        Self::from_bytes(&data)
    }

    /// Parse a PDF from bytes.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let mut doc = Document::load_mem(data).map_err(|e| PdfError::Parse(e.to_string()))?;

        // Statements are sometimes "encrypted" with an empty user password
        let raw_data = if doc.is_encrypted() {
            if doc.decrypt("").is_err() {
                return Err(PdfError::Encrypted);
            }
            debug!("Decrypted PDF with empty password");

            // pdf-extract reads the bytes itself, so hand it the decrypted copy
            let mut decrypted = Vec::new();
            doc.save_to(&mut decrypted)
                .map_err(|e| PdfError::Parse(format!("failed to save decrypted PDF: {}", e)))?;
            decrypted
        } else {
            data.to_vec()
        };

        let page_count = doc.get_pages().len();
        if page_count == 0 {
            return Err(PdfError::NoPages);
        }

        debug!("Loaded PDF with {} pages", page_count);
        Ok(Self {
            document: doc,
            raw_data,
            page_texts: OnceCell::new(),
        })
    }

    /// Native text of every page, decoded once and cached.
    fn page_texts(&self) -> Result<&[String]> {
        if let Some(texts) = self.page_texts.get() {
            return Ok(texts);
        }

        let texts = pdf_extract::extract_text_from_mem_by_pages(&self.raw_data)
            .map_err(|e| PdfError::TextExtraction(e.to_string()))?;
        debug!(
            "Decoded text layer: {} pages, {} chars",
            texts.len(),
            texts.iter().map(|t| t.len()).sum::<usize>()
        );

        Ok(self.page_texts.get_or_init(|| texts))
    }

    fn page_id(&self, page: u32) -> Result<ObjectId> {
        self.document
            .get_pages()
            .get(&page)
            .copied()
            .ok_or(PdfError::InvalidPage(page))
    }

    /// Collect the image XObjects referenced by a page's (inherited) resources.
    fn page_images(&self, page_id: ObjectId) -> PageImages {
        let doc = &self.document;
        let mut images = PageImages::default();

        let Some(resources) = inherited(doc, page_id, b"Resources", 0).and_then(|o| o.as_dict().ok())
        else {
            return images;
        };
        let Ok(xobjects) = resources.get(b"XObject") else {
            return images;
        };
        let Ok((_, Object::Dictionary(xobj_dict))) = doc.dereference(xobjects) else {
            return images;
        };

        for (name, obj_ref) in xobj_dict.iter() {
            let Ok((_, Object::Stream(stream))) = doc.dereference(obj_ref) else {
                continue;
            };
            let is_image = stream
                .dict
                .get(b"Subtype")
                .and_then(|s| s.as_name())
                .map(|s| s == b"Image")
                .unwrap_or(false);
            if !is_image {
                continue;
            }

            match decode_image(doc, stream) {
                Some(img) => {
                    trace!(
                        "Decoded image /{}: {}x{}",
                        String::from_utf8_lossy(name),
                        img.width(),
                        img.height()
                    );
                    images.decoded.push(img);
                }
                None => images.undecodable += 1,
            }
        }

        images
    }

    /// Page size in points, from the inherited `MediaBox`.
    fn page_size(&self, page_id: ObjectId) -> (f32, f32) {
        let doc = &self.document;
        let corners: Option<Vec<f32>> = inherited(doc, page_id, b"MediaBox", 0)
            .and_then(|o| o.as_array().ok())
            .map(|arr| {
                arr.iter()
                    .filter_map(|o| doc.dereference(o).ok())
                    .filter_map(|(_, o)| o.as_float().ok())
                    .collect()
            });

        match corners.as_deref() {
            Some([x0, y0, x1, y1]) if (x1 - x0).abs() > 0.0 && (y1 - y0).abs() > 0.0 => {
                ((x1 - x0).abs(), (y1 - y0).abs())
            }
            _ => DEFAULT_MEDIA_BOX,
        }
    }
}

impl PdfProcessor for PdfExtractor {
    fn page_count(&self) -> u32 {
        self.document.get_pages().len() as u32
    }

    fn extract_page_text(&self, page: u32) -> Result<String> {
        self.page_id(page)?;
        let texts = self.page_texts()?;
        Ok(texts.get(page as usize - 1).cloned().unwrap_or_default())
    }

    fn extract_text(&self) -> Result<String> {
        Ok(join_pages(self.page_texts()?))
    }

    fn render_page(&self, page: u32, dpi: u32) -> Result<DynamicImage> {
        let page_id = self.page_id(page)?;
        let images = self.page_images(page_id);

        // A scanned page is one full-page image; overlays and logos are smaller
        let largest = images
            .decoded
            .into_iter()
            .max_by_key(|img| u64::from(img.width()) * u64::from(img.height()));
        if let Some(image) = largest {
            debug!("Page {}: using embedded {}x{} image", page, image.width(), image.height());
            return Ok(image);
        }

        if images.undecodable > 0 {
            return Err(PdfError::ImageExtraction(format!(
                "page {} has {} image(s) in unsupported encodings",
                page, images.undecodable
            )));
        }

        let (width_pt, height_pt) = self.page_size(page_id);
        let scale = dpi.max(1) as f32 / 72.0;
        let width = ((width_pt * scale).round() as u32).max(1);
        let height = ((height_pt * scale).round() as u32).max(1);
        debug!("Page {}: no images, rendering blank {}x{} canvas", page, width, height);

        Ok(DynamicImage::ImageLuma8(GrayImage::from_pixel(
            width,
            height,
            Luma([255]),
        )))
    }
}

/// Look up a page attribute, walking up the page tree for inherited keys.
fn inherited<'a>(doc: &'a Document, node_id: ObjectId, key: &[u8], depth: u8) -> Option<&'a Object> {
    if depth > MAX_TREE_DEPTH {
        return None;
    }
    let dict = doc.get_object(node_id).ok()?.as_dict().ok()?;

    if let Ok(value) = dict.get(key) {
        return doc.dereference(value).ok().map(|(_, obj)| obj);
    }

    match dict.get(b"Parent") {
        Ok(Object::Reference(parent_id)) => inherited(doc, *parent_id, key, depth + 1),
        _ => None,
    }
}

/// Decode an image XObject, or `None` if its encoding is unsupported.
fn decode_image(doc: &Document, stream: &Stream) -> Option<DynamicImage> {
    let dict = &stream.dict;
    let width = u32::try_from(dict.get(b"Width").ok()?.as_i64().ok()?).ok()?;
    let height = u32::try_from(dict.get(b"Height").ok()?.as_i64().ok()?).ok()?;
    if width == 0 || height == 0 {
        return None;
    }

    let filter_name = dict.get(b"Filter").ok().and_then(|filter| match filter {
        Object::Name(name) => Some(name.as_slice()),
        Object::Array(arr) => arr.last().and_then(|o| o.as_name().ok()),
        _ => None,
    });

    match filter_name {
        Some(b"DCTDecode") => {
            trace!("Decoding JPEG image {}x{}", width, height);
            return image::load_from_memory_with_format(&stream.content, image::ImageFormat::Jpeg)
                .ok();
        }
        Some(b"JPXDecode") | Some(b"CCITTFaxDecode") | Some(b"JBIG2Decode") => {
            trace!("Unsupported image filter: {:?}", filter_name.map(String::from_utf8_lossy));
            return None;
        }
        _ => {}
    }

    let data = stream
        .decompressed_content()
        .unwrap_or_else(|_| stream.content.clone());

    let components = dict
        .get(b"ColorSpace")
        .ok()
        .and_then(|cs| color_components(doc, cs))
        .unwrap_or(3);
    let bits = dict
        .get(b"BitsPerComponent")
        .ok()
        .and_then(|o| o.as_i64().ok())
        .unwrap_or(8);

    trace!(
        "Raw image {}x{}: {} components, {} bits, {} bytes",
        width,
        height,
        components,
        bits,
        data.len()
    );

    let pixels = (width as usize).checked_mul(height as usize)?;
    match (components, bits) {
        (1, 8) if data.len() >= pixels => {
            ImageBuffer::<Luma<u8>, _>::from_raw(width, height, data[..pixels].to_vec())
                .map(DynamicImage::ImageLuma8)
        }
        (3, 8) => {
            let len = pixels.checked_mul(3)?;
            if data.len() < len {
                return None;
            }
            ImageBuffer::<Rgb<u8>, _>::from_raw(width, height, data[..len].to_vec())
                .map(DynamicImage::ImageRgb8)
        }
        (1, 1) => unpack_bilevel(&data, width, height).map(DynamicImage::ImageLuma8),
        _ => None,
    }
}

/// Number of color components for a color space, resolving `ICCBased` streams.
fn color_components(doc: &Document, color_space: &Object) -> Option<u8> {
    let (_, color_space) = doc.dereference(color_space).ok()?;
    let (name, params) = match color_space {
        Object::Name(name) => (name.as_slice(), None),
        Object::Array(arr) => (arr.first()?.as_name().ok()?, arr.get(1)),
        _ => return None,
    };

    match name {
        b"DeviceGray" | b"G" | b"CalGray" => Some(1),
        b"DeviceRGB" | b"RGB" | b"CalRGB" => Some(3),
        b"ICCBased" => {
            let (_, profile) = doc.dereference(params?).ok()?;
            let n = profile.as_stream().ok()?.dict.get(b"N").ok()?.as_i64().ok()?;
            u8::try_from(n).ok()
        }
        _ => None,
    }
}

/// Expand 1-bit samples (rows padded to a byte, 1 = white) to 8-bit gray.
fn unpack_bilevel(data: &[u8], width: u32, height: u32) -> Option<GrayImage> {
    let row_bytes = (width as usize).div_ceil(8);
    if data.len() < row_bytes.checked_mul(height as usize)? {
        return None;
    }

    Some(GrayImage::from_fn(width, height, |x, y| {
        let byte = data[y as usize * row_bytes + x as usize / 8];
        let bit = (byte >> (7 - (x % 8))) & 1;
        Luma([if bit == 1 { 255 } else { 0 }])
    }))
}
