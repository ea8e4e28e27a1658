//! Paged document output
//!
//! [`DocumentBuilder`] and [`PagedDocument`] are the capability traits the
//! assembler writes through. [`PrintPdfBuilder`] produces an image-only PDF
//! with printpdf: one image XObject per placement.

use crate::constants::mm_to_pt;
use crate::raster::Bitmap;
use crate::types::{PageGeometry, ResumeError, Result};
use printpdf::*;
use std::future::Future;
use std::path::Path;

/// Where an image goes on a page, in millimeters from the top-left corner
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlacementRect {
    pub x_mm: f32,
    pub y_mm: f32,
    pub width_mm: f32,
    pub height_mm: f32,
}

impl PlacementRect {
    /// The whole page
    pub fn full_page(geometry: &PageGeometry) -> Self {
        Self {
            x_mm: 0.0,
            y_mm: 0.0,
            width_mm: geometry.width_mm(),
            height_mm: geometry.height_mm(),
        }
    }
}

/// A document under construction. Starts with one empty page; images are
/// placed on the most recently added page.
pub trait PagedDocument: Send {
    fn place_image(&mut self, bitmap: Bitmap, rect: PlacementRect) -> Result<()>;

    fn add_page(&mut self);

    fn page_count(&self) -> usize;

    fn save(self, path: &Path) -> impl Future<Output = Result<()>> + Send;
}

pub trait DocumentBuilder {
    type Document: PagedDocument;

    fn new_document(&self, geometry: PageGeometry) -> Self::Document;
}

#[derive(Debug, Clone)]
pub struct PrintPdfBuilder {
    title: String,
}

impl PrintPdfBuilder {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
        }
    }
}

impl Default for PrintPdfBuilder {
    fn default() -> Self {
        Self::new("Resume")
    }
}

impl DocumentBuilder for PrintPdfBuilder {
    type Document = ImagePdf;

    fn new_document(&self, geometry: PageGeometry) -> ImagePdf {
        ImagePdf {
            title: self.title.clone(),
            geometry,
            pages: vec![Vec::new()],
        }
    }
}

#[derive(Debug)]
struct Placement {
    bitmap: Bitmap,
    rect: PlacementRect,
}

/// Image-only PDF, encoded on save
#[derive(Debug)]
pub struct ImagePdf {
    title: String,
    geometry: PageGeometry,
    pages: Vec<Vec<Placement>>,
}

impl ImagePdf {
    /// Encode the PDF in memory
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut doc = PdfDocument::new(&self.title);
        let page_width = self.geometry.width_mm();
        let page_height = self.geometry.height_mm();

        let mut pages = Vec::with_capacity(self.pages.len());
        for placements in &self.pages {
            let mut ops = Vec::new();

            for placement in placements {
                let png = placement.bitmap.encode_png()?;
                let mut warnings = Vec::new();
                let raw_image = RawImage::decode_from_bytes(&png, &mut warnings)
                    .map_err(|e| ResumeError::Pdf(format!("Failed to decode page image: {}", e)))?;
                let (img_w, img_h) = (raw_image.width as f32, raw_image.height as f32);

                let xobj_id = XObjectId::new();
                doc.resources
                    .xobjects
                    .map
                    .insert(xobj_id.clone(), XObject::Image(raw_image));

                // PDF origin is bottom-left
                let rect = placement.rect;
                let bottom_mm = page_height - rect.y_mm - rect.height_mm;
                let transform = XObjectTransform {
                    translate_x: Some(Mm(rect.x_mm).into_pt()),
                    translate_y: Some(Mm(bottom_mm).into_pt()),
                    scale_x: Some(mm_to_pt(rect.width_mm) / img_w),
                    scale_y: Some(mm_to_pt(rect.height_mm) / img_h),
                    rotate: None,
                    dpi: Some(72.0),
                };
                ops.push(Op::UseXobject {
                    id: xobj_id,
                    transform,
                });
            }

            pages.push(PdfPage::new(Mm(page_width), Mm(page_height), ops));
        }

        doc.pages = pages;

        let mut warnings = Vec::new();
        let bytes = doc.save(&PdfSaveOptions::default(), &mut warnings);

        Ok(bytes)
    }
}

impl PagedDocument for ImagePdf {
    fn place_image(&mut self, bitmap: Bitmap, rect: PlacementRect) -> Result<()> {
        if bitmap.pixel_width() == 0 || bitmap.pixel_height() == 0 {
            return Err(ResumeError::Pdf("Cannot place an empty image".to_string()));
        }
        // `pages` always holds at least the initial page
        if let Some(page) = self.pages.last_mut() {
            page.push(Placement { bitmap, rect });
        }
        Ok(())
    }

    fn add_page(&mut self) {
        self.pages.push(Vec::new());
    }

    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn save(self, path: &Path) -> impl Future<Output = Result<()>> + Send {
        let path = path.to_owned();
        async move {
            // PDF encoding is CPU-bound, spawn blocking
            let bytes = tokio::task::spawn_blocking(move || self.to_bytes()).await??;
            tokio::fs::write(&path, bytes).await?;
            Ok(())
        }
    }
}
