//! Splitting one tall bitmap into page-sized bands
//!
//! Pages partition the source bitmap into `total_pages` bands of equal
//! *pixel* height, the last band absorbing any integer remainder. Each band
//! is later stretched over a full page, so bands do not correspond to equal
//! physical heights of a continuously scaled image.

use crate::constants::PAGE_FIT_EPSILON;
use crate::raster::Bitmap;
use crate::types::PageGeometry;

/// One horizontal band of the source bitmap
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageSlice {
    pub index: usize,
    pub source_y_offset: u32,
    pub source_height_px: u32,
    pub pixel_width: u32,
}

pub struct Paginator;

impl Paginator {
    /// Height of the bitmap in page units once scaled to the full page width
    pub fn scaled_height(width_px: u32, height_px: u32, geometry: &PageGeometry) -> f64 {
        geometry.width_mm() as f64 * height_px as f64 / width_px.max(1) as f64
    }

    /// Whether a bitmap of this size fits on one page
    pub fn fits_single_page(width_px: u32, height_px: u32, geometry: &PageGeometry) -> bool {
        Self::scaled_height(width_px, height_px, geometry)
            <= geometry.height_mm() as f64 + PAGE_FIT_EPSILON
    }

    /// Pages needed for a bitmap of this size
    pub fn page_count(width_px: u32, height_px: u32, geometry: &PageGeometry) -> usize {
        if Self::fits_single_page(width_px, height_px, geometry) {
            return 1;
        }
        // Exact multiples must not pick up an extra page from rounding error
        let scaled = Self::scaled_height(width_px, height_px, geometry) - PAGE_FIT_EPSILON;
        ((scaled / geometry.height_mm() as f64).ceil() as usize).max(1)
    }

    /// Slices for `bitmap`, in page order
    pub fn paginate(bitmap: &Bitmap, geometry: &PageGeometry) -> Vec<PageSlice> {
        let width = bitmap.pixel_width();
        let height = bitmap.pixel_height();
        let total_pages = Self::page_count(width, height, geometry);
        let slices = Self::partition(width, height, total_pages);

        log::debug!(
            "Paginating {}x{} bitmap into {} page(s) ({:.1}mm scaled height)",
            width,
            height,
            slices.len(),
            Self::scaled_height(width, height, geometry)
        );

        slices
    }

    /// Equal-height pixel bands covering `[0, height)`. Never more bands than
    /// pixel rows, so no band is empty.
    pub fn partition(width: u32, height: u32, total_pages: usize) -> Vec<PageSlice> {
        let total_pages = (total_pages.max(1) as u32).min(height.max(1));
        let band = height / total_pages;

        (0..total_pages)
            .map(|i| {
                let offset = i * band;
                let source_height_px = if i + 1 == total_pages {
                    height - offset
                } else {
                    band
                };
                PageSlice {
                    index: i as usize,
                    source_y_offset: offset,
                    source_height_px,
                    pixel_width: width,
                }
            })
            .collect()
    }
}
