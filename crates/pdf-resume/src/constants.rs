//! Shared constants for resume rendering
//!
//! This module centralizes the magic numbers used by the fitting,
//! rasterization and pagination stages.

use std::time::Duration;

// =============================================================================
// Unit Conversion
// =============================================================================

/// Points per millimeter (1 inch = 72 points, 1 inch = 25.4mm)
pub const POINTS_PER_MM: f32 = 72.0 / 25.4; // ≈ 2.83465

/// CSS reference pixels per millimeter (1 inch = 96px)
pub const PX_PER_MM: f32 = 96.0 / 25.4; // ≈ 3.7795

/// Convert millimeters to points
#[inline]
pub fn mm_to_pt(mm: f32) -> f32 {
    mm * POINTS_PER_MM
}

/// Convert millimeters to surface pixels
#[inline]
pub fn mm_to_px(mm: f32) -> f32 {
    mm * PX_PER_MM
}

// =============================================================================
// Content Fitting
// =============================================================================

/// Overflow ratio above which the compact presentation mode is applied
pub const COMPACT_THRESHOLD: f32 = 1.1;

/// Overflow ratio above which a uniform visual scale is applied
pub const SCALE_THRESHOLD: f32 = 1.6;

/// Overflow ratio above which every block is compacted by hand
pub const AGGRESSIVE_THRESHOLD: f32 = 2.0;

/// Lower bound for the visual scale factor
pub const MIN_VISUAL_SCALE: f32 = 0.75;

/// Smallest font size blocks are reduced to by aggressive compaction (px)
pub const MIN_READABLE_FONT_PX: f32 = 9.0;

/// Edge of the square photo after aggressive compaction (px)
pub const COMPACT_PHOTO_PX: f32 = 50.0;

/// Wait after presentation changes so layout can settle
pub const SETTLE_DELAY: Duration = Duration::from_millis(150);

/// Upper bound on waiting for fonts and images before rasterizing
pub const RESOURCE_TIMEOUT: Duration = Duration::from_secs(3);

// =============================================================================
// Rasterization
// =============================================================================

/// Default raster scale (quality/performance trade-off)
pub const DEFAULT_RASTER_SCALE: f32 = 1.5;

/// Approximate character width ratio when no font is loaded
pub const FALLBACK_CHAR_WIDTH_RATIO: f32 = 0.5;

// =============================================================================
// Pagination
// =============================================================================

/// Tolerance when comparing scaled image height to page height (mm)
pub const PAGE_FIT_EPSILON: f64 = 1e-3;

// =============================================================================
// Output
// =============================================================================

/// Appended to the sanitized owner name to form the output filename
pub const FILENAME_SUFFIX: &str = "_Resume.pdf";

/// Used when the sanitized owner name is empty
pub const FALLBACK_FILENAME_STEM: &str = "resume";
