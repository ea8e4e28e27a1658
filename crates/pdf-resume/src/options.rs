use crate::constants::*;
use crate::types::*;
use std::path::PathBuf;
use std::time::Duration;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// How a bitmap that fits on one page is placed on it
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum SinglePagePlacement {
    /// Stretch to the full page width and height
    #[default]
    FillPage,
    /// Full page width, height follows the bitmap's aspect ratio
    FitWidth,
}

/// Overflow thresholds and compaction parameters for the content fitter
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FitThresholds {
    pub compact_ratio: f32,
    pub scale_ratio: f32,
    pub aggressive_ratio: f32,
    pub min_scale: f32,
    pub min_font_px: f32,
    pub photo_px: f32,
    pub settle_delay_ms: u64,
}

impl Default for FitThresholds {
    fn default() -> Self {
        Self {
            compact_ratio: COMPACT_THRESHOLD,
            scale_ratio: SCALE_THRESHOLD,
            aggressive_ratio: AGGRESSIVE_THRESHOLD,
            min_scale: MIN_VISUAL_SCALE,
            min_font_px: MIN_READABLE_FONT_PX,
            photo_px: COMPACT_PHOTO_PX,
            settle_delay_ms: SETTLE_DELAY.as_millis() as u64,
        }
    }
}

impl FitThresholds {
    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }
}

/// Document generation configuration
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GenerationOptions {
    // Page
    pub paper_size: PaperSize,
    pub orientation: Orientation,

    // Rasterization
    pub raster_scale: f32,
    pub background: Rgb,
    pub resource_timeout_ms: u64,

    // Fitting
    pub fit: FitThresholds,

    // Output
    pub single_page_placement: SinglePagePlacement,
    pub output_dir: PathBuf,
    pub filename_suffix: String,
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self {
            paper_size: PaperSize::A4,
            orientation: Orientation::Portrait,
            raster_scale: DEFAULT_RASTER_SCALE,
            background: Rgb::WHITE,
            resource_timeout_ms: RESOURCE_TIMEOUT.as_millis() as u64,
            fit: FitThresholds::default(),
            single_page_placement: SinglePagePlacement::FillPage,
            output_dir: PathBuf::from("."),
            filename_suffix: FILENAME_SUFFIX.to_string(),
        }
    }
}

impl GenerationOptions {
    /// Load options from JSON file
    #[cfg(feature = "serde")]
    pub async fn load(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let bytes = tokio::fs::read(path).await?;
        let options = serde_json::from_slice(&bytes)
            .map_err(|e| ResumeError::Config(format!("Failed to parse config: {}", e)))?;
        Ok(options)
    }

    /// Save options to JSON file
    #[cfg(feature = "serde")]
    pub async fn save(&self, path: impl AsRef<std::path::Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| ResumeError::Config(format!("Failed to serialize config: {}", e)))?;
        tokio::fs::write(path, json).await?;
        Ok(())
    }

    pub fn page_geometry(&self) -> Result<PageGeometry> {
        PageGeometry::from_paper(self.paper_size, self.orientation)
    }

    pub fn resource_timeout(&self) -> Duration {
        Duration::from_millis(self.resource_timeout_ms)
    }

    /// Validate the options
    pub fn validate(&self) -> Result<()> {
        self.page_geometry()?;

        if !self.raster_scale.is_finite() || self.raster_scale <= 0.0 {
            return Err(ResumeError::Config(format!(
                "Raster scale must be positive, got {}",
                self.raster_scale
            )));
        }

        let fit = &self.fit;
        if !(fit.compact_ratio > 0.0
            && fit.compact_ratio <= fit.scale_ratio
            && fit.scale_ratio <= fit.aggressive_ratio)
        {
            return Err(ResumeError::Config(
                "Fit thresholds must be positive and ascending (compact <= scale <= aggressive)"
                    .to_string(),
            ));
        }

        if !(fit.min_scale > 0.0 && fit.min_scale <= 1.0) {
            return Err(ResumeError::Config(format!(
                "Minimum scale must be in (0, 1], got {}",
                fit.min_scale
            )));
        }

        if fit.min_font_px <= 0.0 || fit.photo_px <= 0.0 {
            return Err(ResumeError::Config(
                "Minimum font size and compact photo size must be positive".to_string(),
            ));
        }

        if self.filename_suffix.is_empty() {
            return Err(ResumeError::Config(
                "Filename suffix must not be empty".to_string(),
            ));
        }

        Ok(())
    }
}
