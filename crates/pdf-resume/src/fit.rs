//! Content fitting
//!
//! Best-effort compaction of a surface before rasterization so that its
//! content lands on as few pages as possible. Tiers are cumulative:
//! - above `compact_ratio`: compact presentation mode
//! - above `scale_ratio`: uniform visual scale `max(min_scale, 1 / ratio)`
//! - above `aggressive_ratio`: every block at the minimum readable size
//!
//! Fitting never fails. Whatever overflow remains is paginated later.

use crate::options::FitThresholds;
use crate::surface::RenderSurface;
use crate::types::PageGeometry;

/// Strongest compaction tier that was applied
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum CompactionTier {
    None,
    Compact,
    Scaled,
    Aggressive,
}

/// Outcome of one fitting pass
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FitReport {
    /// Natural content height divided by page height
    pub overflow_ratio: f32,
    pub tier: CompactionTier,
    /// Visual scale factor, when the scale tier applied
    pub scale: Option<f32>,
}

#[derive(Debug, Clone)]
pub struct ContentFitter {
    thresholds: FitThresholds,
}

impl ContentFitter {
    pub fn new(thresholds: FitThresholds) -> Self {
        Self { thresholds }
    }

    /// Tier and scale for a given overflow ratio
    pub fn plan(&self, overflow_ratio: f32) -> (CompactionTier, Option<f32>) {
        let t = &self.thresholds;
        if overflow_ratio > t.aggressive_ratio {
            (CompactionTier::Aggressive, Some(self.scale_for(overflow_ratio)))
        } else if overflow_ratio > t.scale_ratio {
            (CompactionTier::Scaled, Some(self.scale_for(overflow_ratio)))
        } else if overflow_ratio > t.compact_ratio {
            (CompactionTier::Compact, None)
        } else {
            (CompactionTier::None, None)
        }
    }

    fn scale_for(&self, overflow_ratio: f32) -> f32 {
        self.thresholds.min_scale.max(1.0 / overflow_ratio)
    }

    /// Apply the transforms without waiting for layout to settle.
    ///
    /// The surface is reset first so that repeated calls with the same
    /// content always measure the natural height and pick the same tier.
    pub fn apply<S: RenderSurface + ?Sized>(
        &self,
        surface: &mut S,
        geometry: &PageGeometry,
    ) -> FitReport {
        surface.reset_presentation();

        let content_height = surface.content_height_px();
        let page_height = geometry.height_px();
        let overflow_ratio = content_height / page_height;
        let (tier, scale) = self.plan(overflow_ratio);

        if tier >= CompactionTier::Compact {
            surface.apply_compact_mode();
        }
        if let Some(scale) = scale {
            surface.apply_visual_scale(scale);
        }
        if tier >= CompactionTier::Aggressive {
            surface.compact_blocks(self.thresholds.min_font_px, self.thresholds.photo_px);
        }

        log::debug!(
            "Content {:.0}px on {:.0}px page (ratio {:.2}): {:?}{}",
            content_height,
            page_height,
            overflow_ratio,
            tier,
            scale
                .map(|s| format!(", scale {:.3}", s))
                .unwrap_or_default()
        );

        FitReport {
            overflow_ratio,
            tier,
            scale,
        }
    }

    /// Apply the transforms, then yield for the settle delay so layout can
    /// catch up before rasterization.
    pub async fn fit<S: RenderSurface + ?Sized>(
        &self,
        surface: &mut S,
        geometry: &PageGeometry,
    ) -> FitReport {
        let report = self.apply(surface, geometry);
        tokio::time::sleep(self.thresholds.settle_delay()).await;
        report
    }
}

impl Default for ContentFitter {
    fn default() -> Self {
        Self::new(FitThresholds::default())
    }
}
