use crate::fit::{ContentFitter, FitReport};
use crate::options::GenerationOptions;
use crate::paginate::Paginator;
use crate::surface::{RenderSurface, wait_until_ready_bounded};
use crate::types::*;

/// What a generation cycle would produce, without rasterizing
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationPlan {
    pub fit: FitReport,
    /// Content height after fitting, in surface pixels
    pub fitted_height_px: f32,
    pub bitmap_width: u32,
    pub bitmap_height: u32,
    pub page_count: usize,
}

/// Fit the surface (leaving the transforms applied) and work out the bitmap
/// size and page count the pipeline would produce. Resources are awaited
/// the same way a generation cycle does, so photos that fail to load are
/// left out of the measurement too.
pub async fn plan_generation<S: RenderSurface>(
    surface: &mut S,
    options: &GenerationOptions,
) -> Result<GenerationPlan> {
    options.validate()?;
    let geometry = options.page_geometry()?;

    wait_until_ready_bounded(surface, options.resource_timeout()).await;

    let fit = ContentFitter::new(options.fit).apply(surface, &geometry);
    let fitted_height_px = surface.content_height_px();

    // Same rounding the rasterizer uses for its canvas
    let bitmap_width = (surface.rendered_width_px() * options.raster_scale)
        .ceil()
        .max(1.0) as u32;
    let bitmap_height = (fitted_height_px * options.raster_scale).ceil().max(1.0) as u32;
    let page_count = Paginator::page_count(bitmap_width, bitmap_height, &geometry);

    Ok(GenerationPlan {
        fit,
        fitted_height_px,
        bitmap_width,
        bitmap_height,
        page_count,
    })
}
