//! Render surfaces
//!
//! A render surface is the visual region that gets fitted and rasterized.
//! The pipeline only talks to it through [`RenderSurface`]:
//! - measuring its content extent
//! - applying presentation transforms (compact mode, visual scale, block compaction)
//! - toggling its off-screen visibility
//!
//! [`TemplateSurface`] is the built-in implementation that lays out resume
//! data with one of the [`TemplateVariant`] styles.

mod template;
mod text;
mod variant;

pub use template::*;
pub use text::*;
pub use variant::*;

use std::future::Future;
use std::ops::{Deref, DerefMut};
use std::time::Duration;

/// Whether the surface is currently part of the rendered output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Visibility {
    #[default]
    Hidden,
    /// Laid out and paintable, but positioned outside the visible viewport
    Offscreen,
}

/// Presentation-transform operations over an owned surface.
///
/// None of these change semantic content. All measurements are in
/// surface pixels (CSS reference pixels, 96 per inch).
pub trait RenderSurface {
    /// Current visual content extent, including any applied visual scale.
    /// May exceed the visible viewport.
    fn content_height_px(&self) -> f32;

    /// Visual width of the surface
    fn rendered_width_px(&self) -> f32;

    /// Switch to the denser spacing and typography preset
    fn apply_compact_mode(&mut self);

    /// Uniform visual scale anchored at the top-left. The logical box is
    /// enlarged by `1 / factor` so nothing is clipped.
    fn apply_visual_scale(&mut self, factor: f32);

    /// Reduce every content block to `min_font_px` with tight spacing and
    /// shrink the photo to a `photo_px` square.
    fn compact_blocks(&mut self, min_font_px: f32, photo_px: f32);

    /// Drop all presentation transforms
    fn reset_presentation(&mut self);

    fn set_visibility(&mut self, visibility: Visibility);

    fn visibility(&self) -> Visibility;

    /// Resolves once fonts and images are ready to paint.
    fn wait_until_ready(&mut self) -> impl Future<Output = ()> + Send {
        async {}
    }
}

/// Wait for the surface's resources, giving up after `timeout`. Rendering
/// goes ahead either way.
pub async fn wait_until_ready_bounded<S: RenderSurface>(surface: &mut S, timeout: Duration) {
    if tokio::time::timeout(timeout, surface.wait_until_ready())
        .await
        .is_err()
    {
        log::warn!("Resources not ready after {:?}, continuing", timeout);
    }
}

/// Keeps a surface off-screen for as long as it lives and hides it again on
/// drop, whichever way the holder exits.
pub struct OffscreenGuard<'a, S: RenderSurface> {
    surface: &'a mut S,
}

impl<'a, S: RenderSurface> OffscreenGuard<'a, S> {
    pub fn new(surface: &'a mut S) -> Self {
        surface.set_visibility(Visibility::Offscreen);
        Self { surface }
    }
}

impl<S: RenderSurface> Deref for OffscreenGuard<'_, S> {
    type Target = S;

    fn deref(&self) -> &S {
        self.surface
    }
}

impl<S: RenderSurface> DerefMut for OffscreenGuard<'_, S> {
    fn deref_mut(&mut self) -> &mut S {
        self.surface
    }
}

impl<S: RenderSurface> Drop for OffscreenGuard<'_, S> {
    fn drop(&mut self) {
        self.surface.set_visibility(Visibility::Hidden);
    }
}
