//! Document assembly
//!
//! Orchestrates one generation cycle:
//! 1. Make the surface visible off-screen and fit its content
//! 2. Rasterize it into a single bitmap, then hide it again
//! 3. Place the bitmap on one page, or paginate it across several
//! 4. Save the document
//!
//! At most one cycle runs per assembler. Every exit path hides the surface
//! and returns the assembler to [`GenerationState::Idle`].

use crate::data::output_file_name;
use crate::fit::{ContentFitter, FitReport};
use crate::options::{GenerationOptions, SinglePagePlacement};
use crate::paginate::Paginator;
use crate::pdf::{DocumentBuilder, PagedDocument, PlacementRect};
use crate::raster::{Bitmap, RasterOptions, Rasterizer};
use crate::surface::{OffscreenGuard, RenderSurface, wait_until_ready_bounded};
use crate::types::*;
use std::path::PathBuf;
use std::sync::Mutex;
use tokio::sync::mpsc;

/// User-facing message for any failed cycle; details go to the log
pub const GENERATION_FAILED_MESSAGE: &str =
    "Could not generate the PDF. Please check your details and try again.";

/// User-facing message when a cycle is already running
pub const GENERATION_BUSY_MESSAGE: &str = "A PDF is already being generated. Please wait.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GenerationState {
    #[default]
    Idle,
    Fitting,
    Rasterizing,
    SinglePage,
    Paginating,
    Assembled,
    /// Terminal for one attempt; the assembler drops back to Idle right after
    Failed,
}

/// Notices sent to the UI while a cycle runs
#[derive(Debug, Clone, PartialEq)]
pub enum GenerationUpdate {
    Stage { state: GenerationState },
    Busy { message: String },
    Complete { path: PathBuf, page_count: usize },
    Error { message: String },
}

/// Result of a successful cycle
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationReport {
    pub path: PathBuf,
    pub page_count: usize,
    pub fit: FitReport,
    pub paginated: bool,
    pub bitmap_width: u32,
    pub bitmap_height: u32,
}

pub struct DocumentAssembler<R, B> {
    rasterizer: R,
    builder: B,
    options: GenerationOptions,
    fitter: ContentFitter,
    state: Mutex<GenerationState>,
    updates: Option<mpsc::UnboundedSender<GenerationUpdate>>,
}

impl<R, B: DocumentBuilder> DocumentAssembler<R, B> {
    pub fn new(rasterizer: R, builder: B, options: GenerationOptions) -> Result<Self> {
        options.validate()?;
        Ok(Self {
            rasterizer,
            builder,
            fitter: ContentFitter::new(options.fit),
            options,
            state: Mutex::new(GenerationState::Idle),
            updates: None,
        })
    }

    /// Send progress, completion and error notices to `tx`
    pub fn with_updates(mut self, tx: mpsc::UnboundedSender<GenerationUpdate>) -> Self {
        self.updates = Some(tx);
        self
    }

    pub fn options(&self) -> &GenerationOptions {
        &self.options
    }

    pub fn rasterizer(&self) -> &R {
        &self.rasterizer
    }

    pub fn state(&self) -> GenerationState {
        *self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn is_generating(&self) -> bool {
        self.state() != GenerationState::Idle
    }

    /// Run one full cycle and save the document as
    /// `output_dir / sanitized(owner_name) + filename_suffix`.
    ///
    /// Rejected with [`ResumeError::GenerationInProgress`] if another cycle
    /// is running; the running cycle is not affected.
    pub async fn generate<S>(&self, surface: &mut S, owner_name: &str) -> Result<GenerationReport>
    where
        S: RenderSurface,
        R: Rasterizer<S>,
    {
        let Some(cycle) = Cycle::begin(&self.state, self.updates.as_ref()) else {
            log::warn!("Generation requested while another is in progress");
            self.notify(GenerationUpdate::Busy {
                message: GENERATION_BUSY_MESSAGE.to_string(),
            });
            return Err(ResumeError::GenerationInProgress);
        };

        log::info!("Generating PDF for {:?}", owner_name);

        match self.run_cycle(&cycle, surface, owner_name).await {
            Ok(report) => {
                log::info!(
                    "Saved {} page(s) to {}",
                    report.page_count,
                    report.path.display()
                );
                self.notify(GenerationUpdate::Complete {
                    path: report.path.clone(),
                    page_count: report.page_count,
                });
                Ok(report)
            }
            Err(e) => {
                cycle.advance(GenerationState::Failed);
                log::error!("PDF generation failed: {}", e);
                self.notify(GenerationUpdate::Error {
                    message: GENERATION_FAILED_MESSAGE.to_string(),
                });
                Err(e)
            }
        }
    }

    async fn run_cycle<S>(
        &self,
        cycle: &Cycle<'_>,
        surface: &mut S,
        owner_name: &str,
    ) -> Result<GenerationReport>
    where
        S: RenderSurface,
        R: Rasterizer<S>,
    {
        let geometry = self.options.page_geometry()?;

        let (fit, bitmap) = {
            let mut visible = OffscreenGuard::new(surface);

            cycle.advance(GenerationState::Fitting);
            wait_until_ready_bounded(&mut *visible, self.options.resource_timeout()).await;
            let fit = self.fitter.fit(&mut *visible, &geometry).await;

            cycle.advance(GenerationState::Rasterizing);
            let raster_options = RasterOptions {
                scale: self.options.raster_scale,
                background: self.options.background,
                width_px: visible.rendered_width_px(),
                height_px: visible.content_height_px(),
            };
            let bitmap = self.rasterizer.rasterize(&*visible, &raster_options).await?;
            (fit, bitmap)
        };

        let (bitmap_width, bitmap_height) = (bitmap.pixel_width(), bitmap.pixel_height());
        if bitmap_width == 0 || bitmap_height == 0 {
            return Err(ResumeError::Rasterize(format!(
                "Empty bitmap ({}x{})",
                bitmap_width, bitmap_height
            )));
        }

        let mut document = self.builder.new_document(geometry);
        let paginated = !Paginator::fits_single_page(bitmap_width, bitmap_height, &geometry);

        if paginated {
            cycle.advance(GenerationState::Paginating);
            place_pages(&mut document, &bitmap, &geometry)?;
        } else {
            cycle.advance(GenerationState::SinglePage);
            let rect = self.single_page_rect(&bitmap, &geometry);
            document.place_image(bitmap, rect)?;
        }

        cycle.advance(GenerationState::Assembled);
        let page_count = document.page_count();
        let file_name = output_file_name(owner_name, &self.options.filename_suffix);
        let path = self.options.output_dir.join(file_name);
        document.save(&path).await?;

        Ok(GenerationReport {
            path,
            page_count,
            fit,
            paginated,
            bitmap_width,
            bitmap_height,
        })
    }

    fn single_page_rect(&self, bitmap: &Bitmap, geometry: &PageGeometry) -> PlacementRect {
        let full = PlacementRect::full_page(geometry);
        match self.options.single_page_placement {
            SinglePagePlacement::FillPage => full,
            SinglePagePlacement::FitWidth => PlacementRect {
                height_mm: Paginator::scaled_height(
                    bitmap.pixel_width(),
                    bitmap.pixel_height(),
                    geometry,
                ) as f32,
                ..full
            },
        }
    }

    fn notify(&self, update: GenerationUpdate) {
        if let Some(tx) = &self.updates {
            let _ = tx.send(update);
        }
    }
}

/// Crop each slice and stretch it over its own page, in order
fn place_pages<D: PagedDocument>(
    document: &mut D,
    bitmap: &Bitmap,
    geometry: &PageGeometry,
) -> Result<()> {
    let full = PlacementRect::full_page(geometry);
    for slice in Paginator::paginate(bitmap, geometry) {
        if slice.index > 0 {
            document.add_page();
        }
        log::debug!(
            "Page {}: rows {}..{}",
            slice.index + 1,
            slice.source_y_offset,
            slice.source_y_offset + slice.source_height_px
        );
        document.place_image(bitmap.crop(&slice), full)?;
    }
    Ok(())
}

/// The in-flight cycle. Holds the state machine out of `Idle` for as long as
/// it lives.
struct Cycle<'a> {
    state: &'a Mutex<GenerationState>,
    updates: Option<&'a mpsc::UnboundedSender<GenerationUpdate>>,
}

impl<'a> Cycle<'a> {
    fn begin(
        state: &'a Mutex<GenerationState>,
        updates: Option<&'a mpsc::UnboundedSender<GenerationUpdate>>,
    ) -> Option<Self> {
        let mut current = state.lock().unwrap_or_else(|e| e.into_inner());
        if *current != GenerationState::Idle {
            return None;
        }
        // Leave Idle before releasing the lock so a second caller is rejected
        *current = GenerationState::Fitting;
        Some(Self { state, updates })
    }

    fn advance(&self, next: GenerationState) {
        *self.state.lock().unwrap_or_else(|e| e.into_inner()) = next;
        log::debug!("Generation state: {:?}", next);
        if let Some(tx) = self.updates {
            let _ = tx.send(GenerationUpdate::Stage { state: next });
        }
    }
}

impl Drop for Cycle<'_> {
    fn drop(&mut self) {
        *self.state.lock().unwrap_or_else(|e| e.into_inner()) = GenerationState::Idle;
    }
}
