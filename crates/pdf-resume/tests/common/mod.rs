#![allow(dead_code)]

use pdf_resume::*;
use std::future::Future;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

pub const SURFACE_WIDTH_PX: f32 = 200.0;
pub const PAGE_HEIGHT_PX: f32 = 1000.0;

/// Page whose width matches the fake surface and whose height is 1000px
pub fn test_paper() -> PaperSize {
    PaperSize::Custom {
        width_mm: SURFACE_WIDTH_PX / constants::PX_PER_MM,
        height_mm: PAGE_HEIGHT_PX / constants::PX_PER_MM,
    }
}

pub fn test_geometry() -> PageGeometry {
    PageGeometry::from_paper(test_paper(), Orientation::Portrait).unwrap()
}

pub fn test_options(output_dir: &std::path::Path) -> GenerationOptions {
    let mut options = GenerationOptions {
        paper_size: test_paper(),
        output_dir: output_dir.to_path_buf(),
        ..Default::default()
    };
    options.fit.settle_delay_ms = 0;
    options
}

/// Surface whose height responds to each presentation transform by a fixed
/// factor, so tests can predict the fitted height.
#[derive(Debug, Clone)]
pub struct FakeSurface {
    pub natural_height: f32,
    pub width: f32,
    pub compact: bool,
    pub scale: Option<f32>,
    pub blocks: Option<(f32, f32)>,
    pub visibility: Visibility,
    pub resets: usize,
    /// Resources never become ready
    pub stalled: bool,
}

impl FakeSurface {
    pub const COMPACT_FACTOR: f32 = 0.8;
    pub const BLOCKS_FACTOR: f32 = 0.85;

    pub fn new(natural_height: f32) -> Self {
        Self {
            natural_height,
            width: SURFACE_WIDTH_PX,
            compact: false,
            scale: None,
            blocks: None,
            visibility: Visibility::Hidden,
            resets: 0,
            stalled: false,
        }
    }

    pub fn stalled(natural_height: f32) -> Self {
        Self {
            stalled: true,
            ..Self::new(natural_height)
        }
    }
}

impl RenderSurface for FakeSurface {
    fn content_height_px(&self) -> f32 {
        let mut height = self.natural_height;
        if self.compact {
            height *= Self::COMPACT_FACTOR;
        }
        if self.blocks.is_some() {
            height *= Self::BLOCKS_FACTOR;
        }
        height * self.scale.unwrap_or(1.0)
    }

    fn rendered_width_px(&self) -> f32 {
        self.width
    }

    fn apply_compact_mode(&mut self) {
        self.compact = true;
    }

    fn apply_visual_scale(&mut self, factor: f32) {
        self.scale = Some(factor);
    }

    fn compact_blocks(&mut self, min_font_px: f32, photo_px: f32) {
        self.blocks = Some((min_font_px, photo_px));
    }

    fn reset_presentation(&mut self) {
        self.compact = false;
        self.scale = None;
        self.blocks = None;
        self.resets += 1;
    }

    fn set_visibility(&mut self, visibility: Visibility) {
        self.visibility = visibility;
    }

    fn visibility(&self) -> Visibility {
        self.visibility
    }

    fn wait_until_ready(&mut self) -> impl Future<Output = ()> + Send {
        let stalled = self.stalled;
        async move {
            if stalled {
                std::future::pending::<()>().await;
            }
        }
    }
}

/// Produces a white bitmap of the requested size and records what it saw
#[derive(Debug, Default)]
pub struct SizedRasterizer {
    pub calls: AtomicUsize,
    pub seen_visibility: Mutex<Vec<Visibility>>,
    pub delay: Duration,
}

impl SizedRasterizer {
    pub fn with_delay(delay: Duration) -> Self {
        Self {
            delay,
            ..Default::default()
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Rasterizer<FakeSurface> for SizedRasterizer {
    fn rasterize(
        &self,
        surface: &FakeSurface,
        options: &RasterOptions,
    ) -> impl Future<Output = Result<Bitmap>> + Send {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.seen_visibility
            .lock()
            .unwrap()
            .push(surface.visibility());

        let width = (options.width_px * options.scale).ceil() as u32;
        let height = (options.height_px * options.scale).ceil() as u32;
        let delay = self.delay;
        async move {
            tokio::time::sleep(delay).await;
            Ok(Bitmap::filled(width, height, Rgb::WHITE))
        }
    }
}

/// Always fails, like a canvas that refuses to render
#[derive(Debug, Default)]
pub struct FailingRasterizer;

impl Rasterizer<FakeSurface> for FailingRasterizer {
    fn rasterize(
        &self,
        _surface: &FakeSurface,
        _options: &RasterOptions,
    ) -> impl Future<Output = Result<Bitmap>> + Send {
        async { Err(ResumeError::Rasterize("canvas is tainted".to_string())) }
    }
}

pub fn drain(rx: &mut tokio::sync::mpsc::UnboundedReceiver<GenerationUpdate>) -> Vec<GenerationUpdate> {
    let mut updates = Vec::new();
    while let Ok(update) = rx.try_recv() {
        updates.push(update);
    }
    updates
}

pub fn sample_resume() -> ResumeData {
    ResumeData {
        personal: PersonalInfo {
            full_name: "Ada Lovelace".into(),
            title: "Analytical Engineer".into(),
            email: "ada@example.org".into(),
            phone: "+44 20 7946 0000".into(),
            location: "London".into(),
            website: String::new(),
        },
        summary: "Mathematician with a focus on general purpose computation and \
                  the notes that go with it."
            .into(),
        experience: vec![Experience {
            role: "Collaborator".into(),
            company: "Analytical Engine".into(),
            period: "1842 - 1843".into(),
            description: "Translated and annotated the Menabrea paper.".into(),
        }],
        education: vec![Education {
            degree: "Private tutoring".into(),
            school: "Mathematics and science".into(),
            period: "1820s - 1830s".into(),
            details: String::new(),
        }],
        skills: vec!["Mathematics".into(), "Algorithms".into()],
        languages: vec!["English".into(), "French".into()],
        certifications: Vec::new(),
        photo: None,
    }
}

/// Resume long enough to need several A4 pages at natural size
pub fn long_resume(entries: usize) -> ResumeData {
    let mut data = sample_resume();
    data.experience = (0..entries)
        .map(|i| Experience {
            role: format!("Engineer {}", i),
            company: format!("Company {}", i),
            period: "2001 - 2005".into(),
            description: "Designed, built and maintained systems that processed large \
                          volumes of data, mentored engineers, and coordinated releases \
                          across several teams and time zones."
                .into(),
        })
        .collect();
    data
}

/// One `place_image` call as seen by [`RecordingBuilder`]
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedPlacement {
    pub page: usize,
    pub pixel_width: u32,
    pub pixel_height: u32,
    pub rect: PlacementRect,
}

/// Document builder that records placements and writes an empty file on save
#[derive(Debug, Clone, Default)]
pub struct RecordingBuilder {
    pub placements: std::sync::Arc<Mutex<Vec<RecordedPlacement>>>,
}

impl RecordingBuilder {
    pub fn placements(&self) -> Vec<RecordedPlacement> {
        self.placements.lock().unwrap().clone()
    }
}

pub struct RecordingDocument {
    placements: std::sync::Arc<Mutex<Vec<RecordedPlacement>>>,
    pages: usize,
}

impl DocumentBuilder for RecordingBuilder {
    type Document = RecordingDocument;

    fn new_document(&self, _geometry: PageGeometry) -> RecordingDocument {
        RecordingDocument {
            placements: self.placements.clone(),
            pages: 1,
        }
    }
}

impl PagedDocument for RecordingDocument {
    fn place_image(&mut self, bitmap: Bitmap, rect: PlacementRect) -> Result<()> {
        self.placements.lock().unwrap().push(RecordedPlacement {
            page: self.pages - 1,
            pixel_width: bitmap.pixel_width(),
            pixel_height: bitmap.pixel_height(),
            rect,
        });
        Ok(())
    }

    fn add_page(&mut self) {
        self.pages += 1;
    }

    fn page_count(&self) -> usize {
        self.pages
    }

    fn save(self, path: &std::path::Path) -> impl Future<Output = Result<()>> + Send {
        let path = path.to_owned();
        async move {
            tokio::fs::write(path, b"").await?;
            Ok(())
        }
    }
}
