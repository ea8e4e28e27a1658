use thiserror::Error;

#[derive(Error, Debug)]
pub enum ResumeError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
    #[cfg(feature = "serde")]
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("PDF error: {0}")]
    Pdf(String),
    #[error("Invalid configuration: {0}")]
    Config(String),
    #[error("Task join error: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),
    #[error("Template not found: {0}")]
    TemplateNotFound(String),
    #[error("A document is already being generated")]
    GenerationInProgress,
    #[error("Rasterization failed: {0}")]
    Rasterize(String),
    #[error("Invalid page geometry: {0}")]
    InvalidGeometry(String),
    #[error("Font error: {0}")]
    Font(String),
}

pub type Result<T> = std::result::Result<T, ResumeError>;

/// Paper orientation
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Orientation {
    /// Portrait: height > width (default for most paper sizes)
    #[default]
    Portrait,
    /// Landscape: width > height
    Landscape,
}

/// Standard paper sizes
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PaperSize {
    A3,
    #[default]
    A4,
    A5,
    Letter,
    Legal,
    Tabloid,
    Custom { width_mm: f32, height_mm: f32 },
}

impl PaperSize {
    /// Get base dimensions (always portrait: width < height for standard sizes)
    pub fn dimensions_mm(self) -> (f32, f32) {
        match self {
            PaperSize::A3 => (297.0, 420.0),
            PaperSize::A4 => (210.0, 297.0),
            PaperSize::A5 => (148.0, 210.0),
            PaperSize::Letter => (215.9, 279.4),
            PaperSize::Legal => (215.9, 355.6),
            PaperSize::Tabloid => (279.4, 431.8),
            PaperSize::Custom {
                width_mm,
                height_mm,
            } => (width_mm, height_mm),
        }
    }

    /// Get dimensions with orientation applied
    pub fn dimensions_with_orientation(self, orientation: Orientation) -> (f32, f32) {
        let (w, h) = self.dimensions_mm();
        match orientation {
            Orientation::Portrait => (w, h),
            Orientation::Landscape => (h, w),
        }
    }
}

/// Physical size of one output page.
///
/// Fixed for the lifetime of a generation cycle. Both sides are positive
/// and finite; construct through [`PageGeometry::new`] or
/// [`PageGeometry::from_paper`] to get that checked.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageGeometry {
    width_mm: f32,
    height_mm: f32,
}

impl PageGeometry {
    pub fn new(width_mm: f32, height_mm: f32) -> Result<Self> {
        let valid = |v: f32| v.is_finite() && v > 0.0;
        if !valid(width_mm) || !valid(height_mm) {
            return Err(ResumeError::InvalidGeometry(format!(
                "{} x {} mm",
                width_mm, height_mm
            )));
        }
        Ok(Self {
            width_mm,
            height_mm,
        })
    }

    pub fn from_paper(paper: PaperSize, orientation: Orientation) -> Result<Self> {
        let (w, h) = paper.dimensions_with_orientation(orientation);
        Self::new(w, h)
    }

    /// A4 portrait, 210 x 297 mm
    pub fn a4() -> Self {
        Self {
            width_mm: 210.0,
            height_mm: 297.0,
        }
    }

    pub fn width_mm(&self) -> f32 {
        self.width_mm
    }

    pub fn height_mm(&self) -> f32 {
        self.height_mm
    }

    /// Page height in surface pixels (CSS reference pixels)
    pub fn height_px(&self) -> f32 {
        crate::constants::mm_to_px(self.height_mm)
    }

    /// Page width in surface pixels (CSS reference pixels)
    pub fn width_px(&self) -> f32 {
        crate::constants::mm_to_px(self.width_mm)
    }
}

impl Default for PageGeometry {
    fn default() -> Self {
        Self::a4()
    }
}

/// Opaque RGB colour used for backgrounds and template paint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const WHITE: Rgb = Rgb(255, 255, 255);
}

impl Default for Rgb {
    fn default() -> Self {
        Rgb::WHITE
    }
}
