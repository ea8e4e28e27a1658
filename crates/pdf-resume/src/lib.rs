pub mod assemble;
pub mod constants;
mod data;
mod fit;
mod options;
mod paginate;
mod pdf;
mod plan;
mod raster;
pub mod surface;
mod types;

pub use assemble::{
    DocumentAssembler, GENERATION_BUSY_MESSAGE, GENERATION_FAILED_MESSAGE, GenerationReport,
    GenerationState, GenerationUpdate,
};
pub use data::*;
pub use fit::{CompactionTier, ContentFitter, FitReport};
pub use options::*;
pub use paginate::{PageSlice, Paginator};
pub use pdf::{DocumentBuilder, ImagePdf, PagedDocument, PlacementRect, PrintPdfBuilder};
pub use plan::{GenerationPlan, plan_generation};
pub use raster::{Bitmap, RasterOptions, Rasterizer, SkiaRasterizer, paint_scene};
pub use surface::{
    DrawItem, FontData, RenderSurface, Section, TemplateSurface, TemplateVariant, TextMetrics,
    Visibility,
};
pub use types::*;
