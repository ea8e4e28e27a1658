//! Rasterization
//!
//! [`Rasterizer`] is the capability trait the assembler consumes: turn a
//! surface into exactly one [`Bitmap`]. [`SkiaRasterizer`] paints
//! [`TemplateSurface`] scenes with tiny-skia. Without a font, text lines are
//! drawn as greeked bars of the measured width.

use crate::constants::FALLBACK_CHAR_WIDTH_RATIO;
use crate::paginate::PageSlice;
use crate::surface::{DrawItem, FontData, Scene, TemplateSurface, TextMetrics};
use crate::types::{ResumeError, Result, Rgb};
use image::RgbaImage;
use image::imageops::{self, FilterType};
use std::future::Future;
use tiny_skia::{Color, FillRule, Paint, PathBuilder, Pixmap, Rect, Transform};
use ttf_parser::OutlineBuilder;

/// Immutable RGBA raster
#[derive(Debug, Clone, PartialEq)]
pub struct Bitmap {
    image: RgbaImage,
}

impl Bitmap {
    pub fn new(image: RgbaImage) -> Self {
        Self { image }
    }

    /// Uniformly coloured bitmap
    pub fn filled(width: u32, height: u32, color: Rgb) -> Self {
        let pixel = image::Rgba([color.0, color.1, color.2, 255]);
        Self::new(RgbaImage::from_pixel(width, height, pixel))
    }

    pub fn pixel_width(&self) -> u32 {
        self.image.width()
    }

    pub fn pixel_height(&self) -> u32 {
        self.image.height()
    }

    pub fn as_image(&self) -> &RgbaImage {
        &self.image
    }

    /// Copy out the horizontal band described by `slice`
    pub fn crop(&self, slice: &PageSlice) -> Bitmap {
        let band = imageops::crop_imm(
            &self.image,
            0,
            slice.source_y_offset,
            slice.pixel_width,
            slice.source_height_px,
        );
        Bitmap::new(band.to_image())
    }

    pub fn encode_png(&self) -> Result<Vec<u8>> {
        let mut bytes = Vec::new();
        self.image.write_to(
            &mut std::io::Cursor::new(&mut bytes),
            image::ImageFormat::Png,
        )?;
        Ok(bytes)
    }
}

/// Rasterization request
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RasterOptions {
    /// Output pixels per surface pixel
    pub scale: f32,
    /// Opaque fill behind everything
    pub background: Rgb,
    /// Region to capture, in surface pixels
    pub width_px: f32,
    pub height_px: f32,
}

/// Converts a visible surface into a bitmap
pub trait Rasterizer<S: ?Sized> {
    fn rasterize(
        &self,
        surface: &S,
        options: &RasterOptions,
    ) -> impl Future<Output = Result<Bitmap>> + Send;
}

/// CPU rasterizer for [`TemplateSurface`]
#[derive(Debug, Clone, Copy, Default)]
pub struct SkiaRasterizer;

impl Rasterizer<TemplateSurface> for SkiaRasterizer {
    fn rasterize(
        &self,
        surface: &TemplateSurface,
        options: &RasterOptions,
    ) -> impl Future<Output = Result<Bitmap>> + Send {
        let scene = surface.scene();
        let options = *options;
        async move { tokio::task::spawn_blocking(move || paint_scene(&scene, &options)).await? }
    }
}

const PHOTO_PLACEHOLDER: Rgb = Rgb(229, 231, 235);
const GREEKED_TEXT_ALPHA: u8 = 120;

/// Paint a scene into a new bitmap of `options.width_px x options.height_px`
/// surface pixels at `options.scale`.
pub fn paint_scene(scene: &Scene, options: &RasterOptions) -> Result<Bitmap> {
    let width = (options.width_px * options.scale).ceil().max(1.0) as u32;
    let height = (options.height_px * options.scale).ceil().max(1.0) as u32;
    let mut pixmap = Pixmap::new(width, height).ok_or_else(|| {
        ResumeError::Rasterize(format!("Cannot allocate a {}x{} canvas", width, height))
    })?;

    let bg = options.background;
    pixmap.fill(Color::from_rgba8(bg.0, bg.1, bg.2, 255));

    let zoom = options.scale * scene.visual_scale;
    let transform = Transform::from_scale(zoom, zoom);
    let face = scene.font.as_ref().and_then(FontData::face);
    let metrics = TextMetrics::new(scene.font.clone());
    let mut photo_frames = Vec::new();

    for item in &scene.layout.items {
        match item {
            DrawItem::Fill {
                x,
                y,
                width,
                height,
                color,
            } => fill_rect(&mut pixmap, *x, *y, *width, *height, *color, 255, transform),
            DrawItem::Text {
                x,
                baseline,
                size_px,
                color,
                text,
            } => match &face {
                Some(face) => {
                    draw_text(&mut pixmap, face, *x, *baseline, *size_px, *color, text, transform)
                }
                None => {
                    let bar_height = size_px * 0.45;
                    fill_rect(
                        &mut pixmap,
                        *x,
                        baseline - bar_height,
                        metrics.measure(text, *size_px),
                        bar_height,
                        *color,
                        GREEKED_TEXT_ALPHA,
                        transform,
                    );
                }
            },
            DrawItem::Photo { x, y, size } => {
                if scene.photo.is_some() {
                    photo_frames.push((*x, *y, *size));
                } else {
                    fill_rect(&mut pixmap, *x, *y, *size, *size, PHOTO_PLACEHOLDER, 255, transform);
                }
            }
        }
    }

    let mut image = pixmap_to_image(&pixmap)?;

    if let Some(photo) = &scene.photo {
        for (x, y, size) in photo_frames {
            let edge = (size * zoom).round().max(1.0) as u32;
            let square = square_crop(photo);
            let resized = imageops::resize(&square, edge, edge, FilterType::Triangle);
            imageops::overlay(
                &mut image,
                &resized,
                (x * zoom).round() as i64,
                (y * zoom).round() as i64,
            );
        }
    }

    Ok(Bitmap::new(image))
}

#[allow(clippy::too_many_arguments)]
fn fill_rect(
    pixmap: &mut Pixmap,
    x: f32,
    y: f32,
    width: f32,
    height: f32,
    color: Rgb,
    alpha: u8,
    transform: Transform,
) {
    let Some(rect) = Rect::from_xywh(x, y, width, height) else {
        return;
    };
    let mut paint = Paint::default();
    paint.set_color_rgba8(color.0, color.1, color.2, alpha);
    pixmap.fill_rect(rect, &paint, transform, None);
}

/// Glyph outlines in font units, mapped into surface pixels with y flipped
struct GlyphPath<'a> {
    builder: &'a mut PathBuilder,
    origin_x: f32,
    baseline: f32,
    scale: f32,
}

impl GlyphPath<'_> {
    fn map(&self, x: f32, y: f32) -> (f32, f32) {
        (self.origin_x + x * self.scale, self.baseline - y * self.scale)
    }
}

impl OutlineBuilder for GlyphPath<'_> {
    fn move_to(&mut self, x: f32, y: f32) {
        let (x, y) = self.map(x, y);
        self.builder.move_to(x, y);
    }

    fn line_to(&mut self, x: f32, y: f32) {
        let (x, y) = self.map(x, y);
        self.builder.line_to(x, y);
    }

    fn quad_to(&mut self, x1: f32, y1: f32, x: f32, y: f32) {
        let (x1, y1) = self.map(x1, y1);
        let (x, y) = self.map(x, y);
        self.builder.quad_to(x1, y1, x, y);
    }

    fn curve_to(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, x: f32, y: f32) {
        let (x1, y1) = self.map(x1, y1);
        let (x2, y2) = self.map(x2, y2);
        let (x, y) = self.map(x, y);
        self.builder.cubic_to(x1, y1, x2, y2, x, y);
    }

    fn close(&mut self) {
        self.builder.close();
    }
}

#[allow(clippy::too_many_arguments)]
fn draw_text(
    pixmap: &mut Pixmap,
    face: &ttf_parser::Face<'_>,
    x: f32,
    baseline: f32,
    size_px: f32,
    color: Rgb,
    text: &str,
    transform: Transform,
) {
    let scale = size_px / face.units_per_em() as f32;
    let mut builder = PathBuilder::new();
    let mut pen = x;

    for ch in text.chars() {
        let advance = match face.glyph_index(ch) {
            Some(glyph) => {
                let mut outline = GlyphPath {
                    builder: &mut builder,
                    origin_x: pen,
                    baseline,
                    scale,
                };
                face.outline_glyph(glyph, &mut outline);
                face.glyph_hor_advance(glyph)
                    .map(|advance| advance as f32 * scale)
                    .unwrap_or(size_px * FALLBACK_CHAR_WIDTH_RATIO)
            }
            None => size_px * FALLBACK_CHAR_WIDTH_RATIO,
        };
        pen += advance;
    }

    if let Some(path) = builder.finish() {
        let mut paint = Paint::default();
        paint.set_color_rgba8(color.0, color.1, color.2, 255);
        pixmap.fill_path(&path, &paint, FillRule::Winding, transform, None);
    }
}

fn pixmap_to_image(pixmap: &Pixmap) -> Result<RgbaImage> {
    let mut bytes = Vec::with_capacity(pixmap.data().len());
    for pixel in pixmap.pixels() {
        let color = pixel.demultiply();
        bytes.extend_from_slice(&[color.red(), color.green(), color.blue(), color.alpha()]);
    }
    RgbaImage::from_raw(pixmap.width(), pixmap.height(), bytes)
        .ok_or_else(|| ResumeError::Rasterize("Pixel buffer size mismatch".to_string()))
}

/// Centered square crop of the photo
fn square_crop(photo: &RgbaImage) -> RgbaImage {
    let edge = photo.width().min(photo.height());
    let x = (photo.width() - edge) / 2;
    let y = (photo.height() - edge) / 2;
    imageops::crop_imm(photo, x, y, edge, edge).to_image()
}
