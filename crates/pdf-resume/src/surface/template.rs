//! Resume template surface
//!
//! Lays out [`ResumeData`] as a single column of positioned draw items:
//! header (name, title, contact line, optional photo) followed by the
//! visible sections in a fixed order. Layout runs at the logical width of
//! the surface; the visual scale is applied only when painting.

use super::{FontData, RenderSurface, TemplateStyle, TemplateVariant, TextMetrics, Visibility};
use crate::data::ResumeData;
use crate::types::{PageGeometry, ResumeError, Result, Rgb};
use image::RgbaImage;
use std::collections::HashSet;
use std::future::Future;
use std::path::Path;
use std::sync::Arc;

/// Optional named sub-sections of a template
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section {
    Summary,
    Experience,
    Education,
    Skills,
    Languages,
    Certifications,
    Photo,
}

impl Section {
    pub const ALL: [Section; 7] = [
        Section::Summary,
        Section::Experience,
        Section::Education,
        Section::Skills,
        Section::Languages,
        Section::Certifications,
        Section::Photo,
    ];

    pub fn key(self) -> &'static str {
        match self {
            Section::Summary => "summary",
            Section::Experience => "experience",
            Section::Education => "education",
            Section::Skills => "skills",
            Section::Languages => "languages",
            Section::Certifications => "certifications",
            Section::Photo => "photo",
        }
    }

    pub fn from_key(key: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|section| section.key().eq_ignore_ascii_case(key.trim()))
            .ok_or_else(|| ResumeError::Config(format!("Unknown section: {}", key)))
    }

    fn heading(self) -> &'static str {
        match self {
            Section::Summary => "Profile",
            Section::Experience => "Experience",
            Section::Education => "Education",
            Section::Skills => "Skills",
            Section::Languages => "Languages",
            Section::Certifications => "Certifications",
            Section::Photo => "Photo",
        }
    }
}

/// Parameters of the aggressive per-block compaction
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlockCompaction {
    pub min_font_px: f32,
    pub photo_px: f32,
}

/// Presentation state applied on top of the template style
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Presentation {
    pub compact: bool,
    pub visual_scale: f32,
    pub blocks: Option<BlockCompaction>,
}

impl Default for Presentation {
    fn default() -> Self {
        Self {
            compact: false,
            visual_scale: 1.0,
            blocks: None,
        }
    }
}

/// A positioned paint operation in logical surface pixels
#[derive(Debug, Clone, PartialEq)]
pub enum DrawItem {
    Fill {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        color: Rgb,
    },
    Text {
        x: f32,
        baseline: f32,
        size_px: f32,
        color: Rgb,
        text: String,
    },
    /// Square photo frame; the top-left corner is at (x, y)
    Photo { x: f32, y: f32, size: f32 },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Layout {
    pub width_px: f32,
    pub height_px: f32,
    pub items: Vec<DrawItem>,
}

/// Everything a rasterizer needs, detached from the surface
#[derive(Debug, Clone)]
pub struct Scene {
    pub layout: Layout,
    pub visual_scale: f32,
    pub font: Option<FontData>,
    pub photo: Option<Arc<RgbaImage>>,
}

#[derive(Debug, Clone)]
pub struct TemplateSurface {
    variant: TemplateVariant,
    data: ResumeData,
    base_width_px: f32,
    metrics: TextMetrics,
    photo: Option<Arc<RgbaImage>>,
    photo_failed: bool,
    hidden_sections: HashSet<Section>,
    presentation: Presentation,
    visibility: Visibility,
}

impl TemplateSurface {
    pub fn new(variant: TemplateVariant, data: ResumeData, width_px: f32) -> Self {
        Self {
            variant,
            data,
            base_width_px: width_px,
            metrics: TextMetrics::default(),
            photo: None,
            photo_failed: false,
            hidden_sections: HashSet::new(),
            presentation: Presentation::default(),
            visibility: Visibility::Hidden,
        }
    }

    /// Surface as wide as the page at 96 px per inch
    pub fn for_page(variant: TemplateVariant, data: ResumeData, geometry: &PageGeometry) -> Self {
        Self::new(variant, data, geometry.width_px())
    }

    pub fn with_metrics(mut self, metrics: TextMetrics) -> Self {
        self.metrics = metrics;
        self
    }

    pub fn with_photo(mut self, photo: RgbaImage) -> Self {
        self.photo = Some(Arc::new(photo));
        self
    }

    pub fn variant(&self) -> TemplateVariant {
        self.variant
    }

    pub fn data(&self) -> &ResumeData {
        &self.data
    }

    pub fn presentation(&self) -> Presentation {
        self.presentation
    }

    pub fn set_section_visible(&mut self, section: Section, visible: bool) {
        if visible {
            self.hidden_sections.remove(&section);
        } else {
            self.hidden_sections.insert(section);
        }
    }

    /// Visible when not hidden by the caller and there is something to show
    pub fn is_section_visible(&self, section: Section) -> bool {
        if self.hidden_sections.contains(&section) {
            return false;
        }
        let data = &self.data;
        match section {
            Section::Summary => !data.summary.trim().is_empty(),
            Section::Experience => !data.experience.is_empty(),
            Section::Education => !data.education.is_empty(),
            Section::Skills => !data.skills.is_empty(),
            Section::Languages => !data.languages.is_empty(),
            Section::Certifications => !data.certifications.is_empty(),
            Section::Photo => {
                self.photo.is_some() || (data.photo.is_some() && !self.photo_failed)
            }
        }
    }

    /// Template style with the current presentation applied
    pub fn style(&self) -> TemplateStyle {
        let mut style = self.variant.style();
        if self.presentation.compact {
            style = style.compact();
        }
        if let Some(blocks) = self.presentation.blocks {
            style = style.compact_blocks(blocks.min_font_px, blocks.photo_px);
        }
        style
    }

    /// Width the content is laid out at, enlarged by the inverse visual scale
    pub fn logical_width_px(&self) -> f32 {
        self.base_width_px / self.presentation.visual_scale
    }

    pub fn layout(&self) -> Layout {
        let style = self.style();
        let width = self.logical_width_px();
        let pad = style.padding_px;
        let content_width = (width - 2.0 * pad).max(1.0);
        let mut builder = LayoutBuilder {
            metrics: &self.metrics,
            line_height: style.line_height,
            x: pad,
            y: pad,
            items: Vec::new(),
        };

        // Header
        let show_photo = self.is_section_visible(Section::Photo);
        let header_top = builder.y;
        let header_text_width = if show_photo {
            (content_width - style.photo_px - style.block_gap_px).max(1.0)
        } else {
            content_width
        };
        let (name_color, title_color, contact_color) = match style.header_band {
            Some(_) => (Rgb::WHITE, Rgb::WHITE, Rgb::WHITE),
            None => (style.text, style.accent, style.muted),
        };

        let personal = &self.data.personal;
        builder.paragraph(
            &personal.full_name,
            style.name_font_px,
            name_color,
            header_text_width,
        );
        builder.paragraph(
            &personal.title,
            style.heading_font_px,
            title_color,
            header_text_width,
        );
        builder.paragraph(
            &personal.contact_fields().join("  |  "),
            style.small_font_px,
            contact_color,
            header_text_width,
        );

        let mut header_bottom = builder.y;
        if show_photo {
            builder.items.push(DrawItem::Photo {
                x: pad + content_width - style.photo_px,
                y: header_top,
                size: style.photo_px,
            });
            header_bottom = header_bottom.max(header_top + style.photo_px);
        }

        if let Some(band) = style.header_band {
            let band_height = header_bottom + pad * 0.5;
            builder.items.insert(
                0,
                DrawItem::Fill {
                    x: 0.0,
                    y: 0.0,
                    width,
                    height: band_height,
                    color: band,
                },
            );
            header_bottom = band_height;
        }
        builder.y = header_bottom + style.section_gap_px;

        // Sections
        let sections = Section::ALL
            .into_iter()
            .filter(|section| *section != Section::Photo)
            .filter(|section| self.is_section_visible(*section));

        for section in sections {
            builder.paragraph(
                section.heading(),
                style.heading_font_px,
                style.accent,
                content_width,
            );
            if style.section_rule {
                builder.items.push(DrawItem::Fill {
                    x: pad,
                    y: builder.y + 1.0,
                    width: content_width,
                    height: 1.5,
                    color: style.accent,
                });
                builder.y += 4.0;
            }
            builder.y += style.block_gap_px * 0.5;

            self.layout_section_body(section, &style, content_width, &mut builder);
            builder.y += style.section_gap_px;
        }

        let height_px = (builder.y - style.section_gap_px).max(header_bottom) + pad;
        Layout {
            width_px: width,
            height_px,
            items: builder.items,
        }
    }

    fn layout_section_body(
        &self,
        section: Section,
        style: &TemplateStyle,
        width: f32,
        builder: &mut LayoutBuilder<'_>,
    ) {
        let data = &self.data;
        match section {
            Section::Summary => {
                builder.paragraph(&data.summary, style.body_font_px, style.text, width);
            }
            Section::Experience => {
                for (i, entry) in data.experience.iter().enumerate() {
                    if i > 0 {
                        builder.y += style.block_gap_px;
                    }
                    builder.paragraph(
                        &joined(&entry.role, &entry.company),
                        style.body_font_px,
                        style.text,
                        width,
                    );
                    builder.paragraph(&entry.period, style.small_font_px, style.muted, width);
                    builder.paragraph(&entry.description, style.body_font_px, style.text, width);
                }
            }
            Section::Education => {
                for (i, entry) in data.education.iter().enumerate() {
                    if i > 0 {
                        builder.y += style.block_gap_px;
                    }
                    builder.paragraph(
                        &joined(&entry.degree, &entry.school),
                        style.body_font_px,
                        style.text,
                        width,
                    );
                    builder.paragraph(&entry.period, style.small_font_px, style.muted, width);
                    builder.paragraph(&entry.details, style.body_font_px, style.text, width);
                }
            }
            Section::Skills => {
                builder.paragraph(&data.skills.join(", "), style.body_font_px, style.text, width);
            }
            Section::Languages => {
                builder.paragraph(
                    &data.languages.join(", "),
                    style.body_font_px,
                    style.text,
                    width,
                );
            }
            Section::Certifications => {
                builder.paragraph(
                    &data.certifications.join("\n"),
                    style.body_font_px,
                    style.text,
                    width,
                );
            }
            Section::Photo => {}
        }
    }

    /// Snapshot for painting
    pub fn scene(&self) -> Scene {
        let photo = if self.is_section_visible(Section::Photo) {
            self.photo.clone()
        } else {
            None
        };
        Scene {
            layout: self.layout(),
            visual_scale: self.presentation.visual_scale,
            font: self.metrics.font().cloned(),
            photo,
        }
    }
}

fn joined(primary: &str, secondary: &str) -> String {
    match (primary.trim(), secondary.trim()) {
        ("", s) => s.to_string(),
        (p, "") => p.to_string(),
        (p, s) => format!("{}  |  {}", p, s),
    }
}

struct LayoutBuilder<'a> {
    metrics: &'a TextMetrics,
    line_height: f32,
    x: f32,
    y: f32,
    items: Vec<DrawItem>,
}

impl LayoutBuilder<'_> {
    fn paragraph(&mut self, text: &str, size_px: f32, color: Rgb, width: f32) {
        let line_box = size_px * self.line_height;
        for line in self.metrics.wrap(text, size_px, width) {
            // Baseline sits where the ascender-to-descender box is vertically centered
            let baseline = self.y + (line_box + size_px * 0.7) * 0.5;
            self.items.push(DrawItem::Text {
                x: self.x,
                baseline,
                size_px,
                color,
                text: line,
            });
            self.y += line_box;
        }
    }
}

pub(crate) async fn load_photo(path: &Path) -> Result<RgbaImage> {
    let bytes = tokio::fs::read(path).await?;
    let image = tokio::task::spawn_blocking(move || {
        image::load_from_memory(&bytes).map(|decoded| decoded.to_rgba8())
    })
    .await??;
    Ok(image)
}

impl RenderSurface for TemplateSurface {
    fn content_height_px(&self) -> f32 {
        self.layout().height_px * self.presentation.visual_scale
    }

    fn rendered_width_px(&self) -> f32 {
        self.base_width_px
    }

    fn apply_compact_mode(&mut self) {
        self.presentation.compact = true;
    }

    fn apply_visual_scale(&mut self, factor: f32) {
        if factor.is_finite() && factor > 0.0 {
            self.presentation.visual_scale = factor;
        }
    }

    fn compact_blocks(&mut self, min_font_px: f32, photo_px: f32) {
        self.presentation.blocks = Some(BlockCompaction {
            min_font_px,
            photo_px,
        });
    }

    fn reset_presentation(&mut self) {
        self.presentation = Presentation::default();
    }

    fn set_visibility(&mut self, visibility: Visibility) {
        self.visibility = visibility;
    }

    fn visibility(&self) -> Visibility {
        self.visibility
    }

    fn wait_until_ready(&mut self) -> impl Future<Output = ()> + Send {
        async move {
            if self.photo.is_some() || self.photo_failed {
                return;
            }
            let Some(path) = self.data.photo.clone() else {
                return;
            };
            match load_photo(&path).await {
                Ok(photo) => self.photo = Some(Arc::new(photo)),
                Err(e) => {
                    log::warn!("Photo {} could not be loaded: {}", path.display(), e);
                    self.photo_failed = true;
                }
            }
        }
    }
}
