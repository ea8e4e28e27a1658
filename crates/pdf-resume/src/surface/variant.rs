use crate::types::{ResumeError, Result, Rgb};
use std::fmt;
use std::str::FromStr;

/// Template variants. Each exposes the same structure (header, optional
/// sections) and differs only in style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TemplateVariant {
    #[default]
    Modern,
    Classic,
    Creative,
}

impl TemplateVariant {
    pub const ALL: [TemplateVariant; 3] = [
        TemplateVariant::Modern,
        TemplateVariant::Classic,
        TemplateVariant::Creative,
    ];

    pub fn key(self) -> &'static str {
        match self {
            TemplateVariant::Modern => "modern",
            TemplateVariant::Classic => "classic",
            TemplateVariant::Creative => "creative",
        }
    }

    pub fn from_key(key: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|variant| variant.key().eq_ignore_ascii_case(key.trim()))
            .ok_or_else(|| ResumeError::TemplateNotFound(key.to_string()))
    }

    pub fn style(self) -> TemplateStyle {
        match self {
            TemplateVariant::Modern => TemplateStyle {
                accent: Rgb(37, 99, 235),
                text: Rgb(31, 41, 55),
                muted: Rgb(107, 114, 128),
                header_band: None,
                section_rule: true,
                name_font_px: 30.0,
                heading_font_px: 16.0,
                body_font_px: 13.0,
                small_font_px: 11.0,
                line_height: 1.45,
                padding_px: 40.0,
                section_gap_px: 22.0,
                block_gap_px: 12.0,
                photo_px: 110.0,
            },
            TemplateVariant::Classic => TemplateStyle {
                accent: Rgb(17, 24, 39),
                text: Rgb(17, 24, 39),
                muted: Rgb(75, 85, 99),
                header_band: None,
                section_rule: true,
                name_font_px: 28.0,
                heading_font_px: 15.0,
                body_font_px: 13.0,
                small_font_px: 11.0,
                line_height: 1.5,
                padding_px: 48.0,
                section_gap_px: 24.0,
                block_gap_px: 14.0,
                photo_px: 100.0,
            },
            TemplateVariant::Creative => TemplateStyle {
                accent: Rgb(219, 39, 119),
                text: Rgb(31, 41, 55),
                muted: Rgb(107, 114, 128),
                header_band: Some(Rgb(88, 28, 135)),
                section_rule: false,
                name_font_px: 32.0,
                heading_font_px: 17.0,
                body_font_px: 13.0,
                small_font_px: 11.0,
                line_height: 1.45,
                padding_px: 36.0,
                section_gap_px: 20.0,
                block_gap_px: 12.0,
                photo_px: 120.0,
            },
        }
    }
}

impl FromStr for TemplateVariant {
    type Err = ResumeError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_key(s)
    }
}

impl fmt::Display for TemplateVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Visual parameters of a template variant, in surface pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TemplateStyle {
    pub accent: Rgb,
    pub text: Rgb,
    pub muted: Rgb,
    /// Filled band behind the header, header text drawn in white
    pub header_band: Option<Rgb>,
    /// Thin accent rule under each section heading
    pub section_rule: bool,
    pub name_font_px: f32,
    pub heading_font_px: f32,
    pub body_font_px: f32,
    pub small_font_px: f32,
    /// Line box height as a multiple of font size
    pub line_height: f32,
    pub padding_px: f32,
    pub section_gap_px: f32,
    pub block_gap_px: f32,
    pub photo_px: f32,
}

impl TemplateStyle {
    /// Denser preset: tighter spacing, slightly smaller type
    pub fn compact(mut self) -> Self {
        self.name_font_px *= 0.85;
        self.heading_font_px *= 0.9;
        self.body_font_px *= 0.92;
        self.small_font_px *= 0.92;
        self.line_height = (self.line_height - 0.2).max(1.2);
        self.padding_px *= 0.7;
        self.section_gap_px *= 0.6;
        self.block_gap_px *= 0.6;
        self.photo_px *= 0.8;
        self
    }

    /// Every block at the minimum readable size with minimal spacing
    pub fn compact_blocks(mut self, min_font_px: f32, photo_px: f32) -> Self {
        self.name_font_px = self.name_font_px.min(min_font_px * 2.0);
        self.heading_font_px = self.heading_font_px.min(min_font_px * 1.2);
        self.body_font_px = self.body_font_px.min(min_font_px);
        self.small_font_px = self.small_font_px.min(min_font_px);
        self.line_height = self.line_height.min(1.2);
        self.padding_px = self.padding_px.min(16.0);
        self.section_gap_px = self.section_gap_px.min(8.0);
        self.block_gap_px = self.block_gap_px.min(4.0);
        self.photo_px = photo_px;
        self
    }
}
