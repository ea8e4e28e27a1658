//! Text measurement and line wrapping

use crate::constants::FALLBACK_CHAR_WIDTH_RATIO;
use crate::types::{ResumeError, Result};
use std::path::Path;
use std::sync::Arc;

/// Raw bytes of a TrueType/OpenType font, checked to parse on load
#[derive(Clone)]
pub struct FontData {
    bytes: Arc<Vec<u8>>,
    index: u32,
}

impl std::fmt::Debug for FontData {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontData")
            .field("len", &self.bytes.len())
            .field("index", &self.index)
            .finish()
    }
}

impl FontData {
    pub fn from_bytes(bytes: Vec<u8>, index: u32) -> Result<Self> {
        ttf_parser::Face::parse(&bytes, index)
            .map_err(|e| ResumeError::Font(format!("Failed to parse font: {}", e)))?;
        Ok(Self {
            bytes: Arc::new(bytes),
            index,
        })
    }

    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let bytes = tokio::fs::read(path).await?;
        Self::from_bytes(bytes, 0)
    }

    /// Parsed face. Parsing succeeded once in the constructor, so it cannot
    /// fail for the same bytes.
    pub fn face(&self) -> Option<ttf_parser::Face<'_>> {
        ttf_parser::Face::parse(&self.bytes, self.index).ok()
    }
}

/// Measures text either with real glyph advances or, without a font, with
/// a fixed average character width.
#[derive(Debug, Clone, Default)]
pub struct TextMetrics {
    font: Option<FontData>,
}

impl TextMetrics {
    pub fn new(font: Option<FontData>) -> Self {
        Self { font }
    }

    pub fn font(&self) -> Option<&FontData> {
        self.font.as_ref()
    }

    /// Advance width of `text` at `size_px`
    pub fn measure(&self, text: &str, size_px: f32) -> f32 {
        match self.font.as_ref().and_then(FontData::face) {
            Some(face) => {
                let scale = size_px / face.units_per_em() as f32;
                text.chars()
                    .map(|ch| {
                        face.glyph_index(ch)
                            .and_then(|id| face.glyph_hor_advance(id))
                            .map(|advance| advance as f32 * scale)
                            .unwrap_or(size_px * FALLBACK_CHAR_WIDTH_RATIO)
                    })
                    .sum()
            }
            None => text.chars().count() as f32 * size_px * FALLBACK_CHAR_WIDTH_RATIO,
        }
    }

    /// Greedy word wrap into lines no wider than `max_width`. Words wider
    /// than a whole line get a line of their own. Explicit newlines are kept.
    pub fn wrap(&self, text: &str, size_px: f32, max_width: f32) -> Vec<String> {
        let space = self.measure(" ", size_px);
        let mut lines = Vec::new();

        for paragraph in text.lines() {
            let mut current = String::new();
            let mut current_width = 0.0;

            for word in paragraph.split_whitespace() {
                let word_width = self.measure(word, size_px);
                if current.is_empty() {
                    current.push_str(word);
                    current_width = word_width;
                } else if current_width + space + word_width <= max_width {
                    current.push(' ');
                    current.push_str(word);
                    current_width += space + word_width;
                } else {
                    lines.push(std::mem::take(&mut current));
                    current.push_str(word);
                    current_width = word_width;
                }
            }

            if !current.is_empty() {
                lines.push(current);
            }
        }

        lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fallback_measure() {
        let metrics = TextMetrics::default();
        assert_eq!(metrics.measure("abcd", 10.0), 20.0);
    }

    #[test]
    fn test_wrap_breaks_on_width() {
        let metrics = TextMetrics::default();
        // Each char is 5px wide at 10px; "aaaa bbbb" is 45px
        let lines = metrics.wrap("aaaa bbbb cccc", 10.0, 45.0);
        assert_eq!(lines, vec!["aaaa bbbb", "cccc"]);
    }

    #[test]
    fn test_wrap_keeps_long_words_and_newlines() {
        let metrics = TextMetrics::default();
        let lines = metrics.wrap("averyveryverylongword\nnext", 10.0, 20.0);
        assert_eq!(lines, vec!["averyveryverylongword", "next"]);
    }

    #[test]
    fn test_wrap_empty() {
        let metrics = TextMetrics::default();
        assert!(metrics.wrap("   ", 10.0, 100.0).is_empty());
    }

    #[test]
    fn test_invalid_font_bytes() {
        assert!(matches!(
            FontData::from_bytes(vec![0, 1, 2, 3], 0),
            Err(ResumeError::Font(_))
        ));
    }
}
