//! Font metrics capability
//!
//! The toolkit never loads or rasterizes fonts. Layout code only needs glyph
//! advances and vertical metrics, which any font backend can provide by
//! implementing [`FontFace`]. A fixed-advance face matching the classic 7x13
//! bitmap font is built in and used as the default everywhere.

use std::fmt::Debug;
use std::sync::Arc;

/// Shared handle to a font face
pub type Font = Arc<dyn FontFace>;

/// Metrics a font must expose for text measurement and caret placement
pub trait FontFace: Debug + Send + Sync {
    /// Horizontal advance of `ch` in pixels, `None` if the face has no glyph
    fn advance(&self, ch: char) -> Option<i32>;

    /// Pixels from the top of a line to the baseline
    fn ascent(&self) -> i32;

    /// Pixels from the baseline to the bottom of a line
    fn descent(&self) -> i32;

    /// Height of one line of text
    fn line_height(&self) -> i32 {
        self.ascent() + self.descent()
    }
}

/// Monospace face where every covered glyph has the same advance
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedFont {
    advance: i32,
    ascent: i32,
    descent: i32,
    /// Glyphs outside this range have no advance
    coverage: (char, char),
}

impl FixedFont {
    /// Create a fixed-advance face covering every code point
    pub fn new(advance: i32, ascent: i32, descent: i32) -> Self {
        FixedFont {
            advance,
            ascent,
            descent,
            coverage: ('\0', char::MAX),
        }
    }

    /// The 7x13 face: 7px advance, 11px ascent, 2px descent
    pub fn face_7x13() -> Self {
        FixedFont::new(7, 11, 2)
    }

    /// Restrict the glyphs this face can measure
    pub fn with_coverage(mut self, first: char, last: char) -> Self {
        self.coverage = (first, last);
        self
    }

    /// Wrap into a shareable [`Font`] handle
    pub fn shared(self) -> Font {
        Arc::new(self)
    }
}

impl Default for FixedFont {
    fn default() -> Self {
        FixedFont::face_7x13()
    }
}

impl FontFace for FixedFont {
    fn advance(&self, ch: char) -> Option<i32> {
        let (first, last) = self.coverage;
        (first..=last).contains(&ch).then_some(self.advance)
    }

    fn ascent(&self) -> i32 {
        self.ascent
    }

    fn descent(&self) -> i32 {
        self.descent
    }
}

/// The default font handle used by every widget style
pub fn default_font() -> Font {
    FixedFont::face_7x13().shared()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_face_7x13_metrics() {
        let face = FixedFont::face_7x13();
        assert_eq!(face.advance('a'), Some(7));
        assert_eq!(face.advance('é'), Some(7));
        assert_eq!(face.line_height(), 13);
    }

    #[test]
    fn test_coverage_limits_glyphs() {
        let face = FixedFont::new(5, 8, 2).with_coverage(' ', '~');
        assert_eq!(face.advance('x'), Some(5));
        assert_eq!(face.advance('ß'), None);
    }
}
