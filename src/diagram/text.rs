use std::path::Path;

use crate::diagram::{DIAGRAM_DPI, DiagramKind, DiagramRenderer, validate_dpi};
use crate::foundation::error::AssetResult;
use crate::foundation::geom::Point;
use crate::raster::{Rasterizer, crop_to_content, save_png};
use crate::svg::{SvgDoc, TextStyle};

pub const FALLBACK_GLYPH: [&str; 3] = ["H───●───●───●", "    │   │   │", "    0   1   2"];

const WHITE: [u8; 4] = [255, 255, 255, 255];

/// Draws the circuit as monospace box-drawing text and trims the figure to the glyph.
#[derive(Clone, Debug)]
pub struct TextFallbackRenderer {
    pub lines: Vec<String>,
    /// Font size in points.
    pub font_pt: f64,
    /// Figure size in inches before trimming.
    pub size_in: (f64, f64),
    /// Text origin as a fraction of the figure (left, baseline of the last line).
    pub origin: (f64, f64),
    pub dpi: f64,
    /// Margin kept around the glyph, in inches.
    pub pad_in: f64,
}

impl Default for TextFallbackRenderer {
    fn default() -> Self {
        Self {
            lines: FALLBACK_GLYPH.iter().map(|l| l.to_string()).collect(),
            font_pt: 20.0,
            size_in: (10.0, 2.0),
            origin: (0.1, 0.5),
            dpi: DIAGRAM_DPI,
            pad_in: 0.1,
        }
    }
}

impl TextFallbackRenderer {
    pub fn to_svg(&self) -> String {
        let (w, h) = (self.size_in.0 * 100.0, self.size_in.1 * 100.0);
        let size = self.font_pt * 100.0 / 72.0;
        let line_h = size * 1.2;

        let mut doc = SvgDoc::new(w, h);
        doc.rect(0.0, 0.0, w, h, "#ffffff", None);

        // The origin anchors the bottom line; earlier lines stack upward.
        let x = w * self.origin.0;
        let bottom = h * (1.0 - self.origin.1);
        let n = self.lines.len();
        for (i, line) in self.lines.iter().enumerate() {
            let y = bottom - line_h * (n - 1 - i) as f64;
            doc.text(Point::new(x, y), line, TextStyle::mono(size));
        }
        doc.finish()
    }
}

impl DiagramRenderer for TextFallbackRenderer {
    fn kind(&self) -> DiagramKind {
        DiagramKind::TextFallback
    }

    fn render(&self, raster: &Rasterizer, out: &Path) -> AssetResult<()> {
        let scale = validate_dpi(self.dpi)?;
        let img = raster.rasterize(&self.to_svg(), scale)?;
        let pad = (self.pad_in * self.dpi).round() as u32;
        save_png(&crop_to_content(&img, WHITE, pad), out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn svg_contains_every_glyph_line() {
        let svg = TextFallbackRenderer::default().to_svg();
        assert!(svg.contains(">H───●───●───●</text>"));
        assert!(svg.contains(">    │   │   │</text>"));
        assert!(svg.contains(">    0   1   2</text>"));
        assert!(svg.contains(r#"xml:space="preserve""#));
    }

    #[test]
    fn blank_render_keeps_full_figure() {
        // Without fonts nothing is drawn, so there is nothing to trim.
        let tmp = tempfile::tempdir().unwrap();
        let out = tmp.path().join("fallback.png");
        TextFallbackRenderer::default()
            .render(&Rasterizer::without_fonts(), &out)
            .unwrap();
        let img = image::open(&out).unwrap();
        assert_eq!((img.width(), img.height()), (1500, 300));
    }

    #[test]
    fn lines_stack_upward_from_origin() {
        let r = TextFallbackRenderer {
            lines: vec!["a".into(), "b".into()],
            ..TextFallbackRenderer::default()
        };
        let svg = r.to_svg();
        let a = svg.find(">a</text>").unwrap();
        let b = svg.find(">b</text>").unwrap();
        assert!(a < b);
        assert!(svg.contains(r#"y="100""#));
    }
}
