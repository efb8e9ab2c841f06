//! Minimal SVG document writer used by the producers.
//!
//! Documents are plain strings handed to [`crate::raster::Rasterizer`]; nothing here
//! touches the filesystem.

use std::fmt::Write as _;

use crate::foundation::geom::{BezPath, Point};

pub const SANS_FAMILY: &str = "DejaVu Sans, Liberation Sans, Arial, sans-serif";
pub const MONO_FAMILY: &str = "DejaVu Sans Mono, Liberation Mono, Courier New, monospace";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Anchor {
    Start,
    Middle,
    End,
}

impl Anchor {
    fn as_str(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Middle => "middle",
            Self::End => "end",
        }
    }
}

/// Text run style. `size` is in user units.
#[derive(Clone, Copy, Debug)]
pub struct TextStyle<'a> {
    pub family: &'a str,
    pub size: f64,
    pub fill: &'a str,
    pub anchor: Anchor,
}

impl<'a> TextStyle<'a> {
    pub fn sans(size: f64) -> Self {
        Self {
            family: SANS_FAMILY,
            size,
            fill: "#000000",
            anchor: Anchor::Start,
        }
    }

    pub fn mono(size: f64) -> Self {
        Self {
            family: MONO_FAMILY,
            ..Self::sans(size)
        }
    }

    pub fn anchored(mut self, anchor: Anchor) -> Self {
        self.anchor = anchor;
        self
    }
}

/// Stroke parameters for lines and paths.
#[derive(Clone, Copy, Debug)]
pub struct Stroke<'a> {
    pub color: &'a str,
    pub width: f64,
    pub dash: Option<(f64, f64)>,
}

impl<'a> Stroke<'a> {
    pub fn solid(color: &'a str, width: f64) -> Self {
        Self {
            color,
            width,
            dash: None,
        }
    }

    pub fn dashed(color: &'a str, width: f64, on: f64, off: f64) -> Self {
        Self {
            color,
            width,
            dash: Some((on, off)),
        }
    }

    fn attrs(&self) -> String {
        let mut s = format!(
            r#"stroke="{}" stroke-width="{}""#,
            self.color,
            num(self.width)
        );
        if let Some((on, off)) = self.dash {
            let _ = write!(s, r#" stroke-dasharray="{} {}""#, num(on), num(off));
        }
        s
    }
}

pub struct SvgDoc {
    width: f64,
    height: f64,
    body: String,
}

impl SvgDoc {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            body: String::new(),
        }
    }

    pub fn rect(&mut self, x: f64, y: f64, w: f64, h: f64, fill: &str, stroke: Option<Stroke>) {
        let stroke = stroke.map(|s| s.attrs()).unwrap_or_default();
        let _ = writeln!(
            self.body,
            r#"<rect x="{}" y="{}" width="{}" height="{}" fill="{fill}" {stroke}/>"#,
            num(x),
            num(y),
            num(w),
            num(h),
        );
    }

    pub fn line(&mut self, a: Point, b: Point, stroke: Stroke) {
        let _ = writeln!(
            self.body,
            r#"<line x1="{}" y1="{}" x2="{}" y2="{}" {}/>"#,
            num(a.x),
            num(a.y),
            num(b.x),
            num(b.y),
            stroke.attrs()
        );
    }

    pub fn path(&mut self, path: &BezPath, stroke: Stroke) {
        let _ = writeln!(
            self.body,
            r#"<path d="{}" fill="none" stroke-linejoin="round" {}/>"#,
            path.to_svg(),
            stroke.attrs()
        );
    }

    pub fn fill_path(&mut self, path: &BezPath, fill: &str) {
        let _ = writeln!(
            self.body,
            r#"<path d="{}" fill="{fill}" stroke="none"/>"#,
            path.to_svg()
        );
    }

    pub fn circle(&mut self, c: Point, r: f64, fill: &str, stroke: Option<Stroke>) {
        let stroke = stroke.map(|s| s.attrs()).unwrap_or_default();
        let _ = writeln!(
            self.body,
            r#"<circle cx="{}" cy="{}" r="{}" fill="{fill}" {stroke}/>"#,
            num(c.x),
            num(c.y),
            num(r),
        );
    }

    /// Single text run with its baseline at `at`.
    pub fn text(&mut self, at: Point, content: &str, style: TextStyle) {
        self.text_rotated(at, content, style, 0.0);
    }

    /// Text run rotated by `degrees` around its anchor point.
    pub fn text_rotated(&mut self, at: Point, content: &str, style: TextStyle, degrees: f64) {
        let rotate = if degrees == 0.0 {
            String::new()
        } else {
            format!(
                r#" transform="rotate({} {} {})""#,
                num(degrees),
                num(at.x),
                num(at.y)
            )
        };
        let _ = writeln!(
            self.body,
            r#"<text x="{}" y="{}" font-family="{}" font-size="{}" fill="{}" text-anchor="{}" xml:space="preserve"{rotate}>{}</text>"#,
            num(at.x),
            num(at.y),
            style.family,
            num(style.size),
            style.fill,
            style.anchor.as_str(),
            escape(content)
        );
    }

    pub fn finish(self) -> String {
        format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">
{body}</svg>
"#,
            w = num(self.width),
            h = num(self.height),
            body = self.body
        )
    }
}

/// Fixed-precision number formatting keeps documents byte-stable across runs.
fn num(v: f64) -> String {
    let s = format!("{v:.3}");
    let s = s.trim_end_matches('0').trim_end_matches('.');
    if s == "-0" { "0".to_string() } else { s.to_string() }
}

pub fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c => out.push(c),
        }
    }
    out
}
