//! Plot producer: the yield-improvement line chart.

use std::path::Path;

use crate::foundation::error::{AssetError, AssetResult};
use crate::foundation::geom::{AxisMap, Point, Rect, nice_ticks, pad_range};
use crate::raster::Rasterizer;
use crate::svg::{Anchor, Stroke, SvgDoc, TextStyle};

/// Yield improvement (%) per year, 2025 through 2030.
pub const YIELD_IMPROVEMENT: [(i32, f64); 6] = [
    (2025, 5.0),
    (2026, 8.0),
    (2027, 12.0),
    (2028, 15.0),
    (2029, 18.0),
    (2030, 22.0),
];

pub const LINE_COLOR: &str = "#1f77b4";
pub const GRID_COLOR: &str = "#b0b0b0";

/// User units per inch; rasterizing at `dpi / UNITS_PER_INCH` gives the figure's pixel size.
pub const UNITS_PER_INCH: f64 = 100.0;

/// Subplot margins as figure fractions (left, bottom, right, top).
const MARGINS: (f64, f64, f64, f64) = (0.125, 0.11, 0.9, 0.88);

#[derive(Clone, Debug)]
pub struct LineChart {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub points: Vec<(f64, f64)>,
    /// Figure size in inches.
    pub size_in: (f64, f64),
    pub dpi: f64,
    pub color: String,
    pub markers: bool,
    pub grid: bool,
    /// Fixed y range; the data extent padded by 5% when `None`.
    pub y_range: Option<(f64, f64)>,
    /// X tick positions; every data x when `None`.
    pub x_ticks: Option<Vec<f64>>,
}

pub fn yield_improvement_chart() -> LineChart {
    LineChart {
        title: "Quantum-Enhanced Yield Improvement (%)".to_string(),
        x_label: "Year".to_string(),
        y_label: "Yield Improvement (%)".to_string(),
        points: YIELD_IMPROVEMENT
            .iter()
            .map(|&(year, pct)| (f64::from(year), pct))
            .collect(),
        size_in: (8.0, 6.0),
        dpi: 150.0,
        color: LINE_COLOR.to_string(),
        markers: true,
        grid: true,
        y_range: None,
        x_ticks: None,
    }
}

impl LineChart {
    pub fn canvas_size(&self) -> (f64, f64) {
        (
            self.size_in.0 * UNITS_PER_INCH,
            self.size_in.1 * UNITS_PER_INCH,
        )
    }

    pub fn scale(&self) -> f32 {
        (self.dpi / UNITS_PER_INCH) as f32
    }

    fn axis_map(&self) -> AssetResult<AxisMap> {
        if self.points.is_empty() {
            return Err(AssetError::validation("line chart has no points"));
        }
        let (w, h) = self.canvas_size();
        let (l, b, r, t) = MARGINS;
        let canvas = Rect::new(w * l, h * (1.0 - t), w * r, h * (1.0 - b));

        let (x_lo, x_hi) = min_max(self.points.iter().map(|p| p.0));
        let (x_lo, x_hi) = pad_range(x_lo, x_hi, 0.05);
        let (y_lo, y_hi) = match self.y_range {
            Some(r) => r,
            None => {
                let (lo, hi) = min_max(self.points.iter().map(|p| p.1));
                pad_range(lo, hi, 0.05)
            }
        };
        if !(x_hi > x_lo && y_hi > y_lo) {
            return Err(AssetError::validation("line chart has an empty data range"));
        }
        Ok(AxisMap::new(Rect::new(x_lo, y_lo, x_hi, y_hi), canvas))
    }

    pub fn to_svg(&self) -> AssetResult<String> {
        let map = self.axis_map()?;
        let (w, h) = self.canvas_size();
        let area = map.canvas();
        let data = map.data();
        let mut doc = SvgDoc::new(w, h);
        doc.rect(0.0, 0.0, w, h, "#ffffff", None);

        let x_ticks = match &self.x_ticks {
            Some(t) => t.clone(),
            None => self.points.iter().map(|p| p.0).collect(),
        };
        let y_ticks = nice_ticks(data.y0, data.y1, 8);

        if self.grid {
            let grid = Stroke::solid(GRID_COLOR, 0.8);
            for &x in &x_ticks {
                doc.line(map.to_canvas(x, data.y0), map.to_canvas(x, data.y1), grid);
            }
            for &y in &y_ticks {
                doc.line(map.to_canvas(data.x0, y), map.to_canvas(data.x1, y), grid);
            }
        }

        let tick = Stroke::solid("#000000", 0.8);
        let tick_label = TextStyle::sans(13.9).anchored(Anchor::Middle);
        for &x in &x_ticks {
            let p = map.to_canvas(x, data.y0);
            doc.line(p, Point::new(p.x, p.y + 5.0), tick);
            doc.text(Point::new(p.x, p.y + 21.0), &fmt_tick(x), tick_label);
        }
        let tick_label = TextStyle::sans(13.9).anchored(Anchor::End);
        for &y in &y_ticks {
            let p = map.to_canvas(data.x0, y);
            doc.line(p, Point::new(p.x - 5.0, p.y), tick);
            doc.text(Point::new(p.x - 8.0, p.y + 5.0), &fmt_tick(y), tick_label);
        }

        doc.path(
            &map.polyline(self.points.iter().copied()),
            Stroke::solid(&self.color, 2.1),
        );
        if self.markers {
            for &(x, y) in &self.points {
                doc.circle(map.to_canvas(x, y), 4.2, &self.color, None);
            }
        }

        doc.rect(
            area.x0,
            area.y0,
            area.width(),
            area.height(),
            "none",
            Some(Stroke::solid("#000000", 1.1)),
        );

        let center_x = (area.x0 + area.x1) / 2.0;
        let center_y = (area.y0 + area.y1) / 2.0;
        doc.text(
            Point::new(center_x, area.y0 - 10.0),
            &self.title,
            TextStyle::sans(16.7).anchored(Anchor::Middle),
        );
        doc.text(
            Point::new(center_x, area.y1 + 45.0),
            &self.x_label,
            TextStyle::sans(13.9).anchored(Anchor::Middle),
        );
        doc.text_rotated(
            Point::new(area.x0 - 50.0, center_y),
            &self.y_label,
            TextStyle::sans(13.9).anchored(Anchor::Middle),
            -90.0,
        );

        Ok(doc.finish())
    }
}

/// Render the yield-improvement chart to `path` as PNG.
#[tracing::instrument(skip(raster))]
pub fn write_yield_plot(raster: &Rasterizer, path: &Path) -> AssetResult<()> {
    let chart = yield_improvement_chart();
    let svg = chart.to_svg()?;
    let (w, h) = raster.write_png(&svg, chart.scale(), path)?;
    tracing::info!(path = %path.display(), width = w, height = h, "wrote yield plot");
    Ok(())
}

fn min_max(values: impl Iterator<Item = f64>) -> (f64, f64) {
    values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    })
}

fn fmt_tick(v: f64) -> String {
    if v.fract() == 0.0 {
        format!("{}", v as i64)
    } else {
        format!("{v:.1}")
    }
}
