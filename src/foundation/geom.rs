pub use kurbo::{Affine, BezPath, Point, Rect};

/// Maps a data-space rectangle onto a canvas-space rectangle with the y axis flipped
/// (data grows upward, canvas grows downward).
#[derive(Clone, Copy, Debug)]
pub struct AxisMap {
    data: Rect,
    canvas: Rect,
    xform: Affine,
}

impl AxisMap {
    pub fn new(data: Rect, canvas: Rect) -> Self {
        let sx = canvas.width() / data.width();
        let sy = canvas.height() / data.height();
        let xform = Affine::translate((canvas.x0, canvas.y1))
            * Affine::scale_non_uniform(sx, -sy)
            * Affine::translate((-data.x0, -data.y0));
        Self {
            data,
            canvas,
            xform,
        }
    }

    pub fn data(&self) -> Rect {
        self.data
    }

    pub fn canvas(&self) -> Rect {
        self.canvas
    }

    pub fn to_canvas(&self, x: f64, y: f64) -> Point {
        self.xform * Point::new(x, y)
    }

    /// Polyline through `points` in canvas space.
    pub fn polyline(&self, points: impl IntoIterator<Item = (f64, f64)>) -> BezPath {
        let mut path = BezPath::new();
        for (i, (x, y)) in points.into_iter().enumerate() {
            let p = self.to_canvas(x, y);
            if i == 0 {
                path.move_to(p);
            } else {
                path.line_to(p);
            }
        }
        path
    }
}

/// Expand `[lo, hi]` by `frac` of its span on each side.
pub fn pad_range(lo: f64, hi: f64, frac: f64) -> (f64, f64) {
    let span = (hi - lo).abs().max(f64::EPSILON);
    (lo - span * frac, hi + span * frac)
}

/// Tick positions at a "nice" step (1, 2, 2.5 or 5 times a power of ten) covering `[lo, hi]`
/// with roughly `target` intervals.
pub fn nice_ticks(lo: f64, hi: f64, target: usize) -> Vec<f64> {
    if !(lo.is_finite() && hi.is_finite()) || hi <= lo || target == 0 {
        return Vec::new();
    }
    let raw = (hi - lo) / target as f64;
    let mag = 10f64.powf(raw.log10().floor());
    let step = [1.0, 2.0, 2.5, 5.0, 10.0]
        .into_iter()
        .map(|m| m * mag)
        .find(|s| *s >= raw)
        .unwrap_or(10.0 * mag);

    let first = (lo / step).ceil() as i64;
    let last = (hi / step).floor() as i64;
    (first..=last).map(|k| k as f64 * step).collect()
}

/// Evenly spaced samples over `[start, end]`, both ends included.
pub fn linspace(start: f64, end: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (n - 1) as f64;
            (0..n).map(|i| start + step * i as f64).collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn axis_map_flips_y() {
        let m = AxisMap::new(
            Rect::new(0.0, 0.0, 10.0, 10.0),
            Rect::new(100.0, 50.0, 200.0, 150.0),
        );
        let bl = m.to_canvas(0.0, 0.0);
        let tr = m.to_canvas(10.0, 10.0);
        assert!((bl.x - 100.0).abs() < 1e-9 && (bl.y - 150.0).abs() < 1e-9);
        assert!((tr.x - 200.0).abs() < 1e-9 && (tr.y - 50.0).abs() < 1e-9);
    }

    #[test]
    fn nice_ticks_cover_yield_range() {
        let ticks = nice_ticks(4.0, 23.0, 8);
        assert_eq!(ticks, vec![5.0, 7.5, 10.0, 12.5, 15.0, 17.5, 20.0, 22.5]);
    }

    #[test]
    fn nice_ticks_degenerate_inputs_are_empty() {
        assert!(nice_ticks(1.0, 1.0, 5).is_empty());
        assert!(nice_ticks(0.0, f64::NAN, 5).is_empty());
        assert!(nice_ticks(0.0, 1.0, 0).is_empty());
    }

    #[test]
    fn linspace_includes_endpoints() {
        let xs = linspace(0.0, 1.0, 5);
        assert_eq!(xs, vec![0.0, 0.25, 0.5, 0.75, 1.0]);
        assert_eq!(linspace(3.0, 9.0, 1), vec![3.0]);
        assert!(linspace(0.0, 1.0, 0).is_empty());
    }

    #[test]
    fn polyline_visits_every_point() {
        let m = AxisMap::new(Rect::new(0.0, 0.0, 1.0, 1.0), Rect::new(0.0, 0.0, 1.0, 1.0));
        let path = m.polyline([(0.0, 0.0), (0.5, 0.5), (1.0, 1.0)]);
        assert_eq!(path.elements().len(), 3);
    }
}
