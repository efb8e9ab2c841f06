use std::path::Path;

use crate::diagram::{DIAGRAM_DPI, DiagramKind, DiagramRenderer, validate_dpi};
use crate::foundation::error::{AssetError, AssetResult};
use crate::foundation::geom::{BezPath, Point};
use crate::raster::Rasterizer;
use crate::svg::{Anchor, Stroke, SvgDoc, TextStyle};

/// Circuit operation on qubit (and classical bit) indices.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Op {
    H(usize),
    Cx { control: usize, target: usize },
    Barrier,
    Measure { qubit: usize, bit: usize },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Circuit {
    n_qubits: usize,
    n_bits: usize,
    ops: Vec<Op>,
}

impl Circuit {
    pub fn new(n_qubits: usize) -> Self {
        Self {
            n_qubits,
            n_bits: 0,
            ops: Vec::new(),
        }
    }

    /// Four-qubit GHZ-style ansatz: H on q0, a CX chain down the register, then measure all.
    pub fn vqe_placeholder() -> Self {
        let mut c = Self::new(4);
        c.ops = vec![
            Op::H(0),
            Op::Cx { control: 0, target: 1 },
            Op::Cx { control: 1, target: 2 },
            Op::Cx { control: 2, target: 3 },
        ];
        c.measure_all();
        c
    }

    pub fn n_qubits(&self) -> usize {
        self.n_qubits
    }

    pub fn n_bits(&self) -> usize {
        self.n_bits
    }

    pub fn ops(&self) -> &[Op] {
        &self.ops
    }

    fn check(&self, q: usize) -> AssetResult<()> {
        if q >= self.n_qubits {
            return Err(AssetError::validation(format!(
                "qubit {q} out of range for {}-qubit circuit",
                self.n_qubits
            )));
        }
        Ok(())
    }

    pub fn h(&mut self, q: usize) -> AssetResult<&mut Self> {
        self.check(q)?;
        self.ops.push(Op::H(q));
        Ok(self)
    }

    pub fn cx(&mut self, control: usize, target: usize) -> AssetResult<&mut Self> {
        self.check(control)?;
        self.check(target)?;
        if control == target {
            return Err(AssetError::validation("cx control and target must differ"));
        }
        self.ops.push(Op::Cx { control, target });
        Ok(self)
    }

    /// Barrier, then one measurement per qubit into a fresh classical register.
    pub fn measure_all(&mut self) -> &mut Self {
        self.ops.push(Op::Barrier);
        let base = self.n_bits;
        for q in 0..self.n_qubits {
            self.ops.push(Op::Measure {
                qubit: q,
                bit: base + q,
            });
        }
        self.n_bits += self.n_qubits;
        self
    }
}

const GATE_FILL: &str = "#fa74a6";
const CX_FILL: &str = "#002d9c";
const MEASURE_FILL: &str = "#a8a8a8";
const BARRIER_FILL: &str = "#dddddd";

const LEFT: f64 = 70.0;
const TOP: f64 = 40.0;
const COL_W: f64 = 60.0;
const ROW_H: f64 = 60.0;
const BOX: f64 = 40.0;

pub struct CircuitRenderer {
    circuit: Circuit,
    dpi: f64,
}

impl CircuitRenderer {
    pub fn new(circuit: Circuit) -> Self {
        Self {
            circuit,
            dpi: DIAGRAM_DPI,
        }
    }

    pub fn circuit(&self) -> &Circuit {
        &self.circuit
    }

    fn wire_y(&self, q: usize) -> f64 {
        TOP + q as f64 * ROW_H
    }

    fn classical_y(&self) -> f64 {
        TOP + self.circuit.n_qubits as f64 * ROW_H
    }

    fn col_x(col: usize) -> f64 {
        LEFT + COL_W * (col as f64 + 0.5)
    }

    pub fn to_svg(&self) -> AssetResult<String> {
        let c = &self.circuit;
        if c.n_qubits == 0 {
            return Err(AssetError::validation("circuit has no qubits"));
        }

        let width = LEFT + COL_W * c.ops.len() as f64 + 30.0;
        let height = self.classical_y() + if c.n_bits > 0 { ROW_H } else { 0.0 };
        let mut doc = SvgDoc::new(width, height);
        doc.rect(0.0, 0.0, width, height, "#ffffff", None);

        let wire = Stroke::solid("#000000", 1.0);
        let label = TextStyle::sans(16.0).anchored(Anchor::End);
        for q in 0..c.n_qubits {
            let y = self.wire_y(q);
            doc.line(Point::new(LEFT, y), Point::new(width - 10.0, y), wire);
            doc.text(Point::new(LEFT - 10.0, y + 6.0), &format!("q_{q}"), label);
        }
        if c.n_bits > 0 {
            let y = self.classical_y();
            for dy in [-1.5, 1.5] {
                doc.line(Point::new(LEFT, y + dy), Point::new(width - 10.0, y + dy), wire);
            }
            doc.text(Point::new(LEFT - 10.0, y + 6.0), "meas", label);
            doc.line(Point::new(LEFT + 8.0, y + 7.0), Point::new(LEFT + 16.0, y - 7.0), wire);
            doc.text(
                Point::new(LEFT + 18.0, y - 8.0),
                &c.n_bits.to_string(),
                TextStyle::sans(11.0),
            );
        }

        for (col, op) in c.ops.iter().enumerate() {
            let x = Self::col_x(col);
            match *op {
                Op::H(q) => self.draw_box(&mut doc, x, self.wire_y(q), "H", GATE_FILL),
                Op::Cx { control, target } => self.draw_cx(&mut doc, x, control, target),
                Op::Barrier => self.draw_barrier(&mut doc, x),
                Op::Measure { qubit, bit } => self.draw_measure(&mut doc, x, qubit, bit),
            }
        }

        Ok(doc.finish())
    }

    fn draw_box(&self, doc: &mut SvgDoc, x: f64, y: f64, name: &str, fill: &str) {
        doc.rect(x - BOX / 2.0, y - BOX / 2.0, BOX, BOX, fill, None);
        doc.text(
            Point::new(x, y + 7.0),
            name,
            TextStyle::sans(20.0).anchored(Anchor::Middle),
        );
    }

    fn draw_cx(&self, doc: &mut SvgDoc, x: f64, control: usize, target: usize) {
        let (yc, yt) = (self.wire_y(control), self.wire_y(target));
        let r = 14.0;
        let toward = if yt > yc { -r } else { r };
        doc.line(
            Point::new(x, yc),
            Point::new(x, yt + toward),
            Stroke::solid(CX_FILL, 2.0),
        );
        doc.circle(Point::new(x, yc), 7.0, CX_FILL, None);
        doc.circle(Point::new(x, yt), r, CX_FILL, None);
        let plus = Stroke::solid("#ffffff", 2.0);
        doc.line(Point::new(x - r + 4.0, yt), Point::new(x + r - 4.0, yt), plus);
        doc.line(Point::new(x, yt - r + 4.0), Point::new(x, yt + r - 4.0), plus);
    }

    fn draw_barrier(&self, doc: &mut SvgDoc, x: f64) {
        let top = self.wire_y(0) - ROW_H / 2.0;
        let bottom = self.wire_y(self.circuit.n_qubits - 1) + ROW_H / 2.0;
        doc.rect(x - 8.0, top, 16.0, bottom - top, BARRIER_FILL, None);
        doc.line(
            Point::new(x, top),
            Point::new(x, bottom),
            Stroke::dashed("#000000", 1.0, 4.0, 3.0),
        );
    }

    fn draw_measure(&self, doc: &mut SvgDoc, x: f64, qubit: usize, bit: usize) {
        let y = self.wire_y(qubit);
        doc.rect(x - BOX / 2.0, y - BOX / 2.0, BOX, BOX, MEASURE_FILL, None);

        let mut dial = BezPath::new();
        dial.move_to((x - 13.0, y + 8.0));
        dial.quad_to((x, y - 14.0), (x + 13.0, y + 8.0));
        doc.path(&dial, Stroke::solid("#000000", 1.5));
        doc.line(
            Point::new(x, y + 8.0),
            Point::new(x + 10.0, y - 10.0),
            Stroke::solid("#000000", 1.5),
        );

        let cy = self.classical_y();
        for dx in [-1.5, 1.5] {
            doc.line(
                Point::new(x + dx, y + BOX / 2.0),
                Point::new(x + dx, cy - 8.0),
                Stroke::solid(MEASURE_FILL, 1.0),
            );
        }
        let mut arrow = BezPath::new();
        arrow.move_to((x - 6.0, cy - 9.0));
        arrow.line_to((x + 6.0, cy - 9.0));
        arrow.line_to((x, cy));
        arrow.close_path();
        doc.fill_path(&arrow, MEASURE_FILL);
        doc.text(
            Point::new(x + 4.0, cy + 18.0),
            &bit.to_string(),
            TextStyle::sans(11.0),
        );
    }
}

impl DiagramRenderer for CircuitRenderer {
    fn kind(&self) -> DiagramKind {
        DiagramKind::Circuit
    }

    fn render(&self, raster: &Rasterizer, out: &Path) -> AssetResult<()> {
        let scale = validate_dpi(self.dpi)?;
        raster.write_png(&self.to_svg()?, scale, out)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placeholder_circuit_has_expected_ops() {
        let c = Circuit::vqe_placeholder();
        assert_eq!(c.n_qubits(), 4);
        assert_eq!(c.n_bits(), 4);
        assert_eq!(
            c.ops(),
            &[
                Op::H(0),
                Op::Cx { control: 0, target: 1 },
                Op::Cx { control: 1, target: 2 },
                Op::Cx { control: 2, target: 3 },
                Op::Barrier,
                Op::Measure { qubit: 0, bit: 0 },
                Op::Measure { qubit: 1, bit: 1 },
                Op::Measure { qubit: 2, bit: 2 },
                Op::Measure { qubit: 3, bit: 3 },
            ]
        );
    }

    #[test]
    fn builder_rejects_bad_indices() {
        let mut c = Circuit::new(2);
        assert!(c.h(2).is_err());
        assert!(c.cx(0, 0).is_err());
        assert!(c.cx(0, 5).is_err());
        assert!(c.ops().is_empty());
    }

    #[test]
    fn svg_draws_every_wire_and_gate() {
        let svg = CircuitRenderer::new(Circuit::vqe_placeholder())
            .to_svg()
            .unwrap();
        for q in 0..4 {
            assert!(svg.contains(&format!(">q_{q}</text>")));
        }
        assert!(svg.contains(">meas</text>"));
        assert!(svg.contains(">H</text>"));
        assert!(svg.contains("stroke-dasharray"));
        assert_eq!(svg.matches(GATE_FILL).count(), 1);
    }

    #[test]
    fn render_writes_png_at_diagram_dpi() {
        let tmp = tempfile::tempdir().unwrap();
        let out = tmp.path().join("vqe.png");
        let r = CircuitRenderer::new(Circuit::vqe_placeholder());
        r.render(&Rasterizer::without_fonts(), &out).unwrap();
        let img = image::open(&out).unwrap();
        // 9 columns: (70 + 540 + 30) x (40 + 240 + 60) user units at 1.5x.
        assert_eq!((img.width(), img.height()), (960, 510));
    }

    #[test]
    fn empty_circuit_is_rejected() {
        assert!(CircuitRenderer::new(Circuit::new(0)).to_svg().is_err());
    }
}
