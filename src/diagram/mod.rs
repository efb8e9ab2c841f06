//! Diagram producer: the VQE placeholder circuit, drawn natively when the `circuit` capability
//! is compiled in, otherwise as a text glyph image.

#[cfg(feature = "circuit")]
pub mod circuit;
pub mod text;

use std::path::Path;

use crate::foundation::error::{AssetError, AssetResult};
use crate::raster::Rasterizer;

pub use text::TextFallbackRenderer;

#[cfg(feature = "circuit")]
pub use circuit::{Circuit, CircuitRenderer, Op};

/// Figure resolution shared by both renderers.
pub const DIAGRAM_DPI: f64 = 150.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DiagramKind {
    Circuit,
    TextFallback,
}

impl DiagramKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Circuit => "circuit",
            Self::TextFallback => "text-fallback",
        }
    }
}

pub trait DiagramRenderer {
    fn kind(&self) -> DiagramKind;
    fn render(&self, raster: &Rasterizer, out: &Path) -> AssetResult<()>;
}

/// Capability probe: the native circuit renderer when it is compiled in, the text fallback
/// otherwise.
pub fn probe() -> DiagramKind {
    if circuit_available() {
        DiagramKind::Circuit
    } else {
        DiagramKind::TextFallback
    }
}

pub fn circuit_available() -> bool {
    cfg!(feature = "circuit")
}

pub fn create_renderer(kind: DiagramKind) -> AssetResult<Box<dyn DiagramRenderer>> {
    match kind {
        #[cfg(feature = "circuit")]
        DiagramKind::Circuit => Ok(Box::new(CircuitRenderer::new(Circuit::vqe_placeholder()))),
        #[cfg(not(feature = "circuit"))]
        DiagramKind::Circuit => Err(AssetError::validation(
            "circuit diagram renderer is not available (built without the `circuit` feature)",
        )),
        DiagramKind::TextFallback => Ok(Box::new(TextFallbackRenderer::default())),
    }
}

/// Render the circuit diagram with `renderer`, or with the probed renderer when `None`.
///
/// Only capability unavailability selects the fallback; a failure inside the chosen renderer is
/// returned as-is.
#[tracing::instrument(skip(raster))]
pub fn write_circuit_diagram(
    raster: &Rasterizer,
    kind: Option<DiagramKind>,
    out: &Path,
) -> AssetResult<DiagramKind> {
    let kind = match kind {
        Some(k) => k,
        None => {
            let k = probe();
            if k == DiagramKind::TextFallback {
                tracing::warn!("circuit renderer unavailable, drawing text fallback");
            }
            k
        }
    };
    let renderer = create_renderer(kind)?;
    renderer.render(raster, out)?;
    let used = renderer.kind();
    tracing::info!(path = %out.display(), renderer = used.as_str(), "wrote circuit diagram");
    Ok(used)
}

fn validate_dpi(dpi: f64) -> AssetResult<f32> {
    if !dpi.is_finite() || dpi <= 0.0 {
        return Err(AssetError::validation("diagram dpi must be positive"));
    }
    Ok((dpi / 100.0) as f32)
}
