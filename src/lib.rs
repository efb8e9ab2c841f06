//! Generator for the quantum carbon intelligence presentation assets.
//!
//! A single run writes, under `assets/`:
//!
//! - `graphs/yield_improvement.png`: yield improvement line chart ([`plot`])
//! - `simulations/quantum_2d.gif`: looping phase-shifted sine wave ([`animation`])
//! - `circuits/vqe_circuit.png`: 4-qubit circuit diagram or its text fallback ([`diagram`])
//! - `json/sample_result.json`: the sample result record ([`metadata`])
//! - `source_code/*`: 18 per-language source stubs ([`stubs`])
//!
//! Every input is a literal, so repeated runs produce identical files.
#![forbid(unsafe_code)]

mod foundation;

pub mod animation;
pub mod diagram;
pub mod layout;
pub mod metadata;
pub mod pipeline;
pub mod plot;
pub mod raster;
pub mod stubs;
pub mod svg;

pub use crate::foundation::error::{AssetError, AssetResult};
pub use crate::foundation::geom;

pub use crate::animation::{FrameIndex, FrameSink, GifSink, InMemorySink, StagingArea, WaveAnimation};
pub use crate::diagram::{DiagramKind, DiagramRenderer, TextFallbackRenderer};
pub use crate::layout::AssetLayout;
pub use crate::metadata::SampleResult;
pub use crate::pipeline::{COMPLETION_MESSAGE, GenerateOpts, GenerationReport, generate_all};
pub use crate::plot::LineChart;
pub use crate::raster::Rasterizer;
pub use crate::stubs::{LANGUAGES, StubBody};
