use std::path::PathBuf;

use crate::diagram::{self, DiagramKind};
use crate::foundation::error::AssetResult;
use crate::layout::AssetLayout;
use crate::raster::Rasterizer;
use crate::{animation, metadata, plot, stubs};

pub const COMPLETION_MESSAGE: &str = "All assets generated.";

#[derive(Clone, Debug)]
pub struct GenerateOpts {
    /// Working directory the `assets/` tree is resolved against.
    pub root: PathBuf,
    /// Create the output directories first instead of requiring them to exist.
    pub create_dirs: bool,
    /// Parent of the animation staging area; the system temp dir when `None`.
    pub staging_root: Option<PathBuf>,
    /// Forced diagram renderer; probed when `None`.
    pub diagram: Option<DiagramKind>,
    /// Load system fonts for text rendering.
    pub system_fonts: bool,
}

impl GenerateOpts {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            create_dirs: false,
            staging_root: None,
            diagram: None,
            system_fonts: true,
        }
    }
}

/// What a full run wrote, in write order.
#[derive(Clone, Debug)]
pub struct GenerationReport {
    pub plot: PathBuf,
    pub animation: PathBuf,
    pub animation_frames: usize,
    pub diagram: PathBuf,
    pub diagram_kind: DiagramKind,
    pub metadata: PathBuf,
    pub stubs: Vec<PathBuf>,
}

impl GenerationReport {
    pub fn written(&self) -> Vec<PathBuf> {
        let mut out = vec![
            self.plot.clone(),
            self.animation.clone(),
            self.diagram.clone(),
            self.metadata.clone(),
        ];
        out.extend(self.stubs.iter().cloned());
        out
    }
}

/// Run every producer once in fixed order: plot, animation, diagram, metadata, source stubs.
///
/// The first failure aborts the run; outputs written before it are left in place.
#[tracing::instrument(skip(opts), fields(root = %opts.root.display()))]
pub fn generate_all(opts: &GenerateOpts) -> AssetResult<GenerationReport> {
    let layout = AssetLayout::new(&opts.root);
    if opts.create_dirs {
        layout.ensure_dirs()?;
    }

    let raster = if opts.system_fonts {
        Rasterizer::with_system_fonts()
    } else {
        Rasterizer::without_fonts()
    };
    if raster.font_face_count() == 0 {
        tracing::warn!("no fonts available, text will not be drawn");
    }

    let plot = layout.yield_plot();
    plot::write_yield_plot(&raster, &plot)?;

    let staging_root = opts
        .staging_root
        .clone()
        .unwrap_or_else(std::env::temp_dir);
    let animation = layout.wave_gif();
    let animation_frames = animation::write_wave_gif(&raster, &staging_root, &animation)?;

    let diagram = layout.circuit_diagram();
    let diagram_kind = diagram::write_circuit_diagram(&raster, opts.diagram, &diagram)?;

    let metadata = layout.sample_result();
    metadata::write_sample_result(&metadata)?;

    let stubs = stubs::write_source_stubs(&layout.source_code_dir())?;

    Ok(GenerationReport {
        plot,
        animation,
        animation_frames,
        diagram,
        diagram_kind,
        metadata,
        stubs,
    })
}
