use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::foundation::error::AssetResult;

pub const GRAPHS_DIR: &str = "assets/graphs";
pub const SIMULATIONS_DIR: &str = "assets/simulations";
pub const CIRCUITS_DIR: &str = "assets/circuits";
pub const JSON_DIR: &str = "assets/json";
pub const SOURCE_CODE_DIR: &str = "assets/source_code";

pub const YIELD_PLOT_FILE: &str = "yield_improvement.png";
pub const WAVE_GIF_FILE: &str = "quantum_2d.gif";
pub const CIRCUIT_FILE: &str = "vqe_circuit.png";
pub const SAMPLE_RESULT_FILE: &str = "sample_result.json";

/// Output tree of the generator, resolved against a working directory.
#[derive(Clone, Debug)]
pub struct AssetLayout {
    root: PathBuf,
}

impl AssetLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn yield_plot(&self) -> PathBuf {
        self.root.join(GRAPHS_DIR).join(YIELD_PLOT_FILE)
    }

    pub fn wave_gif(&self) -> PathBuf {
        self.root.join(SIMULATIONS_DIR).join(WAVE_GIF_FILE)
    }

    pub fn circuit_diagram(&self) -> PathBuf {
        self.root.join(CIRCUITS_DIR).join(CIRCUIT_FILE)
    }

    pub fn sample_result(&self) -> PathBuf {
        self.root.join(JSON_DIR).join(SAMPLE_RESULT_FILE)
    }

    pub fn source_code_dir(&self) -> PathBuf {
        self.root.join(SOURCE_CODE_DIR)
    }

    /// Every directory the producers write into.
    pub fn dirs(&self) -> [PathBuf; 5] {
        [
            GRAPHS_DIR,
            SIMULATIONS_DIR,
            CIRCUITS_DIR,
            JSON_DIR,
            SOURCE_CODE_DIR,
        ]
        .map(|d| self.root.join(d))
    }

    pub fn ensure_dirs(&self) -> AssetResult<()> {
        for dir in self.dirs() {
            std::fs::create_dir_all(&dir)
                .with_context(|| format!("failed to create output directory '{}'", dir.display()))?;
        }
        Ok(())
    }
}
