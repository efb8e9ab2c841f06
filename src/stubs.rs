//! Source-stub producer: one near-empty file per target language.

use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::foundation::error::AssetResult;

pub const PROJECT_TAG: &str = "LSNSES21SS13FEBAPS";

/// Target languages and their stub file names, in generation order.
pub const LANGUAGES: [(&str, &str); 18] = [
    ("python", "qiskit_sim.py"),
    ("javascript", "quantum_calc.js"),
    ("java", "QuantumAnnealing.java"),
    ("cpp", "vqe_solver.cpp"),
    ("go", "grover_search.go"),
    ("rust", "lib.rs"),
    ("typescript", "qml.ts"),
    ("swift", "quantum.swift"),
    ("kotlin", "Qubit.kt"),
    ("r", "quantum_math.r"),
    ("matlab", "qc_simulation.m"),
    ("julia", "quantum_ops.jl"),
    ("csharp", "QSharpDriver.cs"),
    ("bash", "run_quantum.sh"),
    ("html", "quantum_dashboard.html"),
    ("react", "QuantumComponent.jsx"),
    ("next", "page.tsx"),
    ("vite", "main.js"),
];

pub const QUANTUM_SNIPPET: &str = "
from qiskit import QuantumCircuit, Aer, execute
qc = QuantumCircuit(2,2)
qc.h(0)
qc.cx(0,1)
qc.measure([0,1],[0,1])
backend = Aer.get_backend('qasm_simulator')
job = execute(qc, backend, shots=1024)
result = job.result()
counts = result.get_counts(qc)
print(counts)
";

pub const SHELL_SNIPPET: &str = "#!/bin/bash\necho 'Submitting quantum job to IBM Q...'\n";

pub const PLACEHOLDER: &str = "\n// TODO: implement quantum algorithm for carbon capture\n";

/// Body written after the header of a stub.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StubBody {
    QuantumSnippet,
    ShellSnippet,
    Placeholder,
}

impl StubBody {
    pub fn for_language(language: &str) -> Self {
        match language {
            "python" => Self::QuantumSnippet,
            "bash" => Self::ShellSnippet,
            _ => Self::Placeholder,
        }
    }

    pub fn text(self) -> &'static str {
        match self {
            Self::QuantumSnippet => QUANTUM_SNIPPET,
            Self::ShellSnippet => SHELL_SNIPPET,
            Self::Placeholder => PLACEHOLDER,
        }
    }
}

pub fn header(language: &str) -> String {
    format!(
        "// {} example for quantum carbon intelligence\n// Generated for {PROJECT_TAG}\n",
        language.to_uppercase()
    )
}

pub fn render_stub(language: &str) -> String {
    let mut out = header(language);
    out.push_str(StubBody::for_language(language).text());
    out
}

/// Write every stub into `dir`, returning the written paths in generation order.
#[tracing::instrument]
pub fn write_source_stubs(dir: &Path) -> AssetResult<Vec<PathBuf>> {
    let mut written = Vec::with_capacity(LANGUAGES.len());
    for (language, file_name) in LANGUAGES {
        let path = dir.join(file_name);
        std::fs::write(&path, render_stub(language))
            .with_context(|| format!("write stub '{}'", path.display()))?;
        tracing::debug!(language, path = %path.display(), "wrote source stub");
        written.push(path);
    }
    tracing::info!(dir = %dir.display(), count = written.len(), "wrote source stubs");
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn body_selection_is_three_way() {
        assert_eq!(StubBody::for_language("python"), StubBody::QuantumSnippet);
        assert_eq!(StubBody::for_language("bash"), StubBody::ShellSnippet);
        for (lang, _) in LANGUAGES {
            if lang != "python" && lang != "bash" {
                assert_eq!(StubBody::for_language(lang), StubBody::Placeholder, "{lang}");
            }
        }
    }

    #[test]
    fn header_uppercases_language() {
        assert_eq!(
            header("csharp"),
            "// CSHARP example for quantum carbon intelligence\n// Generated for LSNSES21SS13FEBAPS\n"
        );
    }

    #[test]
    fn file_names_are_distinct() {
        let mut names: Vec<&str> = LANGUAGES.iter().map(|(_, f)| *f).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), 18);
    }

    #[test]
    fn bash_stub_layout() {
        assert_eq!(
            render_stub("bash"),
            "// BASH example for quantum carbon intelligence\n\
             // Generated for LSNSES21SS13FEBAPS\n\
             #!/bin/bash\n\
             echo 'Submitting quantum job to IBM Q...'\n"
        );
    }
}
