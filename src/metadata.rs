//! Metadata producer: the sample simulation result record.

use std::fs::File;
use std::io::Write as _;
use std::path::Path;

use anyhow::Context as _;
use serde::{Deserialize, Serialize};

use crate::foundation::error::AssetResult;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SampleResult {
    pub reason: String,
    pub qubit_hours: u64,
    pub speedup_factor: f64,
    pub cost_savings_usd: u64,
    pub partners: Vec<String>,
}

impl SampleResult {
    pub fn exclusive_hardware_access() -> Self {
        Self {
            reason: "exclusive_hardware_access".to_string(),
            qubit_hours: 20_000,
            speedup_factor: 8.5,
            cost_savings_usd: 1_500_000,
            partners: ["IBM Quantum", "IonQ", "Quantinuum"]
                .into_iter()
                .map(String::from)
                .collect(),
        }
    }

    /// Two-space indented JSON, keys in declaration order.
    pub fn to_pretty_json(&self) -> AssetResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[tracing::instrument]
pub fn write_sample_result(path: &Path) -> AssetResult<()> {
    let json = SampleResult::exclusive_hardware_access().to_pretty_json()?;
    let mut f = File::create(path).with_context(|| format!("create '{}'", path.display()))?;
    f.write_all(json.as_bytes())
        .with_context(|| format!("write '{}'", path.display()))?;
    tracing::info!(path = %path.display(), bytes = json.len(), "wrote sample result");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pretty_json_is_stable() {
        let json = SampleResult::exclusive_hardware_access()
            .to_pretty_json()
            .unwrap();
        let expected = r#"{
  "reason": "exclusive_hardware_access",
  "qubit_hours": 20000,
  "speedup_factor": 8.5,
  "cost_savings_usd": 1500000,
  "partners": [
    "IBM Quantum",
    "IonQ",
    "Quantinuum"
  ]
}"#;
        assert_eq!(json, expected);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let r = serde_json::from_str::<SampleResult>(
            r#"{"reason":"x","qubit_hours":1,"speedup_factor":1.0,"cost_savings_usd":1,"partners":[],"extra":1}"#,
        );
        assert!(r.is_err());
    }

    #[test]
    fn missing_dir_is_a_filesystem_error() {
        let tmp = tempfile::tempdir().unwrap();
        let err = write_sample_result(&tmp.path().join("nope").join("r.json")).unwrap_err();
        assert!(err.to_string().contains("r.json"));
    }
}
