//! Report profiles: optional YAML files holding per-team defaults.
//!
//! ```yaml
//! loss_labels: [Perdida, Rejeitada]
//! top: 8
//! ```

use std::{fs, path::Path};

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};

use crate::aggregate::LossLabels;

pub const DEFAULT_TOP: usize = 8;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReportProfile {
    pub loss_labels: Option<Vec<String>>,
    pub top: Option<usize>,
}

impl ReportProfile {
    pub fn load(path: &Path) -> Result<Self> {
        let raw =
            fs::read_to_string(path).with_context(|| format!("Opening profile {path:?}"))?;
        Self::from_yaml(&raw).with_context(|| format!("Parsing profile {path:?}"))
    }

    pub fn from_yaml(raw: &str) -> Result<Self> {
        if raw.trim().is_empty() {
            return Ok(Self::default());
        }
        let profile: ReportProfile = serde_yaml::from_str(raw)?;
        if profile
            .loss_labels
            .as_ref()
            .is_some_and(|labels| labels.iter().all(|l| l.trim().is_empty()))
        {
            bail!("loss_labels must name at least one result label");
        }
        Ok(profile)
    }

    pub fn loss_labels(&self) -> LossLabels {
        match &self.loss_labels {
            Some(labels) => LossLabels::new(
                labels
                    .iter()
                    .map(|l| l.trim())
                    .filter(|l| !l.is_empty()),
            ),
            None => LossLabels::default(),
        }
    }

    pub fn top(&self) -> usize {
        self.top.unwrap_or(DEFAULT_TOP)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn empty_profile_uses_defaults() {
        let profile = ReportProfile::from_yaml("").unwrap();
        assert_eq!(profile.top(), DEFAULT_TOP);
        assert_eq!(profile.loss_labels(), LossLabels::dashboard());
    }

    #[test]
    fn loads_labels_and_top_from_file() {
        let mut file = NamedTempFile::new().expect("temp file");
        writeln!(file, "loss_labels: [Perdida, ' Rejeitada ']\ntop: 3").unwrap();
        let profile = ReportProfile::load(file.path()).unwrap();
        assert_eq!(profile.top(), 3);
        assert_eq!(profile.loss_labels(), LossLabels::missed_and_rejected());
    }

    #[test]
    fn rejects_unknown_keys_and_empty_label_lists() {
        assert!(ReportProfile::from_yaml("colour: blue").is_err());
        assert!(ReportProfile::from_yaml("loss_labels: []").is_err());
    }
}
