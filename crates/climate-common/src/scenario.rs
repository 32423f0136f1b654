//! Scenario list: which dataset file backs which label.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// A named emissions/mitigation pathway and year, backed by one data file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scenario {
    pub label: String,
    pub path: PathBuf,
}

impl Scenario {
    pub fn new(label: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            label: label.into(),
            path: path.into(),
        }
    }

    /// Path of the data file, joined onto `root` when relative.
    pub fn resolve(&self, root: Option<&Path>) -> PathBuf {
        match root {
            Some(root) if self.path.is_relative() => root.join(&self.path),
            _ => self.path.clone(),
        }
    }
}

/// NASA GISS-E2-1-G monthly `tasmax`: historical 2010, SSP1-2.6 for
/// 2020/2024/2030 and SSP3-7.0 for 2030.
pub fn default_scenarios() -> Vec<Scenario> {
    vec![
        Scenario::new(
            "2010",
            "dataset.nasa/histor/tmax/tasmax_mon_GISS-E2-1-G_historical_r1i1p1f2_gn_2010.nc",
        ),
        Scenario::new(
            "2020",
            "dataset.nasa/ssp/tmax/tasmax_mon_GISS-E2-1-G_ssp126_r1i1p1f2_gn_2020.nc",
        ),
        Scenario::new(
            "2024",
            "dataset.nasa/ssp/tmax/tasmax_mon_GISS-E2-1-G_ssp126_r1i1p1f2_gn_2024.nc",
        ),
        Scenario::new(
            "2030 com práticas mitigantes",
            "dataset.nasa/ssp/tmax/tasmax_mon_GISS-E2-1-G_ssp126_r1i1p1f2_gn_2030.nc",
        ),
        Scenario::new(
            "2030 sem práticas mitigantes",
            "dataset.nasa/ssp/tmax/tasmax_mon_GISS-E2-1-G_ssp370_r1i1p1f2_gn_2030.nc",
        ),
    ]
}

/// Lowercase ASCII slug: accents stripped, runs of other characters become `_`.
pub fn slugify(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars().flat_map(char::to_lowercase) {
        let c = match c {
            'á' | 'à' | 'â' | 'ã' | 'ä' => 'a',
            'é' | 'ê' | 'è' => 'e',
            'í' | 'î' => 'i',
            'ó' | 'ô' | 'õ' | 'ö' => 'o',
            'ú' | 'ü' => 'u',
            'ç' => 'c',
            c => c,
        };
        if c.is_ascii_alphanumeric() {
            out.push(c);
        } else if !out.ends_with('_') && !out.is_empty() {
            out.push('_');
        }
    }
    out.trim_end_matches('_').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_scenarios_order() {
        let labels: Vec<_> = default_scenarios().into_iter().map(|s| s.label).collect();
        assert_eq!(
            labels,
            [
                "2010",
                "2020",
                "2024",
                "2030 com práticas mitigantes",
                "2030 sem práticas mitigantes"
            ]
        );
    }

    #[test]
    fn test_slug() {
        assert_eq!(slugify("2030 com práticas mitigantes"), "2030_com_praticas_mitigantes");
        assert_eq!(slugify("  Dezembro "), "dezembro");
    }

    #[test]
    fn test_resolve_relative_path() {
        let s = Scenario::new("x", "a/b.nc");
        assert_eq!(s.resolve(Some(Path::new("/data"))), PathBuf::from("/data/a/b.nc"));
        let s = Scenario::new("x", "/abs/b.nc");
        assert_eq!(s.resolve(Some(Path::new("/data"))), PathBuf::from("/abs/b.nc"));
        assert_eq!(s.resolve(None), PathBuf::from("/abs/b.nc"));
    }
}
