//! The scenario loop: load, reduce, report, render.
//!
//! Scenarios are processed strictly in configured order, one dataset in
//! memory at a time. A scenario that fails to load or reduce is recorded and
//! skipped unless `fail_fast` is set; a month that fails to render is
//! recorded and the remaining months still run.

use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use climate_common::{ClimateDataset, RepresentativeMonth, Scenario};
use grid_processor::{compute_mean, summarize, AnnualSummary, MissingPolicy};
use netcdf_parser::{open_climate_dataset, LoadOptions};
use tracing::{error, info, warn};

use crate::config::MapsConfig;
use crate::maps::{render_month, MapStyle};
use crate::sink::FigureSink;

/// Produces the dataset behind a scenario.
pub trait DatasetLoader {
    fn load(&self, scenario: &Scenario) -> Result<ClimateDataset>;
}

impl<F> DatasetLoader for F
where
    F: Fn(&Scenario) -> Result<ClimateDataset>,
{
    fn load(&self, scenario: &Scenario) -> Result<ClimateDataset> {
        self(scenario)
    }
}

/// Reads scenario files from disk.
#[derive(Debug, Clone)]
pub struct NetCdfLoader {
    data_root: Option<PathBuf>,
    options: LoadOptions,
}

impl NetCdfLoader {
    pub fn new(config: &MapsConfig) -> Self {
        Self {
            data_root: config.data_root.clone(),
            options: config.load_options(),
        }
    }
}

impl DatasetLoader for NetCdfLoader {
    fn load(&self, scenario: &Scenario) -> Result<ClimateDataset> {
        let path = scenario.resolve(self.data_root.as_deref());
        let dataset = open_climate_dataset(&path, &scenario.label, &self.options)
            .with_context(|| format!("Failed to load {}", path.display()))?;
        Ok(dataset)
    }
}

/// A scenario, or one month of it, that did not complete.
#[derive(Debug, Clone, PartialEq)]
pub struct Failure {
    pub scenario: String,
    /// Set when only this month's render failed
    pub month: Option<String>,
    pub error: String,
}

/// What a run did.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunReport {
    /// Summary per successfully reduced scenario, in run order
    pub summaries: Vec<(String, AnnualSummary)>,
    /// Figures handed to the sink
    pub figures: usize,
    pub failures: Vec<Failure>,
}

impl RunReport {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    /// Scenarios with at least one failure.
    pub fn failed_scenarios(&self) -> usize {
        let mut names: Vec<&str> = self.failures.iter().map(|f| f.scenario.as_str()).collect();
        names.dedup();
        names.len()
    }

    pub fn summary_of(&self, scenario: &str) -> Option<AnnualSummary> {
        self.summaries
            .iter()
            .find(|(label, _)| label == scenario)
            .map(|(_, s)| *s)
    }
}

/// Summary lines printed for one scenario.
pub fn write_summary(
    out: &mut dyn Write,
    label: &str,
    summary: AnnualSummary,
    units: &str,
) -> std::io::Result<()> {
    writeln!(out)?;
    writeln!(out, "Ano: {}", label)?;
    match summary {
        AnnualSummary::Mean(_) => {
            writeln!(out, "Média Anual de Temperatura Máxima ({}): {}", units, summary)
        }
        AnnualSummary::NoData => writeln!(
            out,
            "Os dados estão ausentes ou não estão disponíveis para este ano ({}).",
            summary
        ),
    }
}

/// Run every configured scenario.
///
/// Summary lines go to `out`. With `sink` set, each configured month is
/// rendered and presented; without it only summaries are produced.
///
/// # Errors
/// Only I/O errors on `out`, or the first scenario error when
/// `config.fail_fast` is set. Other failures are collected in the report.
pub fn run(
    config: &MapsConfig,
    loader: &dyn DatasetLoader,
    style: &MapStyle,
    mut sink: Option<&mut dyn FigureSink>,
    out: &mut dyn Write,
) -> Result<RunReport> {
    let mut report = RunReport::default();

    for scenario in &config.scenarios {
        let label = scenario.label.as_str();

        let dataset = match loader.load(scenario) {
            Ok(ds) => ds,
            Err(e) => {
                fail(&mut report, config.fail_fast, label, None, e)?;
                continue;
            }
        };

        let reduced = compute_mean(&dataset, &config.variable, MissingPolicy::Skip)
            .with_context(|| format!("Failed to reduce scenario '{}'", label));
        let mean = match reduced {
            Ok(mean) => mean,
            Err(e) => {
                fail(&mut report, config.fail_fast, label, None, e)?;
                continue;
            }
        };

        let summary = summarize(&mean, MissingPolicy::Skip);
        let units = dataset
            .variable(&config.variable)
            .ok()
            .and_then(|v| v.units.clone())
            .unwrap_or_else(|| "°C".to_string());
        write_summary(out, label, summary, &units)?;
        info!(scenario = %label, %summary, valid_cells = mean.valid_count(), "Reduced scenario");
        report.summaries.push((label.to_string(), summary));

        let Some(sink) = sink.as_deref_mut() else {
            continue;
        };
        for month in &config.months {
            check_month(&dataset, label, month);
            let presented = render_month(&dataset, label, month.index, &month.label, style)
                .and_then(|figure| sink.present(label, &month.label, &figure))
                .with_context(|| format!("Failed to render '{}' ({})", label, month.label));
            match presented {
                Ok(()) => report.figures += 1,
                Err(e) => fail(&mut report, config.fail_fast, label, Some(&month.label), e)?,
            }
        }
    }

    Ok(report)
}

fn fail(
    report: &mut RunReport,
    fail_fast: bool,
    scenario: &str,
    month: Option<&str>,
    err: anyhow::Error,
) -> Result<()> {
    if fail_fast {
        return Err(err);
    }
    error!(scenario = %scenario, month = ?month, error = %format!("{:#}", err), "Scenario step failed");
    report.failures.push(Failure {
        scenario: scenario.to_string(),
        month: month.map(String::from),
        error: format!("{:#}", err),
    });
    Ok(())
}

/// Warn when the time step behind a month label decodes to another month.
fn check_month(dataset: &ClimateDataset, label: &str, month: &RepresentativeMonth) {
    let (Some(expected), Some(actual)) = (
        month.expected_calendar_month(),
        dataset.time.month_of(month.index),
    ) else {
        return;
    };
    if expected != actual {
        warn!(
            scenario = %label,
            month = %month.label,
            index = month.index,
            decoded_month = actual,
            "Time step does not fall in the labelled month"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_lines() {
        let mut out = Vec::new();
        write_summary(&mut out, "2010", AnnualSummary::Mean(20.0), "°C").unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text, "\nAno: 2010\nMédia Anual de Temperatura Máxima (°C): 20.0\n");
    }

    #[test]
    fn test_no_data_line() {
        let mut out = Vec::new();
        write_summary(&mut out, "2030", AnnualSummary::NoData, "°C").unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("no data available"));
        assert!(text.starts_with("\nAno: 2030\n"));
    }

    #[test]
    fn test_failed_scenarios_counts_each_once() {
        let failure = |s: &str, m: Option<&str>| Failure {
            scenario: s.to_string(),
            month: m.map(String::from),
            error: "x".to_string(),
        };
        let report = RunReport {
            failures: vec![
                failure("a", Some("Janeiro")),
                failure("a", Some("Julho")),
                failure("b", None),
            ],
            ..Default::default()
        };
        assert_eq!(report.failed_scenarios(), 2);
        assert!(!report.is_success());
    }
}
