//! Representative months rendered for each scenario.

use serde::{Deserialize, Serialize};

/// A zero-based offset into a monthly series paired with its display name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepresentativeMonth {
    pub index: usize,
    pub label: String,
}

impl RepresentativeMonth {
    pub fn new(index: usize, label: impl Into<String>) -> Self {
        Self {
            index,
            label: label.into(),
        }
    }

    /// Calendar month (1-12) the label names, if it is a month name.
    pub fn expected_calendar_month(&self) -> Option<u32> {
        month_number(&self.label)
    }
}

/// January, July and December of a January-indexed 12-month series.
pub fn default_months() -> Vec<RepresentativeMonth> {
    vec![
        RepresentativeMonth::new(0, "Janeiro"),
        RepresentativeMonth::new(6, "Julho"),
        RepresentativeMonth::new(11, "Dezembro"),
    ]
}

const MONTH_NAMES: [[&str; 2]; 12] = [
    ["janeiro", "january"],
    ["fevereiro", "february"],
    ["março", "march"],
    ["abril", "april"],
    ["maio", "may"],
    ["junho", "june"],
    ["julho", "july"],
    ["agosto", "august"],
    ["setembro", "september"],
    ["outubro", "october"],
    ["novembro", "november"],
    ["dezembro", "december"],
];

/// Month number for a Portuguese or English month name.
pub fn month_number(name: &str) -> Option<u32> {
    let name = name.trim().to_lowercase();
    MONTH_NAMES
        .iter()
        .position(|names| names.contains(&name.as_str()))
        .map(|i| i as u32 + 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_months_are_january_indexed() {
        for m in default_months() {
            assert_eq!(m.expected_calendar_month(), Some(m.index as u32 + 1));
        }
    }

    #[test]
    fn test_month_number() {
        assert_eq!(month_number("Março"), Some(3));
        assert_eq!(month_number("december"), Some(12));
        assert_eq!(month_number("Verão"), None);
    }
}
