use serde::{Deserialize, Serialize};

/// A labelled series for line/bar chart rendering.
///
/// The core generates these; the frontend just renders them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineSeries {
    /// Dataset label (e.g., "Portfolio Value")
    pub label: String,

    /// X-axis labels, one per value
    pub labels: Vec<String>,

    pub values: Vec<f64>,
}

impl LineSeries {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            labels: Vec::new(),
            values: Vec::new(),
        }
    }

    pub fn push(&mut self, label: impl Into<String>, value: f64) {
        self.labels.push(label.into());
        self.values.push(value);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// One slice of a composition (pie) chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PieSlice {
    pub label: String,
    pub value: f64,
}
