pub mod render;

use std::collections::BTreeMap;
use std::fmt;

use thiserror::Error;

use crate::storage::table::{Table, Value};

pub const DEFAULT_HISTOGRAM_BINS: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    Bar,
    Histogram,
    Scatter,
    Pie,
    Line,
}

impl ChartKind {
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim().to_ascii_uppercase().as_str() {
            "BAR" => Some(ChartKind::Bar),
            "HISTOGRAM" => Some(ChartKind::Histogram),
            "SCATTER" => Some(ChartKind::Scatter),
            "PIE" => Some(ChartKind::Pie),
            "LINE" => Some(ChartKind::Line),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ChartKind::Bar => "bar",
            ChartKind::Histogram => "histogram",
            ChartKind::Scatter => "scatter",
            ChartKind::Pie => "pie",
            ChartKind::Line => "line",
        }
    }
}

impl fmt::Display for ChartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[derive(Error, Debug)]
pub enum VizError {
    #[error("column '{0}' not found in table")]
    ColumnNotFound(String),
    #[error("column '{column}' must be {requirement}")]
    ColumnType {
        column: String,
        requirement: &'static str,
    },
    #[error("bin count must be a positive integer")]
    BadBins,
    #[error("no plottable rows for the selected columns")]
    NoData,
    #[error("chart rendering failed: {0}")]
    Render(String),
}

/// A validated, shaped rendering request: everything the plotting
/// collaborator needs, nothing about how pixels get drawn.
#[derive(Debug, Clone)]
pub enum Chart {
    Bar {
        x_label: String,
        y_label: String,
        labels: Vec<String>,
        values: Vec<f64>,
    },
    Histogram {
        label: String,
        /// Bin boundaries, one more than the number of bins.
        edges: Vec<f64>,
        counts: Vec<usize>,
    },
    Scatter {
        x_label: String,
        y_label: String,
        points: Vec<(f64, f64)>,
    },
    Pie {
        label: String,
        value_label: String,
        labels: Vec<String>,
        values: Vec<f64>,
    },
    Line {
        x_label: String,
        y_label: String,
        /// Sorted ascending by x.
        points: Vec<(f64, f64)>,
        /// Tick labels when x is categorical and points are positional.
        ticks: Option<Vec<String>>,
    },
}

impl Chart {
    pub fn kind(&self) -> ChartKind {
        match self {
            Chart::Bar { .. } => ChartKind::Bar,
            Chart::Histogram { .. } => ChartKind::Histogram,
            Chart::Scatter { .. } => ChartKind::Scatter,
            Chart::Pie { .. } => ChartKind::Pie,
            Chart::Line { .. } => ChartKind::Line,
        }
    }

    pub fn title(&self) -> String {
        match self {
            Chart::Bar { x_label, y_label, .. } => {
                format!("Bar Chart: {} by {}", y_label, x_label)
            }
            Chart::Histogram { label, .. } => format!("Histogram of {}", label),
            Chart::Scatter { x_label, y_label, .. } => {
                format!("Scatter Plot: {} vs {}", y_label, x_label)
            }
            Chart::Pie {
                label, value_label, ..
            } => format!("Pie Chart: {} by {}", value_label, label),
            Chart::Line { x_label, y_label, .. } => {
                format!("Line Plot: {} over {}", y_label, x_label)
            }
        }
    }
}

/// Bar chart: any x, rendered categorically; numeric y.
pub fn bar(table: &Table, x: &str, y: &str) -> Result<Chart, VizError> {
    let xi = column_index(table, x)?;
    let yi = column_index(table, y)?;
    require_numeric(table, yi)?;

    let mut labels = Vec::new();
    let mut values = Vec::new();
    for row in table.iter() {
        let (Some(xv), Some(yv)) = (row.get(xi), row.get(yi)) else {
            continue;
        };
        if xv.is_null() {
            continue;
        }
        let Some(yv) = yv.as_real() else { continue };
        labels.push(xv.to_string());
        values.push(yv);
    }
    if values.is_empty() {
        return Err(VizError::NoData);
    }
    Ok(Chart::Bar {
        x_label: table.schema.columns[xi].name.clone(),
        y_label: table.schema.columns[yi].name.clone(),
        labels,
        values,
    })
}

/// Histogram: one numeric column, binned into equal-width intervals.
pub fn histogram(table: &Table, column: &str, bins: usize) -> Result<Chart, VizError> {
    if bins == 0 {
        return Err(VizError::BadBins);
    }
    let ci = column_index(table, column)?;
    require_numeric(table, ci)?;

    let values = numeric_values(table, ci);
    if values.is_empty() {
        return Err(VizError::NoData);
    }

    let min = values.iter().cloned().fold(f64::INFINITY, f64::min);
    let max = values.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    // A constant column still gets a visible bar.
    let (lo, hi) = if min == max {
        (min - 0.5, max + 0.5)
    } else {
        (min, max)
    };
    let width = (hi - lo) / bins as f64;

    let edges: Vec<f64> = (0..=bins).map(|i| lo + i as f64 * width).collect();
    let mut counts = vec![0usize; bins];
    for v in &values {
        let idx = (((v - lo) / width) as usize).min(bins - 1);
        counts[idx] += 1;
    }

    Ok(Chart::Histogram {
        label: table.schema.columns[ci].name.clone(),
        edges,
        counts,
    })
}

/// Scatter plot: two numeric columns.
pub fn scatter(table: &Table, x: &str, y: &str) -> Result<Chart, VizError> {
    let xi = column_index(table, x)?;
    let yi = column_index(table, y)?;
    require_numeric(table, xi)?;
    require_numeric(table, yi)?;

    let points = numeric_pairs(table, xi, yi);
    if points.is_empty() {
        return Err(VizError::NoData);
    }
    Ok(Chart::Scatter {
        x_label: table.schema.columns[xi].name.clone(),
        y_label: table.schema.columns[yi].name.clone(),
        points,
    })
}

/// Pie chart: categorical labels, numeric values, summed per distinct
/// label before plotting.
pub fn pie(table: &Table, labels: &str, values: &str) -> Result<Chart, VizError> {
    let li = column_index(table, labels)?;
    let vi = column_index(table, values)?;
    if table.schema.columns[li].sql_type.is_numeric() {
        return Err(VizError::ColumnType {
            column: table.schema.columns[li].name.clone(),
            requirement: "categorical",
        });
    }
    require_numeric(table, vi)?;

    let mut sums: BTreeMap<String, f64> = BTreeMap::new();
    for row in table.iter() {
        let (Some(lv), Some(vv)) = (row.get(li), row.get(vi)) else {
            continue;
        };
        if lv.is_null() {
            continue;
        }
        let Some(vv) = vv.as_real() else { continue };
        *sums.entry(lv.to_string()).or_insert(0.0) += vv;
    }
    if sums.is_empty() {
        return Err(VizError::NoData);
    }

    let (labels_out, values_out) = sums.into_iter().unzip();
    Ok(Chart::Pie {
        label: table.schema.columns[li].name.clone(),
        value_label: table.schema.columns[vi].name.clone(),
        labels: labels_out,
        values: values_out,
    })
}

/// Line plot: numeric y over any x, sorted ascending by x so the line
/// is monotonic along the axis. A categorical x plots positionally
/// with tick labels.
pub fn line(table: &Table, x: &str, y: &str) -> Result<Chart, VizError> {
    let xi = column_index(table, x)?;
    let yi = column_index(table, y)?;
    require_numeric(table, yi)?;

    let x_label = table.schema.columns[xi].name.clone();
    let y_label = table.schema.columns[yi].name.clone();

    if table.schema.columns[xi].sql_type.is_numeric() {
        let mut points = numeric_pairs(table, xi, yi);
        if points.is_empty() {
            return Err(VizError::NoData);
        }
        points.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal));
        return Ok(Chart::Line {
            x_label,
            y_label,
            points,
            ticks: None,
        });
    }

    let mut pairs: Vec<(Value, f64)> = Vec::new();
    for row in table.iter() {
        let (Some(xv), Some(yv)) = (row.get(xi), row.get(yi)) else {
            continue;
        };
        if xv.is_null() {
            continue;
        }
        let Some(yv) = yv.as_real() else { continue };
        pairs.push((xv.clone(), yv));
    }
    if pairs.is_empty() {
        return Err(VizError::NoData);
    }
    pairs.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal));

    let ticks: Vec<String> = pairs.iter().map(|(x, _)| x.to_string()).collect();
    let points: Vec<(f64, f64)> = pairs
        .iter()
        .enumerate()
        .map(|(i, (_, y))| (i as f64, *y))
        .collect();
    Ok(Chart::Line {
        x_label,
        y_label,
        points,
        ticks: Some(ticks),
    })
}

fn column_index(table: &Table, name: &str) -> Result<usize, VizError> {
    table
        .get_column_index(name)
        .ok_or_else(|| VizError::ColumnNotFound(name.to_string()))
}

fn require_numeric(table: &Table, index: usize) -> Result<(), VizError> {
    let column = &table.schema.columns[index];
    if column.sql_type.is_numeric() {
        Ok(())
    } else {
        Err(VizError::ColumnType {
            column: column.name.clone(),
            requirement: "numeric",
        })
    }
}

fn numeric_values(table: &Table, index: usize) -> Vec<f64> {
    table
        .iter()
        .filter_map(|row| row.get(index).and_then(Value::as_real))
        .collect()
}

fn numeric_pairs(table: &Table, xi: usize, yi: usize) -> Vec<(f64, f64)> {
    table
        .iter()
        .filter_map(|row| {
            let x = row.get(xi).and_then(Value::as_real)?;
            let y = row.get(yi).and_then(Value::as_real)?;
            Some((x, y))
        })
        .collect()
}
