use std::path::Path;

use plotters::coord::Shift;
use plotters::prelude::*;
use tracing::info;

use super::{Chart, VizError};

const CHART_SIZE: (u32, u32) = (960, 720);

const SLICE_COLORS: [RGBColor; 8] = [
    RGBColor(31, 119, 180),
    RGBColor(255, 127, 14),
    RGBColor(44, 160, 44),
    RGBColor(214, 39, 40),
    RGBColor(148, 103, 189),
    RGBColor(140, 86, 75),
    RGBColor(227, 119, 194),
    RGBColor(127, 127, 127),
];

/// Draw a prepared chart to an SVG file. This is the hand-off point to
/// the plotting collaborator; failures here are recoverable and never
/// end the session.
pub fn render_svg(chart: &Chart, path: &Path) -> Result<(), VizError> {
    let root = SVGBackend::new(path, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE).map_err(render_err)?;

    match chart {
        Chart::Bar {
            x_label,
            y_label,
            labels,
            values,
        } => draw_bar(&root, &chart.title(), x_label, y_label, labels, values)?,
        Chart::Histogram {
            label,
            edges,
            counts,
        } => draw_histogram(&root, &chart.title(), label, edges, counts)?,
        Chart::Scatter {
            x_label,
            y_label,
            points,
        } => draw_scatter(&root, &chart.title(), x_label, y_label, points)?,
        Chart::Pie { labels, values, .. } => draw_pie(&root, &chart.title(), labels, values)?,
        Chart::Line {
            x_label,
            y_label,
            points,
            ticks,
        } => draw_line(&root, &chart.title(), x_label, y_label, points, ticks.as_deref())?,
    }

    root.present().map_err(render_err)?;
    info!(path = %path.display(), kind = chart.kind().name(), "chart written");
    Ok(())
}

fn draw_bar(
    root: &DrawingArea<SVGBackend, Shift>,
    title: &str,
    x_label: &str,
    y_label: &str,
    labels: &[String],
    values: &[f64],
) -> Result<(), VizError> {
    let n = values.len();
    let (y_lo, y_hi) = padded_span(values.iter().cloned().chain([0.0]));

    let mut chart = ChartBuilder::on(root)
        .caption(title, ("sans-serif", 24))
        .margin(10)
        .x_label_area_size(60)
        .y_label_area_size(60)
        .build_cartesian_2d(-0.5f64..n as f64 - 0.5, y_lo..y_hi)
        .map_err(render_err)?;

    let owned = labels.to_vec();
    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(n.min(20))
        .x_label_formatter(&move |x| position_label(*x, &owned))
        .x_desc(x_label)
        .y_desc(y_label)
        .draw()
        .map_err(render_err)?;

    chart
        .draw_series(values.iter().enumerate().map(|(i, &v)| {
            let (lo, hi) = if v >= 0.0 { (0.0, v) } else { (v, 0.0) };
            Rectangle::new(
                [(i as f64 - 0.35, lo), (i as f64 + 0.35, hi)],
                BLUE.filled(),
            )
        }))
        .map_err(render_err)?;
    Ok(())
}

fn draw_histogram(
    root: &DrawingArea<SVGBackend, Shift>,
    title: &str,
    label: &str,
    edges: &[f64],
    counts: &[usize],
) -> Result<(), VizError> {
    let lo = edges.first().copied().unwrap_or(0.0);
    let hi = edges.last().copied().unwrap_or(1.0);
    let max_count = counts.iter().max().copied().unwrap_or(0) as f64;

    let mut chart = ChartBuilder::on(root)
        .caption(title, ("sans-serif", 24))
        .margin(10)
        .x_label_area_size(60)
        .y_label_area_size(60)
        .build_cartesian_2d(lo..hi, 0f64..(max_count * 1.05).max(1.0))
        .map_err(render_err)?;

    chart
        .configure_mesh()
        .x_desc(label)
        .y_desc("Frequency")
        .draw()
        .map_err(render_err)?;

    chart
        .draw_series(counts.iter().enumerate().map(|(i, &c)| {
            Rectangle::new(
                [(edges[i], 0.0), (edges[i + 1], c as f64)],
                BLUE.mix(0.7).filled(),
            )
        }))
        .map_err(render_err)?;
    Ok(())
}

fn draw_scatter(
    root: &DrawingArea<SVGBackend, Shift>,
    title: &str,
    x_label: &str,
    y_label: &str,
    points: &[(f64, f64)],
) -> Result<(), VizError> {
    let (x_lo, x_hi) = padded_span(points.iter().map(|p| p.0));
    let (y_lo, y_hi) = padded_span(points.iter().map(|p| p.1));

    let mut chart = ChartBuilder::on(root)
        .caption(title, ("sans-serif", 24))
        .margin(10)
        .x_label_area_size(60)
        .y_label_area_size(60)
        .build_cartesian_2d(x_lo..x_hi, y_lo..y_hi)
        .map_err(render_err)?;

    chart
        .configure_mesh()
        .x_desc(x_label)
        .y_desc(y_label)
        .draw()
        .map_err(render_err)?;

    chart
        .draw_series(
            points
                .iter()
                .map(|&(x, y)| Circle::new((x, y), 4, BLUE.filled())),
        )
        .map_err(render_err)?;
    Ok(())
}

fn draw_line(
    root: &DrawingArea<SVGBackend, Shift>,
    title: &str,
    x_label: &str,
    y_label: &str,
    points: &[(f64, f64)],
    ticks: Option<&[String]>,
) -> Result<(), VizError> {
    let (x_lo, x_hi) = padded_span(points.iter().map(|p| p.0));
    let (y_lo, y_hi) = padded_span(points.iter().map(|p| p.1));

    let mut chart = ChartBuilder::on(root)
        .caption(title, ("sans-serif", 24))
        .margin(10)
        .x_label_area_size(60)
        .y_label_area_size(60)
        .build_cartesian_2d(x_lo..x_hi, y_lo..y_hi)
        .map_err(render_err)?;

    if let Some(tick_labels) = ticks.map(|t| t.to_vec()) {
        let label_count = tick_labels.len().min(20);
        chart
            .configure_mesh()
            .x_desc(x_label)
            .y_desc(y_label)
            .x_labels(label_count)
            .x_label_formatter(&move |x| position_label(*x, &tick_labels))
            .draw()
            .map_err(render_err)?;
    } else {
        chart
            .configure_mesh()
            .x_desc(x_label)
            .y_desc(y_label)
            .draw()
            .map_err(render_err)?;
    }

    chart
        .draw_series(LineSeries::new(points.iter().cloned(), &BLUE))
        .map_err(render_err)?;
    Ok(())
}

fn draw_pie(
    root: &DrawingArea<SVGBackend, Shift>,
    title: &str,
    labels: &[String],
    values: &[f64],
) -> Result<(), VizError> {
    if values.iter().sum::<f64>() <= 0.0 {
        return Err(VizError::Render(
            "pie values must sum to a positive number".to_string(),
        ));
    }

    let area = root
        .clone()
        .titled(title, ("sans-serif", 24))
        .map_err(render_err)?;

    let center = (CHART_SIZE.0 as i32 / 2, CHART_SIZE.1 as i32 / 2);
    let radius = CHART_SIZE.0.min(CHART_SIZE.1) as f64 * 0.33;
    let colors: Vec<RGBColor> = (0..values.len())
        .map(|i| SLICE_COLORS[i % SLICE_COLORS.len()])
        .collect();

    let mut pie = Pie::new(&center, &radius, values, &colors, labels);
    pie.label_style(("sans-serif", 16).into_font().color(&BLACK));
    pie.percentages(("sans-serif", 14).into_font().color(&BLACK));
    area.draw(&pie).map_err(render_err)?;
    Ok(())
}

/// Tick label for a positional axis: the label at the nearest integer
/// position, blank between positions.
fn position_label(x: f64, labels: &[String]) -> String {
    let rounded = x.round();
    if (x - rounded).abs() > 0.25 || rounded < 0.0 {
        return String::new();
    }
    labels
        .get(rounded as usize)
        .cloned()
        .unwrap_or_default()
}

/// Axis span with a little headroom; degenerate spans widen to stay
/// drawable.
fn padded_span(values: impl Iterator<Item = f64>) -> (f64, f64) {
    let mut lo = f64::INFINITY;
    let mut hi = f64::NEG_INFINITY;
    for v in values {
        lo = lo.min(v);
        hi = hi.max(v);
    }
    if !lo.is_finite() || !hi.is_finite() || lo > hi {
        return (0.0, 1.0);
    }
    let span = hi - lo;
    if span <= 0.0 {
        (lo - 1.0, hi + 1.0)
    } else {
        (lo - span * 0.05, hi + span * 0.05)
    }
}

fn render_err<E: std::fmt::Display>(err: E) -> VizError {
    VizError::Render(err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::table::{Column, Row, Schema, SqlType, Table, Value};
    use crate::viz;

    fn sample_table() -> Table {
        let schema = Schema::new(vec![
            Column::new("region", SqlType::Text),
            Column::new("sales", SqlType::Integer),
            Column::new("score", SqlType::Real),
        ]);
        let rows = vec![
            Row::new(vec![
                Value::Text("north".into()),
                Value::Integer(100),
                Value::Real(1.5),
            ]),
            Row::new(vec![
                Value::Text("south".into()),
                Value::Integer(250),
                Value::Real(0.5),
            ]),
        ];
        Table::with_rows("t", schema, rows)
    }

    fn assert_renders(chart: &Chart, name: &str) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(name);
        render_svg(chart, &path).unwrap();
        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.contains("<svg"));
    }

    #[test]
    fn test_render_every_kind() {
        let table = sample_table();
        assert_renders(&viz::bar(&table, "region", "sales").unwrap(), "bar.svg");
        assert_renders(
            &viz::histogram(&table, "sales", 4).unwrap(),
            "histogram.svg",
        );
        assert_renders(
            &viz::scatter(&table, "sales", "score").unwrap(),
            "scatter.svg",
        );
        assert_renders(&viz::pie(&table, "region", "sales").unwrap(), "pie.svg");
        assert_renders(&viz::line(&table, "sales", "score").unwrap(), "line.svg");
    }

    #[test]
    fn test_position_label() {
        let labels = vec!["a".to_string(), "b".to_string()];
        assert_eq!(position_label(0.0, &labels), "a");
        assert_eq!(position_label(1.1, &labels), "b");
        assert_eq!(position_label(0.5, &labels), "");
        assert_eq!(position_label(-1.0, &labels), "");
        assert_eq!(position_label(5.0, &labels), "");
    }

    #[test]
    fn test_padded_span() {
        let (lo, hi) = padded_span([1.0, 3.0].into_iter());
        assert!(lo < 1.0 && hi > 3.0);
        let (lo, hi) = padded_span([2.0, 2.0].into_iter());
        assert!(lo < 2.0 && hi > 2.0);
        assert_eq!(padded_span(std::iter::empty()), (0.0, 1.0));
    }
}
