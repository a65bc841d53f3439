use plotters::prelude::*;
use crate::{Error, Result, Table, Trendline};

// matplotlib's tab20 cycle
pub const TAB20: [RGBColor; 20] = [
    RGBColor(31, 119, 180),
    RGBColor(174, 199, 232),
    RGBColor(255, 127, 14),
    RGBColor(255, 187, 120),
    RGBColor(44, 160, 44),
    RGBColor(152, 223, 138),
    RGBColor(214, 39, 40),
    RGBColor(255, 152, 150),
    RGBColor(148, 103, 189),
    RGBColor(197, 176, 213),
    RGBColor(140, 86, 75),
    RGBColor(196, 156, 148),
    RGBColor(227, 119, 194),
    RGBColor(247, 182, 210),
    RGBColor(127, 127, 127),
    RGBColor(199, 199, 199),
    RGBColor(188, 189, 34),
    RGBColor(219, 219, 141),
    RGBColor(23, 190, 207),
    RGBColor(158, 218, 229),
];

const DEFAULT_SIZE: (u32, u32) = (1600, 1000);
const BAR_GROUP_WIDTH: f64 = 0.8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    Line,
    Bar,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartSeries {
    pub label: String,
    pub values: Vec<Option<f64>>,
}

impl ChartSeries {
    pub fn new(label: impl Into<String>, values: Vec<Option<f64>>) -> Self {
        Self {
            label: label.into(),
            values,
        }
    }

    /// One series per table row, labelled by `label_column`, with one value
    /// per entry of `value_columns`.
    pub fn from_table(table: &Table, label_column: &str, value_columns: &[String]) -> Result<Vec<Self>> {
        let labels = table.column(label_column)?;
        let columns = value_columns
            .iter()
            .map(|name| table.numeric_column(name))
            .collect::<Result<Vec<_>>>()?;

        Ok(labels
            .iter()
            .enumerate()
            .map(|(row, label)| {
                let label = match label {
                    Some(value) => value.to_string(),
                    None => String::new(),
                };
                let values = columns.iter().map(|column| column[row]).collect();
                Self::new(label, values)
            })
            .collect())
    }

    fn points<'a>(&'a self, x_values: &'a [f64]) -> impl Iterator<Item = (f64, f64)> + 'a {
        x_values
            .iter()
            .zip(&self.values)
            .filter_map(|(&x, y)| y.filter(|y| y.is_finite()).map(|y| (x, y)))
    }
}

#[derive(Debug, Clone)]
pub struct ChartOptions {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub x_limits: Option<(f64, f64)>,
    pub size: (u32, u32),
}

impl ChartOptions {
    pub fn new(title: impl Into<String>, x_label: impl Into<String>, y_label: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            x_label: x_label.into(),
            y_label: y_label.into(),
            x_limits: None,
            size: DEFAULT_SIZE,
        }
    }

    pub fn with_x_limits(mut self, left: f64, right: f64) -> Self {
        self.x_limits = Some((left, right));
        self
    }

    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.size = (width, height);
        self
    }
}

fn plot_err<E: std::fmt::Display>(err: E) -> Error {
    Error::Plot(err.to_string())
}

fn padded(min: f64, max: f64) -> (f64, f64) {
    if min == max {
        return (min - 1.0, max + 1.0);
    }
    let pad = (max - min) * 0.05;
    (min - pad, max + pad)
}

pub fn render_line_chart(
    series: &[ChartSeries],
    x_values: &[f64],
    options: &ChartOptions,
    trendline: Option<&Trendline>,
) -> Result<String> {
    render_chart(ChartKind::Line, series, x_values, options, trendline)
}

pub fn render_bar_chart(
    series: &[ChartSeries],
    x_values: &[f64],
    options: &ChartOptions,
    trendline: Option<&Trendline>,
) -> Result<String> {
    render_chart(ChartKind::Bar, series, x_values, options, trendline)
}

/// Renders rows-as-series data to an SVG document.
pub fn render_chart(
    kind: ChartKind,
    series: &[ChartSeries],
    x_values: &[f64],
    options: &ChartOptions,
    trendline: Option<&Trendline>,
) -> Result<String> {
    if let Some(bad) = series.iter().find(|s| s.values.len() != x_values.len()) {
        return Err(Error::Plot(format!(
            "Series {} has {} values for {} x points",
            bad.label,
            bad.values.len(),
            x_values.len()
        )));
    }

    let ys: Vec<f64> = series.iter().flat_map(|s| s.points(x_values).map(|(_, y)| y)).collect();
    if ys.is_empty() {
        return Err(Error::Plot("Nothing to plot".to_string()));
    }

    let (x_min, x_max) = match options.x_limits {
        Some(limits) => limits,
        None => {
            let lo = x_values.iter().copied().fold(f64::INFINITY, f64::min);
            let hi = x_values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            match kind {
                ChartKind::Line => padded(lo, hi),
                ChartKind::Bar => (lo - 0.5, hi + 0.5),
            }
        }
    };

    let mut y_lo = ys.iter().copied().fold(f64::INFINITY, f64::min);
    let mut y_hi = ys.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if kind == ChartKind::Bar {
        y_lo = y_lo.min(0.0);
        y_hi = y_hi.max(0.0);
    }
    if let Some(trend) = trendline {
        for y in [trend.eval(x_min), trend.eval(x_max)] {
            y_lo = y_lo.min(y);
            y_hi = y_hi.max(y);
        }
    }
    let (y_min, y_max) = padded(y_lo, y_hi);

    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, options.size).into_drawing_area();
        root.fill(&WHITE).map_err(plot_err)?;

        let mut chart = ChartBuilder::on(&root)
            .caption(&options.title, ("sans-serif", 30))
            .margin(20)
            .x_label_area_size(50)
            .y_label_area_size(90)
            .build_cartesian_2d(x_min..x_max, y_min..y_max)
            .map_err(plot_err)?;

        chart
            .configure_mesh()
            .x_desc(options.x_label.as_str())
            .y_desc(options.y_label.as_str())
            .draw()
            .map_err(plot_err)?;

        let bar_width = BAR_GROUP_WIDTH / series.len().max(1) as f64;

        for (i, s) in series.iter().enumerate() {
            let color = TAB20[i % TAB20.len()];
            let points: Vec<(f64, f64)> = s.points(x_values).collect();

            match kind {
                ChartKind::Line => {
                    chart
                        .draw_series(LineSeries::new(points.clone(), color.stroke_width(4)))
                        .map_err(plot_err)?
                        .label(s.label.as_str())
                        .legend(move |(x, y)| {
                            PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(4))
                        });
                    chart
                        .draw_series(points.iter().map(|&p| Circle::new(p, 6, color.filled())))
                        .map_err(plot_err)?;
                }
                ChartKind::Bar => {
                    let offset = -BAR_GROUP_WIDTH / 2.0 + bar_width * i as f64;
                    chart
                        .draw_series(points.iter().map(|&(x, y)| {
                            Rectangle::new([(x + offset, 0.0), (x + offset + bar_width, y)], color.filled())
                        }))
                        .map_err(plot_err)?
                        .label(s.label.as_str())
                        .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 20, y + 5)], color.filled()));
                }
            }
        }

        if let Some(trend) = trendline {
            chart
                .draw_series(LineSeries::new(
                    vec![(x_min, trend.eval(x_min)), (x_max, trend.eval(x_max))],
                    BLACK.mix(0.6).stroke_width(2),
                ))
                .map_err(plot_err)?;
        }

        if !series.is_empty() {
            chart
                .configure_series_labels()
                .position(SeriesLabelPosition::UpperRight)
                .background_style(WHITE.mix(0.8))
                .border_style(BLACK)
                .draw()
                .map_err(plot_err)?;
        }

        root.present().map_err(plot_err)?;
    }

    Ok(svg)
}
