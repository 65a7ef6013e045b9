//! Bar chart rendering with plotters
//!
//! Every chart in the dashboard is a bar chart over `(label, count)` pairs:
//! vertical for the two static report images, horizontal for the category
//! panels. Drawing is written once against a generic backend and then run on
//! an in-memory SVG string (web panels) or a file (static report).

use crate::error::{DashError, Result};
use plotters::coord::Shift;
use plotters::prelude::*;
use serde::Serialize;
use std::fmt;
use std::path::Path;

/// Seaborn's default first palette colour, kept so charts look familiar.
const BAR_COLOR: RGBColor = RGBColor(76, 114, 176);
const FONT: &str = "sans-serif";
const MAX_LABEL_CHARS: usize = 40;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Orientation {
    /// Categories along x, counts up the y axis.
    Vertical,
    /// Counts along x, categories down the y axis (largest on top).
    Horizontal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, clap::ValueEnum)]
pub enum ImageFormat {
    #[cfg_attr(not(feature = "png"), default)]
    Svg,
    #[cfg_attr(feature = "png", default)]
    Png,
}

impl ImageFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ImageFormat::Svg => "svg",
            ImageFormat::Png => "png",
        }
    }

    pub fn content_type(self) -> &'static str {
        match self {
            ImageFormat::Svg => "image/svg+xml",
            ImageFormat::Png => "image/png",
        }
    }
}

impl fmt::Display for ImageFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.extension())
    }
}

/// Everything needed to draw one bar chart.
#[derive(Debug, Clone, Serialize)]
pub struct BarChart {
    pub title: String,
    pub x_desc: String,
    pub y_desc: String,
    pub orientation: Orientation,
    /// Turn category labels 90° (only meaningful for vertical charts).
    pub rotate_labels: bool,
    pub bars: Vec<(String, usize)>,
    pub size: (u32, u32),
}

impl BarChart {
    pub fn vertical(title: impl Into<String>, x_desc: impl Into<String>, y_desc: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            x_desc: x_desc.into(),
            y_desc: y_desc.into(),
            orientation: Orientation::Vertical,
            rotate_labels: true,
            bars: vec![],
            size: (1000, 500),
        }
    }

    pub fn horizontal(title: impl Into<String>, x_desc: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            x_desc: x_desc.into(),
            y_desc: String::new(),
            orientation: Orientation::Horizontal,
            rotate_labels: false,
            bars: vec![],
            size: (1000, 500),
        }
    }

    pub fn with_bars(mut self, bars: Vec<(String, usize)>) -> Self {
        self.bars = bars;
        self
    }

    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.size = (width, height);
        self
    }
}

/// Render to an SVG document held in memory.
pub fn render_svg(chart: &BarChart) -> Result<String> {
    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, chart.size).into_drawing_area();
        draw(&root, chart).map_err(|e| DashError::Render(e.to_string()))?;
    }
    Ok(svg)
}

/// Render to `path`, overwriting whatever is there.
pub fn render_to_file(chart: &BarChart, path: &Path, format: ImageFormat) -> Result<()> {
    match format {
        ImageFormat::Svg => {
            let root = SVGBackend::new(path, chart.size).into_drawing_area();
            draw(&root, chart).map_err(|e| DashError::Render(e.to_string()))
        }
        #[cfg(feature = "png")]
        ImageFormat::Png => {
            let root = BitMapBackend::new(path, chart.size).into_drawing_area();
            draw(&root, chart).map_err(|e| DashError::Render(e.to_string()))
        }
        #[cfg(not(feature = "png"))]
        ImageFormat::Png => Err(DashError::UnsupportedFormat(format.to_string())),
    }
}

fn draw<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    chart: &BarChart,
) -> std::result::Result<(), DrawingAreaErrorKind<DB::ErrorType>> {
    root.fill(&WHITE)?;

    let n = chart.bars.len().max(1);
    let max = chart.bars.iter().map(|(_, c)| *c).max().unwrap_or(0);
    // a little headroom above the tallest bar
    let top = max + (max / 10).max(1);

    let labels: Vec<String> = chart.bars.iter().map(|(l, _)| shorten(l)).collect();
    let longest = labels.iter().map(|l| l.chars().count()).max().unwrap_or(0) as u32;

    match chart.orientation {
        Orientation::Vertical => {
            let label_area = if chart.rotate_labels {
                (longest * 7 + 20).clamp(40, 260)
            } else {
                40
            };

            let mut ctx = ChartBuilder::on(root)
                .caption(&chart.title, (FONT, 22))
                .margin(15)
                .x_label_area_size(label_area)
                .y_label_area_size(60)
                .build_cartesian_2d((0..n).into_segmented(), 0..top)?;

            {
                let formatter = |v: &SegmentValue<usize>| segment_label(v, &labels);
                let mut mesh = ctx.configure_mesh();
                mesh.disable_x_mesh()
                    .x_labels(n)
                    .x_label_formatter(&formatter)
                    .x_desc(chart.x_desc.as_str())
                    .y_desc(chart.y_desc.as_str());
                if chart.rotate_labels {
                    mesh.x_label_style((FONT, 12).into_font().transform(FontTransform::Rotate90));
                }
                mesh.draw()?;
            }

            ctx.draw_series(
                Histogram::vertical(&ctx)
                    .style(BAR_COLOR.filled())
                    .margin(3)
                    .data(chart.bars.iter().enumerate().map(|(i, (_, c))| (i, *c))),
            )?;
        }
        Orientation::Horizontal => {
            // y grows upwards, so rank 0 goes in the last slot
            let reversed: Vec<String> = labels.iter().rev().cloned().collect();

            let mut ctx = ChartBuilder::on(root)
                .caption(&chart.title, (FONT, 22))
                .margin(15)
                .x_label_area_size(40)
                .y_label_area_size((longest * 7 + 20).clamp(60, 320))
                .build_cartesian_2d(0..top, (0..n).into_segmented())?;

            {
                let formatter = |v: &SegmentValue<usize>| segment_label(v, &reversed);
                let mut mesh = ctx.configure_mesh();
                mesh.disable_y_mesh()
                    .y_labels(n)
                    .y_label_formatter(&formatter)
                    .x_desc(chart.x_desc.as_str());
                if !chart.y_desc.is_empty() {
                    mesh.y_desc(chart.y_desc.as_str());
                }
                mesh.draw()?;
            }

            let last = chart.bars.len().saturating_sub(1);
            ctx.draw_series(
                Histogram::horizontal(&ctx)
                    .style(BAR_COLOR.filled())
                    .margin(3)
                    .data(chart.bars.iter().enumerate().map(|(i, (_, c))| (last - i, *c))),
            )?;
        }
    }

    root.present()?;
    Ok(())
}

fn segment_label(value: &SegmentValue<usize>, labels: &[String]) -> String {
    match value {
        SegmentValue::CenterOf(i) | SegmentValue::Exact(i) => labels.get(*i).cloned().unwrap_or_default(),
        SegmentValue::Last => String::new(),
    }
}

fn shorten(label: &str) -> String {
    if label.chars().count() <= MAX_LABEL_CHARS {
        label.to_string()
    } else {
        let head: String = label.chars().take(MAX_LABEL_CHARS - 1).collect();
        format!("{}…", head)
    }
}
