//! Static whole-dataset report
//!
//! Two unfiltered aggregations are computed and written as images on every
//! run, before any interaction:
//!
//! - **Processos por Tribunal**: record counts per tribunal
//! - **Processos por Período**: record counts per calendar month (`YYYY-MM`)
//!
//! The files are overwritten each time. The aggregation itself is
//! deterministic, so regenerating from unchanged data gives identical counts.
//!
//! # Usage
//!
//! ```ignore
//! use processos_dash::{report::StaticReport, Dataset, ImageFormat};
//!
//! let dataset = Dataset::load("data.csv")?;
//! let report = StaticReport::build(&dataset);
//! let images = report.write(".", ImageFormat::Svg)?;
//! ```

use crate::chart::{self, BarChart, ImageFormat};
use crate::dataset::Dataset;
use crate::error::Result;
use crate::ranking::frequency_ranking;
use chrono::Datelike;
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::info;

/// Calendar month used as the grouping key of the period chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct YearMonth {
    pub year: i32,
    pub month: u32,
}

impl YearMonth {
    pub fn of<D: Datelike>(date: &D) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

// Serialized as its `YYYY-MM` label
impl Serialize for YearMonth {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// The two static images.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum StaticImage {
    Tribunal,
    Period,
}

impl StaticImage {
    pub const ALL: [StaticImage; 2] = [StaticImage::Tribunal, StaticImage::Period];

    pub fn stem(self) -> &'static str {
        match self {
            StaticImage::Tribunal => "processos_por_tribunal",
            StaticImage::Period => "processos_por_periodo",
        }
    }

    /// Short name used in URLs.
    pub fn slug(self) -> &'static str {
        match self {
            StaticImage::Tribunal => "tribunal",
            StaticImage::Period => "periodo",
        }
    }

    pub fn from_slug(slug: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|i| i.slug() == slug)
    }

    pub fn file_name(self, format: ImageFormat) -> String {
        format!("{}.{}", self.stem(), format.extension())
    }
}

/// Where the static images were written.
#[derive(Debug, Clone, Serialize)]
pub struct StaticImages {
    pub format: ImageFormat,
    pub tribunal: PathBuf,
    pub period: PathBuf,
}

impl StaticImages {
    pub fn locate<P: AsRef<Path>>(out_dir: P, format: ImageFormat) -> Self {
        let out_dir = out_dir.as_ref();
        Self {
            format,
            tribunal: out_dir.join(StaticImage::Tribunal.file_name(format)),
            period: out_dir.join(StaticImage::Period.file_name(format)),
        }
    }

    pub fn path(&self, image: StaticImage) -> &Path {
        match image {
            StaticImage::Tribunal => &self.tribunal,
            StaticImage::Period => &self.period,
        }
    }
}

/// Whole-dataset aggregations.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StaticReport {
    pub total: usize,
    /// Rows left out of the period chart for lack of a usable date.
    pub undated: usize,
    pub by_tribunal: Vec<(String, usize)>,
    pub by_month: Vec<(YearMonth, usize)>,
}

impl StaticReport {
    pub fn build(dataset: &Dataset) -> Self {
        let by_month = monthly_counts(dataset);
        let dated: usize = by_month.iter().map(|(_, c)| c).sum();

        Self {
            total: dataset.len(),
            undated: dataset.len() - dated,
            by_tribunal: tribunal_counts(dataset),
            by_month,
        }
    }

    pub fn tribunal_chart(&self) -> BarChart {
        BarChart::vertical("Quantidade de Processos por Tribunal", "Tribunal", "Quantidade")
            .with_bars(self.by_tribunal.clone())
            .with_size(1000, 500)
    }

    pub fn period_chart(&self) -> BarChart {
        let bars = self
            .by_month
            .iter()
            .map(|(ym, c)| (ym.to_string(), *c))
            .collect();
        BarChart::vertical(
            "Quantidade de Processos por Período (mês/ano)",
            "Período (YYYY-MM)",
            "Quantidade",
        )
        .with_bars(bars)
        .with_size(1200, 600)
    }

    pub fn chart(&self, image: StaticImage) -> BarChart {
        match image {
            StaticImage::Tribunal => self.tribunal_chart(),
            StaticImage::Period => self.period_chart(),
        }
    }

    /// Render both charts into `out_dir`, replacing earlier runs.
    pub fn write<P: AsRef<Path>>(&self, out_dir: P, format: ImageFormat) -> Result<StaticImages> {
        let out_dir = out_dir.as_ref();
        std::fs::create_dir_all(out_dir)?;

        let images = StaticImages::locate(out_dir, format);
        for image in StaticImage::ALL {
            let path = images.path(image);
            chart::render_to_file(&self.chart(image), path, format)?;
            info!(path = %path.display(), "static chart written");
        }
        Ok(images)
    }
}

/// Non-null tribunal counts, most frequent first.
pub fn tribunal_counts(dataset: &Dataset) -> Vec<(String, usize)> {
    frequency_ranking(dataset.records().iter().map(|r| r.tribunal.as_deref()), None).entries
}

/// Counts per calendar month over dated records, oldest month first.
pub fn monthly_counts(dataset: &Dataset) -> Vec<(YearMonth, usize)> {
    let mut months: BTreeMap<YearMonth, usize> = BTreeMap::new();
    for date in dataset.records().iter().filter_map(|r| r.filed_on) {
        *months.entry(YearMonth::of(&date)).or_insert(0) += 1;
    }
    months.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::Record;
    use chrono::NaiveDate;

    fn rec(tribunal: Option<&str>, date: Option<(i32, u32, u32)>) -> Record {
        Record {
            tribunal: tribunal.map(str::to_string),
            filed_on: date.and_then(|(y, m, d)| NaiveDate::from_ymd_opt(y, m, d)),
            ..Default::default()
        }
    }

    fn sample() -> Dataset {
        Dataset::from_records(
            vec![],
            vec![
                rec(Some("TJ-B"), Some((2023, 2, 1))),
                rec(Some("TJ-A"), Some((2023, 1, 10))),
                rec(Some("TJ-A"), Some((2023, 1, 31))),
                rec(None, Some((2022, 12, 5))),
                rec(Some("TJ-A"), None),
            ],
        )
    }

    // ==========================================================================
    // TRIBUNAL COUNTS
    // ==========================================================================

    #[test]
    fn test_tribunal_counts_skip_nulls() {
        let counts = tribunal_counts(&sample());
        assert_eq!(counts, vec![("TJ-A".to_string(), 3), ("TJ-B".to_string(), 1)]);
    }

    // ==========================================================================
    // MONTHLY COUNTS
    // ==========================================================================
    //
    // Rows without a date are dropped. Groups are calendar months, emitted
    // chronologically and labelled YYYY-MM.
    // ==========================================================================

    #[test]
    fn test_monthly_counts_chronological() {
        let counts = monthly_counts(&sample());
        let labelled: Vec<(String, usize)> = counts.iter().map(|(m, c)| (m.to_string(), *c)).collect();
        assert_eq!(
            labelled,
            vec![
                ("2022-12".to_string(), 1),
                ("2023-01".to_string(), 2),
                ("2023-02".to_string(), 1),
            ]
        );
    }

    #[test]
    fn test_undated_rows_excluded_from_months() {
        let report = StaticReport::build(&sample());
        assert_eq!(report.total, 5);
        assert_eq!(report.undated, 1);
        assert_eq!(report.by_month.iter().map(|(_, c)| c).sum::<usize>(), 4);
    }

    #[test]
    fn test_year_month_display_and_json() {
        let ym = YearMonth { year: 2023, month: 3 };
        assert_eq!(ym.to_string(), "2023-03");
        assert_eq!(serde_json::to_string(&ym).unwrap(), "\"2023-03\"");
    }

    #[test]
    fn test_aggregation_idempotent() {
        let ds = sample();
        assert_eq!(StaticReport::build(&ds), StaticReport::build(&ds));
    }

    // ==========================================================================
    // IMAGE OUTPUT
    // ==========================================================================

    #[test]
    fn test_static_image_names() {
        assert_eq!(StaticImage::Tribunal.file_name(ImageFormat::Png), "processos_por_tribunal.png");
        assert_eq!(StaticImage::Period.file_name(ImageFormat::Svg), "processos_por_periodo.svg");
        assert_eq!(StaticImage::from_slug("periodo"), Some(StaticImage::Period));
        assert_eq!(StaticImage::from_slug("outro"), None);
    }

    #[test]
    fn test_write_creates_both_images_and_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let report = StaticReport::build(&sample());

        let first = report.write(dir.path(), ImageFormat::Svg).unwrap();
        assert!(first.tribunal.exists());
        assert!(first.period.exists());

        let second = report.write(dir.path(), ImageFormat::Svg).unwrap();
        assert_eq!(first.tribunal, second.tribunal);
        let svg = std::fs::read_to_string(&second.period).unwrap();
        assert!(svg.contains("2023-01"));
    }

    #[cfg(feature = "png")]
    #[test]
    fn test_default_format_writes_png_names() {
        let dir = tempfile::tempdir().unwrap();
        let report = StaticReport::build(&sample());

        let images = report.write(dir.path(), ImageFormat::default()).unwrap();
        assert_eq!(images.tribunal, dir.path().join("processos_por_tribunal.png"));
        assert_eq!(images.period, dir.path().join("processos_por_periodo.png"));
        assert!(images.tribunal.exists());
        assert!(images.period.exists());
    }

    #[test]
    fn test_write_empty_dataset() {
        let dir = tempfile::tempdir().unwrap();
        let report = StaticReport::build(&Dataset::default());
        assert!(report.write(dir.path(), ImageFormat::Svg).is_ok());
    }
}
