//! processos-dash - reporting dashboard over legal-process records
//!
//! Loads a tab-separated export of court cases, checks that the columns the
//! dashboard depends on are present, writes two static summary charts and
//! serves an interactive page filtered by tribunal and date range.
//!
//! # Overview
//!
//! The pipeline runs in five steps:
//!
//! 1. **Load** ([`dataset`]): read the TSV once, parse `Dat. preenchimento`
//!    day-first (bad values become null), abort if required columns are missing.
//! 2. **Static report** ([`report`]): counts per tribunal and per month,
//!    rendered to `processos_por_tribunal` / `processos_por_periodo` images.
//! 3. **Filter** ([`filter`]): tribunal selection + inclusive date range.
//! 4. **Panels** ([`view`], [`ranking`], [`chart`]): value-frequency rankings
//!    for four columns, drawn as horizontal bar charts or replaced by a notice.
//! 5. **Shell** ([`shell`], [`serve`]): turns the view model into HTML and
//!    serves it over HTTP.
//!
//! # Quick Start
//!
//! ```no_run
//! use processos_dash::{view, Dataset, FilterController, Query};
//!
//! let dataset = Dataset::load("data.csv").expect("dataset");
//! let controller = FilterController::new(true);
//! let query = Query::parse("tribunal=TODOS&inicio=2023-01-01&fim=2023-12-31");
//! let today = chrono::Local::now().date_naive();
//!
//! let page = view::render(&dataset, &controller, &query, today, false);
//! println!("{}", page.summary);
//! for panel in &page.panels {
//!     println!("{}: notice = {}", panel.heading, panel.is_notice());
//! }
//! ```
//!
//! # Modules
//!
//! - [`dataset`]: TSV loading, column validation, day-first dates
//! - [`report`]: whole-dataset aggregations and static images
//! - [`filter`]: tribunal options, date bounds, filtered views
//! - [`ranking`]: value-frequency rankings
//! - [`chart`]: plotters bar charts (SVG, optional PNG)
//! - [`view`]: the per-request view model
//! - [`shell`]: presenter interface with HTML and terminal renditions
//! - [`serve`]: tiny_http request loop

pub mod chart;
pub mod dataset;
pub mod error;
pub mod filter;
pub mod ranking;
pub mod report;
pub mod serve;
pub mod shell;
pub mod view;

pub use chart::ImageFormat;
pub use dataset::{Dataset, Record, REQUIRED_COLUMNS};
pub use error::DashError;
pub use filter::{DateRange, FilterController, Query, TribunalSelection};
pub use ranking::{frequency_ranking, FrequencyRanking};
pub use report::StaticReport;
pub use shell::Layout;
pub use view::DashboardView;

#[cfg(test)]
mod tests {
    use super::*;

    // ==========================================================================
    // PUBLIC API TESTS
    // ==========================================================================
    //
    // These tests verify the public API surface is reachable from the root.
    // ==========================================================================

    #[test]
    fn test_public_exports() {
        let _ = FilterController::new(false);
        let _ = Query::default();
        let _: ImageFormat = ImageFormat::Svg;
        assert_eq!(REQUIRED_COLUMNS.len(), 6);
    }

    #[test]
    fn test_end_to_end_from_tsv() {
        let tsv = "Tribunal\tDat. preenchimento\tClasse do Processo\tMunicípio\tAssunto Principal do Processo\tUnidade\n\
                   TJ-A\t10/01/2023\tAção Civil\tRecife\tDano Moral\t1ª Vara\n\
                   TJ-A\t05/02/2023\tExecução\tOlinda\tCobrança\t2ª Vara\n\
                   TJ-B\t20/01/2023\tAção Civil\tRecife\tDano Moral\t1ª Vara\n";
        let dataset = Dataset::from_reader(tsv.as_bytes()).unwrap();

        let query = Query::parse("tribunal=TJ-A&inicio=2023-01-01&fim=2023-01-31");
        let today = chrono::NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();
        let page = view::render(&dataset, &FilterController::new(false), &query, today, false);

        assert_eq!(page.record_count, 1);
        assert!(page.panels.iter().all(|p| !p.is_notice()));

        let report = StaticReport::build(&dataset);
        assert_eq!(report.by_tribunal[0], ("TJ-A".to_string(), 2));
        assert_eq!(report.by_month.len(), 2);
    }
}
