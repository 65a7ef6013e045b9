//! Presentation shell
//!
//! The view model knows nothing about HTML or terminals. A [`Presenter`]
//! turns it into something visible, and [`present`] is the only place that
//! drives one, so the page structure lives in one spot:
//!
//! 1. header
//! 2. tribunal selector + date range
//! 3. record-count summary
//! 4. the four category panels (chart or notice)
//! 5. downloads (and, in the inline layout, previews) of the static images

pub mod html;
pub mod text;

use crate::filter::DateRange;
use crate::ranking::FrequencyRanking;
use crate::report::StaticImage;
use crate::view::{DashboardView, PanelContent};
use serde::Serialize;

pub use html::HtmlPresenter;
pub use text::TextPresenter;

pub const SELECTOR_LABEL: &str = "Selecione o Tribunal:";
pub const DATE_RANGE_LABEL: &str = "Selecione o período (início e fim):";

/// The two page arrangements the dashboard ships with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, clap::ValueEnum)]
pub enum Layout {
    /// Filters in a sidebar, panels stacked, one tribunal at a time.
    #[default]
    Sidebar,
    /// Filters above the content, panels in two columns, "TODOS" option and
    /// inline previews of the static charts.
    Inline,
}

impl Layout {
    pub fn include_all_option(self) -> bool {
        matches!(self, Layout::Inline)
    }

    pub fn show_previews(self) -> bool {
        matches!(self, Layout::Inline)
    }

    pub fn panel_columns(self) -> usize {
        match self {
            Layout::Sidebar => 1,
            Layout::Inline => 2,
        }
    }
}

/// A static image offered for download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Download {
    pub image: StaticImage,
    pub file_name: String,
    /// Served as an attachment.
    pub href: String,
    /// Served inline, for previews.
    pub src: String,
}

impl Download {
    pub fn new(image: StaticImage, file_name: impl Into<String>) -> Self {
        Self {
            image,
            file_name: file_name.into(),
            href: format!("/download/{}", image.slug()),
            src: format!("/static/{}", image.slug()),
        }
    }
}

pub trait Presenter {
    fn render_header(&mut self, title: &str);
    fn render_selector(&mut self, label: &str, options: &[String], selected: &str);
    fn render_date_range(&mut self, label: &str, bounds: DateRange, value: DateRange);
    fn render_summary(&mut self, text: &str);
    fn render_chart(&mut self, heading: &str, ranking: &FrequencyRanking, svg: Option<&str>);
    fn render_notice(&mut self, heading: &str, message: &str);
    fn offer_download(&mut self, label: &str, download: &Download);
    fn render_preview(&mut self, title: &str, download: &Download);
}

/// Walk a view model through a presenter, top to bottom.
pub fn present<P: Presenter>(view: &DashboardView, downloads: &[Download], layout: Layout, presenter: &mut P) {
    presenter.render_header(&view.title);
    presenter.render_selector(SELECTOR_LABEL, &view.options, &view.selected);
    presenter.render_date_range(DATE_RANGE_LABEL, view.bounds, view.range);
    presenter.render_summary(&view.summary);

    for panel in &view.panels {
        match &panel.content {
            PanelContent::Chart { ranking, svg } => presenter.render_chart(&panel.heading, ranking, svg.as_deref()),
            PanelContent::Notice { message } => presenter.render_notice(&panel.heading, message),
        }
    }

    for download in downloads {
        presenter.offer_download(&format!("⬇️ Baixar {}", download.file_name), download);
    }

    if layout.show_previews() {
        for download in downloads {
            presenter.render_preview(&download.file_name, download);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::PanelView;
    use chrono::NaiveDate;

    /// Records the call sequence.
    #[derive(Default)]
    struct Recorder {
        calls: Vec<String>,
    }

    impl Presenter for Recorder {
        fn render_header(&mut self, title: &str) {
            self.calls.push(format!("header:{}", title));
        }
        fn render_selector(&mut self, _label: &str, options: &[String], selected: &str) {
            self.calls.push(format!("selector:{}:{}", options.len(), selected));
        }
        fn render_date_range(&mut self, _label: &str, _bounds: DateRange, value: DateRange) {
            self.calls.push(format!("dates:{}", value));
        }
        fn render_summary(&mut self, text: &str) {
            self.calls.push(format!("summary:{}", text));
        }
        fn render_chart(&mut self, heading: &str, _ranking: &FrequencyRanking, _svg: Option<&str>) {
            self.calls.push(format!("chart:{}", heading));
        }
        fn render_notice(&mut self, heading: &str, _message: &str) {
            self.calls.push(format!("notice:{}", heading));
        }
        fn offer_download(&mut self, _label: &str, download: &Download) {
            self.calls.push(format!("download:{}", download.href));
        }
        fn render_preview(&mut self, _title: &str, download: &Download) {
            self.calls.push(format!("preview:{}", download.src));
        }
    }

    fn view() -> DashboardView {
        let day = NaiveDate::from_ymd_opt(2023, 1, 1).unwrap();
        DashboardView {
            title: "T".into(),
            options: vec!["TJ-A".into()],
            selected: "TJ-A".into(),
            bounds: DateRange::single(day),
            range: DateRange::single(day),
            record_count: 0,
            summary: "S".into(),
            panels: vec![
                PanelView {
                    column: "a".into(),
                    heading: "A".into(),
                    content: PanelContent::Notice { message: "m".into() },
                },
                PanelView {
                    column: "b".into(),
                    heading: "B".into(),
                    content: PanelContent::Chart {
                        ranking: FrequencyRanking::default(),
                        svg: None,
                    },
                },
            ],
        }
    }

    fn downloads() -> Vec<Download> {
        vec![
            Download::new(StaticImage::Tribunal, "processos_por_tribunal.svg"),
            Download::new(StaticImage::Period, "processos_por_periodo.svg"),
        ]
    }

    #[test]
    fn test_present_order_sidebar() {
        let mut r = Recorder::default();
        present(&view(), &downloads(), Layout::Sidebar, &mut r);
        assert_eq!(
            r.calls,
            vec![
                "header:T",
                "selector:1:TJ-A",
                "dates:2023-01-01 até 2023-01-01",
                "summary:S",
                "notice:A",
                "chart:B",
                "download:/download/tribunal",
                "download:/download/periodo",
            ]
        );
    }

    #[test]
    fn test_inline_layout_adds_previews() {
        let mut r = Recorder::default();
        present(&view(), &downloads(), Layout::Inline, &mut r);
        assert_eq!(r.calls.last().map(String::as_str), Some("preview:/static/periodo"));
        assert_eq!(r.calls.iter().filter(|c| c.starts_with("preview:")).count(), 2);
    }

    #[test]
    fn test_layout_options() {
        assert!(!Layout::Sidebar.include_all_option());
        assert!(Layout::Inline.include_all_option());
        assert_eq!(Layout::Inline.panel_columns(), 2);
    }
}
