//! Terminal rendition, used by the `query` subcommand

use super::{Download, Presenter};
use crate::filter::DateRange;
use crate::ranking::FrequencyRanking;

const BAR_WIDTH: usize = 40;

#[derive(Debug, Default)]
pub struct TextPresenter {
    out: String,
}

impl TextPresenter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn finish(self) -> String {
        self.out
    }

    fn line(&mut self, s: impl AsRef<str>) {
        self.out.push_str(s.as_ref());
        self.out.push('\n');
    }
}

impl Presenter for TextPresenter {
    fn render_header(&mut self, title: &str) {
        self.line(format!("\x1b[1m{}\x1b[0m", title));
        self.line("─".repeat(70));
    }

    fn render_selector(&mut self, label: &str, options: &[String], selected: &str) {
        self.line(format!("{} {} ({} opções)", label, selected, options.len()));
    }

    fn render_date_range(&mut self, label: &str, bounds: DateRange, value: DateRange) {
        self.line(format!("{} {} [limites: {}]", label, value, bounds));
    }

    fn render_summary(&mut self, text: &str) {
        self.line("");
        self.line(format!("\x1b[1m{}\x1b[0m", text));
    }

    fn render_chart(&mut self, heading: &str, ranking: &FrequencyRanking, _svg: Option<&str>) {
        self.line("");
        self.line(heading);
        let max = ranking.max_count().max(1);
        let width = ranking
            .labels()
            .iter()
            .map(|v| v.chars().count())
            .max()
            .unwrap_or(0)
            .min(40);
        for (value, count) in &ranking.entries {
            let label: String = value.chars().take(width).collect();
            let bar = "█".repeat((count * BAR_WIDTH).div_ceil(max));
            self.line(format!("  {:<width$}  {:>6}  {}", label, count, bar, width = width));
        }
    }

    fn render_notice(&mut self, heading: &str, message: &str) {
        self.line("");
        self.line(heading);
        self.line(format!("  \x1b[90m{}\x1b[0m", message));
    }

    fn offer_download(&mut self, _label: &str, download: &Download) {
        self.line(format!("\x1b[90mImagem estática: {}\x1b[0m", download.file_name));
    }

    fn render_preview(&mut self, _title: &str, _download: &Download) {}
}
