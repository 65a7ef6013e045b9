//! Dashboard view model
//!
//! `render` is a pure function of the loaded dataset and one request's filter
//! inputs. Each interaction calls it again from scratch; nothing is cached
//! between requests and the dataset is never modified.

use crate::chart::{self, BarChart};
use crate::dataset::{Dataset, ASSUNTO, CLASSE, MUNICIPIO, UNIDADE};
use crate::filter::{DateRange, FilterController, FilteredView, Query, TribunalSelection};
use crate::ranking::{frequency_ranking, FrequencyRanking};
use chrono::NaiveDate;
use serde::Serialize;
use tracing::{debug, warn};

pub const PAGE_TITLE: &str = "Análise de Processos por Tribunal";
pub const NO_RECORDS: &str = "Nenhum registro no filtro atual.";

pub fn no_values_notice(column: &str) -> String {
    format!("Nenhum valor disponível na coluna '{}' para o filtro atual.", column)
}

/// One category panel: which column, how it is labelled, how many bars.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PanelSpec {
    pub column: &'static str,
    pub heading: &'static str,
    pub title: &'static str,
    pub top_n: Option<usize>,
}

pub const CATEGORY_PANELS: [PanelSpec; 4] = [
    PanelSpec {
        column: CLASSE,
        heading: "Distribuição por Classe do Processo",
        title: "Distribuição por Classe do Processo",
        top_n: None,
    },
    PanelSpec {
        column: MUNICIPIO,
        heading: "Distribuição por Município (top 15)",
        title: "Distribuição por Município",
        top_n: Some(15),
    },
    PanelSpec {
        column: ASSUNTO,
        heading: "Distribuição por Assunto Principal do Processo (top 15)",
        title: "Distribuição por Assunto Principal do Processo",
        top_n: Some(15),
    },
    PanelSpec {
        column: UNIDADE,
        heading: "Distribuição por Unidade (top 15)",
        title: "Distribuição por Unidade",
        top_n: Some(15),
    },
];

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PanelContent {
    Chart {
        ranking: FrequencyRanking,
        /// Rendered chart markup; left out of JSON responses.
        #[serde(skip)]
        svg: Option<String>,
    },
    Notice {
        message: String,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PanelView {
    pub column: String,
    pub heading: String,
    pub content: PanelContent,
}

impl PanelView {
    pub fn is_notice(&self) -> bool {
        matches!(self.content, PanelContent::Notice { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardView {
    pub title: String,
    pub options: Vec<String>,
    pub selected: String,
    pub bounds: DateRange,
    pub range: DateRange,
    pub record_count: usize,
    pub summary: String,
    pub panels: Vec<PanelView>,
}

/// Build the page's view model for one request.
///
/// With `draw_charts` off, panels carry rankings only (JSON API, terminal).
pub fn render(
    dataset: &Dataset,
    controller: &FilterController,
    query: &Query,
    today: NaiveDate,
    draw_charts: bool,
) -> DashboardView {
    let resolved = controller.resolve(dataset, query, today);
    let view = controller.apply(dataset, &resolved);
    debug!(
        tribunal = %resolved.selection,
        range = %resolved.range,
        rows = view.len(),
        "filter applied"
    );
    if resolved.range.is_inverted() {
        debug!(range = %resolved.range, "start date after end date, nothing selected");
    }

    let panels = CATEGORY_PANELS
        .iter()
        .map(|spec| render_panel(&view, dataset.has_column(spec.column), spec, draw_charts))
        .collect();

    DashboardView {
        title: PAGE_TITLE.to_string(),
        selected: resolved.selection.as_option().to_string(),
        summary: summary_line(&resolved.selection, resolved.range, view.len()),
        record_count: view.len(),
        options: resolved.options,
        bounds: resolved.bounds,
        range: resolved.range,
        panels,
    }
}

/// Ranking + chart for one column, or a notice when there is nothing to draw.
pub fn render_panel(view: &FilteredView<'_>, has_column: bool, spec: &PanelSpec, draw_chart: bool) -> PanelView {
    let panel = |content| PanelView {
        column: spec.column.to_string(),
        heading: spec.heading.to_string(),
        content,
    };

    if view.is_empty() {
        return panel(PanelContent::Notice {
            message: NO_RECORDS.to_string(),
        });
    }

    let ranking = if has_column {
        frequency_ranking(view.column(spec.column), spec.top_n)
    } else {
        FrequencyRanking::default()
    };
    if ranking.is_empty() {
        return panel(PanelContent::Notice {
            message: no_values_notice(spec.column),
        });
    }

    debug!(
        column = spec.column,
        values = ranking.len(),
        rows = ranking.total(),
        "panel ranked"
    );

    let svg = if draw_chart {
        let height = panel_height(ranking.len(), spec.top_n);
        let bar_chart = BarChart::horizontal(spec.title, "Quantidade")
            .with_bars(ranking.entries.clone())
            .with_size(1000, height);
        match chart::render_svg(&bar_chart) {
            Ok(svg) => Some(svg),
            Err(e) => {
                warn!(column = spec.column, error = %e, "panel chart failed");
                return panel(PanelContent::Notice {
                    message: format!("Não foi possível desenhar o gráfico: {}", e),
                });
            }
        }
    } else {
        None
    };

    panel(PanelContent::Chart { ranking, svg })
}

/// Pixel height for a panel chart. Truncated panels stay within 700px;
/// an untruncated panel keeps 28px per bar however many values it has.
pub fn panel_height(bars: usize, top_n: Option<usize>) -> u32 {
    let natural = (bars as u32).saturating_mul(28).saturating_add(120);
    match top_n {
        Some(_) => natural.clamp(300, 700),
        None => natural.max(300),
    }
}

pub fn summary_line(selection: &TribunalSelection, range: DateRange, count: usize) -> String {
    let scope = match selection {
        TribunalSelection::All => "em todos os tribunais".to_string(),
        TribunalSelection::Only(t) => format!("no {}", t),
    };
    format!(
        "Total de registros {} ({} até {}): {}",
        scope, range.start, range.end, count
    )
}
