//! HTML rendition of the dashboard page

use super::{Download, Layout, Presenter};
use crate::filter::DateRange;
use crate::ranking::FrequencyRanking;
use std::fmt::Write;

/// Collects page fragments, then lays them out in [`HtmlPresenter::finish`].
#[derive(Debug, Default)]
pub struct HtmlPresenter {
    title: String,
    controls: Vec<String>,
    summary: String,
    panels: Vec<String>,
    downloads: Vec<String>,
    previews: Vec<String>,
}

impl HtmlPresenter {
    pub fn new() -> Self {
        Self::default()
    }

    /// The complete HTML document.
    pub fn finish(self, layout: Layout) -> String {
        let mut out = String::with_capacity(64 * 1024);
        let layout_class = match layout {
            Layout::Sidebar => "layout-sidebar",
            Layout::Inline => "layout-inline",
        };

        let _ = write!(
            out,
            r#"<!DOCTYPE html>
<html lang="pt-BR">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Análise de Processos</title>
    <style>
        :root {{
            --bg: #0d1117;
            --card: #161b22;
            --border: #30363d;
            --text: #e6edf3;
            --dim: #7d8590;
            --accent: #58a6ff;
            --info: #1f6feb;
        }}
        * {{ box-sizing: border-box; margin: 0; padding: 0; }}
        body {{
            font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', 'Noto Sans', Helvetica, Arial, sans-serif;
            background: var(--bg);
            color: var(--text);
            line-height: 1.5;
        }}
        .container {{ max-width: 1600px; margin: 0 auto; padding: 2rem; }}
        .layout-sidebar .container {{ display: grid; grid-template-columns: 300px 1fr; gap: 2rem; }}
        .header {{
            font-size: 2rem;
            font-weight: 800;
            margin-bottom: 1.5rem;
            padding-bottom: 1rem;
            border-bottom: 1px solid var(--border);
        }}
        .controls {{
            background: var(--card);
            border: 1px solid var(--border);
            border-radius: 12px;
            padding: 1.5rem;
            display: flex;
            flex-direction: column;
            gap: 1rem;
            align-self: start;
        }}
        .layout-inline .controls {{ flex-direction: row; flex-wrap: wrap; align-items: end; margin-bottom: 1.5rem; }}
        .controls label {{ color: var(--dim); font-size: 0.875rem; display: block; margin-bottom: 0.25rem; }}
        .controls select, .controls input {{
            background: var(--bg);
            color: var(--text);
            border: 1px solid var(--border);
            border-radius: 6px;
            padding: 0.4rem 0.6rem;
            font-size: 1rem;
        }}
        .controls button {{
            background: var(--accent);
            color: #0d1117;
            border: none;
            border-radius: 6px;
            padding: 0.5rem 1rem;
            font-weight: 600;
            cursor: pointer;
        }}
        .summary {{ font-size: 1.25rem; font-weight: 600; margin-bottom: 1.5rem; }}
        .panels {{ display: grid; grid-template-columns: repeat(var(--columns), 1fr); gap: 1.5rem; margin-bottom: 2rem; }}
        .panel {{
            background: var(--card);
            border: 1px solid var(--border);
            border-radius: 12px;
            padding: 1.5rem;
        }}
        .panel h2 {{ font-size: 1rem; font-weight: 600; margin-bottom: 1rem; color: var(--dim); }}
        .panel svg {{ width: 100%; height: auto; background: #fff; border-radius: 6px; }}
        .notice {{
            background: rgba(31, 111, 235, 0.15);
            border-left: 4px solid var(--info);
            border-radius: 6px;
            padding: 0.75rem 1rem;
        }}
        .downloads {{ display: flex; gap: 1rem; flex-wrap: wrap; margin-bottom: 2rem; }}
        .downloads a {{
            color: var(--accent);
            border: 1px solid var(--border);
            border-radius: 6px;
            padding: 0.5rem 1rem;
            text-decoration: none;
        }}
        .previews {{ display: grid; gap: 1.5rem; }}
        .previews img {{ width: 100%; background: #fff; border-radius: 6px; }}
    </style>
</head>
<body class="{layout_class}">
    <div class="container">
        <aside>
            <form class="controls" method="get" action="/">
{controls}
                <button type="submit">Aplicar</button>
            </form>
        </aside>
        <main>
            <div class="header">📊 {title}</div>
            <div class="summary">{summary}</div>
            <div class="panels" style="--columns: {columns}">
{panels}
            </div>
            <div class="downloads">
{downloads}
            </div>
            <div class="previews">
{previews}
            </div>
        </main>
    </div>
</body>
</html>
"#,
            layout_class = layout_class,
            controls = self.controls.join("\n"),
            title = self.title,
            summary = self.summary,
            columns = layout.panel_columns(),
            panels = self.panels.join("\n"),
            downloads = self.downloads.join("\n"),
            previews = self.previews.join("\n"),
        );

        out
    }
}

impl Presenter for HtmlPresenter {
    fn render_header(&mut self, title: &str) {
        self.title = html_escape(title);
    }

    fn render_selector(&mut self, label: &str, options: &[String], selected: &str) {
        let mut html = String::new();
        let _ = writeln!(html, r#"                <div><label for="tribunal">{}</label>"#, html_escape(label));
        // A new tribunal gets its own date bounds, so drop the old range
        let _ = writeln!(
            html,
            r#"                <select id="tribunal" name="tribunal" onchange="this.form.inicio.value='';this.form.fim.value='';this.form.submit()">"#
        );
        for option in options {
            let _ = writeln!(
                html,
                r#"                    <option value="{v}"{sel}>{v}</option>"#,
                v = html_escape(option),
                sel = if option == selected { " selected" } else { "" }
            );
        }
        let _ = write!(html, "                </select></div>");
        self.controls.push(html);
    }

    fn render_date_range(&mut self, label: &str, bounds: DateRange, value: DateRange) {
        self.controls.push(format!(
            r#"                <div><label>{label}</label>
                <input type="date" name="inicio" min="{min}" max="{max}" value="{start}" onchange="this.form.submit()">
                <input type="date" name="fim" min="{min}" max="{max}" value="{end}" onchange="this.form.submit()"></div>"#,
            label = html_escape(label),
            min = bounds.start,
            max = bounds.end,
            start = value.start,
            end = value.end,
        ));
    }

    fn render_summary(&mut self, text: &str) {
        self.summary = html_escape(text);
    }

    fn render_chart(&mut self, heading: &str, ranking: &FrequencyRanking, svg: Option<&str>) {
        let body = match svg {
            Some(svg) => svg.to_string(),
            None => ranking_table(ranking),
        };
        self.panels.push(format!(
            "                <section class=\"panel\"><h2>{}</h2>\n{}\n                </section>",
            html_escape(heading),
            body
        ));
    }

    fn render_notice(&mut self, heading: &str, message: &str) {
        self.panels.push(format!(
            "                <section class=\"panel\"><h2>{}</h2><div class=\"notice\">{}</div></section>",
            html_escape(heading),
            html_escape(message)
        ));
    }

    fn offer_download(&mut self, label: &str, download: &Download) {
        self.downloads.push(format!(
            r#"                <a href="{href}" download="{file}">{label}</a>"#,
            href = html_escape(&download.href),
            file = html_escape(&download.file_name),
            label = html_escape(label),
        ));
    }

    fn render_preview(&mut self, title: &str, download: &Download) {
        self.previews.push(format!(
            r#"                <figure class="panel"><h2>{title}</h2><img src="{src}" alt="{title}"></figure>"#,
            title = html_escape(title),
            src = html_escape(&download.src),
        ));
    }
}

/// Fallback when no chart markup was produced.
fn ranking_table(ranking: &FrequencyRanking) -> String {
    let mut html = String::from("<table>");
    for (value, count) in &ranking.entries {
        let _ = write!(html, "<tr><td>{}</td><td>{}</td></tr>", html_escape(value), count);
    }
    html.push_str("</table>");
    html
}

pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
