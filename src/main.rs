use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use processos_dash::report::StaticImage;
use processos_dash::serve::{self, App, ServeConfig};
use processos_dash::shell::{self, Download, Layout, TextPresenter};
use processos_dash::{view, Dataset, FilterController, ImageFormat, Query, StaticReport};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "processos-dash")]
#[command(author, version, about = "Interactive report over tab-separated legal-process records")]
struct Args {
    #[command(subcommand)]
    command: Option<Command>,

    /// Tab-separated input file
    #[arg(short, long, default_value = "data.csv", global = true)]
    data: PathBuf,

    /// Directory for the static chart images
    #[arg(long, default_value = ".", global = true)]
    out_dir: PathBuf,

    /// Image format for the static charts (png needs the default `png` feature)
    #[arg(long, value_enum, default_value_t = ImageFormat::default(), global = true)]
    format: ImageFormat,

    /// Debug logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the interactive web dashboard (default)
    Serve {
        /// Address to bind
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Port to listen on
        #[arg(short, long, default_value = "8501")]
        port: u16,

        /// Page arrangement
        #[arg(short, long, value_enum, default_value_t = Layout::Sidebar)]
        layout: Layout,

        /// Don't open a browser window
        #[arg(long)]
        no_open: bool,
    },

    /// Only write the static charts and print the aggregations
    Report {
        /// Print the aggregations as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print one filtered view to the terminal
    Query {
        /// Tribunal to show (or TODOS with --all-option)
        #[arg(short, long)]
        tribunal: Option<String>,

        /// First day, YYYY-MM-DD
        #[arg(long)]
        inicio: Option<String>,

        /// Last day, YYYY-MM-DD
        #[arg(long)]
        fim: Option<String>,

        /// Offer the TODOS entry
        #[arg(long)]
        all_option: bool,

        /// Print the view model as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() {
    let args = Args::parse();

    let env = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if args.verbose { "debug" } else { "info" }));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(args) {
        eprintln!("\x1b[31mError:\x1b[0m {:#}", e);
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<()> {
    let dataset = Dataset::load(&args.data)
        .with_context(|| format!("could not load {}", args.data.display()))?;

    // Written on every invocation, before anything interactive
    let report = StaticReport::build(&dataset);
    let images = report
        .write(&args.out_dir, args.format)
        .context("could not write static charts")?;
    info!(
        tribunals = report.by_tribunal.len(),
        months = report.by_month.len(),
        undated = report.undated,
        "static report ready"
    );

    let command = args.command.unwrap_or(Command::Serve {
        host: "127.0.0.1".to_string(),
        port: 8501,
        layout: Layout::Sidebar,
        no_open: false,
    });

    match command {
        Command::Serve { host, port, layout, no_open } => {
            let config = ServeConfig {
                host,
                port,
                layout,
                open_browser: !no_open,
            };
            let app = App::new(dataset, report, images, layout);
            serve::start(&config, app)?;
        }

        Command::Report { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print_report(&report);
            }
            eprintln!("\n\x1b[32mCharts saved: {}, {}\x1b[0m", images.tribunal.display(), images.period.display());
        }

        Command::Query { tribunal, inicio, fim, all_option, json } => {
            let query = Query { tribunal, inicio, fim };
            let controller = FilterController::new(all_option);
            let today = chrono::Local::now().date_naive();
            let page = view::render(&dataset, &controller, &query, today, false);

            if json {
                println!("{}", serde_json::to_string_pretty(&page)?);
            } else {
                let downloads: Vec<Download> = StaticImage::ALL
                    .into_iter()
                    .map(|image| Download::new(image, images.path(image).display().to_string()))
                    .collect();
                let mut presenter = TextPresenter::new();
                shell::present(&page, &downloads, Layout::Sidebar, &mut presenter);
                print!("{}", presenter.finish());
            }
        }
    }

    Ok(())
}

fn print_report(report: &StaticReport) {
    eprintln!("\x1b[1mAnálise de Processos\x1b[0m");
    eprintln!("{}", "─".repeat(70));
    eprintln!("Registros: {}  (sem data: {})\n", report.total, report.undated);

    println!("{:<40} {:>10}", "TRIBUNAL", "QUANTIDADE");
    for (tribunal, count) in &report.by_tribunal {
        println!("{:<40} {:>10}", truncate(tribunal, 40), count);
    }

    println!("\n{:<40} {:>10}", "PERÍODO", "QUANTIDADE");
    for (month, count) in &report.by_month {
        println!("{:<40} {:>10}", month.to_string(), count);
    }
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let head: String = s.chars().take(max_len - 3).collect();
        format!("{}...", head)
    }
}
