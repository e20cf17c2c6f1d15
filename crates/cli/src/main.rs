use std::fs::File;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use treemap_core::human::human_value;
use treemap_core::loader::{spawn_load, FileFetcher, HttpFetcher, LoadMsg};
use treemap_core::{export, html, search, ChartConfig, Fetch, Page, Renderer, Selection};

#[derive(Parser, Debug)]
#[command(name = "treemap-cli", about = "Treemap chart page generator")]
struct Args {
    /// Dataset to chart: videogames, movies or kickstarter
    #[arg(short, long, conflicts_with = "query")]
    data: Option<String>,
    /// Page query string to take the dataset from, e.g. "?data=movies"
    #[arg(short, long)]
    query: Option<String>,
    /// Read the dataset tree from a local JSON file instead of its URL
    #[arg(short, long)]
    input: Option<PathBuf>,
    /// Output HTML page path
    #[arg(short, long, default_value = "treemap.html")]
    out: PathBuf,
    /// Also write the chart as a standalone SVG
    #[arg(long)]
    svg: Option<PathBuf>,
    /// Also write the page model as JSON
    #[arg(long)]
    json: Option<PathBuf>,
    /// Also write the tile table as CSV
    #[arg(long)]
    csv: Option<PathBuf>,
    /// Also write the chart as PDF
    #[arg(long)]
    pdf: Option<PathBuf>,
    /// Chart settings (JSON); unspecified fields keep their defaults
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// List tiles whose name fuzzy-matches this text
    #[arg(long)]
    highlight: Option<String>,
}

fn main() -> anyhow::Result<()> {
    treemap_core::logging::init("info");
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => ChartConfig::load(path)?,
        None => ChartConfig::default(),
    };
    let selection = match (&args.data, &args.query) {
        (Some(key), _) => Selection::parse(Some(key.as_str())),
        (None, Some(q)) => treemap_core::dataset::from_query(q),
        (None, None) => Selection::parse(None),
    };
    if let Some(rejected) = &selection.rejected {
        eprintln!("Unknown dataset {rejected:?}, showing {} instead", selection.dataset.key);
    }

    let fetcher: Box<dyn Fetch + Send> = match &args.input {
        Some(path) => Box::new(FileFetcher::new(path)),
        None => Box::new(HttpFetcher::new()?),
    };

    let mut page = Page::for_dataset(selection.dataset);
    let (tx, rx) = crossbeam_channel::bounded::<LoadMsg>(1);
    let worker = spawn_load(selection.dataset, fetcher, tx);
    let loaded = match rx.recv().context("loader exited without reporting")? {
        LoadMsg::Loaded { doc, .. } => Ok(doc),
        LoadMsg::Failed { error, .. } => Err(error),
    };
    let _ = worker.join();

    let mut renderer = Renderer::new(config);
    treemap_core::render_into(&mut renderer, &mut page, loaded);
    let (width, height) = (renderer.config().width(), renderer.config().height());

    html::save_page(&args.out, &page, width, height).with_context(|| format!("writing {}", args.out.display()))?;
    tracing::info!(path = %args.out.display(), "page written");

    if let Some(path) = &args.svg {
        html::save_svg(path, &page, width, height).with_context(|| format!("writing {}", path.display()))?;
    }
    if let Some(path) = &args.json {
        std::fs::write(path, serde_json::to_string_pretty(&export::to_json(&page))?)?;
    }
    match page.chart() {
        Some(chart) => {
            if let Some(path) = &args.csv {
                export::to_csv(chart, File::create(path)?)?;
            }
            if let Some(needle) = &args.highlight {
                for i in search::find_tiles(chart, needle) {
                    let t = &chart.tiles[i];
                    println!("{}  [{}]  {}", t.name, t.category, human_value(t.value));
                }
            }
            println!(
                "{}: {} tiles in {} categories, total {}",
                page.title,
                chart.tiles.len(),
                chart.categories.len(),
                human_value(chart.total)
            );
        }
        None => println!("{}: {}", page.title, page.failure().unwrap_or_default()),
    }
    if let Some(path) = &args.pdf {
        export::to_pdf(&page, path).map_err(|e| anyhow::anyhow!("writing {}: {e}", path.display()))?;
    }
    Ok(())
}
