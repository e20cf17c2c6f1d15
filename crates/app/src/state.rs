use std::path::{Path, PathBuf};

use crossbeam_channel::{bounded, Receiver};
use treemap_core::loader::{spawn_load, FileFetcher, HttpFetcher, LoadMsg};
use treemap_core::{render_into, search, DatasetDescriptor, Fetch, Page, Renderer, Selection};

/// Where the current dataset tree comes from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Source {
    Remote,
    File(PathBuf),
}

pub struct AppState {
    pub selection: Selection,
    pub source: Source,
    pub page: Page,
    pub renderer: Renderer,
    pub load_rx: Option<Receiver<LoadMsg>>,
    pub search: String,
    pub matches: Vec<usize>,
    pub status: Option<String>,
}

impl AppState {
    pub fn new(selection: Selection) -> Self {
        let status = selection
            .rejected
            .as_ref()
            .map(|k| format!("Unknown dataset {k:?}, showing {}", selection.dataset.title));
        Self {
            page: Page::for_dataset(selection.dataset),
            selection,
            source: Source::Remote,
            renderer: Renderer::default(),
            load_rx: None,
            search: String::new(),
            matches: Vec::new(),
            status,
        }
    }

    pub fn dataset(&self) -> &'static DatasetDescriptor {
        self.selection.dataset
    }

    pub fn is_loading(&self) -> bool {
        self.load_rx.is_some()
    }

    /// Reset the page header and kick off a load on a worker thread.
    /// Any load still in flight is abandoned: its receiver is dropped here.
    pub fn start_load(&mut self) {
        let dataset = self.dataset();
        self.page = Page::for_dataset(dataset);
        self.renderer.clear();
        self.matches.clear();

        let fetcher: Box<dyn Fetch + Send> = match &self.source {
            Source::Remote => match HttpFetcher::new() {
                Ok(f) => Box::new(f),
                Err(e) => {
                    self.load_rx = None;
                    render_into(&mut self.renderer, &mut self.page, Err(e));
                    return;
                }
            },
            Source::File(path) => Box::new(FileFetcher::new(path)),
        };
        let (tx, rx) = bounded(1);
        spawn_load(dataset, fetcher, tx);
        self.load_rx = Some(rx);
    }

    pub fn select_dataset(&mut self, key: &str) {
        self.selection = Selection::parse(Some(key));
        self.source = Source::Remote;
        self.status = None;
        self.start_load();
    }

    pub fn open_file(&mut self, path: PathBuf) {
        self.status = Some(format!("Loaded from {}", path.display()));
        self.source = Source::File(path);
        self.start_load();
    }

    pub fn finish_load(&mut self, msg: LoadMsg) {
        let loaded = match msg {
            LoadMsg::Loaded { doc, .. } => Ok(doc),
            LoadMsg::Failed { error, .. } => Err(error),
        };
        render_into(&mut self.renderer, &mut self.page, loaded);
        self.refresh_matches();
    }

    pub fn refresh_matches(&mut self) {
        self.matches = match self.page.chart() {
            Some(chart) => search::find_tiles(chart, &self.search),
            None => Vec::new(),
        };
    }

    pub fn export_html(&self, path: &Path) -> anyhow::Result<()> {
        let config = self.renderer.config();
        treemap_core::html::save_page(path, &self.page, config.width(), config.height())?;
        tracing::info!(path = %path.display(), "exported page");
        Ok(())
    }

    /// Export to a temporary file and hand it to the system browser.
    pub fn open_in_browser(&self) -> anyhow::Result<()> {
        let stamp = chrono::Local::now().format("%Y%m%d-%H%M%S");
        let path = std::env::temp_dir().join(format!("treemap-{}-{stamp}.html", self.dataset().key));
        self.export_html(&path)?;
        open::that(&path)?;
        Ok(())
    }
}
