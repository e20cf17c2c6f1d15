use std::path::PathBuf;
use std::time::Instant;

use crossbeam_channel::Sender;
use thiserror::Error;

use crate::dataset::DatasetDescriptor;
use crate::model::DatasetNode;

/// Anything that can go wrong between asking for a dataset and holding its tree.
#[derive(Debug, Error)]
pub enum DataLoadError {
    #[error("request failed: {0}")]
    Network(#[from] reqwest::Error),
    #[error("HTTP error! status: {status} ({url})")]
    Status { url: String, status: u16 },
    #[error("reading {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid dataset JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Retrieves the raw bytes behind a dataset URL.
pub trait Fetch {
    fn fetch(&self, url: &str) -> Result<Vec<u8>, DataLoadError>;
}

impl<F: Fetch + ?Sized> Fetch for &F {
    fn fetch(&self, url: &str) -> Result<Vec<u8>, DataLoadError> {
        (**self).fetch(url)
    }
}

impl<F: Fetch + ?Sized> Fetch for Box<F> {
    fn fetch(&self, url: &str) -> Result<Vec<u8>, DataLoadError> {
        (**self).fetch(url)
    }
}

/// Plain GET over HTTPS.
pub struct HttpFetcher {
    client: reqwest::blocking::Client,
}

impl HttpFetcher {
    pub fn new() -> Result<Self, DataLoadError> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(concat!("treemap/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client })
    }
}

impl Fetch for HttpFetcher {
    fn fetch(&self, url: &str) -> Result<Vec<u8>, DataLoadError> {
        let resp = self.client.get(url).send()?;
        let status = resp.status();
        if !status.is_success() {
            return Err(DataLoadError::Status { url: url.to_owned(), status: status.as_u16() });
        }
        Ok(resp.bytes()?.to_vec())
    }
}

/// Serves one local file regardless of the URL asked for.
pub struct FileFetcher {
    path: PathBuf,
}

impl FileFetcher {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl Fetch for FileFetcher {
    fn fetch(&self, _url: &str) -> Result<Vec<u8>, DataLoadError> {
        std::fs::read(&self.path).map_err(|source| DataLoadError::Io { path: self.path.clone(), source })
    }
}

/// Fetch and parse a dataset's tree.
pub fn load(dataset: &DatasetDescriptor, fetcher: &dyn Fetch) -> Result<DatasetNode, DataLoadError> {
    let started = Instant::now();
    tracing::info!(dataset = dataset.key, url = dataset.url, "loading dataset");
    let bytes = fetcher.fetch(dataset.url)?;
    let doc = DatasetNode::from_slice(&bytes)?;
    tracing::info!(
        dataset = dataset.key,
        bytes = bytes.len(),
        groups = doc.children.len(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "dataset loaded"
    );
    Ok(doc)
}

#[derive(Debug)]
pub enum LoadMsg {
    Loaded { dataset: &'static DatasetDescriptor, doc: DatasetNode },
    Failed { dataset: &'static DatasetDescriptor, error: DataLoadError },
}

/// Run `load` on a worker thread and report the outcome on `tx`.
pub fn spawn_load<F>(dataset: &'static DatasetDescriptor, fetcher: F, tx: Sender<LoadMsg>) -> std::thread::JoinHandle<()>
where
    F: Fetch + Send + 'static,
{
    std::thread::spawn(move || {
        let msg = match load(dataset, &fetcher) {
            Ok(doc) => LoadMsg::Loaded { dataset, doc },
            Err(error) => LoadMsg::Failed { dataset, error },
        };
        // The receiver is gone when a newer load replaced this one.
        let _ = tx.send(msg);
    })
}
