use serde::Serialize;

use crate::color::ColorScale;
use crate::dataset::{DatasetDescriptor, Selection};
use crate::loader::{load, DataLoadError, Fetch};
use crate::model::DatasetNode;
use crate::render::{Chart, Renderer};

/// Shown in place of the chart whenever loading fails, whatever the cause.
pub const LOAD_FAILURE_MESSAGE: &str = "Failed to load data. Please try again later.";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ChartBody {
    Pending,
    Ready(Chart),
    Failed { message: String },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page {
    pub dataset: &'static DatasetDescriptor,
    pub title: String,
    pub description: String,
    pub body: ChartBody,
}

impl Page {
    pub fn for_dataset(dataset: &'static DatasetDescriptor) -> Self {
        Self {
            dataset,
            title: dataset.title.to_owned(),
            description: dataset.description.to_owned(),
            body: ChartBody::Pending,
        }
    }

    pub fn chart(&self) -> Option<&Chart> {
        match &self.body {
            ChartBody::Ready(chart) => Some(chart),
            _ => None,
        }
    }

    pub fn failure(&self) -> Option<&str> {
        match &self.body {
            ChartBody::Failed { message } => Some(message),
            _ => None,
        }
    }
}

pub type LoadStage = Result<DatasetNode, DataLoadError>;

pub struct Pipeline<'a, C: ColorScale> {
    renderer: &'a mut Renderer<C>,
    fetcher: &'a dyn Fetch,
}

impl<'a, C: ColorScale> Pipeline<'a, C> {
    pub fn new(renderer: &'a mut Renderer<C>, fetcher: &'a dyn Fetch) -> Self {
        Self { renderer, fetcher }
    }

    pub fn run(&mut self, selection: &Selection) -> Page {
        let mut page = Page::for_dataset(selection.dataset);
        let loaded = self.load_stage(selection.dataset);
        self.render_stage(&mut page, loaded);
        page
    }

    pub fn load_stage(&self, dataset: &DatasetDescriptor) -> LoadStage {
        load(dataset, self.fetcher)
    }

    pub fn render_stage(&mut self, page: &mut Page, loaded: LoadStage) {
        render_into(self.renderer, page, loaded);
    }
}

/// Fill a page's body from a load outcome. Failures are logged once and
/// surface only as the fixed message.
pub fn render_into<C: ColorScale>(renderer: &mut Renderer<C>, page: &mut Page, loaded: LoadStage) {
    page.body = match loaded {
        Ok(doc) => ChartBody::Ready(renderer.render(&doc).clone()),
        Err(err) => {
            tracing::error!(dataset = page.dataset.key, error = %err, "Error fetching or processing data");
            renderer.clear();
            ChartBody::Failed { message: LOAD_FAILURE_MESSAGE.to_owned() }
        }
    };
}
