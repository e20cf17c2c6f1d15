use serde::Serialize;

/// A chartable dataset: what the page header says and where the tree lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DatasetDescriptor {
    pub key: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub url: &'static str,
}

pub const DEFAULT_KEY: &str = "videogames";

/// Name of the query parameter that selects a dataset.
pub const QUERY_PARAM: &str = "data";

pub static DATASETS: [DatasetDescriptor; 3] = [
    DatasetDescriptor {
        key: "videogames",
        title: "Video Game Sales",
        description: "Top 100 Most Sold Video Games Grouped by Platform",
        url: "https://cdn.freecodecamp.org/testable-projects-fcc/data/tree_map/video-game-sales-data.json",
    },
    DatasetDescriptor {
        key: "movies",
        title: "Movie Sales",
        description: "Top 100 Highest Grossing Movies Grouped By Genre",
        url: "https://cdn.freecodecamp.org/testable-projects-fcc/data/tree_map/movie-data.json",
    },
    DatasetDescriptor {
        key: "kickstarter",
        title: "Kickstarter Pledges",
        description: "Top 100 Most Pledged Kickstarter Campaigns Grouped By Category",
        url: "https://cdn.freecodecamp.org/testable-projects-fcc/data/tree_map/kickstarter-funding-data.json",
    },
];

pub fn default_dataset() -> &'static DatasetDescriptor {
    &DATASETS[0]
}

pub fn find(key: &str) -> Option<&'static DatasetDescriptor> {
    DATASETS.iter().find(|d| d.key == key)
}

/// Resolve a dataset key. Missing and unrecognized keys fall back to the default.
pub fn resolve(key: Option<&str>) -> &'static DatasetDescriptor {
    key.and_then(find).unwrap_or_else(default_dataset)
}

/// Outcome of resolving a user-supplied key, remembering whether it matched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub dataset: &'static DatasetDescriptor,
    /// The key the user asked for when it did not name a dataset.
    pub rejected: Option<String>,
}

impl Selection {
    /// An empty key counts as no key.
    pub fn parse(key: Option<&str>) -> Self {
        match key.filter(|k| !k.is_empty()) {
            None => Self { dataset: default_dataset(), rejected: None },
            Some(k) => match find(k) {
                Some(dataset) => Self { dataset, rejected: None },
                None => {
                    tracing::warn!(key = k, fallback = DEFAULT_KEY, "unknown dataset key");
                    Self { dataset: default_dataset(), rejected: Some(k.to_owned()) }
                }
            },
        }
    }

    pub fn is_fallback(&self) -> bool {
        self.rejected.is_some()
    }
}

/// Pull the `data` parameter out of a query string such as `?data=movies`.
pub fn key_from_query(query: &str) -> Option<String> {
    let query = query.strip_prefix('?').unwrap_or(query);
    url::form_urlencoded::parse(query.as_bytes())
        .find(|(k, _)| k == QUERY_PARAM)
        .map(|(_, v)| v.into_owned())
        .filter(|v| !v.is_empty())
}

/// Resolve directly from a query string.
pub fn from_query(query: &str) -> Selection {
    Selection::parse(key_from_query(query).as_deref())
}
