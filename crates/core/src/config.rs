use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::color::{Color, CATEGORY20};
use crate::treemap::Treemap;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("reading {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("parsing {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Everything that shapes a rendered chart. Defaults reproduce the
/// published page; any field may be overridden from a JSON file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartConfig {
    pub treemap: Treemap,
    pub palette: Vec<Color>,
    pub tile_stroke: Color,
    pub tile_stroke_width: f64,
    pub label: LabelStyle,
    pub legend: LegendStyle,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            treemap: Treemap::default(),
            palette: CATEGORY20.to_vec(),
            tile_stroke: Color::WHITE,
            tile_stroke_width: 1.0,
            label: LabelStyle::default(),
            legend: LegendStyle::default(),
        }
    }
}

impl ChartConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io { path: path.to_path_buf(), source })?;
        serde_json::from_str(&text).map_err(|source| ConfigError::Parse { path: path.to_path_buf(), source })
    }

    pub fn width(&self) -> f64 {
        self.treemap.width
    }

    pub fn height(&self) -> f64 {
        self.treemap.height
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LabelStyle {
    /// Left inset of every label line inside its tile.
    pub inset_x: f64,
    pub line_height: f64,
    pub font_size: f64,
    pub fill: Color,
}

impl Default for LabelStyle {
    fn default() -> Self {
        Self { inset_x: 6.0, line_height: 10.0, font_size: 10.0, fill: Color::BLACK }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LegendStyle {
    pub rect_size: f64,
    pub spacing: f64,
    pub items_per_row: usize,
    pub height: f64,
    pub top: f64,
    pub font_size: f64,
    pub text_gap: f64,
}

impl Default for LegendStyle {
    fn default() -> Self {
        Self {
            rect_size: 20.0,
            spacing: 10.0,
            items_per_row: 3,
            height: 150.0,
            top: 10.0,
            font_size: 12.0,
            text_gap: 5.0,
        }
    }
}

impl LegendStyle {
    pub fn column_width(&self) -> f64 {
        self.rect_size + self.spacing * 8.0
    }

    pub fn row_height(&self) -> f64 {
        self.rect_size + self.spacing
    }
}
