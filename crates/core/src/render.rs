use serde::Serialize;

use crate::color::{Color, ColorScale, OrdinalScale};
use crate::config::ChartConfig;
use crate::legend::{categories, Legend};
use crate::model::{DatasetNode, Hierarchy, NodeId};
use crate::treemap::{Layout, Rect};

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// One line of a tile label, relative to the tile's top-left corner.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LabelLine {
    pub x: f64,
    pub y: f64,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TileView {
    pub node: NodeId,
    pub rect: Rect,
    pub fill: Color,
    pub stroke: Color,
    pub stroke_width: f64,
    pub name: String,
    pub category: String,
    pub value: f64,
    pub group: String,
    pub label: Vec<LabelLine>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Chart {
    pub width: f64,
    pub height: f64,
    pub label_font_size: f64,
    pub label_fill: Color,
    pub tiles: Vec<TileView>,
    pub categories: Vec<String>,
    pub legend: Legend,
    pub total: f64,
}

impl Chart {
    pub fn tile(&self, index: usize) -> Option<&TileView> {
        self.tiles.get(index)
    }

    /// Topmost tile under a point. Tiles never overlap, so the first hit wins.
    pub fn hit_test(&self, p: Point) -> Option<usize> {
        self.tiles.iter().position(|t| t.rect.contains(p.x, p.y))
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct TooltipContent {
    pub name: String,
    pub category: String,
    pub value: f64,
}

impl TooltipContent {
    pub fn lines(&self) -> [String; 3] {
        [
            format!("Name: {}", self.name),
            format!("Category: {}", self.category),
            format!("Value: {}", self.value),
        ]
    }

    pub fn text(&self) -> String {
        self.lines().join("\n")
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Tooltip {
    pub visible: bool,
    pub position: Point,
    pub content: TooltipContent,
    pub tile: Option<usize>,
}

impl Tooltip {
    pub fn show(&mut self, tile: usize, view: &TileView, at: Point) {
        self.visible = true;
        self.position = at;
        self.tile = Some(tile);
        self.content = TooltipContent { name: view.name.clone(), category: view.category.clone(), value: view.value };
    }

    pub fn hide(&mut self) {
        self.visible = false;
    }
}

pub struct Renderer<C: ColorScale = OrdinalScale> {
    config: ChartConfig,
    colors: C,
    tooltip: Tooltip,
    chart: Option<Chart>,
}

impl Renderer<OrdinalScale> {
    pub fn new(config: ChartConfig) -> Self {
        let colors = OrdinalScale::new(config.palette.clone());
        Self::with_colors(config, colors)
    }
}

impl Default for Renderer<OrdinalScale> {
    fn default() -> Self {
        Self::new(ChartConfig::default())
    }
}

impl<C: ColorScale> Renderer<C> {
    pub fn with_colors(config: ChartConfig, colors: C) -> Self {
        Self { config, colors, tooltip: Tooltip::default(), chart: None }
    }

    pub fn config(&self) -> &ChartConfig {
        &self.config
    }

    pub fn colors(&self) -> &C {
        &self.colors
    }

    pub fn tooltip(&self) -> &Tooltip {
        &self.tooltip
    }

    pub fn chart(&self) -> Option<&Chart> {
        self.chart.as_ref()
    }

    /// Drop the mounted chart and hide the tooltip.
    pub fn clear(&mut self) {
        self.chart = None;
        self.tooltip.hide();
        self.tooltip.tile = None;
    }

    /// Build the hierarchy, lay it out and mount the result.
    pub fn render(&mut self, doc: &DatasetNode) -> &Chart {
        let tree = Hierarchy::build(doc);
        let layout = self.config.treemap.layout(&tree);
        self.render_layout(&tree, &layout)
    }

    pub fn render_layout(&mut self, tree: &Hierarchy, layout: &Layout) -> &Chart {
        self.clear();
        let leaves = tree.leaves();
        let mut tiles = Vec::with_capacity(leaves.len());
        for id in leaves {
            let node = tree.node(id);
            // A lone root leaf colors by its own name.
            let group = tree.parent(id).map_or(node.name.as_str(), |p| p.name.as_str()).to_owned();
            tiles.push(TileView {
                node: id,
                rect: layout.rect(id),
                fill: self.colors.color(&group),
                stroke: self.config.tile_stroke,
                stroke_width: self.config.tile_stroke_width,
                name: node.name.clone(),
                category: node.category.clone().unwrap_or_default(),
                value: node.value,
                group,
                label: label_lines(&node.name, &self.config),
            });
        }

        let categories = categories(tree);
        let legend = Legend::layout(&categories, &mut self.colors, &self.config.legend, self.config.width());
        tracing::debug!(tiles = tiles.len(), categories = categories.len(), "chart rendered");

        self.chart.insert(Chart {
            width: self.config.width(),
            height: self.config.height(),
            label_font_size: self.config.label.font_size,
            label_fill: self.config.label.fill,
            tiles,
            categories,
            legend,
            total: tree.total(),
        })
    }

    /// Show the tooltip for `tile` at the pointer's position.
    /// Unknown tiles and an empty mount are ignored.
    pub fn pointer_enter(&mut self, tile: usize, at: Point) {
        if let Some(view) = self.chart.as_ref().and_then(|c| c.tile(tile)) {
            self.tooltip.show(tile, view, at);
        }
    }

    pub fn pointer_leave(&mut self) {
        self.tooltip.hide();
    }

    /// Route a pointer position to enter/leave. `at` is in chart space,
    /// `screen` is where the tooltip should appear.
    pub fn pointer_moved(&mut self, at: Option<Point>, screen: Point) -> Option<usize> {
        let hit = at.and_then(|p| self.chart.as_ref()?.hit_test(p));
        match hit {
            Some(i) => self.pointer_enter(i, screen),
            None if self.tooltip.visible => self.pointer_leave(),
            None => {}
        }
        hit
    }
}

/// One line per whitespace-separated word. Every whitespace character
/// breaks a line, so runs of spaces leave empty lines.
pub fn label_lines(name: &str, config: &ChartConfig) -> Vec<LabelLine> {
    let style = &config.label;
    name.split(char::is_whitespace)
        .enumerate()
        .map(|(i, word)| LabelLine {
            x: style.inset_x,
            y: style.line_height * i as f64 + style.line_height * 2.0,
            text: word.to_owned(),
        })
        .collect()
}
