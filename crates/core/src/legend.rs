use serde::Serialize;

use crate::color::{Color, ColorScale};
use crate::config::LegendStyle;
use crate::model::Hierarchy;

/// Distinct leaf categories in the order the leaves are visited.
/// Leaves without a category are skipped.
pub fn categories(tree: &Hierarchy) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for id in tree.leaves() {
        if let Some(cat) = &tree.node(id).category {
            if !out.iter().any(|c| c == cat) {
                out.push(cat.clone());
            }
        }
    }
    out
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LegendItem {
    pub category: String,
    pub color: Color,
    /// Top-left of the swatch, relative to the legend group.
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Legend {
    /// Horizontal offset of the whole grid inside the legend canvas.
    pub offset_x: f64,
    pub width: f64,
    pub height: f64,
    pub swatch: f64,
    /// Gap between a swatch and its text.
    pub text_gap: f64,
    pub font_size: f64,
    pub items: Vec<LegendItem>,
}

impl Legend {
    /// Lay categories out in a fixed-column grid, left to right, top to bottom.
    /// The canvas grows past the configured height when the rows need it.
    pub fn layout(categories: &[String], colors: &mut dyn ColorScale, style: &LegendStyle, width: f64) -> Self {
        let per_row = style.items_per_row.max(1);
        let rows = categories.len().div_ceil(per_row);
        let items = categories
            .iter()
            .enumerate()
            .map(|(i, cat)| LegendItem {
                category: cat.clone(),
                color: colors.color(cat),
                x: (i % per_row) as f64 * style.column_width(),
                y: (i / per_row) as f64 * style.row_height() + style.top,
            })
            .collect();
        Self {
            offset_x: width / 5.0 * 2.0,
            width,
            height: style.height.max(style.top + rows as f64 * style.row_height()),
            swatch: style.rect_size,
            text_gap: style.text_gap,
            font_size: style.font_size,
            items,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::{OrdinalScale, CATEGORY20};
    use crate::model::DatasetNode;

    #[test]
    fn categories_are_distinct_in_leaf_order() {
        let doc = DatasetNode::group(
            "root",
            vec![
                DatasetNode::group("A", vec![DatasetNode::leaf("a1", "Action", 50.0), DatasetNode::leaf("a2", "Action", 40.0)]),
                DatasetNode::group("D", vec![DatasetNode::leaf("d1", "Drama", 70.0), DatasetNode::leaf("x", "Action", 1.0)]),
            ],
        );
        let tree = Hierarchy::build(&doc);
        assert_eq!(categories(&tree), ["Action", "Drama"]);
    }

    #[test]
    fn grid_positions() {
        let cats: Vec<String> = ["a", "b", "c", "d", "e"].iter().map(|s| s.to_string()).collect();
        let mut scale = OrdinalScale::default();
        let style = LegendStyle::default();
        let legend = Legend::layout(&cats, &mut scale, &style, 1000.0);
        assert_eq!(legend.offset_x, 400.0);
        let pos: Vec<(f64, f64)> = legend.items.iter().map(|i| (i.x, i.y)).collect();
        assert_eq!(pos, [(0.0, 10.0), (100.0, 10.0), (200.0, 10.0), (0.0, 40.0), (100.0, 40.0)]);
        assert_eq!(legend.height, 150.0);
        assert_eq!(legend.items[3].color, CATEGORY20[3]);
    }

    #[test]
    fn many_categories_grow_the_canvas() {
        let cats: Vec<String> = (0..20).map(|i| format!("c{i}")).collect();
        let legend = Legend::layout(&cats, &mut OrdinalScale::default(), &LegendStyle::default(), 1000.0);
        // 7 rows of 30 below a 10 top margin.
        assert_eq!(legend.height, 220.0);
        let last = legend.items.last().unwrap();
        assert!(last.y + legend.swatch <= legend.height);
    }
}
