use serde::{Deserialize, Serialize};

use crate::model::{Hierarchy, NodeId};

/// Golden ratio; squarify aims for rows of this aspect.
pub const PHI: f64 = 1.618_033_988_749_895;

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x0: f64,
    pub y0: f64,
    pub x1: f64,
    pub y1: f64,
}

impl Rect {
    pub fn new(x0: f64, y0: f64, x1: f64, y1: f64) -> Self {
        Self { x0, y0, x1, y1 }
    }

    pub fn width(&self) -> f64 {
        self.x1 - self.x0
    }

    pub fn height(&self) -> f64 {
        self.y1 - self.y0
    }

    pub fn area(&self) -> f64 {
        self.width() * self.height()
    }

    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.x0 && x < self.x1 && y >= self.y0 && y < self.y1
    }

    /// True when the open interiors intersect; shared edges don't count.
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.x0 < other.x1 && other.x0 < self.x1 && self.y0 < other.y1 && other.y0 < self.y1
    }

    pub fn within(&self, outer: &Rect) -> bool {
        self.x0 >= outer.x0 && self.y0 >= outer.y0 && self.x1 <= outer.x1 && self.y1 <= outer.y1
    }

    /// Shrink by `p` on every side, collapsing to the midline instead of inverting.
    pub fn inset(self, p: f64) -> Self {
        collapse(self.x0 + p, self.y0 + p, self.x1 - p, self.y1 - p)
    }
}

fn collapse(mut x0: f64, mut y0: f64, mut x1: f64, mut y1: f64) -> Rect {
    if x1 < x0 {
        x0 = (x0 + x1) / 2.0;
        x1 = x0;
    }
    if y1 < y0 {
        y0 = (y0 + y1) / 2.0;
        y1 = y0;
    }
    Rect::new(x0, y0, x1, y1)
}

/// Splits a parent's area among its children. `values` are the children's
/// aggregate values in order, `total` their sum.
pub trait Tile {
    fn tile(&self, depth: u32, values: &[f64], total: f64, area: Rect) -> Vec<Rect>;
}

/// Built-in tiling methods.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Tiling {
    #[default]
    Squarify,
    /// Horizontal bands.
    Slice,
    /// Vertical bands.
    Dice,
    /// Alternate dice and slice by depth.
    SliceDice,
}

impl Tile for Tiling {
    fn tile(&self, depth: u32, values: &[f64], total: f64, area: Rect) -> Vec<Rect> {
        match self {
            Tiling::Squarify => squarify(PHI, values, total, area),
            Tiling::Slice => slice(values, total, area),
            Tiling::Dice => dice(values, total, area),
            Tiling::SliceDice if depth % 2 == 1 => slice(values, total, area),
            Tiling::SliceDice => dice(values, total, area),
        }
    }
}

pub fn dice(values: &[f64], total: f64, area: Rect) -> Vec<Rect> {
    let k = if total > 0.0 { area.width() / total } else { 0.0 };
    let mut x = area.x0;
    values
        .iter()
        .map(|v| {
            let x0 = x;
            x += v * k;
            Rect::new(x0, area.y0, x, area.y1)
        })
        .collect()
}

pub fn slice(values: &[f64], total: f64, area: Rect) -> Vec<Rect> {
    let k = if total > 0.0 { area.height() / total } else { 0.0 };
    let mut y = area.y0;
    values
        .iter()
        .map(|v| {
            let y0 = y;
            y += v * k;
            Rect::new(area.x0, y0, area.x1, y)
        })
        .collect()
}

/// Squarified rows: keep adding items while the worst aspect ratio in the
/// row does not get worse, then lay the row along the shorter side.
pub fn squarify(ratio: f64, values: &[f64], total: f64, area: Rect) -> Vec<Rect> {
    let n = values.len();
    let mut out = Vec::with_capacity(n);
    if total <= 0.0 {
        out.resize(n, Rect::new(area.x0, area.y0, area.x0, area.y0));
        return out;
    }

    let Rect { mut x0, mut y0, x1, y1 } = area;
    let mut remaining = total;
    let (mut i0, mut i1) = (0usize, 0usize);

    while i0 < n {
        let dx = x1 - x0;
        let dy = y1 - y0;

        // Skip leading zeros so the row starts on a real value.
        let mut sum;
        loop {
            sum = values[i1];
            i1 += 1;
            if sum != 0.0 || i1 >= n {
                break;
            }
        }
        let (mut min, mut max) = (sum, sum);
        let alpha = (dy / dx).max(dx / dy) / (remaining * ratio);
        let mut beta = sum * sum * alpha;
        let mut min_ratio = (max / beta).max(beta / min);

        while i1 < n {
            let v = values[i1];
            sum += v;
            min = min.min(v);
            max = max.max(v);
            beta = sum * sum * alpha;
            let next = (max / beta).max(beta / min);
            if next > min_ratio {
                sum -= v;
                break;
            }
            min_ratio = next;
            i1 += 1;
        }

        let row = &values[i0..i1];
        if remaining <= 0.0 || sum <= 0.0 {
            out.extend(row.iter().map(|_| Rect::new(x0, y0, x0, y0)));
        } else if dx < dy {
            let ny = if dy != 0.0 { y0 + dy * sum / remaining } else { y1 };
            out.extend(dice(row, sum, Rect::new(x0, y0, x1, ny)));
            y0 = ny;
        } else {
            let nx = if dx != 0.0 { x0 + dx * sum / remaining } else { x1 };
            out.extend(slice(row, sum, Rect::new(x0, y0, nx, y1)));
            x0 = nx;
        }
        remaining -= sum;
        i0 = i1;
    }
    out
}

/// Rectangles for every node of a hierarchy, indexed by `NodeId`.
#[derive(Clone, Debug, Default)]
pub struct Layout {
    pub rects: Vec<Rect>,
}

impl Layout {
    pub fn rect(&self, id: NodeId) -> Rect {
        self.rects.get(id.0 as usize).copied().unwrap_or_default()
    }
}

/// Treemap layout over a fixed canvas.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Treemap {
    pub width: f64,
    pub height: f64,
    /// Gap between siblings.
    pub padding_inner: f64,
    /// Gap between a parent's edge and its children.
    pub padding_outer: f64,
    pub tiling: Tiling,
}

impl Default for Treemap {
    fn default() -> Self {
        Self::new(1000.0, 600.0).padding(1.0)
    }
}

impl Treemap {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height, padding_inner: 0.0, padding_outer: 0.0, tiling: Tiling::Squarify }
    }

    pub fn padding(mut self, p: f64) -> Self {
        self.padding_inner = p;
        self.padding_outer = p;
        self
    }

    pub fn tiling(mut self, tiling: Tiling) -> Self {
        self.tiling = tiling;
        self
    }

    pub fn canvas(&self) -> Rect {
        Rect::new(0.0, 0.0, self.width, self.height)
    }

    pub fn layout(&self, tree: &Hierarchy) -> Layout {
        self.layout_with(tree, &self.tiling)
    }

    /// Each node is inset by half the inner padding of its parent level;
    /// children are laid out inside the node's rect minus the outer padding.
    pub fn layout_with(&self, tree: &Hierarchy, tile: &dyn Tile) -> Layout {
        let mut rects = vec![Rect::default(); tree.nodes.len()];
        if tree.nodes.is_empty() {
            return Layout { rects };
        }
        let half = self.padding_inner / 2.0;
        rects[tree.root.0 as usize] = self.canvas();

        for id in tree.preorder() {
            let node = tree.node(id);
            let own = if node.depth == 0 { 0.0 } else { half };
            let rect = rects[id.0 as usize].inset(own);
            rects[id.0 as usize] = rect;
            if node.is_leaf() {
                continue;
            }
            let inner = rect.inset(self.padding_outer - half);
            let values: Vec<f64> = node.children.iter().map(|c| tree.node(*c).value).collect();
            let tiles = tile.tile(node.depth, &values, node.value, inner);
            for (child, r) in node.children.iter().zip(tiles) {
                rects[child.0 as usize] = r;
            }
        }
        tracing::debug!(nodes = rects.len(), width = self.width, height = self.height, "treemap layout");
        Layout { rects }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::DatasetNode;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-6
    }

    fn same(a: Rect, b: Rect) -> bool {
        close(a.x0, b.x0) && close(a.y0, b.y0) && close(a.x1, b.x1) && close(a.y1, b.y1)
    }

    fn synthetic() -> Hierarchy {
        let groups = ["Action", "Drama", "Comedy", "Family"];
        let doc = DatasetNode::group(
            "root",
            groups
                .iter()
                .enumerate()
                .map(|(g, name)| {
                    DatasetNode::group(
                        *name,
                        (0..(3 + g * 2))
                            .map(|i| DatasetNode::leaf(format!("{name} {i}"), *name, ((i * 7 + g * 13) % 11 + 1) as f64 * 10.0))
                            .collect(),
                    )
                })
                .collect(),
        );
        Hierarchy::build(&doc)
    }

    #[test]
    fn single_item_fills_area() {
        let rects = squarify(PHI, &[42.0], 42.0, Rect::new(0.0, 0.0, 1000.0, 600.0));
        assert_eq!(rects.len(), 1);
        assert!(same(rects[0], Rect::new(0.0, 0.0, 1000.0, 600.0)));
    }

    #[test]
    fn squarify_preserves_area() {
        let values = [400.0, 300.0, 200.0, 100.0];
        let area = Rect::new(0.0, 0.0, 50.0, 20.0);
        let rects = squarify(PHI, &values, 1000.0, area);
        let out: f64 = rects.iter().map(Rect::area).sum();
        assert!(close(out, area.area()));
        for (r, v) in rects.iter().zip(values) {
            assert!(close(r.area(), v));
        }
    }

    #[test]
    fn zero_total_collapses() {
        let rects = squarify(PHI, &[0.0, 0.0], 0.0, Rect::new(5.0, 5.0, 10.0, 10.0));
        assert!(rects.iter().all(|r| r.area() == 0.0));
    }

    #[test]
    fn slice_and_dice_split_axes() {
        let area = Rect::new(0.0, 0.0, 100.0, 50.0);
        let d = dice(&[3.0, 1.0], 4.0, area);
        assert!(same(d[0], Rect::new(0.0, 0.0, 75.0, 50.0)));
        assert!(same(d[1], Rect::new(75.0, 0.0, 100.0, 50.0)));
        let s = slice(&[3.0, 1.0], 4.0, area);
        assert!(same(s[1], Rect::new(0.0, 37.5, 100.0, 50.0)));
    }

    #[test]
    fn single_leaf_is_inset_by_padding() {
        let doc = DatasetNode::group("root", vec![DatasetNode::group("Action", vec![DatasetNode::leaf("Film A", "Action", 100.0)])]);
        let tree = Hierarchy::build(&doc);
        let layout = Treemap::default().layout(&tree);
        let leaf = tree.leaves()[0];
        assert!(same(layout.rect(leaf), Rect::new(2.0, 2.0, 998.0, 598.0)), "{:?}", layout.rect(leaf));
        assert_eq!(layout.rect(tree.root), Rect::new(0.0, 0.0, 1000.0, 600.0));
    }

    #[test]
    fn rects_stay_inside_canvas_and_do_not_overlap() {
        let tree = synthetic();
        for tiling in [Tiling::Squarify, Tiling::Slice, Tiling::Dice, Tiling::SliceDice] {
            let map = Treemap::default().tiling(tiling);
            let layout = map.layout(&tree);
            let canvas = map.canvas();
            for node in &tree.nodes {
                let r = layout.rect(node.id);
                assert!(r.width() >= 0.0 && r.height() >= 0.0);
                assert!(r.within(&canvas), "{tiling:?} {r:?}");
                for (i, a) in node.children.iter().enumerate() {
                    for b in &node.children[i + 1..] {
                        assert!(!layout.rect(*a).overlaps(&layout.rect(*b)), "{tiling:?}");
                    }
                    assert!(layout.rect(*a).within(&r));
                }
            }
        }
    }

    // Holds before padding only; padded siblings of close value can swap.
    #[test]
    fn sibling_area_follows_value() {
        let tree = synthetic();
        let layout = Treemap::new(1000.0, 600.0).layout(&tree);
        for node in &tree.nodes {
            let areas: Vec<f64> = node.children.iter().map(|c| layout.rect(*c).area()).collect();
            for w in areas.windows(2) {
                assert!(w[0] + 1e-6 >= w[1], "{areas:?}");
            }
        }
    }
}
