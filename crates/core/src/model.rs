use serde::{Deserialize, Deserializer, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeId(pub u32);

impl Default for NodeId {
    fn default() -> Self {
        NodeId(0)
    }
}

impl NodeId {
    fn index(self) -> usize {
        self.0 as usize
    }
}

/// A node of the JSON document as published: groups carry `children`,
/// leaves carry `category` and `value`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DatasetNode {
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, deserialize_with = "de_value", skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<DatasetNode>,
}

impl DatasetNode {
    pub fn group(name: impl Into<String>, children: Vec<DatasetNode>) -> Self {
        Self { name: name.into(), category: None, value: None, children }
    }

    pub fn leaf(name: impl Into<String>, category: impl Into<String>, value: f64) -> Self {
        Self {
            name: name.into(),
            category: Some(category.into()),
            value: Some(value),
            children: Vec::new(),
        }
    }

    pub fn from_slice(bytes: &[u8]) -> serde_json::Result<Self> {
        serde_json::from_slice(bytes)
    }
}

// The published files quote their numbers ("value": "82.53").
fn de_value<'de, D: Deserializer<'de>>(d: D) -> Result<Option<f64>, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Num(f64),
        Text(String),
    }
    Ok(match Option::<Raw>::deserialize(d)? {
        Some(Raw::Num(n)) => Some(n),
        Some(Raw::Text(s)) => s.trim().parse::<f64>().ok(),
        None => None,
    })
}

#[derive(Debug, Clone)]
pub struct HierarchyNode {
    pub id: NodeId,
    pub parent: Option<NodeId>,
    pub depth: u32,
    pub name: String,
    pub category: Option<String>,
    /// Value declared in the document, if any.
    pub declared: Option<f64>,
    /// Declared value plus the sum of all descendants.
    pub value: f64,
    pub children: Vec<NodeId>,
}

impl HierarchyNode {
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

/// Arena of summed and sorted nodes. Children are kept in descending
/// aggregate value; ties keep document order.
#[derive(Debug, Clone, Default)]
pub struct Hierarchy {
    pub root: NodeId,
    pub nodes: Vec<HierarchyNode>,
}

impl Hierarchy {
    pub fn build(doc: &DatasetNode) -> Self {
        let mut nodes = Vec::with_capacity(128);
        let root = push_node(doc, None, 0, &mut nodes);
        let mut tree = Hierarchy { root, nodes };
        tree.sum();
        tree.sort_desc();
        tree
    }

    pub fn node(&self, id: NodeId) -> &HierarchyNode {
        &self.nodes[id.index()]
    }

    pub fn parent(&self, id: NodeId) -> Option<&HierarchyNode> {
        self.node(id).parent.map(|p| self.node(p))
    }

    pub fn total(&self) -> f64 {
        self.node(self.root).value
    }

    /// Pre-order walk from the root, children in sorted order.
    pub fn preorder(&self) -> Vec<NodeId> {
        let mut out = Vec::with_capacity(self.nodes.len());
        let mut stack = vec![self.root];
        while let Some(id) = stack.pop() {
            out.push(id);
            stack.extend(self.node(id).children.iter().rev().copied());
        }
        out
    }

    pub fn leaves(&self) -> Vec<NodeId> {
        self.preorder().into_iter().filter(|id| self.node(*id).is_leaf()).collect()
    }

    fn sum(&mut self) {
        // Children always have larger ids than their parent.
        for i in (0..self.nodes.len()).rev() {
            let own = self.nodes[i].declared.filter(|v| v.is_finite()).unwrap_or(0.0);
            let below: f64 = self.nodes[i].children.iter().map(|c| self.nodes[c.index()].value).sum();
            self.nodes[i].value = own + below;
        }
    }

    fn sort_desc(&mut self) {
        for i in 0..self.nodes.len() {
            let mut children = std::mem::take(&mut self.nodes[i].children);
            children.sort_by(|a, b| {
                let (va, vb) = (self.nodes[a.index()].value, self.nodes[b.index()].value);
                vb.total_cmp(&va)
            });
            self.nodes[i].children = children;
        }
    }
}

fn push_node(doc: &DatasetNode, parent: Option<NodeId>, depth: u32, nodes: &mut Vec<HierarchyNode>) -> NodeId {
    let id = NodeId(nodes.len() as u32);
    nodes.push(HierarchyNode {
        id,
        parent,
        depth,
        name: doc.name.clone(),
        category: doc.category.clone(),
        declared: doc.value,
        value: 0.0,
        children: Vec::with_capacity(doc.children.len()),
    });
    for child in &doc.children {
        let cid = push_node(child, Some(id), depth + 1, nodes);
        nodes[id.index()].children.push(cid);
    }
    id
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> DatasetNode {
        DatasetNode::group(
            "root",
            vec![
                DatasetNode::group("Wii", vec![DatasetNode::leaf("Wii Sports", "Wii", 82.53)]),
                DatasetNode::group(
                    "DS",
                    vec![
                        DatasetNode::leaf("Mario Kart DS", "DS", 23.21),
                        DatasetNode::leaf("New Super Mario Bros.", "DS", 30.01),
                        DatasetNode::leaf("Nintendogs", "DS", 24.67),
                    ],
                ),
            ],
        )
    }

    #[test]
    fn parses_quoted_values() {
        let json = br#"{"name":"x","children":[{"name":"g","children":[
            {"name":"a","category":"g","value":"82.53"},
            {"name":"b","category":"g","value":7},
            {"name":"c","category":"g","value":"n/a"},
            {"name":"d","category":"g"}]}]}"#;
        let doc = DatasetNode::from_slice(json).unwrap();
        let leaves = &doc.children[0].children;
        assert_eq!(leaves[0].value, Some(82.53));
        assert_eq!(leaves[1].value, Some(7.0));
        assert_eq!(leaves[2].value, None);
        assert_eq!(leaves[3].value, None);
    }

    #[test]
    fn sums_descendants() {
        let h = Hierarchy::build(&sample());
        assert!((h.total() - (82.53 + 23.21 + 30.01 + 24.67)).abs() < 1e-9);
        let ds = h.nodes.iter().find(|n| n.name == "DS").unwrap();
        assert!((ds.value - 77.89).abs() < 1e-9);
        assert_eq!(ds.depth, 1);
    }

    #[test]
    fn children_sorted_descending_stable() {
        let h = Hierarchy::build(&sample());
        let root = h.node(h.root);
        let names: Vec<_> = root.children.iter().map(|c| h.node(*c).name.as_str()).collect();
        assert_eq!(names, ["Wii", "DS"]);

        let leaves: Vec<_> = h.leaves().iter().map(|id| h.node(*id).name.clone()).collect();
        assert_eq!(leaves, ["Wii Sports", "New Super Mario Bros.", "Nintendogs", "Mario Kart DS"]);

        let tie = DatasetNode::group(
            "t",
            vec![DatasetNode::leaf("first", "c", 1.0), DatasetNode::leaf("second", "c", 1.0)],
        );
        let h = Hierarchy::build(&tie);
        let names: Vec<_> = h.leaves().iter().map(|id| h.node(*id).name.clone()).collect();
        assert_eq!(names, ["first", "second"]);
    }

    #[test]
    fn empty_children_is_a_leaf() {
        let h = Hierarchy::build(&DatasetNode::leaf("solo", "c", 5.0));
        assert_eq!(h.leaves(), vec![h.root]);
        assert!(h.parent(h.root).is_none());
    }
}
