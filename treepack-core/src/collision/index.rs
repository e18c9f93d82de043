//! Static bounding-box tree, bulk-loaded with sort-tile-recursive packing.

use crate::geometry::bbox::BBox;

const NODE_CAPACITY: usize = 8;

#[derive(Debug)]
enum Children {
    Items(Vec<usize>),
    Nodes(Vec<usize>),
}

#[derive(Debug)]
struct Node {
    bbox: BBox,
    children: Children,
}

/// R-tree over a fixed set of boxes; item ids are indices into the input.
#[derive(Debug)]
pub struct BoxTree {
    boxes: Vec<BBox>,
    nodes: Vec<Node>,
    root: Option<usize>,
}

impl BoxTree {
    pub fn new(boxes: Vec<BBox>) -> Self {
        let mut nodes: Vec<Node> = Vec::new();
        let items: Vec<(BBox, usize)> = boxes.iter().copied().zip(0..).collect();
        let mut level: Vec<usize> = tile(items)
            .into_iter()
            .map(|group| push_node(&mut nodes, group, Children::Items))
            .collect();
        while level.len() > 1 {
            let entries: Vec<(BBox, usize)> = level.iter().map(|&i| (nodes[i].bbox, i)).collect();
            level = tile(entries)
                .into_iter()
                .map(|group| push_node(&mut nodes, group, Children::Nodes))
                .collect();
        }
        let root = level.first().copied();
        BoxTree { boxes, nodes, root }
    }

    pub fn len(&self) -> usize {
        self.boxes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.boxes.is_empty()
    }

    /// Ids of all boxes intersecting `query` (closed test), ascending.
    pub fn query(&self, query: &BBox, results: &mut Vec<usize>) {
        results.clear();
        let mut stack: Vec<usize> = self.root.into_iter().collect();
        while let Some(idx) = stack.pop() {
            let node = &self.nodes[idx];
            if !node.bbox.intersects(query) {
                continue;
            }
            match &node.children {
                Children::Items(items) => {
                    results.extend(items.iter().copied().filter(|&i| self.boxes[i].intersects(query)))
                }
                Children::Nodes(children) => stack.extend(children.iter().copied()),
            }
        }
        results.sort_unstable();
    }
}

fn push_node(
    nodes: &mut Vec<Node>,
    group: Vec<(BBox, usize)>,
    wrap: fn(Vec<usize>) -> Children,
) -> usize {
    let bbox = group
        .iter()
        .map(|(b, _)| *b)
        .reduce(|a, b| a.union(&b))
        .expect("tile groups are non-empty");
    let ids = group.into_iter().map(|(_, id)| id).collect();
    nodes.push(Node { bbox, children: wrap(ids) });
    nodes.len() - 1
}

/// Sort-tile-recursive grouping: vertical slices by center x, runs of
/// `NODE_CAPACITY` by center y within each slice.
fn tile(mut entries: Vec<(BBox, usize)>) -> Vec<Vec<(BBox, usize)>> {
    if entries.is_empty() {
        return Vec::new();
    }
    let groups = entries.len().div_ceil(NODE_CAPACITY);
    let slices = (groups as f64).sqrt().ceil() as usize;
    let slice_len = slices * NODE_CAPACITY;
    entries.sort_by_key(|(b, _)| b.center2().x);
    let mut out = Vec::with_capacity(groups);
    for slice in entries.chunks_mut(slice_len) {
        slice.sort_by_key(|(b, _)| b.center2().y);
        out.extend(slice.chunks(NODE_CAPACITY).map(|c| c.to_vec()));
    }
    out
}
