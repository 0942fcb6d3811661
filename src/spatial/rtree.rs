//! Static R-tree built with Sort-Tile-Recursive packing

use crate::types::BoundingBox2D;

/// Maximum number of children per node
pub const NODE_CAPACITY: usize = 16;

#[derive(Debug, Clone, PartialEq)]
enum Children {
    /// Item ids stored in a leaf
    Items(Vec<usize>),
    /// Indices into the node arena
    Nodes(Vec<usize>),
}

#[derive(Debug, Clone, PartialEq)]
struct Node {
    bbox: BoundingBox2D,
    children: Children,
}

/// Read-only R-tree over `(id, box)` pairs
///
/// The tree is packed once from the full item set; it is never updated.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PackedRTree {
    nodes: Vec<Node>,
    root: Option<usize>,
    len: usize,
}

impl PackedRTree {
    /// Pack a tree from items
    pub fn bulk_load(items: Vec<(usize, BoundingBox2D)>) -> Self {
        let len = items.len();
        if items.is_empty() {
            return Self::default();
        }

        let mut nodes = Vec::new();
        let mut level: Vec<usize> = tile(items, |chunk| {
            let bbox = union(chunk.iter().map(|(_, b)| *b));
            nodes.push(Node {
                bbox,
                children: Children::Items(chunk.iter().map(|(id, _)| *id).collect()),
            });
            nodes.len() - 1
        });

        while level.len() > 1 {
            let entries: Vec<(usize, BoundingBox2D)> =
                level.iter().map(|&n| (n, nodes[n].bbox)).collect();
            level = tile(entries, |chunk| {
                let bbox = union(chunk.iter().map(|(_, b)| *b));
                nodes.push(Node {
                    bbox,
                    children: Children::Nodes(chunk.iter().map(|(n, _)| *n).collect()),
                });
                nodes.len() - 1
            });
        }

        Self {
            root: level.first().copied(),
            nodes,
            len,
        }
    }

    /// Number of items in the tree
    pub fn len(&self) -> usize {
        self.len
    }

    /// Check if the tree holds no items
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Height of the tree; 0 when empty, 1 for a single leaf
    pub fn height(&self) -> usize {
        let mut height = 0;
        let mut current = self.root;
        while let Some(n) = current {
            height += 1;
            current = match &self.nodes[n].children {
                Children::Nodes(children) => children.first().copied(),
                Children::Items(_) => None,
            };
        }
        height
    }

    /// Ids of all items whose box intersects `query`, in ascending order
    pub fn search(&self, query: &BoundingBox2D) -> Vec<usize> {
        let mut found = Vec::new();
        let mut stack: Vec<usize> = self.root.into_iter().collect();
        while let Some(n) = stack.pop() {
            let node = &self.nodes[n];
            if !node.bbox.intersects(query) {
                continue;
            }
            match &node.children {
                Children::Nodes(children) => stack.extend(children.iter().copied()),
                Children::Items(items) => found.extend(items.iter().copied()),
            }
        }
        found.sort_unstable();
        found
    }
}

/// Group entries into runs of at most [`NODE_CAPACITY`], tiled by center x
/// then center y, and turn each run into a node
fn tile(
    mut entries: Vec<(usize, BoundingBox2D)>,
    mut make_node: impl FnMut(&[(usize, BoundingBox2D)]) -> usize,
) -> Vec<usize> {
    let node_count = entries.len().div_ceil(NODE_CAPACITY);
    let slice_count = (node_count as f64).sqrt().ceil() as usize;
    let slice_size = slice_count.max(1) * NODE_CAPACITY;

    entries.sort_by(|a, b| a.1.center().x.total_cmp(&b.1.center().x));

    let mut level = Vec::with_capacity(node_count);
    for slice in entries.chunks_mut(slice_size) {
        slice.sort_by(|a, b| a.1.center().y.total_cmp(&b.1.center().y));
        for chunk in slice.chunks(NODE_CAPACITY) {
            level.push(make_node(chunk));
        }
    }
    level
}

fn union(mut boxes: impl Iterator<Item = BoundingBox2D>) -> BoundingBox2D {
    let first = boxes.next().unwrap_or(BoundingBox2D::from_point(Default::default()));
    boxes.fold(first, |acc, b| acc.merge(&b))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(n: usize) -> Vec<(usize, BoundingBox2D)> {
        (0..n * n)
            .map(|i| {
                let x = (i % n) as f64 * 10.0;
                let y = (i / n) as f64 * 10.0;
                (i, BoundingBox2D::from_coords(x, y, x + 1.0, y + 1.0))
            })
            .collect()
    }

    #[test]
    fn test_empty_tree() {
        let tree = PackedRTree::bulk_load(Vec::new());
        assert!(tree.is_empty());
        assert_eq!(tree.height(), 0);
        assert!(tree.search(&BoundingBox2D::from_coords(-1e9, -1e9, 1e9, 1e9)).is_empty());
    }

    #[test]
    fn test_single_leaf() {
        let tree = PackedRTree::bulk_load(grid(3));
        assert_eq!(tree.len(), 9);
        assert_eq!(tree.height(), 1);
    }

    #[test]
    fn test_search_matches_linear_scan() {
        let items = grid(30);
        let tree = PackedRTree::bulk_load(items.clone());
        assert!(tree.height() >= 3);

        let query = BoundingBox2D::from_coords(95.0, 42.0, 161.0, 80.5);
        let mut expected: Vec<usize> = items
            .iter()
            .filter(|(_, b)| b.intersects(&query))
            .map(|(id, _)| *id)
            .collect();
        expected.sort_unstable();
        assert!(!expected.is_empty());
        assert_eq!(tree.search(&query), expected);
    }

    #[test]
    fn test_touching_box_is_found() {
        let tree = PackedRTree::bulk_load(vec![(7, BoundingBox2D::from_coords(0.0, 0.0, 1.0, 1.0))]);
        assert_eq!(tree.search(&BoundingBox2D::from_coords(1.0, 1.0, 2.0, 2.0)), vec![7]);
    }
}
