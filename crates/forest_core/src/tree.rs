//! Binary classification tree nodes and traversal
//!
//! Every node stores its training cover and the positive-class fraction of
//! the samples that reached it. Leaves use that fraction as their output.

use serde::{Deserialize, Serialize};

/// A decision tree node (internal or leaf)
///
/// For internal nodes:
/// - `feature_idx >= 0`: index into the scaled feature vector
/// - `left` and `right` point to child node indices
///
/// For leaf nodes:
/// - `feature_idx == -1`, `left == right == -1`
/// - `value` is the prediction
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Node {
    /// Node ID (for reference, not used in traversal)
    pub id: i32,

    /// Left child index (-1 for leaf nodes)
    pub left: i32,

    /// Right child index (-1 for leaf nodes)
    pub right: i32,

    /// Feature index to split on (-1 for leaf nodes)
    pub feature_idx: i32,

    /// Samples with `x[feature_idx] <= threshold` go left
    pub threshold: f64,

    /// Bootstrap-weighted number of training samples reaching this node
    pub cover: f64,

    /// Positive-class fraction of the samples reaching this node
    pub value: f64,
}

impl Node {
    /// Create a new internal (split) node
    pub fn internal(
        id: i32,
        feature_idx: i32,
        threshold: f64,
        left: i32,
        right: i32,
        cover: f64,
        value: f64,
    ) -> Self {
        Self {
            id,
            left,
            right,
            feature_idx,
            threshold,
            cover,
            value,
        }
    }

    /// Create a new leaf node
    pub fn leaf(id: i32, cover: f64, value: f64) -> Self {
        Self {
            id,
            left: -1,
            right: -1,
            feature_idx: -1,
            threshold: 0.0,
            cover,
            value,
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.feature_idx < 0
    }
}

/// A single classification tree; node 0 is the root
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Tree {
    pub nodes: Vec<Node>,
}

impl Tree {
    pub fn new(nodes: Vec<Node>) -> Self {
        Self { nodes }
    }

    /// Index of the leaf reached by `features`
    ///
    /// Returns `None` for a malformed tree or an out-of-range feature index.
    pub fn leaf_index(&self, features: &[f64]) -> Option<usize> {
        let mut idx = 0usize;
        // A well-formed tree never needs more steps than it has nodes.
        for _ in 0..=self.nodes.len() {
            let node = self.nodes.get(idx)?;
            if node.is_leaf() {
                return Some(idx);
            }
            let value = *features.get(node.feature_idx as usize)?;
            let next = if value <= node.threshold {
                node.left
            } else {
                node.right
            };
            if next < 0 {
                return None;
            }
            idx = next as usize;
        }
        None
    }

    /// Positive-class fraction at the leaf reached by `features`
    pub fn evaluate(&self, features: &[f64]) -> f64 {
        self.leaf_index(features)
            .map(|idx| self.nodes[idx].value)
            .unwrap_or(0.0)
    }

    /// Cover-weighted mean leaf value over the training distribution
    pub fn expected_value(&self) -> f64 {
        let total: f64 = self
            .nodes
            .iter()
            .filter(|n| n.is_leaf())
            .map(|n| n.cover)
            .sum();
        if total <= 0.0 {
            return 0.0;
        }
        self.nodes
            .iter()
            .filter(|n| n.is_leaf())
            .map(|n| n.cover * n.value)
            .sum::<f64>()
            / total
    }

    /// Longest root-to-leaf path, counted in edges
    pub fn depth(&self) -> usize {
        fn walk(tree: &Tree, idx: usize, depth: usize) -> usize {
            match tree.nodes.get(idx) {
                Some(node) if !node.is_leaf() => walk(tree, node.left as usize, depth + 1)
                    .max(walk(tree, node.right as usize, depth + 1)),
                _ => depth,
            }
        }
        if self.nodes.is_empty() {
            0
        } else {
            walk(self, 0, 0)
        }
    }

    /// Validate tree structure against a feature count
    pub fn validate(&self, feature_count: usize) -> Result<(), String> {
        if self.nodes.is_empty() {
            return Err("Tree has no nodes".to_string());
        }

        for (i, node) in self.nodes.iter().enumerate() {
            if !(0.0..=1.0).contains(&node.value) {
                return Err(format!("Node {} has value outside [0, 1]: {}", i, node.value));
            }
            if node.cover.is_nan() || node.cover <= 0.0 {
                return Err(format!("Node {} has non-positive cover: {}", i, node.cover));
            }
            if node.is_leaf() {
                continue;
            }

            // Children always come after their parent, which rules out cycles.
            for child in [node.left, node.right] {
                if child <= i as i32 || child as usize >= self.nodes.len() {
                    return Err(format!("Node {} has invalid child: {}", i, child));
                }
            }
            if node.feature_idx as usize >= feature_count {
                return Err(format!(
                    "Node {} splits on feature {} but model has {}",
                    i, node.feature_idx, feature_count
                ));
            }
            if !node.threshold.is_finite() {
                return Err(format!("Node {} has non-finite threshold", i));
            }
        }

        Ok(())
    }
}
