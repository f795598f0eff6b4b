//! CART (Classification and Regression Tree) builder
//!
//! Deterministic exact-greedy binary classification trees split on Gini
//! impurity. Samples carry bootstrap weights; covers and leaf fractions are
//! weighted sums, so the forest's explainer sees the same distribution the
//! tree was grown on.

use std::cmp::Ordering;

use wellness_forest_core::{Node, Tree};

use crate::deterministic::{LcgRng, SplitTieBreaker};

/// Growth parameters for a single tree
#[derive(Clone, Debug, PartialEq)]
pub struct TreeConfig {
    /// `None` grows until leaves are pure or too small to split
    pub max_depth: Option<usize>,
    /// Minimum weighted samples required to split a node
    pub min_samples_split: usize,
    /// Minimum weighted samples in each child of a split
    pub min_samples_leaf: usize,
    /// Features drawn per node before settling for the best split found
    pub max_features: usize,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            max_depth: None,
            min_samples_split: 2,
            min_samples_leaf: 1,
            max_features: usize::MAX,
        }
    }
}

/// Split candidate with score and tie-breaker
#[derive(Debug, Clone)]
struct SplitCandidate {
    feature_idx: usize,
    threshold: f64,
    /// Sum over children of (pos² + neg²) / weight; larger is purer
    score: f64,
    tie_breaker: SplitTieBreaker,
}

impl SplitCandidate {
    fn beats(&self, other: &SplitCandidate) -> bool {
        self.score > other.score
            || (self.score == other.score && self.tie_breaker < other.tie_breaker)
    }
}

/// Build a classification tree with the exact-greedy CART algorithm
pub struct CartBuilder<'a> {
    config: TreeConfig,
    features: &'a [Vec<f64>],
    labels: &'a [u8],
    weights: Vec<f64>,
    feature_count: usize,
}

impl<'a> CartBuilder<'a> {
    /// `weights[i]` is how many times row `i` was drawn (0 excludes it)
    pub fn new(
        features: &'a [Vec<f64>],
        labels: &'a [u8],
        weights: Vec<f64>,
        config: TreeConfig,
    ) -> Self {
        assert_eq!(features.len(), labels.len());
        assert_eq!(features.len(), weights.len());

        let feature_count = features.first().map(Vec::len).unwrap_or(0);

        Self {
            config,
            features,
            labels,
            weights,
            feature_count,
        }
    }

    /// Build tree and return nodes
    pub fn build(&self, rng: &mut LcgRng) -> Tree {
        let mut nodes = Vec::new();
        let indices: Vec<usize> = (0..self.features.len())
            .filter(|&i| self.weights[i] > 0.0)
            .collect();

        self.build_node(indices, 0, &mut nodes, rng);

        Tree::new(nodes)
    }

    /// Recursively build tree nodes in preorder; returns the node's index
    fn build_node(
        &self,
        indices: Vec<usize>,
        depth: usize,
        nodes: &mut Vec<Node>,
        rng: &mut LcgRng,
    ) -> i32 {
        let current_idx = nodes.len();
        let (cover, positive) = self.weighted_counts(&indices);
        let value = if cover > 0.0 { positive / cover } else { 0.0 };

        let pure = positive == 0.0 || positive == cover;
        let too_deep = self.config.max_depth.is_some_and(|max| depth >= max);
        if pure || too_deep || cover < self.config.min_samples_split as f64 {
            nodes.push(Node::leaf(current_idx as i32, cover, value));
            return current_idx as i32;
        }

        let split = match self.find_best_split(&indices, current_idx, rng) {
            Some(s) => s,
            None => {
                nodes.push(Node::leaf(current_idx as i32, cover, value));
                return current_idx as i32;
            }
        };

        let (left_indices, right_indices): (Vec<usize>, Vec<usize>) = indices
            .iter()
            .partition(|&&i| self.features[i][split.feature_idx] <= split.threshold);

        // Reserve space for current node
        nodes.push(Node::internal(
            current_idx as i32,
            split.feature_idx as i32,
            split.threshold,
            0,
            0,
            cover,
            value,
        ));

        let left_idx = self.build_node(left_indices, depth + 1, nodes, rng);
        let right_idx = self.build_node(right_indices, depth + 1, nodes, rng);

        nodes[current_idx].left = left_idx;
        nodes[current_idx].right = right_idx;

        current_idx as i32
    }

    /// Draw features in random order and keep the best split
    ///
    /// At least `max_features` features are inspected; the search continues
    /// past that only while no valid split has been found.
    fn find_best_split(
        &self,
        indices: &[usize],
        node_id: usize,
        rng: &mut LcgRng,
    ) -> Option<SplitCandidate> {
        let mut order: Vec<usize> = (0..self.feature_count).collect();
        rng.shuffle(&mut order);

        let mut best: Option<SplitCandidate> = None;
        for (visited, &feature_idx) in order.iter().enumerate() {
            if visited >= self.config.max_features && best.is_some() {
                break;
            }
            if let Some(candidate) = self.best_split_for_feature(indices, feature_idx, node_id) {
                if best.as_ref().map_or(true, |b| candidate.beats(b)) {
                    best = Some(candidate);
                }
            }
        }
        best
    }

    /// Sweep the sorted values of one feature, scoring every midpoint
    fn best_split_for_feature(
        &self,
        indices: &[usize],
        feature_idx: usize,
        node_id: usize,
    ) -> Option<SplitCandidate> {
        let mut sorted = indices.to_vec();
        sorted.sort_by(|&a, &b| {
            self.features[a][feature_idx]
                .total_cmp(&self.features[b][feature_idx])
                .then(a.cmp(&b))
        });

        let (total_w, total_pos) = self.weighted_counts(&sorted);
        let min_leaf = self.config.min_samples_leaf as f64;

        let mut left_w = 0.0;
        let mut left_pos = 0.0;
        let mut position = 0usize;
        let mut best: Option<SplitCandidate> = None;

        for pair in sorted.windows(2) {
            let (row, next) = (pair[0], pair[1]);
            left_w += self.weights[row];
            if self.labels[row] == 1 {
                left_pos += self.weights[row];
            }

            let here = self.features[row][feature_idx];
            let there = self.features[next][feature_idx];
            if here.total_cmp(&there) != Ordering::Less {
                continue;
            }
            position += 1;

            let right_w = total_w - left_w;
            if left_w < min_leaf || right_w < min_leaf {
                continue;
            }

            let right_pos = total_pos - left_pos;
            let score = purity(left_w, left_pos) + purity(right_w, right_pos);

            let mut threshold = here + (there - here) / 2.0;
            if threshold >= there || !threshold.is_finite() {
                threshold = here;
            }

            let candidate = SplitCandidate {
                feature_idx,
                threshold,
                score,
                tie_breaker: SplitTieBreaker::new(feature_idx, position, node_id),
            };
            if best.as_ref().map_or(true, |b| candidate.beats(b)) {
                best = Some(candidate);
            }
        }

        best
    }

    /// Weighted sample count and weighted positive count
    fn weighted_counts(&self, indices: &[usize]) -> (f64, f64) {
        indices.iter().fold((0.0, 0.0), |(w, p), &i| {
            let weight = self.weights[i];
            (w + weight, if self.labels[i] == 1 { p + weight } else { p })
        })
    }
}

/// (pos² + neg²) / w; maximizing the children's sum minimizes weighted Gini
fn purity(weight: f64, positive: f64) -> f64 {
    if weight <= 0.0 {
        return 0.0;
    }
    let negative = weight - positive;
    (positive * positive + negative * negative) / weight
}
