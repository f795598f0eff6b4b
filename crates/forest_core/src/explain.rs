//! Path-dependent TreeSHAP attribution for the forest
//!
//! Decomposes the positive-class probability of one sample into a baseline
//! (the cover-weighted expected output) plus one additive contribution per
//! feature. For every sample:
//!
//! ```text
//! baseline + sum(contributions) == forest.predict_proba(x)
//! ```
//!
//! Each tree is explained with the polynomial-time path algorithm
//! (Lundberg et al., "Consistent Individualized Feature Attribution for Tree
//! Ensembles"); the forest attribution is the mean over trees.

use crate::errors::Result;
use crate::forest::ForestModel;
use crate::tree::Tree;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Additive decomposition of one prediction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attribution {
    /// One contribution per feature, in schema order
    pub contributions: Vec<f64>,
    /// Expected model output over the training distribution
    pub baseline: f64,
}

impl Attribution {
    /// `baseline + sum(contributions)`
    pub fn raw_output(&self) -> f64 {
        self.baseline + self.contributions.iter().sum::<f64>()
    }
}

/// Explainer bound to one trained forest
#[derive(Debug, Clone)]
pub struct TreeExplainer {
    model: Arc<ForestModel>,
    expected_value: f64,
}

impl TreeExplainer {
    pub fn build(model: Arc<ForestModel>) -> Self {
        let expected_value = model.expected_value();
        Self {
            model,
            expected_value,
        }
    }

    /// Baseline of the positive-class channel
    pub fn expected_value(&self) -> f64 {
        self.expected_value
    }

    pub fn model(&self) -> &ForestModel {
        &self.model
    }

    /// Attribute the positive-class probability of a scaled sample
    pub fn explain(&self, features: &[f64]) -> Result<Attribution> {
        self.model.check_features(features)?;

        let mut phi = vec![0.0; self.model.feature_count];
        for tree in &self.model.trees {
            tree_shap(tree, features, &mut phi);
        }

        let n = self.model.trees.len() as f64;
        for value in &mut phi {
            *value /= n;
        }

        Ok(Attribution {
            contributions: phi,
            baseline: self.expected_value,
        })
    }
}

#[derive(Debug, Clone, Copy)]
struct PathElement {
    /// `None` for the root placeholder
    feature: Option<usize>,
    zero_fraction: f64,
    one_fraction: f64,
    weight: f64,
}

/// Accumulate the SHAP values of one tree into `phi`
fn tree_shap(tree: &Tree, x: &[f64], phi: &mut [f64]) {
    if tree.nodes.is_empty() {
        return;
    }
    recurse(tree, x, phi, 0, Vec::new(), 1.0, 1.0, None);
}

#[allow(clippy::too_many_arguments)]
fn recurse(
    tree: &Tree,
    x: &[f64],
    phi: &mut [f64],
    node_idx: usize,
    path: Vec<PathElement>,
    zero_fraction: f64,
    one_fraction: f64,
    feature: Option<usize>,
) {
    let mut path = extend(path, zero_fraction, one_fraction, feature);
    let node = &tree.nodes[node_idx];

    if node.is_leaf() {
        for i in 1..path.len() {
            let w = unwound_sum(&path, i);
            let el = path[i];
            if let Some(f) = el.feature {
                phi[f] += w * (el.one_fraction - el.zero_fraction) * node.value;
            }
        }
        return;
    }

    let split = node.feature_idx as usize;
    let (hot, cold) = if x[split] <= node.threshold {
        (node.left as usize, node.right as usize)
    } else {
        (node.right as usize, node.left as usize)
    };

    let mut incoming_zero = 1.0;
    let mut incoming_one = 1.0;
    // A feature already on the path is undone before re-entering it.
    if let Some(k) = path.iter().position(|el| el.feature == Some(split)) {
        incoming_zero = path[k].zero_fraction;
        incoming_one = path[k].one_fraction;
        path = unwind(path, k);
    }

    let hot_cover = tree.nodes[hot].cover / node.cover;
    let cold_cover = tree.nodes[cold].cover / node.cover;

    recurse(
        tree,
        x,
        phi,
        hot,
        path.clone(),
        incoming_zero * hot_cover,
        incoming_one,
        Some(split),
    );
    recurse(
        tree,
        x,
        phi,
        cold,
        path,
        incoming_zero * cold_cover,
        0.0,
        Some(split),
    );
}

fn extend(
    mut path: Vec<PathElement>,
    zero_fraction: f64,
    one_fraction: f64,
    feature: Option<usize>,
) -> Vec<PathElement> {
    let depth = path.len();
    path.push(PathElement {
        feature,
        zero_fraction,
        one_fraction,
        weight: if depth == 0 { 1.0 } else { 0.0 },
    });

    let denom = (depth + 1) as f64;
    for i in (0..depth).rev() {
        path[i + 1].weight += one_fraction * path[i].weight * (i + 1) as f64 / denom;
        path[i].weight = zero_fraction * path[i].weight * (depth - i) as f64 / denom;
    }
    path
}

fn unwind(mut path: Vec<PathElement>, index: usize) -> Vec<PathElement> {
    let len = path.len();
    let one = path[index].one_fraction;
    let zero = path[index].zero_fraction;
    let l = len as f64;
    let mut next = path[len - 1].weight;

    for j in (0..len - 1).rev() {
        let pos = (j + 1) as f64;
        if one != 0.0 {
            let tmp = path[j].weight;
            path[j].weight = next * l / (pos * one);
            next = tmp - path[j].weight * zero * (l - pos) / l;
        } else {
            path[j].weight = path[j].weight * l / (zero * (l - pos));
        }
    }

    for j in index..len - 1 {
        path[j].feature = path[j + 1].feature;
        path[j].zero_fraction = path[j + 1].zero_fraction;
        path[j].one_fraction = path[j + 1].one_fraction;
    }
    path.truncate(len - 1);
    path
}

/// Total path weight with element `index` removed
fn unwound_sum(path: &[PathElement], index: usize) -> f64 {
    let len = path.len();
    let one = path[index].one_fraction;
    let zero = path[index].zero_fraction;
    let l = len as f64;
    let mut next = path[len - 1].weight;
    let mut total = 0.0;

    for j in (0..len - 1).rev() {
        let pos = (j + 1) as f64;
        if one != 0.0 {
            let tmp = next * l / (pos * one);
            total += tmp;
            next = path[j].weight - tmp * zero * (l - pos) / l;
        } else {
            total += path[j].weight * l / (zero * (l - pos));
        }
    }
    total
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::Node;

    fn assert_close(a: f64, b: f64) {
        assert!((a - b).abs() < 1e-9, "{a} != {b}");
    }

    fn explainer(trees: Vec<Tree>, feature_count: usize) -> TreeExplainer {
        TreeExplainer::build(Arc::new(ForestModel::new(trees, feature_count).unwrap()))
    }

    #[test]
    fn test_single_split_attribution() {
        // x0 <= 0 -> 0.2 (cover 6), else 0.9 (cover 4); baseline 0.48
        let tree = Tree::new(vec![
            Node::internal(0, 0, 0.0, 1, 2, 10.0, 0.48),
            Node::leaf(1, 6.0, 0.2),
            Node::leaf(2, 4.0, 0.9),
        ]);
        let explainer = explainer(vec![tree], 2);
        let attribution = explainer.explain(&[1.0, 5.0]).unwrap();

        assert_close(attribution.baseline, 0.48);
        assert_close(attribution.contributions[0], 0.9 - 0.48);
        assert_close(attribution.contributions[1], 0.0);
        assert_close(attribution.raw_output(), 0.9);
    }

    #[test]
    fn test_two_feature_tree_matches_shapley_values() {
        // Root splits x0, both children split x1. Uniform covers.
        //   x0<=0, x1<=0 -> 0.0   x0<=0, x1>0 -> 0.4
        //   x0>0,  x1<=0 -> 0.6   x0>0,  x1>0 -> 1.0
        let tree = Tree::new(vec![
            Node::internal(0, 0, 0.0, 1, 4, 8.0, 0.5),
            Node::internal(1, 1, 0.0, 2, 3, 4.0, 0.2),
            Node::leaf(2, 2.0, 0.0),
            Node::leaf(3, 2.0, 0.4),
            Node::internal(4, 1, 0.0, 5, 6, 4.0, 0.8),
            Node::leaf(5, 2.0, 0.6),
            Node::leaf(6, 2.0, 1.0),
        ]);
        let explainer = explainer(vec![tree], 2);
        let attribution = explainer.explain(&[1.0, 1.0]).unwrap();

        // f is additive (0.6 * [x0>0] + 0.4 * [x1>0]), so the Shapley
        // values are each term minus its mean.
        assert_close(attribution.baseline, 0.5);
        assert_close(attribution.contributions[0], 0.3);
        assert_close(attribution.contributions[1], 0.2);
        assert_close(attribution.raw_output(), 1.0);
    }

    #[test]
    fn test_repeated_feature_on_path_is_additive() {
        let tree = Tree::new(vec![
            Node::internal(0, 0, 0.0, 1, 2, 10.0, 0.5),
            Node::leaf(1, 4.0, 0.1),
            Node::internal(2, 0, 1.0, 3, 4, 6.0, 0.7),
            Node::leaf(3, 3.0, 0.5),
            Node::internal(4, 1, 0.0, 5, 6, 3.0, 0.9),
            Node::leaf(5, 1.0, 0.7),
            Node::leaf(6, 2.0, 1.0),
        ]);
        let explainer = explainer(vec![tree.clone()], 2);

        for x in [[-1.0, -1.0], [0.5, 3.0], [2.0, -1.0], [2.0, 2.0]] {
            let attribution = explainer.explain(&x).unwrap();
            assert_close(attribution.raw_output(), tree.evaluate(&x));
        }
    }

    #[test]
    fn test_forest_attribution_is_mean_over_trees() {
        let t1 = Tree::new(vec![
            Node::internal(0, 0, 0.0, 1, 2, 10.0, 0.5),
            Node::leaf(1, 5.0, 0.2),
            Node::leaf(2, 5.0, 0.8),
        ]);
        let t2 = Tree::new(vec![
            Node::internal(0, 1, 1.0, 1, 2, 10.0, 0.4),
            Node::leaf(1, 8.0, 0.25),
            Node::leaf(2, 2.0, 1.0),
        ]);
        let explainer = explainer(vec![t1, t2], 2);
        let x = [1.0, 2.0];
        let attribution = explainer.explain(&x).unwrap();

        assert_close(attribution.contributions[0], (0.8 - 0.5) / 2.0);
        assert_close(attribution.contributions[1], (1.0 - 0.4) / 2.0);
        assert_close(
            attribution.raw_output(),
            explainer.model().predict_proba(&x).unwrap(),
        );
    }

    #[test]
    fn test_wrong_dimension_rejected() {
        let tree = Tree::new(vec![Node::leaf(0, 1.0, 0.3)]);
        let explainer = explainer(vec![tree], 2);
        assert!(explainer.explain(&[0.0]).is_err());

        let attribution = explainer.explain(&[0.0, 0.0]).unwrap();
        assert_eq!(attribution.contributions, vec![0.0, 0.0]);
        assert_close(attribution.baseline, 0.3);
    }
}
