//! Tree estimators: a single decision tree and a random forest.
//!
//! Trees use the flat array layout of scikit-learn's `tree_` attribute:
//! node `i` is a leaf when `children_left[i] == -1`, otherwise rows with
//! `x[feature[i]] <= threshold[i]` go left. `value[i]` holds the class
//! weights `[w(0), w(1)]` at that node.

use serde::{Deserialize, Serialize};

use crate::ports::{check_row, Classifier, ClassifierError};

const LEAF: i64 = -1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeParams {
    pub children_left: Vec<i64>,
    pub children_right: Vec<i64>,
    pub feature: Vec<i64>,
    pub threshold: Vec<f64>,
    pub value: Vec<[f64; 2]>,
}

impl TreeParams {
    /// Validate the node arrays.
    ///
    /// Children must point strictly forward, which rules out cycles and
    /// guarantees every walk terminates at a leaf.
    pub(crate) fn check(&self, n_features: usize) -> Result<(), String> {
        let n = self.children_left.len();
        if n == 0 {
            return Err("Tree has no nodes".into());
        }
        if self.children_right.len() != n
            || self.feature.len() != n
            || self.threshold.len() != n
            || self.value.len() != n
        {
            return Err("Tree node arrays have inconsistent lengths".into());
        }

        for i in 0..n {
            let (left, right) = (self.children_left[i], self.children_right[i]);
            if left == LEAF || right == LEAF {
                if left != right {
                    return Err(format!("Node {i} has exactly one child"));
                }
                let [w0, w1] = self.value[i];
                if !(w0.is_finite() && w1.is_finite()) || w0 < 0.0 || w1 < 0.0 || w0 + w1 <= 0.0
                {
                    return Err(format!("Leaf {i} has invalid class weights"));
                }
                continue;
            }

            for child in [left, right] {
                if child <= i as i64 || child >= n as i64 {
                    return Err(format!("Node {i} has out-of-order child {child}"));
                }
            }
            let f = self.feature[i];
            if f < 0 || f >= n_features as i64 {
                return Err(format!("Node {i} splits on unknown feature {f}"));
            }
            if !self.threshold[i].is_finite() {
                return Err(format!("Node {i} has a non-finite threshold"));
            }
        }
        Ok(())
    }

    fn leaf_proba(&self, row: &[f64]) -> [f64; 2] {
        let mut node = 0usize;
        while self.children_left[node] != LEAF {
            let f = self.feature[node] as usize;
            node = if row[f] <= self.threshold[node] {
                self.children_left[node] as usize
            } else {
                self.children_right[node] as usize
            };
        }
        let [w0, w1] = self.value[node];
        let total = w0 + w1;
        [w0 / total, w1 / total]
    }
}

fn argmax(proba: [f64; 2]) -> u8 {
    // Ties go to class 0.
    u8::from(proba[1] > proba[0])
}

/// Single CART decision tree.
#[derive(Debug, Clone)]
pub struct DecisionTree {
    tree: TreeParams,
    n_features: usize,
}

impl DecisionTree {
    /// Build from validated node arrays.
    #[must_use]
    pub fn new(tree: TreeParams, n_features: usize) -> Self {
        Self { tree, n_features }
    }
}

impl Classifier for DecisionTree {
    fn name(&self) -> &str {
        "decision_tree"
    }

    fn n_features(&self) -> usize {
        self.n_features
    }

    fn predict(&self, row: &[f64]) -> Result<u8, ClassifierError> {
        self.predict_proba(row).map(argmax)
    }

    fn predict_proba(&self, row: &[f64]) -> Result<[f64; 2], ClassifierError> {
        check_row(row, self.n_features)?;
        Ok(self.tree.leaf_proba(row))
    }
}

/// Random forest: the mean of its trees' leaf probabilities.
#[derive(Debug, Clone)]
pub struct RandomForest {
    trees: Vec<TreeParams>,
    n_features: usize,
}

impl RandomForest {
    /// Build from validated trees.
    #[must_use]
    pub fn new(trees: Vec<TreeParams>, n_features: usize) -> Self {
        Self { trees, n_features }
    }
}

impl Classifier for RandomForest {
    fn name(&self) -> &str {
        "random_forest"
    }

    fn n_features(&self) -> usize {
        self.n_features
    }

    fn predict(&self, row: &[f64]) -> Result<u8, ClassifierError> {
        self.predict_proba(row).map(argmax)
    }

    fn predict_proba(&self, row: &[f64]) -> Result<[f64; 2], ClassifierError> {
        check_row(row, self.n_features)?;
        if self.trees.is_empty() {
            return Err(ClassifierError::Failed("Forest has no trees".into()));
        }
        let mut sum = [0.0, 0.0];
        for tree in &self.trees {
            let [p0, p1] = tree.leaf_proba(row);
            sum[0] += p0;
            sum[1] += p1;
        }
        let n = self.trees.len() as f64;
        Ok([sum[0] / n, sum[1] / n])
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// One split on `feature`: rows with `x <= threshold` land on `low`, others on `high`.
    pub(crate) fn stump(feature: i64, threshold: f64, low: [f64; 2], high: [f64; 2]) -> TreeParams {
        TreeParams {
            children_left: vec![1, -1, -1],
            children_right: vec![2, -1, -1],
            feature: vec![feature, -2, -2],
            threshold: vec![threshold, -2.0, -2.0],
            value: vec![[10.0, 10.0], low, high],
        }
    }

    #[test]
    fn test_decision_tree_walk() {
        let tree = stump(0, 50.0, [8.0, 2.0], [1.0, 3.0]);
        tree.check(2).expect("Should be valid");
        let model = DecisionTree::new(tree, 2);

        let p = model.predict_proba(&[40.0, 0.0]).expect("Should score");
        assert!((p[1] - 0.2).abs() < 1e-12);
        assert_eq!(model.predict(&[40.0, 0.0]).expect("Should predict"), 0);

        // Threshold is inclusive on the left branch.
        assert_eq!(model.predict(&[50.0, 0.0]).expect("Should predict"), 0);
        assert_eq!(model.predict(&[50.5, 0.0]).expect("Should predict"), 1);
    }

    #[test]
    fn test_forest_averages_trees() {
        let a = stump(0, 50.0, [1.0, 0.0], [0.0, 1.0]);
        let b = stump(1, 0.5, [1.0, 1.0], [0.0, 1.0]);
        let model = RandomForest::new(vec![a, b], 2);

        let p = model.predict_proba(&[60.0, 0.0]).expect("Should score");
        assert!((p[1] - 0.75).abs() < 1e-12);
        assert_eq!(model.predict(&[60.0, 0.0]).expect("Should predict"), 1);

        let p = model.predict_proba(&[40.0, 0.0]).expect("Should score");
        assert!((p[1] - 0.25).abs() < 1e-12);
    }

    #[test]
    fn test_tie_predicts_negative_class() {
        let model = DecisionTree::new(stump(0, 0.0, [1.0, 1.0], [1.0, 1.0]), 1);
        assert_eq!(model.predict(&[1.0]).expect("Should predict"), 0);
    }

    #[test]
    fn test_check_rejects_backward_children() {
        let mut tree = stump(0, 1.0, [1.0, 0.0], [0.0, 1.0]);
        tree.children_right[0] = 0;
        assert!(tree.check(1).is_err());
    }

    #[test]
    fn test_check_rejects_unknown_feature() {
        let tree = stump(5, 1.0, [1.0, 0.0], [0.0, 1.0]);
        assert!(tree.check(2).is_err());
    }

    #[test]
    fn test_check_rejects_empty_leaf() {
        let tree = stump(0, 1.0, [0.0, 0.0], [0.0, 1.0]);
        assert!(tree.check(1).is_err());
    }
}
