//! Concrete classifiers that can be materialized from an artifact.

mod linear;
mod tree;

use serde::{Deserialize, Serialize};

use crate::ports::Classifier;

pub use linear::{LinearParams, LinearSvm, LogisticRegression};
pub use tree::{DecisionTree, RandomForest, TreeParams};

#[cfg(test)]
pub(crate) use tree::tests::stump;

/// Serialized estimator parameters, tagged by family.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EstimatorSpec {
    LogisticRegression(LinearParams),
    LinearSvm(LinearParams),
    DecisionTree(TreeParams),
    RandomForest { trees: Vec<TreeParams> },
}

impl EstimatorSpec {
    /// Validate the parameters and build the classifier.
    ///
    /// # Errors
    /// Returns a description of the first structural problem found.
    pub fn build(self, n_features: usize) -> Result<Box<dyn Classifier>, String> {
        match self {
            Self::LogisticRegression(params) => {
                params.check(n_features)?;
                Ok(Box::new(LogisticRegression::new(params)))
            }
            Self::LinearSvm(params) => {
                params.check(n_features)?;
                Ok(Box::new(LinearSvm::new(params)))
            }
            Self::DecisionTree(tree) => {
                tree.check(n_features)?;
                Ok(Box::new(DecisionTree::new(tree, n_features)))
            }
            Self::RandomForest { trees } => {
                if trees.is_empty() {
                    return Err("Random forest has no trees".into());
                }
                for (i, tree) in trees.iter().enumerate() {
                    tree.check(n_features)
                        .map_err(|e| format!("Tree {i}: {e}"))?;
                }
                Ok(Box::new(RandomForest::new(trees, n_features)))
            }
        }
    }
}
