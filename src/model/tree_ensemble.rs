//! Decision tree ensembles (random forests and gradient boosting).
//!
//! Trees are stored as flat node arrays in pre-order, the way tree
//! learners export them: node 0 is the root and every child index is
//! strictly greater than its parent's, which makes traversal terminate.

use super::{check_output, check_shape, ArtifactError, ModelError, Regressor};
use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Node {
    /// Goes to `left` when `x[feature] <= threshold`, to `right` otherwise.
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf {
        value: f64,
    },
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Tree {
    #[serde(default = "default_weight")]
    pub weight: f64,
    pub nodes: Vec<Node>,
}

fn default_weight() -> f64 {
    1.0
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Aggregation {
    /// Boosting: `base_score + Σ weight * tree(x)`.
    Sum,
    /// Bagging: `base_score + Σ weight * tree(x) / n_trees`.
    Mean,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TreeEnsemble {
    pub n_features: usize,
    pub aggregation: Aggregation,
    #[serde(default)]
    pub base_score: f64,
    pub trees: Vec<Tree>,
}

impl Tree {
    pub fn new(nodes: Vec<Node>) -> Self {
        Tree {
            weight: 1.0,
            nodes,
        }
    }

    fn validate(&self, tree_index: usize, n_features: usize) -> Result<(), ArtifactError> {
        let invalid = |msg: String| ArtifactError::Invalid(format!("tree {}: {}", tree_index, msg));

        if self.nodes.is_empty() {
            return Err(invalid("no nodes".to_string()));
        }
        if !self.weight.is_finite() {
            return Err(invalid("weight must be finite".to_string()));
        }
        for (i, node) in self.nodes.iter().enumerate() {
            match node {
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    if *feature >= n_features {
                        return Err(invalid(format!(
                            "node {} splits on feature {} but the model has {}",
                            i, feature, n_features
                        )));
                    }
                    if threshold.is_nan() {
                        return Err(invalid(format!("node {} has a NaN threshold", i)));
                    }
                    for child in [*left, *right] {
                        if child <= i || child >= self.nodes.len() {
                            return Err(invalid(format!(
                                "node {} has invalid child index {}",
                                i, child
                            )));
                        }
                    }
                }
                Node::Leaf { value } => {
                    if !value.is_finite() {
                        return Err(invalid(format!("leaf {} is not finite", i)));
                    }
                }
            }
        }
        Ok(())
    }

    fn evaluate(&self, features: &[f64]) -> f64 {
        let mut i = 0;
        loop {
            match &self.nodes[i] {
                Node::Leaf { value } => return *value,
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    i = if features[*feature] <= *threshold {
                        *left
                    } else {
                        *right
                    };
                }
            }
        }
    }
}

impl TreeEnsemble {
    pub fn new(
        n_features: usize,
        aggregation: Aggregation,
        base_score: f64,
        trees: Vec<Tree>,
    ) -> Result<Self, ArtifactError> {
        TreeEnsemble {
            n_features,
            aggregation,
            base_score,
            trees,
        }
        .validated()
    }

    pub(crate) fn validated(self) -> Result<Self, ArtifactError> {
        if self.n_features == 0 {
            return Err(ArtifactError::Invalid(
                "tree ensemble has zero features".to_string(),
            ));
        }
        if self.trees.is_empty() {
            return Err(ArtifactError::Invalid("tree ensemble has no trees".to_string()));
        }
        if !self.base_score.is_finite() {
            return Err(ArtifactError::Invalid(
                "tree ensemble base_score must be finite".to_string(),
            ));
        }
        for (i, tree) in self.trees.iter().enumerate() {
            tree.validate(i, self.n_features)?;
        }
        Ok(self)
    }
}

impl Regressor for TreeEnsemble {
    fn n_features(&self) -> usize {
        self.n_features
    }

    fn describe(&self) -> String {
        let kind = match self.aggregation {
            Aggregation::Sum => "boosted",
            Aggregation::Mean => "averaged",
        };
        format!(
            "tree ensemble ({} {} trees over {} features)",
            self.trees.len(),
            kind,
            self.n_features
        )
    }

    fn predict(&self, features: &[f64]) -> Result<f64, ModelError> {
        check_shape(self.n_features, features)?;
        let total: f64 = self
            .trees
            .iter()
            .map(|tree| tree.weight * tree.evaluate(features))
            .sum();
        let value = match self.aggregation {
            Aggregation::Sum => self.base_score + total,
            Aggregation::Mean => self.base_score + total / self.trees.len() as f64,
        };
        check_output(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stump(feature: usize, threshold: f64, low: f64, high: f64) -> Tree {
        Tree::new(vec![
            Node::Split {
                feature,
                threshold,
                left: 1,
                right: 2,
            },
            Node::Leaf { value: low },
            Node::Leaf { value: high },
        ])
    }

    #[test]
    fn test_sum_aggregation() {
        let model = TreeEnsemble::new(
            2,
            Aggregation::Sum,
            5.0,
            vec![stump(0, 1.0, 0.1, 0.2), stump(1, 3.0, -0.5, 0.5)],
        )
        .unwrap();
        let value = model.predict(&[1.0, 4.0]).unwrap();
        assert!((value - 5.6).abs() < 1e-12);
    }

    #[test]
    fn test_describe_reports_shape() {
        let model =
            TreeEnsemble::new(10, Aggregation::Sum, 0.0, vec![stump(1, 0.0, 1.0, 2.0)]).unwrap();
        assert_eq!(
            model.describe(),
            "tree ensemble (1 boosted trees over 10 features)"
        );
    }

    #[test]
    fn test_mean_aggregation_and_weights() {
        let mut second = stump(0, 0.0, 4.0, 8.0);
        second.weight = 0.5;
        let model = TreeEnsemble::new(
            1,
            Aggregation::Mean,
            0.0,
            vec![stump(0, 0.0, 2.0, 6.0), second],
        )
        .unwrap();
        // (6 + 0.5 * 8) / 2
        assert_eq!(model.predict(&[1.0]).unwrap(), 5.0);
        // (2 + 0.5 * 4) / 2
        assert_eq!(model.predict(&[-1.0]).unwrap(), 2.0);
    }

    #[test]
    fn test_threshold_is_inclusive_left() {
        let model = TreeEnsemble::new(1, Aggregation::Sum, 0.0, vec![stump(0, 2.5, 1.0, 2.0)]).unwrap();
        assert_eq!(model.predict(&[2.5]).unwrap(), 1.0);
        assert_eq!(model.predict(&[2.5001]).unwrap(), 2.0);
    }

    #[test]
    fn test_backward_child_rejected() {
        let tree = Tree::new(vec![
            Node::Leaf { value: 1.0 },
            Node::Split {
                feature: 0,
                threshold: 0.0,
                left: 0,
                right: 0,
            },
        ]);
        let result = TreeEnsemble::new(1, Aggregation::Sum, 0.0, vec![tree]);
        assert!(matches!(result, Err(ArtifactError::Invalid(_))));
    }

    #[test]
    fn test_feature_out_of_range_rejected() {
        let result = TreeEnsemble::new(2, Aggregation::Sum, 0.0, vec![stump(2, 0.0, 1.0, 2.0)]);
        assert!(result.is_err());
    }

    #[test]
    fn test_empty_ensemble_rejected() {
        assert!(TreeEnsemble::new(2, Aggregation::Mean, 0.0, vec![]).is_err());
        assert!(TreeEnsemble::new(2, Aggregation::Mean, 0.0, vec![Tree::new(vec![])]).is_err());
    }

    #[test]
    fn test_nodes_deserialize_untagged() {
        let tree: Tree = serde_json::from_str(
            r#"{ "nodes": [
                { "feature": 0, "threshold": 1.5, "left": 1, "right": 2 },
                { "value": -1.0 },
                { "value": 1.0 }
            ] }"#,
        )
        .unwrap();
        assert_eq!(tree.weight, 1.0);
        assert_eq!(tree, stump(0, 1.5, -1.0, 1.0));
    }
}
