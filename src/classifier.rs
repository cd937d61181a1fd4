use crate::error::{ArtifactError, ArtifactResult, PredictError, PredictResult};
use serde::Deserialize;

pub trait Classifier: Send + Sync {
    fn n_features(&self) -> usize;

    fn predict(&self, features: &[f64]) -> PredictResult<i64>;
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Node {
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf {
        value: Vec<f64>,
    },
}

#[derive(Debug, Clone, Deserialize)]
pub struct DecisionTree {
    nodes: Vec<Node>,
}

impl DecisionTree {
    pub fn new(nodes: Vec<Node>) -> Self {
        DecisionTree { nodes }
    }

    fn validate(&self, index: usize, n_features: usize, n_classes: usize) -> ArtifactResult<()> {
        let invalid = |reason: String| ArtifactError::invalid("model", format!("tree {}: {}", index, reason));
        if self.nodes.is_empty() {
            return Err(invalid("no nodes".to_string()));
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
                        return Err(invalid(format!("node {} splits on feature {}", i, feature)));
                    }
                    if threshold.is_nan() {
                        return Err(invalid(format!("node {} has a NaN threshold", i)));
                    }
                    // children after their parent rules out cycles
                    for child in [left, right] {
                        if *child <= i || *child >= self.nodes.len() {
                            return Err(invalid(format!("node {} has bad child {}", i, child)));
                        }
                    }
                }
                Node::Leaf { value } => {
                    if value.len() != n_classes {
                        return Err(invalid(format!(
                            "leaf {} has {} class weights, expected {}",
                            i,
                            value.len(),
                            n_classes
                        )));
                    }
                    if value.iter().any(|w| !w.is_finite() || *w < 0.0) || value.iter().sum::<f64>() <= 0.0 {
                        return Err(invalid(format!("leaf {} has invalid class weights", i)));
                    }
                }
            }
        }
        Ok(())
    }

    fn leaf(&self, features: &[f64]) -> &[f64] {
        let mut i = 0;
        loop {
            match &self.nodes[i] {
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
                Node::Leaf { value } => return value,
            }
        }
    }
}

/// Serialized form of [`RandomForest`].
#[derive(Debug, Clone, Deserialize)]
pub struct ForestParams {
    pub n_features: usize,
    pub classes: Vec<i64>,
    pub trees: Vec<DecisionTree>,
}

/// Forest of decision trees; class probabilities are averaged across trees.
#[derive(Debug, Clone, Deserialize)]
#[serde(try_from = "ForestParams")]
pub struct RandomForest {
    n_features: usize,
    classes: Vec<i64>,
    trees: Vec<DecisionTree>,
}

impl TryFrom<ForestParams> for RandomForest {
    type Error = ArtifactError;

    fn try_from(params: ForestParams) -> ArtifactResult<Self> {
        if params.classes.is_empty() {
            return Err(ArtifactError::invalid("model", "no classes"));
        }
        if params.trees.is_empty() {
            return Err(ArtifactError::invalid("model", "no trees"));
        }
        for (i, tree) in params.trees.iter().enumerate() {
            tree.validate(i, params.n_features, params.classes.len())?;
        }
        Ok(RandomForest {
            n_features: params.n_features,
            classes: params.classes,
            trees: params.trees,
        })
    }
}

impl RandomForest {
    pub fn new(n_features: usize, classes: Vec<i64>, trees: Vec<DecisionTree>) -> ArtifactResult<Self> {
        ForestParams {
            n_features,
            classes,
            trees,
        }
        .try_into()
    }

    pub fn classes(&self) -> &[i64] {
        &self.classes
    }

    pub fn predict_proba(&self, features: &[f64]) -> PredictResult<Vec<f64>> {
        if features.len() != self.n_features {
            return Err(PredictError::Inference(format!(
                "expected {} features, got {}",
                self.n_features,
                features.len()
            )));
        }
        if let Some(i) = features.iter().position(|x| !x.is_finite()) {
            return Err(PredictError::Inference(format!(
                "feature {} is not finite",
                i
            )));
        }
        let mut proba = vec![0.0; self.classes.len()];
        for tree in &self.trees {
            let value = tree.leaf(features);
            let total: f64 = value.iter().sum();
            for (p, w) in proba.iter_mut().zip(value) {
                *p += w / total;
            }
        }
        let n_trees = self.trees.len() as f64;
        proba.iter_mut().for_each(|p| *p /= n_trees);
        Ok(proba)
    }
}

impl Classifier for RandomForest {
    fn n_features(&self) -> usize {
        self.n_features
    }

    fn predict(&self, features: &[f64]) -> PredictResult<i64> {
        let proba = self.predict_proba(features)?;
        // first maximum wins on ties
        let mut best = 0;
        for (i, p) in proba.iter().enumerate() {
            if *p > proba[best] {
                best = i;
            }
        }
        Ok(self.classes[best])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stump(feature: usize, threshold: f64, left: Vec<f64>, right: Vec<f64>) -> DecisionTree {
        DecisionTree::new(vec![
            Node::Split {
                feature,
                threshold,
                left: 1,
                right: 2,
            },
            Node::Leaf { value: left },
            Node::Leaf { value: right },
        ])
    }

    #[test]
    fn test_single_tree_routes_on_threshold() {
        let forest = RandomForest::new(
            2,
            vec![1, 2],
            vec![stump(1, 0.5, vec![3.0, 0.0], vec![0.0, 5.0])],
        )
        .unwrap();
        assert_eq!(forest.predict(&[0.9, 0.5]).unwrap(), 1);
        assert_eq!(forest.predict(&[0.1, 0.6]).unwrap(), 2);
    }

    #[test]
    fn test_forest_averages_normalized_votes() {
        // one confident tree outweighs two lukewarm ones
        let forest = RandomForest::new(
            1,
            vec![7, 9],
            vec![
                stump(0, 0.5, vec![0.0, 10.0], vec![0.0, 10.0]),
                stump(0, 0.5, vec![6.0, 4.0], vec![6.0, 4.0]),
                stump(0, 0.5, vec![6.0, 4.0], vec![6.0, 4.0]),
            ],
        )
        .unwrap();
        let proba = forest.predict_proba(&[0.2]).unwrap();
        assert!((proba[0] - 0.4).abs() < 1e-9);
        assert!((proba[1] - 0.6).abs() < 1e-9);
        assert_eq!(forest.predict(&[0.2]).unwrap(), 9);
    }

    #[test]
    fn test_ties_resolve_to_first_class() {
        let forest = RandomForest::new(
            1,
            vec![4, 3],
            vec![stump(0, 0.5, vec![1.0, 1.0], vec![1.0, 1.0])],
        )
        .unwrap();
        assert_eq!(forest.predict(&[0.0]).unwrap(), 4);
    }

    #[test]
    fn test_predict_is_deterministic() {
        let forest = RandomForest::new(
            1,
            vec![1, 2],
            vec![stump(0, 0.5, vec![2.0, 1.0], vec![1.0, 2.0])],
        )
        .unwrap();
        let first = forest.predict(&[0.7]).unwrap();
        for _ in 0..10 {
            assert_eq!(forest.predict(&[0.7]).unwrap(), first);
        }
    }

    #[test]
    fn test_malformed_input_is_inference_error() {
        let forest = RandomForest::new(
            2,
            vec![1, 2],
            vec![stump(0, 0.5, vec![1.0, 0.0], vec![0.0, 1.0])],
        )
        .unwrap();
        assert!(matches!(
            forest.predict(&[0.1]),
            Err(PredictError::Inference(_))
        ));
        assert!(matches!(
            forest.predict(&[f64::NAN, 0.0]),
            Err(PredictError::Inference(_))
        ));
    }

    #[test]
    fn test_validate_rejects_bad_structure() {
        // feature out of range
        assert!(RandomForest::new(1, vec![1, 2], vec![stump(3, 0.5, vec![1.0, 0.0], vec![0.0, 1.0])]).is_err());
        // leaf width does not match classes
        assert!(RandomForest::new(1, vec![1, 2], vec![stump(0, 0.5, vec![1.0], vec![0.0, 1.0])]).is_err());
        // child pointing back at its parent
        let cyclic = DecisionTree::new(vec![
            Node::Split {
                feature: 0,
                threshold: 0.5,
                left: 0,
                right: 1,
            },
            Node::Leaf {
                value: vec![1.0, 0.0],
            },
        ]);
        assert!(RandomForest::new(1, vec![1, 2], vec![cyclic]).is_err());
        assert!(RandomForest::new(1, vec![1, 2], vec![]).is_err());
    }

    #[test]
    fn test_deserialize_untagged_nodes() {
        let json = r#"{
            "n_features": 1,
            "classes": [5, 6],
            "trees": [{"nodes": [
                {"feature": 0, "threshold": 0.0, "left": 1, "right": 2},
                {"value": [1.0, 0.0]},
                {"value": [0.0, 1.0]}
            ]}]
        }"#;
        let forest: RandomForest = serde_json::from_str(json).unwrap();
        assert_eq!(forest.classes(), &[5, 6]);
        assert_eq!(forest.predict(&[1.0]).unwrap(), 6);
    }

    #[test]
    fn test_deserialize_rejects_bad_structure() {
        // split feature beyond n_features
        let out_of_range = r#"{
            "n_features": 1,
            "classes": [1],
            "trees": [{"nodes": [
                {"feature": 5, "threshold": 0.5, "left": 1, "right": 1},
                {"value": [1.0]}
            ]}]
        }"#;
        assert!(serde_json::from_str::<RandomForest>(out_of_range).is_err());

        // child pointing at itself would never reach a leaf
        let self_loop = r#"{
            "n_features": 1,
            "classes": [1],
            "trees": [{"nodes": [
                {"feature": 0, "threshold": 0.5, "left": 0, "right": 1},
                {"value": [1.0]}
            ]}]
        }"#;
        assert!(serde_json::from_str::<RandomForest>(self_loop).is_err());

        let no_trees = r#"{"n_features": 1, "classes": [1], "trees": []}"#;
        assert!(serde_json::from_str::<RandomForest>(no_trees).is_err());
    }
}
