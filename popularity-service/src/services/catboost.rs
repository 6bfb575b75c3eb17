//! Oblivious-tree ensembles exported with CatBoost's `format="json"`.
//!
//! Every tree applies the same split at each level, so a leaf is addressed by
//! the bit pattern of its split outcomes: bit `i` is set when the row's value
//! is greater than the border of split `i`.

use crate::services::artifacts::{read_json, ArtifactError};
use crate::services::predictor::{check_row_widths, Predictor, PredictorError};
use serde::Deserialize;
use std::path::Path;

/// CatBoost caps symmetric trees at this depth.
const MAX_TREE_DEPTH: usize = 16;

#[derive(Debug, Deserialize)]
struct ModelJson {
    features_info: FeaturesInfoJson,
    oblivious_trees: Vec<TreeJson>,
    #[serde(default)]
    scale_and_bias: Option<(f64, Vec<f64>)>,
}

#[derive(Debug, Deserialize)]
struct FeaturesInfoJson {
    #[serde(default)]
    float_features: Vec<FloatFeatureJson>,
    #[serde(default)]
    categorical_features: Vec<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct FloatFeatureJson {
    flat_feature_index: usize,
    #[serde(default)]
    feature_index: Option<usize>,
    #[serde(default)]
    feature_id: Option<String>,
    #[serde(default)]
    nan_value_treatment: NanTreatment,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize)]
enum NanTreatment {
    #[default]
    AsIs,
    AsFalse,
    AsTrue,
}

#[derive(Debug, Deserialize)]
struct TreeJson {
    leaf_values: Vec<f64>,
    #[serde(default)]
    splits: Vec<SplitJson>,
}

#[derive(Debug, Deserialize)]
struct SplitJson {
    #[serde(default)]
    split_type: Option<String>,
    #[serde(default)]
    float_feature_index: Option<usize>,
    #[serde(default)]
    border: Option<f64>,
}

#[derive(Debug, Clone)]
struct Split {
    column: usize,
    border: f32,
}

#[derive(Debug, Clone)]
struct ObliviousTree {
    splits: Vec<Split>,
    leaf_values: Vec<f64>,
}

impl ObliviousTree {
    fn leaf_index(&self, row: &[f64], nan_is_greater: &[bool]) -> usize {
        self.splits
            .iter()
            .enumerate()
            .fold(0, |index, (depth, split)| {
                let value = row[split.column];
                // CatBoost compares in single precision.
                let greater = if value.is_nan() {
                    nan_is_greater[split.column]
                } else {
                    (value as f32) > split.border
                };
                index | ((greater as usize) << depth)
            })
    }
}

/// A fitted CatBoost regressor.
#[derive(Debug, Clone)]
pub struct ObliviousEnsemble {
    n_features: usize,
    feature_names: Option<Vec<String>>,
    nan_is_greater: Vec<bool>,
    trees: Vec<ObliviousTree>,
    scale: f64,
    bias: f64,
}

impl ObliviousEnsemble {
    pub fn load(path: &Path) -> Result<Self, ArtifactError> {
        let model: ModelJson = read_json(path)?;
        Self::from_model(model)
    }

    pub fn from_json(json: &str) -> Result<Self, ArtifactError> {
        let model: ModelJson = serde_json::from_str(json)
            .map_err(|e| ArtifactError::MalformedModel(e.to_string()))?;
        Self::from_model(model)
    }

    pub fn tree_count(&self) -> usize {
        self.trees.len()
    }

    fn from_model(model: ModelJson) -> Result<Self, ArtifactError> {
        let malformed = |msg: String| ArtifactError::MalformedModel(msg);

        if !model.features_info.categorical_features.is_empty() {
            return Err(malformed(
                "categorical features are not supported".to_string(),
            ));
        }

        let float_features = model.features_info.float_features;
        let n_features = float_features.len();
        if n_features == 0 {
            return Err(malformed("model declares no float features".to_string()));
        }

        // float feature index (as referenced by splits) -> input column
        let mut columns: Vec<Option<usize>> = vec![None; n_features];
        let mut names: Vec<Option<String>> = vec![None; n_features];
        let mut nan_is_greater = vec![false; n_features];
        for (position, feature) in float_features.into_iter().enumerate() {
            let float_index = feature.feature_index.unwrap_or(position);
            let column = feature.flat_feature_index;
            if float_index >= n_features || column >= n_features {
                return Err(malformed(format!(
                    "float feature {} maps outside the {} model inputs",
                    float_index, n_features
                )));
            }
            if columns[float_index].is_some() || names[column].is_some() {
                return Err(malformed(format!(
                    "float feature {} is declared more than once",
                    float_index
                )));
            }
            columns[float_index] = Some(column);
            names[column] = Some(feature.feature_id.unwrap_or_default());
            nan_is_greater[column] = feature.nan_value_treatment == NanTreatment::AsTrue;
        }

        let feature_names = names
            .into_iter()
            .map(|name| name.filter(|n| !n.is_empty()))
            .collect::<Option<Vec<String>>>();

        if model.oblivious_trees.is_empty() {
            return Err(malformed("model has no trees".to_string()));
        }

        let trees = model
            .oblivious_trees
            .into_iter()
            .enumerate()
            .map(|(tree_index, tree)| compile_tree(tree_index, tree, &columns))
            .collect::<Result<Vec<_>, _>>()?;

        let (scale, bias) = match model.scale_and_bias {
            None => (1.0, 0.0),
            Some((scale, bias)) => match bias.as_slice() {
                [] => (scale, 0.0),
                [bias] => (scale, *bias),
                _ => {
                    return Err(malformed(format!(
                        "expected a single-dimension regressor, got {} biases",
                        bias.len()
                    )))
                }
            },
        };

        Ok(Self {
            n_features,
            feature_names,
            nan_is_greater,
            trees,
            scale,
            bias,
        })
    }
}

fn compile_tree(
    tree_index: usize,
    tree: TreeJson,
    columns: &[Option<usize>],
) -> Result<ObliviousTree, ArtifactError> {
    let depth = tree.splits.len();
    if depth > MAX_TREE_DEPTH {
        return Err(ArtifactError::MalformedModel(format!(
            "tree {} has depth {} (max {})",
            tree_index, depth, MAX_TREE_DEPTH
        )));
    }
    if tree.leaf_values.len() != 1 << depth {
        return Err(ArtifactError::MalformedModel(format!(
            "tree {} has {} leaf values, expected {}",
            tree_index,
            tree.leaf_values.len(),
            1usize << depth
        )));
    }

    let splits = tree
        .splits
        .into_iter()
        .map(|split| {
            if let Some(kind) = split.split_type.as_deref() {
                if kind != "FloatFeature" {
                    return Err(ArtifactError::MalformedModel(format!(
                        "tree {} uses unsupported split type '{}'",
                        tree_index, kind
                    )));
                }
            }
            let column = split
                .float_feature_index
                .and_then(|index| columns.get(index).copied().flatten())
                .ok_or_else(|| {
                    ArtifactError::MalformedModel(format!(
                        "tree {} splits on an undeclared float feature",
                        tree_index
                    ))
                })?;
            let border = split.border.ok_or_else(|| {
                ArtifactError::MalformedModel(format!("tree {} has a split without border", tree_index))
            })?;
            Ok(Split {
                column,
                border: border as f32,
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(ObliviousTree {
        splits,
        leaf_values: tree.leaf_values,
    })
}

impl Predictor for ObliviousEnsemble {
    fn n_features(&self) -> usize {
        self.n_features
    }

    fn feature_names(&self) -> Option<Vec<String>> {
        self.feature_names.clone()
    }

    fn predict_batch(&self, rows: &[Vec<f64>]) -> Result<Vec<f64>, PredictorError> {
        check_row_widths(rows, self.n_features)?;

        Ok(rows
            .iter()
            .map(|row| {
                let raw: f64 = self
                    .trees
                    .iter()
                    .map(|tree| tree.leaf_values[tree.leaf_index(row, &self.nan_is_greater)])
                    .sum();
                self.scale * raw + self.bias
            })
            .collect())
    }
}
