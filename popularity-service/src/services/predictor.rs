//! The model seam: anything that turns arranged feature rows into scores.

use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum PredictorError {
    #[error("row {row} has {actual} values but the model expects {expected}")]
    RowWidth {
        row: usize,
        expected: usize,
        actual: usize,
    },

    #[error("model returned {actual} predictions for {expected} rows")]
    OutputCount { expected: usize, actual: usize },
}

/// A pre-fitted regression model.
///
/// Rows are positional: value `i` of every row is the feature the model was
/// trained on at position `i`.
pub trait Predictor: Send + Sync {
    /// Number of values every row must carry.
    fn n_features(&self) -> usize;

    /// Feature names in positional order, when the artifact records them.
    fn feature_names(&self) -> Option<Vec<String>> {
        None
    }

    fn predict_batch(&self, rows: &[Vec<f64>]) -> Result<Vec<f64>, PredictorError>;

    fn predict_one(&self, row: Vec<f64>) -> Result<f64, PredictorError> {
        let predictions = self.predict_batch(&[row])?;
        match predictions[..] {
            [prediction] => Ok(prediction),
            _ => Err(PredictorError::OutputCount {
                expected: 1,
                actual: predictions.len(),
            }),
        }
    }
}

/// Reject rows whose width differs from what the model was trained on.
pub fn check_row_widths(rows: &[Vec<f64>], expected: usize) -> Result<(), PredictorError> {
    match rows.iter().position(|row| row.len() != expected) {
        Some(row) => Err(PredictorError::RowWidth {
            row,
            expected,
            actual: rows[row].len(),
        }),
        None => Ok(()),
    }
}
