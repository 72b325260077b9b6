//! Forecast error measurement.

use crate::util::{PearlError, Result};

/// The fraction of mismatches between the actual sequence and the predicted sequence rotated
/// forward by one position: `actual[i]` is compared against `predicted[i - 1]`, wrapping the
/// first comparison around to the last prediction.
///
/// The rotation scores each prediction against the observation one step later, treating the
/// prediction at time `t` as a forecast of `t + 1`; the wrap-around pairs the first actual
/// value with the final prediction.
///
/// # Errors
/// * `PearlError::LengthMismatch` if the sequences differ in length
/// * `PearlError::NotEnoughData` if the sequences are empty
pub fn shifted_error<T: PartialEq>(predicted: &[T], actual: &[T]) -> Result<f64> {
    if predicted.len() != actual.len() {
        return Err(PearlError::LengthMismatch {
            predicted: predicted.len(),
            actual: actual.len(),
        });
    }
    if actual.is_empty() {
        return Err(PearlError::NotEnoughData);
    }

    let n = actual.len();
    let mismatches = (0..n)
        .filter(|&i| actual[i] != predicted[(i + n - 1) % n])
        .count();

    Ok(mismatches as f64 / n as f64)
}
