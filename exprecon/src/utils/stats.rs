use log::*;
use statrs::statistics::Statistics;

/// Calculates Pearson correlation coefficient between two variables.
///
/// Returns `0.0` for inputs of different length, empty inputs, and inputs
/// where either variable has zero variance.
pub fn pearson_r(
    x: &[f64],
    y: &[f64],
) -> f64 {
    if x.len() != y.len() {
        warn!(
            "Cannot calculate Pearson's r: x length ({}) doesn't match y \
             length ({})",
            x.len(),
            y.len()
        );
        return 0.0;
    }

    if x.is_empty() {
        warn!("Cannot calculate Pearson's r: empty arrays");
        return 0.0;
    }

    let x_mean = x.iter().mean();
    let y_mean = y.iter().mean();

    // Covariance
    let numerator = x
        .iter()
        .zip(y.iter())
        .map(|(valx, valy)| (valx - x_mean) * (valy - y_mean))
        .sum::<f64>();

    let denominator = {
        let x_dev: f64 = x.iter().map(|valx| (valx - x_mean).powi(2)).sum();
        let y_dev: f64 = y.iter().map(|valy| (valy - y_mean).powi(2)).sum();
        (x_dev * y_dev).sqrt()
    };

    if denominator == 0.0 {
        debug!("Denominator is zero, returning r=0");
        return 0.0;
    }

    numerator / denominator
}

/// Compares two slices as multisets: same values with the same multiplicities,
/// regardless of order. Values are ordered with [`f64::total_cmp`], so `NaN`
/// entries compare equal to each other.
pub fn multiset_eq(
    x: &[f64],
    y: &[f64],
) -> bool {
    if x.len() != y.len() {
        return false;
    }
    let mut x_sorted = x.to_vec();
    let mut y_sorted = y.to_vec();
    x_sorted.sort_by(f64::total_cmp);
    y_sorted.sort_by(f64::total_cmp);
    x_sorted
        .iter()
        .zip(y_sorted.iter())
        .all(|(a, b)| a.total_cmp(b).is_eq())
}
