//! Fitting imputer and scaler state from a training matrix
//!
//! Missing cells are encoded as `NaN` in the matrices passed here.

use ndarray::{Array2, ArrayView1, Axis};

use super::{Imputer, Scaler};

/// Median of the non-missing values of each column
///
/// A column with no observed values gets a fill of 0.
#[must_use]
pub fn fit_median_imputer(x: &Array2<f64>) -> Imputer {
    let fill_values = x.axis_iter(Axis(1)).map(column_median).collect();
    Imputer { fill_values }
}

fn column_median(column: ArrayView1<'_, f64>) -> f64 {
    let mut observed: Vec<f64> = column.iter().copied().filter(|v| !v.is_nan()).collect();
    if observed.is_empty() {
        return 0.0;
    }
    observed.sort_by(f64::total_cmp);
    let mid = observed.len() / 2;
    if observed.len() % 2 == 0 {
        (observed[mid - 1] + observed[mid]) / 2.0
    } else {
        observed[mid]
    }
}

/// Column mean and population standard deviation
///
/// Constant columns get a scale of 1 so they pass through centered.
#[must_use]
pub fn fit_standard_scaler(x: &Array2<f64>) -> Scaler {
    let n = x.nrows().max(1) as f64;
    let means: Vec<f64> = x
        .axis_iter(Axis(1))
        .map(|c| c.sum() / n)
        .collect();
    let scales = x
        .axis_iter(Axis(1))
        .zip(&means)
        .map(|(c, mean)| {
            let var = c.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
            let std = var.sqrt();
            if std > 0.0 && std.is_finite() { std } else { 1.0 }
        })
        .collect();
    Scaler { means, scales }
}

/// Replace missing cells with the imputer's fill values
#[must_use]
pub fn impute_matrix(x: &Array2<f64>, imputer: &Imputer) -> Array2<f64> {
    let mut out = x.clone();
    for mut row in out.axis_iter_mut(Axis(0)) {
        for (v, fill) in row.iter_mut().zip(&imputer.fill_values) {
            if v.is_nan() {
                *v = *fill;
            }
        }
    }
    out
}

/// Apply imputer then scaler to every row of a matrix
#[must_use]
pub fn transform_matrix(x: &Array2<f64>, imputer: &Imputer, scaler: &Scaler) -> Array2<f64> {
    let mut out = impute_matrix(x, imputer);
    for mut row in out.axis_iter_mut(Axis(0)) {
        for (j, v) in row.iter_mut().enumerate() {
            *v = (*v - scaler.means[j]) / scaler.scales[j];
        }
    }
    out
}
