//! Target extraction and feature encoding
//!
//! Numeric columns pass through with missing cells as `NaN`. Text columns are
//! one-hot encoded over their sorted distinct values with the first value
//! dropped, producing `<column>_<value>` features.

use itertools::Itertools;
use log::warn;
use ndarray::Array2;

use super::dataset::TabularDataset;
use crate::config::TargetRule;
use crate::error::{Result, RiskError};

/// Features and labels ready for splitting
#[derive(Debug, Clone)]
pub struct EncodedDataset {
    pub feature_names: Vec<String>,
    /// One row per sample, missing cells are `NaN`
    pub features: Array2<f64>,
    pub labels: Vec<bool>,
}

impl TargetRule {
    /// Label for a present target cell
    pub fn label(&self, cell: &str) -> Result<bool> {
        let numeric = || {
            cell.parse::<f64>()
                .map_err(|_| RiskError::dataset(format!("target value {cell:?} is not numeric")))
        };
        match self {
            Self::Binary => match numeric()? {
                v if v == 0.0 => Ok(false),
                v if v == 1.0 => Ok(true),
                v => Err(RiskError::dataset(format!(
                    "binary target has value {v}, expected 0 or 1"
                ))),
            },
            Self::NonZero => Ok(numeric()? > 0.0),
            Self::Equals(label) => match (cell.parse::<f64>(), label.parse::<f64>()) {
                (Ok(a), Ok(b)) => Ok(a == b),
                _ => Ok(cell.eq_ignore_ascii_case(label)),
            },
        }
    }
}

/// Remove the target column and turn it into boolean labels
///
/// Rows with a missing target are dropped.
pub fn split_target(
    mut dataset: TabularDataset,
    target: &str,
    rule: &TargetRule,
) -> Result<(TabularDataset, Vec<bool>)> {
    let column = dataset
        .take_column(target)
        .ok_or_else(|| RiskError::dataset(format!("target column {target} not found")))?;

    let keep: Vec<bool> = column.cells.iter().map(Option::is_some).collect();
    let dropped = keep.iter().filter(|k| !**k).count();
    if dropped > 0 {
        warn!("Dropping {dropped} rows with missing {target}");
        dataset = dataset.filter_rows(&keep);
    }

    let labels = column
        .cells
        .iter()
        .flatten()
        .map(|cell| rule.label(cell))
        .collect::<Result<Vec<_>>>()?;
    Ok((dataset, labels))
}

enum Encoding {
    Numeric(usize, Vec<Option<f64>>),
    OneHot(usize, Vec<String>),
}

/// Encode feature columns into a numeric matrix
pub fn encode_features(dataset: &TabularDataset) -> (Vec<String>, Array2<f64>) {
    let rows = dataset.num_rows();
    let mut numeric = Vec::new();
    let mut categorical = Vec::new();
    for (idx, column) in dataset.columns.iter().enumerate() {
        match column.as_numeric() {
            Some(values) => numeric.push(Encoding::Numeric(idx, values)),
            None => {
                let levels: Vec<String> = column
                    .cells
                    .iter()
                    .flatten()
                    .cloned()
                    .sorted()
                    .dedup()
                    .skip(1)
                    .collect();
                categorical.push(Encoding::OneHot(idx, levels));
            }
        }
    }

    let mut names = Vec::new();
    let mut data: Vec<Vec<f64>> = Vec::new();
    for encoding in numeric.into_iter().chain(categorical) {
        match encoding {
            Encoding::Numeric(idx, values) => {
                names.push(dataset.columns[idx].name.clone());
                data.push(values.into_iter().map(|v| v.unwrap_or(f64::NAN)).collect());
            }
            Encoding::OneHot(idx, levels) => {
                let column = &dataset.columns[idx];
                for level in levels {
                    names.push(format!("{}_{}", column.name, level));
                    data.push(
                        column
                            .cells
                            .iter()
                            .map(|cell| {
                                f64::from(u8::from(cell.as_deref() == Some(level.as_str())))
                            })
                            .collect(),
                    );
                }
            }
        }
    }

    let matrix = Array2::from_shape_fn((rows, names.len()), |(i, j)| data[j][i]);
    (names, matrix)
}

/// Split off the target and encode the remaining columns
pub fn encode_dataset(
    dataset: TabularDataset,
    target: &str,
    rule: &TargetRule,
) -> Result<EncodedDataset> {
    let (features, labels) = split_target(dataset, target, rule)?;
    let (feature_names, features) = encode_features(&features);
    if feature_names.is_empty() {
        return Err(RiskError::dataset("dataset has no feature columns"));
    }
    Ok(EncodedDataset {
        feature_names,
        features,
        labels,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::training::dataset::Column;

    fn cells(values: &[Option<&str>]) -> Vec<Option<String>> {
        values.iter().map(|v| v.map(str::to_string)).collect()
    }

    #[test]
    fn test_target_rules() {
        assert!(TargetRule::Binary.label("1").unwrap());
        assert!(!TargetRule::Binary.label("0").unwrap());
        assert!(TargetRule::Binary.label("2").is_err());
        assert!(TargetRule::NonZero.label("3").unwrap());
        assert!(!TargetRule::NonZero.label("0").unwrap());
        assert!(TargetRule::Equals("ckd".into()).label("ckd").unwrap());
        assert!(!TargetRule::Equals("ckd".into()).label("notckd").unwrap());
        assert!(TargetRule::Equals("1".into()).label("1.0").unwrap());
    }

    #[test]
    fn test_encoding_orders_numeric_then_dummies() {
        let dataset = TabularDataset::new(vec![
            Column::new("sex", cells(&[Some("M"), Some("F"), None, Some("M")])),
            Column::new("age", cells(&[Some("40"), None, Some("60"), Some("50")])),
            Column::new("class", cells(&[Some("ckd"), Some("notckd"), None, Some("ckd")])),
        ])
        .unwrap();

        let encoded =
            encode_dataset(dataset, "class", &TargetRule::Equals("ckd".into())).unwrap();

        assert_eq!(encoded.feature_names, vec!["age", "sex_M"]);
        assert_eq!(encoded.labels, vec![true, false, true]);
        assert_eq!(encoded.features.nrows(), 3);
        assert_eq!(encoded.features[[0, 0]], 40.0);
        assert!(encoded.features[[1, 0]].is_nan());
        assert_eq!(encoded.features.column(1).to_vec(), vec![1.0, 0.0, 1.0]);
    }

    #[test]
    fn test_missing_target_column() {
        let dataset = TabularDataset::new(vec![Column::new("a", cells(&[Some("1")]))]).unwrap();
        assert!(matches!(
            encode_dataset(dataset, "Outcome", &TargetRule::Binary),
            Err(RiskError::Dataset(_))
        ));
    }
}
