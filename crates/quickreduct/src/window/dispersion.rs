//! Attribute dispersion of a window.

use ndarray::Array2;

use crate::data::InstanceSnapshot;
use crate::utils::mean_column_std;

/// Mean population standard deviation of the numeric attributes of
/// `instances`.
///
/// Attribute kinds are read from the first instance. Returns `0.0` for an
/// empty slice or when no attribute is numeric.
pub fn average_dispersion(instances: &[InstanceSnapshot]) -> f64 {
    let Some(first) = instances.first() else {
        return 0.0;
    };
    let columns: Vec<usize> = first
        .attributes()
        .iter()
        .filter(|v| v.kind().is_numeric())
        .map(|v| v.index())
        .collect();

    let matrix = Array2::from_shape_fn((instances.len(), columns.len()), |(row, col)| {
        instances[row].numeric(columns[col]).unwrap_or(0.0)
    });
    mean_column_std(matrix.view())
}
