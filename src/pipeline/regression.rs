//! Linear regression scoring with k-fold cross-validation
//!
//! The score of a feature matrix against a target is the mean coefficient of
//! determination (R²) of an ordinary least squares model over the folds.

use anyhow::Result;
use faer::Mat;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::Serialize;

use super::error::QualityError;

/// Relative pivot size below which a direction is treated as collinear
const PIVOT_TOLERANCE: f64 = 1e-10;

/// Dense feature matrix (rows = samples, columns = features)
#[derive(Debug, Clone)]
pub struct FeatureMatrix {
    data: Mat<f64>,
}

impl FeatureMatrix {
    /// Build a matrix from output columns of equal length
    pub fn from_columns(columns: &[Vec<f64>]) -> Result<Self> {
        let nrows = columns.first().map_or(0, Vec::len);
        if let Some(bad) = columns.iter().find(|c| c.len() != nrows) {
            return Err(QualityError::ShapeMismatch {
                features: nrows,
                target: bad.len(),
            }
            .into());
        }
        let data = Mat::from_fn(nrows, columns.len(), |i, j| columns[j][i]);
        Ok(Self { data })
    }

    /// Reshape a 1-D input into a single-column matrix
    pub fn from_vector(values: &[f64]) -> Self {
        Self {
            data: Mat::from_fn(values.len(), 1, |i, _| values[i]),
        }
    }

    pub fn nrows(&self) -> usize {
        self.data.nrows()
    }

    pub fn ncols(&self) -> usize {
        self.data.ncols()
    }

    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.data[(row, col)]
    }

    /// Keep only the rows where `keep[row]` is true
    pub fn filter_rows(&self, keep: &[bool]) -> Result<Self> {
        if keep.len() != self.nrows() {
            return Err(QualityError::ShapeMismatch {
                features: self.nrows(),
                target: keep.len(),
            }
            .into());
        }
        Ok(self.select_rows(&rows_where(keep)))
    }

    fn select_rows(&self, rows: &[usize]) -> Self {
        Self {
            data: Mat::from_fn(rows.len(), self.ncols(), |i, j| self.data[(rows[i], j)]),
        }
    }
}

fn rows_where(keep: &[bool]) -> Vec<usize> {
    keep.iter()
        .enumerate()
        .filter_map(|(i, &k)| if k { Some(i) } else { None })
        .collect()
}

/// K-fold cross-validation splitter.
///
/// Folds are contiguous blocks of the (optionally shuffled) row order; the
/// first `n % n_splits` folds hold one extra row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct KFold {
    pub n_splits: usize,
    pub shuffle: bool,
    /// Seed for the shuffle; unused when `shuffle` is false
    pub seed: u64,
}

impl Default for KFold {
    fn default() -> Self {
        Self {
            n_splits: 5,
            shuffle: true,
            seed: 0,
        }
    }
}

/// Row indices of one train/test split
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Split {
    pub train: Vec<usize>,
    pub test: Vec<usize>,
}

impl KFold {
    pub fn new(n_splits: usize) -> Self {
        Self {
            n_splits,
            ..Self::default()
        }
    }

    pub fn with_shuffle(mut self, shuffle: bool) -> Self {
        self.shuffle = shuffle;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Generate the train/test splits for `n_samples` rows
    pub fn split(&self, n_samples: usize) -> Result<Vec<Split>> {
        if self.n_splits < 2 || n_samples < self.n_splits {
            return Err(QualityError::InsufficientSamples {
                samples: n_samples,
                folds: self.n_splits,
            }
            .into());
        }

        let mut indices: Vec<usize> = (0..n_samples).collect();
        if self.shuffle {
            let mut rng = ChaCha8Rng::seed_from_u64(self.seed);
            indices.shuffle(&mut rng);
        }

        let base = n_samples / self.n_splits;
        let remainder = n_samples % self.n_splits;

        let mut splits = Vec::with_capacity(self.n_splits);
        let mut start = 0;
        for fold in 0..self.n_splits {
            let size = if fold < remainder { base + 1 } else { base };
            let end = start + size;
            let test = indices[start..end].to_vec();
            let train = indices[..start]
                .iter()
                .chain(indices[end..].iter())
                .copied()
                .collect();
            splits.push(Split { train, test });
            start = end;
        }

        Ok(splits)
    }
}

/// Ordinary least squares with an intercept
#[derive(Debug, Clone, Default)]
pub struct LinearRegression {
    coefficients: Vec<f64>,
    intercept: f64,
}

impl LinearRegression {
    /// Fit on standardized, centered features.
    ///
    /// Constant columns get a zero coefficient and linearly dependent
    /// columns are resolved to one least-squares solution.
    pub fn fit(features: &FeatureMatrix, target: &[f64]) -> Result<Self> {
        let n = features.nrows();
        let p = features.ncols();
        if n != target.len() {
            return Err(QualityError::ShapeMismatch {
                features: n,
                target: target.len(),
            }
            .into());
        }
        if n == 0 {
            return Err(QualityError::InsufficientSamples { samples: 0, folds: 1 }.into());
        }

        let y_mean = target.iter().sum::<f64>() / n as f64;
        let mut means = vec![0.0; p];
        let mut scales = vec![0.0; p];
        for (j, (mean, scale)) in means.iter_mut().zip(scales.iter_mut()).enumerate() {
            *mean = (0..n).map(|i| features.get(i, j)).sum::<f64>() / n as f64;
            let var = (0..n)
                .map(|i| (features.get(i, j) - *mean).powi(2))
                .sum::<f64>()
                / n as f64;
            *scale = var.sqrt();
        }

        let z = Mat::from_fn(n, p, |i, j| {
            if scales[j] > 0.0 {
                (features.get(i, j) - means[j]) / scales[j]
            } else {
                0.0
            }
        });
        let yc = Mat::from_fn(n, 1, |i, _| target[i] - y_mean);

        let gram = z.transpose() * &z;
        let moment = z.transpose() * &yc;

        let standardized = solve_normal_equations(&gram, &moment);
        let coefficients: Vec<f64> = standardized
            .iter()
            .zip(scales.iter())
            .map(|(&b, &s)| if s > 0.0 { b / s } else { 0.0 })
            .collect();
        let intercept = y_mean
            - coefficients
                .iter()
                .zip(means.iter())
                .map(|(b, m)| b * m)
                .sum::<f64>();

        Ok(Self {
            coefficients,
            intercept,
        })
    }

    pub fn predict(&self, features: &FeatureMatrix) -> Vec<f64> {
        (0..features.nrows())
            .map(|i| {
                self.intercept
                    + self
                        .coefficients
                        .iter()
                        .enumerate()
                        .map(|(j, b)| b * features.get(i, j))
                        .sum::<f64>()
            })
            .collect()
    }

    pub fn coefficients(&self) -> &[f64] {
        &self.coefficients
    }

    pub fn intercept(&self) -> f64 {
        self.intercept
    }
}

/// Solve `gram * x = moment` by Gauss-Jordan elimination with partial
/// pivoting. Columns whose pivot collapses below tolerance are free and
/// take a zero coefficient.
fn solve_normal_equations(gram: &Mat<f64>, moment: &Mat<f64>) -> Vec<f64> {
    let p = gram.nrows();
    let mut aug: Vec<Vec<f64>> = (0..p)
        .map(|i| {
            let mut row: Vec<f64> = (0..p).map(|j| gram[(i, j)]).collect();
            row.push(moment[(i, 0)]);
            row
        })
        .collect();

    let scale = (0..p).map(|i| gram[(i, i)].abs()).fold(0.0, f64::max);
    let tolerance = PIVOT_TOLERANCE * scale.max(1.0);

    let mut pivot_of_col: Vec<Option<usize>> = vec![None; p];
    let mut next_row = 0;
    for col in 0..p {
        if next_row == p {
            break;
        }
        let best = (next_row..p)
            .max_by(|&a, &b| {
                aug[a][col]
                    .abs()
                    .partial_cmp(&aug[b][col].abs())
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
            .unwrap_or(next_row);
        if aug[best][col].abs() <= tolerance {
            continue;
        }
        aug.swap(next_row, best);

        let pivot = aug[next_row][col];
        for value in aug[next_row].iter_mut() {
            *value /= pivot;
        }
        let pivot_row = aug[next_row].clone();
        for (r, row) in aug.iter_mut().enumerate() {
            if r != next_row {
                let factor = row[col];
                if factor != 0.0 {
                    for (value, &pv) in row.iter_mut().zip(pivot_row.iter()) {
                        *value -= factor * pv;
                    }
                }
            }
        }

        pivot_of_col[col] = Some(next_row);
        next_row += 1;
    }

    pivot_of_col
        .iter()
        .map(|row| row.map_or(0.0, |r| aug[r][p]))
        .collect()
}

/// Coefficient of determination.
///
/// A constant `y_true` scores 1.0 when predicted exactly and 0.0 otherwise.
pub fn r2_score(y_true: &[f64], y_pred: &[f64]) -> f64 {
    let n = y_true.len();
    if n == 0 {
        return f64::NAN;
    }
    let mean = y_true.iter().sum::<f64>() / n as f64;
    let ss_res: f64 = y_true
        .iter()
        .zip(y_pred.iter())
        .map(|(t, p)| (t - p).powi(2))
        .sum();
    let ss_tot: f64 = y_true.iter().map(|t| (t - mean).powi(2)).sum();

    if ss_tot == 0.0 {
        return if ss_res == 0.0 { 1.0 } else { 0.0 };
    }
    1.0 - ss_res / ss_tot
}

/// Mean cross-validated R² of a linear regression of `target` on `features`
pub fn cross_val_r2(features: &FeatureMatrix, target: &[f64], folds: &KFold) -> Result<f64> {
    if features.nrows() != target.len() {
        return Err(QualityError::ShapeMismatch {
            features: features.nrows(),
            target: target.len(),
        }
        .into());
    }
    if target.iter().any(|v| !v.is_finite()) {
        return Err(QualityError::NonFiniteInput("target").into());
    }
    for i in 0..features.nrows() {
        for j in 0..features.ncols() {
            if !features.get(i, j).is_finite() {
                return Err(QualityError::NonFiniteInput("features").into());
            }
        }
    }

    let splits = folds.split(target.len())?;
    let mut total = 0.0;
    for split in &splits {
        let train_x = features.select_rows(&split.train);
        let train_y: Vec<f64> = split.train.iter().map(|&i| target[i]).collect();
        let test_x = features.select_rows(&split.test);
        let test_y: Vec<f64> = split.test.iter().map(|&i| target[i]).collect();

        let model = LinearRegression::fit(&train_x, &train_y)?;
        total += r2_score(&test_y, &model.predict(&test_x));
    }

    Ok(total / splits.len() as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fit_recovers_exact_line() {
        let x = FeatureMatrix::from_vector(&[1.0, 2.0, 3.0, 4.0, 5.0]);
        let y = [3.0, 5.0, 7.0, 9.0, 11.0];
        let model = LinearRegression::fit(&x, &y).unwrap();
        assert!((model.coefficients()[0] - 2.0).abs() < 1e-9);
        assert!((model.intercept() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_collinear_columns_still_fit() {
        // Second column duplicates the first
        let cols = vec![vec![1.0, 2.0, 3.0, 4.0], vec![1.0, 2.0, 3.0, 4.0]];
        let x = FeatureMatrix::from_columns(&cols).unwrap();
        let y = [2.0, 4.0, 6.0, 8.0];
        let model = LinearRegression::fit(&x, &y).unwrap();
        let pred = model.predict(&x);
        for (p, t) in pred.iter().zip(y.iter()) {
            assert!((p - t).abs() < 1e-9);
        }
    }

    #[test]
    fn test_constant_column_gets_zero_coefficient() {
        let cols = vec![vec![7.0; 4], vec![1.0, 2.0, 3.0, 4.0]];
        let x = FeatureMatrix::from_columns(&cols).unwrap();
        let model = LinearRegression::fit(&x, &[1.0, 2.0, 3.0, 4.0]).unwrap();
        assert_eq!(model.coefficients()[0], 0.0);
    }

    #[test]
    fn test_r2_score_values() {
        assert_eq!(r2_score(&[1.0, 2.0, 3.0], &[1.0, 2.0, 3.0]), 1.0);
        assert_eq!(r2_score(&[1.0, 2.0, 3.0], &[2.0, 2.0, 2.0]), 0.0);
        assert_eq!(r2_score(&[4.0, 4.0], &[4.0, 4.0]), 1.0);
        assert_eq!(r2_score(&[4.0, 4.0], &[4.0, 5.0]), 0.0);
    }

    #[test]
    fn test_kfold_sizes_and_coverage() {
        let splits = KFold::new(3).with_shuffle(false).split(10).unwrap();
        let sizes: Vec<usize> = splits.iter().map(|s| s.test.len()).collect();
        assert_eq!(sizes, vec![4, 3, 3]);
        assert_eq!(splits[0].test, vec![0, 1, 2, 3]);

        let mut seen: Vec<usize> = splits.iter().flat_map(|s| s.test.clone()).collect();
        seen.sort_unstable();
        assert_eq!(seen, (0..10).collect::<Vec<_>>());
        for split in &splits {
            assert_eq!(split.train.len() + split.test.len(), 10);
        }
    }

    #[test]
    fn test_kfold_seed_is_deterministic() {
        let a = KFold::new(4).with_seed(7).split(20).unwrap();
        let b = KFold::new(4).with_seed(7).split(20).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_kfold_rejects_too_few_samples() {
        let err = KFold::new(5).split(3).unwrap_err();
        assert_eq!(
            err.downcast_ref::<QualityError>(),
            Some(&QualityError::InsufficientSamples { samples: 3, folds: 5 })
        );
    }

    #[test]
    fn test_cross_val_rejects_nan_target() {
        let x = FeatureMatrix::from_vector(&[1.0, 2.0, 3.0, 4.0, 5.0]);
        let err = cross_val_r2(&x, &[1.0, f64::NAN, 3.0, 4.0, 5.0], &KFold::default()).unwrap_err();
        assert!(err.to_string().contains("non-finite"));
    }

    #[test]
    fn test_filter_rows() {
        let x = FeatureMatrix::from_vector(&[1.0, 2.0, 3.0]);
        let filtered = x.filter_rows(&[true, false, true]).unwrap();
        assert_eq!(filtered.nrows(), 2);
        assert_eq!(filtered.get(1, 0), 3.0);
    }
}
