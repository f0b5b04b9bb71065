//! Decision tree regressor

use ndarray::{Array1, Array2, ArrayView1};
use rand::SeedableRng;
use rand::seq::SliceRandom;
use rand_chacha::ChaCha8Rng;

use super::error::{PipelineError, Result};

/// A regression model that can be trained and queried.
pub trait Regressor {
    /// Train on `x` (rows × features) and `y` (one target per row).
    fn fit(&mut self, x: &Array2<f64>, y: &Array1<f64>) -> Result<()>;

    /// One prediction per row of `x`.
    fn predict(&self, x: &Array2<f64>) -> Result<Array1<f64>>;
}

/// Decision tree node
#[derive(Debug, Clone)]
pub enum TreeNode {
    /// Leaf node with prediction value
    Leaf { value: f64 },
    /// Internal node with split
    Split {
        feature_idx: usize,
        threshold: f64,
        left: Box<TreeNode>,
        right: Box<TreeNode>,
    },
}

/// Best split found for a node.
struct SplitCandidate {
    feature_idx: usize,
    threshold: f64,
    /// `sum_l² / n_l + sum_r² / n_r`; larger means lower weighted variance.
    proxy: f64,
}

/// Regression tree grown with the squared-error criterion.
#[derive(Debug, Clone)]
pub struct RegressionTree {
    root: Option<TreeNode>,
    /// Maximum depth (unlimited when `None`)
    pub max_depth: Option<usize>,
    /// Minimum samples to split
    pub min_samples_split: usize,
    /// Minimum samples in leaf
    pub min_samples_leaf: usize,
    /// Seed for the per-node feature order
    pub random_state: u64,
    n_features: usize,
    feature_importances: Option<Array1<f64>>,
}

impl RegressionTree {
    pub fn new(random_state: u64) -> Self {
        Self {
            root: None,
            max_depth: None,
            min_samples_split: 2,
            min_samples_leaf: 1,
            random_state,
            n_features: 0,
            feature_importances: None,
        }
    }

    /// Set maximum depth
    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = Some(depth);
        self
    }

    fn build(
        &self,
        x: &Array2<f64>,
        y: &Array1<f64>,
        indices: &[usize],
        depth: usize,
        rng: &mut ChaCha8Rng,
        importances: &mut [f64],
    ) -> TreeNode {
        let n_samples = indices.len();
        let (sum, sq_sum) = sums(y, indices);
        let value = sum / n_samples as f64;
        let impurity = variance(n_samples, sum, sq_sum);

        let should_stop = n_samples < self.min_samples_split
            || n_samples < 2 * self.min_samples_leaf
            || self.max_depth.is_some_and(|d| depth >= d)
            || impurity <= f64::EPSILON;
        if should_stop {
            return TreeNode::Leaf { value };
        }

        let Some(best) = self.find_best_split(x, y, indices, rng) else {
            return TreeNode::Leaf { value };
        };

        let (left_idx, right_idx): (Vec<usize>, Vec<usize>) = indices
            .iter()
            .partition(|&&i| x[[i, best.feature_idx]] <= best.threshold);

        let (l_sum, l_sq) = sums(y, &left_idx);
        let (r_sum, r_sq) = sums(y, &right_idx);
        importances[best.feature_idx] += n_samples as f64 * impurity
            - left_idx.len() as f64 * variance(left_idx.len(), l_sum, l_sq)
            - right_idx.len() as f64 * variance(right_idx.len(), r_sum, r_sq);

        let left = Box::new(self.build(x, y, &left_idx, depth + 1, rng, importances));
        let right = Box::new(self.build(x, y, &right_idx, depth + 1, rng, importances));

        TreeNode::Split {
            feature_idx: best.feature_idx,
            threshold: best.threshold,
            left,
            right,
        }
    }

    /// Scan every feature (in a seeded random order) for the threshold that
    /// minimizes the weighted child variance. Ties keep the first candidate.
    fn find_best_split(
        &self,
        x: &Array2<f64>,
        y: &Array1<f64>,
        indices: &[usize],
        rng: &mut ChaCha8Rng,
    ) -> Option<SplitCandidate> {
        let n = indices.len();
        let mut features: Vec<usize> = (0..x.ncols()).collect();
        features.shuffle(rng);

        let mut best: Option<SplitCandidate> = None;
        let mut pairs: Vec<(f64, f64)> = Vec::with_capacity(n);

        for feature_idx in features {
            pairs.clear();
            pairs.extend(indices.iter().map(|&i| (x[[i, feature_idx]], y[i])));
            pairs.sort_by(|a, b| a.0.total_cmp(&b.0));

            if pairs[0].0 == pairs[n - 1].0 {
                continue;
            }

            let total: f64 = pairs.iter().map(|p| p.1).sum();
            let mut left_sum = 0.0;

            for pos in 0..n - 1 {
                left_sum += pairs[pos].1;
                let n_left = pos + 1;
                let n_right = n - n_left;

                if pairs[pos].0 == pairs[pos + 1].0 {
                    continue;
                }
                if n_left < self.min_samples_leaf || n_right < self.min_samples_leaf {
                    continue;
                }

                let right_sum = total - left_sum;
                let proxy =
                    left_sum * left_sum / n_left as f64 + right_sum * right_sum / n_right as f64;

                if best.as_ref().map_or(true, |b| proxy > b.proxy) {
                    let (lo, hi) = (pairs[pos].0, pairs[pos + 1].0);
                    let mut threshold = lo / 2.0 + hi / 2.0;
                    if threshold >= hi || !threshold.is_finite() {
                        threshold = lo;
                    }
                    best = Some(SplitCandidate {
                        feature_idx,
                        threshold,
                        proxy,
                    });
                }
            }
        }

        best
    }

    fn predict_sample(node: &TreeNode, sample: ArrayView1<f64>) -> f64 {
        match node {
            TreeNode::Leaf { value, .. } => *value,
            TreeNode::Split {
                feature_idx,
                threshold,
                left,
                right,
                ..
            } => {
                if sample[*feature_idx] <= *threshold {
                    Self::predict_sample(left, sample)
                } else {
                    Self::predict_sample(right, sample)
                }
            }
        }
    }

    /// Normalized impurity decrease per feature.
    pub fn feature_importances(&self) -> Option<&Array1<f64>> {
        self.feature_importances.as_ref()
    }

    /// Number of edges on the longest root-to-leaf path.
    pub fn depth(&self) -> usize {
        fn node_depth(node: &TreeNode) -> usize {
            match node {
                TreeNode::Leaf { .. } => 0,
                TreeNode::Split { left, right, .. } => 1 + node_depth(left).max(node_depth(right)),
            }
        }
        self.root.as_ref().map_or(0, node_depth)
    }

    pub fn n_leaves(&self) -> usize {
        fn count(node: &TreeNode) -> usize {
            match node {
                TreeNode::Leaf { .. } => 1,
                TreeNode::Split { left, right, .. } => count(left) + count(right),
            }
        }
        self.root.as_ref().map_or(0, count)
    }
}

impl Regressor for RegressionTree {
    fn fit(&mut self, x: &Array2<f64>, y: &Array1<f64>) -> Result<()> {
        let n_samples = x.nrows();
        if n_samples != y.len() {
            return Err(PipelineError::ShapeMismatch {
                expected: format!("y length = {n_samples}"),
                actual: format!("y length = {}", y.len()),
            });
        }
        if n_samples == 0 {
            return Err(PipelineError::NotEnoughRows {
                required: 1,
                actual: 0,
            });
        }

        self.n_features = x.ncols();
        let mut importances = vec![0.0; self.n_features];
        let mut rng = ChaCha8Rng::seed_from_u64(self.random_state);
        let indices: Vec<usize> = (0..n_samples).collect();

        let root = self.build(x, y, &indices, 0, &mut rng, &mut importances);
        self.root = Some(root);

        let total: f64 = importances.iter().sum();
        if total > 0.0 {
            for imp in &mut importances {
                *imp /= total;
            }
        }
        self.feature_importances = Some(Array1::from_vec(importances));

        log::debug!(
            "Fitted regression tree on {n_samples} rows: depth {}, {} leaves",
            self.depth(),
            self.n_leaves()
        );
        Ok(())
    }

    fn predict(&self, x: &Array2<f64>) -> Result<Array1<f64>> {
        let root = self.root.as_ref().ok_or(PipelineError::ModelNotFitted)?;
        if x.ncols() != self.n_features {
            return Err(PipelineError::ShapeMismatch {
                expected: format!("{} features", self.n_features),
                actual: format!("{} features", x.ncols()),
            });
        }
        Ok(x.rows()
            .into_iter()
            .map(|row| Self::predict_sample(root, row))
            .collect())
    }
}

fn sums(y: &Array1<f64>, indices: &[usize]) -> (f64, f64) {
    indices
        .iter()
        .fold((0.0, 0.0), |(s, sq), &i| (s + y[i], sq + y[i] * y[i]))
}

/// Var = E[X²] - E[X]², clamped at zero against rounding.
fn variance(n: usize, sum: f64, sq_sum: f64) -> f64 {
    if n == 0 {
        return 0.0;
    }
    let n = n as f64;
    (sq_sum / n - (sum / n).powi(2)).max(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_fits_training_data_exactly() {
        let x = array![[1.0], [2.0], [3.0], [4.0], [5.0]];
        let y = array![1.0, 4.0, 9.0, 16.0, 25.0];

        let mut tree = RegressionTree::new(42);
        tree.fit(&x, &y).unwrap();

        assert_eq!(tree.predict(&x).unwrap(), y);
        assert_eq!(tree.n_leaves(), 5);
    }

    #[test]
    fn test_step_function() {
        let x = array![[0.0, 7.0], [1.0, 7.0], [2.0, 7.0], [10.0, 7.0], [11.0, 7.0], [12.0, 7.0]];
        let y = array![5.0, 5.0, 5.0, 50.0, 50.0, 50.0];

        let mut tree = RegressionTree::new(42);
        tree.fit(&x, &y).unwrap();

        assert_eq!(tree.depth(), 1);
        let pred = tree.predict(&array![[-3.0, 0.0], [6.5, 0.0], [100.0, 0.0]]).unwrap();
        assert_eq!(pred.to_vec(), vec![5.0, 50.0, 50.0]);

        let importances = tree.feature_importances().unwrap();
        assert!((importances[0] - 1.0).abs() < 1e-12);
        assert_eq!(importances[1], 0.0);
    }

    #[test]
    fn test_constant_target_is_single_leaf() {
        let x = array![[1.0], [2.0], [3.0]];
        let y = array![4.0, 4.0, 4.0];
        let mut tree = RegressionTree::new(0);
        tree.fit(&x, &y).unwrap();
        assert_eq!(tree.depth(), 0);
        assert_eq!(tree.predict(&array![[9.0]]).unwrap().to_vec(), vec![4.0]);
    }

    #[test]
    fn test_duplicate_features_average_targets() {
        let x = array![[1.0], [1.0], [2.0]];
        let y = array![2.0, 4.0, 10.0];
        let mut tree = RegressionTree::new(42);
        tree.fit(&x, &y).unwrap();
        assert_eq!(tree.predict(&array![[1.0]]).unwrap().to_vec(), vec![3.0]);
    }

    #[test]
    fn test_max_depth() {
        let x = array![[1.0], [2.0], [3.0], [4.0], [5.0], [6.0], [7.0], [8.0]];
        let y = array![1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0];
        let mut tree = RegressionTree::new(42).with_max_depth(2);
        tree.fit(&x, &y).unwrap();
        assert!(tree.depth() <= 2);
        assert!(tree.n_leaves() <= 4);
    }

    #[test]
    fn test_same_seed_same_tree() {
        let x = array![[1.0, 1.0], [2.0, 2.0], [3.0, 3.0], [4.0, 4.0]];
        let y = array![1.0, 3.0, 2.0, 8.0];
        let probe = array![[1.5, 3.5], [3.5, 1.5], [2.5, 2.5]];

        let mut a = RegressionTree::new(42);
        let mut b = RegressionTree::new(42);
        a.fit(&x, &y).unwrap();
        b.fit(&x, &y).unwrap();
        assert_eq!(a.predict(&probe).unwrap(), b.predict(&probe).unwrap());
    }

    #[test]
    fn test_single_sample() {
        let mut tree = RegressionTree::new(42);
        tree.fit(&array![[3.0]], &array![7.0]).unwrap();
        assert_eq!(tree.predict(&array![[0.0]]).unwrap().to_vec(), vec![7.0]);
    }

    #[test]
    fn test_errors() {
        let tree = RegressionTree::new(42);
        assert_eq!(tree.predict(&array![[1.0]]), Err(PipelineError::ModelNotFitted));

        let mut tree = RegressionTree::new(42);
        assert!(tree.fit(&array![[1.0], [2.0]], &array![1.0]).is_err());

        tree.fit(&array![[1.0], [2.0]], &array![1.0, 2.0]).unwrap();
        assert!(matches!(
            tree.predict(&array![[1.0, 2.0]]),
            Err(PipelineError::ShapeMismatch { .. })
        ));
    }
}
