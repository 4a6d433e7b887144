//! Class-weighted, L2-regularized multinomial cross-entropy.
//!
//! Parameter layout: `K` consecutive blocks of `D + 1` values, one per class,
//! holding the weight row followed by the intercept. Intercepts are not
//! penalized.

use crate::features::FeatureVector;

use super::softmax_in_place;

pub(crate) struct SoftmaxObjective<'a> {
    features: &'a [FeatureVector],
    /// Dense class index per sample.
    targets: &'a [usize],
    /// Balanced weight per sample.
    sample_weights: Vec<f64>,
    total_weight: f64,
    n_classes: usize,
    n_features: usize,
    /// `1 / (C · total_weight)`; scales the penalty to match the mean loss.
    l2: f64,
}

impl<'a> SoftmaxObjective<'a> {
    pub(crate) fn new(
        features: &'a [FeatureVector],
        targets: &'a [usize],
        n_classes: usize,
        n_features: usize,
        regularization: f64,
    ) -> Self {
        let sample_weights = balanced_weights(targets, n_classes);
        let total_weight: f64 = sample_weights.iter().sum();
        Self {
            features,
            targets,
            sample_weights,
            total_weight,
            n_classes,
            n_features,
            l2: 1.0 / (regularization * total_weight),
        }
    }

    pub(crate) fn dimension(&self) -> usize {
        self.n_classes * (self.n_features + 1)
    }

    pub(crate) fn stride(&self) -> usize {
        self.n_features + 1
    }

    /// Objective value at `theta`; gradient written to `grad`.
    pub(crate) fn evaluate(&self, theta: &[f64], grad: &mut [f64]) -> f64 {
        let stride = self.stride();
        let d = self.n_features;
        grad.fill(0.0);

        let mut loss = 0.0;
        let mut probs = vec![0.0; self.n_classes];
        for ((x, &target), &weight) in self
            .features
            .iter()
            .zip(self.targets)
            .zip(&self.sample_weights)
        {
            for (k, p) in probs.iter_mut().enumerate() {
                let block = &theta[k * stride..(k + 1) * stride];
                *p = x.dot(&block[..d]) + block[d];
            }
            let target_score = probs[target];
            let log_norm = softmax_in_place(&mut probs);
            loss += weight * (log_norm - target_score);

            let scale = weight / self.total_weight;
            for (k, &p) in probs.iter().enumerate() {
                let residual = scale * (p - if k == target { 1.0 } else { 0.0 });
                if residual == 0.0 {
                    continue;
                }
                let block = &mut grad[k * stride..(k + 1) * stride];
                for &(idx, value) in x.entries() {
                    block[idx as usize] += residual * value;
                }
                block[d] += residual;
            }
        }
        loss /= self.total_weight;

        let mut penalty = 0.0;
        for k in 0..self.n_classes {
            let base = k * stride;
            for j in 0..d {
                let w = theta[base + j];
                penalty += w * w;
                grad[base + j] += self.l2 * w;
            }
        }

        loss + 0.5 * self.l2 * penalty
    }
}

/// `n_samples / (n_classes · count(class))` per sample.
pub(crate) fn balanced_weights(targets: &[usize], n_classes: usize) -> Vec<f64> {
    let mut counts = vec![0usize; n_classes];
    for &t in targets {
        counts[t] += 1;
    }
    let n = targets.len() as f64;
    let k = counts.iter().filter(|&&c| c > 0).count() as f64;
    targets
        .iter()
        .map(|&t| n / (k * counts[t] as f64))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::NgramVectorizer;

    #[test]
    fn balanced_weights_equalize_class_mass() {
        let targets = [0, 0, 0, 1];
        let w = balanced_weights(&targets, 2);
        let class0: f64 = w[..3].iter().sum();
        let class1: f64 = w[3];
        assert!((class0 - class1).abs() < 1e-12);
        assert!((w.iter().sum::<f64>() - 4.0).abs() < 1e-12);
    }

    #[test]
    fn gradient_matches_finite_differences() {
        let texts = ["java house coffee", "uber trip cbd", "kplc tokens", "uber eats"];
        let (vocab, features) = NgramVectorizer::default().fit_transform(&texts).unwrap();
        let targets = [0, 1, 2, 0];
        let objective = SoftmaxObjective::new(&features, &targets, 3, vocab.len(), 5.0);

        let theta: Vec<f64> = (0..objective.dimension())
            .map(|i| ((i * 7919) % 13) as f64 * 0.01 - 0.06)
            .collect();
        let mut grad = vec![0.0; theta.len()];
        objective.evaluate(&theta, &mut grad);

        let eps = 1e-6;
        let mut scratch = vec![0.0; theta.len()];
        for i in (0..theta.len()).step_by(theta.len() / 17 + 1) {
            let mut plus = theta.clone();
            plus[i] += eps;
            let mut minus = theta.clone();
            minus[i] -= eps;
            let numeric = (objective.evaluate(&plus, &mut scratch)
                - objective.evaluate(&minus, &mut scratch))
                / (2.0 * eps);
            assert!(
                (numeric - grad[i]).abs() < 1e-6,
                "component {i}: analytic {} vs numeric {numeric}",
                grad[i]
            );
        }
    }

    #[test]
    fn zero_parameters_give_log_k_loss() {
        let (vocab, features) = NgramVectorizer::default()
            .fit_transform(&["a b", "c d"])
            .unwrap();
        let targets = [0, 1];
        let objective = SoftmaxObjective::new(&features, &targets, 2, vocab.len(), 5.0);
        let theta = vec![0.0; objective.dimension()];
        let mut grad = vec![0.0; theta.len()];
        let f = objective.evaluate(&theta, &mut grad);
        assert!((f - 2f64.ln()).abs() < 1e-12);
    }
}
