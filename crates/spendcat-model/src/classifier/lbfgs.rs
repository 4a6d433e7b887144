//! Limited-memory BFGS minimizer with backtracking Armijo line search.
//!
//! Deterministic: no randomness, fixed summation order. Stops when the
//! max-abs gradient component drops under `tolerance`, when the relative
//! objective decrease stalls, or at `max_iterations`.

use std::collections::VecDeque;

use spendcat_core::errors::TrainingError;

/// Sufficient-decrease constant for the Armijo condition.
const ARMIJO_C1: f64 = 1e-4;
/// Maximum step halvings per line search.
const MAX_BACKTRACKS: usize = 40;
/// Relative objective decrease treated as stalled (scipy's factr=1e7 * eps).
const STALL_FTOL: f64 = 2.220446049250313e-9;
/// Curvature pairs with `s·y` at or below this are not stored.
const MIN_CURVATURE: f64 = 1e-12;

/// Optimizer settings.
#[derive(Debug, Clone, Copy)]
pub struct LbfgsSettings {
    pub max_iterations: usize,
    pub tolerance: f64,
    pub history_size: usize,
}

/// Why the optimizer stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// Gradient fell under the tolerance.
    GradientTolerance,
    /// Objective stopped decreasing meaningfully.
    Stalled,
    /// No step along the search direction decreased the objective.
    LineSearchFailed,
    /// Iteration cap reached.
    MaxIterations,
}

impl StopReason {
    pub fn converged(&self) -> bool {
        matches!(self, Self::GradientTolerance | Self::Stalled)
    }
}

/// Result of a minimization.
#[derive(Debug, Clone)]
pub struct LbfgsOutcome {
    pub x: Vec<f64>,
    pub objective: f64,
    pub iterations: usize,
    pub stop_reason: StopReason,
}

struct CorrectionPair {
    s: Vec<f64>,
    y: Vec<f64>,
    rho: f64,
}

/// Minimize `f` starting from `x0`.
///
/// `f(x, grad)` returns the objective at `x` and writes the gradient into
/// `grad` (same length as `x`).
pub fn minimize<F>(
    mut f: F,
    x0: Vec<f64>,
    settings: &LbfgsSettings,
) -> Result<LbfgsOutcome, TrainingError>
where
    F: FnMut(&[f64], &mut [f64]) -> f64,
{
    let n = x0.len();
    let mut x = x0;
    let mut grad = vec![0.0; n];
    let mut fx = f(&x, &mut grad);
    if !fx.is_finite() {
        return Err(TrainingError::NonFiniteObjective { iteration: 0 });
    }
    if max_abs(&grad) <= settings.tolerance {
        return Ok(LbfgsOutcome {
            x,
            objective: fx,
            iterations: 0,
            stop_reason: StopReason::GradientTolerance,
        });
    }

    let history_size = settings.history_size.max(1);
    let mut history: VecDeque<CorrectionPair> = VecDeque::with_capacity(history_size);
    let mut direction = vec![0.0; n];
    let mut x_new = vec![0.0; n];
    let mut grad_new = vec![0.0; n];
    let mut alpha_scratch = vec![0.0; history_size];

    for iteration in 1..=settings.max_iterations {
        two_loop(&grad, &history, &mut direction, &mut alpha_scratch);
        let mut slope = dot(&direction, &grad);
        if slope >= 0.0 {
            // Curvature information went stale; restart from steepest descent.
            history.clear();
            for (d, g) in direction.iter_mut().zip(&grad) {
                *d = -g;
            }
            slope = -dot(&grad, &grad);
        }

        let mut step = if history.is_empty() {
            (1.0 / norm(&grad)).min(1.0)
        } else {
            1.0
        };

        let mut accepted = None;
        for _ in 0..MAX_BACKTRACKS {
            for i in 0..n {
                x_new[i] = x[i] + step * direction[i];
            }
            let f_new = f(&x_new, &mut grad_new);
            if f_new.is_finite() && f_new <= fx + ARMIJO_C1 * step * slope {
                accepted = Some(f_new);
                break;
            }
            step *= 0.5;
        }

        let Some(f_new) = accepted else {
            tracing::debug!(iteration, objective = fx, "line search failed to find a decrease");
            return Ok(LbfgsOutcome {
                x,
                objective: fx,
                iterations: iteration - 1,
                stop_reason: StopReason::LineSearchFailed,
            });
        };

        let s: Vec<f64> = x_new.iter().zip(&x).map(|(a, b)| a - b).collect();
        let y: Vec<f64> = grad_new.iter().zip(&grad).map(|(a, b)| a - b).collect();
        let sy = dot(&s, &y);
        if sy > MIN_CURVATURE {
            if history.len() == history_size {
                history.pop_front();
            }
            history.push_back(CorrectionPair { s, y, rho: 1.0 / sy });
        }

        let f_old = fx;
        std::mem::swap(&mut x, &mut x_new);
        std::mem::swap(&mut grad, &mut grad_new);
        fx = f_new;

        if max_abs(&grad) <= settings.tolerance {
            return Ok(LbfgsOutcome {
                x,
                objective: fx,
                iterations: iteration,
                stop_reason: StopReason::GradientTolerance,
            });
        }
        let scale = f_old.abs().max(fx.abs()).max(1.0);
        if (f_old - fx) / scale <= STALL_FTOL {
            return Ok(LbfgsOutcome {
                x,
                objective: fx,
                iterations: iteration,
                stop_reason: StopReason::Stalled,
            });
        }
    }

    Ok(LbfgsOutcome {
        x,
        objective: fx,
        iterations: settings.max_iterations,
        stop_reason: StopReason::MaxIterations,
    })
}

/// Two-loop recursion: `direction = -H · grad`.
fn two_loop(
    grad: &[f64],
    history: &VecDeque<CorrectionPair>,
    direction: &mut [f64],
    alpha: &mut [f64],
) {
    for (d, g) in direction.iter_mut().zip(grad) {
        *d = -g;
    }
    for (k, pair) in history.iter().enumerate().rev() {
        let a = pair.rho * dot(&pair.s, direction);
        alpha[k] = a;
        axpy(-a, &pair.y, direction);
    }
    if let Some(last) = history.back() {
        let gamma = dot(&last.s, &last.y) / dot(&last.y, &last.y);
        for d in direction.iter_mut() {
            *d *= gamma;
        }
    }
    for (k, pair) in history.iter().enumerate() {
        let b = pair.rho * dot(&pair.y, direction);
        axpy(alpha[k] - b, &pair.s, direction);
    }
}

fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

fn norm(a: &[f64]) -> f64 {
    dot(a, a).sqrt()
}

fn max_abs(a: &[f64]) -> f64 {
    a.iter().fold(0.0, |m, v| m.max(v.abs()))
}

/// `y += a * x`
fn axpy(a: f64, x: &[f64], y: &mut [f64]) {
    for (yi, xi) in y.iter_mut().zip(x) {
        *yi += a * xi;
    }
}
