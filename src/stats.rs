//! Small numeric toolbox behind the charts: five-number summaries, Pearson correlation,
//! least-squares fit and a Gaussian KDE.
//!
//! NaN inputs are dropped; empty inputs yield `None`.

use serde::{Deserialize, Serialize};

/// Box-plot summary of one column (Tukey whiskers at 1.5 IQR).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Summary {
    pub count: usize,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    /// Lowest observation within `q1 - 1.5 * IQR`.
    pub whisker_low: f64,
    /// Highest observation within `q3 + 1.5 * IQR`.
    pub whisker_high: f64,
    pub outliers: Vec<f64>,
}

fn sorted_finite(values: &[f64]) -> Vec<f64> {
    let mut vals: Vec<f64> = values.iter().copied().filter(|v| !v.is_nan()).collect();
    vals.sort_by(f64::total_cmp);
    vals
}

/// Linear interpolation between closest ranks, on an ascending slice.
pub fn quantile_sorted(sorted: &[f64], q: f64) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }
    let pos = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    Some(sorted[lo] + (sorted[hi] - sorted[lo]) * (pos - lo as f64))
}

pub fn mean(values: &[f64]) -> Option<f64> {
    let vals: Vec<f64> = values.iter().copied().filter(|v| !v.is_nan()).collect();
    if vals.is_empty() {
        None
    } else {
        Some(vals.iter().sum::<f64>() / vals.len() as f64)
    }
}

/// Sample standard deviation (n - 1).
pub fn std_dev(values: &[f64]) -> Option<f64> {
    let vals: Vec<f64> = values.iter().copied().filter(|v| !v.is_nan()).collect();
    if vals.len() < 2 {
        return None;
    }
    let m = vals.iter().sum::<f64>() / vals.len() as f64;
    let var = vals.iter().map(|v| (v - m).powi(2)).sum::<f64>() / (vals.len() - 1) as f64;
    Some(var.sqrt())
}

pub fn summarize(values: &[f64]) -> Option<Summary> {
    let vals = sorted_finite(values);
    let count = vals.len();
    let (min, max) = (*vals.first()?, *vals.last()?);
    let q1 = quantile_sorted(&vals, 0.25)?;
    let median = quantile_sorted(&vals, 0.5)?;
    let q3 = quantile_sorted(&vals, 0.75)?;
    let iqr = q3 - q1;
    let (lo_fence, hi_fence) = (q1 - 1.5 * iqr, q3 + 1.5 * iqr);
    let whisker_low = vals.iter().copied().find(|v| *v >= lo_fence).unwrap_or(q1);
    let whisker_high = vals.iter().rev().copied().find(|v| *v <= hi_fence).unwrap_or(q3);
    let outliers = vals
        .iter()
        .copied()
        .filter(|v| *v < lo_fence || *v > hi_fence)
        .collect();
    Some(Summary {
        count,
        min,
        max,
        mean: vals.iter().sum::<f64>() / count as f64,
        q1,
        median,
        q3,
        whisker_low,
        whisker_high,
        outliers,
    })
}

/// Pearson correlation over pairs where both sides are finite.
/// `None` when fewer than two pairs or either side is constant.
pub fn pearson(xs: &[f64], ys: &[f64]) -> Option<f64> {
    let pairs: Vec<(f64, f64)> = xs
        .iter()
        .zip(ys)
        .map(|(x, y)| (*x, *y))
        .filter(|(x, y)| x.is_finite() && y.is_finite())
        .collect();
    if pairs.len() < 2 {
        return None;
    }
    let n = pairs.len() as f64;
    let mx = pairs.iter().map(|p| p.0).sum::<f64>() / n;
    let my = pairs.iter().map(|p| p.1).sum::<f64>() / n;
    let (mut sxy, mut sxx, mut syy) = (0.0, 0.0, 0.0);
    for (x, y) in &pairs {
        sxy += (x - mx) * (y - my);
        sxx += (x - mx).powi(2);
        syy += (y - my).powi(2);
    }
    if sxx == 0.0 || syy == 0.0 {
        return None;
    }
    Some((sxy / (sxx.sqrt() * syy.sqrt())).clamp(-1.0, 1.0))
}

/// Ordinary least squares `y = slope * x + intercept`.
pub fn linear_fit(xs: &[f64], ys: &[f64]) -> Option<(f64, f64)> {
    let pairs: Vec<(f64, f64)> = xs
        .iter()
        .zip(ys)
        .map(|(x, y)| (*x, *y))
        .filter(|(x, y)| x.is_finite() && y.is_finite())
        .collect();
    if pairs.len() < 2 {
        return None;
    }
    let n = pairs.len() as f64;
    let mx = pairs.iter().map(|p| p.0).sum::<f64>() / n;
    let my = pairs.iter().map(|p| p.1).sum::<f64>() / n;
    let sxx: f64 = pairs.iter().map(|(x, _)| (x - mx).powi(2)).sum();
    if sxx == 0.0 {
        return None;
    }
    let sxy: f64 = pairs.iter().map(|(x, y)| (x - mx) * (y - my)).sum();
    let slope = sxy / sxx;
    Some((slope, my - slope * mx))
}

/// Scott's rule bandwidth: `sigma * n^(-1/5)`.
pub fn scott_bandwidth(values: &[f64]) -> Option<f64> {
    let sd = std_dev(values)?;
    let n = values.iter().filter(|v| !v.is_nan()).count() as f64;
    let bw = sd * n.powf(-0.2);
    (bw > 0.0).then_some(bw)
}

/// Gaussian kernel density of `values` evaluated at each `grid` point.
///
/// Degenerate samples (single value or zero spread) fall back to a bandwidth of 1.
pub fn gaussian_kde(values: &[f64], grid: &[f64]) -> Vec<f64> {
    let vals: Vec<f64> = values.iter().copied().filter(|v| !v.is_nan()).collect();
    if vals.is_empty() {
        return vec![0.0; grid.len()];
    }
    let bw = scott_bandwidth(&vals).unwrap_or(1.0);
    let norm = 1.0 / (vals.len() as f64 * bw * (2.0 * std::f64::consts::PI).sqrt());
    grid.iter()
        .map(|g| {
            vals.iter()
                .map(|v| (-0.5 * ((g - v) / bw).powi(2)).exp())
                .sum::<f64>()
                * norm
        })
        .collect()
}
