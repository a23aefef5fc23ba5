/// Arithmetic mean.
pub fn mean(data: &[f64]) -> Option<f64> {
    if data.is_empty() {
        return None;
    }
    Some(data.iter().sum::<f64>() / data.len() as f64)
}

/// Median, averaging the two middle values for an even number of values.
pub fn median(data: &[f64]) -> Option<f64> {
    if data.is_empty() {
        return None;
    }
    let mut sorted = data.to_vec();
    sorted.sort_by(f64::total_cmp);
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 1 {
        Some(sorted[mid])
    } else {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    }
}

/// The most frequent value; ties go to the value that occurs first.
pub fn mode(data: &[f64]) -> Option<f64> {
    let mut best: Option<(f64, usize)> = None;
    for &value in data {
        let count = data.iter().filter(|&&other| other == value).count();
        if best.is_none_or(|(_, best_count)| count > best_count) {
            best = Some((value, count));
        }
    }
    best.map(|(value, _)| value)
}

fn squared_deviations(data: &[f64]) -> Option<f64> {
    let mean = mean(data)?;
    Some(data.iter().map(|x| (x - mean).powi(2)).sum())
}

/// Sample variance.
pub fn variance(data: &[f64]) -> Option<f64> {
    if data.len() < 2 {
        return None;
    }
    Some(squared_deviations(data)? / (data.len() - 1) as f64)
}

/// Population variance.
pub fn pvariance(data: &[f64]) -> Option<f64> {
    Some(squared_deviations(data)? / data.len() as f64)
}

/// Sample standard deviation.
pub fn stdev(data: &[f64]) -> Option<f64> {
    variance(data).map(f64::sqrt)
}

/// Population standard deviation.
pub fn pstdev(data: &[f64]) -> Option<f64> {
    pvariance(data).map(f64::sqrt)
}

fn cross_deviations(xs: &[f64], ys: &[f64]) -> Option<f64> {
    if xs.len() != ys.len() {
        return None;
    }
    let mean_x = mean(xs)?;
    let mean_y = mean(ys)?;
    Some(
        xs.iter()
            .zip(ys)
            .map(|(x, y)| (x - mean_x) * (y - mean_y))
            .sum(),
    )
}

/// Sample covariance of two equally long samples.
pub fn covariance(xs: &[f64], ys: &[f64]) -> Option<f64> {
    if xs.len() < 2 {
        return None;
    }
    Some(cross_deviations(xs, ys)? / (xs.len() - 1) as f64)
}

/// Pearson's correlation coefficient.
pub fn correlation(xs: &[f64], ys: &[f64]) -> Option<f64> {
    let denominator = (squared_deviations(xs)? * squared_deviations(ys)?).sqrt();
    if denominator == 0.0 {
        return None;
    }
    Some(cross_deviations(xs, ys)? / denominator)
}

/// Geometric mean of positive values.
pub fn geometric_mean(data: &[f64]) -> Option<f64> {
    if data.is_empty() || data.iter().any(|&x| x <= 0.0) {
        return None;
    }
    Some((data.iter().map(|x| x.ln()).sum::<f64>() / data.len() as f64).exp())
}

/// Harmonic mean of non-negative values, zero if any value is zero.
pub fn harmonic_mean(data: &[f64]) -> Option<f64> {
    if data.is_empty() || data.iter().any(|&x| x < 0.0) {
        return None;
    }
    if data.contains(&0.0) {
        return Some(0.0);
    }
    Some(data.len() as f64 / data.iter().map(|x| 1.0 / x).sum::<f64>())
}

/// Slope and intercept of the least squares line through `(xs[i], ys[i])`.
pub fn linear_regression(xs: &[f64], ys: &[f64]) -> Option<[f64; 2]> {
    let spread = squared_deviations(xs)?;
    if spread == 0.0 {
        return None;
    }
    let slope = cross_deviations(xs, ys)? / spread;
    Some([slope, mean(ys)? - slope * mean(xs)?])
}
