use crate::support::SupportError;

/// Selects the somatic posterior cutoff maximizing the posterior expected F-beta score.
///
/// Calling the `k` highest posteriors somatic has expected score
/// `(1 + beta^2) * S_k / (beta^2 * S_n + k)`, where `S_k` sums the top `k` posteriors.
/// The posterior at the best `k` is returned; on ties the smallest `k`, i.e. the
/// highest threshold, wins.
pub fn select_threshold(posteriors: &[f64], beta: f64) -> Result<f64, SupportError> {
    let mut sorted = posteriors.to_vec();
    sorted.sort_unstable_by(|a, b| b.total_cmp(a));
    let first = *sorted.first().ok_or(SupportError::EmptyInput)?;

    let beta2 = beta * beta;
    let total = beta2 * sorted.iter().sum::<f64>();

    let mut cumulative = first;
    let mut best_score = (1.0 + beta2) * cumulative / (total + 1.0);
    let mut threshold = first;
    for (k, &posterior) in sorted.iter().enumerate().skip(1) {
        cumulative += posterior;
        let score = (1.0 + beta2) * cumulative / (total + (k + 1) as f64);
        log::trace!("k={} F={:.6} p={:.6}", k + 1, score, posterior);
        if score > best_score {
            best_score = score;
            threshold = posterior;
        }
    }
    log::debug!(
        "Expected F-score {:.6} at posterior threshold {:.6}",
        best_score,
        threshold
    );
    Ok(threshold)
}
