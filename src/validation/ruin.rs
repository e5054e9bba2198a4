use crate::metrics::PerformanceMetrics;

//probability of losing the whole account with a fixed fraction risked per trade
//(q/p)^(capital / risk unit); 1.0 when the expected edge is not positive
pub fn risk_of_ruin(win_rate: f64, avg_win: f64, avg_loss: f64, risk_fraction: f64) -> f64 {
    let p = (win_rate / 100.0).clamp(0.0, 1.0);
    let q = 1.0 - p;

    let edge = p * avg_win - q * avg_loss.abs();
    if edge <= 0.0 {
        return 1.0;
    }
    if q == 0.0 || risk_fraction <= 0.0 {
        return 0.0;
    }

    (q / p).powf(1.0 / risk_fraction).min(1.0)
}

pub fn risk_of_ruin_from_metrics(metrics: &PerformanceMetrics, risk_fraction: f64) -> f64 {
    risk_of_ruin(
        metrics.win_rate,
        metrics.avg_win,
        metrics.avg_loss,
        risk_fraction,
    )
}
