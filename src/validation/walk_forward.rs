use crate::metrics::sharpe_ratio;
use serde::{Deserialize, Serialize};

//one fold: trades [0, is_end) in sample, [is_end, oos_end) out of sample
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoldResult {
    pub fold: usize,
    pub is_trades: usize,
    pub oos_trades: usize,
    pub is_sharpe: f64,
    pub oos_sharpe: f64,
    pub oos_pnl: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WalkForwardResult {
    pub folds: Vec<FoldResult>,

    //fraction of out-of-sample folds with positive pnl
    pub consistency: f64,

    //mean oos sharpe / mean is sharpe, 0 when the is mean is 0
    pub degradation_ratio: f64,
}

//splits the chronological trade sequence into folds + 1 segments with an expanding
//in-sample window, each fold tested on the segment that follows it
pub fn walk_forward(pnls: &[f64], folds: usize) -> WalkForwardResult {
    let segments = folds + 1;
    if folds == 0 || pnls.len() < segments {
        return WalkForwardResult::default();
    }

    let n = pnls.len();
    let boundary = |i: usize| i * n / segments;

    let folds: Vec<FoldResult> = (1..segments)
        .map(|k| {
            let (is, oos) = (&pnls[..boundary(k)], &pnls[boundary(k)..boundary(k + 1)]);
            FoldResult {
                fold: k,
                is_trades: is.len(),
                oos_trades: oos.len(),
                is_sharpe: sharpe_ratio(is),
                oos_sharpe: sharpe_ratio(oos),
                oos_pnl: oos.iter().sum(),
            }
        })
        .collect();

    let count = folds.len() as f64;
    let positive = folds.iter().filter(|f| f.oos_pnl > 0.0).count();
    let mean_is = folds.iter().map(|f| f.is_sharpe).sum::<f64>() / count;
    let mean_oos = folds.iter().map(|f| f.oos_sharpe).sum::<f64>() / count;

    WalkForwardResult {
        consistency: positive as f64 / count,
        degradation_ratio: if mean_is != 0.0 { mean_oos / mean_is } else { 0.0 },
        folds,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn folds_expand_and_cover_the_tail() {
        let pnls: Vec<f64> = (0..12).map(|i| i as f64).collect();
        let result = walk_forward(&pnls, 3);

        assert_eq!(result.folds.len(), 3);
        assert_eq!(
            result.folds.iter().map(|f| f.is_trades).collect::<Vec<_>>(),
            vec![3, 6, 9]
        );
        assert!(result.folds.iter().all(|f| f.oos_trades == 3));
        assert_eq!(result.consistency, 1.0);
    }

    #[test]
    fn too_few_trades_yields_nothing() {
        assert_eq!(walk_forward(&[1.0, 2.0], 5), WalkForwardResult::default());
    }

    #[test]
    fn losing_tail_lowers_consistency() {
        let mut pnls = vec![5.0; 10];
        pnls.extend(vec![-5.0; 5]);
        let result = walk_forward(&pnls, 2);
        //segments [0,5) [5,10) [10,15)
        assert_eq!(result.consistency, 0.5);
    }
}
