//! This file defines some functions that checks some pre-conditions
//! E.g., hyperparameters and ratios given by the caller.

use crate::error::{Result, TreeError};
use crate::tree::TreeParams;


/// Check whether the hyperparameters are valid or not.
#[inline(always)]
pub(crate) fn params(params: &TreeParams) -> Result<()> {
    if params.min_n == 0 {
        return Err(TreeError::invalid("`min_n` must be positive"));
    }

    let decrease = params.min_impurity_decrease;
    if !decrease.is_finite() || decrease < 0f64 {
        return Err(TreeError::invalid(format!(
            "`min_impurity_decrease` must be a non-negative number. \
             got {decrease}."
        )));
    }

    if params.max_nodes == Some(0) {
        return Err(TreeError::invalid("`max_nodes` must be positive"));
    }
    Ok(())
}


/// Check the ratio of training examples.
#[inline(always)]
pub(crate) fn train_ratio(ratio: f64) -> Result<()> {
    if 0f64 < ratio && ratio < 1f64 {
        Ok(())
    } else {
        Err(TreeError::invalid(
            format!("training ratio must be in (0, 1). got {ratio}.")
        ))
    }
}


/// Check the number of folds for `n_examples` examples.
#[inline(always)]
pub(crate) fn n_folds(n_folds: usize, n_examples: usize) -> Result<()> {
    if n_folds < 2 {
        return Err(TreeError::invalid(
            format!("cross validation needs 2 folds or more. got {n_folds}.")
        ));
    }
    if n_folds > n_examples {
        return Err(TreeError::invalid(format!(
            "cannot make {n_folds} folds from {n_examples} examples"
        )));
    }
    Ok(())
}
