//! Percentage-of-one-rep-max load prescription.

/// Smallest load increment available on a typical barbell (kg).
pub const DEFAULT_PLATE_STEP: f64 = 2.5;

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Snaps `value` to the nearest multiple of `step` (ties away from zero) and
/// normalizes the result to two decimals.
///
/// A step that is not a positive finite number leaves the value unsnapped.
pub fn round_to_step(value: f64, step: f64) -> f64 {
    if !(step.is_finite() && step > 0.0) {
        return round2(value);
    }
    round2((value / step).round() * step)
}

/// Weight prescribed by `percentage` of `one_rep_max`, snapped to loadable
/// increments of `step`. Zero when either input is zero or unusable.
pub fn calculate_weight(one_rep_max: f64, percentage: f64, step: f64) -> f64 {
    let usable = |v: f64| v.is_finite() && v > 0.0;
    if !usable(one_rep_max) || !usable(percentage) {
        return 0.0;
    }
    round_to_step(one_rep_max * percentage / 100.0, step)
}

/// A set's weight cell is read-only while it is prescribed as a percentage of
/// an existing one-rep max.
pub fn is_weight_locked(percentage: f64, one_rep_max: Option<f64>) -> bool {
    percentage > 0.0 && one_rep_max.is_some_and(|orm| orm > 0.0)
}

/// Weight to persist for a set: the derived weight while locked, otherwise
/// whatever the user entered.
pub fn resolve_weight(entered: f64, percentage: f64, one_rep_max: Option<f64>, step: f64) -> f64 {
    match one_rep_max {
        Some(orm) if is_weight_locked(percentage, one_rep_max) => {
            calculate_weight(orm, percentage, step)
        }
        _ => entered,
    }
}
