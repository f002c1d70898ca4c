// src/sampling/uunifast.rs

use rand::{Rng, RngCore};
use tracing::{debug, warn};

/// Attempt cap used by [`uunifast`] when a maximum is given.
pub const DEFAULT_UUNIFAST_MAX_TRY: usize = 100;

/// Draw `n` utilizations summing to `total` with the UUniFast method.
///
/// When `max_u` is given no value may reach it; see
/// [`uunifast_with_max_try`] for the fallbacks.
pub fn uunifast(total: f64, n: usize, max_u: Option<f64>, rng: &mut dyn RngCore) -> Vec<f64> {
    uunifast_with_max_try(total, n, max_u, DEFAULT_UUNIFAST_MAX_TRY, rng)
}

/// UUniFast with an explicit attempt cap.
///
/// Fallbacks when `max_u` is set:
/// - `total / n >= max_u`: both constraints cannot hold, so every value is
///   `max_u` and the sum is not preserved.
/// - `max_try` draws all break the cap: the total is split equally, which
///   is below `max_u` by the check above.
pub fn uunifast_with_max_try(
    total: f64,
    n: usize,
    max_u: Option<f64>,
    max_try: usize,
    rng: &mut dyn RngCore,
) -> Vec<f64> {
    if n == 0 {
        return Vec::new();
    }

    let Some(max_u) = max_u else {
        return stick_breaking(total, n, rng);
    };

    if total / n as f64 >= max_u {
        warn!(
            total_utilization = total,
            maximum_utilization = max_u,
            n,
            "total and maximum utilization cannot both be met; using maximum utilization for every task"
        );
        return vec![max_u; n];
    }

    for attempt in 1..=max_try.max(1) {
        if let Some(values) = bounded_stick_breaking(total, n, max_u, max_try, rng) {
            debug!(attempt, "uunifast: bounded draw accepted");
            return values;
        }
    }

    warn!(
        max_try,
        "uunifast: no bounded draw found; distributing utilization equally"
    );
    vec![total / n as f64; n]
}

fn stick_breaking(total: f64, n: usize, rng: &mut dyn RngCore) -> Vec<f64> {
    let mut values = Vec::with_capacity(n);
    let mut remaining = total;
    for i in 0..n - 1 {
        let next = remaining * unit(rng).powf(1.0 / (n - i) as f64);
        values.push(remaining - next);
        remaining = next;
    }
    values.push(remaining);
    values
}

/// One bounded draw; `None` if a step or the final remainder breaks the cap.
fn bounded_stick_breaking(
    total: f64,
    n: usize,
    max_u: f64,
    max_try: usize,
    rng: &mut dyn RngCore,
) -> Option<Vec<f64>> {
    let mut values = Vec::with_capacity(n);
    let mut remaining = total;
    for i in 0..n - 1 {
        let exponent = 1.0 / (n - i) as f64;
        let next = (0..max_try.max(1))
            .map(|_| remaining * unit(rng).powf(exponent))
            .find(|next| remaining - next < max_u)?;
        values.push(remaining - next);
        remaining = next;
    }

    if remaining < max_u {
        values.push(remaining);
        Some(values)
    } else {
        None
    }
}

/// Uniform draw in (0, 1].
fn unit(rng: &mut dyn RngCore) -> f64 {
    1.0 - rng.r#gen::<f64>()
}
