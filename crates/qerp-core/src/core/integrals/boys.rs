use std::f64::consts::PI;

const SMALL_ARGUMENT: f64 = 1e-14;
const ASYMPTOTIC_ARGUMENT: f64 = 35.0;
const SERIES_TOLERANCE: f64 = 1e-17;

/// Evaluates the Boys functions `F_0(t) ..= F_max_order(t)`.
///
/// Small arguments use the series at the highest order followed by downward recursion,
/// which is stable; large arguments use the asymptotic `F_0` and upward recursion, which
/// is accurate once `exp(-t)` is negligible.
pub fn boys(max_order: usize, t: f64) -> Vec<f64> {
    let mut values = vec![0.0; max_order + 1];

    if t < SMALL_ARGUMENT {
        for (n, value) in values.iter_mut().enumerate() {
            *value = 1.0 / (2 * n + 1) as f64;
        }
        return values;
    }

    let exp_t = (-t).exp();

    if t > ASYMPTOTIC_ARGUMENT {
        values[0] = 0.5 * (PI / t).sqrt();
        for n in 0..max_order {
            values[n + 1] = ((2 * n + 1) as f64 * values[n] - exp_t) / (2.0 * t);
        }
        return values;
    }

    let m = max_order as f64;
    let mut term = 1.0 / (2.0 * m + 1.0);
    let mut sum = term;
    let mut k = 1.0;
    loop {
        term *= 2.0 * t / (2.0 * m + 2.0 * k + 1.0);
        sum += term;
        if term < SERIES_TOLERANCE * sum {
            break;
        }
        k += 1.0;
    }
    values[max_order] = exp_t * sum;
    for n in (0..max_order).rev() {
        values[n] = (2.0 * t * values[n + 1] + exp_t) / (2 * n + 1) as f64;
    }
    values
}
