use rand::Rng;

// Multiplier bands for one step of the walk. Above the fair value the draw
// is biased downward, at or below it the draw is biased upward.
const ABOVE_FAIR: (f64, f64) = (0.75, 1.10);
const AT_OR_BELOW_FAIR: (f64, f64) = (0.90, 1.25);

/// Value level the walk reverts toward. Fixed at 45 regardless of the
/// configured band.
pub fn fair_value(_n_max: i64, _n_min: i64) -> i64 {
    (4.5 * 10.0) as i64
}

/// Width of the value band the chart is scaled against.
pub fn possible_range(n_max: i64, n_min: i64) -> i64 {
    9 * (n_max - n_min)
}

/// Advance the walk by one step.
///
/// Draws a uniform multiplier from the band for the current side of the fair
/// value and floors the product back onto the tick grid. A value of 0 is
/// absorbing: every multiplier maps it back to 0.
pub fn next_price(previous: i64, fair: i64, rng: &mut impl Rng) -> i64 {
    let (low, high) = if previous > fair {
        ABOVE_FAIR
    } else {
        AT_OR_BELOW_FAIR
    };
    let multiplier = rng.random_range(low..high);
    (previous as f64 * multiplier).floor() as i64
}
