/// Rounds to two decimal places, half away from zero.
///
/// `f64::EPSILON` is added first so values such as `1.005`, stored slightly
/// below their decimal form, still round up.
pub fn round_to_cents(value: f64) -> f64 {
    ((value + f64::EPSILON) * 100.0).round() / 100.0
}
