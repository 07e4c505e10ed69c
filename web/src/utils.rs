/// Fresh game seed, made of two `Math.random()` draws of 32 bits each.
pub(crate) fn js_random_seed() -> u64 {
    seed_from_unit_pair(js_sys::Math::random(), js_sys::Math::random())
}

/// Packs two values from `[0, 1)` into the high and low halves of a seed.
fn seed_from_unit_pair(high: f64, low: f64) -> u64 {
    const SCALE: f64 = 4_294_967_296.0;
    let half = |unit: f64| (unit.clamp(0.0, 1.0) * SCALE).min(SCALE - 1.0) as u64;
    (half(high) << 32) | half(low)
}

/// Three digit display used by the timer and move counter.
pub(crate) fn format_for_counter(num: u32) -> String {
    match num {
        0..1000 => format!("{:03}", num),
        1000.. => "999".to_string(),
    }
}

/// Smallest column count that keeps the grid at least as wide as it is tall.
pub(crate) fn grid_columns(card_count: usize) -> usize {
    (1..=card_count.max(1))
        .find(|columns| columns * columns >= card_count)
        .unwrap_or(1)
}
