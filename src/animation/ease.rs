/// Cubic ease-out: fast start, gentle landing. Input is clamped to `[0, 1]`.
pub fn out_cubic(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    1.0 - (1.0 - t).powi(3)
}

#[cfg(test)]
#[path = "../../tests/unit/animation/ease.rs"]
mod tests;
