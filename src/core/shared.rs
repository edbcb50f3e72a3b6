pub trait ConfigType {
    fn default()-> Self;
}

/// Returns true if `a` and `b` differ by no more than `f32::EPSILON` scaled to
/// their magnitude.
#[cfg(test)]
pub(crate) fn approx_eq(a: f32, b: f32) -> bool {
    let scale = a.abs().max(b.abs()).max(1.0);
    (a - b).abs() <= f32::EPSILON * scale * 4.0
}
