use super::BaseProjection;

/// Geographic coordinates used as plane coordinates. Both directions return the input unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LonLat;

impl BaseProjection for LonLat {
    fn project(&self, phi: f64, lambda: f64) -> (f64, f64) {
        (lambda, phi)
    }

    fn invproject(&self, x: f64, y: f64) -> (f64, f64) {
        (y, x)
    }
}
