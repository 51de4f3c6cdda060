/// Precomputed `scale[u] = pf_scale^-u` ladder used throughout the forward
/// and outside recursions to keep Boltzmann sums within a sane floating
/// point range regardless of sequence length.
pub struct ScaleLadder {
    scale: Vec<f64>,
}

impl ScaleLadder {
    pub fn new(n: usize, pf_scale: f64) -> Self {
        let inv = 1.0 / pf_scale;
        let mut scale = Vec::with_capacity(n + 2);
        scale.push(1.0);
        for u in 1..=n + 1 {
            scale.push(scale[u - 1] * inv);
        }
        ScaleLadder { scale }
    }

    pub fn get(&self, u: usize) -> f64 {
        self.scale[u]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scale_zero_is_one() {
        let s = ScaleLadder::new(20, 1.5);
        assert_eq!(s.get(0), 1.0);
    }

    #[test]
    fn test_scale_is_geometric() {
        let s = ScaleLadder::new(20, 2.0);
        assert!((s.get(3) - 0.125).abs() < 1e-12);
    }

    #[test]
    fn test_scale_of_one_pf_scale_is_identity() {
        let s = ScaleLadder::new(20, 1.0);
        for u in 0..=20 {
            assert_eq!(s.get(u), 1.0);
        }
    }
}
