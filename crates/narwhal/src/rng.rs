/// Seeded xorshift64* generator.
///
/// Start jitter has to be reproducible for a given `random_seed`, so the layout does not reach for
/// a thread-local RNG.
#[derive(Debug, Clone)]
pub(crate) struct XorShift64Star {
    state: u64,
}

impl XorShift64Star {
    pub(crate) fn new(seed: u64) -> Self {
        Self { state: seed.max(1) }
    }

    pub(crate) fn next_u64(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x >> 12;
        x ^= x << 25;
        x ^= x >> 27;
        self.state = x;
        x.wrapping_mul(0x2545F4914F6CDD1D_u64)
    }

    /// Uniform in `[0, 1)` with 53 bits of precision.
    pub(crate) fn next_f64_unit(&mut self) -> f64 {
        let u = self.next_u64() >> 11;
        (u as f64) / ((1u64 << 53) as f64)
    }

    /// Uniform in `[-half_span, half_span)`.
    pub(crate) fn next_jitter(&mut self, half_span: f64) -> f64 {
        self.next_f64_unit() * 2.0 * half_span - half_span
    }
}

#[cfg(test)]
mod tests {
    use super::XorShift64Star;

    #[test]
    fn xorshift64star_next_f64_unit_is_seeded_and_reproducible() {
        let expected = [
            0.28083505005035947,
            0.6711372530266764,
            0.7258461452833668,
            0.303529299965799,
            0.056176763098259475,
        ];
        let mut rng = XorShift64Star::new(1);
        for (i, &e) in expected.iter().enumerate() {
            let v = rng.next_f64_unit();
            assert!(
                (v - e).abs() < 1e-15,
                "unexpected rng value at {i}: got {v}, expected {e}"
            );
        }
    }

    #[test]
    fn zero_seed_does_not_stick_at_zero() {
        let mut rng = XorShift64Star::new(0);
        assert_ne!(rng.next_u64(), 0);
    }

    #[test]
    fn jitter_stays_inside_the_half_open_span() {
        let mut rng = XorShift64Star::new(42);
        for _ in 0..1000 {
            let j = rng.next_jitter(25.0);
            assert!((-25.0..25.0).contains(&j), "jitter out of range: {j}");
        }
    }
}
