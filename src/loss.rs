//! Lossy-channel oracle: simulates datagram loss on the receive path.
//!
//! Seeded once per socket at open time from system entropy, then owned
//! exclusively by that socket's receiver task — the only caller — so no
//! synchronization is needed around the generator itself.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

pub struct LossOracle {
    rng: StdRng,
}

impl LossOracle {
    pub fn seeded_from_entropy() -> Self {
        LossOracle {
            rng: StdRng::from_entropy(),
        }
    }

    /// Returns `true` with probability `p` (clamped to `[0, 1]`).
    pub fn should_drop(&mut self, p: f64) -> bool {
        let p = p.clamp(0.0, 1.0);
        self.rng.gen_bool(p)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn zero_probability_never_drops() {
        let mut oracle = LossOracle::seeded_from_entropy();
        for _ in 0..1000 {
            assert!(!oracle.should_drop(0.0));
        }
    }

    #[test]
    fn certainty_always_drops() {
        let mut oracle = LossOracle::seeded_from_entropy();
        for _ in 0..1000 {
            assert!(oracle.should_drop(1.0));
        }
    }
}
