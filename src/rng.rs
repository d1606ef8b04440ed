use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::types::{BottomPair, Icon, ICONS};

/// Coin flips for round setup. Entropy-seeded unless a seed is given.
#[derive(Clone, Debug)]
pub struct RoundRng { rng: StdRng }

impl RoundRng {
    pub fn from_entropy() -> Self { Self { rng: StdRng::from_entropy() } }

    pub fn seeded(seed: u64) -> Self { Self { rng: StdRng::seed_from_u64(seed) } }

    pub fn from_seed_opt(seed: Option<u64>) -> Self {
        match seed {
            Some(s) => Self::seeded(s),
            None => Self::from_entropy(),
        }
    }

    pub fn coin(&mut self) -> bool { self.rng.gen_bool(0.5) }
}

/// Natural or reversed icon order, 50/50.
pub fn random_order(rng: &mut RoundRng) -> BottomPair {
    if rng.coin() { ICONS } else { [ICONS[1], ICONS[0]] }
}

/// One of the two slots, 50/50.
pub fn pick_from_pair(rng: &mut RoundRng, pair: &BottomPair) -> Icon {
    if rng.coin() { pair[0] } else { pair[1] }
}
