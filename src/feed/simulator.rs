//! Synthetic events for when no live source is available.
//!
//! Bypasses the classifier: the kind is drawn directly from fixed bands,
//! and the magnitude from the same ranges the classifier uses.

use rand::Rng;

use crate::classifier::SUPPLY_MAGNITUDE;
use crate::models::effects::{Classification, EventKind};

/// Lower edge of each band on a uniform `[0, 1)` draw. Below `MEV_BAND` is tx.
pub const WHALE_BAND: f64 = 0.995; // 0.5%
pub const BURN_BAND: f64 = 0.985; // 1%
pub const MINT_BAND: f64 = 0.965; // 2%
pub const MEV_BAND: f64 = 0.925; // 4%

pub fn kind_for_draw(r: f64) -> EventKind {
    if r >= WHALE_BAND {
        EventKind::Whale
    } else if r >= BURN_BAND {
        EventKind::Burn
    } else if r >= MINT_BAND {
        EventKind::Mint
    } else if r >= MEV_BAND {
        EventKind::Mev
    } else {
        EventKind::Tx
    }
}

pub fn synthesize<R: Rng + ?Sized>(rng: &mut R) -> Classification {
    let kind = kind_for_draw(rng.gen::<f64>());
    let magnitude = match kind {
        EventKind::Tx => rng.gen_range(0.3..0.7),
        EventKind::Whale => rng.gen_range(0.8..1.0),
        EventKind::Mev => rng.gen_range(0.6..1.0),
        EventKind::Mint | EventKind::Burn => SUPPLY_MAGNITUDE,
    };
    Classification { kind, magnitude }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashMap;

    #[test]
    fn band_edges() {
        assert_eq!(kind_for_draw(0.0), EventKind::Tx);
        assert_eq!(kind_for_draw(0.9249), EventKind::Tx);
        assert_eq!(kind_for_draw(0.925), EventKind::Mev);
        assert_eq!(kind_for_draw(0.965), EventKind::Mint);
        assert_eq!(kind_for_draw(0.985), EventKind::Burn);
        assert_eq!(kind_for_draw(0.995), EventKind::Whale);
        assert_eq!(kind_for_draw(0.9999), EventKind::Whale);
    }

    #[test]
    fn distribution_favors_tx_and_whale_is_rarest() {
        let mut rng = StdRng::seed_from_u64(99);
        let mut counts: HashMap<EventKind, usize> = HashMap::new();
        for _ in 0..100_000 {
            *counts.entry(synthesize(&mut rng).kind).or_default() += 1;
        }
        let get = |k| counts.get(&k).copied().unwrap_or(0);
        assert!(get(EventKind::Tx) > 90_000);
        assert!(get(EventKind::Whale) < get(EventKind::Burn));
        assert!(get(EventKind::Burn) < get(EventKind::Mint));
        assert!(get(EventKind::Mint) < get(EventKind::Mev));
        assert!(get(EventKind::Whale) > 0);
    }

    #[test]
    fn magnitudes_follow_classifier_ranges() {
        let mut rng = StdRng::seed_from_u64(5);
        for _ in 0..10_000 {
            let c = synthesize(&mut rng);
            let ok = match c.kind {
                EventKind::Tx => (0.3..0.7).contains(&c.magnitude),
                EventKind::Whale => (0.8..1.0).contains(&c.magnitude),
                EventKind::Mev => (0.6..1.0).contains(&c.magnitude),
                EventKind::Mint | EventKind::Burn => c.magnitude == 0.5,
            };
            assert!(ok, "{:?} magnitude {}", c.kind, c.magnitude);
        }
    }
}
