//! Event Classifier
//!
//! Maps the log lines of one transaction to an [`EventKind`] and magnitude.
//! Rules are evaluated in a fixed order and later matches override earlier
//! ones, so a message that matches several rules resolves to the last one:
//! burn > mint > mev > whale > tx.
//!
//! Whale detection is a text heuristic. It looks for a transfer instruction
//! alongside a literal large-amount substring; it says nothing reliable about
//! the actual amount moved.

use rand::Rng;

use crate::models::effects::{Classification, EventKind};

pub const TRANSFER_MARKER: &str = "Instruction: Transfer";
/// Literal substring treated as a large transfer amount.
pub const LARGE_AMOUNT_MARKER: &str = "1000000000";
pub const SWAP_MARKERS: [&str; 2] = ["Instruction: Swap", "Instruction: Route"];
/// Matched case-insensitively.
pub const ARBITRAGE_MARKER: &str = "arbitrage";
pub const MINT_MARKER: &str = "Instruction: Mint";
pub const BURN_MARKER: &str = "Instruction: Burn";

/// Fixed magnitude for supply-changing events.
pub const SUPPLY_MAGNITUDE: f64 = 0.5;

pub fn classify<S: AsRef<str>>(lines: &[S]) -> Classification {
    classify_with_rng(lines, &mut rand::thread_rng())
}

pub fn classify_with_rng<S: AsRef<str>, R: Rng + ?Sized>(
    lines: &[S],
    rng: &mut R,
) -> Classification {
    let mut result = Classification {
        kind: EventKind::Tx,
        magnitude: rng.gen_range(0.3..0.7),
    };

    if any_line(lines, |l| l.contains(TRANSFER_MARKER))
        && any_line(lines, |l| l.contains(LARGE_AMOUNT_MARKER))
    {
        result = Classification {
            kind: EventKind::Whale,
            magnitude: rng.gen_range(0.8..1.0),
        };
    }
    if any_line(lines, is_swap_or_arbitrage) {
        result = Classification {
            kind: EventKind::Mev,
            magnitude: rng.gen_range(0.6..1.0),
        };
    }
    if any_line(lines, |l| l.contains(MINT_MARKER)) {
        result = Classification {
            kind: EventKind::Mint,
            magnitude: SUPPLY_MAGNITUDE,
        };
    }
    if any_line(lines, |l| l.contains(BURN_MARKER)) {
        result = Classification {
            kind: EventKind::Burn,
            magnitude: SUPPLY_MAGNITUDE,
        };
    }

    result
}

fn any_line<S: AsRef<str>>(lines: &[S], pred: impl Fn(&str) -> bool) -> bool {
    lines.iter().any(|l| pred(l.as_ref()))
}

fn is_swap_or_arbitrage(line: &str) -> bool {
    SWAP_MARKERS.iter().any(|m| line.contains(m))
        || line.to_ascii_lowercase().contains(ARBITRAGE_MARKER)
}
