//! 7-bag piece randomizer.
//!
//! Each bag is an independent uniform permutation of all seven kinds, consumed
//! front to back and refilled when exhausted, so no kind repeats within a bag
//! and any 7 draws aligned to a bag boundary contain every kind exactly once.
//!
//! Randomness comes from a small seeded LCG so a whole game replays from one
//! u32 seed.

use arrayvec::ArrayVec;

use crate::types::{PieceKind, PREVIEW_LEN};

/// Linear congruential generator, Numerical Recipes constants.
#[derive(Debug, Clone)]
pub struct Lcg32 {
    state: u32,
}

impl Lcg32 {
    pub fn new(seed: u32) -> Self {
        // A zero state would still advance under an LCG with c != 0, but
        // keep the first outputs away from the degenerate low range.
        let state = if seed == 0 { 1 } else { seed };
        Self { state }
    }

    pub fn next_u32(&mut self) -> u32 {
        self.state = self.state.wrapping_mul(1664525).wrapping_add(1013904223);
        self.state
    }

    pub fn next_below(&mut self, max: u32) -> u32 {
        self.next_u32() % max
    }

    /// Fisher-Yates shuffle.
    pub fn shuffle<T>(&mut self, slice: &mut [T]) {
        for i in (1..slice.len()).rev() {
            let j = self.next_below(i as u32 + 1) as usize;
            slice.swap(i, j);
        }
    }
}

/// The bag randomizer. `next()` never fails.
#[derive(Debug, Clone)]
pub struct SevenBag {
    bag: ArrayVec<PieceKind, 7>,
    cursor: usize,
    rng: Lcg32,
    seed: u32,
}

impl SevenBag {
    pub fn new(seed: u32) -> Self {
        let mut out = Self {
            bag: ArrayVec::new(),
            cursor: 0,
            rng: Lcg32::new(seed),
            seed,
        };
        out.refill();
        out
    }

    /// The seed this sequence started from.
    pub fn seed(&self) -> u32 {
        self.seed
    }

    fn refill(&mut self) {
        self.bag.clear();
        self.bag.extend(PieceKind::ALL);
        self.rng.shuffle(&mut self.bag);
        self.cursor = 0;
    }

    /// Draw the next kind, refilling with a fresh permutation on exhaustion.
    pub fn next(&mut self) -> PieceKind {
        if self.cursor >= self.bag.len() {
            self.refill();
        }
        let kind = self.bag[self.cursor];
        self.cursor += 1;
        kind
    }

    /// Lookahead over the next [`PREVIEW_LEN`] draws without consuming them.
    ///
    /// Draws past the current bag come from simulating the next refill on a
    /// cloned generator, so the preview always matches what `next()` will
    /// actually return.
    pub fn preview(&self) -> [PieceKind; PREVIEW_LEN] {
        let mut out = [PieceKind::I; PREVIEW_LEN];
        let mut n = 0;

        for &kind in &self.bag[self.cursor.min(self.bag.len())..] {
            if n == PREVIEW_LEN {
                return out;
            }
            out[n] = kind;
            n += 1;
        }

        if n < PREVIEW_LEN {
            let mut rng = self.rng.clone();
            let mut next_bag = PieceKind::ALL;
            rng.shuffle(&mut next_bag);
            for &kind in &next_bag {
                if n == PREVIEW_LEN {
                    break;
                }
                out[n] = kind;
                n += 1;
            }
        }

        out
    }

    #[cfg(test)]
    pub fn remaining(&self) -> &[PieceKind] {
        &self.bag[self.cursor..]
    }
}
