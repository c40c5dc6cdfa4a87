//! RNG module - 7-bag piece supply
//!
//! The bag holds one of each piece kind in shuffled order. Kinds are handed out
//! from a cursor until the bag is exhausted, then the bag is reshuffled. Every
//! aligned window of seven draws therefore contains each kind exactly once.
//!
//! Shuffling uses a small LCG so a seed reproduces a whole match.

use crate::types::PieceKind;

const LCG_MULTIPLIER: u32 = 1_664_525;
const LCG_INCREMENT: u32 = 1_013_904_223;

/// 32-bit linear congruential generator, reproducible from its seed
#[derive(Debug, Clone)]
pub struct SimpleRng {
    state: u32,
}

impl SimpleRng {
    pub fn new(seed: u32) -> Self {
        Self { state: seed.max(1) }
    }

    pub fn next_u32(&mut self) -> u32 {
        self.state = self
            .state
            .wrapping_mul(LCG_MULTIPLIER)
            .wrapping_add(LCG_INCREMENT);
        self.state
    }

    /// Uniform-ish value in `[0, bound)`.
    ///
    /// Scales by the high bits; the low bits of an LCG cycle with a short period.
    pub fn below(&mut self, bound: u32) -> u32 {
        ((u64::from(self.next_u32()) * u64::from(bound)) >> 32) as u32
    }

    /// Shuffle in place, walking from the back
    pub fn shuffle<T>(&mut self, items: &mut [T]) {
        for hi in (1..items.len()).rev() {
            let pick = self.below(hi as u32 + 1) as usize;
            items.swap(hi, pick);
        }
    }
}

/// Shuffled-bag generator of piece kinds
#[derive(Debug, Clone)]
pub struct PieceBag {
    bag: [PieceKind; 7],
    cursor: usize,
    rng: SimpleRng,
}

impl PieceBag {
    pub fn new(seed: u32) -> Self {
        let mut bag = Self {
            bag: PieceKind::ALL,
            cursor: 0,
            rng: SimpleRng::new(seed),
        };
        bag.refill();
        bag
    }

    fn refill(&mut self) {
        self.bag = PieceKind::ALL;
        self.rng.shuffle(&mut self.bag);
        self.cursor = 0;
    }

    /// Pull the next kind, reshuffling when the bag runs out
    pub fn next_kind(&mut self) -> PieceKind {
        if self.cursor >= self.bag.len() {
            self.refill();
        }
        let kind = self.bag[self.cursor];
        self.cursor += 1;
        kind
    }

    /// Preview the next kind without consuming it
    pub fn peek(&self) -> PieceKind {
        if self.cursor < self.bag.len() {
            return self.bag[self.cursor];
        }

        // Shuffle a copy of the RNG so the preview matches the next refill.
        let mut preview_rng = self.rng.clone();
        let mut next_bag = PieceKind::ALL;
        preview_rng.shuffle(&mut next_bag);
        next_bag[0]
    }

    /// Kinds still waiting in the current bag
    pub fn remaining(&self) -> &[PieceKind] {
        &self.bag[self.cursor..]
    }
}

impl Iterator for PieceBag {
    type Item = PieceKind;

    fn next(&mut self) -> Option<PieceKind> {
        Some(self.next_kind())
    }
}

impl Default for PieceBag {
    fn default() -> Self {
        Self::new(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rng_deterministic() {
        let mut rng1 = SimpleRng::new(12345);
        let mut rng2 = SimpleRng::new(12345);
        for _ in 0..100 {
            assert_eq!(rng1.next_u32(), rng2.next_u32());
        }
    }

    #[test]
    fn test_rng_zero_seed_is_not_stuck() {
        let mut rng = SimpleRng::new(0);
        let a = rng.next_u32();
        let b = rng.next_u32();
        assert_ne!(a, b);
    }

    #[test]
    fn test_below_stays_in_bounds() {
        let mut rng = SimpleRng::new(3);
        for bound in 1..50 {
            assert!(rng.below(bound) < bound);
        }
        assert_eq!(rng.below(1), 0);
    }

    #[test]
    fn test_bag_starts_full() {
        let bag = PieceBag::new(1);
        assert_eq!(bag.remaining().len(), 7);
    }

    #[test]
    fn test_every_window_of_seven_has_each_kind() {
        let mut bag = PieceBag::new(99);
        for _ in 0..20 {
            let mut window: Vec<PieceKind> = (0..7).map(|_| bag.next_kind()).collect();
            window.sort_by_key(|k| k.as_str());
            let mut all = PieceKind::ALL.to_vec();
            all.sort_by_key(|k| k.as_str());
            assert_eq!(window, all);
        }
    }

    #[test]
    fn test_peek_matches_draw_across_refill() {
        let mut bag = PieceBag::new(7);
        for _ in 0..30 {
            let peeked = bag.peek();
            assert_eq!(peeked, bag.next_kind());
        }
    }

    #[test]
    fn test_same_seed_same_sequence() {
        let a: Vec<PieceKind> = PieceBag::new(42).take(21).collect();
        let b: Vec<PieceKind> = PieceBag::new(42).take(21).collect();
        assert_eq!(a, b);
    }
}
