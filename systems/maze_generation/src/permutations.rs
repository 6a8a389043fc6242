//! Precomputed random orderings of the four cardinal directions.
//!
//! Every cell of a maze receives its complete direction-try order up front as
//! one packed integer drawn from [`SHUFFLED_DIRECTIONS`]. Border and corner
//! cells reuse the same table: three-way orders come from the block whose
//! leading direction is the excluded one, two-way orders are a coin flip.

use maze_dash_core::Direction;
use rand::Rng;

const GROUP_BITS: u16 = 3;
const GROUP_MASK: u16 = 0b111;
const THREE_WAY_MASK: u16 = 0b111_111_111;
const BLOCK_LEN: usize = 6;

/// All 24 permutations of the direction codes `1..=4`, packed as four 3-bit
/// groups with the most significant group first.
///
/// Entries `6k..6k + 6` are exactly the permutations whose leading group is
/// direction code `k + 1`.
pub static SHUFFLED_DIRECTIONS: [u16; 24] = [
    0b001_010_011_100,
    0b001_010_100_011,
    0b001_011_010_100,
    0b001_011_100_010,
    0b001_100_010_011,
    0b001_100_011_010,
    0b010_001_011_100,
    0b010_001_100_011,
    0b010_011_001_100,
    0b010_011_100_001,
    0b010_100_001_011,
    0b010_100_011_001,
    0b011_001_010_100,
    0b011_001_100_010,
    0b011_010_001_100,
    0b011_010_100_001,
    0b011_100_001_010,
    0b011_100_010_001,
    0b100_001_010_011,
    0b100_001_011_010,
    0b100_010_001_011,
    0b100_010_011_001,
    0b100_011_001_010,
    0b100_011_010_001,
];

/// Ordered sequence of up to four directions, consumed front to back.
///
/// The front of the sequence is the least significant 3-bit group of the
/// packed value. Iterating yields each remaining direction exactly once.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct DirectionOrder(u16);

impl DirectionOrder {
    /// Wraps a packed order.
    #[must_use]
    pub const fn from_packed(packed: u16) -> Self {
        Self(packed)
    }

    /// Packed representation of the remaining directions.
    #[must_use]
    pub const fn packed(self) -> u16 {
        self.0
    }

    /// Reports whether every direction has been consumed.
    #[must_use]
    pub const fn is_exhausted(self) -> bool {
        self.0 == 0
    }
}

impl Iterator for DirectionOrder {
    type Item = Direction;

    fn next(&mut self) -> Option<Direction> {
        if self.is_exhausted() {
            return None;
        }

        let code = (self.0 & GROUP_MASK) as u8;
        self.0 >>= GROUP_BITS;
        Direction::from_code(code)
    }
}

/// Uniformly random ordering of all four directions, for interior cells.
pub fn select_four_way<R>(rng: &mut R) -> DirectionOrder
where
    R: Rng + ?Sized,
{
    DirectionOrder(SHUFFLED_DIRECTIONS[rng.gen_range(0..SHUFFLED_DIRECTIONS.len())])
}

/// Uniformly random ordering of the three directions other than `excluded`,
/// for border cells whose `excluded` side faces off the grid.
pub fn select_three_way<R>(rng: &mut R, excluded: Direction) -> DirectionOrder
where
    R: Rng + ?Sized,
{
    let block = usize::from(excluded.code() - 1) * BLOCK_LEN;
    let entry = SHUFFLED_DIRECTIONS[block + rng.gen_range(0..BLOCK_LEN)];
    DirectionOrder(entry & THREE_WAY_MASK)
}

/// Either ordering of two directions with equal probability, for corner cells.
pub fn select_two_way<R>(rng: &mut R, a: Direction, b: Direction) -> DirectionOrder
where
    R: Rng + ?Sized,
{
    let (lead, trail) = if rng.gen_range(0..2) == 1 { (a, b) } else { (b, a) };
    DirectionOrder((u16::from(lead.code()) << GROUP_BITS) | u16::from(trail.code()))
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use super::*;

    fn leading_code(entry: u16) -> u16 {
        entry >> (3 * GROUP_BITS)
    }

    #[test]
    fn table_holds_every_permutation_once() {
        let distinct: HashSet<u16> = SHUFFLED_DIRECTIONS.iter().copied().collect();
        assert_eq!(distinct.len(), 24);

        for entry in SHUFFLED_DIRECTIONS {
            let mut directions: Vec<Direction> = DirectionOrder::from_packed(entry).collect();
            directions.sort();
            assert_eq!(directions, Direction::ALL.to_vec(), "entry {entry:#014b}");
        }
    }

    #[test]
    fn blocks_are_partitioned_by_leading_direction() {
        for (index, entry) in SHUFFLED_DIRECTIONS.iter().enumerate() {
            let block = (index / BLOCK_LEN) as u16;
            assert_eq!(leading_code(*entry), block + 1, "entry {index}");
        }
    }

    #[test]
    fn order_is_consumed_from_the_low_group() {
        let mut order = DirectionOrder::from_packed(0b001_010_011_100);
        assert_eq!(order.next(), Some(Direction::Left));
        assert_eq!(order.next(), Some(Direction::Down));
        assert_eq!(order.next(), Some(Direction::Right));
        assert!(!order.is_exhausted());
        assert_eq!(order.next(), Some(Direction::Up));
        assert!(order.is_exhausted());
        assert_eq!(order.next(), None);
    }

    #[test]
    fn three_way_orders_skip_the_excluded_direction() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        for excluded in Direction::ALL {
            let mut seen = HashSet::new();
            for _ in 0..400 {
                let order = select_three_way(&mut rng, excluded);
                let directions: Vec<Direction> = order.collect();
                assert_eq!(directions.len(), 3);
                assert!(!directions.contains(&excluded));
                let _ = seen.insert(directions);
            }
            assert_eq!(seen.len(), 6, "all orderings reachable for {excluded:?}");
        }
    }

    #[test]
    fn four_way_orders_cover_the_table() {
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let seen: HashSet<u16> = (0..2_000)
            .map(|_| select_four_way(&mut rng).packed())
            .collect();
        assert_eq!(seen.len(), 24);
    }

    #[test]
    fn two_way_orders_produce_both_sequences() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let seen: HashSet<Vec<Direction>> = (0..200)
            .map(|_| select_two_way(&mut rng, Direction::Right, Direction::Down).collect())
            .collect();
        assert_eq!(seen.len(), 2);
        assert!(seen.contains(&vec![Direction::Right, Direction::Down]));
        assert!(seen.contains(&vec![Direction::Down, Direction::Right]));
    }
}
