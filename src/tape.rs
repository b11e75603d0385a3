//! The byte tape.

use std::collections::BTreeMap;
use std::fmt;
use std::iter::FromIterator;

use itertools::Itertools;

/// Sparse, unbounded tape of byte cells.
///
/// Addresses are signed, so the pointer may wander left of the origin. Cells that were never
/// written read as zero. Only non-zero cells are stored, which makes two tapes with the same
/// contents compare equal no matter which cells were touched on the way.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tape {
    cells: BTreeMap<i64, u8>,
}

impl Tape {
    pub fn new() -> Tape {
        Tape::default()
    }

    /// Returns the value of the cell at `address`.
    pub fn get(&self, address: i64) -> u8 {
        self.cells.get(&address).copied().unwrap_or(0)
    }

    /// Overwrites the cell at `address`.
    pub fn set(&mut self, address: i64, value: u8) {
        if value == 0 {
            self.cells.remove(&address);
        } else {
            self.cells.insert(address, value);
        }
    }

    /// Adds one to the cell at `address`, wrapping 255 to 0. Returns the new value.
    pub fn increment(&mut self, address: i64) -> u8 {
        let value = self.get(address).wrapping_add(1);
        self.set(address, value);
        value
    }

    /// Subtracts one from the cell at `address`, wrapping 0 to 255. Returns the new value.
    pub fn decrement(&mut self, address: i64) -> u8 {
        let value = self.get(address).wrapping_sub(1);
        self.set(address, value);
        value
    }

    /// Iterates over the non-zero cells in address order.
    pub fn iter(&self) -> impl Iterator<Item = (i64, u8)> + '_ {
        self.cells.iter().map(|(addr, value)| (*addr, *value))
    }

    /// Lowest and highest address holding a non-zero value.
    pub fn bounds(&self) -> Option<(i64, i64)> {
        self.cells.keys().copied().minmax().into_option()
    }

    /// Returns `true` if every cell is zero.
    pub fn is_blank(&self) -> bool {
        self.cells.is_empty()
    }

    /// Values of the cells in `start..start + len`, zeros included.
    pub fn window(&self, start: i64, len: usize) -> Vec<u8> {
        (0..len as i64).map(|offset| self.get(start + offset)).collect()
    }
}

impl FromIterator<(i64, u8)> for Tape {
    fn from_iter<I>(iter: I) -> Self
        where I: IntoIterator<Item = (i64, u8)>
    {
        let mut tape = Tape::new();

        for (address, value) in iter {
            tape.set(address, value);
        }

        tape
    }
}

/// Builds a tape whose cells `0..bytes.len()` hold `bytes`.
impl From<&[u8]> for Tape {
    fn from(bytes: &[u8]) -> Tape {
        bytes
            .iter()
            .enumerate()
            .map(|(addr, value)| (addr as i64, *value))
            .collect()
    }
}

impl fmt::Display for Tape {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "[{}]", self.iter().map(|(addr, value)| format!("{}: {}", addr, value)).join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::Tape;

    #[test]
    fn test_unwritten_cells_are_zero() {
        let tape = Tape::new();
        assert_eq!(tape.get(0), 0);
        assert_eq!(tape.get(-1_000), 0);
        assert!(tape.is_blank());
    }

    #[test]
    fn test_wraparound() {
        let mut tape = Tape::new();
        assert_eq!(tape.decrement(3), 255);
        assert_eq!(tape.increment(3), 0);

        tape.set(-2, 255);
        assert_eq!(tape.increment(-2), 0);
        assert!(tape.is_blank());
    }

    #[test]
    fn test_zero_cells_are_not_stored() {
        let mut a = Tape::new();
        a.increment(5);
        a.decrement(5);

        assert_eq!(a, Tape::new());
    }

    #[test]
    fn test_bounds_and_window() {
        let tape: Tape = vec![(-3, 1), (4, 2)].into_iter().collect();

        assert_eq!(tape.bounds(), Some((-3, 4)));
        assert_eq!(tape.window(-4, 3), vec![0, 1, 0]);
        assert_eq!(tape.to_string(), "[-3: 1, 4: 2]");
    }

    #[test]
    fn test_from_bytes() {
        let tape = Tape::from(&[1u8, 0, 7][..]);
        assert_eq!(tape.iter().collect::<Vec<_>>(), vec![(0, 1), (2, 7)]);
    }
}
