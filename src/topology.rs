// Group formation. An unstructured population draws a random subset, a
// lattice takes the 3x3 block around a random cell with wraparound.

use crate::error::{PggError, Result};
use rand::Rng;
use rand::seq::index;
use serde::{Deserialize, Serialize};

/// Size of a Moore neighborhood including its center.
pub const NEIGHBORHOOD_SIZE: usize = 9;

const OFFSETS: [isize; 3] = [-1, 0, 1];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Topology {
    /// Anyone can meet anyone.
    Unstructured,
    /// Row-major torus, index = y * width + x.
    Lattice { width: usize, height: usize },
}

impl Topology {
    /// Number of agents a single game gathers.
    pub fn group_size(&self, nparticipants: usize) -> usize {
        match self {
            Topology::Unstructured => nparticipants,
            Topology::Lattice { .. } => NEIGHBORHOOD_SIZE,
        }
    }

    /// Draws the member indices of one game.
    ///
    /// `nparticipants` only matters for unstructured populations.
    pub fn form_group<R: Rng + ?Sized>(
        &self,
        population_len: usize,
        nparticipants: usize,
        rng: &mut R,
    ) -> Result<Vec<usize>> {
        match *self {
            Topology::Unstructured => sample_without_replacement(population_len, nparticipants, rng),
            Topology::Lattice { width, height } => {
                let x = rng.gen_range(0..width);
                let y = rng.gen_range(0..height);
                Ok(moore_neighborhood(x, y, width, height)
                    .into_iter()
                    .filter_map(|(nx, ny)| self.index(nx, ny))
                    .collect())
            }
        }
    }

    /// `(x, y)` of a flat index, `None` off the grid or without one.
    pub fn coordinates(&self, index: usize) -> Option<(usize, usize)> {
        match *self {
            Topology::Lattice { width, height } if index < width * height => {
                Some((index % width, index / width))
            }
            _ => None,
        }
    }

    /// Flat index of `(x, y)`. Coordinates are not wrapped.
    pub fn index(&self, x: usize, y: usize) -> Option<usize> {
        match *self {
            Topology::Lattice { width, height } if x < width && y < height => Some(y * width + x),
            _ => None,
        }
    }
}

/// `amount` distinct indices from `0..len`, uniformly at random.
pub fn sample_without_replacement<R: Rng + ?Sized>(
    len: usize,
    amount: usize,
    rng: &mut R,
) -> Result<Vec<usize>> {
    if amount > len {
        return Err(PggError::GroupTooLarge {
            group_size: amount,
            population: len,
        });
    }
    Ok(index::sample(rng, len, amount).into_vec())
}

/// The 3x3 block centered on `(x, y)` on a `width` x `height` torus,
/// row by row from the upper-left neighbor. The center is element 4.
pub fn moore_neighborhood(
    x: usize,
    y: usize,
    width: usize,
    height: usize,
) -> [(usize, usize); NEIGHBORHOOD_SIZE] {
    let mut cells = [(0, 0); NEIGHBORHOOD_SIZE];
    let mut slot = 0;
    for dy in OFFSETS {
        for dx in OFFSETS {
            cells[slot] = (wrap(x, dx, width), wrap(y, dy, height));
            slot += 1;
        }
    }
    cells
}

fn wrap(coord: usize, delta: isize, extent: usize) -> usize {
    (coord as isize + delta).rem_euclid(extent as isize) as usize
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::collections::HashSet;

    #[test]
    fn test_corner_wraps_to_opposite_edges() {
        let cells = moore_neighborhood(0, 0, 10, 10);
        let set: HashSet<_> = cells.iter().copied().collect();

        assert_eq!(set.len(), 9);
        for expected in [(9, 9), (9, 0), (0, 9), (1, 1), (0, 0)] {
            assert!(set.contains(&expected), "missing {:?}", expected);
        }
    }

    #[test]
    fn test_all_corners_and_edges_have_nine_cells() {
        let (w, h) = (7, 4);
        for (x, y) in [(0, 0), (6, 0), (0, 3), (6, 3), (3, 0), (0, 2), (6, 1), (2, 3)] {
            let set: HashSet<_> = moore_neighborhood(x, y, w, h).into_iter().collect();
            assert_eq!(set.len(), 9, "cell ({}, {})", x, y);
            assert!(set.iter().all(|&(cx, cy)| cx < w && cy < h));
        }
    }

    #[test]
    fn test_center_is_middle_element() {
        assert_eq!(moore_neighborhood(4, 2, 10, 5)[4], (4, 2));
    }

    #[test]
    fn test_unstructured_group_is_distinct() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..50 {
            let group = Topology::Unstructured.form_group(20, 5, &mut rng).unwrap();
            let set: HashSet<_> = group.iter().copied().collect();
            assert_eq!(group.len(), 5);
            assert_eq!(set.len(), 5);
            assert!(group.iter().all(|&i| i < 20));
        }
    }

    #[test]
    fn test_oversized_group_is_rejected() {
        let mut rng = StdRng::seed_from_u64(42);
        assert_eq!(
            sample_without_replacement(4, 5, &mut rng),
            Err(PggError::GroupTooLarge { group_size: 5, population: 4 })
        );
    }

    #[test]
    fn test_coordinates_and_index_agree() {
        let topology = Topology::Lattice { width: 4, height: 3 };
        for i in 0..12 {
            let (x, y) = topology.coordinates(i).unwrap();
            assert_eq!(topology.index(x, y), Some(i));
        }
        assert_eq!(topology.coordinates(5), Some((1, 1)));
        assert_eq!(topology.coordinates(12), None);
        assert_eq!(topology.index(4, 0), None);
        assert_eq!(Topology::Unstructured.coordinates(0), None);
        assert_eq!(Topology::Unstructured.index(0, 0), None);
    }

    #[test]
    fn test_lattice_group_ignores_nparticipants() {
        let mut rng = StdRng::seed_from_u64(7);
        let topology = Topology::Lattice { width: 5, height: 6 };
        let group = topology.form_group(30, 3, &mut rng).unwrap();
        assert_eq!(group.len(), NEIGHBORHOOD_SIZE);
        assert_eq!(topology.group_size(3), NEIGHBORHOOD_SIZE);
    }
}
