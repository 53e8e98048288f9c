use crate::*;
use rand::distributions::WeightedIndex;
use rand::prelude::*;

const TOLERANCE: Continous = 1e-9;

/// Categorical distribution used to sample random maps, one tile per cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TileDistribution {
    brown: Continous,
    white: Continous,
    wall: Continous,
    green: Continous,
}

impl Default for TileDistribution {
    fn default() -> Self {
        Self {
            brown: 0.25,
            white: 0.5,
            wall: 0.15,
            green: 0.1,
        }
    }
}

impl TileDistribution {
    pub fn new(brown: Continous, white: Continous, wall: Continous, green: Continous) -> Result<Self> {
        let dist = Self {
            brown,
            white,
            wall,
            green,
        };

        let weights = dist.weights().map(|(_, p)| p);
        if weights.iter().any(|p| !p.is_finite() || *p < 0.) {
            return Err(GridError::InvalidProbability(format!(
                "weights must be finite and non-negative, got {weights:?}"
            )));
        }

        let total = weights.iter().sum::<Continous>();
        if (total - 1.).abs() > TOLERANCE {
            return Err(GridError::InvalidProbability(format!(
                "tile probabilities sum to {total}"
            )));
        }

        Ok(dist)
    }

    pub fn weights(&self) -> [(Tile, Continous); 4] {
        [
            (Tile::Brown, self.brown),
            (Tile::White, self.white),
            (Tile::Wall, self.wall),
            (Tile::Green, self.green),
        ]
    }

    /// Samples an `n` x `n` grid with tiles drawn independently per cell.
    pub fn generate<R: Rng + ?Sized>(&self, n: usize, rng: &mut R) -> Result<Grid> {
        let weights = self.weights();
        let dist = WeightedIndex::new(weights.iter().map(|(_, p)| *p))
            .map_err(|e| GridError::InvalidProbability(e.to_string()))?;

        let mut rows = Vec::with_capacity(n);
        for _ in 0..n {
            let mut row = Vec::with_capacity(n);
            for _ in 0..n {
                row.push(weights[dist.sample(rng)].0);
            }
            rows.push(row);
        }

        Grid::new(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_eq::*;
    use std::collections::HashMap;

    #[test]
    fn default_distribution_is_valid() {
        let d = TileDistribution::default();

        assert_eq!(TileDistribution::new(0.25, 0.5, 0.15, 0.1).unwrap(), d);
    }

    #[test]
    fn distribution_must_sum_to_one() {
        assert!(matches!(
            TileDistribution::new(0.25, 0.5, 0.15, 0.2),
            Err(GridError::InvalidProbability(_))
        ));
        assert!(matches!(
            TileDistribution::new(0.5, 0.5, 0.15, -0.15),
            Err(GridError::InvalidProbability(_))
        ));
    }

    #[test]
    fn generation_is_reproducible_from_seed() {
        let d = TileDistribution::default();

        let a = d.generate(5, &mut StdRng::seed_from_u64(2718)).unwrap();
        let b = d.generate(5, &mut StdRng::seed_from_u64(2718)).unwrap();

        assert_eq!(a.shape(), (5, 5));
        assert_eq!(a, b);
    }

    #[test]
    fn empty_map_is_malformed() {
        let rng = &mut StdRng::seed_from_u64(0);

        assert!(matches!(
            TileDistribution::default().generate(0, rng),
            Err(GridError::MalformedGrid(_))
        ));
    }

    #[test]
    fn tile_frequencies_follow_weights() {
        let rng = &mut StdRng::seed_from_u64(2718);
        let grid = TileDistribution::default().generate(200, rng).unwrap();

        let mut counts = HashMap::<Tile, usize>::new();
        for t in grid.tiles().iter() {
            *counts.entry(*t).or_default() += 1;
        }

        let n = (200 * 200) as Continous;
        for (tile, p) in TileDistribution::default().weights() {
            assert_float_eq!(counts[&tile] as Continous / n, p, abs <= 1e-2);
        }
    }
}
