//! Biome state machine: a closed set of climates advancing over distance.
//!
//! The model owns its own [`SeededRandom`] stream. Transitions only follow
//! edges of the adjacency table returned by [`Biome::neighbors`], so the world
//! never jumps between climatically unrelated biomes.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::random::{Seed, SeededRandom};

/// Climate category governing generation bias.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Biome {
    /// Temperate woodland.
    Forest,
    /// Hot, dry sand.
    Desert,
    /// Cold, pale flats.
    Tundra,
    /// Open grassland; the hub between the other biomes.
    Plains,
    /// Dense urban blocks.
    City,
}

impl Biome {
    /// All biomes in canonical order. The initial biome is drawn from this list.
    pub const ALL: [Biome; 5] = [
        Biome::Forest,
        Biome::Desert,
        Biome::Tundra,
        Biome::Plains,
        Biome::City,
    ];

    /// Biomes this one may transition into.
    pub const fn neighbors(self) -> &'static [Biome] {
        match self {
            Biome::Tundra => &[Biome::Forest, Biome::Plains],
            Biome::Forest => &[Biome::Tundra, Biome::Plains],
            Biome::Plains => &[Biome::Forest, Biome::Desert, Biome::City],
            Biome::City => &[Biome::Plains, Biome::Desert],
            Biome::Desert => &[Biome::Plains, Biome::City],
        }
    }

    /// Returns `true` if `next` is an edge of the adjacency table from `self`.
    pub fn can_transition_to(self, next: Biome) -> bool {
        self.neighbors().contains(&next)
    }

    /// Lowercase name, matching the serialized form.
    pub const fn name(self) -> &'static str {
        match self {
            Biome::Forest => "forest",
            Biome::Desert => "desert",
            Biome::Tundra => "tundra",
            Biome::Plains => "plains",
            Biome::City => "city",
        }
    }
}

impl fmt::Display for Biome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Finite-state climate model.
///
/// Holds the current biome and the distance left before the next transition.
#[derive(Clone, Debug)]
pub struct BiomeSystem {
    rng: SeededRandom,
    current: Biome,
    remaining: f64,
}

impl BiomeSystem {
    /// Distance budget range drawn at init and after every transition.
    pub const MIN_DURATION: i32 = 3000;
    /// Exclusive upper bound of the duration range.
    pub const MAX_DURATION: i32 = 8000;

    /// Create a model with its own stream seeded from `seed`.
    pub fn new(seed: impl Into<Seed>) -> Self {
        let mut rng = SeededRandom::new(seed);
        let index = rng.next_int(0, Biome::ALL.len() as i32) as usize;
        let current = Biome::ALL[index];
        let remaining = f64::from(rng.next_int(Self::MIN_DURATION, Self::MAX_DURATION));
        debug!(biome = %current, remaining, "initial biome");
        Self {
            rng,
            current,
            remaining,
        }
    }

    /// Advance the model by `distance` and return the active biome.
    pub fn update(&mut self, distance: f64) -> Biome {
        self.remaining -= distance;
        if self.remaining <= 0.0 {
            self.switch_biome();
        }
        self.current
    }

    /// Active biome.
    pub fn current(&self) -> Biome {
        self.current
    }

    /// Distance left before the next transition.
    pub fn remaining(&self) -> f64 {
        self.remaining
    }

    fn switch_biome(&mut self) {
        let options = self.current.neighbors();
        debug_assert!(!options.is_empty(), "biome {} has no neighbors", self.current);
        let index = self.rng.next_int(0, options.len() as i32) as usize;
        let previous = self.current;
        self.current = options[index];
        self.remaining = f64::from(self.rng.next_int(Self::MIN_DURATION, Self::MAX_DURATION));
        debug!(from = %previous, to = %self.current, remaining = self.remaining, "biome switched");
    }
}
