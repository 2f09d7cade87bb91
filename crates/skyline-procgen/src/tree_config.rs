//! Vegetation configuration: which tree kinds may grow where, and how tall.
//!
//! The configuration is owned by the caller. The generator never reads a live
//! config; it takes a [`TreeConfig::snapshot`] at construction so later edits
//! only affect generators built afterwards.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::biome::Biome;

/// Vegetation kind. Declaration order is the canonical candidate order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TreeKind {
    /// Very tall conifer.
    Sequoia,
    /// Conifer.
    Pine,
    /// Broad deciduous tree.
    Oak,
    /// Low shrub.
    Bush,
    /// Desert succulent; the only default kind that can flower.
    Cactus,
    /// Trimmed hedge row.
    Hedge,
}

impl TreeKind {
    /// All kinds in canonical order.
    pub const ALL: [TreeKind; 6] = [
        TreeKind::Sequoia,
        TreeKind::Pine,
        TreeKind::Oak,
        TreeKind::Bush,
        TreeKind::Cactus,
        TreeKind::Hedge,
    ];

    /// Fixed footprint width of one instance.
    pub const fn width(self) -> f64 {
        match self {
            TreeKind::Sequoia => 70.0,
            TreeKind::Pine => 60.0,
            TreeKind::Oak => 90.0,
            TreeKind::Bush => 40.0,
            TreeKind::Cactus => 40.0,
            TreeKind::Hedge => 60.0,
        }
    }

    /// Lowercase name, matching the serialized form.
    pub const fn name(self) -> &'static str {
        match self {
            TreeKind::Sequoia => "sequoia",
            TreeKind::Pine => "pine",
            TreeKind::Oak => "oak",
            TreeKind::Bush => "bush",
            TreeKind::Cactus => "cactus",
            TreeKind::Hedge => "hedge",
        }
    }

    /// Built-in settings for this kind.
    pub fn default_item(self) -> TreeConfigItem {
        let (biomes, min_height, max_height, flower_chance): (&[Biome], f64, f64, f64) = match self
        {
            TreeKind::Sequoia => (&[Biome::Forest], 240.0, 340.0, 0.0),
            TreeKind::Pine => (&[Biome::Forest, Biome::Tundra], 140.0, 200.0, 0.0),
            TreeKind::Oak => (&[Biome::Forest, Biome::Plains], 110.0, 150.0, 0.0),
            TreeKind::Bush => (&[Biome::Forest, Biome::Plains], 30.0, 50.0, 0.0),
            TreeKind::Cactus => (&[Biome::Desert], 60.0, 100.0, 0.05),
            TreeKind::Hedge => (&[Biome::Plains, Biome::City], 30.0, 40.0, 0.0),
        };
        TreeConfigItem {
            enabled: true,
            biomes: biomes.to_vec(),
            min_height,
            max_height,
            flower_chance,
        }
    }
}

impl fmt::Display for TreeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Settings for one vegetation kind.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TreeConfigItem {
    /// Whether the kind may be placed at all.
    pub enabled: bool,
    /// Biomes the kind can appear in.
    pub biomes: Vec<Biome>,
    /// Minimum height (inclusive).
    pub min_height: f64,
    /// Maximum height (exclusive).
    pub max_height: f64,
    /// Probability in `[0, 1]` that an instance carries a flower.
    pub flower_chance: f64,
}

impl TreeConfigItem {
    /// Returns `true` if the kind is enabled and allowed in `biome`.
    pub fn allows(&self, biome: Biome) -> bool {
        self.enabled && self.biomes.contains(&biome)
    }
}

/// Errors reported by [`TreeConfig::validate`].
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum TreeConfigError {
    /// The height range is empty or inverted.
    #[error("{kind}: min_height {min} must be below max_height {max}")]
    InvertedHeightRange {
        /// Offending kind.
        kind: TreeKind,
        /// Configured minimum.
        min: f64,
        /// Configured maximum.
        max: f64,
    },
    /// A height is negative or not finite.
    #[error("{kind}: height {value} must be finite and non-negative")]
    InvalidHeight {
        /// Offending kind.
        kind: TreeKind,
        /// Offending value.
        value: f64,
    },
    /// The flower chance is not a probability.
    #[error("{kind}: flower_chance {value} is outside [0, 1]")]
    InvalidFlowerChance {
        /// Offending kind.
        kind: TreeKind,
        /// Offending value.
        value: f64,
    },
}

/// Mapping from vegetation kind to its settings.
///
/// Kinds missing from the map are treated as disabled.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TreeConfig {
    items: BTreeMap<TreeKind, TreeConfigItem>,
}

impl Default for TreeConfig {
    fn default() -> Self {
        let items = TreeKind::ALL
            .into_iter()
            .map(|kind| (kind, kind.default_item()))
            .collect();
        Self { items }
    }
}

impl TreeConfig {
    /// A config with no kinds at all.
    pub fn empty() -> Self {
        Self {
            items: BTreeMap::new(),
        }
    }

    /// Independent copy for a generator to own.
    pub fn snapshot(&self) -> Self {
        self.clone()
    }

    /// Settings for `kind`, if configured.
    pub fn get(&self, kind: TreeKind) -> Option<&TreeConfigItem> {
        self.items.get(&kind)
    }

    /// Mutable settings for `kind`, if configured.
    pub fn get_mut(&mut self, kind: TreeKind) -> Option<&mut TreeConfigItem> {
        self.items.get_mut(&kind)
    }

    /// Replace the settings for `kind`.
    pub fn set(&mut self, kind: TreeKind, item: TreeConfigItem) {
        self.items.insert(kind, item);
    }

    /// Enable or disable a kind. Unconfigured kinds get their defaults first.
    pub fn set_enabled(&mut self, kind: TreeKind, enabled: bool) {
        self.items
            .entry(kind)
            .or_insert_with(|| kind.default_item())
            .enabled = enabled;
    }

    /// Enable or disable every kind.
    pub fn set_all_enabled(&mut self, enabled: bool) {
        for kind in TreeKind::ALL {
            self.set_enabled(kind, enabled);
        }
    }

    /// Restore one kind, or every kind when `kind` is `None`, to the defaults.
    pub fn reset_to_default(&mut self, kind: Option<TreeKind>) {
        match kind {
            Some(kind) => {
                self.items.insert(kind, kind.default_item());
            }
            None => *self = Self::default(),
        }
    }

    /// Returns `true` if `kind` differs from its defaults. Flower chances
    /// within 0.001 of each other compare equal.
    pub fn is_modified(&self, kind: TreeKind) -> bool {
        let Some(current) = self.items.get(&kind) else {
            return true;
        };
        let default = kind.default_item();
        current.enabled != default.enabled
            || current.biomes != default.biomes
            || current.min_height != default.min_height
            || current.max_height != default.max_height
            || (current.flower_chance - default.flower_chance).abs() > 0.001
    }

    /// Kinds that are enabled and allowed in `biome`, in canonical order.
    pub fn candidates(&self, biome: Biome) -> Vec<TreeKind> {
        self.candidate_items(biome)
            .into_iter()
            .map(|(kind, _)| kind)
            .collect()
    }

    /// Same as [`TreeConfig::candidates`], paired with each kind's settings.
    pub fn candidate_items(&self, biome: Biome) -> Vec<(TreeKind, &TreeConfigItem)> {
        self.iter().filter(|(_, item)| item.allows(biome)).collect()
    }

    /// Iterate over configured kinds in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = (TreeKind, &TreeConfigItem)> {
        self.items.iter().map(|(&kind, item)| (kind, item))
    }

    /// Check that every height range and flower chance is usable.
    ///
    /// # Errors
    ///
    /// Returns the first [`TreeConfigError`] found, in canonical kind order.
    pub fn validate(&self) -> Result<(), TreeConfigError> {
        for (&kind, item) in &self.items {
            for value in [item.min_height, item.max_height] {
                if !value.is_finite() || value < 0.0 {
                    return Err(TreeConfigError::InvalidHeight { kind, value });
                }
            }
            if item.min_height >= item.max_height {
                return Err(TreeConfigError::InvertedHeightRange {
                    kind,
                    min: item.min_height,
                    max: item.max_height,
                });
            }
            if !(0.0..=1.0).contains(&item.flower_chance) {
                return Err(TreeConfigError::InvalidFlowerChance {
                    kind,
                    value: item.flower_chance,
                });
            }
        }
        Ok(())
    }
}
