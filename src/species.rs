use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::SpeciesDataError;
use crate::moves::Move;
use crate::pokemon::PokemonType;

/// The playable roster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Species {
    Pikachu,
    Bulbasaur,
    Charmander,
    Squirtle,
}

impl Species {
    pub const ALL: [Species; 4] = [
        Species::Pikachu,
        Species::Bulbasaur,
        Species::Charmander,
        Species::Squirtle,
    ];

    pub fn name(&self) -> &'static str {
        get_species_data(*self).name
    }
}

impl FromStr for Species {
    type Err = SpeciesDataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Species::ALL
            .iter()
            .copied()
            .find(|species| species.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| SpeciesDataError::UnknownSpeciesName(s.to_string()))
    }
}

/// Level-independent stat baselines for a species.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaseStats {
    pub hp: u16,
    pub attack: u16,
    pub defense: u16,
    pub special_attack: u16,
    pub special_defense: u16,
    pub speed: u16,
}

/// Static roster entry: baselines, typing, and the level-keyed learnset.
#[derive(Debug, Clone)]
pub struct SpeciesData {
    pub name: &'static str,
    pub base_stats: BaseStats,
    pub types: &'static [PokemonType],
    /// (unlock level, move) pairs in ascending unlock order.
    pub learnset: &'static [(u8, Move)],
}

pub fn get_species_data(species: Species) -> &'static SpeciesData {
    match species {
        Species::Pikachu => &PIKACHU,
        Species::Bulbasaur => &BULBASAUR,
        Species::Charmander => &CHARMANDER,
        Species::Squirtle => &SQUIRTLE,
    }
}

/// All moves a species has unlocked at `level`, in unlock order.
pub fn moves_unlocked_at(species: Species, level: u8) -> Vec<Move> {
    get_species_data(species)
        .learnset
        .iter()
        .filter(|(unlock_level, _)| *unlock_level <= level)
        .map(|(_, move_)| *move_)
        .collect()
}

static PIKACHU: SpeciesData = SpeciesData {
    name: "Pikachu",
    base_stats: BaseStats {
        hp: 35,
        attack: 55,
        defense: 40,
        special_attack: 50,
        special_defense: 40,
        speed: 90,
    },
    types: &[PokemonType::Electric],
    learnset: &[
        (1, Move::Tackle),
        (1, Move::Growl),
        (5, Move::ThunderWave),
        (10, Move::Thundershock),
        (13, Move::Swift),
        (18, Move::DoubleEdge),
        (25, Move::Thunderbolt),
    ],
};

static BULBASAUR: SpeciesData = SpeciesData {
    name: "Bulbasaur",
    base_stats: BaseStats {
        hp: 45,
        attack: 49,
        defense: 49,
        special_attack: 65,
        special_defense: 65,
        speed: 45,
    },
    types: &[PokemonType::Grass, PokemonType::Poison],
    learnset: &[
        (1, Move::Tackle),
        (1, Move::Growl),
        (7, Move::VineWhip),
        (13, Move::Growth),
        (20, Move::RazorLeaf),
        (27, Move::GigaDrain),
    ],
};

static CHARMANDER: SpeciesData = SpeciesData {
    name: "Charmander",
    base_stats: BaseStats {
        hp: 39,
        attack: 52,
        defense: 43,
        special_attack: 60,
        special_defense: 50,
        speed: 65,
    },
    types: &[PokemonType::Fire],
    learnset: &[
        (1, Move::Scratch),
        (1, Move::Growl),
        (7, Move::Ember),
        (13, Move::FirePunch),
        (19, Move::Leer),
        (25, Move::Flamethrower),
    ],
};

static SQUIRTLE: SpeciesData = SpeciesData {
    name: "Squirtle",
    base_stats: BaseStats {
        hp: 44,
        attack: 48,
        defense: 65,
        special_attack: 50,
        special_defense: 64,
        speed: 43,
    },
    types: &[PokemonType::Water],
    learnset: &[
        (1, Move::Tackle),
        (1, Move::TailWhip),
        (7, Move::WaterGun),
        (13, Move::Withdraw),
        (19, Move::BubbleBeam),
        (25, Move::Recover),
    ],
};
