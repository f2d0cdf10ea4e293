use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::moves::{Move, MoveInstance};
use crate::species::{get_species_data, Species};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PokemonType {
    Normal,
    Fire,
    Water,
    Electric,
    Grass,
    Ice,
    Fighting,
    Poison,
    Ground,
    Flying,
    Psychic,
    Bug,
    Rock,
    Ghost,
    Dragon,
    Dark,
    Steel,
    Fairy,
}

/// The seven stats a stage modifier can attach to. Accuracy and evasion have
/// no base value of their own; they are pure stage carriers over an implicit
/// baseline of 100.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StatType {
    Attack,
    Defense,
    SpecialAttack,
    SpecialDefense,
    Speed,
    Accuracy,
    Evasion,
}

impl fmt::Display for StatType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StatType::Attack => "Attack",
            StatType::Defense => "Defense",
            StatType::SpecialAttack => "Special Attack",
            StatType::SpecialDefense => "Special Defense",
            StatType::Speed => "Speed",
            StatType::Accuracy => "Accuracy",
            StatType::Evasion => "Evasion",
        };
        f.write_str(name)
    }
}

/// Named, duration-bounded conditions a move can inflict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum StatusEffect {
    Paralysis,
    Burn,
}

impl fmt::Display for StatusEffect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StatusEffect::Paralysis => "Paralysis",
            StatusEffect::Burn => "Burn",
        };
        f.write_str(name)
    }
}

/// Live bookkeeping for one status effect on one combatant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusInstance {
    pub applied: bool,
    pub turns_remaining: u8,
}

/// A combatant in a battle: species-derived stats at a level, up to four
/// move slots, and the battle-local modifier state (stat stages, status
/// effects, the turn-skip flag, and the most recent physical damage taken,
/// which Counter reads).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PokemonInst {
    pub name: String,
    pub species: Species,
    pub level: u8,
    pub hp: u16,
    pub max_hp: u16,
    pub attack: u16,
    pub defense: u16,
    pub special_attack: u16,
    pub special_defense: u16,
    pub speed: u16,
    pub types: Vec<PokemonType>,
    pub moves: [Option<MoveInstance>; 4],
    pub stat_stages: HashMap<StatType, i8>,
    pub status_effects: HashMap<StatusEffect, StatusInstance>,
    pub skip_turn: bool,
    pub last_received_physical_damage: Option<u16>,
}

/// `floor(base * 2 * level / 100) + level + 10` for HP,
/// `floor(base * 2 * level / 100) + 5` for everything else.
fn stat_at_level(base: u16, level: u8, is_hp: bool) -> u16 {
    let scaled = (u32::from(base) * 2 * u32::from(level)) / 100;
    let offset = if is_hp { u32::from(level) + 10 } else { 5 };
    (scaled + offset) as u16
}

impl PokemonInst {
    /// Build a combatant from the roster at the given level. Moves default to
    /// the four most recently unlocked learnset entries; pass an explicit
    /// list to override.
    pub fn new(species: Species, level: u8, moves: Option<Vec<Move>>) -> Self {
        let data = get_species_data(species);
        let max_hp = stat_at_level(data.base_stats.hp, level, true);

        let move_list =
            moves.unwrap_or_else(|| Self::derive_moves_from_learnset(species, level));
        let mut move_slots = [const { None }; 4];
        for (i, move_) in move_list.into_iter().take(4).enumerate() {
            move_slots[i] = Some(MoveInstance::new(move_));
        }

        PokemonInst {
            name: data.name.to_string(),
            species,
            level,
            hp: max_hp,
            max_hp,
            attack: stat_at_level(data.base_stats.attack, level, false),
            defense: stat_at_level(data.base_stats.defense, level, false),
            special_attack: stat_at_level(data.base_stats.special_attack, level, false),
            special_defense: stat_at_level(data.base_stats.special_defense, level, false),
            speed: stat_at_level(data.base_stats.speed, level, false),
            types: data.types.to_vec(),
            moves: move_slots,
            stat_stages: HashMap::new(),
            status_effects: HashMap::new(),
            skip_turn: false,
            last_received_physical_damage: None,
        }
    }

    /// The four most recently unlocked moves at this level, oldest first.
    fn derive_moves_from_learnset(species: Species, level: u8) -> Vec<Move> {
        let unlocked = crate::species::moves_unlocked_at(species, level);
        if unlocked.len() <= 4 {
            unlocked
        } else {
            unlocked.into_iter().rev().take(4).rev().collect()
        }
    }

    /// Flat stat value before any stage modifier. Accuracy and evasion read
    /// as a baseline of 100 so the stage tables have something to scale.
    pub fn base_stat(&self, stat: StatType) -> u16 {
        match stat {
            StatType::Attack => self.attack,
            StatType::Defense => self.defense,
            StatType::SpecialAttack => self.special_attack,
            StatType::SpecialDefense => self.special_defense,
            StatType::Speed => self.speed,
            StatType::Accuracy | StatType::Evasion => 100,
        }
    }

    pub fn stat_stage(&self, stat: StatType) -> i8 {
        self.stat_stages.get(&stat).copied().unwrap_or(0)
    }

    pub fn is_fainted(&self) -> bool {
        self.hp == 0
    }

    /// Reduce HP, clamping at zero.
    pub fn take_damage(&mut self, amount: u16) {
        self.hp = self.hp.saturating_sub(amount);
    }

    /// Raise HP, clamping at max. Returns the amount actually restored.
    pub fn heal(&mut self, amount: u16) -> u16 {
        let before = self.hp;
        self.hp = self.hp.saturating_add(amount).min(self.max_hp);
        self.hp - before
    }

    /// Attach a status effect, overwriting any existing entry of the same
    /// name.
    pub fn set_status(&mut self, status: StatusEffect, duration: u8) {
        self.status_effects.insert(
            status,
            StatusInstance {
                applied: true,
                turns_remaining: duration,
            },
        );
    }

    pub fn has_status(&self, status: StatusEffect) -> bool {
        self.status_effects
            .get(&status)
            .is_some_and(|instance| instance.applied)
    }

    /// Drop all battle-local modifier state. Called when a combatant enters a
    /// fresh battle so nothing carries over from a previous one.
    pub fn reset_battle_state(&mut self) {
        self.stat_stages.clear();
        self.status_effects.clear();
        self.skip_turn = false;
        self.last_received_physical_damage = None;
    }

    // Helpers for the game-mode layer's between-battle upkeep.

    pub fn heal_to_full(&mut self) {
        self.hp = self.max_hp;
    }

    pub fn restore_all_pp(&mut self) {
        for slot in self.moves.iter_mut().flatten() {
            slot.pp = slot.max_pp();
        }
    }

    /// Raise the level and recompute stats, restoring HP to the new maximum.
    pub fn level_up(&mut self, levels: u8) {
        let data = get_species_data(self.species);
        self.level = self.level.saturating_add(levels);
        self.max_hp = stat_at_level(data.base_stats.hp, self.level, true);
        self.hp = self.max_hp;
        self.attack = stat_at_level(data.base_stats.attack, self.level, false);
        self.defense = stat_at_level(data.base_stats.defense, self.level, false);
        self.special_attack = stat_at_level(data.base_stats.special_attack, self.level, false);
        self.special_defense = stat_at_level(data.base_stats.special_defense, self.level, false);
        self.speed = stat_at_level(data.base_stats.speed, self.level, false);
    }
}
