use crate::pokemon::{PokemonInst, PokemonType, StatType};

// Stage multipliers indexed by stage + 6, so index 0 is stage -6 and index
// 12 is stage +6. Attack, Defense, Sp. Atk, Sp. Def, and Speed share one
// progression; accuracy and evasion use a flatter one.
const BATTLE_STAT_MULTIPLIERS: [f64; 13] = [
    2.0 / 8.0,
    2.0 / 7.0,
    2.0 / 6.0,
    2.0 / 5.0,
    2.0 / 4.0,
    2.0 / 3.0,
    2.0 / 2.0,
    3.0 / 2.0,
    4.0 / 2.0,
    5.0 / 2.0,
    6.0 / 2.0,
    7.0 / 2.0,
    8.0 / 2.0,
];

const ACCURACY_EVASION_MULTIPLIERS: [f64; 13] = [
    3.0 / 9.0,
    3.0 / 8.0,
    3.0 / 7.0,
    3.0 / 6.0,
    3.0 / 5.0,
    3.0 / 4.0,
    3.0 / 3.0,
    4.0 / 3.0,
    5.0 / 3.0,
    6.0 / 3.0,
    7.0 / 3.0,
    8.0 / 3.0,
    9.0 / 3.0,
];

/// Multiplier a stage applies to the given stat.
pub fn stat_stage_multiplier(stat: StatType, stage: i8) -> f64 {
    let index = (stage.clamp(-6, 6) + 6) as usize;
    match stat {
        StatType::Accuracy | StatType::Evasion => ACCURACY_EVASION_MULTIPLIERS[index],
        _ => BATTLE_STAT_MULTIPLIERS[index],
    }
}

/// Shortcut for the accuracy/evasion progression, used by the hit check.
pub fn accuracy_stage_multiplier(stage: i8) -> f64 {
    stat_stage_multiplier(StatType::Accuracy, stage)
}

/// A stat's value with its stage modifier applied: the unmodified base when
/// no stage is recorded, otherwise floored and never below 1.
pub fn effective_stat(pokemon: &PokemonInst, stat: StatType) -> u16 {
    let base = pokemon.base_stat(stat);
    let stage = pokemon.stat_stage(stat);
    if stage == 0 {
        return base;
    }

    let scaled = (f64::from(base) * stat_stage_multiplier(stat, stage)).floor() as u16;
    scaled.max(1)
}

/// Result of applying a stage delta: the updated combatant and the line of
/// battle text describing what happened.
#[derive(Debug, Clone)]
pub struct StageChange {
    pub pokemon: PokemonInst,
    pub stat: StatType,
    pub old_stage: i8,
    pub new_stage: i8,
    pub message: String,
}

/// Add `delta` stages to a stat, clamping to [-6, +6]. The input combatant
/// is untouched; the returned copy owns an independent stage map. The
/// message intensity follows the realized change: one stage is unqualified,
/// two is "sharply", three or more is "drastically", and a delta fully
/// absorbed by the clamp reports that the stat cannot move further.
pub fn apply_stat_stage_change(pokemon: &PokemonInst, stat: StatType, delta: i8) -> StageChange {
    let mut updated = pokemon.clone();
    let old_stage = updated.stat_stage(stat);
    let new_stage = (old_stage + delta).clamp(-6, 6);
    updated.stat_stages.insert(stat, new_stage);

    let message = if new_stage == old_stage {
        if delta > 0 {
            format!("{}'s {} won't go any higher!", updated.name, stat)
        } else {
            format!("{}'s {} won't go any lower!", updated.name, stat)
        }
    } else {
        let magnitude = (new_stage - old_stage).abs();
        let qualifier = match magnitude {
            1 => "",
            2 => "sharply ",
            _ => "drastically ",
        };
        if new_stage > old_stage {
            format!("{}'s {} {}rose!", updated.name, stat, qualifier)
        } else {
            format!("{}'s {} {}fell!", updated.name, stat, qualifier)
        }
    };

    StageChange {
        pokemon: updated,
        stat,
        old_stage,
        new_stage,
        message,
    }
}

/// Damage multiplier of an attack type against one defending type. Only the
/// matchups the chart defines deviate from neutral; everything else,
/// including attack types with no chart row at all, multiplies by 1.
fn type_matchup(attack: PokemonType, defender: PokemonType) -> f64 {
    use PokemonType::*;
    match (attack, defender) {
        (Normal, Rock | Steel) => 0.5,
        (Normal, Ghost) => 0.0,

        (Fire, Grass | Ice | Bug | Steel) => 2.0,
        (Fire, Fire | Water | Rock | Dragon) => 0.5,

        (Water, Fire | Ground | Rock) => 2.0,
        (Water, Water | Grass | Dragon) => 0.5,

        (Electric, Water | Flying) => 2.0,
        (Electric, Electric | Grass | Dragon) => 0.5,
        (Electric, Ground) => 0.0,

        (Grass, Water | Ground | Rock) => 2.0,
        (Grass, Fire | Grass | Poison | Flying | Bug | Dragon | Steel) => 0.5,

        (Poison, Grass | Fairy) => 2.0,
        (Poison, Poison | Ground | Rock | Ghost) => 0.5,
        (Poison, Steel) => 0.0,

        _ => 1.0,
    }
}

/// Combined effectiveness of an attack type against a defender's full
/// typing: the product over each defending type. A dual-typed defender can
/// therefore land anywhere in {0, 0.25, 0.5, 1, 2, 4}.
pub fn type_effectiveness(attack: PokemonType, defender_types: &[PokemonType]) -> f64 {
    defender_types
        .iter()
        .map(|defender| type_matchup(attack, *defender))
        .product()
}
