use std::collections::HashMap;
use std::sync::LazyLock;

use serde::{Deserialize, Serialize};

use crate::battle::state::Weather;
use crate::errors::{MoveDataError, MoveDataResult};
use crate::moves::Move;
use crate::pokemon::{PokemonType, StatType, StatusEffect};

// Catalog is built once on first access and lives for the process.
static MOVE_CATALOG: LazyLock<HashMap<Move, MoveData>> = LazyLock::new(build_move_catalog);

/// Look up the catalog entry behind a move identifier.
pub fn get_move_data(move_: Move) -> &'static MoveData {
    MOVE_CATALOG
        .get(&move_)
        .expect("every Move identifier has a catalog entry")
}

pub fn get_move_max_pp(move_: Move) -> u8 {
    get_move_data(move_).max_pp
}

/// Resolve a move by its display name ("Vine Whip", "Double-Edge", ...).
/// This is the loud-failure surface for misconfigured rosters.
pub fn move_by_name(name: &str) -> MoveDataResult<Move> {
    Move::ALL
        .iter()
        .copied()
        .find(|move_| get_move_data(*move_).name == name)
        .ok_or_else(|| MoveDataError::UnknownMoveName(name.to_string()))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MoveCategory {
    Physical,
    Special,
    Status,
}

/// The behavior a move binds to, dispatched when the move executes. A closed
/// enum so every variant is exhaustively matched and testable; the parameter
/// bag rides on the variant itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum MoveEffect {
    /// Accuracy check, then one damage application.
    Standard,
    /// Damage with no accuracy check.
    AlwaysHit,
    /// Accuracy check, then attach a status effect to the target.
    InflictStatus { status: StatusEffect, duration: u8 },
    /// Raise one of the user's stat stages. Never misses.
    RaiseStat { stat: StatType, stages: i8 },
    /// Lower one of the target's stat stages after an accuracy check.
    LowerStat { stat: StatType, stages: i8 },
    /// Restore a percentage of the user's max HP.
    Heal { percent: u8 },
    /// One accuracy check covering 2-5 hits, each rolled and applied
    /// separately; the sequence stops early if the target faints.
    MultiHit,
    /// Standard attack, then the user takes `fraction` of the damage dealt
    /// (at least 1) as recoil.
    Recoil { fraction: f64 },
    /// Standard attack; on a hit, an independent `chance`% roll applies the
    /// secondary effect on top.
    Secondary { chance: u8, effect: Box<MoveEffect> },
    /// Standard attack that heals the user for a percentage of damage dealt.
    Drain { percent: u8 },
    /// Run `first`; if the target is still standing, run `second` against the
    /// updated state and merge the outcomes.
    Combo { first: Box<MoveEffect>, second: Box<MoveEffect> },
    /// Pick a sub-effect by the battle's current weather, falling back to
    /// `default` when no entry matches.
    WeatherDependent {
        effects: Vec<(Weather, MoveEffect)>,
        default: Box<MoveEffect>,
    },
    /// Return double the last physical damage the user received. Fails
    /// outright when nothing has been recorded.
    Counter,
    /// Pick any other catalog move uniformly at random and run its effect.
    Metronome,
}

/// Immutable, catalog-owned definition of one move. Battle state never holds
/// one of these; it stores `Move` identifiers and looks the data up here.
#[derive(Debug, Clone, PartialEq)]
pub struct MoveData {
    pub name: &'static str,
    pub power: u16,
    pub max_pp: u8,
    /// `None` means the move can never miss.
    pub accuracy: Option<u8>,
    pub category: MoveCategory,
    pub move_type: PokemonType,
    /// Override which of the attacker's stats the damage core reads.
    pub attack_stat: Option<StatType>,
    /// Override which of the defender's stats the damage core reads.
    pub defense_stat: Option<StatType>,
    pub effect: MoveEffect,
    pub description: &'static str,
}

/// Plain damaging move: accuracy 100, standard attack behavior.
fn strike(
    name: &'static str,
    power: u16,
    max_pp: u8,
    category: MoveCategory,
    move_type: PokemonType,
) -> MoveData {
    MoveData {
        name,
        power,
        max_pp,
        accuracy: Some(100),
        category,
        move_type,
        attack_stat: None,
        defense_stat: None,
        effect: MoveEffect::Standard,
        description: "",
    }
}

/// Non-damaging move: power 0, accuracy 100, Status category.
fn status(
    name: &'static str,
    max_pp: u8,
    move_type: PokemonType,
    effect: MoveEffect,
) -> MoveData {
    MoveData {
        name,
        power: 0,
        max_pp,
        accuracy: Some(100),
        category: MoveCategory::Status,
        move_type,
        attack_stat: None,
        defense_stat: None,
        effect,
        description: "",
    }
}

fn build_move_catalog() -> HashMap<Move, MoveData> {
    use MoveCategory::{Physical, Special};
    use PokemonType as T;

    let mut catalog = HashMap::new();

    // Basic physical strikes.
    catalog.insert(
        Move::Tackle,
        MoveData {
            description: "A full-body charge attack.",
            ..strike("Tackle", 40, 35, Physical, T::Normal)
        },
    );
    catalog.insert(
        Move::Scratch,
        MoveData {
            description: "Rakes the target with sharp claws.",
            ..strike("Scratch", 40, 35, Physical, T::Normal)
        },
    );

    // Elemental special strikes.
    catalog.insert(
        Move::Thundershock,
        MoveData {
            description: "A jolt of electricity hurled at the target.",
            ..strike("Thundershock", 40, 30, Special, T::Electric)
        },
    );
    catalog.insert(
        Move::VineWhip,
        MoveData {
            description: "Strikes the target with slender vines.",
            ..strike("Vine Whip", 45, 25, Special, T::Grass)
        },
    );
    catalog.insert(
        Move::Ember,
        MoveData {
            description: "Attacks with small flames.",
            ..strike("Ember", 40, 25, Special, T::Fire)
        },
    );
    catalog.insert(
        Move::WaterGun,
        MoveData {
            description: "Blasts the target with a forceful shot of water.",
            ..strike("Water Gun", 40, 25, Special, T::Water)
        },
    );
    catalog.insert(
        Move::Thunderbolt,
        MoveData {
            description: "A strong electric blast.",
            ..strike("Thunderbolt", 90, 15, Special, T::Electric)
        },
    );
    catalog.insert(
        Move::RazorLeaf,
        MoveData {
            description: "Launches sharp-edged leaves.",
            ..strike("Razor Leaf", 55, 25, Special, T::Grass)
        },
    );
    catalog.insert(
        Move::Flamethrower,
        MoveData {
            description: "Scorches the target with an intense blast of fire.",
            ..strike("Flamethrower", 90, 15, Special, T::Fire)
        },
    );

    // Secondary-effect attacks.
    catalog.insert(
        Move::BubbleBeam,
        MoveData {
            effect: MoveEffect::Secondary {
                chance: 10,
                effect: Box::new(MoveEffect::LowerStat {
                    stat: StatType::Speed,
                    stages: 1,
                }),
            },
            description: "A spray of bubbles that may lower the target's Speed.",
            ..strike("Bubble Beam", 65, 20, Special, T::Water)
        },
    );
    catalog.insert(
        Move::FirePunch,
        MoveData {
            effect: MoveEffect::Secondary {
                chance: 10,
                effect: Box::new(MoveEffect::InflictStatus {
                    status: StatusEffect::Burn,
                    duration: 3,
                }),
            },
            description: "A fiery punch that may leave the target with a burn.",
            ..strike("Fire Punch", 75, 15, Physical, T::Fire)
        },
    );

    // Never misses.
    catalog.insert(
        Move::Swift,
        MoveData {
            accuracy: None,
            effect: MoveEffect::AlwaysHit,
            description: "Star-shaped rays that never miss.",
            ..strike("Swift", 60, 20, Special, T::Normal)
        },
    );

    // Mixed-stat attack: special attack against physical defense.
    catalog.insert(
        Move::Psyshock,
        MoveData {
            attack_stat: Some(StatType::SpecialAttack),
            defense_stat: Some(StatType::Defense),
            description: "A psychic wave that does physical damage.",
            ..strike("Psyshock", 80, 10, Special, T::Psychic)
        },
    );

    // Recoil.
    catalog.insert(
        Move::DoubleEdge,
        MoveData {
            effect: MoveEffect::Recoil { fraction: 0.33 },
            description: "A reckless, life-risking tackle that also hurts the user.",
            ..strike("Double-Edge", 120, 15, Physical, T::Normal)
        },
    );

    // Multi-hit.
    catalog.insert(
        Move::PinMissile,
        MoveData {
            accuracy: Some(95),
            effect: MoveEffect::MultiHit,
            description: "Sharp spikes shot in rapid succession. Hits 2-5 times.",
            ..strike("Pin Missile", 25, 20, Physical, T::Bug)
        },
    );

    // Drain.
    catalog.insert(
        Move::GigaDrain,
        MoveData {
            effect: MoveEffect::Drain { percent: 50 },
            description: "Drains nutrients, restoring HP by half the damage dealt.",
            ..strike("Giga Drain", 75, 10, Special, T::Grass)
        },
    );

    // Counter.
    catalog.insert(
        Move::Counter,
        MoveData {
            effect: MoveEffect::Counter,
            description: "Retaliates against a physical attack with double the damage taken.",
            ..strike("Counter", 0, 20, Physical, T::Fighting)
        },
    );

    // Status infliction.
    catalog.insert(
        Move::ThunderWave,
        MoveData {
            accuracy: Some(90),
            description: "A weak jolt of electricity that paralyzes the target.",
            ..status(
                "Thunder Wave",
                20,
                T::Electric,
                MoveEffect::InflictStatus {
                    status: StatusEffect::Paralysis,
                    duration: 3,
                },
            )
        },
    );

    // Self stat boosts.
    catalog.insert(
        Move::Growth,
        MoveData {
            description: "The user's body grows, raising its Sp. Atk.",
            ..status(
                "Growth",
                20,
                T::Normal,
                MoveEffect::RaiseStat {
                    stat: StatType::SpecialAttack,
                    stages: 1,
                },
            )
        },
    );
    catalog.insert(
        Move::Withdraw,
        MoveData {
            description: "Withdraws into its shell, raising Defense.",
            ..status(
                "Withdraw",
                15,
                T::Water,
                MoveEffect::RaiseStat {
                    stat: StatType::Defense,
                    stages: 1,
                },
            )
        },
    );
    catalog.insert(
        Move::Howl,
        MoveData {
            description: "Howls to raise its spirit and its Attack.",
            ..status(
                "Howl",
                40,
                T::Normal,
                MoveEffect::RaiseStat {
                    stat: StatType::Attack,
                    stages: 1,
                },
            )
        },
    );
    catalog.insert(
        Move::Meditate,
        MoveData {
            description: "Meditates to awaken power and raise Attack.",
            ..status(
                "Meditate",
                40,
                T::Psychic,
                MoveEffect::RaiseStat {
                    stat: StatType::Attack,
                    stages: 1,
                },
            )
        },
    );
    catalog.insert(
        Move::DefenseCurl,
        MoveData {
            description: "Curls up to conceal weak spots and raise Defense.",
            ..status(
                "Defense Curl",
                40,
                T::Normal,
                MoveEffect::RaiseStat {
                    stat: StatType::Defense,
                    stages: 1,
                },
            )
        },
    );
    catalog.insert(
        Move::Harden,
        MoveData {
            description: "Stiffens the body's muscles to raise Defense.",
            ..status(
                "Harden",
                30,
                T::Normal,
                MoveEffect::RaiseStat {
                    stat: StatType::Defense,
                    stages: 1,
                },
            )
        },
    );
    catalog.insert(
        Move::NastyPlot,
        MoveData {
            description: "Stimulates the brain with bad thoughts. Sharply raises Sp. Atk.",
            ..status(
                "Nasty Plot",
                20,
                T::Dark,
                MoveEffect::RaiseStat {
                    stat: StatType::SpecialAttack,
                    stages: 2,
                },
            )
        },
    );
    catalog.insert(
        Move::DoubleTeam,
        MoveData {
            description: "Creates illusory copies to raise evasiveness.",
            ..status(
                "Double Team",
                15,
                T::Normal,
                MoveEffect::RaiseStat {
                    stat: StatType::Evasion,
                    stages: 1,
                },
            )
        },
    );

    // Target stat reductions.
    catalog.insert(
        Move::Growl,
        MoveData {
            description: "Growls cutely to lower the target's Attack.",
            ..status(
                "Growl",
                40,
                T::Normal,
                MoveEffect::LowerStat {
                    stat: StatType::Attack,
                    stages: 1,
                },
            )
        },
    );
    catalog.insert(
        Move::TailWhip,
        MoveData {
            description: "Wags its tail to lower the target's Defense.",
            ..status(
                "Tail Whip",
                30,
                T::Normal,
                MoveEffect::LowerStat {
                    stat: StatType::Defense,
                    stages: 1,
                },
            )
        },
    );
    catalog.insert(
        Move::Leer,
        MoveData {
            description: "An intimidating leer that lowers Defense.",
            ..status(
                "Leer",
                30,
                T::Normal,
                MoveEffect::LowerStat {
                    stat: StatType::Defense,
                    stages: 1,
                },
            )
        },
    );
    catalog.insert(
        Move::StringShot,
        MoveData {
            description: "Binds the target with silk, sharply lowering Speed.",
            ..status(
                "String Shot",
                40,
                T::Bug,
                MoveEffect::LowerStat {
                    stat: StatType::Speed,
                    stages: 2,
                },
            )
        },
    );
    catalog.insert(
        Move::SandAttack,
        MoveData {
            description: "Hurls sand in the target's face, reducing accuracy.",
            ..status(
                "Sand Attack",
                15,
                T::Ground,
                MoveEffect::LowerStat {
                    stat: StatType::Accuracy,
                    stages: 1,
                },
            )
        },
    );

    // Healing.
    catalog.insert(
        Move::Recover,
        MoveData {
            description: "Restores up to half of the user's max HP.",
            ..status("Recover", 10, T::Normal, MoveEffect::Heal { percent: 50 })
        },
    );

    // Combos.
    catalog.insert(
        Move::SwordsDance,
        MoveData {
            description: "A frenetic dance that sharply raises Attack and steadies the user.",
            ..status(
                "Swords Dance",
                20,
                T::Normal,
                MoveEffect::Combo {
                    first: Box::new(MoveEffect::RaiseStat {
                        stat: StatType::Attack,
                        stages: 2,
                    }),
                    second: Box::new(MoveEffect::Heal { percent: 10 }),
                },
            )
        },
    );
    catalog.insert(
        Move::CosmicPower,
        MoveData {
            description: "Absorbs a mystical power, raising Defense and Sp. Def.",
            ..status(
                "Cosmic Power",
                20,
                T::Psychic,
                MoveEffect::Combo {
                    first: Box::new(MoveEffect::RaiseStat {
                        stat: StatType::Defense,
                        stages: 1,
                    }),
                    second: Box::new(MoveEffect::RaiseStat {
                        stat: StatType::SpecialDefense,
                        stages: 1,
                    }),
                },
            )
        },
    );
    catalog.insert(
        Move::DragonDance,
        MoveData {
            description: "A mystic dance that raises Attack and Speed.",
            ..status(
                "Dragon Dance",
                20,
                T::Dragon,
                MoveEffect::Combo {
                    first: Box::new(MoveEffect::RaiseStat {
                        stat: StatType::Attack,
                        stages: 1,
                    }),
                    second: Box::new(MoveEffect::RaiseStat {
                        stat: StatType::Speed,
                        stages: 1,
                    }),
                },
            )
        },
    );

    // Random redirect.
    catalog.insert(
        Move::Metronome,
        MoveData {
            description: "Waggles a finger to use any other move at random.",
            ..status("Metronome", 10, T::Normal, MoveEffect::Metronome)
        },
    );

    catalog
}
