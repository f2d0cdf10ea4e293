use std::collections::VecDeque;
use std::fmt;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::time::SystemTime;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::moves::Move;
use crate::pokemon::{PokemonInst, StatType, StatusEffect};
use crate::species::Species;

/// Fixed identifiers for the two sides of a battle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SideId {
    Pokemon1,
    Pokemon2,
}

impl SideId {
    pub fn opponent(&self) -> SideId {
        match self {
            SideId::Pokemon1 => SideId::Pokemon2,
            SideId::Pokemon2 => SideId::Pokemon1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Weather {
    #[default]
    Clear,
    Rain,
    Sunny,
    Sandstorm,
}

/// Why a selected move did not execute. These are expected gameplay
/// outcomes, not errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MoveFailureReason {
    /// A status effect flagged the combatant to sit this turn out.
    StatusSkip,
    /// A fainted combatant cannot act.
    Fainted,
    /// The selected move slot is out of PP.
    NoPpRemaining,
    /// The selected slot holds no move at all.
    NoSuchMove,
    /// Counter was used with no physical damage on record.
    NothingToCounter,
}

/// Everything observable about a battle, one variant per notification kind.
/// The engine's return values are authoritative; events exist for logging
/// and presentation and are never required for correctness.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum BattleEvent {
    BattleStarted {
        pokemon1: Species,
        pokemon2: Species,
    },
    TurnStarted {
        turn: u32,
    },
    SpeedComparison {
        pokemon1_speed: u16,
        pokemon2_speed: u16,
        first: SideId,
    },
    MoveSelected {
        side: SideId,
        pokemon: Species,
        move_used: Move,
    },
    MoveUsed {
        side: SideId,
        pokemon: Species,
        move_used: Move,
    },
    MoveMissed {
        attacker: Species,
        defender: Species,
        move_used: Move,
    },
    MoveFailed {
        pokemon: Species,
        move_used: Option<Move>,
        reason: MoveFailureReason,
    },
    PpUpdated {
        pokemon: Species,
        move_used: Move,
        remaining_pp: u8,
        max_pp: u8,
    },
    DamageCalculated {
        attacker: Species,
        defender: Species,
        move_used: Move,
        damage: u16,
        stab: f64,
        type_effectiveness: f64,
    },
    DamageApplied {
        pokemon: Species,
        amount: u16,
        remaining_hp: u16,
        max_hp: u16,
    },
    HealingApplied {
        pokemon: Species,
        amount: u16,
        new_hp: u16,
    },
    StatusEffectApplied {
        pokemon: Species,
        status: StatusEffect,
    },
    StatusEffectRemoved {
        pokemon: Species,
        status: StatusEffect,
    },
    StatusEffectTriggered {
        pokemon: Species,
        status: StatusEffect,
    },
    StatRaised {
        pokemon: Species,
        stat: StatType,
        stages: i8,
        message: String,
    },
    StatLowered {
        pokemon: Species,
        stat: StatType,
        stages: i8,
        message: String,
    },
    MultiHit {
        attacker: Species,
        hit_number: u8,
        total_hits: u8,
        damage: u16,
    },
    RecoilDamage {
        pokemon: Species,
        damage: u16,
        caused_by: Move,
    },
    CounterTriggered {
        pokemon: Species,
        original_damage: u16,
        counter_damage: u16,
    },
    MetronomeSelected {
        pokemon: Species,
        selected: Move,
    },
    PokemonFainted {
        pokemon: Species,
    },
    BattleEnded {
        winner: SideId,
    },
}

/// What a subscriber receives: the event plus when it was published.
#[derive(Debug, Clone)]
pub struct EventRecord {
    pub timestamp: SystemTime,
    pub event: BattleEvent,
}

/// Handle returned by `EventBus::subscribe`, used to unsubscribe later.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubscriberId(usize);

type Subscriber = Box<dyn FnMut(&EventRecord)>;

/// Synchronous publish/subscribe channel between the engine and its
/// observers. Owned by whoever runs the battle and passed by reference; call
/// `reset` when starting a new session so stale subscribers from the previous
/// one never fire.
#[derive(Default)]
pub struct EventBus {
    subscribers: Vec<(SubscriberId, Subscriber)>,
    next_id: usize,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a subscriber. Subscribers run in registration order on every
    /// publish until unsubscribed or the bus is reset.
    pub fn subscribe(&mut self, subscriber: impl FnMut(&EventRecord) + 'static) -> SubscriberId {
        let id = SubscriberId(self.next_id);
        self.next_id += 1;
        self.subscribers.push((id, Box::new(subscriber)));
        id
    }

    /// Remove one subscriber. Returns false if the id was already gone.
    pub fn unsubscribe(&mut self, id: SubscriberId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(sub_id, _)| *sub_id != id);
        self.subscribers.len() != before
    }

    /// Drop every subscriber. Call at the start of a new battle session.
    pub fn reset(&mut self) {
        self.subscribers.clear();
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    /// Deliver an event to every subscriber, in order, before returning.
    /// A panicking subscriber is contained so the rest still run and the
    /// publisher's control flow is never unwound.
    pub fn publish(&mut self, event: BattleEvent) {
        let record = EventRecord {
            timestamp: SystemTime::now(),
            event,
        };
        for (_, subscriber) in self.subscribers.iter_mut() {
            let _ = catch_unwind(AssertUnwindSafe(|| subscriber(&record)));
        }
    }
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}

/// Source of every random draw the engine makes. Backed either by a seedable
/// `StdRng` or, for tests, by a scripted sequence of rolls in `[0, 100)`
/// consumed one per draw. Scripted sources panic with the consumption reason
/// when they run dry, which makes under-provisioned tests easy to diagnose.
#[derive(Debug, Clone)]
pub struct BattleRng {
    source: RngSource,
}

#[derive(Debug, Clone)]
enum RngSource {
    Live(StdRng),
    Scripted(VecDeque<f64>),
}

impl BattleRng {
    pub fn new_random() -> Self {
        BattleRng {
            source: RngSource::Live(StdRng::from_os_rng()),
        }
    }

    /// Deterministic live source; the same seed replays the same battle.
    pub fn from_seed(seed: u64) -> Self {
        BattleRng {
            source: RngSource::Live(StdRng::seed_from_u64(seed)),
        }
    }

    pub fn new_for_test(rolls: Vec<f64>) -> Self {
        BattleRng {
            source: RngSource::Scripted(rolls.into()),
        }
    }

    /// One uniform draw in `[0, 100)`; every other method derives from this.
    fn next_roll(&mut self, reason: &str) -> f64 {
        let roll = match &mut self.source {
            RngSource::Live(rng) => rng.random_range(0.0..100.0),
            RngSource::Scripted(rolls) => rolls.pop_front().unwrap_or_else(|| {
                panic!("BattleRng exhausted! Tried to draw a value for: '{reason}'.")
            }),
        };

        #[cfg(test)]
        println!("[RNG] {roll:.2} for: {reason}");

        roll
    }

    /// Uniform percentage roll in `[0, 100)`.
    pub fn percent(&mut self, reason: &str) -> f64 {
        self.next_roll(reason)
    }

    /// Damage jitter in `[0.85, 1.0)`.
    pub fn damage_factor(&mut self, reason: &str) -> f64 {
        0.85 + self.next_roll(reason) * 0.15 / 100.0
    }

    pub fn coin_flip(&mut self, reason: &str) -> bool {
        self.next_roll(reason) < 50.0
    }

    /// Hit count for a multi-strike move: 2 or 3 hits 37.5% of the time
    /// each, 4 or 5 hits 12.5% each.
    pub fn multi_hit_count(&mut self, reason: &str) -> u8 {
        let roll = self.next_roll(reason);
        if roll < 37.5 {
            2
        } else if roll < 75.0 {
            3
        } else if roll < 87.5 {
            4
        } else {
            5
        }
    }

    /// Uniform index into a non-empty collection.
    pub fn pick_index(&mut self, len: usize, reason: &str) -> usize {
        debug_assert!(len > 0, "pick_index over an empty collection");
        let roll = self.next_roll(reason);
        (((roll / 100.0) * len as f64) as usize).min(len - 1)
    }
}

/// The full state of one battle. Engine operations never mutate a state they
/// are handed; they clone, transform, and return, so callers can keep any
/// snapshot they like.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BattleState {
    pub pokemon1: PokemonInst,
    pub pokemon2: PokemonInst,
    pub turn: u32,
    pub weather: Weather,
    pub battle_over: bool,
    pub winner: Option<SideId>,
}

impl BattleState {
    /// Start a fresh battle. Both combatants enter with neutral stages and
    /// no status effects regardless of what they carried before.
    pub fn new(mut pokemon1: PokemonInst, mut pokemon2: PokemonInst, bus: &mut EventBus) -> Self {
        pokemon1.reset_battle_state();
        pokemon2.reset_battle_state();

        bus.publish(BattleEvent::BattleStarted {
            pokemon1: pokemon1.species,
            pokemon2: pokemon2.species,
        });

        BattleState {
            pokemon1,
            pokemon2,
            turn: 1,
            weather: Weather::default(),
            battle_over: false,
            winner: None,
        }
    }

    pub fn side(&self, side: SideId) -> &PokemonInst {
        match side {
            SideId::Pokemon1 => &self.pokemon1,
            SideId::Pokemon2 => &self.pokemon2,
        }
    }

    pub fn side_mut(&mut self, side: SideId) -> &mut PokemonInst {
        match side {
            SideId::Pokemon1 => &mut self.pokemon1,
            SideId::Pokemon2 => &mut self.pokemon2,
        }
    }
}
