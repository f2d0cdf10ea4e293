//! Pokemon Arena Battle Engine
//!
//! A deterministic, in-process library for two-combatant turn-based battles:
//! speed-ordered turn resolution, a stage-based stat modifier system, a
//! polymorphic move-effect protocol, and a publish/subscribe event stream
//! for presentation layers. Engine operations never mutate the state they
//! are handed; each returns an independent snapshot, and all randomness is
//! drawn through one substitutable source so seeded battles replay exactly.

pub mod battle;
pub mod errors;
pub mod move_data;
pub mod moves;
pub mod pokemon;
pub mod species;

// Core battle engine operations and state.
pub use battle::effects::{execute_move, DamageRoll, EffectParams, MoveOutcome};
pub use battle::engine::{
    execute_attack, process_status_effects, resolve_turn, select_random_move, valid_move_indices,
};
pub use battle::state::{
    BattleEvent, BattleRng, BattleState, EventBus, EventRecord, MoveFailureReason, SideId,
    SubscriberId, Weather,
};
pub use battle::stats::{
    apply_stat_stage_change, effective_stat, stat_stage_multiplier, type_effectiveness, StageChange,
};

// Combatant and catalog types.
pub use moves::{Move, MoveInstance};
pub use pokemon::{PokemonInst, PokemonType, StatType, StatusEffect, StatusInstance};
pub use species::{get_species_data, moves_unlocked_at, BaseStats, Species, SpeciesData};

// Catalog access.
pub use move_data::{get_move_data, move_by_name, MoveCategory, MoveData, MoveEffect};

// Error and result types.
pub use errors::{
    BattleEngineError, BattleResult, MoveDataError, MoveDataResult, SpeciesDataError,
    SpeciesDataResult,
};
