use tracing::debug;

use crate::battle::effects::{execute_move, EffectParams};
use crate::battle::state::{
    BattleEvent, BattleRng, BattleState, EventBus, MoveFailureReason, SideId,
};
use crate::battle::stats::effective_stat;
use crate::move_data::get_move_data;
use crate::pokemon::{PokemonInst, StatType, StatusEffect};

/// Tick status effects at the start of a turn. Paralysis rolls a 25% chance
/// to flag its carrier to skip the turn; every applied effect then counts
/// down one turn of duration and is removed on reaching zero.
pub fn process_status_effects(
    state: &BattleState,
    bus: &mut EventBus,
    rng: &mut BattleRng,
) -> BattleState {
    let mut next = state.clone();

    for side in [SideId::Pokemon1, SideId::Pokemon2] {
        // Sorted so the roll sequence is reproducible under a seeded source.
        let mut statuses: Vec<StatusEffect> =
            next.side(side).status_effects.keys().copied().collect();
        statuses.sort();

        for status in statuses {
            let applied = next
                .side(side)
                .status_effects
                .get(&status)
                .is_some_and(|instance| instance.applied);
            if !applied {
                continue;
            }

            if status == StatusEffect::Paralysis && rng.percent("paralysis check") < 25.0 {
                next.side_mut(side).skip_turn = true;
                bus.publish(BattleEvent::StatusEffectTriggered {
                    pokemon: next.side(side).species,
                    status,
                });
            }

            let expired = {
                let pokemon = next.side_mut(side);
                match pokemon.status_effects.get_mut(&status) {
                    Some(instance) => {
                        instance.turns_remaining = instance.turns_remaining.saturating_sub(1);
                        instance.turns_remaining == 0
                    }
                    None => false,
                }
            };

            if expired {
                next.side_mut(side).status_effects.remove(&status);
                bus.publish(BattleEvent::StatusEffectRemoved {
                    pokemon: next.side(side).species,
                    status,
                });
            }
        }
    }

    next
}

/// Execute one side's selected move against the other and fold the result
/// into a new battle state. An attacker that is skip-flagged, fainted, out
/// of PP, or pointing at an empty slot produces a failed move-use and an
/// otherwise untouched state; the turn simply moves on.
pub fn execute_attack(
    state: &BattleState,
    attacker_side: SideId,
    move_index: usize,
    bus: &mut EventBus,
    rng: &mut BattleRng,
) -> BattleState {
    let mut next = state.clone();
    let defender_side = attacker_side.opponent();

    // The skip flag is spent the moment it is checked, whether or not
    // anything else would have stopped this move.
    if next.side(attacker_side).skip_turn {
        next.side_mut(attacker_side).skip_turn = false;
        bus.publish(BattleEvent::MoveFailed {
            pokemon: next.side(attacker_side).species,
            move_used: None,
            reason: MoveFailureReason::StatusSkip,
        });
        return next;
    }

    if next.side(attacker_side).is_fainted() {
        bus.publish(BattleEvent::MoveFailed {
            pokemon: next.side(attacker_side).species,
            move_used: None,
            reason: MoveFailureReason::Fainted,
        });
        return next;
    }

    let Some(instance) = next
        .side(attacker_side)
        .moves
        .get(move_index)
        .and_then(|slot| slot.as_ref())
    else {
        bus.publish(BattleEvent::MoveFailed {
            pokemon: next.side(attacker_side).species,
            move_used: None,
            reason: MoveFailureReason::NoSuchMove,
        });
        return next;
    };

    let move_used = instance.move_;
    if instance.pp == 0 {
        bus.publish(BattleEvent::MoveFailed {
            pokemon: next.side(attacker_side).species,
            move_used: Some(move_used),
            reason: MoveFailureReason::NoPpRemaining,
        });
        return next;
    }

    {
        let attacker = next.side_mut(attacker_side);
        let species = attacker.species;
        let slot = attacker.moves[move_index]
            .as_mut()
            .expect("slot presence checked above");
        slot.use_move();
        bus.publish(BattleEvent::PpUpdated {
            pokemon: species,
            move_used,
            remaining_pp: slot.pp,
            max_pp: slot.max_pp(),
        });
    }

    bus.publish(BattleEvent::MoveUsed {
        side: attacker_side,
        pokemon: next.side(attacker_side).species,
        move_used,
    });

    let move_data = get_move_data(move_used);
    let attacker_snapshot = next.side(attacker_side).clone();
    let defender_snapshot = next.side(defender_side).clone();
    let params = EffectParams {
        attacker: &attacker_snapshot,
        defender: &defender_snapshot,
        move_used,
        move_data,
        state: &next,
    };
    let outcome = execute_move(&params, bus, rng);

    if let Some(updated) = outcome.attacker {
        *next.side_mut(attacker_side) = updated;
    }
    if let Some(updated) = outcome.defender {
        *next.side_mut(defender_side) = updated;
    }

    if !next.battle_over && next.side(defender_side).is_fainted() {
        bus.publish(BattleEvent::PokemonFainted {
            pokemon: next.side(defender_side).species,
        });
        next.battle_over = true;
        next.winner = Some(attacker_side);
        bus.publish(BattleEvent::BattleEnded {
            winner: attacker_side,
        });
    }

    next
}

/// Resolve one full turn from both sides' move selections. Order goes to
/// the higher effective speed, with an unbiased coin flip on an exact tie,
/// and is fixed for the whole turn even if speeds change mid-turn. If the
/// first move ends the battle the second mover never acts. Resolving a
/// finished battle returns the state unchanged.
pub fn resolve_turn(
    state: &BattleState,
    pokemon1_move: usize,
    pokemon2_move: usize,
    bus: &mut EventBus,
    rng: &mut BattleRng,
) -> BattleState {
    if state.battle_over {
        return state.clone();
    }

    let mut next = process_status_effects(state, bus, rng);

    bus.publish(BattleEvent::TurnStarted { turn: next.turn });

    let speed1 = effective_stat(&next.pokemon1, StatType::Speed);
    let speed2 = effective_stat(&next.pokemon2, StatType::Speed);
    let pokemon1_first = speed1 > speed2 || (speed1 == speed2 && rng.coin_flip("speed tie"));
    let first = if pokemon1_first {
        SideId::Pokemon1
    } else {
        SideId::Pokemon2
    };

    debug!(turn = next.turn, speed1, speed2, ?first, "resolving turn");

    bus.publish(BattleEvent::SpeedComparison {
        pokemon1_speed: speed1,
        pokemon2_speed: speed2,
        first,
    });

    for (side, move_index) in [
        (SideId::Pokemon1, pokemon1_move),
        (SideId::Pokemon2, pokemon2_move),
    ] {
        if let Some(instance) = next.side(side).moves.get(move_index).and_then(|s| s.as_ref()) {
            bus.publish(BattleEvent::MoveSelected {
                side,
                pokemon: next.side(side).species,
                move_used: instance.move_,
            });
        }
    }

    let order = if pokemon1_first {
        [
            (SideId::Pokemon1, pokemon1_move),
            (SideId::Pokemon2, pokemon2_move),
        ]
    } else {
        [
            (SideId::Pokemon2, pokemon2_move),
            (SideId::Pokemon1, pokemon1_move),
        ]
    };

    next = execute_attack(&next, order[0].0, order[0].1, bus, rng);

    if !next.battle_over {
        next = execute_attack(&next, order[1].0, order[1].1, bus, rng);
    }

    if !next.battle_over {
        next.turn += 1;
    }

    next
}

/// Move slots that are filled and still have PP.
pub fn valid_move_indices(pokemon: &PokemonInst) -> Vec<usize> {
    pokemon
        .moves
        .iter()
        .enumerate()
        .filter_map(|(index, slot)| {
            slot.as_ref()
                .filter(|instance| instance.pp > 0)
                .map(|_| index)
        })
        .collect()
}

/// Uniform-random pick among the legal move slots; `None` when nothing is
/// usable. This is the entirety of the built-in move-selection AI.
pub fn select_random_move(pokemon: &PokemonInst, rng: &mut BattleRng) -> Option<usize> {
    let valid = valid_move_indices(pokemon);
    if valid.is_empty() {
        None
    } else {
        Some(valid[rng.pick_index(valid.len(), "ai move selection")])
    }
}
