use crate::battle::effects::{execute_move, EffectParams};
use crate::battle::engine::execute_attack;
use crate::battle::state::{
    BattleEvent, BattleRng, BattleState, MoveFailureReason, SideId, Weather,
};
use crate::battle::tests::common::{recording_bus, TestPokemonBuilder};
use crate::move_data::{get_move_data, MoveCategory, MoveData, MoveEffect};
use crate::moves::Move;
use crate::pokemon::{PokemonType, StatType, StatusEffect};
use crate::species::Species;
use pretty_assertions::assert_eq;

#[test]
fn test_multi_hit_stops_at_the_fainting_hit() {
    let pikachu = TestPokemonBuilder::new(Species::Pikachu, 15)
        .with_moves(vec![Move::PinMissile])
        .build();
    let charmander = TestPokemonBuilder::new(Species::Charmander, 15)
        .with_moves(vec![Move::Scratch])
        .with_hp(10)
        .build();

    let (mut bus, events) = recording_bus();
    let state = BattleState::new(pikachu, charmander, &mut bus);

    // Hit-count roll of 80 draws 4 hits; each lands 6 at minimum jitter.
    // Only two jitter rolls are provided: the third hit must never roll,
    // because the second one already fainted the defender.
    let mut rng = BattleRng::new_for_test(vec![80.0, 50.0, 0.0, 0.0]);
    let next = execute_attack(&state, SideId::Pokemon1, 0, &mut bus, &mut rng);

    assert_eq!(next.pokemon2.hp, 0);
    assert!(next.battle_over);
    assert_eq!(next.winner, Some(SideId::Pokemon1));

    let events = events.borrow();
    let hits: Vec<u16> = events
        .iter()
        .filter_map(|event| match event {
            BattleEvent::MultiHit { damage, .. } => Some(*damage),
            _ => None,
        })
        .collect();
    assert_eq!(hits, vec![6, 6]);
}

#[test]
fn test_multi_hit_runs_the_full_sequence() {
    let pikachu = TestPokemonBuilder::new(Species::Pikachu, 15)
        .with_moves(vec![Move::PinMissile])
        .build();
    let charmander = TestPokemonBuilder::new(Species::Charmander, 15)
        .with_moves(vec![Move::Scratch])
        .build();

    let (mut bus, events) = recording_bus();
    let state = BattleState::new(pikachu, charmander, &mut bus);

    // Roll 0.0 draws the minimum 2 hits.
    let mut rng = BattleRng::new_for_test(vec![0.0, 50.0, 0.0, 0.0]);
    let next = execute_attack(&state, SideId::Pokemon1, 0, &mut bus, &mut rng);

    assert_eq!(next.pokemon2.hp, 36 - 12);
    let progress: Vec<(u8, u8)> = events
        .borrow()
        .iter()
        .filter_map(|event| match event {
            BattleEvent::MultiHit {
                hit_number,
                total_hits,
                ..
            } => Some((*hit_number, *total_hits)),
            _ => None,
        })
        .collect();
    assert_eq!(progress, vec![(1, 2), (2, 2)]);
}

#[test]
fn test_multi_hit_single_accuracy_check_covers_all_hits() {
    let pikachu = TestPokemonBuilder::new(Species::Pikachu, 15)
        .with_moves(vec![Move::PinMissile])
        .build();
    let charmander = TestPokemonBuilder::new(Species::Charmander, 15)
        .with_moves(vec![Move::Scratch])
        .build();

    let (mut bus, events) = recording_bus();
    let state = BattleState::new(pikachu, charmander, &mut bus);

    // Pin Missile's accuracy is 95: a 96 roll misses the entire sequence.
    let mut rng = BattleRng::new_for_test(vec![0.0, 96.0]);
    let next = execute_attack(&state, SideId::Pokemon1, 0, &mut bus, &mut rng);

    assert_eq!(next.pokemon2.hp, 36);
    assert!(events
        .borrow()
        .iter()
        .any(|event| matches!(event, BattleEvent::MoveMissed { .. })));
    assert!(!events
        .borrow()
        .iter()
        .any(|event| matches!(event, BattleEvent::MultiHit { .. })));
}

#[test]
fn test_recoil_hurts_the_attacker() {
    let pikachu = TestPokemonBuilder::new(Species::Pikachu, 15)
        .with_moves(vec![Move::DoubleEdge])
        .build();
    let charmander = TestPokemonBuilder::new(Species::Charmander, 15)
        .with_moves(vec![Move::Scratch])
        .build();

    let (mut bus, events) = recording_bus();
    let state = BattleState::new(pikachu, charmander, &mut bus);

    // 22 damage at minimum jitter; a third of that, floored, comes back.
    let mut rng = BattleRng::new_for_test(vec![50.0, 0.0]);
    let next = execute_attack(&state, SideId::Pokemon1, 0, &mut bus, &mut rng);

    assert_eq!(next.pokemon2.hp, 36 - 22);
    assert_eq!(next.pokemon1.hp, 35 - 7);
    assert!(events.borrow().iter().any(|event| matches!(
        event,
        BattleEvent::RecoilDamage {
            damage: 7,
            caused_by: Move::DoubleEdge,
            ..
        }
    )));
}

#[test]
fn test_recoil_cannot_drop_attacker_below_zero() {
    let pikachu = TestPokemonBuilder::new(Species::Pikachu, 15)
        .with_moves(vec![Move::DoubleEdge])
        .with_hp(3)
        .build();
    let charmander = TestPokemonBuilder::new(Species::Charmander, 15)
        .with_moves(vec![Move::Scratch])
        .build();

    let (mut bus, _) = recording_bus();
    let state = BattleState::new(pikachu, charmander, &mut bus);

    let mut rng = BattleRng::new_for_test(vec![50.0, 0.0]);
    let next = execute_attack(&state, SideId::Pokemon1, 0, &mut bus, &mut rng);

    assert_eq!(next.pokemon1.hp, 0);
    // The defender survived, so felling itself does not end the battle.
    assert!(!next.battle_over);
}

#[test]
fn test_drain_heals_half_the_damage_dealt() {
    let bulbasaur = TestPokemonBuilder::new(Species::Bulbasaur, 15)
        .with_moves(vec![Move::GigaDrain])
        .build();
    let squirtle = TestPokemonBuilder::new(Species::Squirtle, 15)
        .with_moves(vec![Move::Tackle])
        .build();

    let (mut bus, events) = recording_bus();
    let mut state = BattleState::new(bulbasaur, squirtle, &mut bus);
    state.pokemon1.hp = 10;

    // STAB'd, super-effective Giga Drain lands 36 at minimum jitter.
    let mut rng = BattleRng::new_for_test(vec![50.0, 0.0]);
    let next = execute_attack(&state, SideId::Pokemon1, 0, &mut bus, &mut rng);

    assert_eq!(next.pokemon2.hp, 38 - 36);
    assert_eq!(next.pokemon1.hp, 10 + 18);
    assert!(events.borrow().iter().any(|event| matches!(
        event,
        BattleEvent::HealingApplied { amount: 18, .. }
    )));
}

#[test]
fn test_drain_heal_caps_at_max_hp() {
    let bulbasaur = TestPokemonBuilder::new(Species::Bulbasaur, 15)
        .with_moves(vec![Move::GigaDrain])
        .build();
    let squirtle = TestPokemonBuilder::new(Species::Squirtle, 15)
        .with_moves(vec![Move::Tackle])
        .build();

    let (mut bus, _) = recording_bus();
    let mut state = BattleState::new(bulbasaur, squirtle, &mut bus);
    state.pokemon1.hp = state.pokemon1.max_hp - 1;

    let mut rng = BattleRng::new_for_test(vec![50.0, 0.0]);
    let next = execute_attack(&state, SideId::Pokemon1, 0, &mut bus, &mut rng);
    assert_eq!(next.pokemon1.hp, next.pokemon1.max_hp);
}

#[test]
fn test_secondary_status_triggers_on_the_roll() {
    let charmander = TestPokemonBuilder::new(Species::Charmander, 15)
        .with_moves(vec![Move::FirePunch])
        .build();
    let bulbasaur = TestPokemonBuilder::new(Species::Bulbasaur, 20)
        .with_moves(vec![Move::Tackle])
        .build();

    let (mut bus, _) = recording_bus();
    let state = BattleState::new(charmander, bulbasaur, &mut bus);

    // Fire Punch carries a 10% burn rider; a 10.0 roll is inside it.
    let mut rng = BattleRng::new_for_test(vec![50.0, 0.0, 10.0]);
    let next = execute_attack(&state, SideId::Pokemon1, 0, &mut bus, &mut rng);

    assert!(next.pokemon2.has_status(StatusEffect::Burn));
    assert!(next.pokemon2.hp < next.pokemon2.max_hp);
}

#[test]
fn test_secondary_status_skips_past_the_roll() {
    let charmander = TestPokemonBuilder::new(Species::Charmander, 15)
        .with_moves(vec![Move::FirePunch])
        .build();
    let bulbasaur = TestPokemonBuilder::new(Species::Bulbasaur, 20)
        .with_moves(vec![Move::Tackle])
        .build();

    let (mut bus, _) = recording_bus();
    let state = BattleState::new(charmander, bulbasaur, &mut bus);

    let mut rng = BattleRng::new_for_test(vec![50.0, 0.0, 10.1]);
    let next = execute_attack(&state, SideId::Pokemon1, 0, &mut bus, &mut rng);

    assert!(!next.pokemon2.has_status(StatusEffect::Burn));
    // The main hit still landed.
    assert!(next.pokemon2.hp < next.pokemon2.max_hp);
}

#[test]
fn test_secondary_stat_drop_rider() {
    let squirtle = TestPokemonBuilder::new(Species::Squirtle, 15)
        .with_moves(vec![Move::BubbleBeam])
        .build();
    let pikachu = TestPokemonBuilder::new(Species::Pikachu, 15)
        .with_moves(vec![Move::Tackle])
        .build();

    let (mut bus, events) = recording_bus();
    let state = BattleState::new(squirtle, pikachu, &mut bus);

    let mut rng = BattleRng::new_for_test(vec![50.0, 0.0, 5.0]);
    let next = execute_attack(&state, SideId::Pokemon1, 0, &mut bus, &mut rng);

    assert_eq!(next.pokemon2.stat_stage(StatType::Speed), -1);
    assert!(next.pokemon2.hp < next.pokemon2.max_hp);
    assert!(events.borrow().iter().any(|event| matches!(
        event,
        BattleEvent::StatLowered {
            stat: StatType::Speed,
            ..
        }
    )));
}

#[test]
fn test_swords_dance_combo_boosts_then_heals() {
    let pikachu = TestPokemonBuilder::new(Species::Pikachu, 15)
        .with_moves(vec![Move::SwordsDance])
        .build();
    let charmander = TestPokemonBuilder::new(Species::Charmander, 15)
        .with_moves(vec![Move::Scratch])
        .build();

    let (mut bus, events) = recording_bus();
    let mut state = BattleState::new(pikachu, charmander, &mut bus);
    state.pokemon1.hp = 30;

    let mut rng = BattleRng::new_for_test(vec![]);
    let next = execute_attack(&state, SideId::Pokemon1, 0, &mut bus, &mut rng);

    assert_eq!(next.pokemon1.stat_stage(StatType::Attack), 2);
    // Second leg: 10% of 35 max HP, floored.
    assert_eq!(next.pokemon1.hp, 33);
    assert!(events.borrow().iter().any(|event| matches!(
        event,
        BattleEvent::HealingApplied { amount: 3, .. }
    )));
}

#[test]
fn test_dragon_dance_combo_boosts_two_stats() {
    let pikachu = TestPokemonBuilder::new(Species::Pikachu, 15)
        .with_moves(vec![Move::DragonDance])
        .build();
    let charmander = TestPokemonBuilder::new(Species::Charmander, 15)
        .with_moves(vec![Move::Scratch])
        .build();

    let (mut bus, _) = recording_bus();
    let state = BattleState::new(pikachu, charmander, &mut bus);

    let mut rng = BattleRng::new_for_test(vec![]);
    let next = execute_attack(&state, SideId::Pokemon1, 0, &mut bus, &mut rng);

    assert_eq!(next.pokemon1.stat_stage(StatType::Attack), 1);
    assert_eq!(next.pokemon1.stat_stage(StatType::Speed), 1);
}

#[test]
fn test_combo_stops_when_the_first_leg_faints_the_defender() {
    // Synthetic combo: a standard hit chained into a self-heal. When the
    // hit faints the defender, the heal leg must never run.
    let crash_combo = MoveData {
        name: "Crash Combo",
        power: 40,
        max_pp: 10,
        accuracy: Some(100),
        category: MoveCategory::Physical,
        move_type: PokemonType::Normal,
        attack_stat: None,
        defense_stat: None,
        effect: MoveEffect::Combo {
            first: Box::new(MoveEffect::Standard),
            second: Box::new(MoveEffect::Heal { percent: 50 }),
        },
        description: "",
    };

    let pikachu = TestPokemonBuilder::new(Species::Pikachu, 15)
        .with_moves(vec![Move::Tackle])
        .build();
    let charmander = TestPokemonBuilder::new(Species::Charmander, 15)
        .with_moves(vec![Move::Scratch])
        .with_hp(5)
        .build();

    let (mut bus, _) = recording_bus();
    let mut state = BattleState::new(pikachu, charmander, &mut bus);
    state.pokemon1.hp = 20;

    let params = EffectParams {
        attacker: &state.pokemon1,
        defender: &state.pokemon2,
        move_used: Move::Tackle,
        move_data: &crash_combo,
        state: &state,
    };
    let mut rng = BattleRng::new_for_test(vec![50.0, 0.0]);
    let outcome = execute_move(&params, &mut bus, &mut rng);

    assert!(outcome.hit);
    assert_eq!(outcome.defender.as_ref().unwrap().hp, 0);
    // No heal leg: the attacker copy was never touched.
    assert!(outcome.attacker.is_none());
    assert_eq!(outcome.heal_amount, 0);
}

#[test]
fn test_counter_fails_without_recorded_damage() {
    let pikachu = TestPokemonBuilder::new(Species::Pikachu, 15)
        .with_moves(vec![Move::Counter])
        .build();
    let charmander = TestPokemonBuilder::new(Species::Charmander, 15)
        .with_moves(vec![Move::Scratch])
        .build();

    let (mut bus, events) = recording_bus();
    let state = BattleState::new(pikachu, charmander, &mut bus);

    let mut rng = BattleRng::new_for_test(vec![]);
    let next = execute_attack(&state, SideId::Pokemon1, 0, &mut bus, &mut rng);

    assert_eq!(next.pokemon2.hp, next.pokemon2.max_hp);
    assert!(!next.battle_over);
    assert!(events.borrow().iter().any(|event| matches!(
        event,
        BattleEvent::MoveFailed {
            move_used: Some(Move::Counter),
            reason: MoveFailureReason::NothingToCounter,
            ..
        }
    )));
}

#[test]
fn test_counter_returns_double_the_recorded_damage() {
    let pikachu = TestPokemonBuilder::new(Species::Pikachu, 15)
        .with_moves(vec![Move::Counter])
        .build();
    let charmander = TestPokemonBuilder::new(Species::Charmander, 15)
        .with_moves(vec![Move::Scratch])
        .build();

    let (mut bus, events) = recording_bus();
    let mut state = BattleState::new(pikachu, charmander, &mut bus);
    state.pokemon1.last_received_physical_damage = Some(14);

    let mut rng = BattleRng::new_for_test(vec![]);
    let next = execute_attack(&state, SideId::Pokemon1, 0, &mut bus, &mut rng);

    assert_eq!(next.pokemon2.hp, 36 - 28);
    assert!(events.borrow().iter().any(|event| matches!(
        event,
        BattleEvent::CounterTriggered {
            original_damage: 14,
            counter_damage: 28,
            ..
        }
    )));
}

#[test]
fn test_counter_tracks_only_physical_damage() {
    let pikachu = TestPokemonBuilder::new(Species::Pikachu, 15)
        .with_moves(vec![Move::Counter])
        .build();
    let charmander = TestPokemonBuilder::new(Species::Charmander, 15)
        .with_moves(vec![Move::Scratch, Move::Thundershock])
        .build();

    let (mut bus, _) = recording_bus();
    let state = BattleState::new(pikachu, charmander, &mut bus);

    // Physical Scratch lands 8 and is recorded.
    let mut rng = BattleRng::new_for_test(vec![50.0, 0.0]);
    let state = execute_attack(&state, SideId::Pokemon2, 0, &mut bus, &mut rng);
    assert_eq!(state.pokemon1.last_received_physical_damage, Some(8));

    // Special Thundershock lands but leaves the record alone.
    let mut rng = BattleRng::new_for_test(vec![50.0, 0.0]);
    let state = execute_attack(&state, SideId::Pokemon2, 1, &mut bus, &mut rng);
    assert_eq!(state.pokemon1.last_received_physical_damage, Some(8));

    // Counter pays back the physical 8, doubled.
    let before = state.pokemon2.hp;
    let mut rng = BattleRng::new_for_test(vec![]);
    let state = execute_attack(&state, SideId::Pokemon1, 0, &mut bus, &mut rng);
    assert_eq!(state.pokemon2.hp, before - 16);
}

#[test]
fn test_metronome_redirects_to_a_random_move() {
    let pikachu = TestPokemonBuilder::new(Species::Pikachu, 15)
        .with_moves(vec![Move::Metronome])
        .build();
    let charmander = TestPokemonBuilder::new(Species::Charmander, 15)
        .with_moves(vec![Move::Scratch])
        .build();

    let (mut bus, events) = recording_bus();
    let state = BattleState::new(pikachu, charmander, &mut bus);

    // Pick roll 0.0 selects the first non-Metronome catalog entry (Tackle),
    // which then runs its own accuracy and damage rolls.
    let mut rng = BattleRng::new_for_test(vec![0.0, 50.0, 0.0]);
    let next = execute_attack(&state, SideId::Pokemon1, 0, &mut bus, &mut rng);

    assert!(events.borrow().iter().any(|event| matches!(
        event,
        BattleEvent::MetronomeSelected {
            selected: Move::Tackle,
            ..
        }
    )));
    assert_eq!(next.pokemon2.hp, 36 - 8);
    // Metronome spent its own PP, not Tackle's.
    assert_eq!(next.pokemon1.moves[0].as_ref().unwrap().pp, 9);
}

#[test]
fn test_metronome_never_selects_itself() {
    let pikachu = TestPokemonBuilder::new(Species::Pikachu, 15)
        .with_moves(vec![Move::Metronome])
        .build();
    let charmander = TestPokemonBuilder::new(Species::Charmander, 15)
        .with_moves(vec![Move::Scratch])
        .build();

    let (mut bus, events) = recording_bus();
    let state = BattleState::new(pikachu, charmander, &mut bus);

    // The top of the pick range lands on the last candidate, which must be
    // a real move, not Metronome again.
    let mut rng = BattleRng::new_for_test(vec![99.9]);
    let next = execute_attack(&state, SideId::Pokemon1, 0, &mut bus, &mut rng);

    let selected = events.borrow().iter().find_map(|event| match event {
        BattleEvent::MetronomeSelected { selected, .. } => Some(*selected),
        _ => None,
    });
    assert_eq!(selected, Some(Move::DragonDance));
    assert_eq!(next.pokemon1.stat_stage(StatType::Attack), 1);
    assert_eq!(next.pokemon1.stat_stage(StatType::Speed), 1);
}

#[test]
fn test_weather_dependent_effect_follows_the_sky() {
    let weather_pulse = MoveData {
        name: "Weather Pulse",
        power: 0,
        max_pp: 10,
        accuracy: Some(100),
        category: MoveCategory::Status,
        move_type: PokemonType::Normal,
        attack_stat: None,
        defense_stat: None,
        effect: MoveEffect::WeatherDependent {
            effects: vec![(
                Weather::Rain,
                MoveEffect::RaiseStat {
                    stat: StatType::SpecialAttack,
                    stages: 1,
                },
            )],
            default: Box::new(MoveEffect::RaiseStat {
                stat: StatType::Attack,
                stages: 1,
            }),
        },
        description: "",
    };

    let pikachu = TestPokemonBuilder::new(Species::Pikachu, 15)
        .with_moves(vec![Move::Tackle])
        .build();
    let charmander = TestPokemonBuilder::new(Species::Charmander, 15)
        .with_moves(vec![Move::Scratch])
        .build();

    let (mut bus, _) = recording_bus();
    let mut state = BattleState::new(pikachu, charmander, &mut bus);

    // Clear skies: the default branch runs.
    let params = EffectParams {
        attacker: &state.pokemon1,
        defender: &state.pokemon2,
        move_used: Move::Tackle,
        move_data: &weather_pulse,
        state: &state,
    };
    let mut rng = BattleRng::new_for_test(vec![]);
    let outcome = execute_move(&params, &mut bus, &mut rng);
    assert_eq!(
        outcome.attacker.unwrap().stat_stage(StatType::Attack),
        1
    );

    // Under rain the weather-specific branch takes over.
    state.weather = Weather::Rain;
    let params = EffectParams {
        attacker: &state.pokemon1,
        defender: &state.pokemon2,
        move_used: Move::Tackle,
        move_data: &weather_pulse,
        state: &state,
    };
    let mut rng = BattleRng::new_for_test(vec![]);
    let outcome = execute_move(&params, &mut bus, &mut rng);
    assert_eq!(
        outcome
            .attacker
            .unwrap()
            .stat_stage(StatType::SpecialAttack),
        1
    );
}

#[test]
fn test_metronome_can_be_verified_against_the_catalog() {
    // The redirect table is the catalog minus Metronome itself.
    let candidates: Vec<Move> = Move::ALL
        .iter()
        .copied()
        .filter(|move_| *move_ != Move::Metronome)
        .collect();
    assert_eq!(candidates.len(), Move::ALL.len() - 1);
    for move_ in candidates {
        assert!(!get_move_data(move_).name.is_empty());
    }
}
