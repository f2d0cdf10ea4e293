use tracing::trace;

use crate::battle::state::{BattleEvent, BattleRng, BattleState, EventBus, MoveFailureReason};
use crate::battle::stats::{
    accuracy_stage_multiplier, apply_stat_stage_change, effective_stat, type_effectiveness,
};
use crate::move_data::{get_move_data, MoveCategory, MoveData, MoveEffect};
use crate::moves::Move;
use crate::pokemon::{PokemonInst, StatType, StatusEffect};

/// Everything a move effect needs to run: both combatants as they stand when
/// the move fires, the move being executed, and the surrounding battle state
/// (for weather and similar context).
#[derive(Clone, Copy)]
pub struct EffectParams<'a> {
    pub attacker: &'a PokemonInst,
    pub defender: &'a PokemonInst,
    pub move_used: Move,
    pub move_data: &'a MoveData,
    pub state: &'a BattleState,
}

/// What one move execution produced. `attacker`/`defender` carry updated
/// copies only when the effect touched that side; the engine folds whichever
/// are present back into battle state. Never persisted.
#[derive(Debug, Clone, Default)]
pub struct MoveOutcome {
    pub hit: bool,
    pub attacker: Option<PokemonInst>,
    pub defender: Option<PokemonInst>,
    pub damage: u16,
    pub heal_amount: u16,
    pub recoil_damage: u16,
    pub hits_landed: Option<u8>,
    pub status_applied: Option<StatusEffect>,
    pub type_effectiveness: Option<f64>,
    pub message: Option<String>,
}

/// One damage computation, before application.
#[derive(Debug, Clone, Copy)]
pub struct DamageRoll {
    pub damage: u16,
    pub stab: f64,
    pub type_effectiveness: f64,
}

/// Run a move's bound effect and report what happened.
pub fn execute_move(params: &EffectParams, bus: &mut EventBus, rng: &mut BattleRng) -> MoveOutcome {
    dispatch(params, &params.move_data.effect, bus, rng)
}

fn dispatch(
    params: &EffectParams,
    effect: &MoveEffect,
    bus: &mut EventBus,
    rng: &mut BattleRng,
) -> MoveOutcome {
    match effect {
        MoveEffect::Standard => standard_attack(params, bus, rng),
        MoveEffect::AlwaysHit => damaging_hit(params, bus, rng),
        MoveEffect::InflictStatus { status, duration } => {
            status_move(params, *status, *duration, bus, rng)
        }
        MoveEffect::RaiseStat { stat, stages } => raise_stat(params, *stat, *stages, bus),
        MoveEffect::LowerStat { stat, stages } => lower_stat(params, *stat, *stages, bus, rng),
        MoveEffect::Heal { percent } => heal_move(params, *percent, bus),
        MoveEffect::MultiHit => multi_hit_attack(params, bus, rng),
        MoveEffect::Recoil { fraction } => recoil_attack(params, *fraction, bus, rng),
        MoveEffect::Secondary { chance, effect } => {
            secondary_effect_attack(params, *chance, effect, bus, rng)
        }
        MoveEffect::Drain { percent } => drain_attack(params, *percent, bus, rng),
        MoveEffect::Combo { first, second } => combo_move(params, first, second, bus, rng),
        MoveEffect::WeatherDependent { effects, default } => {
            let chosen = effects
                .iter()
                .find(|(weather, _)| *weather == params.state.weather)
                .map_or(default.as_ref(), |(_, effect)| effect);
            dispatch(params, chosen, bus, rng)
        }
        MoveEffect::Counter => counter_move(params, bus),
        MoveEffect::Metronome => metronome(params, bus, rng),
    }
}

/// Shared hit check. Moves without an accuracy value always connect;
/// otherwise the move's accuracy is scaled up by the attacker's accuracy
/// stage and down by the defender's evasion stage, and a roll equal to the
/// final threshold still hits.
fn accuracy_check(params: &EffectParams, bus: &mut EventBus, rng: &mut BattleRng) -> bool {
    let Some(base_accuracy) = params.move_data.accuracy else {
        return true;
    };

    let accuracy_stage = params.attacker.stat_stage(StatType::Accuracy);
    let evasion_stage = params.defender.stat_stage(StatType::Evasion);
    let final_accuracy = f64::from(base_accuracy) * accuracy_stage_multiplier(accuracy_stage)
        / accuracy_stage_multiplier(evasion_stage);

    let roll = rng.percent("accuracy check");
    let hit = roll <= final_accuracy;

    if !hit {
        bus.publish(BattleEvent::MoveMissed {
            attacker: params.attacker.species,
            defender: params.defender.species,
            move_used: params.move_used,
        });
    }

    hit
}

/// The damage core shared by every damaging effect. Stat pair defaults to
/// attack/defense for physical moves and the special pair otherwise, with
/// per-move overrides for mixed-stat attacks. A type multiplier of zero
/// yields exactly zero damage; anything else lands at 1 minimum.
pub fn calculate_damage(
    attacker: &PokemonInst,
    defender: &PokemonInst,
    move_used: Move,
    move_data: &MoveData,
    bus: &mut EventBus,
    rng: &mut BattleRng,
) -> DamageRoll {
    let attack_stat = move_data.attack_stat.unwrap_or(match move_data.category {
        MoveCategory::Physical => StatType::Attack,
        _ => StatType::SpecialAttack,
    });
    let defense_stat = move_data.defense_stat.unwrap_or(match move_data.category {
        MoveCategory::Physical => StatType::Defense,
        _ => StatType::SpecialDefense,
    });

    let attack = f64::from(effective_stat(attacker, attack_stat));
    let defense = f64::from(effective_stat(defender, defense_stat));

    let stab = if attacker.types.contains(&move_data.move_type) {
        1.5
    } else {
        1.0
    };
    let effectiveness = type_effectiveness(move_data.move_type, &defender.types);

    let level_term = f64::from(attacker.level) * 2.0 / 5.0 + 2.0;
    let base_damage = level_term * f64::from(move_data.power) * (attack / defense) / 50.0 + 2.0;
    let jitter = rng.damage_factor("damage jitter");
    let raw = base_damage * jitter * stab * effectiveness;

    let damage = if effectiveness == 0.0 {
        0
    } else {
        (raw.round() as u16).max(1)
    };

    trace!(
        ?move_used,
        attack,
        defense,
        stab,
        effectiveness,
        damage,
        "damage computed"
    );

    bus.publish(BattleEvent::DamageCalculated {
        attacker: attacker.species,
        defender: defender.species,
        move_used,
        damage,
        stab,
        type_effectiveness: effectiveness,
    });

    DamageRoll {
        damage,
        stab,
        type_effectiveness: effectiveness,
    }
}

/// Apply damage to a combatant, clamping at zero HP. Physical damage that
/// actually lands is recorded on the target so Counter can read it later.
fn apply_move_damage(
    target: &mut PokemonInst,
    amount: u16,
    category: MoveCategory,
    bus: &mut EventBus,
) {
    target.take_damage(amount);
    if category == MoveCategory::Physical && amount > 0 {
        target.last_received_physical_damage = Some(amount);
    }

    bus.publish(BattleEvent::DamageApplied {
        pokemon: target.species,
        amount,
        remaining_hp: target.hp,
        max_hp: target.max_hp,
    });
}

fn standard_attack(params: &EffectParams, bus: &mut EventBus, rng: &mut BattleRng) -> MoveOutcome {
    if !accuracy_check(params, bus, rng) {
        return MoveOutcome::default();
    }
    damaging_hit(params, bus, rng)
}

fn damaging_hit(params: &EffectParams, bus: &mut EventBus, rng: &mut BattleRng) -> MoveOutcome {
    let roll = calculate_damage(
        params.attacker,
        params.defender,
        params.move_used,
        params.move_data,
        bus,
        rng,
    );

    let mut defender = params.defender.clone();
    apply_move_damage(&mut defender, roll.damage, params.move_data.category, bus);

    MoveOutcome {
        hit: true,
        defender: Some(defender),
        damage: roll.damage,
        type_effectiveness: Some(roll.type_effectiveness),
        ..Default::default()
    }
}

fn status_move(
    params: &EffectParams,
    status: StatusEffect,
    duration: u8,
    bus: &mut EventBus,
    rng: &mut BattleRng,
) -> MoveOutcome {
    if !accuracy_check(params, bus, rng) {
        return MoveOutcome::default();
    }

    let mut defender = params.defender.clone();
    defender.set_status(status, duration);

    bus.publish(BattleEvent::StatusEffectApplied {
        pokemon: defender.species,
        status,
    });

    MoveOutcome {
        hit: true,
        defender: Some(defender),
        status_applied: Some(status),
        ..Default::default()
    }
}

fn raise_stat(params: &EffectParams, stat: StatType, stages: i8, bus: &mut EventBus) -> MoveOutcome {
    let change = apply_stat_stage_change(params.attacker, stat, stages);

    bus.publish(BattleEvent::StatRaised {
        pokemon: change.pokemon.species,
        stat,
        stages,
        message: change.message.clone(),
    });

    MoveOutcome {
        hit: true,
        attacker: Some(change.pokemon),
        message: Some(change.message),
        ..Default::default()
    }
}

fn lower_stat(
    params: &EffectParams,
    stat: StatType,
    stages: i8,
    bus: &mut EventBus,
    rng: &mut BattleRng,
) -> MoveOutcome {
    if !accuracy_check(params, bus, rng) {
        return MoveOutcome::default();
    }

    let change = apply_stat_stage_change(params.defender, stat, -stages);

    bus.publish(BattleEvent::StatLowered {
        pokemon: change.pokemon.species,
        stat,
        stages: -stages,
        message: change.message.clone(),
    });

    MoveOutcome {
        hit: true,
        defender: Some(change.pokemon),
        message: Some(change.message),
        ..Default::default()
    }
}

fn heal_move(params: &EffectParams, percent: u8, bus: &mut EventBus) -> MoveOutcome {
    let mut attacker = params.attacker.clone();
    let amount = (u32::from(attacker.max_hp) * u32::from(percent) / 100) as u16;
    let healed = attacker.heal(amount);

    bus.publish(BattleEvent::HealingApplied {
        pokemon: attacker.species,
        amount: healed,
        new_hp: attacker.hp,
    });

    MoveOutcome {
        hit: true,
        attacker: Some(attacker),
        heal_amount: healed,
        ..Default::default()
    }
}

/// 2-5 strikes behind a single accuracy check. Each hit is rolled and
/// applied against the defender's then-current HP; the sequence stops the
/// moment the defender faints, and the reported damage is the sum of the
/// hits that actually landed.
fn multi_hit_attack(params: &EffectParams, bus: &mut EventBus, rng: &mut BattleRng) -> MoveOutcome {
    let total_hits = rng.multi_hit_count("multi-hit count");

    if !accuracy_check(params, bus, rng) {
        return MoveOutcome::default();
    }

    let mut defender = params.defender.clone();
    let mut total_damage: u16 = 0;
    let mut hits_landed: u8 = 0;

    for hit_number in 1..=total_hits {
        if defender.is_fainted() {
            break;
        }

        let roll = calculate_damage(
            params.attacker,
            &defender,
            params.move_used,
            params.move_data,
            bus,
            rng,
        );
        apply_move_damage(&mut defender, roll.damage, params.move_data.category, bus);
        total_damage = total_damage.saturating_add(roll.damage);
        hits_landed = hit_number;

        bus.publish(BattleEvent::MultiHit {
            attacker: params.attacker.species,
            hit_number,
            total_hits,
            damage: roll.damage,
        });
    }

    MoveOutcome {
        hit: true,
        defender: Some(defender),
        damage: total_damage,
        hits_landed: Some(hits_landed),
        ..Default::default()
    }
}

fn recoil_attack(
    params: &EffectParams,
    fraction: f64,
    bus: &mut EventBus,
    rng: &mut BattleRng,
) -> MoveOutcome {
    let result = standard_attack(params, bus, rng);

    if result.hit && result.damage > 0 {
        let recoil = ((f64::from(result.damage) * fraction).floor() as u16).max(1);
        let mut attacker = params.attacker.clone();
        attacker.take_damage(recoil);

        bus.publish(BattleEvent::RecoilDamage {
            pokemon: attacker.species,
            damage: recoil,
            caused_by: params.move_used,
        });

        return MoveOutcome {
            attacker: Some(attacker),
            recoil_damage: recoil,
            ..result
        };
    }

    result
}

/// Standard attack that, when it connects, rolls an independent chance to
/// tack on a status or stat-drop. The rider skips its own accuracy check;
/// the main attack already landed.
fn secondary_effect_attack(
    params: &EffectParams,
    chance: u8,
    effect: &MoveEffect,
    bus: &mut EventBus,
    rng: &mut BattleRng,
) -> MoveOutcome {
    let result = standard_attack(params, bus, rng);

    if !result.hit || rng.percent("secondary effect chance") > f64::from(chance) {
        return result;
    }

    let defender = result
        .defender
        .clone()
        .unwrap_or_else(|| params.defender.clone());

    match effect {
        MoveEffect::InflictStatus { status, duration } => {
            let mut defender = defender;
            defender.set_status(*status, *duration);
            bus.publish(BattleEvent::StatusEffectApplied {
                pokemon: defender.species,
                status: *status,
            });
            MoveOutcome {
                defender: Some(defender),
                status_applied: Some(*status),
                ..result
            }
        }
        MoveEffect::LowerStat { stat, stages } => {
            let change = apply_stat_stage_change(&defender, *stat, -stages);
            bus.publish(BattleEvent::StatLowered {
                pokemon: change.pokemon.species,
                stat: *stat,
                stages: -stages,
                message: change.message.clone(),
            });
            MoveOutcome {
                defender: Some(change.pokemon),
                message: Some(change.message),
                ..result
            }
        }
        _ => {
            debug_assert!(false, "secondary effects are status or stat-drop riders");
            result
        }
    }
}

fn drain_attack(
    params: &EffectParams,
    percent: u8,
    bus: &mut EventBus,
    rng: &mut BattleRng,
) -> MoveOutcome {
    let result = standard_attack(params, bus, rng);

    if result.hit && result.damage > 0 {
        let amount = (u32::from(result.damage) * u32::from(percent) / 100) as u16;
        let mut attacker = params.attacker.clone();
        let healed = attacker.heal(amount);

        bus.publish(BattleEvent::HealingApplied {
            pokemon: attacker.species,
            amount: healed,
            new_hp: attacker.hp,
        });

        return MoveOutcome {
            attacker: Some(attacker),
            heal_amount: healed,
            ..result
        };
    }

    result
}

/// Two effects in sequence. The second only runs if the first left the
/// defender standing; the merged outcome sums damage and keeps the freshest
/// copy of each combatant.
fn combo_move(
    params: &EffectParams,
    first: &MoveEffect,
    second: &MoveEffect,
    bus: &mut EventBus,
    rng: &mut BattleRng,
) -> MoveOutcome {
    let first_result = dispatch(params, first, bus, rng);

    if first_result
        .defender
        .as_ref()
        .is_some_and(|defender| defender.is_fainted())
    {
        return first_result;
    }

    let attacker = first_result
        .attacker
        .clone()
        .unwrap_or_else(|| params.attacker.clone());
    let defender = first_result
        .defender
        .clone()
        .unwrap_or_else(|| params.defender.clone());
    let second_params = EffectParams {
        attacker: &attacker,
        defender: &defender,
        ..*params
    };
    let second_result = dispatch(&second_params, second, bus, rng);

    MoveOutcome {
        hit: first_result.hit || second_result.hit,
        damage: first_result.damage.saturating_add(second_result.damage),
        heal_amount: first_result
            .heal_amount
            .saturating_add(second_result.heal_amount),
        attacker: second_result.attacker.or(first_result.attacker),
        defender: second_result.defender.or(first_result.defender),
        recoil_damage: first_result
            .recoil_damage
            .saturating_add(second_result.recoil_damage),
        hits_landed: second_result.hits_landed.or(first_result.hits_landed),
        status_applied: second_result.status_applied.or(first_result.status_applied),
        type_effectiveness: second_result
            .type_effectiveness
            .or(first_result.type_effectiveness),
        message: second_result.message.or(first_result.message),
    }
}

/// Return double the physical damage the user last took. With nothing on
/// record the move simply fails; there is no fallback behavior.
fn counter_move(params: &EffectParams, bus: &mut EventBus) -> MoveOutcome {
    let Some(original_damage) = params.attacker.last_received_physical_damage else {
        bus.publish(BattleEvent::MoveFailed {
            pokemon: params.attacker.species,
            move_used: Some(params.move_used),
            reason: MoveFailureReason::NothingToCounter,
        });
        return MoveOutcome::default();
    };

    let counter_damage = original_damage.saturating_mul(2);
    let mut defender = params.defender.clone();
    apply_move_damage(&mut defender, counter_damage, MoveCategory::Physical, bus);

    bus.publish(BattleEvent::CounterTriggered {
        pokemon: params.attacker.species,
        original_damage,
        counter_damage,
    });

    MoveOutcome {
        hit: true,
        defender: Some(defender),
        damage: counter_damage,
        ..Default::default()
    }
}

/// Pick any other catalog move uniformly at random and run it in place.
fn metronome(params: &EffectParams, bus: &mut EventBus, rng: &mut BattleRng) -> MoveOutcome {
    let candidates: Vec<Move> = Move::ALL
        .iter()
        .copied()
        .filter(|move_| *move_ != Move::Metronome)
        .collect();
    let selected = candidates[rng.pick_index(candidates.len(), "metronome selection")];

    bus.publish(BattleEvent::MetronomeSelected {
        pokemon: params.attacker.species,
        selected,
    });

    let selected_data = get_move_data(selected);
    let redirected = EffectParams {
        move_used: selected,
        move_data: selected_data,
        ..*params
    };
    dispatch(&redirected, &selected_data.effect, bus, rng)
}
