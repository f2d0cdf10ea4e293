use std::cell::RefCell;
use std::rc::Rc;

use crate::battle::state::{BattleEvent, EventBus};
use crate::moves::{Move, MoveInstance};
use crate::pokemon::{PokemonInst, PokemonType, StatType};
use crate::species::Species;

/// Builder for combatants with precisely controlled stats, so tests can pin
/// down damage numbers instead of chasing species data around.
pub struct TestPokemonBuilder {
    pokemon: PokemonInst,
}

impl TestPokemonBuilder {
    pub fn new(species: Species, level: u8) -> Self {
        Self {
            pokemon: PokemonInst::new(species, level, None),
        }
    }

    pub fn with_moves(mut self, moves: Vec<Move>) -> Self {
        let mut slots = [const { None }; 4];
        for (i, move_) in moves.into_iter().take(4).enumerate() {
            slots[i] = Some(MoveInstance::new(move_));
        }
        self.pokemon.moves = slots;
        self
    }

    pub fn with_hp(mut self, hp: u16) -> Self {
        self.pokemon.max_hp = self.pokemon.max_hp.max(hp);
        self.pokemon.hp = hp;
        self
    }

    pub fn with_types(mut self, types: Vec<PokemonType>) -> Self {
        self.pokemon.types = types;
        self
    }

    pub fn with_base_stat(mut self, stat: StatType, value: u16) -> Self {
        match stat {
            StatType::Attack => self.pokemon.attack = value,
            StatType::Defense => self.pokemon.defense = value,
            StatType::SpecialAttack => self.pokemon.special_attack = value,
            StatType::SpecialDefense => self.pokemon.special_defense = value,
            StatType::Speed => self.pokemon.speed = value,
            StatType::Accuracy | StatType::Evasion => {}
        }
        self
    }

    pub fn build(self) -> PokemonInst {
        self.pokemon
    }
}

/// An event bus with a recording subscriber attached. Tests read the shared
/// vec to assert on what the engine published.
pub fn recording_bus() -> (EventBus, Rc<RefCell<Vec<BattleEvent>>>) {
    let mut bus = EventBus::new();
    let events = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&events);
    bus.subscribe(move |record| sink.borrow_mut().push(record.event.clone()));
    (bus, events)
}
