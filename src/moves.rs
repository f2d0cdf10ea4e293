use serde::{Deserialize, Serialize};

use crate::move_data::get_move_max_pp;

/// Identifier for every move in the catalog. The data behind each identifier
/// lives in `move_data`; this enum is what battle state stores and what the
/// engine passes around.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Move {
    // Normal
    Tackle,
    Scratch,
    Swift,
    DoubleEdge,
    Growl,
    Growth,
    Howl,
    Recover,
    Metronome,
    TailWhip,
    Leer,
    DefenseCurl,
    Harden,
    DoubleTeam,
    SwordsDance,
    // Electric
    Thundershock,
    Thunderbolt,
    ThunderWave,
    // Grass
    VineWhip,
    RazorLeaf,
    GigaDrain,
    // Fire
    Ember,
    Flamethrower,
    FirePunch,
    // Water
    WaterGun,
    BubbleBeam,
    Withdraw,
    // Bug
    PinMissile,
    StringShot,
    // Psychic
    Psyshock,
    Meditate,
    CosmicPower,
    // Fighting
    Counter,
    // Ground
    SandAttack,
    // Dark
    NastyPlot,
    // Dragon
    DragonDance,
}

impl Move {
    /// Every catalog move, in a fixed order. Metronome's random redirect and
    /// the catalog-completeness tests both rely on this being stable.
    pub const ALL: [Move; 36] = [
        Move::Tackle,
        Move::Scratch,
        Move::Swift,
        Move::DoubleEdge,
        Move::Growl,
        Move::Growth,
        Move::Howl,
        Move::Recover,
        Move::Metronome,
        Move::TailWhip,
        Move::Leer,
        Move::DefenseCurl,
        Move::Harden,
        Move::DoubleTeam,
        Move::SwordsDance,
        Move::Thundershock,
        Move::Thunderbolt,
        Move::ThunderWave,
        Move::VineWhip,
        Move::RazorLeaf,
        Move::GigaDrain,
        Move::Ember,
        Move::Flamethrower,
        Move::FirePunch,
        Move::WaterGun,
        Move::BubbleBeam,
        Move::Withdraw,
        Move::PinMissile,
        Move::StringShot,
        Move::Psyshock,
        Move::Meditate,
        Move::CosmicPower,
        Move::Counter,
        Move::SandAttack,
        Move::NastyPlot,
        Move::DragonDance,
    ];
}

/// A move slot on a combatant: the catalog identifier plus how many uses
/// remain. PP never exceeds the catalog maximum and never goes negative.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoveInstance {
    pub move_: Move,
    pub pp: u8,
}

impl MoveInstance {
    /// Create a new move instance with full PP.
    pub fn new(move_: Move) -> Self {
        MoveInstance {
            move_,
            pp: get_move_max_pp(move_),
        }
    }

    pub fn max_pp(&self) -> u8 {
        get_move_max_pp(self.move_)
    }

    /// Spend one use. Returns false (and leaves PP untouched) when empty.
    pub fn use_move(&mut self) -> bool {
        if self.pp > 0 {
            self.pp -= 1;
            true
        } else {
            false
        }
    }

    pub fn restore_pp(&mut self, amount: u8) {
        let max_pp = self.max_pp();
        self.pp = self.pp.saturating_add(amount).min(max_pp);
    }
}
