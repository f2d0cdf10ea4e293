use thiserror::Error;

/// Top-level error type for the battle engine.
///
/// Only catalog lookups fail loudly: asking for a species or move the roster
/// does not know is a configuration mistake and surfaces at construction
/// time. In-battle failures (no PP, fainted attacker, nothing to counter)
/// are not errors at all -- they resolve to failed move uses reported
/// through the event bus.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BattleEngineError {
    #[error("move data error: {0}")]
    MoveData(#[from] MoveDataError),
    #[error("species data error: {0}")]
    SpeciesData(#[from] SpeciesDataError),
}

/// Errors from move-catalog lookups.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MoveDataError {
    /// A move was requested by a display name the catalog does not know.
    #[error("unknown move name: {0}")]
    UnknownMoveName(String),
}

/// Errors from species-roster lookups.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SpeciesDataError {
    /// A species was requested by a name the roster does not know.
    #[error("unknown species name: {0}")]
    UnknownSpeciesName(String),
}

pub type BattleResult<T> = Result<T, BattleEngineError>;
pub type MoveDataResult<T> = Result<T, MoveDataError>;
pub type SpeciesDataResult<T> = Result<T, SpeciesDataError>;
