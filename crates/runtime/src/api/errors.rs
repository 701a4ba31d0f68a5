//! Unified error types surfaced by the runtime API.
//!
//! Wraps failures from configuration, entity construction and worker
//! coordination so clients can bubble them up with consistent context.
use thiserror::Error;

use arena_core::EntityError;

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("runtime requires a hero before building")]
    MissingHero,

    #[error("hero {name} has no health left ({health})")]
    HeroAlreadyDefeated { name: String, health: i32 },

    #[error("invalid runtime configuration: {reason}")]
    InvalidConfig { reason: &'static str },

    #[error("monster template does not produce a valid entity")]
    InvalidMonsterTemplate(#[source] EntityError),

    #[error("arena worker join failed")]
    WorkerJoin(#[source] tokio::task::JoinError),
}
