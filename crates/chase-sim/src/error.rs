use chase_core::{AgentId, CoreError};
use chase_mobility::MoveError;
use chase_spatial::GraphError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("simulation configuration error: {0}")]
    Config(String),

    #[error("invalid graph: {0}")]
    Graph(#[from] GraphError),

    #[error("invalid move request: {0}")]
    Move(#[from] MoveError),

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("no agent with id {0}")]
    UnknownAgent(AgentId),
}

pub type SimResult<T> = Result<T, SimError>;
