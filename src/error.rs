use super::ArticleId;
use rand::distributions::WeightedError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, SimulationError>;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimulationError {
    /// An operation referenced an article id that was never added to the graph.
    #[error("unknown article id {0}")]
    UnknownNode(ArticleId),

    #[error("article {0} cannot cite itself")]
    SelfCitation(ArticleId),

    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("invalid state: {0}")]
    InvalidState(String),

    #[error("a batch worker thread panicked")]
    WorkerPanicked,

    /// The weight vector handed to the sampler was empty or contained invalid weights.
    #[error("cannot sample from weights: {0}")]
    Sampling(#[from] WeightedError),
}
