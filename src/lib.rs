pub mod article;
pub mod batch;
pub mod edge_writer;
pub mod error;
pub mod graph;
pub mod model;
pub mod parameters;
pub mod report;
pub mod sampler;
pub mod statistics;
pub mod weight_function;

pub type ArticleId = usize;
pub type Edge = (ArticleId, ArticleId);

pub mod prelude {
    use super::*;

    pub use super::{ArticleId, Edge};
    pub use article::{Article, CitationRule};
    pub use edge_writer::EdgeWriter;
    pub use error::{Result, SimulationError};
    pub use graph::CitationGraph;
    pub use model::{ModelConfig, ModelState, SimulationModel};
    pub use sampler::WeightedSampler;
    pub use statistics::Summary;
    pub use weight_function::WeightFunction;
}
