
mod config;
mod corpus;
mod embeddings;
mod output;
mod pipeline;
mod train;
mod vocab;

pub use config::Params;
pub use corpus::{Corpus, LineSource};
pub use embeddings::EmbeddingStore;
pub use pipeline::Pipeline;
pub use train::{ProgressSink, StderrSink, Trainer};
pub use vocab::Vocab;
