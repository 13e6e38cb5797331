mod error;
mod qdrant;

pub use error::{Error, Result};
pub use qdrant::{IndexHit, QdrantIndex};
