pub mod artifacts;
pub mod client;
pub mod config;
pub mod dedupe;
pub mod deleter;
pub mod engine;
pub mod error;
pub mod model;
pub mod normalize;
pub mod prompt;
pub mod reconcile;
pub mod sanitize;

pub use config::AppConfig;
pub use engine::{DedupeEngine, RunReport};
pub use error::Error;
pub use model::{CanonicalRecord, DeleteSummary};
