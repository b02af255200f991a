//! Job tracking engine: backend HTTP client and effect execution.
mod api;
mod engine;
mod settings;
mod wire;

pub use api::{JobApi, ReqwestJobApi};
pub use engine::EngineHandle;
pub use settings::{EngineError, HttpSettings};
