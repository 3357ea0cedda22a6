mod query_extractor;
mod tracing_layer;
mod metrics_layer;

pub use query_extractor::*;
pub use tracing_layer::*;
pub use metrics_layer::*;
