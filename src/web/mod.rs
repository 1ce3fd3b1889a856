pub mod api;
pub mod counters;
pub mod request_id;
pub mod server;

pub use api::{AppState, TransformResponse};
pub use counters::{CounterSnapshot, MetricsSink, ProcessCounters};
pub use request_id::RequestIdResolver;
pub use server::{create_router, serve, start_server};
