pub mod auth;
pub mod metrics;

pub use auth::{petugas_gate, GateState, LOGIN_PATH, PETUGAS_FLAG, UNAUTHENTICATED_WARNING};
pub use metrics::track_metrics;
