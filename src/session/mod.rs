// Match session registry: one authoritative in-memory session per live
// match, evicted when the last viewer leaves.

pub use registry::{MatchSession, SessionRegistry};

mod registry;
