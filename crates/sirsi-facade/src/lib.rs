// crates/sirsi-facade/src/lib.rs
//
// sirsi-facade: Aggregation facade for the Sirsi admin control plane.
//
// `ControlPlane` holds shared handles to the settings store and every domain
// registry, exposes one async operation per RPC method, and composes
// cross-domain reads such as the system overview. It owns no entity state.

pub mod audit_writer;
pub mod messages;
pub mod plane;
pub mod schema;

pub use audit_writer::{AuditWriter, RetryPolicy};
pub use plane::{Backends, ControlPlane, DEFAULT_ACTIVITY_FEED_LEN};
pub use schema::SchemaVersion;
