pub mod access;
pub mod domain;
pub mod outline;
pub mod period;
pub mod ports;

pub use access::require_artifact_for_user;
pub use domain::{Artifact, SermonContent, SermonMetadata, UsageSnapshot, User};
pub use outline::{GenerationRequest, Outline, OutlinePoint, ScriptureReference};
pub use period::UsagePeriod;
pub use ports::{
    PortError, PortResult, SermonGenerator, SermonRepository, FREE_SERMON_LIMIT,
    SERMON_COUNTER_KEY,
};
