#![forbid(unsafe_code)]

pub mod contract;
pub mod memory;
pub mod rest;

pub use contract::{
    ActivityLog, AuthEvent, IdentityProvider, LessonViewRow, ObjectStore, PlatformError,
    PrivilegeCheck, ProgressStore, QuizResultRow, SIGNED_URL_TTL_SECS,
};
pub use memory::InMemoryPlatform;
pub use rest::{RestConfig, RestPlatform};
