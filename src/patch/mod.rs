//! Fixed-offset file patching
//!
//! A patch is applied by [`FilePatcher`], which runs the target through a
//! fixed sequence of gates (attributes, read-only, OS protection, exclusive
//! open, size, bounds, seek, write, flush) and stops at the first failure.

pub mod attributes;
pub mod patcher;
pub mod protection;
pub mod request;
pub mod target;

pub use attributes::FileAttributesSnapshot;
pub use patcher::{FilePatcher, NativePlatform, PatchOutcome, PatchSummary, Platform};
pub use protection::is_protected_by_os;
pub use request::PatchRequest;
pub use target::{FileTarget, PatchTarget};
