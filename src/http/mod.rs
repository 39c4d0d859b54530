//! HTTP protocol layer module
//!
//! Header-level building blocks for conditional and range requests,
//! decoupled from file serving itself.

pub mod cache;
pub mod date;
pub mod headers;
pub mod mime;
pub mod precondition;
pub mod range;
pub mod response;

// Re-export commonly used types
pub use precondition::{PreconditionState, Preconditions};
pub use range::{parse_ranges, ByteRange, RangeSpec};
pub use response::{build_404_response, build_405_response, ResponseBody};
