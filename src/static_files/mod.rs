//! Static file engine
//!
//! Decides, for one GET or HEAD request against a file, whether to answer
//! 200, 206, 304, 412 or 416, with which headers, and streams the body.

mod compose;
mod context;
mod gate;
mod middleware;
mod options;
mod transfer;
mod validator;

pub use compose::PreparedResponse;
pub use context::{evaluate_range, Decline, RangeDecision, RangeIgnored, RequestContext};
pub use gate::{match_path, RequestMethod};
pub use middleware::StaticFileMiddleware;
pub use options::{PrepareResponseCallback, PrepareResponseContext, StaticFileOptions};
pub use transfer::{BodyTransfer, BodyWriter, TransferStrategy};
pub use validator::{ResourceDescriptor, Validator};
