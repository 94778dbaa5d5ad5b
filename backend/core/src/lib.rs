pub mod error;
pub mod normalize;
pub mod prompt;
pub mod traits;
pub mod types;

pub use error::{RelayError, PARSE_FAILURE_MESSAGE, UPSTREAM_FALLBACK_MESSAGE};
pub use normalize::{coerce_entry, locate_json_region, normalize_reply};
pub use traits::{VisionProvider, VisionReply, VisionRequest};
pub use types::{ExtractionKind, ExtractionResponse, ExtractionResult};
