pub use crate::app::App;
pub use sahayata_types::error::{Error, ShResult};
pub use sahayata_types::types::{ApiResponse, SessionId, Timestamp};

pub use tracing::{debug, debug_span, error, error_span, info, info_span, warn, warn_span};

// vim: ts=4
