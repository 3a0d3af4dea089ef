//! Parser output handling: the parser seam and element flattening.

mod backend;
mod flatten;
mod options;

pub use backend::{DocumentParser, FnParser, SidecarParser, DEFAULT_SIDECAR_SUFFIX};
pub use flatten::{flatten, Flattened, Flattener, SkippedElement};
pub use options::{ErrorMode, FlattenOptions};
