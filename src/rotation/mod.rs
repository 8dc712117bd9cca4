//! Time-rotated log file output
//!
//! # Invariants
//!
//! - At most one log file handle is open at any time
//! - The target name is a pure function of wall-clock time and template
//! - Two writes within the same rotation boundary hit the same file
//! - Resolve, rotate and append form one critical section

mod clock;
mod errors;
mod template;
mod writer;

pub use clock::{Clock, ManualClock, SystemClock};
pub use errors::{WriterError, WriterErrorCode, WriterResult};
pub use template::{FilenameTemplate, DEFAULT_TEMPLATE};
pub use writer::RotatingWriter;
