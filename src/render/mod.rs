//! Rendering module: text assembly, element rows and JSON output.

mod cleanup;
mod json;
mod options;
mod result;
mod rows;
mod text;

pub use cleanup::{CleanupOptions, CleanupPipeline, CleanupPreset};
pub use json::{to_json, to_json_lines, JsonFormat};
pub use options::{AssembleOptions, DEFAULT_SEPARATOR};
pub use result::AssemblyStats;
pub use rows::element_rows;
pub use text::{assemble, Assembler};
