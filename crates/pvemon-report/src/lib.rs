//! Report assembly and Pandora FMS agent XML serialization.
//!
//! [`assemble`] is a deterministic, total function from the four harvester
//! fact mappings to the fixed, ordered module list; [`render`] turns that
//! list plus a header block into the agent XML document. Missing facts never
//! fault here: every field has a documented default.

pub mod assembler;
pub mod module;
pub mod xml;


pub use assembler::assemble;
pub use module::{Module, ModuleType, ModuleValue};
pub use xml::{render, ReportError};
