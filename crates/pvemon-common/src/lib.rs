//! Shared types for the pvemon node agent.
//!
//! The central type is [`facts::Facts`], the loosely-typed fact mapping each
//! harvester produces and the report assembler consumes. [`catalog`] holds
//! the fixed service-name vocabulary shared between harvesting and report
//! assembly.

pub mod catalog;
pub mod facts;
