//! Action script compiler for the Giotto asset pipeline.
//!
//! This crate turns a JSON action document into a validated, immutable
//! [`ActionGraph`] ready for execution:
//!
//! 1. **Schema validation** checks the raw document against the recursive
//!    action grammar, reporting one error per violated field with a dotted
//!    path.
//! 2. **Semantic validation** runs four independent passes (unique IDs,
//!    resolvable references with typo suggestions, condition paths, target
//!    paths) and reports every problem at once.
//! 3. **Dependency resolution** builds the reference graph, rejects cycles
//!    with the full cycle path, and computes a topological execution order.
//! 4. **Graph building** materializes nodes (with synthetic IDs for
//!    anonymous actions) and partitions asset actions from game actions.
//!
//! # Example
//!
//! ```
//! use giotto_script::ScriptParser;
//!
//! let parser = ScriptParser::new();
//! let graph = parser.parse(r#"{"actions":[
//!     {"type":"asset_image","id":"bg","prompt":"ancient ruins at dusk",
//!      "size":"1024x768","model":"flux-schnell"},
//!     {"type":"show_modal","text":"Welcome","image_id":"bg"}
//! ]}"#).unwrap();
//!
//! assert_eq!(graph.len(), 2);
//! assert_eq!(graph.execution_order()[0], "bg");
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod error;
mod graph;
mod parser;
mod resolve;
mod schema;
mod semantic;
mod suggest;

pub use error::{ValidationError, ValidationErrorKind};
pub use graph::{ActionGraph, ActionNode, NodeStatus};
pub use parser::ScriptParser;
pub use suggest::{levenshtein, suggest};
