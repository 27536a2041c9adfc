//! Command catalog for the conch resolution engine.
//!
//! Declarative [`QueryDef`] trees describe the commands an interactive
//! shell understands; [`Catalog::build`] freezes them once at startup into
//! an immutable arena-based tree that the resolver walks on every
//! keystroke. Definitions deserialize from JSON catalog files or are built
//! in code via the chainable constructors on the definition types.
//!
//! ```
//! use conch_catalog::{Catalog, ParameterDef, QueryDef};
//!
//! let defs = vec![
//!     QueryDef::new("current-directory")
//!         .with_representation("cd")
//!         .with_parameter(ParameterDef::new("path").optional().repeatable()),
//! ];
//! let catalog = Catalog::build(&defs).expect("valid definitions");
//! let id = catalog.find_root("CD").expect("case-insensitive alias");
//! assert_eq!(catalog.node(id).key(), "current-directory");
//! ```

#![warn(missing_docs)]

mod builder;
/// Declarative command definitions (serde-deserializable).
pub mod def;
/// The frozen catalog tree.
pub mod node;

pub use builder::CatalogError;
pub use def::{Documentation, OptionDef, ParameterDef, QueryDef};
pub use node::{Catalog, NodeId, OptionSlot, ParameterSlot, QueryNode, ShapePattern};
