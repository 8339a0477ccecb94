//! graphql operation synthesis
//!
//! this crate reads a graphql schema and synthesizes one exhaustive
//! operation document for every query, mutation, and subscription field.
//! each document selects every reachable field down to a depth limit,
//! prunes repeated (parent type, field) edges, binds every argument to a
//! unique variable, and expands unions into inline fragments.
//!
//! ## quick start
//!
//! ```
//! use querysmith::{Generator, GeneratorConfig, TypeGraph};
//!
//! # fn example() -> Result<(), querysmith::Error> {
//! let graph = TypeGraph::parse("type Query { user(id: ID!): User } type User { id: ID! name: String }")?;
//! let generator = Generator::new(&graph, GeneratorConfig::new().with_depth_limit(3))?;
//! for doc in generator.documents() {
//!     println!("{}", doc.text);
//! }
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```
//!
//! ## writing files
//!
//! use [`write_documents`] or the `querysmith` binary to persist documents
//! alongside an `index.json` listing each file's variables.

mod arguments;
mod config;
mod document;
mod error;
mod output;
mod schema;
mod source;
mod synth;

pub use arguments::{render_signature, ArgumentCollector, Checkpoint};
pub use config::{GeneratorConfig, DEFAULT_DEPTH_LIMIT, DEFAULT_FILE_EXTENSION};
pub use document::{assemble, Generator, OperationDocument};
pub use error::{Error, Result};
pub use output::{write_documents, Index, IndexEntry, INDEX_FILE};
pub use schema::{
    ArgumentDefinition, FieldDefinition, NamedType, OperationKind, Shape, TypeGraph, TypeKind,
    TypeRef,
};
pub use source::SchemaSource;
pub use synth::{CycleGuard, Edge, Synthesized, Synthesizer};
