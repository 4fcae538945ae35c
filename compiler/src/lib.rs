//! bytechomp-compiler
//!
//! This crate implements:
//!  1) Record declarations (`RecordDecl`, `FieldDecl`, `TypeDecl`),
//!  2) The schema compiler turning a declaration into a `FieldPlan`,
//!  3) The layout linearizer with packed `unpack` / `pack`,
//!  4) A process-wide cache of compiled records keyed by Rust type,
//!  5) Error types (`ChompError`), and the `Record` trait.

pub mod error;
pub mod types;
pub mod plan;
pub mod compiler;
pub mod layout;
pub mod cache;
pub mod traits;

pub use compiler::{compile, compile_record, CompiledRecord};
pub use cache::compiled;
pub use layout::{linearize, Layout, Slot, SlotKind};
