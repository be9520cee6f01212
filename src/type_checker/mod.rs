//! Semantic analysis.
//!
//! Resolves every identifier against a tree of lexical scopes, infers or
//! validates the type of every node and rewrites the tree in place where
//! an implicit widening applies:
//!
//! - `scope`: symbol descriptors and the scope arena with slot numbering
//! - `compatibility`: operand tables for binary, compound and unary operators
//! - `convert`: conversion-node insertion along the lattice
//! - `type_checker`: the checking pass and built-in scope seeding

pub mod compatibility;
pub mod convert;
pub mod scope;
pub mod type_checker;

#[cfg(test)]
mod tests;
