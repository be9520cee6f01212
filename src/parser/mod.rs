//! Parser module for building the syntax tree.
//!
//! Transforms the token stream into the tree of [`crate::ast::ast::AstNode`]s
//! the checker consumes. Expressions use a Pratt parser: NUD (null
//! denotation) handlers for prefix positions, LED (left denotation) handlers
//! for infix and postfix operators, and binding powers for precedence.
//! Statements are dispatched on their leading keyword; a declaration is
//! recognised by two identifiers in a row (`int x`, `void f(`).

pub mod expr;
pub mod lookups;
pub mod parser;
pub mod stmt;
