/// AST (Abstract Syntax Tree) module
/// Contains all definitions related to the syntax tree
///
/// Submodules:
/// - ast: The node struct, the closed set of node kinds, and tree printing
/// - expressions: Expression payloads and operators
/// - statements: Statement and declaration payloads
/// - types: Type descriptors and the implicit conversion lattice
pub mod ast;
pub mod expressions;
pub mod statements;
pub mod types;
