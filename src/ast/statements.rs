use super::ast::AstNode;

/// `int a, b = 1;`
///
/// Each entry of `vars` is either an identifier or an assignment whose
/// target is the declared identifier.
#[derive(Debug, Clone, PartialEq)]
pub struct VarsDeclNode {
    pub type_: Box<AstNode>,
    pub vars: Vec<AstNode>,
}

/// One `type name` entry of a function's parameter list.
#[derive(Debug, Clone, PartialEq)]
pub struct FuncParamNode {
    pub type_: Box<AstNode>,
    pub name: Box<AstNode>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FuncDeclNode {
    pub return_type: Box<AstNode>,
    pub name: Box<AstNode>,
    pub params: Vec<AstNode>,
    pub body: Box<AstNode>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReturnNode {
    pub arg: Option<Box<AstNode>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IfNode {
    pub cond: Box<AstNode>,
    pub then_stmt: Box<AstNode>,
    pub else_stmt: Option<Box<AstNode>>,
}

/// Shared by `while` and `do ... while`.
#[derive(Debug, Clone, PartialEq)]
pub struct WhileNode {
    pub cond: Box<AstNode>,
    pub body: Box<AstNode>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ForNode {
    pub init: Option<Box<AstNode>>,
    pub cond: Option<Box<AstNode>>,
    pub step: Option<Box<AstNode>>,
    pub body: Box<AstNode>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TryNode {
    pub try_block: Box<AstNode>,
    pub catch_clause: Option<Box<AstNode>>,
    pub finally_block: Option<Box<AstNode>>,
}

/// `catch (Exception e) { ... }`
#[derive(Debug, Clone, PartialEq)]
pub struct CatchNode {
    pub exception_type: Box<AstNode>,
    pub exception_var: Box<AstNode>,
    pub block: Box<AstNode>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StmtListNode {
    pub exprs: Vec<AstNode>,
    /// Set on the top-level list only; it shares the scope it is checked in.
    pub program: bool,
}
