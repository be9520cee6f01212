use std::fmt::Display;

use crate::ast::types::TypeDesc;

use super::ast::AstNode;

// OPERATORS

/// Binary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Ge,
    Le,
    NEquals,
    Equals,
    Gt,
    Lt,
    BitAnd,
    BitOr,
    LogicalAnd,
    LogicalOr,
}

impl BinOp {
    pub fn symbol(self) -> &'static str {
        match self {
            BinOp::Add => "+",
            BinOp::Sub => "-",
            BinOp::Mul => "*",
            BinOp::Div => "/",
            BinOp::Mod => "%",
            BinOp::Ge => ">=",
            BinOp::Le => "<=",
            BinOp::NEquals => "!=",
            BinOp::Equals => "==",
            BinOp::Gt => ">",
            BinOp::Lt => "<",
            BinOp::BitAnd => "&",
            BinOp::BitOr => "|",
            BinOp::LogicalAnd => "&&",
            BinOp::LogicalOr => "||",
        }
    }
}

impl Display for BinOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// Compound assignment operators (`a op= b`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CombEqOp {
    AddEq,
    SubEq,
    MulEq,
    DivEq,
    ModEq,
}

impl CombEqOp {
    pub fn symbol(self) -> &'static str {
        match self {
            CombEqOp::AddEq => "+=",
            CombEqOp::SubEq => "-=",
            CombEqOp::MulEq => "*=",
            CombEqOp::DivEq => "/=",
            CombEqOp::ModEq => "%=",
        }
    }
}

impl Display for CombEqOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// Unary operators. `Return` marks a value-returning position and only
/// appears in the compatibility table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnarOp {
    Inc,
    Dec,
    Not,
    Return,
}

impl UnarOp {
    pub fn symbol(self) -> &'static str {
        match self {
            UnarOp::Inc => "++",
            UnarOp::Dec => "--",
            UnarOp::Not => "!",
            UnarOp::Return => "return",
        }
    }
}

impl Display for UnarOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

// LITERALS

/// Native value of a literal, classified by the lexer's token kind.
#[derive(Debug, Clone, PartialEq)]
pub enum LiteralValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
}

/// Literal Node
/// Keeps the source text next to the parsed value for tree printing.
#[derive(Debug, Clone, PartialEq)]
pub struct LiteralNode {
    pub literal: String,
    pub value: LiteralValue,
}

impl LiteralNode {
    pub fn bool(value: bool) -> Self {
        LiteralNode {
            literal: value.to_string(),
            value: LiteralValue::Bool(value),
        }
    }
}

/// Identifier Node
/// Names a variable, a function, or (in declarations) a type.
#[derive(Debug, Clone, PartialEq)]
pub struct IdentNode {
    pub name: String,
}

// COMPLEX

#[derive(Debug, Clone, PartialEq)]
pub struct BinOpNode {
    pub op: BinOp,
    pub arg1: Box<AstNode>,
    pub arg2: Box<AstNode>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CombEqNode {
    pub op: CombEqOp,
    pub arg1: Box<AstNode>,
    pub arg2: Box<AstNode>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UnarOpNode {
    pub op: UnarOp,
    pub arg: Box<AstNode>,
    /// `i++` rather than `++i`
    pub postfix: bool,
}

/// `cond ? true_expr : false_expr`
#[derive(Debug, Clone, PartialEq)]
pub struct TernaryNode {
    pub cond: Box<AstNode>,
    pub true_expr: Box<AstNode>,
    pub false_expr: Box<AstNode>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CallNode {
    pub func: Box<AstNode>,
    pub params: Vec<AstNode>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AssignNode {
    pub var: Box<AstNode>,
    pub val: Box<AstNode>,
}

/// Implicit widening made explicit by the checker. Never produced by the parser.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeConvertNode {
    pub expr: Box<AstNode>,
    pub type_: TypeDesc,
}
