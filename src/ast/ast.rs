use crate::{type_checker::scope::IdentDesc, Position};

use super::{
    expressions::{
        AssignNode, BinOpNode, CallNode, CombEqNode, IdentNode, LiteralNode, TernaryNode,
        TypeConvertNode, UnarOpNode,
    },
    statements::{
        CatchNode, ForNode, FuncDeclNode, FuncParamNode, IfNode, ReturnNode, StmtListNode,
        TryNode, VarsDeclNode, WhileNode,
    },
    types::TypeDesc,
};

/// Node Kinds
///
/// The closed set of node variants. The checker matches on it exhaustively.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    Literal(LiteralNode),
    Ident(IdentNode),
    BinOp(BinOpNode),
    CombEq(CombEqNode),
    UnarOp(UnarOpNode),
    Ternary(TernaryNode),
    Call(CallNode),
    Assign(AssignNode),
    TypeConvert(TypeConvertNode),
    VarsDecl(VarsDeclNode),
    FuncParam(FuncParamNode),
    FuncDecl(FuncDeclNode),
    Return(ReturnNode),
    If(IfNode),
    While(WhileNode),
    DoWhile(WhileNode),
    For(ForNode),
    Try(TryNode),
    Catch(CatchNode),
    StmtList(StmtListNode),
}

/// A syntax tree node.
///
/// Children are owned through `Box`/`Vec`, so a parent can swap a child
/// (for a conversion wrapper) without touching the rest of the tree.
/// `node_type` and `node_ident` start empty and are filled by the checker.
#[derive(Debug, Clone, PartialEq)]
pub struct AstNode {
    pub kind: NodeKind,
    pub position: Position,
    pub node_type: Option<TypeDesc>,
    pub node_ident: Option<IdentDesc>,
}

impl AstNode {
    pub fn new(kind: NodeKind, position: Position) -> Self {
        AstNode {
            kind,
            position,
            node_type: None,
            node_ident: None,
        }
    }

    /// An empty, non-program statement list.
    pub fn empty(position: Position) -> Self {
        AstNode::new(
            NodeKind::StmtList(StmtListNode {
                exprs: vec![],
                program: false,
            }),
            position,
        )
    }

    pub fn ident(name: impl Into<String>, position: Position) -> Self {
        AstNode::new(NodeKind::Ident(IdentNode { name: name.into() }), position)
    }

    /// Wraps `expr` in a conversion node already resolved to `type_`.
    pub fn type_convert(expr: AstNode, type_: TypeDesc) -> Self {
        let position = expr.position;
        let mut node = AstNode::new(
            NodeKind::TypeConvert(TypeConvertNode {
                expr: Box::new(expr),
                type_: type_.clone(),
            }),
            position,
        );
        node.node_type = Some(type_);
        node
    }

    /// Name of an identifier node.
    pub fn ident_name(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::Ident(ident) => Some(&ident.name),
            _ => None,
        }
    }

    /// Short label for tree printing.
    pub fn label(&self) -> String {
        match &self.kind {
            NodeKind::Literal(literal) => literal.literal.clone(),
            NodeKind::Ident(ident) => ident.name.clone(),
            NodeKind::BinOp(bin_op) => bin_op.op.to_string(),
            NodeKind::CombEq(comb_eq) => comb_eq.op.to_string(),
            NodeKind::UnarOp(unar_op) => {
                if unar_op.postfix {
                    format!("{}(post)", unar_op.op)
                } else if unar_op.op == super::expressions::UnarOp::Not {
                    unar_op.op.to_string()
                } else {
                    format!("{}(pref)", unar_op.op)
                }
            }
            NodeKind::Ternary(_) => String::from("?:"),
            NodeKind::Call(_) => String::from("call"),
            NodeKind::Assign(_) => String::from("="),
            NodeKind::TypeConvert(_) => String::from("convert"),
            NodeKind::VarsDecl(_) => String::from("var"),
            NodeKind::FuncParam(param) => param.type_.label(),
            NodeKind::FuncDecl(func) => {
                format!("{} {}()", func.return_type.label(), func.name.label())
            }
            NodeKind::Return(_) => String::from("return"),
            NodeKind::If(_) => String::from("if"),
            NodeKind::While(_) => String::from("while"),
            NodeKind::DoWhile(_) => String::from("do-while"),
            NodeKind::For(_) => String::from("for"),
            NodeKind::Try(try_node) => {
                let mut result = String::from("try");
                if try_node.catch_clause.is_some() {
                    result += "-catch";
                }
                if try_node.finally_block.is_some() {
                    result += "-finally";
                }
                result
            }
            NodeKind::Catch(_) => String::from("catch"),
            NodeKind::StmtList(_) => String::from("..."),
        }
    }

    /// Children in source order.
    pub fn childs(&self) -> Vec<&AstNode> {
        match &self.kind {
            NodeKind::Literal(_) | NodeKind::Ident(_) => vec![],
            NodeKind::BinOp(node) => vec![&*node.arg1, &*node.arg2],
            NodeKind::CombEq(node) => vec![&*node.arg1, &*node.arg2],
            NodeKind::UnarOp(node) => vec![&*node.arg],
            NodeKind::Ternary(node) => vec![&*node.cond, &*node.true_expr, &*node.false_expr],
            NodeKind::Call(node) => std::iter::once(&*node.func).chain(node.params.iter()).collect(),
            NodeKind::Assign(node) => vec![&*node.var, &*node.val],
            NodeKind::TypeConvert(node) => vec![&*node.expr],
            NodeKind::VarsDecl(node) => std::iter::once(&*node.type_).chain(node.vars.iter()).collect(),
            NodeKind::FuncParam(node) => vec![&*node.name],
            NodeKind::FuncDecl(node) => node.params.iter().chain(std::iter::once(&*node.body)).collect(),
            NodeKind::Return(node) => node.arg.iter().map(|arg| &**arg).collect(),
            NodeKind::If(node) => {
                let mut childs: Vec<&AstNode> = vec![&*node.cond, &*node.then_stmt];
                childs.extend(node.else_stmt.as_deref());
                childs
            }
            NodeKind::While(node) | NodeKind::DoWhile(node) => vec![&*node.cond, &*node.body],
            NodeKind::For(node) => node
                .init
                .as_deref()
                .into_iter()
                .chain(node.cond.as_deref())
                .chain(node.step.as_deref())
                .chain(std::iter::once(&*node.body))
                .collect(),
            NodeKind::Try(node) => std::iter::once(&*node.try_block)
                .chain(node.catch_clause.as_deref())
                .chain(node.finally_block.as_deref())
                .collect(),
            NodeKind::Catch(node) => vec![&*node.exception_type, &*node.exception_var, &*node.block],
            NodeKind::StmtList(node) => node.exprs.iter().collect(),
        }
    }

    /// Label plus the resolved symbol, or the resolved type when there is no symbol.
    pub fn to_str_full(&self) -> String {
        let resolved = match (&self.node_ident, &self.node_type) {
            (Some(ident), _) => ident.to_string(),
            (None, Some(node_type)) => node_type.to_string(),
            (None, None) => String::new(),
        };

        if resolved.is_empty() {
            self.label()
        } else {
            format!("{} : {}", self.label(), resolved)
        }
    }

    /// Renders the subtree, one node per line, with box-drawing connectors.
    pub fn tree(&self) -> Vec<String> {
        let mut lines = vec![self.to_str_full()];
        let childs = self.childs();
        for (i, child) in childs.iter().enumerate() {
            let (first, rest) = if i == childs.len() - 1 {
                ('└', ' ')
            } else {
                ('├', '│')
            };
            for (j, line) in child.tree().into_iter().enumerate() {
                let connector = if j == 0 { first } else { rest };
                lines.push(format!("{} {}", connector, line));
            }
        }
        lines
    }
}
