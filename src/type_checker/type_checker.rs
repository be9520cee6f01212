use log::{debug, trace};

use crate::{
    ast::{
        ast::{AstNode, NodeKind},
        expressions::{
            AssignNode, BinOpNode, CallNode, CombEqNode, IdentNode, LiteralNode, LiteralValue,
            TernaryNode, UnarOp, UnarOpNode,
        },
        statements::{
            CatchNode, ForNode, FuncDeclNode, FuncParamNode, IfNode, ReturnNode, StmtListNode,
            TryNode, VarsDeclNode, WhileNode,
        },
        types::{join_types, TypeDesc},
    },
    errors::errors::{Error, ErrorImpl},
    lexer::lexer::tokenize,
    parser::parser::parse,
    Position,
};

use super::{
    compatibility::{unar_op_result, BinaryOperator},
    convert::convert_slot,
    scope::{IdentDesc, ScopeId, ScopeTree},
};

/// Declarations every program can see. Checked once into the root scope.
pub const BUILT_IN_OBJECTS: &str = r#"
    string read() { }
    void print(string p0) { }
    void println(string p0) { }
    int to_int(string p0) { }
    float to_float(string p0) { }
"#;

/// Outcome of checking one node: its type and, for identifier-bearing
/// nodes, the symbol it resolved to.
struct Resolved {
    type_: TypeDesc,
    ident: Option<IdentDesc>,
}

impl From<TypeDesc> for Resolved {
    fn from(type_: TypeDesc) -> Self {
        Resolved { type_, ident: None }
    }
}

/// Type of a node that has already been checked.
fn resolved_type(node: &AstNode) -> Result<&TypeDesc, Error> {
    node.node_type
        .as_ref()
        .ok_or_else(|| Error::new(ErrorImpl::UnresolvedType, Some(node.position)))
}

/// Name introduced by a declaration. The parser only puts identifiers here.
fn declared_name(node: &AstNode) -> Result<String, Error> {
    node.ident_name().map(String::from).ok_or_else(|| {
        Error::new(
            ErrorImpl::UnexpectedTokenDetailed {
                token: node.label(),
                message: String::from("expected an identifier"),
            },
            Some(node.position),
        )
    })
}

/// A checked target of `=`, `op=`, `++` or `--` must resolve to a symbol.
/// A bare type name such as `int` resolves to a type only.
fn require_variable(node: &AstNode) -> Result<(), Error> {
    if node.node_ident.is_some() {
        return Ok(());
    }

    Err(Error::new(
        ErrorImpl::NotAVariable {
            identifier: node.label(),
        },
        Some(node.position),
    ))
}

/// Single-pass semantic checker.
///
/// Walks the tree depth-first, annotating every node with its type (and
/// symbol where one applies) and splicing conversion nodes in where an
/// implicit widening is needed. The first violation aborts the pass.
#[derive(Debug, Default)]
pub struct TypeChecker {
    pub scopes: ScopeTree,
}

impl TypeChecker {
    pub fn new() -> Self {
        TypeChecker {
            scopes: ScopeTree::new(),
        }
    }

    /// Checks a whole program in `scope`, normally the root scope.
    pub fn check_program(&mut self, program: &mut AstNode, scope: ScopeId) -> Result<(), Error> {
        self.semantic_check(program, scope)
    }

    pub fn semantic_check(&mut self, node: &mut AstNode, scope: ScopeId) -> Result<(), Error> {
        trace!("checking {} ({})", node.label(), node.position);

        let position = node.position;
        let resolved = match &mut node.kind {
            NodeKind::Literal(literal) => check_literal(literal),
            NodeKind::Ident(ident) => self.check_ident(ident, scope, position)?,
            NodeKind::BinOp(BinOpNode { op, arg1, arg2 }) => {
                self.check_binary(*op, arg1, arg2, scope, position)?
            }
            NodeKind::CombEq(CombEqNode { op, arg1, arg2 }) => {
                self.check_binary(*op, arg1, arg2, scope, position)?
            }
            NodeKind::UnarOp(unar_op) => self.check_unar_op(unar_op, scope, position)?,
            NodeKind::Ternary(ternary) => self.check_ternary(ternary, scope, position)?,
            NodeKind::Call(call) => self.check_call(call, scope, position)?,
            NodeKind::Assign(assign) => self.check_assign(assign, scope, position)?,
            NodeKind::TypeConvert(convert) => {
                self.semantic_check(&mut convert.expr, scope)?;
                convert.type_.clone().into()
            }
            NodeKind::VarsDecl(vars_decl) => self.check_vars_decl(vars_decl, scope)?,
            NodeKind::FuncParam(param) => self.check_func_param(param, scope)?,
            NodeKind::FuncDecl(func) => self.check_func_decl(func, scope, position)?,
            NodeKind::Return(return_node) => self.check_return(return_node, scope, position)?,
            NodeKind::If(if_node) => self.check_if(if_node, scope)?,
            NodeKind::While(while_node) | NodeKind::DoWhile(while_node) => {
                self.check_while(while_node, scope)?
            }
            NodeKind::For(for_node) => self.check_for(for_node, scope, position)?,
            NodeKind::Try(try_node) => self.check_try(try_node, scope, position)?,
            NodeKind::Catch(catch) => self.check_catch(catch, scope)?,
            NodeKind::StmtList(stmt_list) => self.check_stmt_list(stmt_list, scope)?,
        };

        node.node_type = Some(resolved.type_);
        node.node_ident = resolved.ident;
        Ok(())
    }

    /// Resolves a type name through the keyword table and annotates its node.
    fn check_type_name(&mut self, node: &mut AstNode) -> Result<TypeDesc, Error> {
        let name = declared_name(node)?;
        let type_ = TypeDesc::from_str(&name).map_err(|e| e.or_position(node.position))?;
        node.node_type = Some(type_.clone());
        Ok(type_)
    }

    fn check_ident(&self, ident: &IdentNode, scope: ScopeId, position: Position) -> Result<Resolved, Error> {
        match self.scopes.lookup(scope, &ident.name) {
            Some(desc) => Ok(Resolved {
                type_: desc.type_.clone(),
                ident: Some(desc.clone()),
            }),
            None => TypeDesc::from_str(&ident.name)
                .map(Resolved::from)
                .map_err(|e| e.or_position(position)),
        }
    }

    /// Shared by binary and compound-assignment operators: direct table hit,
    /// then the right operand widened one step, then the left one.
    fn check_binary<Op: BinaryOperator>(
        &mut self,
        op: Op,
        arg1: &mut AstNode,
        arg2: &mut AstNode,
        scope: ScopeId,
        position: Position,
    ) -> Result<Resolved, Error> {
        self.semantic_check(arg1, scope)?;
        if op.assigns() {
            require_variable(arg1)?;
        }
        self.semantic_check(arg2, scope)?;

        let left_type = resolved_type(arg1)?;
        let right_type = resolved_type(arg2)?;
        let mismatch = Error::new(
            ErrorImpl::OperatorTypeMismatch {
                operator: op.to_string(),
                operands: join_types([left_type, right_type]),
            },
            Some(position),
        );

        let (Some(left), Some(right)) = (left_type.base_type(), right_type.base_type()) else {
            return Err(mismatch);
        };

        if let Some(result) = op.result_type(left, right) {
            return Ok(TypeDesc::from(result).into());
        }

        for &widened in right.convertible_to() {
            if let Some(result) = op.result_type(left, widened) {
                convert_slot(arg2, &widened.into(), None, None)?;
                return Ok(TypeDesc::from(result).into());
            }
        }

        for &widened in left.convertible_to() {
            if let Some(result) = op.result_type(widened, right) {
                convert_slot(arg1, &widened.into(), None, None)?;
                return Ok(TypeDesc::from(result).into());
            }
        }

        Err(mismatch)
    }

    fn check_unar_op(&mut self, node: &mut UnarOpNode, scope: ScopeId, position: Position) -> Result<Resolved, Error> {
        self.semantic_check(&mut node.arg, scope)?;
        if matches!(node.op, UnarOp::Inc | UnarOp::Dec) {
            require_variable(&node.arg)?;
        }

        let arg_type = resolved_type(&node.arg)?;
        arg_type
            .base_type()
            .and_then(|base_type| unar_op_result(node.op, base_type))
            .map(|result| TypeDesc::from(result).into())
            .ok_or_else(|| {
                Error::new(
                    ErrorImpl::OperatorTypeMismatch {
                        operator: node.op.to_string(),
                        operands: arg_type.to_string(),
                    },
                    Some(position),
                )
            })
    }

    fn check_ternary(&mut self, node: &mut TernaryNode, scope: ScopeId, position: Position) -> Result<Resolved, Error> {
        self.semantic_check(&mut node.cond, scope)?;
        convert_slot(&mut node.cond, &TypeDesc::BOOL, None, Some("condition"))?;

        self.semantic_check(&mut node.true_expr, scope)?;
        self.semantic_check(&mut node.false_expr, scope)?;

        let true_type = resolved_type(&node.true_expr)?;
        let false_type = resolved_type(&node.false_expr)?;
        if true_type != false_type {
            return Err(Error::new(
                ErrorImpl::BranchTypeMismatch {
                    true_type: true_type.to_string(),
                    false_type: false_type.to_string(),
                },
                Some(position),
            ));
        }

        Ok(true_type.clone().into())
    }

    fn check_call(&mut self, node: &mut CallNode, scope: ScopeId, position: Position) -> Result<Resolved, Error> {
        let name = declared_name(&node.func)?;
        let func = self.scopes.lookup(scope, &name).cloned().ok_or_else(|| {
            Error::new(
                ErrorImpl::UndeclaredIdentifier {
                    identifier: name.clone(),
                },
                Some(position),
            )
        })?;

        let (Some(return_type), Some(formal)) = (func.type_.return_type(), func.type_.params()) else {
            return Err(Error::new(
                ErrorImpl::NotAFunction { identifier: name },
                Some(position),
            ));
        };

        if formal.len() != node.params.len() {
            return Err(Error::new(
                ErrorImpl::ArgumentCountMismatch {
                    function: name,
                    expected: formal.len(),
                    received: node.params.len(),
                },
                Some(position),
            ));
        }

        let mut actual = Vec::with_capacity(node.params.len());
        for param in node.params.iter_mut() {
            self.semantic_check(param, scope)?;
            actual.push(resolved_type(param)?.clone());
        }

        let mut mismatch = false;
        for (param, formal_type) in node.params.iter_mut().zip(formal) {
            if convert_slot(param, formal_type, None, None).is_err() {
                mismatch = true;
            }
        }

        if mismatch {
            return Err(Error::new(
                ErrorImpl::ArgumentTypeMismatch {
                    function: name,
                    actual: join_types(&actual),
                    formal: join_types(formal),
                },
                Some(position),
            ));
        }

        node.func.node_type = Some(func.type_.clone());
        node.func.node_ident = Some(func.clone());

        Ok(Resolved {
            type_: return_type.clone(),
            ident: Some(func),
        })
    }

    fn check_assign(&mut self, node: &mut AssignNode, scope: ScopeId, position: Position) -> Result<Resolved, Error> {
        self.semantic_check(&mut node.var, scope)?;
        require_variable(&node.var)?;
        self.semantic_check(&mut node.val, scope)?;

        let var_type = resolved_type(&node.var)?.clone();
        convert_slot(&mut node.val, &var_type, Some(position), Some("assigned value"))?;

        Ok(var_type.into())
    }

    fn check_vars_decl(&mut self, node: &mut VarsDeclNode, scope: ScopeId) -> Result<Resolved, Error> {
        let type_ = self.check_type_name(&mut node.type_)?;

        for var in node.vars.iter_mut() {
            let target = match &var.kind {
                NodeKind::Assign(assign) => &*assign.var,
                _ => &*var,
            };
            let name = declared_name(target)?;
            let var_position = target.position;

            self.scopes
                .declare(scope, IdentDesc::new(name, type_.clone()))
                .map_err(|e| e.or_position(var_position))?;
            self.semantic_check(var, scope)?;
        }

        Ok(TypeDesc::VOID.into())
    }

    fn check_func_param(&mut self, node: &mut FuncParamNode, scope: ScopeId) -> Result<Resolved, Error> {
        let type_ = self.check_type_name(&mut node.type_)?;
        let name = declared_name(&node.name)?;

        let ident = self
            .scopes
            .declare(scope, IdentDesc::param(name, type_.clone()))
            .map_err(|e| e.or_position(node.name.position))?;

        node.name.node_type = Some(type_);
        node.name.node_ident = Some(ident.clone());

        Ok(Resolved {
            type_: TypeDesc::VOID,
            ident: Some(ident),
        })
    }

    fn check_func_decl(&mut self, node: &mut FuncDeclNode, scope: ScopeId, position: Position) -> Result<Resolved, Error> {
        let name = declared_name(&node.name)?;
        if self.scopes.nearest_function_scope(scope).is_some() {
            return Err(Error::new(
                ErrorImpl::NestedFunctionNotSupported { function: name },
                Some(position),
            ));
        }

        let return_type = self.check_type_name(&mut node.return_type)?;
        let func_scope = self.scopes.new_function_scope(scope);

        let mut params = Vec::with_capacity(node.params.len());
        for param in node.params.iter_mut() {
            self.semantic_check(param, func_scope)?;
            let ident = param
                .node_ident
                .as_ref()
                .ok_or_else(|| Error::new(ErrorImpl::UnresolvedType, Some(param.position)))?;
            params.push(ident.type_.clone());
        }

        let type_ = TypeDesc::function(return_type.clone(), params);
        let root = self.scopes.root_scope(scope);
        let ident = self
            .scopes
            .declare(root, IdentDesc::new(name, type_.clone()))
            .map_err(|e| e.or_position(node.name.position))?;
        self.scopes.set_function(func_scope, ident.clone());

        node.name.node_type = Some(type_);
        node.name.node_ident = Some(ident);

        self.semantic_check(&mut node.body, func_scope)?;

        Ok(return_type.into())
    }

    fn check_return(&mut self, node: &mut ReturnNode, scope: ScopeId, position: Position) -> Result<Resolved, Error> {
        if let Some(arg) = &mut node.arg {
            self.semantic_check(arg, scope)?;
        }

        let func_scope = self
            .scopes
            .nearest_function_scope(scope)
            .ok_or_else(|| Error::new(ErrorImpl::ReturnOutsideFunction, Some(position)))?;
        let return_type = self
            .scopes
            .function_of(func_scope)
            .and_then(|func| func.type_.return_type())
            .cloned()
            .ok_or_else(|| Error::new(ErrorImpl::UnresolvedType, Some(position)))?;

        match &mut node.arg {
            Some(arg) => convert_slot(arg, &return_type, Some(position), Some("returned value"))?,
            None if return_type != TypeDesc::VOID => {
                return Err(Error::new(
                    ErrorImpl::InconvertibleType {
                        from: TypeDesc::VOID.to_string(),
                        to: return_type.to_string(),
                        context: Some(String::from("returned value")),
                    },
                    Some(position),
                ));
            }
            None => {}
        }

        Ok(TypeDesc::VOID.into())
    }

    fn check_if(&mut self, node: &mut IfNode, scope: ScopeId) -> Result<Resolved, Error> {
        self.semantic_check(&mut node.cond, scope)?;
        convert_slot(&mut node.cond, &TypeDesc::BOOL, None, Some("condition"))?;

        let then_scope = self.scopes.new_child(scope);
        self.semantic_check(&mut node.then_stmt, then_scope)?;

        if let Some(else_stmt) = &mut node.else_stmt {
            let else_scope = self.scopes.new_child(scope);
            self.semantic_check(else_stmt, else_scope)?;
        }

        Ok(TypeDesc::VOID.into())
    }

    fn check_while(&mut self, node: &mut WhileNode, scope: ScopeId) -> Result<Resolved, Error> {
        self.semantic_check(&mut node.cond, scope)?;
        convert_slot(&mut node.cond, &TypeDesc::BOOL, None, Some("condition"))?;

        let body_scope = self.scopes.new_child(scope);
        self.semantic_check(&mut node.body, body_scope)?;

        Ok(TypeDesc::VOID.into())
    }

    fn check_for(&mut self, node: &mut ForNode, scope: ScopeId, position: Position) -> Result<Resolved, Error> {
        let for_scope = self.scopes.new_child(scope);

        if let Some(init) = &mut node.init {
            self.semantic_check(init, for_scope)?;
        }

        let cond = node.cond.get_or_insert_with(|| {
            Box::new(AstNode::new(
                NodeKind::Literal(LiteralNode::bool(true)),
                position,
            ))
        });
        self.semantic_check(cond, for_scope)?;
        convert_slot(cond, &TypeDesc::BOOL, None, Some("condition"))?;

        if let Some(step) = &mut node.step {
            self.semantic_check(step, for_scope)?;
        }

        let body_scope = self.scopes.new_child(for_scope);
        self.semantic_check(&mut node.body, body_scope)?;

        Ok(TypeDesc::VOID.into())
    }

    fn check_try(&mut self, node: &mut TryNode, scope: ScopeId, position: Position) -> Result<Resolved, Error> {
        if node.catch_clause.is_none() && node.finally_block.is_none() {
            return Err(Error::new(ErrorImpl::TryMissingHandler, Some(position)));
        }

        self.semantic_check(&mut node.try_block, scope)?;

        if let Some(catch_clause) = &mut node.catch_clause {
            self.semantic_check(catch_clause, scope)?;
        }
        if let Some(finally_block) = &mut node.finally_block {
            self.semantic_check(finally_block, scope)?;
        }

        Ok(TypeDesc::VOID.into())
    }

    fn check_catch(&mut self, node: &mut CatchNode, scope: ScopeId) -> Result<Resolved, Error> {
        let type_ = self.check_type_name(&mut node.exception_type)?;
        if type_ != TypeDesc::EXCEPTION {
            return Err(Error::new(
                ErrorImpl::CatchTypeMismatch {
                    received: type_.to_string(),
                },
                Some(node.exception_type.position),
            ));
        }

        let catch_scope = self.scopes.new_child(scope);
        let name = declared_name(&node.exception_var)?;
        let ident = self
            .scopes
            .declare(catch_scope, IdentDesc::new(name, type_.clone()))
            .map_err(|e| e.or_position(node.exception_var.position))?;

        node.exception_var.node_type = Some(type_);
        node.exception_var.node_ident = Some(ident);

        self.semantic_check(&mut node.block, catch_scope)?;

        Ok(TypeDesc::VOID.into())
    }

    fn check_stmt_list(&mut self, node: &mut StmtListNode, scope: ScopeId) -> Result<Resolved, Error> {
        let scope = if node.program {
            scope
        } else {
            self.scopes.new_child(scope)
        };

        for stmt in node.exprs.iter_mut() {
            self.semantic_check(stmt, scope)?;
        }

        Ok(TypeDesc::VOID.into())
    }
}

fn check_literal(literal: &LiteralNode) -> Resolved {
    match literal.value {
        LiteralValue::Bool(_) => TypeDesc::BOOL,
        LiteralValue::Int(_) => TypeDesc::INT,
        LiteralValue::Float(_) => TypeDesc::FLOAT,
        LiteralValue::Str(_) => TypeDesc::STR,
    }
    .into()
}

/// Builds a checker whose root scope holds the built-in declarations.
///
/// The built-in symbols are flagged as such and the root's variable slots
/// restart at zero, so user globals are numbered from the first slot.
pub fn prepare_global_scope() -> Result<TypeChecker, Error> {
    let mut built_ins = parse(tokenize(String::from(BUILT_IN_OBJECTS))?)?;

    let mut checker = TypeChecker::new();
    let root = checker.scopes.root();
    checker.check_program(&mut built_ins, root)?;
    checker.scopes.mark_built_in(root);

    debug!(
        "built-in scope ready with {} symbols",
        checker.scopes.idents(root).count()
    );
    Ok(checker)
}

/// Checks `program` against a fresh built-in scope.
///
/// On success the tree is fully annotated and the returned checker owns the
/// scopes the symbols were declared in.
pub fn type_check(program: &mut AstNode) -> Result<TypeChecker, Error> {
    let mut checker = prepare_global_scope()?;
    let root = checker.scopes.root();
    checker.check_program(program, root)?;
    Ok(checker)
}
