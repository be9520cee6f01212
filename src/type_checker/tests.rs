//! Unit tests for the semantic checker.
//!
//! Programs are lexed, parsed and checked against the built-in scope; the
//! tests then inspect the annotated tree, the inserted conversion nodes and
//! the scope arena left behind.

use pretty_assertions::assert_eq;

use super::{
    scope::{IdentDesc, ScopeType},
    type_checker::{prepare_global_scope, type_check, TypeChecker},
};
use crate::{
    ast::{
        ast::{AstNode, NodeKind},
        expressions::LiteralValue,
        types::TypeDesc,
    },
    errors::errors::{Error, ErrorImpl},
    lexer::lexer::tokenize,
    parser::parser::parse,
    Position,
};

fn check(source: &str) -> Result<(AstNode, TypeChecker), Error> {
    let mut program = parse(tokenize(source.to_string())?)?;
    let checker = type_check(&mut program)?;
    Ok((program, checker))
}

fn check_ok(source: &str) -> AstNode {
    match check(source) {
        Ok((program, _)) => program,
        Err(error) => panic!("unexpected error for {:?}: {}", source, error),
    }
}

fn check_err(source: &str) -> Error {
    match check(source) {
        Ok(_) => panic!("expected {:?} to be rejected", source),
        Err(error) => error,
    }
}

fn stmts(program: &AstNode) -> &[AstNode] {
    match &program.kind {
        NodeKind::StmtList(list) => &list.exprs,
        other => panic!("expected a statement list, got {:?}", other),
    }
}

/// Value assigned by the first declarator of a variable declaration.
fn decl_value(decl: &AstNode) -> &AstNode {
    let NodeKind::VarsDecl(vars_decl) = &decl.kind else {
        panic!("expected a variable declaration, got {:?}", decl.kind);
    };
    match &vars_decl.vars[0].kind {
        NodeKind::Assign(assign) => &*assign.val,
        other => panic!("expected an initializer, got {:?}", other),
    }
}

/// First identifier node named `name` that resolved to a symbol.
fn find_ident(node: &AstNode, name: &str) -> Option<IdentDesc> {
    if node.ident_name() == Some(name) && node.node_ident.is_some() {
        return node.node_ident.clone();
    }
    node.childs()
        .into_iter()
        .find_map(|child| find_ident(child, name))
}

fn assert_converted(node: &AstNode, type_: TypeDesc) {
    match &node.kind {
        NodeKind::TypeConvert(convert) => {
            assert_eq!(convert.type_, type_);
            assert_eq!(node.node_type, Some(type_));
        }
        other => panic!("expected a conversion to {}, got {:?}", type_, other),
    }
}

// Built-in scope

#[test]
fn test_built_in_scope() {
    let checker = prepare_global_scope().unwrap();
    let root = checker.scopes.root();

    assert_eq!(checker.scopes.idents(root).count(), 5);
    assert!(checker.scopes.idents(root).all(|ident| ident.built_in));
    assert_eq!(checker.scopes.var_index(root), 0);

    let print = checker.scopes.lookup(root, "print").unwrap();
    assert_eq!(print.type_, TypeDesc::function(TypeDesc::VOID, vec![TypeDesc::STR]));
    assert_eq!(print.to_string(), "void (string), global, built-in");

    let read = checker.scopes.lookup(root, "read").unwrap();
    assert_eq!(read.to_string(), "string (), global, built-in");
}

#[test]
fn test_user_globals_start_at_first_slot() {
    let (program, checker) = check("int a; string b;").unwrap();

    assert_eq!(find_ident(&program, "a").unwrap().index, 0);
    assert_eq!(find_ident(&program, "b").unwrap().index, 1);
    assert!(!find_ident(&program, "a").unwrap().built_in);
    assert_eq!(checker.scopes.var_index(checker.scopes.root()), 2);
}

#[test]
fn test_built_in_calls() {
    let program = check_ok("int n = to_int(read()); println(\"done\");");
    let call = decl_value(&stmts(&program)[0]);

    assert_eq!(call.node_type, Some(TypeDesc::INT));
    assert!(call.node_ident.as_ref().unwrap().built_in);
}

// Declarations and scopes

#[test]
fn test_duplicate_global() {
    let error = check_err("int a;\nint a;");
    assert_eq!(
        error.internal(),
        &ErrorImpl::DuplicateIdentifier {
            identifier: String::from("a")
        }
    );
    assert_eq!(error.get_position(), Some(&Position::new(2, 5)));
}

#[test]
fn test_global_cannot_redeclare_built_in() {
    assert!(matches!(
        check_err("int print;").internal(),
        ErrorImpl::DuplicateIdentifier { .. }
    ));
}

#[test]
fn test_local_shadows_global() {
    let program = check_ok("int a; void f() { string a = \"x\"; }");
    let func = &stmts(&program)[1];

    let inner = find_ident(func, "a").unwrap();
    assert_eq!(inner.scope, ScopeType::Local);
    assert_eq!(inner.type_, TypeDesc::STR);
    assert_eq!(inner.index, 0);
}

#[test]
fn test_duplicate_local() {
    assert!(matches!(
        check_err("void f() { int a; float a; }").internal(),
        ErrorImpl::DuplicateIdentifier { .. }
    ));
}

#[test]
fn test_global_local_conflicts_with_global() {
    assert!(matches!(
        check_err("int a; { int a; }").internal(),
        ErrorImpl::DuplicateIdentifier { .. }
    ));
}

#[test]
fn test_duplicate_parameter() {
    assert_eq!(
        check_err("void f(int a, string a) { }").internal(),
        &ErrorImpl::DuplicateIdentifier {
            identifier: String::from("a")
        }
    );
}

#[test]
fn test_body_local_shadows_parameter() {
    // The body is a nested scope of the function scope
    let program = check_ok("void f(int a) { string a = \"x\"; }");
    assert_eq!(find_ident(&program, "a").unwrap().scope, ScopeType::Param);
}

#[test]
fn test_nested_block_local_shadows_outer_local() {
    let (_, checker) = check("void f() { int a; { string a; a = \"x\"; } a = 1; }").unwrap();
    let f = checker.scopes.lookup(checker.scopes.root(), "f").unwrap();
    assert_eq!(f.type_, TypeDesc::function(TypeDesc::VOID, vec![]));

    assert_eq!(
        check_err("void f() { int a; { string a; } a = \"x\"; }").internal(),
        &ErrorImpl::InconvertibleType {
            from: String::from("string"),
            to: String::from("int"),
            context: Some(String::from("assigned value")),
        }
    );
}

#[test]
fn test_slot_numbering() {
    let program = check_ok(
        "int g1;
         { int g2; }
         void f(int a, float b) {
             int x;
             { int y; }
         }
         int g3;",
    );

    let slot = |name: &str| {
        let ident = find_ident(&program, name).unwrap();
        (ident.scope, ident.index)
    };

    assert_eq!(slot("g1"), (ScopeType::Global, 0));
    assert_eq!(slot("g2"), (ScopeType::GlobalLocal, 1));
    assert_eq!(slot("a"), (ScopeType::Param, 0));
    assert_eq!(slot("b"), (ScopeType::Param, 1));
    assert_eq!(slot("x"), (ScopeType::Local, 0));
    assert_eq!(slot("y"), (ScopeType::Local, 1));
    // Functions take no slot
    assert_eq!(slot("g3"), (ScopeType::Global, 2));
}

#[test]
fn test_undeclared_identifier() {
    let error = check_err("x = 1;");
    assert_eq!(
        error.internal(),
        &ErrorImpl::UndeclaredIdentifier {
            identifier: String::from("x")
        }
    );
    assert_eq!(error.get_position(), Some(&Position::new(1, 1)));
}

#[test]
fn test_unknown_type_name() {
    assert_eq!(
        check_err("integer a;").internal(),
        &ErrorImpl::UndeclaredIdentifier {
            identifier: String::from("integer")
        }
    );
}

// Conversions

#[test]
fn test_assignment_widens_int_to_bool() {
    let program = check_ok("bool b = 1;");
    assert_converted(decl_value(&stmts(&program)[0]), TypeDesc::BOOL);
}

#[test]
fn test_assignment_widens_bool_to_string() {
    let program = check_ok("string s = true;");
    assert_converted(decl_value(&stmts(&program)[0]), TypeDesc::STR);
}

#[test]
fn test_assignment_same_type_is_untouched() {
    let program = check_ok("float f = 1.5;");
    let value = decl_value(&stmts(&program)[0]);

    assert!(matches!(value.kind, NodeKind::Literal(_)));
    assert_eq!(value.node_type, Some(TypeDesc::FLOAT));
}

#[test]
fn test_assignment_rejects_narrowing() {
    let error = check_err("int i = \"x\";");
    assert_eq!(
        error.internal(),
        &ErrorImpl::InconvertibleType {
            from: String::from("string"),
            to: String::from("int"),
            context: Some(String::from("assigned value")),
        }
    );
    assert_eq!(error.get_position(), Some(&Position::new(1, 7)));

    assert!(matches!(
        check_err("float f = 1.5; int i = f;").internal(),
        ErrorImpl::InconvertibleType { .. }
    ));
}

#[test]
fn test_lattice_is_not_transitive_for_assignments() {
    // bool -> string exists, but nothing widens into bool except int
    assert!(matches!(
        check_err("bool b = 1.5;").internal(),
        ErrorImpl::InconvertibleType { .. }
    ));
}

// Operators

#[test]
fn test_binary_widens_left_operand() {
    let program = check_ok("float x = 1 + 2.5;");
    let sum = decl_value(&stmts(&program)[0]);

    assert_eq!(sum.node_type, Some(TypeDesc::FLOAT));
    let NodeKind::BinOp(bin_op) = &sum.kind else {
        panic!("expected a binary operator");
    };
    assert_converted(&bin_op.arg1, TypeDesc::FLOAT);
    assert!(matches!(bin_op.arg2.kind, NodeKind::Literal(_)));
}

#[test]
fn test_binary_widens_right_operand() {
    let program = check_ok("string s = \"a\" + 1;");
    let sum = decl_value(&stmts(&program)[0]);

    let NodeKind::BinOp(bin_op) = &sum.kind else {
        panic!("expected a binary operator");
    };
    assert!(matches!(bin_op.arg1.kind, NodeKind::Literal(_)));
    assert_converted(&bin_op.arg2, TypeDesc::STR);
}

#[test]
fn test_relational_result_is_bool() {
    let program = check_ok("bool b = 1 < 2;");
    assert_eq!(decl_value(&stmts(&program)[0]).node_type, Some(TypeDesc::BOOL));
}

#[test]
fn test_binary_mismatch() {
    let error = check_err("int x = true + 1;");
    assert_eq!(
        error.internal(),
        &ErrorImpl::OperatorTypeMismatch {
            operator: String::from("+"),
            operands: String::from("bool, int"),
        }
    );
    assert_eq!(error.get_position(), Some(&Position::new(1, 14)));
}

#[test]
fn test_modulo_follows_arithmetic_rules() {
    check_ok("int a = 7 % 3; float b = 7.5 % 2;");
    assert!(matches!(
        check_err("string s = \"a\" % \"b\";").internal(),
        ErrorImpl::OperatorTypeMismatch { .. }
    ));
}

#[test]
fn test_compound_assignment() {
    let program = check_ok("float f; f += 1;");
    let NodeKind::CombEq(comb_eq) = &stmts(&program)[1].kind else {
        panic!("expected a compound assignment");
    };
    assert_converted(&comb_eq.arg2, TypeDesc::FLOAT);
    assert_eq!(stmts(&program)[1].node_type, Some(TypeDesc::FLOAT));

    assert_eq!(
        check_err("string s; s %= 1;").internal(),
        &ErrorImpl::OperatorTypeMismatch {
            operator: String::from("%="),
            operands: String::from("string, int"),
        }
    );
}

#[test]
fn test_unary_operators() {
    check_ok("int i; i++; --i; bool b = !true;");

    assert_eq!(
        check_err("bool b = !1;").internal(),
        &ErrorImpl::OperatorTypeMismatch {
            operator: String::from("!"),
            operands: String::from("int"),
        }
    );
    assert!(matches!(
        check_err("string s; s++;").internal(),
        ErrorImpl::OperatorTypeMismatch { .. }
    ));
}

#[test]
fn test_type_name_is_not_a_target() {
    let cases = [
        ("int = 3;", "int", Position::new(1, 1)),
        ("void f() { float += 1; }", "float", Position::new(1, 12)),
        ("bool++;", "bool", Position::new(1, 1)),
        ("--string;", "string", Position::new(1, 3)),
    ];

    for (source, name, position) in cases {
        let error = check_err(source);
        assert_eq!(
            error.internal(),
            &ErrorImpl::NotAVariable {
                identifier: String::from(name)
            },
            "{}",
            source
        );
        assert_eq!(error.get_position(), Some(&position), "{}", source);
    }
}

#[test]
fn test_ternary() {
    let program = check_ok("int x = 1 ? 2 : 3;");
    let ternary = decl_value(&stmts(&program)[0]);

    assert_eq!(ternary.node_type, Some(TypeDesc::INT));
    let NodeKind::Ternary(node) = &ternary.kind else {
        panic!("expected a ternary");
    };
    assert_converted(&node.cond, TypeDesc::BOOL);
}

#[test]
fn test_ternary_branch_mismatch() {
    assert_eq!(
        check_err("int x = true ? 1 : \"a\";").internal(),
        &ErrorImpl::BranchTypeMismatch {
            true_type: String::from("int"),
            false_type: String::from("string"),
        }
    );
    // Branches must match exactly, widening does not apply
    assert!(matches!(
        check_err("float x = true ? 1 : 2.5;").internal(),
        ErrorImpl::BranchTypeMismatch { .. }
    ));
}

// Calls

#[test]
fn test_call_converts_arguments() {
    let program = check_ok("print(1);");
    let NodeKind::Call(call) = &stmts(&program)[0].kind else {
        panic!("expected a call");
    };

    assert_converted(&call.params[0], TypeDesc::STR);
    assert_eq!(call.func.node_ident.as_ref().unwrap().name, "print");
    assert_eq!(stmts(&program)[0].node_type, Some(TypeDesc::VOID));
}

#[test]
fn test_call_argument_count_mismatch() {
    let error = check_err("int add(int a, int b) { return a + b; }\nadd(1);");
    assert_eq!(
        error.internal(),
        &ErrorImpl::ArgumentCountMismatch {
            function: String::from("add"),
            expected: 2,
            received: 1,
        }
    );
    assert_eq!(error.get_position(), Some(&Position::new(2, 1)));
}

#[test]
fn test_call_reports_every_argument_type() {
    assert_eq!(
        check_err("void f(int a, bool b) { } f(\"x\", 1);").internal(),
        &ErrorImpl::ArgumentTypeMismatch {
            function: String::from("f"),
            actual: String::from("string, int"),
            formal: String::from("int, bool"),
        }
    );
}

#[test]
fn test_call_on_variable() {
    assert_eq!(
        check_err("int a; a(1);").internal(),
        &ErrorImpl::NotAFunction {
            identifier: String::from("a")
        }
    );
}

#[test]
fn test_call_undeclared_function() {
    assert_eq!(
        check_err("foo();").internal(),
        &ErrorImpl::UndeclaredIdentifier {
            identifier: String::from("foo")
        }
    );
}

#[test]
fn test_call_before_declaration() {
    let error = check_err("void g() { h(); } void h() { }");
    assert_eq!(
        error.internal(),
        &ErrorImpl::UndeclaredIdentifier {
            identifier: String::from("h")
        }
    );
    assert_eq!(error.get_position(), Some(&Position::new(1, 12)));

    check_ok("void h() { } void g() { h(); }");
}

#[test]
fn test_recursive_call() {
    check_ok("int fact(int n) { return n <= 1 ? 1 : n * fact(n - 1); }");
}

// Functions and returns

#[test]
fn test_function_type() {
    let (_, checker) = check("float avg(int a, float b) { return a + b; }").unwrap();
    let avg = checker.scopes.lookup(checker.scopes.root(), "avg").unwrap();

    assert_eq!(
        avg.type_,
        TypeDesc::function(TypeDesc::FLOAT, vec![TypeDesc::INT, TypeDesc::FLOAT])
    );
    assert_eq!(avg.scope, ScopeType::Global);
}

#[test]
fn test_nested_function() {
    assert_eq!(
        check_err("void f() { void g() { } }").internal(),
        &ErrorImpl::NestedFunctionNotSupported {
            function: String::from("g")
        }
    );
}

#[test]
fn test_return_outside_function() {
    assert_eq!(check_err("return 1;").internal(), &ErrorImpl::ReturnOutsideFunction);
    assert_eq!(check_err("{ return; }").internal(), &ErrorImpl::ReturnOutsideFunction);
}

#[test]
fn test_return_type_mismatch() {
    assert_eq!(
        check_err("int f() { return \"x\"; }").internal(),
        &ErrorImpl::InconvertibleType {
            from: String::from("string"),
            to: String::from("int"),
            context: Some(String::from("returned value")),
        }
    );
}

#[test]
fn test_return_without_value() {
    check_ok("void f() { return; }");
    assert_eq!(
        check_err("int f() { return; }").internal(),
        &ErrorImpl::InconvertibleType {
            from: String::from("void"),
            to: String::from("int"),
            context: Some(String::from("returned value")),
        }
    );
}

#[test]
fn test_return_widens_value() {
    let program = check_ok("float f() { return 1; }");
    let NodeKind::FuncDecl(func) = &stmts(&program)[0].kind else {
        panic!("expected a function declaration");
    };
    let NodeKind::Return(return_node) = &stmts(&func.body)[0].kind else {
        panic!("expected a return");
    };

    assert_converted(return_node.arg.as_ref().unwrap(), TypeDesc::FLOAT);
}

// Statements

#[test]
fn test_condition_conversion() {
    let program = check_ok("if (1) { } while (0) { }");
    let NodeKind::If(if_node) = &stmts(&program)[0].kind else {
        panic!("expected an if");
    };
    assert_converted(&if_node.cond, TypeDesc::BOOL);

    assert_eq!(
        check_err("if (\"x\") { }").internal(),
        &ErrorImpl::InconvertibleType {
            from: String::from("string"),
            to: String::from("bool"),
            context: Some(String::from("condition")),
        }
    );
    assert!(matches!(
        check_err("do { } while (1.5);").internal(),
        ErrorImpl::InconvertibleType { .. }
    ));
}

#[test]
fn test_for_without_condition() {
    let program = check_ok("for (int i = 0; ; i++) { }");
    let NodeKind::For(for_node) = &stmts(&program)[0].kind else {
        panic!("expected a for loop");
    };

    let cond = for_node.cond.as_ref().unwrap();
    match &cond.kind {
        NodeKind::Literal(literal) => assert_eq!(literal.value, LiteralValue::Bool(true)),
        other => panic!("expected a synthesized literal, got {:?}", other),
    }
    assert_eq!(cond.node_type, Some(TypeDesc::BOOL));
}

#[test]
fn test_for_variable_is_scoped_to_loop() {
    check_ok("for (int i = 0; i < 3; i++) { } for (int i = 0; i < 3; i++) { }");
    check_ok("void f() { for (int i = 0; i < 3; i++) { int i = 5; } }");
    assert!(matches!(
        check_err("for (int i = 0; i < 3; i++) { } i = 1;").internal(),
        ErrorImpl::UndeclaredIdentifier { .. }
    ));
}

#[test]
fn test_try_requires_handler() {
    assert_eq!(check_err("try { }").internal(), &ErrorImpl::TryMissingHandler);
    check_ok("try { } finally { }");
}

#[test]
fn test_catch() {
    let program = check_ok("try { } catch (Exception e) { print(\"failed\"); }");
    let e = find_ident(&program, "e").unwrap();

    assert_eq!(e.type_, TypeDesc::EXCEPTION);
    assert_eq!(e.scope, ScopeType::GlobalLocal);

    assert_eq!(
        check_err("try { } catch (int e) { }").internal(),
        &ErrorImpl::CatchTypeMismatch {
            received: String::from("int")
        }
    );
}

#[test]
fn test_annotated_tree() {
    let program = check_ok("int add(int a, int b) { return a + b; }");

    assert_eq!(
        program.tree(),
        vec![
            "... : void",
            "└ int add() : int",
            "  ├ int : int, param, 0",
            "  │ └ a : int, param, 0",
            "  ├ int : int, param, 1",
            "  │ └ b : int, param, 1",
            "  └ ... : void",
            "    └ return : void",
            "      └ + : int",
            "        ├ a : int, param, 0",
            "        └ b : int, param, 1",
        ]
    );
}
