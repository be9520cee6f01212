use crate::{
    ast::{
        ast::{AstNode, NodeKind},
        expressions::AssignNode,
        statements::{
            CatchNode, ForNode, FuncDeclNode, FuncParamNode, IfNode, ReturnNode, StmtListNode,
            TryNode, VarsDeclNode, WhileNode,
        },
    },
    errors::errors::Error,
    lexer::tokens::TokenKind,
    parser::{
        expr::{parse_expr, parse_expr_list},
        lookups::BindingPower,
    },
};

use super::parser::Parser;

pub fn parse_stmt(parser: &mut Parser) -> Result<AstNode, Error> {
    if let Some(stmt_fn) = parser
        .get_stmt_lookup()
        .get(&parser.current_token_kind())
        .copied()
    {
        return stmt_fn(parser);
    }

    if is_declaration(parser) {
        return parse_declaration(parser);
    }

    let expr = parse_expr(parser, BindingPower::Default)?;

    parser.expect(TokenKind::Semicolon)?;

    Ok(expr)
}

/// `type name ...` starts a declaration; type names are plain identifiers.
fn is_declaration(parser: &Parser) -> bool {
    parser.current_token_kind() == TokenKind::Identifier
        && parser.peek(1).kind == TokenKind::Identifier
}

fn parse_declaration(parser: &mut Parser) -> Result<AstNode, Error> {
    if parser.peek(2).kind == TokenKind::OpenParen {
        return parse_func_decl_stmt(parser);
    }

    let decl = parse_vars_decl(parser)?;
    parser.expect(TokenKind::Semicolon)?;

    Ok(decl)
}

fn parse_ident(parser: &mut Parser, message: &str) -> Result<AstNode, Error> {
    let error = parser.unexpected(message);
    let token = parser.expect_error(TokenKind::Identifier, Some(error))?;

    Ok(AstNode::ident(token.value, token.span.start))
}

/// `int a, b = 1, c` without the trailing semicolon.
pub fn parse_vars_decl(parser: &mut Parser) -> Result<AstNode, Error> {
    let type_ = parse_ident(parser, "expected a type name")?;

    let mut vars = vec![];
    loop {
        let var = parse_ident(parser, "expected identifier during variable declaration")?;

        if parser.current_token_kind() == TokenKind::Assignment {
            let position = parser.advance().span.start;
            let val = parse_expr(parser, BindingPower::Comma)?;
            vars.push(AstNode::new(
                NodeKind::Assign(AssignNode {
                    var: Box::new(var),
                    val: Box::new(val),
                }),
                position,
            ));
        } else {
            vars.push(var);
        }

        if parser.current_token_kind() != TokenKind::Comma {
            break;
        }
        parser.advance();
    }

    let position = type_.position;
    Ok(AstNode::new(
        NodeKind::VarsDecl(VarsDeclNode {
            type_: Box::new(type_),
            vars,
        }),
        position,
    ))
}

pub fn parse_func_decl_stmt(parser: &mut Parser) -> Result<AstNode, Error> {
    let return_type = parse_ident(parser, "expected a return type")?;
    let name = parse_ident(parser, "expected a function name")?;

    parser.expect(TokenKind::OpenParen)?;

    let mut params = Vec::new();
    while parser.current_token_kind() != TokenKind::CloseParen {
        let type_ = parse_ident(parser, "expected a parameter type")?;
        let param_name = parse_ident(parser, "expected a parameter name")?;

        let position = type_.position;
        params.push(AstNode::new(
            NodeKind::FuncParam(FuncParamNode {
                type_: Box::new(type_),
                name: Box::new(param_name),
            }),
            position,
        ));

        if parser.current_token_kind() != TokenKind::CloseParen {
            parser.expect(TokenKind::Comma)?;
        }
    }

    parser.expect(TokenKind::CloseParen)?;

    if parser.current_token_kind() != TokenKind::OpenCurly {
        return Err(parser.unexpected("expected a function body"));
    }
    let body = parse_block_stmt(parser)?;

    let position = name.position;
    Ok(AstNode::new(
        NodeKind::FuncDecl(FuncDeclNode {
            return_type: Box::new(return_type),
            name: Box::new(name),
            params,
            body: Box::new(body),
        }),
        position,
    ))
}

pub fn parse_block_stmt(parser: &mut Parser) -> Result<AstNode, Error> {
    let start = parser.expect(TokenKind::OpenCurly)?.span.start;

    let mut exprs = Vec::new();
    while parser.current_token_kind() != TokenKind::CloseCurly {
        if !parser.has_tokens() {
            return Err(parser.unexpected("expected `}` to close the block"));
        }
        exprs.push(parse_stmt(parser)?);
    }

    parser.expect(TokenKind::CloseCurly)?;

    Ok(AstNode::new(
        NodeKind::StmtList(StmtListNode {
            exprs,
            program: false,
        }),
        start,
    ))
}

pub fn parse_empty_stmt(parser: &mut Parser) -> Result<AstNode, Error> {
    let start = parser.advance().span.start;
    Ok(AstNode::empty(start))
}

/// `( expr )` as used by `if`, `while` and `do ... while`.
fn parse_condition(parser: &mut Parser) -> Result<AstNode, Error> {
    parser.expect(TokenKind::OpenParen)?;
    let cond = parse_expr(parser, BindingPower::Default)?;
    parser.expect(TokenKind::CloseParen)?;

    Ok(cond)
}

pub fn parse_if_stmt(parser: &mut Parser) -> Result<AstNode, Error> {
    let start = parser.advance().span.start;

    let cond = parse_condition(parser)?;
    let then_stmt = parse_stmt(parser)?;

    let else_stmt = if parser.current_token_kind() == TokenKind::Else {
        parser.advance();
        Some(Box::new(parse_stmt(parser)?))
    } else {
        None
    };

    Ok(AstNode::new(
        NodeKind::If(IfNode {
            cond: Box::new(cond),
            then_stmt: Box::new(then_stmt),
            else_stmt,
        }),
        start,
    ))
}

pub fn parse_while_stmt(parser: &mut Parser) -> Result<AstNode, Error> {
    let start = parser.advance().span.start;

    let cond = parse_condition(parser)?;
    let body = parse_stmt(parser)?;

    Ok(AstNode::new(
        NodeKind::While(WhileNode {
            cond: Box::new(cond),
            body: Box::new(body),
        }),
        start,
    ))
}

pub fn parse_do_while_stmt(parser: &mut Parser) -> Result<AstNode, Error> {
    let start = parser.advance().span.start;

    let body = parse_stmt(parser)?;
    parser.expect(TokenKind::While)?;
    let cond = parse_condition(parser)?;
    parser.expect(TokenKind::Semicolon)?;

    Ok(AstNode::new(
        NodeKind::DoWhile(WhileNode {
            cond: Box::new(cond),
            body: Box::new(body),
        }),
        start,
    ))
}

pub fn parse_for_stmt(parser: &mut Parser) -> Result<AstNode, Error> {
    let start = parser.advance().span.start;
    parser.expect(TokenKind::OpenParen)?;

    let init = if is_declaration(parser) {
        Some(parse_vars_decl(parser)?)
    } else {
        parse_expr_list(parser, TokenKind::Semicolon)?
    };
    parser.expect(TokenKind::Semicolon)?;

    let cond = if parser.current_token_kind() != TokenKind::Semicolon {
        Some(parse_expr(parser, BindingPower::Default)?)
    } else {
        None
    };
    parser.expect(TokenKind::Semicolon)?;

    let step = parse_expr_list(parser, TokenKind::CloseParen)?;
    parser.expect(TokenKind::CloseParen)?;

    let body = parse_stmt(parser)?;

    Ok(AstNode::new(
        NodeKind::For(ForNode {
            init: init.map(Box::new),
            cond: cond.map(Box::new),
            step: step.map(Box::new),
            body: Box::new(body),
        }),
        start,
    ))
}

pub fn parse_return_stmt(parser: &mut Parser) -> Result<AstNode, Error> {
    let start = parser.advance().span.start;

    let arg = if parser.current_token_kind() != TokenKind::Semicolon {
        Some(Box::new(parse_expr(parser, BindingPower::Default)?))
    } else {
        None
    };

    parser.expect(TokenKind::Semicolon)?;

    Ok(AstNode::new(NodeKind::Return(ReturnNode { arg }), start))
}

/// `try { } [catch (Exception e) { }] [finally { }]`
///
/// A `try` with neither handler parses; the checker rejects it.
pub fn parse_try_stmt(parser: &mut Parser) -> Result<AstNode, Error> {
    let start = parser.advance().span.start;

    let try_block = parse_block_stmt(parser)?;

    let catch_clause = if parser.current_token_kind() == TokenKind::Catch {
        let catch_start = parser.advance().span.start;

        parser.expect(TokenKind::OpenParen)?;
        let exception_type = parse_ident(parser, "expected an exception type")?;
        let exception_var = parse_ident(parser, "expected an exception variable")?;
        parser.expect(TokenKind::CloseParen)?;

        let block = parse_block_stmt(parser)?;

        Some(Box::new(AstNode::new(
            NodeKind::Catch(CatchNode {
                exception_type: Box::new(exception_type),
                exception_var: Box::new(exception_var),
                block: Box::new(block),
            }),
            catch_start,
        )))
    } else {
        None
    };

    let finally_block = if parser.current_token_kind() == TokenKind::Finally {
        parser.advance();
        Some(Box::new(parse_block_stmt(parser)?))
    } else {
        None
    };

    Ok(AstNode::new(
        NodeKind::Try(TryNode {
            try_block: Box::new(try_block),
            catch_clause,
            finally_block,
        }),
        start,
    ))
}
