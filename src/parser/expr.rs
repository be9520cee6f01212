use crate::{
    ast::{
        ast::{AstNode, NodeKind},
        expressions::{
            AssignNode, BinOp, BinOpNode, CallNode, CombEqNode, CombEqOp, LiteralNode,
            LiteralValue, TernaryNode, UnarOp, UnarOpNode,
        },
        statements::StmtListNode,
    },
    errors::errors::{Error, ErrorImpl},
    lexer::tokens::{Token, TokenKind},
};

use super::{lookups::BindingPower, parser::Parser};

pub fn parse_expr(parser: &mut Parser, bp: BindingPower) -> Result<AstNode, Error> {
    // First parse NUD
    let token_kind = parser.current_token_kind();
    let Some(nud_fn) = parser.get_nud_lookup().get(&token_kind).copied() else {
        return Err(Error::new(
            ErrorImpl::UnexpectedToken {
                token: parser.current_token().value.clone(),
            },
            Some(parser.get_position()),
        ));
    };

    let mut left = nud_fn(parser)?;

    // While LED and current BP is less than BP of current token, continue parsing lhs
    while parser.current_bp() > bp {
        let token_kind = parser.current_token_kind();
        let Some(led_fn) = parser.get_led_lookup().get(&token_kind).copied() else {
            return Err(Error::new(
                ErrorImpl::UnexpectedToken {
                    token: parser.current_token().value.clone(),
                },
                Some(parser.get_position()),
            ));
        };

        let led_bp = parser.current_bp();
        left = led_fn(parser, left, led_bp)?;
    }

    Ok(left)
}

fn number_literal(token: &Token) -> Result<LiteralValue, Error> {
    let error = || {
        Error::new(
            ErrorImpl::NumberParseError {
                token: token.value.clone(),
            },
            Some(token.span.start),
        )
    };

    if token.value.contains('.') {
        token.value.parse().map(LiteralValue::Float).map_err(|_| error())
    } else {
        token.value.parse().map(LiteralValue::Int).map_err(|_| error())
    }
}

pub fn parse_primary_expr(parser: &mut Parser) -> Result<AstNode, Error> {
    let token = parser.current_token().clone();

    let literal = match token.kind {
        TokenKind::Number => LiteralNode {
            literal: token.value.clone(),
            value: number_literal(&token)?,
        },
        TokenKind::String => LiteralNode {
            literal: format!("{:?}", token.value),
            value: LiteralValue::Str(token.value.clone()),
        },
        TokenKind::True => LiteralNode::bool(true),
        TokenKind::False => LiteralNode::bool(false),
        TokenKind::Identifier => {
            parser.advance();
            return Ok(AstNode::ident(token.value, token.span.start));
        }
        _ => {
            return Err(Error::new(
                ErrorImpl::UnexpectedToken { token: token.value },
                Some(token.span.start),
            ))
        }
    };

    parser.advance();
    Ok(AstNode::new(NodeKind::Literal(literal), token.span.start))
}

fn bin_op(kind: TokenKind) -> Option<BinOp> {
    match kind {
        TokenKind::Plus => Some(BinOp::Add),
        TokenKind::Dash => Some(BinOp::Sub),
        TokenKind::Star => Some(BinOp::Mul),
        TokenKind::Slash => Some(BinOp::Div),
        TokenKind::Percent => Some(BinOp::Mod),
        TokenKind::GreaterEquals => Some(BinOp::Ge),
        TokenKind::LessEquals => Some(BinOp::Le),
        TokenKind::NotEquals => Some(BinOp::NEquals),
        TokenKind::Equals => Some(BinOp::Equals),
        TokenKind::Greater => Some(BinOp::Gt),
        TokenKind::Less => Some(BinOp::Lt),
        TokenKind::BitAnd => Some(BinOp::BitAnd),
        TokenKind::BitOr => Some(BinOp::BitOr),
        TokenKind::And => Some(BinOp::LogicalAnd),
        TokenKind::Or => Some(BinOp::LogicalOr),
        _ => None,
    }
}

fn comb_eq_op(kind: TokenKind) -> Option<CombEqOp> {
    match kind {
        TokenKind::PlusEquals => Some(CombEqOp::AddEq),
        TokenKind::MinusEquals => Some(CombEqOp::SubEq),
        TokenKind::StarEquals => Some(CombEqOp::MulEq),
        TokenKind::SlashEquals => Some(CombEqOp::DivEq),
        TokenKind::PercentEquals => Some(CombEqOp::ModEq),
        _ => None,
    }
}

fn unar_op(kind: TokenKind) -> Option<UnarOp> {
    match kind {
        TokenKind::PlusPlus => Some(UnarOp::Inc),
        TokenKind::MinusMinus => Some(UnarOp::Dec),
        TokenKind::Not => Some(UnarOp::Not),
        _ => None,
    }
}

fn unexpected_operator(token: &Token) -> Error {
    Error::new(
        ErrorImpl::UnexpectedToken {
            token: token.value.clone(),
        },
        Some(token.span.start),
    )
}

/// Targets of `=`, `op=`, `++` and `--` are plain identifiers.
fn expect_target(target: &AstNode) -> Result<(), Error> {
    if target.ident_name().is_some() {
        return Ok(());
    }

    Err(Error::new(
        ErrorImpl::UnexpectedTokenDetailed {
            token: target.label(),
            message: String::from("expected an identifier"),
        },
        Some(target.position),
    ))
}

pub fn parse_binary_expr(parser: &mut Parser, left: AstNode, bp: BindingPower) -> Result<AstNode, Error> {
    let operator_token = parser.advance().clone();
    let op = bin_op(operator_token.kind).ok_or_else(|| unexpected_operator(&operator_token))?;

    let right = parse_expr(parser, bp)?;

    Ok(AstNode::new(
        NodeKind::BinOp(BinOpNode {
            op,
            arg1: Box::new(left),
            arg2: Box::new(right),
        }),
        operator_token.span.start,
    ))
}

pub fn parse_prefix_expr(parser: &mut Parser) -> Result<AstNode, Error> {
    let operator_token = parser.advance().clone();
    let op = unar_op(operator_token.kind).ok_or_else(|| unexpected_operator(&operator_token))?;

    let arg = parse_expr(parser, BindingPower::Unary)?;
    if op != UnarOp::Not {
        expect_target(&arg)?;
    }

    Ok(AstNode::new(
        NodeKind::UnarOp(UnarOpNode {
            op,
            arg: Box::new(arg),
            postfix: false,
        }),
        operator_token.span.start,
    ))
}

pub fn parse_postfix_expr(parser: &mut Parser, left: AstNode, _bp: BindingPower) -> Result<AstNode, Error> {
    expect_target(&left)?;
    let operator_token = parser.advance().clone();
    let op = unar_op(operator_token.kind).ok_or_else(|| unexpected_operator(&operator_token))?;

    Ok(AstNode::new(
        NodeKind::UnarOp(UnarOpNode {
            op,
            arg: Box::new(left),
            postfix: true,
        }),
        operator_token.span.start,
    ))
}

/// Right-associative: `a = b = c` assigns `c` to `b` first.
pub fn parse_assignment_expr(parser: &mut Parser, left: AstNode, _bp: BindingPower) -> Result<AstNode, Error> {
    expect_target(&left)?;
    let operator_token = parser.advance().clone();
    let rhs = parse_expr(parser, BindingPower::Comma)?;

    Ok(AstNode::new(
        NodeKind::Assign(AssignNode {
            var: Box::new(left),
            val: Box::new(rhs),
        }),
        operator_token.span.start,
    ))
}

pub fn parse_comb_eq_expr(parser: &mut Parser, left: AstNode, _bp: BindingPower) -> Result<AstNode, Error> {
    expect_target(&left)?;
    let operator_token = parser.advance().clone();
    let op = comb_eq_op(operator_token.kind).ok_or_else(|| unexpected_operator(&operator_token))?;
    let rhs = parse_expr(parser, BindingPower::Comma)?;

    Ok(AstNode::new(
        NodeKind::CombEq(CombEqNode {
            op,
            arg1: Box::new(left),
            arg2: Box::new(rhs),
        }),
        operator_token.span.start,
    ))
}

pub fn parse_ternary_expr(parser: &mut Parser, cond: AstNode, _bp: BindingPower) -> Result<AstNode, Error> {
    let position = parser.advance().span.start;

    let true_expr = parse_expr(parser, BindingPower::Comma)?;
    parser.expect(TokenKind::Colon)?;
    let false_expr = parse_expr(parser, BindingPower::Assignment)?;

    Ok(AstNode::new(
        NodeKind::Ternary(TernaryNode {
            cond: Box::new(cond),
            true_expr: Box::new(true_expr),
            false_expr: Box::new(false_expr),
        }),
        position,
    ))
}

pub fn parse_grouping_expr(parser: &mut Parser) -> Result<AstNode, Error> {
    parser.advance();
    let expr = parse_expr(parser, BindingPower::Default)?;
    parser.expect(TokenKind::CloseParen)?;

    Ok(expr)
}

pub fn parse_call_expr(parser: &mut Parser, left: AstNode, _bp: BindingPower) -> Result<AstNode, Error> {
    if left.ident_name().is_none() {
        return Err(parser.unexpected("only named functions can be called"));
    }
    parser.advance();

    let mut params = vec![];

    while parser.current_token_kind() != TokenKind::CloseParen {
        params.push(parse_expr(parser, BindingPower::Comma)?);

        if parser.current_token_kind() != TokenKind::CloseParen {
            parser.expect(TokenKind::Comma)?;
        }
    }

    parser.expect(TokenKind::CloseParen)?;

    let position = left.position;
    Ok(AstNode::new(
        NodeKind::Call(CallNode {
            func: Box::new(left),
            params,
        }),
        position,
    ))
}

/// Comma-separated expressions up to (not including) `end`.
///
/// Used for `for` headers: a single expression stands alone, several are
/// grouped in a statement list.
pub fn parse_expr_list(parser: &mut Parser, end: TokenKind) -> Result<Option<AstNode>, Error> {
    let position = parser.get_position();
    let mut exprs = vec![];

    while parser.current_token_kind() != end {
        exprs.push(parse_expr(parser, BindingPower::Comma)?);

        if parser.current_token_kind() != end {
            parser.expect(TokenKind::Comma)?;
        }
    }

    Ok(match exprs.len() {
        0 => None,
        1 => exprs.pop(),
        _ => Some(AstNode::new(
            NodeKind::StmtList(StmtListNode {
                exprs,
                program: false,
            }),
            position,
        )),
    })
}
