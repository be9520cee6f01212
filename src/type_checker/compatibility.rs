//! Operand-type tables for every operator.
//!
//! Each table maps the operand base types to the result type. A missing
//! entry means the operator does not apply to those operands as they are.

use lazy_static::lazy_static;
use std::collections::HashMap;

use crate::ast::{
    expressions::{BinOp, CombEqOp, UnarOp},
    types::BaseType::{self, Bool, Exception, Float, Int, Str},
};

type BinaryTable = HashMap<(BaseType, BaseType), BaseType>;

fn arithmetic() -> BinaryTable {
    HashMap::from([((Int, Int), Int), ((Float, Float), Float)])
}

fn addition() -> BinaryTable {
    let mut table = arithmetic();
    table.insert((Str, Str), Str);
    table
}

fn ordering() -> BinaryTable {
    HashMap::from([
        ((Int, Int), Bool),
        ((Float, Float), Bool),
        ((Str, Str), Bool),
    ])
}

fn equality() -> BinaryTable {
    let mut table = ordering();
    table.insert((Bool, Bool), Bool);
    table
}

lazy_static! {
    pub static ref BIN_OP_TYPE_COMPATIBILITY: HashMap<BinOp, BinaryTable> = {
        let mut map = HashMap::new();
        map.insert(BinOp::Add, addition());
        map.insert(BinOp::Sub, arithmetic());
        map.insert(BinOp::Mul, arithmetic());
        map.insert(BinOp::Div, arithmetic());
        map.insert(BinOp::Mod, arithmetic());
        map.insert(BinOp::Gt, ordering());
        map.insert(BinOp::Lt, ordering());
        map.insert(BinOp::Ge, ordering());
        map.insert(BinOp::Le, ordering());
        map.insert(BinOp::Equals, equality());
        map.insert(BinOp::NEquals, equality());
        map.insert(BinOp::BitAnd, HashMap::from([((Int, Int), Int)]));
        map.insert(BinOp::BitOr, HashMap::from([((Int, Int), Int)]));
        map.insert(BinOp::LogicalAnd, HashMap::from([((Bool, Bool), Bool)]));
        map.insert(BinOp::LogicalOr, HashMap::from([((Bool, Bool), Bool)]));
        map
    };

    pub static ref COMB_EQ_OP_TYPE_COMPATIBILITY: HashMap<CombEqOp, BinaryTable> = {
        let mut map = HashMap::new();
        map.insert(CombEqOp::AddEq, addition());
        map.insert(CombEqOp::SubEq, arithmetic());
        map.insert(CombEqOp::MulEq, arithmetic());
        map.insert(CombEqOp::DivEq, arithmetic());
        map.insert(CombEqOp::ModEq, arithmetic());
        map
    };

    pub static ref UNAR_OP_TYPE_COMPATIBILITY: HashMap<UnarOp, HashMap<BaseType, BaseType>> = {
        let mut map = HashMap::new();
        map.insert(UnarOp::Inc, HashMap::from([(Int, Int), (Float, Float)]));
        map.insert(UnarOp::Dec, HashMap::from([(Int, Int), (Float, Float)]));
        map.insert(UnarOp::Not, HashMap::from([(Bool, Bool)]));
        map.insert(
            UnarOp::Return,
            HashMap::from([
                (Int, Int),
                (Float, Float),
                (Bool, Bool),
                (Str, Str),
                (Exception, Exception),
            ]),
        );
        map
    };
}

/// Operators whose operand pairs are looked up in a binary table.
pub trait BinaryOperator: Copy + std::fmt::Display {
    fn table(self) -> &'static BinaryTable;

    /// Whether the left operand is written to.
    fn assigns(self) -> bool {
        false
    }

    fn result_type(self, left: BaseType, right: BaseType) -> Option<BaseType> {
        self.table().get(&(left, right)).copied()
    }
}

impl BinaryOperator for BinOp {
    fn table(self) -> &'static BinaryTable {
        &BIN_OP_TYPE_COMPATIBILITY[&self]
    }
}

impl BinaryOperator for CombEqOp {
    fn table(self) -> &'static BinaryTable {
        &COMB_EQ_OP_TYPE_COMPATIBILITY[&self]
    }

    fn assigns(self) -> bool {
        true
    }
}

pub fn unar_op_result(op: UnarOp, arg: BaseType) -> Option<BaseType> {
    UNAR_OP_TYPE_COMPATIBILITY
        .get(&op)
        .and_then(|table| table.get(&arg))
        .copied()
}
