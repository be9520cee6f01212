//! Type descriptors and the implicit conversion lattice.
//!
//! A type is either one of the primitive base types or a function
//! signature (return type plus ordered parameter types). Primitive
//! descriptors are plain values, so the associated constants on
//! [`TypeDesc`] are the one canonical descriptor per base kind and
//! equality is structural.
//!
//! The lattice is a fixed set of direct edges between primitive types:
//!
//! ```text
//! int    -> float, bool, string
//! float  -> string
//! bool   -> string
//! string -> (none)
//! ```
//!
//! It is never closed transitively.

use std::fmt::Display;

use crate::errors::errors::{Error, ErrorImpl};

/// Primitive data types of the language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BaseType {
    Void,
    Int,
    Float,
    Bool,
    Str,
    Exception,
}

impl BaseType {
    pub const ALL: [BaseType; 6] = [
        BaseType::Void,
        BaseType::Int,
        BaseType::Float,
        BaseType::Bool,
        BaseType::Str,
        BaseType::Exception,
    ];

    /// The keyword naming this type in source code.
    pub fn keyword(self) -> &'static str {
        match self {
            BaseType::Void => "void",
            BaseType::Int => "int",
            BaseType::Float => "float",
            BaseType::Bool => "bool",
            BaseType::Str => "string",
            BaseType::Exception => "Exception",
        }
    }

    pub fn from_keyword(keyword: &str) -> Option<BaseType> {
        BaseType::ALL
            .into_iter()
            .find(|base_type| base_type.keyword() == keyword)
    }

    /// Direct lattice edges out of this type, in the order widening is tried.
    pub fn convertible_to(self) -> &'static [BaseType] {
        match self {
            BaseType::Int => &[BaseType::Float, BaseType::Bool, BaseType::Str],
            BaseType::Float => &[BaseType::Str],
            BaseType::Bool => &[BaseType::Str],
            BaseType::Void | BaseType::Str | BaseType::Exception => &[],
        }
    }
}

impl Display for BaseType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.keyword())
    }
}

/// Resolved data type of an expression or declaration.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeDesc {
    Simple(BaseType),
    Function {
        return_type: Box<TypeDesc>,
        params: Vec<TypeDesc>,
    },
}

impl TypeDesc {
    pub const VOID: TypeDesc = TypeDesc::Simple(BaseType::Void);
    pub const INT: TypeDesc = TypeDesc::Simple(BaseType::Int);
    pub const FLOAT: TypeDesc = TypeDesc::Simple(BaseType::Float);
    pub const BOOL: TypeDesc = TypeDesc::Simple(BaseType::Bool);
    pub const STR: TypeDesc = TypeDesc::Simple(BaseType::Str);
    pub const EXCEPTION: TypeDesc = TypeDesc::Simple(BaseType::Exception);

    pub fn function(return_type: TypeDesc, params: Vec<TypeDesc>) -> Self {
        TypeDesc::Function {
            return_type: Box::new(return_type),
            params,
        }
    }

    /// Resolves a type keyword. Anything that is not a primitive type name
    /// is reported as an undeclared identifier.
    pub fn from_str(name: &str) -> Result<Self, Error> {
        BaseType::from_keyword(name)
            .map(TypeDesc::Simple)
            .ok_or_else(|| {
                Error::new(
                    ErrorImpl::UndeclaredIdentifier {
                        identifier: name.to_string(),
                    },
                    None,
                )
            })
    }

    pub fn is_func(&self) -> bool {
        matches!(self, TypeDesc::Function { .. })
    }

    pub fn is_simple(&self) -> bool {
        !self.is_func()
    }

    pub fn base_type(&self) -> Option<BaseType> {
        match self {
            TypeDesc::Simple(base_type) => Some(*base_type),
            TypeDesc::Function { .. } => None,
        }
    }

    pub fn return_type(&self) -> Option<&TypeDesc> {
        match self {
            TypeDesc::Function { return_type, .. } => Some(return_type),
            TypeDesc::Simple(_) => None,
        }
    }

    pub fn params(&self) -> Option<&[TypeDesc]> {
        match self {
            TypeDesc::Function { params, .. } => Some(params),
            TypeDesc::Simple(_) => None,
        }
    }
}

impl From<BaseType> for TypeDesc {
    fn from(base_type: BaseType) -> Self {
        TypeDesc::Simple(base_type)
    }
}

impl Display for TypeDesc {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TypeDesc::Simple(base_type) => write!(f, "{}", base_type),
            TypeDesc::Function { return_type, params } => {
                write!(f, "{} ({})", return_type, join_types(params))
            }
        }
    }
}

/// Comma-separated rendering of a type list, as used in call diagnostics.
pub fn join_types<'a>(types: impl IntoIterator<Item = &'a TypeDesc>) -> String {
    types
        .into_iter()
        .map(|ty| ty.to_string())
        .collect::<Vec<String>>()
        .join(", ")
}

/// True iff both types are primitive and the lattice has a direct edge `from -> to`.
pub fn is_convertible(from: &TypeDesc, to: &TypeDesc) -> bool {
    match (from.base_type(), to.base_type()) {
        (Some(from), Some(to)) => from.convertible_to().contains(&to),
        _ => false,
    }
}
