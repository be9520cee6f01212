//! Symbol descriptors and the lexical scope tree.
//!
//! Scopes live in an arena owned by [`ScopeTree`] and point at their parent
//! by index. The root scope has no parent. A scope that is a function body
//! carries a [`FunctionMark`]; storage slots are numbered per nearest
//! function scope, or per root scope outside any function.

use std::{collections::HashMap, fmt::Display};

use log::debug;

use crate::{
    ast::types::TypeDesc,
    errors::errors::{Error, ErrorImpl},
};

/// Where a symbol lives, as seen by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScopeType {
    Global,
    /// Declared outside any function but in a nested (non-root) scope
    GlobalLocal,
    Param,
    Local,
}

impl Display for ScopeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScopeType::Global => write!(f, "global"),
            ScopeType::GlobalLocal => write!(f, "global.local"),
            ScopeType::Param => write!(f, "param"),
            ScopeType::Local => write!(f, "local"),
        }
    }
}

/// A declared name's resolved identity.
#[derive(Debug, Clone, PartialEq)]
pub struct IdentDesc {
    pub name: String,
    pub type_: TypeDesc,
    pub scope: ScopeType,
    /// Storage slot, numbered separately for parameters and other variables
    pub index: usize,
    pub built_in: bool,
}

impl IdentDesc {
    pub fn new(name: impl Into<String>, type_: TypeDesc) -> Self {
        IdentDesc {
            name: name.into(),
            type_,
            scope: ScopeType::Global,
            index: 0,
            built_in: false,
        }
    }

    pub fn param(name: impl Into<String>, type_: TypeDesc) -> Self {
        IdentDesc {
            scope: ScopeType::Param,
            ..IdentDesc::new(name, type_)
        }
    }
}

impl Display for IdentDesc {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.built_in {
            write!(f, "{}, {}, built-in", self.type_, self.scope)
        } else {
            write!(f, "{}, {}, {}", self.type_, self.scope, self.index)
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScopeId(usize);

/// Marks a scope as a function body. The symbol is filled in once the
/// parameters have been declared and the signature is known.
#[derive(Debug, Clone, PartialEq)]
pub enum FunctionMark {
    Pending,
    Declared(IdentDesc),
}

#[derive(Debug, Default)]
struct Scope {
    idents: HashMap<String, IdentDesc>,
    func: Option<FunctionMark>,
    parent: Option<ScopeId>,
    var_index: usize,
    param_index: usize,
}

/// Arena of scopes forming a tree rooted at [`ScopeTree::root`].
#[derive(Debug)]
pub struct ScopeTree {
    scopes: Vec<Scope>,
}

impl Default for ScopeTree {
    fn default() -> Self {
        Self::new()
    }
}

impl ScopeTree {
    pub fn new() -> Self {
        ScopeTree {
            scopes: vec![Scope::default()],
        }
    }

    /// The scope created with the tree. It has no parent.
    pub fn root(&self) -> ScopeId {
        ScopeId(0)
    }

    pub fn new_child(&mut self, parent: ScopeId) -> ScopeId {
        let id = ScopeId(self.scopes.len());
        self.scopes.push(Scope {
            parent: Some(parent),
            ..Scope::default()
        });
        debug!("opened scope {:?} under {:?}", id, parent);
        id
    }

    /// Opens a child scope marked as a (not yet declared) function body.
    pub fn new_function_scope(&mut self, parent: ScopeId) -> ScopeId {
        let id = self.new_child(parent);
        self.scopes[id.0].func = Some(FunctionMark::Pending);
        id
    }

    pub fn set_function(&mut self, scope: ScopeId, func: IdentDesc) {
        self.scopes[scope.0].func = Some(FunctionMark::Declared(func));
    }

    /// The symbol of the function whose body `scope` is, once declared.
    pub fn function_of(&self, scope: ScopeId) -> Option<&IdentDesc> {
        match &self.scopes[scope.0].func {
            Some(FunctionMark::Declared(func)) => Some(func),
            _ => None,
        }
    }

    pub fn parent(&self, scope: ScopeId) -> Option<ScopeId> {
        self.scopes[scope.0].parent
    }

    /// Ancestor without a parent.
    pub fn root_scope(&self, scope: ScopeId) -> ScopeId {
        let mut current = scope;
        while let Some(parent) = self.parent(current) {
            current = parent;
        }
        current
    }

    /// `scope` itself or the closest ancestor marked as a function body.
    pub fn nearest_function_scope(&self, scope: ScopeId) -> Option<ScopeId> {
        let mut current = Some(scope);
        while let Some(id) = current {
            if self.scopes[id.0].func.is_some() {
                return Some(id);
            }
            current = self.parent(id);
        }
        None
    }

    /// Innermost visible symbol named `name`.
    pub fn lookup(&self, scope: ScopeId, name: &str) -> Option<&IdentDesc> {
        let mut current = Some(scope);
        while let Some(id) = current {
            if let Some(ident) = self.scopes[id.0].idents.get(name) {
                return Some(ident);
            }
            current = self.parent(id);
        }
        None
    }

    /// Symbol declared directly in `scope`.
    pub fn lookup_local(&self, scope: ScopeId, name: &str) -> Option<&IdentDesc> {
        self.scopes[scope.0].idents.get(name)
    }

    /// Declares `ident` in `scope`.
    ///
    /// The scope kind is inferred from context unless it is already
    /// [`ScopeType::Param`]. Non-function symbols get the next slot from the
    /// nearest function scope (or the root scope). A parameter conflicts with
    /// a parameter of the same name, a local with anything but a global in
    /// the same scope, and a global or global-local with any visible symbol.
    pub fn declare(&mut self, scope: ScopeId, mut ident: IdentDesc) -> Result<IdentDesc, Error> {
        let func_scope = self.nearest_function_scope(scope);
        let global_scope = self.root_scope(scope);

        if ident.scope != ScopeType::Param {
            ident.scope = if func_scope.is_some() {
                ScopeType::Local
            } else if scope == global_scope {
                ScopeType::Global
            } else {
                ScopeType::GlobalLocal
            };
        }

        let existing = match ident.scope {
            ScopeType::Param | ScopeType::Local => self.lookup_local(scope, &ident.name),
            // Outside functions every ancestor is a global scope as well
            ScopeType::Global | ScopeType::GlobalLocal => self.lookup(scope, &ident.name),
        };

        if let Some(existing) = existing {
            let conflict = match ident.scope {
                ScopeType::Param => existing.scope == ScopeType::Param,
                ScopeType::Local => {
                    !matches!(existing.scope, ScopeType::Global | ScopeType::GlobalLocal)
                }
                ScopeType::Global | ScopeType::GlobalLocal => true,
            };
            if conflict {
                return Err(Error::new(
                    ErrorImpl::DuplicateIdentifier {
                        identifier: ident.name.clone(),
                    },
                    None,
                ));
            }
        }

        if !ident.type_.is_func() {
            let owner = &mut self.scopes[func_scope.unwrap_or(global_scope).0];
            if ident.scope == ScopeType::Param {
                ident.index = owner.param_index;
                owner.param_index += 1;
            } else {
                ident.index = owner.var_index;
                owner.var_index += 1;
            }
        }

        debug!("declared {} : {}", ident.name, ident);
        self.scopes[scope.0]
            .idents
            .insert(ident.name.clone(), ident.clone());
        Ok(ident)
    }

    /// Symbols declared directly in `scope`, in no particular order.
    pub fn idents(&self, scope: ScopeId) -> impl Iterator<Item = &IdentDesc> {
        self.scopes[scope.0].idents.values()
    }

    /// Flags every symbol of `scope` as built-in and restarts its variable slots.
    pub fn mark_built_in(&mut self, scope: ScopeId) {
        let scope = &mut self.scopes[scope.0];
        for ident in scope.idents.values_mut() {
            ident.built_in = true;
        }
        scope.var_index = 0;
    }

    pub fn var_index(&self, scope: ScopeId) -> usize {
        self.scopes[scope.0].var_index
    }

    pub fn param_index(&self, scope: ScopeId) -> usize {
        self.scopes[scope.0].param_index
    }
}
