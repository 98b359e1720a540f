use crate::resolve::{FloatKind, IntKind};

use if_chain::if_chain;
use std::collections::BTreeMap;
use std::fmt;
use syn::visit::Visit;
use syn::{visit, Expr, ExprLit, ExprUnary, ItemConst, ItemFn, Lit, Type, UnOp};

const MAX_DEPTH: usize = 16;

/// Value of an expression known at expansion time.
#[derive(Debug, Clone, PartialEq)]
pub enum ConstantValue {
    Bool(bool),
    Char(char),
    Int(i128),
    Float(f64),
    Str(String),
}

impl ConstantValue {
    pub fn kind(&self) -> &'static str {
        match self {
            ConstantValue::Bool(_) => "bool",
            ConstantValue::Char(_) => "char",
            ConstantValue::Int(_) => "integer",
            ConstantValue::Float(_) => "float",
            ConstantValue::Str(_) => "string",
        }
    }
}

impl fmt::Display for ConstantValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConstantValue::Bool(v) => write!(f, "{v}"),
            ConstantValue::Char(v) => write!(f, "{v:?}"),
            ConstantValue::Int(v) => write!(f, "{v}"),
            ConstantValue::Float(v) => write!(f, "{v:?}"),
            ConstantValue::Str(v) => write!(f, "{v:?}"),
        }
    }
}

/// `const` items visible from a test function: the ones declared in its body,
/// then the ones declared in its module.
#[derive(Debug, Default)]
pub struct ConstScope<'a> {
    local: BTreeMap<String, &'a Expr>,
    module: BTreeMap<String, &'a Expr>,
}

impl<'a> ConstScope<'a> {
    pub fn new(func: &'a ItemFn, module: impl IntoIterator<Item = &'a ItemConst>) -> Self {
        let mut collector = ConstCollector::default();
        collector.visit_block(&func.block);

        Self {
            local: collector.consts,
            module: module
                .into_iter()
                .map(|item| (item.ident.to_string(), &*item.expr))
                .collect(),
        }
    }

    /// Value of `expr` if it is a compile-time constant.
    pub fn evaluate(&self, expr: &Expr) -> Option<ConstantValue> {
        self.evaluate_at(expr, 0)
    }

    fn evaluate_at(&self, expr: &Expr, depth: usize) -> Option<ConstantValue> {
        if depth > MAX_DEPTH {
            return None;
        }

        match expr {
            Expr::Lit(ExprLit { lit, .. }) => evaluate_lit(lit),
            Expr::Paren(inner) => self.evaluate_at(&inner.expr, depth + 1),
            Expr::Group(inner) => self.evaluate_at(&inner.expr, depth + 1),
            Expr::Unary(ExprUnary {
                op: UnOp::Neg(_),
                expr,
                ..
            }) => match self.evaluate_at(expr, depth + 1)? {
                ConstantValue::Int(v) => v.checked_neg().map(ConstantValue::Int),
                ConstantValue::Float(v) => Some(ConstantValue::Float(-v)),
                _ => None,
            },
            Expr::Unary(ExprUnary {
                op: UnOp::Not(_),
                expr,
                ..
            }) => match self.evaluate_at(expr, depth + 1)? {
                ConstantValue::Bool(v) => Some(ConstantValue::Bool(!v)),
                _ => None,
            },
            Expr::Cast(cast) => {
                let value = self.evaluate_at(&cast.expr, depth + 1)?;
                cast_numeric(value, &cast.ty)
            }
            Expr::Path(path) => {
                if path.qself.is_some() {
                    return None;
                }
                let segments = &path.path.segments;
                let name = match segments.len() {
                    1 => segments[0].ident.to_string(),
                    2 if segments[0].ident == "self" => segments[1].ident.to_string(),
                    _ => return None,
                };
                let target = self
                    .local
                    .get(&name)
                    .or_else(|| self.module.get(&name))?;
                self.evaluate_at(target, depth + 1)
            }
            _ => None,
        }
    }
}

fn evaluate_lit(lit: &Lit) -> Option<ConstantValue> {
    match lit {
        Lit::Str(lit) => Some(ConstantValue::Str(lit.value())),
        Lit::Char(lit) => Some(ConstantValue::Char(lit.value())),
        Lit::Bool(lit) => Some(ConstantValue::Bool(lit.value)),
        Lit::Byte(lit) => Some(ConstantValue::Int(lit.value() as i128)),
        Lit::Int(lit) => lit.base10_parse::<i128>().ok().map(ConstantValue::Int),
        Lit::Float(lit) => lit.base10_parse::<f64>().ok().map(ConstantValue::Float),
        _ => None,
    }
}

fn cast_numeric(value: ConstantValue, ty: &Type) -> Option<ConstantValue> {
    if_chain! {
        if let Type::Path(ty) = ty;
        if ty.qself.is_none();
        if let Some(ident) = ty.path.get_ident();
        then {
            let target = ident.to_string();
            if let Some(kind) = IntKind::from_name(&target) {
                let v = match value {
                    ConstantValue::Int(v) => kind.wrap(v),
                    ConstantValue::Float(v) => kind.saturate(v),
                    ConstantValue::Char(v) => kind.wrap(v as i128),
                    ConstantValue::Bool(v) => kind.wrap(v as i128),
                    ConstantValue::Str(_) => None,
                };
                return v.map(ConstantValue::Int);
            }
            match (FloatKind::from_name(&target), value) {
                (Some(FloatKind::F32), ConstantValue::Int(v)) => {
                    Some(ConstantValue::Float((v as f32).into()))
                }
                (Some(FloatKind::F32), ConstantValue::Float(v)) => {
                    Some(ConstantValue::Float((v as f32).into()))
                }
                (Some(FloatKind::F64), ConstantValue::Int(v)) => Some(ConstantValue::Float(v as f64)),
                (Some(FloatKind::F64), ConstantValue::Float(v)) => Some(ConstantValue::Float(v)),
                _ => None,
            }
        } else {
            None
        }
    }
}

#[derive(Default)]
struct ConstCollector<'a> {
    consts: BTreeMap<String, &'a Expr>,
}

impl<'a> Visit<'a> for ConstCollector<'a> {
    fn visit_item_const(&mut self, i: &'a ItemConst) {
        self.consts.insert(i.ident.to_string(), &i.expr);
        visit::visit_item_const(self, i);
    }

    // consts of nested functions are not in scope
    fn visit_item_fn(&mut self, _: &'a ItemFn) {}
}
