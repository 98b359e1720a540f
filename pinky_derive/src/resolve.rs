use crate::constant::ConstantValue;
use crate::context::{Context, ModPath, Target};
use crate::utils::{make_ident, ImportPath};

use proc_macro2::{Literal, Span, TokenStream};
use quote::{quote, ToTokens};
use std::collections::{BTreeSet, HashMap};
use std::sync::OnceLock;
use syn::visit::Visit;
use syn::visit_mut::VisitMut;
use syn::{visit, visit_mut, Macro, Path, PathSegment, ReturnType, Signature, Type, TypePath};

const MAX_DEPTH: usize = 16;

#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum IntKind {
    I8,
    I16,
    I32,
    I64,
    I128,
    Isize,
    U8,
    U16,
    U32,
    U64,
    U128,
    Usize,
}

impl IntKind {
    pub fn from_name(name: &str) -> Option<Self> {
        let kind = match name {
            "i8" => IntKind::I8,
            "i16" => IntKind::I16,
            "i32" => IntKind::I32,
            "i64" => IntKind::I64,
            "i128" => IntKind::I128,
            "isize" => IntKind::Isize,
            "u8" => IntKind::U8,
            "u16" => IntKind::U16,
            "u32" => IntKind::U32,
            "u64" => IntKind::U64,
            "u128" => IntKind::U128,
            "usize" => IntKind::Usize,
            _ => return None,
        };
        Some(kind)
    }

    /// Inclusive range of values the type holds, clamped to `i128`.
    pub fn bounds(self) -> (i128, i128) {
        match self {
            IntKind::I8 => (i8::MIN.into(), i8::MAX.into()),
            IntKind::I16 => (i16::MIN.into(), i16::MAX.into()),
            IntKind::I32 => (i32::MIN.into(), i32::MAX.into()),
            IntKind::I64 | IntKind::Isize => (i64::MIN.into(), i64::MAX.into()),
            IntKind::I128 => (i128::MIN, i128::MAX),
            IntKind::U8 => (0, u8::MAX.into()),
            IntKind::U16 => (0, u16::MAX.into()),
            IntKind::U32 => (0, u32::MAX.into()),
            IntKind::U64 | IntKind::Usize => (0, u64::MAX.into()),
            IntKind::U128 => (0, i128::MAX),
        }
    }

    /// `v as T` for an integer `v`, wrapping to the width of `T`.
    pub fn wrap(self, v: i128) -> Option<i128> {
        let v = match self {
            IntKind::I8 => (v as i8).into(),
            IntKind::I16 => (v as i16).into(),
            IntKind::I32 => (v as i32).into(),
            IntKind::I64 | IntKind::Isize => (v as i64).into(),
            IntKind::I128 => v,
            IntKind::U8 => (v as u8).into(),
            IntKind::U16 => (v as u16).into(),
            IntKind::U32 => (v as u32).into(),
            IntKind::U64 | IntKind::Usize => (v as u64).into(),
            IntKind::U128 => return i128::try_from(v as u128).ok(),
        };
        Some(v)
    }

    /// `v as T` for a float `v`, saturating at the bounds of `T`.
    pub fn saturate(self, v: f64) -> Option<i128> {
        let v = match self {
            IntKind::I8 => (v as i8).into(),
            IntKind::I16 => (v as i16).into(),
            IntKind::I32 => (v as i32).into(),
            IntKind::I64 | IntKind::Isize => (v as i64).into(),
            IntKind::I128 => v as i128,
            IntKind::U8 => (v as u8).into(),
            IntKind::U16 => (v as u16).into(),
            IntKind::U32 => (v as u32).into(),
            IntKind::U64 | IntKind::Usize => (v as u64).into(),
            IntKind::U128 => return i128::try_from(v as u128).ok(),
        };
        Some(v)
    }
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum FloatKind {
    F32,
    F64,
}

impl FloatKind {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "f32" => Some(FloatKind::F32),
            "f64" => Some(FloatKind::F64),
            _ => None,
        }
    }

    /// Largest finite magnitude of the type.
    pub fn max(self) -> f64 {
        match self {
            FloatKind::F32 => f32::MAX.into(),
            FloatKind::F64 => f64::MAX,
        }
    }
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum Ownership {
    Owned,
    Borrowed,
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum Origin {
    /// Standard library type with a `Default` implementation.
    WellKnown,
    /// Declared inside the annotated module.
    Local,
    /// Brought in from elsewhere; the compiler checks it has a default.
    Imported,
}

/// Resolved return type of a contract member.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub enum TypeDescriptor {
    NoValue,
    Bool,
    Char,
    Int(IntKind),
    Float(FloatKind),
    Str(Ownership),
    Duration,
    Slice,
    Tuple(Vec<TypeDescriptor>),
    Named { path: String, origin: Origin },
    /// Arrays and names the catalog cannot place.
    Opaque(String),
}

impl TypeDescriptor {
    /// Expression of the default value returned by a stub, `None` when the
    /// member returns nothing.
    pub fn default_value(&self) -> Option<TokenStream> {
        let v = match self {
            TypeDescriptor::NoValue => return None,
            TypeDescriptor::Bool => quote! { false },
            TypeDescriptor::Char => Literal::character('\0').into_token_stream(),
            TypeDescriptor::Int(_) => quote! { 0 },
            TypeDescriptor::Float(_) => quote! { 0.0 },
            TypeDescriptor::Str(Ownership::Owned) => quote! { ::std::string::String::new() },
            TypeDescriptor::Str(Ownership::Borrowed) => quote! { "" },
            TypeDescriptor::Duration => quote! { ::std::time::Duration::ZERO },
            TypeDescriptor::Slice => quote! { &[] },
            TypeDescriptor::Tuple(_)
            | TypeDescriptor::Named { .. }
            | TypeDescriptor::Opaque(_) => quote! { ::core::default::Default::default() },
        };
        Some(v)
    }

    /// Expression producing `value` as this type, `None` when it does not fit.
    pub fn constant(&self, value: &ConstantValue) -> Option<TokenStream> {
        let v = match (self, value) {
            (TypeDescriptor::Bool, ConstantValue::Bool(v)) => quote! { #v },
            (TypeDescriptor::Char, ConstantValue::Char(v)) => {
                Literal::character(*v).into_token_stream()
            }
            (TypeDescriptor::Int(kind), ConstantValue::Int(v)) => {
                let (min, max) = kind.bounds();
                if *v < min || *v > max {
                    return None;
                }
                let lit = Literal::u128_unsuffixed(v.unsigned_abs());
                if *v < 0 {
                    quote! { -#lit }
                } else {
                    quote! { #lit }
                }
            }
            (TypeDescriptor::Float(kind), ConstantValue::Int(v)) => {
                float_tokens(*kind, *v as f64)?
            }
            (TypeDescriptor::Float(kind), ConstantValue::Float(v)) => float_tokens(*kind, *v)?,
            (TypeDescriptor::Str(Ownership::Owned), ConstantValue::Str(v)) => {
                quote! { ::std::string::String::from(#v) }
            }
            (TypeDescriptor::Str(Ownership::Borrowed), ConstantValue::Str(v)) => quote! { #v },
            _ => return None,
        };
        Some(v)
    }
}

fn float_tokens(kind: FloatKind, v: f64) -> Option<TokenStream> {
    if !v.is_finite() || v.abs() > kind.max() {
        return None;
    }
    let lit = Literal::f64_unsuffixed(v.abs());
    let v = if v.is_sign_negative() {
        quote! { -#lit }
    } else {
        quote! { #lit }
    };
    Some(v)
}

// ======================= Well-known catalog ======================= //

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
enum Known {
    /// Has a dedicated descriptor.
    Builtin,
    Defaultable,
    NoDefault,
    /// Traits, constructors and other names that are not types.
    NotAType,
}

#[derive(Debug, Clone, Copy)]
struct Entry {
    known: Known,
    prelude: bool,
}

fn catalog() -> &'static HashMap<&'static str, Entry> {
    static CATALOG: OnceLock<HashMap<&'static str, Entry>> = OnceLock::new();
    CATALOG.get_or_init(|| {
        let groups: [(&[&'static str], Known, bool); 8] = [
            (
                &[
                    "bool", "char", "i8", "i16", "i32", "i64", "i128", "isize", "u8", "u16",
                    "u32", "u64", "u128", "usize", "f32", "f64", "String",
                ],
                Known::Builtin,
                true,
            ),
            (&["Duration"], Known::Builtin, false),
            (&["Option", "Vec", "Box"], Known::Defaultable, true),
            (
                &[
                    "Rc", "Arc", "Cell", "RefCell", "HashMap", "HashSet", "BTreeMap", "BTreeSet",
                    "VecDeque", "BinaryHeap", "LinkedList", "PathBuf", "OsString", "CString",
                    "PhantomData", "Cow", "Mutex", "RwLock", "Wrapping", "Reverse",
                ],
                Known::Defaultable,
                false,
            ),
            (&["Result", "str"], Known::NoDefault, true),
            (
                &[
                    "SystemTime", "Instant", "Pin", "NonNull", "File", "Ordering", "IpAddr",
                    "SocketAddr", "TcpStream", "Thread",
                ],
                Known::NoDefault,
                false,
            ),
            (
                &[
                    "Some", "None", "Ok", "Err", "Copy", "Send", "Sized", "Sync", "Unpin", "Drop",
                    "Fn", "FnMut", "FnOnce", "Clone", "PartialEq", "PartialOrd", "Eq", "Ord",
                    "AsRef", "AsMut", "Into", "From", "Default", "Iterator", "Extend",
                    "IntoIterator", "DoubleEndedIterator", "ExactSizeIterator", "ToString",
                    "ToOwned", "TryFrom", "TryInto", "FromIterator",
                ],
                Known::NotAType,
                true,
            ),
            (&["Debug", "Display", "Hash", "Any"], Known::NotAType, false),
        ];

        groups
            .into_iter()
            .flat_map(|(names, known, prelude)| {
                names
                    .iter()
                    .map(move |name| (*name, Entry { known, prelude }))
            })
            .collect()
    })
}

/// Names usable without an import: primitives and the std prelude.
pub fn is_prelude(name: &str) -> bool {
    matches!(name, "Self" | "self" | "super" | "crate" | "std" | "core" | "alloc")
        || catalog().get(name).map(|e| e.prelude).unwrap_or(false)
}

fn builtin(name: &str) -> Option<TypeDescriptor> {
    if let Some(kind) = IntKind::from_name(name) {
        return Some(TypeDescriptor::Int(kind));
    }
    if let Some(kind) = FloatKind::from_name(name) {
        return Some(TypeDescriptor::Float(kind));
    }
    let ty = match name {
        "bool" => TypeDescriptor::Bool,
        "char" => TypeDescriptor::Char,
        "String" => TypeDescriptor::Str(Ownership::Owned),
        "Duration" => TypeDescriptor::Duration,
        _ => return None,
    };
    Some(ty)
}

// ======================= TypeResolver ======================= //

/// Resolves member return types as seen from the module declaring the contract.
pub struct TypeResolver<'c, 'a> {
    cx: &'c Context<'a>,
    module: &'c [String],
}

impl<'c, 'a> TypeResolver<'c, 'a> {
    pub fn new(cx: &'c Context<'a>, module: &'c [String]) -> Self {
        Self { cx, module }
    }

    /// Descriptor of a member's return type, or why it has no default value.
    pub fn resolve_output(&self, output: &ReturnType) -> Result<TypeDescriptor, String> {
        match output {
            ReturnType::Default => Ok(TypeDescriptor::NoValue),
            ReturnType::Type(_, ty) => self.resolve_at(self.module, ty, 0),
        }
    }

    fn resolve_at(
        &self,
        module: &[String],
        ty: &Type,
        depth: usize,
    ) -> Result<TypeDescriptor, String> {
        if depth > MAX_DEPTH {
            return Err("type aliases nest too deeply".to_owned());
        }

        match ty {
            Type::Tuple(tuple) if tuple.elems.is_empty() => Ok(TypeDescriptor::NoValue),
            Type::Tuple(tuple) => tuple
                .elems
                .iter()
                .map(|elem| self.resolve_at(module, elem, depth + 1))
                .collect::<Result<Vec<_>, _>>()
                .map(TypeDescriptor::Tuple),
            Type::Paren(inner) => self.resolve_at(module, &inner.elem, depth + 1),
            Type::Group(inner) => self.resolve_at(module, &inner.elem, depth + 1),
            Type::Reference(reference) => {
                if reference.mutability.is_some() {
                    return Err("mutable references have no default value".to_owned());
                }
                match &*reference.elem {
                    Type::Path(path) if path.qself.is_none() && path.path.is_ident("str") => {
                        Ok(TypeDescriptor::Str(Ownership::Borrowed))
                    }
                    Type::Slice(_) => Ok(TypeDescriptor::Slice),
                    _ => Err("references other than `&str` and `&[T]` have no default value"
                        .to_owned()),
                }
            }
            Type::Path(TypePath { qself: Some(_), .. }) => {
                Err("qualified paths have no default value".to_owned())
            }
            Type::Path(TypePath { qself: None, path }) => self.resolve_path(module, path, depth),
            Type::Array(_) => Ok(TypeDescriptor::Opaque(
                ty.to_token_stream().to_string(),
            )),
            Type::ImplTrait(_) => Err("`impl Trait` has no default value".to_owned()),
            Type::Never(_) => Err("`!` has no value".to_owned()),
            Type::Ptr(_) => Err("raw pointers have no default value".to_owned()),
            Type::BareFn(_) => Err("function pointers have no default value".to_owned()),
            Type::TraitObject(_) | Type::Slice(_) => {
                Err("unsized types cannot be returned by value".to_owned())
            }
            _ => Err("unsupported return type".to_owned()),
        }
    }

    fn resolve_path(
        &self,
        module: &[String],
        path: &Path,
        depth: usize,
    ) -> Result<TypeDescriptor, String> {
        let segments = path
            .segments
            .iter()
            .map(|seg| seg.ident.to_string())
            .collect::<Vec<_>>();
        let written = segments.join("::");
        let (first, last) = match (segments.first(), segments.last()) {
            (Some(first), Some(last)) => (first.as_str(), last.as_str()),
            _ => return Err("empty type path".to_owned()),
        };

        if first == "Self" {
            return Err("`Self` cannot be named by a mock".to_owned());
        }
        if path.leading_colon.is_some() || matches!(first, "std" | "core" | "alloc") {
            return well_known(last, &written)
                .unwrap_or_else(|| Ok(TypeDescriptor::Opaque(written.clone())));
        }

        match self.cx.resolve(module, &segments) {
            Some(Target::Type {
                module,
                alias: Some(target),
                ..
            }) => self.resolve_at(&module, target, depth + 1),
            Some(Target::Type { alias: None, .. }) => Ok(TypeDescriptor::Named {
                path: written,
                origin: Origin::Local,
            }),
            Some(Target::External { path, .. }) => {
                let imported = path.last().map(String::as_str).unwrap_or(last);
                if matches!(path.first().map(String::as_str), Some("std" | "core" | "alloc")) {
                    if let Some(known) = well_known(imported, &written) {
                        return known;
                    }
                }
                Ok(TypeDescriptor::Named {
                    path: written,
                    origin: Origin::Imported,
                })
            }
            Some(Target::Trait { .. }) | Some(Target::Module { .. }) => {
                Err(format!("`{written}` is not a type"))
            }
            None => well_known(last, &written).unwrap_or(Ok(TypeDescriptor::Opaque(written))),
        }
    }
}

fn well_known(name: &str, written: &str) -> Option<Result<TypeDescriptor, String>> {
    let entry = catalog().get(name)?;
    let res = match entry.known {
        Known::Builtin => builtin(name).ok_or_else(|| format!("`{written}` is not a type")),
        Known::Defaultable => Ok(TypeDescriptor::Named {
            path: written.to_owned(),
            origin: Origin::WellKnown,
        }),
        Known::NoDefault => Err(format!("`{written}` has no default value")),
        Known::NotAType => Err(format!("`{written}` is not a type")),
    };
    Some(res)
}

// ======================= Import surface ======================= //

/// Paths a generated unit must import so a copied member signature compiles
/// next to the annotated module's items.
pub fn collect_imports(
    cx: &Context<'_>,
    module: &[String],
    sig: &Signature,
) -> BTreeSet<ImportPath> {
    let generics = sig
        .generics
        .params
        .iter()
        .filter_map(|param| match param {
            syn::GenericParam::Type(ty) => Some(ty.ident.to_string()),
            syn::GenericParam::Const(c) => Some(c.ident.to_string()),
            syn::GenericParam::Lifetime(_) => None,
        })
        .collect::<BTreeSet<_>>();

    let mut vis = ImportVisitor {
        cx,
        module,
        skip: generics,
        imports: BTreeSet::new(),
    };
    vis.visit_signature(sig);
    vis.imports
}

/// Import of `name` as seen from the unit module, which sits directly in the
/// annotated module.
pub fn import_for(cx: &Context<'_>, module: &[String], segments: &[String]) -> Option<ImportPath> {
    let mut current: ModPath = module.to_vec();
    let mut rest = segments;
    let mut escaped = 0;

    if rest.first().map(String::as_str) == Some("self") {
        rest = &rest[1..];
    }
    while rest.first().map(String::as_str) == Some("super") {
        if current.pop().is_none() {
            escaped += 1;
        }
        rest = &rest[1..];
    }
    let name = rest.first()?;

    let from_root = |module: &[String], name: &str| {
        let mut path = vec!["super".to_owned(); 1 + escaped];
        path.extend(module.iter().cloned());
        path.push(name.to_owned());
        ImportPath::new(path)
    };

    if escaped > 0 {
        return Some(from_root(&current, name));
    }

    let path = match cx.resolve(&current, std::slice::from_ref(name)) {
        Some(Target::Trait { module, item }) => from_root(&module, &item.ident.to_string()),
        Some(Target::Type { module, name, .. }) => from_root(&module, &name),
        Some(Target::Module { mut module }) => match module.pop() {
            Some(name) => from_root(&module, &name),
            None => return None,
        },
        Some(Target::External { path, name: local, .. })
            if matches!(path.first().map(String::as_str), Some("std" | "core" | "alloc" | "crate"))
                && path.last() == Some(&local) =>
        {
            ImportPath::new(path)
        }
        _ => from_root(&current, name),
    };
    Some(path)
}

/// Rewrites every `self::`/`super::` path of `sig` so it names the same item
/// from the unit module.
pub fn rebase_signature(cx: &Context<'_>, module: &[String], sig: &mut Signature) {
    let mut vis = PathRebaser { cx, module };
    vis.visit_signature_mut(sig);
}

struct PathRebaser<'c, 'a> {
    cx: &'c Context<'a>,
    module: &'c [String],
}

impl<'c, 'a> VisitMut for PathRebaser<'c, 'a> {
    fn visit_path_mut(&mut self, i: &mut Path) {
        let relative = i.leading_colon.is_none()
            && matches!(
                i.segments.first(),
                Some(seg) if seg.ident == "self" || seg.ident == "super"
            );
        if relative {
            let segments = i
                .segments
                .iter()
                .map(|seg| seg.ident.to_string())
                .collect::<Vec<_>>();
            let skip = segments
                .iter()
                .take_while(|seg| *seg == "self" || *seg == "super")
                .count();

            if let Some(import) = import_for(self.cx, self.module, &segments) {
                let path = import.segments();
                // A renamed import is replaced by the path of the item it names.
                let (prefix, skip) = match path.split_last() {
                    Some((last, prefix)) if Some(last) == segments.get(skip) => (prefix, skip),
                    _ => (path, skip + 1),
                };
                let rest = i.segments.iter().skip(skip).cloned();
                i.segments = prefix
                    .iter()
                    .map(|seg| PathSegment::from(make_ident(seg, Span::call_site())))
                    .chain(rest)
                    .collect();
            }
        }
        visit_mut::visit_path_mut(self, i);
    }

    fn visit_macro_mut(&mut self, _: &mut Macro) {}
}

struct ImportVisitor<'c, 'a> {
    cx: &'c Context<'a>,
    module: &'c [String],
    skip: BTreeSet<String>,
    imports: BTreeSet<ImportPath>,
}

impl<'ast, 'c, 'a> Visit<'ast> for ImportVisitor<'c, 'a> {
    fn visit_path(&mut self, i: &'ast Path) {
        if i.leading_colon.is_none() {
            let segments = i
                .segments
                .iter()
                .map(|seg| seg.ident.to_string())
                .collect::<Vec<_>>();
            let first = segments
                .iter()
                .find(|seg| *seg != "self" && *seg != "super");
            let skipped = match (segments.first(), first) {
                (Some(head), Some(first)) => {
                    (head == first && is_prelude(first)) || self.skip.contains(first)
                }
                _ => true,
            };
            if !skipped {
                if let Some(import) = import_for(self.cx, self.module, &segments) {
                    self.imports.insert(import);
                }
            }
        }
        visit::visit_path(self, i);
    }

    fn visit_macro(&mut self, _: &'ast Macro) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attribute::Settings;
    use syn::{parse_quote, ItemMod, TraitItemFn};

    fn module() -> ItemMod {
        parse_quote! {
            mod samples {
                use std::collections::HashMap;
                use std::time::Instant;

                pub struct Payload;
                pub type Id = u32;
                pub type Pair = (Id, String);

                pub trait IContract {}

                pub mod model {
                    pub struct Item;
                }

                pub mod contracts {
                    use super::model::Item;

                    pub trait IRepository {
                        fn load(&self) -> Item;
                    }
                }
            }
        }
    }

    fn resolve(module: &ItemMod, ty: Type) -> Result<TypeDescriptor, String> {
        let cx = Context::from_ast(Settings::default(), module).unwrap();
        let resolver = TypeResolver::new(&cx, &[]);
        resolver.resolve_output(&ReturnType::Type(Default::default(), Box::new(ty)))
    }

    #[test]
    fn primitives_and_std_types() {
        let module = module();

        assert_eq!(resolve(&module, parse_quote!(())), Ok(TypeDescriptor::NoValue));
        assert_eq!(resolve(&module, parse_quote!(u8)), Ok(TypeDescriptor::Int(IntKind::U8)));
        assert_eq!(
            resolve(&module, parse_quote!(f32)),
            Ok(TypeDescriptor::Float(FloatKind::F32))
        );
        assert_eq!(
            resolve(&module, parse_quote!(String)),
            Ok(TypeDescriptor::Str(Ownership::Owned))
        );
        assert_eq!(
            resolve(&module, parse_quote!(&'static str)),
            Ok(TypeDescriptor::Str(Ownership::Borrowed))
        );
        assert_eq!(resolve(&module, parse_quote!(&[u8])), Ok(TypeDescriptor::Slice));
        assert_eq!(
            resolve(&module, parse_quote!(std::time::Duration)),
            Ok(TypeDescriptor::Duration)
        );
        assert_eq!(
            resolve(&module, parse_quote!(Option<u8>)),
            Ok(TypeDescriptor::Named {
                path: "Option".to_owned(),
                origin: Origin::WellKnown,
            })
        );
        assert_eq!(
            resolve(&module, parse_quote!(HashMap<u8, u8>)),
            Ok(TypeDescriptor::Named {
                path: "HashMap".to_owned(),
                origin: Origin::WellKnown,
            })
        );
    }

    #[test]
    fn local_types_and_aliases() {
        let module = module();

        assert_eq!(
            resolve(&module, parse_quote!(Payload)),
            Ok(TypeDescriptor::Named {
                path: "Payload".to_owned(),
                origin: Origin::Local,
            })
        );
        assert_eq!(resolve(&module, parse_quote!(Id)), Ok(TypeDescriptor::Int(IntKind::U32)));
        assert_eq!(
            resolve(&module, parse_quote!(Pair)),
            Ok(TypeDescriptor::Tuple(vec![
                TypeDescriptor::Int(IntKind::U32),
                TypeDescriptor::Str(Ownership::Owned),
            ]))
        );
        assert_eq!(
            resolve(&module, parse_quote!(Unknown)),
            Ok(TypeDescriptor::Opaque("Unknown".to_owned()))
        );
    }

    #[test]
    fn types_without_default() {
        let module = module();

        for ty in [
            parse_quote!(Result<u8, String>),
            parse_quote!(Instant),
            parse_quote!(std::time::SystemTime),
            parse_quote!(&mut str),
            parse_quote!(&Payload),
            parse_quote!(*const u8),
            parse_quote!(impl Iterator<Item = u8>),
            parse_quote!(!),
            parse_quote!(fn()),
            parse_quote!(Self),
            parse_quote!(IContract),
        ] {
            assert!(resolve(&module, ty).is_err());
        }
    }

    #[test]
    fn default_and_constant_tokens() {
        let ty = TypeDescriptor::Int(IntKind::U8);
        assert_eq!(ty.default_value().unwrap().to_string(), "0");
        assert_eq!(ty.constant(&ConstantValue::Int(15)).unwrap().to_string(), "15");
        assert!(ty.constant(&ConstantValue::Int(300)).is_none());
        assert!(ty.constant(&ConstantValue::Int(-1)).is_none());
        assert!(ty.constant(&ConstantValue::Str("15".to_owned())).is_none());

        let ty = TypeDescriptor::Int(IntKind::I32);
        assert_eq!(ty.constant(&ConstantValue::Int(-3)).unwrap().to_string(), "- 3");

        let ty = TypeDescriptor::Float(FloatKind::F64);
        assert_eq!(ty.constant(&ConstantValue::Int(2)).unwrap().to_string(), "2.0");
        assert!(ty.constant(&ConstantValue::Float(1e40)).is_some());
        assert!(ty.constant(&ConstantValue::Float(f64::INFINITY)).is_none());

        let ty = TypeDescriptor::Float(FloatKind::F32);
        assert!(ty.constant(&ConstantValue::Float(1e40)).is_none());
        assert!(ty.constant(&ConstantValue::Float(-1e40)).is_none());
        assert_eq!(ty.constant(&ConstantValue::Float(-2.5)).unwrap().to_string(), "- 2.5");

        let ty = TypeDescriptor::Char;
        assert_eq!(ty.constant(&ConstantValue::Char('x')).unwrap().to_string(), "'x'");

        let ty = TypeDescriptor::Str(Ownership::Owned);
        assert_eq!(
            ty.constant(&ConstantValue::Str("hello world".to_owned()))
                .unwrap()
                .to_string(),
            quote! { ::std::string::String::from("hello world") }.to_string()
        );

        assert!(TypeDescriptor::NoValue.default_value().is_none());
        assert!(TypeDescriptor::Named {
            path: "Payload".to_owned(),
            origin: Origin::Local,
        }
        .constant(&ConstantValue::Int(1))
        .is_none());
    }

    #[test]
    fn import_surface() {
        let module = module();
        let cx = Context::from_ast(Settings::default(), &module).unwrap();

        let item: TraitItemFn = parse_quote! {
            fn load<'a, T>(&'a self, id: Id, map: &HashMap<String, T>, raw: &'a [u8]) -> model::Item;
        };
        let imports = collect_imports(&cx, &[], &item.sig)
            .into_iter()
            .map(|path| path.to_string())
            .collect::<Vec<_>>();
        assert_eq!(
            imports,
            vec!["std::collections::HashMap", "super::Id", "super::model"]
        );

        // resolved to the declaring module, not the private import
        let contract = vec!["contracts".to_owned()];
        let item: TraitItemFn = parse_quote! { fn load(&self) -> Item; };
        let imports = collect_imports(&cx, &contract, &item.sig)
            .into_iter()
            .map(|path| path.to_string())
            .collect::<Vec<_>>();
        assert_eq!(imports, vec!["super::model::Item"]);
    }
}
