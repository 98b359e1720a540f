use crate::attribute::Settings;
use crate::error::AnalysisError;
use crate::symbols;

use std::collections::{BTreeMap, BTreeSet};
use syn::spanned::Spanned;
use syn::{Ident, Item, ItemConst, ItemFn, ItemMod, ItemTrait, Type, UseTree};

const MAX_DEPTH: usize = 16;

/// Path of a module relative to the annotated one, which is the empty path.
pub type ModPath = Vec<String>;

/// Items declared and imported by one module.
#[derive(Debug, Default)]
pub struct ModuleScope<'a> {
    traits: BTreeMap<String, &'a ItemTrait>,
    /// Declared types, with the target type for aliases.
    types: BTreeMap<String, Option<&'a Type>>,
    modules: BTreeSet<String>,
    imports: BTreeMap<String, Vec<String>>,
    globs: Vec<Vec<String>>,
    consts: Vec<&'a ItemConst>,
}

/// What a path resolves to.
#[derive(Debug, Clone)]
pub enum Target<'a> {
    Trait {
        module: ModPath,
        item: &'a ItemTrait,
    },
    Type {
        module: ModPath,
        name: String,
        alias: Option<&'a Type>,
    },
    Module {
        module: ModPath,
    },
    /// Imported from outside the annotated module: `name` is the local name
    /// in `module`, `path` the import as written.
    External {
        module: ModPath,
        name: String,
        path: Vec<String>,
    },
}

/// Test function found in the annotated module.
#[derive(Debug, Clone, Copy)]
pub struct TestFn<'a> {
    pub item: &'a ItemFn,
    module: &'a [String],
}

impl<'a> TestFn<'a> {
    pub fn module(&self) -> &'a [String] {
        self.module
    }
}

/// Everything the analysis knows about the annotated module: its settings and
/// every item of its inline module tree.
#[derive(Debug)]
pub struct Context<'a> {
    pub settings: Settings,
    pub root: Ident,
    scopes: BTreeMap<ModPath, ModuleScope<'a>>,
    paths: Vec<ModPath>,
    tests: Vec<(usize, &'a ItemFn)>,
}

impl<'a> Context<'a> {
    pub fn from_ast(settings: Settings, module: &'a ItemMod) -> Result<Self, AnalysisError> {
        let (_, items) =
            module
                .content
                .as_ref()
                .ok_or_else(|| AnalysisError::UnresolvableContractType {
                    span: module.span(),
                    reason: "`ghost` can only be applied to an inline module (`mod name { ... }`)"
                        .to_owned(),
                })?;

        let mut cx = Context {
            settings,
            root: module.ident.clone(),
            scopes: BTreeMap::new(),
            paths: Vec::new(),
            tests: Vec::new(),
        };
        cx.collect(ModPath::new(), items);

        Ok(cx)
    }

    fn collect(&mut self, path: ModPath, items: &'a [Item]) {
        let path_idx = self.paths.len();
        self.paths.push(path.clone());

        let mut scope = ModuleScope::default();
        for item in items {
            match item {
                Item::Trait(item) => {
                    scope.traits.insert(item.ident.to_string(), item);
                }
                Item::Struct(item) => {
                    scope.types.insert(item.ident.to_string(), None);
                }
                Item::Enum(item) => {
                    scope.types.insert(item.ident.to_string(), None);
                }
                Item::Union(item) => {
                    scope.types.insert(item.ident.to_string(), None);
                }
                Item::Type(item) => {
                    scope.types.insert(item.ident.to_string(), Some(&*item.ty));
                }
                Item::Const(item) => scope.consts.push(item),
                Item::Use(item) => flatten_use_tree(&item.tree, Vec::new(), &mut scope),
                Item::Fn(item) if is_test(item) => self.tests.push((path_idx, item)),
                Item::Mod(item) => {
                    scope.modules.insert(item.ident.to_string());
                    if let Some((_, content)) = &item.content {
                        let mut child = path.clone();
                        child.push(item.ident.to_string());
                        self.collect(child, content);
                    }
                }
                _ => { /* not needed for analysis */ }
            }
        }

        self.scopes.insert(path, scope);
    }

    /// Test functions of the whole module tree, in source order per module.
    pub fn tests(&self) -> impl Iterator<Item = TestFn<'_>> + '_ {
        self.tests.iter().map(|(idx, item)| TestFn {
            item: *item,
            module: &self.paths[*idx],
        })
    }

    /// `const` items declared directly in `module`.
    pub fn consts(&self, module: &[String]) -> Vec<&'a ItemConst> {
        self.scopes
            .get(module)
            .map(|scope| scope.consts.clone())
            .unwrap_or_default()
    }

    /// Resolves `segments` as written inside `module`: declared items first,
    /// then named imports, then glob imports.
    pub fn resolve(&self, module: &[String], segments: &[String]) -> Option<Target<'a>> {
        self.resolve_at(module, segments, 0)
    }

    fn resolve_at(
        &self,
        module: &[String],
        segments: &[String],
        depth: usize,
    ) -> Option<Target<'a>> {
        if depth > MAX_DEPTH {
            return None;
        }

        let (mut current, rest) = normalize(module, segments)?;
        let (name, parents) = rest.split_last()?;

        for (idx, seg) in parents.iter().enumerate() {
            let scope = self.scopes.get(&current)?;
            if scope.modules.contains(seg) {
                current.push(seg.clone());
                continue;
            }
            return self.resolve_imported(&current, scope, &rest[idx..], depth);
        }

        let scope = self.scopes.get(&current)?;
        if let Some(item) = scope.traits.get(name) {
            return Some(Target::Trait {
                module: current,
                item: *item,
            });
        }
        if let Some(alias) = scope.types.get(name) {
            return Some(Target::Type {
                module: current,
                name: name.clone(),
                alias: *alias,
            });
        }
        if scope.modules.contains(name) {
            let mut module = current;
            module.push(name.clone());
            return Some(Target::Module { module });
        }
        self.resolve_imported(&current, scope, std::slice::from_ref(name), depth)
    }

    fn resolve_imported(
        &self,
        module: &[String],
        scope: &ModuleScope<'a>,
        segments: &[String],
        depth: usize,
    ) -> Option<Target<'a>> {
        let (first, rest) = segments.split_first()?;

        if let Some(import) = scope.imports.get(first) {
            let mut path = import.clone();
            path.extend(rest.iter().cloned());
            return self
                .resolve_at(module, &path, depth + 1)
                .or_else(|| {
                    Some(Target::External {
                        module: module.to_vec(),
                        name: first.clone(),
                        path: import.clone(),
                    })
                });
        }

        scope.globs.iter().find_map(|glob| {
            let mut path = glob.clone();
            path.extend(segments.iter().cloned());
            self.resolve_at(module, &path, depth + 1)
        })
    }
}

/// Strips leading `self`/`super` segments. Returns `None` for paths leaving
/// the annotated module or starting at the crate root.
fn normalize(module: &[String], segments: &[String]) -> Option<(ModPath, Vec<String>)> {
    let mut current = module.to_vec();
    let mut rest = segments;

    match rest.first().map(String::as_str) {
        Some("self") => rest = &rest[1..],
        Some("crate") => return None,
        _ => {
            while rest.first().map(String::as_str) == Some("super") {
                current.pop()?;
                rest = &rest[1..];
            }
        }
    }

    if rest.is_empty() {
        None
    } else {
        Some((current, rest.to_vec()))
    }
}

fn flatten_use_tree(tree: &UseTree, prefix: Vec<String>, scope: &mut ModuleScope<'_>) {
    match tree {
        UseTree::Path(path) => {
            let mut prefix = prefix;
            prefix.push(path.ident.to_string());
            flatten_use_tree(&path.tree, prefix, scope);
        }
        UseTree::Name(name) if name.ident == "self" => {
            if let Some(last) = prefix.last() {
                scope.imports.insert(last.clone(), prefix.clone());
            }
        }
        UseTree::Name(name) => {
            let mut path = prefix;
            path.push(name.ident.to_string());
            scope.imports.insert(name.ident.to_string(), path);
        }
        UseTree::Rename(rename) => {
            let mut path = prefix;
            path.push(rename.ident.to_string());
            scope.imports.insert(rename.rename.to_string(), path);
        }
        UseTree::Glob(_) => scope.globs.push(prefix),
        UseTree::Group(group) => {
            for tree in &group.items {
                flatten_use_tree(tree, prefix.clone(), scope);
            }
        }
    }
}

/// `#[test]`, `#[tokio::test]` and the like.
pub fn is_test(item: &ItemFn) -> bool {
    item.attrs.iter().any(|attr| {
        attr.path()
            .segments
            .last()
            .map(|seg| seg.ident == symbols::TEST)
            .unwrap_or(false)
    })
}
