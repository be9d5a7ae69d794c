//! Optional type resolution
//!
//! A resolver turns a written type into a fully qualified description in
//! the style of `go/types` (`sigs.k8s.io/controller-runtime/pkg/reconcile.Request`).
//! It is only consulted when the written name alone is inconclusive.

use super::ast::{SourceFile, TypeDecl, TypeExpr};
use super::render::render_type;
use std::collections::HashMap;

/// Maps a written type to a resolved-type description
pub trait TypeResolver: Send + Sync {
    /// `file` supplies the import table the type was written against
    fn resolve_type(&self, file: &SourceFile, ty: &TypeExpr) -> Option<String>;
}

/// Go's predeclared types; these resolve to themselves.
const BUILTIN_TYPES: &[&str] = &[
    "any", "bool", "byte", "comparable", "complex64", "complex128", "error", "float32",
    "float64", "int", "int8", "int16", "int32", "int64", "rune", "string", "uint", "uint8",
    "uint16", "uint32", "uint64", "uintptr",
];

/// Alias chains longer than this are treated as unresolvable
const MAX_ALIAS_DEPTH: usize = 8;

/// Resolver over the file-level type declarations of one package.
///
/// Aliases (`type A = B`) are transparent: `A` resolves to whatever `B`
/// resolves to, in the scope of the file that declared the alias. Defined
/// types (`type A B`) are new named types and resolve to
/// `<package path>.A`.
#[derive(Debug, Default)]
pub struct PackageIndex {
    package_path: String,
    /// name -> (declaration, index of the declaring file)
    decls: HashMap<String, (TypeDecl, usize)>,
    files: Vec<SourceFile>,
}

impl PackageIndex {
    /// Build an index from all files of one package.
    ///
    /// Only declarations and imports are retained; bodies and source text
    /// are dropped.
    pub fn build(files: &[SourceFile]) -> Self {
        let package_path = files
            .first()
            .map(|f| f.package_path.clone())
            .unwrap_or_default();

        let mut decls = HashMap::new();
        let mut headers = Vec::with_capacity(files.len());
        for (idx, file) in files.iter().enumerate() {
            for decl in &file.type_decls {
                decls
                    .entry(decl.name.clone())
                    .or_insert_with(|| (decl.clone(), idx));
            }
            headers.push(SourceFile {
                path: file.path.clone(),
                package: file.package.clone(),
                package_path: file.package_path.clone(),
                imports: file.imports.clone(),
                ..Default::default()
            });
        }

        Self {
            package_path,
            decls,
            files: headers,
        }
    }

    pub fn len(&self) -> usize {
        self.decls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.decls.is_empty()
    }

    fn describe(&self, file: &SourceFile, ty: &TypeExpr, depth: usize) -> Option<String> {
        if depth > MAX_ALIAS_DEPTH {
            return None;
        }
        match ty {
            TypeExpr::Named(name) if BUILTIN_TYPES.contains(&name.as_str()) => Some(name.clone()),
            TypeExpr::Named(name) => match self.decls.get(name) {
                Some((decl, idx)) if decl.alias => {
                    let declaring = self.files.get(*idx).unwrap_or(file);
                    self.describe(declaring, &decl.ty, depth + 1)
                }
                _ => Some(self.qualify(name)),
            },
            TypeExpr::Qualified { package, name } => {
                let import = file.import_for(package)?;
                Some(format!("{}.{}", import.path, name))
            }
            TypeExpr::Pointer(inner) => self
                .describe(file, inner, depth)
                .map(|inner| format!("*{inner}")),
            TypeExpr::Generic { base, args } => {
                let base = self.describe(file, base, depth)?;
                let args: Vec<String> = args
                    .iter()
                    .map(|arg| {
                        self.describe(file, arg, depth)
                            .unwrap_or_else(|| render_type(arg))
                    })
                    .collect();
                Some(format!("{}[{}]", base, args.join(", ")))
            }
            TypeExpr::Other(text) => Some(text.clone()),
        }
    }

    fn qualify(&self, name: &str) -> String {
        if self.package_path.is_empty() {
            name.to_string()
        } else {
            format!("{}.{}", self.package_path, name)
        }
    }
}

impl TypeResolver for PackageIndex {
    fn resolve_type(&self, file: &SourceFile, ty: &TypeExpr) -> Option<String> {
        self.describe(file, ty, 0)
    }
}
