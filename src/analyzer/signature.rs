//! Reconcile signature matching
//!
//! A candidate is a method named `Reconcile` shaped like
//! `func (r *T) Reconcile(ctx context.Context, req ctrl.Request) (ctrl.Result, error)`.
//! Types are matched on capability markers (substrings) rather than exact
//! identity, so wrappers and re-exports of the controller-runtime types match.

use crate::syntax::{Block, FuncDecl, SourceFile, TypeExpr, TypeResolver};

pub const RECONCILE_METHOD: &str = "Reconcile";

const CONTEXT_MARKER: &str = "Context";
const REQUEST_MARKER: &str = "Request";
const RESULT_MARKER: &str = "Result";
const ERROR_TYPE: &str = "error";

/// Request name assumed when the second parameter is unnamed
pub const DEFAULT_REQUEST_NAME: &str = "req";

/// A matched Reconcile method and what the detector needs to know about it
#[derive(Debug, Clone)]
pub struct CandidateFunction<'a> {
    pub decl: &'a FuncDecl,
    pub file: &'a SourceFile,
    /// Receiver type name with pointer and type arguments stripped
    pub receiver_type: String,
    /// Import path of the package declaring the method
    pub receiver_package: String,
}

impl<'a> CandidateFunction<'a> {
    /// Local name bound to the request parameter
    pub fn request_name(&self) -> &'a str {
        request_param_name(self.decl)
    }

    pub fn body(&self) -> Option<&'a Block> {
        self.decl.body.as_ref()
    }

    pub fn line(&self) -> u32 {
        self.decl.span.start_line
    }

    pub fn end_line(&self) -> u32 {
        self.decl.span.end_line
    }
}

/// Every declaration in `files` that matches the Reconcile template, in
/// file order then declaration order.
pub fn find_candidates<'a>(
    files: &'a [SourceFile],
    resolver: Option<&dyn TypeResolver>,
) -> Vec<CandidateFunction<'a>> {
    files
        .iter()
        .flat_map(|file| {
            file.funcs
                .iter()
                .filter(move |decl| matches_reconcile(file, decl, resolver))
                .map(move |decl| CandidateFunction {
                    decl,
                    file,
                    receiver_type: receiver_type_name(decl),
                    receiver_package: file.package_path.clone(),
                })
        })
        .collect()
}

/// Signature template check. Short shapes are non-matches, never errors.
pub fn matches_reconcile(
    file: &SourceFile,
    decl: &FuncDecl,
    resolver: Option<&dyn TypeResolver>,
) -> bool {
    if decl.name != RECONCILE_METHOD || decl.receiver.len() != 1 {
        return false;
    }
    let (Some(ctx), Some(req)) = (decl.params.first(), decl.params.get(1)) else {
        return false;
    };
    let (Some(result), Some(err)) = (decl.results.first(), decl.results.get(1)) else {
        return false;
    };

    has_marker(file, &ctx.ty, CONTEXT_MARKER, resolver)
        && has_marker(file, &req.ty, REQUEST_MARKER, resolver)
        && has_marker(file, &result.ty, RESULT_MARKER, resolver)
        && matches!(&err.ty, TypeExpr::Named(name) if name == ERROR_TYPE)
}

/// Syntactic name first; the resolver is only asked when that is inconclusive.
fn has_marker(
    file: &SourceFile,
    ty: &TypeExpr,
    marker: &str,
    resolver: Option<&dyn TypeResolver>,
) -> bool {
    if ty.syntactic_name().is_some_and(|name| name.contains(marker)) {
        return true;
    }
    resolver
        .and_then(|r| r.resolve_type(file, ty))
        .is_some_and(|description| description.contains(marker))
}

/// First name bound to the second parameter, or `req` when unnamed.
pub fn request_param_name(decl: &FuncDecl) -> &str {
    decl.params
        .get(1)
        .and_then(|field| field.names.first())
        .map(String::as_str)
        .unwrap_or(DEFAULT_REQUEST_NAME)
}

fn receiver_type_name(decl: &FuncDecl) -> String {
    let Some(field) = decl.receiver.first() else {
        return String::new();
    };
    let mut ty = &field.ty;
    if let TypeExpr::Pointer(inner) = ty {
        ty = inner;
    }
    if let TypeExpr::Generic { base, .. } = ty {
        ty = base;
    }
    ty.syntactic_name().unwrap_or("unknown").to_string()
}
