//! Pattern detection over a Reconcile body
//!
//! One pre-order walk over the body. Call expressions, `if` statements and
//! loops are independent dispatch targets, so a write inside a loop yields
//! its own `single-write` as well as contributing to the loop's
//! `loop-write`.

use super::matchers::{
    client_call_verb, is_client_call, is_label_option, is_namespace_option, is_not_found_check,
    is_request_namespaced_name, is_write_verb, references_ident, selector_call, GET_VERB,
    LIST_VERB,
};
use super::snippet::extract_snippet;
use crate::models::{Signal, SignalKind};
use crate::syntax::{block_descendants, Block, Expr, ExprKind, IfStmt, NodeRef, Stmt, StmtKind};

/// Detects signals in one function body
pub struct PatternDetector<'a> {
    /// Local name of the request parameter
    request: &'a str,
    /// Raw file bytes for snippets
    source: Option<&'a [u8]>,
}

impl<'a> PatternDetector<'a> {
    pub fn new(request: &'a str, source: Option<&'a [u8]>) -> Self {
        Self { request, source }
    }

    /// Signals in traversal order
    pub fn detect(&self, body: &Block) -> Vec<Signal> {
        block_descendants(body)
            .filter_map(|node| self.visit(node))
            .collect()
    }

    fn visit(&self, node: NodeRef<'_>) -> Option<Signal> {
        match node {
            NodeRef::Expr(expr) => self.call_signal(expr),
            NodeRef::Stmt(stmt) => match &stmt.kind {
                StmtKind::If(if_stmt) => self.not_found_signal(stmt, if_stmt),
                StmtKind::For(for_stmt) => self.loop_signal(stmt, &for_stmt.body),
                StmtKind::Range(range) => self.loop_signal(stmt, &range.body),
                _ => None,
            },
        }
    }

    fn signal(&self, kind: SignalKind, node: NodeRef<'_>) -> Signal {
        Signal::new(
            kind,
            node.span().start_line,
            extract_snippet(node, self.source),
        )
    }

    fn call_signal(&self, expr: &Expr) -> Option<Signal> {
        let (operand, member, args) = selector_call(expr)?;
        if !is_client_call(operand, member) {
            return None;
        }

        let kind = match member {
            LIST_VERB => self.list_kind(args)?,
            GET_VERB => self.get_kind(args)?,
            verb if is_write_verb(verb) => SignalKind::SingleWrite,
            _ => return None,
        };
        Some(self.signal(kind, NodeRef::Expr(expr)))
    }

    /// `List(ctx, list, opts...)`
    fn list_kind(&self, args: &[Expr]) -> Option<SignalKind> {
        let opts = args.get(2..)?;
        if !opts.iter().any(|opt| references_ident(opt, self.request)) {
            return Some(SignalKind::UnscopedList);
        }

        let namespaced = opts.iter().any(is_namespace_option);
        let labelled = opts.iter().any(is_label_option);
        if namespaced && !labelled {
            Some(SignalKind::NamespaceScopedList)
        } else {
            Some(SignalKind::LabelScopedList)
        }
    }

    /// `Get(ctx, key, obj, opts...)`
    fn get_kind(&self, args: &[Expr]) -> Option<SignalKind> {
        if args.len() < 3 {
            return None;
        }
        let key = &args[1];
        if is_request_namespaced_name(key, self.request) {
            Some(SignalKind::RequestScopedGet)
        } else if references_ident(key, self.request) {
            Some(SignalKind::DerivedGet)
        } else {
            Some(SignalKind::UnrelatedGet)
        }
    }

    /// Only returns directly in the `if` body count.
    fn not_found_signal(&self, stmt: &Stmt, if_stmt: &IfStmt) -> Option<Signal> {
        if !is_not_found_check(&if_stmt.cond) {
            return None;
        }

        let mut returns = if_stmt.body.stmts.iter().filter_map(|s| match &s.kind {
            StmtKind::Return(results) => Some(results),
            _ => None,
        });
        let first = returns.next()?;

        let is_nil = |e: &Expr| matches!(&e.kind, ExprKind::Ident(name) if name == "nil");
        let ignores = std::iter::once(first)
            .chain(returns)
            .any(|results| results.iter().any(is_nil));

        let kind = if ignores {
            SignalKind::NotfoundIgnore
        } else {
            SignalKind::NotfoundEarlyReturn
        };
        Some(self.signal(kind, NodeRef::Stmt(stmt)))
    }

    /// One signal per loop, however many writes it holds
    fn loop_signal(&self, stmt: &Stmt, body: &Block) -> Option<Signal> {
        let writes = block_descendants(body).any(|node| match node {
            NodeRef::Expr(expr) => client_call_verb(expr).is_some_and(is_write_verb),
            NodeRef::Stmt(_) => false,
        });
        writes.then(|| self.signal(SignalKind::LoopWrite, NodeRef::Stmt(stmt)))
    }
}
