//! Borrowed node references and pre-order traversal
//!
//! Children are yielded in the same order as Go's `ast.Inspect`, so the
//! emission order of anything built on `descendants()` matches a reader's
//! top-to-bottom view of the function.

use super::ast::{Block, CaseClause, Expr, ExprKind, Span, Stmt, StmtKind};

/// A statement or expression inside a function body
#[derive(Debug, Clone, Copy)]
pub enum NodeRef<'a> {
    Stmt(&'a Stmt),
    Expr(&'a Expr),
}

impl<'a> NodeRef<'a> {
    pub fn span(self) -> Span {
        match self {
            NodeRef::Stmt(stmt) => stmt.span,
            NodeRef::Expr(expr) => expr.span,
        }
    }

    /// Direct children in source order
    pub fn children(self) -> Vec<NodeRef<'a>> {
        let mut out = Vec::new();
        match self {
            NodeRef::Stmt(stmt) => stmt_children(stmt, &mut out),
            NodeRef::Expr(expr) => expr_children(expr, &mut out),
        }
        out
    }

    /// Pre-order iterator over this node and everything below it
    pub fn descendants(self) -> Descendants<'a> {
        Descendants { stack: vec![self] }
    }
}

/// Pre-order iterator over every node of a block, the block itself excluded
pub fn block_descendants(block: &Block) -> Descendants<'_> {
    Descendants {
        stack: block.stmts.iter().rev().map(NodeRef::Stmt).collect(),
    }
}

pub struct Descendants<'a> {
    stack: Vec<NodeRef<'a>>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = NodeRef<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        let children = node.children();
        self.stack.extend(children.into_iter().rev());
        Some(node)
    }
}

fn push_block<'a>(block: &'a Block, out: &mut Vec<NodeRef<'a>>) {
    out.extend(block.stmts.iter().map(NodeRef::Stmt));
}

fn push_boxed_stmt<'a>(stmt: &'a Option<Box<Stmt>>, out: &mut Vec<NodeRef<'a>>) {
    if let Some(stmt) = stmt {
        out.push(NodeRef::Stmt(stmt));
    }
}

fn push_cases<'a>(cases: &'a [CaseClause], out: &mut Vec<NodeRef<'a>>) {
    for case in cases {
        if let Some(values) = &case.values {
            out.extend(values.iter().map(NodeRef::Expr));
        }
        push_boxed_stmt(&case.comm, out);
        out.extend(case.body.iter().map(NodeRef::Stmt));
    }
}

fn stmt_children<'a>(stmt: &'a Stmt, out: &mut Vec<NodeRef<'a>>) {
    match &stmt.kind {
        StmtKind::Expr(expr) | StmtKind::Go(expr) | StmtKind::Defer(expr) => {
            out.push(NodeRef::Expr(expr))
        }
        StmtKind::Assign { lhs, rhs, .. } => {
            out.extend(lhs.iter().map(NodeRef::Expr));
            out.extend(rhs.iter().map(NodeRef::Expr));
        }
        StmtKind::IncDec { operand, .. } => out.push(NodeRef::Expr(operand)),
        StmtKind::Send { channel, value } => {
            out.push(NodeRef::Expr(channel));
            out.push(NodeRef::Expr(value));
        }
        StmtKind::VarDecl { values, .. } => out.extend(values.iter().map(NodeRef::Expr)),
        StmtKind::Return(results) => out.extend(results.iter().map(NodeRef::Expr)),
        StmtKind::If(if_stmt) => {
            push_boxed_stmt(&if_stmt.init, out);
            out.push(NodeRef::Expr(&if_stmt.cond));
            push_block(&if_stmt.body, out);
            push_boxed_stmt(&if_stmt.alternative, out);
        }
        StmtKind::For(for_stmt) => {
            push_boxed_stmt(&for_stmt.init, out);
            if let Some(cond) = &for_stmt.cond {
                out.push(NodeRef::Expr(cond));
            }
            push_boxed_stmt(&for_stmt.post, out);
            push_block(&for_stmt.body, out);
        }
        StmtKind::Range(range) => {
            if let Some(key) = &range.key {
                out.push(NodeRef::Expr(key));
            }
            if let Some(value) = &range.value {
                out.push(NodeRef::Expr(value));
            }
            out.push(NodeRef::Expr(&range.iterable));
            push_block(&range.body, out);
        }
        StmtKind::Switch(switch) => {
            push_boxed_stmt(&switch.init, out);
            if let Some(tag) = &switch.tag {
                out.push(NodeRef::Expr(tag));
            }
            push_cases(&switch.cases, out);
        }
        StmtKind::Select(cases) => push_cases(cases, out),
        StmtKind::Block(block) => push_block(block, out),
        StmtKind::Labeled { stmt, .. } => push_boxed_stmt(stmt, out),
        StmtKind::Branch { .. } | StmtKind::Empty | StmtKind::Unknown(_) => {}
    }
}

fn expr_children<'a>(expr: &'a Expr, out: &mut Vec<NodeRef<'a>>) {
    match &expr.kind {
        ExprKind::Ident(_) | ExprKind::BasicLit(_) | ExprKind::Type(_) => {}
        ExprKind::Selector { operand, .. } => out.push(NodeRef::Expr(operand)),
        ExprKind::Call { function, args, .. } => {
            out.push(NodeRef::Expr(function));
            out.extend(args.iter().map(NodeRef::Expr));
        }
        ExprKind::Unary { operand, .. } | ExprKind::Paren(operand) => {
            out.push(NodeRef::Expr(operand))
        }
        ExprKind::TypeAssert { operand, .. } => out.push(NodeRef::Expr(operand)),
        ExprKind::Binary { left, right, .. } => {
            out.push(NodeRef::Expr(left));
            out.push(NodeRef::Expr(right));
        }
        ExprKind::Index { operand, indices } => {
            out.push(NodeRef::Expr(operand));
            out.extend(indices.iter().map(NodeRef::Expr));
        }
        ExprKind::Slice {
            operand,
            start,
            end,
            capacity,
        } => {
            out.push(NodeRef::Expr(operand));
            for bound in [start, end, capacity].into_iter().flatten() {
                out.push(NodeRef::Expr(bound));
            }
        }
        ExprKind::Composite { elements, .. } => out.extend(elements.iter().map(NodeRef::Expr)),
        ExprKind::KeyValue { key, value } => {
            out.push(NodeRef::Expr(key));
            out.push(NodeRef::Expr(value));
        }
        ExprKind::FuncLit { body, .. } => push_block(body, out),
        ExprKind::Unknown { children, .. } => out.extend(children.iter().map(NodeRef::Expr)),
    }
}
