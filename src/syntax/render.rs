//! Re-render syntax nodes as Go source text
//!
//! Used when the original bytes are not available. Output is single-spaced
//! and unindented; snippet normalisation collapses whitespace anyway.

use super::ast::{Block, CaseClause, Expr, ExprKind, Field, Stmt, StmtKind, TypeExpr};
use super::walk::NodeRef;
use std::fmt::Write;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RenderError {
    #[error("cannot render unrecognised node `{0}`")]
    Unsupported(String),
    #[error("formatting failed")]
    Fmt(#[from] std::fmt::Error),
}

type RenderResult = Result<(), RenderError>;

/// Render any node
pub fn render(node: NodeRef<'_>) -> Result<String, RenderError> {
    let mut out = String::new();
    match node {
        NodeRef::Stmt(stmt) => write_stmt(&mut out, stmt)?,
        NodeRef::Expr(expr) => write_expr(&mut out, expr)?,
    }
    Ok(out)
}

/// Render a type expression. Never fails.
pub fn render_type(ty: &TypeExpr) -> String {
    match ty {
        TypeExpr::Named(name) => name.clone(),
        TypeExpr::Qualified { package, name } => format!("{package}.{name}"),
        TypeExpr::Pointer(inner) => format!("*{}", render_type(inner)),
        TypeExpr::Generic { base, args } => {
            let args: Vec<String> = args.iter().map(render_type).collect();
            format!("{}[{}]", render_type(base), args.join(", "))
        }
        TypeExpr::Other(text) => text.clone(),
    }
}

fn write_list(out: &mut String, exprs: &[Expr]) -> RenderResult {
    for (i, expr) in exprs.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        write_expr(out, expr)?;
    }
    Ok(())
}

fn write_fields(out: &mut String, fields: &[Field]) -> RenderResult {
    out.push('(');
    for (i, field) in fields.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        if !field.names.is_empty() {
            write!(out, "{} ", field.names.join(", "))?;
        }
        if field.variadic {
            out.push_str("...");
        }
        out.push_str(&render_type(&field.ty));
    }
    out.push(')');
    Ok(())
}

fn write_expr(out: &mut String, expr: &Expr) -> RenderResult {
    match &expr.kind {
        ExprKind::Ident(name) => out.push_str(name),
        ExprKind::BasicLit(text) => out.push_str(text),
        ExprKind::Type(ty) => out.push_str(&render_type(ty)),
        ExprKind::Selector { operand, field } => {
            write_expr(out, operand)?;
            write!(out, ".{field}")?;
        }
        ExprKind::Call {
            function,
            args,
            spread,
        } => {
            write_expr(out, function)?;
            out.push('(');
            write_list(out, args)?;
            if *spread {
                out.push_str("...");
            }
            out.push(')');
        }
        ExprKind::Unary { op, operand } => {
            out.push_str(op);
            write_expr(out, operand)?;
        }
        ExprKind::Binary { left, op, right } => {
            write_expr(out, left)?;
            write!(out, " {op} ")?;
            write_expr(out, right)?;
        }
        ExprKind::Paren(inner) => {
            out.push('(');
            write_expr(out, inner)?;
            out.push(')');
        }
        ExprKind::Index { operand, indices } => {
            write_expr(out, operand)?;
            out.push('[');
            write_list(out, indices)?;
            out.push(']');
        }
        ExprKind::Slice {
            operand,
            start,
            end,
            capacity,
        } => {
            write_expr(out, operand)?;
            out.push('[');
            if let Some(start) = start {
                write_expr(out, start)?;
            }
            out.push(':');
            if let Some(end) = end {
                write_expr(out, end)?;
            }
            if let Some(capacity) = capacity {
                out.push(':');
                write_expr(out, capacity)?;
            }
            out.push(']');
        }
        ExprKind::TypeAssert { operand, ty } => {
            write_expr(out, operand)?;
            match ty {
                Some(ty) => write!(out, ".({})", render_type(ty))?,
                None => out.push_str(".(type)"),
            }
        }
        ExprKind::Composite { ty, elements } => {
            if let Some(ty) = ty {
                out.push_str(&render_type(ty));
            }
            out.push('{');
            write_list(out, elements)?;
            out.push('}');
        }
        ExprKind::KeyValue { key, value } => {
            write_expr(out, key)?;
            out.push_str(": ");
            write_expr(out, value)?;
        }
        ExprKind::FuncLit {
            params,
            results,
            body,
        } => {
            out.push_str("func");
            write_fields(out, params)?;
            match results.as_slice() {
                [] => {}
                [single] if single.names.is_empty() => {
                    write!(out, " {}", render_type(&single.ty))?;
                }
                _ => {
                    out.push(' ');
                    write_fields(out, results)?;
                }
            }
            out.push(' ');
            write_block(out, body)?;
        }
        ExprKind::Unknown { kind, .. } => return Err(RenderError::Unsupported(kind.clone())),
    }
    Ok(())
}

fn write_block(out: &mut String, block: &Block) -> RenderResult {
    out.push('{');
    for stmt in &block.stmts {
        out.push(' ');
        write_stmt(out, stmt)?;
    }
    out.push_str(" }");
    Ok(())
}

fn write_cases(out: &mut String, cases: &[CaseClause]) -> RenderResult {
    out.push('{');
    for case in cases {
        out.push(' ');
        match (&case.values, &case.comm) {
            (_, Some(comm)) => {
                out.push_str("case ");
                write_stmt(out, comm)?;
            }
            (Some(values), None) => {
                out.push_str("case ");
                write_list(out, values)?;
            }
            (None, None) => out.push_str("default"),
        }
        out.push(':');
        for stmt in &case.body {
            out.push(' ');
            write_stmt(out, stmt)?;
        }
    }
    out.push_str(" }");
    Ok(())
}

fn write_stmt(out: &mut String, stmt: &Stmt) -> RenderResult {
    match &stmt.kind {
        StmtKind::Expr(expr) => write_expr(out, expr)?,
        StmtKind::Assign { lhs, op, rhs } => {
            write_list(out, lhs)?;
            write!(out, " {op} ")?;
            write_list(out, rhs)?;
        }
        StmtKind::IncDec { operand, op } => {
            write_expr(out, operand)?;
            out.push_str(op);
        }
        StmtKind::Send { channel, value } => {
            write_expr(out, channel)?;
            out.push_str(" <- ");
            write_expr(out, value)?;
        }
        StmtKind::VarDecl {
            keyword,
            names,
            ty,
            values,
        } => {
            write!(out, "{keyword} {}", names.join(", "))?;
            if let Some(ty) = ty {
                write!(out, " {}", render_type(ty))?;
            }
            if !values.is_empty() {
                out.push_str(" = ");
                write_list(out, values)?;
            }
        }
        StmtKind::Return(results) => {
            out.push_str("return");
            if !results.is_empty() {
                out.push(' ');
                write_list(out, results)?;
            }
        }
        StmtKind::Go(expr) => {
            out.push_str("go ");
            write_expr(out, expr)?;
        }
        StmtKind::Defer(expr) => {
            out.push_str("defer ");
            write_expr(out, expr)?;
        }
        StmtKind::If(if_stmt) => {
            out.push_str("if ");
            if let Some(init) = &if_stmt.init {
                write_stmt(out, init)?;
                out.push_str("; ");
            }
            write_expr(out, &if_stmt.cond)?;
            out.push(' ');
            write_block(out, &if_stmt.body)?;
            if let Some(alt) = &if_stmt.alternative {
                out.push_str(" else ");
                write_stmt(out, alt)?;
            }
        }
        StmtKind::For(for_stmt) => {
            out.push_str("for ");
            let three_clause = for_stmt.init.is_some() || for_stmt.post.is_some();
            if three_clause {
                if let Some(init) = &for_stmt.init {
                    write_stmt(out, init)?;
                }
                out.push_str("; ");
                if let Some(cond) = &for_stmt.cond {
                    write_expr(out, cond)?;
                }
                out.push_str("; ");
                if let Some(post) = &for_stmt.post {
                    write_stmt(out, post)?;
                }
                out.push(' ');
            } else if let Some(cond) = &for_stmt.cond {
                write_expr(out, cond)?;
                out.push(' ');
            }
            write_block(out, &for_stmt.body)?;
        }
        StmtKind::Range(range) => {
            out.push_str("for ");
            if let Some(key) = &range.key {
                write_expr(out, key)?;
                if let Some(value) = &range.value {
                    out.push_str(", ");
                    write_expr(out, value)?;
                }
                write!(out, " {} ", range.op)?;
            }
            out.push_str("range ");
            write_expr(out, &range.iterable)?;
            out.push(' ');
            write_block(out, &range.body)?;
        }
        StmtKind::Switch(switch) => {
            out.push_str("switch ");
            if let Some(init) = &switch.init {
                write_stmt(out, init)?;
                out.push_str("; ");
            }
            if let Some(binding) = &switch.binding {
                write!(out, "{binding} := ")?;
            }
            if let Some(tag) = &switch.tag {
                write_expr(out, tag)?;
                if switch.type_switch {
                    out.push_str(".(type)");
                }
                out.push(' ');
            }
            write_cases(out, &switch.cases)?;
        }
        StmtKind::Select(cases) => {
            out.push_str("select ");
            write_cases(out, cases)?;
        }
        StmtKind::Block(block) => write_block(out, block)?,
        StmtKind::Labeled { label, stmt } => {
            write!(out, "{label}:")?;
            if let Some(stmt) = stmt {
                out.push(' ');
                write_stmt(out, stmt)?;
            }
        }
        StmtKind::Branch { keyword, label } => {
            out.push_str(keyword);
            if let Some(label) = label {
                write!(out, " {label}")?;
            }
        }
        StmtKind::Empty => {}
        StmtKind::Unknown(kind) => return Err(RenderError::Unsupported(kind.clone())),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::ast::Span;

    fn expr(kind: ExprKind) -> Expr {
        Expr {
            span: Span::default(),
            kind,
        }
    }

    fn ident(name: &str) -> Expr {
        expr(ExprKind::Ident(name.into()))
    }

    #[test]
    fn test_render_call() {
        let call = expr(ExprKind::Call {
            function: Box::new(expr(ExprKind::Selector {
                operand: Box::new(ident("r")),
                field: "Get".into(),
            })),
            args: vec![
                ident("ctx"),
                expr(ExprKind::Selector {
                    operand: Box::new(ident("req")),
                    field: "NamespacedName".into(),
                }),
                expr(ExprKind::Unary {
                    op: "&".into(),
                    operand: Box::new(ident("obj")),
                }),
            ],
            spread: false,
        });
        assert_eq!(
            render(NodeRef::Expr(&call)).unwrap(),
            "r.Get(ctx, req.NamespacedName, &obj)"
        );
    }

    #[test]
    fn test_render_return_composite() {
        let ret = Stmt {
            span: Span::default(),
            kind: StmtKind::Return(vec![
                expr(ExprKind::Composite {
                    ty: Some(TypeExpr::Qualified {
                        package: "ctrl".into(),
                        name: "Result".into(),
                    }),
                    elements: vec![],
                }),
                ident("nil"),
            ]),
        };
        assert_eq!(render(NodeRef::Stmt(&ret)).unwrap(), "return ctrl.Result{}, nil");
    }

    #[test]
    fn test_render_unknown_fails() {
        let odd = expr(ExprKind::Unknown {
            kind: "ERROR".into(),
            children: vec![],
        });
        assert_eq!(
            render(NodeRef::Expr(&odd)),
            Err(RenderError::Unsupported("ERROR".into()))
        );
    }

    #[test]
    fn test_render_pointer_generic_type() {
        let ty = TypeExpr::Pointer(Box::new(TypeExpr::Generic {
            base: Box::new(TypeExpr::Named("Reconciler".into())),
            args: vec![TypeExpr::Named("T".into())],
        }));
        assert_eq!(render_type(&ty), "*Reconciler[T]");
    }
}
