//! Go parser using tree-sitter
//!
//! Parses Go source and lowers the concrete syntax tree into the owned
//! `syntax::ast` model: package clause, imports, file-level type
//! declarations and every function/method declaration with its body.

use crate::syntax::ast::{
    Block, CaseClause, Expr, ExprKind, Field, ForStmt, FuncDecl, IfStmt, Import, RangeStmt,
    SourceFile, Span, Stmt, StmtKind, SwitchStmt, TypeDecl, TypeExpr,
};
use anyhow::{bail, Context, Result};
use std::path::Path;
use tree_sitter::{Node, Parser};

/// Parse a Go file from disk. `rel_path` is what gets recorded on the result.
pub fn parse(path: &Path, rel_path: &Path) -> Result<SourceFile> {
    let source = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read file: {}", path.display()))?;

    parse_source(&source, rel_path)
}

/// Parse Go source code directly (useful for testing)
pub fn parse_source(source: &str, path: &Path) -> Result<SourceFile> {
    let mut parser = Parser::new();
    let language = tree_sitter_go::LANGUAGE;
    parser
        .set_language(&language.into())
        .context("Failed to set Go language")?;

    let tree = parser
        .parse(source, None)
        .context("Failed to parse Go source")?;

    let root = tree.root_node();
    if exceeds_depth(root, MAX_SYNTAX_DEPTH) {
        bail!(
            "{}: syntax nested deeper than {} levels",
            path.display(),
            MAX_SYNTAX_DEPTH
        );
    }

    let lower = Lowerer {
        src: source.as_bytes(),
    };

    let mut file = SourceFile {
        path: path.to_path_buf(),
        source: Some(source.to_string()),
        ..Default::default()
    };

    for child in named_children(root) {
        match child.kind() {
            "package_clause" => {
                if let Some(name) = named_children(child).first() {
                    file.package = lower.text(*name);
                }
            }
            "import_declaration" => lower.imports(child, &mut file.imports),
            "type_declaration" => lower.type_decls(child, &mut file.type_decls),
            "function_declaration" | "method_declaration" => {
                file.funcs.push(lower.func_decl(child))
            }
            _ => {}
        }
    }

    Ok(file)
}

/// Lowering and rendering recurse once per syntax level; trees deeper than
/// this are rejected up front.
pub const MAX_SYNTAX_DEPTH: usize = 256;

/// Whether any node sits more than `limit` levels below `root`.
/// Walks with a cursor so the check itself does not recurse.
fn exceeds_depth(root: Node<'_>, limit: usize) -> bool {
    let mut cursor = root.walk();
    let mut depth = 0usize;
    loop {
        if cursor.goto_first_child() {
            depth += 1;
            if depth > limit {
                return true;
            }
            continue;
        }
        loop {
            if cursor.goto_next_sibling() {
                break;
            }
            if !cursor.goto_parent() {
                return false;
            }
            depth -= 1;
        }
    }
}

/// Named children minus comments
fn named_children<'t>(node: Node<'t>) -> Vec<Node<'t>> {
    let mut cursor = node.walk();
    node.named_children(&mut cursor)
        .filter(|c| c.kind() != "comment")
        .collect()
}

fn field_children<'t>(node: Node<'t>, field: &str) -> Vec<Node<'t>> {
    let mut cursor = node.walk();
    node.children_by_field_name(field, &mut cursor).collect()
}

fn has_token(node: Node<'_>, token: &str) -> bool {
    let mut cursor = node.walk();
    let found = node
        .children(&mut cursor)
        .any(|c| !c.is_named() && c.kind() == token);
    found
}

fn span(node: Node<'_>) -> Span {
    Span {
        start_byte: node.start_byte(),
        end_byte: node.end_byte(),
        start_line: node.start_position().row as u32 + 1,
        end_line: node.end_position().row as u32 + 1,
    }
}

const TYPE_KINDS: &[&str] = &[
    "type_identifier",
    "qualified_type",
    "pointer_type",
    "generic_type",
    "slice_type",
    "array_type",
    "implicit_length_array_type",
    "map_type",
    "channel_type",
    "function_type",
    "struct_type",
    "interface_type",
    "parenthesized_type",
    "negated_type",
];

struct Lowerer<'s> {
    src: &'s [u8],
}

impl<'s> Lowerer<'s> {
    fn text(&self, node: Node<'_>) -> String {
        node.utf8_text(self.src).unwrap_or("").to_string()
    }

    // ---- declarations -------------------------------------------------

    fn imports(&self, node: Node<'_>, out: &mut Vec<Import>) {
        for child in named_children(node) {
            match child.kind() {
                "import_spec" => {
                    let Some(path) = child.child_by_field_name("path") else {
                        continue;
                    };
                    let path = self
                        .text(path)
                        .trim_matches(|c| c == '"' || c == '`')
                        .to_string();
                    if path.is_empty() {
                        continue;
                    }
                    let alias = child.child_by_field_name("name").map(|n| self.text(n));
                    out.push(Import { alias, path });
                }
                "import_spec_list" => self.imports(child, out),
                _ => {}
            }
        }
    }

    fn type_decls(&self, node: Node<'_>, out: &mut Vec<TypeDecl>) {
        for child in named_children(node) {
            let alias = match child.kind() {
                "type_spec" => false,
                "type_alias" => true,
                _ => continue,
            };
            let (Some(name), Some(ty)) = (
                child.child_by_field_name("name"),
                child.child_by_field_name("type"),
            ) else {
                continue;
            };
            out.push(TypeDecl {
                name: self.text(name),
                ty: self.type_expr(ty),
                alias,
            });
        }
    }

    fn func_decl(&self, node: Node<'_>) -> FuncDecl {
        let name = node
            .child_by_field_name("name")
            .map(|n| self.text(n))
            .unwrap_or_default();
        let receiver = node
            .child_by_field_name("receiver")
            .map(|n| self.fields(n))
            .unwrap_or_default();
        let params = node
            .child_by_field_name("parameters")
            .map(|n| self.fields(n))
            .unwrap_or_default();
        let results = self.results(node);
        let body = node.child_by_field_name("body").map(|b| self.block(b));

        FuncDecl {
            name,
            receiver,
            params,
            results,
            body,
            span: span(node),
        }
    }

    /// Result list: either a parenthesised field list or one bare type
    fn results(&self, node: Node<'_>) -> Vec<Field> {
        match node.child_by_field_name("result") {
            Some(list) if list.kind() == "parameter_list" => self.fields(list),
            Some(ty) => vec![Field {
                names: vec![],
                ty: self.type_expr(ty),
                variadic: false,
            }],
            None => vec![],
        }
    }

    fn fields(&self, list: Node<'_>) -> Vec<Field> {
        let mut fields = Vec::new();
        for child in named_children(list) {
            let variadic = match child.kind() {
                "parameter_declaration" => false,
                "variadic_parameter_declaration" => true,
                _ => continue,
            };
            let names = field_children(child, "name")
                .into_iter()
                .map(|n| self.text(n))
                .collect();
            let ty = child
                .child_by_field_name("type")
                .map(|t| self.type_expr(t))
                .unwrap_or_else(|| TypeExpr::Other(String::new()));
            fields.push(Field {
                names,
                ty,
                variadic,
            });
        }
        fields
    }

    fn type_expr(&self, node: Node<'_>) -> TypeExpr {
        match node.kind() {
            "type_identifier" | "identifier" => TypeExpr::Named(self.text(node)),
            "qualified_type" => {
                match (
                    node.child_by_field_name("package"),
                    node.child_by_field_name("name"),
                ) {
                    (Some(package), Some(name)) => TypeExpr::Qualified {
                        package: self.text(package),
                        name: self.text(name),
                    },
                    _ => TypeExpr::Other(self.text(node)),
                }
            }
            "pointer_type" => match named_children(node).first() {
                Some(inner) => TypeExpr::Pointer(Box::new(self.type_expr(*inner))),
                None => TypeExpr::Other(self.text(node)),
            },
            "generic_type" => {
                let Some(base) = node.child_by_field_name("type") else {
                    return TypeExpr::Other(self.text(node));
                };
                let args = node
                    .child_by_field_name("type_arguments")
                    .map(|list| {
                        named_children(list)
                            .into_iter()
                            .map(|arg| self.type_arg(arg))
                            .collect()
                    })
                    .unwrap_or_default();
                TypeExpr::Generic {
                    base: Box::new(self.type_expr(base)),
                    args,
                }
            }
            "parenthesized_type" => match named_children(node).first() {
                Some(inner) => self.type_expr(*inner),
                None => TypeExpr::Other(self.text(node)),
            },
            _ => TypeExpr::Other(self.text(node)),
        }
    }

    /// Type arguments may be wrapped in `type_elem` depending on grammar version
    fn type_arg(&self, node: Node<'_>) -> TypeExpr {
        if node.kind() == "type_elem" {
            let inner = named_children(node);
            if let [single] = inner.as_slice() {
                return self.type_expr(*single);
            }
            return TypeExpr::Other(self.text(node));
        }
        self.type_expr(node)
    }

    // ---- statements ---------------------------------------------------

    fn block(&self, node: Node<'_>) -> Block {
        Block {
            span: span(node),
            stmts: self.stmt_list(node, &[]),
        }
    }

    /// Statements among `node`'s named children, flattening `statement_list`
    /// wrappers and skipping the nodes whose ids are listed in `skip`.
    fn stmt_list(&self, node: Node<'_>, skip: &[usize]) -> Vec<Stmt> {
        let mut stmts = Vec::new();
        for child in named_children(node) {
            if skip.contains(&child.id()) {
                continue;
            }
            if child.kind() == "statement_list" {
                stmts.extend(self.stmt_list(child, &[]));
            } else {
                stmts.push(self.stmt(child));
            }
        }
        stmts
    }

    fn boxed_stmt(&self, node: Option<Node<'_>>) -> Option<Box<Stmt>> {
        node.map(|n| Box::new(self.stmt(n)))
    }

    fn stmt(&self, node: Node<'_>) -> Stmt {
        let kind = match node.kind() {
            "expression_statement" => match named_children(node).first() {
                Some(inner) => StmtKind::Expr(self.expr(*inner)),
                None => StmtKind::Empty,
            },
            "short_var_declaration" => StmtKind::Assign {
                lhs: self.expr_list(node.child_by_field_name("left")),
                op: ":=".to_string(),
                rhs: self.expr_list(node.child_by_field_name("right")),
            },
            "assignment_statement" => StmtKind::Assign {
                lhs: self.expr_list(node.child_by_field_name("left")),
                op: node
                    .child_by_field_name("operator")
                    .map(|op| self.text(op))
                    .unwrap_or_else(|| "=".to_string()),
                rhs: self.expr_list(node.child_by_field_name("right")),
            },
            "inc_statement" | "dec_statement" => match named_children(node).first() {
                Some(operand) => StmtKind::IncDec {
                    operand: self.expr(*operand),
                    op: if node.kind() == "inc_statement" { "++" } else { "--" }.to_string(),
                },
                None => StmtKind::Unknown(node.kind().to_string()),
            },
            "send_statement" => match (
                node.child_by_field_name("channel"),
                node.child_by_field_name("value"),
            ) {
                (Some(channel), Some(value)) => StmtKind::Send {
                    channel: self.expr(channel),
                    value: self.expr(value),
                },
                _ => StmtKind::Unknown(node.kind().to_string()),
            },
            "receive_statement" => {
                let rhs: Vec<Expr> = node
                    .child_by_field_name("right")
                    .map(|r| vec![self.expr(r)])
                    .unwrap_or_default();
                match node.child_by_field_name("left") {
                    Some(left) => StmtKind::Assign {
                        lhs: self.expr_list(Some(left)),
                        op: if has_token(node, ":=") { ":=" } else { "=" }.to_string(),
                        rhs,
                    },
                    None => match rhs.into_iter().next() {
                        Some(expr) => StmtKind::Expr(expr),
                        None => StmtKind::Unknown(node.kind().to_string()),
                    },
                }
            }
            "var_declaration" | "const_declaration" => self.var_decl(node),
            "return_statement" => {
                let results = match named_children(node).first() {
                    Some(list) if list.kind() == "expression_list" => self.expr_list(Some(*list)),
                    Some(single) => vec![self.expr(*single)],
                    None => vec![],
                };
                StmtKind::Return(results)
            }
            "go_statement" | "defer_statement" => match named_children(node).first() {
                Some(call) if node.kind() == "go_statement" => StmtKind::Go(self.expr(*call)),
                Some(call) => StmtKind::Defer(self.expr(*call)),
                None => StmtKind::Unknown(node.kind().to_string()),
            },
            "if_statement" => self.if_stmt(node),
            "for_statement" => self.for_stmt(node),
            "expression_switch_statement" => self.expression_switch(node),
            "type_switch_statement" => self.type_switch(node),
            "select_statement" => StmtKind::Select(
                named_children(node)
                    .into_iter()
                    .filter(|c| matches!(c.kind(), "communication_case" | "default_case"))
                    .map(|c| self.case_clause(c))
                    .collect(),
            ),
            "block" => StmtKind::Block(self.block(node)),
            "labeled_statement" => {
                let label = node.child_by_field_name("label");
                let inner = named_children(node)
                    .into_iter()
                    .find(|c| Some(c.id()) != label.map(|l| l.id()));
                StmtKind::Labeled {
                    label: label.map(|l| self.text(l)).unwrap_or_default(),
                    stmt: self.boxed_stmt(inner),
                }
            }
            "break_statement" | "continue_statement" | "goto_statement"
            | "fallthrough_statement" => StmtKind::Branch {
                keyword: node.kind().trim_end_matches("_statement").to_string(),
                label: named_children(node).first().map(|l| self.text(*l)),
            },
            "empty_statement" => StmtKind::Empty,
            "type_declaration" => StmtKind::Unknown(node.kind().to_string()),
            // error recovery and bare expressions: keep whatever is inside
            _ => StmtKind::Expr(self.expr(node)),
        };

        Stmt {
            span: span(node),
            kind,
        }
    }

    fn var_decl(&self, node: Node<'_>) -> StmtKind {
        let keyword = if node.kind() == "const_declaration" {
            "const"
        } else {
            "var"
        };
        let mut names = Vec::new();
        let mut ty = None;
        let mut values = Vec::new();
        let mut specs = named_children(node);
        while let Some(spec) = specs.pop() {
            match spec.kind() {
                "var_spec_list" => specs.extend(named_children(spec)),
                "var_spec" | "const_spec" => {
                    names.splice(
                        0..0,
                        field_children(spec, "name").into_iter().map(|n| self.text(n)),
                    );
                    if let Some(t) = spec.child_by_field_name("type") {
                        ty = Some(self.type_expr(t));
                    }
                    let spec_values = self.expr_list(spec.child_by_field_name("value"));
                    values.splice(0..0, spec_values);
                }
                _ => {}
            }
        }
        StmtKind::VarDecl {
            keyword: keyword.to_string(),
            names,
            ty,
            values,
        }
    }

    fn if_stmt(&self, node: Node<'_>) -> StmtKind {
        let cond = match node.child_by_field_name("condition") {
            Some(cond) => self.expr(cond),
            None => return StmtKind::Unknown(node.kind().to_string()),
        };
        StmtKind::If(IfStmt {
            init: self.boxed_stmt(node.child_by_field_name("initializer")),
            cond,
            body: node
                .child_by_field_name("consequence")
                .map(|b| self.block(b))
                .unwrap_or_default(),
            alternative: self.boxed_stmt(node.child_by_field_name("alternative")),
        })
    }

    fn for_stmt(&self, node: Node<'_>) -> StmtKind {
        let body_node = node.child_by_field_name("body");
        let body = body_node.map(|b| self.block(b)).unwrap_or_default();
        let header = named_children(node)
            .into_iter()
            .find(|c| Some(c.id()) != body_node.map(|b| b.id()));

        match header {
            Some(clause) if clause.kind() == "range_clause" => {
                let left = self.expr_list(clause.child_by_field_name("left"));
                let mut left = left.into_iter();
                let op = if has_token(clause, ":=") {
                    ":="
                } else if has_token(clause, "=") {
                    "="
                } else {
                    ""
                };
                let Some(iterable) = clause.child_by_field_name("right") else {
                    return StmtKind::Unknown(clause.kind().to_string());
                };
                StmtKind::Range(RangeStmt {
                    key: left.next(),
                    value: left.next(),
                    op: op.to_string(),
                    iterable: self.expr(iterable),
                    body,
                })
            }
            Some(clause) if clause.kind() == "for_clause" => StmtKind::For(ForStmt {
                init: self.boxed_stmt(clause.child_by_field_name("initializer")),
                cond: clause.child_by_field_name("condition").map(|c| self.expr(c)),
                post: self.boxed_stmt(clause.child_by_field_name("update")),
                body,
            }),
            Some(cond) => StmtKind::For(ForStmt {
                init: None,
                cond: Some(self.expr(cond)),
                post: None,
                body,
            }),
            None => StmtKind::For(ForStmt {
                init: None,
                cond: None,
                post: None,
                body,
            }),
        }
    }

    fn expression_switch(&self, node: Node<'_>) -> StmtKind {
        StmtKind::Switch(SwitchStmt {
            init: self.boxed_stmt(node.child_by_field_name("initializer")),
            binding: None,
            tag: node.child_by_field_name("value").map(|v| self.expr(v)),
            type_switch: false,
            cases: named_children(node)
                .into_iter()
                .filter(|c| matches!(c.kind(), "expression_case" | "default_case"))
                .map(|c| self.case_clause(c))
                .collect(),
        })
    }

    fn type_switch(&self, node: Node<'_>) -> StmtKind {
        StmtKind::Switch(SwitchStmt {
            init: self.boxed_stmt(node.child_by_field_name("initializer")),
            binding: node.child_by_field_name("alias").map(|a| self.text(a)),
            tag: node.child_by_field_name("value").map(|v| self.expr(v)),
            type_switch: true,
            cases: named_children(node)
                .into_iter()
                .filter(|c| matches!(c.kind(), "type_case" | "default_case"))
                .map(|c| self.case_clause(c))
                .collect(),
        })
    }

    fn case_clause(&self, node: Node<'_>) -> CaseClause {
        let mut skip = Vec::new();
        let mut values = None;
        let mut comm = None;

        match node.kind() {
            "expression_case" => {
                if let Some(list) = node.child_by_field_name("value") {
                    skip.push(list.id());
                    values = Some(self.expr_list(Some(list)));
                }
            }
            "type_case" => {
                let types = field_children(node, "type");
                skip.extend(types.iter().map(|t| t.id()));
                values = Some(
                    types
                        .into_iter()
                        .map(|t| Expr {
                            span: span(t),
                            kind: ExprKind::Type(self.type_expr(t)),
                        })
                        .collect(),
                );
            }
            "communication_case" => {
                if let Some(c) = node.child_by_field_name("communication") {
                    skip.push(c.id());
                    comm = Some(Box::new(self.stmt(c)));
                }
            }
            _ => {}
        }

        CaseClause {
            span: span(node),
            values,
            comm,
            body: self.stmt_list(node, &skip),
        }
    }

    // ---- expressions --------------------------------------------------

    fn expr_list(&self, node: Option<Node<'_>>) -> Vec<Expr> {
        match node {
            Some(list) if list.kind() == "expression_list" => named_children(list)
                .into_iter()
                .map(|e| self.expr(e))
                .collect(),
            Some(single) => vec![self.expr(single)],
            None => vec![],
        }
    }

    fn boxed(&self, node: Option<Node<'_>>) -> Option<Box<Expr>> {
        node.map(|n| Box::new(self.expr(n)))
    }

    fn unknown(&self, node: Node<'_>) -> ExprKind {
        ExprKind::Unknown {
            kind: node.kind().to_string(),
            children: named_children(node)
                .into_iter()
                .map(|c| self.expr(c))
                .collect(),
        }
    }

    fn expr(&self, node: Node<'_>) -> Expr {
        let kind = match node.kind() {
            "identifier" | "field_identifier" | "package_identifier" | "nil" | "true"
            | "false" | "iota" | "blank_identifier" => ExprKind::Ident(self.text(node)),
            "int_literal" | "float_literal" | "imaginary_literal" | "rune_literal"
            | "interpreted_string_literal" | "raw_string_literal" => {
                ExprKind::BasicLit(self.text(node))
            }
            "selector_expression" => match (
                node.child_by_field_name("operand"),
                node.child_by_field_name("field"),
            ) {
                (Some(operand), Some(field)) => ExprKind::Selector {
                    operand: Box::new(self.expr(operand)),
                    field: self.text(field),
                },
                _ => self.unknown(node),
            },
            "call_expression" => match node.child_by_field_name("function") {
                Some(function) => {
                    let arguments = node.child_by_field_name("arguments");
                    ExprKind::Call {
                        function: Box::new(self.expr(function)),
                        args: arguments
                            .map(|list| {
                                named_children(list)
                                    .into_iter()
                                    .map(|a| self.expr(a))
                                    .collect()
                            })
                            .unwrap_or_default(),
                        spread: arguments.is_some_and(|list| has_token(list, "...")),
                    }
                }
                None => self.unknown(node),
            },
            "unary_expression" => match node.child_by_field_name("operand") {
                Some(operand) => ExprKind::Unary {
                    op: node
                        .child_by_field_name("operator")
                        .map(|op| self.text(op))
                        .unwrap_or_default(),
                    operand: Box::new(self.expr(operand)),
                },
                None => self.unknown(node),
            },
            "binary_expression" => match (
                node.child_by_field_name("left"),
                node.child_by_field_name("right"),
            ) {
                (Some(left), Some(right)) => ExprKind::Binary {
                    left: Box::new(self.expr(left)),
                    op: node
                        .child_by_field_name("operator")
                        .map(|op| self.text(op))
                        .unwrap_or_default(),
                    right: Box::new(self.expr(right)),
                },
                _ => self.unknown(node),
            },
            "parenthesized_expression" => match named_children(node).first() {
                Some(inner) => ExprKind::Paren(Box::new(self.expr(*inner))),
                None => self.unknown(node),
            },
            "index_expression" => match node.child_by_field_name("operand") {
                Some(operand) => ExprKind::Index {
                    operand: Box::new(self.expr(operand)),
                    indices: field_children(node, "index")
                        .into_iter()
                        .map(|i| self.expr(i))
                        .collect(),
                },
                None => self.unknown(node),
            },
            "slice_expression" => match node.child_by_field_name("operand") {
                Some(operand) => ExprKind::Slice {
                    operand: Box::new(self.expr(operand)),
                    start: self.boxed(node.child_by_field_name("start")),
                    end: self.boxed(node.child_by_field_name("end")),
                    capacity: self.boxed(node.child_by_field_name("capacity")),
                },
                None => self.unknown(node),
            },
            "type_assertion_expression" => match node.child_by_field_name("operand") {
                Some(operand) => ExprKind::TypeAssert {
                    operand: Box::new(self.expr(operand)),
                    ty: node.child_by_field_name("type").map(|t| self.type_expr(t)),
                },
                None => self.unknown(node),
            },
            "type_conversion_expression" => match (
                node.child_by_field_name("type"),
                node.child_by_field_name("operand"),
            ) {
                (Some(ty), Some(operand)) => ExprKind::Call {
                    function: Box::new(Expr {
                        span: span(ty),
                        kind: ExprKind::Type(self.type_expr(ty)),
                    }),
                    args: vec![self.expr(operand)],
                    spread: false,
                },
                _ => self.unknown(node),
            },
            "composite_literal" => ExprKind::Composite {
                ty: node.child_by_field_name("type").map(|t| self.type_expr(t)),
                elements: node
                    .child_by_field_name("body")
                    .map(|body| self.literal_elements(body))
                    .unwrap_or_default(),
            },
            "literal_value" => ExprKind::Composite {
                ty: None,
                elements: self.literal_elements(node),
            },
            "literal_element" => match named_children(node).first() {
                Some(inner) => return self.expr(*inner),
                None => self.unknown(node),
            },
            "keyed_element" => {
                let parts = named_children(node);
                match parts.as_slice() {
                    [key, value] => ExprKind::KeyValue {
                        key: Box::new(self.expr(*key)),
                        value: Box::new(self.expr(*value)),
                    },
                    _ => self.unknown(node),
                }
            }
            "func_literal" => ExprKind::FuncLit {
                params: node
                    .child_by_field_name("parameters")
                    .map(|p| self.fields(p))
                    .unwrap_or_default(),
                results: self.results(node),
                body: node
                    .child_by_field_name("body")
                    .map(|b| self.block(b))
                    .unwrap_or_default(),
            },
            kind if TYPE_KINDS.contains(&kind) => ExprKind::Type(self.type_expr(node)),
            _ => self.unknown(node),
        };

        Expr {
            span: span(node),
            kind,
        }
    }

    fn literal_elements(&self, body: Node<'_>) -> Vec<Expr> {
        named_children(body)
            .into_iter()
            .map(|e| self.expr(e))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    const RECONCILER: &str = r#"
package controllers

import (
    "context"

    apierrors "k8s.io/apimachinery/pkg/api/errors"
    ctrl "sigs.k8s.io/controller-runtime"
)

type Req = ctrl.Request

type FooReconciler struct {
    Client client.Client
}

// Reconcile does the thing.
func (r *FooReconciler) Reconcile(ctx context.Context, req ctrl.Request) (ctrl.Result, error) {
    var foo Foo
    if err := r.Client.Get(ctx, req.NamespacedName, &foo); err != nil {
        if apierrors.IsNotFound(err) {
            return ctrl.Result{}, nil
        }
        return ctrl.Result{}, err
    }
    for _, item := range foo.Items {
        r.Client.Update(ctx, &item)
    }
    return ctrl.Result{}, nil
}

func helper(a, b int) int {
    return a + b
}
"#;

    fn parse(src: &str) -> SourceFile {
        parse_source(src, &PathBuf::from("foo_controller.go")).expect("should parse Go source")
    }

    #[test]
    fn test_package_and_imports() {
        let file = parse(RECONCILER);
        assert_eq!(file.package, "controllers");
        assert_eq!(file.imports.len(), 3);
        assert_eq!(file.imports[0].path, "context");
        assert_eq!(file.imports[0].alias, None);
        assert_eq!(file.imports[2].alias.as_deref(), Some("ctrl"));
        assert_eq!(
            file.import_for("apierrors").map(|i| i.path.as_str()),
            Some("k8s.io/apimachinery/pkg/api/errors")
        );
    }

    #[test]
    fn test_type_decls() {
        let file = parse(RECONCILER);
        let alias = file
            .type_decls
            .iter()
            .find(|d| d.name == "Req")
            .expect("alias declared");
        assert!(alias.alias);
        assert_eq!(
            alias.ty,
            TypeExpr::Qualified {
                package: "ctrl".into(),
                name: "Request".into()
            }
        );
        assert!(file.type_decls.iter().any(|d| d.name == "FooReconciler" && !d.alias));
    }

    #[test]
    fn test_method_signature() {
        let file = parse(RECONCILER);
        let rec = file
            .funcs
            .iter()
            .find(|f| f.name == "Reconcile")
            .expect("Reconcile parsed");

        assert_eq!(rec.receiver.len(), 1);
        assert_eq!(rec.receiver[0].names, vec!["r".to_string()]);
        assert_eq!(
            rec.receiver[0].ty,
            TypeExpr::Pointer(Box::new(TypeExpr::Named("FooReconciler".into())))
        );
        assert_eq!(rec.params.len(), 2);
        assert_eq!(rec.params[1].names, vec!["req".to_string()]);
        assert_eq!(rec.results.len(), 2);
        assert_eq!(rec.results[1].ty, TypeExpr::Named("error".into()));
        assert!(rec.span.start_line < rec.span.end_line);
    }

    #[test]
    fn test_grouped_params_are_one_field() {
        let file = parse(RECONCILER);
        let helper = file.funcs.iter().find(|f| f.name == "helper").unwrap();
        assert!(helper.receiver.is_empty());
        assert_eq!(helper.params.len(), 1);
        assert_eq!(helper.params[0].names, vec!["a".to_string(), "b".to_string()]);
        assert_eq!(helper.results.len(), 1);
    }

    #[test]
    fn test_body_statements() {
        let file = parse(RECONCILER);
        let rec = file.funcs.iter().find(|f| f.name == "Reconcile").unwrap();
        let body = rec.body.as_ref().expect("body lowered");
        assert_eq!(body.stmts.len(), 4);
        assert!(matches!(body.stmts[0].kind, StmtKind::VarDecl { .. }));

        let StmtKind::If(if_stmt) = &body.stmts[1].kind else {
            panic!("expected if, got {:?}", body.stmts[1].kind);
        };
        assert!(if_stmt.init.is_some());
        assert_eq!(if_stmt.body.stmts.len(), 2);

        let StmtKind::Range(range) = &body.stmts[2].kind else {
            panic!("expected range loop, got {:?}", body.stmts[2].kind);
        };
        assert_eq!(range.op, ":=");
        assert!(matches!(&range.key, Some(Expr { kind: ExprKind::Ident(k), .. }) if k == "_"));
        assert_eq!(range.body.stmts.len(), 1);

        let StmtKind::Return(results) = &body.stmts[3].kind else {
            panic!("expected return");
        };
        assert!(matches!(&results[1].kind, ExprKind::Ident(n) if n == "nil"));
        assert!(matches!(&results[0].kind, ExprKind::Composite { ty: Some(_), .. }));
    }

    #[test]
    fn test_call_shape() {
        let file = parse(RECONCILER);
        let rec = file.funcs.iter().find(|f| f.name == "Reconcile").unwrap();
        let StmtKind::If(if_stmt) = &rec.body.as_ref().unwrap().stmts[1].kind else {
            panic!("expected if");
        };
        let Some(init) = &if_stmt.init else {
            panic!("expected initializer");
        };
        let StmtKind::Assign { rhs, op, .. } = &init.kind else {
            panic!("expected assignment, got {:?}", init.kind);
        };
        assert_eq!(op, ":=");
        let ExprKind::Call { function, args, .. } = &rhs[0].kind else {
            panic!("expected call");
        };
        assert!(matches!(&function.kind, ExprKind::Selector { field, .. } if field == "Get"));
        assert_eq!(args.len(), 3);
        assert!(matches!(
            &args[1].kind,
            ExprKind::Selector { field, .. } if field == "NamespacedName"
        ));
        assert!(matches!(&args[2].kind, ExprKind::Unary { op, .. } if op == "&"));
    }

    #[test]
    fn test_three_clause_and_bare_loops() {
        let src = r#"
package p

func f() {
    for i := 0; i < 3; i++ {
        g(i)
    }
    for {
        break
    }
    for ok() {
    }
}
"#;
        let file = parse(src);
        let body = file.funcs[0].body.as_ref().unwrap();
        let StmtKind::For(three) = &body.stmts[0].kind else {
            panic!("expected for");
        };
        assert!(three.init.is_some() && three.cond.is_some() && three.post.is_some());
        let StmtKind::For(bare) = &body.stmts[1].kind else {
            panic!("expected for");
        };
        assert!(bare.cond.is_none());
        let StmtKind::For(cond_only) = &body.stmts[2].kind else {
            panic!("expected for");
        };
        assert!(cond_only.cond.is_some() && cond_only.init.is_none());
    }

    #[test]
    fn test_switch_and_func_literal() {
        let src = r#"
package p

func f(x interface{}) {
    switch v := x.(type) {
    case string:
        use(v)
    default:
        other()
    }
    do(func() error {
        return nil
    })
}
"#;
        let file = parse(src);
        let body = file.funcs[0].body.as_ref().unwrap();
        let StmtKind::Switch(switch) = &body.stmts[0].kind else {
            panic!("expected switch, got {:?}", body.stmts[0].kind);
        };
        assert!(switch.type_switch);
        assert_eq!(switch.cases.len(), 2);
        assert_eq!(switch.cases[0].body.len(), 1);
        assert!(switch.cases[1].values.is_none());

        let StmtKind::Expr(Expr {
            kind: ExprKind::Call { args, .. },
            ..
        }) = &body.stmts[1].kind
        else {
            panic!("expected call statement");
        };
        assert!(matches!(&args[0].kind, ExprKind::FuncLit { body, .. } if body.stmts.len() == 1));
    }

    #[test]
    fn test_comments_are_dropped() {
        let src = r#"
package p

func f() {
    // leading
    g() // trailing
    /* block */
}
"#;
        let file = parse(src);
        let body = file.funcs[0].body.as_ref().unwrap();
        assert_eq!(body.stmts.len(), 1);
    }

    #[test]
    fn test_deep_nesting_is_rejected() {
        let terms = vec!["a"; 10_000].join(" + ");
        let src = format!(
            "package p\n\nfunc (r *R) Reconcile(ctx context.Context, req ctrl.Request) (ctrl.Result, error) {{\n    x := {terms}\n    return ctrl.Result{{}}, nil\n}}\n"
        );
        let err = parse_source(&src, Path::new("deep.go")).unwrap_err();
        assert!(err.to_string().contains("deep.go"));
        assert!(err.to_string().contains("nested deeper"));
    }

    #[test]
    fn test_depth_check_counts_levels() {
        let mut parser = Parser::new();
        parser
            .set_language(&tree_sitter_go::LANGUAGE.into())
            .unwrap();
        let tree = parser.parse("package p\n\nvar x = a + b + c\n", None).unwrap();
        assert!(!exceeds_depth(tree.root_node(), MAX_SYNTAX_DEPTH));
        assert!(exceeds_depth(tree.root_node(), 2));

        let nested = format!("package p\n\nvar x = {}\n", vec!["a"; 300].join(" + "));
        let tree = parser.parse(&nested, None).unwrap();
        assert!(exceeds_depth(tree.root_node(), MAX_SYNTAX_DEPTH));
    }
}
