//! Owned Go syntax tree
//!
//! Every node kind is a distinct variant so that matching code is plain
//! structural pattern matching. Spans carry byte offsets into the original
//! source and 1-based line numbers.

use std::path::PathBuf;

/// Source region of a node
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Span {
    pub start_byte: usize,
    pub end_byte: usize,
    /// 1-based
    pub start_line: u32,
    /// 1-based, inclusive
    pub end_line: u32,
}

/// A type as written in a signature or expression
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeExpr {
    /// `Request`, `error`
    Named(String),
    /// `ctrl.Request`
    Qualified { package: String, name: String },
    /// `*T`
    Pointer(Box<TypeExpr>),
    /// `List[T]`
    Generic { base: Box<TypeExpr>, args: Vec<TypeExpr> },
    /// Any other type shape, kept as written
    Other(String),
}

impl TypeExpr {
    /// The bare name a reader would see, without any package qualifier.
    ///
    /// Only plain and qualified names have one; pointers, generics and
    /// composite types return `None`.
    pub fn syntactic_name(&self) -> Option<&str> {
        match self {
            TypeExpr::Named(name) => Some(name),
            TypeExpr::Qualified { name, .. } => Some(name),
            _ => None,
        }
    }
}

/// One entry of a Go field list: `a, b int` is a single field with two names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    pub names: Vec<String>,
    pub ty: TypeExpr,
    pub variadic: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Expr {
    pub span: Span,
    pub kind: ExprKind,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExprKind {
    Ident(String),
    Selector {
        operand: Box<Expr>,
        field: String,
    },
    Call {
        function: Box<Expr>,
        args: Vec<Expr>,
        /// trailing `...` on the last argument
        spread: bool,
    },
    Unary {
        op: String,
        operand: Box<Expr>,
    },
    Binary {
        left: Box<Expr>,
        op: String,
        right: Box<Expr>,
    },
    Paren(Box<Expr>),
    Index {
        operand: Box<Expr>,
        indices: Vec<Expr>,
    },
    Slice {
        operand: Box<Expr>,
        start: Option<Box<Expr>>,
        end: Option<Box<Expr>>,
        capacity: Option<Box<Expr>>,
    },
    /// `x.(T)`; `ty` is `None` for the `x.(type)` switch guard
    TypeAssert {
        operand: Box<Expr>,
        ty: Option<TypeExpr>,
    },
    /// `T{...}`; nested literal values have no type
    Composite {
        ty: Option<TypeExpr>,
        elements: Vec<Expr>,
    },
    KeyValue {
        key: Box<Expr>,
        value: Box<Expr>,
    },
    FuncLit {
        params: Vec<Field>,
        results: Vec<Field>,
        body: Block,
    },
    /// numbers, strings, runes
    BasicLit(String),
    /// a type used in expression position (`make([]T, 0)`, conversions)
    Type(TypeExpr),
    /// unrecognised shape; children are kept so identifier scans still work
    Unknown {
        kind: String,
        children: Vec<Expr>,
    },
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Block {
    pub span: Span,
    pub stmts: Vec<Stmt>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Stmt {
    pub span: Span,
    pub kind: StmtKind,
}

#[derive(Debug, Clone, PartialEq)]
pub enum StmtKind {
    Expr(Expr),
    /// `=`, `:=` and the compound operators
    Assign {
        lhs: Vec<Expr>,
        op: String,
        rhs: Vec<Expr>,
    },
    IncDec {
        operand: Expr,
        op: String,
    },
    Send {
        channel: Expr,
        value: Expr,
    },
    /// `var`/`const` declarations inside a body
    VarDecl {
        keyword: String,
        names: Vec<String>,
        ty: Option<TypeExpr>,
        values: Vec<Expr>,
    },
    Return(Vec<Expr>),
    Go(Expr),
    Defer(Expr),
    If(IfStmt),
    For(ForStmt),
    Range(RangeStmt),
    Switch(SwitchStmt),
    Select(Vec<CaseClause>),
    Block(Block),
    Labeled {
        label: String,
        stmt: Option<Box<Stmt>>,
    },
    /// break, continue, goto, fallthrough
    Branch {
        keyword: String,
        label: Option<String>,
    },
    Empty,
    Unknown(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct IfStmt {
    pub init: Option<Box<Stmt>>,
    pub cond: Expr,
    pub body: Block,
    /// `else` block or chained `else if`
    pub alternative: Option<Box<Stmt>>,
}

/// Three-clause, condition-only and infinite `for` loops
#[derive(Debug, Clone, PartialEq)]
pub struct ForStmt {
    pub init: Option<Box<Stmt>>,
    pub cond: Option<Expr>,
    pub post: Option<Box<Stmt>>,
    pub body: Block,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RangeStmt {
    pub key: Option<Expr>,
    pub value: Option<Expr>,
    /// `:=` or `=`; empty for `for range x`
    pub op: String,
    pub iterable: Expr,
    pub body: Block,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SwitchStmt {
    pub init: Option<Box<Stmt>>,
    /// `v` in `switch v := x.(type)`
    pub binding: Option<String>,
    pub tag: Option<Expr>,
    pub type_switch: bool,
    pub cases: Vec<CaseClause>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CaseClause {
    pub span: Span,
    /// `None` for `default:`
    pub values: Option<Vec<Expr>>,
    /// send/receive statement of a `select` case
    pub comm: Option<Box<Stmt>>,
    pub body: Vec<Stmt>,
}

/// A function or method declaration
#[derive(Debug, Clone, PartialEq)]
pub struct FuncDecl {
    pub name: String,
    /// Receiver field list; empty for free functions
    pub receiver: Vec<Field>,
    pub params: Vec<Field>,
    pub results: Vec<Field>,
    pub body: Option<Block>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Import {
    /// Explicit alias (`ctrl`), `.` or `_`
    pub alias: Option<String>,
    pub path: String,
}

impl Import {
    /// Name the import is referred to by inside the file.
    ///
    /// Without an alias this is the last path segment, skipping a trailing
    /// major-version segment (`.../apimachinery/v2` -> `apimachinery`).
    pub fn local_name(&self) -> &str {
        if let Some(alias) = &self.alias {
            return alias;
        }
        let mut segments = self.path.rsplit('/');
        let last = segments.next().unwrap_or(&self.path);
        let is_version = last.len() > 1
            && last.starts_with('v')
            && last[1..].chars().all(|c| c.is_ascii_digit());
        match (is_version, segments.next()) {
            (true, Some(prev)) => prev,
            _ => last,
        }
    }
}

/// `type Name T` or `type Name = T` at file level
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeDecl {
    pub name: String,
    pub ty: TypeExpr,
    pub alias: bool,
}

/// One parsed Go file
#[derive(Debug, Clone, Default)]
pub struct SourceFile {
    /// Path relative to the analysed root
    pub path: PathBuf,
    /// Name from the `package` clause
    pub package: String,
    /// Full import path of the package, e.g. `github.com/acme/op/controllers`
    pub package_path: String,
    pub imports: Vec<Import>,
    pub type_decls: Vec<TypeDecl>,
    pub funcs: Vec<FuncDecl>,
    /// Raw text, used for snippets when present
    pub source: Option<String>,
}

impl SourceFile {
    /// Raw source bytes, if the file was kept with its text
    pub fn source_bytes(&self) -> Option<&[u8]> {
        self.source.as_deref().map(str::as_bytes)
    }

    /// Look up the import bound to `name` in this file
    pub fn import_for(&self, name: &str) -> Option<&Import> {
        self.imports.iter().find(|imp| imp.local_name() == name)
    }
}
