//! Go syntax model consumed by the analyzer
//!
//! - `ast` - owned, tagged-variant tree for one source file
//! - `walk` - borrowed node references and pre-order traversal
//! - `render` - turn nodes back into Go text (snippet fallback)
//! - `resolver` - optional resolved-type descriptions

pub mod ast;
pub mod render;
pub mod resolver;
pub mod walk;

pub use ast::{
    Block, CaseClause, Expr, ExprKind, Field, ForStmt, FuncDecl, IfStmt, Import, RangeStmt,
    SourceFile, Span, Stmt, StmtKind, SwitchStmt, TypeDecl, TypeExpr,
};
pub use render::{render, render_type, RenderError};
pub use resolver::{PackageIndex, TypeResolver};
pub use walk::{block_descendants, Descendants, NodeRef};
