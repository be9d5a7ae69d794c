//! Core data models for controller-survey
//!
//! These models are shared by the analyzer core, the reporters and the CLI:
//! the closed signal vocabulary, detected signals, per-reconciler results
//! and the repositories they came from.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Fixed vocabulary of structural patterns the detector can emit.
///
/// Each kind carries a fixed score and description. Serialized as the
/// kebab-case name (`unscoped-list`, `loop-write`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SignalKind {
    /// client.List with no option derived from the request
    UnscopedList,
    /// client.List scoped to the request namespace only
    NamespaceScopedList,
    /// client.List scoped by labels/fields derived from the request
    LabelScopedList,
    /// client.Get(ctx, req.NamespacedName, obj)
    RequestScopedGet,
    /// client.Get with a key derived from the request
    DerivedGet,
    /// client.Get with a key unrelated to the request
    UnrelatedGet,
    /// Create/Update/Delete/Patch call
    SingleWrite,
    /// Loop whose body performs client writes
    LoopWrite,
    /// `if IsNotFound(err) { return ..., nil }`
    NotfoundIgnore,
    /// `if IsNotFound(err) { return <handler> }`
    NotfoundEarlyReturn,
    /// Reserved, never emitted by detection.
    FinalizerHandling,
    /// Reserved, never emitted by detection.
    DiffSync,
    /// Reserved, never emitted by detection.
    CreateOrUpdate,
}

impl SignalKind {
    /// Every kind, in declaration order.
    pub const ALL: [SignalKind; 13] = [
        SignalKind::UnscopedList,
        SignalKind::NamespaceScopedList,
        SignalKind::LabelScopedList,
        SignalKind::RequestScopedGet,
        SignalKind::DerivedGet,
        SignalKind::UnrelatedGet,
        SignalKind::SingleWrite,
        SignalKind::LoopWrite,
        SignalKind::NotfoundIgnore,
        SignalKind::NotfoundEarlyReturn,
        SignalKind::FinalizerHandling,
        SignalKind::DiffSync,
        SignalKind::CreateOrUpdate,
    ];

    /// Fixed score contribution of this kind
    pub fn score(self) -> i32 {
        match self {
            SignalKind::UnscopedList => 3,
            SignalKind::NamespaceScopedList => 1,
            SignalKind::LabelScopedList => 0,
            SignalKind::RequestScopedGet => -1,
            SignalKind::DerivedGet => -1,
            SignalKind::UnrelatedGet => 1,
            SignalKind::SingleWrite => -1,
            SignalKind::LoopWrite => 3,
            SignalKind::NotfoundIgnore => -1,
            SignalKind::NotfoundEarlyReturn => -2,
            SignalKind::FinalizerHandling => -1,
            SignalKind::DiffSync => 3,
            SignalKind::CreateOrUpdate => -1,
        }
    }

    /// Human-readable explanation attached to every emitted signal
    pub fn description(self) -> &'static str {
        match self {
            SignalKind::UnscopedList => "client.List without request-scoped selectors",
            SignalKind::NamespaceScopedList => "client.List scoped to request namespace only",
            SignalKind::LabelScopedList => {
                "client.List scoped by labels/fields derived from request"
            }
            SignalKind::RequestScopedGet => {
                "client.Get with req.NamespacedName (primary resource fetch)"
            }
            SignalKind::DerivedGet => "client.Get with key derived from request",
            SignalKind::UnrelatedGet => "client.Get with key not derived from request",
            SignalKind::SingleWrite => "client write call (Create/Update/Delete/Patch)",
            SignalKind::LoopWrite => "Loop containing write operations (SoTW pattern)",
            SignalKind::NotfoundIgnore => "Early return on NotFound (ignores deletes)",
            SignalKind::NotfoundEarlyReturn => {
                "NotFound handling with delete logic (classic edge-triggered pattern)"
            }
            SignalKind::FinalizerHandling => "Finalizer add/remove pattern",
            SignalKind::DiffSync => "Compute desired state, diff with actual, sync",
            SignalKind::CreateOrUpdate => "controllerutil.CreateOrUpdate call",
        }
    }

    /// Kinds that are part of the record vocabulary but have no detection rule
    pub fn is_reserved(self) -> bool {
        matches!(
            self,
            SignalKind::FinalizerHandling | SignalKind::DiffSync | SignalKind::CreateOrUpdate
        )
    }

    /// Stable kebab-case name, identical to the serialized form
    pub fn as_str(self) -> &'static str {
        match self {
            SignalKind::UnscopedList => "unscoped-list",
            SignalKind::NamespaceScopedList => "namespace-scoped-list",
            SignalKind::LabelScopedList => "label-scoped-list",
            SignalKind::RequestScopedGet => "request-scoped-get",
            SignalKind::DerivedGet => "derived-get",
            SignalKind::UnrelatedGet => "unrelated-get",
            SignalKind::SingleWrite => "single-write",
            SignalKind::LoopWrite => "loop-write",
            SignalKind::NotfoundIgnore => "notfound-ignore",
            SignalKind::NotfoundEarlyReturn => "notfound-early-return",
            SignalKind::FinalizerHandling => "finalizer-handling",
            SignalKind::DiffSync => "diff-sync",
            SignalKind::CreateOrUpdate => "create-or-update",
        }
    }
}

impl std::fmt::Display for SignalKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One detected pattern occurrence
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signal {
    pub kind: SignalKind,
    /// 1-based source line
    pub line: u32,
    pub score: i32,
    pub snippet: String,
    pub description: String,
}

impl Signal {
    /// Build a signal with the kind's fixed score and description
    pub fn new(kind: SignalKind, line: u32, snippet: String) -> Self {
        Self {
            kind,
            line,
            score: kind.score(),
            snippet,
            description: kind.description().to_string(),
        }
    }
}

/// Discrete classification of a reconciler, ordered from most edge-triggered
/// to most state-of-the-world.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Classification {
    EdgeTriggered,
    MostlyEdge,
    MostlySotw,
    Sotw,
}

impl Classification {
    /// All labels in band order
    pub const ALL: [Classification; 4] = [
        Classification::EdgeTriggered,
        Classification::MostlyEdge,
        Classification::MostlySotw,
        Classification::Sotw,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Classification::EdgeTriggered => "edge_triggered",
            Classification::MostlyEdge => "mostly_edge",
            Classification::MostlySotw => "mostly_sotw",
            Classification::Sotw => "sotw",
        }
    }
}

impl std::fmt::Display for Classification {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Analysis outcome for one matched Reconcile method.
///
/// Serialized as one flat JSONL record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// `repo#file#line`
    pub id: String,
    #[serde(default)]
    pub repo: String,
    pub file: String,
    pub line: u32,
    pub end_line: u32,
    pub receiver_type: String,
    pub receiver_package: String,
    pub score: i32,
    pub classification: Classification,
    #[serde(default)]
    pub signals: Vec<Signal>,
}

/// A repository to survey
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Repository {
    pub url: String,
    pub name: String,
    pub owner: String,
    #[serde(default)]
    pub stars: u32,
    /// Where the entry came from: "cli", "file", "local"
    #[serde(default)]
    pub source: String,
    #[serde(skip)]
    pub local_path: Option<PathBuf>,
}

impl Repository {
    /// `owner/name` when known, otherwise the URL as given
    pub fn display_name(&self) -> String {
        if self.owner.is_empty() || self.name.is_empty() {
            self.url.clone()
        } else {
            format!("{}/{}", self.owner, self.name)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signal_kind_serializes_kebab_case() {
        for kind in SignalKind::ALL {
            let json = serde_json::to_string(&kind).unwrap();
            assert_eq!(json, format!("\"{}\"", kind.as_str()));
        }
    }

    #[test]
    fn test_signal_new_uses_fixed_score() {
        let sig = Signal::new(SignalKind::NotfoundEarlyReturn, 12, "if x {}".into());
        assert_eq!(sig.score, -2);
        assert_eq!(sig.description, SignalKind::NotfoundEarlyReturn.description());
    }

    #[test]
    fn test_classification_serialized_names() {
        let json = serde_json::to_string(&Classification::MostlySotw).unwrap();
        assert_eq!(json, "\"mostly_sotw\"");
        let parsed: Classification = serde_json::from_str("\"edge_triggered\"").unwrap();
        assert_eq!(parsed, Classification::EdgeTriggered);
    }

    #[test]
    fn test_reserved_kinds() {
        let reserved: Vec<_> = SignalKind::ALL.iter().filter(|k| k.is_reserved()).collect();
        assert_eq!(reserved.len(), 3);
        assert!(!SignalKind::LoopWrite.is_reserved());
    }

    #[test]
    fn test_repository_display_name() {
        let repo = Repository {
            url: "https://github.com/cert-manager/cert-manager".into(),
            owner: "cert-manager".into(),
            name: "cert-manager".into(),
            ..Default::default()
        };
        assert_eq!(repo.display_name(), "cert-manager/cert-manager");
    }
}
