//! Expression predicates used by the pattern detector

use crate::syntax::{Expr, ExprKind, NodeRef};

/// Conventional names of fields/variables holding a controller-runtime client
const CLIENT_NAMES: &[&str] = &["Client", "client", "c"];

pub const LIST_VERB: &str = "List";
pub const GET_VERB: &str = "Get";
pub const WRITE_VERBS: &[&str] = &["Create", "Update", "Delete", "Patch"];

const CLIENT_VERBS: &[&str] = &["Get", "List", "Create", "Update", "Delete", "Patch"];

const NAMESPACED_NAME_FIELD: &str = "NamespacedName";
const NAMESPACE_OPTION: &str = "InNamespace";
const LABEL_OPTIONS: &[&str] = &["MatchingLabels", "MatchingFields"];
const NOT_FOUND_CHECK: &str = "IsNotFound";

pub fn is_client_identifier(name: &str) -> bool {
    CLIENT_NAMES.contains(&name) || name.to_lowercase().contains("client")
}

pub fn is_write_verb(name: &str) -> bool {
    WRITE_VERBS.contains(&name)
}

/// Whether `operand.member(...)` is a client call.
///
/// Follows selector and call chains (`r.client.Status().Patch`) down to an
/// identifier. A bare receiver that is not client-named still counts when
/// `member` is one of the client verbs, since reconcilers often embed the
/// client.
pub fn is_client_call(operand: &Expr, member: &str) -> bool {
    match &operand.kind {
        ExprKind::Ident(name) => is_client_identifier(name) || CLIENT_VERBS.contains(&member),
        ExprKind::Selector {
            operand: inner,
            field,
        } => is_client_identifier(field) || is_client_call(inner, field),
        ExprKind::Call { function, .. } => match &function.kind {
            ExprKind::Selector {
                operand: inner,
                field,
            } => is_client_call(inner, field),
            _ => false,
        },
        _ => false,
    }
}

/// `(operand, member, args)` of a call whose callee is a member access
pub fn selector_call(expr: &Expr) -> Option<(&Expr, &str, &[Expr])> {
    let ExprKind::Call { function, args, .. } = &expr.kind else {
        return None;
    };
    let ExprKind::Selector { operand, field } = &function.kind else {
        return None;
    };
    Some((operand, field.as_str(), args.as_slice()))
}

/// Member name of a client call, if `expr` is one
pub fn client_call_verb(expr: &Expr) -> Option<&str> {
    let (operand, member, _) = selector_call(expr)?;
    is_client_call(operand, member).then_some(member)
}

/// Whether any identifier under `expr` is `name`. Selector field names are
/// not identifier references.
pub fn references_ident(expr: &Expr, name: &str) -> bool {
    NodeRef::Expr(expr)
        .descendants()
        .any(|node| matches!(node, NodeRef::Expr(Expr { kind: ExprKind::Ident(id), .. }) if id == name))
}

/// Exactly `<request>.NamespacedName`
pub fn is_request_namespaced_name(expr: &Expr, request: &str) -> bool {
    matches!(
        &expr.kind,
        ExprKind::Selector { operand, field }
            if field == NAMESPACED_NAME_FIELD
                && matches!(&operand.kind, ExprKind::Ident(id) if id == request)
    )
}

/// Final name segment of a call's target, for bare and member-access targets
fn option_call_name(expr: &Expr) -> Option<&str> {
    let ExprKind::Call { function, .. } = &expr.kind else {
        return None;
    };
    match &function.kind {
        ExprKind::Ident(name) => Some(name),
        ExprKind::Selector { field, .. } => Some(field),
        _ => None,
    }
}

pub fn is_namespace_option(expr: &Expr) -> bool {
    option_call_name(expr).is_some_and(|name| name.contains(NAMESPACE_OPTION))
}

pub fn is_label_option(expr: &Expr) -> bool {
    option_call_name(expr)
        .is_some_and(|name| LABEL_OPTIONS.iter().any(|option| name.contains(option)))
}

/// `<anything>.IsNotFound(...)`
pub fn is_not_found_check(expr: &Expr) -> bool {
    matches!(selector_call(expr), Some((_, member, _)) if member == NOT_FOUND_CHECK)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::Span;

    fn e(kind: ExprKind) -> Expr {
        Expr {
            span: Span::default(),
            kind,
        }
    }

    fn ident(name: &str) -> Expr {
        e(ExprKind::Ident(name.into()))
    }

    fn sel(operand: Expr, field: &str) -> Expr {
        e(ExprKind::Selector {
            operand: Box::new(operand),
            field: field.into(),
        })
    }

    fn call(function: Expr, args: Vec<Expr>) -> Expr {
        e(ExprKind::Call {
            function: Box::new(function),
            args,
            spread: false,
        })
    }

    #[test]
    fn test_client_identifiers() {
        assert!(is_client_identifier("Client"));
        assert!(is_client_identifier("c"));
        assert!(is_client_identifier("kubeClient"));
        assert!(is_client_identifier("CLIENTSET"));
        assert!(!is_client_identifier("r"));
    }

    #[test]
    fn test_client_call_direct_and_nested() {
        // client.Get
        assert!(is_client_call(&ident("client"), "Get"));
        // r.Get where r embeds the client
        assert!(is_client_call(&ident("r"), "Get"));
        // r.Foo is not
        assert!(!is_client_call(&ident("r"), "Foo"));
        // r.Client.Anything
        assert!(is_client_call(&sel(ident("r"), "Client"), "Anything"));
        // r.mgr.Update: recurse with member "mgr" -> not a verb
        assert!(!is_client_call(&sel(ident("r"), "mgr"), "Update"));
        // r.client.Status().Patch
        let status = call(sel(sel(ident("r"), "client"), "Status"), vec![]);
        assert!(is_client_call(&status, "Patch"));
        // foo().Update: call target not a selector
        assert!(!is_client_call(&call(ident("foo"), vec![]), "Update"));
    }

    #[test]
    fn test_verb_fallback_needs_bare_receiver() {
        // r.Status().Update: the chain bottoms out at r with member Status
        let status = call(sel(ident("r"), "Status"), vec![]);
        assert!(!is_client_call(&status, "Update"));
        let update = call(sel(status, "Update"), vec![]);
        assert_eq!(client_call_verb(&update), None);

        // r.Client.Status().Update is reached through the client field
        let client_status = call(sel(sel(ident("r"), "Client"), "Status"), vec![]);
        let update = call(sel(client_status, "Update"), vec![]);
        assert_eq!(client_call_verb(&update), Some("Update"));
    }

    #[test]
    fn test_client_call_verb() {
        let get = call(sel(ident("r"), "Get"), vec![]);
        assert_eq!(client_call_verb(&get), Some("Get"));
        let plain = call(ident("Get"), vec![]);
        assert_eq!(client_call_verb(&plain), None);
    }

    #[test]
    fn test_references_ident_ignores_field_names() {
        assert!(references_ident(&sel(ident("req"), "Namespace"), "req"));
        assert!(!references_ident(&sel(ident("obj"), "req"), "req"));
        let nested = call(
            sel(ident("client"), "InNamespace"),
            vec![sel(ident("req"), "Namespace")],
        );
        assert!(references_ident(&nested, "req"));
    }

    #[test]
    fn test_request_namespaced_name_shape() {
        assert!(is_request_namespaced_name(
            &sel(ident("req"), "NamespacedName"),
            "req"
        ));
        assert!(!is_request_namespaced_name(
            &sel(ident("request"), "NamespacedName"),
            "req"
        ));
        assert!(!is_request_namespaced_name(
            &sel(sel(ident("r"), "req"), "NamespacedName"),
            "req"
        ));
    }

    #[test]
    fn test_option_calls() {
        let ns = call(sel(ident("client"), "InNamespace"), vec![]);
        assert!(is_namespace_option(&ns));
        assert!(!is_label_option(&ns));

        let labels = call(ident("MatchingLabelsSelector"), vec![]);
        assert!(is_label_option(&labels));

        let fields = call(sel(ident("client"), "MatchingFields"), vec![]);
        assert!(is_label_option(&fields));

        // a composite literal option is not a call
        let lit = e(ExprKind::Composite {
            ty: None,
            elements: vec![],
        });
        assert!(!is_label_option(&lit));
    }

    #[test]
    fn test_not_found_check() {
        let check = call(sel(ident("apierrors"), "IsNotFound"), vec![ident("err")]);
        assert!(is_not_found_check(&check));
        let bare = call(ident("IsNotFound"), vec![ident("err")]);
        assert!(!is_not_found_check(&bare));
    }
}
