//! Strict check of the namespace declarations on the actual root element.

use crate::error::{FailureKind, ValidationError};
use assay_tree::{Document, Location, NamespaceBindings};

fn declaration(prefix: &str, uri: &str) -> String {
    if prefix.is_empty() {
        format!("xmlns=\"{}\"", uri)
    } else {
        format!("xmlns:{}=\"{}\"", prefix, uri)
    }
}

/// Every expected binding must be declared on the actual root with the same URI, and the
/// root may declare nothing else. Missing and mismatched bindings are reported before
/// extra ones, each in prefix order.
pub fn validate_namespaces(
    expected: &NamespaceBindings,
    actual: &Document,
) -> Result<(), ValidationError> {
    let declared = actual.root_namespaces();
    let path = actual.path(Location::Node(actual.root()));

    for (prefix, uri) in expected {
        match declared.get(prefix) {
            None => {
                return Err(ValidationError::new(FailureKind::MissingNamespace, path)
                    .expected(declaration(prefix, uri))
                    .reason(format!("Missing namespace binding for prefix '{}'", prefix)));
            }
            Some(actual_uri) if actual_uri != uri => {
                return Err(ValidationError::new(FailureKind::NamespaceMismatch, path)
                    .expected(declaration(prefix, uri))
                    .actual(declaration(prefix, actual_uri))
                    .reason(format!(
                        "Namespace binding for prefix '{}' points to another URI",
                        prefix
                    )));
            }
            Some(_) => {}
        }
    }

    if let Some((prefix, uri)) = declared.iter().find(|(p, _)| !expected.contains_key(*p)) {
        return Err(ValidationError::new(FailureKind::UnexpectedNamespace, path)
            .actual(declaration(prefix, uri))
            .reason(format!(
                "unexpected extra binding for prefix '{}'",
                prefix
            )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use assay_tree::parse_document;

    fn expected() -> NamespaceBindings {
        NamespaceBindings::from([
            (String::new(), "urn:a".to_string()),
            ("ns1".to_string(), "urn:b".to_string()),
        ])
    }

    fn check(xml: &str) -> Result<(), ValidationError> {
        validate_namespaces(&expected(), &parse_document(xml).unwrap())
    }

    #[test]
    fn test_exact_bindings_pass() {
        assert!(check("<root xmlns='urn:a' xmlns:ns1='urn:b'/>").is_ok());
    }

    #[test]
    fn test_extra_binding_fails() {
        let err = check("<root xmlns='urn:a' xmlns:ns1='urn:b' xmlns:ns2='urn:c'/>").unwrap_err();
        assert_eq!(err.kind, FailureKind::UnexpectedNamespace);
        assert!(err.reason.contains("unexpected extra binding"));
        assert_eq!(err.actual, "xmlns:ns2=\"urn:c\"");
    }

    #[test]
    fn test_missing_and_mismatched_bindings() {
        let err = check("<root xmlns:ns1='urn:b'/>").unwrap_err();
        assert_eq!(err.kind, FailureKind::MissingNamespace);
        assert_eq!(err.expected, "xmlns=\"urn:a\"");

        let err = check("<root xmlns='urn:a' xmlns:ns1='urn:x'/>").unwrap_err();
        assert_eq!(err.kind, FailureKind::NamespaceMismatch);
        assert_eq!(err.path, "root");
    }

    #[test]
    fn test_missing_is_reported_before_extra() {
        let err = check("<root xmlns='urn:a' xmlns:ns3='urn:b'/>").unwrap_err();
        assert_eq!(err.kind, FailureKind::MissingNamespace);
    }
}
