//! Accepts or rejects payloads by their root element name.

use crate::error::ValidateError;
use assay_tree::parse_document;
use log::{debug, warn};

/// Matches messages whose root element has a given name, written `local` or
/// `{namespace-uri}local`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RootQNameSelector {
    local_name: String,
    namespace: Option<String>,
}

fn is_local_name(name: &str) -> bool {
    !name.is_empty()
        && !name
            .chars()
            .any(|c| c.is_whitespace() || matches!(c, '{' | '}' | ':' | '<' | '>' | '/'))
}

impl RootQNameSelector {
    pub fn new(expression: &str) -> Result<Self, ValidateError> {
        let invalid = || ValidateError::InvalidSelector(expression.to_string());
        let expression = expression.trim();

        let (namespace, local_name) = match expression.strip_prefix('{') {
            Some(rest) => {
                let (uri, local) = rest.split_once('}').ok_or_else(invalid)?;
                if uri.trim().is_empty() {
                    return Err(invalid());
                }
                (Some(uri.to_string()), local)
            }
            None => (None, expression),
        };
        if !is_local_name(local_name) {
            return Err(invalid());
        }

        Ok(Self {
            local_name: local_name.to_string(),
            namespace,
        })
    }

    pub fn local_name(&self) -> &str {
        &self.local_name
    }

    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    /// True when `payload` parses and its root element matches. Without a namespace in the
    /// selector only the local name is compared.
    pub fn accept(&self, payload: &str) -> bool {
        let document = match parse_document(payload) {
            Ok(document) => document,
            Err(e) => {
                warn!("Root QName selector ignoring unparseable payload: {}", e);
                return false;
            }
        };
        let Some(root) = document.name(document.root()) else {
            return false;
        };

        let accepted = root.local_name == self.local_name
            && match &self.namespace {
                Some(namespace) => root.namespace.as_deref() == Some(namespace.as_str()),
                None => true,
            };
        debug!(
            "Root QName selector {} message with root '{}'",
            if accepted { "accepted" } else { "rejected" },
            root.expanded()
        );
        accepted
    }
}
