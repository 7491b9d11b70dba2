//! Paired traversal of the expected and actual trees.

use crate::context::AttributeMode;
use crate::error::{FailureKind, ValidateError, ValidationError};
use assay_context::TestContext;
use assay_matcher::{MatchOutcome, MatcherRegistry, parse_placeholder};
use assay_tree::{Document, Location, NamespaceBindings, NodeId};
use assay_xpath::{EvaluationContext, select};
use log::debug;

const IGNORE_MATCHER: &str = "ignore";

/// Resolves each ignore path through the test context and selects it in `actual`.
pub fn resolve_ignore_paths<'p>(
    actual: &Document,
    ignore_paths: impl IntoIterator<Item = &'p String>,
    namespaces: &NamespaceBindings,
    test_ctx: &TestContext,
) -> Result<Vec<Location>, ValidateError> {
    let e_ctx = EvaluationContext::new(actual, namespaces);
    let mut ignored = Vec::new();
    for path in ignore_paths {
        let resolved = test_ctx.resolve_in_string(path, false)?;
        let selected = select(&resolved, &e_ctx)?;
        debug!("Ignore path '{}' selects {} node(s)", resolved, selected.len());
        ignored.extend(selected);
    }
    Ok(ignored)
}

/// Runs the leaf pipeline on an already located value: resolve `expected_raw`, then use the
/// matcher evaluator or fall back to string equality.
pub(crate) fn check_value(
    expected_raw: &str,
    actual: &str,
    path: &str,
    test_ctx: &TestContext,
    matchers: &MatcherRegistry,
) -> Result<(), ValidateError> {
    let expected = test_ctx.resolve_in_string(expected_raw, false)?;
    check_resolved_value(&expected, actual, path, matchers)
}

pub(crate) fn check_resolved_value(
    expected: &str,
    actual: &str,
    path: &str,
    matchers: &MatcherRegistry,
) -> Result<(), ValidateError> {
    match matchers.evaluate(expected, actual)? {
        MatchOutcome::Match => Ok(()),
        MatchOutcome::NoMatch(reason) => Err(ValidationError::new(FailureKind::MatcherFailed, path)
            .expected(expected)
            .actual(actual)
            .reason(reason)
            .into()),
        MatchOutcome::NotApplicable if expected == actual => Ok(()),
        MatchOutcome::NotApplicable => Err(ValidationError::new(FailureKind::ValueMismatch, path)
            .expected(expected)
            .actual(actual)
            .reason("Values not equal")
            .into()),
    }
}

/// Compares an expected tree with an actual one, stopping at the first difference.
pub struct TreeComparator<'a> {
    expected: &'a Document,
    actual: &'a Document,
    test_ctx: &'a TestContext,
    matchers: &'a MatcherRegistry,
    ignored: Vec<Location>,
    attribute_mode: AttributeMode,
    resolve_leaves: bool,
}

impl<'a> TreeComparator<'a> {
    pub fn new(
        expected: &'a Document,
        actual: &'a Document,
        test_ctx: &'a TestContext,
        matchers: &'a MatcherRegistry,
    ) -> Self {
        Self {
            expected,
            actual,
            test_ctx,
            matchers,
            ignored: Vec::new(),
            attribute_mode: AttributeMode::default(),
            resolve_leaves: true,
        }
    }

    /// Actual locations to skip; anything inside an ignored element is skipped too.
    pub fn with_ignored(mut self, ignored: Vec<Location>) -> Self {
        self.ignored = ignored;
        self
    }

    pub fn with_attribute_mode(mut self, mode: AttributeMode) -> Self {
        self.attribute_mode = mode;
        self
    }

    /// Marks the expected tree as parsed from an already resolved template. Its leaf
    /// values are then compared as they are, so resolved values that happen to contain
    /// `${..}` or function syntax are not evaluated a second time.
    pub fn with_resolved_template(mut self) -> Self {
        self.resolve_leaves = false;
        self
    }

    fn check_leaf(&self, expected: &str, actual: &str, path: &str) -> Result<(), ValidateError> {
        if self.resolve_leaves {
            check_value(expected, actual, path, self.test_ctx, self.matchers)
        } else {
            check_resolved_value(expected, actual, path, self.matchers)
        }
    }

    pub fn compare(&self) -> Result<(), ValidateError> {
        let expected_root = self.expected.root();
        let actual_root = self.actual.root();
        if self.is_ignored(Location::Node(actual_root)) {
            return Ok(());
        }

        let expected_name = self.expected.name(expected_root);
        let actual_name = self.actual.name(actual_root);
        if expected_name != actual_name {
            let render = |n: Option<&assay_tree::QualifiedName>| {
                n.map(|n| n.expanded()).unwrap_or_default()
            };
            return Err(ValidationError::new(
                FailureKind::RootMismatch,
                self.actual.path(Location::Node(actual_root)),
            )
            .expected(render(expected_name))
            .actual(render(actual_name))
            .reason("Root element names not equal")
            .into());
        }

        self.compare_element(expected_root, actual_root)
    }

    fn is_ignored(&self, location: Location) -> bool {
        self.ignored
            .iter()
            .any(|&ignored| self.actual.is_within(location, ignored))
    }

    /// True when the expected element's whole content is the `ignore` placeholder.
    fn is_ignore_placeholder(&self, expected: NodeId) -> bool {
        self.expected.child_elements(expected).next().is_none()
            && parse_placeholder(&self.expected.text_content(expected))
                .is_some_and(|p| p.name == IGNORE_MATCHER)
    }

    fn compare_element(&self, expected: NodeId, actual: NodeId) -> Result<(), ValidateError> {
        let location = Location::Node(actual);
        if self.is_ignored(location) {
            debug!("Ignoring element '{}'", self.actual.path(location));
            return Ok(());
        }
        if self.is_ignore_placeholder(expected) {
            debug!("Element '{}' is marked @ignore@", self.actual.path(location));
            return Ok(());
        }

        self.compare_attributes(expected, actual)?;
        self.compare_children(expected, actual)?;
        self.compare_text(expected, actual)
    }

    fn compare_attributes(&self, expected: NodeId, actual: NodeId) -> Result<(), ValidateError> {
        let expected_attributes = self.expected.attributes(expected);

        for attribute in expected_attributes {
            let Some(index) = self.actual.find_attribute(actual, &attribute.name) else {
                return Err(ValidationError::new(
                    FailureKind::MissingAttribute,
                    format!("{}/@{}", self.actual.path(Location::Node(actual)), attribute.name),
                )
                .expected(attribute.value.as_str())
                .reason(format!(
                    "Attribute '{}' is missing",
                    attribute.name.expanded()
                ))
                .into());
            };
            let location = Location::Attribute { owner: actual, index };
            if self.is_ignored(location) {
                continue;
            }
            let actual_value = self.actual.string_value(location);
            self.check_leaf(&attribute.value, &actual_value, &self.actual.path(location))?;
        }

        if self.attribute_mode == AttributeMode::Exhaustive {
            for (index, attribute) in self.actual.attributes(actual).iter().enumerate() {
                let location = Location::Attribute { owner: actual, index };
                let expected_it = expected_attributes.iter().any(|a| a.name == attribute.name);
                if !expected_it && !self.is_ignored(location) {
                    return Err(ValidationError::new(
                        FailureKind::UnexpectedAttribute,
                        self.actual.path(location),
                    )
                    .actual(attribute.value.as_str())
                    .reason(format!(
                        "Unexpected attribute '{}'",
                        attribute.name.expanded()
                    ))
                    .into());
                }
            }
        }
        Ok(())
    }

    fn compare_children(&self, expected: NodeId, actual: NodeId) -> Result<(), ValidateError> {
        let actual_children: Vec<NodeId> = self.actual.child_elements(actual).collect();
        let mut consumed = vec![false; actual_children.len()];

        for expected_child in self.expected.child_elements(expected) {
            let expected_name = self.expected.name(expected_child);
            let paired = actual_children
                .iter()
                .enumerate()
                .find(|&(i, &c)| !consumed[i] && self.actual.name(c) == expected_name)
                .map(|(i, &c)| (i, c));

            let Some((index, actual_child)) = paired else {
                let name = expected_name.map(|n| n.to_string()).unwrap_or_default();
                return Err(ValidationError::new(
                    FailureKind::MissingChild,
                    format!("{}/{}", self.actual.path(Location::Node(actual)), name),
                )
                .expected(name.as_str())
                .reason(format!("Expected child element '{}' not found", name))
                .into());
            };
            consumed[index] = true;
            self.compare_element(expected_child, actual_child)?;
        }

        for (&child, _) in actual_children
            .iter()
            .zip(&consumed)
            .filter(|&(_, &used)| !used)
        {
            let location = Location::Node(child);
            if !self.is_ignored(location) {
                let name = self
                    .actual
                    .name(child)
                    .map(|n| n.to_string())
                    .unwrap_or_default();
                return Err(ValidationError::new(
                    FailureKind::UnexpectedChild,
                    self.actual.path(location),
                )
                .actual(name.as_str())
                .reason(format!("Unexpected child element '{}'", name))
                .into());
            }
        }
        Ok(())
    }

    fn compare_text(&self, expected: NodeId, actual: NodeId) -> Result<(), ValidateError> {
        let expected_text = self.expected.text_content(expected);
        let actual_text = self.actual.text_content(actual);
        let (expected_text, actual_text) = (expected_text.trim(), actual_text.trim());
        if expected_text.is_empty() && actual_text.is_empty() {
            return Ok(());
        }
        self.check_leaf(
            expected_text,
            actual_text,
            &self.actual.path(Location::Node(actual)),
        )
    }
}
