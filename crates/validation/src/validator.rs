//! The XML message validator tying all passes together.

use crate::assertions::validate_path_assertions;
use crate::comparator::{TreeComparator, resolve_ignore_paths};
use crate::context::ValidationContext;
use crate::error::ValidateError;
use crate::extraction::extract_variables;
use crate::namespaces::validate_namespaces;
use assay_context::TestContext;
use assay_matcher::MatcherRegistry;
use assay_tree::{Document, parse_document};
use log::{debug, info};
use std::sync::Arc;

#[derive(Debug, Clone, Default)]
pub struct XmlMessageValidator {
    matchers: Arc<MatcherRegistry>,
}

impl XmlMessageValidator {
    pub fn new(matchers: Arc<MatcherRegistry>) -> Self {
        Self { matchers }
    }

    pub fn matchers(&self) -> &MatcherRegistry {
        &self.matchers
    }

    /// Validates an actual payload against a control template.
    ///
    /// The control text is resolved through `test_ctx` before it is parsed, so variables
    /// and functions may appear anywhere in it. Leaf values of the parsed template are not
    /// resolved again.
    pub fn validate(
        &self,
        actual: &str,
        control: &str,
        validation_ctx: &ValidationContext,
        test_ctx: &mut TestContext,
    ) -> Result<(), ValidateError> {
        let actual = parse_document(actual)?;
        let control = parse_document(&test_ctx.resolve_in_string(control, false)?)?;
        self.run_passes(&actual, Some((&control, true)), validation_ctx, test_ctx)
    }

    /// Runs the configured passes on parsed documents. Without a control document only the
    /// namespace, path assertion and extraction passes run.
    pub fn validate_documents(
        &self,
        actual: &Document,
        control: Option<&Document>,
        validation_ctx: &ValidationContext,
        test_ctx: &mut TestContext,
    ) -> Result<(), ValidateError> {
        self.run_passes(actual, control.map(|c| (c, false)), validation_ctx, test_ctx)
    }

    /// `control` carries whether the template text was resolved before parsing.
    fn run_passes(
        &self,
        actual: &Document,
        control: Option<(&Document, bool)>,
        validation_ctx: &ValidationContext,
        test_ctx: &mut TestContext,
    ) -> Result<(), ValidateError> {
        if let Some((control, resolved)) = control {
            let ignored = resolve_ignore_paths(
                actual,
                &validation_ctx.ignore_paths,
                &validation_ctx.namespaces,
                test_ctx,
            )?;
            debug!("Start XML tree validation");
            let mut comparator = TreeComparator::new(control, actual, test_ctx, &self.matchers)
                .with_ignored(ignored)
                .with_attribute_mode(validation_ctx.attribute_mode);
            if resolved {
                comparator = comparator.with_resolved_template();
            }
            comparator.compare()?;
            info!("XML tree validation successful: all elements OK");
        }

        if !validation_ctx.control_namespaces.is_empty() {
            debug!("Start XML namespace validation");
            validate_namespaces(&validation_ctx.control_namespaces, actual)?;
            info!("XML namespace validation successful: all namespace bindings OK");
        }

        validate_path_assertions(
            actual,
            &validation_ctx.path_assertions,
            &validation_ctx.namespaces,
            test_ctx,
            &self.matchers,
        )?;

        extract_variables(
            actual,
            &validation_ctx.extractions,
            &validation_ctx.namespaces,
            test_ctx,
        )
    }
}
