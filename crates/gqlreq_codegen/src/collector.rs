//! Operation collection.
//!
//! The collector is fed operation definitions in document order. Named
//! operations become [`OperationRecord`]s; anonymous ones cannot be exposed
//! as SDK actions and are reported to the [`DiagnosticSink`] instead.

use crate::error::Result;
use crate::provider::OperationMetadataProvider;
use gqlreq_core::diagnostics::codes;
use gqlreq_core::{Diagnostic, DiagnosticSeverity, DiagnosticSink, Interner};
use gqlreq_syntax::{print_operation, OperationDefinition, OperationType};
use rustc_hash::FxHashSet;

/// One SDK action to emit.
#[derive(Debug, Clone)]
pub struct OperationRecord<'a> {
    pub name: String,
    pub node: &'a OperationDefinition,
    pub document_variable_name: String,
    pub operation_type: OperationType,
    pub operation_result_type: String,
    pub operation_variables_types: String,
}

/// Accumulates records for named operations.
pub struct OperationCollector<'a, 's> {
    interner: &'a Interner,
    provider: &'a dyn OperationMetadataProvider,
    sink: &'s mut dyn DiagnosticSink,
    records: Vec<OperationRecord<'a>>,
    seen: FxHashSet<String>,
}

impl<'a, 's> OperationCollector<'a, 's> {
    pub fn new(
        interner: &'a Interner,
        provider: &'a dyn OperationMetadataProvider,
        sink: &'s mut dyn DiagnosticSink,
    ) -> Self {
        Self {
            interner,
            provider,
            sink,
            records: Vec::new(),
            seen: FxHashSet::default(),
        }
    }

    /// Visits one operation definition.
    ///
    /// Anonymous operations are reported and skipped. Provider failures
    /// are returned as is.
    pub fn visit(&mut self, node: &'a OperationDefinition) -> Result<()> {
        let Some(name) = node.name_str(self.interner) else {
            self.sink.report(
                Diagnostic::warning(codes::ANONYMOUS_OPERATION, "anonymous operation ignored")
                    .with_message(print_operation(node, self.interner))
                    .with_span(node.span, "operations must be named to be exposed by the SDK"),
            );
            return Ok(());
        };

        let metadata = self.provider.metadata(node, &name)?;

        if !self.seen.insert(name.clone()) {
            tracing::debug!(operation = %name, "duplicate operation name, later action shadows earlier");
        }
        tracing::debug!(
            operation = %name,
            kind = %metadata.operation_type,
            document = %metadata.document_variable_name,
            "collected operation"
        );

        self.records.push(OperationRecord {
            name,
            node,
            document_variable_name: metadata.document_variable_name,
            operation_type: metadata.operation_type,
            operation_result_type: metadata.operation_result_type,
            operation_variables_types: metadata.operation_variables_types,
        });
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn into_records(self) -> Vec<OperationRecord<'a>> {
        self.records
    }
}

/// Forwards diagnostics to `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn report(&mut self, diagnostic: Diagnostic) {
        let message = diagnostic.message.as_deref().unwrap_or_default();
        match diagnostic.severity {
            DiagnosticSeverity::Error => {
                tracing::error!(code = %diagnostic.code, "{}\n{message}", diagnostic.title);
            }
            DiagnosticSeverity::Warning => {
                tracing::warn!(code = %diagnostic.code, "{}\n{message}", diagnostic.title);
            }
            DiagnosticSeverity::Info => {
                tracing::info!(code = %diagnostic.code, "{}\n{message}", diagnostic.title);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SdkConfig;
    use crate::error::CodegenError;
    use crate::provider::{OperationMetadata, TypeScriptNaming};
    use gqlreq_core::DiagnosticBag;
    use gqlreq_syntax::parse;

    struct FailingProvider;

    impl OperationMetadataProvider for FailingProvider {
        fn metadata(&self, _node: &OperationDefinition, name: &str) -> Result<OperationMetadata> {
            Err(CodegenError::Metadata {
                operation: name.to_string(),
                reason: "no types".into(),
            })
        }
    }

    #[test]
    fn test_collects_in_document_order() {
        let interner = Interner::new();
        let result = parse(
            "query B { b } mutation A($x: Int) { a } subscription C { c }",
            &interner,
        );
        let provider = TypeScriptNaming::new(&SdkConfig::default());
        let mut bag = DiagnosticBag::new();
        let mut collector = OperationCollector::new(&interner, &provider, &mut bag);
        for op in result.document.operations() {
            collector.visit(op).unwrap();
        }
        let records = collector.into_records();

        let names: Vec<_> = records.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, ["B", "A", "C"]);
        assert_eq!(records[1].operation_type, OperationType::Mutation);
        assert_eq!(records[1].operation_variables_types, "AMutationVariables");
        assert_eq!(records[2].document_variable_name, "CDocument");
        assert!(bag.is_empty());
    }

    #[test]
    fn test_anonymous_operation_is_reported_and_skipped() {
        let interner = Interner::new();
        let result = parse("{ viewer { id } } query Named { n }", &interner);
        let provider = TypeScriptNaming::new(&SdkConfig::default());

        let mut reported = Vec::new();
        let mut sink = |d: Diagnostic| reported.push(d);
        let mut collector = OperationCollector::new(&interner, &provider, &mut sink);
        for op in result.document.operations() {
            collector.visit(op).unwrap();
        }
        assert_eq!(collector.len(), 1);
        drop(collector);

        assert_eq!(reported.len(), 1);
        assert_eq!(reported[0].code, codes::ANONYMOUS_OPERATION);
        assert_eq!(
            reported[0].message.as_deref(),
            Some("{\n  viewer {\n    id\n  }\n}")
        );
        assert_eq!(reported[0].severity, DiagnosticSeverity::Warning);
    }

    #[test]
    fn test_duplicate_names_are_kept() {
        let interner = Interner::new();
        let result = parse("query Q { a } query Q { b }", &interner);
        let provider = TypeScriptNaming::new(&SdkConfig::default());
        let mut bag = DiagnosticBag::new();
        let mut collector = OperationCollector::new(&interner, &provider, &mut bag);
        for op in result.document.operations() {
            collector.visit(op).unwrap();
        }
        assert_eq!(collector.into_records().len(), 2);
    }

    #[test]
    fn test_provider_error_propagates() {
        let interner = Interner::new();
        let result = parse("query Q { a }", &interner);
        let mut bag = DiagnosticBag::new();
        let mut collector = OperationCollector::new(&interner, &FailingProvider, &mut bag);
        let op = result.document.operations().next().unwrap();

        let err = collector.visit(op).unwrap_err();
        assert!(matches!(err, CodegenError::Metadata { .. }));
        assert!(collector.is_empty());
    }

    #[test]
    fn test_tracing_sink_accepts_diagnostics() {
        let mut sink = TracingSink;
        sink.report(Diagnostic::warning(codes::ANONYMOUS_OPERATION, "anonymous operation ignored"));
    }
}
