//! TypeScript SDK generation for GraphQL operations.
//!
//! Given an executable document, this crate produces a module exporting a
//! `getSdk(request, withWrapper)` factory with one typed action per named
//! operation, in the style of graphql-codegen's `typescript-graphql-request`
//! plugin.
//!
//! Generation runs in two phases. The [`OperationCollector`] walks the
//! operations in document order and records the names each action needs;
//! the [`SdkEmitter`] then renders the module text from those records.
//!
//! # Example
//!
//! ```
//! use gqlreq_codegen::{generate, SdkConfig};
//! use gqlreq_core::DiagnosticBag;
//!
//! let mut warnings = DiagnosticBag::new();
//! let module = generate(
//!     "query GetUser($id: ID!) { user(id: $id) { name } }",
//!     &SdkConfig::default(),
//!     &mut warnings,
//! )
//! .unwrap();
//!
//! assert!(module.content.contains("GetUser(variables: GetUserQueryVariables"));
//! ```

pub mod collector;
pub mod config;
pub mod document;
pub mod emitter;
pub mod error;
pub mod optionality;
pub mod provider;

pub use collector::{OperationCollector, OperationRecord, TracingSink};
pub use config::{DocumentMode, NamingConvention, SdkConfig};
pub use document::{resolve_document_reference, DocumentRenderer, FragmentMap};
pub use emitter::SdkEmitter;
pub use error::{CodegenError, Result};
pub use optionality::is_optional;
pub use provider::{OperationMetadata, OperationMetadataProvider, TypeScriptNaming};

use gqlreq_core::{DiagnosticSink, Interner};
use gqlreq_syntax::Document;

/// A generated module: import lines plus body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedModule {
    pub prepend: Vec<String>,
    pub content: String,
}

impl GeneratedModule {
    /// Joins imports and body into the final file text.
    pub fn to_source(&self) -> String {
        if self.prepend.is_empty() {
            return self.content.clone();
        }
        format!("{}\n\n{}", self.prepend.join("\n"), self.content)
    }
}

/// Runs collection and emission over an already parsed document.
pub struct Generator<'a> {
    document: &'a Document,
    interner: &'a Interner,
    config: SdkConfig,
}

impl<'a> Generator<'a> {
    pub fn new(document: &'a Document, interner: &'a Interner) -> Self {
        Self {
            document,
            interner,
            config: SdkConfig::default(),
        }
    }

    #[must_use]
    pub fn with_config(mut self, config: SdkConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &SdkConfig {
        &self.config
    }

    /// Generates the SDK module.
    ///
    /// Anonymous operations are reported to `sink` and left out.
    pub fn generate(
        &self,
        provider: &dyn OperationMetadataProvider,
        sink: &mut dyn DiagnosticSink,
    ) -> Result<GeneratedModule> {
        self.config.validate()?;

        let mut collector = OperationCollector::new(self.interner, provider, sink);
        for operation in self.document.operations() {
            collector.visit(operation)?;
        }
        let records = collector.into_records();

        let fragments = FragmentMap::new(self.document, self.interner);
        let documents = DocumentRenderer::new(self.config.document_mode, self.interner, &fragments)
            .render_all(&records)?;
        let sdk = SdkEmitter::new(self.config.document_mode).emit(&records);

        let mut prepend = SdkEmitter::imports(self.config.use_type_imports);
        prepend.extend(document::mode_imports(&self.config)?);
        prepend.extend(provider.imports());

        let content = if documents.is_empty() {
            sdk
        } else {
            format!("{documents}\n{sdk}")
        };

        tracing::debug!(actions = records.len(), "generated sdk");
        Ok(GeneratedModule { prepend, content })
    }
}

/// Parses `source` and generates an SDK with the [`TypeScriptNaming`]
/// provider.
///
/// Syntax errors abort with [`CodegenError::Syntax`]; any non-error parse
/// diagnostics are forwarded to `sink` along with anonymous-operation
/// warnings.
pub fn generate(
    source: &str,
    config: &SdkConfig,
    sink: &mut dyn DiagnosticSink,
) -> Result<GeneratedModule> {
    let interner = Interner::new();
    let result = gqlreq_syntax::parse(source, &interner);
    if result.diagnostics.has_errors() {
        return Err(CodegenError::Syntax {
            diagnostics: result.diagnostics,
        });
    }
    for diagnostic in result.diagnostics {
        sink.report(diagnostic);
    }

    let provider = TypeScriptNaming::new(config);
    Generator::new(&result.document, &interner)
        .with_config(config.clone())
        .generate(&provider, sink)
}

#[cfg(test)]
mod tests {
    use super::*;
    use gqlreq_core::DiagnosticBag;

    #[test]
    fn test_to_source_joins_imports() {
        let module = GeneratedModule {
            prepend: vec!["import a from 'a';".into(), "import b from 'b';".into()],
            content: "body\n".into(),
        };
        assert_eq!(module.to_source(), "import a from 'a';\nimport b from 'b';\n\nbody\n");
    }

    #[test]
    fn test_syntax_errors_abort() {
        let mut bag = DiagnosticBag::new();
        let err = generate("query Broken { user(", &SdkConfig::default(), &mut bag).unwrap_err();
        assert!(matches!(err, CodegenError::Syntax { ref diagnostics } if diagnostics.has_errors()));
        assert!(bag.is_empty());
    }

    #[test]
    fn test_default_prepend() {
        let mut bag = DiagnosticBag::new();
        let module = generate("query A { a }", &SdkConfig::default(), &mut bag).unwrap();
        assert_eq!(
            module.prepend,
            vec![
                "import { DocumentNode } from 'graphql';".to_string(),
                "import gql from 'graphql-tag';".to_string(),
            ]
        );
        assert!(module.content.starts_with("export const ADocument = gql`"));
    }
}
