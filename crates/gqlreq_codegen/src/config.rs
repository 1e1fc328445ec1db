//! Generator configuration.
//!
//! Keys use the camelCase spelling of graphql-codegen plugin configs so an
//! existing `codegen.yml` block can be converted to JSON and reused as is.

use crate::error::{CodegenError, Result};
use serde::Deserialize;

/// How compiled documents are packaged in the generated module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DocumentMode {
    /// `export const XDocument = gql\`...\``
    #[default]
    #[serde(alias = "graphqlTag")]
    GraphQLTag,
    /// Pre-parsed graphql-js `DocumentNode` JSON literals.
    DocumentNode,
    /// Plain template strings.
    String,
    /// Documents live in a separate module imported as `Operations`.
    External,
}

/// How operation names are turned into type and document names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum NamingConvention {
    /// Use the operation name verbatim.
    #[serde(alias = "change-case-all#keep")]
    Keep,
    #[default]
    #[serde(alias = "change-case-all#pascalCase")]
    PascalCase,
}

/// Options for SDK generation.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SdkConfig {
    pub document_mode: DocumentMode,
    /// Emit `import type` instead of `import` for type-only imports.
    pub use_type_imports: bool,
    pub naming_convention: NamingConvention,
    /// Drop the `Query`/`Mutation`/`Subscription` suffix when the operation
    /// name already ends with it.
    pub dedupe_operation_suffix: bool,
    /// Never append the operation type suffix.
    pub omit_operation_suffix: bool,
    pub document_variable_prefix: String,
    pub document_variable_suffix: String,
    /// Module the `Operations` namespace is imported from in external mode.
    pub import_document_node_externally_from: Option<String>,
    /// Module the result and variables types are imported from, as `Types`.
    /// When unset the types are assumed to be in scope.
    pub import_operation_types_from: Option<String>,
}

impl Default for SdkConfig {
    fn default() -> Self {
        Self {
            document_mode: DocumentMode::default(),
            use_type_imports: false,
            naming_convention: NamingConvention::default(),
            dedupe_operation_suffix: false,
            omit_operation_suffix: false,
            document_variable_prefix: String::new(),
            document_variable_suffix: "Document".to_string(),
            import_document_node_externally_from: None,
            import_operation_types_from: None,
        }
    }
}

impl SdkConfig {
    /// Parses and validates a JSON configuration object.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks option combinations that cannot produce a usable module.
    pub fn validate(&self) -> Result<()> {
        if self.document_mode == DocumentMode::External
            && self
                .import_document_node_externally_from
                .as_deref()
                .map_or(true, str::is_empty)
        {
            return Err(CodegenError::Config(
                "documentMode `external` requires importDocumentNodeExternallyFrom".to_string(),
            ));
        }
        Ok(())
    }

    /// The keyword used for type-only imports.
    #[must_use]
    pub fn type_import(&self) -> &'static str {
        if self.use_type_imports {
            "import type"
        } else {
            "import"
        }
    }
}
