//! Metadata providers.
//!
//! The collector does not know how type names or document constants are
//! spelled; it asks an [`OperationMetadataProvider`]. [`TypeScriptNaming`]
//! follows the graphql-codegen conventions so the generated SDK lines up
//! with types produced by `typescript-operations`.

use crate::config::{NamingConvention, SdkConfig};
use crate::error::{CodegenError, Result};
use gqlreq_syntax::{OperationDefinition, OperationType};

/// Names derived for one operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationMetadata {
    pub document_variable_name: String,
    pub operation_type: OperationType,
    pub operation_result_type: String,
    pub operation_variables_types: String,
}

/// Supplies per-operation names to the collector.
pub trait OperationMetadataProvider {
    /// Derives names for a named operation.
    fn metadata(&self, node: &OperationDefinition, name: &str) -> Result<OperationMetadata>;

    /// Import statements the derived names rely on.
    fn imports(&self) -> Vec<String> {
        Vec::new()
    }
}

/// graphql-codegen style naming.
#[derive(Debug, Clone)]
pub struct TypeScriptNaming {
    convention: NamingConvention,
    dedupe_operation_suffix: bool,
    omit_operation_suffix: bool,
    document_variable_prefix: String,
    document_variable_suffix: String,
    types_import: Option<(&'static str, String)>,
}

impl TypeScriptNaming {
    pub fn new(config: &SdkConfig) -> Self {
        Self {
            convention: config.naming_convention,
            dedupe_operation_suffix: config.dedupe_operation_suffix,
            omit_operation_suffix: config.omit_operation_suffix,
            document_variable_prefix: config.document_variable_prefix.clone(),
            document_variable_suffix: config.document_variable_suffix.clone(),
            types_import: config
                .import_operation_types_from
                .clone()
                .map(|path| (config.type_import(), path)),
        }
    }

    fn convert(&self, name: &str) -> String {
        match self.convention {
            NamingConvention::Keep => name.to_string(),
            NamingConvention::PascalCase => pascal_case(name),
        }
    }

    fn operation_suffix(&self, name: &str, operation: OperationType) -> &'static str {
        let suffix = operation.type_suffix();
        let already_suffixed = name
            .to_ascii_lowercase()
            .ends_with(&suffix.to_ascii_lowercase());
        if self.omit_operation_suffix || (self.dedupe_operation_suffix && already_suffixed) {
            ""
        } else {
            suffix
        }
    }

    fn qualify(&self, type_name: String) -> String {
        match self.types_import {
            Some(_) => format!("Types.{type_name}"),
            None => type_name,
        }
    }
}

impl OperationMetadataProvider for TypeScriptNaming {
    fn metadata(&self, node: &OperationDefinition, name: &str) -> Result<OperationMetadata> {
        let base = self.convert(name);
        let result_type = format!("{base}{}", self.operation_suffix(name, node.operation));
        let variables_type = format!("{result_type}Variables");
        let document_variable_name = format!(
            "{}{base}{}",
            self.document_variable_prefix, self.document_variable_suffix
        );

        for ident in [&result_type, &document_variable_name] {
            if !is_identifier(ident) {
                return Err(CodegenError::Metadata {
                    operation: name.to_string(),
                    reason: format!("`{ident}` is not a valid TypeScript identifier"),
                });
            }
        }

        Ok(OperationMetadata {
            document_variable_name,
            operation_type: node.operation,
            operation_result_type: self.qualify(result_type),
            operation_variables_types: self.qualify(variables_type),
        })
    }

    fn imports(&self) -> Vec<String> {
        self.types_import
            .iter()
            .map(|(keyword, path)| format!("{keyword} * as Types from '{path}';"))
            .collect()
    }
}

/// Converts a GraphQL name to PascalCase.
///
/// Underscore-separated parts are converted independently and joined with
/// `_`, so `get_user` becomes `Get_User`. Within a part, words split on
/// lower-to-upper and acronym-to-word boundaries: `getUserByID` becomes
/// `GetUserById`.
pub fn pascal_case(name: &str) -> String {
    name.split('_')
        .map(|part| {
            let mut out = String::with_capacity(part.len());
            for word in split_words(part) {
                let mut chars = word.chars();
                if let Some(first) = chars.next() {
                    out.push(first.to_ascii_uppercase());
                    out.extend(chars.map(|c| c.to_ascii_lowercase()));
                }
            }
            out
        })
        .collect::<Vec<_>>()
        .join("_")
}

fn split_words(part: &str) -> Vec<&str> {
    let bytes = part.as_bytes();
    let mut words = Vec::new();
    let mut start = 0;

    for i in 1..bytes.len() {
        let prev = bytes[i - 1];
        let cur = bytes[i];
        let lower_to_upper =
            (prev.is_ascii_lowercase() || prev.is_ascii_digit()) && cur.is_ascii_uppercase();
        let acronym_end = prev.is_ascii_uppercase()
            && cur.is_ascii_uppercase()
            && bytes.get(i + 1).is_some_and(u8::is_ascii_lowercase);
        if lower_to_upper || acronym_end {
            words.push(&part[start..i]);
            start = i;
        }
    }
    if start < part.len() {
        words.push(&part[start..]);
    }
    words
}

fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_' || c == '$')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}

#[cfg(test)]
mod tests {
    use super::*;
    use gqlreq_core::Interner;
    use gqlreq_syntax::parse;

    fn metadata_for(source: &str, config: &SdkConfig) -> Result<OperationMetadata> {
        let interner = Interner::new();
        let result = parse(source, &interner);
        let op = result.document.operations().next().unwrap();
        let name = op.name_str(&interner).unwrap();
        TypeScriptNaming::new(config).metadata(op, &name)
    }

    #[test]
    fn test_pascal_case() {
        assert_eq!(pascal_case("getUser"), "GetUser");
        assert_eq!(pascal_case("getUserByID"), "GetUserById");
        assert_eq!(pascal_case("GetUser"), "GetUser");
        assert_eq!(pascal_case("get_user"), "Get_User");
        assert_eq!(pascal_case("HTMLParser"), "HtmlParser");
        assert_eq!(pascal_case("listUsersV2"), "ListUsersV2");
        assert_eq!(pascal_case("get2FACodes"), "Get2FaCodes");
        assert_eq!(pascal_case("user2fa"), "User2fa");
        assert_eq!(pascal_case("_private"), "_Private");
    }

    #[test]
    fn test_default_naming() {
        let meta = metadata_for("query getUser($id: ID!) { user { id } }", &SdkConfig::default())
            .unwrap();
        assert_eq!(
            meta,
            OperationMetadata {
                document_variable_name: "GetUserDocument".into(),
                operation_type: OperationType::Query,
                operation_result_type: "GetUserQuery".into(),
                operation_variables_types: "GetUserQueryVariables".into(),
            }
        );
    }

    #[test]
    fn test_dedupe_and_omit_suffix() {
        let dedupe = SdkConfig {
            dedupe_operation_suffix: true,
            ..SdkConfig::default()
        };
        let meta = metadata_for("mutation CreateUserMutation { f }", &dedupe).unwrap();
        assert_eq!(meta.operation_result_type, "CreateUserMutation");
        assert_eq!(meta.operation_variables_types, "CreateUserMutationVariables");

        let meta = metadata_for("subscription OnEvent { f }", &dedupe).unwrap();
        assert_eq!(meta.operation_result_type, "OnEventSubscription");

        let omit = SdkConfig {
            omit_operation_suffix: true,
            ..SdkConfig::default()
        };
        let meta = metadata_for("query Viewer { f }", &omit).unwrap();
        assert_eq!(meta.operation_result_type, "Viewer");
        assert_eq!(meta.document_variable_name, "ViewerDocument");
    }

    #[test]
    fn test_keep_convention_and_document_affixes() {
        let config = SdkConfig {
            naming_convention: NamingConvention::Keep,
            document_variable_prefix: "Gql".into(),
            document_variable_suffix: "Doc".into(),
            ..SdkConfig::default()
        };
        let meta = metadata_for("query getUserByID { f }", &config).unwrap();
        assert_eq!(meta.operation_result_type, "getUserByIDQuery");
        assert_eq!(meta.document_variable_name, "GqlgetUserByIDDoc");
    }

    #[test]
    fn test_types_namespace_import() {
        let config = SdkConfig {
            import_operation_types_from: Some("./types".into()),
            use_type_imports: true,
            ..SdkConfig::default()
        };
        let meta = metadata_for("query Viewer { f }", &config).unwrap();
        assert_eq!(meta.operation_result_type, "Types.ViewerQuery");
        assert_eq!(meta.operation_variables_types, "Types.ViewerQueryVariables");
        assert_eq!(meta.document_variable_name, "ViewerDocument");
        assert_eq!(
            TypeScriptNaming::new(&config).imports(),
            vec!["import type * as Types from './types';".to_string()]
        );
    }

    #[test]
    fn test_invalid_identifier_is_metadata_error() {
        let config = SdkConfig {
            document_variable_prefix: "my-".into(),
            ..SdkConfig::default()
        };
        let err = metadata_for("query Viewer { f }", &config).unwrap_err();
        assert!(matches!(
            err,
            CodegenError::Metadata { ref operation, .. } if operation == "Viewer"
        ));
    }
}
