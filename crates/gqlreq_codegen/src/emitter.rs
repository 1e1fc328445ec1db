//! SDK module emission.

use crate::collector::OperationRecord;
use crate::config::DocumentMode;
use crate::document::resolve_document_reference;
use crate::optionality::is_optional;

const EXPORTED_TYPES: &str = "\
export type Variables = { [key: string]: any }
export type SdkFunctionWrapper<RequestOptions extends any> = <T>(
  action: (requestOpts?: RequestOptions) => Promise<T>,
  operationName: string
) => Promise<T>
export type RequestDocument = string | DocumentNode
export type RequestFunction<RequestOptions = any> = <T = any, V = Variables>(
  document: RequestDocument,
  variables?: V,
  requestOpts?: RequestOptions
) => Promise<T>
";

const DEFAULT_WRAPPER: &str =
    "const defaultWrapper: SdkFunctionWrapper<any> = (action, _operationName) => action()";

/// Renders the `getSdk` factory and its supporting types.
#[derive(Debug, Clone, Copy)]
pub struct SdkEmitter {
    mode: DocumentMode,
}

impl SdkEmitter {
    pub fn new(mode: DocumentMode) -> Self {
        Self { mode }
    }

    /// The `DocumentNode` import the preamble relies on.
    pub fn imports(use_type_imports: bool) -> Vec<String> {
        let keyword = if use_type_imports {
            "import type"
        } else {
            "import"
        };
        vec![format!("{keyword} {{ DocumentNode }} from 'graphql';")]
    }

    /// Emits the module body. The output depends only on `records` and the
    /// document mode, and actions appear in the order given.
    pub fn emit(&self, records: &[OperationRecord<'_>]) -> String {
        let mut out = String::with_capacity(1024 + records.len() * 320);
        out.push_str(EXPORTED_TYPES);
        out.push('\n');
        out.push_str(DEFAULT_WRAPPER);
        out.push_str("\n\n");
        out.push_str(
            "export function getSdk<RequestOptions extends Record<string, any>>(\n  \
             request: RequestFunction<RequestOptions>,\n  \
             withWrapper: SdkFunctionWrapper<RequestOptions> = defaultWrapper\n) {\n",
        );

        if records.is_empty() {
            out.push_str("  return {};\n");
        } else {
            out.push_str("  return {\n");
            let actions: Vec<String> = records.iter().map(|r| self.action(r)).collect();
            out.push_str(&actions.join(",\n"));
            out.push_str("\n  };\n");
        }

        out.push_str("}\n");
        out.push_str("export type Sdk = ReturnType<typeof getSdk>;\n");
        out
    }

    fn action(&self, record: &OperationRecord<'_>) -> String {
        let name = &record.name;
        let optional = if is_optional(&record.node.variables) {
            "?"
        } else {
            ""
        };
        let document = resolve_document_reference(self.mode, &record.document_variable_name);
        let result = &record.operation_result_type;

        let mut action = format!(
            "    {name}(variables{optional}: {}, requestOpts?: RequestOptions): Promise<{result}> {{\n",
            record.operation_variables_types
        );
        action.push_str(&format!(
            "      return withWrapper((wrappedRequestOpts?: RequestOptions) => \
             request<{result}>({document}, variables, {{...requestOpts, ...wrappedRequestOpts}} as RequestOptions), '{name}');\n"
        ));
        action.push_str("    }");
        action
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collector::OperationCollector;
    use crate::config::SdkConfig;
    use crate::provider::TypeScriptNaming;
    use gqlreq_core::{DiagnosticBag, Interner};
    use gqlreq_syntax::parse;

    fn emit(source: &str, mode: DocumentMode) -> String {
        let interner = Interner::new();
        let result = parse(source, &interner);
        let provider = TypeScriptNaming::new(&SdkConfig::default());
        let mut bag = DiagnosticBag::new();
        let mut collector = OperationCollector::new(&interner, &provider, &mut bag);
        for op in result.document.operations() {
            collector.visit(op).unwrap();
        }
        SdkEmitter::new(mode).emit(&collector.into_records())
    }

    #[test]
    fn test_emit_single_action() {
        insta::assert_snapshot!(
            emit("query GetUser($id: ID!) { user(id: $id) { id } }", DocumentMode::GraphQLTag),
            @r"
        export type Variables = { [key: string]: any }
        export type SdkFunctionWrapper<RequestOptions extends any> = <T>(
          action: (requestOpts?: RequestOptions) => Promise<T>,
          operationName: string
        ) => Promise<T>
        export type RequestDocument = string | DocumentNode
        export type RequestFunction<RequestOptions = any> = <T = any, V = Variables>(
          document: RequestDocument,
          variables?: V,
          requestOpts?: RequestOptions
        ) => Promise<T>

        const defaultWrapper: SdkFunctionWrapper<any> = (action, _operationName) => action()

        export function getSdk<RequestOptions extends Record<string, any>>(
          request: RequestFunction<RequestOptions>,
          withWrapper: SdkFunctionWrapper<RequestOptions> = defaultWrapper
        ) {
          return {
            GetUser(variables: GetUserQueryVariables, requestOpts?: RequestOptions): Promise<GetUserQuery> {
              return withWrapper((wrappedRequestOpts?: RequestOptions) => request<GetUserQuery>(GetUserDocument, variables, {...requestOpts, ...wrappedRequestOpts} as RequestOptions), 'GetUser');
            }
          };
        }
        export type Sdk = ReturnType<typeof getSdk>;
        "
        );
    }

    #[test]
    fn test_emit_without_records() {
        let out = SdkEmitter::new(DocumentMode::GraphQLTag).emit(&[]);
        assert!(out.contains("  return {};\n}\n"));
        assert!(out.ends_with("export type Sdk = ReturnType<typeof getSdk>;\n"));
    }

    #[test]
    fn test_actions_are_comma_separated_in_order() {
        let out = emit(
            "mutation Save($input: In!) { save } query List($first: Int) { list }",
            DocumentMode::String,
        );
        let save = out.find("    Save(variables: SaveMutationVariables").unwrap();
        let list = out.find("    List(variables?: ListQueryVariables").unwrap();
        assert!(save < list);
        assert!(out.contains("'Save');\n    },\n    List("));
    }

    #[test]
    fn test_external_mode_references_operations_namespace() {
        let out = emit("query GetUser { user { id } }", DocumentMode::External);
        assert!(out.contains("request<GetUserQuery>(Operations.GetUserDocument, variables,"));
    }

    #[test]
    fn test_emit_is_idempotent() {
        let interner = Interner::new();
        let result = parse("query A { a } query B($b: ID!) { b }", &interner);
        let provider = TypeScriptNaming::new(&SdkConfig::default());
        let mut bag = DiagnosticBag::new();
        let mut collector = OperationCollector::new(&interner, &provider, &mut bag);
        for op in result.document.operations() {
            collector.visit(op).unwrap();
        }
        let records = collector.into_records();
        let emitter = SdkEmitter::new(DocumentMode::DocumentNode);
        assert_eq!(emitter.emit(&records), emitter.emit(&records));
    }

    #[test]
    fn test_imports() {
        assert_eq!(
            SdkEmitter::imports(false),
            vec!["import { DocumentNode } from 'graphql';".to_string()]
        );
        assert_eq!(
            SdkEmitter::imports(true),
            vec!["import type { DocumentNode } from 'graphql';".to_string()]
        );
    }
}
