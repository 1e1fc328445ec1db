//! Compiled document constants.
//!
//! Every action passes a compiled document to `request`. Depending on the
//! [`DocumentMode`] the document is a `gql` tagged template, a plain
//! string, a pre-parsed graphql-js `DocumentNode`, or a member of an
//! external `Operations` module.

use crate::collector::OperationRecord;
use crate::config::{DocumentMode, SdkConfig};
use crate::error::{CodegenError, Result};
use gqlreq_core::Interner;
use gqlreq_syntax::ast::*;
use gqlreq_syntax::{block_string_value, string_value, Printer};
use indexmap::{IndexMap, IndexSet};
use serde_json::{json, Map, Value as Json};

/// The expression an action uses to reference its compiled document.
pub fn resolve_document_reference(mode: DocumentMode, document_variable_name: &str) -> String {
    match mode {
        DocumentMode::External => format!("Operations.{document_variable_name}"),
        DocumentMode::GraphQLTag | DocumentMode::DocumentNode | DocumentMode::String => {
            document_variable_name.to_string()
        }
    }
}

/// Import lines required by the document mode.
pub fn mode_imports(config: &SdkConfig) -> Result<Vec<String>> {
    match config.document_mode {
        DocumentMode::GraphQLTag => Ok(vec!["import gql from 'graphql-tag';".to_string()]),
        DocumentMode::External => match config.import_document_node_externally_from.as_deref() {
            Some(path) if !path.is_empty() => {
                Ok(vec![format!("import * as Operations from '{path}';")])
            }
            _ => Err(CodegenError::Config(
                "documentMode `external` requires importDocumentNodeExternallyFrom".to_string(),
            )),
        },
        DocumentMode::DocumentNode | DocumentMode::String => Ok(Vec::new()),
    }
}

/// Fragment definitions of a document, by name.
#[derive(Debug, Default)]
pub struct FragmentMap<'a> {
    fragments: IndexMap<String, &'a FragmentDefinition>,
}

impl<'a> FragmentMap<'a> {
    /// Indexes the fragments of `document`. The first definition of a name wins.
    pub fn new(document: &'a Document, interner: &Interner) -> Self {
        let mut fragments = IndexMap::new();
        for fragment in document.fragments() {
            fragments
                .entry(interner.get(fragment.name.value))
                .or_insert(fragment);
        }
        Self { fragments }
    }

    pub fn get(&self, name: &str) -> Option<&'a FragmentDefinition> {
        self.fragments.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.fragments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    /// Fragments spread by `operation`, directly or through other fragments,
    /// in first-reference order.
    pub fn closure(
        &self,
        operation: &str,
        selection_set: &SelectionSet,
        interner: &Interner,
    ) -> Result<Vec<&'a FragmentDefinition>> {
        let mut seen = IndexSet::new();
        let mut ordered = Vec::new();
        self.visit(operation, selection_set, interner, &mut seen, &mut ordered)?;
        Ok(ordered)
    }

    fn visit(
        &self,
        operation: &str,
        selection_set: &SelectionSet,
        interner: &Interner,
        seen: &mut IndexSet<String>,
        ordered: &mut Vec<&'a FragmentDefinition>,
    ) -> Result<()> {
        let mut spreads = Vec::new();
        selection_set.for_each_spread(&mut |spread: &FragmentSpread| {
            spreads.push(interner.get(spread.name.value));
        });

        for name in spreads {
            if seen.contains(&name) {
                continue;
            }
            let fragment = self
                .get(&name)
                .ok_or_else(|| CodegenError::UnknownFragment {
                    operation: operation.to_string(),
                    fragment: name.clone(),
                })?;
            seen.insert(name);
            ordered.push(fragment);
            self.visit(operation, &fragment.selection_set, interner, seen, ordered)?;
        }
        Ok(())
    }
}

/// Renders the `export const` document declarations.
pub struct DocumentRenderer<'a> {
    mode: DocumentMode,
    interner: &'a Interner,
    fragments: &'a FragmentMap<'a>,
}

impl<'a> DocumentRenderer<'a> {
    pub fn new(mode: DocumentMode, interner: &'a Interner, fragments: &'a FragmentMap<'a>) -> Self {
        Self {
            mode,
            interner,
            fragments,
        }
    }

    /// Renders the declarations for all records, in order. External mode
    /// renders nothing.
    pub fn render_all(&self, records: &[OperationRecord<'_>]) -> Result<String> {
        let mut out = String::new();
        for record in records {
            if let Some(declaration) = self.render(record)? {
                out.push_str(&declaration);
                out.push('\n');
            }
        }
        Ok(out)
    }

    /// Renders one `export const` declaration.
    pub fn render(&self, record: &OperationRecord<'_>) -> Result<Option<String>> {
        if self.mode == DocumentMode::External {
            return Ok(None);
        }

        let node = record.node;
        let fragments = self
            .fragments
            .closure(&record.name, &node.selection_set, self.interner)?;
        let name = &record.document_variable_name;

        let declaration = match self.mode {
            DocumentMode::GraphQLTag => format!(
                "export const {name} = gql`\n{}\n`;",
                escape_template(&self.print(node, &fragments))
            ),
            DocumentMode::String => format!(
                "export const {name} = `\n{}\n`;",
                escape_template(&self.print(node, &fragments))
            ),
            DocumentMode::DocumentNode => {
                let mut definitions = vec![self.operation_json(node)];
                definitions.extend(fragments.iter().map(|f| self.fragment_json(f)));
                let document = json!({ "kind": "Document", "definitions": definitions });
                format!("export const {name} = {document} as unknown as DocumentNode;")
            }
            DocumentMode::External => return Ok(None),
        };

        tracing::debug!(
            operation = %record.name,
            document = %name,
            fragments = fragments.len(),
            "rendered document"
        );
        Ok(Some(declaration))
    }

    fn print(&self, node: &OperationDefinition, fragments: &[&FragmentDefinition]) -> String {
        let mut printer = Printer::new(self.interner);
        printer.operation(node);
        for fragment in fragments {
            printer.fragment(fragment);
        }
        printer.finish()
    }

    fn name_json(&self, name: &Name) -> Json {
        json!({ "kind": "Name", "value": self.interner.get(name.value) })
    }

    fn operation_json(&self, node: &OperationDefinition) -> Json {
        let mut obj = Map::new();
        obj.insert("kind".into(), json!("OperationDefinition"));
        obj.insert("operation".into(), json!(node.operation.as_str()));
        if let Some(name) = &node.name {
            obj.insert("name".into(), self.name_json(name));
        }
        let variables: Vec<Json> = node
            .variables
            .iter()
            .map(|var| self.variable_json(var))
            .collect();
        obj.insert("variableDefinitions".into(), Json::Array(variables));
        self.insert_directives(&mut obj, &node.directives);
        obj.insert(
            "selectionSet".into(),
            self.selection_set_json(&node.selection_set),
        );
        Json::Object(obj)
    }

    fn fragment_json(&self, fragment: &FragmentDefinition) -> Json {
        let mut obj = Map::new();
        obj.insert("kind".into(), json!("FragmentDefinition"));
        obj.insert("name".into(), self.name_json(&fragment.name));
        obj.insert(
            "typeCondition".into(),
            json!({ "kind": "NamedType", "name": self.name_json(&fragment.type_condition) }),
        );
        self.insert_directives(&mut obj, &fragment.directives);
        obj.insert(
            "selectionSet".into(),
            self.selection_set_json(&fragment.selection_set),
        );
        Json::Object(obj)
    }

    fn variable_json(&self, var: &VariableDefinition) -> Json {
        let mut obj = Map::new();
        obj.insert("kind".into(), json!("VariableDefinition"));
        obj.insert(
            "variable".into(),
            json!({ "kind": "Variable", "name": self.name_json(&var.name) }),
        );
        obj.insert("type".into(), self.type_json(&var.ty));
        if let Some(default) = &var.default_value {
            obj.insert("defaultValue".into(), self.value_json(default));
        }
        self.insert_directives(&mut obj, &var.directives);
        Json::Object(obj)
    }

    fn type_json(&self, ty: &Type) -> Json {
        match ty {
            Type::Named(named) => json!({
                "kind": "NamedType",
                "name": { "kind": "Name", "value": self.interner.get(named.name) },
            }),
            Type::List(inner, _) => json!({ "kind": "ListType", "type": self.type_json(inner) }),
            Type::NonNull(inner, _) => {
                json!({ "kind": "NonNullType", "type": self.type_json(inner) })
            }
        }
    }

    fn selection_set_json(&self, set: &SelectionSet) -> Json {
        let selections: Vec<Json> = set
            .selections
            .iter()
            .map(|selection| self.selection_json(selection))
            .collect();
        json!({ "kind": "SelectionSet", "selections": selections })
    }

    fn selection_json(&self, selection: &Selection) -> Json {
        let mut obj = Map::new();
        match selection {
            Selection::Field(field) => {
                obj.insert("kind".into(), json!("Field"));
                if let Some(alias) = &field.alias {
                    obj.insert("alias".into(), self.name_json(alias));
                }
                obj.insert("name".into(), self.name_json(&field.name));
                self.insert_arguments(&mut obj, &field.arguments);
                self.insert_directives(&mut obj, &field.directives);
                if let Some(set) = &field.selection_set {
                    obj.insert("selectionSet".into(), self.selection_set_json(set));
                }
            }
            Selection::FragmentSpread(spread) => {
                obj.insert("kind".into(), json!("FragmentSpread"));
                obj.insert("name".into(), self.name_json(&spread.name));
                self.insert_directives(&mut obj, &spread.directives);
            }
            Selection::InlineFragment(inline) => {
                obj.insert("kind".into(), json!("InlineFragment"));
                if let Some(condition) = &inline.type_condition {
                    obj.insert(
                        "typeCondition".into(),
                        json!({ "kind": "NamedType", "name": self.name_json(condition) }),
                    );
                }
                self.insert_directives(&mut obj, &inline.directives);
                obj.insert(
                    "selectionSet".into(),
                    self.selection_set_json(&inline.selection_set),
                );
            }
        }
        Json::Object(obj)
    }

    fn insert_arguments(&self, obj: &mut Map<String, Json>, arguments: &[Argument]) {
        if arguments.is_empty() {
            return;
        }
        let arguments: Vec<Json> = arguments
            .iter()
            .map(|arg| {
                json!({
                    "kind": "Argument",
                    "name": self.name_json(&arg.name),
                    "value": self.value_json(&arg.value),
                })
            })
            .collect();
        obj.insert("arguments".into(), Json::Array(arguments));
    }

    fn insert_directives(&self, obj: &mut Map<String, Json>, directives: &[Directive]) {
        if directives.is_empty() {
            return;
        }
        let directives: Vec<Json> = directives
            .iter()
            .map(|directive| {
                let mut dir = Map::new();
                dir.insert("kind".into(), json!("Directive"));
                dir.insert("name".into(), self.name_json(&directive.name));
                self.insert_arguments(&mut dir, &directive.arguments);
                Json::Object(dir)
            })
            .collect();
        obj.insert("directives".into(), Json::Array(directives));
    }

    fn value_json(&self, value: &Value) -> Json {
        match value {
            Value::Variable(name) => json!({ "kind": "Variable", "name": self.name_json(name) }),
            Value::Int(raw, _) => json!({ "kind": "IntValue", "value": raw }),
            Value::Float(raw, _) => json!({ "kind": "FloatValue", "value": raw }),
            Value::String(raw, _) => json!({ "kind": "StringValue", "value": string_value(raw) }),
            Value::BlockString(raw, _) => json!({
                "kind": "StringValue",
                "value": block_string_value(raw),
                "block": true,
            }),
            Value::Boolean(b, _) => json!({ "kind": "BooleanValue", "value": b }),
            Value::Null(_) => json!({ "kind": "NullValue" }),
            Value::Enum(name) => {
                json!({ "kind": "EnumValue", "value": self.interner.get(name.value) })
            }
            Value::List(items, _) => {
                let values: Vec<Json> = items.iter().map(|item| self.value_json(item)).collect();
                json!({ "kind": "ListValue", "values": values })
            }
            Value::Object(fields, _) => {
                let fields: Vec<Json> = fields
                    .iter()
                    .map(|(name, value)| {
                        json!({
                            "kind": "ObjectField",
                            "name": self.name_json(name),
                            "value": self.value_json(value),
                        })
                    })
                    .collect();
                json!({ "kind": "ObjectValue", "fields": fields })
            }
        }
    }
}

/// Escapes text for a JavaScript template literal.
pub fn escape_template(text: &str) -> String {
    text.replace('\\', "\\\\")
        .replace('`', "\\`")
        .replace("${", "\\${")
}
