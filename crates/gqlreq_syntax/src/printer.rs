//! Canonical GraphQL printing.
//!
//! Output follows the layout of graphql-js `print`: two-space indentation,
//! one selection per line, arguments and variables separated by `, `.

use crate::ast::*;
use gqlreq_core::Interner;

/// Prints operations and fragments back to GraphQL source.
pub struct Printer<'a> {
    interner: &'a Interner,
    output: String,
    indent: usize,
}

impl<'a> Printer<'a> {
    pub fn new(interner: &'a Interner) -> Self {
        Self {
            interner,
            output: String::new(),
            indent: 0,
        }
    }

    /// Consumes the printer, returning everything printed so far.
    #[must_use]
    pub fn finish(self) -> String {
        self.output
    }

    fn push_name(&mut self, name: &Name) {
        self.output.push_str(&self.interner.get(name.value));
    }

    fn push_indent(&mut self) {
        for _ in 0..self.indent {
            self.output.push_str("  ");
        }
    }

    /// Prints a definition, separating it from earlier output by a blank line.
    pub fn definition(&mut self, def: &Definition) -> &mut Self {
        match def {
            Definition::Operation(op) => self.operation(op),
            Definition::Fragment(fragment) => self.fragment(fragment),
        }
    }

    fn separate(&mut self) {
        if !self.output.is_empty() {
            self.output.push_str("\n\n");
        }
    }

    pub fn operation(&mut self, op: &OperationDefinition) -> &mut Self {
        self.separate();

        let shorthand = op.operation == OperationType::Query
            && op.name.is_none()
            && op.variables.is_empty()
            && op.directives.is_empty();

        if !shorthand {
            self.output.push_str(op.operation.as_str());
            if let Some(name) = &op.name {
                self.output.push(' ');
                self.push_name(name);
            }
            self.variable_definitions(&op.variables);
            self.directives(&op.directives);
            self.output.push(' ');
        }
        self.selection_set(&op.selection_set);
        self
    }

    pub fn fragment(&mut self, fragment: &FragmentDefinition) -> &mut Self {
        self.separate();
        self.output.push_str("fragment ");
        self.push_name(&fragment.name);
        self.output.push_str(" on ");
        self.push_name(&fragment.type_condition);
        self.directives(&fragment.directives);
        self.output.push(' ');
        self.selection_set(&fragment.selection_set);
        self
    }

    fn variable_definitions(&mut self, variables: &[VariableDefinition]) {
        if variables.is_empty() {
            return;
        }
        self.output.push('(');
        for (i, var) in variables.iter().enumerate() {
            if i > 0 {
                self.output.push_str(", ");
            }
            self.output.push('$');
            self.push_name(&var.name);
            self.output.push_str(": ");
            self.ty(&var.ty);
            if let Some(default) = &var.default_value {
                self.output.push_str(" = ");
                self.value(default);
            }
            self.directives(&var.directives);
        }
        self.output.push(')');
    }

    fn ty(&mut self, ty: &Type) {
        match ty {
            Type::Named(named) => self.output.push_str(&self.interner.get(named.name)),
            Type::List(inner, _) => {
                self.output.push('[');
                self.ty(inner);
                self.output.push(']');
            }
            Type::NonNull(inner, _) => {
                self.ty(inner);
                self.output.push('!');
            }
        }
    }

    fn selection_set(&mut self, set: &SelectionSet) {
        self.output.push_str("{\n");
        self.indent += 1;
        for selection in &set.selections {
            self.push_indent();
            self.selection(selection);
            self.output.push('\n');
        }
        self.indent -= 1;
        self.push_indent();
        self.output.push('}');
    }

    fn selection(&mut self, selection: &Selection) {
        match selection {
            Selection::Field(field) => {
                if let Some(alias) = &field.alias {
                    self.push_name(alias);
                    self.output.push_str(": ");
                }
                self.push_name(&field.name);
                self.arguments(&field.arguments);
                self.directives(&field.directives);
                if let Some(set) = &field.selection_set {
                    self.output.push(' ');
                    self.selection_set(set);
                }
            }
            Selection::FragmentSpread(spread) => {
                self.output.push_str("...");
                self.push_name(&spread.name);
                self.directives(&spread.directives);
            }
            Selection::InlineFragment(inline) => {
                self.output.push_str("...");
                if let Some(condition) = &inline.type_condition {
                    self.output.push_str(" on ");
                    self.push_name(condition);
                }
                self.directives(&inline.directives);
                self.output.push(' ');
                self.selection_set(&inline.selection_set);
            }
        }
    }

    fn arguments(&mut self, arguments: &[Argument]) {
        if arguments.is_empty() {
            return;
        }
        self.output.push('(');
        for (i, arg) in arguments.iter().enumerate() {
            if i > 0 {
                self.output.push_str(", ");
            }
            self.push_name(&arg.name);
            self.output.push_str(": ");
            self.value(&arg.value);
        }
        self.output.push(')');
    }

    fn directives(&mut self, directives: &[Directive]) {
        for directive in directives {
            self.output.push_str(" @");
            self.push_name(&directive.name);
            self.arguments(&directive.arguments);
        }
    }

    fn value(&mut self, value: &Value) {
        match value {
            Value::Variable(name) => {
                self.output.push('$');
                self.push_name(name);
            }
            Value::Int(raw, _) | Value::Float(raw, _) => self.output.push_str(raw),
            Value::String(raw, _) => {
                self.output.push('"');
                self.output.push_str(raw);
                self.output.push('"');
            }
            Value::BlockString(raw, _) => {
                self.output.push_str("\"\"\"");
                self.output.push_str(raw);
                self.output.push_str("\"\"\"");
            }
            Value::Boolean(b, _) => self.output.push_str(if *b { "true" } else { "false" }),
            Value::Null(_) => self.output.push_str("null"),
            Value::Enum(name) => self.push_name(name),
            Value::List(items, _) => {
                self.output.push('[');
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        self.output.push_str(", ");
                    }
                    self.value(item);
                }
                self.output.push(']');
            }
            Value::Object(fields, _) => {
                self.output.push('{');
                for (i, (name, value)) in fields.iter().enumerate() {
                    if i > 0 {
                        self.output.push_str(", ");
                    }
                    self.push_name(name);
                    self.output.push_str(": ");
                    self.value(value);
                }
                self.output.push('}');
            }
        }
    }
}

/// Prints a single operation.
pub fn print_operation(op: &OperationDefinition, interner: &Interner) -> String {
    let mut printer = Printer::new(interner);
    printer.operation(op);
    printer.finish()
}

/// Prints a single fragment.
pub fn print_fragment(fragment: &FragmentDefinition, interner: &Interner) -> String {
    let mut printer = Printer::new(interner);
    printer.fragment(fragment);
    printer.finish()
}
