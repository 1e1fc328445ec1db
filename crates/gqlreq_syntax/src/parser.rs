//! Recursive descent parser for GraphQL executable documents.
//!
//! The parser never stops at the first error. Problems are recorded in the
//! returned `DiagnosticBag` and parsing resumes at the next definition, so a
//! single typo does not hide every later operation from the caller.

use crate::ast::*;
use crate::lexer::Lexer;
use crate::token::{Token, TokenKind};
use gqlreq_core::{diagnostics::codes, DiagnosticBag, Interner, Span, Text};

/// Parser for GraphQL executable documents.
pub struct Parser<'a> {
    lexer: Lexer<'a>,
    current: Token,
    /// End offset of the last consumed token.
    last_end: u32,
    diagnostics: DiagnosticBag,
}

/// Result of parsing.
#[derive(Debug)]
pub struct ParseResult {
    pub document: Document,
    pub diagnostics: DiagnosticBag,
}

/// Parses a source string into a document.
pub fn parse(source: &str, interner: &Interner) -> ParseResult {
    let mut parser = Parser::new(source, interner);
    let document = parser.parse_document();
    ParseResult {
        document,
        diagnostics: parser.diagnostics,
    }
}

impl<'a> Parser<'a> {
    pub fn new(source: &'a str, interner: &'a Interner) -> Self {
        let mut lexer = Lexer::new(source, interner);
        let current = lexer.next_token();
        Self {
            lexer,
            current,
            last_end: 0,
            diagnostics: DiagnosticBag::new(),
        }
    }

    #[inline]
    fn at(&self) -> TokenKind {
        self.current.kind
    }

    #[inline]
    fn at_kind(&self, kind: TokenKind) -> bool {
        self.current.kind == kind
    }

    /// Returns true at the closing token of a list, or at end of input.
    #[inline]
    fn at_list_end(&self, close: TokenKind) -> bool {
        self.at_kind(close) || self.at_kind(TokenKind::Eof)
    }

    fn advance(&mut self) {
        if !self.current.is_eof() {
            self.last_end = self.current.span.end;
        }
        self.current = self.lexer.next_token();
    }

    fn expect(&mut self, kind: TokenKind) -> bool {
        if self.at_kind(kind) {
            self.advance();
            true
        } else {
            self.error_expected(kind.as_str());
            false
        }
    }

    fn current_text(&self) -> &'a str {
        self.lexer.span_text(self.current.span)
    }

    fn intern_current(&self) -> Text {
        self.lexer.intern_span(self.current.span)
    }

    fn span_from(&self, start: u32) -> Span {
        Span::new(start, self.last_end.max(start))
    }

    /// Reports that something else was expected at the current token.
    fn error_expected(&mut self, expected: &str) {
        let found = match self.at() {
            TokenKind::Ident
            | TokenKind::IntLiteral
            | TokenKind::FloatLiteral
            | TokenKind::Error => format!("`{}`", self.current_text()),
            kind => kind.to_string(),
        };
        let (code, title) = match self.at() {
            TokenKind::Eof => (codes::UNEXPECTED_EOF, "unexpected end of document"),
            TokenKind::Error if is_closed_string(self.current_text()) => {
                (codes::INVALID_ESCAPE, "invalid escape sequence")
            }
            TokenKind::Error if self.current_text().starts_with('"') => {
                (codes::UNTERMINATED_STRING, "unterminated string")
            }
            _ => (codes::UNEXPECTED_TOKEN, "unexpected token"),
        };
        self.diagnostics.error(
            code,
            title,
            self.current.span,
            format!("expected {expected}, found {found}"),
        );
    }

    /// Runs `parse_item` until `close` is reached, guaranteeing progress.
    fn parse_list<T>(
        &mut self,
        close: TokenKind,
        mut parse_item: impl FnMut(&mut Self) -> T,
    ) -> Vec<T> {
        let mut items = Vec::new();
        while !self.at_list_end(close) {
            let before = self.current.span.start;
            items.push(parse_item(self));
            if self.current.span.start == before && !self.current.is_eof() {
                self.advance();
            }
        }
        items
    }

    /// Skips ahead to the next token that starts an operation or fragment,
    /// stepping over balanced braces.
    fn recover_to_definition(&mut self) {
        let mut depth = 0usize;
        loop {
            match self.at() {
                TokenKind::Eof => return,
                TokenKind::LBrace => depth += 1,
                TokenKind::RBrace => depth = depth.saturating_sub(1),
                TokenKind::Query
                | TokenKind::Mutation
                | TokenKind::Subscription
                | TokenKind::Fragment
                    if depth == 0 =>
                {
                    return;
                }
                _ => {}
            }
            self.advance();
        }
    }

    /// Parses a document.
    pub fn parse_document(&mut self) -> Document {
        let start = self.current.span.start;
        let mut definitions = Vec::new();

        while !self.at_kind(TokenKind::Eof) {
            if self.at().starts_definition() {
                definitions.push(self.parse_definition());
            } else {
                self.error_expected("operation or fragment definition");
                self.advance();
                self.recover_to_definition();
            }
        }

        Document {
            definitions,
            span: self.span_from(start),
        }
    }

    fn parse_definition(&mut self) -> Definition {
        if self.at_kind(TokenKind::Fragment) {
            Definition::Fragment(self.parse_fragment_definition())
        } else {
            Definition::Operation(self.parse_operation())
        }
    }

    /// Parses a name. Keywords are accepted since GraphQL keywords are
    /// contextual.
    fn parse_name(&mut self) -> Name {
        let span = self.current.span;
        if self.at_kind(TokenKind::Ident) || self.at().is_keyword() {
            let value = self.intern_current();
            self.advance();
            Name::new(value, span)
        } else {
            self.error_expected("name");
            Name::new(self.lexer.intern_span(Span::empty(span.start)), Span::empty(span.start))
        }
    }

    fn at_name(&self) -> bool {
        self.at_kind(TokenKind::Ident) || self.at().is_keyword()
    }

    /// Parses an operation definition.
    fn parse_operation(&mut self) -> OperationDefinition {
        let start = self.current.span.start;

        let (operation, name) = if self.at_kind(TokenKind::LBrace) {
            (OperationType::Query, None)
        } else {
            let op = match self.at() {
                TokenKind::Mutation => OperationType::Mutation,
                TokenKind::Subscription => OperationType::Subscription,
                _ => OperationType::Query,
            };
            self.advance();

            let name = self.at_name().then(|| self.parse_name());
            (op, name)
        };

        let variables = if self.at_kind(TokenKind::LParen) {
            self.advance();
            let vars = self.parse_list(TokenKind::RParen, Self::parse_variable_definition);
            self.expect(TokenKind::RParen);
            vars
        } else {
            Vec::new()
        };

        let directives = self.parse_directives();
        let selection_set = self.parse_selection_set();

        OperationDefinition {
            operation,
            name,
            variables,
            directives,
            selection_set,
            span: self.span_from(start),
        }
    }

    fn parse_variable_definition(&mut self) -> VariableDefinition {
        let start = self.current.span.start;
        self.expect(TokenKind::Dollar);
        let name = self.parse_name();
        self.expect(TokenKind::Colon);
        let ty = self.parse_type();

        let default_value = if self.at_kind(TokenKind::Eq) {
            self.advance();
            Some(self.parse_value())
        } else {
            None
        };

        let directives = self.parse_directives();

        VariableDefinition {
            name,
            ty,
            default_value,
            directives,
            span: self.span_from(start),
        }
    }

    /// Parses a type reference: `Name`, `[Type]`, either followed by `!`.
    fn parse_type(&mut self) -> Type {
        let start = self.current.span.start;

        let inner = if self.at_kind(TokenKind::LBracket) {
            self.advance();
            let item = self.parse_type();
            self.expect(TokenKind::RBracket);
            Type::List(Box::new(item), self.span_from(start))
        } else {
            let name = self.parse_name();
            Type::Named(NamedType {
                name: name.value,
                span: name.span,
            })
        };

        if self.at_kind(TokenKind::Bang) {
            self.advance();
            Type::NonNull(Box::new(inner), self.span_from(start))
        } else {
            inner
        }
    }

    fn parse_directives(&mut self) -> Vec<Directive> {
        let mut directives = Vec::new();
        while self.at_kind(TokenKind::At) {
            directives.push(self.parse_directive());
        }
        directives
    }

    fn parse_directive(&mut self) -> Directive {
        let start = self.current.span.start;
        self.advance(); // @

        let name = self.parse_name();
        let arguments = self.parse_optional_arguments();

        Directive {
            name,
            arguments,
            span: self.span_from(start),
        }
    }

    fn parse_optional_arguments(&mut self) -> Vec<Argument> {
        if !self.at_kind(TokenKind::LParen) {
            return Vec::new();
        }
        self.advance();
        let args = self.parse_list(TokenKind::RParen, Self::parse_argument);
        self.expect(TokenKind::RParen);
        args
    }

    fn parse_argument(&mut self) -> Argument {
        let start = self.current.span.start;
        let name = self.parse_name();
        self.expect(TokenKind::Colon);
        let value = self.parse_value();
        Argument {
            name,
            value,
            span: self.span_from(start),
        }
    }

    /// Parses a value.
    fn parse_value(&mut self) -> Value {
        let start = self.current.span.start;

        match self.at() {
            TokenKind::Dollar => {
                self.advance();
                Value::Variable(self.parse_name())
            }
            TokenKind::IntLiteral => {
                let text = self.current_text().to_string();
                self.advance();
                Value::Int(text, self.span_from(start))
            }
            TokenKind::FloatLiteral => {
                let text = self.current_text().to_string();
                self.advance();
                Value::Float(text, self.span_from(start))
            }
            TokenKind::StringLiteral => {
                let text = self.current_text();
                let value = text[1..text.len() - 1].to_string();
                self.advance();
                Value::String(value, self.span_from(start))
            }
            TokenKind::BlockStringLiteral => {
                let text = self.current_text();
                let value = text[3..text.len() - 3].to_string();
                self.advance();
                Value::BlockString(value, self.span_from(start))
            }
            TokenKind::True | TokenKind::False => {
                let value = self.at_kind(TokenKind::True);
                self.advance();
                Value::Boolean(value, self.span_from(start))
            }
            TokenKind::Null => {
                self.advance();
                Value::Null(self.span_from(start))
            }
            TokenKind::LBracket => {
                self.advance();
                let values = self.parse_list(TokenKind::RBracket, Self::parse_value);
                self.expect(TokenKind::RBracket);
                Value::List(values, self.span_from(start))
            }
            TokenKind::LBrace => {
                self.advance();
                let fields = self.parse_list(TokenKind::RBrace, |p| {
                    let name = p.parse_name();
                    p.expect(TokenKind::Colon);
                    (name, p.parse_value())
                });
                self.expect(TokenKind::RBrace);
                Value::Object(fields, self.span_from(start))
            }
            kind if kind == TokenKind::Ident || kind.is_keyword() => {
                Value::Enum(self.parse_name())
            }
            _ => {
                self.error_expected("value");
                Value::Null(Span::empty(start))
            }
        }
    }

    fn parse_fragment_definition(&mut self) -> FragmentDefinition {
        let start = self.current.span.start;
        self.advance(); // fragment

        let name = self.parse_name();
        self.expect(TokenKind::On);
        let type_condition = self.parse_name();
        let directives = self.parse_directives();
        let selection_set = self.parse_selection_set();

        FragmentDefinition {
            name,
            type_condition,
            directives,
            selection_set,
            span: self.span_from(start),
        }
    }

    fn parse_selection_set(&mut self) -> SelectionSet {
        let start = self.current.span.start;
        if !self.expect(TokenKind::LBrace) {
            return SelectionSet {
                selections: Vec::new(),
                span: Span::empty(start),
            };
        }

        let selections = self.parse_list(TokenKind::RBrace, Self::parse_selection);
        if selections.is_empty() && self.at_kind(TokenKind::RBrace) {
            self.diagnostics.error(
                codes::INVALID_SYNTAX,
                "empty selection set",
                self.current.span,
                "a selection set must select at least one field",
            );
        }
        self.expect(TokenKind::RBrace);

        SelectionSet {
            selections,
            span: self.span_from(start),
        }
    }

    fn parse_selection(&mut self) -> Selection {
        if !self.at_kind(TokenKind::Spread) {
            return Selection::Field(self.parse_field_selection());
        }

        let start = self.current.span.start;
        self.advance(); // ...

        if self.at_kind(TokenKind::On) {
            self.advance();
            let type_condition = Some(self.parse_name());
            let directives = self.parse_directives();
            let selection_set = self.parse_selection_set();
            Selection::InlineFragment(InlineFragment {
                type_condition,
                directives,
                selection_set,
                span: self.span_from(start),
            })
        } else if self.at_kind(TokenKind::LBrace) || self.at_kind(TokenKind::At) {
            let directives = self.parse_directives();
            let selection_set = self.parse_selection_set();
            Selection::InlineFragment(InlineFragment {
                type_condition: None,
                directives,
                selection_set,
                span: self.span_from(start),
            })
        } else {
            let name = self.parse_name();
            let directives = self.parse_directives();
            Selection::FragmentSpread(FragmentSpread {
                name,
                directives,
                span: self.span_from(start),
            })
        }
    }

    fn parse_field_selection(&mut self) -> FieldSelection {
        let start = self.current.span.start;

        let first_name = self.parse_name();
        let (alias, name) = if self.at_kind(TokenKind::Colon) {
            self.advance();
            (Some(first_name), self.parse_name())
        } else {
            (None, first_name)
        };

        let arguments = self.parse_optional_arguments();
        let directives = self.parse_directives();

        let selection_set = self
            .at_kind(TokenKind::LBrace)
            .then(|| self.parse_selection_set());

        FieldSelection {
            alias,
            name,
            arguments,
            directives,
            selection_set,
            span: self.span_from(start),
        }
    }
}

/// A `"..."` token that is closed but was rejected for its escapes.
fn is_closed_string(text: &str) -> bool {
    if text.starts_with("\"\"\"") {
        return false;
    }
    let Some(body) = text
        .strip_prefix('"')
        .and_then(|rest| rest.strip_suffix('"'))
    else {
        return false;
    };
    let trailing_backslashes = body.bytes().rev().take_while(|b| *b == b'\\').count();
    trailing_backslashes % 2 == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_ok(source: &str, interner: &Interner) -> Document {
        let result = parse(source, interner);
        assert!(
            !result.diagnostics.has_errors(),
            "unexpected errors: {:?}",
            result.diagnostics
        );
        result.document
    }

    #[test]
    fn test_parse_named_query_with_variables() {
        let interner = Interner::new();
        let doc = parse_ok(
            "query GetUser($id: ID!, $limit: Int = 10) { user(id: $id) { id name } }",
            &interner,
        );

        let op = doc.operations().next().unwrap();
        assert_eq!(op.operation, OperationType::Query);
        assert_eq!(op.name_str(&interner).as_deref(), Some("GetUser"));
        assert_eq!(op.variables.len(), 2);
        assert!(op.variables[0].ty.is_non_null());
        assert!(op.variables[0].default_value.is_none());
        assert!(!op.variables[1].ty.is_non_null());
        assert!(matches!(op.variables[1].default_value, Some(Value::Int(ref n, _)) if n == "10"));
    }

    #[test]
    fn test_parse_anonymous_shorthand() {
        let interner = Interner::new();
        let doc = parse_ok("{ viewer { id } }", &interner);
        let op = doc.operations().next().unwrap();
        assert_eq!(op.operation, OperationType::Query);
        assert!(op.name.is_none());
    }

    #[test]
    fn test_parse_anonymous_mutation() {
        let interner = Interner::new();
        let doc = parse_ok("mutation ($input: In!) { save(input: $input) }", &interner);
        let op = doc.operations().next().unwrap();
        assert_eq!(op.operation, OperationType::Mutation);
        assert!(op.name_str(&interner).is_none());
        assert_eq!(op.variables.len(), 1);
    }

    #[test]
    fn test_parse_keyword_as_name() {
        let interner = Interner::new();
        let doc = parse_ok("query query { on fragment: type }", &interner);
        let op = doc.operations().next().unwrap();
        assert_eq!(op.name_str(&interner).as_deref(), Some("query"));
        assert_eq!(op.selection_set.selections.len(), 2);
    }

    #[test]
    fn test_parse_list_and_non_null_types() {
        let interner = Interner::new();
        let doc = parse_ok("query Q($ids: [ID!]!, $tags: [String]) { a }", &interner);
        let op = doc.operations().next().unwrap();
        match &op.variables[0].ty {
            Type::NonNull(inner, _) => assert!(matches!(**inner, Type::List(..))),
            other => panic!("expected non-null list, got {other:?}"),
        }
        assert!(matches!(op.variables[1].ty, Type::List(..)));
    }

    #[test]
    fn test_parse_fragments_and_spreads() {
        let interner = Interner::new();
        let doc = parse_ok(
            "query Q { node { ...UserFields ... on Admin { level } ... @include(if: true) { x } } }
             fragment UserFields on User { id }",
            &interner,
        );
        assert_eq!(doc.operations().count(), 1);
        assert_eq!(doc.fragments().count(), 1);

        let mut spreads = Vec::new();
        doc.operations()
            .next()
            .unwrap()
            .selection_set
            .for_each_spread(&mut |spread| spreads.push(interner.get(spread.name.value)));
        assert_eq!(spreads, vec!["UserFields".to_string()]);
    }

    #[test]
    fn test_parse_values() {
        let interner = Interner::new();
        let doc = parse_ok(
            r#"query Q { f(a: 1.5e3, b: "s", c: [1 2], d: {x: RED, y: null}, e: false) }"#,
            &interner,
        );
        let op = doc.operations().next().unwrap();
        let Selection::Field(field) = &op.selection_set.selections[0] else {
            panic!("expected field");
        };
        assert_eq!(field.arguments.len(), 5);
        assert!(matches!(field.arguments[0].value, Value::Float(ref f, _) if f == "1.5e3"));
        assert!(matches!(field.arguments[3].value, Value::Object(ref fields, _) if fields.len() == 2));
    }

    #[test]
    fn test_operation_span_covers_source() {
        let interner = Interner::new();
        let source = "  query A { a }  ";
        let doc = parse_ok(source, &interner);
        let op = doc.operations().next().unwrap();
        assert_eq!(op.span.slice(source), "query A { a }");
    }

    #[test]
    fn test_recovers_after_invalid_definition() {
        let interner = Interner::new();
        let result = parse(
            "type User { id: ID } query Next { a } fragment F on T { b }",
            &interner,
        );
        assert_eq!(result.diagnostics.error_count(), 1);
        assert_eq!(result.document.operations().count(), 1);
        assert_eq!(result.document.fragments().count(), 1);
    }

    #[test]
    fn test_reports_unterminated_string() {
        let interner = Interner::new();
        let result = parse("query Q { f(a: \"oops) }", &interner);
        let first = result.diagnostics.errors().next().unwrap();
        assert_eq!(first.code, codes::UNTERMINATED_STRING);
    }

    #[test]
    fn test_reports_invalid_escape() {
        let interner = Interner::new();
        let result = parse(r#"query Q { a(b: "\u") }"#, &interner);
        let first = result.diagnostics.errors().next().unwrap();
        assert_eq!(first.code, codes::INVALID_ESCAPE);

        let result = parse(r#"query Q { c(d: "\x41") }"#, &interner);
        let first = result.diagnostics.errors().next().unwrap();
        assert_eq!(first.code, codes::INVALID_ESCAPE);
    }

    #[test]
    fn test_reports_empty_selection_set() {
        let interner = Interner::new();
        let result = parse("query Q { }", &interner);
        assert!(result.diagnostics.has_errors());
    }

    #[test]
    fn test_reports_unexpected_eof() {
        let interner = Interner::new();
        let result = parse("query Q { user { id }", &interner);
        let first = result.diagnostics.errors().next().unwrap();
        assert_eq!(first.code, codes::UNEXPECTED_EOF);
    }
}
