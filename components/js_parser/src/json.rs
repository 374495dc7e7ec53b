//! Strict JSON output
//!
//! [`JsonGenerator`] accepts only trees that denote a JSON value: object and
//! array literals, strings, numbers (optionally negated), booleans and
//! `null`. The first other node it meets is reported as a single fatal
//! `InvalidJsonOutput` diagnostic and the generator produces no output.

use crate::ast::*;
use crate::visitor::Visitor;
use core_types::{ContextError, Diagnostics, ErrorCode, SourceSpan};

/// Re-serializes a JSON value compactly
pub struct JsonGenerator<'d> {
    out: String,
    diagnostics: &'d mut Diagnostics,
    rejected: bool,
}

impl<'d> JsonGenerator<'d> {
    /// Create a generator that reports into `diagnostics`
    pub fn new(diagnostics: &'d mut Diagnostics) -> Self {
        Self {
            out: String::new(),
            diagnostics,
            rejected: false,
        }
    }

    /// Serialize `program`, or return an empty string if it is not a JSON
    /// value
    pub fn generate(mut self, program: &Program) -> String {
        program.accept(&mut self);
        if self.rejected {
            String::new()
        } else {
            self.out
        }
    }

    fn reject(&mut self, kind: &str, span: &SourceSpan) {
        if self.rejected {
            return;
        }
        self.rejected = true;
        log::debug!("json output rejected at line {}: {}", span.start_line, kind);
        self.diagnostics.push(ContextError::new(
            ErrorCode::InvalidJsonOutput,
            format!("{} is not a valid JSON value", kind),
            span,
        ));
    }

    fn string(&mut self, value: &str) {
        match serde_json::to_string(value) {
            Ok(quoted) => self.out.push_str(&quoted),
            Err(err) => {
                self.diagnostics.push(ContextError::fatal(
                    ErrorCode::InternalError,
                    format!("string serialization failed: {}", err),
                    None,
                ));
                self.rejected = true;
            }
        }
    }

    fn number(&mut self, value: f64, span: &SourceSpan) {
        match json_number(value) {
            Some(text) => self.out.push_str(&text),
            None => self.reject("non-finite number", span),
        }
    }

    fn key(&mut self, key: &PropertyKey, span: &SourceSpan) {
        match key {
            PropertyKey::Identifier(name) => self.string(name),
            PropertyKey::String { value: Some(value), .. } => self.string(value),
            PropertyKey::String { value: None, .. } => self.reject("unrepresentable string", span),
            PropertyKey::Number { value, .. } => match json_number(*value) {
                Some(text) => self.string(&text),
                None => self.reject("non-finite number", span),
            },
            PropertyKey::Computed(_) => self.reject("computed property name", span),
            PropertyKey::Private(_) => self.reject("private name", span),
        }
    }
}

impl Visitor for JsonGenerator<'_> {
    fn visit_program(&mut self, program: &Program) {
        match program.body.as_slice() {
            [Statement::ExpressionStatement { expression, .. }] => self.visit_expression(expression),
            [] => self.reject("empty input", &program.span),
            [first, ..] => self.visit_statement(first),
        }
    }

    fn visit_statement(&mut self, statement: &Statement) {
        self.reject("statement", statement.span());
    }

    fn visit_expression(&mut self, expression: &Expression) {
        if self.rejected {
            return;
        }
        match expression {
            Expression::Literal { value, span } => match value {
                Literal::Number { value, .. } => self.number(*value, span),
                Literal::String { value: Some(value), .. } => self.string(value),
                Literal::Boolean(true) => self.out.push_str("true"),
                Literal::Boolean(false) => self.out.push_str("false"),
                Literal::Null => self.out.push_str("null"),
                Literal::String { value: None, .. } => self.reject("unrepresentable string", span),
                Literal::BigInt(_) => self.reject(expression.kind_name(), span),
            },
            Expression::UnaryExpression {
                operator: UnaryOperator::Minus,
                argument,
                span,
            } => match &**argument {
                Expression::Literal {
                    value: Literal::Number { value, .. },
                    ..
                } => {
                    self.out.push('-');
                    self.number(*value, span);
                }
                _ => self.reject(expression.kind_name(), span),
            },
            Expression::ArrayExpression { elements, span } => {
                self.out.push('[');
                for (index, element) in elements.iter().enumerate() {
                    if index > 0 {
                        self.out.push(',');
                    }
                    match element {
                        Some(element) => self.visit_expression(element),
                        None => self.reject("array hole", span),
                    }
                }
                self.out.push(']');
            }
            Expression::ObjectExpression { properties, .. } => {
                self.out.push('{');
                for (index, property) in properties.iter().enumerate() {
                    if index > 0 {
                        self.out.push(',');
                    }
                    match property {
                        ObjectProperty::Property {
                            key,
                            value,
                            shorthand: false,
                            span,
                        } => {
                            self.key(key, span);
                            self.out.push(':');
                            self.visit_expression(value);
                        }
                        ObjectProperty::Property { span, .. } => self.reject("shorthand property", span),
                        ObjectProperty::Method { span, .. } => self.reject("method", span),
                        ObjectProperty::Spread { span, .. } => self.reject("spread element", span),
                    }
                }
                self.out.push('}');
            }
            other => self.reject(other.kind_name(), other.span()),
        }
    }

    fn visit_pattern(&mut self, pattern: &Pattern) {
        self.reject("pattern", pattern.span());
    }
}

/// JSON text for a number: integers without exponent below 1e21, otherwise
/// the shortest round-tripping form
fn json_number(value: f64) -> Option<String> {
    if !value.is_finite() {
        return None;
    }
    if value.fract() == 0.0 && value.abs() < 1e21 {
        return Some(format!("{}", value as i128));
    }
    let mut buffer = ryu::Buffer::new();
    Some(buffer.format_finite(value).to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::tokenize;
    use crate::parser::parse;
    use crate::settings::ScriptSettings;

    fn to_json(source: &str) -> (String, Diagnostics) {
        let mut diagnostics = Diagnostics::new();
        let program = parse(tokenize(source, None), &ScriptSettings::json(), &mut diagnostics);
        let output = JsonGenerator::new(&mut diagnostics).generate(&program);
        (output, diagnostics)
    }

    fn fatal_messages(diagnostics: &Diagnostics) -> Vec<String> {
        diagnostics
            .iter()
            .filter(|d| d.is_fatal())
            .map(|d| d.message.clone())
            .collect()
    }

    #[test]
    fn test_compact_reserialization() {
        let (output, diagnostics) = to_json("{\"a\": 1, \"b\": [1, 2, 3]}");
        assert_eq!(output, r#"{"a":1,"b":[1,2,3]}"#);
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_function_value_is_fatal() {
        let (output, diagnostics) = to_json("{\"a\": function(){}}");
        assert_eq!(output, "");
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(
            fatal_messages(&diagnostics),
            vec!["function expression is not a valid JSON value".to_string()]
        );
    }

    #[test]
    fn test_scalars_and_escapes() {
        let (output, _) = to_json("['x', \"q\\\"uote\", -2.50, 1e3, true, false, null, 0.1]");
        assert_eq!(output, r#"["x","q\"uote",-2.5,1000,true,false,null,0.1]"#);
    }

    #[test]
    fn test_identifier_keys_are_quoted() {
        let (output, diagnostics) = to_json("{a: {b: []}}");
        assert_eq!(output, r#"{"a":{"b":[]}}"#);
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_only_first_rejection_reported() {
        let (output, diagnostics) = to_json("[x, y, [1, 2][0]]");
        assert_eq!(output, "");
        assert_eq!(fatal_messages(&diagnostics), vec!["identifier is not a valid JSON value".to_string()]);
    }

    #[test]
    fn test_negation_only_on_numbers() {
        let (output, _) = to_json("-1");
        assert_eq!(output, "-1");
        let (output, diagnostics) = to_json("-'a'");
        assert_eq!(output, "");
        assert_eq!(fatal_messages(&diagnostics), vec!["unary expression is not a valid JSON value".to_string()]);
    }

    #[test]
    fn test_parse_error_yields_one_fatal() {
        let (output, diagnostics) = to_json("{\"a\": }");
        assert_eq!(output, "");
        assert_eq!(fatal_messages(&diagnostics).len(), 1);
        assert!(diagnostics.iter().any(|d| !d.is_fatal() && d.is_error()));
    }
}
