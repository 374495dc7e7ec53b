//! Embedded script regions
//!
//! `expression(...)` values hold a script expression. They go through the
//! script pipeline with local renaming off, since the names they use belong
//! to the host page.

use core_types::{ContextError, Diagnostics, SourceSpan};
use js_parser::{declare_scopes, parse, resolve_references, tokenize, CodeGenerator, OutputFormat, ScriptSettings};

/// Minify the script `source` found at `span`.
///
/// Script diagnostics are rebased onto the stylesheet and appended to
/// `diagnostics`. Returns `None` when the script has errors, in which case
/// the caller keeps the original text.
pub fn minify_expression(
    source: &str,
    span: &SourceSpan,
    settings: &ScriptSettings,
    diagnostics: &mut Diagnostics,
) -> Option<String> {
    let settings = ScriptSettings {
        format: OutputFormat::Normal,
        local_renaming: false,
        collapse_whitespace: true,
        term_semicolons: false,
        file_name: span.file_name().map(str::to_string),
        ..settings.clone()
    };

    let mut script_diagnostics = Diagnostics::new();
    let mut program = parse(
        tokenize(source, settings.file_name.as_deref()),
        &settings,
        &mut script_diagnostics,
    );
    let mut scopes = declare_scopes(&mut program, &settings, &mut script_diagnostics);
    resolve_references(&mut program, &mut scopes, &settings, &mut script_diagnostics);

    let failed = script_diagnostics.has_errors();
    // The body starts right after `expression(`.
    let origin = (span.start_line, span.start_column + "expression(".len() as u32);
    diagnostics.extend(script_diagnostics.into_iter().map(|error| rebase(error, origin)));
    if failed {
        log::debug!("keeping expression at line {} as written", span.start_line);
        return None;
    }
    Some(CodeGenerator::new(&settings, Some(&scopes)).generate(&program))
}

fn rebase(mut error: ContextError, (line, column): (u32, u32)) -> ContextError {
    if error.start_line == 0 {
        return error;
    }
    if error.start_line == 1 {
        error.start_column += column - 1;
    }
    if error.end_line == 1 {
        error.end_column += column - 1;
    }
    error.start_line += line - 1;
    error.end_line += line - 1;
    error
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_types::ErrorCode;

    fn span_at(line: u32, column: u32) -> SourceSpan {
        SourceSpan::new(Some("site.css"), line, column, line, column + 20)
    }

    #[test]
    fn test_expression_is_minified_without_renaming() {
        let mut diagnostics = Diagnostics::new();
        let output = minify_expression(
            "document.body.clientWidth > 800 ? \"800px\" : \"auto\"",
            &span_at(1, 8),
            &ScriptSettings::default(),
            &mut diagnostics,
        );
        assert_eq!(output.as_deref(), Some("document.body.clientWidth>800?\"800px\":\"auto\""));
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_broken_expression_keeps_source_and_rebases() {
        let mut diagnostics = Diagnostics::new();
        let output = minify_expression("a +", &span_at(3, 10), &ScriptSettings::default(), &mut diagnostics);
        assert_eq!(output, None);
        assert!(diagnostics
            .iter()
            .any(|e| e.is_error() && e.start_line == 3 && e.file_name == "site.css"));
    }

    #[test]
    fn test_rebase_columns_on_first_line_only() {
        let error = ContextError::new(
            ErrorCode::UndeclaredVariable,
            "'x' is not declared",
            &SourceSpan::new(None, 1, 5, 2, 3),
        );
        let rebased = rebase(error, (4, 21));
        assert_eq!(
            (rebased.start_line, rebased.start_column, rebased.end_line, rebased.end_column),
            (4, 25, 5, 3)
        );
    }
}
