//! Rich error rendering for formula and substitution input.
//!
//! Provides [`render_error`], which takes the text that was parsed and a
//! [`LangError`] and produces a source-annotated message (similar to `rustc`
//! output).

use std::ops::Range;

use annotate_snippets::{Level, Renderer, Snippet};

use crate::lang::{error::LangError, parser::ParseError};

/// Render a [`LangError`] with source context into a human-readable diagnostic string.
///
/// Uses `Renderer::plain()` (no ANSI codes) so the output is stable for tests and log-safe.
///
/// - `source`: the formula or substitution text that was parsed.
/// - `path`: optional origin for the `-->` line (a file name, or e.g. `<stdin>`).
/// - `error`: the error to render.
pub fn render_error(source: &str, path: Option<&str>, error: &LangError) -> String {
    let renderer = Renderer::plain();
    match error {
        LangError::Parse(e) => render_parse_error(&renderer, source, path, e),
        LangError::MalformedSubstitution { span, .. } => render_with_span(
            &renderer,
            source,
            path,
            "malformed substitution entry",
            *span,
            "expected `name/term`",
        ),
        LangError::InvalidSubstitutionName { name, span, .. } => {
            let title = format!("invalid variable name `{}`", name);
            render_with_span(
                &renderer,
                source,
                path,
                &title,
                *span,
                "substitutions bind plain identifiers",
            )
        }
        LangError::InvalidSubstitutionTerm { span, source: e, .. } => render_with_span(
            &renderer,
            source,
            path,
            "invalid term in substitution",
            *span,
            &e.message(),
        ),
        LangError::DuplicateBinding { name, span } => {
            let title = format!("variable `{}` is bound more than once", name);
            render_with_span(&renderer, source, path, &title, *span, "duplicate binding")
        }
        LangError::UnexpectedRule { .. } => render_title_only(&renderer, &error.to_string()),
    }
}

/// Render an error with only a title line and no source snippet.
fn render_title_only(renderer: &Renderer, message: &str) -> String {
    let msg = Level::Error.title(message);
    renderer.render(msg).to_string()
}

/// Render an error with a single annotated span in the source.
fn render_with_span(
    renderer: &Renderer,
    source: &str,
    path: Option<&str>,
    title: &str,
    span: (usize, usize),
    label: &str,
) -> String {
    let annotation = Level::Error.span(clamp(source, span)).label(label);
    let snippet = build_snippet(source, path).annotation(annotation);
    let msg = Level::Error.title(title).snippet(snippet);
    renderer.render(msg).to_string()
}

/// Pest reports end-of-input errors one past the last byte.
fn clamp(source: &str, (start, end): (usize, usize)) -> Range<usize> {
    let end = end.min(source.len());
    start.min(end)..end
}

/// Build a `Snippet` with source and optional path, ready for annotations.
fn build_snippet<'a>(source: &'a str, path: Option<&'a str>) -> Snippet<'a> {
    let mut snippet = Snippet::source(source).fold(true);
    if let Some(p) = path {
        snippet = snippet.origin(p);
    }
    snippet
}

fn render_parse_error(
    renderer: &Renderer,
    source: &str,
    path: Option<&str>,
    error: &ParseError,
) -> String {
    match error {
        ParseError::Pest(pest_err) => {
            let label = format_pest_label(pest_err);
            render_with_span(renderer, source, path, "syntax error", error.span(), &label)
        }
    }
}

/// Format the expectations from a pest error into a readable label.
fn format_pest_label<R: std::fmt::Debug>(error: &pest::error::Error<R>) -> String {
    match &error.variant {
        pest::error::ErrorVariant::ParsingError {
            positives,
            negatives,
        } => {
            let mut parts = Vec::new();
            if !positives.is_empty() {
                let names: Vec<String> = positives.iter().map(|r| format!("{:?}", r)).collect();
                parts.push(format!("expected {}", names.join(", ")));
            }
            if !negatives.is_empty() {
                let names: Vec<String> = negatives.iter().map(|r| format!("{:?}", r)).collect();
                parts.push(format!("unexpected {}", names.join(", ")));
            }
            if parts.is_empty() {
                "unexpected input".to_string()
            } else {
                parts.join("; ")
            }
        }
        pest::error::ErrorVariant::CustomError { message } => message.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lang::{parse_formula, parse_substitution, Rule};

    #[test]
    fn test_formula_syntax_error() {
        let source = "forall x. P(x) &";
        let err = parse_formula(source).unwrap_err();
        let rendered = render_error(source, Some("goal.fol"), &err);

        assert!(rendered.contains("syntax error"), "rendered: {rendered}");
        assert!(rendered.contains("goal.fol"), "rendered: {rendered}");
        assert!(rendered.contains("expected"), "rendered: {rendered}");
    }

    #[test]
    fn test_malformed_substitution() {
        let source = "x/a | y";
        let err = parse_substitution(source, &[]).unwrap_err();
        let rendered = render_error(source, None, &err);

        assert!(
            rendered.contains("malformed substitution entry"),
            "rendered: {rendered}"
        );
        assert!(rendered.contains("name/term"), "rendered: {rendered}");
        assert!(
            !rendered.contains("-->"),
            "should not have path line, rendered: {rendered}"
        );
    }

    #[test]
    fn test_duplicate_binding() {
        let source = "X_1/a | X_1/b";
        let err = parse_substitution(source, &[]).unwrap_err();
        let rendered = render_error(source, None, &err);

        assert!(rendered.contains("X_1"), "rendered: {rendered}");
        assert!(rendered.contains("duplicate binding"), "rendered: {rendered}");
    }

    #[test]
    fn test_invalid_substitution_term() {
        let source = "x/f(";
        let err = parse_substitution(source, &[]).unwrap_err();
        let rendered = render_error(source, None, &err);

        assert!(
            rendered.contains("invalid term in substitution"),
            "rendered: {rendered}"
        );
    }

    #[test]
    fn test_error_without_span() {
        let error = LangError::UnexpectedRule {
            rule: Rule::atom,
            span: (0, 0),
        };
        let rendered = render_error("", None, &error);

        assert!(rendered.contains("atom"), "rendered: {rendered}");
    }

    #[test]
    fn test_clamp_end_of_input() {
        assert_eq!(clamp("abc", (3, 4)), 3..3);
        assert_eq!(clamp("abc", (1, 2)), 1..2);
    }
}
