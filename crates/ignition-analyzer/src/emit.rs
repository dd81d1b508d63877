//! Browser module emission.
//!
//! Scripts are compiled to plain ES modules (TypeScript stripped, decorators
//! lowered) and their import specifiers are rewritten to served URLs, so the
//! browser can load a module and its dependency graph straight from the asset
//! server. Everything else is served as-is.

use std::path::Path;

use oxc_allocator::Allocator;
use oxc_ast::ast::{Expression, ImportExpression, Statement, StringLiteral};
use oxc_ast_visit::{Visit, walk};
use oxc_codegen::Codegen;
use oxc_parser::Parser;
use oxc_semantic::SemanticBuilder;
use oxc_span::{SourceType, Span};
use oxc_transformer::{TransformOptions, Transformer};
use tracing::debug;

use crate::error::{AnalyzerError, Result};
use crate::paths::{JsPathMapper, url_path};

/// Content type for a served file, derived from its extension.
pub fn content_type_for(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or("");

    match extension {
        "js" | "mjs" | "cjs" | "jsx" | "ts" | "tsx" | "mts" => "application/javascript",
        "json" | "map" => "application/json",
        "wasm" => "application/wasm",
        "html" => "text/html; charset=utf-8",
        "css" => "text/css",
        "svg" => "image/svg+xml",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "woff" => "font/woff",
        "woff2" => "font/woff2",
        "ttf" => "font/ttf",
        "txt" | "md" => "text/plain; charset=utf-8",
        _ => "application/octet-stream",
    }
}

/// Whether the file is compiled before serving. CommonJS is served verbatim.
pub(crate) fn is_script(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|ext| ext.to_str()),
        Some("js" | "mjs" | "jsx" | "ts" | "tsx" | "mts")
    )
}

/// Compile a script to browser-compatible JavaScript.
pub(crate) fn compile_script(path: &Path, source: &str) -> Result<String> {
    let allocator = Allocator::default();
    let source_type = SourceType::from_path(path).unwrap_or_else(|_| SourceType::mjs());
    let parsed = Parser::new(&allocator, source, source_type).parse();

    if parsed.panicked || !parsed.errors.is_empty() {
        return Err(AnalyzerError::Parse {
            path: path.to_path_buf(),
            messages: parsed.errors.iter().map(|e| e.to_string()).collect(),
        });
    }

    let mut program = parsed.program;
    let scoping = SemanticBuilder::new()
        .build(&program)
        .semantic
        .into_scoping();

    let mut options = TransformOptions::default();
    // Lit components are written against `experimentalDecorators`
    options.decorator.legacy = true;

    let transformed =
        Transformer::new(&allocator, path, &options).build_with_scoping(scoping, &mut program);
    if !transformed.errors.is_empty() {
        return Err(AnalyzerError::Transform {
            path: path.to_path_buf(),
            messages: transformed.errors.iter().map(|e| e.to_string()).collect(),
        });
    }

    Ok(Codegen::new().build(&program).code)
}

/// Rewrites import specifiers of emitted code to served URLs.
///
/// Targets are addressed by their served path, so a module imported from
/// several places (or by the preview page) always has a single URL.
pub(crate) struct SpecifierRewriter<'r> {
    pub resolver: &'r oxc_resolver::Resolver,
    pub paths: &'r JsPathMapper,
    pub root: &'r Path,
    pub prefix: &'r str,
}

impl SpecifierRewriter<'_> {
    /// Rewrite every resolvable specifier in `code`, which was emitted for `importer`.
    pub fn rewrite(&self, importer: &Path, code: &str) -> String {
        let from_dir = importer.parent().unwrap_or(self.root);
        let mut replacements: Vec<(Span, String)> = collect_specifiers(code)
            .into_iter()
            .filter_map(|(span, specifier)| {
                let url = self.served_url(from_dir, &specifier)?;
                Some((span, url))
            })
            .collect();
        replacements.sort_by_key(|(span, _)| span.start);

        let mut output = String::with_capacity(code.len());
        let mut cursor = 0usize;
        for (span, url) in replacements {
            let (start, end) = (span.start as usize, span.end as usize);
            if start < cursor {
                continue;
            }
            output.push_str(&code[cursor..start]);
            output.push_str(&quote(&url));
            cursor = end;
        }
        output.push_str(&code[cursor..]);
        output
    }

    fn served_url(&self, from_dir: &Path, specifier: &str) -> Option<String> {
        if is_url(specifier) {
            return None;
        }

        let resolution = match self.resolver.resolve(from_dir, specifier) {
            Ok(resolution) => resolution,
            Err(error) => {
                debug!(specifier, %error, "leaving unresolved specifier untouched");
                return None;
            }
        };

        let relative = resolution.path().strip_prefix(self.root).ok()?;
        Some(url_path(self.prefix, &self.paths.js_path(relative)))
    }
}

fn is_url(specifier: &str) -> bool {
    ["http://", "https://", "data:", "blob:"]
        .iter()
        .any(|scheme| specifier.starts_with(scheme))
}

fn quote(value: &str) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| format!("\"{value}\""))
}

/// Spans (including quotes) and values of every module specifier in `code`.
fn collect_specifiers(code: &str) -> Vec<(Span, String)> {
    let allocator = Allocator::default();
    let parsed = Parser::new(&allocator, code, SourceType::mjs()).parse();
    if parsed.panicked {
        return Vec::new();
    }

    let mut collector = SpecifierCollector::default();
    for statement in parsed.program.body.iter() {
        match statement {
            Statement::ImportDeclaration(import) => collector.push(&import.source),
            Statement::ExportNamedDeclaration(export) => {
                if let Some(source) = &export.source {
                    collector.push(source);
                }
            }
            Statement::ExportAllDeclaration(export) => collector.push(&export.source),
            _ => {}
        }
    }
    collector.visit_program(&parsed.program);
    collector.found
}

#[derive(Default)]
struct SpecifierCollector {
    found: Vec<(Span, String)>,
}

impl SpecifierCollector {
    fn push(&mut self, literal: &StringLiteral<'_>) {
        self.found.push((literal.span, literal.value.to_string()));
    }
}

impl<'a> Visit<'a> for SpecifierCollector {
    fn visit_import_expression(&mut self, it: &ImportExpression<'a>) {
        if let Expression::StringLiteral(literal) = &it.source {
            self.push(literal);
        }
        walk::walk_import_expression(self, it);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_types() {
        assert_eq!(content_type_for(Path::new("a.js")), "application/javascript");
        assert_eq!(content_type_for(Path::new("a.ts")), "application/javascript");
        assert_eq!(content_type_for(Path::new("a.css")), "text/css");
        assert_eq!(content_type_for(Path::new("a.bin")), "application/octet-stream");
        assert_eq!(content_type_for(Path::new("README")), "application/octet-stream");
    }

    #[test]
    fn scripts_are_recognized() {
        assert!(is_script(Path::new("src/a.ts")));
        assert!(is_script(Path::new("src/a.mjs")));
        assert!(!is_script(Path::new("src/a.cjs")));
        assert!(!is_script(Path::new("src/a.css")));
    }

    #[test]
    fn typescript_is_stripped() {
        let code = compile_script(
            Path::new("src/a.ts"),
            "export const answer: number = 42;\nexport interface Shape { x: number }\n",
        )
        .unwrap();

        assert!(code.contains("answer = 42"));
        assert!(!code.contains(": number"));
        assert!(!code.contains("interface"));
    }

    #[test]
    fn compile_reports_syntax_errors() {
        let err = compile_script(Path::new("src/a.ts"), "let = ;").unwrap_err();
        assert!(matches!(err, AnalyzerError::Parse { .. }));
    }

    #[test]
    fn collects_static_and_dynamic_specifiers() {
        let code = r#"import a from "./a.js";
export { b } from "./b.js";
export * from "./c.js";
const d = await import("./d.js");
const e = await import(name);
"#;
        let found: Vec<String> = collect_specifiers(code)
            .into_iter()
            .map(|(_, value)| value)
            .collect();
        assert_eq!(found, ["./a.js", "./b.js", "./c.js", "./d.js"]);
    }

    #[test]
    fn specifier_spans_include_quotes() {
        let code = "import './side-effect.js';";
        let (span, _) = collect_specifiers(code).remove(0);
        assert_eq!(&code[span.start as usize..span.end as usize], "'./side-effect.js'");
    }

    #[test]
    fn urls_are_left_alone() {
        assert!(is_url("https://cdn.example.com/lit.js"));
        assert!(is_url("data:text/javascript,export default 1"));
        assert!(!is_url("lit"));
        assert!(!is_url("./local.js"));
    }
}
