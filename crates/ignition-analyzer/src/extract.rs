//! Custom element discovery.
//!
//! A class is reported when it is both *defined* as a custom element and
//! *exported* from the module. Definitions are recognized in two forms:
//!
//! ```ts
//! @customElement('x-foo')
//! export class XFoo extends LitElement {}
//!
//! export class XBar extends HTMLElement {}
//! customElements.define('x-bar', XBar);
//! ```

use std::path::Path;

use oxc_allocator::Allocator;
use oxc_ast::ast::{
    Argument, Class, Declaration, ExportDefaultDeclarationKind, Expression, Statement,
};
use oxc_parser::Parser;
use oxc_span::{GetSpan, SourceType};
use rustc_hash::FxHashMap;

use crate::error::{AnalyzerError, Result};
use crate::module::CustomElementExport;

/// Parse `source` and return its exported custom elements in source order.
pub(crate) fn extract_custom_elements(
    path: &Path,
    source: &str,
) -> Result<Vec<CustomElementExport>> {
    let allocator = Allocator::default();
    let source_type = SourceType::from_path(path).unwrap_or_else(|_| SourceType::mjs());
    let parsed = Parser::new(&allocator, source, source_type).parse();

    if parsed.panicked || !parsed.errors.is_empty() {
        return Err(AnalyzerError::Parse {
            path: path.to_path_buf(),
            messages: parsed.errors.iter().map(|e| e.to_string()).collect(),
        });
    }

    let mut collector = Collector::new(source);
    for statement in parsed.program.body.iter() {
        collector.statement(statement);
    }
    Ok(collector.finish())
}

#[derive(Debug)]
struct ClassRecord {
    class_name: Option<String>,
    tag_name: Option<String>,
    export_name: Option<String>,
    super_class: Option<String>,
    doc: Option<DocComment>,
}

struct Collector<'s> {
    source: &'s str,
    classes: Vec<ClassRecord>,
    by_name: FxHashMap<String, usize>,
    /// `export { local as exported }` pairs
    aliases: Vec<(String, String)>,
    /// `customElements.define(tag, Class)` pairs
    defines: Vec<(String, String)>,
}

impl<'s> Collector<'s> {
    fn new(source: &'s str) -> Self {
        Self {
            source,
            classes: Vec::new(),
            by_name: FxHashMap::default(),
            aliases: Vec::new(),
            defines: Vec::new(),
        }
    }

    fn statement(&mut self, statement: &Statement<'_>) {
        let start = statement.span().start;
        match statement {
            Statement::ClassDeclaration(class) => self.class(class, start, None),
            Statement::ExportNamedDeclaration(export) => {
                if let Some(Declaration::ClassDeclaration(class)) = &export.declaration {
                    let exported = class.id.as_ref().map(|id| id.name.to_string());
                    self.class(class, start, exported);
                }
                // re-exports from other modules define nothing here
                if export.source.is_none() {
                    for specifier in export.specifiers.iter() {
                        self.aliases.push((
                            specifier.local.name().to_string(),
                            specifier.exported.name().to_string(),
                        ));
                    }
                }
            }
            Statement::ExportDefaultDeclaration(export) => match &export.declaration {
                ExportDefaultDeclarationKind::ClassDeclaration(class) => {
                    self.class(class, start, Some("default".to_string()));
                }
                ExportDefaultDeclarationKind::Identifier(ident) => {
                    self.aliases
                        .push((ident.name.to_string(), "default".to_string()));
                }
                _ => {}
            },
            Statement::ExpressionStatement(statement) => {
                if let Some(define) = define_call(&statement.expression) {
                    self.defines.push(define);
                }
            }
            _ => {}
        }
    }

    fn class(&mut self, class: &Class<'_>, statement_start: u32, export_name: Option<String>) {
        let class_name = class.id.as_ref().map(|id| id.name.to_string());
        // decorators may precede the `export` keyword
        let doc_anchor = class
            .decorators
            .iter()
            .map(|decorator| decorator.span.start)
            .chain(std::iter::once(statement_start))
            .min()
            .unwrap_or(statement_start);

        let record = ClassRecord {
            tag_name: decorator_tag(class),
            export_name,
            super_class: class.super_class.as_ref().map(|expr| {
                let span = expr.span();
                self.source[span.start as usize..span.end as usize].to_string()
            }),
            doc: leading_jsdoc(self.source, doc_anchor).map(DocComment::parse),
            class_name: class_name.clone(),
        };

        if let Some(name) = class_name {
            self.by_name.insert(name, self.classes.len());
        }
        self.classes.push(record);
    }

    fn finish(mut self) -> Vec<CustomElementExport> {
        for (local, exported) in std::mem::take(&mut self.aliases) {
            if let Some(&index) = self.by_name.get(&local) {
                self.classes[index].export_name.get_or_insert(exported);
            }
        }
        for (tag, class_name) in std::mem::take(&mut self.defines) {
            if let Some(&index) = self.by_name.get(&class_name) {
                self.classes[index].tag_name.get_or_insert(tag);
            }
        }

        self.classes
            .into_iter()
            .filter_map(|record| {
                let (Some(tag_name), Some(export_name)) = (record.tag_name, record.export_name)
                else {
                    return None;
                };
                let (description, summary) = record
                    .doc
                    .map(|doc| (doc.description, doc.summary))
                    .unwrap_or_default();
                Some(CustomElementExport {
                    tag_name,
                    class_name: record.class_name,
                    export_name,
                    super_class: record.super_class,
                    description,
                    summary,
                })
            })
            .collect()
    }
}

/// Tag from a `@customElement('x-foo')` decorator.
fn decorator_tag(class: &Class<'_>) -> Option<String> {
    class
        .decorators
        .iter()
        .find_map(|decorator| match &decorator.expression {
            Expression::CallExpression(call) if is_identifier(&call.callee, "customElement") => {
                call.arguments.first().and_then(string_argument)
            }
            _ => None,
        })
}

/// `(tag, ClassName)` from `customElements.define('x-foo', XFoo)`.
fn define_call(expression: &Expression<'_>) -> Option<(String, String)> {
    let Expression::CallExpression(call) = expression else {
        return None;
    };
    let Expression::StaticMemberExpression(member) = &call.callee else {
        return None;
    };
    if member.property.name.as_str() != "define" || !is_registry(&member.object) {
        return None;
    }

    let tag = call.arguments.first().and_then(string_argument)?;
    match call.arguments.get(1)? {
        Argument::Identifier(ident) => Some((tag, ident.name.to_string())),
        _ => None,
    }
}

/// `customElements`, `window.customElements` or `globalThis.customElements`.
fn is_registry(expression: &Expression<'_>) -> bool {
    match expression {
        Expression::Identifier(ident) => ident.name.as_str() == "customElements",
        Expression::StaticMemberExpression(member) => {
            member.property.name.as_str() == "customElements"
                && (is_identifier(&member.object, "window")
                    || is_identifier(&member.object, "globalThis"))
        }
        _ => false,
    }
}

fn is_identifier(expression: &Expression<'_>, name: &str) -> bool {
    matches!(expression, Expression::Identifier(ident) if ident.name.as_str() == name)
}

fn string_argument(argument: &Argument<'_>) -> Option<String> {
    match argument {
        Argument::StringLiteral(literal) => Some(literal.value.to_string()),
        Argument::TemplateLiteral(template) if template.expressions.is_empty() => template
            .quasis
            .first()
            .and_then(|quasi| quasi.value.cooked.as_ref())
            .map(|cooked| cooked.to_string()),
        _ => None,
    }
}

/// Body of the `/** ... */` block that ends right before `offset`.
fn leading_jsdoc(source: &str, offset: u32) -> Option<&str> {
    let before = source.get(..offset as usize)?.trim_end();
    let body = before.strip_suffix("*/")?;
    // block comments do not nest: this one opens at the first `/*` after the
    // previous comment's `*/`
    let after_previous = body.rfind("*/").map_or(0, |end| end + 2);
    let open = after_previous + body[after_previous..].find("/*")?;
    body[open..].strip_prefix("/**")
}

#[derive(Debug, Default, PartialEq, Eq)]
struct DocComment {
    description: Option<String>,
    summary: Option<String>,
}

impl DocComment {
    fn parse(body: &str) -> Self {
        let lines: Vec<&str> = body
            .lines()
            .map(|line| {
                let line = line.trim();
                line.strip_prefix('*').map(str::trim).unwrap_or(line)
            })
            .collect();

        let mut description = Vec::new();
        let mut summary: Option<Vec<&str>> = None;
        let mut in_tags = false;
        let mut in_summary = false;

        for line in lines {
            if let Some(tag) = line.strip_prefix('@') {
                in_tags = true;
                in_summary = false;
                if let Some(rest) = tag.strip_prefix("summary") {
                    in_summary = true;
                    let parts = summary.get_or_insert_with(Vec::new);
                    if !rest.trim().is_empty() {
                        parts.push(rest.trim());
                    }
                }
            } else if in_summary {
                if !line.is_empty() {
                    summary.get_or_insert_with(Vec::new).push(line);
                }
            } else if !in_tags {
                description.push(line);
            }
        }

        Self {
            description: non_empty(description.join("\n").trim()),
            summary: summary.and_then(|parts| non_empty(&parts.join(" "))),
        }
    }
}

fn non_empty(text: &str) -> Option<String> {
    (!text.is_empty()).then(|| text.to_string())
}
