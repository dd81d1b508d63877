//! Preview document rendering.
//!
//! [`render`] is a pure function of its arguments: it loads the served module
//! as an ES module (so its custom elements get defined) and instantiates every
//! exported component in its own container. A diagnostic block lists where the
//! module came from and where it is served.

mod html;
mod tag;

pub use html::{HtmlBuilder, escape};
pub use tag::TagName;

use crate::error::Result;
use crate::resolver::ComponentExport;

/// Informational values shown in the preview's diagnostic block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewContext {
    /// Document title and heading.
    pub title: String,
    /// Previewed source file, as given by the caller.
    pub source_path: String,
    /// Served path of the module.
    pub js_path: String,
    /// Directory the asset server is bound to.
    pub server_root: String,
    pub workspace: String,
    /// `host:port` of the asset server.
    pub address: String,
    /// Width of each component container, in CSS pixels.
    pub container_width: u32,
}

/// Render the preview document for a module.
///
/// Fails with [`IgnitionError::RenderValidation`](crate::IgnitionError::RenderValidation)
/// if any component's tag name is not a valid custom element name; no partial
/// document is produced in that case.
pub fn render(
    module_url: &str,
    components: &[ComponentExport],
    context: &PreviewContext,
) -> Result<String> {
    let tags = components
        .iter()
        .map(|component| TagName::parse(&component.tag_name))
        .collect::<Result<Vec<_>>>()?;

    let mut html = HtmlBuilder::new();
    html.markup("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n")
        .markup("<meta charset=\"utf-8\">\n")
        .text_element("title", &context.title)
        .open("script", &[("type", "module"), ("src", module_url)])
        .close("script")
        .newline()
        .markup("<style>\n.element-container { width: ")
        .text(&context.container_width.to_string())
        .markup("px; }\n</style>\n</head>\n<body>\n")
        .text_element("h1", &context.title);

    let elements = tags
        .iter()
        .map(TagName::as_str)
        .collect::<Vec<_>>()
        .join(", ");
    html.open("pre", &[("class", "diagnostics")]).newline();
    for (label, value) in [
        ("server", context.server_root.as_str()),
        ("workspaceFolder", context.workspace.as_str()),
        ("fileName", context.source_path.as_str()),
        ("jsPath", context.js_path.as_str()),
        ("scriptUrl", module_url),
        ("elements", elements.as_str()),
        ("address", context.address.as_str()),
    ] {
        html.text(label).text(": ").text(value).newline();
    }
    html.close("pre").newline();

    html.markup("<main>\n");
    for (tag, component) in tags.iter().zip(components) {
        html.open("section", &[("class", "element-container")])
            .newline()
            .text_element("h2", &format!("<{tag}>"))
            .custom_element(tag)
            .newline();
        if let Some(description) = &component.description {
            html.open("p", &[("class", "description")])
                .text(description)
                .close("p")
                .newline();
        }
        html.close("section").newline();
    }
    html.markup("</main>\n</body>\n</html>\n");

    Ok(html.finish())
}
