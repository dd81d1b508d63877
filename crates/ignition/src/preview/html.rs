//! Minimal HTML writer that escapes everything it is given.

use super::TagName;

/// Builds an HTML document.
///
/// Element and attribute names are `&'static str`; every dynamic value goes
/// through [`escape`]. The only unescaped dynamic output is a [`TagName`].
#[derive(Debug, Default)]
pub struct HtmlBuilder {
    out: String,
}

impl HtmlBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Write static markup verbatim.
    pub fn markup(&mut self, markup: &'static str) -> &mut Self {
        self.out.push_str(markup);
        self
    }

    /// `<name attr="value" ...>`
    pub fn open(&mut self, name: &'static str, attrs: &[(&'static str, &str)]) -> &mut Self {
        self.out.push('<');
        self.out.push_str(name);
        for (attr, value) in attrs {
            self.out.push(' ');
            self.out.push_str(attr);
            self.out.push_str("=\"");
            self.out.push_str(&escape(value));
            self.out.push('"');
        }
        self.out.push('>');
        self
    }

    pub fn close(&mut self, name: &'static str) -> &mut Self {
        self.out.push_str("</");
        self.out.push_str(name);
        self.out.push('>');
        self
    }

    /// Escaped text content.
    pub fn text(&mut self, text: &str) -> &mut Self {
        self.out.push_str(&escape(text));
        self
    }

    /// `<name>text</name>` followed by a newline.
    pub fn text_element(&mut self, name: &'static str, text: &str) -> &mut Self {
        self.open(name, &[]).text(text).close(name).newline()
    }

    /// An empty instance of a custom element: `<tag></tag>`.
    pub fn custom_element(&mut self, tag: &TagName) -> &mut Self {
        self.out.push('<');
        self.out.push_str(tag.as_str());
        self.out.push_str("></");
        self.out.push_str(tag.as_str());
        self.out.push('>');
        self
    }

    pub fn newline(&mut self) -> &mut Self {
        self.out.push('\n');
        self
    }

    pub fn finish(self) -> String {
        self.out
    }
}

/// Escape `& < > " '` for use in text and quoted attribute values.
pub fn escape(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
