//! Serializes a [`VirtualDocument`] to HTML.
//!
//! Attributes and styles come out in sorted order, so equal documents
//! produce byte-identical markup.

use crate::vdom::{VNode, VirtualDocument};

/// Options for HTML serialization
#[derive(Debug, Clone)]
pub struct HtmlOptions {
    /// Pretty print HTML
    pub pretty: bool,
    /// Indentation string
    pub indent: String,
    /// Emit `data-node-id` on selection targets
    pub node_ids: bool,
}

impl Default for HtmlOptions {
    fn default() -> Self {
        Self {
            pretty: true,
            indent: "  ".to_string(),
            node_ids: true,
        }
    }
}

struct Context {
    options: HtmlOptions,
    depth: usize,
    buffer: String,
}

impl Context {
    fn new(options: HtmlOptions) -> Self {
        Self {
            options,
            depth: 0,
            buffer: String::new(),
        }
    }

    fn add(&mut self, text: &str) {
        self.buffer.push_str(text);
    }

    fn add_line(&mut self, text: &str) {
        self.add_indent();
        self.add(text);
        self.newline();
    }

    fn add_indent(&mut self) {
        if self.options.pretty {
            for _ in 0..self.depth {
                self.buffer.push_str(&self.options.indent);
            }
        }
    }

    fn newline(&mut self) {
        if self.options.pretty {
            self.buffer.push('\n');
        }
    }

    fn indent(&mut self) {
        self.depth += 1;
    }

    fn dedent(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }
}

/// Markup for the document body only.
pub fn to_html(doc: &VirtualDocument, options: HtmlOptions) -> String {
    let mut ctx = Context::new(options);
    for node in &doc.nodes {
        write_node(node, &mut ctx);
    }
    ctx.buffer
}

/// A complete standalone HTML page around the document.
pub fn to_html_document(doc: &VirtualDocument, title: &str, options: HtmlOptions) -> String {
    let mut ctx = Context::new(options);

    ctx.add_line("<!DOCTYPE html>");
    ctx.add_line("<html lang=\"en\">");
    ctx.indent();

    ctx.add_line("<head>");
    ctx.indent();
    ctx.add_line("<meta charset=\"UTF-8\" />");
    ctx.add_line("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\" />");
    ctx.add_line(&format!("<title>{}</title>", escape_html(title)));
    ctx.add_line("<style>*{box-sizing:border-box;margin:0}</style>");
    ctx.dedent();
    ctx.add_line("</head>");

    ctx.add_line("<body>");
    ctx.indent();
    for node in &doc.nodes {
        write_node(node, &mut ctx);
    }
    ctx.dedent();
    ctx.add_line("</body>");

    ctx.dedent();
    ctx.add_line("</html>");

    ctx.buffer
}

fn write_node(node: &VNode, ctx: &mut Context) {
    match node {
        VNode::Text { content } => {
            let escaped = escape_html(content);
            ctx.add_line(&escaped);
        }
        VNode::Element {
            tag,
            attributes,
            styles,
            classes,
            children,
            select,
        } => {
            ctx.add_indent();
            ctx.add("<");
            ctx.add(tag);

            if !classes.is_empty() {
                write_attribute("class", &classes.join(" "), ctx);
            }
            if ctx.options.node_ids {
                if let Some(id) = select {
                    write_attribute("data-node-id", id, ctx);
                }
            }
            for (name, value) in attributes {
                write_attribute(name, value, ctx);
            }
            if !styles.is_empty() {
                let css: Vec<String> = styles.iter().map(|(key, value)| format!("{}: {}", key, value)).collect();
                write_attribute("style", &css.join("; "), ctx);
            }

            if children.is_empty() && is_self_closing(tag) {
                ctx.add(" />");
                ctx.newline();
                return;
            }

            // Single text child stays on one line.
            if let [VNode::Text { content }] = children.as_slice() {
                ctx.add(">");
                ctx.add(&escape_html(content));
                ctx.add(&format!("</{}>", tag));
                ctx.newline();
                return;
            }

            ctx.add(">");
            ctx.newline();
            ctx.indent();
            for child in children {
                write_node(child, ctx);
            }
            ctx.dedent();
            ctx.add_line(&format!("</{}>", tag));
        }
    }
}

fn write_attribute(name: &str, value: &str, ctx: &mut Context) {
    ctx.add(" ");
    ctx.add(name);
    ctx.add("=\"");
    ctx.add(&escape_html(value));
    ctx.add("\"");
}

pub fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

fn is_self_closing(tag: &str) -> bool {
    matches!(
        tag,
        "img" | "input" | "br" | "hr" | "meta" | "link" | "area" | "base" | "col" | "embed" | "source" | "wbr"
    )
}
