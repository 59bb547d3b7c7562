//! Static HTML rendering of the content tree
//!
//! Produces the markup used by read-only page mirrors. All text and
//! attribute values are escaped.

use crate::document::{Block, BlockKind, Document, Inline, ListStyle, Mark, TextAlign};
use std::fmt::Write;

/// Class of the wrapper element, shared with the live surface's styles
pub const CONTENT_CLASS: &str = "static-editor-content ProseMirror";

/// Escape text for element content and quoted attribute values
pub fn escape(text: &str, out: &mut String) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
}

fn escaped(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    escape(text, &mut out);
    out
}

fn align_attr(align: TextAlign) -> String {
    match align {
        TextAlign::Left => String::new(),
        other => format!(" style=\"text-align: {}\"", other.as_css()),
    }
}

fn render_inline(inline: &Inline, out: &mut String) {
    match inline {
        Inline::HardBreak => out.push_str("<br />"),
        Inline::Text { text, marks } => {
            let mut html = escaped(text);
            for mark in marks {
                html = match mark {
                    Mark::Bold => format!("<strong>{html}</strong>"),
                    Mark::Italic => format!("<em>{html}</em>"),
                    Mark::Underline => format!("<u>{html}</u>"),
                    Mark::Strike => format!("<s>{html}</s>"),
                    Mark::Code => format!("<code>{html}</code>"),
                    Mark::Link { href } => format!("<a href=\"{}\">{html}</a>", escaped(href)),
                    Mark::Highlight { color } => match color {
                        Some(color) => format!("<mark data-color=\"{}\">{html}</mark>", escaped(color)),
                        None => format!("<mark>{html}</mark>"),
                    },
                };
            }
            out.push_str(&html);
        }
    }
}

fn render_inlines(content: &[Inline], out: &mut String) {
    for inline in content {
        render_inline(inline, out);
    }
}

fn render_block(block: &Block, out: &mut String) {
    match &block.kind {
        BlockKind::Paragraph { align, content } => {
            let _ = write!(out, "<p{}>", align_attr(*align));
            if content.is_empty() {
                out.push_str("<br>");
            } else {
                render_inlines(content, out);
            }
            out.push_str("</p>");
        }
        BlockKind::Heading { level, align, content } => {
            let level = (*level).clamp(1, 6);
            let _ = write!(out, "<h{level}{}>", align_attr(*align));
            render_inlines(content, out);
            let _ = write!(out, "</h{level}>");
        }
        BlockKind::List { style, items } => {
            let close = match style {
                ListStyle::Bullet => {
                    out.push_str("<ul>");
                    "</ul>"
                }
                ListStyle::Ordered { start } => {
                    let _ = write!(out, "<ol start=\"{start}\">");
                    "</ol>"
                }
                ListStyle::Task => {
                    out.push_str("<ul data-type=\"taskList\">");
                    "</ul>"
                }
            };
            for item in items {
                if matches!(style, ListStyle::Task) {
                    let checked = if item.checked { "checked " } else { "" };
                    let _ = write!(
                        out,
                        "<li data-type=\"taskItem\"><input type=\"checkbox\" {checked}disabled />"
                    );
                } else {
                    out.push_str("<li>");
                }
                render_inlines(&item.content, out);
                out.push_str("</li>");
            }
            out.push_str(close);
        }
        BlockKind::Blockquote { content } => {
            out.push_str("<blockquote>");
            render_inlines(content, out);
            out.push_str("</blockquote>");
        }
        BlockKind::CodeBlock { language, text } => {
            match language {
                Some(lang) => {
                    let _ = write!(out, "<pre><code class=\"language-{}\">", escaped(lang));
                }
                None => out.push_str("<pre><code>"),
            }
            escape(text, out);
            out.push_str("</code></pre>");
        }
        BlockKind::HorizontalRule => out.push_str("<hr />"),
        BlockKind::Table { rows } => {
            out.push_str("<table>");
            for row in rows {
                out.push_str("<tr>");
                for cell in &row.cells {
                    let tag = if cell.header { "th" } else { "td" };
                    let _ = write!(out, "<{tag}>");
                    render_inlines(&cell.content, out);
                    let _ = write!(out, "</{tag}>");
                }
                out.push_str("</tr>");
            }
            out.push_str("</table>");
        }
        BlockKind::Image { src, alt, title } => {
            let _ = write!(out, "<img src=\"{}\" alt=\"{}\"", escaped(src), escaped(alt));
            if let Some(title) = title {
                let _ = write!(out, " title=\"{}\"", escaped(title));
            }
            out.push_str(" />");
        }
        BlockKind::PageBreak => out.push_str(
            "<div class=\"page-break\" data-page-break=\"true\">\
             <span class=\"page-break-line\"></span>\
             <span class=\"page-break-label\">Saut de page</span></div>",
        ),
    }
}

/// Render the blocks of a document, without the wrapper element
pub fn render_blocks(blocks: &[Block]) -> String {
    let mut out = String::with_capacity(blocks.len() * 64);
    for block in blocks {
        render_block(block, &mut out);
    }
    out
}

/// Render a document inside the mirror wrapper element
pub fn render_document(document: &Document) -> String {
    format!(
        "<div class=\"{CONTENT_CLASS}\">{}</div>",
        render_blocks(document.blocks())
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{BlockId, ListItem, TableCell, TableRow};

    fn one(kind: BlockKind) -> String {
        render_blocks(&[Block::new(BlockId(1), kind)])
    }

    #[test]
    fn test_paragraph_escaped() {
        assert_eq!(one(BlockKind::paragraph("a < b & \"c\"")), "<p>a &lt; b &amp; &quot;c&quot;</p>");
    }

    #[test]
    fn test_empty_paragraph_keeps_height() {
        assert_eq!(one(BlockKind::paragraph("")), "<p><br></p>");
    }

    #[test]
    fn test_aligned_heading() {
        let kind = BlockKind::Heading {
            level: 2,
            align: TextAlign::Center,
            content: vec![Inline::text("Moyens")],
        };
        assert_eq!(one(kind), "<h2 style=\"text-align: center\">Moyens</h2>");
    }

    #[test]
    fn test_nested_marks() {
        let kind = BlockKind::Paragraph {
            align: TextAlign::Left,
            content: vec![Inline::marked(
                "art. 9",
                [Mark::Bold, Mark::Link { href: "https://x.fr/?a=1&b=2".into() }],
            )],
        };
        assert_eq!(
            one(kind),
            "<p><a href=\"https://x.fr/?a=1&amp;b=2\"><strong>art. 9</strong></a></p>"
        );
    }

    #[test]
    fn test_lists() {
        let items = vec![
            ListItem { checked: true, content: vec![Inline::text("fait")] },
            ListItem { checked: false, content: vec![Inline::text("à faire")] },
        ];
        let task = one(BlockKind::List { style: ListStyle::Task, items: items.clone() });
        assert!(task.starts_with("<ul data-type=\"taskList\">"));
        assert!(task.contains("<input type=\"checkbox\" checked disabled />fait"));
        assert!(task.contains("<input type=\"checkbox\" disabled />à faire"));

        let ordered = one(BlockKind::List { style: ListStyle::Ordered { start: 3 }, items });
        assert!(ordered.starts_with("<ol start=\"3\"><li>fait</li>"));
    }

    #[test]
    fn test_table_and_image() {
        let table = one(BlockKind::Table {
            rows: vec![TableRow {
                cells: vec![
                    TableCell { header: true, content: vec![Inline::text("Pièce")] },
                    TableCell { header: false, content: vec![Inline::text("1")] },
                ],
            }],
        });
        assert_eq!(table, "<table><tr><th>Pièce</th><td>1</td></tr></table>");

        let image = one(BlockKind::Image { src: "logo.png".into(), alt: "".into(), title: None });
        assert_eq!(image, "<img src=\"logo.png\" alt=\"\" />");
    }

    #[test]
    fn test_page_break_marker() {
        assert!(one(BlockKind::PageBreak).contains("data-page-break=\"true\""));
    }

    #[test]
    fn test_document_wrapper() {
        let doc = Document::with_blocks("t", [BlockKind::HorizontalRule]);
        assert_eq!(
            render_document(&doc),
            "<div class=\"static-editor-content ProseMirror\"><hr /></div>"
        );
    }
}
