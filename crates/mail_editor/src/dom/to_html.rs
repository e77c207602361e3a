// Copyright 2024 New Vector Ltd.
// Copyright 2022 The Matrix.org Foundation C.I.C.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

use html_escape::{encode_double_quoted_attribute, encode_text};

use crate::dom::nodes::{
    BlockNode, BlockType, DomNode, InlineNode, NodeData, TextNode,
};
use crate::dom::{Document, Mark};

pub trait ToHtml {
    fn fmt_html(&self, buf: &mut String);

    fn to_html(&self) -> String {
        let mut buf = String::new();
        self.fmt_html(&mut buf);
        buf
    }
}

/// Render `document` as markup.
pub fn serialize(document: &Document) -> String {
    document.to_html()
}

impl ToHtml for Document {
    fn fmt_html(&self, buf: &mut String) {
        for child in self.children() {
            child.fmt_html(buf);
        }
    }
}

impl ToHtml for DomNode {
    fn fmt_html(&self, buf: &mut String) {
        match self {
            DomNode::Block(block) => block.fmt_html(buf),
            DomNode::Inline(inline) => inline.fmt_html(buf),
            DomNode::Text(text) => text.fmt_html(buf),
        }
    }
}

impl ToHtml for BlockNode {
    fn fmt_html(&self, buf: &mut String) {
        let tag = self.kind().tag();
        match self.kind() {
            BlockType::Image => {
                fmt_open_tag(buf, tag, "src", self.data());
            }
            BlockType::File => {
                fmt_open_tag(buf, tag, "src", self.data());
                fmt_close_tag(buf, tag);
            }
            _ => {
                fmt_open_tag(buf, tag, "", self.data());
                for child in self.children() {
                    child.fmt_html(buf);
                }
                fmt_close_tag(buf, tag);
            }
        }
    }
}

impl ToHtml for InlineNode {
    fn fmt_html(&self, buf: &mut String) {
        let tag = self.kind().tag();
        fmt_open_tag(buf, tag, self.kind().required_data(), self.data());
        for child in self.children() {
            child.fmt_html(buf);
        }
        fmt_close_tag(buf, tag);
    }
}

impl ToHtml for TextNode {
    fn fmt_html(&self, buf: &mut String) {
        for mark in self.marks().iter() {
            buf.push_str(open_mark(mark));
        }
        buf.push_str(&encode_text(self.text()));
        for mark in self.marks().iter().rev() {
            buf.push_str(close_mark(mark));
        }
    }
}

fn open_mark(mark: Mark) -> &'static str {
    match mark {
        Mark::Bold => "<strong>",
        Mark::Italic => "<em>",
        Mark::Underlined => "<u>",
        Mark::Code => "<code>",
        Mark::SmallSize => r#"<font size="1">"#,
        Mark::LargeSize => r#"<font size="4">"#,
    }
}

fn close_mark(mark: Mark) -> &'static str {
    match mark {
        Mark::Bold => "</strong>",
        Mark::Italic => "</em>",
        Mark::Underlined => "</u>",
        Mark::Code => "</code>",
        Mark::SmallSize | Mark::LargeSize => "</font>",
    }
}

/// Write `<tag ...>`, with the `first` attribute (if any) ahead of the
/// others, which follow in key order.
fn fmt_open_tag(buf: &mut String, tag: &str, first: &str, data: &NodeData) {
    buf.push('<');
    buf.push_str(tag);
    if let Some(value) = data.get(first) {
        fmt_attr(buf, first, value);
    }
    for (key, value) in data.iter().filter(|(k, _)| k.as_str() != first) {
        fmt_attr(buf, key, value);
    }
    buf.push('>');
}

fn fmt_attr(buf: &mut String, key: &str, value: &str) {
    buf.push(' ');
    buf.push_str(key);
    buf.push_str("=\"");
    buf.push_str(&encode_double_quoted_attribute(value));
    buf.push('"');
}

fn fmt_close_tag(buf: &mut String, tag: &str) {
    buf.push_str("</");
    buf.push_str(tag);
    buf.push('>');
}
