// Copyright 2024 New Vector Ltd.
// Copyright 2022 The Matrix.org Foundation C.I.C.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

use crate::composer_error::{EditorError, HtmlParseError};
use crate::dom::Document;

/// Build a [`Document`] from markup.
///
/// Accepts everything [`serialize`](crate::serialize) produces, plus a few
/// common variants (`<b>`, `<i>`, `<br>`, other `<font>` sizes, stray
/// inline content at block level). Anything else is a parse error.
pub fn deserialize(html: &str) -> Result<Document, EditorError> {
    cfg_if::cfg_if! {
        if #[cfg(feature = "sys")] {
            sys::HtmlParser::default().parse(html)
        } else {
            Err(HtmlParseError::new(vec![format!(
                "cannot parse {} bytes of markup without the `sys` feature",
                html.len()
            )])
            .into())
        }
    }
}

#[cfg(feature = "sys")]
mod sys {
    use std::fmt;

    use log::debug;

    use super::*;
    use crate::dom::nodes::{BlockType, DomNode, InlineType, NodeData};
    use crate::dom::parser::{
        PaDom, PaDomCreationError, PaDomCreator, PaDomHandle, PaDomNode,
        PaNodeContainer,
    };
    use crate::dom::{Mark, MarkSet};

    pub(super) struct HtmlParser {
        /// Depth of `<a>` elements around the node being converted.
        links_open: usize,
    }

    impl HtmlParser {
        pub(super) fn default() -> Self {
            Self { links_open: 0 }
        }

        pub(super) fn parse(
            &mut self,
            html: &str,
        ) -> Result<Document, EditorError> {
            let pa_dom = PaDomCreator::parse(html).map_err(|err| {
                self.padom_creation_error_to_html_parse_error(err)
            })?;

            let blocks = self.padom_to_blocks(&pa_dom).map_err(|err| {
                HtmlParseError::new(vec![err.to_string()])
            })?;

            Document::from_blocks(blocks).map_err(|err| {
                debug!("Parsed markup breaks an invariant: {err}");
                let err = match err {
                    EditorError::Parse(err) => err,
                    other => HtmlParseError::new(vec![other.to_string()]),
                };
                err.into()
            })
        }

        /// Convert a [PaDom] into top-level blocks.
        ///
        /// [PaDom] is purely used within the parsing process: parents refer
        /// to their children by handles and all nodes live in one list,
        /// including garbage nodes html5ever detached along the way. Only
        /// nodes reachable from the document are converted.
        fn padom_to_blocks(
            &mut self,
            padom: &PaDom,
        ) -> Result<Vec<DomNode>, Error> {
            let PaDomNode::Document(padoc) = padom.get_document() else {
                return Err(Error::NoBody);
            };
            // The fragment parser puts everything under one `html` element
            let root = padoc
                .children
                .iter()
                .find_map(|h| match padom.get_node(h) {
                    PaDomNode::Container(c) if c.tag() == "html" => Some(c),
                    _ => None,
                })
                .ok_or(Error::NoBody)?;
            self.convert_blocks(padom, &root.children)
        }

        /// Convert nodes that sit where blocks are expected. Inline content
        /// found here is gathered into paragraphs and whitespace between
        /// blocks is dropped.
        fn convert_blocks(
            &mut self,
            padom: &PaDom,
            handles: &[PaDomHandle],
        ) -> Result<Vec<DomNode>, Error> {
            let mut blocks = Vec::new();
            let mut pending: Vec<PaDomHandle> = Vec::new();

            for handle in handles {
                match padom.get_node(handle) {
                    PaDomNode::Container(child)
                        if BlockType::from_tag(child.tag()).is_some() =>
                    {
                        self.flush_paragraph(padom, &mut pending, &mut blocks)?;
                        blocks.push(self.convert_block(padom, child)?);
                    }
                    PaDomNode::Text(text)
                        if pending.is_empty()
                            && text.content.trim().is_empty() => {}
                    PaDomNode::Comment => {}
                    _ => pending.push(handle.clone()),
                }
            }
            self.flush_paragraph(padom, &mut pending, &mut blocks)?;
            Ok(blocks)
        }

        fn flush_paragraph(
            &mut self,
            padom: &PaDom,
            pending: &mut Vec<PaDomHandle>,
            blocks: &mut Vec<DomNode>,
        ) -> Result<(), Error> {
            if pending.is_empty() {
                return Ok(());
            }
            let handles = std::mem::take(pending);
            let children =
                self.convert_inlines(padom, &handles, &MarkSet::new())?;
            blocks.push(DomNode::new_paragraph(children));
            Ok(())
        }

        fn convert_block(
            &mut self,
            padom: &PaDom,
            node: &PaNodeContainer,
        ) -> Result<DomNode, Error> {
            let tag = node.tag();
            let kind = BlockType::from_tag(tag)
                .ok_or_else(|| Error::UnknownNode(tag.to_owned()))?;

            let (data, children) = if kind.is_void() {
                if node.get_attr("src").map_or(true, str::is_empty) {
                    return Err(Error::MissingSource(tag.to_owned()));
                }
                (node.data(), Vec::new())
            } else if kind.is_list() {
                (NodeData::new(), self.convert_list_items(padom, node)?)
            } else if kind != BlockType::Paragraph
                && node.children.iter().any(|h| is_block_element(padom, h))
            {
                (NodeData::new(), self.convert_blocks(padom, &node.children)?)
            } else {
                let children = self.convert_inlines(
                    padom,
                    &node.children,
                    &MarkSet::new(),
                )?;
                (NodeData::new(), children)
            };

            DomNode::block_with_data(kind, data, children)
                .map_err(|err| Error::Invalid(err.to_string()))
        }

        fn convert_list_items(
            &mut self,
            padom: &PaDom,
            list: &PaNodeContainer,
        ) -> Result<Vec<DomNode>, Error> {
            let mut items = Vec::new();
            for handle in &list.children {
                match padom.get_node(handle) {
                    PaDomNode::Container(child) if child.tag() == "li" => {
                        items.push(self.convert_block(padom, child)?);
                    }
                    PaDomNode::Text(text) if text.content.trim().is_empty() => {
                    }
                    PaDomNode::Comment => {}
                    _ => return Err(Error::InvalidListItemNode),
                }
            }
            Ok(items)
        }

        /// Convert inline content, with `marks` applied by the formatting
        /// elements around it.
        fn convert_inlines(
            &mut self,
            padom: &PaDom,
            handles: &[PaDomHandle],
            marks: &MarkSet,
        ) -> Result<Vec<DomNode>, Error> {
            let mut nodes = Vec::new();
            for handle in handles {
                match padom.get_node(handle) {
                    PaDomNode::Text(text) => {
                        nodes.push(DomNode::text(&text.content, marks.clone()))
                    }
                    PaDomNode::Comment => {}
                    PaDomNode::Document(_) => {
                        return Err(Error::UnknownNode("document".to_owned()))
                    }
                    PaDomNode::Container(child) => {
                        nodes.extend(self.convert_inline(padom, child, marks)?)
                    }
                }
            }
            Ok(nodes)
        }

        fn convert_inline(
            &mut self,
            padom: &PaDom,
            node: &PaNodeContainer,
            marks: &MarkSet,
        ) -> Result<Vec<DomNode>, Error> {
            let tag = node.tag();
            let mark = match tag {
                "strong" | "b" => Some(Mark::Bold),
                "em" | "i" => Some(Mark::Italic),
                "u" => Some(Mark::Underlined),
                "code" => Some(Mark::Code),
                "font" => match node.get_attr("size") {
                    Some("1") => Some(Mark::SmallSize),
                    Some("4") => Some(Mark::LargeSize),
                    _ => None,
                },
                "span" => None,
                "br" => {
                    return Ok(vec![DomNode::text("\n", marks.clone())]);
                }
                "a" => {
                    return self.new_link(padom, node, marks).map(|l| vec![l])
                }
                _ if BlockType::from_tag(tag).is_some() => {
                    return Err(Error::BlockInInline(tag.to_owned()));
                }
                _ => return Err(Error::UnknownNode(tag.to_owned())),
            };
            let marks = match mark {
                Some(mark) => marks.clone().with(mark),
                None => marks.clone(),
            };
            self.convert_inlines(padom, &node.children, &marks)
        }

        fn new_link(
            &mut self,
            padom: &PaDom,
            node: &PaNodeContainer,
            marks: &MarkSet,
        ) -> Result<DomNode, Error> {
            if self.links_open > 0 {
                return Err(Error::LinkInsideLink);
            }
            self.links_open += 1;
            let children = self.convert_inlines(padom, &node.children, marks);
            self.links_open -= 1;
            DomNode::inline(InlineType::Link, node.data(), children?)
                .map_err(|err| Error::Invalid(err.to_string()))
        }

        fn padom_creation_error_to_html_parse_error(
            &mut self,
            e: PaDomCreationError,
        ) -> HtmlParseError {
            HtmlParseError::new(e.parse_errors)
        }
    }

    fn is_block_element(padom: &PaDom, handle: &PaDomHandle) -> bool {
        matches!(
            padom.get_node(handle),
            PaDomNode::Container(c) if BlockType::from_tag(c.tag()).is_some()
        )
    }

    enum Error {
        NoBody,
        UnknownNode(String),
        InvalidListItemNode,
        LinkInsideLink,
        BlockInInline(String),
        MissingSource(String),
        Invalid(String),
    }

    impl fmt::Display for Error {
        fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
            match self {
                Self::NoBody => {
                    write!(formatter, "The markup has no root element")
                }
                Self::UnknownNode(node_name) => {
                    write!(formatter, "Node `{node_name}` is not supported")
                }
                Self::InvalidListItemNode => {
                    write!(
                        formatter,
                        "Invalid list item node: a list must only contain list items"
                    )
                }
                Self::LinkInsideLink => {
                    write!(formatter, "A link cannot contain another link")
                }
                Self::BlockInInline(node_name) => {
                    write!(
                        formatter,
                        "Block node `{node_name}` found inside inline content"
                    )
                }
                Self::MissingSource(node_name) => {
                    write!(formatter, "Node `{node_name}` needs a `src`")
                }
                Self::Invalid(reason) => write!(formatter, "{reason}"),
            }
        }
    }

}
