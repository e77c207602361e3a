// Copyright 2024 New Vector Ltd.
// Copyright 2022 The Matrix.org Foundation C.I.C.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

use std::borrow::Cow;
use std::cell::{Ref, RefCell};

use html5ever::interface::NextParserState;
use html5ever::tendril::{StrTendril, TendrilSink};
use html5ever::tree_builder::{ElementFlags, NodeOrText, QuirksMode, TreeSink};
use html5ever::{parse_fragment, Attribute, QualName};

use super::{
    paqual_name, PaDom, PaDomCreationError, PaDomHandle, PaDomNode,
    PaNodeText,
};

pub(crate) type DomCreationResult = Result<PaDom, PaDomCreationError>;

pub(crate) struct PaDomCreator {
    state: RefCell<PaDomCreationError>,
}

impl PaDomCreator {
    pub fn parse(html: &str) -> DomCreationResult {
        parse_fragment(
            PaDomCreator::default(),
            Default::default(),
            paqual_name(""),
            vec![],
        )
        .from_utf8()
        .one(html.as_bytes())
    }

    /// Add `text` as the last child of `parent`, merging it into a text
    /// node already there.
    fn append_text(dom: &mut PaDom, parent: &PaDomHandle, text: &str) {
        let last_text = dom
            .get_node(parent)
            .children()
            .last()
            .filter(|h| matches!(dom.get_node(h), PaDomNode::Text(_)))
            .cloned();
        match last_text {
            Some(handle) => {
                if let PaDomNode::Text(t) = dom.get_mut_node(&handle) {
                    t.content += text;
                }
            }
            None => {
                let handle = dom.add_node(PaDomNode::Text(PaNodeText {
                    content: text.to_owned(),
                }));
                if let Some(children) = dom.get_mut_node(parent).children_mut()
                {
                    children.push(handle);
                }
            }
        }
    }

    fn detach(dom: &mut PaDom, target: &PaDomHandle) {
        if let Some(parent) = dom.find_parent(target) {
            if let Some(children) = dom.get_mut_node(&parent).children_mut() {
                children.retain(|h| h != target);
            }
        }
    }
}

impl Default for PaDomCreator {
    fn default() -> Self {
        Self {
            state: RefCell::new(PaDomCreationError::new()),
        }
    }
}

impl TreeSink for PaDomCreator {
    type Handle = PaDomHandle;
    type Output = DomCreationResult;
    type ElemName<'a> = Ref<'a, QualName>;

    fn finish(self) -> Self::Output {
        let state = self.state.into_inner();
        if state.parse_errors.is_empty() {
            Ok(state.dom)
        } else {
            Err(state)
        }
    }

    fn parse_error(&self, msg: Cow<'static, str>) {
        self.state.borrow_mut().parse_errors.push(String::from(msg));
    }

    fn get_document(&self) -> Self::Handle {
        self.state.borrow().dom.document_handle().clone()
    }

    fn elem_name<'a>(&'a self, target: &'a Self::Handle) -> Self::ElemName<'a> {
        Ref::map(self.state.borrow(), |state| state.dom.get_node(target).name())
    }

    fn create_element(
        &self,
        name: QualName,
        attrs: Vec<Attribute>,
        flags: ElementFlags,
    ) -> Self::Handle {
        self.state
            .borrow_mut()
            .dom
            .create_element(name, attrs, flags)
    }

    fn create_comment(&self, _text: StrTendril) -> Self::Handle {
        self.state.borrow_mut().dom.add_node(PaDomNode::Comment)
    }

    fn create_pi(
        &self,
        _target: StrTendril,
        _data: StrTendril,
    ) -> Self::Handle {
        self.state.borrow_mut().dom.add_node(PaDomNode::Comment)
    }

    fn append(&self, parent: &Self::Handle, child: NodeOrText<Self::Handle>) {
        let dom = &mut self.state.borrow_mut().dom;
        match child {
            NodeOrText::AppendNode(child) => {
                if let Some(children) = dom.get_mut_node(parent).children_mut()
                {
                    children.push(child);
                }
            }
            NodeOrText::AppendText(tendril) => {
                Self::append_text(dom, parent, tendril.as_ref());
            }
        }
    }

    fn append_based_on_parent_node(
        &self,
        element: &Self::Handle,
        prev_element: &Self::Handle,
        child: NodeOrText<Self::Handle>,
    ) {
        let has_parent = self.state.borrow().dom.find_parent(element).is_some();
        if has_parent {
            self.append_before_sibling(element, child);
        } else {
            self.append(prev_element, child);
        }
    }

    fn append_doctype_to_document(
        &self,
        _name: StrTendril,
        _public_id: StrTendril,
        _system_id: StrTendril,
    ) {
        // Doctypes carry nothing we keep
    }

    fn mark_script_already_started(&self, _node: &Self::Handle) {}

    fn pop(&self, _node: &Self::Handle) {}

    fn get_template_contents(&self, target: &Self::Handle) -> Self::Handle {
        target.clone()
    }

    fn same_node(&self, x: &Self::Handle, y: &Self::Handle) -> bool {
        x == y
    }

    fn set_quirks_mode(&self, _mode: QuirksMode) {}

    fn append_before_sibling(
        &self,
        sibling: &Self::Handle,
        new_node: NodeOrText<Self::Handle>,
    ) {
        let dom = &mut self.state.borrow_mut().dom;
        let Some(parent) = dom.find_parent(sibling) else {
            return;
        };
        let index = dom
            .get_node(&parent)
            .children()
            .iter()
            .position(|h| h == sibling)
            .unwrap_or(0);
        let handle = match new_node {
            NodeOrText::AppendNode(node) => {
                Self::detach(dom, &node);
                node
            }
            NodeOrText::AppendText(tendril) => {
                let previous = index
                    .checked_sub(1)
                    .and_then(|i| dom.get_node(&parent).children().get(i))
                    .filter(|h| matches!(dom.get_node(h), PaDomNode::Text(_)))
                    .cloned();
                if let Some(previous) = previous {
                    if let PaDomNode::Text(t) = dom.get_mut_node(&previous) {
                        t.content += tendril.as_ref();
                    }
                    return;
                }
                dom.add_node(PaDomNode::Text(PaNodeText {
                    content: tendril.as_ref().to_owned(),
                }))
            }
        };
        let index = dom
            .get_node(&parent)
            .children()
            .iter()
            .position(|h| h == sibling)
            .unwrap_or(index);
        if let Some(children) = dom.get_mut_node(&parent).children_mut() {
            children.insert(index, handle);
        }
    }

    fn add_attrs_if_missing(
        &self,
        target: &Self::Handle,
        attrs: Vec<Attribute>,
    ) {
        let dom = &mut self.state.borrow_mut().dom;
        if let PaDomNode::Container(node) = dom.get_mut_node(target) {
            let to_add: Vec<(String, String)> = attrs
                .iter()
                .filter(|attr| {
                    let attr_name = attr.name.local.as_ref();
                    !node.attrs.iter().any(|(name, _)| name == attr_name)
                })
                .map(|attr| {
                    (attr.name.local.to_string(), attr.value.to_string())
                })
                .collect();
            node.attrs.extend(to_add);
        }
    }

    fn associate_with_form(
        &self,
        _target: &Self::Handle,
        _form: &Self::Handle,
        _nodes: (&Self::Handle, Option<&Self::Handle>),
    ) {
    }

    fn remove_from_parent(&self, target: &Self::Handle) {
        Self::detach(&mut self.state.borrow_mut().dom, target);
    }

    fn reparent_children(
        &self,
        node: &Self::Handle,
        new_parent: &Self::Handle,
    ) {
        let dom = &mut self.state.borrow_mut().dom;
        let moved = dom
            .get_mut_node(node)
            .children_mut()
            .map(std::mem::take)
            .unwrap_or_default();
        if let Some(children) = dom.get_mut_node(new_parent).children_mut() {
            children.extend(moved);
        }
    }

    fn is_mathml_annotation_xml_integration_point(
        &self,
        _handle: &Self::Handle,
    ) -> bool {
        false
    }

    fn set_current_line(&self, _line_number: u64) {}

    fn complete_script(&self, _node: &Self::Handle) -> NextParserState {
        NextParserState::Continue
    }

    fn allow_declarative_shadow_roots(
        &self,
        _intended_parent: &Self::Handle,
    ) -> bool {
        false
    }

    fn attach_declarative_shadow(
        &self,
        _location: &Self::Handle,
        _template: &Self::Handle,
        _attrs: Vec<Attribute>,
    ) -> Result<(), String> {
        Err(String::from("shadow roots are not supported"))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::dom::parser::PaNodeContainer;

    /// Render the reachable part of the tree, e.g. `html[p["a"]]`.
    fn d(dom: &PaDom) -> String {
        fn walk(dom: &PaDom, handle: &PaDomHandle, out: &mut String) {
            match dom.get_node(handle) {
                PaDomNode::Document(n) | PaDomNode::Container(n) => {
                    if !matches!(dom.get_node(handle), PaDomNode::Document(_))
                    {
                        out.push_str(&render_name(n));
                    }
                    out.push('[');
                    for (i, child) in n.children.iter().enumerate() {
                        if i > 0 {
                            out.push(',');
                        }
                        walk(dom, child, out);
                    }
                    out.push(']');
                }
                PaDomNode::Text(t) => {
                    out.push_str(&format!("{:?}", t.content));
                }
                PaDomNode::Comment => out.push_str("<!>"),
            }
        }
        fn render_name(n: &PaNodeContainer) -> String {
            let attrs: Vec<String> = n
                .attrs
                .iter()
                .map(|(k, v)| format!(" {k}={v}"))
                .collect();
            format!("{}{}", n.tag(), attrs.concat())
        }
        let mut out = String::new();
        walk(dom, dom.document_handle(), &mut out);
        out
    }

    fn parse(input: &str) -> PaDom {
        PaDomCreator::parse(input).unwrap()
    }

    #[test]
    fn parsing_an_empty_string_creates_an_empty_dom() {
        assert_eq!(d(&parse("")), "[html[]]");
    }

    #[test]
    fn parsing_a_text_snippet_creates_one_node() {
        assert_eq!(d(&parse("foo")), r#"[html["foo"]]"#);
    }

    #[test]
    fn parsing_nested_structures_produces_them() {
        assert_eq!(
            d(&parse("A<em>B<strong>C</strong>D</em>E")),
            r#"[html["A",em["B",strong["C"],"D"],"E"]]"#
        );
    }

    #[test]
    fn parsing_tags_with_attributes_preserves_them() {
        assert_eq!(
            d(&parse(r#"<a href="https://x.com">txt</a>"#)),
            r#"[html[a href=https://x.com["txt"]]]"#
        );
    }

    #[test]
    fn parsing_text_node_with_escaped_html_entities() {
        assert_eq!(
            d(&parse("aaa&lt;strong&gt;bbb&lt;/strong&gt;ccc")),
            r#"[html["aaa<strong>bbb</strong>ccc"]]"#
        );
    }

    #[test]
    fn comments_are_kept_as_placeholders() {
        assert_eq!(d(&parse("a<!-- x -->b")), r#"[html["a",<!>,"b"]]"#);
    }

    #[test]
    fn misnested_formatting_is_repaired_and_reported() {
        let err =
            PaDomCreator::parse("<strong>a<em>b</strong>c</em>").unwrap_err();
        assert!(!err.parse_errors.is_empty());
        assert_eq!(
            d(&err.dom),
            r#"[html[strong["a",em["b"]],em["c"]]]"#
        );
    }

    #[test]
    fn unclosed_formatting_is_reported() {
        let err = PaDomCreator::parse("<strong>a").unwrap_err();
        assert!(!err.parse_errors.is_empty());
    }
}
