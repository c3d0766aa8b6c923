//! Element query
//!
//! The native selector engine: compound simple selectors (tag, #id,
//! .class, [attr], [attr=value]), the descendant combinator, and
//! comma-separated lists. Matching runs against the cached id/class
//! attributes on ElementData.

use crate::node::ElementData;
use crate::traverse::TreeWalker;
use crate::tree::{DomError, DomResult, DomTree};
use crate::NodeId;

/// Element query surface
pub trait ElementQuery {
    /// First descendant of `root` matching the selector, in document order
    fn query_selector(&self, root: NodeId, selector: &str) -> DomResult<Option<NodeId>>;

    /// All descendants of `root` matching the selector, in document order
    fn query_selector_all(&self, root: NodeId, selector: &str) -> DomResult<Vec<NodeId>>;

    /// Closest ancestor-or-self of `element` matching the selector
    fn closest(&self, element: NodeId, selector: &str) -> DomResult<Option<NodeId>>;

    /// Check if `element` matches the selector
    fn matches(&self, element: NodeId, selector: &str) -> DomResult<bool>;
}

impl ElementQuery for DomTree {
    fn query_selector(&self, root: NodeId, selector: &str) -> DomResult<Option<NodeId>> {
        let list = SelectorList::parse(selector)?;
        let mut walker = TreeWalker::new();
        walker.begin(self, root);
        while let Some(el) = walker.next_element(self) {
            if list.matches(self, el) {
                return Ok(Some(el));
            }
        }
        Ok(None)
    }

    fn query_selector_all(&self, root: NodeId, selector: &str) -> DomResult<Vec<NodeId>> {
        let list = SelectorList::parse(selector)?;
        let mut out = Vec::new();
        let mut walker = TreeWalker::new();
        walker.begin(self, root);
        while let Some(el) = walker.next_element(self) {
            if list.matches(self, el) {
                out.push(el);
            }
        }
        Ok(out)
    }

    fn closest(&self, element: NodeId, selector: &str) -> DomResult<Option<NodeId>> {
        let list = SelectorList::parse(selector)?;
        let mut current = element;
        while current.is_valid() {
            if list.matches(self, current) {
                return Ok(Some(current));
            }
            current = self.get(current).map_or(NodeId::NONE, |n| n.parent);
        }
        Ok(None)
    }

    fn matches(&self, element: NodeId, selector: &str) -> DomResult<bool> {
        let list = SelectorList::parse(selector)?;
        Ok(list.matches(self, element))
    }
}

/// Parsed, comma-separated selector alternatives
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectorList {
    items: Vec<ComplexSelector>,
}

impl SelectorList {
    /// Parse selector text
    pub fn parse(input: &str) -> DomResult<Self> {
        let mut items = Vec::new();
        for part in input.split(',') {
            items.push(ComplexSelector::parse(part)
                .ok_or_else(|| DomError::InvalidSelector(input.to_string()))?);
        }
        if items.is_empty() {
            return Err(DomError::InvalidSelector(input.to_string()));
        }
        Ok(Self { items })
    }

    /// Check whether `node` matches any alternative
    pub fn matches(&self, tree: &DomTree, node: NodeId) -> bool {
        self.items.iter().any(|cx| cx.matches(tree, node))
    }
}

/// Descendant-combined compound chain; the last compound is the subject
#[derive(Debug, Clone, PartialEq, Eq)]
struct ComplexSelector {
    parts: Vec<CompoundSelector>,
}

impl ComplexSelector {
    fn parse(input: &str) -> Option<Self> {
        let mut parts = Vec::new();
        for chunk in input.split_whitespace() {
            parts.push(CompoundSelector::parse(chunk)?);
        }
        if parts.is_empty() {
            return None;
        }
        Some(Self { parts })
    }

    fn matches(&self, tree: &DomTree, node: NodeId) -> bool {
        let Some(elem) = tree.get(node).and_then(|n| n.as_element()) else {
            return false;
        };
        let Some((subject, ancestors)) = self.parts.split_last() else {
            return false;
        };
        if !subject.matches(elem) {
            return false;
        }

        // Match the remaining compounds against ancestors, right to left.
        let mut current = tree.get(node).map_or(NodeId::NONE, |n| n.parent);
        for part in ancestors.iter().rev() {
            loop {
                if !current.is_valid() {
                    return false;
                }
                let matched = tree
                    .get(current)
                    .and_then(|n| n.as_element())
                    .is_some_and(|e| part.matches(e));
                let parent = tree.get(current).map_or(NodeId::NONE, |n| n.parent);
                current = parent;
                if matched {
                    break;
                }
            }
        }
        true
    }
}

/// tag/#id/.class/[attr] tests that must all hold on one element
#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct CompoundSelector {
    tag: Option<String>,
    id: Option<String>,
    classes: Vec<String>,
    attrs: Vec<AttrTest>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct AttrTest {
    name: String,
    value: Option<String>,
}

impl CompoundSelector {
    fn parse(input: &str) -> Option<Self> {
        let mut sel = Self::default();
        let mut chars = input.chars().peekable();

        // Optional leading tag name or universal.
        if matches!(chars.peek(), Some(c) if *c != '#' && *c != '.' && *c != '[') {
            let mut tag = String::new();
            while matches!(chars.peek(), Some(c) if *c != '#' && *c != '.' && *c != '[') {
                tag.push(chars.next()?);
            }
            if tag != "*" {
                sel.tag = Some(tag.to_ascii_lowercase());
            }
        }

        while let Some(marker) = chars.next() {
            match marker {
                '#' | '.' => {
                    let mut name = String::new();
                    while matches!(chars.peek(), Some(c) if *c != '#' && *c != '.' && *c != '[') {
                        name.push(chars.next()?);
                    }
                    if name.is_empty() {
                        return None;
                    }
                    if marker == '#' {
                        sel.id = Some(name);
                    } else {
                        sel.classes.push(name);
                    }
                }
                '[' => {
                    let mut body = String::new();
                    loop {
                        match chars.next() {
                            Some(']') => break,
                            Some(c) => body.push(c),
                            None => return None,
                        }
                    }
                    sel.attrs.push(AttrTest::parse(&body)?);
                }
                _ => return None,
            }
        }

        if sel.tag.is_none() && sel.id.is_none() && sel.classes.is_empty() && sel.attrs.is_empty() {
            return None;
        }
        Some(sel)
    }

    fn matches(&self, elem: &ElementData) -> bool {
        if let Some(tag) = &self.tag {
            if elem.tag != *tag {
                return false;
            }
        }
        if let Some(id) = &self.id {
            if elem.id.as_deref() != Some(id.as_str()) {
                return false;
            }
        }
        if !self.classes.iter().all(|c| elem.has_class(c)) {
            return false;
        }
        self.attrs.iter().all(|test| match &test.value {
            Some(v) => elem.get_attr(&test.name) == Some(v.as_str()),
            None => elem.has_attr(&test.name),
        })
    }
}

impl AttrTest {
    fn parse(body: &str) -> Option<Self> {
        if body.is_empty() {
            return None;
        }
        match body.split_once('=') {
            None => Some(Self {
                name: body.to_string(),
                value: None,
            }),
            Some((name, raw)) => {
                if name.is_empty() {
                    return None;
                }
                let value = raw.trim_matches(|c| c == '"' || c == '\'');
                Some(Self {
                    name: name.to_string(),
                    value: Some(value.to_string()),
                })
            }
        }
    }
}
