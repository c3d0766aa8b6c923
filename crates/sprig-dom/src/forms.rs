//! Form control values
//!
//! Value access for input, textarea and select. Select resolution walks
//! the option children: an explicitly selected option wins, else the
//! first option; an option's value attribute wins over its text.

use crate::tree::{DomError, DomResult, DomTree};
use crate::NodeId;

/// Current value of a form control, `None` for non-control elements
pub fn control_value(tree: &DomTree, node: NodeId) -> Option<String> {
    let elem = tree.get(node)?.as_element()?;
    match elem.tag.as_str() {
        "input" => Some(elem.get_attr("value").unwrap_or_default().to_string()),
        "textarea" => Some(tree.text_content(node)),
        "select" => selected_option(tree, node).map(|opt| option_value(tree, opt)),
        _ => None,
    }
}

/// Write a form control's value; `InvalidNodeType` for other elements
pub fn set_control_value(tree: &mut DomTree, node: NodeId, value: &str) -> DomResult<()> {
    let tag = tree.tag_of(node).ok_or(DomError::NotFound)?.to_string();
    match tag.as_str() {
        "input" => {
            let elem = tree
                .get_mut(node)
                .and_then(|n| n.as_element_mut())
                .ok_or(DomError::InvalidNodeType)?;
            elem.set_attr("value", value);
            Ok(())
        }
        "textarea" => {
            let text = tree.create_text(value);
            tree.replace_children(node, &[text])
        }
        "select" => {
            let options = option_ids(tree, node);
            for opt in options {
                let matched = option_value(tree, opt) == value;
                let elem = tree
                    .get_mut(opt)
                    .and_then(|n| n.as_element_mut())
                    .ok_or(DomError::NotFound)?;
                if matched {
                    elem.set_attr("selected", "");
                } else {
                    elem.remove_attr("selected");
                }
            }
            Ok(())
        }
        _ => Err(DomError::InvalidNodeType),
    }
}

fn option_ids(tree: &DomTree, select: NodeId) -> Vec<NodeId> {
    tree.children(select)
        .filter(|(_, n)| n.as_element().is_some_and(|e| e.tag == "option"))
        .map(|(id, _)| id)
        .collect()
}

fn selected_option(tree: &DomTree, select: NodeId) -> Option<NodeId> {
    let options = option_ids(tree, select);
    options
        .iter()
        .copied()
        .find(|&opt| {
            tree.get(opt)
                .and_then(|n| n.as_element())
                .is_some_and(|e| e.has_attr("selected"))
        })
        .or_else(|| options.first().copied())
}

fn option_value(tree: &DomTree, option: NodeId) -> String {
    tree.get(option)
        .and_then(|n| n.as_element())
        .and_then(|e| e.get_attr("value"))
        .map(str::to_string)
        .unwrap_or_else(|| tree.text_content(option).trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_value() {
        let mut tree = DomTree::new();
        let input = tree.create_element("input");

        assert_eq!(control_value(&tree, input).as_deref(), Some(""));
        set_control_value(&mut tree, input, "hello").unwrap();
        assert_eq!(control_value(&tree, input).as_deref(), Some("hello"));
    }

    #[test]
    fn test_textarea_value_is_text() {
        let mut tree = DomTree::new();
        let area = tree.create_element("textarea");
        set_control_value(&mut tree, area, "line").unwrap();

        assert_eq!(control_value(&tree, area).as_deref(), Some("line"));
        assert_eq!(tree.text_content(area), "line");
    }

    #[test]
    fn test_select_prefers_selected_option() {
        let mut tree = DomTree::new();
        let select = tree.create_element("select");
        let one = tree.create_element("option");
        let two = tree.create_element("option");
        tree.get_mut(one)
            .unwrap()
            .as_element_mut()
            .unwrap()
            .set_attr("value", "1");
        tree.get_mut(two)
            .unwrap()
            .as_element_mut()
            .unwrap()
            .set_attr("value", "2");
        tree.append_child(select, one).unwrap();
        tree.append_child(select, two).unwrap();

        // No explicit selection: first option wins.
        assert_eq!(control_value(&tree, select).as_deref(), Some("1"));

        set_control_value(&mut tree, select, "2").unwrap();
        assert_eq!(control_value(&tree, select).as_deref(), Some("2"));
    }

    #[test]
    fn test_option_value_falls_back_to_text() {
        let mut tree = DomTree::new();
        let select = tree.create_element("select");
        let opt = tree.create_element("option");
        let text = tree.create_text("plain");
        tree.append_child(opt, text).unwrap();
        tree.append_child(select, opt).unwrap();

        assert_eq!(control_value(&tree, select).as_deref(), Some("plain"));
    }

    #[test]
    fn test_non_control_is_error() {
        let mut tree = DomTree::new();
        let div = tree.create_element("div");

        assert_eq!(control_value(&tree, div), None);
        assert_eq!(
            set_control_value(&mut tree, div, "x"),
            Err(DomError::InvalidNodeType)
        );
    }
}
