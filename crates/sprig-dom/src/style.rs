//! Inline style handling
//!
//! Declaration-level access to the `style` attribute string. The cascade
//! is somebody else's problem; this is read-modify-write on the attribute
//! text, preserving declaration order.

/// Parse a style attribute into (property, value) pairs
pub fn parse_declarations(style: &str) -> Vec<(String, String)> {
    style
        .split(';')
        .filter_map(|decl| {
            let (name, value) = decl.split_once(':')?;
            let name = name.trim();
            let value = value.trim();
            if name.is_empty() || value.is_empty() {
                return None;
            }
            Some((name.to_ascii_lowercase(), value.to_string()))
        })
        .collect()
}

/// Value of one property, if declared
pub fn get_declaration(style: &str, name: &str) -> Option<String> {
    let name = name.to_ascii_lowercase();
    parse_declarations(style)
        .into_iter()
        .rev()
        .find(|(n, _)| *n == name)
        .map(|(_, v)| v)
}

/// Set one property, returning the new attribute text
pub fn set_declaration(style: &str, name: &str, value: &str) -> String {
    let name = name.to_ascii_lowercase();
    let mut decls = parse_declarations(style);
    match decls.iter_mut().find(|(n, _)| *n == name) {
        Some((_, v)) => *v = value.to_string(),
        None => decls.push((name, value.to_string())),
    }
    serialize(&decls)
}

/// Remove one property, returning the new attribute text
pub fn remove_declaration(style: &str, name: &str) -> String {
    let name = name.to_ascii_lowercase();
    let decls: Vec<_> = parse_declarations(style)
        .into_iter()
        .filter(|(n, _)| *n != name)
        .collect();
    serialize(&decls)
}

fn serialize(decls: &[(String, String)]) -> String {
    decls
        .iter()
        .map(|(n, v)| format!("{n}: {v}"))
        .collect::<Vec<_>>()
        .join("; ")
}
