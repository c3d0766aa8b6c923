//! sprig markup parsing
//!
//! HTML5 parsing built on html5ever's RcDom, converted into the sprig
//! arena tree. Two entry points: a full-document parse and a fragment
//! parse that drops detached subtrees into an existing document.

mod parser;

pub use parser::MarkupParser;
