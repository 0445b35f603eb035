//! Multi-template merging.
//!
//! The first input is the base; every later file overrides same-named
//! variables in place and contributes new ones under a synthetic section
//! named after the file. Override files contribute variable definitions
//! only; their own sections, whitespace and stray comments are discarded.

use crate::template::{section_line, Node, ParsedTemplate};
use indexmap::IndexMap;

/// One parsed input file together with the name used for its synthetic
/// section header.
#[derive(Debug, Clone)]
pub struct TemplateInput {
    pub template: ParsedTemplate,
    pub filename: String,
}

/// Merges templates in argument order. A single input is returned unchanged,
/// with no synthetic section inserted.
pub fn merge(inputs: Vec<TemplateInput>) -> ParsedTemplate {
    let mut iter = inputs.into_iter();
    let base = match iter.next() {
        Some(base) => base,
        None => return ParsedTemplate::default(),
    };
    if iter.len() == 0 {
        return base.template;
    }

    let mut nodes = vec![
        Node::Section {
            name: base.filename.clone(),
            line: section_line(&base.filename),
        },
        Node::Whitespace { count: 1 },
    ];
    nodes.extend(base.template.nodes);

    let mut index: IndexMap<String, usize> = IndexMap::new();
    for (pos, node) in nodes.iter().enumerate() {
        if let Node::Variable { variable, .. } = node {
            index.insert(variable.name.clone(), pos);
        }
    }

    for input in iter {
        let mut staged: Vec<Node> = Vec::new();
        for node in input.template.nodes {
            let (lines, mut variable) = match node {
                Node::Variable { lines, variable } => (lines, variable),
                _ => continue,
            };
            if let Some(&pos) = index.get(&variable.name) {
                // The override's node wins, but it stays put under the
                // base's section.
                if let Node::Variable { variable: old, .. } = &nodes[pos] {
                    variable.section = old.section.clone();
                }
                nodes[pos] = Node::Variable { lines, variable };
            } else {
                variable.section = Some(input.filename.clone());
                staged.push(Node::Variable { lines, variable });
            }
        }
        if !staged.is_empty() {
            nodes.push(Node::Whitespace { count: 1 });
            nodes.push(Node::Section {
                name: input.filename.clone(),
                line: section_line(&input.filename),
            });
            nodes.push(Node::Whitespace { count: 1 });
            for node in staged {
                if let Node::Variable { variable, .. } = &node {
                    index.insert(variable.name.clone(), nodes.len());
                }
                nodes.push(node);
            }
        }
    }

    ParsedTemplate { nodes }
}
