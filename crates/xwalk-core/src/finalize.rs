use xwalk_model::{Document, Node, NodeValue};

/// Removes `#` and `##` from every node in the document, nested ones included.
pub fn finalize(document: &mut Document) {
    let sections = [
        &mut document.methodology.aspects,
        &mut document.system.facets,
        &mut document.dataset.datagroup,
        &mut document.dataset.datapoint,
    ];
    for nodes in sections {
        for node in nodes.iter_mut() {
            clear_references(node);
        }
    }
}

pub fn clear_references(node: &mut Node) {
    node.refs.clear();
    for (_, value) in &mut node.fields {
        clear_value(value);
    }
}

fn clear_value(value: &mut NodeValue) {
    match value {
        NodeValue::Node(node) => clear_references(node),
        NodeValue::List(items) => items.iter_mut().for_each(clear_value),
        NodeValue::Scalar(_) => {}
    }
}
