//! Builds data groups from datapoints sharing an enumerated field value.

use tracing::debug;
use xwalk_model::{GroupRule, Node, NodeValue, Scalar};

pub const DATAGROUP_TYPE: &str = "sdo:datagroup";

/// Enumerates each rule's values from index 1 and stops at the first index
/// no datapoint carries. Matched datapoints lose the grouping field; group
/// numbers run on across rules.
pub fn build_groups(rules: &[GroupRule], datapoints: &mut [Node]) -> Vec<Node> {
    let mut groups = Vec::new();
    for rule in rules {
        for index in 1.. {
            let value = rule.instantiate(index);
            let members = take_members(datapoints, &rule.field, &value);
            if members.is_empty() {
                break;
            }
            debug!(field = %rule.field, %value, members = members.len(), "data group");

            let mut group = Node::new(format!("datagroup/{}/", groups.len() + 1), DATAGROUP_TYPE);
            group.insert(rule.field.clone(), Scalar::Text(value));
            group.insert(
                "datapoints",
                NodeValue::List(
                    members
                        .into_iter()
                        .map(|id| NodeValue::Scalar(Scalar::Text(id)))
                        .collect(),
                ),
            );
            groups.push(group);
        }
    }
    groups
}

fn take_members(datapoints: &mut [Node], field: &str, value: &str) -> Vec<String> {
    let mut members = Vec::new();
    for point in datapoints.iter_mut() {
        if point.get(field).and_then(NodeValue::as_text) == Some(value) {
            point.remove(field);
            members.push(point.id.clone());
        }
    }
    members
}
