use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

pub type AccessorMap = IndexMap<String, AccessorNode>;

/// One observed property read. `accessors` holds the reads made on its value.
///
/// Wire form: `null` for a plain read, or an object of child reads.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccessorNode {
    pub accessors: Option<AccessorMap>,
}

impl AccessorNode {
    pub fn leaf() -> Self {
        Self { accessors: None }
    }

    pub fn with_children(children: AccessorMap) -> Self {
        Self { accessors: Some(children) }
    }

    /// Child reads, if there are any.
    pub fn children(&self) -> Option<&AccessorMap> {
        self.accessors.as_ref().filter(|m| !m.is_empty())
    }
}

/// Build an accessor tree from dotted paths (`"user.name"`, `"onClick"`).
/// Empty segments are skipped.
pub fn accessors_from_paths<I, S>(paths: I) -> AccessorMap
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut root = AccessorMap::new();
    for path in paths {
        let mut level = &mut root;
        for segment in path.as_ref().split('.').filter(|s| !s.is_empty()) {
            let node = level.entry(segment.to_string()).or_default();
            level = node.accessors.get_or_insert_with(AccessorMap::new);
        }
    }
    prune_empty(&mut root);
    root
}

// a read with no further reads is a leaf, not an empty child map
fn prune_empty(map: &mut AccessorMap) {
    for node in map.values_mut() {
        if let Some(children) = node.accessors.as_mut() {
            prune_empty(children);
            if children.is_empty() {
                node.accessors = None;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decodes_wire_form() {
        let m: AccessorMap = serde_json::from_value(json!({"a": {"b": null}, "c": null, "d": {}})).unwrap();
        assert!(m["a"].children().unwrap().contains_key("b"));
        assert!(m["c"].children().is_none());
        assert!(m["d"].children().is_none(), "empty child map counts as no children");
    }

    #[test]
    fn paths_merge_into_one_tree() {
        let m = accessors_from_paths(["user.name", "user.id", "onClick", "user..avatar.url"]);
        assert_eq!(m.keys().collect::<Vec<_>>(), vec!["user", "onClick"]);
        let user = m["user"].children().unwrap();
        assert_eq!(user.keys().collect::<Vec<_>>(), vec!["name", "id", "avatar"]);
        assert_eq!(m["onClick"], AccessorNode::leaf());
        assert!(user["avatar"].children().unwrap().contains_key("url"));
        assert_eq!(user["name"].accessors, None);
    }
}
