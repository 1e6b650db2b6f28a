//! Serialization with a validation hook.
//!
//! Field mapping is declared with serde attributes on each node: wire names
//! via `rename_all = "camelCase"`, omission of unset fields via
//! `skip_serializing_if`. [`Validate`] adds the part serde cannot express,
//! per-node size and shape invariants checked after the wire form is built.

use serde::Serialize;
use serde_json::{Map, Value};
use vox_core::ResponseError;

/// Marshal-time validation for a response node.
///
/// Implementors list their nested nodes in [`children`](Validate::children)
/// and put their own invariants in [`check`](Validate::check). The provided
/// [`validate`](Validate::validate) walks children first, so the most deeply
/// nested invalid node is the one reported.
pub trait Validate {
    /// Nested nodes to validate before this one.
    fn children(&self) -> Vec<&dyn Validate> {
        Vec::new()
    }

    /// This node's own invariants. Default: none.
    fn check(&self) -> Result<(), ResponseError> {
        Ok(())
    }

    /// Validate the subtree rooted at this node, depth-first.
    fn validate(&self) -> Result<(), ResponseError> {
        for child in self.children() {
            child.validate()?;
        }
        self.check()
    }
}

impl<T: Validate> Validate for Option<T> {
    fn children(&self) -> Vec<&dyn Validate> {
        match self {
            Some(inner) => vec![inner as &dyn Validate],
            None => Vec::new(),
        }
    }
}

impl<T: Validate> Validate for Vec<T> {
    fn children(&self) -> Vec<&dyn Validate> {
        self.iter().map(|item| item as &dyn Validate).collect()
    }
}

/// Build the wire mapping for `node`, then validate it.
///
/// Unset optional fields are absent from the mapping, never `null`.
pub fn to_wire<T>(node: &T) -> Result<Map<String, Value>, ResponseError>
where
    T: Serialize + Validate,
{
    let value = serde_json::to_value(node)?;
    node.validate()?;
    match value {
        Value::Object(map) => Ok(map),
        other => Err(ResponseError::InvalidResponseShape(format!(
            "response node must serialize to an object, got {other}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use std::cell::RefCell;
    use std::rc::Rc;

    type Log = Rc<RefCell<Vec<&'static str>>>;

    #[derive(Serialize)]
    #[serde(rename_all = "camelCase")]
    struct Leaf {
        label: &'static str,
        #[serde(skip_serializing_if = "Option::is_none")]
        note: Option<String>,
        #[serde(skip)]
        fail: bool,
        #[serde(skip)]
        log: Log,
    }

    impl Validate for Leaf {
        fn check(&self) -> Result<(), ResponseError> {
            self.log.borrow_mut().push(self.label);
            if self.fail {
                return Err(ResponseError::InvalidResponseShape(self.label.to_string()));
            }
            Ok(())
        }
    }

    #[derive(Serialize)]
    struct Parent {
        first: Leaf,
        rest: Vec<Leaf>,
    }

    impl Validate for Parent {
        fn children(&self) -> Vec<&dyn Validate> {
            vec![&self.first as &dyn Validate, &self.rest]
        }
    }

    fn leaf(label: &'static str, fail: bool, log: &Log) -> Leaf {
        Leaf {
            label,
            note: None,
            fail,
            log: Rc::clone(log),
        }
    }

    #[test]
    fn unset_option_is_omitted() {
        let log = Log::default();
        let map = to_wire(&leaf("a", false, &log)).unwrap();
        assert_eq!(map.get("label"), Some(&Value::from("a")));
        assert!(!map.contains_key("note"));
    }

    #[test]
    fn children_validate_before_parent_in_order() {
        let log = Log::default();
        let parent = Parent {
            first: leaf("first", false, &log),
            rest: vec![leaf("second", false, &log), leaf("third", false, &log)],
        };
        parent.validate().unwrap();
        assert_eq!(*log.borrow(), vec!["first", "second", "third"]);
    }

    #[test]
    fn first_failing_descendant_reports() {
        let log = Log::default();
        let parent = Parent {
            first: leaf("first", false, &log),
            rest: vec![leaf("bad", true, &log), leaf("later", true, &log)],
        };
        let err = to_wire(&parent).unwrap_err();
        assert_matches!(err, ResponseError::InvalidResponseShape(ref m) if m == "bad");
        assert_eq!(*log.borrow(), vec!["first", "bad"]);
    }

    #[test]
    fn non_object_root_is_rejected() {
        struct Bare;
        impl Serialize for Bare {
            fn serialize<S: serde::Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
                s.serialize_str("bare")
            }
        }
        impl Validate for Bare {}

        let err = to_wire(&Bare).unwrap_err();
        assert_matches!(err, ResponseError::InvalidResponseShape(_));
    }
}
