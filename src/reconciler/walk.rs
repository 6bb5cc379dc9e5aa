//! Descriptor discovery.
//!
//! Depth-first over list elements and map entries in order. A descriptor is
//! reported and not descended into; its props belong to the child.

use crate::component::Descriptor;
use crate::node::{Node, Path, PathSegment};

/// A descriptor found in a rendered tree.
#[derive(Debug)]
pub(crate) struct ComponentSite {
    /// `None` when the descriptor is the whole tree.
    pub(crate) path: Option<Path>,
    pub(crate) descriptor: Descriptor,
}

/// Every descriptor in `tree`, in traversal order.
pub(crate) fn find_components(tree: &Node) -> Vec<ComponentSite> {
    let mut sites = Vec::new();
    match tree {
        Node::Component(descriptor) => sites.push(ComponentSite {
            path: None,
            descriptor: descriptor.clone(),
        }),
        _ => visit(tree, &mut Vec::new(), &mut sites),
    }
    sites
}

fn visit(node: &Node, path: &mut Path, sites: &mut Vec<ComponentSite>) {
    match node {
        Node::List(items) => {
            for (index, item) in items.iter().enumerate() {
                path.push(PathSegment::Index(index));
                visit_member(item, path, sites);
                path.pop();
            }
        }
        Node::Map(entries) => {
            for (key, value) in entries {
                path.push(PathSegment::Key(key.clone()));
                visit_member(value, path, sites);
                path.pop();
            }
        }
        // leaves end the walk
        _ => {}
    }
}

fn visit_member(node: &Node, path: &mut Path, sites: &mut Vec<ComponentSite>) {
    match node {
        Node::Component(descriptor) => sites.push(ComponentSite {
            path: Some(path.clone()),
            descriptor: descriptor.clone(),
        }),
        _ => visit(node, path, sites),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::{RenderResult, component};
    use crate::node::Opaque;
    use crate::props::Props;

    fn leaf(_: &Props) -> RenderResult {
        Ok(Node::Null)
    }

    fn paths(tree: &Node) -> Vec<Option<Path>> {
        find_components(tree).into_iter().map(|site| site.path).collect()
    }

    #[test]
    fn test_root_descriptor() {
        let tree = component(leaf, Props::new());
        assert_eq!(paths(&tree), vec![None]);
    }

    #[test]
    fn test_depth_first_order() {
        let tree = Node::map([
            ("a", component(leaf, Props::new())),
            (
                "b",
                Node::list([
                    Node::Int(0),
                    component(leaf, Props::new()),
                    Node::map([("c", component(leaf, Props::new()))]),
                ]),
            ),
            ("d", component(leaf, Props::new())),
        ]);

        assert_eq!(
            paths(&tree),
            vec![
                Some(vec![PathSegment::Key("a".into())]),
                Some(vec![PathSegment::Key("b".into()), PathSegment::Index(1)]),
                Some(vec![
                    PathSegment::Key("b".into()),
                    PathSegment::Index(2),
                    PathSegment::Key("c".into()),
                ]),
                Some(vec![PathSegment::Key("d".into())]),
            ]
        );
    }

    #[test]
    fn test_does_not_descend_into_descriptor_props() {
        let nested = component(leaf, Props::new().with("inner", component(leaf, Props::new())));
        let tree = Node::list([nested]);
        assert_eq!(paths(&tree).len(), 1);
    }

    #[test]
    fn test_leaves_stop_the_walk() {
        let tree = Node::list([
            Node::from("text"),
            Node::from(Opaque::new(vec![1, 2, 3])),
            Node::Float(1.5),
        ]);
        assert!(find_components(&tree).is_empty());
        assert!(find_components(&Node::Int(3)).is_empty());
    }
}
