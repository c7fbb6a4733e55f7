//! The stored form of a fitted tree.
//!
//! Nodes are kept in a flat list in breadth-first order.
//! A branch refers to its children by position,
//! and every child comes after its parent.
//! Nesting depth of the stored form does not grow with the tree.
use serde::{Serialize, Deserialize};

use std::collections::VecDeque;
use std::sync::Arc;

use crate::common::checkers;
use crate::error::{Result, TreeError};
use crate::sample::Schema;
use super::distribution::ClassDistribution;
use super::node::Node;
use super::params::TreeParams;
use super::split_rule::Splitter;


/// One node of the flat list.
#[derive(Debug, Serialize, Deserialize)]
pub enum StoredNode {
    /// A node with two children at positions `left` and `right`.
    Branch {
        /// Rule of the branch.
        splitter: Splitter,
        /// Position of the left child.
        left: usize,
        /// Position of the right child.
        right: usize,
        /// Class distribution of the branch.
        distribution: ClassDistribution,
    },
    /// A node with no child.
    Leaf {
        /// Class distribution of the leaf.
        distribution: ClassDistribution,
    },
}


/// A fitted tree as it is written to disk.
#[derive(Debug, Serialize, Deserialize)]
pub struct TreeFile {
    pub(super) schema: Arc<Schema>,
    pub(super) params: TreeParams,
    pub(super) features: Vec<usize>,
    pub(super) nodes: Vec<StoredNode>,
}


/// Lay out the tree rooted at `root` in breadth-first order.
pub(super) fn flatten(root: &Node) -> Vec<StoredNode> {
    let mut nodes = Vec::new();
    let mut queue = VecDeque::from([root]);
    // Position of the next node pushed to the queue.
    let mut next = 1;
    while let Some(node) = queue.pop_front() {
        match node {
            Node::Leaf { distribution } => {
                let distribution = distribution.clone();
                nodes.push(StoredNode::Leaf { distribution, });
            },
            Node::Branch { splitter, left, right, distribution } => {
                nodes.push(StoredNode::Branch {
                    splitter: splitter.clone(),
                    left: next,
                    right: next + 1,
                    distribution: distribution.clone(),
                });
                next += 2;
                queue.push_back(left.as_ref());
                queue.push_back(right.as_ref());
            },
        }
    }
    nodes
}


impl TreeFile {
    /// Check the stored tree against its own schema
    /// and rebuild the root node.
    pub(super) fn into_parts(self)
        -> Result<(Node, Arc<Schema>, TreeParams, Vec<usize>)>
    {
        let Self { schema, params, features, nodes } = self;

        Schema::new(schema.features().to_vec(), schema.labels().to_vec())?;
        checkers::params(&params)?;

        let n_features = schema.n_features();
        if let Some(&k) = features.iter().find(|&&k| k >= n_features) {
            return Err(TreeError::invalid(format!(
                "searched feature {k} is out of range for {n_features} features"
            )));
        }

        for (i, node) in nodes.iter().enumerate() {
            check_node(i, node, &schema)?;
        }
        let root = unflatten(nodes)?;

        Ok((root, schema, params, features))
    }
}


fn check_node(i: usize, node: &StoredNode, schema: &Schema) -> Result<()> {
    let distribution = match node {
        StoredNode::Leaf { distribution } => distribution,
        StoredNode::Branch { splitter, distribution, .. } => {
            check_splitter(i, splitter, schema)?;
            distribution
        },
    };

    let n_labels = schema.n_labels();
    if distribution.counts().len() != n_labels
        || distribution.probabilities().len() != n_labels
    {
        return Err(TreeError::invalid(format!(
            "node {i}: distribution does not have {n_labels} labels"
        )));
    }
    let predicted = distribution.predicted();
    if predicted >= n_labels {
        return Err(TreeError::invalid(format!(
            "node {i}: predicted label {predicted} is out of range \
             for {n_labels} labels"
        )));
    }
    Ok(())
}


fn check_splitter(i: usize, splitter: &Splitter, schema: &Schema)
    -> Result<()>
{
    let k = splitter.feature();
    let spec = schema.features()
        .get(k)
        .ok_or_else(|| TreeError::invalid(format!(
            "node {i}: feature {k} is out of range \
             for {} features", schema.n_features()
        )))?;

    match splitter {
        Splitter::Threshold { threshold, .. } => {
            if spec.is_categorical() {
                return Err(TreeError::invalid(format!(
                    "node {i}: threshold on categorical feature `{}`",
                    spec.name(),
                )));
            }
            if threshold.is_nan() {
                return Err(TreeError::invalid(
                    format!("node {i}: threshold is not a number")
                ));
            }
        },
        Splitter::Level { .. } => {
            if !spec.is_categorical() {
                return Err(TreeError::invalid(format!(
                    "node {i}: level split on numeric feature `{}`",
                    spec.name(),
                )));
            }
        },
    }
    Ok(())
}


/// Rebuild the tree from the last node to the first,
/// so that the children of a branch are built before the branch.
fn unflatten(nodes: Vec<StoredNode>) -> Result<Node> {
    let n_nodes = nodes.len();
    let mut built: Vec<Option<Node>> = Vec::with_capacity(n_nodes);
    built.resize_with(n_nodes, || None);

    for (i, node) in nodes.into_iter().enumerate().rev() {
        let node = match node {
            StoredNode::Leaf { distribution } => Node::leaf(distribution),
            StoredNode::Branch { splitter, left, right, distribution } => {
                let mut take = |child: usize| {
                    let node = if child > i {
                        built.get_mut(child).and_then(Option::take)
                    } else {
                        None
                    };
                    node.map(Box::new)
                        .ok_or_else(|| TreeError::invalid(format!(
                            "node {i}: child {child} is missing, \
                             shared, or not after its parent"
                        )))
                };
                let left = take(left)?;
                let right = take(right)?;
                Node::branch(splitter, left, right, distribution)
            },
        };
        built[i] = Some(node);
    }

    let root = built.first_mut()
        .and_then(Option::take)
        .ok_or_else(|| TreeError::invalid("the tree has no node"))?;
    if let Some(k) = built.iter().position(Option::is_some) {
        return Err(TreeError::invalid(
            format!("node {k} is not reachable from the root")
        ));
    }
    Ok(root)
}


#[cfg(test)]
mod tests {
    use super::*;

    fn distribution(a: usize, b: usize) -> ClassDistribution {
        ClassDistribution::from_counts(vec![a, b])
    }

    fn stump() -> Node {
        let splitter = Splitter::Threshold { feature: 0, threshold: 0.5 };
        let left = Box::new(Node::leaf(distribution(2, 0)));
        let right = Box::new(Node::leaf(distribution(0, 2)));
        Node::branch(splitter, left, right, distribution(2, 2))
    }

    #[test]
    fn test_flatten_01() {
        let nodes = flatten(&stump());
        assert_eq!(nodes.len(), 3);
        assert!(matches!(
            nodes[0],
            StoredNode::Branch { left: 1, right: 2, .. }
        ));

        let res = unflatten(nodes).unwrap();
        let exp = stump();
        assert_eq!(exp, res, "expected {exp:?}, got {res:?}.");
    }

    #[test]
    fn test_unflatten_shared_child() {
        let mut nodes = flatten(&stump());
        if let StoredNode::Branch { right, .. } = &mut nodes[0] {
            *right = 1;
        }
        let res = unflatten(nodes);
        assert!(matches!(res, Err(TreeError::InvalidInput(_))));
    }

    #[test]
    fn test_unflatten_backward_child() {
        let mut nodes = flatten(&stump());
        if let StoredNode::Branch { left, .. } = &mut nodes[0] {
            *left = 0;
        }
        let res = unflatten(nodes);
        assert!(matches!(res, Err(TreeError::InvalidInput(_))));
    }

    #[test]
    fn test_unflatten_unreachable_node() {
        let mut nodes = flatten(&stump());
        nodes.push(StoredNode::Leaf { distribution: distribution(1, 0) });
        let res = unflatten(nodes);
        assert!(matches!(res, Err(TreeError::InvalidInput(_))));

        let res = unflatten(Vec::new());
        assert!(matches!(res, Err(TreeError::InvalidInput(_))));
    }
}
