//! A node struct used in the decision tree algorithm.
use std::fmt;

use crate::sample::{Schema, Value};
use super::distribution::ClassDistribution;
use super::split_rule::{LeftRight, Splitter};


/// Enumeration of branch and leaf nodes.
/// A branch owns its two children.
///
/// The size queries walk the tree with an explicit stack.
/// The text dump, the dot export and dropping a node
/// recurse once per level.
/// A tree fitted on `n` examples is less than `n` levels deep.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// A node that have two childrens.
    Branch {
        /// Rule that sends an example to `left` or `right`.
        splitter: Splitter,
        /// Child for the examples that pass the rule.
        left: Box<Node>,
        /// Child for the other examples.
        right: Box<Node>,
        /// Class distribution of the training examples on this node.
        distribution: ClassDistribution,
    },
    /// A node that have no child.
    Leaf {
        /// Class distribution of the training examples on this leaf.
        distribution: ClassDistribution,
    },
}


impl Node {
    pub(crate) fn branch(
        splitter:     Splitter,
        left:         Box<Node>,
        right:        Box<Node>,
        distribution: ClassDistribution,
    ) -> Self
    {
        Self::Branch { splitter, left, right, distribution, }
    }


    pub(crate) fn leaf(distribution: ClassDistribution) -> Self {
        Self::Leaf { distribution, }
    }


    /// Returns the class distribution of the training examples
    /// that reached this node.
    pub fn distribution(&self) -> &ClassDistribution {
        match self {
            Self::Branch { distribution, .. } => distribution,
            Self::Leaf { distribution } => distribution,
        }
    }


    /// Returns `true` if this node is a leaf.
    pub fn is_leaf(&self) -> bool {
        matches!(self, Self::Leaf { .. })
    }


    /// Walk from this node to a leaf.
    /// `values` must already conform to the schema.
    pub(crate) fn route(&self, values: &[Value]) -> &ClassDistribution {
        let mut node = self;
        loop {
            match node {
                Self::Leaf { distribution } => return distribution,
                Self::Branch { splitter, left, right, .. } => {
                    node = match splitter.split(values) {
                        LeftRight::Left  => left,
                        LeftRight::Right => right,
                    };
                },
            }
        }
    }


    /// Returns the nodes of this sub-tree in preorder,
    /// left child before right child.
    pub fn iter(&self) -> Nodes<'_> {
        Nodes { stack: vec![self] }
    }


    /// Returns the depth of the sub-tree rooted at this node.
    /// A leaf has depth `0`.
    pub fn depth(&self) -> usize {
        let mut depth = 0;
        let mut stack = vec![(self, 0_usize)];
        while let Some((node, d)) = stack.pop() {
            depth = depth.max(d);
            if let Self::Branch { left, right, .. } = node {
                stack.push((left.as_ref(), d + 1));
                stack.push((right.as_ref(), d + 1));
            }
        }
        depth
    }


    /// Returns the number of leaves of this sub-tree.
    pub fn n_leaves(&self) -> usize {
        self.iter().filter(|node| node.is_leaf()).count()
    }


    /// Returns the number of nodes of this sub-tree.
    pub fn n_nodes(&self) -> usize {
        self.iter().count()
    }


    pub(crate) fn to_dot_info(&self, id: usize, schema: &Schema)
        -> (Vec<String>, usize)
    {
        match self {
            Self::Branch { splitter, left, right, .. } => {
                let splitter = format!(
                    "\tnode_{id} [ label = \"{} ?\" ];\n",
                    splitter.describe(schema),
                );

                let left_id = id + 1;
                let (     left,  right_id) = left.to_dot_info(left_id, schema);
                let (mut right, return_id) = right.to_dot_info(right_id, schema);

                let mut info = left;
                info.push(splitter);
                info.append(&mut right);

                let left_edge = format!(
                    "\tnode_{id} -- node_{left_id} [ label = \"Yes\" ];\n",
                );
                info.push(left_edge);
                let right_edge = format!(
                    "\tnode_{id} -- node_{right_id} [ label = \"No\" ];\n",
                );
                info.push(right_edge);

                (info, return_id)
            },
            Self::Leaf { distribution } => {
                let label = &schema.labels()[distribution.predicted()];
                let p = distribution.probabilities()[distribution.predicted()];
                let info = format!(
                    "\tnode_{id} [ label = \"{label} ({p:.2})\", shape = box ];\n",
                );

                (vec![info], id + 1)
            }
        }
    }


    /// Writes the sub-tree as indented text,
    /// one line per node.
    pub(crate) fn write_tree(
        &self,
        f:      &mut fmt::Formatter<'_>,
        schema: &Schema,
        indent: usize,
    ) -> fmt::Result
    {
        let pad = "  ".repeat(indent);
        match self {
            Self::Leaf { distribution } => {
                writeln!(f, "{pad}leaf {}", Summary(distribution, schema))
            },
            Self::Branch { splitter, left, right, distribution } => {
                writeln!(f, "{pad}node {}", Summary(distribution, schema))?;
                writeln!(f, "{pad}  if {}", splitter.describe(schema))?;
                left.write_tree(f, schema, indent + 2)?;
                writeln!(f, "{pad}  else")?;
                right.write_tree(f, schema, indent + 2)
            },
        }
    }
}


/// Preorder iterator over the nodes of a tree.
/// See [`Node::iter`].
pub struct Nodes<'a> {
    stack: Vec<&'a Node>,
}


impl<'a> Iterator for Nodes<'a> {
    type Item = &'a Node;
    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        if let Node::Branch { left, right, .. } = node {
            self.stack.push(right.as_ref());
            self.stack.push(left.as_ref());
        }
        Some(node)
    }
}


struct Summary<'a>(&'a ClassDistribution, &'a Schema);


impl fmt::Display for Summary<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Self(distribution, schema) = self;
        let labels = schema.labels();
        write!(
            f,
            "n = {}, predict {} (",
            distribution.total(),
            labels[distribution.predicted()],
        )?;
        let probs = labels.iter()
            .zip(distribution.probabilities())
            .map(|(label, p)| format!("{label}: {p:.3}"))
            .collect::<Vec<_>>()
            .join(", ");
        write!(f, "{probs})")
    }
}
