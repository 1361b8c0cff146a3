//! Sibling-node seams
//!
//! The variable-length node hierarchy lives outside this crate; these are
//! the wrappers this core constructs itself: regular-repeat nodes from
//! `to_regular_array` and dimension-preserving reductions, and option nodes
//! masking empty reduction groups.

use crate::error::Result;
use crate::view::PrimitiveView;

/// The closed set of nodes this crate produces
#[derive(Debug, Clone)]
pub enum Node {
    Primitive(PrimitiveView),
    Regular(RegularNode),
    Option(OptionNode),
}

/// Fixed-repeat wrapper: every row of the parent holds `size` rows of the
/// content
#[derive(Debug, Clone)]
pub struct RegularNode {
    content: Box<Node>,
    size: usize,
}

/// Validity-masked wrapper; `true` marks a populated slot
#[derive(Debug, Clone)]
pub struct OptionNode {
    mask: Vec<bool>,
    content: Box<Node>,
}

impl RegularNode {
    pub fn new(content: Node, size: usize) -> Self {
        RegularNode {
            content: Box::new(content),
            size,
        }
    }

    pub fn content(&self) -> &Node {
        &self.content
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn len(&self) -> Result<usize> {
        if self.size == 0 {
            Ok(0)
        } else {
            Ok(self.content.len()? / self.size)
        }
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }
}

impl OptionNode {
    pub fn new(mask: Vec<bool>, content: Node) -> Self {
        OptionNode {
            mask,
            content: Box::new(content),
        }
    }

    pub fn mask(&self) -> &[bool] {
        &self.mask
    }

    pub fn content(&self) -> &Node {
        &self.content
    }

    pub fn len(&self) -> usize {
        self.mask.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mask.is_empty()
    }
}

impl Node {
    pub fn len(&self) -> Result<usize> {
        match self {
            Node::Primitive(view) => view.len(),
            Node::Regular(node) => node.len(),
            Node::Option(node) => Ok(node.len()),
        }
    }

    pub fn as_primitive(&self) -> Option<&PrimitiveView> {
        match self {
            Node::Primitive(view) => Some(view),
            _ => None,
        }
    }

    pub fn as_regular(&self) -> Option<&RegularNode> {
        match self {
            Node::Regular(node) => Some(node),
            _ => None,
        }
    }

    pub fn as_option(&self) -> Option<&OptionNode> {
        match self {
            Node::Option(node) => Some(node),
            _ => None,
        }
    }

    /// Structural merge compatibility, looking through wrappers
    pub fn mergeable_with(&self, other: &Node, mergebool: bool) -> bool {
        match (self, other) {
            (Node::Option(a), b) => a.content().mergeable_with(b, mergebool),
            (a, Node::Option(b)) => a.mergeable_with(b.content(), mergebool),
            (Node::Regular(a), Node::Regular(b)) => {
                a.size() == b.size() && a.content().mergeable_with(b.content(), mergebool)
            }
            (Node::Primitive(a), Node::Primitive(b)) => a.mergeable(b, mergebool),
            _ => false,
        }
    }
}

impl PrimitiveView {
    /// Rewrap trailing dimensions as a chain of regular-repeat nodes over a
    /// packed 1-D primitive
    ///
    /// This is the escape hatch for callers that must treat a
    /// multidimensional view as nested single-dimension nodes.
    pub fn to_regular_array(&self) -> Result<Node> {
        if self.is_scalar() {
            return Ok(Node::Primitive(self.clone()));
        }
        let packed = self.to_contiguous()?;
        let flat = packed.rebuild(
            packed.buffer().clone(),
            vec![self.flat_len()],
            vec![self.element_size() as isize],
            packed.byte_offset(),
            self.identities().cloned(),
        );
        let mut out = Node::Primitive(flat);
        for i in (1..self.ndim()).rev() {
            out = Node::Regular(RegularNode::new(out, self.shape()[i]));
        }
        Ok(out)
    }
}
