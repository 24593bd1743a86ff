//! Level topology as an arena-backed tree of room slots.
//!
//! Nodes are addressed by dense [`NodeId`]s handed out in creation order
//! across the whole graph; parent and child links are stored as ids.

pub mod builder;

use std::fmt;

use log::trace;
use thiserror::Error;
use xxhash_rust::xxh3::xxh3_64;

use crate::room::CollectionRef;

pub use builder::{BuilderError, LevelGraphBuilder, SharedGraph};

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub u32);

impl NodeId {
    pub const ROOT: NodeId = NodeId(0);

    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum GraphError {
    #[error("node {0} does not belong to this level graph")]
    UnknownNode(NodeId),
}

/// A room slot: which collection feeds it and how it hangs off the tree.
#[derive(Clone, Debug)]
pub struct LevelGraphNode {
    id: NodeId,
    collection: CollectionRef,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl LevelGraphNode {
    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn collection(&self) -> &CollectionRef {
        &self.collection
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }
}

impl fmt::Display for LevelGraphNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Node({}-{}, Children: {})",
            self.collection.name(),
            self.id,
            self.children.len()
        )
    }
}

#[derive(Clone, Debug)]
pub struct LevelGraph {
    nodes: Vec<LevelGraphNode>,
}

impl LevelGraph {
    pub fn new(root_collection: CollectionRef) -> (Self, NodeId) {
        let mut graph = Self { nodes: Vec::new() };
        let root = graph.push_node(root_collection, None);
        (graph, root)
    }

    /// Appends a new child under `parent`, taking the next id.
    ///
    /// The parent is checked before anything is mutated.
    pub fn add_child(
        &mut self,
        parent: NodeId,
        collection: CollectionRef,
    ) -> Result<NodeId, GraphError> {
        if self.node(parent).is_none() {
            return Err(GraphError::UnknownNode(parent));
        }
        Ok(self.push_node(collection, Some(parent)))
    }

    fn push_node(&mut self, collection: CollectionRef, parent: Option<NodeId>) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        trace!(
            "level graph node {id} ({}) added under {}",
            collection.name(),
            parent.map_or_else(|| "none".to_string(), |parent| parent.to_string())
        );
        self.nodes.push(LevelGraphNode { id, collection, parent, children: Vec::new() });
        // The root has no parent to register with.
        if let Some(parent) = parent {
            self.nodes[parent.index()].children.push(id);
        }
        id
    }

    pub fn root(&self) -> &LevelGraphNode {
        &self.nodes[NodeId::ROOT.index()]
    }

    pub fn node(&self, id: NodeId) -> Option<&LevelGraphNode> {
        self.nodes.get(id.index())
    }

    /// Number of nodes ever created; also the next id to be issued.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always false: a graph is created together with its root.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Nodes in creation order.
    pub fn iter(&self) -> impl Iterator<Item = &LevelGraphNode> {
        self.nodes.iter()
    }

    /// Pre-order walk from the root, visiting children in creation order.
    pub fn depth_first(&self) -> DepthFirst<'_> {
        DepthFirst { graph: self, stack: vec![NodeId::ROOT] }
    }

    pub fn depth(&self, id: NodeId) -> Result<usize, GraphError> {
        let mut node = self.node(id).ok_or(GraphError::UnknownNode(id))?;
        let mut depth = 0;
        while let Some(parent) = node.parent {
            node = &self.nodes[parent.index()];
            depth += 1;
        }
        Ok(depth)
    }

    /// Shape encoding: per node its id, parent, and collection name.
    pub fn canonical_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::new();
        bytes.extend((self.nodes.len() as u32).to_le_bytes());
        for node in &self.nodes {
            bytes.extend(node.id.0.to_le_bytes());
            match node.parent {
                Some(parent) => {
                    bytes.push(1);
                    bytes.extend(parent.0.to_le_bytes());
                }
                None => bytes.push(0),
            }
            let name = node.collection.name().as_bytes();
            bytes.extend((name.len() as u32).to_le_bytes());
            bytes.extend(name);
        }
        bytes
    }

    pub fn fingerprint(&self) -> u64 {
        xxh3_64(&self.canonical_bytes())
    }
}

pub struct DepthFirst<'a> {
    graph: &'a LevelGraph,
    stack: Vec<NodeId>,
}

impl<'a> Iterator for DepthFirst<'a> {
    type Item = &'a LevelGraphNode;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.stack.pop()?;
        let node = self.graph.node(id)?;
        self.stack.extend(node.children.iter().rev());
        Some(node)
    }
}
