//! Cursor-based DSL for growing a [`LevelGraph`].
//!
//! A builder keeps a head node that `add` extends from. Labels and the scope
//! stack belong to one builder only: a fork shares the graph but starts with
//! neither, so a branch can only jump to labels it declared itself.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use thiserror::Error;

use super::{GraphError, LevelGraph, NodeId};
use crate::room::CollectionRef;

/// Graph handle shared between a builder and its forks.
///
/// `add` fails with [`BuilderError::GraphBorrowed`] while an outside borrow is held.
pub type SharedGraph = Rc<RefCell<LevelGraph>>;

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum BuilderError {
    #[error("label `{0}` was not declared in this builder")]
    UnknownLabel(String),
    #[error("exit_scope called with an empty scope stack")]
    EmptyScopeStack,
    #[error("builder has no head node; call add first")]
    NoHead,
    #[error("level graph is borrowed elsewhere; release it before adding nodes")]
    GraphBorrowed,
    #[error("level graph is still shared with {0} other builder handle(s)")]
    GraphStillShared(usize),
    #[error(transparent)]
    Graph(#[from] GraphError),
}

#[derive(Debug, Default)]
pub struct LevelGraphBuilder {
    graph: Option<SharedGraph>,
    head: Option<NodeId>,
    labels: HashMap<String, NodeId>,
    scopes: Vec<NodeId>,
}

impl LevelGraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    fn branch(graph: SharedGraph, head: NodeId) -> Self {
        Self { graph: Some(graph), head: Some(head), labels: HashMap::new(), scopes: Vec::new() }
    }

    /// Extends the path from head with a slot fed by `collection`.
    ///
    /// The first call creates the graph and its root.
    pub fn add(&mut self, collection: &CollectionRef) -> Result<&mut Self, BuilderError> {
        match (&self.graph, self.head) {
            (Some(graph), Some(head)) => {
                let mut graph = graph.try_borrow_mut().map_err(|_| BuilderError::GraphBorrowed)?;
                let child = graph.add_child(head, collection.clone())?;
                self.head = Some(child);
            }
            _ => {
                let (graph, root) = LevelGraph::new(collection.clone());
                self.graph = Some(Rc::new(RefCell::new(graph)));
                self.head = Some(root);
            }
        }
        Ok(self)
    }

    /// Binds `name` to head. Re-binding a name overwrites it.
    pub fn label(&mut self, name: impl Into<String>) -> Result<&mut Self, BuilderError> {
        let head = self.head.ok_or(BuilderError::NoHead)?;
        self.labels.insert(name.into(), head);
        Ok(self)
    }

    pub fn jump_to(&mut self, name: &str) -> Result<&mut Self, BuilderError> {
        self.head = Some(self.resolve(name)?);
        Ok(self)
    }

    /// Remembers head so `exit_scope` can return to it.
    pub fn enter_scope(&mut self) -> Result<&mut Self, BuilderError> {
        let head = self.head.ok_or(BuilderError::NoHead)?;
        self.scopes.push(head);
        Ok(self)
    }

    pub fn exit_scope(&mut self) -> Result<&mut Self, BuilderError> {
        let saved = self.scopes.pop().ok_or(BuilderError::EmptyScopeStack)?;
        self.head = Some(saved);
        Ok(self)
    }

    /// Independent builder on the same graph, starting at head.
    pub fn fork(&self) -> Result<Self, BuilderError> {
        let head = self.head.ok_or(BuilderError::NoHead)?;
        self.fork_from(head)
    }

    /// Independent builder on the same graph, starting at a labeled node.
    pub fn fork_at(&self, name: &str) -> Result<Self, BuilderError> {
        let head = self.resolve(name)?;
        self.fork_from(head)
    }

    fn fork_from(&self, head: NodeId) -> Result<Self, BuilderError> {
        let graph = self.graph.clone().ok_or(BuilderError::NoHead)?;
        Ok(Self::branch(graph, head))
    }

    fn resolve(&self, name: &str) -> Result<NodeId, BuilderError> {
        self.labels.get(name).copied().ok_or_else(|| BuilderError::UnknownLabel(name.to_string()))
    }

    pub fn head(&self) -> Option<NodeId> {
        self.head
    }

    pub fn graph(&self) -> Option<SharedGraph> {
        self.graph.clone()
    }

    pub fn scope_depth(&self) -> usize {
        self.scopes.len()
    }

    /// Takes the graph out once every fork of it has been dropped.
    pub fn into_graph(self) -> Result<LevelGraph, BuilderError> {
        let graph = self.graph.ok_or(BuilderError::NoHead)?;
        Rc::try_unwrap(graph)
            .map(RefCell::into_inner)
            .map_err(|shared| BuilderError::GraphStillShared(Rc::strong_count(&shared) - 1))
    }
}

#[cfg(test)]
mod tests;
