use std::collections::HashMap;

use crate::{ExecutionConfig, GraphError, GraphState, StateSchema, StateUpdate};
use wxchat_core::Runnable;

type BoxedNode<S> = Box<dyn Runnable<GraphState<S>, StateUpdate<S>> + Send + Sync>;
type Predicate<S> = Box<dyn Fn(&GraphState<S>) -> String + Send + Sync>;

enum Edge<S: StateSchema> {
    Direct(String),
    Conditional(Predicate<S>),
}

pub struct GraphBuilder<S: StateSchema> {
    nodes: HashMap<String, BoxedNode<S>>,
    edges: HashMap<String, Edge<S>>,
    entry: Option<String>,
}

impl<S: StateSchema> Default for GraphBuilder<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: StateSchema> GraphBuilder<S> {
    pub fn new() -> Self {
        Self {
            nodes: HashMap::new(),
            edges: HashMap::new(),
            entry: None,
        }
    }

    pub fn add_node<R>(mut self, name: &str, node: R) -> Self
    where
        R: Runnable<GraphState<S>, StateUpdate<S>> + Send + Sync + 'static,
    {
        self.nodes.insert(name.to_string(), Box::new(node));
        self
    }

    pub fn add_edge(mut self, from: &str, to: &str) -> Self {
        self.edges
            .insert(from.to_string(), Edge::Direct(to.to_string()));
        self
    }

    /// Route from `from` to whichever node name the predicate picks out of
    /// the current state. The target is checked at execution time.
    pub fn add_conditional_edge<F>(mut self, from: &str, predicate: F) -> Self
    where
        F: Fn(&GraphState<S>) -> String + Send + Sync + 'static,
    {
        self.edges
            .insert(from.to_string(), Edge::Conditional(Box::new(predicate)));
        self
    }

    pub fn set_entry(mut self, name: &str) -> Self {
        self.entry = Some(name.to_string());
        self
    }

    pub fn build(self) -> Result<ExecutableGraph<S>, GraphError> {
        let entry = self.entry.ok_or(GraphError::MissingEntry)?;
        if !self.nodes.contains_key(&entry) {
            return Err(GraphError::MissingNode { node: entry });
        }
        for (from, edge) in &self.edges {
            if !self.nodes.contains_key(from) {
                return Err(GraphError::MissingNode { node: from.clone() });
            }
            if let Edge::Direct(to) = edge {
                if !self.nodes.contains_key(to) {
                    return Err(GraphError::InvalidEdge { node: to.clone() });
                }
            }
        }
        Ok(ExecutableGraph {
            nodes: self.nodes,
            edges: self.edges,
            entry,
            config: ExecutionConfig::default(),
        })
    }
}

pub struct ExecutableGraph<S: StateSchema> {
    nodes: HashMap<String, BoxedNode<S>>,
    edges: HashMap<String, Edge<S>>,
    entry: String,
    config: ExecutionConfig,
}

impl<S: StateSchema> ExecutableGraph<S> {
    pub fn with_config(mut self, config: ExecutionConfig) -> Self {
        self.config = config;
        self
    }

    pub async fn invoke(&self, mut state: GraphState<S>) -> Result<GraphState<S>, GraphError> {
        let mut current = self.entry.clone();
        let mut steps = 0usize;
        loop {
            if let Some(max) = self.config.max_steps {
                if steps >= max {
                    return Err(GraphError::MaxStepsExceeded {
                        max,
                        reached: steps,
                    });
                }
            }
            steps += 1;

            let node = self
                .nodes
                .get(&current)
                .ok_or_else(|| GraphError::MissingNode {
                    node: current.clone(),
                })?;
            let update = node
                .invoke(state.clone())
                .await
                .map_err(|err| GraphError::NodeFailed {
                    node: current.clone(),
                    source: Box::new(err),
                })?;
            state = state.apply(update);

            match self.edges.get(&current) {
                Some(Edge::Direct(next)) => current = next.clone(),
                Some(Edge::Conditional(predicate)) => {
                    let next = predicate(&state);
                    if !self.nodes.contains_key(&next) {
                        return Err(GraphError::InvalidEdge { node: next });
                    }
                    current = next;
                }
                None => break,
            }
        }
        Ok(state)
    }
}
