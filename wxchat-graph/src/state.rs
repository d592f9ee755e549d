//! Typed state threaded through graph execution.

use serde::{de::DeserializeOwned, Deserialize, Serialize};

/// Bound set for anything carried as graph state. Conversation state in this
/// workspace is a plain serde-able record, so that is what the executor asks
/// for: cloneable, defaultable, and serializable for checkpointing.
pub trait StateSchema:
    Serialize + DeserializeOwned + Clone + Default + Send + Sync + 'static
{
}

/// Snapshot of the state as handed to a node.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(bound = "S: StateSchema")]
pub struct GraphState<S: StateSchema> {
    pub data: S,
}

impl<S: StateSchema> GraphState<S> {
    pub fn new(data: S) -> Self {
        Self { data }
    }

    /// Fold a node's update into the snapshot. Updates carry the whole
    /// record; a node copies forward whatever it does not touch.
    pub fn apply(mut self, update: StateUpdate<S>) -> Self {
        self.data = update.data;
        self
    }
}

/// What a node returns: the next full state record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(bound = "S: StateSchema")]
pub struct StateUpdate<S: StateSchema> {
    pub data: S,
}

impl<S: StateSchema> StateUpdate<S> {
    pub fn new(data: S) -> Self {
        Self { data }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
    struct Counter {
        count: i32,
    }

    impl StateSchema for Counter {}

    #[test]
    fn apply_replaces_the_record() {
        let state = GraphState::new(Counter { count: 1 });
        let next = state.apply(StateUpdate::new(Counter { count: 2 }));
        assert_eq!(next.data.count, 2);
    }
}
