use serde::{Deserialize, Serialize};
use wxchat_core::{Runnable, WxchatError};
use wxchat_graph::{
    ExecutionConfig, GraphBuilder, GraphError, GraphState, StateSchema, StateUpdate,
};

#[derive(Clone, Default, Debug, Serialize, Deserialize, PartialEq)]
struct DemoState {
    count: i32,
}

impl StateSchema for DemoState {}

struct Inc;

#[async_trait::async_trait]
impl Runnable<GraphState<DemoState>, StateUpdate<DemoState>> for Inc {
    async fn invoke(
        &self,
        input: GraphState<DemoState>,
    ) -> Result<StateUpdate<DemoState>, WxchatError> {
        Ok(StateUpdate::new(DemoState {
            count: input.data.count + 1,
        }))
    }
}

#[tokio::test]
async fn graph_conditional_routes_by_state() {
    let graph = GraphBuilder::new()
        .add_node("inc", Inc)
        .add_node("inc2", Inc)
        .add_node("stop", Inc)
        .add_conditional_edge("inc", |state: &GraphState<DemoState>| {
            if state.data.count > 1 {
                "stop".to_string()
            } else {
                "inc2".to_string()
            }
        })
        .set_entry("inc")
        .build()
        .unwrap();

    let state = GraphState::new(DemoState { count: 1 });
    let out = graph.invoke(state).await.unwrap();
    assert_eq!(out.data.count, 3);
}

#[tokio::test]
async fn conditional_edge_to_unknown_node_fails() {
    let graph = GraphBuilder::new()
        .add_node("inc", Inc)
        .add_conditional_edge("inc", |_: &GraphState<DemoState>| "ghost".to_string())
        .set_entry("inc")
        .build()
        .unwrap();

    let err = graph
        .invoke(GraphState::new(DemoState::default()))
        .await
        .unwrap_err();
    assert!(matches!(err, GraphError::InvalidEdge { node } if node == "ghost"));
}

#[tokio::test]
async fn max_steps_guard_stops_cycles() {
    let graph = GraphBuilder::new()
        .add_node("loop", Inc)
        .add_edge("loop", "loop")
        .set_entry("loop")
        .build()
        .unwrap()
        .with_config(ExecutionConfig {
            max_steps: Some(5),
        });

    let err = graph
        .invoke(GraphState::new(DemoState::default()))
        .await
        .unwrap_err();
    assert!(matches!(err, GraphError::MaxStepsExceeded { max: 5, .. }));
}
