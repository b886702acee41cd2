//! Integration tests for the question graph and the interactive session
//!
//! These tests drive the compiled graph end to end with scripted models.

use prompt_chain_rs::adk::error::{ChainError, GraphError, ModelError, NodeError};
use prompt_chain_rs::adk::model::mock::ScriptedModel;
use prompt_chain_rs::adk::model::{GenerationConfig, Model};
use prompt_chain_rs::adk::node::from_fn;
use prompt_chain_rs::chain::session::{Outcome, Session, SessionStats, NOT_RELATED, PROMPT};
use prompt_chain_rs::chain::workflow::graph::{StateGraph, Target};
use prompt_chain_rs::chain::workflow::nodes::{AnswerNode, BuildModelNode, ClassifyNode};
use prompt_chain_rs::chain::workflow::{
    build_question_graph, route_on_topic, QuestionGraph, QuestionState, Route, Step,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

// ============================================================================
// Helpers
// ============================================================================

/// Question graph whose factory hands out `model` and counts builds
fn graph_with(model: Arc<ScriptedModel>) -> (QuestionGraph, Arc<AtomicUsize>) {
    let builds = Arc::new(AtomicUsize::new(0));
    let counter = builds.clone();
    let factory = move || -> Result<Arc<dyn Model>, ModelError> {
        counter.fetch_add(1, Ordering::SeqCst);
        Ok(model.clone())
    };

    let generation = GenerationConfig {
        temperature: Some(0.2),
        ..Default::default()
    };
    let graph =
        build_question_graph(Arc::new(factory), generation).expect("graph should compile");
    (graph, builds)
}

async fn run_session(
    graph: &QuestionGraph,
    input: &str,
) -> (Result<SessionStats, ChainError>, String) {
    let mut output = Vec::new();
    let result = Session::new(graph).run(input.as_bytes(), &mut output).await;
    (result, String::from_utf8(output).expect("utf-8 output"))
}

// ============================================================================
// Graph Invocation Tests
// ============================================================================

#[tokio::test]
async fn test_ml_question_is_answered() {
    let model = Arc::new(
        ScriptedModel::classifying(true).with_answer("Gradient descent is an optimizer..."),
    );
    let (graph, builds) = graph_with(model.clone());

    let state = graph
        .invoke(QuestionState::new("Explain gradient descent."))
        .await
        .expect("invoke failed");

    assert_eq!(state.classification(), Some(true));
    assert_eq!(state.answer(), Some("Gradient descent is an optimizer..."));
    assert_eq!(
        Outcome::from_state(&state).unwrap().render(),
        "AI's Answer: Gradient descent is an optimizer..."
    );

    // One build, one classification, one answer
    assert_eq!(builds.load(Ordering::SeqCst), 1);
    let calls = model.calls();
    assert_eq!(calls.len(), 2);
    assert!(calls[0].schema.is_some());
    assert!(calls[1].schema.is_none());
}

#[tokio::test]
async fn test_unrelated_question_skips_answer() {
    let model = Arc::new(ScriptedModel::classifying(false).with_answer("should not be used"));
    let (graph, _) = graph_with(model.clone());

    let state = graph
        .invoke(QuestionState::new("What is the capital of Sri Lanka?"))
        .await
        .expect("invoke failed");

    assert_eq!(state.classification(), Some(false));
    assert_eq!(state.answer(), None);
    assert_eq!(Outcome::from_state(&state).unwrap().render(), NOT_RELATED);

    // Only the classifier was consulted
    assert_eq!(model.call_count(), 1);
}

#[tokio::test]
async fn test_repeated_invocations_are_deterministic() {
    let model =
        Arc::new(ScriptedModel::classifying(true).with_answer("Backprop computes gradients."));
    let (graph, builds) = graph_with(model);

    let first = graph
        .invoke(QuestionState::new("What is backpropagation?"))
        .await
        .unwrap();
    let second = graph
        .invoke(QuestionState::new("What is backpropagation?"))
        .await
        .unwrap();

    assert_eq!(first.to_json(), second.to_json());
    // A fresh model handle per invocation
    assert_eq!(builds.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_malformed_classification_is_an_error() {
    let model = Arc::new(
        ScriptedModel::new()
            .with_structured("not json at all")
            .with_answer("unused"),
    );
    let (graph, _) = graph_with(model.clone());

    let err = graph.invoke(QuestionState::new("q")).await.unwrap_err();
    match err {
        ChainError::Node { node, source } => {
            assert_eq!(node, "classify");
            assert!(matches!(source, NodeError::Classification(_)));
        }
        other => panic!("expected node error, got {:?}", other),
    }
    // Never fell through to the answer node
    assert_eq!(model.call_count(), 1);
}

#[tokio::test]
async fn test_collaborator_failure_names_node() {
    let model = Arc::new(ScriptedModel::classifying(true));
    let (graph, _) = graph_with(model);

    // No text reply scripted: the answer request fails
    let err = graph
        .invoke(QuestionState::new("What is a CNN?"))
        .await
        .unwrap_err();
    assert!(err.is_recoverable());
    match err {
        ChainError::Node { node, source } => {
            assert_eq!(node, "answer");
            assert!(matches!(
                source,
                NodeError::Model(ModelError::InvalidResponse(_))
            ));
        }
        other => panic!("expected node error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_factory_failure_stops_at_build_model() {
    let factory = || -> Result<Arc<dyn Model>, ModelError> {
        Err(ModelError::ApiKeyMissing("Groq".to_string()))
    };
    let graph =
        build_question_graph(Arc::new(factory), GenerationConfig::default()).unwrap();

    let err = graph.invoke(QuestionState::new("q")).await.unwrap_err();
    assert!(matches!(err, ChainError::Node { ref node, .. } if node == "build_model"));
}

#[tokio::test]
async fn test_unrouted_label_is_fatal() {
    let model = Arc::new(ScriptedModel::classifying(false));
    let factory = move || -> Result<Arc<dyn Model>, ModelError> { Ok(model.clone()) };

    // Exit is deliberately left out of the label map
    let mut graph = StateGraph::new();
    graph
        .add_node(Step::BuildModel, BuildModelNode::new(Arc::new(factory)))
        .add_node(
            Step::Classify,
            ClassifyNode::new(GenerationConfig::default()),
        )
        .add_node(Step::Answer, AnswerNode::new(GenerationConfig::default()))
        .set_entry_point(Step::BuildModel)
        .add_edge(Step::BuildModel, Target::Node(Step::Classify))
        .add_conditional_edges(
            Step::Classify,
            route_on_topic,
            [(Route::Continue, Target::Node(Step::Answer))],
        )
        .add_edge(Step::Answer, Target::End);
    let graph = graph.compile().unwrap();

    let err = graph.invoke(QuestionState::new("q")).await.unwrap_err();
    assert!(!err.is_recoverable());
    assert!(matches!(
        err,
        ChainError::Graph(GraphError::UnroutedLabel { ref node, ref label })
            if node == "classify" && label == "Exit"
    ));
}

/// Question graph whose classify step never records a classification
fn graph_without_classification(model: Arc<ScriptedModel>) -> QuestionGraph {
    let factory = move || -> Result<Arc<dyn Model>, ModelError> { Ok(model.clone()) };

    let mut graph = StateGraph::new();
    graph
        .add_node(Step::BuildModel, BuildModelNode::new(Arc::new(factory)))
        .add_node(Step::Classify, from_fn(|s: QuestionState| Ok(s)))
        .add_node(Step::Answer, AnswerNode::new(GenerationConfig::default()))
        .set_entry_point(Step::BuildModel)
        .add_edge(Step::BuildModel, Target::Node(Step::Classify))
        .add_conditional_edges(
            Step::Classify,
            route_on_topic,
            [
                (Route::Continue, Target::Node(Step::Answer)),
                (Route::Exit, Target::End),
            ],
        )
        .add_edge(Step::Answer, Target::End);
    graph.compile().unwrap()
}

#[tokio::test]
async fn test_missing_classification_is_not_unrelated() {
    let model = Arc::new(ScriptedModel::new().with_answer("unused"));
    let graph = graph_without_classification(model.clone());

    let err = graph
        .invoke(QuestionState::new("Explain gradient descent."))
        .await
        .unwrap_err();
    assert!(err.is_recoverable());
    match err {
        ChainError::Node { node, source } => {
            assert_eq!(node, "classify");
            assert!(matches!(source, NodeError::MissingField("classification")));
        }
        other => panic!("expected node error, got {:?}", other),
    }
    // Neither routed to the answer node nor reported as unrelated
    assert_eq!(model.call_count(), 0);
}

#[test]
fn test_cyclic_graph_is_rejected() {
    let mut graph: StateGraph<QuestionState, Step, Route> = StateGraph::new();
    graph
        .add_node(Step::BuildModel, from_fn(|s: QuestionState| Ok(s)))
        .add_node(Step::Classify, from_fn(|s: QuestionState| Ok(s)))
        .set_entry_point(Step::BuildModel)
        .add_edge(Step::BuildModel, Target::Node(Step::Classify))
        .add_edge(Step::Classify, Target::Node(Step::BuildModel));

    let err = graph.compile().err().expect("cycle should be rejected");
    assert!(matches!(err, GraphError::CycleDetected(_)));
}

// ============================================================================
// Session Tests
// ============================================================================

#[tokio::test]
async fn test_session_answers_and_exits() {
    let model =
        Arc::new(ScriptedModel::classifying(true).with_answer("A GAN pits two networks."));
    let (graph, _) = graph_with(model);

    let (result, output) = run_session(&graph, "What is a GAN?\nexit\nnever read\n").await;

    assert_eq!(result.unwrap(), SessionStats { asked: 1, failed: 0 });
    assert_eq!(
        output,
        format!("{PROMPT}AI's Answer: A GAN pits two networks.\n{PROMPT}")
    );
}

#[tokio::test]
async fn test_session_reports_unrelated_questions() {
    let model = Arc::new(ScriptedModel::classifying(false));
    let (graph, _) = graph_with(model);

    let (result, output) =
        run_session(&graph, "What is the capital of Sri Lanka?\nQ\n").await;

    assert_eq!(result.unwrap().asked, 1);
    assert_eq!(output, format!("{PROMPT}{NOT_RELATED}\n{PROMPT}"));
}

#[tokio::test]
async fn test_session_blank_lines_never_invoke() {
    let model = Arc::new(ScriptedModel::classifying(true).with_answer("unused"));
    let (graph, builds) = graph_with(model.clone());

    let (result, output) = run_session(&graph, "\n   \n\t\n  quit  \n").await;

    assert_eq!(result.unwrap(), SessionStats::default());
    assert_eq!(output, PROMPT.repeat(4));
    assert_eq!(builds.load(Ordering::SeqCst), 0);
    assert_eq!(model.call_count(), 0);
}

#[tokio::test]
async fn test_session_ends_on_eof() {
    let model = Arc::new(ScriptedModel::classifying(false));
    let (graph, _) = graph_with(model);

    let (result, output) = run_session(&graph, "").await;

    assert_eq!(result.unwrap(), SessionStats::default());
    assert_eq!(output, format!("{PROMPT}\n"));
}

#[tokio::test]
async fn test_session_passes_question_as_typed() {
    let model = Arc::new(ScriptedModel::classifying(false));
    let (graph, _) = graph_with(model.clone());

    let (result, _) = run_session(&graph, "  What is a GAN?  \nexit\n").await;

    assert_eq!(result.unwrap().asked, 1);
    let calls = model.calls();
    assert_eq!(
        calls[0].history[1].text(),
        "User question \n\n   What is a GAN?  "
    );
}

#[tokio::test]
async fn test_session_reports_missing_classification() {
    let model = Arc::new(ScriptedModel::new());
    let graph = graph_without_classification(model);

    let (result, output) = run_session(&graph, "Explain gradient descent.\nexit\n").await;

    assert_eq!(result.unwrap(), SessionStats { asked: 1, failed: 1 });
    let expected = "Error: Node 'classify' failed: state field 'classification' is not set";
    assert!(output.contains(expected));
    assert!(!output.contains(NOT_RELATED));
}

#[tokio::test]
async fn test_session_continues_after_node_failure() {
    let model = Arc::new(ScriptedModel::new().with_failure(503, "overloaded"));
    let (graph, _) = graph_with(model.clone());

    let (result, output) =
        run_session(&graph, "What is a CNN?\nWhat is an RNN?\nexit\n").await;

    assert_eq!(result.unwrap(), SessionStats { asked: 2, failed: 2 });
    assert_eq!(output.matches("Error: Node 'classify' failed").count(), 2);
    assert_eq!(model.call_count(), 2);
}
