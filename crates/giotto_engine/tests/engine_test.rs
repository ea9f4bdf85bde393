//! End-to-end batch execution tests.

use giotto_engine::{
    ActionOutcome, ExecutionContext, ExecutionEngine, GameDirective, SimulatedGenerator,
};
use giotto_rate_limit::RetryPolicy;
use giotto_script::ScriptParser;
use giotto_storage::{AssetStorage, MemoryStorage};
use std::sync::Arc;
use std::time::Duration;

fn context(storage: Arc<MemoryStorage>) -> ExecutionContext {
    ExecutionContext::new(
        storage,
        Arc::new(SimulatedGenerator::new().with_latency(Duration::ZERO)),
    )
    .unwrap()
    .with_retry(RetryPolicy::new(
        3,
        Duration::from_millis(1),
        Duration::from_millis(4),
    ))
}

const CUTSCENE_SCRIPT: &str = r#"{"actions":[
    {"type":"reason","text":"open with the ruins"},
    {"type":"asset_image","id":"bg","prompt":"p","size":"1024x768","model":"flux-schnell"},
    {"type":"asset_subtitle","id":"n","text":"the gates creak open","voice_gender":"neutral",
     "voice_tone":"epic","voice_pace":"normal","model":"openai-tts"},
    {"type":"asset_cutscene","id":"cs","shots":[
        {"image_id":"bg","subtitle_id":"n","duration":5,"animation":"none"}
    ]},
    {"type":"play_cutscene","cutscene_id":"cs"}
]}"#;

#[tokio::test]
async fn full_batch_generates_assets_and_emits_game_markers() {
    let graph = ScriptParser::new().parse(CUTSCENE_SCRIPT).unwrap();
    let storage = Arc::new(MemoryStorage::new());
    let ctx = context(storage.clone());
    let engine = ExecutionEngine::standard();

    let batch = engine.execute_batch(&graph, &ctx).await;

    assert!(batch.success, "errors: {:?}", batch.errors);
    assert_eq!(batch.assets_generated.len(), 3);
    assert_eq!(batch.actions_executed.len(), 5);

    // Assets land in storage under their action ids.
    for id in ["bg", "n", "cs"] {
        assert!(storage.exists(id).await.unwrap(), "{} missing", id);
    }

    // The cutscene result carries its assembled definition.
    let cutscene = batch
        .actions_executed
        .iter()
        .find(|a| a.id == "cs")
        .unwrap();
    let ActionOutcome::Asset { definition, .. } = &cutscene.outcome else {
        panic!("cutscene should be an asset outcome");
    };
    let definition = definition.as_ref().unwrap();
    assert_eq!(definition["shots"][0]["subtitle_id"], "n");

    // The play_cutscene action is not interpreted, only marked.
    let play = batch
        .actions_executed
        .iter()
        .find(|a| a.action_type == "play_cutscene")
        .unwrap();
    assert_eq!(
        play.outcome,
        ActionOutcome::Game {
            directive: GameDirective::PlayCutscene {
                cutscene_id: "cs".to_string()
            }
        }
    );

    // The annotation executed with no side effect.
    let reason = batch
        .actions_executed
        .iter()
        .find(|a| a.action_type == "reason")
        .unwrap();
    assert_eq!(reason.outcome, ActionOutcome::Annotation);

    // flux-schnell is free; the narration is 20 characters of openai-tts.
    let narration_chars = "the gates creak open".chars().count() as f64;
    let expected = narration_chars * 0.000_015;
    assert!((batch.total_cost - expected).abs() < 1e-12);
    assert_eq!(batch.cost_breakdown.len(), 3);
    assert_eq!(batch.cost_breakdown["image/flux-schnell"], 0.0);
}

#[tokio::test]
async fn one_failing_action_does_not_abort_the_batch() {
    let graph = ScriptParser::new()
        .parse(
            r#"{"actions":[
                {"type":"asset_image","id":"bad","prompt":"explicit ruins","size":"1024x1024","model":"flux-schnell"},
                {"type":"asset_subtitle","id":"ok","text":"still here","voice_gender":"male",
                 "voice_tone":"calm","voice_pace":"normal","model":"elevenlabs"}
            ]}"#,
        )
        .unwrap();
    let ctx = context(Arc::new(MemoryStorage::new()));
    let engine = ExecutionEngine::standard();

    let batch = engine.execute_batch(&graph, &ctx).await;

    assert!(!batch.success);
    assert_eq!(batch.errors.len(), 1);
    assert_eq!(batch.errors[0].action_id, "bad");
    assert!(batch.errors[0].message.contains("disallowed term"));

    // The independent narration still generated.
    assert_eq!(batch.assets_generated.len(), 1);
    assert_eq!(batch.assets_generated[0].id, "ok");
}

#[tokio::test]
async fn failed_dependency_surfaces_through_the_dependent() {
    // The cutscene's image never generates, so assembly reports it missing;
    // both failures land in the batch error list.
    let graph = ScriptParser::new()
        .parse(
            r#"{"actions":[
                {"type":"asset_image","id":"bg","prompt":"gore field","size":"1024x1024","model":"flux-schnell"},
                {"type":"asset_subtitle","id":"n","text":"t","voice_gender":"neutral",
                 "voice_tone":"somber","voice_pace":"normal","model":"openai-tts"},
                {"type":"asset_cutscene","id":"cs","shots":[
                    {"image_id":"bg","subtitle_id":"n","duration":5,"animation":"none"}
                ]}
            ]}"#,
        )
        .unwrap();
    let ctx = context(Arc::new(MemoryStorage::new()));
    let engine = ExecutionEngine::standard();

    let batch = engine.execute_batch(&graph, &ctx).await;

    assert!(!batch.success);
    assert_eq!(batch.errors.len(), 2);
    let cutscene_error = batch.errors.iter().find(|e| e.action_id == "cs").unwrap();
    assert!(cutscene_error.message.contains("bg"));
    assert_eq!(batch.assets_generated.len(), 1); // the narration
}

#[tokio::test]
async fn estimate_batch_sums_executor_estimates() {
    let graph = ScriptParser::new()
        .parse(
            r#"{"actions":[
                {"type":"asset_image","id":"a","prompt":"p","size":"1024x1024","model":"flux-dev"},
                {"type":"asset_image","id":"b","prompt":"p","size":"1024x1024","model":"flux-schnell"},
                {"type":"asset_subtitle","id":"c","text":"ten chars!","voice_gender":"female",
                 "voice_tone":"playful","voice_pace":"fast","model":"elevenlabs"}
            ]}"#,
        )
        .unwrap();
    let engine = ExecutionEngine::standard();

    let estimate = engine.estimate_batch(&graph);

    let expected = 0.025 + 10.0 * 0.000_03;
    assert!((estimate.min - expected).abs() < 1e-12);
    assert!((estimate.max - expected).abs() < 1e-12);
    assert_eq!(estimate.currency, "USD");
}

#[tokio::test]
async fn unregistered_asset_kind_is_a_batch_error() {
    let graph = ScriptParser::new()
        .parse(
            r#"{"actions":[
                {"type":"asset_image","id":"bg","prompt":"p","size":"1024x1024","model":"flux-schnell"}
            ]}"#,
        )
        .unwrap();
    let ctx = context(Arc::new(MemoryStorage::new()));
    let engine = ExecutionEngine::new(giotto_engine::ExecutorRegistry::new());

    let batch = engine.execute_batch(&graph, &ctx).await;

    assert!(!batch.success);
    assert_eq!(batch.errors.len(), 1);
    assert!(batch.errors[0].message.contains("no executor registered"));
}
