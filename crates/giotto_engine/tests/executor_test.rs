//! Executor pipeline tests: caching, retry, rate limiting, validation.

use giotto_core::Action;
use giotto_engine::{
    AssetExecutor, CutsceneExecutor, ExecutionContext, GeneratedMedia, ImageExecutor,
    ImageRequest, MediaGenerator, SimulatedGenerator, SpeechExecutor, SpeechRequest,
};
use giotto_error::{ExecutorErrorKind, GeneratorError, GeneratorErrorKind};
use giotto_rate_limit::{ClassLimit, ResourceClass, ResourceLimiter, RetryPolicy};
use giotto_storage::{AssetMetadata, AssetStorage, MediaType, MemoryStorage};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// Counts generator invocations, delegating to the simulated backend.
struct CountingGenerator {
    inner: SimulatedGenerator,
    images: AtomicUsize,
    speech: AtomicUsize,
}

impl CountingGenerator {
    fn new() -> Self {
        Self {
            inner: SimulatedGenerator::new().with_latency(Duration::ZERO),
            images: AtomicUsize::new(0),
            speech: AtomicUsize::new(0),
        }
    }
}

#[async_trait::async_trait]
impl MediaGenerator for CountingGenerator {
    async fn generate_image(
        &self,
        request: &ImageRequest,
    ) -> Result<GeneratedMedia, GeneratorError> {
        self.images.fetch_add(1, Ordering::SeqCst);
        self.inner.generate_image(request).await
    }

    async fn synthesize_speech(
        &self,
        request: &SpeechRequest,
    ) -> Result<GeneratedMedia, GeneratorError> {
        self.speech.fetch_add(1, Ordering::SeqCst);
        self.inner.synthesize_speech(request).await
    }
}

/// Fails a fixed number of times with a transient error, then succeeds.
struct FlakyGenerator {
    inner: SimulatedGenerator,
    failures: usize,
    calls: AtomicUsize,
}

impl FlakyGenerator {
    fn failing(failures: usize) -> Self {
        Self {
            inner: SimulatedGenerator::new().with_latency(Duration::ZERO),
            failures,
            calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait::async_trait]
impl MediaGenerator for FlakyGenerator {
    async fn generate_image(
        &self,
        request: &ImageRequest,
    ) -> Result<GeneratedMedia, GeneratorError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        if call < self.failures {
            return Err(GeneratorError::new(GeneratorErrorKind::Unavailable(
                "simulated outage".to_string(),
            )));
        }
        self.inner.generate_image(request).await
    }

    async fn synthesize_speech(
        &self,
        request: &SpeechRequest,
    ) -> Result<GeneratedMedia, GeneratorError> {
        self.inner.synthesize_speech(request).await
    }
}

fn fast_retry() -> RetryPolicy {
    RetryPolicy::new(3, Duration::from_millis(1), Duration::from_millis(4))
}

fn image_action(prompt: &str) -> Action {
    serde_json::from_value(serde_json::json!({
        "type": "asset_image",
        "id": "bg",
        "prompt": prompt,
        "size": "1024x768",
        "model": "flux-dev"
    }))
    .unwrap()
}

#[tokio::test]
async fn warm_cache_invokes_generator_at_most_once() {
    let generator = Arc::new(CountingGenerator::new());
    let ctx = ExecutionContext::new(Arc::new(MemoryStorage::new()), generator.clone())
        .unwrap()
        .with_retry(fast_retry());
    let executor = ImageExecutor::new();
    let action = image_action("ancient ruins");

    let first = executor.execute("bg", &action, &ctx).await.unwrap();
    let second = executor.execute("bg", &action, &ctx).await.unwrap();

    assert_eq!(generator.images.load(Ordering::SeqCst), 1);
    assert_eq!(first, second);
    assert_eq!(first.cost, 0.025);
}

#[tokio::test]
async fn generator_recovering_within_budget_succeeds_after_three_calls() {
    let generator = Arc::new(FlakyGenerator::failing(2));
    let ctx = ExecutionContext::new(Arc::new(MemoryStorage::new()), generator.clone())
        .unwrap()
        .with_retry(fast_retry());
    let executor = ImageExecutor::new();

    let result = executor
        .execute("bg", &image_action("ruins"), &ctx)
        .await
        .unwrap();

    assert_eq!(generator.calls.load(Ordering::SeqCst), 3);
    assert_eq!(result.id, "bg");
}

#[tokio::test]
async fn generator_that_never_recovers_reports_attempt_count() {
    let generator = Arc::new(FlakyGenerator::failing(usize::MAX));
    let ctx = ExecutionContext::new(Arc::new(MemoryStorage::new()), generator.clone())
        .unwrap()
        .with_retry(fast_retry());
    let executor = ImageExecutor::new();

    let err = executor
        .execute("bg", &image_action("ruins"), &ctx)
        .await
        .unwrap_err();

    assert_eq!(generator.calls.load(Ordering::SeqCst), 3);
    assert!(matches!(
        err.kind,
        ExecutorErrorKind::RetriesExhausted { attempts: 3, .. }
    ));
    assert!(err.kind.to_string().contains("after 3 attempts"));
}

/// Always rejects with a permanent error.
struct RejectingGenerator {
    calls: AtomicUsize,
}

#[async_trait::async_trait]
impl MediaGenerator for RejectingGenerator {
    async fn generate_image(
        &self,
        _request: &ImageRequest,
    ) -> Result<GeneratedMedia, GeneratorError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(GeneratorError::new(GeneratorErrorKind::InvalidRequest(
            "unsupported size".to_string(),
        )))
    }

    async fn synthesize_speech(
        &self,
        _request: &SpeechRequest,
    ) -> Result<GeneratedMedia, GeneratorError> {
        Err(GeneratorError::new(GeneratorErrorKind::InvalidRequest(
            "unsupported voice".to_string(),
        )))
    }
}

#[tokio::test]
async fn permanent_rejection_is_not_retried() {
    let generator = Arc::new(RejectingGenerator {
        calls: AtomicUsize::new(0),
    });
    let ctx = ExecutionContext::new(Arc::new(MemoryStorage::new()), generator.clone())
        .unwrap()
        .with_retry(fast_retry());
    let executor = ImageExecutor::new();

    let err = executor
        .execute("bg", &image_action("ruins"), &ctx)
        .await
        .unwrap_err();

    assert_eq!(generator.calls.load(Ordering::SeqCst), 1);
    assert!(matches!(err.kind, ExecutorErrorKind::Rejected(_)));
}

#[tokio::test]
async fn validation_failure_never_reaches_the_generator() {
    let generator = Arc::new(CountingGenerator::new());
    let ctx = ExecutionContext::new(Arc::new(MemoryStorage::new()), generator.clone())
        .unwrap()
        .with_retry(fast_retry());
    let executor = ImageExecutor::new();

    let err = executor
        .execute("bg", &image_action(""), &ctx)
        .await
        .unwrap_err();

    assert!(matches!(err.kind, ExecutorErrorKind::Validation(_)));
    assert_eq!(generator.images.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn exhausted_limiter_waits_and_retries_acquisition_once() {
    let generator = Arc::new(CountingGenerator::new());
    // 600 rpm with burst 1: the second acquisition frees up after ~100ms.
    let limiter = ResourceLimiter::with_limit(
        ResourceClass::ImageGeneration,
        ClassLimit { rpm: 600, burst: 1 },
    )
    .unwrap();
    let ctx = ExecutionContext::new(Arc::new(MemoryStorage::new()), generator.clone())
        .unwrap()
        .with_retry(fast_retry())
        .with_limiter(Arc::new(limiter));
    let executor = ImageExecutor::new();

    executor
        .execute("one", &image_action("first scene"), &ctx)
        .await
        .unwrap();
    executor
        .execute("two", &image_action("second scene"), &ctx)
        .await
        .unwrap();

    assert_eq!(generator.images.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn speech_executor_reports_duration_and_per_character_cost() {
    let generator = Arc::new(CountingGenerator::new());
    let ctx = ExecutionContext::new(Arc::new(MemoryStorage::new()), generator)
        .unwrap()
        .with_retry(fast_retry());
    let executor = SpeechExecutor::new();

    // 20 words, 100 characters
    let text = "alpha beta gamma delta epsilon zeta eta theta iota kappa \
                lambda mu nu xi omicron pi rho sigma tau upsilon";
    let action: Action = serde_json::from_value(serde_json::json!({
        "type": "asset_subtitle",
        "id": "line",
        "text": text,
        "voice_gender": "female",
        "voice_tone": "calm",
        "voice_pace": "slow",
        "model": "openai-tts"
    }))
    .unwrap();

    let result = executor.execute("line", &action, &ctx).await.unwrap();

    // 20 words at 120 wpm
    assert!((result.duration_seconds.unwrap() - 10.0).abs() < 1e-9);
    let expected_cost = text.chars().count() as f64 * 0.000_015;
    assert!((result.cost - expected_cost).abs() < 1e-12);
    assert_eq!(result.metadata["voice"], serde_json::json!("shimmer"));
}

#[tokio::test]
async fn cutscene_reports_all_missing_assets_at_once() {
    let generator = Arc::new(CountingGenerator::new());
    let storage = Arc::new(MemoryStorage::new());
    let ctx = ExecutionContext::new(storage, generator)
        .unwrap()
        .with_retry(fast_retry());
    let executor = CutsceneExecutor::new();

    let action: Action = serde_json::from_value(serde_json::json!({
        "type": "asset_cutscene",
        "id": "cs",
        "shots": [
            {"image_id": "bg", "subtitle_id": "n", "duration": 5.0, "animation": "none"},
            {"image_id": "bg2", "subtitle_id": "n", "duration": 3.0, "animation": "fade"}
        ]
    }))
    .unwrap();

    let err = executor.execute("cs", &action, &ctx).await.unwrap_err();
    let ExecutorErrorKind::MissingAssets(listed) = &err.kind else {
        panic!("expected MissingAssets, got {:?}", err.kind);
    };
    assert!(listed.contains("bg"));
    assert!(listed.contains("bg2"));
    assert!(listed.contains("n"));
}

#[tokio::test]
async fn cutscene_assembles_definition_with_pacing_warnings() {
    let generator = Arc::new(CountingGenerator::new());
    let storage = Arc::new(MemoryStorage::new());

    storage
        .store(
            b"png",
            &AssetMetadata {
                asset_id: "bg".to_string(),
                media_type: MediaType::Image,
                mime_type: "image/png".to_string(),
                duration_seconds: None,
            },
        )
        .await
        .unwrap();
    storage
        .store(
            b"mp3",
            &AssetMetadata {
                asset_id: "n".to_string(),
                media_type: MediaType::Audio,
                mime_type: "audio/mpeg".to_string(),
                duration_seconds: Some(6.0),
            },
        )
        .await
        .unwrap();

    let ctx = ExecutionContext::new(storage, generator)
        .unwrap()
        .with_retry(fast_retry());
    let executor = CutsceneExecutor::new();

    let action: Action = serde_json::from_value(serde_json::json!({
        "type": "asset_cutscene",
        "id": "cs",
        "shots": [
            {"image_id": "bg", "subtitle_id": "n", "duration": 4.0, "animation": "zoom_in"}
        ]
    }))
    .unwrap();

    let result = executor.execute("cs", &action, &ctx).await.unwrap();

    assert_eq!(result.cost, 0.0);
    assert_eq!(result.duration_seconds, Some(4.0));

    let definition = &result.metadata["definition"];
    assert_eq!(definition["total_duration"], serde_json::json!(4.0));
    assert_eq!(definition["shots"][0]["image_id"], serde_json::json!("bg"));

    // 6s of audio over a 4s shot
    let warnings = result.metadata["warnings"].as_array().unwrap();
    assert_eq!(warnings.len(), 1);
    assert!(warnings[0].as_str().unwrap().contains("audio"));
}
