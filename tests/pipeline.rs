//! End-to-end pipeline tests using mock adapters.
//!
//! These drive the whole engine: normalization, segmentation, concurrent
//! synthesis/recognition, alignment, stitching, and artifact writing.

use std::sync::Arc;

use tempfile::TempDir;

use narracap::core::alignment::AlignmentStatus;
use narracap::core::config::TimingConfig;
use narracap::core::pipeline::{NarrationPipeline, NarrationRequest};
use narracap::core::recognition::{MockRecognizer, RawWord, SpeechRecognizer};
use narracap::core::synthesis::{
    MockSynthesisProvider, ProviderRegistry, SynthesisProvider, Synthesizer,
};

const LONG_TEXT: &str = "The quick brown fox jumps over the lazy dog while the patient \
    grey owl watches from a branch above the quiet meadow and counts every single \
    leap with great interest and no small amount of amusement at the spectacle";

fn build_pipeline(
    providers: Vec<MockSynthesisProvider>,
    recognizer: Arc<dyn SpeechRecognizer>,
    config: TimingConfig,
) -> NarrationPipeline {
    let mut registry = ProviderRegistry::new();
    let mut order = Vec::new();
    for provider in providers {
        order.push(provider.name().to_string());
        registry.register(Arc::new(provider));
    }
    let config = config.with_fallback_order(order);
    let synthesizer = Synthesizer::from_config(&config, &registry).unwrap();
    NarrationPipeline::new(config, synthesizer, recognizer).unwrap()
}

fn base_config() -> TimingConfig {
    TimingConfig::default()
        .with_provider_timeout(5.0)
        .with_worker_pool_size(3)
}

#[tokio::test]
async fn multi_section_run_without_recognition_estimates_everything() {
    // Force several sections and give the recognizer nothing to say
    let config = base_config().with_max_section_chars(60);
    let pipeline = build_pipeline(
        vec![MockSynthesisProvider::new("mock")],
        Arc::new(MockRecognizer::new()),
        config,
    );

    let out_dir = TempDir::new().unwrap();
    let output = pipeline
        .run(LONG_TEXT, &NarrationRequest::new(out_dir.path()))
        .await
        .unwrap();

    assert!(output.section_count > 1);
    assert!(!output.is_fully_aligned());
    assert_eq!(
        output.estimated_sections.len(),
        output.section_count,
        "every section should be degraded"
    );

    // One aligned word per source token
    let expected_words = LONG_TEXT.split_whitespace().count();
    assert_eq!(output.timeline.len(), expected_words);

    // Monotonic starts across the whole timeline
    let mut previous = 0.0;
    for word in output.timeline.words() {
        assert!(word.start_sec >= previous);
        assert!(word.end_sec >= word.start_sec);
        assert_eq!(word.status, AlignmentStatus::Estimated);
        previous = word.start_sec;
    }

    // Artifacts written
    assert!(output.audio_path.exists());
    assert!(output.transcript_path.exists());
    let transcript = std::fs::read_to_string(&output.transcript_path).unwrap();
    assert_eq!(
        transcript.split_whitespace().count(),
        expected_words,
        "transcript carries every display token"
    );

    // Audio duration matches the timeline accounting
    assert!((output.total_duration_sec - output.timeline.total_duration_sec()).abs() < 1e-3);
}

#[tokio::test]
async fn matched_recognition_drives_caption_timing() {
    let text = "alpha beta gamma delta epsilon zeta eta theta iota kappa";
    let recognizer = MockRecognizer::new().with_section(
        0,
        vec![
            RawWord::new("alpha", 0.00, 0.30),
            RawWord::new("beta", 0.30, 0.55),
            RawWord::new("gamma", 0.55, 0.90),
            RawWord::new("delta", 0.90, 1.20),
            RawWord::new("epsilon", 1.20, 1.60),
            RawWord::new("zeta", 1.60, 1.80),
            RawWord::new("eta", 1.80, 1.95),
            RawWord::new("theta", 1.95, 2.20),
            RawWord::new("iota", 2.20, 2.40),
            RawWord::new("kappa", 2.40, 2.70),
        ],
    );

    let pipeline = build_pipeline(
        vec![MockSynthesisProvider::new("mock")],
        Arc::new(recognizer),
        base_config(),
    );

    let out_dir = TempDir::new().unwrap();
    let output = pipeline
        .run(text, &NarrationRequest::new(out_dir.path()))
        .await
        .unwrap();

    assert_eq!(output.section_count, 1);
    assert!(output.is_fully_aligned());

    let words = output.timeline.words();
    assert_eq!(words.len(), 10);
    assert!(words.iter().all(|w| w.status == AlignmentStatus::Matched));
    assert_eq!(words[0].start_sec, 0.0);
    assert!((words[2].start_sec - 0.55).abs() < 1e-9);
    assert!((words[9].end_sec - 2.70).abs() < 1e-9);
}

#[tokio::test]
async fn global_offset_shifts_and_clamps() {
    let text = "alpha beta gamma delta epsilon zeta eta theta iota kappa";
    let recognizer = MockRecognizer::new().with_section(
        0,
        vec![
            RawWord::new("alpha", 0.05, 0.30),
            RawWord::new("beta", 0.30, 0.55),
            RawWord::new("gamma", 0.55, 0.90),
            RawWord::new("delta", 0.90, 1.20),
            RawWord::new("epsilon", 1.20, 1.60),
            RawWord::new("zeta", 1.60, 1.80),
            RawWord::new("eta", 1.80, 1.95),
            RawWord::new("theta", 1.95, 2.20),
            RawWord::new("iota", 2.20, 2.40),
            RawWord::new("kappa", 2.40, 2.70),
        ],
    );

    let config = base_config().with_global_offset(-0.1);
    let pipeline = build_pipeline(
        vec![MockSynthesisProvider::new("mock")],
        Arc::new(recognizer),
        config,
    );

    let out_dir = TempDir::new().unwrap();
    let output = pipeline
        .run(text, &NarrationRequest::new(out_dir.path()))
        .await
        .unwrap();

    let words = output.timeline.words();
    // First word started at 0.05 and the -0.1 shift clamps it to zero
    assert_eq!(words[0].start_sec, 0.0);
    // Later words shift by exactly the offset
    assert!((words[1].start_sec - 0.20).abs() < 1e-9);
    assert!((words[9].end_sec - 2.60).abs() < 1e-9);
}

#[tokio::test]
async fn recognizer_failure_degrades_but_completes() {
    let pipeline = build_pipeline(
        vec![MockSynthesisProvider::new("mock")],
        Arc::new(MockRecognizer::new().failing()),
        base_config(),
    );

    let out_dir = TempDir::new().unwrap();
    let output = pipeline
        .run(
            "ten little words are quite enough to pass validation here",
            &NarrationRequest::new(out_dir.path()),
        )
        .await
        .expect("recognition failure must not fail the request");

    assert!(!output.is_fully_aligned());
    assert!(output.audio_path.exists());
}

#[tokio::test]
async fn fallback_chain_rescues_failing_primary() {
    let pipeline = build_pipeline(
        vec![
            MockSynthesisProvider::new("primary").failing(),
            MockSynthesisProvider::new("backup"),
        ],
        Arc::new(MockRecognizer::new()),
        base_config(),
    );

    let out_dir = TempDir::new().unwrap();
    let output = pipeline
        .run(LONG_TEXT, &NarrationRequest::new(out_dir.path()))
        .await
        .unwrap();

    assert!(!output.timeline.is_empty());
    assert!(output.audio_path.exists());
}

#[tokio::test]
async fn identical_input_yields_identical_timeline() {
    let config = base_config().with_max_section_chars(60);

    let run = |out_dir: std::path::PathBuf| async {
        let pipeline = build_pipeline(
            vec![MockSynthesisProvider::new("mock")],
            Arc::new(MockRecognizer::new()),
            config.clone(),
        );
        pipeline
            .run(LONG_TEXT, &NarrationRequest::new(out_dir))
            .await
            .unwrap()
    };

    let dir_a = TempDir::new().unwrap();
    let dir_b = TempDir::new().unwrap();
    let a = run(dir_a.path().to_path_buf()).await;
    let b = run(dir_b.path().to_path_buf()).await;

    assert_eq!(a.timeline, b.timeline);
    assert_eq!(a.section_count, b.section_count);
    assert_eq!(a.estimated_sections, b.estimated_sections);
}
