//! Narration Pipeline
//!
//! Orchestrates one request end to end: normalize once, segment, synthesize
//! and recognize sections concurrently under the worker pool bound, align
//! each section as its adapters finish, then stitch in section order and
//! write the narration audio plus transcript.
//!
//! Cancellation: a section that exhausts its synthesis fallback chain aborts
//! the whole request, including in-flight sibling work. Recognition failures
//! never cancel anything; they degrade that section to estimated timing.

mod request;

pub use request::RequestContext;

use std::path::PathBuf;
use std::sync::Arc;

use serde::Serialize;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{info, warn};

use crate::core::alignment::align_section;
use crate::core::audio::{self, AudioSegment};
use crate::core::captions::{write_transcript, CaptionEmitter};
use crate::core::config::TimingConfig;
use crate::core::recognition::SpeechRecognizer;
use crate::core::synthesis::{SynthesisRequest, Synthesizer};
use crate::core::text::{normalize_text, segment, tokenize_section, word_count, Section};
use crate::core::timeline::{stitch, GlobalTimeline, SectionTimeline};
use crate::core::{PipelineError, PipelineResult, RequestId, SectionIndex, TimeSec};

/// Minimum words a request must contain after normalization
const MIN_INPUT_WORDS: usize = 10;

// =============================================================================
// Request / Output
// =============================================================================

/// Caller-facing parameters for one narration request
#[derive(Debug, Clone)]
pub struct NarrationRequest {
    /// Voice identifier passed to the synthesis providers
    pub voice: String,
    /// Speaking speed (0.5 - 2.0)
    pub speed: f32,
    /// Directory receiving the narration audio and transcript
    pub output_dir: PathBuf,
}

impl NarrationRequest {
    /// Creates a request with the default voice at normal speed
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            voice: "default".to_string(),
            speed: 1.0,
            output_dir: output_dir.into(),
        }
    }

    /// Sets the voice
    pub fn with_voice(mut self, voice: impl Into<String>) -> Self {
        self.voice = voice.into();
        self
    }

    /// Sets the speaking speed
    pub fn with_speed(mut self, speed: f32) -> Self {
        self.speed = speed.clamp(0.5, 2.0);
        self
    }
}

/// Result of a completed narration request
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NarrationOutput {
    /// Request identifier
    pub request_id: RequestId,
    /// Word-accurate global caption timeline
    pub timeline: GlobalTimeline,
    /// Concatenated narration audio
    pub audio_path: PathBuf,
    /// Plain-text transcript companion file
    pub transcript_path: PathBuf,
    /// Total narration duration in seconds
    pub total_duration_sec: TimeSec,
    /// Number of sections the text was split into
    pub section_count: usize,
    /// Sections that fell back to estimated timing (degraded quality)
    pub estimated_sections: Vec<SectionIndex>,
    /// Completion timestamp (RFC 3339)
    pub completed_at: String,
}

impl NarrationOutput {
    /// True when every section aligned against real recognition data
    pub fn is_fully_aligned(&self) -> bool {
        self.estimated_sections.is_empty()
    }
}

// =============================================================================
// Pipeline
// =============================================================================

/// One section's completed synthesis + recognition + alignment
struct SectionOutcome {
    timeline: SectionTimeline,
    segment: AudioSegment,
}

/// The speech-caption synchronization pipeline
pub struct NarrationPipeline {
    config: TimingConfig,
    synthesizer: Arc<Synthesizer>,
    recognizer: Arc<dyn SpeechRecognizer>,
}

impl NarrationPipeline {
    /// Creates a pipeline from a validated config and its adapters
    pub fn new(
        config: TimingConfig,
        synthesizer: Synthesizer,
        recognizer: Arc<dyn SpeechRecognizer>,
    ) -> PipelineResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            synthesizer: Arc::new(synthesizer),
            recognizer,
        })
    }

    /// Runs one narration request to completion.
    ///
    /// `source_text` is raw user text; it is normalized exactly once here and
    /// that normalized form feeds segmentation, synthesis, and alignment.
    pub async fn run(
        &self,
        source_text: &str,
        request: &NarrationRequest,
    ) -> PipelineResult<NarrationOutput> {
        let normalized = normalize_text(source_text);

        let words = word_count(&normalized);
        if words < MIN_INPUT_WORDS {
            return Err(PipelineError::InvalidInput(format!(
                "Input contains only {} words after normalization; a minimum of {} is required",
                words, MIN_INPUT_WORDS
            )));
        }

        let sections = segment(&normalized, self.config.max_section_chars)?;
        let section_count = sections.len();
        let ctx = RequestContext::create()?;
        info!(
            request = ctx.id(),
            sections = section_count,
            "Starting narration request"
        );

        let outcomes = self.process_sections(&ctx, sections, request).await?;

        let mut timelines = Vec::with_capacity(outcomes.len());
        let mut segments = Vec::with_capacity(outcomes.len());
        let mut estimated_sections = Vec::new();
        for outcome in outcomes {
            if outcome.timeline.alignment.is_estimated() {
                estimated_sections.push(outcome.timeline.alignment.section_index);
            }
            timelines.push(outcome.timeline);
            segments.push(outcome.segment);
        }
        segments.sort_by_key(|s| s.section_index);
        estimated_sections.sort_unstable();

        if !estimated_sections.is_empty() {
            warn!(
                request = ctx.id(),
                sections = ?estimated_sections,
                "Sections completed with estimated timing only"
            );
        }

        let timeline = stitch(timelines, self.config.global_offset_seconds)?;

        std::fs::create_dir_all(&request.output_dir)?;
        let audio_path = request.output_dir.join("narration.wav");
        let total_duration_sec = audio::concat_sections(&segments, &audio_path)?;

        let transcript_path = request.output_dir.join("transcript.txt");
        let transcript = CaptionEmitter::new(&timeline).transcript();
        write_transcript(&transcript_path, &transcript)?;

        info!(
            request = ctx.id(),
            duration_sec = total_duration_sec,
            words = timeline.len(),
            "Narration request completed"
        );

        Ok(NarrationOutput {
            request_id: ctx.id().to_string(),
            timeline,
            audio_path,
            transcript_path,
            total_duration_sec,
            section_count,
            estimated_sections,
            completed_at: chrono::Utc::now().to_rfc3339(),
        })
    }

    /// Fans section work out across the worker pool and collects every
    /// outcome, aborting siblings on the first fatal failure.
    async fn process_sections(
        &self,
        ctx: &RequestContext,
        sections: Vec<Section>,
        request: &NarrationRequest,
    ) -> PipelineResult<Vec<SectionOutcome>> {
        let semaphore = Arc::new(Semaphore::new(self.config.worker_pool_size));
        let mut join_set: JoinSet<PipelineResult<SectionOutcome>> = JoinSet::new();

        for section in sections {
            let semaphore = semaphore.clone();
            let synthesizer = self.synthesizer.clone();
            let recognizer = self.recognizer.clone();
            let work_dir = ctx.dir().to_path_buf();
            let voice = request.voice.clone();
            let speed = request.speed;
            let adapter_timeout = self.config.provider_timeout();

            join_set.spawn(async move {
                let _permit = semaphore
                    .acquire_owned()
                    .await
                    .map_err(|e| PipelineError::Internal(e.to_string()))?;

                let tokens = tokenize_section(&section.text);
                let synth_request = SynthesisRequest::new(section.text.clone())
                    .with_voice(voice)
                    .with_speed(speed);

                let synthesized = synthesizer
                    .synthesize_section(section.index, &synth_request)
                    .await?;
                let segment =
                    audio::write_section_wav(&work_dir, section.index, &synthesized.wav_bytes)?;

                // Recognition is best-effort: any failure or timeout means
                // "no timing data" and the aligner estimates instead.
                let recognized =
                    match tokio::time::timeout(adapter_timeout, recognizer.transcribe(&segment))
                        .await
                    {
                        Ok(Ok(words)) => words,
                        Ok(Err(e)) => {
                            warn!(
                                section = section.index,
                                error = %e,
                                "Recognition failed; degrading to estimated timing"
                            );
                            Vec::new()
                        }
                        Err(_) => {
                            warn!(
                                section = section.index,
                                "Recognition timed out; degrading to estimated timing"
                            );
                            Vec::new()
                        }
                    };

                let alignment =
                    align_section(section.index, &tokens, &recognized, segment.duration_sec);

                Ok(SectionOutcome {
                    timeline: SectionTimeline {
                        alignment,
                        audio_duration_sec: segment.duration_sec,
                    },
                    segment,
                })
            });
        }

        let mut outcomes = Vec::new();
        while let Some(joined) = join_set.join_next().await {
            match joined {
                Ok(Ok(outcome)) => outcomes.push(outcome),
                Ok(Err(e)) => {
                    // Missing narration is not an acceptable partial result;
                    // abort everything still in flight.
                    warn!(error = %e, "Section failed; cancelling request");
                    join_set.abort_all();
                    while join_set.join_next().await.is_some() {}
                    return Err(e);
                }
                Err(join_error) => {
                    join_set.abort_all();
                    while join_set.join_next().await.is_some() {}
                    return Err(PipelineError::Internal(format!(
                        "Section task failed: {}",
                        join_error
                    )));
                }
            }
        }

        Ok(outcomes)
    }
}

// =============================================================================
// Tests
// =============================================================================
