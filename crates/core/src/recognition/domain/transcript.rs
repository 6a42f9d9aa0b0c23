/// One ranked hypothesis for a segment.
#[derive(Clone, Debug, PartialEq)]
pub struct TranscriptAlternative {
    pub transcript: String,
    pub confidence: Option<f32>,
}

impl TranscriptAlternative {
    pub fn new(transcript: impl Into<String>) -> Self {
        Self {
            transcript: transcript.into(),
            confidence: None,
        }
    }
}

/// A consecutive stretch of audio with its alternatives, best first.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TranscriptSegment {
    pub alternatives: Vec<TranscriptAlternative>,
}

impl TranscriptSegment {
    pub fn new(alternatives: Vec<TranscriptAlternative>) -> Self {
        Self { alternatives }
    }

    pub fn best(&self) -> Option<&TranscriptAlternative> {
        self.alternatives.first()
    }
}

/// Final output of a completed job, segments in audio order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RecognitionResult {
    pub segments: Vec<TranscriptSegment>,
}

impl RecognitionResult {
    pub fn new(segments: Vec<TranscriptSegment>) -> Self {
        Self { segments }
    }
}
