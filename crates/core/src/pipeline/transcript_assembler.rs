use crate::recognition::domain::transcript::RecognitionResult;

/// Join the best alternative of every segment, one line per segment.
///
/// A segment without alternatives still yields its (empty) line so the
/// output keeps one line per segment.
pub fn assemble(result: &RecognitionResult) -> String {
    let mut transcript = String::new();
    for (idx, segment) in result.segments.iter().enumerate() {
        match segment.best() {
            Some(alt) => transcript.push_str(&alt.transcript),
            None => log::warn!("Segment {idx} has no alternatives"),
        }
        transcript.push('\n');
    }
    transcript
}
