/// One word of narration and the window it is shown in, in scene-local seconds.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SubtitleToken {
    pub word: String,
    pub start_time: f64,
    pub duration: f64,
}

impl SubtitleToken {
    pub fn end_time(&self) -> f64 {
        self.start_time + self.duration
    }

    /// Whether scene-local time `t` falls in `[start, end)`.
    pub fn contains(&self, t: f64) -> bool {
        t >= self.start_time && t < self.end_time()
    }
}

/// Split `text` on whitespace and share `duration` evenly between the words.
///
/// Empty or whitespace-only text yields no tokens.
pub fn subtitle_tokens(text: &str, duration: f64) -> Vec<SubtitleToken> {
    let words: Vec<&str> = text.split_whitespace().collect();
    if words.is_empty() || !(duration > 0.0) {
        return Vec::new();
    }
    let per_word = duration / words.len() as f64;
    words
        .into_iter()
        .enumerate()
        .map(|(i, word)| SubtitleToken {
            word: word.to_owned(),
            start_time: i as f64 * per_word,
            duration: per_word,
        })
        .collect()
}

#[cfg(test)]
#[path = "../../tests/unit/subtitle/tokens.rs"]
mod tests;
