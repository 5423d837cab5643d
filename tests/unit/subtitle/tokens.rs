use super::*;

#[test]
fn three_words_over_three_seconds() {
    let tokens = subtitle_tokens("once upon  a", 3.0);
    assert_eq!(tokens.len(), 3);
    let words: Vec<&str> = tokens.iter().map(|t| t.word.as_str()).collect();
    assert_eq!(words, vec!["once", "upon", "a"]);
    for (i, t) in tokens.iter().enumerate() {
        assert_eq!(t.duration, 1.0);
        assert_eq!(t.start_time, i as f64);
    }
}

#[test]
fn durations_sum_to_scene_length() {
    let text = "the quick brown fox jumps over the lazy dog";
    let tokens = subtitle_tokens(text, 7.3);
    assert_eq!(tokens.len(), text.split_whitespace().count());
    let total: f64 = tokens.iter().map(|t| t.duration).sum();
    assert!((total - 7.3).abs() < 1e-9);
    assert!((tokens.last().unwrap().end_time() - 7.3).abs() < 1e-9);
}

#[test]
fn empty_text_yields_no_tokens() {
    assert!(subtitle_tokens("", 2.0).is_empty());
    assert!(subtitle_tokens(" \n\t ", 2.0).is_empty());
}

#[test]
fn windows_are_half_open() {
    let tokens = subtitle_tokens("a b", 2.0);
    assert!(tokens[0].contains(0.0));
    assert!(!tokens[0].contains(1.0));
    assert!(tokens[1].contains(1.0));
}
