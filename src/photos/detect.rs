//! Roster player detection in photo file names and extracted text.

use crate::names::char_similarity;

/// Best similarity (0-100) of the shorter string against every equally long
/// window of the longer one, and against the shorter prefixes and suffixes
/// of the longer one.
pub fn partial_similarity(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let (short, long) = if a.len() <= b.len() { (a, b) } else { (b, a) };

    if short.is_empty() {
        return 0.0;
    }

    let edges = (1..short.len()).flat_map(|len| [&long[..len], &long[long.len() - len..]]);
    long.windows(short.len())
        .chain(edges)
        .map(|window| char_similarity(&short, window))
        .fold(0.0, f64::max)
}

/// Roster players appearing in a photo.
///
/// A player is detected when one of their name tokens longer than two
/// characters occurs in the lowercase file name, or else when their name
/// scores at least `threshold` against the extracted text.
pub fn detect_players(roster: &[String], file_name: &str, text: &str, threshold: u8) -> Vec<String> {
    let file_name = file_name.to_lowercase();
    let text = text.to_lowercase();

    roster
        .iter()
        .filter(|player| {
            let lower = player.to_lowercase();
            let in_file_name = lower
                .split_whitespace()
                .filter(|token| token.chars().count() > 2)
                .any(|token| file_name.contains(token));

            in_file_name
                || (!text.trim().is_empty()
                    && partial_similarity(&lower, &text) >= f64::from(threshold))
        })
        .cloned()
        .collect()
}
