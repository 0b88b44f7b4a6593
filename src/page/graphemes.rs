/*!
 * Visual-to-logical reordering of right-to-left text.
 *
 * The dictionary PDF stores Hebrew in visual order, so extracted strings
 * read backwards. Reversing by `char` would detach vowel points from their
 * letters; instead the text is split into clusters (a base character plus
 * the combining marks that follow it) and only the cluster order is reversed.
 */

use once_cell::sync::Lazy;
use regex::Regex;
use unicode_normalization::char::canonical_combining_class;

static WHITESPACE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s{2,}").expect("valid regex"));

/// A combining mark is any character with a non-zero canonical combining class.
pub fn is_combining_mark(c: char) -> bool {
    canonical_combining_class(c) != 0
}

/// Split `raw` into base-plus-marks clusters, in input order.
///
/// Whitespace clusters sitting directly in front of a combining mark are
/// extraction noise: they are dropped and the mark joins the previous base.
pub fn clusters(raw: &str) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();

    for c in raw.chars() {
        if !is_combining_mark(c) {
            out.push(c.to_string());
            continue;
        }

        while out
            .last()
            .is_some_and(|cluster| cluster.chars().all(char::is_whitespace))
        {
            out.pop();
        }

        match out.last_mut() {
            Some(cluster) => cluster.push(c),
            // A mark with nothing before it stands alone
            None => out.push(c.to_string()),
        }
    }

    out
}

/// Turn a visually ordered string into logical order without separating
/// any mark from its base character.
///
/// Runs of two or more whitespace characters collapse to one space and the
/// result is trimmed, so the function is not an involution.
pub fn reassemble(raw: &str) -> String {
    let reversed: String = clusters(raw).into_iter().rev().collect();
    WHITESPACE_RUN.replace_all(&reversed, " ").trim().to_string()
}
