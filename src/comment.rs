//! Splitting of comments that exceed the host's size limit

/// Maximum number of characters allowed in a single comment
///
/// Azure DevOps does not document a limit; this matches the GitHub one.
pub const MAX_COMMENT_LENGTH: usize = 65536;

/// Appended to every chunk except the last
pub const SEP_END: &str = "\n```\n</details>\n<br>\n\n**Warning**: Output length greater than max comment size. Continued in next comment.";

/// Prepended to every chunk except the first
pub const SEP_START: &str =
    "Continued from previous comment.\n<details><summary>Show Output</summary>\n\n```diff\n";

/// Split `comment` into chunks of at most `max_size` characters
///
/// Comments that fit are returned unchanged as a single chunk. Otherwise
/// every chunk but the last ends with `sep_end` and every chunk but the first
/// starts with `sep_start`, so each one renders on its own. Splits happen on
/// character boundaries.
///
/// When the separators leave no room for text within `max_size`, chunks are
/// cut without them. A `max_size` of 0 is treated as 1.
pub fn split_comment(
    comment: &str,
    max_size: usize,
    sep_end: &str,
    sep_start: &str,
) -> Vec<String> {
    let max_size = max_size.max(1);
    if comment.chars().count() <= max_size {
        return vec![comment.to_string()];
    }

    let chars: Vec<char> = comment.chars().collect();
    let separators = sep_end.chars().count() + sep_start.chars().count();
    if separators >= max_size {
        return chars
            .chunks(max_size)
            .map(|c| c.iter().collect::<String>())
            .collect();
    }
    let budget = max_size - separators;

    let pieces: Vec<String> = chars.chunks(budget).map(|c| c.iter().collect()).collect();
    let last = pieces.len().saturating_sub(1);

    pieces
        .into_iter()
        .enumerate()
        .map(|(idx, piece)| {
            let mut chunk = String::with_capacity(piece.len() + separators);
            if idx > 0 {
                chunk.push_str(sep_start);
            }
            chunk.push_str(&piece);
            if idx < last {
                chunk.push_str(sep_end);
            }
            chunk
        })
        .collect()
}
