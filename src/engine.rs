//! # Affix-Stripping Engine
//!
//! The recursive core of segmentation: given one whitespace-free chunk, the
//! three matchers and the exception table, produce the ordered sub-token
//! list. The engine is a pure function of its inputs, which is what makes
//! the segmentation cache's last-write-wins policy safe under concurrency.
//!
//! The algorithm, in order:
//!
//! 1. An exact exception-table match wins immediately.
//! 2. The prefix loop strips matched prefixes while they leave a non-empty
//!    remainder. The full prefix loop completes before suffix stripping
//!    starts.
//! 3. The suffix loop does the same from the end; suffix tokens are
//!    collected end-to-start and reversed for output.
//! 4. The exception table is consulted again for the stripped remainder.
//! 5. Otherwise the infix matcher splits the remainder: content between
//!    boundary spans and each span itself become tokens, left to right.
//!
//! Invariant: the surface forms of the returned sub-tokens concatenate back
//! to the input chunk exactly.
//!
//! A matcher that reports a zero-length match, or a match covering the whole
//! remainder, stops its loop rather than spinning. Reports that point out of
//! range or off a character boundary, and loops that exceed the iteration
//! budget, are fatal [`TokenizerError::MatcherProtocol`] errors: they signal
//! a misconfigured rule set and are never retried.

use tracing::trace;

use crate::error::{TokenizerError, TokenizerResult};
use crate::exceptions::ExceptionTable;
use crate::matcher::{InfixMatcher, PrefixMatcher, SuffixMatcher};
use crate::token::SubToken;

/// Segments one non-empty, whitespace-free chunk.
///
/// Exposed so custom matcher implementations can be exercised directly,
/// without assembling a full [`crate::Tokenizer`].
///
/// `iteration_slack` grants matcher invocations beyond one per byte of the
/// chunk. Each affix loop spends one invocation on the probe that
/// terminates it, so callers must grant at least two for well-behaved
/// matchers to stay within budget; [`crate::Tokenizer`] floors its
/// configured slack accordingly.
pub fn segment(
    chunk: &str,
    prefix_matcher: &dyn PrefixMatcher,
    suffix_matcher: &dyn SuffixMatcher,
    infix_matcher: &dyn InfixMatcher,
    exceptions: &ExceptionTable,
    iteration_slack: usize,
) -> TokenizerResult<Vec<SubToken>> {
    debug_assert!(!chunk.is_empty());
    debug_assert!(!chunk.contains(char::is_whitespace));

    // Exceptions take precedence over affix rules at every level.
    if let Some(subtokens) = exceptions.lookup(chunk) {
        trace!(chunk, "exception hit before stripping");
        return Ok(subtokens);
    }

    // Each successful strip consumes at least one byte, so a well-behaved
    // matcher set needs at most len(chunk) iterations; the slack covers the
    // terminating probe of each loop.
    let mut budget = chunk.len().saturating_add(iteration_slack);
    let mut spend = |context: &str| -> TokenizerResult<()> {
        if budget == 0 {
            return Err(TokenizerError::protocol(format!(
                "affix loop exceeded its iteration budget while {} '{}'",
                context, chunk
            )));
        }
        budget -= 1;
        Ok(())
    };

    let mut prefixes: Vec<SubToken> = Vec::new();
    let mut suffixes_reversed: Vec<SubToken> = Vec::new();
    let mut remainder = chunk;

    // Prefix loop.
    while !remainder.is_empty() {
        spend("prefix-stripping")?;
        match prefix_matcher.find_prefix(remainder) {
            Some(len) if len > remainder.len() => {
                return Err(TokenizerError::protocol(format!(
                    "prefix length {} exceeds remainder '{}'",
                    len, remainder
                )));
            }
            Some(len) if len > 0 && len < remainder.len() => {
                if !remainder.is_char_boundary(len) {
                    return Err(TokenizerError::protocol(format!(
                        "prefix length {} is not a char boundary in '{}'",
                        len, remainder
                    )));
                }
                prefixes.push(SubToken::new(&remainder[..len]));
                remainder = &remainder[len..];
            }
            // No match, a zero-length match, or a match covering the whole
            // remainder all stop the loop.
            _ => break,
        }
    }

    // Suffix loop, from the end of the prefix-reduced remainder.
    while !remainder.is_empty() {
        spend("suffix-stripping")?;
        match suffix_matcher.find_suffix(remainder) {
            Some(len) if len > remainder.len() => {
                return Err(TokenizerError::protocol(format!(
                    "suffix length {} exceeds remainder '{}'",
                    len, remainder
                )));
            }
            Some(len) if len > 0 && len < remainder.len() => {
                let cut = remainder.len() - len;
                if !remainder.is_char_boundary(cut) {
                    return Err(TokenizerError::protocol(format!(
                        "suffix length {} is not a char boundary in '{}'",
                        len, remainder
                    )));
                }
                suffixes_reversed.push(SubToken::new(&remainder[cut..]));
                remainder = &remainder[..cut];
            }
            _ => break,
        }
    }

    let mut result = prefixes;

    // A fully consumed chunk skips the exception re-check and infix split.
    if !remainder.is_empty() {
        if let Some(subtokens) = exceptions.lookup(remainder) {
            trace!(remainder, "exception hit after stripping");
            result.extend(subtokens);
        } else {
            split_infixes(remainder, infix_matcher, &mut result)?;
        }
    }

    result.extend(suffixes_reversed.into_iter().rev());
    Ok(result)
}

/// Splits `remainder` at the infix matcher's boundary spans. Content between
/// spans and each span itself become consecutive tokens. Zero-length spans
/// are ignored; anything unsorted, overlapping, or off-range violates the
/// matcher protocol.
fn split_infixes(
    remainder: &str,
    infix_matcher: &dyn InfixMatcher,
    out: &mut Vec<SubToken>,
) -> TokenizerResult<()> {
    let spans = infix_matcher.find_infixes(remainder);

    let mut cursor = 0;
    for span in spans {
        if span.is_empty() {
            continue;
        }
        if span.start < cursor || span.end > remainder.len() {
            return Err(TokenizerError::protocol(format!(
                "infix span {}..{} is overlapping, unsorted, or out of range in '{}'",
                span.start, span.end, remainder
            )));
        }
        if !remainder.is_char_boundary(span.start) || !remainder.is_char_boundary(span.end) {
            return Err(TokenizerError::protocol(format!(
                "infix span {}..{} is not on char boundaries in '{}'",
                span.start, span.end, remainder
            )));
        }
        if span.start > cursor {
            out.push(SubToken::new(&remainder[cursor..span.start]));
        }
        out.push(SubToken::new(&remainder[span.start..span.end]));
        cursor = span.end;
    }
    if cursor < remainder.len() {
        out.push(SubToken::new(&remainder[cursor..]));
    }
    Ok(())
}
