//! Template compilation: one left-to-right scan turning a `{}`/`{N}`
//! pattern into alternating literal segments and argument slots.
//!
//! Numbering is either automatic (`{}` assigns 0, 1, 2, ... in order of
//! appearance) or manual (`{N}`), fixed by the first placeholder; mixing the
//! two fails. `{{` and `}}` escape literal braces. Arguments classified as
//! constants never become slots — their bytes are folded into the adjacent
//! literal segment at compile time.

use corvus_result::{Error, Result};

use crate::format::MAX_FORMAT_ARGUMENTS;

/// Compiled form of a format template.
///
/// Output for one row is `segments[0]`, the row's bytes for `slots[0]`,
/// `segments[1]`, and so on; `segments` always holds exactly one more entry
/// than `slots`. Slots index the substitution-argument list and never refer
/// to a constant argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledTemplate {
    segments: Vec<Vec<u8>>,
    slots: Vec<usize>,
}

impl CompiledTemplate {
    /// Literal byte segments, escapes resolved and constants folded in.
    pub fn segments(&self) -> &[Vec<u8>] {
        &self.segments
    }

    /// Substitution-argument index for each runtime slot, in output order.
    pub fn slots(&self) -> &[usize] {
        &self.slots
    }

    /// Total literal bytes contributed to each output row.
    pub fn literal_len(&self) -> usize {
        self.segments.iter().map(Vec::len).sum()
    }
}

/// Numbering discipline, fixed for the whole template once the first
/// placeholder is seen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NumberingMode {
    Unset,
    Automatic,
    Manual,
}

/// Scanner position. `open` is the byte offset of the `{` for error
/// reporting; `value`/`has_digits` accumulate a manual index.
#[derive(Debug, Clone, Copy)]
enum ParseState {
    Literal,
    Placeholder {
        open: usize,
        value: usize,
        has_digits: bool,
    },
}

/// Flush the literal accumulator into the segment list. After a
/// constant-resolved placeholder the text glues onto the previous segment
/// instead of opening a new one.
fn flush_literal(segments: &mut Vec<Vec<u8>>, literal: &mut Vec<u8>, glue: bool) {
    let text = std::mem::take(literal);
    match segments.last_mut() {
        Some(last) if glue => last.extend_from_slice(&text),
        _ => segments.push(text),
    }
}

/// Compile `template` against the argument classification.
///
/// `constants` has one entry per substitution argument: `Some(bytes)` for a
/// constant-classified argument, `None` otherwise. Its length is the
/// argument count every placeholder index is bounded by.
pub fn compile(template: &[u8], constants: &[Option<&[u8]>]) -> Result<CompiledTemplate> {
    let argument_count = constants.len();
    let mut segments: Vec<Vec<u8>> = Vec::new();
    let mut slots: Vec<usize> = Vec::new();
    let mut literal: Vec<u8> = Vec::new();
    let mut glue = false;
    let mut mode = NumberingMode::Unset;
    let mut next_auto = 0usize;
    let mut state = ParseState::Literal;

    let mut i = 0;
    while i < template.len() {
        let byte = template[i];
        match state {
            ParseState::Literal => match byte {
                b'{' if template.get(i + 1) == Some(&b'{') => {
                    literal.push(b'{');
                    i += 2;
                }
                b'}' if template.get(i + 1) == Some(&b'}') => {
                    literal.push(b'}');
                    i += 2;
                }
                b'{' => {
                    flush_literal(&mut segments, &mut literal, glue);
                    glue = false;
                    state = ParseState::Placeholder {
                        open: i,
                        value: 0,
                        has_digits: false,
                    };
                    i += 1;
                }
                b'}' => {
                    return Err(Error::template(i, "closed curly brace without open one"));
                }
                other => {
                    literal.push(other);
                    i += 1;
                }
            },
            ParseState::Placeholder {
                open,
                value,
                has_digits,
            } => match byte {
                b'{' => {
                    return Err(Error::template(i, "two open curly braces without close one"));
                }
                b'}' => {
                    let index = if has_digits {
                        if mode == NumberingMode::Automatic {
                            return Err(Error::template(
                                i,
                                "cannot switch from automatic field numbering to manual field specification",
                            ));
                        }
                        mode = NumberingMode::Manual;
                        value
                    } else {
                        if mode == NumberingMode::Manual {
                            return Err(Error::template(
                                i,
                                "cannot switch from manual field specification to automatic field numbering",
                            ));
                        }
                        mode = NumberingMode::Automatic;
                        let index = next_auto;
                        next_auto += 1;
                        index
                    };
                    if index >= argument_count {
                        return Err(Error::template(
                            open,
                            format!(
                                "argument {index} is too big for formatting; \
                                 {argument_count} substitution arguments were passed \
                                 (indexing starts from zero)"
                            ),
                        ));
                    }
                    match constants[index] {
                        Some(bytes) => {
                            // Fold the constant into the preceding segment and
                            // glue any following text onto that same segment.
                            let last = segments.last_mut().ok_or_else(|| {
                                Error::Internal(
                                    "literal segment missing before placeholder".into(),
                                )
                            })?;
                            last.extend_from_slice(bytes);
                            glue = true;
                        }
                        None => {
                            slots.push(index);
                            glue = false;
                        }
                    }
                    state = ParseState::Literal;
                    i += 1;
                }
                b'0'..=b'9' => {
                    let accumulated = value * 10 + usize::from(byte - b'0');
                    if accumulated >= MAX_FORMAT_ARGUMENTS {
                        return Err(Error::template(
                            i,
                            format!(
                                "too big number for arguments, must be less than \
                                 {MAX_FORMAT_ARGUMENTS}"
                            ),
                        ));
                    }
                    state = ParseState::Placeholder {
                        open,
                        value: accumulated,
                        has_digits: true,
                    };
                    i += 1;
                }
                _ => {
                    return Err(Error::template(i, "not a number in curly braces"));
                }
            },
        }
    }

    if let ParseState::Placeholder { open, .. } = state {
        return Err(Error::template(open, "last open curly brace is not closed"));
    }
    flush_literal(&mut segments, &mut literal, glue);

    debug_assert_eq!(segments.len(), slots.len() + 1);
    Ok(CompiledTemplate { segments, slots })
}

#[cfg(test)]
mod tests {
    use super::*;

    const NO_CONST: Option<&[u8]> = None;

    fn segments_as_strings(compiled: &CompiledTemplate) -> Vec<String> {
        compiled
            .segments()
            .iter()
            .map(|s| String::from_utf8(s.clone()).unwrap())
            .collect()
    }

    #[test]
    fn automatic_numbering_assigns_in_order_of_appearance() {
        let compiled = compile(b"{} {} {}", &[NO_CONST; 3]).unwrap();
        assert_eq!(compiled.slots(), &[0, 1, 2]);
        assert_eq!(segments_as_strings(&compiled), ["", " ", " ", ""]);
    }

    #[test]
    fn manual_numbering_allows_repeats_in_any_order() {
        let compiled = compile(b"{2}{0}{2}", &[NO_CONST; 3]).unwrap();
        assert_eq!(compiled.slots(), &[2, 0, 2]);
        assert_eq!(compiled.segments().len(), 4);
    }

    #[test]
    fn plain_text_compiles_to_a_single_segment() {
        let compiled = compile(b"no placeholders", &[]).unwrap();
        assert_eq!(compiled.slots(), &[] as &[usize]);
        assert_eq!(segments_as_strings(&compiled), ["no placeholders"]);
    }

    #[test]
    fn empty_template_keeps_the_segment_invariant() {
        let compiled = compile(b"", &[]).unwrap();
        assert_eq!(compiled.segments().len(), 1);
        assert!(compiled.slots().is_empty());
    }

    #[test]
    fn escapes_resolve_to_literal_braces() {
        let compiled = compile(b"{{literal}}", &[]).unwrap();
        assert_eq!(compiled.slots(), &[] as &[usize]);
        assert_eq!(segments_as_strings(&compiled), ["{literal}"]);
    }

    #[test]
    fn escapes_mix_with_placeholders() {
        let compiled = compile(b"a{{{0}}}b", &[NO_CONST]).unwrap();
        assert_eq!(compiled.slots(), &[0]);
        assert_eq!(segments_as_strings(&compiled), ["a{", "}b"]);
    }

    #[test]
    fn constants_fold_into_literals_without_slots() {
        let value: &[u8] = b"X";
        let compiled = compile(b"{0} and {0}", &[Some(value)]).unwrap();
        assert_eq!(compiled.slots(), &[] as &[usize]);
        assert_eq!(segments_as_strings(&compiled), ["X and X"]);
    }

    #[test]
    fn constant_between_slots_glues_surrounding_text() {
        let value: &[u8] = b"X";
        let compiled = compile(b"{0}-{1}-{0}", &[NO_CONST, Some(value)]).unwrap();
        assert_eq!(compiled.slots(), &[0, 0]);
        assert_eq!(segments_as_strings(&compiled), ["", "-X-", ""]);
    }

    #[test]
    fn mixing_automatic_and_manual_fails() {
        let err = compile(b"{}{1}", &[NO_CONST; 2]).unwrap_err();
        assert!(matches!(err, Error::Template { .. }));
        assert!(err.to_string().contains("automatic"));

        let err = compile(b"{1}{}", &[NO_CONST; 2]).unwrap_err();
        assert!(err.to_string().contains("manual"));
    }

    #[test]
    fn index_must_stay_below_argument_count() {
        let err = compile(b"{1}", &[NO_CONST]).unwrap_err();
        assert!(err.to_string().contains("too big for formatting"));

        // Automatic numbering runs off the end the same way.
        let err = compile(b"{}{}", &[NO_CONST]).unwrap_err();
        assert!(err.to_string().contains("too big for formatting"));
    }

    #[test]
    fn digit_accumulation_stops_at_the_argument_ceiling() {
        let err = compile(b"{1024}", &[NO_CONST]).unwrap_err();
        assert!(err.to_string().contains("too big number"));

        let err = compile(b"{99999}", &[NO_CONST]).unwrap_err();
        assert!(err.to_string().contains("too big number"));

        // 1023 passes the ceiling but still fails the bound check.
        let err = compile(b"{1023}", &[NO_CONST]).unwrap_err();
        assert!(err.to_string().contains("too big for formatting"));
    }

    #[test]
    fn unbalanced_braces_are_rejected_with_positions() {
        let err = compile(b"ab}", &[]).unwrap_err();
        assert!(matches!(err, Error::Template { position: 2, .. }));
        assert!(err.to_string().contains("without open one"));

        let err = compile(b"a{0", &[NO_CONST]).unwrap_err();
        assert!(matches!(err, Error::Template { position: 1, .. }));
        assert!(err.to_string().contains("is not closed"));

        let err = compile(b"{0{1}", &[NO_CONST; 2]).unwrap_err();
        assert!(matches!(err, Error::Template { position: 2, .. }));
        assert!(err.to_string().contains("two open curly braces"));
    }

    #[test]
    fn placeholder_content_must_be_digits() {
        let err = compile(b"{x}", &[NO_CONST]).unwrap_err();
        assert!(matches!(err, Error::Template { position: 1, .. }));
        assert!(err.to_string().contains("not a number"));

        let err = compile(b"{1x}", &[NO_CONST]).unwrap_err();
        assert!(err.to_string().contains("not a number"));
    }

    #[test]
    fn escaped_close_after_placeholder_is_literal_text() {
        // Escapes bind in literal context only: the slot closes at the first
        // `}` and the following `}}` is an escaped brace.
        let compiled = compile(b"{}}}", &[NO_CONST]).unwrap();
        assert_eq!(compiled.slots(), &[0]);
        assert_eq!(segments_as_strings(&compiled), ["", "}"]);
    }
}
