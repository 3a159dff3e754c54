//! Indentation-based data file grammar.
//!
//! Each non-blank line is a node. A line indented deeper than the one
//! before it is that line's child; tabs and spaces both count as one level
//! of indentation each. Tokens are split on whitespace, and a token that
//! starts with `"` or `` ` `` runs to the matching mark, so either quote can
//! wrap text containing the other. `#` at the start of a token begins a
//! comment that runs to the end of the line.

use crate::node::DataFile;
use crate::trace::DiagnosticSink;

const MISSING_QUOTE: &str = "Warning: Closing quotation mark is missing:";
const MIXED_WHITESPACE: &str = "Warning: Mixed whitespace usage in line";

fn is_blank(byte: u8) -> bool {
    byte <= b' '
}

pub(crate) fn parse_into<S>(file: &mut DataFile, text: &str, sink: &mut S)
where
    S: DiagnosticSink + ?Sized,
{
    // (node index, indent) for the current line's ancestors.
    let mut stack: Vec<(usize, usize)> = Vec::new();
    // Character used for indentation, fixed by the first indented line.
    let mut indent_char: Option<u8> = None;

    for (number, line) in text.lines().enumerate() {
        let bytes = line.as_bytes();
        let indent = bytes.iter().take_while(|&&byte| is_blank(byte)).count();
        if indent == bytes.len() || bytes[indent] == b'#' {
            continue;
        }

        let mixed = bytes[..indent]
            .iter()
            .filter(|&&byte| byte == b' ' || byte == b'\t')
            .any(|&byte| *indent_char.get_or_insert(byte) != byte);

        let (tokens, unterminated) = tokenize(&line[indent..]);
        if tokens.is_empty() {
            continue;
        }

        while stack.last().is_some_and(|&(_, depth)| depth >= indent) {
            stack.pop();
        }
        let parent = stack.last().map(|&(index, _)| index);
        let index = file.push_node(parent, tokens, number + 1);
        stack.push((index, indent));

        if mixed {
            file.node(index).write_trace(sink, MIXED_WHITESPACE);
        }
        if unterminated {
            file.node(index).write_trace(sink, MISSING_QUOTE);
        }
    }
    tracing::trace!(nodes = file.node_count(), "parsed data text");
}

/// Splits one line (without its indentation) into tokens. Also reports
/// whether a quoted token ran off the end of the line.
fn tokenize(line: &str) -> (Vec<String>, bool) {
    let bytes = line.as_bytes();
    let mut tokens = Vec::new();
    let mut unterminated = false;
    let mut i = 0;

    loop {
        while i < bytes.len() && is_blank(bytes[i]) {
            i += 1;
        }
        if i == bytes.len() || bytes[i] == b'#' {
            break;
        }

        let start;
        let end;
        if bytes[i] == b'"' || bytes[i] == b'`' {
            let quote = bytes[i];
            start = i + 1;
            match bytes[start..].iter().position(|&byte| byte == quote) {
                Some(offset) => {
                    end = start + offset;
                    i = end + 1;
                }
                None => {
                    unterminated = true;
                    end = bytes.len();
                    i = end;
                }
            }
        } else {
            start = i;
            while i < bytes.len() && !is_blank(bytes[i]) {
                i += 1;
            }
            end = i;
        }
        tokens.push(line[start..end].to_owned());
    }
    (tokens, unterminated)
}
