//! Text rendering for decoded payloads: byte-string literals, column
//! wrapping and hex dumps for the debug log.

use std::fmt::Write;

/// Number of columns a decoded payload is wrapped to.
pub const WRAP_WIDTH: usize = 80;

const BYTES_PER_LINE: usize = 16;
const MAX_DUMP_LINES: usize = 16;

/// Render `bytes` as a byte-string literal, e.g. `b'hello\n'`.
///
/// Single quotes delimit the literal unless the bytes contain a single quote
/// and no double quote. Printable ASCII is kept as is, `\t`, `\n`, `\r` and
/// `\\` get their short escapes and every other byte becomes `\xhh`.
pub fn escape_bytes(bytes: &[u8]) -> String {
    let quote = if bytes.contains(&b'\'') && !bytes.contains(&b'"') {
        b'"'
    } else {
        b'\''
    };

    let mut out = String::with_capacity(bytes.len() + 3);
    out.push('b');
    out.push(quote as char);
    for &byte in bytes {
        match byte {
            b'\\' => out.push_str("\\\\"),
            b'\t' => out.push_str("\\t"),
            b'\n' => out.push_str("\\n"),
            b'\r' => out.push_str("\\r"),
            _ if byte == quote => {
                out.push('\\');
                out.push(byte as char);
            }
            0x20..=0x7e => out.push(byte as char),
            _ => {
                let _ = write!(out, "\\x{:02x}", byte);
            }
        }
    }
    out.push(quote as char);
    out
}

/// Greedy word wrap of `text` into lines of at most `width` characters.
///
/// Whitespace runs and words are the units of filling. Words split after a
/// hyphen joining two alphabetic parts (`well-known` -> `well-`, `known`), and
/// a dash run between words stands alone (`foo--bar` -> `foo`, `--`, `bar`).
/// Whitespace at the edges of a wrapped line is dropped, except at the very
/// start of the text. Words longer than `width` are cut to fill the space left
/// on the current line, after the last hyphen that fits when there is one.
pub fn wrap(text: &str, width: usize) -> Vec<String> {
    let mut chunks = split_chunks(text);
    chunks.reverse();

    let mut lines = Vec::new();
    while !chunks.is_empty() {
        let mut cur_line: Vec<Vec<char>> = Vec::new();
        let mut cur_len = 0;

        if !lines.is_empty() && chunks.last().is_some_and(|chunk| is_blank(chunk)) {
            chunks.pop();
        }

        while let Some(chunk) = chunks.last() {
            if cur_len + chunk.len() > width {
                break;
            }
            cur_len += chunk.len();
            cur_line.extend(chunks.pop());
        }

        if chunks.last().is_some_and(|chunk| chunk.len() > width) {
            break_long_chunk(&mut chunks, &mut cur_line, cur_len, width);
        }

        if cur_line.last().is_some_and(|chunk| is_blank(chunk)) {
            cur_line.pop();
        }

        if !cur_line.is_empty() {
            lines.push(cur_line.iter().flatten().collect());
        }
    }
    lines
}

/// Hex dump of the first 256 bytes of `buffer`, sixteen bytes per line with
/// an offset column and an ASCII gutter.
pub fn hex_dump(buffer: &[u8]) -> String {
    let mut out = String::new();

    for (i, chunk) in buffer
        .chunks(BYTES_PER_LINE)
        .take(MAX_DUMP_LINES)
        .enumerate()
    {
        let _ = write!(out, "{:08X}: ", i * BYTES_PER_LINE);

        for byte in chunk {
            let _ = write!(out, "{:02X} ", byte);
        }

        // Pad the last line so the gutter lines up
        for _ in 0..(BYTES_PER_LINE - chunk.len()) {
            out.push_str("   ");
        }

        out.push('|');
        for &byte in chunk {
            if byte.is_ascii_graphic() || byte == b' ' {
                out.push(byte as char);
            } else {
                out.push('.');
            }
        }
        out.push_str("|\n");
    }
    out
}

fn is_blank(chunk: &[char]) -> bool {
    chunk.iter().all(|c| c.is_whitespace())
}

fn is_letter(c: char) -> bool {
    c.is_alphabetic() || c == '_'
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

fn is_word_punct(c: char) -> bool {
    is_word_char(c) || matches!(c, '!' | '"' | '\'' | '&' | '.' | ',' | '?')
}

/// Split `text` into whitespace runs, words, hyphenated word pieces and
/// dash runs (`--`) joining two words.
/// Every whitespace character is normalised to a plain space.
fn split_chunks(text: &str) -> Vec<Vec<char>> {
    let chars: Vec<char> = text
        .chars()
        .map(|c| if c.is_whitespace() { ' ' } else { c })
        .collect();

    let mut chunks = Vec::new();
    let mut start = 0;
    while start < chars.len() {
        let end = if chars[start] == ' ' {
            chars[start..]
                .iter()
                .position(|&c| c != ' ')
                .map_or(chars.len(), |len| start + len)
        } else if let Some(len) = dash_run(&chars, start) {
            start + len
        } else {
            word_end(&chars, start)
        };
        chunks.push(chars[start..end].to_vec());
        start = end;
    }
    chunks
}

/// End of the word starting at `start`: just past a breaking hyphen, or
/// before whitespace, the end of text or a dash run.
fn word_end(chars: &[char], start: usize) -> usize {
    let mut end = start + 1;
    while end < chars.len() && chars[end] != ' ' {
        if chars[end] == '-' && is_hyphen_break(chars, end) {
            return end + 1;
        }
        if dash_run(chars, end).is_some() {
            return end;
        }
        end += 1;
    }
    end
}

/// Length of the run of two or more hyphens at `at`, when it follows a word or
/// punctuation character and is followed by a word character.
fn dash_run(chars: &[char], at: usize) -> Option<usize> {
    let preceded = at
        .checked_sub(1)
        .is_some_and(|i| is_word_punct(chars[i]));
    if !preceded {
        return None;
    }

    let len = chars[at..].iter().take_while(|&&c| c == '-').count();
    let followed = chars.get(at + len).is_some_and(|&c| is_word_char(c));
    (len >= 2 && followed).then_some(len)
}

/// A hyphen at `at` ends a word piece when it sits after two letters (or after
/// `letter-letter`) and is followed by a letter, an optional hyphen and
/// another letter.
fn is_hyphen_break(chars: &[char], at: usize) -> bool {
    let before = |back: usize| at.checked_sub(back).map(|i| chars[i]);
    let after = |ahead: usize| chars.get(at + ahead).copied();
    let letter = |c: Option<char>| c.is_some_and(is_letter);

    let behind = (letter(before(1)) && letter(before(2)))
        || (letter(before(1)) && before(2) == Some('-') && letter(before(3)));
    let ahead = letter(after(1))
        && (letter(after(2)) || (after(2) == Some('-') && letter(after(3))));

    behind && ahead
}

fn break_long_chunk(
    chunks: &mut Vec<Vec<char>>,
    cur_line: &mut Vec<Vec<char>>,
    cur_len: usize,
    width: usize,
) {
    let space_left = if width < 1 { 1 } else { width - cur_len };
    let Some(chunk) = chunks.last_mut() else {
        return;
    };

    let mut end = space_left;
    if chunk.len() > space_left {
        let hyphen = chunk[..space_left].iter().rposition(|&c| c == '-');
        if let Some(hyphen) = hyphen {
            if hyphen > 0 && chunk[..hyphen].iter().any(|&c| c != '-') {
                end = hyphen + 1;
            }
        }
    }

    let rest = chunk.split_off(end.min(chunk.len()));
    cur_line.push(std::mem::replace(chunk, rest));
}
