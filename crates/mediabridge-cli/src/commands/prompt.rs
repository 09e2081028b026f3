//! Line-oriented prompts for interactive commands.

use std::io::{BufRead, Write};

use anyhow::anyhow;

use crate::client::{CliError, CliResult};

/// Read one line; `None` at end of input.
pub(crate) fn read_line<R: BufRead>(input: &mut R) -> CliResult<Option<String>> {
    let mut line = String::new();
    let read = input
        .read_line(&mut line)
        .map_err(|err| CliError::failure(anyhow!("failed to read input: {err}")))?;
    if read == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
}

/// Write `text` without a newline and flush so it shows before input.
pub(crate) fn show_prompt<W: Write>(out: &mut W, text: &str) -> CliResult<()> {
    write!(out, "{text}")
        .and_then(|()| out.flush())
        .map_err(|err| CliError::failure(anyhow!("failed to write prompt: {err}")))
}

/// Ask a yes/no question. Anything but an explicit yes is a no, including
/// end of input.
pub(crate) fn ask_yes_no<R: BufRead, W: Write>(
    input: &mut R,
    out: &mut W,
    question: &str,
) -> CliResult<bool> {
    show_prompt(out, &format!("{question} [y/N] "))?;
    let Some(answer) = read_line(input)? else {
        return Ok(false);
    };
    Ok(matches!(
        answer.trim().to_ascii_lowercase().as_str(),
        "y" | "yes" | "是"
    ))
}

/// Split a line into words, honouring single and double quotes.
pub(crate) fn split_args(line: &str) -> CliResult<Vec<String>> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut in_word = false;
    let mut quote: Option<char> = None;

    for ch in line.chars() {
        match quote {
            Some(open) if ch == open => quote = None,
            Some(_) => current.push(ch),
            None if ch == '"' || ch == '\'' => {
                quote = Some(ch);
                in_word = true;
            }
            None if ch.is_whitespace() => {
                if in_word {
                    words.push(std::mem::take(&mut current));
                    in_word = false;
                }
            }
            None => {
                current.push(ch);
                in_word = true;
            }
        }
    }
    if quote.is_some() {
        return Err(CliError::validation("unterminated quote"));
    }
    if in_word {
        words.push(current);
    }
    Ok(words)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn yes_no_defaults_to_no() {
        let mut out = Vec::new();
        assert!(ask_yes_no(&mut Cursor::new("y\n"), &mut out, "delete?").expect("prompt"));
        assert!(ask_yes_no(&mut Cursor::new("是\n"), &mut out, "delete?").expect("prompt"));
        assert!(!ask_yes_no(&mut Cursor::new("\n"), &mut out, "delete?").expect("prompt"));
        assert!(!ask_yes_no(&mut Cursor::new(""), &mut out, "delete?").expect("prompt"));
        assert!(String::from_utf8(out).expect("utf8").starts_with("delete? [y/N] "));
    }

    #[test]
    fn split_args_honours_quotes() {
        let words = split_args(r#"library add --name "TV Shows" --download '/data/dl 1'"#)
            .expect("balanced quotes");
        assert_eq!(
            words,
            vec!["library", "add", "--name", "TV Shows", "--download", "/data/dl 1"]
        );
        assert_eq!(split_args("keyword add \"\"").expect("empty word"), vec!["keyword", "add", ""]);
        assert!(split_args("format add \"mp4").is_err());
        assert!(split_args("   ").expect("blank").is_empty());
    }

    #[test]
    fn read_line_strips_line_endings() {
        let mut input = Cursor::new("first\r\nsecond");
        assert_eq!(read_line(&mut input).expect("line").as_deref(), Some("first"));
        assert_eq!(read_line(&mut input).expect("line").as_deref(), Some("second"));
        assert_eq!(read_line(&mut input).expect("eof"), None);
    }
}
