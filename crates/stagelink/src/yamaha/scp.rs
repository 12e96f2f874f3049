// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! SCP line codec: tokenizer and typed messages.
//!
//! The tokenizer accepts any run of C whitespace between words and
//! understands double-quoted words. The console documentation sketches a
//! backslash escape inside quotes, but no shipped firmware emits one, so
//! quotes end at the next `"` unconditionally.

use std::fmt;

/// C whitespace, the separator set the consoles use.
const WHITESPACE: [char; 6] = ['\t', '\n', '\x0B', '\x0C', '\r', ' '];

fn is_space(c: char) -> bool {
    WHITESPACE.contains(&c)
}

/// One word of a line, with its quoting preserved.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Bare(String),
    Quoted(String),
}

impl Token {
    fn text(&self) -> &str {
        match self {
            Self::Bare(s) | Self::Quoted(s) => s,
        }
    }

    fn is_quoted(&self) -> bool {
        matches!(self, Self::Quoted(_))
    }
}

fn tokenize(line: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut chars = line.chars().peekable();
    loop {
        while chars.peek().is_some_and(|c| is_space(*c)) {
            chars.next();
        }
        let Some(&first) = chars.peek() else {
            break;
        };
        if first == '"' {
            chars.next();
            let mut word = String::new();
            for c in chars.by_ref() {
                if c == '"' {
                    break;
                }
                word.push(c);
            }
            tokens.push(Token::Quoted(word));
        } else {
            let mut word = String::new();
            while let Some(&c) = chars.peek() {
                if is_space(c) {
                    break;
                }
                word.push(c);
                chars.next();
            }
            tokens.push(Token::Bare(word));
        }
    }
    tokens
}

/// Quote a word for output when it needs it: whitespace or a quote inside.
fn write_word(out: &mut String, word: &str) {
    if word.chars().any(|c| is_space(c) || c == '"') {
        out.push('"');
        out.push_str(word);
        out.push('"');
    } else {
        out.push_str(word);
    }
}

/// An action line that is not a parameter transfer, e.g.
/// `devinfo productname "CL5"`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InfoMessage {
    pub action: String,
    pub address: String,
    pub value: Option<String>,
}

/// An integer parameter transfer or request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IntParam {
    /// `set` carries a value; `get` asks for one.
    pub set: bool,
    pub address: String,
    pub x: i64,
    pub y: i64,
    pub value: i64,
}

/// A string parameter transfer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StringParam {
    pub set: bool,
    pub address: String,
    pub x: i64,
    pub y: i64,
    pub value: String,
}

/// The typed body of an SCP line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScpMessage {
    Info(InfoMessage),
    Int(IntParam),
    Str(StringParam),
}

impl ScpMessage {
    /// Render the outgoing wire form (no `OK`/`NOTIFY` prefix, no newline).
    #[must_use]
    pub fn encode(&self) -> String {
        let mut out = String::new();
        match self {
            Self::Info(info) => {
                write_word(&mut out, &info.action);
                out.push(' ');
                write_word(&mut out, &info.address);
                if let Some(value) = &info.value {
                    out.push(' ');
                    out.push('"');
                    out.push_str(value);
                    out.push('"');
                }
            }
            Self::Int(p) => {
                out.push_str(if p.set { "set" } else { "get" });
                out.push(' ');
                write_word(&mut out, &p.address);
                out.push_str(&format!(" {} {}", p.x, p.y));
                if p.set {
                    out.push_str(&format!(" {}", p.value));
                }
            }
            Self::Str(p) => {
                out.push_str(if p.set { "set" } else { "get" });
                out.push(' ');
                write_word(&mut out, &p.address);
                out.push_str(&format!(" {} {}", p.x, p.y));
                if p.set {
                    out.push(' ');
                    out.push('"');
                    out.push_str(&p.value);
                    out.push('"');
                }
            }
        }
        out
    }
}

/// One incoming line, classified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Incoming {
    /// An empty keepalive line.
    Heartbeat,
    /// `OK ...` - the console's answer to a request.
    Reply(ScpMessage),
    /// `NOTIFY ...` - an unsolicited state change.
    Notify(ScpMessage),
}

/// SCP decode failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScpError {
    /// An `ERROR ...` line from the console.
    Device(String),
    /// A line outside the protocol grammar.
    Malformed(String),
}

impl fmt::Display for ScpError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Device(detail) => write!(f, "console error: {}", detail),
            Self::Malformed(line) => write!(f, "unparseable SCP line: {:?}", line),
        }
    }
}

impl std::error::Error for ScpError {}

fn parse_int(token: &Token, line: &str) -> Result<i64, ScpError> {
    if token.is_quoted() {
        return Err(ScpError::Malformed(line.to_string()));
    }
    token
        .text()
        .parse()
        .map_err(|_| ScpError::Malformed(line.to_string()))
}

fn parse_body(tokens: &[Token], line: &str) -> Result<ScpMessage, ScpError> {
    let action = tokens
        .first()
        .ok_or_else(|| ScpError::Malformed(line.to_string()))?;
    if action.is_quoted() {
        return Err(ScpError::Malformed(line.to_string()));
    }

    match action.text() {
        verb @ ("set" | "get") => {
            if tokens.len() < 4 {
                return Err(ScpError::Malformed(line.to_string()));
            }
            let set = verb == "set";
            let address = tokens[1].text().to_string();
            let x = parse_int(&tokens[2], line)?;
            let y = parse_int(&tokens[3], line)?;
            match tokens.get(4) {
                None => Ok(ScpMessage::Int(IntParam {
                    set,
                    address,
                    x,
                    y,
                    value: 0,
                })),
                // The leading character of the raw token decides the type:
                // a quote means string, anything else is an integer.
                Some(value) if value.is_quoted() => Ok(ScpMessage::Str(StringParam {
                    set,
                    address,
                    x,
                    y,
                    value: value.text().to_string(),
                })),
                Some(value) => Ok(ScpMessage::Int(IntParam {
                    set,
                    address,
                    x,
                    y,
                    value: parse_int(value, line)?,
                })),
            }
        }
        _ => Ok(ScpMessage::Info(InfoMessage {
            action: action.text().to_string(),
            address: tokens.get(1).map(|t| t.text().to_string()).unwrap_or_default(),
            value: tokens.get(2).map(|t| t.text().to_string()),
        })),
    }
}

/// Classify one incoming line.
pub fn decode_line(line: &str) -> Result<Incoming, ScpError> {
    let tokens = tokenize(line);
    let Some(prefix) = tokens.first() else {
        return Ok(Incoming::Heartbeat);
    };
    match prefix.text() {
        "OK" => Ok(Incoming::Reply(parse_body(&tokens[1..], line)?)),
        "NOTIFY" => Ok(Incoming::Notify(parse_body(&tokens[1..], line)?)),
        "ERROR" => {
            let detail: Vec<&str> = tokens[1..].iter().map(Token::text).collect();
            Err(ScpError::Device(detail.join(" ")))
        }
        _ => Err(ScpError::Malformed(line.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FADER: &str = "MIXER:Current/InCh/Fader/Level";

    #[test]
    fn test_notify_int_param() {
        let incoming = decode_line("NOTIFY set MIXER:Current/InCh/Fader/Level 0 0 -32768").unwrap();
        match incoming {
            Incoming::Notify(ScpMessage::Int(p)) => {
                assert!(p.set);
                assert_eq!(p.address, FADER);
                assert_eq!((p.x, p.y), (0, 0));
                assert_eq!(p.value, -32768);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_reply_string_param() {
        let incoming =
            decode_line("OK set MIXER:Current/InCh/Label/Name 2 0 \"Lead Vox\"").unwrap();
        match incoming {
            Incoming::Reply(ScpMessage::Str(p)) => {
                assert!(p.set);
                assert_eq!((p.x, p.y), (2, 0));
                assert_eq!(p.value, "Lead Vox");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_get_reply_carries_value() {
        let incoming = decode_line("OK get MIXER:Current/InCh/Fader/Level 0 0 -3200").unwrap();
        match incoming {
            Incoming::Reply(ScpMessage::Int(p)) => {
                assert!(!p.set);
                assert_eq!(p.value, -3200);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_heartbeat_is_blank_line() {
        assert_eq!(decode_line("").unwrap(), Incoming::Heartbeat);
        assert_eq!(decode_line("  \t ").unwrap(), Incoming::Heartbeat);
    }

    #[test]
    fn test_error_line_is_typed_error() {
        let err = decode_line("ERROR set InvalidAddress").unwrap_err();
        assert_eq!(err, ScpError::Device("set InvalidAddress".to_string()));
    }

    #[test]
    fn test_info_message() {
        let incoming = decode_line("OK devinfo productname \"CL5\"").unwrap();
        match incoming {
            Incoming::Reply(ScpMessage::Info(info)) => {
                assert_eq!(info.action, "devinfo");
                assert_eq!(info.address, "productname");
                assert_eq!(info.value.as_deref(), Some("CL5"));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_quoted_address() {
        let incoming = decode_line("NOTIFY set \"MIXER:Current/InCh/Fader/Level\" 1 0 5").unwrap();
        match incoming {
            Incoming::Notify(ScpMessage::Int(p)) => assert_eq!(p.address, FADER),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_whitespace_tolerance() {
        let incoming = decode_line("OK\tset  MIXER:X \t 0   0\t7").unwrap();
        match incoming {
            Incoming::Reply(ScpMessage::Int(p)) => {
                assert_eq!(p.address, "MIXER:X");
                assert_eq!(p.value, 7);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_malformed_lines() {
        assert!(matches!(
            decode_line("WAT set x 0 0 1"),
            Err(ScpError::Malformed(_))
        ));
        assert!(matches!(
            decode_line("OK set addr 0"),
            Err(ScpError::Malformed(_))
        ));
        assert!(matches!(
            decode_line("OK set addr zero 0 1"),
            Err(ScpError::Malformed(_))
        ));
    }

    #[test]
    fn test_encode_set_and_get() {
        let set = ScpMessage::Int(IntParam {
            set: true,
            address: FADER.to_string(),
            x: 0,
            y: 0,
            value: -32768,
        });
        assert_eq!(
            set.encode(),
            "set MIXER:Current/InCh/Fader/Level 0 0 -32768"
        );

        let get = ScpMessage::Int(IntParam {
            set: false,
            address: FADER.to_string(),
            x: 3,
            y: 0,
            value: 0,
        });
        assert_eq!(get.encode(), "get MIXER:Current/InCh/Fader/Level 3 0");
    }

    #[test]
    fn test_encode_quotes_when_needed() {
        let set = ScpMessage::Str(StringParam {
            set: true,
            address: "MIXER:Current/InCh/Label/Name".to_string(),
            x: 2,
            y: 0,
            value: "Lead Vox".to_string(),
        });
        assert_eq!(
            set.encode(),
            "set MIXER:Current/InCh/Label/Name 2 0 \"Lead Vox\""
        );

        let info = ScpMessage::Info(InfoMessage {
            action: "devinfo".to_string(),
            address: "product name".to_string(),
            value: None,
        });
        assert_eq!(info.encode(), "devinfo \"product name\"");
    }

    #[test]
    fn test_no_escape_processing_inside_quotes() {
        // A backslash is data; the quote after it still closes the word.
        let incoming = decode_line("OK set addr 0 0 \"a\\\"").unwrap();
        match incoming {
            Incoming::Reply(ScpMessage::Str(p)) => assert_eq!(p.value, "a\\"),
            other => panic!("unexpected {other:?}"),
        }
    }
}
