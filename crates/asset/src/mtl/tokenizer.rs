//! Line tokenizer for MTL material files.

use corelib::{ParseError, ParseResult};

use crate::scan::{scan_number, scan_token};

/// One typed token of an MTL line.
#[derive(Clone, Debug, PartialEq)]
pub enum MtlToken {
    NewMaterial,
    Ambient,
    Diffuse,
    Specular,
    Emissive,
    Dissolve,
    AlbedoMap,
    SpecularMap,
    NormalMap,
    Number(f64),
    Text(String),
}

impl MtlToken {
    /// Directives whose single operand is a trailing name rather than a
    /// number list. Only these ever get a `Text` token appended.
    fn takes_name(&self) -> bool {
        matches!(
            self,
            MtlToken::NewMaterial | MtlToken::AlbedoMap | MtlToken::SpecularMap | MtlToken::NormalMap
        )
    }
}

/// Tokenize one raw line. Blank lines, comments (`#`) and the unhandled
/// `N*`/`i*` directives (shininess, illumination model) produce an empty
/// token list.
pub fn tokenize(line: &str) -> ParseResult<Vec<MtlToken>> {
    let input = line.trim();
    if input.is_empty() {
        return Ok(Vec::new());
    }
    if matches!(input.as_bytes()[0], b'N' | b'i' | b'#') {
        return Ok(Vec::new());
    }

    let bytes = input.as_bytes();
    let mut tokens: Vec<MtlToken> = Vec::new();
    let mut i = 0;
    while i < bytes.len() {
        let c = bytes[i].to_ascii_lowercase();
        if c == b' ' {
            i += 1;
            continue;
        }

        if c == b'k' && tokens.is_empty() {
            // Ka/Kd/Ks/Ke, case-insensitive, disambiguated by the second char.
            i += 1;
            match bytes.get(i).map(u8::to_ascii_lowercase) {
                Some(b'a') => {
                    i += 1;
                    tokens.push(MtlToken::Ambient);
                }
                Some(b'd') => {
                    i += 1;
                    tokens.push(MtlToken::Diffuse);
                }
                Some(b's') => {
                    i += 1;
                    tokens.push(MtlToken::Specular);
                }
                Some(b'e') => {
                    i += 1;
                    tokens.push(MtlToken::Emissive);
                }
                _ => {}
            }
            continue;
        }

        if c == b'm' && tokens.is_empty() && input[i..].starts_with("map") {
            let rest = &input[i..];
            let six = rest.get(..6).map(str::to_ascii_lowercase);
            if six.as_deref() == Some("map_kd") {
                i += 6;
                tokens.push(MtlToken::AlbedoMap);
                continue;
            }
            if matches!(six.as_deref(), Some("map_ns") | Some("map_ks")) {
                i += 6;
                tokens.push(MtlToken::SpecularMap);
                continue;
            }
            if rest.get(..8).map(str::to_ascii_lowercase).as_deref() == Some("map_bump") {
                i += 8;
                tokens.push(MtlToken::NormalMap);
                continue;
            }
        }

        if c == b'n' && tokens.is_empty() && input[i..].starts_with("newmtl") {
            i += 6;
            tokens.push(MtlToken::NewMaterial);
            continue;
        }

        if c == b'd' && tokens.is_empty() {
            i += 1;
            tokens.push(MtlToken::Dissolve);
            continue;
        }

        if c == b'-' {
            i += 1;
            let (read, value) = scan_number(&input[i..]).map_err(|_| malformed(line))?;
            i += read;
            tokens.push(MtlToken::Number(-value));
            continue;
        }
        if c.is_ascii_digit() {
            let (read, value) = scan_number(&input[i..]).map_err(|_| malformed(line))?;
            i += read;
            tokens.push(MtlToken::Number(value));
            continue;
        }

        if tokens.first().is_some_and(MtlToken::takes_name) {
            let (read, text) = scan_token(&input[i..]);
            i += read;
            tokens.push(MtlToken::Text(text));
            break;
        }
        i += 1;
    }
    Ok(tokens)
}

fn malformed(line: &str) -> ParseError {
    ParseError::MalformedNumber {
        line: line.to_string(),
    }
}
