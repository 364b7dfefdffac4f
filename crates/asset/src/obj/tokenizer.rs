//! Line tokenizer for OBJ geometry files.

use corelib::{ParseError, ParseResult};

use crate::scan::{scan_number, scan_token};

/// One typed token of an OBJ line. Directive tokens come first, then the
/// line's operands as numbers, raw face references, or a trailing name.
#[derive(Clone, Debug, PartialEq)]
pub enum ObjToken {
    Vertex,
    TexCoord,
    Normal,
    Face,
    Object,
    MtlLib,
    UseMtl,
    Number(f64),
    /// One face corner as the raw `pos[/uv][/normal]` substring; decoding
    /// the slash-separated indices is the face builder's job.
    FaceRef(String),
    Text(String),
}

/// Tokenize one raw line. Blank lines, comments (`#`) and the unsupported
/// group/smoothing directives (`g`, `s`) produce an empty token list, as do
/// lines whose first token is not recognized at all.
pub fn tokenize(line: &str) -> ParseResult<Vec<ObjToken>> {
    let input = line.trim();
    if input.is_empty() {
        return Ok(Vec::new());
    }
    if matches!(input.as_bytes()[0], b'g' | b'#' | b's') {
        return Ok(Vec::new());
    }

    let bytes = input.as_bytes();
    let mut tokens = Vec::new();
    let mut i = 0;
    while i < bytes.len() {
        let c = bytes[i];
        if c == b' ' {
            i += 1;
            continue;
        }
        // Directives are only recognized as the line's first token.
        if tokens.is_empty() {
            if c == b'u' && input[i..].starts_with("usemtl") {
                i += 6;
                tokens.push(ObjToken::UseMtl);
                continue;
            }
            if c == b'm' && input[i..].starts_with("mtllib") {
                i += 6;
                tokens.push(ObjToken::MtlLib);
                continue;
            }
            if c == b'o' {
                i += 1;
                tokens.push(ObjToken::Object);
                continue;
            }
            if c == b'v' {
                match bytes.get(i + 1) {
                    Some(b't') => {
                        i += 2;
                        tokens.push(ObjToken::TexCoord);
                    }
                    Some(b'n') => {
                        i += 2;
                        tokens.push(ObjToken::Normal);
                    }
                    _ => {
                        i += 1;
                        tokens.push(ObjToken::Vertex);
                    }
                }
                continue;
            }
            if c == b'f' {
                i += 1;
                tokens.push(ObjToken::Face);
                continue;
            }
        }
        if c == b'-' {
            i += 1;
            let (read, value) = scan_number(&input[i..]).map_err(|_| malformed(line))?;
            i += read;
            tokens.push(ObjToken::Number(-value));
            continue;
        }
        if c.is_ascii_digit() {
            // Face operands are captured whole; the slashes inside them
            // would otherwise terminate a plain number scan.
            if matches!(tokens.first(), Some(ObjToken::Face)) {
                let (read, chunk) = scan_token(&input[i..]);
                i += read;
                tokens.push(ObjToken::FaceRef(chunk));
            } else {
                let (read, value) = scan_number(&input[i..]).map_err(|_| malformed(line))?;
                i += read;
                tokens.push(ObjToken::Number(value));
            }
            continue;
        }
        if matches!(
            tokens.first(),
            Some(ObjToken::Object | ObjToken::MtlLib | ObjToken::UseMtl)
        ) {
            let (read, text) = scan_token(&input[i..]);
            i += read;
            tokens.push(ObjToken::Text(text));
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vertex_line() {
        let tokens = tokenize("v 1.0 2.0 3.0").unwrap();
        assert_eq!(
            tokens,
            vec![
                ObjToken::Vertex,
                ObjToken::Number(1.0),
                ObjToken::Number(2.0),
                ObjToken::Number(3.0),
            ]
        );
    }

    #[test]
    fn negative_coordinates() {
        let tokens = tokenize("vn -1 -0.5 0").unwrap();
        assert_eq!(
            tokens,
            vec![
                ObjToken::Normal,
                ObjToken::Number(-1.0),
                ObjToken::Number(-0.5),
                ObjToken::Number(0.0),
            ]
        );
    }

    #[test]
    fn tex_coord_line() {
        let tokens = tokenize("vt 0.5 1").unwrap();
        assert_eq!(
            tokens,
            vec![ObjToken::TexCoord, ObjToken::Number(0.5), ObjToken::Number(1.0)]
        );
    }

    #[test]
    fn face_operands_stay_raw() {
        let tokens = tokenize("f 1/2/3 4//6 7").unwrap();
        assert_eq!(
            tokens,
            vec![
                ObjToken::Face,
                ObjToken::FaceRef("1/2/3".to_string()),
                ObjToken::FaceRef("4//6".to_string()),
                ObjToken::FaceRef("7".to_string()),
            ]
        );
    }

    #[test]
    fn object_takes_one_name() {
        let tokens = tokenize("o Cube").unwrap();
        assert_eq!(
            tokens,
            vec![ObjToken::Object, ObjToken::Text("Cube".to_string())]
        );
    }

    #[test]
    fn material_library_and_use() {
        let tokens = tokenize("mtllib scene.mtl").unwrap();
        assert_eq!(
            tokens,
            vec![ObjToken::MtlLib, ObjToken::Text("scene.mtl".to_string())]
        );
        let tokens = tokenize("usemtl Red").unwrap();
        assert_eq!(
            tokens,
            vec![ObjToken::UseMtl, ObjToken::Text("Red".to_string())]
        );
    }

    #[test]
    fn skipped_lines_are_empty() {
        assert!(tokenize("").unwrap().is_empty());
        assert!(tokenize("# a comment").unwrap().is_empty());
        assert!(tokenize("g group1").unwrap().is_empty());
        assert!(tokenize("s off").unwrap().is_empty());
    }

    #[test]
    fn malformed_number_is_fatal() {
        let err = tokenize("v 1.2.3 0 0").unwrap_err();
        assert_eq!(
            err,
            ParseError::MalformedNumber {
                line: "v 1.2.3 0 0".to_string()
            }
        );
    }
}
