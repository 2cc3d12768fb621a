//! Decoding of Go string literals.

/// Decode a raw (`` `...` ``) or interpreted (`"..."`) string literal.
///
/// Raw literals are taken verbatim minus carriage returns. Interpreted
/// literals have their escapes validated and decoded; `\x` and octal escapes
/// denote single bytes.
pub fn unquote(literal: &str) -> Result<String, String> {
    if let Some(body) = literal.strip_prefix('`').and_then(|s| s.strip_suffix('`')) {
        return Ok(body.replace('\r', ""));
    }

    let body = literal
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .ok_or_else(|| format!("{literal} is not a string literal"))?;

    let mut bytes = Vec::with_capacity(body.len());
    let mut chars = body.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            let mut buf = [0u8; 4];
            bytes.extend_from_slice(c.encode_utf8(&mut buf).as_bytes());
            continue;
        }

        let esc = chars.next().ok_or("escape sequence not terminated")?;
        let simple = match esc {
            'a' => Some(0x07),
            'b' => Some(0x08),
            'f' => Some(0x0c),
            'n' => Some(b'\n'),
            'r' => Some(b'\r'),
            't' => Some(b'\t'),
            'v' => Some(0x0b),
            '\\' => Some(b'\\'),
            '"' => Some(b'"'),
            _ => None,
        };
        if let Some(byte) = simple {
            bytes.push(byte);
            continue;
        }

        let (count, radix, mut digits) = match esc {
            'x' => (2, 16, String::new()),
            'u' => (4, 16, String::new()),
            'U' => (8, 16, String::new()),
            '0'..='7' => (2, 8, esc.to_string()),
            _ => return Err("unknown escape sequence".to_string()),
        };
        for _ in 0..count {
            match chars.next() {
                Some(d) if d.is_digit(radix) => digits.push(d),
                _ => return Err("illegal character in escape sequence".to_string()),
            }
        }
        let value = u32::from_str_radix(&digits, radix).map_err(|err| err.to_string())?;

        match esc {
            'u' | 'U' => {
                let ch = char::from_u32(value).ok_or("escape sequence is invalid Unicode code point")?;
                let mut buf = [0u8; 4];
                bytes.extend_from_slice(ch.encode_utf8(&mut buf).as_bytes());
            }
            _ => {
                let byte = u8::try_from(value).map_err(|_| "octal escape value > 255".to_string())?;
                bytes.push(byte);
            }
        }
    }

    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_literal_verbatim() {
        assert_eq!(unquote("`json:\"a\\n\"`").unwrap(), "json:\"a\\n\"");
        assert_eq!(unquote("`a\r\nb`").unwrap(), "a\nb");
    }

    #[test]
    fn test_interpreted_escapes() {
        assert_eq!(unquote(r#""json:\"name\"""#).unwrap(), "json:\"name\"");
        assert_eq!(unquote(r#""\x41\102é\U0001F600\t""#).unwrap(), "AB\u{e9}\u{1F600}\t");
    }

    #[test]
    fn test_invalid_escapes_rejected() {
        assert_eq!(unquote(r#""\400""#).unwrap_err(), "octal escape value > 255");
        assert_eq!(unquote(r#""\q""#).unwrap_err(), "unknown escape sequence");
        assert_eq!(unquote(r#""\'""#).unwrap_err(), "unknown escape sequence");
        assert!(unquote(r#""\x4""#).is_err());
        assert!(unquote(r#""\uD800""#).is_err());
        assert!(unquote("name").is_err());
    }
}
