//! Parser for the struct tag micro-syntax.
//!
//! A tag is a sequence of space-separated `key:"value"` pairs where each
//! value is a double-quoted string with Go escapes, e.g.
//! `json:"name,omitempty" db:"user_name"`.

/// A decoded struct field tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StructTag<'a>(&'a str);

impl<'a> StructTag<'a> {
    pub fn new(tag: &'a str) -> Self {
        Self(tag)
    }

    /// The value associated with `key`, or `None` if the key is absent or the
    /// tag is malformed before reaching it.
    pub fn lookup(&self, key: &str) -> Option<String> {
        for (name, quoted) in self.pairs() {
            if name == key {
                return unquote_value(quoted);
            }
        }
        None
    }

    /// Like [`lookup`](Self::lookup), with absence reported as an empty string.
    pub fn get(&self, key: &str) -> String {
        self.lookup(key).unwrap_or_default()
    }

    /// Iterate the well-formed `(key, "quoted value")` pairs in order.
    ///
    /// Iteration stops at the first malformed pair.
    pub fn pairs(&self) -> Pairs<'a> {
        Pairs { rest: self.0 }
    }
}

/// Iterator over the pairs of a [`StructTag`].
pub struct Pairs<'a> {
    rest: &'a str,
}

impl<'a> Iterator for Pairs<'a> {
    type Item = (&'a str, &'a str);

    fn next(&mut self) -> Option<Self::Item> {
        let tag = self.rest.trim_start_matches(' ');
        let bytes = tag.as_bytes();
        if bytes.is_empty() {
            self.rest = tag;
            return None;
        }

        // Keys are runs of printable non-space characters other than ':' and '"'.
        let mut i = 0;
        while i < bytes.len() && bytes[i] > b' ' && bytes[i] != b':' && bytes[i] != b'"' && bytes[i] != 0x7f {
            i += 1;
        }
        if i == 0 || i + 1 >= bytes.len() || bytes[i] != b':' || bytes[i + 1] != b'"' {
            self.rest = "";
            return None;
        }
        let name = &tag[..i];
        let value_start = i + 1;

        let mut j = value_start + 1;
        while j < bytes.len() && bytes[j] != b'"' {
            if bytes[j] == b'\\' {
                j += 1;
            }
            j += 1;
        }
        if j >= bytes.len() {
            self.rest = "";
            return None;
        }

        let quoted = &tag[value_start..=j];
        self.rest = &tag[j + 1..];
        Some((name, quoted))
    }
}

/// Decode a double-quoted tag value, rejecting invalid escapes.
fn unquote_value(quoted: &str) -> Option<String> {
    let body = quoted.strip_prefix('"')?.strip_suffix('"')?;
    let mut out = Vec::with_capacity(body.len());
    let mut chars = body.chars();

    while let Some(c) = chars.next() {
        match c {
            '\n' => return None,
            '\\' => {}
            _ => {
                let mut buf = [0u8; 4];
                out.extend_from_slice(c.encode_utf8(&mut buf).as_bytes());
                continue;
            }
        }

        let esc = chars.next()?;
        let byte = match esc {
            'a' => 0x07,
            'b' => 0x08,
            'f' => 0x0c,
            'n' => b'\n',
            'r' => b'\r',
            't' => b'\t',
            'v' => 0x0b,
            '\\' => b'\\',
            '"' => b'"',
            'x' => {
                let digits: String = chars.by_ref().take(2).collect();
                hex_value(&digits, 2)? as u8
            }
            'u' | 'U' => {
                let width = if esc == 'u' { 4 } else { 8 };
                let digits: String = chars.by_ref().take(width).collect();
                let ch = char::from_u32(hex_value(&digits, width)?)?;
                let mut buf = [0u8; 4];
                out.extend_from_slice(ch.encode_utf8(&mut buf).as_bytes());
                continue;
            }
            '0'..='7' => {
                let mut digits = String::from(esc);
                digits.extend(chars.by_ref().take(2));
                if digits.len() != 3 || !digits.chars().all(|d| d.is_digit(8)) {
                    return None;
                }
                u8::try_from(u32::from_str_radix(&digits, 8).ok()?).ok()?
            }
            _ => return None,
        };
        out.push(byte);
    }

    String::from_utf8(out).ok()
}

fn hex_value(digits: &str, width: usize) -> Option<u32> {
    if digits.len() != width || !digits.chars().all(|d| d.is_ascii_hexdigit()) {
        return None;
    }
    u32::from_str_radix(digits, 16).ok()
}

/// The name portion of an encoder tag value, dropping `,option` suffixes.
pub fn tag_name(value: &str) -> &str {
    value.split(',').next().unwrap_or_default()
}
