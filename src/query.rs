//! `application/x-www-form-urlencoded` query strings, as produced by the
//! browser's `URLSearchParams`.

#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryParams {
    pairs: Vec<(String, String)>,
}

impl QueryParams {
    /// Parses `?a=1&b=2` (leading `?` optional). Pairs without `=` get an empty value.
    pub fn parse(search: &str) -> Self {
        let raw = search.strip_prefix('?').unwrap_or(search);
        let pairs = raw
            .split('&')
            .filter(|part| !part.is_empty())
            .map(|part| match part.split_once('=') {
                Some((k, v)) => (decode_component(k), decode_component(v)),
                None => (decode_component(part), String::new()),
            })
            .collect();
        Self { pairs }
    }

    /// First value for `key`, like `URLSearchParams.get`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn set(&mut self, key: &str, value: &str) {
        self.pairs.retain(|(k, _)| k != key);
        self.pairs.push((key.to_string(), value.to_string()));
    }

    /// Serializes with a leading `?`.
    pub fn to_search(&self) -> String {
        let body = self
            .pairs
            .iter()
            .map(|(k, v)| format!("{}={}", encode_component(k), encode_component(v)))
            .collect::<Vec<_>>()
            .join("&");
        format!("?{body}")
    }
}

fn decode_component(raw: &str) -> String {
    let bytes = raw.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'+' => {
                out.push(b' ');
                i += 1;
            }
            b'%' if i + 2 < bytes.len() => {
                match (hex_val(bytes[i + 1]), hex_val(bytes[i + 2])) {
                    (Some(hi), Some(lo)) => {
                        out.push((hi << 4) | lo);
                        i += 3;
                    }
                    _ => {
                        out.push(b'%');
                        i += 1;
                    }
                }
            }
            b => {
                out.push(b);
                i += 1;
            }
        }
    }
    String::from_utf8_lossy(&out).into_owned()
}

fn encode_component(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for b in raw.bytes() {
        match b {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'*' | b'-' | b'.' | b'_' => {
                out.push(b as char)
            }
            b' ' => out.push('+'),
            _ => out.push_str(&format!("%{b:02X}")),
        }
    }
    out
}

fn hex_val(b: u8) -> Option<u8> {
    match b {
        b'0'..=b'9' => Some(b - b'0'),
        b'a'..=b'f' => Some(b - b'a' + 10),
        b'A'..=b'F' => Some(b - b'A' + 10),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_decodes_percent_and_plus() {
        let q = QueryParams::parse("?type=week&grade=D2%2FD3&note=a+b");
        assert_eq!(q.get("type"), Some("week"));
        assert_eq!(q.get("grade"), Some("D2/D3"));
        assert_eq!(q.get("note"), Some("a b"));
        assert_eq!(q.get("missing"), None);
    }

    #[test]
    fn parse_decodes_utf8_labels_and_keeps_first_duplicate() {
        let q = QueryParams::parse("grade=1%E5%B9%B4%E7%94%9F&grade=M1");
        assert_eq!(q.get("grade"), Some("1年生"));
    }

    #[test]
    fn parse_tolerates_raw_utf8_and_stray_percent() {
        let q = QueryParams::parse("?grade=2年生&x=100%&y=%zz");
        assert_eq!(q.get("grade"), Some("2年生"));
        assert_eq!(q.get("x"), Some("100%"));
        assert_eq!(q.get("y"), Some("%zz"));
    }

    #[test]
    fn to_search_encodes_like_url_search_params() {
        let mut q = QueryParams::default();
        q.set("type", "week");
        q.set("grade", "D2/D3");
        assert_eq!(q.to_search(), "?type=week&grade=D2%2FD3");

        let mut q = QueryParams::default();
        q.set("grade", "1年生");
        assert_eq!(q.to_search(), "?grade=1%E5%B9%B4%E7%94%9F");
    }
}
