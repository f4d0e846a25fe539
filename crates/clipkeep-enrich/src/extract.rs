//! Best-effort Open Graph metadata extraction.
//!
//! This is deliberately not a markup parser. It scans for `<meta>` tags and
//! pulls the `og:title`, `og:description`, and `og:image` keys out of them,
//! tolerating either attribute order (key before or after `content`) and
//! either quote style. Tags whose attributes fall outside those shapes are
//! missed, and that stays an accepted limitation rather than something to
//! generalize away.

/// Preview fields scraped from a page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PagePreview {
    pub title: Option<String>,
    pub description: Option<String>,
    pub image_url: Option<String>,
}

impl PagePreview {
    /// Whether nothing at all was extracted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.description.is_none() && self.image_url.is_none()
    }
}

/// Scan markup for Open Graph `<meta>` tags.
///
/// The first occurrence of each key wins. Values have the four basic HTML
/// entities decoded.
#[must_use]
pub fn extract_preview(html: &str) -> PagePreview {
    let mut preview = PagePreview::default();
    let lower = html.to_ascii_lowercase();

    let mut from = 0;
    while let Some(rel) = lower[from..].find("<meta") {
        let start = from + rel;
        let end = lower[start..]
            .find('>')
            .map_or(lower.len(), |close| start + close);
        let tag = &html[start..end];
        let tag_lower = &lower[start..end];
        from = end;

        let key = attr_value(tag, tag_lower, "property")
            .or_else(|| attr_value(tag, tag_lower, "name"))
            .map(str::to_ascii_lowercase);
        let Some(key) = key else { continue };
        let Some(content) = attr_value(tag, tag_lower, "content") else {
            continue;
        };

        let slot = match key.as_str() {
            "og:title" => &mut preview.title,
            "og:description" => &mut preview.description,
            "og:image" => &mut preview.image_url,
            _ => continue,
        };
        if slot.is_none() {
            *slot = Some(decode_entities(content));
        }
    }

    preview
}

/// Find `name="value"` (or single-quoted) inside one tag, returning the raw
/// value. The attribute name must sit at a word boundary so `content` never
/// matches inside another attribute's name.
fn attr_value<'a>(tag: &'a str, tag_lower: &str, name: &str) -> Option<&'a str> {
    let bytes = tag_lower.as_bytes();
    let mut search = 0;
    while let Some(rel) = tag_lower[search..].find(name) {
        let at = search + rel;
        search = at + name.len();

        if at == 0 || !bytes[at - 1].is_ascii_whitespace() {
            continue;
        }

        let mut i = at + name.len();
        while i < bytes.len() && bytes[i].is_ascii_whitespace() {
            i += 1;
        }
        if i >= bytes.len() || bytes[i] != b'=' {
            continue;
        }
        i += 1;
        while i < bytes.len() && bytes[i].is_ascii_whitespace() {
            i += 1;
        }
        if i >= bytes.len() || (bytes[i] != b'"' && bytes[i] != b'\'') {
            continue;
        }
        let quote = bytes[i] as char;
        i += 1;
        let close = tag_lower[i..].find(quote)?;
        return Some(&tag[i..i + close]);
    }
    None
}

/// Decode `&amp;`, `&quot;`, `&lt;`, and `&gt;`. Anything else passes
/// through untouched.
fn decode_entities(s: &str) -> String {
    const ENTITIES: [(&str, char); 4] = [
        ("&amp;", '&'),
        ("&quot;", '"'),
        ("&lt;", '<'),
        ("&gt;", '>'),
    ];

    let mut out = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(pos) = rest.find('&') {
        out.push_str(&rest[..pos]);
        rest = &rest[pos..];
        match ENTITIES.iter().find(|(ent, _)| rest.starts_with(ent)) {
            Some((ent, ch)) => {
                out.push(*ch);
                rest = &rest[ent.len()..];
            }
            None => {
                out.push('&');
                rest = &rest[1..];
            }
        }
    }
    out.push_str(rest);
    out
}
