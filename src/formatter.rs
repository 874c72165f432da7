use crate::track_document::TrackDocument;

pub const XML_DECLARATION: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\"?>";

const INDENT: &str = "  ";

/// Serializes `doc`, replaces whatever declaration the serializer
/// emitted with the canonical one, and pretty-prints the body. The
/// pretty printer is a line-based pass over tag boundaries, not a
/// tree-aware one; see the line classifier below for the exact rules.
pub fn format(doc: &TrackDocument) -> String {
    let raw = doc.to_xml();
    let body = strip_declaration(&raw);
    // The declaration line ends with a bare newline while body lines
    // use CRLF, matching the emitted artifact byte for byte.
    format!("{}\n{}", XML_DECLARATION, indent_lines(body))
}

/// Drops a leading `<?xml ...?>` declaration plus any whitespace that
/// follows it.
fn strip_declaration(xml: &str) -> &str {
    if let Some(rest) = xml.strip_prefix("<?xml") {
        if let Some(end) = rest.find("?>") {
            return rest[end + 2..].trim_start();
        }
    }
    xml
}

fn indent_lines(xml: &str) -> String {
    // Break at every `><` boundary, then indent line by line.
    let mut broken = String::with_capacity(xml.len());
    let mut prev_was_gt = false;
    for c in xml.chars() {
        if prev_was_gt && c == '<' {
            broken.push_str("\r\n");
        }
        broken.push(c);
        prev_was_gt = c == '>';
    }

    let mut pad: usize = 0;
    let mut out = String::with_capacity(broken.len() + 64);
    for (i, line) in broken.split("\r\n").enumerate() {
        let indent = if closes_inline(line) {
            0
        } else if line.starts_with("</") && starts_with_word(&line[2..]) {
            pad = pad.saturating_sub(1);
            0
        } else if opens_container(line) {
            1
        } else {
            0
        };

        pad += indent;
        if i > 0 {
            out.push_str("\r\n");
        }
        for _ in 0..(pad - indent) {
            out.push_str(INDENT);
        }
        out.push_str(line);
    }
    out
}

// `.+</name...>` — content followed by a closing tag at end of line;
// the indent level is left alone.
fn closes_inline(line: &str) -> bool {
    let Some(pos) = line.rfind("</") else {
        return false;
    };
    if pos == 0 {
        return false;
    }
    let rest = &line[pos + 2..];
    let Some(inner) = rest.strip_suffix('>') else {
        return false;
    };
    starts_with_word(rest) && !inner.contains('>')
}

// `<name ...>` where the first `>` is not preceded by `/` — a container
// opens, so the pending indent grows starting on the next line. Note
// the inherited quirk: a single-character tag name never matches.
fn opens_container(line: &str) -> bool {
    let bytes = line.as_bytes();
    if bytes.len() < 2 || bytes[0] != b'<' {
        return false;
    }
    if !starts_with_word(&line[1..]) {
        return false;
    }
    match line.find('>') {
        Some(gt) => gt >= 3 && bytes[gt - 1] != b'/',
        None => false,
    }
}

fn starts_with_word(s: &str) -> bool {
    s.bytes()
        .next()
        .is_some_and(|b| b.is_ascii_alphanumeric() || b == b'_')
}
