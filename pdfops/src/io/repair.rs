//! Best-effort reconstruction of damaged PDF buffers.
//!
//! The repair pass works purely on bytes and never interprets page content.
//! It:
//!
//! - drops anything in front of the `%PDF-` header,
//! - drops trailing garbage after the last `%%EOF` marker,
//! - rebuilds a classic cross-reference table by scanning for `N G obj`
//!   headers (the last definition of an object number wins),
//! - appends a fresh trailer whose `/Root` comes from the last `/Root`
//!   reference found in the buffer, or from the first `/Type /Catalog`
//!   object when that reference is missing or dangling.
//!
//! The output is meant to be fed back into the regular parser; see
//! [`crate::io::reader::DocumentLoader`].

use std::collections::BTreeMap;
use std::fmt::Write as _;

use tracing::debug;

const HEADER: &[u8] = b"%PDF-";
const EOF_MARKER: &[u8] = b"%%EOF";

/// Largest object number a conforming writer produces.
const MAX_OBJECT_NUMBER: u32 = 8_388_607;

/// Location of an indirect object inside the repaired buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ObjectEntry {
    generation: u16,
    offset: usize,
}

/// Attempt to rebuild a loadable document from a damaged buffer.
///
/// Returns `None` when the buffer has no PDF header, contains no indirect
/// objects, or no document catalog can be located.
pub fn repair(bytes: &[u8]) -> Option<Vec<u8>> {
    let start = find(bytes, HEADER)?;
    let mut body = bytes[start..].to_vec();

    if let Some(eof) = rfind(&body, EOF_MARKER) {
        body.truncate(eof + EOF_MARKER.len());
    }

    let objects = scan_objects(&body);
    if objects.is_empty() {
        debug!("Repair found no indirect objects");
        return None;
    }

    let root = find_root(&body, &objects)?;
    let size = objects.keys().next_back()?.checked_add(1)?;

    if !body.ends_with(b"\n") {
        body.push(b'\n');
    }
    let xref_offset = body.len();

    let mut table = String::with_capacity(32 + objects.len() * 24);
    table.push_str("xref\n0 1\n0000000000 65535 f \n");
    for run in consecutive_runs(&objects) {
        let _ = writeln!(table, "{} {}", run[0].0, run.len());
        for (_, entry) in run {
            let _ = writeln!(table, "{:010} {:05} n ", entry.offset, entry.generation);
        }
    }
    let _ = write!(
        table,
        "trailer\n<< /Size {size} /Root {} {} R >>\nstartxref\n{xref_offset}\n%%EOF\n",
        root.0, root.1
    );
    body.extend_from_slice(table.as_bytes());

    debug!(
        objects = objects.len(),
        root = root.0,
        bytes_len = body.len(),
        "Rebuilt cross-reference table"
    );

    Some(body)
}

/// Scan the buffer for indirect object headers.
///
/// Stream payloads are skipped so binary data cannot produce false headers.
fn scan_objects(body: &[u8]) -> BTreeMap<u32, ObjectEntry> {
    let mut objects = BTreeMap::new();
    let mut pos = 0;

    while pos < body.len() {
        let rest = &body[pos..];

        if rest.starts_with(b"stream") && is_token_start(body, pos) {
            match find(&body[pos + 6..], b"endstream") {
                Some(end) => {
                    pos += 6 + end + 9;
                    continue;
                }
                None => break,
            }
        }

        if rest.starts_with(b"obj")
            && !body.get(pos + 3).is_some_and(|b| b.is_ascii_alphanumeric())
            && let Some((number, generation, offset)) = object_header_before(body, pos)
            && number <= MAX_OBJECT_NUMBER
        {
            objects.insert(number, ObjectEntry { generation, offset });
        }

        pos += 1;
    }

    objects
}

/// Split the objects into runs of consecutive object numbers, one per
/// cross-reference subsection. Object 0 is always the free-list head.
fn consecutive_runs(objects: &BTreeMap<u32, ObjectEntry>) -> Vec<Vec<(u32, ObjectEntry)>> {
    let mut runs: Vec<Vec<(u32, ObjectEntry)>> = Vec::new();

    for (&number, &entry) in objects.range(1..) {
        match runs.last_mut() {
            Some(run) if run.last().is_some_and(|&(prev, _)| prev + 1 == number) => {
                run.push((number, entry));
            }
            _ => runs.push(vec![(number, entry)]),
        }
    }

    runs
}

/// Read `N G` immediately before the `obj` keyword at `keyword`.
fn object_header_before(body: &[u8], keyword: usize) -> Option<(u32, u16, usize)> {
    let mut cursor = keyword;

    let gen_end = skip_whitespace_back(body, cursor);
    if gen_end == cursor {
        return None;
    }
    let gen_start = digits_back(body, gen_end);
    if gen_start == gen_end {
        return None;
    }

    cursor = gen_start;
    let num_end = skip_whitespace_back(body, cursor);
    if num_end == cursor {
        return None;
    }
    let num_start = digits_back(body, num_end);
    if num_start == num_end || !is_token_start(body, num_start) {
        return None;
    }

    let generation = parse_ascii(&body[gen_start..gen_end])?;
    let number = parse_ascii(&body[num_start..num_end])?;
    Some((number, generation, num_start))
}

/// Locate the document catalog.
fn find_root(body: &[u8], objects: &BTreeMap<u32, ObjectEntry>) -> Option<(u32, u16)> {
    if let Some(root) = trailer_root(body)
        && objects.contains_key(&root.0)
    {
        return Some(root);
    }

    objects.iter().find_map(|(&number, entry)| {
        let object = object_slice(body, entry.offset);
        is_catalog(object).then_some((number, entry.generation))
    })
}

/// The last `/Root N G R` reference in the buffer.
fn trailer_root(body: &[u8]) -> Option<(u32, u16)> {
    let at = rfind(body, b"/Root")? + 5;
    let mut tokens = body[at..]
        .split(|b| b.is_ascii_whitespace())
        .filter(|token| !token.is_empty());

    let number = parse_ascii(tokens.next()?)?;
    let generation = parse_ascii(tokens.next()?)?;
    let keyword = tokens.next()?;
    keyword.starts_with(b"R").then_some((number, generation))
}

/// Bytes of the object starting at `offset`, up to its `endobj`.
fn object_slice(body: &[u8], offset: usize) -> &[u8] {
    let rest = &body[offset..];
    match find(rest, b"endobj") {
        Some(end) => &rest[..end],
        None => rest,
    }
}

fn is_catalog(object: &[u8]) -> bool {
    let mut rest = object;
    while let Some(at) = find(rest, b"/Type") {
        let after = &rest[at + 5..];
        let value = skip_whitespace_front(after);
        if value.starts_with(b"/Catalog") {
            return true;
        }
        rest = after;
    }
    false
}

fn skip_whitespace_back(body: &[u8], mut end: usize) -> usize {
    while end > 0 && body[end - 1].is_ascii_whitespace() {
        end -= 1;
    }
    end
}

fn skip_whitespace_front(bytes: &[u8]) -> &[u8] {
    let skip = bytes.iter().take_while(|b| b.is_ascii_whitespace()).count();
    &bytes[skip..]
}

fn digits_back(body: &[u8], mut end: usize) -> usize {
    while end > 0 && body[end - 1].is_ascii_digit() {
        end -= 1;
    }
    end
}

/// Whether `pos` starts a token, i.e. follows whitespace or a delimiter.
fn is_token_start(body: &[u8], pos: usize) -> bool {
    pos == 0
        || matches!(
            body[pos - 1],
            b' ' | b'\t' | b'\r' | b'\n' | b'\x0c' | b'\0' | b'>' | b']' | b')' | b'}'
        )
}

fn parse_ascii<T: std::str::FromStr>(bytes: &[u8]) -> Option<T> {
    std::str::from_utf8(bytes).ok()?.parse().ok()
}

pub(crate) fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    if needle.is_empty() || haystack.len() < needle.len() {
        return None;
    }
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}

pub(crate) fn rfind(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    if needle.is_empty() || haystack.len() < needle.len() {
        return None;
    }
    haystack
        .windows(needle.len())
        .rposition(|window| window == needle)
}
