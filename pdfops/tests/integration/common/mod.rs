//! Shared fixtures for the integration tests.
//!
//! Documents are built in memory with lopdf. Every page shows a label such
//! as `A-2`, so tests can check which source page ended up where.

#![allow(dead_code)]

use lopdf::{Document, Object, ObjectId, Stream, dictionary};

/// Build a document with `pages` pages labelled `{prefix}-1`, `{prefix}-2`, ...
///
/// Page size and resources live on the page tree root and are inherited.
pub fn labelled_pdf(prefix: &str, pages: usize) -> Vec<u8> {
    let mut doc = Document::with_version("1.4");
    let pages_id = doc.new_object_id();

    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });

    let kids: Vec<Object> = (1..=pages)
        .map(|page| {
            let content = format!("BT /F1 18 Tf 72 720 Td ({prefix}-{page}) Tj ET\n");
            let content_id = doc.add_object(Stream::new(dictionary! {}, content.into_bytes()));
            doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
            })
            .into()
        })
        .collect();

    doc.objects.insert(
        pages_id,
        dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => pages as i64,
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
            "Resources" => dictionary! {
                "Font" => dictionary! { "F1" => font_id },
            },
        }
        .into(),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).unwrap();
    bytes
}

/// Document with pages labelled `P-1` ...
pub fn pdf(pages: usize) -> Vec<u8> {
    labelled_pdf("P", pages)
}

/// Re-serialize `bytes` with `key` set to `value` on every page.
pub fn with_page_entry(bytes: &[u8], key: &str, value: impl Into<Object> + Clone) -> Vec<u8> {
    let mut doc = Document::load_mem(bytes).unwrap();
    let page_ids: Vec<ObjectId> = doc.get_pages().into_values().collect();
    for id in page_ids {
        doc.get_dictionary_mut(id).unwrap().set(key, value.clone());
    }
    save(&mut doc)
}

/// Re-serialize `bytes` with `key` set on the page tree root.
///
/// `value` receives the id of the root node.
pub fn with_page_tree_entry(
    bytes: &[u8],
    key: &str,
    value: impl FnOnce(ObjectId) -> Object,
) -> Vec<u8> {
    let mut doc = Document::load_mem(bytes).unwrap();
    let root = doc
        .catalog()
        .unwrap()
        .get(b"Pages")
        .and_then(Object::as_reference)
        .unwrap();
    doc.get_dictionary_mut(root).unwrap().set(key, value(root));
    save(&mut doc)
}

fn save(doc: &mut Document) -> Vec<u8> {
    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).unwrap();
    bytes
}

/// Number of pages of a serialized document.
pub fn page_count(bytes: &[u8]) -> usize {
    Document::load_mem(bytes).unwrap().get_pages().len()
}

/// Page labels in page order.
pub fn labels(bytes: &[u8]) -> Vec<String> {
    let doc = Document::load_mem(bytes).unwrap();
    doc.get_pages()
        .into_values()
        .map(|id| {
            let content = doc.get_page_content(id).unwrap();
            let text = String::from_utf8_lossy(&content);
            let start = text.find('(').map_or(0, |i| i + 1);
            let end = text[start..].find(')').map_or(text.len(), |i| start + i);
            text[start..end].to_string()
        })
        .collect()
}

/// `/Rotate` of every page, in page order (0 when absent).
pub fn rotations(bytes: &[u8]) -> Vec<i64> {
    let doc = Document::load_mem(bytes).unwrap();
    doc.get_pages()
        .into_values()
        .map(|id| {
            doc.get_dictionary(id)
                .ok()
                .and_then(|page| page.get(b"Rotate").ok())
                .and_then(|rotate| rotate.as_i64().ok())
                .unwrap_or(0)
        })
        .collect()
}

/// Whether every page carries its own MediaBox.
pub fn pages_have_media_box(bytes: &[u8]) -> bool {
    let doc = Document::load_mem(bytes).unwrap();
    doc.get_pages()
        .into_values()
        .all(|id| doc.get_dictionary(id).is_ok_and(|page| page.has(b"MediaBox")))
}
