//! Page copying and rotation.
//!
//! This module handles page-level operations including:
//! - Copying pages between documents into a fresh page tree
//! - Rotating pages through a single, compile-time selected capability

use lopdf::{Dictionary, Document, Object, ObjectId, Stream, dictionary};
use std::collections::HashMap;
use tracing::warn;

/// Page attributes that may be inherited from ancestor page-tree nodes.
const INHERITABLE: [&[u8]; 4] = [b"Resources", b"MediaBox", b"CropBox", b"Rotate"];

/// Guard against cyclic `/Parent` chains in damaged documents.
const MAX_TREE_DEPTH: usize = 64;

/// Default version for documents built from scratch.
pub const DEFAULT_VERSION: &str = "1.7";

/// Builds a new document by appending pages copied from source documents.
///
/// Copied pages are flattened under a single `/Pages` node. Objects shared by
/// several pages of the same source are copied once.
///
/// # Examples
///
/// ```no_run
/// use pdfops::engine::pages::PageCopier;
/// use lopdf::Document;
///
/// # fn example(source: &Document) {
/// let mut copier = PageCopier::new();
/// let mut scope = copier.source(source);
/// for page_id in source.get_pages().into_values() {
///     scope.copy_page(page_id).ok();
/// }
/// let document = copier.finish();
/// # }
/// ```
#[derive(Debug)]
pub struct PageCopier {
    target: Document,
    pages_id: ObjectId,
    kids: Vec<Object>,
}

impl PageCopier {
    /// Create a copier producing a document with the default version.
    pub fn new() -> Self {
        Self::with_version(DEFAULT_VERSION)
    }

    /// Create a copier producing a document with the given version.
    pub fn with_version(version: &str) -> Self {
        let mut target = Document::with_version(version);
        let pages_id = target.new_object_id();
        let catalog_id = target.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        target.trailer.set("Root", catalog_id);

        Self {
            target,
            pages_id,
            kids: Vec::new(),
        }
    }

    /// Begin copying pages from `source`.
    ///
    /// Objects are deduplicated within one scope only; use a new scope for
    /// each source document.
    pub fn source<'a>(&'a mut self, source: &'a Document) -> SourceScope<'a> {
        SourceScope {
            copier: self,
            source,
            copied: HashMap::new(),
        }
    }

    /// Number of pages appended so far.
    pub fn page_count(&self) -> usize {
        self.kids.len()
    }

    /// Close the page tree and return the finished document.
    pub fn finish(mut self) -> Document {
        let count = self.kids.len() as i64;
        self.target.objects.insert(
            self.pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => self.kids,
                "Count" => count,
            }),
        );
        self.target
    }
}

impl Default for PageCopier {
    fn default() -> Self {
        Self::new()
    }
}

/// Copy session bound to one source document.
pub struct SourceScope<'a> {
    copier: &'a mut PageCopier,
    source: &'a Document,
    copied: HashMap<ObjectId, ObjectId>,
}

impl SourceScope<'_> {
    /// Append a copy of the page `page_id` to the target document.
    ///
    /// Every object reachable from the page is copied, except for its
    /// `/Parent` chain. Inheritable attributes missing on the page are taken
    /// from its ancestors. Copying the same page twice yields two pages.
    ///
    /// # Errors
    ///
    /// Returns an error if `page_id` does not resolve to a dictionary in the
    /// source. Nothing is appended in that case.
    pub fn copy_page(&mut self, page_id: ObjectId) -> Result<ObjectId, lopdf::Error> {
        let source = self.source;
        let page = source.get_dictionary(page_id)?;

        let new_id = self.copier.target.new_object_id();
        self.copied.insert(page_id, new_id);

        let mut copy = Dictionary::new();
        for (key, value) in page.iter() {
            if key.as_slice() == b"Parent" {
                continue;
            }
            let value = self.clone_object(value);
            copy.set(key.clone(), value);
        }

        for key in INHERITABLE {
            if copy.has(key) {
                continue;
            }
            if let Some(value) = inherited_attribute(source, page, key) {
                let value = self.clone_object(&value);
                copy.set(key.to_vec(), value);
            }
        }

        copy.set("Parent", Object::Reference(self.copier.pages_id));
        self.copier
            .target
            .objects
            .insert(new_id, Object::Dictionary(copy));
        self.copier.kids.push(Object::Reference(new_id));

        Ok(new_id)
    }

    fn clone_object(&mut self, object: &Object) -> Object {
        match object {
            Object::Reference(id) => match self.clone_reference(*id) {
                Some(new_id) => Object::Reference(new_id),
                None => Object::Null,
            },
            Object::Dictionary(dict) => Object::Dictionary(self.clone_dictionary(dict)),
            Object::Array(items) => {
                Object::Array(items.iter().map(|item| self.clone_object(item)).collect())
            }
            Object::Stream(stream) => {
                let dict = self.clone_dictionary(&stream.dict);
                let mut copy = Stream::new(dict, stream.content.clone());
                copy.allows_compression = stream.allows_compression;
                Object::Stream(copy)
            }
            other => other.clone(),
        }
    }

    fn clone_dictionary(&mut self, dict: &Dictionary) -> Dictionary {
        let skip_parent = is_page_tree_node(dict);
        let mut copy = Dictionary::new();

        for (key, value) in dict.iter() {
            if skip_parent && key.as_slice() == b"Parent" {
                continue;
            }
            let value = self.clone_object(value);
            copy.set(key.clone(), value);
        }

        copy
    }

    fn clone_reference(&mut self, id: ObjectId) -> Option<ObjectId> {
        if let Some(&new_id) = self.copied.get(&id) {
            return Some(new_id);
        }

        let source = self.source;
        let object = match source.get_object(id) {
            Ok(object) => object,
            Err(err) => {
                warn!(?id, %err, "Cannot resolve reference, using Null");
                return None;
            }
        };

        // Registered before recursing so reference cycles terminate.
        let new_id = self.copier.target.new_object_id();
        self.copied.insert(id, new_id);

        let copy = self.clone_object(object);
        self.copier.target.objects.insert(new_id, copy);
        Some(new_id)
    }
}

/// Whether `dict` is a `/Page` or `/Pages` node.
fn is_page_tree_node(dict: &Dictionary) -> bool {
    matches!(
        dict.get(b"Type").and_then(Object::as_name),
        Ok(b"Page") | Ok(b"Pages")
    )
}

/// Look up an inheritable attribute on the ancestors of `page`.
fn inherited_attribute(source: &Document, page: &Dictionary, key: &[u8]) -> Option<Object> {
    let mut parent = page.get(b"Parent").and_then(Object::as_reference).ok();

    for _ in 0..MAX_TREE_DEPTH {
        let node = source.get_dictionary(parent?).ok()?;
        if let Ok(value) = node.get(key) {
            return Some(value.clone());
        }
        parent = node.get(b"Parent").and_then(Object::as_reference).ok();
    }

    None
}

/// Why a page could not be rotated.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RotationError {
    /// The backend cannot express this angle.
    #[error("Rotation by {angle} degrees is not supported")]
    UnsupportedAngle {
        /// Normalized angle in degrees.
        angle: i64,
    },

    /// The page object is missing or is not a dictionary.
    #[error("Page object {id:?} is not a page dictionary")]
    NotAPage {
        /// Object id of the page.
        id: ObjectId,
    },
}

/// Capability for rotating a single page in place.
///
/// The engine is generic over this trait, so the backend is fixed at compile
/// time.
pub trait PageRotator {
    /// Rotate `page_id` in `doc` clockwise by `angle` degrees.
    ///
    /// `angle` is already normalized to `0..360`.
    ///
    /// # Errors
    ///
    /// Returns a [`RotationError`] when the page is left unchanged.
    fn rotate(&self, doc: &mut Document, page_id: ObjectId, angle: i64)
    -> Result<(), RotationError>;
}

/// Rotates pages by updating their `/Rotate` entry.
///
/// Viewers only honour multiples of 90 degrees; other angles are rejected.
#[derive(Debug, Clone, Copy, Default)]
pub struct RotateEntry;

impl PageRotator for RotateEntry {
    fn rotate(
        &self,
        doc: &mut Document,
        page_id: ObjectId,
        angle: i64,
    ) -> Result<(), RotationError> {
        if angle % 90 != 0 {
            return Err(RotationError::UnsupportedAngle { angle });
        }

        if doc.get_dictionary(page_id).is_err() {
            return Err(RotationError::NotAPage { id: page_id });
        }
        let rotation = normalize_angle(page_rotation(doc, page_id) + normalize_angle(angle));

        let page = doc
            .get_dictionary_mut(page_id)
            .map_err(|_| RotationError::NotAPage { id: page_id })?;
        page.set("Rotate", Object::Integer(rotation));

        Ok(())
    }
}

/// Normalize an arbitrary angle in degrees to `0..360`.
pub fn normalize_angle(angle: i64) -> i64 {
    angle.rem_euclid(360)
}

/// Current `/Rotate` value of a page, including inherited values,
/// normalized to `0..360`.
pub fn page_rotation(doc: &Document, page_id: ObjectId) -> i64 {
    let Ok(page) = doc.get_dictionary(page_id) else {
        return 0;
    };

    let raw = match page.get(b"Rotate") {
        Ok(value) => value.as_i64().unwrap_or(0),
        Err(_) => inherited_attribute(doc, page, b"Rotate")
            .and_then(|value| value.as_i64().ok())
            .unwrap_or(0),
    };
    normalize_angle(raw)
}
