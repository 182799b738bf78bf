#![no_main]

use libfuzzer_sys::fuzz_target;
use pdfops::io::load_document;

fuzz_target!(|data: &[u8]| {
    // Damaged input either loads or yields one error; it never panics.
    if let Ok(loaded) = load_document(data) {
        assert_eq!(loaded.page_ids().len(), loaded.page_count);
    }
});
