#![no_main]

use libfuzzer_sys::fuzz_target;
use pdfops::parse_selector;

fuzz_target!(|data: (&str, u16)| {
    let (selector, total) = data;
    let total = usize::from(total);

    if let Ok(selection) = parse_selector(selector, total) {
        let indices = selection.indices();
        assert!(indices.windows(2).all(|pair| pair[0] < pair[1]));
        assert!(indices.iter().all(|&index| index < total));
    }
});
