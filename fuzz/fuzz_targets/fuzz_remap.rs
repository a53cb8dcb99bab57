#![no_main]

use devicelint::load::remap_location;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: (String, u32)| {
    let (manifest, reported_line) = data;

    let (_, local_line) = remap_location(&manifest, reported_line);

    // Rebasing never moves a location forward in its file.
    assert!(local_line <= reported_line.max(1));
});
