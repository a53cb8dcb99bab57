#![no_main]

use devicelint::placeholder::{Chunk, split_placeholders};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let s = String::from_utf8_lossy(data);

    let chunks = split_placeholders(&s);

    // Tokenization must be lossless: re-rendering the chunks reproduces the input.
    let mut out = String::new();
    for chunk in &chunks {
        match chunk {
            Chunk::Literal(text) => out.push_str(text),
            Chunk::Placeholder { name, option } => {
                out.push('$');
                out.push_str(name);
                if let Some(opt) = option {
                    out.push('{');
                    out.push_str(opt);
                    out.push('}');
                }
            }
            Chunk::Escape => out.push_str("$$"),
        }
    }

    if out != s {
        panic!(
            "Lossy tokenization.\nInput: {:?}\nRendered: {:?}\nChunks: {:?}",
            s, out, chunks
        );
    }
});
