use devicelint::placeholder::{Chunk, split_placeholders};
use proptest::prelude::*;

/// Re-render a chunk sequence back to utterance text.
fn render(chunks: &[Chunk]) -> String {
    let mut out = String::new();
    for chunk in chunks {
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
    out
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn tokenizing_never_panics(s in "\\PC{0,60}") {
        let _ = split_placeholders(&s);
    }

    #[test]
    fn tokenization_is_lossless(s in "\\PC{0,60}") {
        let chunks = split_placeholders(&s);
        prop_assert_eq!(render(&chunks), s);
    }

    #[test]
    fn generated_placeholder_is_extracted(
        name in "[a-z][a-z0-9_]{0,8}",
        with_option in proptest::bool::ANY,
    ) {
        let utterance = if with_option {
            format!("play ${}{{const}} loudly", name)
        } else {
            format!("play ${} loudly", name)
        };
        let chunks = split_placeholders(&utterance);
        prop_assert!(
            chunks.iter().any(|c| matches!(
                c,
                Chunk::Placeholder { name: n, .. } if *n == name
            )),
            "placeholder {:?} not found in {:?}",
            name,
            chunks
        );
    }

    #[test]
    fn doubled_sigil_never_yields_a_placeholder(
        prefix in "[a-z ]{0,10}",
        suffix in "[a-z ]{0,10}",
    ) {
        let utterance = format!("{}$${}", prefix, suffix);
        let chunks = split_placeholders(&utterance);
        prop_assert!(chunks.iter().any(|c| matches!(c, Chunk::Escape)));
        // The escaped sigil and surrounding literals never form a reference.
        let text_only = chunks.iter().all(|c| !matches!(c, Chunk::Placeholder { .. }));
        prop_assert!(text_only, "got: {:?}", chunks);
    }

    #[test]
    fn literal_text_without_sigils_is_one_chunk(s in "[a-zA-Z0-9 ,.!?]{1,40}") {
        let chunks = split_placeholders(&s);
        prop_assert_eq!(chunks, vec![Chunk::Literal(s)]);
    }
}
