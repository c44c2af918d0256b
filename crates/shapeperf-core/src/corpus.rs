//! Sample text for benchmarking
//!
//! Every line is covered by the embedded DejaVu fonts, so glyph counts stay
//! comparable across engines.

pub const PANGRAM: &str = "The quick brown fox jumps over the lazy dog";

pub const CORPUS: &[&str] = &[
    PANGRAM,
    "Pack my box with five dozen liquor jugs.",
    "Sphinx of black quartz, judge my vow!",
    "It was the best of times, it was the worst of times, it was the age of wisdom,",
    "it was the age of foolishness, it was the epoch of belief, it was the epoch of incredulity,",
    "Falsches Üben von Xylophonmusik quält jeden größeren Zwerg.",
    "Voix ambiguë d'un cœur qui, au zéphyr, préfère les jattes de kiwis.",
    "El veloz murciélago hindú comía feliz cardillo y kiwi.",
    "Pchnąć w tę łódź jeża lub ośm skrzyń fig.",
    "Příliš žluťoučký kůň úpěl ďábelské ódy.",
    "Ξεσκεπάζω την ψυχοφθόρα βδελυγμία.",
    "Съешь же ещё этих мягких французских булок, да выпей чаю.",
    "Wäffle, Fifig, office, affluent, efficient, baffled.",
    "0123456789 +-*/=<>()[]{} #$%&@ ¶§©®™",
];

/// Corpus lines whose script is Latin
pub fn latin_lines() -> impl Iterator<Item = &'static str> {
    CORPUS.iter().copied().filter(|line| {
        !line
            .chars()
            .any(|c| matches!(c, '\u{0370}'..='\u{03FF}' | '\u{0400}'..='\u{04FF}'))
    })
}
