use linealign_core::Document;

use crate::rng::XorShift64;

const WORDS: &[&str] = &[
    "alignment", "reference", "edition", "paragraph", "footnote", "extracted", "layout",
    "corpus", "noise", "ligature", "hyphenation", "court", "held", "statute", "section",
    "the", "of", "and", "in", "to", "a", "is", "that", "for", "see", "id", "supra", "at",
];

fn sentence(rng: &mut XorShift64, words: usize) -> String {
    (0..words)
        .map(|_| WORDS[rng.below(WORDS.len())])
        .collect::<Vec<_>>()
        .join(" ")
}

/// Corrupts roughly `rate` of the characters the way OCR does.
fn ocr_noise(rng: &mut XorShift64, text: &str, rate: f64) -> String {
    text.chars()
        .map(|c| match c {
            'o' if rng.chance(rate) => '0',
            'e' if rng.chance(rate) => 'c',
            'l' if rng.chance(rate) => '1',
            _ => c,
        })
        .collect()
}

/// A document of `paragraphs` body paragraphs, each followed by a footnote
/// and, every few paragraphs, a running header.
pub fn synthetic_document(seed: u64, paragraphs: usize) -> Document {
    let mut rng = XorShift64::new(seed);
    let mut body = Vec::with_capacity(paragraphs);
    let mut footnotes = Vec::with_capacity(paragraphs);
    let mut lines = Vec::new();

    for p in 0..paragraphs {
        if p % 4 == 0 {
            lines.push(format!("LAW REVIEW VOL. {}", p / 4 + 1));
        }
        let paragraph = sentence(&mut rng, 48);
        for chunk in paragraph.split(' ').collect::<Vec<_>>().chunks(8) {
            lines.push(ocr_noise(&mut rng, &chunk.join(" "), 0.03));
        }
        body.push(paragraph);

        let note = format!("{} {}", p + 1, sentence(&mut rng, 10));
        lines.push(ocr_noise(&mut rng, &note, 0.03));
        footnotes.push(note);
    }

    let lines: Vec<&str> = lines.iter().map(String::as_str).collect();
    let body: Vec<&str> = body.iter().map(String::as_str).collect();
    let footnotes: Vec<&str> = footnotes.iter().map(String::as_str).collect();
    Document::from_texts(format!("synthetic-{}", seed), &lines, &body, &footnotes)
}
