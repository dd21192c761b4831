#![allow(missing_docs)]

use std::sync::LazyLock;

use divan::{Bencher, black_box, counter::BytesCount};
use wordsieve::{
    segmentation::{
        beam_search_segment,
        scorers::{BigramScorer, SubwordScorer},
        viterbi_segment,
    },
    vocab::io::{read_bigram_stats, read_unigram_stats},
};

#[global_allocator]
static ALLOC: divan::AllocProfiler = divan::AllocProfiler::system();

fn main() {
    divan::main();
}

static STEMS: &[&str] = &[
    "un", "re", "in", "dis", "pre", "believ", "form", "struct", "act", "port",
];
static SUFFIXES: &[&str] = &["able", "ing", "ion", "ed", "s", "er", "ment", "ive"];

/// Unigram and bigram statistics over stems, suffixes, and their bytes.
static SCORER: LazyLock<BigramScorer> = LazyLock::new(|| {
    let mut unigrams = String::new();
    let mut bigrams = String::new();
    for (idx, stem) in STEMS.iter().enumerate() {
        unigrams.push_str(&format!("{stem} {}\n", 50 + idx * 7));
        for (jdx, suffix) in SUFFIXES.iter().enumerate() {
            bigrams.push_str(&format!("{stem} {suffix} {}\n", 1 + (idx + jdx) % 9));
        }
    }
    for (jdx, suffix) in SUFFIXES.iter().enumerate() {
        unigrams.push_str(&format!("{suffix} {}\n", 80 + jdx * 5));
    }
    for byte in b'a'..=b'z' {
        let byte = byte as char;
        if !STEMS.contains(&byte.to_string().as_str())
            && !SUFFIXES.contains(&byte.to_string().as_str())
        {
            unigrams.push_str(&format!("{byte} 3\n"));
        }
    }

    BigramScorer::new(
        read_unigram_stats(unigrams.as_bytes()).unwrap(),
        read_bigram_stats(bigrams.as_bytes()).unwrap(),
    )
});

fn words() -> Vec<String> {
    let mut words = Vec::new();
    for prefix in STEMS {
        for stem in STEMS {
            for suffix in SUFFIXES {
                words.push(format!("{prefix}{stem}{suffix}"));
            }
        }
    }
    words
}

fn total_bytes(words: &[String]) -> usize {
    words.iter().map(String::len).sum()
}

#[divan::bench]
fn viterbi(bencher: Bencher) {
    let words = words();
    let scorer = &*SCORER;
    let max_len = scorer.max_subword_length();
    bencher
        .counter(BytesCount::new(total_bytes(&words)))
        .bench(|| {
            for word in &words {
                black_box(viterbi_segment(black_box(word.as_bytes()), scorer, max_len));
            }
        });
}

#[divan::bench(args = [1, 4, 16])]
fn beam(
    bencher: Bencher,
    beam_size: usize,
) {
    let words = words();
    let scorer = &*SCORER;
    let max_len = scorer.max_subword_length();
    bencher
        .counter(BytesCount::new(total_bytes(&words)))
        .bench(|| {
            for word in &words {
                black_box(beam_search_segment(
                    black_box(word.as_bytes()),
                    scorer,
                    max_len,
                    beam_size,
                ));
            }
        });
}
