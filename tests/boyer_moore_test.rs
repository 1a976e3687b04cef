use std::sync::Arc;
use std::thread;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use bmfind::search::{BoyerMooreSearch, NaiveSearch, Searcher};

fn random_string(rng: &mut StdRng, alphabet: &[char], len: usize) -> String {
    (0..len)
        .map(|_| alphabet[rng.random_range(0..alphabet.len())])
        .collect()
}

#[test]
fn abaaba_ab() {
    assert_eq!(BoyerMooreSearch::new("ABAABA", "AB").find_all_matches(), vec![0, 3]);
}

#[test]
fn abaaba_abc_absent() {
    assert!(BoyerMooreSearch::new("ABAABA", "ABC").find_all_matches().is_empty());
}

#[test]
fn aaaa_aa_overlapping() {
    assert_eq!(BoyerMooreSearch::new("AAAA", "AA").find_all_matches(), vec![0, 1, 2]);
}

#[test]
fn empty_text() {
    assert!(BoyerMooreSearch::new("", "A").find_all_matches().is_empty());
}

#[test]
fn pattern_longer_than_text() {
    assert!(BoyerMooreSearch::new("AB", "ABAB").find_all_matches().is_empty());
}

#[test]
fn match_only_at_final_alignment() {
    let text = "the quick brown fox";
    let bm = BoyerMooreSearch::new(text, "fox");
    assert_eq!(bm.find_all_matches(), vec![16]);
    assert_eq!(bm.first_mismatch_offset(16), None);
}

#[test]
fn find_all_is_idempotent() {
    let bm = BoyerMooreSearch::new("abracadabra", "abra");
    let first = bm.find_all_matches();
    let second = bm.find_all_matches();
    assert_eq!(first, vec![0, 7]);
    assert_eq!(first, second);
}

#[test]
fn every_match_is_sound() {
    let text = "she sells sea shells by the sea shore";
    let pattern = "se";
    let chars: Vec<char> = text.chars().collect();
    let m = pattern.chars().count();
    for i in BoyerMooreSearch::new(text, pattern).find_all_matches() {
        let window: String = chars[i..i + m].iter().collect();
        assert_eq!(window, pattern);
    }
}

#[test]
fn agrees_with_naive_on_random_inputs() {
    let mut rng = StdRng::seed_from_u64(0x5eed);
    let alphabets: [&[char]; 3] = [&['a', 'b'], &['a', 'b', 'c', 'd'], &['x', 'y', 'é', '🦀']];

    for _ in 0..2_000 {
        let alphabet = alphabets[rng.random_range(0..alphabets.len())];
        let text_len = rng.random_range(0..40);
        let pattern_len = rng.random_range(1..6);
        let text = random_string(&mut rng, alphabet, text_len);
        let pattern = random_string(&mut rng, alphabet, pattern_len);

        let expected = NaiveSearch.find_all(&text, &pattern);
        let actual = BoyerMooreSearch::new(&text, &pattern).find_all_matches();
        assert_eq!(actual, expected, "text={text:?} pattern={pattern:?}");
    }
}

#[test]
fn patterns_cut_from_text_are_found() {
    let mut rng = StdRng::seed_from_u64(42);
    for _ in 0..500 {
        let text = random_string(&mut rng, &['g', 'a', 't', 'c'], 64);
        let start = rng.random_range(0..60);
        let len = rng.random_range(1..=4);
        let pattern: String = text.chars().skip(start).take(len).collect();

        let matches = BoyerMooreSearch::new(&text, &pattern).find_all_matches();
        assert!(matches.contains(&start), "text={text:?} pattern={pattern:?}");
    }
}

#[test]
fn shared_instance_across_threads() {
    let text = "ab".repeat(500);
    let bm = Arc::new(BoyerMooreSearch::new(&text, "bab"));
    let expected = bm.find_all_matches();
    assert_eq!(expected.len(), 499);

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let bm = Arc::clone(&bm);
            thread::spawn(move || bm.find_all_matches())
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap(), expected);
    }
}
