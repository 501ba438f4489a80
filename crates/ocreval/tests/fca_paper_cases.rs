//! Flexible character accuracy scenarios.
//!
//! The extended cases rebuild the example layouts of figure 4 in Clausner et al.,
//! "Flexible character accuracy measure for reading-order-independent evaluation"
//! (doi:10.1016/j.patrec.2020.02.003) from a fixed sentence.

use ocreval::fca::{
    Coefficients, CoefficientGrid, FlexibleCharacterAccuracy, Part, character_accuracy, character_accuracy_for_matches,
    flexible_character_accuracy, initialize_lines,
};

const SENTENCE: [&str; 12] = [
    "Eight", "happy", "frogs", "scuba", "dived", "Jenny", "chick", "flaps", "white", "wings", "", "\n",
];

/// Join the selected sentence words with spaces; index 11 is a line break.
fn extended_case_text(words: &[usize]) -> String {
    words
        .iter()
        .map(|&i| SENTENCE[i])
        .collect::<Vec<_>>()
        .join(" ")
        .replace(" \n ", "\n")
}

/// `(gt, ocr, score)` for the simple and complex cases.
fn simple_and_complex_cases() -> Vec<(&'static str, &'static str, f64)> {
    vec![
        ("a", "", 0.0),
        ("a", "a", 1.0),
        ("a\nb", "a\nb", 1.0),
        ("a\nb", "b\na", 1.0),
        ("aaa\nbbb\nccc", "ccc\naaa\nbbb", 1.0),
        ("aaa\nbbb\nccc", "aaa\nbbb", 1.0 - 3.0 / 9.0),
        ("bbb", "aaa\nbbb\nccc", 1.0 - 6.0 / 3.0),
        ("a", "a\nbb\nccc", 1.0 - 5.0 / 1.0),
        ("bb", "a\nbb\nccc", 1.0 - 4.0 / 2.0),
        ("accc", "a\nbb\nccc", 1.0 - 2.0 / 4.0),
        ("aaa\nbbb\nccc", "bbb", 1.0 - 6.0 / 9.0),
    ]
}

/// `(name, gt words, ocr words, score)` for the layouts of figure 4.
fn extended_cases() -> Vec<(&'static str, Vec<usize>, Vec<usize>, f64)> {
    vec![
        (
            "A: no errors",
            vec![0, 1, 2, 3, 4, 11, 5, 6, 7, 8, 9],
            vec![0, 1, 2, 3, 4, 11, 5, 6, 7, 8, 9],
            1.0,
        ),
        (
            "B: different ordering of text blocks",
            vec![0, 1, 2, 3, 4, 11, 5, 6, 7, 8, 9],
            vec![5, 6, 7, 8, 9, 11, 0, 1, 2, 3, 4],
            1.0,
        ),
        (
            "C: merge across columns",
            vec![0, 1, 2, 11, 3, 4, 11, 5, 6, 7, 11, 8, 9],
            vec![0, 1, 2, 5, 6, 7, 11, 3, 4, 8, 9],
            0.964,
        ),
        (
            "D: over-segmentation",
            vec![0, 1, 2, 3, 4, 11, 5, 6, 7, 8, 9],
            vec![0, 1, 2, 11, 5, 6, 7, 11, 3, 4, 11, 8, 9],
            0.966,
        ),
        (
            "E: part missing",
            vec![0, 1, 2, 3, 4, 11, 5, 6, 7, 8, 9],
            vec![0, 1, 2, 3, 4],
            0.5,
        ),
        (
            "E.2: part missing",
            vec![0, 1, 2, 3, 4, 11, 5, 6, 7, 8, 9],
            vec![5, 6, 7, 8, 9],
            0.5,
        ),
        ("F: all missing", vec![0, 1, 2, 3, 4, 11, 5, 6, 7, 8, 9], vec![], 0.0),
        ("G: added parts", vec![0, 1, 2, 3, 4], vec![0, 1, 2, 3, 4, 11, 5, 6], 0.621),
    ]
}

#[test]
fn test_extended_case_text() {
    assert_eq!(
        extended_case_text(&[0, 1, 11, 5]),
        "Eight happy\nJenny",
        "line break marker should swallow the surrounding spaces"
    );
}

#[test]
fn test_simple_and_complex_cases() {
    for (gt, ocr, expected) in simple_and_complex_cases() {
        let result = flexible_character_accuracy(gt, ocr);
        assert!(
            (result.score - expected).abs() < 1e-9,
            "{gt:?} vs {ocr:?}: expected {expected}, got {}",
            result.score
        );
    }
}

#[test]
fn test_extended_cases() {
    let engine = FlexibleCharacterAccuracy::default();
    for (name, gt, ocr, expected) in extended_cases() {
        let result = engine.evaluate(&extended_case_text(&gt), &extended_case_text(&ocr));
        assert!(
            (result.score - expected).abs() < 0.001,
            "case {name}: expected {expected}, got {}",
            result.score
        );
        engine.clear_cache();
    }
}

#[test]
fn test_default_coefficients_alone_reproduce_scores() {
    let engine = FlexibleCharacterAccuracy::default();
    let coefficients = Coefficients::default();

    let mut cases: Vec<(String, String, f64)> = simple_and_complex_cases()
        .into_iter()
        .map(|(gt, ocr, score)| (gt.to_string(), ocr.to_string(), score))
        .collect();
    cases.extend(
        extended_cases()
            .into_iter()
            .map(|(_, gt, ocr, score)| (extended_case_text(&gt), extended_case_text(&ocr), score)),
    );

    for (gt, ocr, expected) in cases {
        let matches = engine.match_with_coefficients(&gt, &ocr, &coefficients);
        let score = character_accuracy_for_matches(&matches);
        assert!(
            (score - expected).abs() < 0.001,
            "{gt:?} vs {ocr:?}: expected {expected}, got {score}"
        );
    }
}

#[test]
fn test_single_point_grid_matches_default_coefficients() {
    let gt = extended_case_text(&[0, 1, 2, 11, 3, 4, 11, 5, 6, 7, 11, 8, 9]);
    let ocr = extended_case_text(&[0, 1, 2, 5, 6, 7, 11, 3, 4, 8, 9]);

    let engine = FlexibleCharacterAccuracy::default()
        .with_grid(CoefficientGrid::single(Coefficients::default()))
        .unwrap();
    let result = engine.evaluate(&gt, &ocr);

    assert_eq!(result.coefficients, Coefficients::default());
    assert!((result.score - 0.964).abs() < 0.001, "got {}", result.score);
}

#[test]
fn test_first_greedy_step_on_simple_cases() {
    let engine = FlexibleCharacterAccuracy::default();
    let cases = [
        ("a", "", 0.0),
        ("a", "a", 1.0),
        ("a\nb", "b\na", 1.0),
        ("aaa\nbbb\nccc", "aaa\nbbb", 1.0),
        ("bbb", "aaa\nbbb\nccc", 1.0),
        ("a", "a\nbb\nccc", 1.0),
    ];
    for (gt, ocr, expected) in cases {
        let mut gt_lines = initialize_lines(gt);
        let mut ocr_lines = initialize_lines(ocr);
        let first = engine.match_longest_gt_lines(&mut gt_lines, &mut ocr_lines, &Coefficients::default());
        let score = first.map_or(0.0, |m| character_accuracy(&m.dist));
        assert_eq!(score, expected, "{gt:?} vs {ocr:?}");
    }
}

#[test]
fn test_matches_cover_every_character_once() {
    let gt = extended_case_text(&[0, 1, 2, 3, 4, 11, 5, 6, 7, 8, 9]);
    let ocr = extended_case_text(&[0, 1, 2, 11, 5, 6, 7, 11, 3, 4, 11, 8, 9]);
    let result = flexible_character_accuracy(&gt, &ocr);

    let gt_chars = gt.chars().filter(|c| *c != '\n').count();
    let ocr_chars = ocr.chars().filter(|c| *c != '\n').count();
    let total = result.distance();
    assert_eq!(total.reference_len(), gt_chars);
    assert_eq!(total.compared_len(), ocr_chars);

    // Ground truth fragments of one line never overlap
    let mut fragments: Vec<&Part> = result.matches.iter().map(|m| &m.gt).filter(|p| !p.is_empty()).collect();
    fragments.sort_by_key(|p| (p.line(), p.start()));
    for pair in fragments.windows(2) {
        if pair[0].line() == pair[1].line() {
            assert!(pair[0].end() <= pair[1].start(), "{:?} overlaps {:?}", pair[0], pair[1]);
        }
    }
}
