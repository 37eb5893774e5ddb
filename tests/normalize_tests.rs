use statute_segmenter::normalize;

#[test]
fn strips_rtf_control_words_and_braces() {
    let input = r"{\rtf1\ansi Ovo je zakon.\par Slijedi red.\tab Uvučeno.}";
    let out = normalize(input);
    assert!(out.contains("Ovo je zakon."));
    assert!(out.contains("Slijedi red."));
    assert!(out.contains('\n'));
    assert!(out.contains('\t'));
    assert!(!out.contains('\\'));
    assert!(!out.contains('{'));
    assert!(!out.contains('}'));
}

#[test]
fn decodes_rtf_unicode_escapes() {
    let out = normalize(r"\u268?lan 1. Tekst.");
    assert_eq!(out, "Član 1. Tekst.");
}

#[test]
fn negative_rtf_unicode_values_do_not_panic() {
    let out = normalize(r"\u-3913?tekst");
    assert!(!out.contains('\\'));
    assert!(out.ends_with("tekst"));
}

#[test]
fn replaces_non_breaking_space() {
    assert_eq!(normalize("Član\u{00A0}5. Tekst."), "Član 5. Tekst.");
}

#[test]
fn repairs_latin1_mojibake() {
    // "Član" in UTF-8 bytes (C4 8C 6C 61 6E) read back as Latin-1
    let garbled = "\u{00C4}\u{008C}lan 1. Tekst.";
    assert_eq!(normalize(garbled), "Član 1. Tekst.");
}

#[test]
fn leaves_genuine_diacritics_alone_when_repair_fails() {
    // Contains the Ä marker but the byte sequence is not valid UTF-8
    assert_eq!(normalize("Änderung 5"), "Änderung 5");
}

#[test]
fn composes_decomposed_diacritics() {
    // C + combining caron
    assert_eq!(normalize("C\u{030C}lan 1."), "Član 1.");
}

#[test]
fn collapses_spaced_out_headings() {
    assert_eq!(normalize("Č l a n 5. Tekst."), "Član 5. Tekst.");
    assert_eq!(normalize("Ч л а н 7. Текст."), "Члан 7. Текст.");
    assert_eq!(normalize("Č l. 9. Tekst."), "Čl. 9. Tekst.");
}

#[test]
fn collapsed_headings_keep_case_shape() {
    assert_eq!(normalize("Č L A N 3. NASLOV"), "ČLAN 3. NASLOV");
    assert_eq!(normalize("prema č lanu ovog zakona"), "prema članu ovog zakona");
}

#[test]
fn unspaced_text_is_untouched() {
    let clean = "Član 1. Prvi tekst.\nČlan 2. Drugi tekst.";
    assert_eq!(normalize(clean), clean);
}

#[test]
fn normalize_is_idempotent() {
    let samples = [
        "Uvod text.\n\nČlan 1. Prvi tekst.",
        "Č l a n 5. Tekst.",
        r"{\rtf1 Zakon.\par Član 1. Tekst.}",
        "\u{00C4}\u{008C}lan 1. Tekst.",
        "Члан 1. Текст.",
        "",
    ];
    for sample in samples {
        let once = normalize(sample);
        assert_eq!(normalize(&once), once, "not idempotent for {:?}", sample);
    }
}
