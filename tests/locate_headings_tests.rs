use statute_segmenter::{locate_headings, Script};

#[test]
fn finds_every_strict_heading() {
    let text = "Član 1. Prvi tekst.\nČlan 2. Drugi tekst.\nČlan 3. Treći tekst.\n";
    let scan = locate_headings(text);
    assert_eq!(scan.matches.len(), 3);
    assert!(scan.missing.is_empty());
    let numbers: Vec<u32> = scan.matches.iter().map(|m| m.number).collect();
    assert_eq!(numbers, vec![1, 2, 3]);
    assert!(scan.matches.iter().all(|m| m.script == Script::Latin));
    assert!(scan.matches.windows(2).all(|w| w[0].offset < w[1].offset));
}

#[test]
fn tolerates_mixed_heading_punctuation() {
    let text = "Član 1. Prvi.\nČlan 2 . Drugi.\nČlan 3 Treći bez interpunkcije.\nČlan 4. Četvrti.\n";
    let scan = locate_headings(text);
    assert!(scan.missing.is_empty());
    let numbers: Vec<u32> = scan.matches.iter().map(|m| m.number).collect();
    assert_eq!(numbers, vec![1, 2, 3, 4]);
}

#[test]
fn finds_inline_heading_before_uppercase_word() {
    let text = "Član 1. Prvi. Član 2 NASLOV DRUGOG dijela slijedi.\nČlan 3. Kraj.\n";
    let scan = locate_headings(text);
    assert!(scan.missing.is_empty());
    let numbers: Vec<u32> = scan.matches.iter().map(|m| m.number).collect();
    assert_eq!(numbers, vec![1, 2, 3]);
}

#[test]
fn finds_inline_heading_without_punctuation() {
    let text = "Član 1. Prvi. Član 2 nastavlja se malim slovima.\nČlan 3. Kraj.\n";
    let scan = locate_headings(text);
    assert!(scan.missing.is_empty());
    assert_eq!(scan.matches.len(), 3);
}

#[test]
fn matches_are_in_document_order_not_numeric_order() {
    let text = "Član 2. Drugi dolazi prvi.\nČlan 1. Prvi dolazi poslije.\n";
    let scan = locate_headings(text);
    let numbers: Vec<u32> = scan.matches.iter().map(|m| m.number).collect();
    assert_eq!(numbers, vec![2, 1]);
}

#[test]
fn tags_cyrillic_headings() {
    let text = "Члан 1. Први текст.\nЧлан 2. Други текст.\n";
    let scan = locate_headings(text);
    assert_eq!(scan.matches.len(), 2);
    assert!(scan.matches.iter().all(|m| m.script == Script::Cyrillic));
}

#[test]
fn latin_heading_before_cyrillic_caps_word_stays_latin() {
    let text = "Član 1. Prvi tekst. Član 2 НАСЛОВ на ћирилици иде даље.\nČlan 3. Kraj.";
    let scan = locate_headings(text);
    assert!(scan.missing.is_empty());
    let two = scan.matches.iter().find(|m| m.number == 2).unwrap();
    assert_eq!(two.script, Script::Latin);
}

#[test]
fn reports_unresolved_numbers_as_missing() {
    let text = "Član 1. Prvi.\nČlan 2. Drugi.\nČlan 4. Četvrti.\n";
    let scan = locate_headings(text);
    assert_eq!(scan.matches.len(), 3);
    assert_eq!(scan.missing, vec![3]);
}

#[test]
fn falls_back_to_permissive_scan_without_strict_headings() {
    let text = "uvodna napomena Član 1 pa onda Član 2 bez ikakve interpunkcije";
    let scan = locate_headings(text);
    let numbers: Vec<u32> = scan.matches.iter().map(|m| m.number).collect();
    assert_eq!(numbers, vec![1, 2]);
    assert!(scan.missing.is_empty());
}

#[test]
fn tolerates_kerning_whitespace_inside_the_token() {
    let text = "Č lan 1. Tekst prvog člana.\n";
    let scan = locate_headings(text);
    assert_eq!(scan.matches.len(), 1);
    assert_eq!(scan.matches[0].number, 1);
    assert_eq!(scan.matches[0].offset, 0);
}

#[test]
fn abbreviated_cl_token_is_recognized() {
    let text = "Čl. 1. Prvi tekst.\nČl. 2. Drugi tekst.\n";
    let scan = locate_headings(text);
    assert_eq!(scan.matches.len(), 2);
    assert!(scan.missing.is_empty());
}

#[test]
fn clanak_variant_is_recognized() {
    let text = "Članak 1. Prvi tekst.\nČlanak 2. Drugi tekst.\n";
    let scan = locate_headings(text);
    assert_eq!(scan.matches.len(), 2);
    assert!(scan.missing.is_empty());
}
