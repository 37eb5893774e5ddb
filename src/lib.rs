use std::collections::HashSet;
use std::path::{Path, PathBuf};

use globwalk::GlobWalkerBuilder;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use unicode_normalization::UnicodeNormalization;

/// Separator inserted between per-page texts when building the full document.
pub const PAGE_SEPARATOR: &str = "\n\n";

/// Default cap on a single segment's text, against runaway slices on corrupted input.
pub const MAX_SLICE_LEN: usize = 15_000;
/// Cap on the intro segment when a document has no detected articles at all.
const INTRO_SLICE_LEN: usize = 4_000;
/// Cap on a segment recovered by the gap heuristic.
const GAP_SLICE_LEN: usize = 2_000;

const INTRO_LABEL: &str = "Uvod";

// Whitespace that PDF text layers leak into and around heading tokens:
// plain space, NBSP, and the general-punctuation spaces.
const HEADING_WS: &str = r"[ \x{00A0}\x{2000}-\x{200B}]";
// Whitespace accepted after an article number (newlines included).
const TRAIL_WS: &str = r"[\s\x{00A0}\x{2000}-\x{200B}]";
// Punctuation observed terminating article headings across the corpus.
const TERMINAL_MARK: &str = r"[-.:\x{2013}\x{2014}]";

// ---------------------------------------------------------------------------
// Text normalizer
// ---------------------------------------------------------------------------

static RTF_UNICODE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\\u(-?\d{1,6}) ?\??").unwrap());
static RTF_BREAK_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\\(?:par|line)\b ?").unwrap());
static RTF_TAB_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\\tab\b ?").unwrap());
static RTF_CONTROL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\\[a-zA-Z]{1,32}(?:-?\d{1,6})? ?").unwrap());

static SPACED_CLAN_RE: Lazy<Regex> = Lazy::new(|| {
    let w = HEADING_WS;
    Regex::new(&format!(r"(?i)\b[čc](?:{w})*l(?:{w})*a(?:{w})*n")).unwrap()
});
static SPACED_CL_RE: Lazy<Regex> = Lazy::new(|| {
    let w = HEADING_WS;
    Regex::new(&format!(r"(?i)\b[čc](?:{w})*l(?:{w})*\.")).unwrap()
});
static SPACED_CYR_RE: Lazy<Regex> = Lazy::new(|| {
    let w = HEADING_WS;
    Regex::new(&format!(r"(?i)\bч(?:{w})*л(?:{w})*а(?:{w})*н")).unwrap()
});

/// Repair encoding artifacts and canonicalize heading spellings.
/// Idempotent on already-clean text; never panics on malformed input.
///
/// Order matters: RTF stripping, NBSP replacement, mojibake repair,
/// NFC composition, then collapse of spaced-out heading tokens.
pub fn normalize(text: &str) -> String {
    let stripped = strip_rtf(text);
    let unspaced = stripped.replace('\u{00A0}', " ");
    // Ã/Ä/Å are the telltale lead bytes of Latin-1 text re-read as UTF-8.
    let repaired = if unspaced.contains(['Ã', 'Ä', 'Å']) {
        repair_mojibake(&unspaced).unwrap_or(unspaced)
    } else {
        unspaced
    };
    let composed: String = repaired.nfc().collect();
    collapse_spaced_tokens(&composed)
}

/// Strip RTF control codes. Cheap no-op on plain text.
fn strip_rtf(text: &str) -> String {
    if !text.contains('\\') && !text.contains('{') && !text.contains('}') {
        return text.to_string();
    }
    let decoded = RTF_UNICODE_RE.replace_all(text, |caps: &Captures| {
        // RTF \uN carries a signed 16-bit decimal code point.
        let raw: i64 = caps[1].parse().unwrap_or(0);
        let code = if raw < 0 { raw + 65_536 } else { raw };
        u32::try_from(code)
            .ok()
            .and_then(char::from_u32)
            .map(String::from)
            .unwrap_or_default()
    });
    let with_breaks = RTF_BREAK_RE.replace_all(&decoded, "\n");
    let with_tabs = RTF_TAB_RE.replace_all(&with_breaks, "\t");
    let plain = RTF_CONTROL_RE.replace_all(&with_tabs, "");
    plain.replace(['{', '}'], "")
}

/// Re-decode text whose code points are really Latin-1 bytes of UTF-8 data.
/// Returns None when any code point exceeds 0xFF or the bytes are not UTF-8.
fn repair_mojibake(text: &str) -> Option<String> {
    let mut bytes = Vec::with_capacity(text.len());
    for ch in text.chars() {
        let code = u32::from(ch);
        if code > 0xFF {
            return None;
        }
        bytes.push(code as u8);
    }
    String::from_utf8(bytes).ok()
}

fn is_heading_ws(c: char) -> bool {
    matches!(c, ' ' | '\u{00A0}') || ('\u{2000}'..='\u{200B}').contains(&c)
}

/// Undo PDF kerning artifacts that insert whitespace inside heading words
/// ("Č lan" -> "Član"). Unspaced occurrences are left byte-for-byte intact.
fn collapse_spaced_tokens(text: &str) -> String {
    let pass = SPACED_CLAN_RE.replace_all(text, |caps: &Captures| {
        collapse_match(&caps[0], "Član", "Clan")
    });
    let pass = SPACED_CL_RE.replace_all(&pass, |caps: &Captures| {
        collapse_match(&caps[0], "Čl.", "Cl.")
    });
    let pass = SPACED_CYR_RE.replace_all(&pass, |caps: &Captures| {
        collapse_match(&caps[0], "Члан", "Члан")
    });
    pass.into_owned()
}

fn collapse_match(matched: &str, canon_caron: &str, canon_plain: &str) -> String {
    let squeezed: String = matched.chars().filter(|c| !is_heading_ws(*c)).collect();
    if squeezed.chars().count() == matched.chars().count() {
        return matched.to_string();
    }
    let canon = if squeezed.starts_with(['č', 'Č', 'ч', 'Ч']) {
        canon_caron
    } else {
        canon_plain
    };
    recase(canon, &squeezed)
}

/// Apply the observed token's case shape to the canonical spelling.
fn recase(canon: &str, observed: &str) -> String {
    let letters: Vec<char> = observed.chars().filter(|c| c.is_alphabetic()).collect();
    if letters.len() > 1 && letters.iter().all(|c| c.is_uppercase()) {
        canon.to_uppercase()
    } else if letters.first().map(|c| c.is_lowercase()).unwrap_or(false) {
        canon.to_lowercase()
    } else {
        canon.to_string()
    }
}

// ---------------------------------------------------------------------------
// Page index
// ---------------------------------------------------------------------------

/// Maps byte offsets in the joined document back to 1-based page numbers.
#[derive(Debug, Clone)]
pub struct PageIndex {
    offsets: Vec<usize>,
}

impl PageIndex {
    /// Page whose half-open range contains `offset`. Offsets before the first
    /// recorded start fall back to page 1.
    pub fn page_for_offset(&self, offset: usize) -> u32 {
        let page = self.offsets.partition_point(|&start| start <= offset);
        page.max(1) as u32
    }

    pub fn page_count(&self) -> usize {
        self.offsets.len()
    }
}

/// Join per-page texts with `separator` and record each page's start offset.
pub fn build_page_index(pages: &[String], separator: &str) -> (String, PageIndex) {
    let mut offsets = Vec::with_capacity(pages.len());
    let mut full = String::with_capacity(pages.iter().map(|p| p.len() + separator.len()).sum());
    for (i, page) in pages.iter().enumerate() {
        if i > 0 {
            full.push_str(separator);
        }
        offsets.push(full.len());
        full.push_str(page);
    }
    if offsets.is_empty() {
        offsets.push(0);
    }
    (full, PageIndex { offsets })
}

// ---------------------------------------------------------------------------
// Heading locator
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Script {
    Latin,
    Cyrillic,
}

/// A located article heading. `recovered` marks matches found only by the
/// gap-filling heuristic; their segments get a short slice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeadingMatch {
    pub offset: usize,
    pub number: u32,
    pub script: Script,
    pub recovered: bool,
}

/// Locator output: matches sorted by offset with unique numbers, plus the
/// article numbers in 1..=max that no cascade pattern resolved.
#[derive(Debug, Clone, Default)]
pub struct HeadingScan {
    pub matches: Vec<HeadingMatch>,
    pub missing: Vec<u32>,
}

// Heading token: Član/Clan/Članak/Clanak/Čl./Cl. and Члан/Чл., tolerant of
// kerning whitespace between letters. Case folding comes from (?i) at use sites.
static HEADING_TOKEN: Lazy<String> = Lazy::new(|| {
    let w = HEADING_WS;
    format!(
        "(?:[čc](?:{w})*l(?:{w})*a(?:{w})*n(?:(?:{w})*a(?:{w})*k)?\
         |[čc](?:{w})*l(?:{w})*\\.\
         |ч(?:{w})*л(?:{w})*а(?:{w})*н\
         |ч(?:{w})*л(?:{w})*\\.)"
    )
});

static STRICT_HEADING_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"(?i)\b{token}(?:{w})+(\d{{1,3}}){term}",
        token = HEADING_TOKEN.as_str(),
        w = HEADING_WS,
        term = TERMINAL_MARK
    ))
    .unwrap()
});

static PERMISSIVE_HEADING_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"(?i)\b{token}(?:{w})*(\d{{1,3}})(?:{w})*(?:{term})?",
        token = HEADING_TOKEN.as_str(),
        w = HEADING_WS,
        term = TERMINAL_MARK
    ))
    .unwrap()
});

/// Escalating patterns for one article number, strictest first. The required
/// trailing whitespace in the no-terminal forms doubles as the "not followed
/// by another digit" guard, and the uppercase lookahead is expressed by
/// consuming the letter; downstream only the match start and the text before
/// the digits are used, so the extra consumed letter is inert.
fn cascade_patterns(n: u32) -> [String; 5] {
    let token = HEADING_TOKEN.as_str();
    let w = HEADING_WS;
    let t = TRAIL_WS;
    let term = TERMINAL_MARK;
    [
        // (a) strict: line-anchored, terminal mark right after the number
        format!(r"(?im)^(?:{w})*{token}(?:{w})*{n}{term}"),
        // (b) loose: whitespace tolerated before the terminal mark
        format!(r"(?im)^(?:{w})*{token}(?:{w})*{n}(?:{w})*{term}"),
        // (c) no terminal mark, but line-anchored and whitespace-delimited
        format!(r"(?im)^(?:{w})*{token}(?:{w})*{n}(?:{t})+"),
        // (d) inline, heading runs straight into an uppercase first word
        format!(r"(?i)\b{token}(?:{w})*{n}(?:{t})+(?-i:\p{{Lu}})"),
        // (e) inline, whitespace-delimited
        format!(r"(?i)\b{token}(?:{w})*{n}(?:{t})+"),
    ]
}

/// Find article headings with the two-phase search: a strict global scan
/// fixes the article count ceiling, then each number is hunted individually
/// with the escalating cascade. When no strict heading exists anywhere the
/// whole text is scanned once with the permissive pattern instead.
pub fn locate_headings(text: &str) -> HeadingScan {
    let mut max_num = 0u32;
    for caps in STRICT_HEADING_RE.captures_iter(text) {
        if let Ok(n) = caps[1].parse::<u32>() {
            max_num = max_num.max(n);
        }
    }

    if max_num == 0 {
        return permissive_scan(text);
    }

    let mut matches = Vec::new();
    let mut missing = Vec::new();
    for n in 1..=max_num {
        match find_article(text, n) {
            Some(m) => matches.push(m),
            None => missing.push(n),
        }
    }
    // Document order, not numeric order: statutes occasionally present
    // articles out of sequence and slicing must follow the text.
    matches.sort_by_key(|m| m.offset);
    HeadingScan { matches, missing }
}

fn find_article(text: &str, n: u32) -> Option<HeadingMatch> {
    for pattern in cascade_patterns(n) {
        let re = Regex::new(&pattern).unwrap();
        if let Some(m) = re.find(text) {
            return Some(HeadingMatch {
                offset: m.start(),
                number: n,
                script: script_of(m.as_str()),
                recovered: false,
            });
        }
    }
    None
}

/// Fallback for badly-OCR'd documents with no strict heading at all: accept
/// every permissive match in reading order, first occurrence per number wins.
fn permissive_scan(text: &str) -> HeadingScan {
    let mut seen: HashSet<u32> = HashSet::new();
    let mut matches = Vec::new();
    for caps in PERMISSIVE_HEADING_RE.captures_iter(text) {
        let n: u32 = match caps[1].parse() {
            Ok(n) => n,
            Err(_) => continue,
        };
        // 0 stays reserved for the intro segment
        if n == 0 || !seen.insert(n) {
            continue;
        }
        let whole = caps.get(0).unwrap();
        matches.push(HeadingMatch {
            offset: whole.start(),
            number: n,
            script: script_of(whole.as_str()),
            recovered: false,
        });
    }
    HeadingScan {
        matches,
        missing: Vec::new(),
    }
}

/// Script of the heading token itself. Only the text before the article
/// number counts; cascade step (d) consumes the first letter of the body,
/// and that letter must not decide the label's script.
fn script_of(matched: &str) -> Script {
    let token = match matched.find(|c: char| c.is_ascii_digit()) {
        Some(i) => &matched[..i],
        None => matched,
    };
    if token
        .chars()
        .any(|c| ('\u{0400}'..='\u{04FF}').contains(&c))
    {
        Script::Cyrillic
    } else {
        Script::Latin
    }
}

/// One maximally permissive pass for the numbers the cascade could not place:
/// token, whitespace, number, no terminal constraint. Recall over precision,
/// except that the number must not continue with another digit, otherwise
/// hunting a missing 1 would land on the real article 10.
fn recover_missing(text: &str, missing: &[u32]) -> Vec<HeadingMatch> {
    let mut out = Vec::new();
    for &n in missing {
        let re = Regex::new(&format!(
            r"(?i)\b{token}(?:{t})+{n}(?:\D|$)",
            token = HEADING_TOKEN.as_str(),
            t = TRAIL_WS
        ))
        .unwrap();
        if let Some(m) = re.find(text) {
            out.push(HeadingMatch {
                offset: m.start(),
                number: n,
                script: script_of(m.as_str()),
                recovered: true,
            });
        }
    }
    out
}

// ---------------------------------------------------------------------------
// Segment builder
// ---------------------------------------------------------------------------

/// The engine's output record, ready for a persistence layer to
/// delete-and-reinsert under its own document id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Segment {
    pub label: String,
    pub number: u32,
    pub text: String,
    pub page_hint: u32,
}

fn article_label(script: Script, n: u32) -> String {
    match script {
        Script::Latin => format!("Član {}", n),
        Script::Cyrillic => format!("Члан {}", n),
    }
}

fn truncate_chars(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

/// Slice `full_text` between consecutive matches into labeled segments.
/// Zero matches degrade to a single "Uvod" segment over a bounded prefix;
/// non-whitespace preamble before the first heading becomes an "Uvod" too.
pub fn build_segments<F>(
    full_text: &str,
    matches: &[HeadingMatch],
    page_for_offset: F,
    max_slice_len: usize,
) -> Vec<Segment>
where
    F: Fn(usize) -> u32,
{
    if matches.is_empty() {
        return vec![Segment {
            label: INTRO_LABEL.to_string(),
            number: 0,
            text: truncate_chars(full_text, INTRO_SLICE_LEN).trim().to_string(),
            page_hint: 1,
        }];
    }

    // First occurrence in document order wins on duplicate numbers.
    let mut seen: HashSet<u32> = HashSet::new();
    let deduped: Vec<&HeadingMatch> = matches.iter().filter(|m| seen.insert(m.number)).collect();

    let mut segments = Vec::with_capacity(deduped.len() + 1);

    let preamble = &full_text[..deduped[0].offset];
    if !preamble.trim().is_empty() {
        segments.push(Segment {
            label: INTRO_LABEL.to_string(),
            number: 0,
            text: truncate_chars(preamble, max_slice_len).trim().to_string(),
            page_hint: 1,
        });
    }

    for (i, m) in deduped.iter().enumerate() {
        let end = deduped
            .get(i + 1)
            .map(|next| next.offset)
            .unwrap_or(full_text.len());
        let cap = if m.recovered { GAP_SLICE_LEN } else { max_slice_len };
        let slice = &full_text[m.offset..end.max(m.offset)];
        segments.push(Segment {
            label: article_label(m.script, m.number),
            number: m.number,
            text: truncate_chars(slice, cap).trim().to_string(),
            page_hint: page_for_offset(m.offset),
        });
    }
    segments
}

// ---------------------------------------------------------------------------
// Orchestrator
// ---------------------------------------------------------------------------

/// What to do with article numbers that neither the cascade nor the gap
/// heuristic could place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GapPolicy {
    /// Omit the number silently.
    Skip,
    /// Insert an empty-text segment at its numeric position.
    Placeholder,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SegmentOptions {
    pub disable_heuristics: bool,
    pub gap_policy: GapPolicy,
    pub max_slice_len: usize,
}

impl Default for SegmentOptions {
    fn default() -> Self {
        SegmentOptions {
            disable_heuristics: false,
            gap_policy: GapPolicy::Skip,
            max_slice_len: MAX_SLICE_LEN,
        }
    }
}

/// Segment a single pasted text blob. No pagination, so every page_hint is 1.
pub fn segment_text(text: &str, opts: &SegmentOptions) -> Vec<Segment> {
    let normalized = normalize(text);
    run_segmentation(&normalized, |_| 1, opts)
}

/// Segment per-page extracted text. Pages are normalized individually so the
/// joined offsets stay aligned with the page index, and page_hint reflects
/// the physical page of each heading.
pub fn segment_pages(pages: &[String], opts: &SegmentOptions) -> Vec<Segment> {
    let normalized: Vec<String> = pages.iter().map(|p| normalize(p)).collect();
    let (full_text, index) = build_page_index(&normalized, PAGE_SEPARATOR);
    run_segmentation(&full_text, |offset| index.page_for_offset(offset), opts)
}

fn run_segmentation<F>(full_text: &str, page_for_offset: F, opts: &SegmentOptions) -> Vec<Segment>
where
    F: Fn(usize) -> u32,
{
    let scan = locate_headings(full_text);
    let mut matches = scan.matches;
    let mut unresolved = scan.missing;

    if !opts.disable_heuristics && !unresolved.is_empty() {
        let recovered = recover_missing(full_text, &unresolved);
        unresolved.retain(|n| !recovered.iter().any(|m| m.number == *n));
        matches.extend(recovered);
        matches.sort_by_key(|m| m.offset);
    }

    let mut segments = build_segments(full_text, &matches, page_for_offset, opts.max_slice_len);
    if opts.gap_policy == GapPolicy::Placeholder {
        insert_placeholders(&mut segments, &unresolved);
    }
    segments
}

fn insert_placeholders(segments: &mut Vec<Segment>, unresolved: &[u32]) {
    let script = if segments.iter().any(|s| s.label.starts_with("Члан")) {
        Script::Cyrillic
    } else {
        Script::Latin
    };
    for &n in unresolved {
        let pos = segments
            .iter()
            .position(|s| s.number > n)
            .unwrap_or(segments.len());
        let page_hint = if pos > 0 { segments[pos - 1].page_hint } else { 1 };
        segments.insert(
            pos,
            Segment {
                label: article_label(script, n),
                number: n,
                text: String::new(),
                page_hint,
            },
        );
    }
}

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    Read(String),
    #[error("Failed to parse config: {0}")]
    Parse(String),
    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Per-deployment knobs. Jurisdictions with unreliable numbering set
/// `disable_heuristics: true` here rather than in code.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SegmenterConfig {
    #[serde(default)]
    pub disable_heuristics: bool,
    #[serde(default)]
    pub gap_policy: Option<GapPolicy>,
    #[serde(default)]
    pub max_slice_len: Option<usize>,
}

pub fn load_config(path: &Path) -> Result<SegmenterConfig, ConfigError> {
    let raw = std::fs::read_to_string(path).map_err(|e| ConfigError::Read(e.to_string()))?;
    let cfg: SegmenterConfig =
        serde_yaml::from_str(&raw).map_err(|e| ConfigError::Parse(e.to_string()))?;
    if cfg.max_slice_len == Some(0) {
        return Err(ConfigError::Invalid("max_slice_len must be positive".into()));
    }
    Ok(cfg)
}

impl SegmenterConfig {
    pub fn options(&self) -> SegmentOptions {
        SegmentOptions {
            disable_heuristics: self.disable_heuristics,
            gap_policy: self.gap_policy.unwrap_or(GapPolicy::Skip),
            max_slice_len: self.max_slice_len.unwrap_or(MAX_SLICE_LEN),
        }
    }
}

// ---------------------------------------------------------------------------
// Input enumeration and emit
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum EnumerateError {
    #[error("NoFilesFound")]
    NoFilesFound { guidance: String },
}

/// Enumerate input text files using a glob pattern (e.g., "./input/**/*.txt").
/// Returns a sorted list of paths.
pub fn enumerate_inputs(glob_pattern: &str) -> Result<Vec<PathBuf>, EnumerateError> {
    let root = if Path::new(glob_pattern).is_absolute() { "/" } else { "." };
    let mut pat = glob_pattern.to_string();
    if pat.starts_with("./") {
        pat = pat.trim_start_matches("./").to_string();
    }
    let mut paths: Vec<PathBuf> = GlobWalkerBuilder::from_patterns(root, &[pat.as_str()])
        .case_insensitive(false)
        .follow_links(false)
        .build()
        .map_err(|_| EnumerateError::NoFilesFound { guidance: folder_guidance() })?
        .filter_map(|e| e.ok())
        .map(|e| e.path().to_path_buf())
        .collect();

    paths.sort();
    paths.retain(|p| p.is_file());

    if paths.is_empty() {
        return Err(EnumerateError::NoFilesFound { guidance: folder_guidance() });
    }

    Ok(paths)
}

fn folder_guidance() -> String {
    let guide = r#"Nema ulaznih datoteka za obrazac ./input/**/*.txt
Preporučena struktura:
  ./input/ba/...
  ./input/rs/...
  ./input/me/...
Primjer: izvučeni tekst zakona u ./input/ba/zakon-o-radu.txt"#;
    guide.to_string()
}

#[derive(Debug, Error)]
pub enum EmitError {
    #[error("WriteFailed: {0}")]
    WriteFailed(String),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmitPaths {
    pub segments_path: String,
    pub meta_path: String,
}

/// Atomically write segments and meta JSON into outdir with doc_id stem.
pub fn emit_segments(
    segments: &[Segment],
    meta: &serde_json::Value,
    outdir: &str,
    doc_id: &str,
) -> Result<EmitPaths, EmitError> {
    std::fs::create_dir_all(outdir).map_err(|e| EmitError::WriteFailed(e.to_string()))?;
    let segments_path = Path::new(outdir).join(format!("{}.segments.json", doc_id));
    let meta_path = Path::new(outdir).join(format!("{}.meta.json", doc_id));

    // Write temp files then rename
    let pid = std::process::id();
    let segments_tmp = segments_path.with_extension(format!("json.tmp.{}", pid));
    let meta_tmp = meta_path.with_extension(format!("json.tmp.{}", pid));

    let segment_bytes =
        serde_json::to_vec_pretty(segments).map_err(|e| EmitError::WriteFailed(e.to_string()))?;
    std::fs::write(&segments_tmp, segment_bytes)
        .map_err(|e| EmitError::WriteFailed(e.to_string()))?;
    let meta_bytes =
        serde_json::to_vec_pretty(meta).map_err(|e| EmitError::WriteFailed(e.to_string()))?;
    std::fs::write(&meta_tmp, meta_bytes).map_err(|e| EmitError::WriteFailed(e.to_string()))?;

    std::fs::rename(&segments_tmp, &segments_path)
        .map_err(|e| EmitError::WriteFailed(e.to_string()))?;
    std::fs::rename(&meta_tmp, &meta_path).map_err(|e| EmitError::WriteFailed(e.to_string()))?;

    Ok(EmitPaths {
        segments_path: segments_path.to_string_lossy().to_string(),
        meta_path: meta_path.to_string_lossy().to_string(),
    })
}

// Utility to compute sha256 hex
pub fn sha256_hex(bytes: &[u8]) -> String {
    use sha2::{Digest, Sha256};
    use std::fmt::Write;
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hasher
        .finalize()
        .iter()
        .fold(String::with_capacity(64), |mut acc, b| {
            let _ = write!(acc, "{:02x}", b);
            acc
        })
}
