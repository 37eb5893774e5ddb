use std::collections::HashSet;
use std::path::Path;

use statute_segmenter::{
    emit_segments, enumerate_inputs, load_config, segment_pages, segment_text, sha256_hex,
    EnumerateError, GapPolicy, SegmenterConfig,
};

fn main() {
    // Simple CLI flags parsing
    let args: Vec<String> = std::env::args().collect();
    let mut glob_pattern = String::from("./input/**/*.txt");
    if let Some(pos) = args.iter().position(|a| a == "--glob") {
        if let Some(val) = args.get(pos + 1) {
            if !val.starts_with("--") {
                glob_pattern = val.clone();
            }
        }
    }
    let mut output_dir = String::from("./output");
    if let Some(pos) = args.iter().position(|a| a == "--out") {
        if let Some(val) = args.get(pos + 1) {
            if !val.starts_with("--") {
                output_dir = val.clone();
            }
        }
    }
    let mut config_path: Option<String> = None;
    if let Some(pos) = args.iter().position(|a| a == "--config") {
        if let Some(val) = args.get(pos + 1) {
            if !val.starts_with("--") {
                config_path = Some(val.clone());
            }
        }
    }
    let disable_heuristics_flag = args.iter().any(|a| a == "--disable-heuristics");
    let mut gap_policy_flag: Option<GapPolicy> = None;
    if let Some(pos) = args.iter().position(|a| a == "--gap-policy") {
        match args.get(pos + 1).map(|s| s.as_str()) {
            Some("skip") => gap_policy_flag = Some(GapPolicy::Skip),
            Some("placeholder") => gap_policy_flag = Some(GapPolicy::Placeholder),
            _ => {}
        }
    }
    let mut max_slice_flag: Option<usize> = None;
    if let Some(pos) = args.iter().position(|a| a == "--max-slice") {
        if let Some(val) = args.get(pos + 1) {
            if let Ok(n) = val.parse::<usize>() {
                max_slice_flag = Some(n.max(1));
            }
        }
    }

    // Track used slugs for uniqueness
    let mut used_doc_ids: HashSet<String> = HashSet::new();

    // 1) Config: explicit --config must parse; the default path is optional.
    let cfg_file = config_path.clone().unwrap_or_else(|| "segmenter.yaml".to_string());
    let cfg = if Path::new(&cfg_file).exists() {
        match load_config(Path::new(&cfg_file)) {
            Ok(c) => {
                eprintln!(
                    "{}",
                    serde_json::json!({
                        "tool":"load_config",
                        "file": cfg_file,
                        "status":"ok"
                    })
                );
                c
            }
            Err(e) => {
                eprintln!(
                    "{}",
                    serde_json::json!({
                        "tool":"load_config",
                        "file": cfg_file,
                        "error": e.to_string(),
                        "error_code": 3
                    })
                );
                std::process::exit(3);
            }
        }
    } else if config_path.is_some() {
        eprintln!(
            "{}",
            serde_json::json!({
                "tool":"load_config",
                "file": cfg_file,
                "error":"config file not found",
                "error_code": 3
            })
        );
        std::process::exit(3);
    } else {
        SegmenterConfig::default()
    };

    let mut opts = cfg.options();
    if disable_heuristics_flag {
        opts.disable_heuristics = true;
    }
    if let Some(policy) = gap_policy_flag {
        opts.gap_policy = policy;
    }
    if let Some(cap) = max_slice_flag {
        opts.max_slice_len = cap;
    }

    // 2) Enumerate inputs
    let files = match enumerate_inputs(&glob_pattern) {
        Ok(files) => {
            eprintln!(
                "{}",
                serde_json::json!({
                    "tool":"enumerate_inputs",
                    "count": files.len()
                })
            );
            files
        }
        Err(err) => {
            let guidance = match err {
                EnumerateError::NoFilesFound { guidance } => guidance,
            };
            eprintln!(
                "{}",
                serde_json::json!({
                    "tool":"enumerate_inputs",
                    "error":"NoFilesFound",
                    "error_code": 1
                })
            );
            eprintln!("{}", guidance);
            std::process::exit(1);
        }
    };

    // 3) Segment each document independently
    for file in files {
        let fname = file
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("doc.txt")
            .to_string();
        let base = fname.trim_end_matches(".txt");
        let doc_id = unique_slug(slugify(base), &mut used_doc_ids);

        let raw = match std::fs::read_to_string(&file) {
            Ok(raw) => raw,
            Err(e) => {
                eprintln!(
                    "{}",
                    serde_json::json!({
                        "tool":"read_input",
                        "file": file,
                        "error": e.to_string(),
                        "error_code": 1
                    })
                );
                std::process::exit(1);
            }
        };

        // pdftotext leaves form feeds between pages; paginated input keeps
        // genuine page hints, a plain blob gets page_hint 1 throughout.
        let (segments, page_count) = if raw.contains('\u{000C}') {
            let mut pages: Vec<String> = raw.split('\u{000C}').map(|p| p.to_string()).collect();
            while matches!(pages.last(), Some(last) if last.trim().is_empty()) {
                pages.pop();
            }
            let count = pages.len();
            (segment_pages(&pages, &opts), count)
        } else {
            (segment_text(&raw, &opts), 1)
        };

        let article_count = segments.iter().filter(|s| s.number > 0).count();
        eprintln!(
            "{}",
            serde_json::json!({
                "tool":"segment",
                "file": file,
                "pages": page_count,
                "segments": segments.len(),
                "articles": article_count
            })
        );

        let fingerprint = sha256_hex(&serde_json::to_vec(&segments).unwrap_or_default());
        let gap_policy = match opts.gap_policy {
            GapPolicy::Skip => "skip",
            GapPolicy::Placeholder => "placeholder",
        };
        let meta = serde_json::json!({
            "doc_id": doc_id,
            "page_count": page_count,
            "segment_count": segments.len(),
            "article_count": article_count,
            "options": {
                "disable_heuristics": opts.disable_heuristics,
                "gap_policy": gap_policy,
                "max_slice_len": opts.max_slice_len,
            },
            "segments_fingerprint": fingerprint,
        });

        match emit_segments(&segments, &meta, &output_dir, &doc_id) {
            Ok(paths) => {
                eprintln!(
                    "{}",
                    serde_json::json!({
                        "tool":"emit_segments",
                        "file": file,
                        "segments_path": paths.segments_path,
                        "meta_path": paths.meta_path
                    })
                );
            }
            Err(e) => {
                eprintln!(
                    "{}",
                    serde_json::json!({
                        "tool":"emit_segments",
                        "file": file,
                        "error": e.to_string(),
                        "error_code": 6
                    })
                );
                std::process::exit(6);
            }
        }
    }
}

fn slugify(base: &str) -> String {
    let lower = base.to_lowercase();
    let mut s = String::with_capacity(lower.len());
    for ch in lower.chars() {
        if ch.is_ascii_alphanumeric() {
            s.push(ch);
        } else {
            s.push('-');
        }
    }
    let trimmed = s.trim_matches('-').to_string();
    let mut collapsed = String::with_capacity(trimmed.len());
    let mut prev_dash = false;
    for ch in trimmed.chars() {
        if ch == '-' {
            if !prev_dash {
                collapsed.push(ch);
            }
            prev_dash = true;
        } else {
            prev_dash = false;
            collapsed.push(ch);
        }
    }
    if collapsed.is_empty() {
        "doc".to_string()
    } else {
        collapsed
    }
}

fn unique_slug(slug_in: String, used: &mut HashSet<String>) -> String {
    if !used.contains(&slug_in) {
        used.insert(slug_in.clone());
        return slug_in;
    }
    let mut i = 1;
    loop {
        let candidate = format!("{}-{}", slug_in, i);
        if !used.contains(&candidate) {
            used.insert(candidate.clone());
            return candidate;
        }
        i += 1;
    }
}
