//! `switchboard scan`: look for credentials in a source tree before it is
//! published.

use std::{
    fs,
    path::{Path, PathBuf},
    sync::LazyLock,
};

use {
    anyhow::{Result, bail},
    regex::Regex,
    tracing::warn,
    walkdir::{DirEntry, WalkDir},
};

const SHOWN_FINDINGS: usize = 10;

const SCANNED_EXTENSIONS: &[&str] = &[
    "py", "js", "jsx", "ts", "tsx", "rs", "json", "txt", "md", "yml", "yaml", "toml", "config",
    "conf",
];

/// Path components that are never scanned.
const IGNORED: &[&str] = &[".git", "node_modules", "target", "__pycache__", "passwords.txt"];

/// Lines starting with these are comments and skipped.
const COMMENT_PREFIXES: &[&str] = &["#", "//", "/*", "*"];

/// Lines mentioning these are documentation or placeholders.
const PLACEHOLDER_WORDS: &[&str] = &["variable", "example", "placeholder"];

/// Environment lookups, which are the right way to hold a secret.
const ENV_REFERENCES: &[&str] = &["os.getenv(", "process.env.", "env::var(", "${"];

const REQUIRED_GITIGNORE: &[&str] = &[".env", "passwords.txt", "*.key", "*.pem"];

static PATTERNS: LazyLock<Vec<(&'static str, Regex)>> = LazyLock::new(|| {
    [
        ("long token", r"\b[a-zA-Z0-9]{32,}\b"),
        ("stripe secret key", r"sk_[a-zA-Z0-9]{24,}"),
        ("stripe public key", r"pk_[a-zA-Z0-9]{24,}"),
        ("google api key", r"AIza[a-zA-Z0-9_-]{35}"),
        ("google oauth token", r"ya29\.[a-zA-Z0-9_-]+"),
        ("hardcoded password", r#"(?i)password\s*[:=]\s*["'][^"']+["']"#),
        ("hardcoded secret", r#"(?i)secret\s*[:=]\s*["'][^"']+["']"#),
        ("hardcoded token", r#"(?i)token\s*[:=]\s*["'][^"']+["']"#),
        ("email address", r"[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}"),
        ("phone number", r"\+[1-9]\d{7,14}"),
        ("card number", r"\b\d{4}[- ]?\d{4}[- ]?\d{4}[- ]?\d{4}\b"),
        ("database url", r#"(?:mongodb|postgresql|postgres|mysql)://[^"'\s]+"#),
    ]
    .into_iter()
    .filter_map(|(name, pattern)| Regex::new(pattern).ok().map(|re| (name, re)))
    .collect()
});

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Finding {
    pub path: PathBuf,
    pub line: usize,
    pub kind: &'static str,
    pub matched: String,
}

pub fn handle_scan(root: &Path) -> Result<()> {
    println!("Scanning {} for sensitive data", root.display());
    println!("{}", "=".repeat(60));

    let findings = scan_tree(root);
    if findings.is_empty() {
        println!("\nNo obvious sensitive data found.");
    } else {
        println!("\nFound {} potential issues:", findings.len());
        for f in findings.iter().take(SHOWN_FINDINGS) {
            println!("{}:{}  [{}] {}", f.path.display(), f.line, f.kind, f.matched);
        }
        if findings.len() > SHOWN_FINDINGS {
            println!("... and {} more", findings.len() - SHOWN_FINDINGS);
        }
        println!("\nMove credentials into environment variables before publishing.");
    }

    println!();
    for name in [".env", "passwords.txt"] {
        if root.join(name).exists() {
            println!("{name} exists; make sure it is in .gitignore");
        }
    }
    match missing_gitignore_entries(root) {
        None => println!("No .gitignore file found"),
        Some(missing) if missing.is_empty() => println!(".gitignore looks good"),
        Some(missing) => println!("Missing from .gitignore: {}", missing.join(", ")),
    }

    if !findings.is_empty() {
        bail!("{} potential secrets found", findings.len());
    }
    Ok(())
}

fn is_ignored(entry: &DirEntry) -> bool {
    let name = entry.file_name().to_string_lossy();
    IGNORED.iter().any(|ignored| name == *ignored) || name.starts_with(".env")
}

fn is_scanned(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| SCANNED_EXTENSIONS.contains(&ext))
}

pub fn scan_tree(root: &Path) -> Vec<Finding> {
    let mut findings = Vec::new();
    let walker = WalkDir::new(root)
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !is_ignored(e));
    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!(error = %e, "skipping unreadable entry");
                continue;
            },
        };
        if !entry.file_type().is_file() || !is_scanned(entry.path()) {
            continue;
        }
        match fs::read(entry.path()) {
            Ok(bytes) => {
                let text = String::from_utf8_lossy(&bytes);
                findings.extend(scan_text(entry.path(), &text));
            },
            Err(e) => warn!(path = %entry.path().display(), error = %e, "could not read file"),
        }
    }
    findings
}

fn scan_text(path: &Path, text: &str) -> Vec<Finding> {
    let mut findings = Vec::new();
    for (idx, line) in text.lines().enumerate() {
        let trimmed = line.trim_start();
        let lower = line.to_lowercase();
        if COMMENT_PREFIXES.iter().any(|p| trimmed.starts_with(p))
            || PLACEHOLDER_WORDS.iter().any(|w| lower.contains(w))
            || ENV_REFERENCES.iter().any(|r| line.contains(r))
        {
            continue;
        }
        for (kind, re) in PATTERNS.iter() {
            for m in re.find_iter(line) {
                findings.push(Finding {
                    path: path.to_path_buf(),
                    line: idx + 1,
                    kind: *kind,
                    matched: m.as_str().to_string(),
                });
            }
        }
    }
    findings
}

/// Required patterns absent from `.gitignore`, or `None` when there is no
/// `.gitignore` at all.
fn missing_gitignore_entries(root: &Path) -> Option<Vec<&'static str>> {
    let contents = fs::read_to_string(root.join(".gitignore")).ok()?;
    let entries: Vec<&str> = contents.lines().map(str::trim).collect();
    Some(
        REQUIRED_GITIGNORE
            .iter()
            .copied()
            .filter(|required| !entries.contains(required))
            .collect(),
    )
}
