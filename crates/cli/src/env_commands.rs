//! `switchboard setup-env`: interactive env-file generator.

use std::{
    fs,
    io::{self, BufRead, Write},
    path::Path,
};

use {
    anyhow::{Context, Result},
    switchboard_config::credentials::{
        GMAIL_ADDRESS, GMAIL_APP_PASSWORD, TWILIO_ACCOUNT_SID, TWILIO_AUTH_TOKEN,
        TWILIO_PHONE_NUMBER, WHATSAPP_NUMBER,
    },
};

/// Legacy two-line credential file: account SID, then auth token.
const PASSWORDS_FILE: &str = "passwords.txt";

pub fn handle_setup_env(path: &Path, force: bool, deploy: bool) -> Result<()> {
    let stdin = io::stdin();
    let mut prompt = Prompt::new(stdin.lock(), io::stdout());

    println!("Setting up {} for credential management", path.display());
    println!("{}", "=".repeat(60));

    if path.exists() && !force {
        let answer = prompt.ask(&format!("{} already exists. Overwrite? (y/N)", path.display()));
        if !answer.eq_ignore_ascii_case("y") {
            println!("Setup cancelled.");
            return Ok(());
        }
    }

    let existing = read_passwords(Path::new(PASSWORDS_FILE));
    if existing.is_some() {
        println!("Found existing Twilio credentials in {PASSWORDS_FILE}");
    }

    let env = collect(&mut prompt, existing, deploy);
    let contents = env.render(deploy);
    if let Err(e) = fs::write(path, &contents) {
        println!("Could not write {}: {e}", path.display());
        println!("Copy this content into the file manually:");
        println!("{}", "-".repeat(50));
        println!("{contents}");
        println!("{}", "-".repeat(50));
        return Err(e).with_context(|| format!("failed to write {}", path.display()));
    }

    println!("\n{} created. Keep it out of version control.", path.display());
    println!("\nConfigured services:");
    for service in env.configured() {
        println!("  - {service}");
    }
    println!("\nStart the gateway with: switchboard gateway");
    Ok(())
}

// ── Prompting ────────────────────────────────────────────────────────────────

struct Prompt<R, W> {
    reader: R,
    writer: W,
}

impl<R: BufRead, W: Write> Prompt<R, W> {
    fn new(reader: R, writer: W) -> Self {
        Self { reader, writer }
    }

    /// Ask a question and return the trimmed answer; empty on EOF.
    fn ask(&mut self, question: &str) -> String {
        let _ = write!(self.writer, "{question}: ");
        let _ = self.writer.flush();
        let mut input = String::new();
        let _ = self.reader.read_line(&mut input);
        input.trim().to_string()
    }

    fn section(&mut self, title: &str) {
        let _ = writeln!(self.writer, "\n{title}");
    }

    /// Fall back to a previously stored value when the answer is empty.
    fn or_existing(&mut self, answer: String, existing: Option<String>) -> String {
        if !answer.is_empty() {
            return answer;
        }
        match existing {
            Some(value) => {
                let shown: String = value.chars().take(10).collect();
                let _ = writeln!(self.writer, "Using existing: {shown}...");
                value
            },
            None => answer,
        }
    }
}

/// First two non-empty lines of the legacy credential file.
fn read_passwords(path: &Path) -> Option<(String, String)> {
    let raw = fs::read_to_string(path).ok()?;
    let mut lines = raw.lines().map(str::trim).filter(|l| !l.is_empty());
    let sid = lines.next()?.to_string();
    let token = lines.next()?.to_string();
    Some((sid, token))
}

// ── Env file ─────────────────────────────────────────────────────────────────

#[derive(Debug, Default)]
struct EnvFile {
    vars: Vec<(&'static str, String)>,
}

impl EnvFile {
    fn set(&mut self, name: &'static str, value: String) {
        if !value.is_empty() {
            self.vars.push((name, value));
        }
    }

    fn has(&self, name: &str) -> bool {
        self.vars.iter().any(|(n, _)| *n == name)
    }

    fn configured(&self) -> Vec<&'static str> {
        [
            (self.has(GMAIL_APP_PASSWORD), "Gmail"),
            (
                self.has(TWILIO_ACCOUNT_SID) && self.has(TWILIO_AUTH_TOKEN),
                "Twilio (SMS/Calls)",
            ),
            (self.has(WHATSAPP_NUMBER), "WhatsApp"),
            (self.has("INSTAGRAM_USERNAME"), "Instagram"),
            (self.has("SSH_PRIVATE_KEY_PATH"), "SSH"),
        ]
        .into_iter()
        .filter_map(|(on, name)| on.then_some(name))
        .collect()
    }

    fn render(&self, deploy: bool) -> String {
        let mut out = String::from("# Switchboard environment\n\n");
        for (name, value) in &self.vars {
            out.push_str(&format!("{name}={value}\n"));
        }
        if deploy {
            out.push_str("\n# Production\nRUST_LOG=info\nPORT=5000\n");
        }
        out
    }
}

fn collect<R: BufRead, W: Write>(
    prompt: &mut Prompt<R, W>,
    existing: Option<(String, String)>,
    deploy: bool,
) -> EnvFile {
    let mut env = EnvFile::default();
    let (existing_sid, existing_token) = existing.unzip();

    prompt.section("Gmail");
    env.set(GMAIL_ADDRESS, prompt.ask("Gmail address (Enter to skip)"));
    env.set(GMAIL_APP_PASSWORD, prompt.ask("Gmail app password (Enter to skip)"));

    prompt.section("Twilio");
    let sid = prompt.ask("Twilio account SID (Enter to use existing)");
    let sid = prompt.or_existing(sid, existing_sid);
    env.set(TWILIO_ACCOUNT_SID, sid);
    let token = prompt.ask("Twilio auth token (Enter to use existing)");
    let token = prompt.or_existing(token, existing_token);
    env.set(TWILIO_AUTH_TOKEN, token);
    env.set(TWILIO_PHONE_NUMBER, prompt.ask("Twilio phone number (e.g. +1234567890)"));

    prompt.section("WhatsApp");
    env.set(WHATSAPP_NUMBER, prompt.ask("WhatsApp number (e.g. +1234567890)"));

    // Optional extras are not needed by hosted deployments.
    if !deploy {
        prompt.section("Instagram (optional)");
        let username = prompt.ask("Instagram username (Enter to skip)");
        if !username.is_empty() {
            env.set("INSTAGRAM_USERNAME", username);
            env.set("INSTAGRAM_PASSWORD", prompt.ask("Instagram password"));
        }

        prompt.section("SSH (optional)");
        env.set("SSH_PRIVATE_KEY_PATH", prompt.ask("Path to SSH private key (Enter to skip)"));
    }

    env
}
