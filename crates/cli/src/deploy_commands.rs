//! `switchboard deploy`: hosted deployment walkthrough.

use {anyhow::Result, switchboard_config::Provider};

pub const DEFAULT_DASHBOARD_URL: &str = "https://render.com";

pub fn handle_deploy(url: &str, open_browser: bool) -> Result<()> {
    println!("Deploying the switchboard gateway");
    println!("{}", "=".repeat(50));

    println!("\nSteps:");
    for (i, step) in deploy_steps().iter().enumerate() {
        println!("{}. {step}", i + 1);
    }

    println!("\nEnvironment variables to set on the service:");
    for var in required_env_vars() {
        println!("- {var}");
    }

    if open_browser {
        println!("\nOpening {url} ...");
        if open::that(url).is_err() {
            println!("Could not open browser. Please visit:\n{url}");
        }
    }
    Ok(())
}

fn deploy_steps() -> Vec<String> {
    vec![
        "Sign in to the hosting dashboard with your Git provider".into(),
        "Create a new web service from this repository".into(),
        "Build command: cargo build --release --bin switchboard".into(),
        "Start command: ./target/release/switchboard gateway".into(),
        "The platform sets PORT; the gateway binds 0.0.0.0 by default".into(),
        "Add the environment variables below, or upload the file from `switchboard setup-env --deploy`"
            .into(),
    ]
}

fn required_env_vars() -> Vec<&'static str> {
    [Provider::Mail, Provider::Twilio, Provider::WhatsApp]
        .into_iter()
        .flat_map(Provider::env_vars)
        .copied()
        .collect()
}
