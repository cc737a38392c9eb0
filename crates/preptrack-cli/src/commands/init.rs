//! The `preptrack init` command.

use anyhow::Result;

pub fn execute() -> Result<()> {
    let path = std::path::Path::new("preptrack.toml");
    if path.exists() {
        println!("preptrack.toml already exists, skipping.");
    } else {
        std::fs::write(path, SAMPLE_CONFIG)?;
        println!("Created preptrack.toml");
    }

    println!("\nNext steps:");
    println!("  1. Point the base URLs at your preptrack deployment if needed");
    println!("  2. Run: preptrack login --email you@example.com");
    println!("  3. Run: preptrack take --exam-id <exam>");

    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# preptrack configuration

identity_base_url = "https://identity.preptrack.app"
core_base_url = "https://core.preptrack.app"
timeout_secs = 30

# Where the signed-in profile is cached.
# profile_cache = "/home/you/.config/preptrack/profile.json"

# Mark every `take` as a placement run.
is_init = false
"#;
