//! The `preptrack profile` command.

use std::path::PathBuf;

use anyhow::Result;

use preptrack_core::model::{ProfileUpdate, UserProfile};

use super::{api_failure, connect};

pub async fn execute(
    name: Option<String>,
    target_exam: Option<String>,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let ctx = connect(config_path.as_deref())?;

    let profile = if name.is_some() || target_exam.is_some() {
        let update = ProfileUpdate { name, target_exam };
        let profile = ctx
            .client
            .update_profile(&update)
            .await
            .map_err(api_failure)?;
        println!("Profile updated.");
        profile
    } else {
        ctx.client.get_profile().await.map_err(api_failure)?
    };

    ctx.cache.update_profile(profile.clone())?;
    print_profile(&profile);
    Ok(())
}

fn print_profile(profile: &UserProfile) {
    println!("Name:        {}", profile.name);
    println!("Email:       {}", profile.email);
    println!(
        "Target exam: {}",
        profile.target_exam.as_deref().unwrap_or("(none)")
    );
    if let Some(created) = profile.created_at {
        println!("Member since {}", created.format("%Y-%m-%d"));
    }
}
