//! The `preptrack study-guide` command.

use std::path::PathBuf;

use anyhow::Result;
use comfy_table::{Cell, Table};

use super::{api_failure, connect};

pub async fn execute(
    exam_id: Option<String>,
    guide_id: Option<String>,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let ctx = connect(config_path.as_deref())?;

    if let Some(id) = guide_id {
        let guide = ctx.client.get_study_guide(&id).await.map_err(api_failure)?;
        println!("{}\n", guide.title);
        for section in &guide.sections {
            println!("## {}", section.heading);
            if !section.body.is_empty() {
                println!("{}", section.body);
            }
            if !section.concepts.is_empty() {
                println!("Concepts: {}", section.concepts.join(", "));
            }
            println!();
        }
        return Ok(());
    }

    let Some(exam_id) = exam_id else {
        anyhow::bail!("pass --exam-id to list guides or --id to show one");
    };
    let guides = ctx
        .client
        .list_study_guides(&exam_id)
        .await
        .map_err(api_failure)?;

    if guides.is_empty() {
        println!("No study guides for {exam_id}.");
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec!["Id", "Title", "Sections"]);
    for guide in &guides {
        table.add_row(vec![
            Cell::new(&guide.id),
            Cell::new(&guide.title),
            Cell::new(guide.sections.len()),
        ]);
    }
    println!("{table}");
    Ok(())
}
