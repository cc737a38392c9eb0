//! The `preptrack test-path` command.

use std::path::PathBuf;

use anyhow::Result;
use comfy_table::{Cell, Table};

use preptrack_core::model::TestPathStage;

use super::{api_failure, connect};

pub async fn execute(exam_id: Option<String>, config_path: Option<PathBuf>) -> Result<()> {
    let ctx = connect(config_path.as_deref())?;

    let exam_id = match exam_id {
        Some(id) => id,
        None => ctx
            .cached
            .as_ref()
            .and_then(|s| s.profile.target_exam.clone())
            .ok_or_else(|| {
                anyhow::anyhow!("no --exam-id given and the profile has no target exam")
            })?,
    };

    let path = ctx.client.get_test_path(&exam_id).await.map_err(api_failure)?;

    let mut table = Table::new();
    table.set_header(vec!["#", "Stage", "Status", "Exams"]);
    for (i, stage) in path.stages.iter().enumerate() {
        table.add_row(vec![
            Cell::new(i + 1),
            Cell::new(&stage.title),
            Cell::new(status(stage)),
            Cell::new(stage.exam_ids.join(", ")),
        ]);
    }
    println!("Test path for {}\n{table}", path.exam_id);

    match path.next_stage() {
        Some(next) => println!("Next up: {}", next.title),
        None => println!("Nothing left to unlock."),
    }
    Ok(())
}

fn status(stage: &TestPathStage) -> &'static str {
    if stage.completed {
        "done"
    } else if stage.locked {
        "locked"
    } else {
        "open"
    }
}
