//! The `preptrack result` command and shared score printing.

use std::path::PathBuf;

use anyhow::Result;
use comfy_table::{Cell, Table};

use preptrack_core::model::EvaluationResult;

use super::{api_failure, connect};

pub async fn execute(id: String, json: bool, config_path: Option<PathBuf>) -> Result<()> {
    let ctx = connect(config_path.as_deref())?;
    let result = ctx.client.get_evaluation(&id).await.map_err(api_failure)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print_result(&result);
    }
    Ok(())
}

pub(crate) fn print_result(result: &EvaluationResult) {
    println!(
        "Score: {:.1}% ({} correct, {} wrong, {} skipped, {:.0}s)",
        result.score_percentage, result.correct, result.wrong, result.skipped, result.time_taken
    );

    if result.concepts.is_empty() {
        return;
    }

    let mut table = Table::new();
    table.set_header(vec!["Concept", "Score", "Correct"]);
    for concept in &result.concepts {
        table.add_row(vec![
            Cell::new(&concept.concept),
            Cell::new(format!("{:.1}%", concept.score_percentage)),
            Cell::new(format!("{}/{}", concept.correct, concept.total)),
        ]);
    }
    println!("\n{table}");
}
