//! `qry refs` - list the references the extractor finds in a statement.
//!
//! Diagnostic only: no policy is loaded, so this shows what validation would look at.

use super::read_sql;
use crate::SqlArgs;
use anyhow::Result;
use qry_policy::extractor::references_of_kind;
use qry_policy::{HeuristicExtractor, ReferenceExtractor, ReferenceKind};

pub fn run(sql_args: &SqlArgs, json: bool) -> Result<()> {
    let sql = read_sql(sql_args)?;
    let refs = HeuristicExtractor::new().extract(&sql);

    if json {
        println!("{}", serde_json::to_string_pretty(&refs)?);
        return Ok(());
    }

    if refs.is_empty() {
        println!("No table or column references found.");
        return Ok(());
    }

    for kind in [ReferenceKind::Table, ReferenceKind::Column] {
        let of_kind = references_of_kind(&refs, kind);
        if of_kind.is_empty() {
            continue;
        }
        println!("{}s:", kind);
        for r in of_kind {
            println!("  {:<24} {}", r.name, r.source_clause);
        }
    }
    Ok(())
}
