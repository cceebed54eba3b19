//! Basic command handlers for ipyhist CLI

use crate::cli::args::*;
use crate::cli::CliApp;
use crate::error::Result;
use crate::types::{parse_entry_ids, Entry, Page, PageRequest};
use std::io::{self, Write};

pub fn handle_list(app: &mut CliApp, args: &ListArgs) -> Result<()> {
    let request = PageRequest {
        page: args.page,
        page_size: args.page_size.unwrap_or(app.config.page_size),
        search_term: args.search.clone(),
    };
    app.verbose_println(&format!(
        "Reading {}",
        app.repo.store_path()?.display()
    ));

    let page = app.repo.fetch_page(&request)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&page)?);
        return Ok(());
    }

    print!("{}", format_page(&page));

    if !app.quiet {
        if page.total_count == 0 {
            println!("No history entries found");
        } else {
            println!(
                "\nPage {} of {} ({} entries)",
                page.page, page.total_pages, page.total_count
            );
        }
    }

    Ok(())
}

/// One entry per line as `id<TAB>source`; continuation lines are indented.
fn format_page(page: &Page<Entry>) -> String {
    let mut out = String::new();
    for entry in &page.data {
        let mut lines = entry.source.lines();
        out.push_str(&format!("{}\t{}\n", entry.id, lines.next().unwrap_or("")));
        for line in lines {
            out.push_str(&format!("\t{}\n", line));
        }
    }
    out
}

pub fn handle_delete(app: &mut CliApp, args: &DeleteArgs) -> Result<()> {
    let ids = parse_entry_ids(&args.ids)?;

    if !args.yes {
        print!(
            "Delete {} entries from {}? (y/N): ",
            ids.len(),
            app.repo.store_path()?.display()
        );
        io::stdout().flush()?;
        let mut input = String::new();
        io::stdin().read_line(&mut input)?;
        if !input.trim().eq_ignore_ascii_case("y") {
            println!("Aborted");
            return Ok(());
        }
    }

    let deleted = app.repo.delete(&ids)?;

    if !app.quiet {
        println!("Deleted {} of {} requested entries", deleted, ids.len());
    }

    Ok(())
}

pub fn handle_path(app: &mut CliApp) -> Result<()> {
    let path = app.repo.store_path()?;
    println!("{}", path.display());

    if !path.exists() && !app.quiet {
        eprintln!("warning: no history database at this location");
    }

    Ok(())
}
