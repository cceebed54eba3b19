//! Long-running front ends: the stdio bridge and the terminal browser

use crate::bridge;
use crate::browser;
use crate::cli::args::*;
use crate::cli::CliApp;
use crate::error::Result;
use crate::message::MessageHandler;
use std::io;

pub fn handle_serve(app: &mut CliApp) -> Result<()> {
    app.verbose_println("Serving history messages on stdin/stdout");

    let handler = MessageHandler::new(&app.repo);
    bridge::serve(&handler, io::stdin().lock(), io::stdout().lock())?;

    Ok(())
}

pub fn handle_browse(app: &mut CliApp, args: &BrowseArgs) -> Result<()> {
    let page_size = args.page_size.unwrap_or(app.config.page_size);
    browser::run_browser(MessageHandler::new(&app.repo), page_size)
}
