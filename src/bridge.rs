//! JSON-lines bridge between a front end and the message handler
//!
//! Reads one request per line and writes one response per line, flushing
//! after each so a front end can pair them up. Stops at end of input.

use crate::backend::HistoryBackend;
use crate::error::Result;
use crate::message::MessageHandler;
use std::io::{BufRead, Write};
use tracing::{debug, info};

/// Serve requests until `input` is exhausted, returning how many were handled.
pub fn serve<B, R, W>(handler: &MessageHandler<B>, input: R, mut output: W) -> Result<usize>
where
    B: HistoryBackend,
    R: BufRead,
    W: Write,
{
    let mut handled = 0;

    for line in input.lines() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let response = handler.handle_line(line);
        writeln!(output, "{}", response.to_json()?)?;
        output.flush()?;

        handled += 1;
        debug!(handled, "response written");
    }

    info!(handled, "input closed, bridge stopping");
    Ok(handled)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::tests::create_store;
    use crate::database::HistoryRepo;
    use serde_json::Value;
    use std::io::Cursor;
    use tempfile::TempDir;

    fn run(repo: HistoryRepo, input: &str) -> Vec<Value> {
        let handler = MessageHandler::new(repo);
        let mut output = Vec::new();
        serve(&handler, Cursor::new(input.to_string()), &mut output).unwrap();
        String::from_utf8(output)
            .unwrap()
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect()
    }

    #[test]
    fn test_session_against_real_store() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("history.sqlite");
        create_store(&path, &[(1, 1, "a"), (1, 2, "b"), (2, 1, "c")]);
        let repo = HistoryRepo::new(Some(path.to_string_lossy().into_owned()));

        let b_id = {
            let page = repo
                .fetch_page(&crate::types::PageRequest::new(1, 10).with_search("b"))
                .unwrap();
            page.data[0].id
        };

        let delete = format!(r#"{{"command":"deleteItems","ids":["{}"]}}"#, b_id);
        let input = format!(
            "{}\n\n{}\n{}\n",
            r#"{"command":"getHistory","page":1,"pageSize":2}"#,
            delete,
            r#"{"command":"getHistory","page":1,"pageSize":10}"#,
        );
        let responses = run(repo, &input);
        assert_eq!(responses.len(), 3);

        assert_eq!(responses[0]["command"], "historyData");
        assert_eq!(responses[0]["data"]["totalCount"], 3);
        assert_eq!(responses[0]["data"]["totalPages"], 2);
        assert_eq!(responses[0]["data"]["data"][0]["source"], "c");
        assert_eq!(responses[0]["data"]["data"][1]["source"], "b");

        assert_eq!(
            responses[1],
            serde_json::json!({"command": "deleteComplete", "success": true})
        );

        assert_eq!(responses[2]["data"]["totalCount"], 2);
        let sources: Vec<&str> = responses[2]["data"]["data"]
            .as_array()
            .unwrap()
            .iter()
            .map(|e| e["source"].as_str().unwrap())
            .collect();
        assert_eq!(sources, vec!["c", "a"]);
    }

    #[test]
    fn test_missing_store_reports_errors_and_keeps_going() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("nope.sqlite");
        let repo = HistoryRepo::new(Some(missing.to_string_lossy().into_owned()));

        let input = concat!(
            r#"{"command":"getHistory","page":1,"pageSize":10}"#,
            "\n",
            r#"{"command":"deleteItems","ids":["1"]}"#,
            "\n",
            "garbage\n",
        );
        let responses = run(repo, input);
        assert_eq!(responses.len(), 3);

        assert_eq!(responses[0]["command"], "error");
        assert!(responses[0]["message"]
            .as_str()
            .unwrap()
            .starts_with("Failed to load IPython history:"));

        assert_eq!(responses[1]["command"], "deleteComplete");
        assert_eq!(responses[1]["success"], false);
        assert!(responses[1]["error"].is_string());

        assert_eq!(responses[2]["command"], "error");
    }
}
