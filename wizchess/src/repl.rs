//! Line-oriented operator loop shared by the interactive prompt and script
//! replay.

use std::io::Write;

use chess::{MoveRecord, PieceColor, Request, Response, StatusSnapshot};
use serde::Serialize;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

use crate::command;
use crate::controller::{ControllerError, ControllerHandle};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

/// Counts of what happened during a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Summary {
    pub committed: usize,
    pub rejected: usize,
    pub invalid: usize,
}

#[derive(Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
enum Reply<'a> {
    Moved { record: &'a MoveRecord, turn: PieceColor },
    Status { snapshot: &'a StatusSnapshot },
    Rejected { reason: String },
    Invalid { error: String },
}

impl Reply<'_> {
    fn text(&self) -> String {
        match self {
            Reply::Moved { record, turn } => {
                format!("Move {} executed. {} to move.\n", record, turn)
            }
            Reply::Status { snapshot } => snapshot.render(),
            Reply::Rejected { reason } => format!("Invalid move! {}. Try again!\n", reason),
            Reply::Invalid { error } => format!("Cannot read command: {}\n", error),
        }
    }
}

fn emit(out: &mut impl Write, format: OutputFormat, reply: &Reply<'_>) -> anyhow::Result<()> {
    match format {
        OutputFormat::Text => out.write_all(reply.text().as_bytes())?,
        OutputFormat::Json => writeln!(out, "{}", serde_json::to_string(reply)?)?,
    }
    out.flush()?;
    Ok(())
}

/// Read commands from `reader` until EOF or `quit`, forwarding each to the
/// controller and writing its answer to `out`.
pub async fn run<R, W>(
    reader: R,
    handle: &ControllerHandle,
    format: OutputFormat,
    prompt: bool,
    out: &mut W,
) -> anyhow::Result<Summary>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let mut lines = reader.lines();
    let mut summary = Summary::default();

    loop {
        if prompt {
            write!(out, "> ")?;
            out.flush()?;
        }
        let Some(line) = lines.next_line().await? else {
            break;
        };
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if matches!(line, "quit" | "exit") {
            break;
        }

        let request = match command::parse(line) {
            Ok(request) => request,
            Err(e) => {
                tracing::debug!(line, error = %e, "unparseable command");
                summary.invalid += 1;
                emit(out, format, &Reply::Invalid { error: e.to_string() })?;
                continue;
            }
        };

        let response = match request {
            Request::Status => handle.get_snapshot().await.map(Response::Status),
            Request::Move(request) => handle.make_move(request).await.map(Response::Moved),
        };
        match response {
            Ok(Response::Moved(outcome)) => {
                summary.committed += 1;
                let reply = Reply::Moved {
                    record: &outcome.record,
                    turn: outcome.turn,
                };
                emit(out, format, &reply)?;
            }
            Ok(Response::Status(snapshot)) => {
                emit(out, format, &Reply::Status { snapshot: &snapshot })?;
            }
            Err(ControllerError::Move(e)) => {
                summary.rejected += 1;
                emit(out, format, &Reply::Rejected { reason: e.to_string() })?;
            }
            Err(e @ ControllerError::Internal(_)) => return Err(e.into()),
        }
    }

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller;
    use chess::{MoveResolver, RecordingActuator};
    use std::fs;
    use tempfile::TempDir;
    use tokio::io::BufReader;

    async fn replay(script: &str, format: OutputFormat) -> (Summary, String) {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("game.txt");
        fs::write(&path, script).unwrap();

        let handle = controller::spawn(MoveResolver::new(RecordingActuator::new()));
        let file = tokio::fs::File::open(&path).await.unwrap();
        let mut out = Vec::new();
        let summary = run(BufReader::new(file), &handle, format, false, &mut out)
            .await
            .unwrap();
        handle.shutdown().await;
        (summary, String::from_utf8(out).unwrap())
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_script_replay() {
        let script = "\
# opening
pawn to e4
pedina d5
pawn from e4 to d5
rook a5
dragon e4

status
";
        let (summary, out) = replay(script, OutputFormat::Text).await;
        assert_eq!(
            summary,
            Summary {
                committed: 3,
                rejected: 1,
                invalid: 1
            }
        );
        assert!(out.contains("Move 1. white pawn E2-E4 executed. black to move."));
        assert!(out.contains("xpawn on D5"));
        assert!(out.contains("Invalid move!"));
        assert!(out.contains("Cannot read command: unknown piece 'dragon'"));
        assert!(out.contains("--- Game State ---"));
        assert!(out.contains("Turn: black"));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_quit_stops_replay() {
        let (summary, _) = replay("knight f3\nquit\nknight c6\n", OutputFormat::Text).await;
        assert_eq!(summary.committed, 1);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_json_output() {
        let (_, out) = replay("pawn e4\ncheck\n", OutputFormat::Json).await;
        let lines: Vec<serde_json::Value> = out
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0]["kind"], "moved");
        assert_eq!(lines[0]["turn"], "Black");
        assert_eq!(lines[1]["kind"], "status");
        assert_eq!(lines[1]["snapshot"]["turn"], "Black");
    }
}
