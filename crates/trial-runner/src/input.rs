//! Player input from a line-oriented reader (stdin in the binary).

use puzzle_core::MoveSpec;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::mpsc;
use tracing::warn;

/// Forward every parseable UCI token to `moves`. Returns at end of input or
/// once the receiving session is gone; dropping `moves` marks input closed.
pub async fn read_moves<R>(reader: R, moves: mpsc::Sender<MoveSpec>) -> std::io::Result<()>
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = reader.lines();
    while let Some(line) = lines.next_line().await? {
        let token = line.trim();
        if token.is_empty() {
            continue;
        }
        match token.parse::<MoveSpec>() {
            Ok(mv) => {
                if moves.send(mv).await.is_err() {
                    break;
                }
            }
            Err(e) => warn!(input = token, error = %e, "Ignoring input"),
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_bad_lines_are_skipped() {
        let (tx, mut rx) = mpsc::channel(8);
        read_moves(&b"e2e4\nhello\n\n  e7e8q  \n"[..], tx).await.unwrap();

        assert_eq!(rx.recv().await.map(|m| m.to_string()), Some("e2e4".to_string()));
        assert_eq!(rx.recv().await.map(|m| m.to_string()), Some("e7e8".to_string()));
        assert!(rx.recv().await.is_none());
    }
}
