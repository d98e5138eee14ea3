//! Terminal rendering for the `trial-runner` binary.

use shakmaty::Color;
use trial_runner::session::{BoardView, Highlight};
use trial_runner::timer::clock_label;

#[derive(Debug, Default)]
pub struct ConsoleView;

impl BoardView for ConsoleView {
    fn block_started(&mut self, block: u32) {
        println!("\n=== Block {} ===", block + 1);
    }

    fn rest_clock(&mut self, remaining: u32) {
        if remaining == 0 {
            println!("Rest over, first puzzle coming up.");
        } else {
            println!("Take a break. Next puzzle in {}", clock_label(remaining));
        }
    }

    fn position(&mut self, fen: &str, side_to_move: Color, player: Color) {
        println!();
        for row in board_rows(fen, player) {
            println!("  {row}");
        }
        let side = if side_to_move == Color::White { "White" } else { "Black" };
        println!("  {side} to move    FEN: {fen}");
        if side_to_move == player {
            println!("  Your move (e.g. e2e4):");
        }
    }

    fn clock(&mut self, remaining: u32) {
        if remaining <= 5 || remaining % 10 == 0 {
            println!("  [{}]", clock_label(remaining));
        }
    }

    fn highlight(&mut self, highlight: Highlight) {
        let text = match highlight {
            Highlight::Correct => "Correct.",
            Highlight::Illegal => "Illegal move, try again.",
            Highlight::Solved => "Solved!",
            Highlight::Failed => "Wrong move.",
            Highlight::Timeout => "Time is up.",
        };
        println!("  >> {text}");
    }
}

/// Piece placement as text rows, drawn from the solver's side.
fn board_rows(fen: &str, player: Color) -> Vec<String> {
    let placement = fen.split_whitespace().next().unwrap_or_default();
    let mut rows: Vec<String> = placement
        .split('/')
        .enumerate()
        .map(|(i, rank)| {
            let mut cells = String::new();
            for ch in rank.chars() {
                match ch.to_digit(10) {
                    Some(n) => (0..n).for_each(|_| cells.push_str(". ")),
                    None => {
                        cells.push(ch);
                        cells.push(' ');
                    }
                }
            }
            format!("{} {}", 8 - i, cells.trim_end())
        })
        .collect();

    let mut files = "  a b c d e f g h".to_string();
    if player == Color::Black {
        rows.reverse();
        rows = rows
            .into_iter()
            .map(|row| {
                let (label, cells) = row.split_at(1);
                let flipped: Vec<&str> = cells.split_whitespace().rev().collect();
                format!("{label} {}", flipped.join(" "))
            })
            .collect();
        files = "  h g f e d c b a".to_string();
    }
    rows.push(files);
    rows
}
