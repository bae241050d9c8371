pub(crate) mod apply;
pub(crate) mod assistant;
pub(crate) mod chat;
pub(crate) mod letter;
pub(crate) mod manager;
pub(crate) mod register;
pub(crate) mod tracking;

use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};

/// Line reader over stdin for the interactive commands.
pub(crate) fn prompt_lines() -> Lines<BufReader<Stdin>> {
    BufReader::new(tokio::io::stdin()).lines()
}

pub(crate) fn is_exit(line: &str) -> bool {
    matches!(line.trim().to_ascii_lowercase().as_str(), "exit" | "quit")
}
