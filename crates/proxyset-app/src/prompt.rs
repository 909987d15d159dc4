//! Terminal confirmations.
//!
//! Questions go to stderr and answers are read from stdin. When stdin is
//! not a terminal the answer defaults to no, so scripted runs need
//! `--yes` to get past confirmations.

use std::io::{BufRead, IsTerminal, Write};

/// Ask a yes/no question at the terminal. Anything but `y`/`yes` declines.
pub fn confirm(question: &str) -> bool {
    if !std::io::stdin().is_terminal() {
        return false;
    }
    eprint!("{} [y/N] ", question);
    let _ = std::io::stderr().flush();

    let mut input = String::new();
    if std::io::stdin().lock().read_line(&mut input).is_err() {
        return false;
    }
    is_yes(&input)
}

fn is_yes(answer: &str) -> bool {
    let answer = answer.trim().to_lowercase();
    answer == "y" || answer == "yes"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_yes_answers() {
        assert!(is_yes("y"));
        assert!(is_yes("Y"));
        assert!(is_yes("yes"));
        assert!(is_yes("YES"));
        assert!(is_yes("  y \n"));
    }

    #[test]
    fn test_everything_else_declines() {
        assert!(!is_yes(""));
        assert!(!is_yes("n"));
        assert!(!is_yes("no"));
        assert!(!is_yes("yess"));
        assert!(!is_yes("sure"));
    }
}
