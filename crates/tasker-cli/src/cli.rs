//! CLI argument parsing using clap derive.
//!
//! Only the flags are static: the positional tail is
//! `[project-file | --] command [args...]`, and command names come from
//! whatever extensions are loaded, so the tail is captured verbatim and
//! split by [`crate::parser::CommandParser`].

use clap::Parser;

/// tasker - run project tasks through extension-provided commands
#[derive(Parser, Debug)]
#[command(name = "tasker")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// [project-file | --] command [args...]
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub args: Vec<String>,
}

/// Re-insert a leading `--` token.
///
/// clap consumes the first `--` as its positional escape, but the command
/// grammar gives a leading `--` meaning: it forces the next token to be
/// read as a bare command name even if it looks like a project path.
pub fn restore_command_separator(raw: &[String], mut tokens: Vec<String>) -> Vec<String> {
    let leads_with_separator = raw
        .iter()
        .take_while(|token| token.starts_with('-'))
        .any(|token| token.as_str() == "--");
    if leads_with_separator {
        tokens.insert(0, "--".to_string());
    }
    tokens
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(tokens: &[&str]) -> Vec<String> {
        tokens.iter().map(|t| t.to_string()).collect()
    }

    #[test]
    fn test_leading_separator_is_restored() {
        let raw = strings(&["--", "echo", "hi"]);
        let tokens = restore_command_separator(&raw, strings(&["echo", "hi"]));
        assert_eq!(tokens, strings(&["--", "echo", "hi"]));
    }

    #[test]
    fn test_separator_after_flags_is_restored() {
        let raw = strings(&["-v", "--", "echo"]);
        let tokens = restore_command_separator(&raw, strings(&["echo"]));
        assert_eq!(tokens, strings(&["--", "echo"]));
    }

    #[test]
    fn test_mid_stream_separator_is_left_alone() {
        let raw = strings(&["project.json", "build", "--", "extra"]);
        let tokens = restore_command_separator(&raw, strings(&["project.json", "build", "--", "extra"]));
        assert_eq!(tokens[0], "project.json");
    }

    #[test]
    fn test_plain_tokens_pass_through() {
        let raw = strings(&["project.json", "build"]);
        let tokens = restore_command_separator(&raw, strings(&["project.json", "build"]));
        assert_eq!(tokens, strings(&["project.json", "build"]));
    }
}
