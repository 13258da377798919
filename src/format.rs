//! Display rendering of a command line for diagnostics.

/// Renders `command` and `args` as a single line for error messages and logs.
///
/// With no arguments the command is returned unchanged. Otherwise every part,
/// the command included, is joined with single spaces; a part containing a
/// space is wrapped in double quotes, or in single quotes when it also
/// contains a double quote.
///
/// The output is for humans only. Backslashes, parts containing both quote
/// characters, and other shell metacharacters are not escaped, so the result
/// is not safe to hand back to a shell.
#[must_use]
pub fn format_command(command: &str, args: Option<&[String]>) -> String {
    let args = match args {
        Some(args) if !args.is_empty() => args,
        _ => return command.to_string(),
    };

    std::iter::once(command)
        .chain(args.iter().map(String::as_str))
        .map(quote_part)
        .collect::<Vec<_>>()
        .join(" ")
}

fn quote_part(part: &str) -> String {
    if !part.contains(' ') {
        return part.to_string();
    }
    if part.contains('"') {
        format!("'{part}'")
    } else {
        format!("\"{part}\"")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn owned(args: &[&str]) -> Vec<String> {
        args.iter().map(|a| (*a).to_string()).collect()
    }

    #[test]
    fn bare_command_is_unchanged() {
        assert_eq!(format_command("git", None), "git");
        assert_eq!(format_command("git", Some(&[])), "git");
    }

    #[test]
    fn argument_with_space_gets_double_quotes() {
        let args = owned(&["commit", "-m", "fix bug"]);
        assert_eq!(format_command("git", Some(&args)), "git commit -m \"fix bug\"");
    }

    #[test]
    fn argument_with_space_and_double_quote_gets_single_quotes() {
        let args = owned(&["say \"hi\""]);
        assert_eq!(format_command("echo", Some(&args)), "echo 'say \"hi\"'");
    }

    #[test]
    fn double_quote_without_space_is_left_alone() {
        let args = owned(&["\"hi\""]);
        assert_eq!(format_command("echo", Some(&args)), "echo \"hi\"");
    }

    #[test]
    fn command_with_space_is_quoted_when_args_present() {
        let args = owned(&["--version"]);
        assert_eq!(
            format_command("/opt/my tools/bin", Some(&args)),
            "\"/opt/my tools/bin\" --version"
        );
        assert_eq!(format_command("/opt/my tools/bin", None), "/opt/my tools/bin");
    }

    #[test]
    fn both_quote_kinds_are_not_escaped() {
        let args = owned(&["it's \"x\""]);
        assert_eq!(format_command("echo", Some(&args)), "echo 'it's \"x\"'");
    }
}
