//! Debugger command parsing.

/// A parsed debugger command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DebugCommand {
    Next,
    Continue,
    Break(usize),
    Delete(usize),
    List,
    Print(String),
    Vars,
    Help,
    Quit,
}

pub const HELP: &str = "\
Commands:
  n, next, s, step   execute the current line
  c, continue        run to the next breakpoint or the end
  b, break N         set a breakpoint on line N
  d, delete N        remove the breakpoint on line N
  l, list            show source around the current line
  p, print NAME      show a variable
  v, vars            show all variables
  h, help            show this help
  q, quit            end the session
  ai QUESTION        ask the AI assistant (or press Ctrl+Space)";

impl DebugCommand {
    /// Parse one line. The error is a message for the user.
    pub fn parse(line: &str) -> Result<Self, String> {
        let mut words = line.split_whitespace();
        let Some(verb) = words.next() else {
            return Err("empty command".to_string());
        };
        let arg = words.next();
        if let Some(extra) = words.next() {
            return Err(format!("unexpected argument `{extra}`"));
        }

        let command = match verb.to_ascii_lowercase().as_str() {
            "n" | "next" | "s" | "step" => DebugCommand::Next,
            "c" | "continue" => DebugCommand::Continue,
            "b" | "break" => DebugCommand::Break(line_number(verb, arg)?),
            "d" | "delete" => DebugCommand::Delete(line_number(verb, arg)?),
            "l" | "list" => DebugCommand::List,
            "p" | "print" => match arg {
                Some(name) => return Ok(DebugCommand::Print(name.to_string())),
                None => return Err(format!("{verb}: expected a variable name")),
            },
            "v" | "vars" => DebugCommand::Vars,
            "h" | "help" => DebugCommand::Help,
            "q" | "quit" => DebugCommand::Quit,
            _ => return Err(format!("unknown command `{verb}` (try `help`)")),
        };
        if let Some(arg) = arg
            && !matches!(command, DebugCommand::Break(_) | DebugCommand::Delete(_))
        {
            return Err(format!("unexpected argument `{arg}`"));
        }
        Ok(command)
    }
}

fn line_number(verb: &str, arg: Option<&str>) -> Result<usize, String> {
    let arg = arg.ok_or_else(|| format!("{verb}: expected a line number"))?;
    match arg.parse::<usize>() {
        Ok(line) if line > 0 => Ok(line),
        _ => Err(format!("{verb}: `{arg}` is not a line number")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_aliases() {
        assert_eq!(DebugCommand::parse("n"), Ok(DebugCommand::Next));
        assert_eq!(DebugCommand::parse("  STEP "), Ok(DebugCommand::Next));
        assert_eq!(DebugCommand::parse("c"), Ok(DebugCommand::Continue));
        assert_eq!(DebugCommand::parse("b 4"), Ok(DebugCommand::Break(4)));
        assert_eq!(DebugCommand::parse("delete 4"), Ok(DebugCommand::Delete(4)));
        assert_eq!(
            DebugCommand::parse("print x"),
            Ok(DebugCommand::Print("x".to_string()))
        );
        assert_eq!(DebugCommand::parse("q"), Ok(DebugCommand::Quit));
    }

    #[test]
    fn rejects_bad_arguments() {
        assert!(DebugCommand::parse("").is_err());
        assert!(DebugCommand::parse("break").is_err());
        assert!(DebugCommand::parse("break 0").is_err());
        assert!(DebugCommand::parse("break x").is_err());
        assert!(DebugCommand::parse("next 3").is_err());
        assert!(DebugCommand::parse("print a b").is_err());
        assert_eq!(
            DebugCommand::parse("jump 3"),
            Err("unknown command `jump` (try `help`)".to_string())
        );
    }
}
