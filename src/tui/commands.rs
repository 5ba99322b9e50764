//! Slash commands typed into the message box

use std::path::PathBuf;

/// A parsed `/command`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlashCommand {
    Attach(PathBuf),
    /// 1-based position in the attachment list
    Detach(usize),
    ClearAttachments,
    New,
    Save,
    Export(PathBuf),
    Notion,
    Help,
    Quit,
}

pub const HELP_LINES: &[&str] = &[
    "Commands:",
    "  /attach PATH         attach a file to the next message",
    "  /detach N            remove attachment number N",
    "  /clear-attachments   remove all attachments",
    "  /new                 save and start a new conversation",
    "  /save                save the conversation now",
    "  /export PATH         write the conversation as plain text",
    "  /notion              export test cases from the last AI reply to Notion",
    "  /help                show this help",
    "  /quit                save and exit",
    "",
    "Keys: Enter send | Esc clear | Up/Down/PgUp/PgDn scroll | Ctrl+Y copy last reply",
    "      Ctrl+N new | Ctrl+S save | Ctrl+C quit",
    "",
    "Press any key to close.",
];

fn required_arg<'a>(name: &str, arg: &'a str, usage: &str) -> Result<&'a str, String> {
    if arg.is_empty() { Err(format!("/{} needs an argument: {}", name, usage)) } else { Ok(arg) }
}

/// `None` when `input` is not a command at all
pub fn parse_command(input: &str) -> Option<Result<SlashCommand, String>> {
    let rest = input.trim().strip_prefix('/')?;
    let (name, arg) = match rest.split_once(char::is_whitespace) {
        Some((name, arg)) => (name, arg.trim()),
        None => (rest, ""),
    };

    let command = match name.to_lowercase().as_str() {
        "attach" | "adjuntar" => {
            required_arg("attach", arg, "/attach PATH").map(|p| SlashCommand::Attach(expand_home(p)))
        }
        "detach" => required_arg("detach", arg, "/detach N").and_then(|n| match n.parse::<usize>() {
            Ok(n) if n > 0 => Ok(SlashCommand::Detach(n)),
            _ => Err(format!("Not an attachment number: {}", n)),
        }),
        "clear-attachments" => Ok(SlashCommand::ClearAttachments),
        "new" | "nueva" => Ok(SlashCommand::New),
        "save" | "guardar" => Ok(SlashCommand::Save),
        "export" | "exportar" => {
            required_arg("export", arg, "/export PATH").map(|p| SlashCommand::Export(expand_home(p)))
        }
        "notion" => Ok(SlashCommand::Notion),
        "help" | "ayuda" | "?" => Ok(SlashCommand::Help),
        "quit" | "exit" | "salir" => Ok(SlashCommand::Quit),
        other => Err(format!("Unknown command /{}. Type /help for the list", other)),
    };
    Some(command)
}

/// Expand a leading `~/` to the home directory
fn expand_home(path: &str) -> PathBuf {
    let unquoted = path.trim_matches(['"', '\'']);
    if let Some(rest) = unquoted.strip_prefix("~/")
        && let Some(home) = dirs::home_dir()
    {
        return home.join(rest);
    }
    PathBuf::from(unquoted)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_is_not_a_command() {
        assert_eq!(parse_command("hello"), None);
        assert_eq!(parse_command("path/to/file"), None);
    }

    #[test]
    fn test_simple_commands() {
        assert_eq!(parse_command("/new"), Some(Ok(SlashCommand::New)));
        assert_eq!(parse_command("  /SAVE "), Some(Ok(SlashCommand::Save)));
        assert_eq!(parse_command("/clear-attachments"), Some(Ok(SlashCommand::ClearAttachments)));
        assert_eq!(parse_command("/notion"), Some(Ok(SlashCommand::Notion)));
        assert_eq!(parse_command("/help"), Some(Ok(SlashCommand::Help)));
        assert_eq!(parse_command("/quit"), Some(Ok(SlashCommand::Quit)));
        assert_eq!(parse_command("/salir"), Some(Ok(SlashCommand::Quit)));
    }

    #[test]
    fn test_attach_keeps_spaces_and_strips_quotes() {
        assert_eq!(
            parse_command("/attach \"docs/test plan.pdf\""),
            Some(Ok(SlashCommand::Attach(PathBuf::from("docs/test plan.pdf"))))
        );
    }

    #[test]
    fn test_attach_expands_home() {
        if let Some(home) = dirs::home_dir() {
            assert_eq!(
                parse_command("/attach ~/req.docx"),
                Some(Ok(SlashCommand::Attach(home.join("req.docx"))))
            );
        }
    }

    #[test]
    fn test_missing_arguments() {
        assert!(matches!(parse_command("/attach"), Some(Err(e)) if e.contains("/attach PATH")));
        assert!(matches!(parse_command("/export  "), Some(Err(_))));
    }

    #[test]
    fn test_detach_number() {
        assert_eq!(parse_command("/detach 2"), Some(Ok(SlashCommand::Detach(2))));
        assert!(matches!(parse_command("/detach 0"), Some(Err(_))));
        assert!(matches!(parse_command("/detach two"), Some(Err(_))));
    }

    #[test]
    fn test_unknown_command() {
        assert!(matches!(parse_command("/frobnicate"), Some(Err(e)) if e.contains("/help")));
    }
}
