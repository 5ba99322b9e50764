use super::roles::Role;
use super::templates::{
    TEST_CASE_TEMPLATE, USER_MANUAL_TEMPLATE, wants_test_cases, wants_user_manual,
};

/// Separates the typed message from the extracted attachment text
pub const ATTACHMENTS_MARKER: &str = "--- ATTACHED FILES ---";

pub const FIRST_INTERACTION: &str = "This is the first interaction.";
const DEFAULT_FILE_QUESTION: &str = "Analyze the attached files";

/// One answered user/bot pair kept for prompt context
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Exchange {
    pub user: String,
    pub bot: String,
}

impl Exchange {
    pub fn new(user: impl Into<String>, bot: impl Into<String>) -> Self {
        Self { user: user.into(), bot: bot.into() }
    }
}

/// Split a full message into the typed text and the attachment block, if any
pub fn split_message(message: &str) -> (&str, Option<&str>) {
    match message.split_once(ATTACHMENTS_MARKER) {
        Some((typed, attached)) => (typed.trim(), Some(attached)),
        None => (message.trim(), None),
    }
}

/// Last `window` exchanges rendered for the prompt
pub fn recent_history(exchanges: &[Exchange], name: &str, window: usize) -> String {
    let start = exchanges.len().saturating_sub(window);
    let recent = &exchanges[start..];
    if recent.is_empty() {
        return FIRST_INTERACTION.to_string();
    }

    recent
        .iter()
        .map(|exchange| format!("User: {}\n{}: {}\n", exchange.user, name, exchange.bot))
        .collect()
}

/// Assemble the full prompt for one message.
///
/// `message` is the complete message including any attachment block and
/// `history` is the output of [`recent_history`].
pub fn build_prompt(name: &str, message: &str, history: &str) -> String {
    let (typed, attached) = split_message(message);
    let role = Role::detect(message);

    // With attachments only the typed question selects templates
    let request = if attached.is_some() { typed } else { message };
    let mut templates = String::new();
    if wants_test_cases(request) {
        templates.push_str(TEST_CASE_TEMPLATE);
        templates.push('\n');
    }
    if wants_user_manual(request) {
        templates.push_str(USER_MANUAL_TEMPLATE);
        templates.push('\n');
    }

    match (attached.is_some(), role) {
        (true, Some(role)) => {
            let question = if typed.is_empty() { DEFAULT_FILE_QUESTION } else { typed };
            format!(
                "You are {name}, acting as a {title}.

{context}

IMPORTANT: Stay in your role as a {title} and answer ONLY what the user asks for.

{templates}
The user asks: \"{question}\"

Based on your experience as a {title} and on this specific request:

Recent history:
{history}

File content and request:
{message}

Answer as a {title}, specifically to what was asked:",
                title = role.title(),
                context = role.context(),
            )
        }
        (true, None) => {
            let question = if typed.is_empty() { DEFAULT_FILE_QUESTION } else { typed };
            format!(
                "You are {name}, a chatbot specialized in analyzing documents and files.

IMPORTANT: Answer ONLY what the user asks for. Do not add extra information that was not requested.

{templates}
The user asks: \"{question}\"

Based on the specific request, you can:
- If they ask for a SUMMARY: give only a clear, concise summary
- If they ask for TEST CASES: generate detailed test cases following the template
- If they ask for a USER MANUAL: write documentation following the given structure
- If they ask for an ANALYSIS: analyze the content as requested
- If they ask for a CODE REVIEW: review it and suggest improvements
- If they don't say: ask what kind of analysis they need

Recent history:
{history}

File content and request:
{message}

Answer specifically to what the user asked:"
            )
        }
        (false, Some(role)) => format!(
            "You are {name}, acting as a {title}.

{context}

{templates}
Keep your role and personality as a {title} throughout the conversation.

Recent conversation history:
{history}

User: {message}

Answer as a {title}, professionally and expertly:",
            title = role.title(),
            context = role.context(),
        ),
        (false, None) => format!(
            "You are {name}, a friendly and helpful chatbot.
Answer in a natural, conversational way, in the user's language.

{templates}
Recent conversation history:
{history}

User: {message}

Answer in a helpful and friendly way:"
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_files(typed: &str) -> String {
        format!("{}\n\n{}\n📄 Text file: a.txt\nContent:\nlogin rules\n", typed, ATTACHMENTS_MARKER)
    }

    #[test]
    fn test_split_message() {
        let message = with_files("  summarize  ");
        let (typed, attached) = split_message(&message);
        assert_eq!(typed, "summarize");
        assert!(attached.unwrap().contains("login rules"));

        assert_eq!(split_message(" plain "), ("plain", None));
    }

    #[test]
    fn test_recent_history_window() {
        let exchanges: Vec<_> =
            (1..=5).map(|i| Exchange::new(format!("q{i}"), format!("a{i}"))).collect();
        let history = recent_history(&exchanges, "Bot", 3);

        assert_eq!(history, "User: q3\nBot: a3\nUser: q4\nBot: a4\nUser: q5\nBot: a5\n");
    }

    #[test]
    fn test_recent_history_empty() {
        assert_eq!(recent_history(&[], "Bot", 3), FIRST_INTERACTION);
        let one = [Exchange::new("q", "a")];
        assert_eq!(recent_history(&one, "Bot", 0), FIRST_INTERACTION);
    }

    #[test]
    fn test_plain_prompt() {
        let prompt = build_prompt("QA Assistant", "what is regression testing?", FIRST_INTERACTION);
        assert!(prompt.starts_with("You are QA Assistant, a friendly and helpful chatbot."));
        assert!(prompt.contains("User: what is regression testing?"));
        assert!(prompt.contains(FIRST_INTERACTION));
        assert!(!prompt.contains("[CP-001]"));
    }

    #[test]
    fn test_role_prompt_with_test_case_template() {
        let prompt = build_prompt(
            "QA Assistant",
            "act as a QA engineer and generate test cases for login",
            "User: hi\nQA Assistant: hello\n",
        );
        assert!(prompt.starts_with("You are QA Assistant, acting as a QA and test case expert."));
        assert!(prompt.contains("ISTQB"));
        assert!(prompt.contains(TEST_CASE_TEMPLATE));
        assert!(prompt.contains("User: hi\nQA Assistant: hello\n"));
    }

    #[test]
    fn test_attachment_prompt_uses_typed_question() {
        let prompt = build_prompt("Bot", &with_files("write a user manual"), FIRST_INTERACTION);
        assert!(prompt.contains("a chatbot specialized in analyzing documents"));
        assert!(prompt.contains("The user asks: \"write a user manual\""));
        assert!(prompt.contains(USER_MANUAL_TEMPLATE));
        assert!(prompt.contains("login rules"));
    }

    #[test]
    fn test_attachment_prompt_default_question() {
        let prompt = build_prompt("Bot", &with_files(""), FIRST_INTERACTION);
        assert!(prompt.contains("The user asks: \"Analyze the attached files\""));
    }

    #[test]
    fn test_attachment_text_does_not_select_templates() {
        let message = format!("summarize\n\n{}\nthese test cases are old\n", ATTACHMENTS_MARKER);
        let prompt = build_prompt("Bot", &message, FIRST_INTERACTION);
        assert!(!prompt.contains(TEST_CASE_TEMPLATE));
    }

    #[test]
    fn test_attachment_prompt_with_role() {
        let prompt = build_prompt("Bot", &with_files("act as an architect and review"), FIRST_INTERACTION);
        assert!(prompt.starts_with("You are Bot, acting as a software architect."));
        assert!(prompt.contains("File content and request:"));
    }
}
