use async_openai::types::{
    ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
    ChatCompletionRequestUserMessageArgs,
};
use color_eyre::{eyre::eyre, Result};

use super::RoastVerdict;

const SYSTEM_PROMPT: &str = "You are a helpful assistant that outputs JSON only.";

/// Prompt pair sent to every candidate model.
///
/// Invariant: the system message always comes first, the user message second.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoastPrompt {
    pub system: String,
    pub user: String,
}

impl RoastPrompt {
    /// Build the roast request for a team within a game context.
    pub fn for_team<S: AsRef<str>>(team: &[S], game_context: &str) -> Self {
        let names: Vec<&str> = team.iter().map(|n| n.as_ref()).collect();
        let game = if game_context.trim().is_empty() { "General Pokemon" } else { game_context.trim() };
        let user = format!(
            "You are a toxic competitive Pokemon player. The user is playing: **{game}**.\n\
             Their team: {team}.\n\n\
             ROAST THEM. Be mean, be specific about their bad type coverage, weak stats, or basic choices.\n\n\
             Return ONLY JSON format:\n\
             {{\n  \"roast\": \"Your roast paragraph...\",\n  \"worst_pokemon\": \"The exact name of the worst pokemon on their team\"\n}}",
            team = names.join(", "),
        );
        Self { system: SYSTEM_PROMPT.to_string(), user }
    }

    /// Convert into chat messages (system first).
    pub fn to_messages(&self) -> Result<Vec<ChatCompletionRequestMessage>> {
        let system = ChatCompletionRequestSystemMessageArgs::default()
            .content(self.system.as_str())
            .build()?;
        let user = ChatCompletionRequestUserMessageArgs::default()
            .content(self.user.as_str())
            .build()?;
        Ok(vec![system.into(), user.into()])
    }
}

/// Parse a model reply into a verdict.
///
/// Accepts a bare JSON object or one wrapped in Markdown fences / surrounding prose.
/// A reply without a non-empty `roast` is an error.
pub fn parse_verdict(raw: &str) -> Result<RoastVerdict> {
    let trimmed = raw.trim();
    let start = trimmed.find('{').ok_or_else(|| eyre!("reply has no JSON object"))?;
    let end = trimmed.rfind('}').ok_or_else(|| eyre!("reply has no JSON object"))?;
    if end < start {
        return Err(eyre!("reply has no JSON object"));
    }
    let mut verdict: RoastVerdict = serde_json::from_str(&trimmed[start..=end])?;
    if verdict.roast.trim().is_empty() {
        return Err(eyre!("reply has an empty roast"));
    }
    verdict.worst_pokemon = verdict.worst_pokemon.trim().to_string();
    verdict.model = None;
    Ok(verdict)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_names_team_and_game() {
        let p = RoastPrompt::for_team(&["pikachu", "magikarp"], "Red / Blue / Yellow");
        assert!(p.user.contains("pikachu, magikarp"));
        assert!(p.user.contains("**Red / Blue / Yellow**"));
        assert!(p.user.contains("\"worst_pokemon\""));
        assert_eq!(p.to_messages().unwrap().len(), 2);
    }

    #[test]
    fn blank_game_uses_general_context() {
        let p = RoastPrompt::for_team(&["eevee"], "  ");
        assert!(p.user.contains("**General Pokemon**"));
    }

    #[test]
    fn parses_fenced_json() {
        let raw = "```json\n{\"roast\": \"lol\", \"worst_pokemon\": \" Magikarp \"}\n```";
        let v = parse_verdict(raw).unwrap();
        assert_eq!(v.roast, "lol");
        assert_eq!(v.worst_pokemon, "Magikarp");
    }

    #[test]
    fn rejects_garbage_and_empty_roast() {
        assert!(parse_verdict("no json here").is_err());
        assert!(parse_verdict("} {").is_err());
        assert!(parse_verdict(r#"{"roast": "  "}"#).is_err());
    }
}
