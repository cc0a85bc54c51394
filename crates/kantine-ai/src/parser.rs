//! AI-assisted menu parsing with prompt escalation.

use kantine_core::DayMenu;
use serde_json::Value;
use tracing::{info, warn};

use crate::ExtractError;
use crate::completion::{CompletionClient, Turn};
use crate::prompts::default_prompts;

/// Asks a completion service for a JSON menu, one prompt variant at a time.
pub struct AiParser<C> {
    client: Option<C>,
    prompts: Vec<Vec<Turn>>,
}

impl<C: CompletionClient> AiParser<C> {
    /// Parser with the default prompt ladder. `None` means no credentials.
    pub fn new(client: Option<C>) -> Self {
        Self::with_prompts(client, default_prompts())
    }

    pub fn with_prompts(client: Option<C>, prompts: Vec<Vec<Turn>>) -> Self {
        Self { client, prompts }
    }

    /// The configured client, or a configuration error if credentials were absent.
    pub fn client(&self) -> Result<&C, ExtractError> {
        self.client.as_ref().ok_or_else(|| {
            ExtractError::Configuration("missing OpenAI API key or organization".into())
        })
    }

    /// Extract a menu from `text`.
    ///
    /// Each prompt variant gets one request. A reply that is not JSON, or not
    /// shaped like a weekday menu, moves on to the next variant; the first
    /// valid reply is returned. Transport and API errors end the attempt.
    pub async fn parse(&self, text: &str) -> Result<DayMenu, ExtractError> {
        let client = self.client()?;

        info!(variants = self.prompts.len(), "parsing menu with completion service");
        for (attempt, prompt) in self.prompts.iter().enumerate() {
            let reply = match client.complete(prompt, text).await {
                Ok(reply) => reply,
                Err(ExtractError::Validation(reason)) => {
                    warn!(attempt, %reason, "unusable completion, escalating prompt");
                    continue;
                }
                Err(e) => return Err(e),
            };

            match decode_reply(&reply) {
                Ok(menu) => {
                    info!(attempt, dishes = menu.dish_count(), "completion accepted");
                    return Ok(menu);
                }
                Err(e) => warn!(attempt, error = %e, "completion rejected, escalating prompt"),
            }
        }

        Err(ExtractError::Extraction("could not parse menu".into()))
    }
}

/// Decode and shape-check a completion reply.
///
/// A Markdown code fence around the JSON is tolerated.
pub fn decode_reply(reply: &str) -> Result<DayMenu, ExtractError> {
    let json = strip_code_fence(reply);
    let value: Value = serde_json::from_str(json)
        .map_err(|e| ExtractError::Validation(format!("not JSON: {e}")))?;
    DayMenu::from_json(&value).map_err(|e| ExtractError::Validation(e.to_string()))
}

fn strip_code_fence(reply: &str) -> &str {
    let trimmed = reply.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest.strip_suffix("```").unwrap_or(rest);
    // An opening line may carry an info string such as `json`; JSON may also
    // start right after the fence.
    match rest.split_once('\n') {
        Some((info, body)) if !info.contains(['{', '[']) => body.trim(),
        _ => rest.trim(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{ScriptedClient, VALID_REPLY};
    use kantine_core::Weekday;

    fn two_variants() -> Vec<Vec<Turn>> {
        vec![
            vec![Turn::system("short")],
            vec![Turn::system("long"), Turn::user("details")],
        ]
    }

    #[tokio::test]
    async fn first_valid_reply_short_circuits() {
        let client = ScriptedClient::replying(&[VALID_REPLY, VALID_REPLY]);
        let parser = AiParser::with_prompts(Some(client), two_variants());

        let menu = parser.parse("Tirsdag\n\nx").await.unwrap();
        assert_eq!(menu.dishes(Weekday::Tirsdag), ["x"]);
        assert_eq!(parser.client().unwrap().calls(), 1);
    }

    #[tokio::test]
    async fn escalates_after_shape_failure() {
        let missing_friday = r#"{"mandag": [], "tirsdag": [], "onsdag": [], "torsdag": []}"#;
        let second = r#"{"mandag": ["a"], "tirsdag": [], "onsdag": [], "torsdag": [], "fredag": ["b"]}"#;
        let client = ScriptedClient::replying(&[missing_friday, second, VALID_REPLY]);
        let parser = AiParser::with_prompts(Some(client), two_variants());

        let menu = parser.parse("text").await.unwrap();
        assert_eq!(menu.dishes(Weekday::Mandag), ["a"]);
        assert_eq!(menu.dishes(Weekday::Fredag), ["b"]);

        let client = parser.client().unwrap();
        assert_eq!(client.calls(), 2);
        let prompts = client.prompts();
        assert_eq!(prompts[0], two_variants()[0]);
        assert_eq!(prompts[1], two_variants()[1]);
    }

    #[tokio::test]
    async fn escalates_after_invalid_json() {
        let client = ScriptedClient::replying(&["Here is the menu: mandag ...", VALID_REPLY]);
        let parser = AiParser::with_prompts(Some(client), two_variants());

        assert!(parser.parse("text").await.is_ok());
        assert_eq!(parser.client().unwrap().calls(), 2);
    }

    #[tokio::test]
    async fn exhausted_ladder_is_an_extraction_error() {
        let client = ScriptedClient::replying(&["nope", r#"{"mandag": "Suppe"}"#]);
        let parser = AiParser::with_prompts(Some(client), two_variants());

        let err = parser.parse("text").await.unwrap_err();
        assert!(matches!(err, ExtractError::Extraction(ref m) if m == "could not parse menu"));
        assert_eq!(parser.client().unwrap().calls(), 2);
    }

    #[tokio::test]
    async fn empty_reply_content_escalates() {
        let client = ScriptedClient::new(vec![
            Err(ExtractError::Validation("reply has no message content".into())),
            Ok(VALID_REPLY.to_string()),
        ]);
        let parser = AiParser::with_prompts(Some(client), two_variants());

        assert!(parser.parse("text").await.is_ok());
    }

    #[tokio::test]
    async fn api_error_aborts_without_escalating() {
        let client = ScriptedClient::new(vec![
            Err(ExtractError::Api {
                status: 500,
                body: "upstream".into(),
            }),
            Ok(VALID_REPLY.to_string()),
        ]);
        let parser = AiParser::with_prompts(Some(client), two_variants());

        let err = parser.parse("text").await.unwrap_err();
        assert!(matches!(err, ExtractError::Api { status: 500, .. }));
        assert_eq!(parser.client().unwrap().calls(), 1);
    }

    #[tokio::test]
    async fn missing_client_is_a_configuration_error() {
        let parser: AiParser<ScriptedClient> = AiParser::new(None);
        let err = parser.parse("text").await.unwrap_err();
        assert!(matches!(err, ExtractError::Configuration(_)));
    }

    #[test]
    fn decode_accepts_fenced_json() {
        let fenced = format!("```json\n{VALID_REPLY}\n```");
        assert!(decode_reply(&fenced).is_ok());
        let bare_fence = format!("```{VALID_REPLY}```");
        assert!(decode_reply(&bare_fence).is_ok());
    }

    #[test]
    fn decode_keeps_json_that_starts_on_the_fence_line() {
        let reply = "```{\n\"mandag\": [\"Suppe\"], \"tirsdag\": [], \"onsdag\": [],\n\"torsdag\": [], \"fredag\": []}\n```";
        let menu = decode_reply(reply).unwrap();
        assert_eq!(menu.dishes(Weekday::Mandag), ["Suppe"]);

        let indented = "```json \n  {\"mandag\": [], \"tirsdag\": [], \"onsdag\": [], \"torsdag\": [], \"fredag\": [\"Pizza\"]}\n```";
        assert_eq!(decode_reply(indented).unwrap().dishes(Weekday::Fredag), ["Pizza"]);
    }

    #[test]
    fn decode_rejects_wrong_shapes() {
        assert!(matches!(
            decode_reply("[]"),
            Err(ExtractError::Validation(_))
        ));
        assert!(matches!(
            decode_reply("{\"mandag\": [1]}"),
            Err(ExtractError::Validation(_))
        ));
    }
}
