//! [`IntelligenceGateway`] backed by a chat-completions model and optional
//! public web research.

use serde_json::{Map, Value};
use sponsorlens_analysis::extract::extract_json_object;
use sponsorlens_analysis::{
    BoxFuture, BrandBackground, CollaboratorError, ContextualScore, DataSources,
    IntelligenceGateway, ScoringInsights, ScoringRequest, SummaryRequest,
};
use sponsorlens_core::AppConfig;

use crate::chat::{ChatClient, Sampling};
use crate::error::IntelError;
use crate::prompts::{
    background_prompt, scoring_prompt, summary_prompt, RESEARCH_SYSTEM, SCORING_SYSTEM,
    SUMMARY_SYSTEM,
};
use crate::research::WebResearcher;

const SERVICE: &str = "openai";

const RESEARCH_SAMPLING: Sampling = Sampling {
    temperature: 0.3,
    max_tokens: 800,
};
const SCORING_SAMPLING: Sampling = Sampling {
    temperature: 0.2,
    max_tokens: 1000,
};
const SUMMARY_SAMPLING: Sampling = Sampling {
    temperature: 0.3,
    max_tokens: 1500,
};

fn object_from(text: &str, what: &str) -> Result<Map<String, Value>, IntelError> {
    extract_json_object(text)
        .ok_or_else(|| IntelError::UnusableOutput(format!("no JSON object in {what} response")))
}

pub struct OpenAiGateway {
    chat: ChatClient,
    research: Option<WebResearcher>,
}

impl OpenAiGateway {
    /// `research` is `None` when web lookups are disabled.
    #[must_use]
    pub fn new(chat: ChatClient, research: Option<WebResearcher>) -> Self {
        Self { chat, research }
    }

    /// # Errors
    ///
    /// Returns [`IntelError`] if either HTTP client cannot be constructed.
    pub fn from_config(config: &AppConfig) -> Result<Self, IntelError> {
        let research = if config.enable_web_search {
            Some(WebResearcher::new()?)
        } else {
            None
        };
        Ok(Self::new(ChatClient::from_config(config)?, research))
    }

    async fn research_background(&self, brand: &str) -> BrandBackground {
        let snippets = match &self.research {
            Some(research) => research.search(brand, "company overview industry").await,
            None => Vec::new(),
        };
        let web_searches = snippets.len();

        let answered = match self
            .chat
            .complete(
                RESEARCH_SYSTEM,
                &background_prompt(brand, &snippets),
                RESEARCH_SAMPLING,
            )
            .await
        {
            Ok(text) => object_from(&text, "research").and_then(|map| {
                serde_json::from_value::<BrandBackground>(Value::Object(map)).map_err(|e| {
                    IntelError::Deserialize {
                        context: format!("brand background for {brand}"),
                        source: e,
                    }
                })
            }),
            Err(e) => Err(e),
        };

        let mut background = match answered {
            Ok(background) => background,
            Err(e) => {
                tracing::warn!(brand, error = %e, "brand research degraded to empty background");
                BrandBackground::unavailable(e.to_string())
            }
        };
        background.data_sources = DataSources {
            web_searches,
            enhanced_with_ai: background.error.is_none(),
        };
        background.web_search_results = snippets;
        background
    }

    async fn score_request(&self, request: &ScoringRequest) -> Result<ContextualScore, IntelError> {
        let prompt = scoring_prompt(request).map_err(|e| IntelError::Deserialize {
            context: "scoring prompt".to_owned(),
            source: e,
        })?;
        let text = self
            .chat
            .complete(SCORING_SYSTEM, &prompt, SCORING_SAMPLING)
            .await?;
        let insights: ScoringInsights =
            serde_json::from_value(Value::Object(object_from(&text, "scoring")?)).map_err(
                |e| IntelError::Deserialize {
                    context: format!("scoring insights for {}", request.brand),
                    source: e,
                },
            )?;
        let scored = ContextualScore::from_insights(insights);
        tracing::info!(brand = %request.brand, score = scored.score, "placement scored");
        Ok(scored)
    }

    async fn summarize(&self, request: &SummaryRequest) -> Result<Map<String, Value>, IntelError> {
        let prompt = summary_prompt(request).map_err(|e| IntelError::Deserialize {
            context: "summary prompt".to_owned(),
            source: e,
        })?;
        let text = self
            .chat
            .complete(SUMMARY_SYSTEM, &prompt, SUMMARY_SAMPLING)
            .await?;
        object_from(&text, "summary")
    }
}

impl IntelligenceGateway for OpenAiGateway {
    fn enrich_brand_background<'a>(&'a self, brand: &'a str) -> BoxFuture<'a, BrandBackground> {
        Box::pin(self.research_background(brand))
    }

    fn score<'a>(
        &'a self,
        request: &'a ScoringRequest,
    ) -> BoxFuture<'a, Result<ContextualScore, CollaboratorError>> {
        Box::pin(async move {
            self.score_request(request)
                .await
                .map_err(|e| CollaboratorError::new(SERVICE, e.to_string()))
        })
    }

    fn executive_summary<'a>(
        &'a self,
        request: &'a SummaryRequest,
    ) -> BoxFuture<'a, Result<Map<String, Value>, CollaboratorError>> {
        Box::pin(async move {
            self.summarize(request)
                .await
                .map_err(|e| CollaboratorError::new(SERVICE, e.to_string()))
        })
    }
}
