use std::time::Duration;

use rand::seq::SliceRandom;
use reqwest::Client as HttpClient;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::config::Config;

/// AI21 model used for completions
pub const AI21_MODEL: &str = "j2-ultra";

/// Requested review length, controlling both the prompt and the token cap
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ReviewLength {
    Short,
    #[default]
    Medium,
    Long,
}

impl ReviewLength {
    fn max_tokens(&self) -> u32 {
        match self {
            ReviewLength::Short => 100,
            ReviewLength::Medium => 200,
            ReviewLength::Long => 300,
        }
    }

    fn instruction(&self) -> &'static str {
        match self {
            ReviewLength::Short => {
                "Write a VERY SHORT and concise film review (2-3 sentences maximum). \
                 Focus only on the most important aspects. Be direct and to the point."
            }
            ReviewLength::Medium => {
                "Write a standard length film review (4-6 sentences). Provide balanced \
                 analysis of key elements while maintaining readability."
            }
            ReviewLength::Long => {
                "Write a detailed, comprehensive film review. Explore various aspects in \
                 depth including narrative structure, character development, and technical \
                 execution."
            }
        }
    }
}

/// Drafts reviews through the AI21 completion API, falling back to canned
/// templates whenever the key is missing or the upstream call fails.
///
/// Generation never errors: a draft is a convenience, not a dependency,
/// so every failure path degrades to a template.
pub struct ReviewGenerator {
    http_client: HttpClient,
    api_key: Option<String>,
    base_url: String,
}

impl ReviewGenerator {
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let http_client = HttpClient::builder()
            .timeout(Duration::from_secs(30))
            .build()?;

        if config.ai21_api_key.is_none() {
            tracing::warn!("No AI21 API key configured; review drafting uses fallback templates");
        }

        Ok(Self {
            http_client,
            api_key: config.ai21_api_key.clone(),
            base_url: config.ai21_base_url.clone(),
        })
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    /// Generates a review draft for a title
    pub async fn generate(
        &self,
        title: &str,
        user_notes: &str,
        rating: Option<f64>,
        length: ReviewLength,
    ) -> String {
        let Some(api_key) = &self.api_key else {
            return fallback_review(title, user_notes, rating, length);
        };

        let prompt = build_prompt(title, user_notes, rating, length);
        let payload = json!({
            "prompt": prompt,
            "numResults": 1,
            "maxTokens": length.max_tokens(),
            "temperature": 0.7,
            "topP": 1,
            "stopSequences": ["\n\n", "Review:", "Rating:"],
        });

        let url = format!("{}/{}/complete", self.base_url, AI21_MODEL);
        let response = self
            .http_client
            .post(&url)
            .bearer_auth(api_key)
            .json(&payload)
            .send()
            .await;

        match response {
            Ok(response) if response.status().is_success() => {
                match response.json::<serde_json::Value>().await {
                    Ok(body) => match extract_generated_text(&body) {
                        Some(text) if !text.is_empty() => {
                            tracing::info!(title = %title, ?length, "AI review generated");
                            clean_text(&text)
                        }
                        _ => {
                            tracing::warn!(title = %title, "Empty AI21 completion, using fallback");
                            fallback_review(title, user_notes, rating, length)
                        }
                    },
                    Err(e) => {
                        tracing::error!(error = %e, "Failed to parse AI21 response");
                        fallback_review(title, user_notes, rating, length)
                    }
                }
            }
            Ok(response) => {
                tracing::error!(status = %response.status(), "AI21 API returned an error");
                fallback_review(title, user_notes, rating, length)
            }
            Err(e) => {
                tracing::error!(error = %e, "AI21 request failed");
                fallback_review(title, user_notes, rating, length)
            }
        }
    }
}

/// Builds the length- and rating-aware completion prompt
fn build_prompt(title: &str, user_notes: &str, rating: Option<f64>, length: ReviewLength) -> String {
    let mut parts: Vec<String> = vec![
        length.instruction().to_string(),
        format!("Review the film: '{}'.", title),
    ];

    if let Some(rating) = rating {
        parts.push(format!(
            "The review should reflect that this is {} (rated {}/10).",
            rating_sentiment(rating),
            rating
        ));
    }

    if !user_notes.trim().is_empty() {
        parts.push(format!("Focus your analysis on these aspects: {}", user_notes));
        parts.push(
            "Integrate these points naturally into your review without using phrases like \
             'Additional notes' or 'Viewer observations'."
                .to_string(),
        );
    }

    parts.push("Write in a professional critic's voice.".to_string());
    parts.push("Avoid spoilers and focus on the overall viewing experience.".to_string());
    parts.push(
        "DO NOT use phrases like 'Additional notes:', 'Viewer observations:', or similar \
         appendages."
            .to_string(),
    );

    parts.join("\n")
}

/// Maps a numeric rating to the closest sentiment phrase
fn rating_sentiment(rating: f64) -> &'static str {
    const SENTIMENTS: [(f64, &str); 9] = [
        (9.0, "an outstanding masterpiece that exceeds expectations"),
        (8.0, "an excellent film with remarkable qualities"),
        (7.0, "a very good movie with strong elements"),
        (6.0, "a decent film with some notable aspects"),
        (5.0, "a mediocre film with mixed qualities"),
        (4.0, "a below-average film with significant flaws"),
        (3.0, "a poor film with major issues"),
        (2.0, "a very disappointing film"),
        (1.0, "an exceptionally bad film"),
    ];

    SENTIMENTS
        .iter()
        .min_by(|a, b| {
            (a.0 - rating)
                .abs()
                .partial_cmp(&(b.0 - rating).abs())
                .unwrap_or(std::cmp::Ordering::Equal)
        })
        .map(|(_, sentiment)| *sentiment)
        .unwrap_or("a film")
}

fn extract_generated_text(body: &serde_json::Value) -> Option<String> {
    body["completions"][0]["data"]["text"]
        .as_str()
        .map(|s| s.trim().to_string())
}

/// Cleans a raw completion: trims trailing sentence fragments, drops
/// rating lines and strips note appendages the prompt forbids.
fn clean_text(text: &str) -> String {
    let mut text = text.trim().to_string();

    if let Some(last) = text.chars().last() {
        if !matches!(last, '.' | '!' | '?') {
            if let Some(cut) = text.rfind(['.', '!', '?']) {
                text.truncate(cut + 1);
            }
        }
    }

    let text: String = text
        .lines()
        .filter(|line| {
            let lower = line.to_lowercase();
            !["rating:", "score:", "/10", "/5"]
                .iter()
                .any(|phrase| lower.contains(phrase))
        })
        .collect::<Vec<_>>()
        .join("\n");
    let mut text = text.trim().to_string();

    for prefix in ["the review:", "review:"] {
        if text.to_lowercase().starts_with(prefix) {
            text = text[prefix.len()..].trim_start().to_string();
            break;
        }
    }

    for marker in ["Additional notes:", "Viewer observations:"] {
        if let Some(pos) = text.find(marker) {
            text.truncate(pos);
            text = text.trim_end().to_string();
        }
    }

    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => text,
    }
}

const SHORT_TEMPLATES: [&str; 3] = [
    "A compelling {content_type} that delivers strong performances and engaging \
     storytelling. The narrative flows smoothly with well-executed technical elements. \
     {user_notes}",
    "This {content_type} showcases impressive craftsmanship with memorable moments \
     throughout. Character development and visual execution stand out as particular \
     strengths. {user_notes}",
    "With its thoughtful approach to storytelling and solid technical execution, this \
     {content_type} offers a satisfying experience. {user_notes}",
];

const MEDIUM_TEMPLATES: [&str; 3] = [
    "This {content_type} demonstrates exceptional craftsmanship in both storytelling and \
     technical execution. The narrative unfolds with precision, keeping viewers engaged \
     from start to finish. {user_notes} Character development is particularly noteworthy, \
     with performances that bring depth and authenticity to the story.",
    "A masterful blend of compelling narrative and artistic expression, this \
     {content_type} stands as a significant achievement. {user_notes} The pacing is \
     expertly handled, allowing both dramatic moments and character interactions to shine.",
    "With its sophisticated approach to storytelling and remarkable attention to detail, \
     this {content_type} delivers an experience that is both intellectually stimulating \
     and emotionally satisfying. {user_notes} The ensemble cast delivers uniformly \
     excellent performances.",
];

const LONG_TEMPLATES: [&str; 2] = [
    "This {content_type} represents a remarkable achievement, showcasing a level of \
     craftsmanship that elevates it above typical genre offerings. The narrative \
     structure is meticulously constructed, with each scene serving a distinct purpose in \
     advancing both plot and character development. Performances across the board are \
     exceptional, with each actor bringing depth and authenticity to their roles. \
     Technical elements including cinematography, sound design, and editing work in \
     harmony to create an immersive viewing experience. {user_notes} The {content_type} \
     successfully balances entertainment value with artistic ambition, resulting in a \
     work that both engages in the moment and resonates long after viewing.",
    "From its opening moments, this {content_type} establishes itself as a work of \
     considerable artistic merit and technical proficiency. The storytelling approach \
     demonstrates a confident understanding of narrative rhythm, knowing precisely when \
     to accelerate tension and when to allow character moments to breathe. Character arcs \
     are developed with remarkable subtlety and psychological insight, avoiding cliche \
     while maintaining emotional accessibility. {user_notes} Its exploration of central \
     ideas is both intellectually rigorous and emotionally resonant, inviting multiple \
     interpretations while maintaining narrative coherence.",
];

/// Canned review used when the AI21 service is unavailable
fn fallback_review(
    title: &str,
    user_notes: &str,
    rating: Option<f64>,
    length: ReviewLength,
) -> String {
    tracing::info!(title = %title, ?length, "Using fallback review template");

    let templates: Vec<&str> = match length {
        ReviewLength::Short => SHORT_TEMPLATES.to_vec(),
        ReviewLength::Medium => MEDIUM_TEMPLATES.to_vec(),
        ReviewLength::Long => LONG_TEMPLATES.to_vec(),
    };

    // Bias template choice towards the rating's register.
    let keywords: &[&str] = match rating {
        Some(r) if r >= 8.0 => &["exceptional", "masterful", "remarkable"],
        Some(r) if r >= 6.0 => &["solid", "enjoyable", "satisfying"],
        Some(_) => &["ambition", "uneven", "flaws"],
        None => &[],
    };
    let filtered: Vec<&str> = if keywords.is_empty() {
        templates.clone()
    } else {
        templates
            .iter()
            .filter(|t| keywords.iter().any(|k| t.to_lowercase().contains(k)))
            .copied()
            .collect()
    };

    let candidates = if filtered.is_empty() { &templates } else { &filtered };
    let template = candidates
        .choose(&mut rand::thread_rng())
        .copied()
        .unwrap_or(MEDIUM_TEMPLATES[0]);

    let lower = title.to_lowercase();
    let content_type = if lower.contains("season") || lower.contains("episode") {
        "series"
    } else {
        "film"
    };

    let notes = if user_notes.trim().is_empty() {
        String::new()
    } else {
        format!("The {} particularly excels in {}.", content_type, user_notes.to_lowercase())
    };

    template
        .replace("{content_type}", content_type)
        .replace("{user_notes}", &notes)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}
