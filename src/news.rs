// src/news.rs

use crate::error::{NewsError, Result};
use crate::filter::filter_advertisements;
use crate::llm::{ChatMessage, CompletionRequest, CompletionService};
use crate::prompt::{BOT_STYLE, NEWS_PROMPT};
use async_trait::async_trait;
use regex::Regex;
use std::io::Write;
use std::sync::{Arc, LazyLock};
use std::time::Duration;
use tracing::{debug, instrument};

const RULE_WIDTH: usize = 50;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewsItem {
    pub title: String,
    pub summary: String,
    pub source: Option<String>,
}

/// Where the news branch gets its digest from.
#[async_trait]
pub trait NewsSource: Send + Sync {
    async fn fetch_news(&self) -> std::result::Result<String, NewsError>;
}

/// Asks the completion service for a digest using the fixed news prompt.
pub struct LlmNewsSource {
    service: Arc<dyn CompletionService>,
    model: String,
    timeout: Duration,
}

impl LlmNewsSource {
    pub fn new(service: Arc<dyn CompletionService>, model: impl Into<String>, timeout: Duration) -> Self {
        Self { service, model: model.into(), timeout }
    }
}

#[async_trait]
impl NewsSource for LlmNewsSource {
    #[instrument(skip(self), fields(provider = self.service.name()))]
    async fn fetch_news(&self) -> std::result::Result<String, NewsError> {
        let request = CompletionRequest {
            model: self.model.clone(),
            messages: vec![ChatMessage::system(BOT_STYLE), ChatMessage::user(NEWS_PROMPT)],
            stream: false,
            timeout: self.timeout,
        };
        let raw = self.service.complete(&request).await.map_err(NewsError::new)?;
        debug!(chars = raw.len(), "Received news digest");
        Ok(filter_advertisements(&raw))
    }
}

// "1. Title", "2) Title", "### 3. Title", or a bold bullet "- **Title**".
static ITEM_START: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*#{0,6}\s*(?:\d{1,2}[.)]\s+(?P<num>.+)|[-*•]\s+(?P<bullet>\*\*.+))$")
        .expect("item pattern is valid")
});

static SOURCE_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\s*[-*•]?\s*\**(?:источник|source|ссылка|link)\**\s*:\s*\**\s*(?P<value>.*?)\s*$")
        .expect("source pattern is valid")
});

fn clean_title(raw: &str) -> String {
    raw.replace("**", "")
        .replace("__", "")
        .trim_matches(|c: char| c == '#' || c.is_whitespace())
        .trim_end_matches(':')
        .trim()
        .to_string()
}

/// Splits a digest into items; returns an empty list when the text has no recognisable structure.
pub fn parse_news_structure(text: &str) -> Vec<NewsItem> {
    let mut items: Vec<NewsItem> = Vec::new();
    let mut current: Option<NewsItem> = None;

    for line in text.lines() {
        let trimmed = line.trim();
        // Checked first: "- **Источник:** x" would otherwise open a bold-bullet item
        if let (Some(item), Some(caps)) = (current.as_mut(), SOURCE_LINE.captures(trimmed)) {
            let value = caps["value"].trim_end_matches("**").trim();
            if !value.is_empty() {
                item.source = Some(value.to_string());
            }
            continue;
        }

        if let Some(caps) = ITEM_START.captures(line) {
            if let Some(done) = current.take() {
                items.push(done);
            }
            let raw = caps
                .name("num")
                .or_else(|| caps.name("bullet"))
                .map_or("", |m| m.as_str());
            current = Some(NewsItem {
                title: clean_title(raw),
                summary: String::new(),
                source: None,
            });
            continue;
        }

        let Some(item) = current.as_mut() else { continue };
        if trimmed.is_empty() {
            continue;
        }
        if !item.summary.is_empty() {
            item.summary.push(' ');
        }
        item.summary.push_str(trimmed);
    }
    if let Some(done) = current {
        items.push(done);
    }

    items.retain(|item| !item.title.is_empty());
    items
}

pub fn display_news(items: &[NewsItem], out: &mut impl Write) -> Result<()> {
    let rule = "=".repeat(RULE_WIDTH);
    writeln!(out, "\nСВЕЖИЕ НОВОСТИ")?;
    writeln!(out, "{}", rule)?;
    for (i, item) in items.iter().enumerate() {
        writeln!(out, "\n{}. {}", i + 1, item.title)?;
        if !item.summary.is_empty() {
            writeln!(out, "   {}", item.summary)?;
        }
        if let Some(source) = &item.source {
            writeln!(out, "   Источник: {}", source)?;
        }
        writeln!(out, "{}", "-".repeat(RULE_WIDTH))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::FakeCompletion;

    const DIGEST: &str = "\
1. **OpenAI представила GPT-5**
Модель стала быстрее и точнее.
Работает в ChatGPT с сегодняшнего дня.
Источник: https://openai.com/blog

2) Meta запускает рекламу в Threads
Первые объявления появятся в США.
**Source:** The Verge

### 3. TikTok Shop выходит в Европу:
Сервис заработает во Франции и Германии.
";

    #[test]
    fn numbered_items_are_split() {
        let items = parse_news_structure(DIGEST);
        assert_eq!(items.len(), 3);
        assert_eq!(items[0].title, "OpenAI представила GPT-5");
        assert_eq!(items[0].summary, "Модель стала быстрее и точнее. Работает в ChatGPT с сегодняшнего дня.");
        assert_eq!(items[0].source.as_deref(), Some("https://openai.com/blog"));
        assert_eq!(items[1].title, "Meta запускает рекламу в Threads");
        assert_eq!(items[1].source.as_deref(), Some("The Verge"));
        assert_eq!(items[2].title, "TikTok Shop выходит в Европу");
        assert_eq!(items[2].source, None);
    }

    #[test]
    fn bold_bullets_count_as_items() {
        let items = parse_news_structure("- **Первая**\nтекст\n- обычный пункт\n* **Вторая**");
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].title, "Первая");
        assert_eq!(items[0].summary, "текст - обычный пункт");
        assert_eq!(items[1].title, "Вторая");
    }

    #[test]
    fn bold_bullet_source_stays_with_its_item() {
        let items = parse_news_structure("1. **Заголовок**\nОписание\n- **Источник:** vc.ru");
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].title, "Заголовок");
        assert_eq!(items[0].summary, "Описание");
        assert_eq!(items[0].source.as_deref(), Some("vc.ru"));

        let items = parse_news_structure("- **Первая**\nтекст\n* **Source:** The Verge\n- **Вторая**");
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].source.as_deref(), Some("The Verge"));
        assert_eq!(items[1].title, "Вторая");
    }

    #[test]
    fn preamble_before_first_item_is_ignored() {
        let items = parse_news_structure("Вот свежие новости:\n\n1. Заголовок\nОписание");
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].summary, "Описание");
    }

    #[test]
    fn unstructured_text_yields_nothing() {
        assert!(parse_news_structure("Сегодня ничего существенного не произошло.").is_empty());
        assert!(parse_news_structure("").is_empty());
    }

    #[test]
    fn empty_titles_are_dropped() {
        let items = parse_news_structure("1. ****\nтекст\n2. Настоящая");
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].title, "Настоящая");
    }

    #[test]
    fn display_numbers_items() {
        let items = vec![
            NewsItem { title: "Первая".into(), summary: "Кратко".into(), source: Some("vc.ru".into()) },
            NewsItem { title: "Вторая".into(), summary: String::new(), source: None },
        ];
        let mut out = Vec::new();
        display_news(&items, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("СВЕЖИЕ НОВОСТИ"));
        assert!(text.contains("1. Первая\n   Кратко\n   Источник: vc.ru"));
        assert!(text.contains("2. Вторая\n---"));
    }

    #[tokio::test]
    async fn llm_source_sends_digest_prompt_and_filters() {
        let service = Arc::new(FakeCompletion::answering("1. Новость\nтекст\nPowered by FreeGPT"));
        let source = LlmNewsSource::new(service.clone(), "gpt-4", Duration::from_secs(30));
        let digest = source.fetch_news().await.unwrap();
        assert_eq!(digest, "1. Новость\nтекст");

        let seen = service.requests.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].model, "gpt-4");
        assert!(!seen[0].stream);
        assert_eq!(seen[0].timeout, Duration::from_secs(30));
        assert_eq!(seen[0].messages[0], ChatMessage::system(BOT_STYLE));
        assert_eq!(seen[0].messages[1], ChatMessage::user(NEWS_PROMPT));
    }

    #[tokio::test]
    async fn llm_source_failure_is_a_news_error() {
        let service = Arc::new(FakeCompletion::failing("rate limited"));
        let source = LlmNewsSource::new(service, "gpt-4", Duration::from_secs(30));
        let err = source.fetch_news().await.unwrap_err();
        assert!(err.to_string().contains("rate limited"));
    }
}
