// src/intent.rs

/// Substrings that mark a request for current news.
pub const NEWS_KEYWORDS: [&str; 11] = [
    "новости",
    "новость",
    "события",
    "событие",
    "обновления",
    "обновление",
    "что нового",
    "последние",
    "актуальные",
    "свежие",
    "news",
];

pub const EXIT_COMMANDS: [&str; 4] = ["выход", "quit", "exit", "q"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent<'a> {
    Skip,
    Exit,
    News,
    Question(&'a str),
}

/// Plain substring check, so "newsletter" matches too.
pub fn is_news_request(input: &str) -> bool {
    let lower = input.to_lowercase();
    NEWS_KEYWORDS.iter().any(|keyword| lower.contains(keyword))
}

pub fn is_exit_command(input: &str) -> bool {
    let lower = input.trim().to_lowercase();
    EXIT_COMMANDS.contains(&lower.as_str())
}

pub fn classify(input: &str) -> Intent<'_> {
    let input = input.trim();
    if input.is_empty() {
        Intent::Skip
    } else if is_exit_command(input) {
        Intent::Exit
    } else if is_news_request(input) {
        Intent::News
    } else {
        Intent::Question(input)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_keyword_is_detected_in_any_case() {
        for keyword in NEWS_KEYWORDS {
            assert!(is_news_request(keyword), "{keyword}");
            assert!(is_news_request(&keyword.to_uppercase()), "{keyword}");
            assert!(is_news_request(&format!("покажи {keyword} за сегодня")), "{keyword}");
        }
    }

    #[test]
    fn question_about_news_is_news() {
        assert!(is_news_request("Какие новости в ИИ?"));
        assert!(is_news_request("Что нового в TikTok"));
        assert!(is_news_request("latest NEWS please"));
    }

    #[test]
    fn unrelated_text_is_not_news() {
        assert!(!is_news_request("Расскажи про рекламу в Instagram"));
        assert!(!is_news_request("Как работает таргетинг?"));
        assert!(!is_news_request(""));
    }

    #[test]
    fn substring_false_positives_are_kept() {
        assert!(is_news_request("newsletter template"));
    }

    #[test]
    fn exit_commands_ignore_case() {
        for cmd in ["выход", "ВЫХОД", "Quit", "EXIT", "q", "Q", "  exit  "] {
            assert!(is_exit_command(cmd), "{cmd}");
        }
        assert!(!is_exit_command("quit now"));
        assert!(!is_exit_command("qq"));
    }

    #[test]
    fn classify_orders_checks() {
        assert_eq!(classify("   "), Intent::Skip);
        assert_eq!(classify("Q"), Intent::Exit);
        assert_eq!(classify("новости"), Intent::News);
        assert_eq!(
            classify("  Расскажи про рекламу в Instagram "),
            Intent::Question("Расскажи про рекламу в Instagram")
        );
    }
}
