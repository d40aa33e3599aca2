// src/filter.rs

use regex::Regex;
use std::sync::LazyLock;

// Free chat gateways append promo footers; lines matching any of these are dropped.
static AD_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"(?i)\bподпиш(ись|итесь)\b|\bподписыва(йся|йтесь)\b",
        r"(?i)^\W*(please\s+)?(subscribe|follow\s+us)\b|\bsubscribe\s+to\s+(our|my)\b",
        r"(?i)^\W*(реклама|sponsored|advertisement)\W*$",
        r"(?i)^\s*(реклама|sponsored|advertisement|ad)\s*[:|]",
        r"(?i)\bпромо-?код\b|\bpromo\s*code\b",
        r"(?i)\bpowered\s+by\b",
        r"(?i)\bgenerated\s+by\b.*\b(gpt|ai)\b",
        r"(?i)(chatgpt|gpt4|g4f)[\w.-]*\.(ru|com|org|net|io|chat)\b",
        r"(?i)\bреферальн\w*\s+ссылк",
        r"(?i)\bref(erral)?=\w+",
        r"(?i)наш\s+(telegram|телеграм)[-\s]*канал",
        r"(?i)\bjoin\s+our\s+(discord|telegram)\b",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("ad pattern is valid"))
    .collect()
});

pub fn is_advertisement(line: &str) -> bool {
    AD_PATTERNS.iter().any(|re| re.is_match(line))
}

/// Drops promotional lines and squeezes the blank runs they leave behind.
pub fn filter_advertisements(text: &str) -> String {
    let mut kept: Vec<&str> = Vec::new();
    for line in text.lines() {
        if is_advertisement(line) {
            continue;
        }
        let blank = line.trim().is_empty();
        if blank && kept.last().map_or(true, |prev| prev.trim().is_empty()) {
            continue;
        }
        kept.push(line.trim_end());
    }
    kept.join("\n").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_patterns_compile() {
        assert_eq!(AD_PATTERNS.len(), 12);
    }

    #[test]
    fn plain_answer_is_untouched() {
        let text = "Instagram тестирует новый формат Reels.\n\nОн появится в ленте в марте.";
        assert_eq!(filter_advertisements(text), text);
    }

    #[test]
    fn promo_footer_is_removed() {
        let text = "Ответ по существу.\n\nPowered by FreeGPT\nПодписывайтесь на наш Telegram-канал!";
        assert_eq!(filter_advertisements(text), "Ответ по существу.");
        for footer in ["Подпишитесь на наш канал!", "Подпишись, чтобы не пропустить", "Подписывайся на обновления"] {
            assert_eq!(filter_advertisements(&format!("Ответ.\n{footer}")), "Ответ.", "{footer}");
        }
    }

    #[test]
    fn standalone_promo_labels_are_removed() {
        assert_eq!(filter_advertisements("Текст\n(Реклама)\nЕщё текст"), "Текст\nЕщё текст");
        assert_eq!(filter_advertisements("Subscribe for more AI news!\nТекст"), "Текст");
        assert_eq!(filter_advertisements("Текст\nDon't forget to subscribe to our channel"), "Текст");
    }

    #[test]
    fn news_about_ads_and_subscriptions_survives() {
        let text = "Meta запускает новый формат.\nВ Threads появилась реклама.";
        assert_eq!(filter_advertisements(text), text);
        let text = "YouTube now lets creators ask viewers to subscribe from Shorts.";
        assert_eq!(filter_advertisements(text), text);
    }

    #[test]
    fn gateway_links_and_codes_are_removed() {
        let text = "Первая строка\nПопробуйте chatgpt-free.ru бесплатно\nПромокод SALE10 даёт скидку\nПоследняя строка";
        assert_eq!(filter_advertisements(text), "Первая строка\nПоследняя строка");
    }

    #[test]
    fn blank_runs_collapse() {
        let text = "\n\nраз\n\n\n\nдва\n\n";
        assert_eq!(filter_advertisements(text), "раз\n\nдва");
    }

    #[test]
    fn topic_words_do_not_trigger() {
        assert!(!is_advertisement("Рынок рекламы в России вырос на 20%"));
        assert!(!is_advertisement("Расскажи про рекламу в Instagram"));
    }
}
