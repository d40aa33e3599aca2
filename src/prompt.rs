// src/prompt.rs

use crate::llm::ChatMessage;

/// Persona sent as the system message of every request.
pub const BOT_STYLE: &str = "Ты — дружелюбный и компетентный ассистент-аналитик. \
Пиши на русском языке, простым и живым стилем, без канцелярита. \
Структурируй ответ короткими абзацами или списками. \
Не используй рекламные призывы и не упоминай сервисы, через которые ты работаешь.";

const INTERACTIVE_INSTRUCTIONS: &str = "Ты — эксперт по новостям в области маркетинга, технологий, рекламы, \
искусственного интеллекта и социальных сетей. \
Отвечай кратко, по делу, основываясь на актуальных событиях. \
Если вопрос касается новостей, предоставь свежую информацию. \
Не придумывай факты и не давай вымышленные ссылки.";

/// Digest request used by the news path.
pub const NEWS_PROMPT: &str = "Подготовь подборку из 5–7 самых свежих и значимых новостей \
в области маркетинга, технологий, рекламы, искусственного интеллекта и социальных сетей.\n\n\
Оформи каждую новость строго так:\n\
1. **Заголовок новости**\n\
Краткое описание в 1–2 предложениях.\n\
Источник: название издания или ссылка\n\n\
Не придумывай факты и не давай вымышленные ссылки. Не добавляй вступлений и выводов.";

pub fn build_interactive_prompt(user_input: &str) -> String {
    format!("Пользователь спрашивает: '{}'\n\n{}", user_input, INTERACTIVE_INSTRUCTIONS)
}

/// System persona, then prior turns, then the wrapped question.
pub fn build_messages(style: &str, history: &[(String, String)], user_input: &str) -> Vec<ChatMessage> {
    let mut messages = Vec::with_capacity(2 + history.len() * 2);
    messages.push(ChatMessage::system(style));
    for (question, answer) in history {
        messages.push(ChatMessage::user(question.as_str()));
        messages.push(ChatMessage::assistant(answer.as_str()));
    }
    messages.push(ChatMessage::user(build_interactive_prompt(user_input)));
    messages
}
