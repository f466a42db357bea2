//! User-facing reply texts.

pub const WELCOME: &str = "🎭 Memify Bot - присылает свежие мемы с Memify.ru!\n\n\
🔹 /meme - Получить случайный мем\n\
🔹 /stats - Статистика бота";

pub const NO_MEME: &str = "😢 Сейчас не могу найти мем. Попробуйте позже.";

pub const DELIVERY_FAULT: &str = "⚠️ Ошибка при отправке мема. Попробуйте снова.";

pub fn stats(served: usize, source: &str) -> String {
    format!("📊 Статистика Memify Bot:\n• Отправлено мемов: {served}\n• Источник: {source}")
}
