//! User-facing reply texts.
//!
//! Every failure the user can see is a short, friendly message; raw
//! provider errors and stack traces never reach the chat.

/// Reply to `/start`.
pub const WELCOME: &str = "👋 Добро пожаловать в Weather Bot!\n\n\
🌤 Просто отправьте название города, и я покажу текущую погоду.\n\n\
Примеры:\n\
• Москва\n\
• Санкт-Петербург\n\
• London\n\
• New York\n\n\
Также доступна команда /weather <город> для быстрого запроса.";

/// Reply to `/weather` with no city argument.
pub const WEATHER_USAGE: &str = "🌤️ Укажите название города после команды /weather\n\n\
Примеры:\n\
• /weather Москва\n\
• /weather London\n\
• /weather Санкт-Петербург";

/// Generic help shown when no city candidate could be extracted.
pub const USAGE_HELP: &str = "🌤️ Для получения погоды используйте:\n\n\
• Команду: /weather Название_города\n\
• Или просто напишите название города\n\n\
Примеры:\n\
• /weather Москва\n\
• Санкт-Петербург\n\
• London";

/// Help shown when a verbatim fallback lookup came back not-found,
/// meaning the input itself was probably not a city.
pub const FALLBACK_HELP: &str = "👋 Привет! Я бот для получения информации о погоде.\n\n\
Просто напишите название города, и я расскажу вам о текущей погоде.\n\n\
Например: \"Москва\", \"Санкт-Петербург\", \"Екатеринбург\"\n\n\
Также можете использовать команды:\n\
• /start - показать это сообщение\n\
• /weather <город> - получить погоду";

/// Reply to an unrecognized slash command.
pub const UNKNOWN_COMMAND: &str = "❓ Неизвестная команда.\n\n\
🌤️ Доступные команды:\n\
• /start - начать работу с ботом\n\
• /weather <город> - получить погоду\n\n\
Или просто напишите название города.";

/// Reply for an invalid city name.
pub const INVALID_CITY: &str = "❌ Некорректное название города. Проверьте правильность написания.";

/// Generic retryable-failure reply (timeouts, network errors,
/// unexpected provider responses).
pub const TRY_AGAIN_LATER: &str =
    "❌ Произошла ошибка при получении данных о погоде. Попробуйте позже.";

/// Loading placeholder sent before the provider call.
pub fn loading(city: &str) -> String {
    format!("🔄 Получение погоды для: {}...", city)
}

/// Not-found reply naming the city the user asked about.
pub fn city_not_found(city: &str) -> String {
    format!(
        "❌ Город \"{}\" не найден. Проверьте правильность написания.",
        city
    )
}
