//! Consumed endpoints and the user-facing messages for their failures.

use crate::domain::MarketmodError;

const UNREACHABLE: &str = "Не удалось подключиться к серверу";

/// Every API operation the console performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    ListAdvertisements,
    GetAdvertisement,
    Approve,
    Reject,
    RequestChanges,
    CreateAdvertisement,
    StatsSummary,
    ActivityChart,
    DecisionsChart,
    CategoriesChart,
}

impl Endpoint {
    /// Message for any non-2xx status without a more specific one.
    #[must_use]
    pub const fn failure_message(self) -> &'static str {
        match self {
            Self::ListAdvertisements => "Ошибка при загрузке объявлений",
            Self::GetAdvertisement => "Ошибка при загрузке объявления",
            Self::Approve => "Ошибка при одобрении объявления",
            Self::Reject => "Ошибка при отклонении объявления",
            Self::RequestChanges => "Ошибка при запросе изменений",
            Self::CreateAdvertisement => "Ошибка при создании объявления",
            Self::StatsSummary => "Ошибка при загрузке статистики",
            Self::ActivityChart => "Ошибка при загрузке данных активности",
            Self::DecisionsChart => "Ошибка при загрузке данных решений",
            Self::CategoriesChart => "Ошибка при загрузке данных по категориям",
        }
    }

    /// Message for a specific status, when the endpoint defines one.
    #[must_use]
    pub const fn status_message(self, status: u16) -> Option<&'static str> {
        match (self, status) {
            (
                Self::GetAdvertisement | Self::Approve | Self::Reject | Self::RequestChanges,
                404,
            ) => Some("Объявление не найдено"),
            (Self::Reject, 400) => Some("Некорректные данные для отклонения"),
            (Self::RequestChanges, 400) => Some("Некорректные данные для запроса изменений"),
            (Self::CreateAdvertisement, 400) => Some("Некорректные данные объявления"),
            _ => None,
        }
    }

    /// Whether the unreachable message names the server address.
    ///
    /// Only the first request of a screen does; follow-up failures keep the
    /// short form.
    #[must_use]
    pub const fn names_server(self) -> bool {
        matches!(self, Self::ListAdvertisements | Self::StatsSummary)
    }

    /// Error for a non-2xx `status`.
    #[must_use]
    pub fn status_error(self, status: u16) -> MarketmodError {
        let message = self.status_message(status).unwrap_or(self.failure_message());
        MarketmodError::request(status, message)
    }

    /// Error for an unreachable server at `origin` (e.g. `http://localhost:3001`).
    #[must_use]
    pub fn unreachable_error(self, origin: &str) -> MarketmodError {
        if self.names_server() {
            MarketmodError::Connection(format!(
                "{UNREACHABLE}. Убедитесь, что API сервер запущен на {origin}"
            ))
        } else {
            MarketmodError::Connection(UNREACHABLE.to_string())
        }
    }
}

/// Scheme, host and port of `base_url`, without the path.
///
/// # Examples
///
/// ```
/// use marketmod::api::endpoint::origin_of;
///
/// assert_eq!(origin_of("http://localhost:3001/api/v1"), "http://localhost:3001");
/// assert_eq!(origin_of("localhost:3001"), "localhost:3001");
/// ```
#[must_use]
pub fn origin_of(base_url: &str) -> &str {
    let host_start = base_url.find("://").map_or(0, |i| i + 3);
    base_url[host_start..]
        .find('/')
        .map_or(base_url, |i| &base_url[..host_start + i])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_wins_over_generic_failure() {
        let err = Endpoint::GetAdvertisement.status_error(404);
        assert_eq!(err.to_string(), "Объявление не найдено");
        assert_eq!(err.status(), Some(404));
        assert_eq!(
            Endpoint::GetAdvertisement.status_error(500).to_string(),
            "Ошибка при загрузке объявления"
        );
    }

    #[test]
    fn bad_request_messages_are_endpoint_specific() {
        assert_eq!(
            Endpoint::Reject.status_error(400).to_string(),
            "Некорректные данные для отклонения"
        );
        assert_eq!(
            Endpoint::RequestChanges.status_error(400).to_string(),
            "Некорректные данные для запроса изменений"
        );
        assert_eq!(
            Endpoint::Approve.status_error(400).to_string(),
            "Ошибка при одобрении объявления"
        );
    }

    #[test]
    fn listing_unreachable_message_names_the_server() {
        let err = Endpoint::ListAdvertisements.unreachable_error("http://localhost:3001");
        assert_eq!(
            err.to_string(),
            "Не удалось подключиться к серверу. Убедитесь, что API сервер запущен на http://localhost:3001"
        );
        assert_eq!(
            Endpoint::Approve.unreachable_error("http://x").to_string(),
            "Не удалось подключиться к серверу"
        );
    }
}
