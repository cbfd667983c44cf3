//! Console command parsing.
//!
//! The console reads one command per line. Parsing is strict: malformed
//! input is a [`MarketmodError::Validation`] with a message for the user,
//! never a silently ignored line.

use super::forms::NewAdvertisementForm;
use super::query::{FilterPatch, SortBy, SortOrder};
use crate::domain::{AdvertisementStatus, MarketmodError, RejectionReason, Result, StatsPeriod};
use chrono::NaiveDate;

/// One parsed console command.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Stage search text (debounced); empty text clears the search.
    Search(String),
    /// Any immediate filter or sort change.
    Filter(FilterPatch),
    Page(u32),
    Limit(u32),
    Reset,
    Refresh,
    Show(u64),
    Approve(u64),
    Reject { id: u64, reason: RejectionReason, comment: String },
    RequestChanges { id: u64, reason: RejectionReason, comment: String },
    /// New advertisement; validated when submitted.
    Create(NewAdvertisementForm),
    /// Neighbouring advertisement of the open detail view.
    Previous,
    Next,
    Stats(StatsPeriod),
    /// Back to the listing.
    Back,
    Help,
    Quit,
}

/// Command reference printed by `help`.
pub const HELP: &str = "\
search <текст>                  поиск (пустой текст сбрасывает)
status <pending,approved,...|-> фильтр по статусу
category <id|->                 фильтр по категории
min <цена|->  max <цена|->      диапазон цен
sort <createdAt|price|priority> [asc|desc]
page <n>  limit <n>             пагинация
reset  refresh                  сброс фильтров, повтор запроса
show <id>  prev  next  back     карточка объявления
approve <id>
reject <id> <причина №> [комментарий]
changes <id> <причина №> [комментарий]
create <цена> <название>
stats [today|week|month|<гггг-мм-дд> <гггг-мм-дд>]
quit";

impl Command {
    /// Parses one input line; `Ok(None)` for a blank line.
    ///
    /// # Errors
    ///
    /// Returns [`MarketmodError::Validation`] for unknown commands and
    /// malformed arguments.
    ///
    /// # Example
    ///
    /// ```rust
    /// use marketmod::app::command::Command;
    ///
    /// assert_eq!(Command::parse("page 3").unwrap(), Some(Command::Page(3)));
    /// assert_eq!(Command::parse("   ").unwrap(), None);
    /// assert!(Command::parse("page zero").is_err());
    /// ```
    pub fn parse(line: &str) -> Result<Option<Self>> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(None);
        }
        let (name, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
        let rest = rest.trim();

        let command = match name {
            "search" | "s" => Self::Search(rest.to_string()),
            "status" => Self::Filter(FilterPatch::default().statuses(parse_statuses(rest)?)),
            "category" => Self::Filter(FilterPatch::default().category(parse_clearable(rest, "category")?)),
            "min" => Self::Filter(FilterPatch::default().min_price(parse_price(rest)?)),
            "max" => Self::Filter(FilterPatch::default().max_price(parse_price(rest)?)),
            "sort" => Self::Filter(parse_sort(rest)?),
            "page" => Self::Page(parse_number(rest, "page")?),
            "limit" => Self::Limit(parse_number(rest, "limit")?),
            "reset" => Self::Reset,
            "refresh" | "r" => Self::Refresh,
            "show" | "open" => Self::Show(parse_number(rest, "show")?),
            "approve" => Self::Approve(parse_number(rest, "approve")?),
            "reject" => {
                let (id, reason, comment) = parse_decision(rest, "reject")?;
                Self::Reject { id, reason, comment }
            }
            "changes" => {
                let (id, reason, comment) = parse_decision(rest, "changes")?;
                Self::RequestChanges { id, reason, comment }
            }
            "create" => Self::Create(parse_new_advertisement(rest)?),
            "prev" => Self::Previous,
            "next" => Self::Next,
            "stats" => Self::Stats(parse_period(rest)?),
            "back" | "list" => Self::Back,
            "help" | "?" => Self::Help,
            "quit" | "exit" | "q" => Self::Quit,
            other => return Err(invalid(format!("Неизвестная команда: {other}. Введите help"))),
        };
        Ok(Some(command))
    }
}

fn invalid(message: impl Into<String>) -> MarketmodError {
    MarketmodError::Validation(message.into())
}

fn parse_number<N: std::str::FromStr>(value: &str, command: &str) -> Result<N> {
    value
        .parse()
        .map_err(|_| invalid(format!("{command}: ожидается число, получено «{value}»")))
}

/// `-` or nothing clears the filter.
fn parse_clearable<N: std::str::FromStr>(value: &str, command: &str) -> Result<Option<N>> {
    if value.is_empty() || value == "-" {
        return Ok(None);
    }
    parse_number(value, command).map(Some)
}

fn parse_price(value: &str) -> Result<Option<f64>> {
    let price: Option<f64> = parse_clearable(&value.replace(',', "."), "price")?;
    match price {
        Some(p) if !p.is_finite() || p < 0.0 => Err(invalid("Цена не может быть отрицательной")),
        other => Ok(other),
    }
}

fn parse_statuses(value: &str) -> Result<Vec<AdvertisementStatus>> {
    if value.is_empty() || value == "-" {
        return Ok(vec![]);
    }
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| AdvertisementStatus::parse(s).ok_or_else(|| invalid(format!("Неизвестный статус: {s}"))))
        .collect()
}

fn parse_sort(value: &str) -> Result<FilterPatch> {
    let mut parts = value.split_whitespace();
    let field = parts.next().ok_or_else(|| invalid("sort: укажите поле"))?;
    let sort_by = SortBy::parse(field).ok_or_else(|| invalid(format!("Неизвестное поле сортировки: {field}")))?;

    let mut patch = FilterPatch::default().sort_by(sort_by);
    if let Some(order) = parts.next() {
        let order = SortOrder::parse(order).ok_or_else(|| invalid(format!("Неизвестный порядок: {order}")))?;
        patch = patch.sort_order(order);
    }
    Ok(patch)
}

fn parse_decision(value: &str, command: &str) -> Result<(u64, RejectionReason, String)> {
    let mut parts = value.splitn(3, char::is_whitespace);
    let id = parse_number(parts.next().unwrap_or_default(), command)?;
    let position: usize = parse_number(parts.next().unwrap_or_default(), command)?;
    let reason = RejectionReason::from_position(position).ok_or_else(|| {
        invalid(format!(
            "Причина должна быть от 1 до {}",
            RejectionReason::ALL.len()
        ))
    })?;
    let comment = parts.next().unwrap_or_default().trim().to_string();
    Ok((id, reason, comment))
}

fn parse_new_advertisement(value: &str) -> Result<NewAdvertisementForm> {
    let (price, title) = value.split_once(char::is_whitespace).unwrap_or((value, ""));
    let price: f64 = parse_number(&price.replace(',', "."), "create")?;
    Ok(NewAdvertisementForm {
        title: title.trim().to_string(),
        price,
        ..NewAdvertisementForm::default()
    })
}

fn parse_period(value: &str) -> Result<StatsPeriod> {
    if value.is_empty() {
        return Ok(StatsPeriod::default());
    }
    if let Some(period) = StatsPeriod::parse(value) {
        return Ok(period);
    }

    let parse_date = |s: &str| {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|_| invalid(format!("Некорректная дата: {s}")))
    };
    match value.split_whitespace().collect::<Vec<_>>().as_slice() {
        [start, end] => {
            let (start, end) = (parse_date(start)?, parse_date(end)?);
            if start > end {
                return Err(invalid("Начало периода позже конца"));
            }
            Ok(StatsPeriod::Custom { start, end })
        }
        _ => Err(invalid(format!("Неизвестный период: {value}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filters_parse_into_patches() {
        assert_eq!(
            Command::parse("status pending, rejected").unwrap(),
            Some(Command::Filter(FilterPatch::default().statuses([
                AdvertisementStatus::Pending,
                AdvertisementStatus::Rejected
            ])))
        );
        assert_eq!(
            Command::parse("min 100,5").unwrap(),
            Some(Command::Filter(FilterPatch::default().min_price(Some(100.5))))
        );
        assert_eq!(
            Command::parse("category -").unwrap(),
            Some(Command::Filter(FilterPatch::default().category(None)))
        );
        assert_eq!(
            Command::parse("sort price asc").unwrap(),
            Some(Command::Filter(
                FilterPatch::default().sort_by(SortBy::Price).sort_order(SortOrder::Asc)
            ))
        );
    }

    #[test]
    fn search_keeps_the_whole_rest_of_line() {
        assert_eq!(
            Command::parse("search горный велосипед").unwrap(),
            Some(Command::Search("горный велосипед".to_string()))
        );
        assert_eq!(Command::parse("search").unwrap(), Some(Command::Search(String::new())));
    }

    #[test]
    fn decisions_take_reason_position_and_comment() {
        assert_eq!(
            Command::parse("reject 7 2 нет фото товара").unwrap(),
            Some(Command::Reject {
                id: 7,
                reason: RejectionReason::from_position(2).unwrap(),
                comment: "нет фото товара".to_string(),
            })
        );
        assert!(Command::parse("changes 7 99").is_err());
        assert!(Command::parse("reject 7").is_err());
    }

    #[test]
    fn create_takes_price_then_title() {
        let Some(Command::Create(form)) = Command::parse("create 1500,5 Настольная лампа").unwrap() else {
            panic!("expected create");
        };
        assert_eq!(form.price, 1500.5);
        assert_eq!(form.title, "Настольная лампа");
        assert!(Command::parse("create дешево Лампа").is_err());
    }

    #[test]
    fn stats_periods() {
        assert_eq!(Command::parse("stats").unwrap(), Some(Command::Stats(StatsPeriod::Week)));
        assert_eq!(Command::parse("stats today").unwrap(), Some(Command::Stats(StatsPeriod::Today)));
        assert!(matches!(
            Command::parse("stats 2024-01-01 2024-01-31").unwrap(),
            Some(Command::Stats(StatsPeriod::Custom { .. }))
        ));
        assert!(Command::parse("stats 2024-02-01 2024-01-01").is_err());
    }

    #[test]
    fn invalid_input_is_reported() {
        assert!(Command::parse("dance").is_err());
        assert!(Command::parse("status archived").is_err());
        assert!(Command::parse("min -5").is_err());
        assert_eq!(Command::parse("").unwrap(), None);
    }
}
