//! Statistics screen renderer.

use super::banner::render_banner;
use super::header::render_title;
use crate::ui::helpers::{bar, pad_right, write_border};
use crate::ui::theme::Theme;
use crate::ui::viewmodel::StatsViewModel;
use std::io::{self, Write};

const LABEL_WIDTH: usize = 24;
const BAR_WIDTH: usize = 30;

/// Renders summary cards, the activity chart, the decisions distribution
/// and the category chart.
pub fn render_stats<W: Write>(out: &mut W, vm: &StatsViewModel, theme: &Theme, cols: usize) -> io::Result<()> {
    render_title(out, &format!("Статистика · {}", vm.period), theme, cols)?;
    write_border(out, &theme.colors.border, cols)?;

    if let Some(banner) = &vm.banner {
        render_banner(out, banner, theme)?;
    }
    if vm.loading {
        writeln!(out, " {}Загрузка...{}", Theme::fg(&theme.colors.text_dim), Theme::reset())?;
    }

    for card in &vm.cards {
        writeln!(
            out,
            " {}{}{}{}{}{}",
            Theme::fg(&theme.colors.text_dim),
            pad_right(card.label, LABEL_WIDTH),
            Theme::reset(),
            Theme::bold(),
            card.value,
            Theme::reset()
        )?;
    }

    render_section(out, "Активность", theme)?;
    if vm.activity.is_empty() {
        writeln!(out, " Нет данных")?;
    }
    for day in &vm.activity {
        render_bar(out, &day.label, day.ratio, &day.total.to_string(), theme)?;
    }

    render_section(out, "Решения", theme)?;
    for slice in &vm.decisions {
        render_bar(out, slice.label, slice.ratio, &slice.share, theme)?;
    }

    render_section(out, "Категории", theme)?;
    if vm.categories.is_empty() {
        writeln!(out, " Нет данных")?;
    }
    for category in &vm.categories {
        render_bar(out, &category.name, category.ratio, &category.count.to_string(), theme)?;
    }

    write_border(out, &theme.colors.border, cols)?;
    writeln!(
        out,
        " {}stats today|week|month · stats <гггг-мм-дд> <гггг-мм-дд> · back{}",
        Theme::fg(&theme.colors.text_dim),
        Theme::reset()
    )
}

fn render_section<W: Write>(out: &mut W, title: &str, theme: &Theme) -> io::Result<()> {
    writeln!(out)?;
    writeln!(
        out,
        " {}{}{title}{}",
        Theme::bold(),
        Theme::fg(&theme.colors.header_fg),
        Theme::reset()
    )
}

fn render_bar<W: Write>(out: &mut W, label: &str, ratio: f64, value: &str, theme: &Theme) -> io::Result<()> {
    writeln!(
        out,
        " {}{}{}{} {value}",
        pad_right(label, LABEL_WIDTH),
        Theme::fg(&theme.colors.bar_fg),
        pad_right(&bar(ratio, BAR_WIDTH), BAR_WIDTH),
        Theme::reset()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::viewmodel::{CategoryBar, SummaryCard};

    #[test]
    fn empty_charts_say_so() {
        let vm = StatsViewModel {
            period: "Сегодня".to_string(),
            cards: vec![SummaryCard::new("Всего проверено", "0".to_string())],
            activity: vec![],
            decisions: vec![],
            categories: vec![CategoryBar {
                name: "Авто".to_string(),
                count: 3,
                ratio: 100.0,
            }],
            banner: None,
            loading: false,
        };
        let mut out = Vec::new();
        render_stats(&mut out, &vm, &Theme::default(), 80).unwrap();
        let rendered = String::from_utf8(out).unwrap();

        assert!(rendered.contains("Статистика · Сегодня"));
        assert_eq!(rendered.matches("Нет данных").count(), 1);
        assert!(rendered.contains(&"█".repeat(BAR_WIDTH)));
    }
}
