//! Advertisement detail renderer.

use super::banner::render_banner;
use super::header::render_title;
use crate::ui::helpers::{pad_right, write_border};
use crate::ui::theme::Theme;
use crate::ui::viewmodel::DetailViewModel;
use std::io::{self, Write};

const LABEL_WIDTH: usize = 14;

/// Renders the detail screen: summary fields, description, characteristics,
/// seller, images, moderation history and navigation hints.
///
/// Before the first successful load only the title, banner and navigation
/// are shown.
pub fn render_detail<W: Write>(out: &mut W, vm: &DetailViewModel, theme: &Theme, cols: usize) -> io::Result<()> {
    render_title(out, &vm.title, theme, cols)?;
    write_border(out, &theme.colors.border, cols)?;

    if let Some(banner) = &vm.banner {
        render_banner(out, banner, theme)?;
    }
    if vm.loading {
        writeln!(out, " {}Загрузка...{}", Theme::fg(&theme.colors.text_dim), Theme::reset())?;
    }

    if let Some(status) = vm.status {
        writeln!(
            out,
            " {}{}{}{}",
            pad_right("Статус", LABEL_WIDTH),
            Theme::fg(theme.status_color(status)),
            status.label(),
            Theme::reset()
        )?;
    }
    for (label, value) in [
        ("Цена", &vm.price),
        ("Категория", &vm.category),
        ("Создано", &vm.created),
        ("Продавец", &vm.seller),
    ] {
        if let Some(value) = value {
            render_field(out, label, value, theme)?;
        }
    }
    if let Some(priority) = vm.priority {
        render_field(out, "Приоритет", priority, theme)?;
    }

    if !vm.description.is_empty() {
        writeln!(out)?;
        writeln!(out, " {}", vm.description)?;
    }

    if !vm.characteristics.is_empty() {
        render_section(out, "Характеристики", theme)?;
        for (name, value) in &vm.characteristics {
            render_field(out, name, value, theme)?;
        }
    }

    if !vm.images.is_empty() {
        render_section(out, "Изображения", theme)?;
        for url in &vm.images {
            writeln!(out, " {url}")?;
        }
    }

    if !vm.history.is_empty() {
        render_section(out, "История модерации", theme)?;
        for line in &vm.history {
            write!(
                out,
                " {}{}{} {} · {}",
                Theme::fg(&theme.colors.text_dim),
                line.when,
                Theme::reset(),
                line.moderator,
                line.action
            )?;
            if let Some(reason) = &line.reason {
                write!(out, " · {reason}")?;
            }
            writeln!(out)?;
            if !line.comment.is_empty() {
                writeln!(out, "   {}", line.comment)?;
            }
        }
    }

    write_border(out, &theme.colors.border, cols)?;
    let actions = if vm.processing {
        "Отправка решения..."
    } else {
        "approve · reject <причина> [комментарий] · changes <причина> [комментарий]"
    };
    writeln!(
        out,
        " {}{actions} · prev ({}) · next ({}) · back{}",
        Theme::fg(&theme.colors.text_dim),
        vm.previous_id,
        vm.next_id,
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

fn render_field<W: Write>(out: &mut W, label: &str, value: &str, theme: &Theme) -> io::Result<()> {
    writeln!(
        out,
        " {}{}{}{value}",
        Theme::fg(&theme.colors.text_dim),
        pad_right(label, LABEL_WIDTH),
        Theme::reset()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::AdvertisementStatus;
    use crate::ui::viewmodel::HistoryLine;

    fn viewmodel() -> DetailViewModel {
        DetailViewModel {
            id: 7,
            title: "Диван".to_string(),
            status: Some(AdvertisementStatus::Rejected),
            price: Some("15 000 ₽".to_string()),
            category: Some("Мебель".to_string()),
            priority: Some("Обычный"),
            created: Some("15.01.2024 10:30".to_string()),
            description: "Почти новый".to_string(),
            characteristics: vec![("Цвет".to_string(), "Серый".to_string())],
            images: vec!["https://placehold.co/600x400".to_string()],
            seller: Some("Иван".to_string()),
            history: vec![HistoryLine {
                when: "16.01.2024 09:00".to_string(),
                moderator: "Анна".to_string(),
                action: "Отклонено",
                reason: Some("Запрещенный товар".to_string()),
                comment: String::new(),
            }],
            banner: None,
            loading: false,
            processing: false,
            previous_id: 6,
            next_id: 8,
        }
    }

    #[test]
    fn loaded_advertisement_shows_every_section() {
        let mut out = Vec::new();
        render_detail(&mut out, &viewmodel(), &Theme::default(), 80).unwrap();
        let rendered = String::from_utf8(out).unwrap();

        for needle in ["Отклонено", "15 000 ₽", "Характеристики", "Серый", "История модерации", "Запрещенный товар", "prev (6)"] {
            assert!(rendered.contains(needle), "missing {needle}");
        }
    }

    #[test]
    fn processing_hides_actions() {
        let mut vm = viewmodel();
        vm.processing = true;
        let mut out = Vec::new();
        render_detail(&mut out, &vm, &Theme::default(), 80).unwrap();
        let rendered = String::from_utf8(out).unwrap();

        assert!(rendered.contains("Отправка решения..."));
        assert!(!rendered.contains("approve ·"));
    }
}
