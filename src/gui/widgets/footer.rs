use iced::{
    Alignment::Center,
    Element, Length, Theme,
    widget::{Row, button, container, row, text},
};

use crate::{
    gui::screens::todos_page::TodosPageMessage,
    selectors::{Filter, TodoCounts, items_left_label},
};

type ButtonStyle = fn(&Theme, button::Status) -> button::Style;

pub fn footer<'a>(
    counts: TodoCounts,
    current: Filter,
    peers: Option<usize>,
) -> Element<'a, TodosPageMessage> {
    let filters = Row::with_children(Filter::ALL.into_iter().map(|filter| {
        let style: ButtonStyle = if filter == current {
            button::primary
        } else {
            button::text
        };
        button(text(filter.label()))
            .on_press(TodosPageMessage::FilterChanged(filter))
            .style(style)
            .into()
    }))
    .spacing(5);

    let mut footer = row![
        container(text(items_left_label(counts.remaining))).width(Length::Fill),
        filters,
    ]
    .spacing(10)
    .align_y(Center);

    if counts.completed > 0 {
        footer = footer.push(
            button("Clear completed")
                .on_press(TodosPageMessage::ClearCompleted)
                .style(button::text),
        );
    }
    if let Some(peers) = peers {
        footer = footer.push(text(peers_label(peers)));
    }
    footer.into()
}

fn peers_label(peers: usize) -> String {
    let word = if peers == 1 { "peer" } else { "peers" };
    format!("{} {} connected", peers, word)
}
