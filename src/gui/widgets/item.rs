use iced::{
    Alignment::Center,
    Color, Element, Length,
    widget::{button, container, row, text, text_input},
};

use crate::{gui::screens::todos_page::TodosPageMessage, models::Todo};

/// One todo row. `edit_text` is the input contents while the todo is being
/// edited.
pub fn todo_item<'a>(todo: &'a Todo, edit_text: Option<&'a str>) -> Element<'a, TodosPageMessage> {
    if let Some(edit_text) = edit_text {
        return row![
            text_input("", edit_text)
                .on_input(TodosPageMessage::EditTextChanged)
                .on_submit(TodosPageMessage::SubmitEdit)
                .padding(8)
                .width(Length::Fill),
            button("Revert")
                .on_press(TodosPageMessage::RevertEdit)
                .style(button::secondary),
            button("Done").on_press(TodosPageMessage::FinishEditing),
        ]
        .spacing(10)
        .align_y(Center)
        .into();
    }

    let marker = if todo.completed { "[x]" } else { "[ ]" };
    let title = if todo.completed {
        text(&todo.title).color(Color::from_rgb(0.55, 0.55, 0.55))
    } else {
        text(&todo.title)
    };

    row![
        button(text(marker))
            .on_press(TodosPageMessage::ToggleTodo(todo.id, !todo.completed))
            .style(button::text),
        container(title.size(18)).width(Length::Fill),
        button("Edit")
            .on_press(TodosPageMessage::StartEditing(todo.id))
            .style(button::secondary),
        button("x")
            .on_press(TodosPageMessage::RemoveTodo(todo.id))
            .style(button::danger),
    ]
    .spacing(10)
    .align_y(Center)
    .into()
}
