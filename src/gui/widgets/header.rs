use iced::{
    Alignment::Center,
    Element,
    widget::{button, row, text, text_input},
};

use crate::gui::screens::todos_page::TodosPageMessage;

/// New-todo input. `toggle_all` carries whether every todo is completed and
/// is `None` while the list is empty.
pub fn header<'a>(new_todo: &'a str, toggle_all: Option<bool>) -> Element<'a, TodosPageMessage> {
    let input = text_input("What needs to be done?", new_todo)
        .on_input(TodosPageMessage::NewTodoChanged)
        .on_submit(TodosPageMessage::CreateTodo)
        .padding(12)
        .size(20);

    match toggle_all {
        Some(all_completed) => {
            let label = if all_completed {
                "Mark all active"
            } else {
                "Mark all complete"
            };
            row![
                button(text(label))
                    .on_press(TodosPageMessage::ToggleAll)
                    .style(button::secondary),
                input,
            ]
            .spacing(10)
            .align_y(Center)
            .into()
        }
        None => input.into(),
    }
}
