use std::convert::Infallible;

use iced::{
    Alignment::Center,
    Element, Task,
    widget::{button, column, container, text},
};

use crate::gui::{
    AppState,
    screens::{Screen, ScreenMessage},
};

/// Shown when the store could not be opened or loaded.
#[derive(Debug, Clone)]
pub struct ErrorPageScreen {
    error: String,
}

#[derive(Debug, Clone)]
pub enum ParentMessage {
    Retry,
}

impl ErrorPageScreen {
    pub fn new(error: String) -> Self {
        Self { error }
    }
}

impl Screen for ErrorPageScreen {
    type Message = Infallible;
    type ParentMessage = ParentMessage;

    fn view(&self) -> Element<'_, ScreenMessage<Self>> {
        let content = column![
            text("Failed to load todos").size(28),
            text(&self.error),
            button("Retry").on_press(ScreenMessage::ParentMessage(ParentMessage::Retry)),
        ]
        .spacing(20)
        .padding(20)
        .align_x(Center);

        container(content)
            .center_x(iced::Length::Fill)
            .center_y(iced::Length::Fill)
            .into()
    }

    fn update(
        &mut self,
        message: Self::Message,
        _state: &mut AppState,
    ) -> Task<ScreenMessage<Self>> {
        match message {}
    }
}
