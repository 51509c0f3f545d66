use std::convert::Infallible;

use iced::{
    Alignment::Center,
    Element, Length, Task,
    widget::{column, container, text},
};

use crate::{
    config::BackendKind,
    gui::{
        AppState,
        screens::{Screen, ScreenMessage},
    },
};

/// Placeholder while the configured backend opens and loads.
#[derive(Debug, Clone)]
pub struct LoadingPageScreen {
    backend: BackendKind,
}

impl LoadingPageScreen {
    pub fn new(backend: BackendKind) -> Self {
        Self { backend }
    }

    fn source(&self) -> &'static str {
        match self.backend {
            BackendKind::Memory => "Preparing demo todos",
            BackendKind::Local => "Reading todos from local storage",
            BackendKind::Collab => "Joining the shared todo list",
        }
    }
}

impl Screen for LoadingPageScreen {
    type Message = Infallible;
    type ParentMessage = Infallible;

    fn view(&self) -> Element<'_, ScreenMessage<Self>> {
        let content = column![text("Loading...").size(28), text(self.source())]
            .spacing(10)
            .align_x(Center);

        container(content)
            .center_x(Length::Fill)
            .center_y(Length::Fill)
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
