use iced::{Element, Subscription, Task, Theme, window};

use crate::{
    config::Config,
    core::store::TodoStore,
    gui::{
        AppState, Message,
        screens::{Screen, ScreenData, ScreenMessage},
    },
};

pub struct TodoApp {
    state: AppState,
    screen: ScreenData,
}

impl TodoApp {
    pub fn new(config: Config) -> (Self, Task<ScreenMessage<ScreenData>>) {
        let state = AppState::new(config);
        let (screen, task) = ScreenData::boot(&state);
        (Self { state, screen }, task)
    }

    fn title(&self) -> String {
        match &self.screen {
            ScreenData::TodosPage(_) => "Todos".to_string(),
            _ => "Todos - loading".to_string(),
        }
    }

    fn update(&mut self, message: ScreenMessage<ScreenData>) -> Task<ScreenMessage<ScreenData>> {
        match message {
            ScreenMessage::ScreenMessage(Message::CloseRequested) => self.close_store(),
            ScreenMessage::ScreenMessage(Message::StoreClosed) => iced::exit(),
            ScreenMessage::ScreenMessage(message) => self.screen.update(message, &mut self.state),
            ScreenMessage::ParentMessage(never) => match never {},
        }
    }

    /// Writes out pending changes before the window goes away. The store is
    /// taken out of the state so nothing mutates it while it closes.
    fn close_store(&mut self) -> Task<ScreenMessage<ScreenData>> {
        let Some(store) = self.state.store.take() else {
            return iced::exit();
        };
        Task::perform(
            async move {
                if let Err(err) = store.close().await {
                    tracing::error!(%err, "failed to close todo store");
                }
            },
            |()| ScreenMessage::ScreenMessage(Message::StoreClosed),
        )
    }

    fn view(&self) -> Element<'_, ScreenMessage<ScreenData>> {
        self.screen.view()
    }

    fn theme(&self) -> Theme {
        Theme::Dark
    }

    fn subscription(&self) -> Subscription<ScreenMessage<ScreenData>> {
        window::close_requests().map(|_| ScreenMessage::ScreenMessage(Message::CloseRequested))
    }
}

/// Runs the desktop app until its window is closed.
pub fn run(config: Config) -> anyhow::Result<()> {
    iced::application(
        move || TodoApp::new(config.clone()),
        TodoApp::update,
        TodoApp::view,
    )
    .title(TodoApp::title)
    .theme(TodoApp::theme)
    .subscription(TodoApp::subscription)
    .window(window::Settings {
        exit_on_close_request: false,
        ..window::Settings::default()
    })
    .run()?;
    Ok(())
}
