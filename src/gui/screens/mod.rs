pub mod error_page;
pub mod loading_page;
pub mod todos_page;

use std::sync::Arc;

use anyhow::Context;
use iced::{Element, Task};

use crate::{
    config::Config,
    core::store::{AnyStore, TodoStore},
    gui::{AppState, Message},
    models::TodoList,
};

#[derive(Debug, Clone)]
pub enum ScreenMessage<S: Screen> {
    ScreenMessage(S::Message),
    ParentMessage(S::ParentMessage),
}

pub trait Screen: Sized {
    type Message: std::fmt::Debug;
    type ParentMessage: std::fmt::Debug;
    fn view(&self) -> Element<'_, ScreenMessage<Self>>;
    fn update(&mut self, message: Self::Message, state: &mut AppState)
    -> Task<ScreenMessage<Self>>;
}

#[derive(Debug, Clone)]
pub enum ScreenData {
    LoadingPage(loading_page::LoadingPageScreen),
    ErrorPage(error_page::ErrorPageScreen),
    TodosPage(todos_page::TodosPageScreen),
}

impl ScreenData {
    /// Starts on the loading page while the configured store opens.
    pub fn boot(state: &AppState) -> (Self, Task<ScreenMessage<Self>>) {
        (
            ScreenData::LoadingPage(loading_page::LoadingPageScreen::new(state.config.backend)),
            load(state.config.clone()),
        )
    }
}

impl Screen for ScreenData {
    type Message = Message;
    type ParentMessage = std::convert::Infallible;
    fn view(&self) -> Element<'_, ScreenMessage<Self>> {
        match self {
            ScreenData::LoadingPage(screen) => screen.view().map(Message::LoadingPage),
            ScreenData::ErrorPage(screen) => screen.view().map(Message::ErrorPage),
            ScreenData::TodosPage(screen) => screen.view().map(Message::TodosPage),
        }
        .map(ScreenMessage::ScreenMessage)
    }

    fn update(
        &mut self,
        message: Self::Message,
        state: &mut AppState,
    ) -> Task<ScreenMessage<Self>> {
        match (self, message) {
            (x, Message::StoreLoaded(store, todos)) => {
                tracing::info!(backend = ?store.kind(), count = todos.len(), "todos ready");
                let page = todos_page::TodosPageScreen::new(
                    todos,
                    store.subscribe_peers().as_ref().map(|peers| *peers.borrow()),
                );
                let watch = todos_page::TodosPageScreen::watch(&store)
                    .map(Message::TodosPage)
                    .map(ScreenMessage::ScreenMessage);
                state.store = Some(store);
                *x = ScreenData::TodosPage(page);
                watch
            }
            (x, Message::LoadFailed(error)) => {
                tracing::error!(%error, "failed to load todos");
                *x = ScreenData::ErrorPage(error_page::ErrorPageScreen::new(error));
                Task::none()
            }
            (ScreenData::TodosPage(page), Message::TodosPage(msg)) => match msg {
                ScreenMessage::ScreenMessage(msg) => page
                    .update(msg, state)
                    .map(Message::TodosPage)
                    .map(ScreenMessage::ScreenMessage),
                ScreenMessage::ParentMessage(never) => match never {},
            },
            (x, Message::ErrorPage(msg)) => match msg {
                ScreenMessage::ScreenMessage(never) => match never {},
                ScreenMessage::ParentMessage(error_page::ParentMessage::Retry) => {
                    *x = ScreenData::LoadingPage(loading_page::LoadingPageScreen::new(
                        state.config.backend,
                    ));
                    load(state.config.clone())
                }
            },
            _ => Task::none(),
        }
    }
}

fn load(config: Config) -> Task<ScreenMessage<ScreenData>> {
    Task::perform(open_store(config), |result| {
        ScreenMessage::ScreenMessage(match result {
            Ok((store, todos)) => Message::StoreLoaded(store, todos),
            Err(err) => Message::LoadFailed(format!("{err:#}")),
        })
    })
}

async fn open_store(config: Config) -> anyhow::Result<(Arc<AnyStore>, TodoList)> {
    let store = AnyStore::open(&config)
        .await
        .context("Failed to open todo store")?;
    let todos = store.load().await.context("Failed to load todos")?;
    Ok((Arc::new(store), todos))
}
