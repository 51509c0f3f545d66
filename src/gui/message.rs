use std::sync::Arc;

use crate::{
    core::store::AnyStore,
    gui::screens::{
        ScreenMessage, error_page::ErrorPageScreen, loading_page::LoadingPageScreen,
        todos_page::TodosPageScreen,
    },
    models::TodoList,
};

#[derive(Debug, Clone)]
pub enum Message {
    LoadingPage(ScreenMessage<LoadingPageScreen>),
    ErrorPage(ScreenMessage<ErrorPageScreen>),
    TodosPage(ScreenMessage<TodosPageScreen>),
    StoreLoaded(Arc<AnyStore>, TodoList),
    LoadFailed(String),
    /// The user asked to close a window; the store is closed first.
    CloseRequested,
    StoreClosed,
}
