use std::convert::Infallible;

use iced::{
    Element, Length, Task,
    futures::{Stream, stream},
    widget::{Column, column, container, scrollable, text},
};
use tokio::sync::watch;

use crate::{
    core::store::{AnyStore, StoreResult, TodoStore},
    gui::{
        AppState,
        screens::{Screen, ScreenMessage},
        widgets,
    },
    models::{TitleEdit, TodoId, TodoList, normalize_new_title},
    selectors::{Filter, TodoView},
};

#[derive(Debug, Clone)]
struct Editing {
    id: TodoId,
    text: String,
}

#[derive(Debug, Clone)]
pub struct TodosPageScreen {
    view: TodoView,
    new_todo: String,
    editing: Option<Editing>,
    peers: Option<usize>,
}

#[derive(Debug, Clone)]
pub enum TodosPageMessage {
    TodosChanged(TodoList),
    PeersChanged(usize),
    NewTodoChanged(String),
    CreateTodo,
    ToggleAll,
    ToggleTodo(TodoId, bool),
    RemoveTodo(TodoId),
    StartEditing(TodoId),
    EditTextChanged(String),
    SubmitEdit,
    RevertEdit,
    FinishEditing,
    FilterChanged(Filter),
    ClearCompleted,
}

impl TodosPageScreen {
    pub fn new(todos: TodoList, peers: Option<usize>) -> Self {
        Self {
            view: TodoView::new(todos, Filter::All),
            new_todo: String::new(),
            editing: None,
            peers,
        }
    }

    /// Forwards store notifications to the page for as long as the store lives.
    pub fn watch(store: &AnyStore) -> Task<ScreenMessage<Self>> {
        let todos = Task::run(changes(store.subscribe()), |todos| {
            ScreenMessage::ScreenMessage(TodosPageMessage::TodosChanged(todos))
        });
        let peers = match store.subscribe_peers() {
            Some(peers) => Task::run(changes(peers), |count| {
                ScreenMessage::ScreenMessage(TodosPageMessage::PeersChanged(count))
            }),
            None => Task::none(),
        };
        Task::batch([todos, peers])
    }

    fn edit_text(&self, id: TodoId) -> Option<&str> {
        self.editing
            .as_ref()
            .filter(|editing| editing.id == id)
            .map(|editing| editing.text.as_str())
    }

    fn current_title(&self, id: TodoId) -> Option<&str> {
        self.view
            .source()
            .iter()
            .find(|todo| todo.id == id)
            .map(|todo| todo.title.as_str())
    }

    fn commit_edit(&self, state: &AppState) {
        let Some(editing) = &self.editing else {
            return;
        };
        let Some(current) = self.current_title(editing.id) else {
            return;
        };
        let id = editing.id;
        match TitleEdit::resolve(current, &editing.text) {
            TitleEdit::Unchanged => {}
            TitleEdit::Rename(title) => {
                apply(state, "rename", |store| store.update_title(id, &title));
            }
            TitleEdit::Remove => apply(state, "remove", |store| store.remove(id)),
        }
    }
}

impl Screen for TodosPageScreen {
    type Message = TodosPageMessage;
    type ParentMessage = Infallible;

    fn view(&self) -> Element<'_, ScreenMessage<Self>> {
        let todos = self.view.source();
        let counts = self.view.counts();
        let toggle_all = (!todos.is_empty()).then_some(counts.remaining == 0);

        let mut content = column![
            text("todos").size(48),
            widgets::header(&self.new_todo, toggle_all),
        ]
        .spacing(20)
        .padding(20)
        .max_width(640.0);

        if !todos.is_empty() {
            let items = Column::with_children(
                self.view
                    .visible()
                    .iter()
                    .map(|todo| widgets::todo_item(todo, self.edit_text(todo.id))),
            )
            .spacing(8);
            content = content
                .push(scrollable(items).height(Length::Fill))
                .push(widgets::footer(counts, self.view.filter(), self.peers));
        }

        Element::from(container(content).center_x(Length::Fill))
            .map(ScreenMessage::ScreenMessage)
    }

    fn update(
        &mut self,
        message: Self::Message,
        state: &mut AppState,
    ) -> Task<ScreenMessage<Self>> {
        match message {
            TodosPageMessage::TodosChanged(todos) => {
                self.view.refresh(&todos, self.view.filter());
                if let Some(editing) = &self.editing {
                    if self.current_title(editing.id).is_none() {
                        self.editing = None;
                    }
                }
            }
            TodosPageMessage::PeersChanged(count) => self.peers = Some(count),
            TodosPageMessage::NewTodoChanged(value) => self.new_todo = value,
            TodosPageMessage::CreateTodo => {
                if let Some(title) = normalize_new_title(&self.new_todo) {
                    apply(state, "add", |store| store.add(&title).map(|_| ()));
                    self.new_todo.clear();
                }
            }
            TodosPageMessage::ToggleAll => {
                let completed = self.view.counts().remaining > 0;
                apply(state, "toggle all", |store| {
                    store.update_all_completed(completed)
                });
            }
            TodosPageMessage::ToggleTodo(id, completed) => {
                apply(state, "toggle", |store| store.update_completed(id, completed));
            }
            TodosPageMessage::RemoveTodo(id) => {
                if self.editing.as_ref().is_some_and(|editing| editing.id == id) {
                    self.editing = None;
                }
                apply(state, "remove", |store| store.remove(id));
            }
            TodosPageMessage::StartEditing(id) => {
                if self.editing.as_ref().is_some_and(|editing| editing.id == id) {
                    return Task::none();
                }
                self.commit_edit(state);
                self.editing = self.current_title(id).map(|title| Editing {
                    id,
                    text: title.to_string(),
                });
            }
            TodosPageMessage::EditTextChanged(value) => {
                if let Some(editing) = &mut self.editing {
                    editing.text = value;
                }
            }
            TodosPageMessage::SubmitEdit => self.commit_edit(state),
            TodosPageMessage::RevertEdit => {
                let current = self
                    .editing
                    .as_ref()
                    .and_then(|editing| self.current_title(editing.id))
                    .map(str::to_string);
                if let (Some(editing), Some(current)) = (&mut self.editing, current) {
                    editing.text = current;
                }
            }
            TodosPageMessage::FinishEditing => {
                self.commit_edit(state);
                self.editing = None;
            }
            TodosPageMessage::FilterChanged(filter) => {
                let source = self.view.source().clone();
                self.view.refresh(&source, filter);
            }
            TodosPageMessage::ClearCompleted => {
                apply(state, "clear completed", |store| store.clear_completed());
            }
        }
        Task::none()
    }
}

fn apply(state: &AppState, action: &str, op: impl FnOnce(&AnyStore) -> StoreResult<()>) {
    let Some(store) = &state.store else {
        tracing::warn!(action, "no todo store loaded");
        return;
    };
    if let Err(err) = op(store) {
        tracing::error!(%err, action, "todo update failed");
    }
}

/// Every value published after subscribing.
fn changes<T>(receiver: watch::Receiver<T>) -> impl Stream<Item = T>
where
    T: Clone + Send + Sync + 'static,
{
    stream::unfold(receiver, |mut receiver| async move {
        receiver.changed().await.ok()?;
        let value = receiver.borrow_and_update().clone();
        Some((value, receiver))
    })
}
