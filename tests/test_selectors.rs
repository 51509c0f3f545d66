//! Tests for list filtering, counts and the memoized view.

use std::sync::Arc;

use todo_dapp::{
    models::{Todo, TodoList, demo_todos},
    selectors::{Filter, TodoCounts, TodoView, calculate_counts, filter_todos, items_left_label},
};

fn demo_list() -> TodoList {
    Arc::new(demo_todos())
}

fn titles(todos: &[Todo]) -> Vec<&str> {
    todos.iter().map(|todo| todo.title.as_str()).collect()
}

#[test]
fn test_filter_todos() {
    let todos = demo_list();

    assert_eq!(filter_todos(&todos, Filter::All).len(), 3);
    assert_eq!(
        titles(&filter_todos(&todos, Filter::Active)),
        vec!["Buy candies", "Finish presentation"]
    );
    assert_eq!(
        titles(&filter_todos(&todos, Filter::Completed)),
        vec!["Finish DApp"]
    );
    assert!(filter_todos(&[], Filter::Active).is_empty());
}

#[test]
fn test_calculate_counts() {
    assert_eq!(
        calculate_counts(&demo_list()),
        TodoCounts {
            total: 3,
            remaining: 2,
            completed: 1,
        }
    );
    assert_eq!(calculate_counts(&[]), TodoCounts::default());
}

#[test]
fn test_items_left_label() {
    assert_eq!(items_left_label(0), "0 todos left");
    assert_eq!(items_left_label(1), "1 todo left");
    assert_eq!(items_left_label(5), "5 todos left");
}

#[test]
fn test_filter_parsing_and_display() -> anyhow::Result<()> {
    assert_eq!("all".parse::<Filter>()?, Filter::All);
    assert_eq!(" Active ".parse::<Filter>()?, Filter::Active);
    assert_eq!("COMPLETED".parse::<Filter>()?, Filter::Completed);
    assert!("done".parse::<Filter>().is_err());

    for filter in Filter::ALL {
        assert_eq!(filter.to_string().parse::<Filter>()?, filter);
    }
    assert_eq!(Filter::default(), Filter::All);
    Ok(())
}

#[test]
fn test_view_is_memoized_by_snapshot_identity() {
    let todos = demo_list();
    let mut view = TodoView::new(todos.clone(), Filter::Active);
    assert_eq!(titles(view.visible()), vec!["Buy candies", "Finish presentation"]);
    assert_eq!(view.counts().remaining, 2);

    assert!(!view.refresh(&todos, Filter::Active));

    // Equal contents in a new snapshot still count as a change.
    let copy: TodoList = Arc::new(todos.as_ref().clone());
    assert!(view.refresh(&copy, Filter::Active));
    assert!(Arc::ptr_eq(view.source(), &copy));
}

#[test]
fn test_view_refreshes_on_filter_or_list_change() {
    let todos = demo_list();
    let mut view = TodoView::new(todos.clone(), Filter::All);

    assert!(view.refresh(&todos, Filter::Completed));
    assert_eq!(view.filter(), Filter::Completed);
    assert_eq!(titles(view.visible()), vec!["Finish DApp"]);

    let mut next = todos.as_ref().clone();
    next.push(Todo::new("Celebrate"));
    next[0].completed = true;
    let next: TodoList = Arc::new(next);

    assert!(view.refresh(&next, Filter::Completed));
    assert_eq!(titles(view.visible()), vec!["Buy candies", "Finish DApp"]);
    assert_eq!(
        view.counts(),
        TodoCounts {
            total: 4,
            remaining: 2,
            completed: 2,
        }
    );
}

#[test]
fn test_default_view_is_empty() {
    let view = TodoView::default();
    assert!(view.visible().is_empty());
    assert_eq!(view.counts(), TodoCounts::default());
    assert_eq!(view.filter(), Filter::All);
}
