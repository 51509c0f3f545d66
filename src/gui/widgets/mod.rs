//! Building blocks of the todos page.

mod footer;
mod header;
mod item;

pub use footer::footer;
pub use header::header;
pub use item::todo_item;
