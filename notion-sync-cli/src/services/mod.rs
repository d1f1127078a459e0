// Services provide business logic decoupled from the CLI surface,
// reusable across different contexts.

pub mod sync;
