pub mod task_line;
