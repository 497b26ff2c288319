pub mod log_entries;
