// Utility Module
// File helpers for the command line

pub mod file_ops;
