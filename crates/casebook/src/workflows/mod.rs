pub mod case;
pub mod coaching;
