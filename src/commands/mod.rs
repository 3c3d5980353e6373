//! Command implementations for tadist

pub mod dispatch;
pub mod distribute;
pub mod format;
pub mod init;
pub mod moves;
pub mod prompt;
pub mod roster;
pub mod sheets;
pub mod show;
