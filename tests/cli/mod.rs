mod distribute;
mod errors;
mod init;
mod moves;
mod roster;
mod support;
