// Here's the list of the shell commands implemented
pub mod cd;
pub mod cp;
pub mod dl;
pub mod ls;
pub mod ul;

pub mod error;
pub mod handlers;
pub mod shellcommand;

// The utils and common functions are here
pub mod utils;
