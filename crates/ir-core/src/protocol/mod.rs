//! The text line protocol spoken with the IR firmware, and the SSE frame
//! encoding pushed to web subscribers.

pub mod command;
pub mod frames;
