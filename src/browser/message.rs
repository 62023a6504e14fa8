use crossterm::event::Event;

use crate::pagination::PageArrival;

/// Everything the browser's update loop reacts to
#[derive(Debug)]
pub enum Message {
    /// The filter text or its cursor changed
    RecomputeContext { text: String, cursor: usize },

    /// A page fetch finished
    PageArrived(PageArrival),

    /// Keyboard, resize or other terminal input
    Terminal(Event),
}
