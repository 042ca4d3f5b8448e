//! State machine for the interactive front end.
//!
//! ```text
//! Uninitialized --WindowCreated--> AwaitingInput --Edit--> AwaitingInput
//! Uninitialized --TimeoutElapsed--> Terminating
//! AwaitingInput --Trigger | Close--> Terminating
//! ```
//!
//! `Terminating` is absorbing. Entering it yields exactly one
//! [`Action::WriteAndExit`]; every later event is ignored.

/// Interactive driver lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    Uninitialized,
    AwaitingInput,
    Terminating,
}

/// Events dispatched by the event loop, one at a time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// The window came up and is accepting input.
    WindowCreated,
    /// A positive timeout was supplied; skip the window entirely.
    TimeoutElapsed,
    /// The editable field now holds these bytes.
    Edit(Vec<u8>),
    /// The write control was activated.
    Trigger,
    /// The window is being closed.
    Close,
}

/// Side effect requested by a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Nothing to do for this event.
    None,
    /// Replace the field text with the edit payload.
    UpdateField,
    /// Write the current field text, then terminate the process.
    WriteAndExit,
}

/// Apply one event. Returns the next state and the action to perform.
pub fn transition(state: State, event: &Event) -> (State, Action) {
    match (state, event) {
        (State::Uninitialized, Event::WindowCreated) => (State::AwaitingInput, Action::None),
        (State::Uninitialized, Event::TimeoutElapsed) => (State::Terminating, Action::WriteAndExit),
        (State::AwaitingInput, Event::Edit(_)) => (State::AwaitingInput, Action::UpdateField),
        (State::AwaitingInput, Event::Trigger | Event::Close) => {
            (State::Terminating, Action::WriteAndExit)
        }
        (state, _) => (state, Action::None),
    }
}
