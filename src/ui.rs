//! UI collaborator interface
//!
//! The session never draws anything. It reports score, countdown and
//! phase messages through [`GameUi`]; the host renders them however it likes
//! and feeds the message's [`Affordance`] back to `GameSession::activate`.

use serde::{Deserialize, Serialize};

/// The single button a phase message offers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Affordance {
    /// Begin the round (ready -> canput)
    Start,
    /// Reset to a fresh session (gameover -> ready)
    Retry,
}

/// Overlay shown between rounds
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseMessage {
    pub title: String,
    pub subtitle: String,
    pub button: String,
    pub action: Affordance,
}

impl PhaseMessage {
    pub fn ready(time_limit_secs: u32) -> Self {
        Self {
            title: "Fallin' Bubble Game".into(),
            subtitle: format!("Make the bubble bigger within {time_limit_secs} seconds!"),
            button: "START!".into(),
            action: Affordance::Start,
        }
    }

    pub fn game_over(score: u64) -> Self {
        Self {
            title: "Game Over".into(),
            subtitle: score_text(score),
            button: "Try again".into(),
            action: Affordance::Retry,
        }
    }
}

pub fn score_text(score: u64) -> String {
    format!("Score: {score}")
}

pub fn timer_text(seconds_left: u32) -> String {
    format!("Time Left: {seconds_left} seconds")
}

/// Notifications the session emits
pub trait GameUi {
    fn score_changed(&mut self, score: u64);
    fn timer_ticked(&mut self, seconds_left: u32);
    fn show_message(&mut self, message: &PhaseMessage);
    fn clear_message(&mut self);
}

/// Headless: ignore everything
impl GameUi for () {
    fn score_changed(&mut self, _score: u64) {}
    fn timer_ticked(&mut self, _seconds_left: u32) {}
    fn show_message(&mut self, _message: &PhaseMessage) {}
    fn clear_message(&mut self) {}
}

/// Routes notifications to the `log` facade
#[derive(Debug, Default)]
pub struct LogUi;

impl GameUi for LogUi {
    fn score_changed(&mut self, score: u64) {
        log::info!("{}", score_text(score));
    }

    fn timer_ticked(&mut self, seconds_left: u32) {
        if seconds_left % 10 == 0 || seconds_left <= 5 {
            log::info!("{}", timer_text(seconds_left));
        } else {
            log::debug!("{}", timer_text(seconds_left));
        }
    }

    fn show_message(&mut self, message: &PhaseMessage) {
        log::info!("[{}] {} ({})", message.title, message.subtitle, message.button);
    }

    fn clear_message(&mut self) {}
}

/// Everything the UI was told, in order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiNote {
    Score(u64),
    Timer(u32),
    Message(PhaseMessage),
    Cleared,
}

/// Keeps every notification for later inspection
#[derive(Debug, Default)]
pub struct RecordingUi {
    pub notes: Vec<UiNote>,
    /// Currently displayed message
    pub message: Option<PhaseMessage>,
}

impl RecordingUi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn scores(&self) -> Vec<u64> {
        self.notes
            .iter()
            .filter_map(|n| match n {
                UiNote::Score(s) => Some(*s),
                _ => None,
            })
            .collect()
    }

    pub fn last_timer(&self) -> Option<u32> {
        self.notes.iter().rev().find_map(|n| match n {
            UiNote::Timer(t) => Some(*t),
            _ => None,
        })
    }
}

impl GameUi for RecordingUi {
    fn score_changed(&mut self, score: u64) {
        self.notes.push(UiNote::Score(score));
    }

    fn timer_ticked(&mut self, seconds_left: u32) {
        self.notes.push(UiNote::Timer(seconds_left));
    }

    fn show_message(&mut self, message: &PhaseMessage) {
        self.notes.push(UiNote::Message(message.clone()));
        self.message = Some(message.clone());
    }

    fn clear_message(&mut self) {
        self.notes.push(UiNote::Cleared);
        self.message = None;
    }
}
