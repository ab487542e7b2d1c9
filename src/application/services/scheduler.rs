//! Exam reminder scheduler
//!
//! Sleeps until the nearest exam day, sends a direct chat reminder, then
//! picks the next one. Occurrences are recomputed every round so the year
//! rolls over by itself.

use std::time::Duration;

use chrono::NaiveDateTime;
use tokio_util::sync::CancellationToken;

use crate::application::errors::{BotError, ScheduleError};
use crate::domain::entities::{ExamEvent, MessageKind};
use crate::domain::traits::Clock;
use super::message_service::MessageService;

/// The exam with the earliest occurrence after `now`. Ties go to the one
/// registered first.
pub fn next_due(exams: &[ExamEvent], now: NaiveDateTime) -> Option<(&ExamEvent, NaiveDateTime)> {
    exams
        .iter()
        .map(|exam| (exam, exam.occurrence(now)))
        .min_by_key(|(_, at)| *at)
}

/// Reminder text for an exam
pub fn reminder_text(exam: &ExamEvent) -> String {
    format!("Reminder: {:02}/{:02} {}", exam.day(), exam.month(), exam.label())
}

pub struct DeadlineScheduler<C: Clock> {
    exams: Vec<ExamEvent>,
    recipient: String,
    messages: MessageService,
    clock: C,
}

impl<C: Clock> DeadlineScheduler<C> {
    pub fn new(
        exams: Vec<ExamEvent>,
        recipient: impl Into<String>,
        messages: MessageService,
        clock: C,
    ) -> Result<Self, ScheduleError> {
        if exams.is_empty() {
            return Err(ScheduleError::Empty);
        }
        Ok(Self {
            exams,
            recipient: recipient.into(),
            messages,
            clock,
        })
    }

    pub fn exams(&self) -> &[ExamEvent] {
        &self.exams
    }

    /// Run until cancelled. Send failures are logged and the loop goes on.
    pub async fn run(&self, cancel: CancellationToken) -> Result<(), BotError> {
        tracing::info!("Reminder scheduler started with {} exams", self.exams.len());

        let mut last_fired: Option<NaiveDateTime> = None;

        loop {
            let mut now = self.clock.now();
            // A wake-up a hair early must not fire the same day twice.
            if let Some(fired) = last_fired {
                if now <= fired {
                    now = fired + chrono::Duration::seconds(1);
                }
            }

            let Some((exam, at)) = next_due(&self.exams, now) else {
                return Err(ScheduleError::Empty.into());
            };
            let wait = (at - self.clock.now()).to_std().unwrap_or(Duration::ZERO);
            tracing::info!("Next reminder: {} at {} (in {}s)", exam.label(), at, wait.as_secs());

            tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    tracing::info!("Reminder scheduler stopped");
                    return Ok(());
                }
                _ = tokio::time::sleep(wait) => {}
            }

            last_fired = Some(at);
            let text = reminder_text(exam);
            match self.messages.respond(&self.recipient, MessageKind::Chat, &text).await {
                Ok(()) => tracing::info!("Sent reminder to {}: {}", self.recipient, text),
                Err(e) => tracing::error!("Failed to send reminder to {}: {}", self.recipient, e),
            }
        }
    }
}
