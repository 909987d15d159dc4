//! The overwrite-confirmation seam.
//!
//! Batches run on a worker thread but the yes/no question must be put to
//! whatever owns the display. [`OverwritePrompt`] is the synchronous
//! question; [`ChannelPrompt`] marshals it across threads and blocks the
//! worker until the answer arrives.

use std::sync::mpsc::{self, Receiver, Sender};

/// Asks the user whether existing proxy settings may be overwritten.
pub trait OverwritePrompt: Send + Sync {
    /// Blocks until the question is answered. `true` means overwrite.
    fn confirm(&self, title: &str, question: &str) -> bool;
}

impl<F> OverwritePrompt for F
where
    F: Fn(&str, &str) -> bool + Send + Sync,
{
    fn confirm(&self, title: &str, question: &str) -> bool {
        self(title, question)
    }
}

/// A confirmation question in flight between threads.
///
/// Dropping the request unanswered counts as declining it.
pub struct PromptRequest {
    /// Short heading for the question.
    pub title: String,
    /// The yes/no question itself.
    pub question: String,
    reply_tx: Sender<bool>,
}

impl PromptRequest {
    /// Send the answer back to the blocked worker.
    pub fn answer(self, overwrite: bool) {
        let _ = self.reply_tx.send(overwrite);
    }
}

impl std::fmt::Debug for PromptRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PromptRequest")
            .field("title", &self.title)
            .field("question", &self.question)
            .finish()
    }
}

/// [`OverwritePrompt`] that forwards questions over a channel.
pub struct ChannelPrompt {
    request_tx: Sender<PromptRequest>,
}

/// Create the marshaling pair.
///
/// Hand the [`ChannelPrompt`] to the worker and service [`PromptRequest`]s
/// from the receiver wherever the display lives.
pub fn prompt_channel() -> (ChannelPrompt, Receiver<PromptRequest>) {
    let (request_tx, request_rx) = mpsc::channel();
    (ChannelPrompt { request_tx }, request_rx)
}

impl OverwritePrompt for ChannelPrompt {
    fn confirm(&self, title: &str, question: &str) -> bool {
        let (reply_tx, reply_rx) = mpsc::channel();
        let request = PromptRequest {
            title: title.to_string(),
            question: question.to_string(),
            reply_tx,
        };
        // A gone display side declines rather than wedging the batch.
        if self.request_tx.send(request).is_err() {
            return false;
        }
        reply_rx.recv().unwrap_or(false)
    }
}
