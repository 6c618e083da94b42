//! Recording messenger used by the core tests.

use std::sync::Mutex;

use async_trait::async_trait;

use crate::{
    domain::{ChatId, ChatTarget, MessageId, MessageRef, UserId},
    errors::Error,
    messaging::{
        port::MessagingPort,
        types::{InlineKeyboard, MemberStatus},
    },
    Result,
};

#[derive(Clone, Debug, PartialEq)]
pub enum Call {
    Markdown {
        chat: ChatTarget,
        text: String,
    },
    Html {
        chat: ChatTarget,
        text: String,
    },
    Keyboard {
        chat: ChatTarget,
        text: String,
        keyboard: InlineKeyboard,
    },
    EditText {
        msg: MessageRef,
        text: String,
        keyboard: Option<InlineKeyboard>,
    },
    EditKeyboard {
        msg: MessageRef,
        keyboard: InlineKeyboard,
    },
    Document {
        chat: ChatTarget,
        data: Vec<u8>,
        filename: String,
        caption: String,
    },
    AnswerCallback {
        callback_id: String,
        text: Option<String>,
    },
    MemberStatus {
        chat: ChatTarget,
        user: UserId,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FailMode {
    BadRequest,
    External,
}

impl FailMode {
    fn into_error(self) -> Error {
        match self {
            FailMode::BadRequest => Error::BadRequest("mock rejected".to_string()),
            FailMode::External => Error::External("mock failed".to_string()),
        }
    }
}

/// A `MessagingPort` that records every call and can be told to fail.
pub struct RecordingMessenger {
    calls: Mutex<Vec<Call>>,
    status: Mutex<std::result::Result<MemberStatus, FailMode>>,
    markdown_failures: Mutex<Vec<FailMode>>,
    html_failures: Mutex<Vec<FailMode>>,
    document_failures: Mutex<Vec<FailMode>>,
    next_message_id: Mutex<i32>,
}

impl RecordingMessenger {
    pub fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            status: Mutex::new(Ok(MemberStatus::Member)),
            markdown_failures: Mutex::new(Vec::new()),
            html_failures: Mutex::new(Vec::new()),
            document_failures: Mutex::new(Vec::new()),
            next_message_id: Mutex::new(0),
        }
    }

    pub fn set_member_status(&self, status: MemberStatus) {
        *self.status.lock().unwrap() = Ok(status);
    }

    pub fn fail_member_status(&self, mode: FailMode) {
        *self.status.lock().unwrap() = Err(mode);
    }

    /// Queue a failure for the next markdown send (FIFO).
    pub fn fail_next_markdown(&self, mode: FailMode) {
        self.markdown_failures.lock().unwrap().push(mode);
    }

    pub fn fail_next_html(&self, mode: FailMode) {
        self.html_failures.lock().unwrap().push(mode);
    }

    pub fn fail_next_document(&self, mode: FailMode) {
        self.document_failures.lock().unwrap().push(mode);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    /// Calls excluding membership queries, i.e. everything user-visible.
    pub fn sends(&self) -> Vec<Call> {
        self.calls()
            .into_iter()
            .filter(|c| !matches!(c, Call::MemberStatus { .. }))
            .collect()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    fn take_failure(&self, queue: &Mutex<Vec<FailMode>>) -> Option<Error> {
        let mut queue = queue.lock().unwrap();
        if queue.is_empty() {
            None
        } else {
            Some(queue.remove(0).into_error())
        }
    }

    fn next_ref(&self, chat: &ChatTarget) -> MessageRef {
        let mut next = self.next_message_id.lock().unwrap();
        *next += 1;
        let chat_id = match chat {
            ChatTarget::Id(id) => *id,
            ChatTarget::Handle(_) => 0,
        };
        MessageRef {
            chat_id: ChatId(chat_id),
            message_id: MessageId(*next),
        }
    }
}

#[async_trait]
impl MessagingPort for RecordingMessenger {
    async fn send_markdown(&self, chat: &ChatTarget, text: &str) -> Result<MessageRef> {
        self.record(Call::Markdown {
            chat: chat.clone(),
            text: text.to_string(),
        });
        if let Some(err) = self.take_failure(&self.markdown_failures) {
            return Err(err);
        }
        Ok(self.next_ref(chat))
    }

    async fn send_html(&self, chat: &ChatTarget, html: &str) -> Result<MessageRef> {
        self.record(Call::Html {
            chat: chat.clone(),
            text: html.to_string(),
        });
        if let Some(err) = self.take_failure(&self.html_failures) {
            return Err(err);
        }
        Ok(self.next_ref(chat))
    }

    async fn send_keyboard(
        &self,
        chat: &ChatTarget,
        text: &str,
        keyboard: InlineKeyboard,
    ) -> Result<MessageRef> {
        self.record(Call::Keyboard {
            chat: chat.clone(),
            text: text.to_string(),
            keyboard,
        });
        Ok(self.next_ref(chat))
    }

    async fn edit_text(
        &self,
        msg: MessageRef,
        text: &str,
        keyboard: Option<InlineKeyboard>,
    ) -> Result<()> {
        self.record(Call::EditText {
            msg,
            text: text.to_string(),
            keyboard,
        });
        Ok(())
    }

    async fn edit_keyboard(&self, msg: MessageRef, keyboard: InlineKeyboard) -> Result<()> {
        self.record(Call::EditKeyboard { msg, keyboard });
        Ok(())
    }

    async fn send_document(
        &self,
        chat: &ChatTarget,
        data: Vec<u8>,
        filename: &str,
        caption: &str,
    ) -> Result<()> {
        self.record(Call::Document {
            chat: chat.clone(),
            data,
            filename: filename.to_string(),
            caption: caption.to_string(),
        });
        if let Some(err) = self.take_failure(&self.document_failures) {
            return Err(err);
        }
        Ok(())
    }

    async fn answer_callback(&self, callback_id: &str, text: Option<&str>) -> Result<()> {
        self.record(Call::AnswerCallback {
            callback_id: callback_id.to_string(),
            text: text.map(|t| t.to_string()),
        });
        Ok(())
    }

    async fn member_status(&self, chat: &ChatTarget, user: UserId) -> Result<MemberStatus> {
        self.record(Call::MemberStatus {
            chat: chat.clone(),
            user,
        });
        self.status
            .lock()
            .unwrap()
            .clone()
            .map_err(FailMode::into_error)
    }
}
