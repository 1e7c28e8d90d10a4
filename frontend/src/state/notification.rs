use leptos::*;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Info,
    Warning,
    Error,
}

impl NoticeKind {
    pub fn title(self) -> &'static str {
        match self {
            Self::Success => "Berhasil",
            Self::Info => "Informasi",
            Self::Warning => "Peringatan",
            Self::Error => "Error",
        }
    }
}

/// User-facing notices raised by services and presenters.
pub trait Notifier {
    fn notify(&self, kind: NoticeKind, message: &str);

    fn success(&self, message: &str) {
        self.notify(NoticeKind::Success, message);
    }

    fn info(&self, message: &str) {
        self.notify(NoticeKind::Info, message);
    }

    fn warning(&self, message: &str) {
        self.notify(NoticeKind::Warning, message);
    }

    fn error(&self, message: &str) {
        self.notify(NoticeKind::Error, message);
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Toast {
    pub id: Uuid,
    pub kind: NoticeKind,
    pub message: String,
}

/// Toast queue rendered by the app shell.
#[derive(Clone, Copy)]
pub struct ToastStore {
    pub toasts: RwSignal<Vec<Toast>>,
    duration_ms: u32,
}

impl ToastStore {
    pub fn new(duration_ms: u32) -> Self {
        Self {
            toasts: create_rw_signal(Vec::new()),
            duration_ms,
        }
    }

    pub fn push(&self, kind: NoticeKind, message: impl Into<String>) -> Uuid {
        let toast = Toast {
            id: Uuid::new_v4(),
            kind,
            message: message.into(),
        };
        let id = toast.id;
        self.toasts.update(|list| list.push(toast));
        self.schedule_dismiss(id);
        id
    }

    pub fn dismiss(&self, id: Uuid) {
        self.toasts.update(|list| list.retain(|toast| toast.id != id));
    }

    pub fn clear(&self) {
        self.toasts.set(Vec::new());
    }

    #[cfg(target_arch = "wasm32")]
    fn schedule_dismiss(&self, id: Uuid) {
        if self.duration_ms == 0 {
            return;
        }
        let store = *self;
        gloo_timers::callback::Timeout::new(self.duration_ms, move || store.dismiss(id)).forget();
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn schedule_dismiss(&self, _id: Uuid) {
        let _ = self.duration_ms;
    }
}

impl Notifier for ToastStore {
    fn notify(&self, kind: NoticeKind, message: &str) {
        match kind {
            NoticeKind::Error => log::error!("{}", message),
            NoticeKind::Warning => log::warn!("{}", message),
            _ => log::info!("{}", message),
        }
        self.push(kind, message);
    }
}

#[cfg(test)]
pub use recording::RecordingNotifier;
