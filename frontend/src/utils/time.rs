use chrono::{DateTime, Datelike, Utc};
use std::cell::Cell;

const MONTHS_ID: [&str; 12] = [
    "Januari",
    "Februari",
    "Maret",
    "April",
    "Mei",
    "Juni",
    "Juli",
    "Agustus",
    "September",
    "Oktober",
    "November",
    "Desember",
];

pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock that only moves when told to.
#[derive(Debug)]
pub struct ManualClock {
    now: Cell<DateTime<Utc>>,
}

impl ManualClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            now: Cell::new(now),
        }
    }

    pub fn set(&self, now: DateTime<Utc>) {
        self.now.set(now);
    }

    pub fn advance(&self, by: chrono::Duration) {
        self.now.set(self.now.get() + by);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        self.now.get()
    }
}

/// "Hari ini", "Kemarin", "N hari yang lalu" within a week, then a long date.
pub fn format_relative_date(created_at: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let days = (now - created_at).num_days();
    match days {
        i64::MIN..=0 => "Hari ini".to_string(),
        1 => "Kemarin".to_string(),
        2..=6 => format!("{} hari yang lalu", days),
        _ => format_long_date(created_at),
    }
}

pub fn format_long_date(at: DateTime<Utc>) -> String {
    let month = MONTHS_ID
        .get(at.month0() as usize)
        .copied()
        .unwrap_or_default();
    format!("{} {} {}", at.day(), month, at.year())
}

pub fn truncate_text(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let cut: String = text.chars().take(max_chars).collect();
    format!("{}...", cut.trim_end())
}

/// Keeps only the last call of a burst, run once `delay_ms` passes quietly.
/// Off the browser there is no timer loop, so calls run immediately.
#[derive(Clone, Default)]
pub struct Debounce {
    #[cfg(target_arch = "wasm32")]
    pending: std::rc::Rc<std::cell::RefCell<Option<gloo_timers::callback::Timeout>>>,
}

impl Debounce {
    #[cfg(target_arch = "wasm32")]
    pub fn call(&self, delay_ms: u32, f: impl FnOnce() + 'static) {
        let timeout = gloo_timers::callback::Timeout::new(delay_ms, f);
        // dropping the previous timeout cancels it
        self.pending.replace(Some(timeout));
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn call(&self, _delay_ms: u32, f: impl FnOnce() + 'static) {
        f();
    }

    pub fn cancel(&self) {
        #[cfg(target_arch = "wasm32")]
        self.pending.replace(None);
    }
}
