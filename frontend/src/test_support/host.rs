//! In-memory navigation host. Fragment writes fire the change listener the way
//! `hashchange` would, and spawned work is queued until `settle` drains it.

use futures::future::LocalBoxFuture;
use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;

use crate::navigation::{Navigate, NavigationHost, RouteName};

#[derive(Default)]
pub struct FakeHost {
    fragment: RefCell<String>,
    pub writes: RefCell<Vec<(String, bool)>>,
    pub titles: RefCell<Vec<String>>,
    pub active: Cell<Option<RouteName>>,
    pub loading: Cell<bool>,
    pub loading_shown: Cell<usize>,
    pub errors: RefCell<Vec<String>>,
    pub history_moves: RefCell<Vec<&'static str>>,
    tasks: RefCell<VecDeque<LocalBoxFuture<'static, ()>>>,
    listener: RefCell<Option<Rc<dyn Fn()>>>,
}

impl FakeHost {
    pub fn at(fragment: &str) -> Rc<Self> {
        let host = Rc::new(Self::default());
        host.fragment.replace(fragment.to_string());
        host
    }

    pub fn fragment(&self) -> String {
        self.fragment.borrow().clone()
    }

    /// Simulates the user editing the address bar.
    pub fn visit(&self, fragment: &str) {
        self.fragment.replace(fragment.to_string());
        self.fire();
    }

    fn fire(&self) {
        let listener = self.listener.borrow().clone();
        if let Some(listener) = listener {
            listener();
        }
    }

    pub fn pending_tasks(&self) -> usize {
        self.tasks.borrow().len()
    }

    pub fn take_task(&self) -> Option<LocalBoxFuture<'static, ()>> {
        self.tasks.borrow_mut().pop_front()
    }

    /// Runs queued work, including work queued while draining.
    pub async fn settle(&self) {
        while let Some(task) = self.take_task() {
            task.await;
        }
    }
}

impl NavigationHost for FakeHost {
    fn current_fragment(&self) -> String {
        self.fragment()
    }

    fn set_fragment(&self, fragment: &str, replace: bool) {
        self.writes.borrow_mut().push((fragment.to_string(), replace));
        let changed = *self.fragment.borrow() != fragment;
        self.fragment.replace(fragment.to_string());
        if changed {
            self.fire();
        }
    }

    fn set_title(&self, title: &str) {
        self.titles.borrow_mut().push(title.to_string());
    }

    fn mark_active(&self, route: RouteName) {
        self.active.set(Some(route));
    }

    fn show_loading(&self) {
        self.loading.set(true);
        self.loading_shown.set(self.loading_shown.get() + 1);
    }

    fn hide_loading(&self) {
        self.loading.set(false);
    }

    fn render_error(&self, message: &str) {
        self.errors.borrow_mut().push(message.to_string());
    }

    fn spawn(&self, task: LocalBoxFuture<'static, ()>) {
        self.tasks.borrow_mut().push_back(task);
    }

    fn on_fragment_change(&self, callback: Rc<dyn Fn()>) {
        self.listener.replace(Some(callback));
    }

    fn go_back(&self) {
        self.history_moves.borrow_mut().push("back");
    }

    fn go_forward(&self) {
        self.history_moves.borrow_mut().push("forward");
    }
}

/// Records navigation requests made by presenters.
#[derive(Default)]
pub struct RecordingNavigate {
    pub routes: RefCell<Vec<RouteName>>,
}

impl Navigate for RecordingNavigate {
    fn navigate_to(&self, route: RouteName, _replace: bool) {
        self.routes.borrow_mut().push(route);
    }
}
