use base64::{engine::general_purpose::STANDARD, Engine as _};
use leptos::*;
use std::cell::RefCell;
use std::future::Future;
use std::rc::{Rc, Weak};

use crate::{
    api::PhotoFile,
    config,
    devices::{leaflet::MapSlot, photo, FacingMode},
    navigation::ShellState,
    pages::{
        add_story::presenter::{AddStoryPresenter, AddStoryView},
        PageContent,
    },
    utils::geo::Coordinates,
};

pub const CAMERA_VIDEO_ID: &str = "camera-video";
pub const DISCARD_PROMPT: &str =
    "Anda memiliki perubahan yang belum disimpan. Yakin ingin membatalkan?";
const PICKER_ZOOM: f64 = 13.0;

/// Inline `data:` URL so the preview needs no object URL bookkeeping.
pub fn preview_url(photo: &PhotoFile) -> String {
    format!("data:{};base64,{}", photo.mime_type, STANDARD.encode(&photo.bytes))
}

#[derive(Clone)]
pub struct AddStoryViewModel {
    pub description: RwSignal<String>,
    pub photo: RwSignal<Option<PhotoFile>>,
    pub as_guest: RwSignal<bool>,
    pub camera_active: RwSignal<bool>,
    pub facing: RwSignal<FacingMode>,
    pub camera_error: RwSignal<Option<String>>,
    pub location: RwSignal<Option<Coordinates>>,
    pub locating: RwSignal<bool>,
    pub picking: RwSignal<bool>,
    pub submitting: RwSignal<bool>,
    pub errors: RwSignal<Vec<String>>,
    pub unsaved: RwSignal<bool>,
    pub map_error: RwSignal<Option<String>>,
    shell: ShellState,
    map: MapSlot,
    presenter: Rc<RefCell<Weak<AddStoryPresenter>>>,
}

impl AddStoryViewModel {
    pub fn new(shell: ShellState) -> Self {
        Self {
            description: create_rw_signal(String::new()),
            photo: create_rw_signal(None),
            as_guest: create_rw_signal(true),
            camera_active: create_rw_signal(false),
            facing: create_rw_signal(FacingMode::Environment),
            camera_error: create_rw_signal(None),
            location: create_rw_signal(None),
            locating: create_rw_signal(false),
            picking: create_rw_signal(false),
            submitting: create_rw_signal(false),
            errors: create_rw_signal(Vec::new()),
            unsaved: create_rw_signal(false),
            map_error: create_rw_signal(None),
            shell,
            map: MapSlot::default(),
            presenter: Rc::new(RefCell::new(Weak::new())),
        }
    }

    pub fn bind(&self, presenter: &Rc<AddStoryPresenter>) {
        self.presenter.replace(Rc::downgrade(presenter));
    }

    fn presenter(&self) -> Option<Rc<AddStoryPresenter>> {
        self.presenter.borrow().upgrade()
    }

    fn run<Fut>(&self, f: impl FnOnce(Rc<AddStoryPresenter>) -> Fut)
    where
        Fut: Future<Output = ()> + 'static,
    {
        if let Some(presenter) = self.presenter() {
            spawn_local(f(presenter));
        }
    }

    pub fn char_count(&self) -> usize {
        self.description.with(|text| text.chars().count())
    }

    /// Description and photo present, the same gate as the submit button.
    pub fn can_submit(&self) -> bool {
        let len = self.description.with(|text| text.trim().chars().count());
        (10..=1000).contains(&len) && self.photo.with(Option::is_some)
    }

    pub fn show_preview(&self) -> bool {
        self.description.with(|text| text.trim().chars().count() >= 10)
            && self.photo.with(Option::is_some)
    }

    pub fn edit_description(&self, text: String) {
        self.description.set(text.clone());
        if let Some(presenter) = self.presenter() {
            presenter.on_description(&text);
        }
    }

    pub fn start_camera(&self) {
        self.run(|presenter| async move { presenter.on_start_camera().await });
    }

    pub fn switch_camera(&self) {
        self.run(|presenter| async move { presenter.on_switch_camera().await });
    }

    pub fn stop_camera(&self) {
        if let Some(presenter) = self.presenter() {
            presenter.on_stop_camera();
        }
    }

    pub fn capture(&self) {
        self.run(|presenter| async move { presenter.on_capture().await });
    }

    pub fn choose_file(&self, file: web_sys::File) {
        let camera_error = self.camera_error;
        self.run(|presenter| async move {
            match photo::read_file(file).await {
                Ok(photo) => presenter.on_photo_selected(photo),
                Err(err) => {
                    log::error!("reading picked file failed: {}", err);
                    camera_error.set(Some(err.user_message()));
                }
            }
        });
    }

    pub fn remove_photo(&self) {
        if let Some(presenter) = self.presenter() {
            presenter.on_remove_photo();
        }
    }

    pub fn use_current_location(&self) {
        self.run(|presenter| async move { presenter.on_use_current_location().await });
    }

    pub fn select_on_map(&self) {
        if let Some(presenter) = self.presenter() {
            presenter.on_select_on_map();
        }
    }

    pub fn clear_location(&self) {
        if let Some(presenter) = self.presenter() {
            presenter.on_clear_location();
        }
    }

    pub fn submit(&self) {
        self.run(|presenter| async move { presenter.on_submit().await });
    }

    pub fn cancel(&self) {
        if let Some(presenter) = self.presenter() {
            presenter.on_cancel();
        }
    }

    /// Mounts the picker map once its panel is in the DOM. Clicks go to the
    /// presenter as picked locations.
    pub fn mount_picker(&self, container: &web_sys::HtmlElement) {
        let center = self
            .location
            .get_untracked()
            .unwrap_or(config::current().default_map_center);
        if let Err(err) = self.map.mount(container, center, PICKER_ZOOM) {
            log::error!("picker map mount failed: {}", err);
            self.map_error.set(Some(err.user_message()));
            return;
        }
        self.map_error.set(None);
        let presenter = self.presenter.clone();
        let selected = self.location.get_untracked();
        self.map.with(|map| {
            map.refresh_size();
            map.set_selection(selected);
            map.enable_selection(move |at| {
                if let Some(presenter) = presenter.borrow().upgrade() {
                    presenter.on_map_pick(at);
                }
            });
        });
    }
}

impl AddStoryView for AddStoryViewModel {
    fn render(&self) {
        self.shell.show(PageContent::AddStory(self.clone()));
    }

    fn show_author(&self, as_guest: bool) {
        self.as_guest.set(as_guest);
    }

    fn show_camera(&self, active: bool, facing: FacingMode) {
        self.camera_active.set(active);
        self.facing.set(facing);
    }

    fn show_camera_error(&self, message: Option<String>) {
        self.camera_error.set(message);
    }

    fn show_photo(&self, photo: Option<PhotoFile>) {
        self.photo.set(photo);
    }

    fn show_location(&self, location: Option<Coordinates>) {
        self.location.set(location);
        self.map.with(|map| map.set_selection(location));
    }

    fn set_locating(&self, locating: bool) {
        self.locating.set(locating);
    }

    fn set_picking(&self, picking: bool) {
        if !picking {
            self.map.release();
        }
        self.picking.set(picking);
    }

    fn set_submitting(&self, submitting: bool) {
        self.submitting.set(submitting);
    }

    fn show_errors(&self, errors: Vec<String>) {
        self.errors.set(errors);
    }

    fn set_unsaved(&self, unsaved: bool) {
        self.unsaved.set(unsaved);
    }

    #[cfg(target_arch = "wasm32")]
    fn confirm_discard(&self) -> bool {
        web_sys::window()
            .map(|window| window.confirm_with_message(DISCARD_PROMPT).unwrap_or(false))
            .unwrap_or(true)
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn confirm_discard(&self) -> bool {
        true
    }

    fn reset_form(&self) {
        self.description.set(String::new());
        self.photo.set(None);
        self.location.set(None);
        self.camera_active.set(false);
        self.camera_error.set(None);
        self.errors.set(Vec::new());
        self.set_picking(false);
    }

    fn release_map(&self) {
        self.map.release();
    }
}
