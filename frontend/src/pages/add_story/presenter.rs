use async_trait::async_trait;
use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use crate::{
    api::PhotoFile,
    devices::{CameraDevice, FacingMode},
    error::AppError,
    navigation::{Presenter, RouteName},
    pages::PageServices,
    state::{auth::Subscription, stories::NewStory, validation},
    utils::geo::Coordinates,
};

pub const PHOTO_CAPTURED_MESSAGE: &str = "Foto berhasil diambil!";
pub const PHOTO_SELECTED_MESSAGE: &str = "Foto berhasil dipilih!";
pub const LOCATION_FOUND_MESSAGE: &str = "Lokasi saat ini berhasil didapatkan";
pub const PICK_ON_MAP_MESSAGE: &str = "Klik pada peta untuk memilih lokasi";
pub const LOCATION_CLEARED_MESSAGE: &str = "Lokasi dihapus";
pub const INCOMPLETE_FORM_MESSAGE: &str = "Mohon lengkapi form dengan benar";
pub const PHOTO_REQUIRED_MESSAGE: &str = "Mohon ambil foto terlebih dahulu";
pub const UPLOAD_FAILED_MESSAGE: &str =
    "Gagal mengupload foto. Pastikan ukuran file tidak lebih dari 1MB";
pub const UNREACHABLE_MESSAGE: &str =
    "Tidak dapat terhubung ke server. Periksa koneksi internet Anda";
pub const SESSION_ENDED_MESSAGE: &str = "Sesi login telah berakhir. Silakan login ulang";

pub fn success_message(as_guest: bool) -> String {
    format!(
        "Story berhasil ditambahkan sebagai {}!",
        if as_guest { "guest" } else { "user" }
    )
}

pub trait AddStoryView {
    fn render(&self);
    fn show_author(&self, as_guest: bool);
    fn show_camera(&self, active: bool, facing: FacingMode);
    fn show_camera_error(&self, message: Option<String>);
    fn show_photo(&self, photo: Option<PhotoFile>);
    fn show_location(&self, location: Option<Coordinates>);
    fn set_locating(&self, locating: bool);
    /// Shows or hides the pick-on-map panel.
    fn set_picking(&self, picking: bool);
    fn set_submitting(&self, submitting: bool);
    fn show_errors(&self, errors: Vec<String>);
    fn set_unsaved(&self, unsaved: bool);
    /// Asks before throwing away a non-empty draft.
    fn confirm_discard(&self) -> bool;
    fn reset_form(&self);
    fn release_map(&self);
}

/// Assembles one story from the camera or a picked file, an optional
/// location and a description, then submits it.
pub struct AddStoryPresenter {
    me: Weak<AddStoryPresenter>,
    view: Rc<dyn AddStoryView>,
    services: PageServices,
    camera: Rc<dyn CameraDevice>,
    draft: RefCell<NewStory>,
    alive: Cell<bool>,
    busy: Cell<bool>,
    subscription: RefCell<Option<Subscription>>,
}

impl AddStoryPresenter {
    pub fn new(
        view: Rc<dyn AddStoryView>,
        services: PageServices,
        camera: Rc<dyn CameraDevice>,
    ) -> Rc<Self> {
        Rc::new_cyclic(|me| Self {
            me: me.clone(),
            view,
            services,
            camera,
            draft: RefCell::new(NewStory::default()),
            alive: Cell::new(false),
            busy: Cell::new(false),
            subscription: RefCell::new(None),
        })
    }

    pub fn is_alive(&self) -> bool {
        self.alive.get()
    }

    pub fn draft(&self) -> NewStory {
        self.draft.borrow().clone()
    }

    /// Anyone without a session posts through the guest endpoint.
    fn posts_as_guest(&self) -> bool {
        !self.services.auth.is_authenticated()
    }

    pub fn has_unsaved_changes(&self) -> bool {
        let draft = self.draft.borrow();
        !draft.description.trim().is_empty() || draft.photo.is_some() || draft.location.is_some()
    }

    fn draft_changed(&self) {
        self.view.set_unsaved(self.has_unsaved_changes());
    }

    pub fn on_description(&self, text: &str) {
        if !self.alive.get() {
            return;
        }
        self.draft.borrow_mut().description = text.to_string();
        self.draft_changed();
    }

    pub async fn on_start_camera(&self) {
        self.start_camera(FacingMode::Environment).await;
    }

    pub async fn on_switch_camera(&self) {
        if !self.camera.is_active() {
            return;
        }
        self.start_camera(self.camera.facing().toggled()).await;
    }

    async fn start_camera(&self, facing: FacingMode) {
        if !self.alive.get() {
            return;
        }
        self.view.show_camera_error(None);
        let started = self.camera.start(facing).await;
        if !self.alive.get() {
            // The page was left while the permission prompt was open.
            self.camera.stop();
            return;
        }
        match started {
            Ok(()) => self.view.show_camera(true, facing),
            Err(err) => {
                log::error!("camera start failed: {:?}", err);
                self.view.show_camera(false, facing);
                self.view.show_camera_error(Some(err.to_string()));
            }
        }
    }

    pub fn on_stop_camera(&self) {
        self.camera.stop();
        if self.alive.get() {
            self.view.show_camera(false, self.camera.facing());
        }
    }

    pub async fn on_capture(&self) {
        if !self.alive.get() {
            return;
        }
        let captured = self.camera.capture().await;
        if !self.alive.get() {
            return;
        }
        match captured {
            Ok(photo) => {
                self.on_stop_camera();
                self.set_photo(Some(photo));
                self.services.notifier.success(PHOTO_CAPTURED_MESSAGE);
            }
            Err(err) => {
                log::error!("capture failed: {:?}", err);
                self.view.show_camera_error(Some(err.to_string()));
            }
        }
    }

    /// A file picked from the gallery input.
    pub fn on_photo_selected(&self, photo: PhotoFile) {
        if !self.alive.get() {
            return;
        }
        let errors = validation::validate_photo(Some(&photo));
        if let Some(first) = errors.first() {
            self.services.notifier.error(first);
            return;
        }
        self.on_stop_camera();
        self.set_photo(Some(photo));
        self.services.notifier.success(PHOTO_SELECTED_MESSAGE);
    }

    pub fn on_remove_photo(&self) {
        if self.alive.get() {
            self.set_photo(None);
        }
    }

    fn set_photo(&self, photo: Option<PhotoFile>) {
        self.draft.borrow_mut().photo = photo.clone();
        self.view.show_photo(photo);
        self.draft_changed();
    }

    fn set_location(&self, location: Option<Coordinates>) {
        self.draft.borrow_mut().location = location;
        self.view.show_location(location);
        self.draft_changed();
    }

    pub async fn on_use_current_location(&self) {
        if !self.alive.get() {
            return;
        }
        self.view.set_locating(true);
        let position = self.services.location.current_position().await;
        if !self.alive.get() {
            return;
        }
        self.view.set_locating(false);
        match position {
            Ok(at) => {
                self.set_location(Some(at));
                self.services.notifier.success(LOCATION_FOUND_MESSAGE);
            }
            Err(err) => {
                log::error!("current location failed: {:?}", err);
                self.services.notifier.error(&err.to_string());
            }
        }
    }

    pub fn on_select_on_map(&self) {
        if !self.alive.get() {
            return;
        }
        self.view.set_picking(true);
        self.services.notifier.info(PICK_ON_MAP_MESSAGE);
    }

    pub fn on_map_pick(&self, at: Coordinates) {
        if !self.alive.get() {
            return;
        }
        let errors = validation::validate_location(Some(at));
        if let Some(first) = errors.first() {
            self.services.notifier.error(first);
            return;
        }
        self.set_location(Some(at));
        self.view.set_picking(false);
    }

    pub fn on_clear_location(&self) {
        if !self.alive.get() {
            return;
        }
        self.set_location(None);
        self.view.set_picking(false);
        self.services.notifier.info(LOCATION_CLEARED_MESSAGE);
    }

    pub async fn on_submit(&self) {
        if !self.alive.get() || self.busy.get() {
            return;
        }
        let draft = self.draft();
        let errors = validation::validate_description(&draft.description);
        if !errors.is_empty() {
            self.view.show_errors(errors);
            self.services.notifier.error(INCOMPLETE_FORM_MESSAGE);
            return;
        }
        if draft.photo.is_none() {
            self.services.notifier.error(PHOTO_REQUIRED_MESSAGE);
            return;
        }
        self.view.show_errors(Vec::new());

        let as_guest = self.posts_as_guest();
        self.busy.set(true);
        self.view.set_submitting(true);
        let result = if as_guest {
            self.services.stories.add_as_guest(draft).await
        } else {
            self.services.stories.add(draft).await
        };
        self.busy.set(false);
        if !self.alive.get() {
            return;
        }
        self.view.set_submitting(false);

        match result {
            Ok(message) => {
                log::debug!("story submitted: {}", message);
                self.services.notifier.success(&success_message(as_guest));
                self.reset();
                self.services.navigator.navigate_to(RouteName::Home, false);
            }
            Err(err) => self.handle_submit_error(err),
        }
    }

    fn handle_submit_error(&self, err: AppError) {
        log::error!("story submission failed: {:?}", err);
        let notifier = &self.services.notifier;
        let session_ended = matches!(err, AppError::SessionExpired)
            || matches!(&err, AppError::Api(api) if api.is_unauthorized());
        if session_ended {
            notifier.error(SESSION_ENDED_MESSAGE);
            self.services.navigator.navigate_to(RouteName::Auth, false);
            return;
        }
        match &err {
            AppError::Validation(errors) => {
                if let Some(first) = errors.first() {
                    notifier.error(first);
                }
                self.view.show_errors(errors.clone());
            }
            AppError::Api(api) if api.is_network() => notifier.error(UNREACHABLE_MESSAGE),
            AppError::Api(api) => {
                let lowered = api.error.to_lowercase();
                if lowered.contains("file") || lowered.contains("image") {
                    notifier.error(UPLOAD_FAILED_MESSAGE);
                } else {
                    notifier.error(&api.error);
                }
            }
            other => notifier.error(&other.user_message()),
        }
    }

    pub fn on_cancel(&self) {
        if !self.alive.get() {
            return;
        }
        if self.has_unsaved_changes() && !self.view.confirm_discard() {
            return;
        }
        self.reset();
        self.services.navigator.navigate_to(RouteName::Home, false);
    }

    fn reset(&self) {
        self.camera.stop();
        self.draft.replace(NewStory::default());
        self.view.reset_form();
        self.view.set_unsaved(false);
    }
}

#[async_trait(?Send)]
impl Presenter for AddStoryPresenter {
    async fn init(&self) -> Result<(), AppError> {
        self.alive.set(true);
        self.view.render();
        self.view.show_author(self.posts_as_guest());

        let me = self.me.clone();
        let subscription = self.services.auth.subscribe(move |_| {
            if let Some(presenter) = me.upgrade().filter(|p| p.is_alive()) {
                presenter.view.show_author(presenter.posts_as_guest());
            }
        });
        self.subscription.replace(Some(subscription));
        Ok(())
    }

    fn cleanup(&self) -> Result<(), AppError> {
        self.alive.set(false);
        self.subscription.replace(None);
        self.camera.stop();
        self.view.set_unsaved(false);
        self.view.release_map();
        Ok(())
    }
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod host_tests {
    use super::*;
    use crate::api::{test_support::mock::*, ApiClient};
    use crate::devices::{
        fakes::{FakeCamera, FakeLocation},
        CameraError, GeolocationError,
    };
    use crate::state::{
        auth::AuthService,
        notification::{NoticeKind, RecordingNotifier},
        stories::StoryRepository,
    };
    use crate::test_support::{
        helpers::{jpeg, login_json, token_for},
        host::RecordingNavigate,
    };
    use crate::utils::{storage::MemoryStorage, time::ManualClock};
    use chrono::{Duration, TimeZone, Utc};
    use serde_json::json;

    #[derive(Default)]
    struct FakeView {
        renders: Cell<usize>,
        as_guest: RefCell<Vec<bool>>,
        camera: RefCell<Option<(bool, FacingMode)>>,
        camera_error: RefCell<Option<String>>,
        photo: RefCell<Option<PhotoFile>>,
        location: Cell<Option<Coordinates>>,
        picking: Cell<bool>,
        submitting: RefCell<Vec<bool>>,
        errors: RefCell<Vec<String>>,
        unsaved: Cell<bool>,
        confirm: Cell<bool>,
        confirms: Cell<usize>,
        resets: Cell<usize>,
        released: Cell<usize>,
    }

    impl AddStoryView for FakeView {
        fn render(&self) {
            self.renders.set(self.renders.get() + 1);
        }
        fn show_author(&self, as_guest: bool) {
            self.as_guest.borrow_mut().push(as_guest);
        }
        fn show_camera(&self, active: bool, facing: FacingMode) {
            self.camera.replace(Some((active, facing)));
        }
        fn show_camera_error(&self, message: Option<String>) {
            self.camera_error.replace(message);
        }
        fn show_photo(&self, photo: Option<PhotoFile>) {
            self.photo.replace(photo);
        }
        fn show_location(&self, location: Option<Coordinates>) {
            self.location.set(location);
        }
        fn set_locating(&self, _locating: bool) {}
        fn set_picking(&self, picking: bool) {
            self.picking.set(picking);
        }
        fn set_submitting(&self, submitting: bool) {
            self.submitting.borrow_mut().push(submitting);
        }
        fn show_errors(&self, errors: Vec<String>) {
            self.errors.replace(errors);
        }
        fn set_unsaved(&self, unsaved: bool) {
            self.unsaved.set(unsaved);
        }
        fn confirm_discard(&self) -> bool {
            self.confirms.set(self.confirms.get() + 1);
            self.confirm.get()
        }
        fn reset_form(&self) {
            self.resets.set(self.resets.get() + 1);
        }
        fn release_map(&self) {
            self.released.set(self.released.get() + 1);
        }
    }

    struct Fixture {
        server: MockServer,
        notifier: Rc<RecordingNotifier>,
        navigate: Rc<RecordingNavigate>,
        auth: AuthService,
        camera: Rc<FakeCamera>,
        view: Rc<FakeView>,
        presenter: Rc<AddStoryPresenter>,
    }

    async fn fixture(location: FakeLocation) -> Fixture {
        let server = MockServer::start();
        let storage = Rc::new(MemoryStorage::new());
        let clock = Rc::new(ManualClock::new(Utc.with_ymd_and_hms(2025, 1, 12, 9, 0, 0).unwrap()));
        let notifier = Rc::new(RecordingNotifier::default());
        let navigate = Rc::new(RecordingNavigate::default());
        let api = ApiClient::new_with_base_url(server.url("/v1"), storage);
        let auth = AuthService::new(api.clone(), clock.clone(), notifier.clone());
        let stories =
            StoryRepository::new(api, auth.clone(), clock.clone(), 50, Duration::minutes(5));
        let camera = Rc::new(FakeCamera::default());
        let view = Rc::new(FakeView::default());
        let presenter = AddStoryPresenter::new(
            view.clone(),
            PageServices {
                auth: auth.clone(),
                stories,
                notifier: notifier.clone(),
                navigator: navigate.clone(),
                location: Rc::new(location),
            },
            camera.clone(),
        );
        presenter.init().await.unwrap();
        Fixture {
            server,
            notifier,
            navigate,
            auth,
            camera,
            view,
            presenter,
        }
    }

    fn jakarta() -> Coordinates {
        Coordinates::new(-6.2088, 106.8456)
    }

    fn mock_created(server: &MockServer, path: &str) {
        let path = path.to_string();
        server.mock(move |when, then| {
            when.method(POST).path(&path);
            then.status(201)
                .json_body(json!({ "error": false, "message": "Story created successfully" }));
        });
    }

    async fn sign_in(fx: &Fixture) {
        let token = token_for("user-1", 1_736_672_400, None);
        fx.server.mock(|when, then| {
            when.method(POST).path("/v1/login");
            then.status(200).json_body(login_json("user-1", "Dimas", &token));
        });
        fx.auth.login("dimas@example.com", "Rahasia#123").await.unwrap();
    }

    fn fill(fx: &Fixture) {
        fx.presenter.on_description("Sore yang tenang di Kota Tua");
        fx.presenter.on_photo_selected(jpeg(2048));
    }

    #[tokio::test]
    async fn init_renders_for_guest_without_touching_devices() {
        let fx = fixture(FakeLocation::at(jakarta())).await;
        assert_eq!(fx.view.renders.get(), 1);
        assert_eq!(*fx.view.as_guest.borrow(), vec![true]);
        assert!(fx.camera.starts.borrow().is_empty());
        assert!(fx.server.received().is_empty());
    }

    #[tokio::test]
    async fn author_follows_sign_in() {
        let fx = fixture(FakeLocation::at(jakarta())).await;
        sign_in(&fx).await;
        assert_eq!(fx.view.as_guest.borrow().last(), Some(&false));
    }

    #[tokio::test]
    async fn capture_stores_photo_and_stops_camera() {
        let fx = fixture(FakeLocation::at(jakarta())).await;
        fx.camera.capture_result.replace(Some(jpeg(512)));

        fx.presenter.on_start_camera().await;
        assert_eq!(*fx.view.camera.borrow(), Some((true, FacingMode::Environment)));

        fx.presenter.on_switch_camera().await;
        assert_eq!(*fx.view.camera.borrow(), Some((true, FacingMode::User)));

        fx.presenter.on_capture().await;
        assert!(fx.presenter.draft().photo.is_some());
        assert!(fx.view.photo.borrow().is_some());
        assert!(!fx.camera.is_active());
        assert!(fx.view.unsaved.get());
        assert_eq!(
            fx.notifier.messages(NoticeKind::Success),
            vec![PHOTO_CAPTURED_MESSAGE.to_string()]
        );
    }

    #[tokio::test]
    async fn camera_failure_is_shown_in_place() {
        let fx = fixture(FakeLocation::at(jakarta())).await;
        fx.camera.start_error.replace(Some(CameraError::PermissionDenied));

        fx.presenter.on_start_camera().await;

        assert_eq!(*fx.view.camera.borrow(), Some((false, FacingMode::Environment)));
        assert_eq!(
            fx.view.camera_error.borrow().as_deref(),
            Some(CameraError::PermissionDenied.to_string().as_str())
        );
        assert!(fx.notifier.notices().is_empty());
    }

    #[tokio::test]
    async fn oversized_file_is_rejected() {
        let fx = fixture(FakeLocation::at(jakarta())).await;
        fx.presenter.on_photo_selected(jpeg(2 * 1024 * 1024));
        assert!(fx.presenter.draft().photo.is_none());
        assert_eq!(
            fx.notifier.messages(NoticeKind::Error),
            vec!["Ukuran foto maksimal 1MB".to_string()]
        );
    }

    #[tokio::test]
    async fn location_from_device_map_and_clear() {
        let fx = fixture(FakeLocation::at(jakarta())).await;

        fx.presenter.on_use_current_location().await;
        assert_eq!(fx.presenter.draft().location, Some(jakarta()));
        assert_eq!(fx.view.location.get(), Some(jakarta()));

        fx.presenter.on_select_on_map();
        assert!(fx.view.picking.get());
        let bandung = Coordinates::new(-6.9175, 107.6191);
        fx.presenter.on_map_pick(bandung);
        assert_eq!(fx.presenter.draft().location, Some(bandung));
        assert!(!fx.view.picking.get());

        fx.presenter.on_clear_location();
        assert_eq!(fx.presenter.draft().location, None);
        assert_eq!(fx.notifier.last().unwrap().1, LOCATION_CLEARED_MESSAGE);
    }

    #[tokio::test]
    async fn location_failure_notifies() {
        let fx = fixture(FakeLocation::failing(GeolocationError::Timeout)).await;
        fx.presenter.on_use_current_location().await;
        assert_eq!(fx.presenter.draft().location, None);
        assert_eq!(
            fx.notifier.messages(NoticeKind::Error),
            vec!["Waktu tunggu lokasi habis".to_string()]
        );
    }

    #[tokio::test]
    async fn submit_requires_description_then_photo() {
        let fx = fixture(FakeLocation::at(jakarta())).await;

        fx.presenter.on_description("pendek");
        fx.presenter.on_submit().await;
        assert_eq!(
            *fx.view.errors.borrow(),
            vec!["Deskripsi story harus minimal 10 karakter".to_string()]
        );
        assert_eq!(fx.notifier.last().unwrap().1, INCOMPLETE_FORM_MESSAGE);

        fx.presenter.on_description("Sore yang tenang di Kota Tua");
        fx.presenter.on_submit().await;
        assert_eq!(fx.notifier.last().unwrap().1, PHOTO_REQUIRED_MESSAGE);
        assert!(fx.server.received().is_empty());
    }

    #[tokio::test]
    async fn guest_submission_uses_guest_endpoint() {
        let fx = fixture(FakeLocation::at(jakarta())).await;
        mock_created(&fx.server, "/v1/stories/guest");
        fill(&fx);

        fx.presenter.on_submit().await;

        assert_eq!(fx.server.hits(POST, "/v1/stories/guest"), 1);
        assert!(fx.server.received()[0].authorization.is_none());
        assert_eq!(*fx.view.submitting.borrow(), vec![true, false]);
        assert_eq!(fx.notifier.last().unwrap().1, success_message(true));
        assert_eq!(*fx.navigate.routes.borrow(), vec![RouteName::Home]);
        assert_eq!(fx.presenter.draft(), NewStory::default());
        assert_eq!(fx.view.resets.get(), 1);
        assert!(!fx.view.unsaved.get());
    }

    #[tokio::test]
    async fn member_submission_sends_bearer() {
        let fx = fixture(FakeLocation::at(jakarta())).await;
        sign_in(&fx).await;
        mock_created(&fx.server, "/v1/stories");
        fill(&fx);
        fx.presenter.on_map_pick(jakarta());

        fx.presenter.on_submit().await;

        assert_eq!(fx.server.hits(POST, "/v1/stories"), 1);
        let upload = fx
            .server
            .received()
            .into_iter()
            .find(|r| r.path == "/v1/stories")
            .unwrap();
        assert!(upload.authorization.unwrap().starts_with("Bearer "));
        assert_eq!(fx.notifier.last().unwrap().1, success_message(false));
    }

    #[tokio::test]
    async fn upload_rejections_map_to_messages() {
        let fx = fixture(FakeLocation::at(jakarta())).await;
        fx.server.mock(|when, then| {
            when.method(POST).path("/v1/stories/guest");
            then.status(413)
                .json_body(json!({ "error": true, "message": "Payload image too large" }));
        });
        fill(&fx);

        fx.presenter.on_submit().await;

        assert_eq!(fx.notifier.last().unwrap().1, UPLOAD_FAILED_MESSAGE);
        assert!(fx.navigate.routes.borrow().is_empty());
        assert!(fx.presenter.draft().photo.is_some());
    }

    #[tokio::test]
    async fn unreachable_server_keeps_draft() {
        let fx = fixture(FakeLocation::at(jakarta())).await;
        fill(&fx);
        fx.presenter.on_submit().await;
        assert_eq!(fx.notifier.last().unwrap().1, UNREACHABLE_MESSAGE);
        assert!(fx.view.unsaved.get());
    }

    #[tokio::test]
    async fn cancel_confirms_only_with_unsaved_changes() {
        let fx = fixture(FakeLocation::at(jakarta())).await;
        fx.presenter.on_cancel();
        assert_eq!(fx.view.confirms.get(), 0);
        assert_eq!(*fx.navigate.routes.borrow(), vec![RouteName::Home]);

        let fx = fixture(FakeLocation::at(jakarta())).await;
        fx.presenter.on_description("Sore yang tenang di Kota Tua");
        fx.presenter.on_cancel();
        assert_eq!(fx.view.confirms.get(), 1);
        assert!(fx.navigate.routes.borrow().is_empty());

        fx.view.confirm.set(true);
        fx.presenter.on_cancel();
        assert_eq!(*fx.navigate.routes.borrow(), vec![RouteName::Home]);
        assert_eq!(fx.presenter.draft(), NewStory::default());
    }

    #[tokio::test]
    async fn cleanup_releases_devices_and_ignores_late_events() {
        let fx = fixture(FakeLocation::at(jakarta())).await;
        fx.presenter.on_start_camera().await;
        fx.presenter.on_description("Sore yang tenang di Kota Tua");

        fx.presenter.cleanup().unwrap();

        assert!(!fx.camera.is_active());
        assert_eq!(fx.view.released.get(), 1);
        assert!(!fx.view.unsaved.get());

        fx.presenter.on_use_current_location().await;
        fx.presenter.on_submit().await;
        assert_eq!(fx.view.location.get(), None);
        assert!(fx.server.received().is_empty());
    }
}
