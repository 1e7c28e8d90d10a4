//! Browser hardware and map collaborators. Each device sits behind a trait so
//! presenters can be exercised with fakes on the host.

use async_trait::async_trait;

use crate::api::PhotoFile;
use crate::utils::geo::Coordinates;

pub mod camera;
pub mod geolocation;
pub mod leaflet;
pub mod photo;

pub use camera::{BrowserCamera, CameraError, FacingMode};
pub use geolocation::{BrowserGeolocation, GeolocationError};

#[async_trait(?Send)]
pub trait CameraDevice {
    async fn start(&self, facing: FacingMode) -> Result<(), CameraError>;
    async fn capture(&self) -> Result<PhotoFile, CameraError>;
    fn stop(&self);
    fn is_active(&self) -> bool;
    fn facing(&self) -> FacingMode;
}

#[async_trait(?Send)]
pub trait LocationProvider {
    async fn current_position(&self) -> Result<Coordinates, GeolocationError>;
}

#[cfg(test)]
pub mod fakes {
    use super::*;
    use std::cell::{Cell, RefCell};

    #[derive(Default)]
    pub struct FakeCamera {
        pub start_error: RefCell<Option<CameraError>>,
        pub capture_result: RefCell<Option<PhotoFile>>,
        pub active: Cell<bool>,
        pub stops: Cell<usize>,
        pub starts: RefCell<Vec<FacingMode>>,
    }

    #[async_trait(?Send)]
    impl CameraDevice for FakeCamera {
        async fn start(&self, facing: FacingMode) -> Result<(), CameraError> {
            self.starts.borrow_mut().push(facing);
            if let Some(err) = self.start_error.borrow().clone() {
                return Err(err);
            }
            self.active.set(true);
            Ok(())
        }

        async fn capture(&self) -> Result<PhotoFile, CameraError> {
            if !self.active.get() {
                return Err(CameraError::NotActive);
            }
            self.capture_result
                .borrow()
                .clone()
                .ok_or_else(|| CameraError::Capture("no frame".into()))
        }

        fn stop(&self) {
            self.stops.set(self.stops.get() + 1);
            self.active.set(false);
        }

        fn is_active(&self) -> bool {
            self.active.get()
        }

        fn facing(&self) -> FacingMode {
            self.starts
                .borrow()
                .last()
                .copied()
                .unwrap_or(FacingMode::Environment)
        }
    }

    pub struct FakeLocation {
        pub result: RefCell<Result<Coordinates, GeolocationError>>,
    }

    impl FakeLocation {
        pub fn at(coords: Coordinates) -> Self {
            Self {
                result: RefCell::new(Ok(coords)),
            }
        }

        pub fn failing(err: GeolocationError) -> Self {
            Self {
                result: RefCell::new(Err(err)),
            }
        }
    }

    #[async_trait(?Send)]
    impl LocationProvider for FakeLocation {
        async fn current_position(&self) -> Result<Coordinates, GeolocationError> {
            self.result.borrow().clone()
        }
    }
}
