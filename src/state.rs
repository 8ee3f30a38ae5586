use std::{
    collections::HashMap,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
    time::Duration,
};

use uuid::Uuid;

use crate::{
    booking::BookingController,
    carousel::{Carousel, CarouselDriver},
    config::AppConfig,
    store::BookingStore,
};

#[derive(Clone)]
pub struct AppState {
    pub store: Option<Arc<dyn BookingStore>>,
    pub fallback_delay: Duration,
    pub carousel_interval: Duration,
    pub viewers: Arc<ViewerRegistry>,
}

impl AppState {
    pub fn new(store: Option<Arc<dyn BookingStore>>, config: &AppConfig) -> Self {
        Self {
            store,
            fallback_delay: config.fallback_delay,
            carousel_interval: config.carousel_interval,
            viewers: Arc::new(ViewerRegistry::default()),
        }
    }

    pub fn booking_controller(&self) -> BookingController {
        BookingController::new(self.store.clone()).with_fallback_delay(self.fallback_delay)
    }
}

/// Carousels mounted by open story streams, keyed by viewer id.
#[derive(Default)]
pub struct ViewerRegistry {
    drivers: Mutex<HashMap<Uuid, Arc<CarouselDriver>>>,
}

impl ViewerRegistry {
    /// Mounts `carousel` for a new viewer. The viewer stays registered until
    /// the returned lease is dropped.
    pub fn mount(self: &Arc<Self>, carousel: Carousel, interval: Duration) -> ViewerLease {
        let driver = Arc::new(CarouselDriver::start(carousel, interval));
        let viewer = Uuid::new_v4();
        self.lock().insert(viewer, Arc::clone(&driver));
        log::debug!("Mounted carousel for viewer {viewer}");
        ViewerLease {
            viewer,
            driver,
            registry: Arc::clone(self),
        }
    }

    pub fn get(&self, viewer: &Uuid) -> Option<Arc<CarouselDriver>> {
        self.lock().get(viewer).cloned()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<Uuid, Arc<CarouselDriver>>> {
        self.drivers.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

pub struct ViewerLease {
    viewer: Uuid,
    driver: Arc<CarouselDriver>,
    registry: Arc<ViewerRegistry>,
}

impl ViewerLease {
    pub fn viewer(&self) -> Uuid {
        self.viewer
    }

    pub fn driver(&self) -> &CarouselDriver {
        &self.driver
    }
}

impl Drop for ViewerLease {
    fn drop(&mut self) {
        self.registry.lock().remove(&self.viewer);
        log::debug!("Unmounted carousel for viewer {}", self.viewer);
    }
}
