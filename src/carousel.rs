//! Testimonial rotation.
//!
//! [`Carousel`] is the index arithmetic. [`CarouselDriver`] adds the
//! auto-play timer: a tokio task that exists only while auto-play is on and
//! is aborted when auto-play stops or the driver is dropped.

use std::{
    sync::{Arc, Mutex, MutexGuard, PoisonError},
    time::Duration,
};

use serde::Serialize;
use tokio::{
    sync::watch,
    task::JoinHandle,
    time::{self, MissedTickBehavior},
};

pub const DEFAULT_INTERVAL: Duration = Duration::from_millis(5000);

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CarouselError {
    #[error("slide {index} is out of range for {len} slides")]
    OutOfRange { index: usize, len: usize },
    #[error("carousel needs at least one slide")]
    Empty,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Carousel {
    index: usize,
    len: usize,
    auto_play: bool,
}

impl Carousel {
    pub fn new(len: usize) -> Result<Self, CarouselError> {
        if len == 0 {
            return Err(CarouselError::Empty);
        }
        Ok(Self {
            index: 0,
            len,
            auto_play: true,
        })
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn auto_play(&self) -> bool {
        self.auto_play
    }

    /// Timer step. Returns false, leaving the index alone, once auto-play is off.
    pub fn tick(&mut self) -> bool {
        if !self.auto_play {
            return false;
        }
        self.forward();
        true
    }

    pub fn next(&mut self) {
        self.forward();
        self.auto_play = false;
    }

    pub fn prev(&mut self) {
        self.index = (self.index + self.len - 1) % self.len;
        self.auto_play = false;
    }

    pub fn go_to(&mut self, index: usize) -> Result<(), CarouselError> {
        if index >= self.len {
            return Err(CarouselError::OutOfRange {
                index,
                len: self.len,
            });
        }
        self.index = index;
        self.auto_play = false;
        Ok(())
    }

    pub fn set_auto_play(&mut self, auto_play: bool) {
        self.auto_play = auto_play;
    }

    pub fn peek_next(&self) -> usize {
        (self.index + 1) % self.len
    }

    pub fn peek_prev(&self) -> usize {
        (self.index + self.len - 1) % self.len
    }

    fn forward(&mut self) {
        self.index = (self.index + 1) % self.len;
    }
}

struct Shared {
    carousel: Mutex<Carousel>,
    updates: watch::Sender<Carousel>,
}

impl Shared {
    /// Applies `change` and publishes the result while still holding the
    /// lock, so subscribers see updates in the order they happened.
    fn update(&self, change: impl FnOnce(&mut Carousel)) -> Carousel {
        let mut carousel = self.lock();
        change(&mut *carousel);
        let snapshot = *carousel;
        self.updates.send_replace(snapshot);
        snapshot
    }

    /// Like [`Shared::update`], but a rejected change publishes nothing.
    fn try_update(
        &self,
        change: impl FnOnce(&mut Carousel) -> Result<(), CarouselError>,
    ) -> Result<Carousel, CarouselError> {
        let mut carousel = self.lock();
        change(&mut *carousel)?;
        let snapshot = *carousel;
        self.updates.send_replace(snapshot);
        Ok(snapshot)
    }

    fn tick(&self) -> bool {
        let mut carousel = self.lock();
        if !carousel.tick() {
            return false;
        }
        self.updates.send_replace(*carousel);
        true
    }

    fn lock(&self) -> MutexGuard<'_, Carousel> {
        self.carousel.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// A mounted carousel. Must be created inside a tokio runtime.
pub struct CarouselDriver {
    shared: Arc<Shared>,
    interval: Duration,
    timer: Mutex<Option<JoinHandle<()>>>,
}

impl CarouselDriver {
    pub fn start(carousel: Carousel, interval: Duration) -> Self {
        let (updates, _) = watch::channel(carousel);
        let driver = Self {
            shared: Arc::new(Shared {
                carousel: Mutex::new(carousel),
                updates,
            }),
            interval,
            timer: Mutex::new(None),
        };
        driver.sync_timer(carousel.auto_play());
        driver
    }

    pub fn subscribe(&self) -> watch::Receiver<Carousel> {
        self.shared.updates.subscribe()
    }

    pub fn current(&self) -> Carousel {
        *self.shared.lock()
    }

    pub fn next(&self) -> Carousel {
        let snapshot = self.shared.update(Carousel::next);
        self.sync_timer(snapshot.auto_play());
        snapshot
    }

    pub fn prev(&self) -> Carousel {
        let snapshot = self.shared.update(Carousel::prev);
        self.sync_timer(snapshot.auto_play());
        snapshot
    }

    pub fn go_to(&self, index: usize) -> Result<Carousel, CarouselError> {
        let snapshot = self.shared.try_update(|carousel| carousel.go_to(index))?;
        self.sync_timer(snapshot.auto_play());
        Ok(snapshot)
    }

    pub fn set_auto_play(&self, auto_play: bool) -> Carousel {
        let snapshot = self
            .shared
            .update(|carousel| carousel.set_auto_play(auto_play));
        self.sync_timer(snapshot.auto_play());
        snapshot
    }

    pub fn is_timer_running(&self) -> bool {
        self.lock_timer()
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    /// Stops the timer when auto-play is off. When it is on and no timer is
    /// live, starts one with a full interval before the first tick.
    fn sync_timer(&self, auto_play: bool) {
        let mut timer = self.lock_timer();
        if !auto_play {
            if let Some(handle) = timer.take() {
                handle.abort();
            }
            return;
        }
        if timer.as_ref().is_some_and(|handle| !handle.is_finished()) {
            return;
        }

        let shared = Arc::clone(&self.shared);
        let period = self.interval;
        *timer = Some(tokio::spawn(async move {
            let mut ticker = time::interval_at(time::Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                if !shared.tick() {
                    break;
                }
            }
        }));
    }

    fn lock_timer(&self) -> MutexGuard<'_, Option<JoinHandle<()>>> {
        self.timer.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Drop for CarouselDriver {
    fn drop(&mut self) {
        if let Some(handle) = self.lock_timer().take() {
            handle.abort();
        }
    }
}
