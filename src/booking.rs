//! Booking form state and submission.
//!
//! A [`BookingController`] owns one visitor's form. Field updates are plain
//! state writes; `submit` forwards the form to the configured store, or
//! simulates acceptance after a short delay when no store is configured.

use std::{
    sync::{Arc, Mutex, MutexGuard, PoisonError},
    time::Duration,
};

use serde::{Deserialize, Serialize};
use tokio::time;

use crate::{
    models::{NewBooking, STATUS_PENDING},
    store::BookingStore,
};

pub const DEFAULT_FALLBACK_DELAY: Duration = Duration::from_millis(1500);

pub const MESSAGE_SIMULATED: &str = "Form submitted successfully! We'll contact you soon.";
pub const MESSAGE_STORED: &str = "Booking submitted successfully! We'll contact you soon.";
pub const MESSAGE_FAILED: &str = "Error submitting booking. Please try again.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookingField {
    FullName,
    Email,
    Phone,
    DeviceType,
    IssueDescription,
}

impl BookingField {
    pub const ALL: [BookingField; 5] = [
        BookingField::FullName,
        BookingField::Email,
        BookingField::Phone,
        BookingField::DeviceType,
        BookingField::IssueDescription,
    ];
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BookingForm {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub device_type: String,
    pub issue_description: String,
}

impl BookingForm {
    pub fn get(&self, field: BookingField) -> &str {
        match field {
            BookingField::FullName => &self.full_name,
            BookingField::Email => &self.email,
            BookingField::Phone => &self.phone,
            BookingField::DeviceType => &self.device_type,
            BookingField::IssueDescription => &self.issue_description,
        }
    }

    pub fn set(&mut self, field: BookingField, value: String) {
        let slot = match field {
            BookingField::FullName => &mut self.full_name,
            BookingField::Email => &mut self.email,
            BookingField::Phone => &mut self.phone,
            BookingField::DeviceType => &mut self.device_type,
            BookingField::IssueDescription => &mut self.issue_description,
        };
        *slot = value;
    }

    pub fn completed_fields(&self) -> usize {
        BookingField::ALL
            .into_iter()
            .filter(|field| !self.get(*field).trim().is_empty())
            .count()
    }

    /// Fraction of the five fields that are non-blank, in `[0, 1]`.
    pub fn completion_ratio(&self) -> f64 {
        self.completed_fields() as f64 / BookingField::ALL.len() as f64
    }

    /// Fields with no value at all. Whitespace satisfies `required`, even
    /// though it does not count towards progress.
    pub fn missing_fields(&self) -> Vec<BookingField> {
        BookingField::ALL
            .into_iter()
            .filter(|field| self.get(*field).is_empty())
            .collect()
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Values are forwarded exactly as typed.
    pub fn to_new_booking(&self) -> NewBooking {
        NewBooking {
            full_name: self.full_name.clone(),
            email: self.email.clone(),
            phone: self.phone.clone(),
            device_type: self.device_type.clone(),
            issue_description: self.issue_description.clone(),
            status: STATUS_PENDING,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitMessage {
    Simulated,
    Stored,
    Failed,
}

impl SubmitMessage {
    pub fn text(self) -> &'static str {
        match self {
            SubmitMessage::Simulated => MESSAGE_SIMULATED,
            SubmitMessage::Stored => MESSAGE_STORED,
            SubmitMessage::Failed => MESSAGE_FAILED,
        }
    }

    pub fn is_success(self) -> bool {
        !matches!(self, SubmitMessage::Failed)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// A submission was already in flight; nothing happened.
    AlreadySubmitting,
    Finished(SubmitMessage),
}

#[derive(Debug, Clone, PartialEq)]
pub struct BookingSnapshot {
    pub form: BookingForm,
    pub submitting: bool,
    pub message: Option<SubmitMessage>,
    pub completion_ratio: f64,
}

#[derive(Debug, Default)]
struct FormState {
    form: BookingForm,
    submitting: bool,
    message: Option<SubmitMessage>,
    completion_ratio: f64,
}

impl FormState {
    fn recompute(&mut self) {
        self.completion_ratio = self.form.completion_ratio();
    }
}

pub struct BookingController {
    store: Option<Arc<dyn BookingStore>>,
    fallback_delay: Duration,
    state: Mutex<FormState>,
}

impl BookingController {
    pub fn new(store: Option<Arc<dyn BookingStore>>) -> Self {
        Self {
            store,
            fallback_delay: DEFAULT_FALLBACK_DELAY,
            state: Mutex::new(FormState::default()),
        }
    }

    pub fn with_fallback_delay(mut self, delay: Duration) -> Self {
        self.fallback_delay = delay;
        self
    }

    pub fn with_form(self, form: BookingForm) -> Self {
        {
            let mut state = self.lock();
            state.form = form;
            state.recompute();
        }
        self
    }

    pub fn update_field(&self, field: BookingField, value: impl Into<String>) {
        let mut state = self.lock();
        state.form.set(field, value.into());
        state.recompute();
    }

    pub fn completion_ratio(&self) -> f64 {
        self.lock().completion_ratio
    }

    pub fn is_submitting(&self) -> bool {
        self.lock().submitting
    }

    pub fn message(&self) -> Option<SubmitMessage> {
        self.lock().message
    }

    pub fn snapshot(&self) -> BookingSnapshot {
        let state = self.lock();
        BookingSnapshot {
            form: state.form.clone(),
            submitting: state.submitting,
            message: state.message,
            completion_ratio: state.completion_ratio,
        }
    }

    /// Submits the current form once. A call made while another submission
    /// is in flight returns [`SubmitOutcome::AlreadySubmitting`] untouched.
    pub async fn submit(&self) -> SubmitOutcome {
        let Some(attempt) = self.begin() else {
            log::debug!("Ignoring booking submit while another is in flight");
            return SubmitOutcome::AlreadySubmitting;
        };

        let message = match &self.store {
            None => {
                time::sleep(self.fallback_delay).await;
                log::info!("Booking store not configured; simulated acceptance");
                SubmitMessage::Simulated
            }
            Some(store) => match store.insert_booking(&attempt.payload).await {
                Ok(()) => {
                    log::info!("Booking stored for device {}", attempt.payload.device_type);
                    SubmitMessage::Stored
                }
                Err(err) => {
                    log::warn!("Booking insert failed: {err}");
                    SubmitMessage::Failed
                }
            },
        };

        attempt.finish(message);
        SubmitOutcome::Finished(message)
    }

    fn begin(&self) -> Option<SubmitAttempt<'_>> {
        let mut state = self.lock();
        if state.submitting {
            return None;
        }
        state.submitting = true;
        state.message = None;
        Some(SubmitAttempt {
            state: &self.state,
            payload: state.form.to_new_booking(),
            armed: true,
        })
    }

    fn lock(&self) -> MutexGuard<'_, FormState> {
        lock_state(&self.state)
    }
}

fn lock_state(state: &Mutex<FormState>) -> MutexGuard<'_, FormState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Clears `submitting` when dropped, so an abandoned or panicking submit
/// cannot leave the form locked. A panic also records the failure message;
/// a cancelled submit leaves no message.
struct SubmitAttempt<'a> {
    state: &'a Mutex<FormState>,
    payload: NewBooking,
    armed: bool,
}

impl SubmitAttempt<'_> {
    fn finish(mut self, message: SubmitMessage) {
        let mut state = lock_state(self.state);
        state.message = Some(message);
        if message.is_success() {
            state.form.clear();
            state.recompute();
        }
        state.submitting = false;
        self.armed = false;
    }
}

impl Drop for SubmitAttempt<'_> {
    fn drop(&mut self) {
        if self.armed {
            let mut state = lock_state(self.state);
            if std::thread::panicking() {
                state.message = Some(SubmitMessage::Failed);
            }
            state.submitting = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use rstest::rstest;

    use super::*;
    use crate::store::StoreError;

    #[derive(Default)]
    struct FakeStore {
        reject: bool,
        panic: bool,
        latency: Duration,
        calls: Mutex<Vec<NewBooking>>,
    }

    impl FakeStore {
        fn calls(&self) -> Vec<NewBooking> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl BookingStore for FakeStore {
        async fn insert_booking(&self, booking: &NewBooking) -> Result<(), StoreError> {
            self.calls.lock().unwrap().push(booking.clone());
            time::sleep(self.latency).await;
            if self.panic {
                panic!("store client blew up");
            }
            if self.reject {
                return Err(StoreError::Rejected {
                    status: 400,
                    message: "duplicate".to_string(),
                });
            }
            Ok(())
        }
    }

    fn filled_form() -> BookingForm {
        BookingForm {
            full_name: "  Grace Hopper ".to_string(),
            email: "grace@example.com".to_string(),
            phone: "0400 111 222".to_string(),
            device_type: "android".to_string(),
            issue_description: "Won't charge".to_string(),
        }
    }

    fn controller_with(store: &Arc<FakeStore>) -> BookingController {
        let store: Arc<dyn BookingStore> = store.clone();
        BookingController::new(Some(store)).with_form(filled_form())
    }

    #[test]
    fn empty_form_has_zero_progress() {
        let controller = BookingController::new(None);
        assert_eq!(controller.completion_ratio(), 0.0);
        assert_eq!(controller.snapshot().form, BookingForm::default());
    }

    #[test]
    fn two_filled_fields_give_forty_percent() {
        let controller = BookingController::new(None);
        controller.update_field(BookingField::FullName, "Ada");
        controller.update_field(BookingField::Email, "ada@example.com");
        assert!((controller.completion_ratio() - 0.4).abs() < f64::EPSILON);
    }

    #[rstest]
    #[case(&[], 0)]
    #[case(&[(BookingField::Phone, "   ")], 0)]
    #[case(&[(BookingField::Phone, " 1 ")], 1)]
    #[case(&[(BookingField::Phone, "1"), (BookingField::Phone, "")], 0)]
    #[case(
        &[
            (BookingField::FullName, "a"),
            (BookingField::Email, "b"),
            (BookingField::Phone, "c"),
            (BookingField::DeviceType, "other"),
            (BookingField::IssueDescription, "\t"),
        ],
        4
    )]
    fn progress_tracks_every_update(
        #[case] updates: &[(BookingField, &str)],
        #[case] completed: usize,
    ) {
        let controller = BookingController::new(None);
        for (field, value) in updates {
            controller.update_field(*field, *value);
            let snapshot = controller.snapshot();
            assert_eq!(snapshot.completion_ratio, snapshot.form.completion_ratio());
        }
        let expected = completed as f64 / 5.0;
        assert!((controller.completion_ratio() - expected).abs() < f64::EPSILON);
    }

    #[test]
    fn updates_are_stored_verbatim() {
        let controller = BookingController::new(None);
        controller.update_field(BookingField::FullName, "  padded  ");
        assert_eq!(controller.snapshot().form.full_name, "  padded  ");
    }

    #[tokio::test(start_paused = true)]
    async fn unconfigured_submit_simulates_success_after_delay() {
        let controller = BookingController::new(None).with_form(filled_form());
        let started = time::Instant::now();

        let outcome = controller.submit().await;

        assert!(started.elapsed() >= Duration::from_millis(1500));
        assert_eq!(outcome, SubmitOutcome::Finished(SubmitMessage::Simulated));
        let snapshot = controller.snapshot();
        assert_eq!(snapshot.form, BookingForm::default());
        assert_eq!(snapshot.message.map(SubmitMessage::text), Some(MESSAGE_SIMULATED));
        assert_eq!(snapshot.completion_ratio, 0.0);
        assert!(!snapshot.submitting);
    }

    #[tokio::test(start_paused = true)]
    async fn second_submit_while_in_flight_is_ignored() {
        let store = Arc::new(FakeStore {
            latency: Duration::from_millis(200),
            ..FakeStore::default()
        });
        let controller = controller_with(&store);

        let (first, second) = tokio::join!(controller.submit(), controller.submit());

        assert_eq!(first, SubmitOutcome::Finished(SubmitMessage::Stored));
        assert_eq!(second, SubmitOutcome::AlreadySubmitting);
        assert_eq!(store.calls().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn unconfigured_second_submit_is_ignored_too() {
        let controller = BookingController::new(None).with_form(filled_form());

        let (first, second) = tokio::join!(controller.submit(), controller.submit());

        assert_eq!(first, SubmitOutcome::Finished(SubmitMessage::Simulated));
        assert_eq!(second, SubmitOutcome::AlreadySubmitting);
    }

    #[tokio::test(start_paused = true)]
    async fn in_flight_submit_clears_previous_message() {
        let store = Arc::new(FakeStore {
            reject: true,
            latency: Duration::from_millis(500),
            ..FakeStore::default()
        });
        let controller = Arc::new(controller_with(&store));
        controller.submit().await;
        assert_eq!(controller.message(), Some(SubmitMessage::Failed));

        let task = tokio::spawn({
            let controller = controller.clone();
            async move { controller.submit().await }
        });
        time::sleep(Duration::from_millis(10)).await;

        let snapshot = controller.snapshot();
        assert!(snapshot.submitting);
        assert_eq!(snapshot.message, None);

        task.await.unwrap();
        assert!(!controller.is_submitting());
    }

    #[tokio::test]
    async fn store_error_keeps_fields_for_retry() {
        let store = Arc::new(FakeStore {
            reject: true,
            ..FakeStore::default()
        });
        let controller = controller_with(&store);

        let outcome = controller.submit().await;

        assert_eq!(outcome, SubmitOutcome::Finished(SubmitMessage::Failed));
        let snapshot = controller.snapshot();
        assert_eq!(snapshot.form, filled_form());
        assert_eq!(snapshot.message.map(SubmitMessage::text), Some(MESSAGE_FAILED));
        assert!((snapshot.completion_ratio - 1.0).abs() < f64::EPSILON);
        assert!(!snapshot.submitting);
    }

    #[tokio::test]
    async fn store_success_clears_fields_and_inserts_once() {
        let store = Arc::new(FakeStore::default());
        let controller = controller_with(&store);

        let outcome = controller.submit().await;

        assert_eq!(outcome, SubmitOutcome::Finished(SubmitMessage::Stored));
        let snapshot = controller.snapshot();
        assert_eq!(snapshot.form, BookingForm::default());
        assert_eq!(snapshot.message.map(SubmitMessage::text), Some(MESSAGE_STORED));
        assert_eq!(
            store.calls(),
            vec![NewBooking {
                full_name: "  Grace Hopper ".to_string(),
                email: "grace@example.com".to_string(),
                phone: "0400 111 222".to_string(),
                device_type: "android".to_string(),
                issue_description: "Won't charge".to_string(),
                status: "pending",
            }]
        );
    }

    #[tokio::test]
    async fn panicking_store_still_releases_submitting_flag() {
        let store = Arc::new(FakeStore {
            panic: true,
            ..FakeStore::default()
        });
        let controller = Arc::new(controller_with(&store));

        let result = tokio::spawn({
            let controller = controller.clone();
            async move { controller.submit().await }
        })
        .await;

        assert!(result.is_err());
        assert!(!controller.is_submitting());
        assert_eq!(controller.message(), Some(SubmitMessage::Failed));
        assert_eq!(controller.snapshot().form, filled_form());
    }

    #[tokio::test(start_paused = true)]
    async fn cancelled_submit_releases_flag_without_a_message() {
        let controller = BookingController::new(None).with_form(filled_form());

        let cancelled = time::timeout(DEFAULT_FALLBACK_DELAY / 2, controller.submit()).await;

        assert!(cancelled.is_err());
        assert!(!controller.is_submitting());
        assert_eq!(controller.message(), None);
        assert_eq!(controller.snapshot().form, filled_form());
    }
}
