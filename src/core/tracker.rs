//! # Timer state machine
//!
//! Per member there are two states: **Idle** (no current-timer record) and
//! **Running** (a current-timer record pointing at one open track). The
//! timer lists are the source of truth; the current-timer record is a derived
//! index and is always reconciled against them before it is trusted:
//!
//! | Pointer | Target track | [`PointerState`] |
//! |---------|--------------|------------------|
//! | absent | - | `Idle` |
//! | present | open, found | `Running` |
//! | present | missing or already closed | `Dangling` |
//!
//! Starting a timer always stops the member's running one first, so a member
//! never has two open tracks. Writes of a timer list and of the current-timer
//! record are dispatched together; there is no lock and no version check, the
//! last write wins.

use crate::core::clock::{Clock, SystemClock, new_id};
use crate::core::localize::{Data, Dictionary, Localizer, NO_DATA};
use crate::core::prompt::{ALERT_DURATION_SECS, Alert, ConfirmRequest, Prompt};
use crate::errors::{AppError, AppResult};
use crate::models::{CurrentUserTimer, TimeTrack, Timer, TimerList, Timestamp};
use crate::storage::{Scope, Storage, StorageBackend, Visibility};

pub const TIMER_LIST_VISIBILITY: Visibility = Visibility::Shared;
pub const CURRENT_USER_TIMER_VISIBILITY: Visibility = Visibility::Shared;
pub const CURRENT_USER_TIMER_KEY: &str = "current-timer";

const START_LIST_NOT_FOUND: &str = "Could not start timer. TimerList not found.";
const START_TIMER_NOT_FOUND: &str = "Could not start timer. Timer not found.";
const DELETE_LIST_NOT_FOUND: &str = "Could not delete timer. TimerList not found.";
const DELETE_TIMER_NOT_FOUND: &str = "Could not delete timer. Timer not found.";
const STOP_LIST_NOT_FOUND: &str = "Could not stop timer. TimerList not found.";

const MSG_STOP_FAILED: &str =
    "Error: We could not stop your last timer. Maybe the timer or card has been deleted?";
const MSG_TOO_LARGE: &str =
    "Error: The timers of this card are too large to be saved ({len} of {limit} characters).";

/// The current timer of a member, resolved against its timer list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunningTimer {
    pub pointer: CurrentUserTimer,
    pub timer: Timer,
    pub track: TimeTrack,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PointerState {
    Idle,
    /// The record exists but its track cannot be found (or is closed).
    Dangling(CurrentUserTimer),
    Running(RunningTimer),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StopOutcome {
    /// Nothing was running.
    Idle,
    /// A stale current-timer record was dropped.
    Repaired(CurrentUserTimer),
    Stopped(TimeTrack),
}

#[derive(Debug, Clone, Copy)]
enum OnMissing {
    Create,
    Fail(&'static str),
}

fn list_scope(card: Option<&str>) -> Scope {
    card.map(Scope::id).unwrap_or(Scope::Card)
}

pub struct TimeTracker<B: StorageBackend> {
    storage: Storage<B>,
    clock: Box<dyn Clock>,
    localizer: Box<dyn Localizer>,
    prompt: Option<Box<dyn Prompt>>,
}

impl<B: StorageBackend> TimeTracker<B> {
    pub fn new(storage: Storage<B>) -> Self {
        Self {
            storage,
            clock: Box::new(SystemClock),
            localizer: Box::new(Dictionary::default()),
            prompt: None,
        }
    }

    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    pub fn with_localizer(mut self, localizer: impl Localizer + 'static) -> Self {
        self.localizer = Box::new(localizer);
        self
    }

    /// Without a prompt, deletions run unconfirmed and alerts only go to the log.
    pub fn with_prompt(mut self, prompt: impl Prompt + 'static) -> Self {
        self.prompt = Some(Box::new(prompt));
        self
    }

    pub fn storage(&self) -> &Storage<B> {
        &self.storage
    }

    pub fn member(&self) -> &str {
        &self.storage.context().member
    }

    pub fn now(&self) -> Timestamp {
        self.clock.now()
    }

    /// `<seed or now>-<member>`
    pub fn new_id(&self, seed: Option<Timestamp>) -> String {
        new_id(seed.unwrap_or_else(|| self.now()), self.member())
    }

    /// First id from `seed` upwards that `taken` does not reject.
    fn unique_id(&self, mut seed: Timestamp, taken: impl Fn(&str) -> bool) -> String {
        loop {
            let id = self.new_id(Some(seed));
            if !taken(&id) {
                return id;
            }
            seed += 1;
        }
    }

    pub fn localize(&self, key: &str, data: Data<'_>) -> String {
        self.localizer.localize_key(key, data)
    }

    fn alert(&self, message: String) {
        match &self.prompt {
            Some(prompt) => prompt.alert(&Alert {
                message,
                duration_secs: ALERT_DURATION_SECS,
            }),
            None => log::warn!("{message}"),
        }
    }

    /// Tell the user about values the backend refused to store.
    fn report<T>(&self, result: AppResult<T>) -> AppResult<T> {
        if let Err(AppError::CapacityExceeded { len, limit, .. }) = &result {
            let (len, limit) = (len.to_string(), limit.to_string());
            let data = [("len", len.as_str()), ("limit", limit.as_str())];
            self.alert(self.localize(MSG_TOO_LARGE, &data));
        }
        result
    }

    // ------------------------------------------------
    // Timer lists
    // ------------------------------------------------

    /// All timer lists of the current card.
    pub async fn timer_lists(&self) -> AppResult<Vec<TimerList>> {
        let is_list_key: &dyn Fn(&str) -> bool = &TimerList::is_storage_key;
        let data = self
            .storage
            .get_all(Some(&Scope::Card), Some(TIMER_LIST_VISIBILITY), Some(is_list_key))
            .await?;

        let mut lists = Vec::new();
        for value in data
            .values()
            .flat_map(|by_visibility| by_visibility.values())
            .flat_map(|keys| keys.values())
        {
            match serde_json::from_value::<TimerList>(value.clone()) {
                Ok(list) => lists.push(list),
                Err(e) => log::warn!("Skipping malformed timer list: {e}"),
            }
        }
        Ok(lists)
    }

    /// Create an empty list on the current card.
    pub async fn add_timer_list(&self) -> AppResult<TimerList> {
        let list = TimerList::new(&self.new_id(None));
        self.report(self.set_timer_list(&list, None).await)?;
        Ok(list)
    }

    /// `card` defaults to the card of the current context.
    pub async fn timer_list(&self, id: &str, card: Option<&str>) -> AppResult<Option<TimerList>> {
        self.storage
            .get(&list_scope(card), TIMER_LIST_VISIBILITY, &TimerList::storage_key(id))
            .await
    }

    pub async fn set_timer_list(&self, list: &TimerList, card: Option<&str>) -> AppResult<()> {
        self.storage
            .set(
                &list_scope(card),
                TIMER_LIST_VISIBILITY,
                &TimerList::storage_key(&list.id),
                list,
            )
            .await
    }

    /// Read-modify-write of one timer list.
    ///
    /// Every change to a stored list goes through here. Nothing guards against
    /// a concurrent writer between the read and the write.
    async fn update_timer_list<R>(
        &self,
        card: Option<&str>,
        list_id: &str,
        on_missing: OnMissing,
        apply: impl FnOnce(&mut TimerList) -> AppResult<R>,
    ) -> AppResult<R> {
        let mut list = match (self.timer_list(list_id, card).await?, on_missing) {
            (Some(list), _) => list,
            (None, OnMissing::Create) => TimerList::new(list_id),
            (None, OnMissing::Fail(msg)) => return Err(AppError::NotFound(msg.to_string())),
        };
        let out = apply(&mut list)?;
        self.set_timer_list(&list, card).await?;
        Ok(out)
    }

    // ------------------------------------------------
    // Timers
    // ------------------------------------------------

    /// Insert or replace `timer` in a list of the current card. The list is
    /// created when it does not exist yet.
    pub async fn set_timer(&self, list_id: &str, timer: &Timer) -> AppResult<()> {
        self.report(self.upsert_timer(list_id, timer).await)
    }

    async fn upsert_timer(&self, list_id: &str, timer: &Timer) -> AppResult<()> {
        self.update_timer_list(None, list_id, OnMissing::Create, |list| {
            list.upsert_timer(timer.clone());
            Ok(())
        })
        .await
    }

    /// Create a timer with a running track and make it the current timer.
    pub async fn add_timer(&self, list_id: &str, title: &str) -> AppResult<Timer> {
        self.report(self.add_timer_inner(list_id, title).await)
    }

    async fn add_timer_inner(&self, list_id: &str, title: &str) -> AppResult<Timer> {
        let card = self.storage.context().require_card()?.to_string();

        self.stop_inner().await?;

        let created = self.now();
        let existing = self.timer_list(list_id, None).await?;
        let timer_id = self.unique_id(created, |id| {
            existing.as_ref().is_some_and(|l| l.timer(id).is_some())
        });
        let track = TimeTrack::open(timer_id.clone(), self.member(), created);
        let timer = Timer::new(timer_id, title, track.clone());

        let pointer = CurrentUserTimer {
            card_id: card,
            timer_list_id: list_id.to_string(),
            timer_id: timer.id.clone(),
            track_id: track.id,
        };

        let (saved, installed) = tokio::join!(
            self.upsert_timer(list_id, &timer),
            self.set_current_user_timer(&pointer)
        );
        self.settle(saved, installed).await?;

        log::info!("Timer {} added to list {list_id}", timer.id);
        Ok(timer)
    }

    /// Outcome of a paired list and current-timer write. A list the backend
    /// refused leaves the freshly installed record pointing at nothing, so it
    /// is dropped again.
    async fn settle(&self, saved: AppResult<()>, installed: AppResult<()>) -> AppResult<()> {
        if let Err(e @ AppError::CapacityExceeded { .. }) = saved {
            if installed.is_ok() {
                self.remove_current_user_timer().await?;
            }
            return Err(e);
        }
        saved?;
        installed
    }

    /// Append a running track to an existing timer and make it current.
    pub async fn start_timer(&self, list_id: &str, timer_id: &str) -> AppResult<TimeTrack> {
        self.report(self.start_timer_inner(list_id, timer_id).await)
    }

    async fn start_timer_inner(&self, list_id: &str, timer_id: &str) -> AppResult<TimeTrack> {
        let card = self.storage.context().require_card()?.to_string();

        let list = self
            .timer_list(list_id, None)
            .await?
            .ok_or_else(|| AppError::NotFound(START_LIST_NOT_FOUND.into()))?;
        let Some(timer) = list.timer(timer_id) else {
            return Err(AppError::NotFound(START_TIMER_NOT_FOUND.into()));
        };

        self.stop_inner().await?;

        let created = self.now();
        let track_id = self.unique_id(created, |id| timer.track(id).is_some());
        let track = TimeTrack::open(track_id, self.member(), created);

        let pointer = CurrentUserTimer {
            card_id: card,
            timer_list_id: list_id.to_string(),
            timer_id: timer_id.to_string(),
            track_id: track.id.clone(),
        };

        let append = self.update_timer_list(
            None,
            list_id,
            OnMissing::Fail(START_LIST_NOT_FOUND),
            |list| {
                let timer = list
                    .timer_mut(timer_id)
                    .ok_or_else(|| AppError::NotFound(START_TIMER_NOT_FOUND.into()))?;
                timer.push_track(track.clone());
                Ok(())
            },
        );
        let (saved, installed) = tokio::join!(append, self.set_current_user_timer(&pointer));
        self.settle(saved, installed).await?;

        log::info!("Timer {timer_id} started with track {}", track.id);
        Ok(track)
    }

    /// Ask for confirmation (when a prompt is available), then delete.
    /// Returns `false` when the user declined.
    pub async fn delete_timer(&self, list_id: &str, timer_id: &str) -> AppResult<bool> {
        if let Some(prompt) = &self.prompt {
            let mut texts = self
                .localizer
                .localize_keys(&[
                    ("Delete timer", NO_DATA),
                    (
                        "Please confirm that you want to delete this recording.",
                        NO_DATA,
                    ),
                    ("Of course, delete!", NO_DATA),
                    ("Oh no, don't!", NO_DATA),
                ])
                .into_iter();
            let mut next = || texts.next().unwrap_or_default();
            let request = ConfirmRequest {
                title: next(),
                message: next(),
                confirm_text: next(),
                cancel_text: next(),
            };

            if !prompt.confirm(&request) {
                log::info!("Deletion of timer {timer_id} cancelled");
                return Ok(false);
            }
        }

        self.report(self.delete_timer_now(list_id, timer_id).await)?;
        Ok(true)
    }

    /// Delete without asking. A running track of the timer is discarded, not
    /// closed; if it is the member's current timer the record is cleared first.
    pub async fn delete_timer_now(&self, list_id: &str, timer_id: &str) -> AppResult<Timer> {
        let list = self
            .timer_list(list_id, None)
            .await?
            .ok_or_else(|| AppError::NotFound(DELETE_LIST_NOT_FOUND.into()))?;
        if list.timer(timer_id).is_none() {
            return Err(AppError::NotFound(DELETE_TIMER_NOT_FOUND.into()));
        }

        let card = self.storage.context().card.as_deref();
        if let Some(pointer) = self.pointer().await?
            && pointer.timer_list_id == list_id
            && pointer.timer_id == timer_id
            && Some(pointer.card_id.as_str()) == card
        {
            self.remove_current_user_timer().await?;
        }

        let removed = self
            .update_timer_list(
                None,
                list_id,
                OnMissing::Fail(DELETE_LIST_NOT_FOUND),
                |list| {
                    list.remove_timer(timer_id)
                        .ok_or_else(|| AppError::NotFound(DELETE_TIMER_NOT_FOUND.into()))
                },
            )
            .await?;

        log::info!("Timer {timer_id} deleted from list {list_id}");
        Ok(removed)
    }

    /// `true` when one of the member's own tracks in `timer` is running.
    pub fn if_current_user_timer(&self, timer: &Timer) -> bool {
        timer.open_track_of(self.member()).is_some()
    }

    // ------------------------------------------------
    // Current user timer
    // ------------------------------------------------

    /// The raw current-timer record, unresolved.
    pub async fn pointer(&self) -> AppResult<Option<CurrentUserTimer>> {
        self.storage
            .get(
                &Scope::Member,
                CURRENT_USER_TIMER_VISIBILITY,
                CURRENT_USER_TIMER_KEY,
            )
            .await
    }

    pub async fn set_current_user_timer(&self, pointer: &CurrentUserTimer) -> AppResult<()> {
        self.storage
            .set(
                &Scope::Member,
                CURRENT_USER_TIMER_VISIBILITY,
                CURRENT_USER_TIMER_KEY,
                pointer,
            )
            .await
    }

    pub async fn remove_current_user_timer(&self) -> AppResult<()> {
        self.storage
            .remove(
                &Scope::Member,
                CURRENT_USER_TIMER_VISIBILITY,
                CURRENT_USER_TIMER_KEY,
            )
            .await
    }

    /// Resolve the current-timer record against the timer lists.
    pub async fn current_user_timer(&self) -> AppResult<PointerState> {
        let Some(pointer) = self.pointer().await? else {
            return Ok(PointerState::Idle);
        };

        let list = self
            .timer_list(&pointer.timer_list_id, Some(&pointer.card_id))
            .await?;
        let resolved = list
            .as_ref()
            .and_then(|l| l.timer(&pointer.timer_id))
            .and_then(|timer| {
                timer
                    .track(&pointer.track_id)
                    .filter(|track| track.is_open())
                    .map(|track| (timer.clone(), track.clone()))
            });

        Ok(match resolved {
            Some((timer, track)) => PointerState::Running(RunningTimer {
                pointer,
                timer,
                track,
            }),
            None => PointerState::Dangling(pointer),
        })
    }

    /// Close the member's running track. Idempotent.
    pub async fn stop_current_user_timer(&self) -> AppResult<StopOutcome> {
        self.report(self.stop_inner().await)
    }

    async fn stop_inner(&self) -> AppResult<StopOutcome> {
        let pointer = match self.current_user_timer().await? {
            PointerState::Idle => return Ok(StopOutcome::Idle),
            PointerState::Dangling(pointer) => {
                self.remove_current_user_timer().await?;
                self.alert(self.localize(MSG_STOP_FAILED, NO_DATA));
                return Ok(StopOutcome::Repaired(pointer));
            }
            PointerState::Running(running) => running.pointer,
        };

        let now = self.now();
        let close = self.update_timer_list(
            Some(&pointer.card_id),
            &pointer.timer_list_id,
            OnMissing::Fail(STOP_LIST_NOT_FOUND),
            |list| {
                let track = list
                    .timer_mut(&pointer.timer_id)
                    .and_then(|timer| timer.track_mut(&pointer.track_id))
                    .filter(|track| track.is_open())
                    .ok_or_else(|| AppError::InconsistentPointer(pointer.track_id.clone()))?;
                track.close(now);
                Ok(track.clone())
            },
        );
        let (closed, removed) = tokio::join!(close, self.remove_current_user_timer());
        removed?;

        match closed {
            Ok(track) => {
                log::info!("Track {} stopped", track.id);
                Ok(StopOutcome::Stopped(track))
            }
            // The list changed between resolving and closing.
            Err(AppError::InconsistentPointer(_) | AppError::NotFound(_)) => {
                self.alert(self.localize(MSG_STOP_FAILED, NO_DATA));
                Ok(StopOutcome::Repaired(pointer))
            }
            Err(e) => Err(e),
        }
    }
}
