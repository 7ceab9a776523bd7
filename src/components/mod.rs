mod auth_screen;
mod category_cards;
mod charts;
mod dashboard;
mod detail_modal;
mod emoji_picker;
mod icons;
mod layout;
mod profile_modal;
mod recent;
mod summary;
mod transaction_form;

pub use auth_screen::AuthScreen;
pub use dashboard::Dashboard;

use std::future::Future;
use std::rc::Rc;

use futures::lock::Mutex;
use wasm_bindgen_futures::spawn_local;
use yew::UseReducerHandle;

use crate::backend::Backend;
use crate::config::AppConfig;
use crate::dialog;
use crate::error::Result;
use crate::state::{Action, AppState};
use crate::store::CategorySet;

/// Everything a dashboard widget needs: the reducer handle, where to persist,
/// and whose data it is.
#[derive(Clone)]
pub struct Ledger {
    pub state: UseReducerHandle<AppState>,
    pub backend: Backend,
    pub user_id: String,
    pub config: Rc<AppConfig>,
    /// Category lists as last acknowledged by the backend. Category commands
    /// take turns on this lock.
    pub saved_categories: Rc<Mutex<CategorySet>>,
}

impl PartialEq for Ledger {
    fn eq(&self, other: &Self) -> bool {
        self.state == other.state
            && self.backend == other.backend
            && self.user_id == other.user_id
            && self.config == other.config
            && Rc::ptr_eq(&self.saved_categories, &other.saved_categories)
    }
}

impl Ledger {
    pub fn symbol(&self) -> &str {
        &self.config.currency_symbol
    }

    /// Runs a persisted command and commits its action. Failures leave the
    /// state as it was and are reported with an alert.
    pub fn run<F, Fut>(&self, label: &'static str, command: F)
    where
        F: FnOnce(Ledger) -> Fut + 'static,
        Fut: Future<Output = Result<Action>> + 'static,
    {
        self.run_then(label, command, || ());
    }

    pub fn run_then<F, Fut, T>(&self, label: &'static str, command: F, then: T)
    where
        F: FnOnce(Ledger) -> Fut + 'static,
        Fut: Future<Output = Result<Action>> + 'static,
        T: FnOnce() + 'static,
    {
        let ledger = self.clone();
        spawn_local(async move {
            let state = ledger.state.clone();
            match command(ledger).await {
                Ok(action) => {
                    state.dispatch(action);
                    then();
                }
                Err(err) => {
                    log::error!("[{}] {}", label, err);
                    dialog::alert(&err.user_message());
                }
            }
        });
    }
}

/// Target of the add/edit transaction modal.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum FormTarget {
    New,
    Edit(i64),
}
