use std::cell::RefCell;
use std::rc::Rc;

use log::{debug, info};

use crate::actions::{SubmissionForm, VotingActions};
use crate::config::AppConfig;
use crate::errors::{ClientError, ConfigError, LedgerError};
use crate::ledger::{Indexer, Ledger, TxReceipt};
use crate::mirror::RecordMirror;
use crate::read_model::ReadModel;
use crate::routes::Route;
use crate::session::Session;
use crate::types::Address;
use crate::views::{DetailView, ListView, ViewContext};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tab {
    Projects,
    Submit,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Screen {
    List { tab: Tab },
    Detail { creator: String, editing: bool },
}

/// What the app can show right now
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ViewState {
    /// No wallet connected
    Disconnected,
    /// Connected, mirror not live yet
    Syncing { percentage: u8 },
    Ready(Screen),
}

/// Controller tying the mirror, the session and the screens together
pub struct App {
    actions: VotingActions,
    route: Route,
    tab: Tab,
    form: SubmissionForm,
    edit_form: Option<SubmissionForm>,
    model_cache: RefCell<Option<(u64, Rc<ReadModel>)>>,
}

impl App {
    pub fn new(actions: VotingActions) -> Self {
        Self {
            actions,
            route: Route::List,
            tab: Tab::Projects,
            form: SubmissionForm::default(),
            edit_form: None,
            model_cache: RefCell::new(None),
        }
    }

    /// Wire an app to a chain client. `user` is the connected wallet, if
    /// any; read-only configs ignore it.
    pub fn from_config<C>(
        config: &AppConfig,
        user: Option<Address>,
        chain: Rc<C>,
    ) -> Result<Self, ConfigError>
    where
        C: Ledger + Indexer + 'static,
    {
        let session = match (config.read_only, user) {
            (true, _) => Session::visitor(),
            (false, Some(user)) => Session::connected(user),
            (false, None) => Session::disconnected(),
        };
        let ledger: Rc<dyn Ledger> = chain.clone();
        let indexer: Rc<dyn Indexer> = chain;

        let actions = VotingActions::new(
            session,
            config.system_id()?,
            ledger,
            indexer,
            Rc::new(RecordMirror::new()),
        );
        info!(
            "app wired to {}/{}",
            config.namespace, config.system_name
        );
        Ok(Self::new(actions))
    }

    pub fn actions(&self) -> &VotingActions {
        &self.actions
    }

    pub fn mirror(&self) -> &Rc<RecordMirror> {
        self.actions.mirror()
    }

    /// Initial sync, or a manual refresh
    pub async fn sync(&self) -> Result<(), LedgerError> {
        self.actions.refresh().await
    }

    pub fn view_state(&self) -> ViewState {
        let session = self.actions.session();
        if !session.is_connected() && !session.is_read_only() {
            return ViewState::Disconnected;
        }

        let sync = self.mirror().sync_status();
        if !sync.is_live {
            return ViewState::Syncing {
                percentage: sync.percentage,
            };
        }

        ViewState::Ready(match &self.route {
            Route::List => Screen::List {
                tab: self.active_tab(),
            },
            Route::Detail { creator } => Screen::Detail {
                creator: creator.clone(),
                editing: self.edit_form.is_some(),
            },
        })
    }

    /// Derived state for the current mirror version, recomputed only when
    /// the mirror changes
    pub fn read_model(&self) -> Rc<ReadModel> {
        let version = self.mirror().version();
        let mut cache = self.model_cache.borrow_mut();
        if let Some((cached_version, model)) = cache.as_ref() {
            if *cached_version == version {
                return model.clone();
            }
        }

        let tables = self.mirror().tables();
        let model = Rc::new(ReadModel::derive(&tables, self.actions.session().user()));
        debug!("read model recomputed for mirror version {}", version);
        *cache = Some((version, model.clone()));
        model
    }

    pub fn route(&self) -> &Route {
        &self.route
    }

    /// Follow a path; leaving a page drops any unsaved edit
    pub fn navigate(&mut self, path: &str) {
        self.route = Route::parse(path);
        self.edit_form = None;
    }

    /// Returns false when the tab is not available
    pub fn select_tab(&mut self, tab: Tab) -> bool {
        if tab == Tab::Submit && !self.can_submit() {
            return false;
        }
        self.tab = tab;
        true
    }

    pub fn form(&self) -> &SubmissionForm {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut SubmissionForm {
        &mut self.form
    }

    /// Submit the form. On success the form is cleared and the list shown;
    /// on failure the form is kept as typed.
    pub async fn submit_project(&mut self) -> Result<TxReceipt, ClientError> {
        let form = self.form.clone();
        let receipt = self.actions.create_submission(&form).await?;

        self.form = SubmissionForm::default();
        self.tab = Tab::Projects;
        self.route = Route::List;
        Ok(receipt)
    }

    pub async fn vote(&self, creator: &Address) -> Result<TxReceipt, ClientError> {
        self.actions.vote(creator).await
    }

    pub async fn revoke_vote(&self, creator: &Address) -> Result<TxReceipt, ClientError> {
        self.actions.revoke_vote(creator).await
    }

    /// Enter edit mode on the detail page of the user's own submission
    pub fn begin_edit(&mut self) -> bool {
        match self.viewed_own_submission() {
            Some(form) => {
                self.edit_form = Some(form);
                true
            }
            None => false,
        }
    }

    pub fn edit_form_mut(&mut self) -> Option<&mut SubmissionForm> {
        self.edit_form.as_mut()
    }

    pub fn cancel_edit(&mut self) {
        self.edit_form = None;
    }

    /// Save changed fields. Edit mode ends only if every update succeeded.
    pub async fn save_edit(&mut self) -> Result<usize, ClientError> {
        let form = self.edit_form.clone().ok_or(ClientError::NoSubmission)?;
        let current = self
            .read_model()
            .own_submission
            .clone()
            .ok_or(ClientError::NoSubmission)?;

        let issued = self.actions.save_edits(&current, &form).await?;
        self.edit_form = None;
        Ok(issued)
    }

    pub fn list_view(&self) -> ListView {
        ListView::new(&self.read_model(), self.view_context(), self.active_tab())
    }

    /// `None` unless the current route is a detail page
    pub fn detail_view(&self) -> Option<DetailView> {
        match &self.route {
            Route::Detail { creator } => Some(DetailView::new(
                &self.read_model(),
                creator,
                self.view_context(),
                self.edit_form.as_ref(),
            )),
            Route::List => None,
        }
    }

    fn view_context(&self) -> ViewContext {
        ViewContext {
            read_only: self.actions.session().is_read_only(),
            pending: self.actions.is_pending(),
        }
    }

    fn can_submit(&self) -> bool {
        let model = self.read_model();
        !self.actions.session().is_read_only()
            && model.is_participant
            && model.own_submission.is_none()
    }

    fn active_tab(&self) -> Tab {
        match self.tab {
            Tab::Submit if self.can_submit() => Tab::Submit,
            _ => Tab::Projects,
        }
    }

    fn viewed_own_submission(&self) -> Option<SubmissionForm> {
        if self.actions.session().is_read_only() {
            return None;
        }
        let creator = self.route.creator()?;
        let model = self.read_model();
        model
            .own_submission
            .as_ref()
            .filter(|own| own.creator == creator)
            .map(SubmissionForm::from_submission)
    }
}
