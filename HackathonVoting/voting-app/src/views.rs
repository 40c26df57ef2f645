//! View models for the list and detail screens. Rendering is left to the
//! front end; these carry every decision a screen needs.

use lazy_static::lazy_static;
use regex::Regex;

use crate::actions::SubmissionForm;
use crate::app::Tab;
use crate::read_model::ReadModel;
use crate::records::SubmissionRecord;
use crate::routes::Route;
use crate::types::Address;

lazy_static! {
    static ref YOUTUBE_ID: Regex =
        Regex::new(r"(?:youtu\.be/|youtube\.com/(?:embed/|v/|watch\?v=))([\w-]{11})")
            .expect("valid youtube pattern");
}

/// Embeddable video id from a YouTube share, embed or watch link
pub fn youtube_video_id(url: &str) -> Option<&str> {
    YOUTUBE_ID
        .captures(url)
        .and_then(|captures| captures.get(1))
        .map(|id| id.as_str())
}

/// Flags that gate interactive controls
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ViewContext {
    pub read_only: bool,
    pub pending: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum VoteControl {
    /// Visitors, non-participants and the submission's own creator
    Hidden,
    Vote { enabled: bool, votes_remaining: u32 },
    Revoke { your_votes: u32, enabled: bool },
}

impl VoteControl {
    pub fn for_submission(model: &ReadModel, creator: &Address, ctx: ViewContext) -> Self {
        if ctx.read_only || !model.is_participant || model.is_own(creator) {
            return VoteControl::Hidden;
        }

        let your_votes = model.user_votes_for(creator);
        if your_votes > 0 {
            VoteControl::Revoke {
                your_votes,
                enabled: !ctx.pending,
            }
        } else {
            VoteControl::Vote {
                enabled: !ctx.pending && model.votes_remaining > 0,
                votes_remaining: model.votes_remaining,
            }
        }
    }

    pub fn label(&self) -> Option<&'static str> {
        match self {
            VoteControl::Hidden => None,
            VoteControl::Vote {
                votes_remaining: 0, ..
            } => Some("No Votes Left"),
            VoteControl::Vote { .. } => Some("Vote"),
            VoteControl::Revoke { .. } => Some("Remove Vote"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Header {
    pub user: Option<Address>,
    pub is_participant: bool,
    pub votes_remaining: u32,
    pub votes_per_participant: u32,
    /// Connected users that a moderator has not registered yet
    pub show_registration_notice: bool,
}

impl Header {
    pub fn new(model: &ReadModel, ctx: ViewContext) -> Self {
        Self {
            user: model.user,
            is_participant: model.is_participant,
            votes_remaining: model.votes_remaining,
            votes_per_participant: model.votes_per_participant,
            show_registration_notice: !ctx.read_only && !model.is_participant,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TabBar {
    pub active: Tab,
    pub project_count: usize,
    pub submit_enabled: bool,
}

impl TabBar {
    pub fn submit_label(&self) -> &'static str {
        if self.submit_enabled {
            "Submit Project"
        } else {
            "Already Submitted"
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ListEntry {
    pub rank: usize,
    pub creator: Address,
    pub name: String,
    pub github_url: String,
    pub demo_video_url: String,
    pub votes_received: u32,
    pub is_own: bool,
    pub detail_path: String,
    pub vote: VoteControl,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ListView {
    pub header: Header,
    /// Only participants get tabs
    pub tabs: Option<TabBar>,
    pub entries: Vec<ListEntry>,
}

impl ListView {
    pub fn new(model: &ReadModel, ctx: ViewContext, active: Tab) -> Self {
        let tabs = (!ctx.read_only && model.is_participant).then(|| TabBar {
            active,
            project_count: model.leaderboard.len(),
            submit_enabled: model.own_submission.is_none(),
        });

        let entries = model
            .leaderboard
            .iter()
            .enumerate()
            .map(|(index, submission)| ListEntry {
                rank: index + 1,
                creator: submission.creator,
                name: submission.name.clone(),
                github_url: submission.github_url.clone(),
                demo_video_url: submission.demo_video_url.clone(),
                votes_received: submission.votes_received,
                is_own: !ctx.read_only && model.is_own(&submission.creator),
                detail_path: Route::detail(&submission.creator).to_string(),
                vote: VoteControl::for_submission(model, &submission.creator, ctx),
            })
            .collect();

        Self {
            header: Header::new(model, ctx),
            tabs,
            entries,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProjectDetail {
    pub creator: Address,
    pub name: String,
    pub github_url: String,
    pub demo_video_url: String,
    pub votes_received: u32,
    pub video_id: Option<String>,
    pub can_edit: bool,
    /// Present while the owner is editing
    pub editing: Option<SubmissionForm>,
    pub vote: VoteControl,
    pub back_path: String,
}

impl ProjectDetail {
    pub fn embed_url(&self) -> Option<String> {
        self.video_id
            .as_ref()
            .map(|id| format!("https://www.youtube.com/embed/{}", id))
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DetailView {
    NotFound { back_path: String },
    Found(ProjectDetail),
}

impl DetailView {
    /// Detail screen for the creator segment of a `/project/{creator}` route
    pub fn new(
        model: &ReadModel,
        creator: &str,
        ctx: ViewContext,
        editing: Option<&SubmissionForm>,
    ) -> Self {
        let back_path = Route::List.to_string();
        let submission = creator
            .parse::<Address>()
            .ok()
            .and_then(|creator| model.submission(&creator));

        match submission {
            Some(submission) => DetailView::Found(Self::detail(model, submission, ctx, editing)),
            None => DetailView::NotFound { back_path },
        }
    }

    fn detail(
        model: &ReadModel,
        submission: &SubmissionRecord,
        ctx: ViewContext,
        editing: Option<&SubmissionForm>,
    ) -> ProjectDetail {
        let can_edit = !ctx.read_only && model.is_own(&submission.creator);

        ProjectDetail {
            creator: submission.creator,
            name: submission.name.clone(),
            github_url: submission.github_url.clone(),
            demo_video_url: submission.demo_video_url.clone(),
            votes_received: submission.votes_received,
            video_id: youtube_video_id(&submission.demo_video_url).map(str::to_string),
            can_edit,
            editing: editing.filter(|_| can_edit).cloned(),
            vote: VoteControl::for_submission(model, &submission.creator, ctx),
            back_path: Route::List.to_string(),
        }
    }
}
