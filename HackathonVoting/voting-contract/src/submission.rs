use crate::access::AccessManager;
use crate::types::{DataKey, Error, Submission};
use soroban_sdk::{Address, Env, String, Symbol, Vec};

pub struct SubmissionManager;

/// Which submission field an update touches
#[derive(Clone, Copy)]
pub enum SubmissionField {
    Name,
    GithubUrl,
    DemoVideoUrl,
}

impl SubmissionManager {
    pub fn init(env: &Env) {
        if !env.storage().instance().has(&DataKey::SubmissionCreators) {
            env.storage()
                .instance()
                .set(&DataKey::SubmissionCreators, &Vec::<Address>::new(env));
        }
    }

    /// Create the caller's submission
    pub fn create_submission(
        env: &Env,
        creator: Address,
        name: String,
        github_url: String,
        demo_video_url: String,
    ) -> Result<(), Error> {
        AccessManager::require_participant(env, &creator)?;
        Self::require_open(env)?;

        let key = DataKey::Submission(creator.clone());
        if env.storage().persistent().has(&key) {
            return Err(Error::SubmissionExists);
        }

        let submission = Submission {
            creator: creator.clone(),
            submitted_timestamp: env.ledger().timestamp() as u32,
            votes_received: 0,
            name,
            github_url,
            demo_video_url,
        };
        env.storage().persistent().set(&key, &submission);

        let mut creators = Self::get_creators(env);
        creators.push_back(creator.clone());
        env.storage()
            .instance()
            .set(&DataKey::SubmissionCreators, &creators);

        env.events().publish(
            (Symbol::new(env, "submission_created"), creator),
            submission.name,
        );
        Ok(())
    }

    /// Overwrite one field of the caller's own submission
    pub fn update_field(
        env: &Env,
        creator: Address,
        field: SubmissionField,
        value: String,
    ) -> Result<(), Error> {
        Self::require_open(env)?;
        let mut submission = Self::get_submission(env, &creator)?;

        let topic = match field {
            SubmissionField::Name => {
                submission.name = value;
                "name_updated"
            }
            SubmissionField::GithubUrl => {
                submission.github_url = value;
                "github_updated"
            }
            SubmissionField::DemoVideoUrl => {
                submission.demo_video_url = value;
                "demo_updated"
            }
        };
        Self::save_submission(env, &submission);

        env.events()
            .publish((Symbol::new(env, topic), creator), ());
        Ok(())
    }

    pub fn get_submission(env: &Env, creator: &Address) -> Result<Submission, Error> {
        env.storage()
            .persistent()
            .get(&DataKey::Submission(creator.clone()))
            .ok_or(Error::SubmissionNotFound)
    }

    pub fn save_submission(env: &Env, submission: &Submission) {
        env.storage()
            .persistent()
            .set(&DataKey::Submission(submission.creator.clone()), submission);
    }

    /// Creators in submission order
    pub fn get_creators(env: &Env) -> Vec<Address> {
        env.storage()
            .instance()
            .get(&DataKey::SubmissionCreators)
            .unwrap_or_else(|| Vec::new(env))
    }

    // Submissions stay editable until voting closes.
    fn require_open(env: &Env) -> Result<(), Error> {
        let config = AccessManager::get_config(env)?;
        if env.ledger().timestamp() > config.voting_end_timestamp as u64 {
            return Err(Error::SubmissionsClosed);
        }
        Ok(())
    }
}
