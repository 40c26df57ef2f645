use crate::types::{Config, DataKey, Error, Participant};
use soroban_sdk::{Address, Env, Symbol};

pub struct AccessManager;

impl AccessManager {
    /// Store the admin and the initial voting config
    pub fn init(env: &Env, admin: &Address, config: &Config) -> Result<(), Error> {
        if env.storage().instance().has(&DataKey::Admin) {
            return Err(Error::AlreadyInitialized);
        }

        Self::validate_config(config)?;
        env.storage().instance().set(&DataKey::Admin, admin);
        env.storage().instance().set(&DataKey::Config, config);

        env.events()
            .publish((Symbol::new(env, "init"),), (admin.clone(), config.clone()));
        Ok(())
    }

    /// Replace the voting config (Admin only). The budget can not drop
    /// below what any participant has already spent.
    pub fn set_config(env: &Env, admin: &Address, config: &Config) -> Result<(), Error> {
        Self::verify_admin(env, admin)?;
        Self::validate_config(config)?;
        if config.votes_per_participant < Self::peak_votes_given(env) {
            return Err(Error::InvalidConfig);
        }
        env.storage().instance().set(&DataKey::Config, config);

        env.events()
            .publish((Symbol::new(env, "config_set"),), config.clone());
        Ok(())
    }

    pub fn get_config(env: &Env) -> Result<Config, Error> {
        env.storage()
            .instance()
            .get(&DataKey::Config)
            .ok_or(Error::NotInitialized)
    }

    /// Grant or remove moderator rights (Admin only)
    pub fn set_moderator(
        env: &Env,
        admin: &Address,
        user: &Address,
        is_moderator: bool,
    ) -> Result<(), Error> {
        Self::verify_admin(env, admin)?;

        let key = DataKey::Moderator(user.clone());
        if is_moderator {
            env.storage().persistent().set(&key, &true);
        } else {
            env.storage().persistent().remove(&key);
        }

        env.events().publish(
            (Symbol::new(env, "moderator_set"), user.clone()),
            is_moderator,
        );
        Ok(())
    }

    pub fn is_moderator(env: &Env, user: &Address) -> bool {
        env.storage()
            .persistent()
            .get(&DataKey::Moderator(user.clone()))
            .unwrap_or(false)
    }

    /// Register or unregister a participant. The admin counts as a moderator.
    /// Votes already given are kept.
    pub fn set_participant(
        env: &Env,
        moderator: &Address,
        user: &Address,
        is_participant: bool,
    ) -> Result<(), Error> {
        if !Self::is_admin(env, moderator)? && !Self::is_moderator(env, moderator) {
            return Err(Error::Unauthorized);
        }

        let mut participant = Self::get_participant(env, user);
        participant.is_participant = is_participant;
        Self::save_participant(env, &participant);

        env.events().publish(
            (Symbol::new(env, "participant_set"), user.clone()),
            is_participant,
        );
        Ok(())
    }

    /// Participant row for a user, defaulting to an unregistered one
    pub fn get_participant(env: &Env, user: &Address) -> Participant {
        env.storage()
            .persistent()
            .get(&DataKey::Participant(user.clone()))
            .unwrap_or(Participant {
                user: user.clone(),
                is_participant: false,
                votes_given: 0,
            })
    }

    pub fn save_participant(env: &Env, participant: &Participant) {
        env.storage()
            .persistent()
            .set(&DataKey::Participant(participant.user.clone()), participant);

        if participant.votes_given > Self::peak_votes_given(env) {
            env.storage()
                .instance()
                .set(&DataKey::PeakVotesGiven, &participant.votes_given);
        }
    }

    /// High-water mark of `votes_given` across all participants
    pub fn peak_votes_given(env: &Env) -> u32 {
        env.storage()
            .instance()
            .get(&DataKey::PeakVotesGiven)
            .unwrap_or(0)
    }

    pub fn require_participant(env: &Env, user: &Address) -> Result<Participant, Error> {
        let participant = Self::get_participant(env, user);
        if !participant.is_participant {
            return Err(Error::NotParticipant);
        }
        Ok(participant)
    }

    fn is_admin(env: &Env, user: &Address) -> Result<bool, Error> {
        let admin: Address = env
            .storage()
            .instance()
            .get(&DataKey::Admin)
            .ok_or(Error::NotInitialized)?;
        Ok(&admin == user)
    }

    /// Verify admin
    pub fn verify_admin(env: &Env, admin: &Address) -> Result<(), Error> {
        if !Self::is_admin(env, admin)? {
            return Err(Error::Unauthorized);
        }
        Ok(())
    }

    fn validate_config(config: &Config) -> Result<(), Error> {
        if config.votes_per_participant == 0
            || config.voting_start_timestamp >= config.voting_end_timestamp
        {
            return Err(Error::InvalidConfig);
        }
        Ok(())
    }
}
