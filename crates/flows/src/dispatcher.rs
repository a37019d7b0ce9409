//! Event dispatch around the pure transition function
//!
//! One inbound event is one unit of work: look up the session, fetch the
//! profile, run [`step`], execute the pending write, commit the session,
//! play the effects. The write comes before the session commit so a
//! persistence failure leaves the conversation exactly where it was.

use std::sync::Arc;

use fitbot_config::{Messages, Tariffs};
use fitbot_core::{
    ChatTransport, Effect, FlowError, FlowEvent, Keyboard, Profile, ProfileRepository,
    ProfileWrite, UserId,
};

use crate::engine::{step, FlowContext, StepOutcome};
use crate::session::SessionStore;

pub struct Dispatcher<R, T> {
    sessions: SessionStore,
    repo: Arc<R>,
    transport: Arc<T>,
    messages: Messages,
    tariffs: Tariffs,
}

impl<R, T> Dispatcher<R, T>
where
    R: ProfileRepository,
    T: ChatTransport,
{
    pub fn new(repo: Arc<R>, transport: Arc<T>, messages: Messages, tariffs: Tariffs) -> Self {
        Self {
            sessions: SessionStore::new(),
            repo,
            transport,
            messages,
            tariffs,
        }
    }

    /// Process one inbound event for one user.
    ///
    /// Returns `Ok(false)` when the current state does not accept the
    /// event; nothing is changed or sent in that case.
    pub async fn handle(
        &self,
        user: UserId,
        username: Option<&str>,
        event: FlowEvent,
    ) -> Result<bool, FlowError> {
        let session = self.sessions.get(user);
        let profile = self.repo.find(user).await?;

        let ctx = FlowContext {
            messages: &self.messages,
            tariffs: &self.tariffs,
        };
        let Some(outcome) = step(&session, profile.as_ref(), &event, &ctx) else {
            tracing::debug!(user = %user, state = %session.state.describe(), "Event not accepted");
            return Ok(false);
        };

        tracing::info!(
            user = %user,
            from = %session.state.describe(),
            to = %outcome.session.state.describe(),
            has_write = outcome.write.is_some(),
            "Flow step"
        );

        if let Err(err) = self.execute_write(user, username, &outcome).await {
            // Not a validation problem, so the notice must not read like one
            if let Err(send_err) = self
                .transport
                .send_temp(user, &self.messages.try_again, &Keyboard::None)
                .await
            {
                tracing::warn!(user = %user, error = %send_err, "Failed to deliver retry notice");
            }
            return Err(err);
        }

        self.sessions.commit(user, outcome.session);

        for effect in &outcome.effects {
            self.play(user, effect).await?;
        }

        Ok(true)
    }

    /// Profiles seeded by the flow engine; used by callers that need a
    /// read-only view (the bot's startup greeting, for instance)
    pub async fn profile(&self, user: UserId) -> Result<Option<Profile>, FlowError> {
        Ok(self.repo.find(user).await?)
    }

    async fn execute_write(
        &self,
        user: UserId,
        username: Option<&str>,
        outcome: &StepOutcome,
    ) -> Result<(), FlowError> {
        let Some(write) = &outcome.write else {
            return Ok(());
        };

        let result = match write.clone() {
            ProfileWrite::Upsert { mut patch } => {
                // Refresh the display username on creation-capable writes
                if let Some(name) = username {
                    patch.username = Some(name.to_string());
                }
                self.repo.upsert(user, patch).await
            }
            ProfileWrite::Update { patch } => self.repo.update(user, patch).await,
        };

        match result {
            Ok(_) => Ok(()),
            Err(err) => {
                tracing::error!(user = %user, error = %err, "Profile write failed, step aborted");
                Err(err.into())
            }
        }
    }

    async fn play(&self, user: UserId, effect: &Effect) -> Result<(), FlowError> {
        match effect {
            Effect::SendTemp { text, keyboard } => {
                self.transport.send_temp(user, text, keyboard).await?
            }
            Effect::SendKeep { text, keyboard } => {
                self.transport.send_keep(user, text, keyboard).await?
            }
            Effect::Alert { text } => self.transport.alert(user, text).await?,
            Effect::Ack => self.transport.ack(user).await?,
        }
        Ok(())
    }
}
