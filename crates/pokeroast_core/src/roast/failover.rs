//! Model failover.
//!
//! Candidate models are tried strictly in order. Any failure of one model (transport
//! error, empty reply, unparseable JSON) is logged and the next model is tried. The
//! first success wins. When every candidate fails the caller still gets a verdict: the
//! synthetic "machine broke" payload carrying the last error.

use std::fmt::{self, Display};

use tracing::{debug, info, instrument, warn};

use super::backend::ChatBackend;
use super::prompt::{parse_verdict, RoastPrompt};
use super::RoastVerdict;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailoverEvent {
    Attempt { index: usize, model: String },
    ModelFailed { index: usize, model: String, error: String },
    Succeeded { index: usize, model: String },
    Exhausted { attempts: usize, last_error: String },
}

impl Display for FailoverEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailoverEvent::Attempt { index, model } => write!(f, "Attempt #{} model={}", index, model),
            FailoverEvent::ModelFailed { index, model, error } => {
                write!(f, "ModelFailed #{} model={} error={}", index, model, error)
            }
            FailoverEvent::Succeeded { index, model } => write!(f, "Succeeded #{} model={}", index, model),
            FailoverEvent::Exhausted { attempts, last_error } => {
                write!(f, "Exhausted after {} attempts: {}", attempts, last_error)
            }
        }
    }
}

/// Roast generator over an ordered list of candidate models.
pub struct Roaster<B> {
    backend: B,
    models: Vec<String>,
}

impl<B: ChatBackend> Roaster<B> {
    pub fn new(backend: B, models: Vec<String>) -> Self {
        Self { backend, models }
    }

    pub fn models(&self) -> &[String] {
        &self.models
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Roast a team. Never fails; see module docs.
    pub async fn roast<S: AsRef<str> + Sync>(&self, team: &[S], game_context: &str) -> RoastVerdict {
        self.roast_with_logger(team, game_context, |_| {}).await
    }

    #[instrument(name = "roast_with_failover", skip(self, team, logger), fields(team_len = team.len(), candidates = self.models.len()))]
    pub async fn roast_with_logger<S: AsRef<str> + Sync>(
        &self,
        team: &[S],
        game_context: &str,
        mut logger: impl FnMut(&FailoverEvent) + Send,
    ) -> RoastVerdict {
        let prompt = RoastPrompt::for_team(team, game_context);
        let mut emit = |ev: FailoverEvent| {
            debug!(target: "roast", event = %ev, "failover_event");
            logger(&ev);
        };

        let mut last_error = String::from("no candidate models configured");
        for (index, model) in self.models.iter().enumerate() {
            emit(FailoverEvent::Attempt { index, model: model.clone() });
            let outcome = match self.backend.complete(model, &prompt).await {
                Ok(raw) => parse_verdict(&raw),
                Err(e) => Err(e),
            };
            match outcome {
                Ok(mut verdict) => {
                    info!(target: "roast", %model, "roast_generated");
                    emit(FailoverEvent::Succeeded { index, model: model.clone() });
                    verdict.model = Some(model.clone());
                    return verdict;
                }
                Err(e) => {
                    warn!(target: "roast", %model, error = %e, "model_failed");
                    last_error = e.to_string();
                    emit(FailoverEvent::ModelFailed { index, model: model.clone(), error: last_error.clone() });
                }
            }
        }

        emit(FailoverEvent::Exhausted { attempts: self.models.len(), last_error: last_error.clone() });
        warn!(target: "roast", attempts = self.models.len(), "all_models_failed");
        RoastVerdict::machine_broke(last_error)
    }
}
