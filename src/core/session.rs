//! Presentation state and its reducer
//!
//! A front end feeds [`Action`]s into [`Session::reduce`] and performs the
//! returned [`Effect`], reporting completion back as another action. Search
//! debouncing and stale conversion results are handled here so that the
//! directory and converter stay free of timing concerns.

use crate::core::convert::{ConversionRequest, ConversionResult, ConversionState};
use crate::core::error::ConversionError;
use std::time::{Duration, Instant};
use tracing::debug;

/// Minimum input inactivity before a query is searched.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(200);

#[derive(Debug, Clone)]
pub enum Action {
    QueryChanged { query: String, at: Instant },
    /// Clock signal from the caller's scheduler.
    Tick { now: Instant },
    SourceSelected(String),
    TargetSelected(String),
    AmountChanged(String),
    ConvertRequested,
    ConversionFinished {
        token: u64,
        result: Result<ConversionResult, ConversionError>,
    },
}

/// Work the caller must perform on behalf of the session.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    Search(String),
    Convert {
        token: u64,
        request: ConversionRequest,
    },
}

#[derive(Debug, Clone)]
pub struct Session {
    debounce: Duration,
    query: String,
    query_edited_at: Option<Instant>,
    source: Option<String>,
    target: Option<String>,
    amount_text: String,
    conversion: ConversionState,
    latest_token: u64,
}

impl Default for Session {
    fn default() -> Self {
        Self::new(DEFAULT_DEBOUNCE)
    }
}

impl Session {
    pub fn new(debounce: Duration) -> Self {
        Session {
            debounce,
            query: String::new(),
            query_edited_at: None,
            source: None,
            target: None,
            amount_text: String::new(),
            conversion: ConversionState::Idle,
            latest_token: 0,
        }
    }

    pub fn reduce(mut self, action: Action) -> (Session, Option<Effect>) {
        let effect = match action {
            Action::QueryChanged { query, at } => {
                self.query = query;
                self.query_edited_at = Some(at);
                None
            }
            Action::Tick { now } => match self.search_deadline() {
                Some(deadline) if now >= deadline => {
                    self.query_edited_at = None;
                    Some(Effect::Search(self.query.clone()))
                }
                _ => None,
            },
            Action::SourceSelected(source) => {
                self.source = Some(source);
                None
            }
            Action::TargetSelected(target) => {
                self.target = Some(target);
                None
            }
            Action::AmountChanged(text) => {
                self.amount_text = text;
                None
            }
            Action::ConvertRequested => {
                match ConversionRequest::parse(
                    self.source.as_deref(),
                    self.target.as_deref(),
                    &self.amount_text,
                ) {
                    Ok(request) => {
                        self.latest_token += 1;
                        self.conversion = ConversionState::Fetching;
                        Some(Effect::Convert {
                            token: self.latest_token,
                            request,
                        })
                    }
                    Err(e) => {
                        self.conversion = ConversionState::Failed(e);
                        None
                    }
                }
            }
            Action::ConversionFinished { token, result } => {
                if token == self.latest_token {
                    self.conversion = result.into();
                } else {
                    debug!(token, latest = self.latest_token, "Discarding stale result");
                }
                None
            }
        };
        (self, effect)
    }

    /// When the pending query becomes eligible for search, if any.
    pub fn search_deadline(&self) -> Option<Instant> {
        self.query_edited_at.map(|at| at + self.debounce)
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    pub fn target(&self) -> Option<&str> {
        self.target.as_deref()
    }

    pub fn conversion(&self) -> &ConversionState {
        &self.conversion
    }

    pub fn latest_token(&self) -> u64 {
        self.latest_token
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(value: f64) -> Result<ConversionResult, ConversionError> {
        Ok(ConversionResult {
            value,
            target_code: "usd".to_string(),
        })
    }

    fn ready_session() -> Session {
        let session = Session::default();
        let (session, _) = session.reduce(Action::SourceSelected("bitcoin".to_string()));
        let (session, _) = session.reduce(Action::TargetSelected("usd".to_string()));
        let (session, _) = session.reduce(Action::AmountChanged("2".to_string()));
        session
    }

    #[test]
    fn test_search_fires_after_quiet_period() {
        let start = Instant::now();
        let session = Session::new(Duration::from_millis(200));

        let (session, effect) = session.reduce(Action::QueryChanged {
            query: "b".to_string(),
            at: start,
        });
        assert!(effect.is_none());

        let (session, effect) = session.reduce(Action::QueryChanged {
            query: "bt".to_string(),
            at: start + Duration::from_millis(150),
        });
        assert!(effect.is_none());

        // 200ms after the first keystroke, but only 50ms after the last one
        let (session, effect) = session.reduce(Action::Tick {
            now: start + Duration::from_millis(200),
        });
        assert!(effect.is_none());

        let (session, effect) = session.reduce(Action::Tick {
            now: start + Duration::from_millis(350),
        });
        assert_eq!(effect, Some(Effect::Search("bt".to_string())));

        // Already searched; further ticks are quiet
        let (_, effect) = session.reduce(Action::Tick {
            now: start + Duration::from_secs(5),
        });
        assert!(effect.is_none());
    }

    #[test]
    fn test_tick_without_query_is_noop() {
        let (session, effect) = Session::default().reduce(Action::Tick {
            now: Instant::now(),
        });
        assert!(effect.is_none());
        assert!(session.search_deadline().is_none());
    }

    #[test]
    fn test_convert_requested_emits_effect() {
        let (session, effect) = ready_session().reduce(Action::ConvertRequested);
        assert_eq!(
            effect,
            Some(Effect::Convert {
                token: 1,
                request: ConversionRequest {
                    source_id: "bitcoin".to_string(),
                    target_code: "usd".to_string(),
                    amount: 2.0,
                },
            })
        );
        assert_eq!(session.conversion(), &ConversionState::Fetching);

        let (session, _) = session.reduce(Action::ConversionFinished {
            token: 1,
            result: result(130000.0),
        });
        assert!(matches!(
            session.conversion(),
            ConversionState::Succeeded(r) if r.value == 130000.0
        ));
    }

    #[test]
    fn test_invalid_input_fails_without_effect() {
        let session = ready_session();
        let (session, _) = session.reduce(Action::AmountChanged("0".to_string()));
        let (session, effect) = session.reduce(Action::ConvertRequested);
        assert!(effect.is_none());
        assert!(matches!(
            session.conversion(),
            ConversionState::Failed(ConversionError::InvalidInput { .. })
        ));
        assert_eq!(session.latest_token(), 0);

        let (session, effect) = Session::default().reduce(Action::ConvertRequested);
        assert!(effect.is_none());
        assert!(matches!(session.conversion(), ConversionState::Failed(_)));
    }

    #[test]
    fn test_stale_result_is_discarded() {
        let (session, _) = ready_session().reduce(Action::ConvertRequested);
        let (session, _) = session.reduce(Action::AmountChanged("3".to_string()));
        let (session, effect) = session.reduce(Action::ConvertRequested);
        assert!(matches!(effect, Some(Effect::Convert { token: 2, .. })));

        // First request completes late
        let (session, _) = session.reduce(Action::ConversionFinished {
            token: 1,
            result: result(130000.0),
        });
        assert_eq!(session.conversion(), &ConversionState::Fetching);

        let (session, _) = session.reduce(Action::ConversionFinished {
            token: 2,
            result: result(195000.0),
        });
        assert!(matches!(
            session.conversion(),
            ConversionState::Succeeded(r) if r.value == 195000.0
        ));
    }
}
