use serde::{Deserialize, Serialize};

use crate::models::intent::ToolRequest;
use crate::models::navigation::{NavigationTarget, ParamCarry, CALENDAR_PATH, EMAIL_COMPOSE_PATH};

/// Who the current request is acting for. Passed explicitly rather than read
/// from ambient auth state, so dispatch works without a live session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionContext {
    pub user_id: Option<String>,
    pub access_token: Option<String>,
}

impl SessionContext {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn is_authenticated(&self) -> bool {
        self.access_token.is_some()
    }
}

/// The UI side sink that performs navigation
pub trait Navigator: Send + Sync {
    fn navigate(&self, context: &SessionContext, target: &NavigationTarget);
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    Navigated(NavigationTarget),
    Ignored { action: String },
}

/// Maps tool requests onto navigation of the UI
pub struct IntentDispatcher<N: Navigator> {
    navigator: N,
}

impl<N: Navigator> IntentDispatcher<N> {
    pub fn new(navigator: N) -> Self {
        Self { navigator }
    }

    pub fn navigator(&self) -> &N {
        &self.navigator
    }

    /// Where a request leads, without navigating. `None` for unrecognized actions.
    pub fn target_for(request: &ToolRequest) -> Option<NavigationTarget> {
        match request {
            ToolRequest::NavigateToEmailCompose(params) => Some(
                NavigationTarget::new(EMAIL_COMPOSE_PATH, ParamCarry::Query)
                    .with_param("to", params.to.as_deref())
                    .with_param("subject", params.subject.as_deref())
                    .with_param("body", params.body.as_deref()),
            ),
            ToolRequest::NavigateToCalendar(params) => Some(
                NavigationTarget::new(CALENDAR_PATH, ParamCarry::State)
                    .with_param("date", params.date.as_deref())
                    .with_param("summary", params.summary.as_deref())
                    .with_param("startTime", params.start_time.as_deref()),
            ),
            ToolRequest::Unrecognized { .. } => None,
        }
    }

    /// Navigate once for the request. Unrecognized actions are logged and dropped.
    pub fn dispatch(&self, context: &SessionContext, request: &ToolRequest) -> DispatchOutcome {
        match Self::target_for(request) {
            Some(target) => {
                tracing::info!(action = request.action(), href = %target.href(), "dispatching tool request");
                self.navigator.navigate(context, &target);
                DispatchOutcome::Navigated(target)
            }
            None => {
                tracing::warn!(action = request.action(), "ignoring unrecognized tool action");
                DispatchOutcome::Ignored {
                    action: request.action().to_string(),
                }
            }
        }
    }
}

/// A tool request waiting for its one-shot navigation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PendingIntent {
    request: Option<ToolRequest>,
}

impl PendingIntent {
    pub fn set(&mut self, request: ToolRequest) {
        self.request = Some(request);
    }

    pub fn is_pending(&self) -> bool {
        self.request.is_some()
    }

    pub fn take(&mut self) -> Option<ToolRequest> {
        self.request.take()
    }

    /// Dispatch the pending request, if any, clearing it first
    pub fn fire<N: Navigator>(
        &mut self,
        dispatcher: &IntentDispatcher<N>,
        context: &SessionContext,
    ) -> Option<DispatchOutcome> {
        let request = self.take()?;
        Some(dispatcher.dispatch(context, &request))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::intent::{CalendarParams, EmailComposeParams};
    use crate::parser::parse_model_output;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingNavigator {
        calls: Mutex<Vec<(SessionContext, NavigationTarget)>>,
    }

    impl Navigator for RecordingNavigator {
        fn navigate(&self, context: &SessionContext, target: &NavigationTarget) {
            self.calls
                .lock()
                .unwrap()
                .push((context.clone(), target.clone()));
        }
    }

    fn email(to: Option<&str>, subject: Option<&str>, body: Option<&str>) -> ToolRequest {
        ToolRequest::NavigateToEmailCompose(EmailComposeParams {
            to: to.map(String::from),
            subject: subject.map(String::from),
            body: body.map(String::from),
        })
    }

    #[test]
    fn test_email_params_present_exactly_when_given() {
        let fields = [Some("a@b.co"), Some("Hi there"), Some("Body text")];
        for mask in 0..8u8 {
            let pick = |i: usize| if mask & (1 << i) != 0 { fields[i] } else { None };
            let request = email(pick(0), pick(1), pick(2));
            let target = IntentDispatcher::<RecordingNavigator>::target_for(&request).unwrap();

            assert_eq!(target.path, "/email/compose");
            assert_eq!(target.carry, ParamCarry::Query);
            for (i, key) in ["to", "subject", "body"].iter().enumerate() {
                assert_eq!(target.param(key), pick(i), "mask {} key {}", mask, key);
            }
            assert_eq!(target.params.len(), mask.count_ones() as usize);
        }
    }

    #[test]
    fn test_dispatch_calendar_from_raw_output() {
        let dispatcher = IntentDispatcher::new(RecordingNavigator::default());
        let context = SessionContext {
            user_id: Some("u-1".to_string()),
            access_token: Some("token".to_string()),
        };

        let raw = r#"Sure! {"toolRequest":{"action":"navigateToCalendar","params":{"date":"2024-07-29","summary":"Dentist"}}} Hope that helps!"#;
        let interpretation = parse_model_output(raw);
        let request = interpretation.as_tool_request().unwrap();

        let outcome = dispatcher.dispatch(&context, request);
        let DispatchOutcome::Navigated(target) = outcome else {
            panic!("Expected navigation");
        };
        assert_eq!(target.path, "/calendar");
        assert_eq!(target.carry, ParamCarry::State);
        assert_eq!(target.param("date"), Some("2024-07-29"));
        assert_eq!(target.param("summary"), Some("Dentist"));
        assert_eq!(target.param("startTime"), None);

        let calls = dispatcher.navigator().calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, context);
        assert_eq!(calls[0].1, target);
    }

    #[test]
    fn test_unrecognized_action_does_not_navigate() {
        let dispatcher = IntentDispatcher::new(RecordingNavigator::default());
        let request = ToolRequest::Unrecognized {
            action: "launchRocket".to_string(),
        };

        let outcome = dispatcher.dispatch(&SessionContext::anonymous(), &request);
        assert_eq!(
            outcome,
            DispatchOutcome::Ignored {
                action: "launchRocket".to_string()
            }
        );
        assert!(dispatcher.navigator().calls.lock().unwrap().is_empty());
    }

    #[test]
    fn test_pending_intent_fires_once() {
        let dispatcher = IntentDispatcher::new(RecordingNavigator::default());
        let context = SessionContext::anonymous();
        let mut pending = PendingIntent::default();
        assert!(pending.fire(&dispatcher, &context).is_none());

        pending.set(ToolRequest::NavigateToCalendar(CalendarParams {
            start_time: Some("14:00".to_string()),
            ..Default::default()
        }));
        assert!(pending.is_pending());

        let outcome = pending.fire(&dispatcher, &context);
        assert!(matches!(outcome, Some(DispatchOutcome::Navigated(_))));
        assert!(!pending.is_pending());
        assert!(pending.fire(&dispatcher, &context).is_none());
        assert_eq!(dispatcher.navigator().calls.lock().unwrap().len(), 1);
    }
}
