use biometrics::{Collector, Counter, Moments};

pub(crate) static CLIENT_REQUESTS: Counter = Counter::new("chatfront.client.requests");
pub(crate) static CLIENT_REQUEST_ERRORS: Counter =
    Counter::new("chatfront.client.request_errors");
pub(crate) static CLIENT_REQUEST_TIMEOUTS: Counter =
    Counter::new("chatfront.client.request_timeouts");
pub(crate) static CLIENT_REQUEST_DURATION: Moments =
    Moments::new("chatfront.client.request_duration_seconds");
pub(crate) static CLIENT_HEALTH_CHECKS: Counter = Counter::new("chatfront.client.health_checks");

pub(crate) static SESSION_TURNS: Counter = Counter::new("chatfront.session.turns");
pub(crate) static SESSION_FAILED_TURNS: Counter = Counter::new("chatfront.session.failed_turns");
pub(crate) static SESSION_EMPTY_SUBMISSIONS: Counter =
    Counter::new("chatfront.session.empty_submissions");

/// Register this crate's biometrics with the provided collector.
pub fn register_biometrics(collector: Collector) {
    collector.register_counter(&CLIENT_REQUESTS);
    collector.register_counter(&CLIENT_REQUEST_ERRORS);
    collector.register_counter(&CLIENT_REQUEST_TIMEOUTS);
    collector.register_moments(&CLIENT_REQUEST_DURATION);
    collector.register_counter(&CLIENT_HEALTH_CHECKS);

    collector.register_counter(&SESSION_TURNS);
    collector.register_counter(&SESSION_FAILED_TURNS);
    collector.register_counter(&SESSION_EMPTY_SUBMISSIONS);
}
